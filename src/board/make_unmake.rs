//! Applying and reversing moves.
//!
//! `make_move` mutates by XOR-ing bitboards and mirrors every change into
//! the Zobrist keys; `unmake_move` reverses it exactly, restoring the
//! unreconstructible state from the stack. Nothing here allocates.

use super::attack_tables::{between, king_attacks, knight_attacks, pawn_attacks, piece_attacks};
use super::error::EngineError;
use super::state::{NullUnmake, Unmake, MAX_GAME_PLIES};
use super::types::{
    Bitboard, CastlingRights, Color, Move, MoveKind, Piece, PieceKind, Square,
};
use super::Position;
use crate::zobrist::ZOBRIST;

/// The rook's journey for a castle move, keyed by the king's destination.
fn castle_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        Square::G1 => (Square::H1, Square::F1),
        Square::C1 => (Square::A1, Square::D1),
        Square::G8 => (Square::H8, Square::F8),
        _ => (Square::A8, Square::D8),
    }
}

impl Position {
    /// Apply a legal move. The caller guarantees legality (the generator,
    /// or `is_legal_soft` at the boundary); a position reached through
    /// legal makes keeps every invariant.
    pub fn make_move(&mut self, m: Move) {
        debug_assert!(!m.is_null());
        debug_assert!(self.piece_at(m.from()) == m.piece());

        let us = self.side_to_move();
        let piece = m.piece();
        let captured = m.captured();

        self.state_stack.push(Unmake {
            castling_rights: self.castling_rights,
            en_passant_file: self.en_passant_file,
            fifty_move_clock: self.fifty_move_clock,
            checkers: self.checkers,
        });

        let mut key = self.key ^ ZOBRIST.side_to_move();
        if let Some(file) = self.en_passant_file.take() {
            key ^= ZOBRIST.en_passant(file);
        }

        if !captured.is_none() {
            let cap_sq = m.capture_square();
            self.remove_piece(cap_sq, captured);
            key ^= ZOBRIST.piece_square(captured, cap_sq);
        }

        let placed = m.piece_after();
        self.remove_piece(m.from(), piece);
        self.set_piece(m.to(), placed);
        key ^= ZOBRIST.piece_square(piece, m.from()) ^ ZOBRIST.piece_square(placed, m.to());
        self.pawn_key ^= pawn_key_delta(m);

        if m.is_castle() {
            let rook = Piece::from_parts(us, PieceKind::Rook);
            let (rook_from, rook_to) = castle_rook_squares(m.to());
            self.remove_piece(rook_from, rook);
            self.set_piece(rook_to, rook);
            key ^= ZOBRIST.piece_square(rook, rook_from) ^ ZOBRIST.piece_square(rook, rook_to);
        }

        // a double push grants the opponent en-passant rights on this file
        if piece.kind() == PieceKind::Pawn && m.from().rank().abs_diff(m.to().rank()) == 2 {
            let file = m.from().file();
            self.en_passant_file = Some(file);
            key ^= ZOBRIST.en_passant(file);
        }

        key ^= self.update_castling_rights(m, us);

        if piece.kind() == PieceKind::Pawn || m.is_capture() {
            self.fifty_move_clock = 0;
        } else {
            self.fifty_move_clock += 1;
        }
        self.half_move_index += 1;
        self.whites_turn = !self.whites_turn;
        self.key = key;
        self.checkers = self.compute_checkers();
        self.key_history.push(key);
        self.move_stack.push(m);
    }

    /// Reverse the last `make_move` exactly: every observable field,
    /// including the Zobrist keys and stacks, returns to its prior value.
    pub fn unmake_move(&mut self) {
        let m = self.move_stack.pop().expect("unmake without a prior make");
        let saved = self.state_stack.pop().expect("state stack underflow");
        self.key_history.pop();

        self.whites_turn = !self.whites_turn;
        self.half_move_index -= 1;
        let us = self.side_to_move();

        let placed = m.piece_after();
        self.remove_piece(m.to(), placed);
        self.set_piece(m.from(), m.piece());
        self.pawn_key ^= pawn_key_delta(m);

        if m.is_castle() {
            let rook = Piece::from_parts(us, PieceKind::Rook);
            let (rook_from, rook_to) = castle_rook_squares(m.to());
            self.remove_piece(rook_to, rook);
            self.set_piece(rook_from, rook);
        }

        if !m.captured().is_none() {
            self.set_piece(m.capture_square(), m.captured());
        }

        self.castling_rights = saved.castling_rights;
        self.en_passant_file = saved.en_passant_file;
        self.fifty_move_clock = saved.fifty_move_clock;
        self.checkers = saved.checkers;
        self.key = *self
            .key_history
            .last()
            .expect("key history always holds the initial position");
    }

    /// Flip the side to move and clear en-passant rights; everything else
    /// stays. Must not be called in check.
    pub fn make_null_move(&mut self) -> NullUnmake {
        debug_assert!(!self.in_check());
        let saved = NullUnmake {
            en_passant_file: self.en_passant_file,
            checkers: self.checkers,
        };
        self.key ^= ZOBRIST.side_to_move();
        if let Some(file) = self.en_passant_file.take() {
            self.key ^= ZOBRIST.en_passant(file);
        }
        self.whites_turn = !self.whites_turn;
        // the side now to move cannot be in check: the invariant that the
        // side not to move is never attacked held before the flip
        self.checkers = Bitboard::EMPTY;
        saved
    }

    pub fn unmake_null_move(&mut self, saved: NullUnmake) {
        self.whites_turn = !self.whites_turn;
        if let Some(file) = saved.en_passant_file {
            self.key ^= ZOBRIST.en_passant(file);
        }
        self.key ^= ZOBRIST.side_to_move();
        self.en_passant_file = saved.en_passant_file;
        self.checkers = saved.checkers;
    }

    /// Validated boundary mutation: rejects moves that are not pseudo-legal
    /// here or that leave the mover's king in check, and refuses to grow
    /// past the game-length ceiling.
    pub fn play_move(&mut self, m: Move) -> Result<(), EngineError> {
        if self.half_move_index as usize + 1 >= MAX_GAME_PLIES {
            return Err(EngineError::ResourceExhausted {
                resource: "game key history",
            });
        }
        if !self.is_legal_soft(m) {
            return Err(EngineError::InvalidMove {
                notation: m.to_string(),
            });
        }
        self.make_move(m);
        Ok(())
    }

    fn update_castling_rights(&mut self, m: Move, us: Color) -> u64 {
        let mut key_delta = 0u64;

        let mut clear = |rights: &mut [CastlingRights; 2], color: Color, short: bool, long: bool| {
            let old = rights[color.index()];
            let mut new = old;
            if short {
                new = new.without_short();
            }
            if long {
                new = new.without_long();
            }
            if new != old {
                rights[color.index()] = new;
                ZOBRIST.castling(color, old) ^ ZOBRIST.castling(color, new)
            } else {
                0
            }
        };

        if m.piece().kind() == PieceKind::King {
            key_delta ^= clear(&mut self.castling_rights, us, true, true);
        } else if m.piece().kind() == PieceKind::Rook {
            let (short_home, long_home) = rook_homes(us);
            key_delta ^= clear(
                &mut self.castling_rights,
                us,
                m.from() == short_home,
                m.from() == long_home,
            );
        }

        if !m.captured().is_none() && m.captured().kind() == PieceKind::Rook {
            let them = us.opponent();
            let (short_home, long_home) = rook_homes(them);
            key_delta ^= clear(
                &mut self.castling_rights,
                them,
                m.to() == short_home,
                m.to() == long_home,
            );
        }

        key_delta
    }

    // ------------------------------------------------------------------
    // Move prediction and validation
    // ------------------------------------------------------------------

    /// Predict whether a move gives check, without making it. Used for
    /// extension and pruning decisions.
    #[must_use]
    pub fn gives_check(&self, m: Move) -> bool {
        let us = self.side_to_move();
        let them = us.opponent();
        let their_king = self.king_square(them);
        let from_bb = Bitboard::from_square(m.from());
        let to_bb = Bitboard::from_square(m.to());

        let mut occupancy = (self.all_occupied() ^ from_bb) | to_bb;
        if m.is_en_passant() {
            occupancy ^= Bitboard::from_square(m.capture_square());
        }

        if m.is_castle() {
            // only the rook can deliver the check
            let (rook_from, rook_to) = castle_rook_squares(m.to());
            occupancy ^= Bitboard::from_square(rook_from);
            occupancy |= Bitboard::from_square(rook_to);
            return super::attack_tables::rook_attacks(rook_to, occupancy).is_set(their_king);
        }

        // direct check from the destination
        let placed = m.piece_after();
        if placed.kind() != PieceKind::King
            && piece_attacks(placed, m.to(), occupancy).is_set(their_king)
        {
            return true;
        }

        // discovered check through the vacated square(s); mask the mover
        // out of its old bitboard position
        let rooks = (self.piece_bb(us, PieceKind::Rook) | self.piece_bb(us, PieceKind::Queen))
            & !from_bb;
        if !(super::attack_tables::rook_attacks(their_king, occupancy) & rooks).is_empty() {
            return true;
        }
        let bishops = (self.piece_bb(us, PieceKind::Bishop) | self.piece_bb(us, PieceKind::Queen))
            & !from_bb;
        !(super::attack_tables::bishop_attacks(their_king, occupancy) & bishops).is_empty()
    }

    /// Full legality of the en-passant capture from `from`: toggle the
    /// three affected squares and ask whether the king is attacked, which
    /// covers both ordinary pins and the shared-rank discovered check.
    pub(crate) fn en_passant_legal(&self, from: Square) -> bool {
        let us = self.side_to_move();
        let them = us.opponent();
        let to = match self.en_passant_square() {
            Some(sq) => sq,
            None => return false,
        };
        let cap_sq = to.offset(-us.pawn_push());
        let cap_bb = Bitboard::from_square(cap_sq);
        let occupancy = (self.all_occupied() ^ Bitboard::from_square(from) ^ cap_bb)
            | Bitboard::from_square(to);
        let ksq = self.king_square(us);
        (self.attackers_to_by(ksq, them, occupancy) & !cap_bb).is_empty()
    }

    /// Whether `m` - typically a stale move out of the transposition or
    /// killer table, possibly packed in a different position - is fully
    /// legal here. Structurally robust: any 32-bit pattern that survived
    /// `Move::unpack` is safe to pass.
    #[must_use]
    pub fn is_legal_soft(&self, m: Move) -> bool {
        if m.is_null() {
            return false;
        }
        let us = self.side_to_move();
        let them = us.opponent();
        let piece = m.piece();

        if !piece.is_color(us) || self.piece_at(m.from()) != piece {
            return false;
        }
        let captured = m.captured();
        if !captured.is_none() && (captured.is_color(us) || captured.kind() == PieceKind::King) {
            return false;
        }

        match m.kind() {
            MoveKind::ShortCastle | MoveKind::LongCastle => return self.castle_is_legal(m, us),
            MoveKind::EnPassant => {
                return piece.kind() == PieceKind::Pawn
                    && self.en_passant_square() == Some(m.to())
                    && captured == Piece::from_parts(them, PieceKind::Pawn)
                    && pawn_attacks(us, m.from()).is_set(m.to())
                    && self.en_passant_legal(m.from());
            }
            MoveKind::Normal => {
                if piece.kind() == PieceKind::Pawn
                    && (m.to().rank() == 7 || m.to().rank() == 0)
                {
                    // a pawn reaching the last rank must promote
                    return false;
                }
            }
            _ => {
                // promotions
                if piece.kind() != PieceKind::Pawn {
                    return false;
                }
                let last_rank = if us.is_white() { 7 } else { 0 };
                if m.to().rank() != last_rank {
                    return false;
                }
            }
        }

        // the destination contents must match the packed capture
        if self.piece_at(m.to()) != captured {
            return false;
        }

        // movement geometry
        match piece.kind() {
            PieceKind::Pawn => {
                if captured.is_none() {
                    let push = us.pawn_push();
                    let single = m.from().offset(push);
                    let double_rank = if us.is_white() { 1 } else { 6 };
                    let is_single = m.to() == single && self.empty.is_set(single);
                    let is_double = m.from().rank() == double_rank
                        && m.to() == m.from().offset(2 * push)
                        && self.empty.is_set(single)
                        && self.empty.is_set(m.to());
                    if !is_single && !is_double {
                        return false;
                    }
                } else if !pawn_attacks(us, m.from()).is_set(m.to()) {
                    return false;
                }
            }
            PieceKind::Knight => {
                if !knight_attacks(m.from()).is_set(m.to()) {
                    return false;
                }
            }
            PieceKind::King => {
                if !king_attacks(m.from()).is_set(m.to()) {
                    return false;
                }
            }
            _ => {
                if !piece_attacks(piece, m.from(), self.all_occupied()).is_set(m.to()) {
                    return false;
                }
            }
        }

        // king safety
        let ksq = self.king_square(us);
        if piece.kind() == PieceKind::King {
            let occupancy = self.all_occupied() ^ Bitboard::from_square(m.from());
            return self.attackers_to_by(m.to(), them, occupancy).is_empty();
        }

        if self.in_check() {
            if self.checkers.more_than_one() {
                // double check: only the king moves
                return false;
            }
            let checker = self.checkers.lsb_square();
            let resolves =
                m.capture_square() == checker || between(checker, ksq).is_set(m.to());
            if !resolves {
                return false;
            }
        }

        // absolute pins confine the mover to the king-pinner line
        if self.pinned_blockers(us).is_set(m.from())
            && !super::attack_tables::line_through(ksq, m.from()).is_set(m.to())
        {
            return false;
        }

        true
    }

    pub(crate) fn castle_is_legal(&self, m: Move, us: Color) -> bool {
        if m.piece().kind() != PieceKind::King || m.is_capture() || self.in_check() {
            return false;
        }
        let home = if us.is_white() { Square::E1 } else { Square::E8 };
        if m.from() != home {
            return false;
        }
        let short = m.kind() == MoveKind::ShortCastle;
        let rights = self.castling_rights(us);
        if short && !rights.has_short() || !short && !rights.has_long() {
            return false;
        }
        let expected_to = match (us, short) {
            (Color::White, true) => Square::G1,
            (Color::White, false) => Square::C1,
            (Color::Black, true) => Square::G8,
            (Color::Black, false) => Square::C8,
        };
        if m.to() != expected_to {
            return false;
        }
        let (rook_home, _) = castle_rook_squares(expected_to);
        if self.piece_at(rook_home) != Piece::from_parts(us, PieceKind::Rook) {
            return false;
        }
        // the path between king and rook must be empty
        if !(between(home, rook_home) & self.all_occupied()).is_empty() {
            return false;
        }
        // the king must not cross an attacked square
        let them = us.opponent();
        let occupancy = self.all_occupied();
        for transit in between(home, expected_to).squares() {
            if self.is_square_attacked(transit, them, occupancy) {
                return false;
            }
        }
        !self.is_square_attacked(expected_to, them, occupancy)
    }
}

/// XOR delta to the pawn-structure key (pawns and kings only). XOR is its
/// own inverse, so make and unmake apply the same delta.
fn pawn_key_delta(m: Move) -> u64 {
    let mut delta = 0u64;
    let piece = m.piece();
    if matches!(piece.kind(), PieceKind::Pawn | PieceKind::King) {
        delta ^= ZOBRIST.piece_square(piece, m.from());
    }
    let placed = m.piece_after();
    if matches!(placed.kind(), PieceKind::Pawn | PieceKind::King) {
        delta ^= ZOBRIST.piece_square(placed, m.to());
    }
    let captured = m.captured();
    if !captured.is_none() && captured.kind() == PieceKind::Pawn {
        delta ^= ZOBRIST.piece_square(captured, m.capture_square());
    }
    delta
}

fn rook_homes(color: Color) -> (Square, Square) {
    if color.is_white() {
        (Square::H1, Square::A1)
    } else {
        (Square::H8, Square::A8)
    }
}
