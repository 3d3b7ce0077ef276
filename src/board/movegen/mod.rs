//! Legal move generation.
//!
//! Two entry paths chosen by `in_check`: normal generation restricts pinned
//! pieces to their pin ray; check evasion generates king flights (with the
//! king treated as absent so sliders see through it), captures of the
//! checker and interpositions. Both paths split on demand into the
//! material family (captures and promotions) and the quiet family, whose
//! union is exactly the legal move set.

use super::attack_tables::{
    between, bishop_attacks, king_attacks, knight_attacks, line_through, pawn_attacks,
    queen_attacks, rook_attacks,
};
use super::types::{
    Bitboard, Color, Move, MoveKind, MoveList, Piece, PieceKind, Square, PROMOTION_KINDS,
};
use super::Position;

/// Which move family to emit.
#[derive(Clone, Copy, PartialEq, Eq)]
enum GenFamily {
    All,
    Material,
    Quiet,
}

impl Position {
    /// All legal moves.
    pub fn generate_moves(&self, list: &mut MoveList) {
        if self.in_check() {
            self.generate_evasions(GenFamily::All, list);
        } else {
            self.generate_normal(GenFamily::All, list);
        }
    }

    /// Captures and promotions only (all evasions of those families when in
    /// check).
    pub fn generate_material_moves(&self, list: &mut MoveList) {
        if self.in_check() {
            self.generate_evasions(GenFamily::Material, list);
        } else {
            self.generate_normal(GenFamily::Material, list);
        }
    }

    /// Quiet moves only.
    pub fn generate_quiet_moves(&self, list: &mut MoveList) {
        if self.in_check() {
            self.generate_evasions(GenFamily::Quiet, list);
        } else {
            self.generate_normal(GenFamily::Quiet, list);
        }
    }

    // ------------------------------------------------------------------
    // Normal generation (not in check)
    // ------------------------------------------------------------------

    fn generate_normal(&self, family: GenFamily, list: &mut MoveList) {
        debug_assert!(!self.in_check());
        let us = self.side_to_move();
        let them = us.opponent();
        let own = self.occupied_by(us);
        let opp = self.occupied_by(them);
        let occupancy = self.all_occupied();
        let target = match family {
            GenFamily::All => !own,
            GenFamily::Material => opp,
            GenFamily::Quiet => self.empty,
        };
        let pinned = self.pinned_blockers(us);
        let ksq = self.king_square(us);

        // knights: a pinned knight can never stay on its pin ray
        let knight = Piece::from_parts(us, PieceKind::Knight);
        for from in (self.pieces(knight) & !pinned).squares() {
            for to in (knight_attacks(from) & target).squares() {
                list.push(Move::new(from, to, knight, self.piece_at(to), MoveKind::Normal));
            }
        }

        for kind in [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop] {
            let piece = Piece::from_parts(us, kind);
            for from in self.pieces(piece).squares() {
                let attacks = match kind {
                    PieceKind::Queen => queen_attacks(from, occupancy),
                    PieceKind::Rook => rook_attacks(from, occupancy),
                    _ => bishop_attacks(from, occupancy),
                };
                let mut targets = attacks & target;
                if pinned.is_set(from) {
                    targets &= line_through(ksq, from);
                }
                for to in targets.squares() {
                    list.push(Move::new(from, to, piece, self.piece_at(to), MoveKind::Normal));
                }
            }
        }

        // king steps; the destination test removes the king from the
        // occupancy so a fleeing king cannot hide behind itself
        let king = Piece::from_parts(us, PieceKind::King);
        let king_absent = occupancy ^ Bitboard::from_square(ksq);
        for to in (king_attacks(ksq) & target).squares() {
            if self.attackers_to_by(to, them, king_absent).is_empty() {
                list.push(Move::new(ksq, to, king, self.piece_at(to), MoveKind::Normal));
            }
        }

        if family != GenFamily::Material {
            self.generate_castling(us, list);
        }

        self.generate_pawn_moves(family, us, pinned, ksq, list);
    }

    fn generate_castling(&self, us: Color, list: &mut MoveList) {
        let king = Piece::from_parts(us, PieceKind::King);
        let (home, short_to, long_to) = if us.is_white() {
            (Square::E1, Square::G1, Square::C1)
        } else {
            (Square::E8, Square::G8, Square::C8)
        };
        let rights = self.castling_rights(us);
        if rights.has_short() {
            let mv = Move::new(home, short_to, king, Piece::None, MoveKind::ShortCastle);
            if self.castle_is_legal(mv, us) {
                list.push(mv);
            }
        }
        if rights.has_long() {
            let mv = Move::new(home, long_to, king, Piece::None, MoveKind::LongCastle);
            if self.castle_is_legal(mv, us) {
                list.push(mv);
            }
        }
    }

    fn generate_pawn_moves(
        &self,
        family: GenFamily,
        us: Color,
        pinned: Bitboard,
        ksq: Square,
        list: &mut MoveList,
    ) {
        let them = us.opponent();
        let opp = self.occupied_by(them);
        let pawn = Piece::from_parts(us, PieceKind::Pawn);
        let push = us.pawn_push();
        let (double_rank, promo_rank) = if us.is_white() { (1, 7) } else { (6, 0) };

        for from in self.pieces(pawn).squares() {
            let pin_mask = if pinned.is_set(from) {
                line_through(ksq, from)
            } else {
                Bitboard::FULL
            };

            if family != GenFamily::Quiet {
                for to in (pawn_attacks(us, from) & opp & pin_mask).squares() {
                    let captured = self.piece_at(to);
                    if to.rank() == promo_rank {
                        push_promotions(list, from, to, pawn, captured);
                    } else {
                        list.push(Move::new(from, to, pawn, captured, MoveKind::Normal));
                    }
                }
            }

            let single = from.offset(push);
            if self.empty.is_set(single) {
                if single.rank() == promo_rank {
                    if family != GenFamily::Quiet && pin_mask.is_set(single) {
                        push_promotions(list, from, single, pawn, Piece::None);
                    }
                } else if family != GenFamily::Material {
                    if pin_mask.is_set(single) {
                        list.push(Move::new(from, single, pawn, Piece::None, MoveKind::Normal));
                    }
                    if from.rank() == double_rank {
                        let double = from.offset(2 * push);
                        if self.empty.is_set(double) && pin_mask.is_set(double) {
                            list.push(Move::new(from, double, pawn, Piece::None, MoveKind::Normal));
                        }
                    }
                }
            }

            if family != GenFamily::Quiet {
                if let Some(ep_to) = self.en_passant_square() {
                    // the occupancy-toggle test covers pins and the shared
                    // fifth-rank discovered check in one stroke
                    if pawn_attacks(us, from).is_set(ep_to) && self.en_passant_legal(from) {
                        let captured = Piece::from_parts(them, PieceKind::Pawn);
                        list.push(Move::new(from, ep_to, pawn, captured, MoveKind::EnPassant));
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Check evasions
    // ------------------------------------------------------------------

    fn generate_evasions(&self, family: GenFamily, list: &mut MoveList) {
        debug_assert!(self.in_check());
        let us = self.side_to_move();
        let them = us.opponent();
        let own = self.occupied_by(us);
        let opp = self.occupied_by(them);
        let occupancy = self.all_occupied();
        let ksq = self.king_square(us);
        let king = Piece::from_parts(us, PieceKind::King);
        let king_bb = Bitboard::from_square(ksq);

        // king flights, with the king absent so sliders see through it
        let king_absent = occupancy ^ king_bb;
        let flight_target = match family {
            GenFamily::All => !own,
            GenFamily::Material => opp,
            GenFamily::Quiet => self.empty,
        };
        for to in (king_attacks(ksq) & flight_target).squares() {
            if self.attackers_to_by(to, them, king_absent).is_empty() {
                list.push(Move::new(ksq, to, king, self.piece_at(to), MoveKind::Normal));
            }
        }

        // double check: only the king moves
        if self.checkers.more_than_one() {
            return;
        }
        let checker = self.checkers.lsb_square();
        let checker_piece = self.piece_at(checker);
        let pinned = self.pinned_blockers(us);
        let pawn = Piece::from_parts(us, PieceKind::Pawn);
        let promo_rank = if us.is_white() { 7 } else { 0 };

        // capture the checker with a non-pinned, non-king piece
        if family != GenFamily::Quiet {
            let capturers = self.attackers_to_by(checker, us, occupancy) & !king_bb & !pinned;
            for from in capturers.squares() {
                let piece = self.piece_at(from);
                if piece == pawn && checker.rank() == promo_rank {
                    push_promotions(list, from, checker, pawn, checker_piece);
                } else {
                    list.push(Move::new(from, checker, piece, checker_piece, MoveKind::Normal));
                }
            }

            // en passant: captures the checking double-pushed pawn, or in
            // rare cases interposes; the toggle test decides either way
            if let Some(ep_to) = self.en_passant_square() {
                let candidates = pawn_attacks(them, ep_to) & self.pieces(pawn);
                for from in candidates.squares() {
                    if self.en_passant_legal(from) {
                        let captured = Piece::from_parts(them, PieceKind::Pawn);
                        list.push(Move::new(from, ep_to, pawn, captured, MoveKind::EnPassant));
                    }
                }
            }
        }

        // interpose on the checking ray of a slider
        if checker_piece.kind().is_slider() {
            let blocks = between(checker, ksq);
            for to in blocks.squares() {
                self.generate_interpositions(family, us, to, pinned, promo_rank, list);
            }
        }
    }

    /// Non-king moves of the side to move that land on the empty square
    /// `to`, used for check interposition. Pinned pieces never qualify.
    fn generate_interpositions(
        &self,
        family: GenFamily,
        us: Color,
        to: Square,
        pinned: Bitboard,
        promo_rank: u8,
        list: &mut MoveList,
    ) {
        debug_assert!(self.empty.is_set(to));
        let occupancy = self.all_occupied();

        let is_promo = to.rank() == promo_rank;
        let emit_quietly = family != GenFamily::Material;
        let emit_promos = family != GenFamily::Quiet;

        if emit_quietly {
            let knight = Piece::from_parts(us, PieceKind::Knight);
            for from in (knight_attacks(to) & self.pieces(knight) & !pinned).squares() {
                list.push(Move::new(from, to, knight, Piece::None, MoveKind::Normal));
            }

            let straight = rook_attacks(to, occupancy)
                & (self.piece_bb(us, PieceKind::Rook) | self.piece_bb(us, PieceKind::Queen));
            let diagonal = bishop_attacks(to, occupancy)
                & (self.piece_bb(us, PieceKind::Bishop) | self.piece_bb(us, PieceKind::Queen));
            for from in ((straight | diagonal) & !pinned).squares() {
                list.push(Move::new(from, to, self.piece_at(from), Piece::None, MoveKind::Normal));
            }
        }

        // pawn pushes onto the blocking square
        let back_rank = if us.is_white() { 0 } else { 7 };
        if to.rank() == back_rank {
            return;
        }
        let pawn = Piece::from_parts(us, PieceKind::Pawn);
        let push = us.pawn_push();
        let single_from = to.offset(-push);
        if self.pieces(pawn).is_set(single_from) && !pinned.is_set(single_from) {
            if is_promo {
                if emit_promos {
                    push_promotions(list, single_from, to, pawn, Piece::None);
                }
            } else if emit_quietly {
                list.push(Move::new(single_from, to, pawn, Piece::None, MoveKind::Normal));
            }
        } else if emit_quietly && self.empty.is_set(single_from) {
            // a double push can interpose on its destination rank
            let double_to_rank = if us.is_white() { 3 } else { 4 };
            if to.rank() == double_to_rank {
                let double_from = to.offset(-2 * push);
                if self.pieces(pawn).is_set(double_from) && !pinned.is_set(double_from) {
                    list.push(Move::new(double_from, to, pawn, Piece::None, MoveKind::Normal));
                }
            }
        }
    }
}

fn push_promotions(list: &mut MoveList, from: Square, to: Square, pawn: Piece, captured: Piece) {
    for kind in PROMOTION_KINDS {
        list.push(Move::new(
            from,
            to,
            pawn,
            captured,
            MoveKind::promotion_from_kind(kind),
        ));
    }
}
