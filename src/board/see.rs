//! Static exchange evaluation.
//!
//! Plays out the capture sequence on one square, each side recapturing
//! with its cheapest attacker, and minimaxes the material balance from the
//! first mover's perspective. X-rays through the capturing pieces are
//! revealed as the exchange proceeds.

use super::attack_tables::{bishop_attacks, rook_attacks};
use super::types::{Bitboard, Color, Move, Piece, PieceKind, Square};
use super::Position;

/// Exchange values by piece kind; the king's value only matters for
/// ordering (it can never actually be captured).
pub(crate) const SEE_VALUES: [i32; 6] = [20_000, 900, 500, 330, 320, 100];

/// Exchange value of one piece kind.
#[inline]
#[must_use]
pub fn piece_value(kind: PieceKind) -> i32 {
    SEE_VALUES[kind.index()]
}

/// Longest possible exchange: 32 pieces.
const MAX_EXCHANGE: usize = 32;

impl Position {
    /// The static exchange score of a capture, in centipawns from the
    /// mover's perspective. Non-captures score zero.
    #[must_use]
    pub fn see(&self, m: Move) -> i32 {
        if !m.is_capture() {
            return 0;
        }

        let to = m.to();
        let mut occupancy = self.all_occupied();
        if m.is_en_passant() {
            // the captured pawn does not sit on the destination square
            occupancy ^= Bitboard::from_square(m.capture_square());
        }

        let mut gain = [0i32; MAX_EXCHANGE];
        gain[0] = piece_value(m.captured().kind());

        let mut depth = 0usize;
        let mut current_kind = m.piece().kind();
        let mut from_bb = Bitboard::from_square(m.from());
        let mut side = match m.piece().color() {
            Some(color) => color.opponent(),
            None => return 0,
        };
        let mut attackers = self.attackers_to(to, occupancy);

        loop {
            // lift the capturer off the board and reveal anything behind it
            occupancy ^= from_bb;
            attackers &= !from_bb;
            if matches!(
                current_kind,
                PieceKind::Pawn | PieceKind::Bishop | PieceKind::Queen
            ) {
                attackers |= bishop_attacks(to, occupancy) & self.diagonal_sliders() & occupancy;
            }
            if matches!(current_kind, PieceKind::Rook | PieceKind::Queen) {
                attackers |= rook_attacks(to, occupancy) & self.straight_sliders() & occupancy;
            }

            let recapturers = attackers & self.occupied_by(side);
            if recapturers.is_empty() {
                break;
            }

            let (kind, bb) = least_valuable(self, recapturers, side);

            // the king may only recapture when nothing answers it
            if kind == PieceKind::King
                && !(attackers & self.occupied_by(side.opponent())).is_empty()
            {
                break;
            }

            depth += 1;
            if depth >= MAX_EXCHANGE {
                break;
            }
            gain[depth] = piece_value(current_kind) - gain[depth - 1];

            // neither continuing nor standing pat can recover: stop early
            if (-gain[depth - 1]).max(gain[depth]) < 0 {
                break;
            }

            current_kind = kind;
            from_bb = bb;
            side = side.opponent();
        }

        // minimax the speculative gains back to the root
        while depth > 0 {
            depth -= 1;
            gain[depth] = -((-gain[depth]).max(gain[depth + 1]));
        }
        gain[0]
    }

    /// Whether the capture's exchange score reaches `threshold`.
    #[inline]
    #[must_use]
    pub fn see_at_least(&self, m: Move, threshold: i32) -> bool {
        self.see(m) >= threshold
    }

    #[inline]
    pub(crate) fn diagonal_sliders(&self) -> Bitboard {
        self.pieces(Piece::WhiteBishop)
            | self.pieces(Piece::BlackBishop)
            | self.pieces(Piece::WhiteQueen)
            | self.pieces(Piece::BlackQueen)
    }

    #[inline]
    pub(crate) fn straight_sliders(&self) -> Bitboard {
        self.pieces(Piece::WhiteRook)
            | self.pieces(Piece::BlackRook)
            | self.pieces(Piece::WhiteQueen)
            | self.pieces(Piece::BlackQueen)
    }
}

/// Cheapest piece of `side` among `candidates`, as (kind, single-bit board).
fn least_valuable(pos: &Position, candidates: Bitboard, side: Color) -> (PieceKind, Bitboard) {
    for kind in [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        let matching = candidates & pos.piece_bb(side, kind);
        if !matching.is_empty() {
            return (kind, matching.lsb());
        }
    }
    // candidates is never empty when called
    (PieceKind::King, Bitboard::from_square(Square::A1))
}
