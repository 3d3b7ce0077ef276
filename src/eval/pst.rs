//! Material values, phase weights and piece-square tables.
//!
//! Tables are written visually: the first row is rank 8, the last row is
//! rank 1, from white's point of view. `pst` mirrors the square for black.
//! Pawns, knights, rooks and kings get separate opening and endgame
//! tables; bishops and queens use a single table for both phases.

use crate::board::{Color, PieceKind, Square};

/// Middlegame material by kind `[K, Q, R, B, N, P]`.
pub const MATERIAL_MG: [i32; 6] = [0, 1025, 477, 365, 337, 82];
/// Endgame material by kind.
pub const MATERIAL_EG: [i32; 6] = [0, 936, 512, 297, 281, 94];

/// Game-phase weight by kind; the total over all non-pawn material maps
/// linearly onto the 0..=256 phase scale.
pub const PHASE_WEIGHTS: [i32; 6] = [0, 4, 2, 1, 1, 0];

/// Phase total of the initial position (two queens, four rooks, four
/// bishops, four knights).
pub const PHASE_MAX: i32 = 24;

/// Full phase scale: 256 is the initial position, 0 a pawn endgame.
pub const PHASE_SCALE: i32 = 256;

#[rustfmt::skip]
const PAWN_MG: [i8; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    50,  50,  50,  50,  50,  50,  50,  50,
    10,  10,  20,  30,  30,  20,  10,  10,
     5,   5,  10,  25,  25,  10,   5,   5,
     0,   0,   0,  20,  20,   0,   0,   0,
     5,  -5, -10,   0,   0, -10,  -5,   5,
     5,  10,  10, -20, -20,  10,  10,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: [i8; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    80,  80,  80,  80,  80,  80,  80,  80,
    50,  50,  50,  50,  50,  50,  50,  50,
    30,  30,  30,  30,  30,  30,  30,  30,
    15,  15,  15,  15,  15,  15,  15,  15,
     5,   5,   5,   5,   5,   5,   5,   5,
     5,   5,   5,   5,   5,   5,   5,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_MG: [i8; 64] = [
   -50, -40, -30, -30, -30, -30, -40, -50,
   -40, -20,   0,   0,   0,   0, -20, -40,
   -30,   0,  10,  15,  15,  10,   0, -30,
   -30,   5,  15,  20,  20,  15,   5, -30,
   -30,   0,  15,  20,  20,  15,   0, -30,
   -30,   5,  10,  15,  15,  10,   5, -30,
   -40, -20,   0,   5,   5,   0, -20, -40,
   -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const KNIGHT_EG: [i8; 64] = [
   -40, -30, -20, -20, -20, -20, -30, -40,
   -30, -15,  -5,   0,   0,  -5, -15, -30,
   -20,  -5,  10,  12,  12,  10,  -5, -20,
   -20,   0,  12,  18,  18,  12,   0, -20,
   -20,   0,  12,  18,  18,  12,   0, -20,
   -20,  -5,  10,  12,  12,  10,  -5, -20,
   -30, -15,  -5,   0,   0,  -5, -15, -30,
   -40, -30, -20, -20, -20, -20, -30, -40,
];

#[rustfmt::skip]
const ROOK_MG: [i8; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  10,  10,  10,  10,  10,   5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
     0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const ROOK_EG: [i8; 64] = [
     5,   5,   5,   5,   5,   5,   5,   5,
    10,  10,  10,  10,  10,  10,  10,  10,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KING_MG: [i8; 64] = [
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -20, -30, -30, -40, -40, -30, -30, -20,
   -10, -20, -20, -20, -20, -20, -20, -10,
    20,  20,   0,   0,   0,   0,  20,  20,
    20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_EG: [i8; 64] = [
   -50, -40, -30, -20, -20, -30, -40, -50,
   -30, -20, -10,   0,   0, -10, -20, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -30,   0,   0,   0,   0, -30, -30,
   -50, -30, -30, -30, -30, -30, -30, -50,
];

#[rustfmt::skip]
const BISHOP: [i8; 64] = [
   -20, -10, -10, -10, -10, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,  10,  10,   5,   0, -10,
   -10,   5,   5,  10,  10,   5,   5, -10,
   -10,   0,  10,  10,  10,  10,   0, -10,
   -10,  10,  10,  10,  10,  10,  10, -10,
   -10,   5,   0,   0,   0,   0,   5, -10,
   -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const QUEEN: [i8; 64] = [
   -20, -10, -10,  -5,  -5, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,   5,   5,   5,   0, -10,
    -5,   0,   5,   5,   5,   5,   0,  -5,
     0,   0,   5,   5,   5,   5,   0,  -5,
   -10,   5,   5,   5,   5,   5,   0, -10,
   -10,   0,   5,   0,   0,   0,   0, -10,
   -20, -10, -10,  -5,  -5, -10, -10, -20,
];

/// The table index for a piece of `color` on `sq`: white squares are
/// mirrored vertically because the tables are written rank 8 first.
#[inline]
fn table_index(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq.flip_vertical().index() as usize,
        Color::Black => sq.index() as usize,
    }
}

/// Middlegame piece-square bonus, from the piece owner's perspective.
#[inline]
#[must_use]
pub fn pst_mg(kind: PieceKind, color: Color, sq: Square) -> i32 {
    let i = table_index(color, sq);
    i32::from(match kind {
        PieceKind::King => KING_MG[i],
        PieceKind::Queen => QUEEN[i],
        PieceKind::Rook => ROOK_MG[i],
        PieceKind::Bishop => BISHOP[i],
        PieceKind::Knight => KNIGHT_MG[i],
        PieceKind::Pawn => PAWN_MG[i],
    })
}

/// Endgame piece-square bonus; bishops and queens reuse their single
/// table.
#[inline]
#[must_use]
pub fn pst_eg(kind: PieceKind, color: Color, sq: Square) -> i32 {
    let i = table_index(color, sq);
    i32::from(match kind {
        PieceKind::King => KING_EG[i],
        PieceKind::Queen => QUEEN[i],
        PieceKind::Rook => ROOK_EG[i],
        PieceKind::Bishop => BISHOP[i],
        PieceKind::Knight => KNIGHT_EG[i],
        PieceKind::Pawn => PAWN_EG[i],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_mirrored_for_black() {
        let e2: Square = "e2".parse().unwrap();
        let e7: Square = "e7".parse().unwrap();
        assert_eq!(
            pst_mg(PieceKind::Pawn, Color::White, e2),
            pst_mg(PieceKind::Pawn, Color::Black, e7)
        );
        let g1: Square = "g1".parse().unwrap();
        let g8: Square = "g8".parse().unwrap();
        assert_eq!(
            pst_mg(PieceKind::King, Color::White, g1),
            pst_mg(PieceKind::King, Color::Black, g8)
        );
    }

    #[test]
    fn centre_beats_rim_for_knights() {
        let d4: Square = "d4".parse().unwrap();
        let a1: Square = "a1".parse().unwrap();
        assert!(pst_mg(PieceKind::Knight, Color::White, d4) > pst_mg(PieceKind::Knight, Color::White, a1));
    }

    #[test]
    fn king_hides_in_the_opening_and_centralises_late() {
        let g1: Square = "g1".parse().unwrap();
        let e4: Square = "e4".parse().unwrap();
        assert!(pst_mg(PieceKind::King, Color::White, g1) > pst_mg(PieceKind::King, Color::White, e4));
        assert!(pst_eg(PieceKind::King, Color::White, e4) > pst_eg(PieceKind::King, Color::White, g1));
    }
}
