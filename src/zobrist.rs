//! Zobrist hashing.
//!
//! One key per (piece, square), one per side-to-move, one per en-passant
//! file, and one per castling-rights state per side. The same piece-square
//! keys, restricted to pawns and kings, form the pawn-structure key that
//! indexes the pawn hash table.

use rand::prelude::*;
use std::sync::LazyLock;

use crate::board::{CastlingRights, Color, Piece, Square, PIECE_COUNT};

pub struct ZobristKeys {
    /// `piece_square[piece ordinal][square]`; the `Piece::None` row stays
    /// zero so XOR-ing an empty square is a no-op.
    piece_square: [[u64; 64]; PIECE_COUNT],
    /// `castling[color][rights ordinal]`; the `None` state hashes to zero.
    castling: [[u64; 4]; 2],
    /// `en_passant[file]`.
    en_passant: [u64; 8],
    side_to_move: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        // fixed seed for reproducible keys across runs
        let mut rng = StdRng::seed_from_u64(0x0DD5_EED5_0F0C_CCA7);

        let mut piece_square = [[0u64; 64]; PIECE_COUNT];
        for row in piece_square.iter_mut().skip(1) {
            for key in row.iter_mut() {
                *key = rng.gen();
            }
        }

        let mut castling = [[0u64; 4]; 2];
        for side in &mut castling {
            for key in side.iter_mut().skip(1) {
                *key = rng.gen();
            }
        }

        let mut en_passant = [0u64; 8];
        for key in &mut en_passant {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_square,
            castling,
            en_passant,
            side_to_move: rng.gen(),
        }
    }

    #[inline]
    #[must_use]
    pub fn piece_square(&self, piece: Piece, sq: Square) -> u64 {
        self.piece_square[piece.index()][sq.index() as usize]
    }

    #[inline]
    #[must_use]
    pub fn castling(&self, color: Color, rights: CastlingRights) -> u64 {
        self.castling[color.index()][rights.index()]
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self, file: u8) -> u64 {
        self.en_passant[file as usize]
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> u64 {
        self.side_to_move
    }
}

pub static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_piece_hashes_to_zero() {
        for sq in Square::all() {
            assert_eq!(ZOBRIST.piece_square(Piece::None, sq), 0);
        }
        assert_eq!(ZOBRIST.castling(Color::White, CastlingRights::None), 0);
        assert_eq!(ZOBRIST.castling(Color::Black, CastlingRights::None), 0);
    }

    #[test]
    fn keys_are_distinct() {
        // a collision here would be a seed catastrophe, not bad luck
        let mut seen = std::collections::HashSet::new();
        for piece in Piece::ALL {
            for sq in Square::all() {
                assert!(seen.insert(ZOBRIST.piece_square(piece, sq)));
            }
        }
        assert!(seen.insert(ZOBRIST.side_to_move()));
        for file in 0..8 {
            assert!(seen.insert(ZOBRIST.en_passant(file)));
        }
    }
}
