//! Board representation and rules: bitboards, attack tables, the position
//! with make/unmake, legal move generation, SEE and perft.
//!
//! # Example
//! ```
//! use skewer::board::{MoveList, Position};
//!
//! let pos = Position::new_initial();
//! let mut moves = MoveList::new();
//! pos.generate_moves(&mut moves);
//! assert_eq!(moves.len(), 20);
//! ```

pub mod attack_tables;
mod error;
mod fen;
mod make_unmake;
mod movegen;
mod perft;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{ChessParseError, EngineError};
pub use see::piece_value;
pub use state::{NullUnmake, Position, MAX_GAME_PLIES};
pub use types::{
    Bitboard, CastlingRights, Color, Move, MoveKind, MoveList, Piece, PieceKind, ScoredMove,
    ScoredMoveList, Square, PIECE_COUNT, PROMOTION_KINDS,
};
