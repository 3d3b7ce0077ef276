//! Board tests, split by concern:
//! - `fen.rs` - FEN and move-notation parsing
//! - `make_unmake.rs` - make/unmake round trips and incremental state
//! - `movegen.rs` - generator correctness against a naive reference
//! - `perft.rs` - reference node counts
//! - `draw.rs` - repetition, fifty-move and material draws
//! - `proptest.rs` - randomised properties

mod movegen;
