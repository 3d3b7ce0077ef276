//! Perft: the move-generator validation driver.

use super::types::{Move, MoveList};
use super::Position;

impl Position {
    /// Count leaf nodes of the legal move tree to the given depth.
    #[must_use]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut moves = MoveList::new();
        self.generate_moves(&mut moves);
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for &m in &moves {
            self.make_move(m);
            nodes += self.perft(depth - 1);
            self.unmake_move();
        }
        nodes
    }

    /// Per-root-move leaf counts, for diffing against a reference engine.
    #[must_use]
    pub fn perft_divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        let mut moves = MoveList::new();
        self.generate_moves(&mut moves);
        let mut counts = Vec::with_capacity(moves.len());
        for &m in &moves {
            self.make_move(m);
            let nodes = if depth > 1 { self.perft(depth - 1) } else { 1 };
            self.unmake_move();
            counts.push((m, nodes));
        }
        counts.sort_by_key(|(m, _)| (m.from(), m.to()));
        counts
    }
}
