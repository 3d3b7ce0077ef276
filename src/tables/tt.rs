//! The transposition table.

use crate::board::Move;
use crate::eval::score::{Score, MATE_BOUND};

use super::store::{Store, TableEntry};

/// How a stored score bounds the true value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bound {
    /// The score is exact (the search raised alpha and stayed below beta).
    Exact,
    /// A beta cutoff: the true score is at least this.
    FailHigh,
    /// Alpha was never raised: the true score is at most this.
    FailLow,
}

#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    key: u64,
    packed_move: u32,
    score: i16,
    /// Remaining depth in quarter-ply units.
    depth: i16,
    bound: Bound,
    generation: u8,
}

impl TtEntry {
    #[inline]
    #[must_use]
    pub fn depth(&self) -> i32 {
        i32::from(self.depth)
    }

    #[inline]
    #[must_use]
    pub fn bound(&self) -> Bound {
        self.bound
    }

    /// The stored score with the root distance re-applied: mate scores are
    /// stored relative to this node and shifted back by the probing ply.
    #[inline]
    #[must_use]
    pub fn score(&self, ply: i32) -> Score {
        let raw = Score::from(self.score);
        if raw > MATE_BOUND {
            raw - ply
        } else if raw < -MATE_BOUND {
            raw + ply
        } else {
            raw
        }
    }

    /// The stored best move; must pass `is_legal_soft` before use.
    #[inline]
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        Move::unpack(self.packed_move)
    }
}

impl TableEntry for TtEntry {
    #[inline]
    fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    fn generation(&self) -> u8 {
        self.generation
    }

    /// Old generations go first; within a generation, shallow entries and
    /// less informative bound types are the cheapest to lose.
    fn keep_priority(&self, current_generation: u8) -> i32 {
        let age = i32::from(current_generation.wrapping_sub(self.generation));
        let informativeness = match self.bound {
            Bound::Exact => 2,
            Bound::FailHigh | Bound::FailLow => 0,
        };
        i32::from(self.depth) + informativeness - age * 512
    }
}

pub struct TranspositionTable {
    store: Store<TtEntry>,
}

impl TranspositionTable {
    #[must_use]
    pub fn with_memory(megabytes: usize) -> Self {
        TranspositionTable {
            store: Store::with_memory(megabytes.max(1)),
        }
    }

    #[inline]
    #[must_use]
    pub fn probe(&self, key: u64) -> Option<&TtEntry> {
        self.store.probe(key)
    }

    /// Store a search result. `score` must already be adjusted to be
    /// relative to this node (mate distances minus the probing ply).
    pub fn store(
        &mut self,
        key: u64,
        depth: i32,
        score: Score,
        bound: Bound,
        best_move: Option<Move>,
        generation: u8,
    ) {
        debug_assert!(score.abs() <= i32::from(i16::MAX));
        self.store.insert(TtEntry {
            key,
            packed_move: best_move.map_or(0, Move::pack),
            score: score as i16,
            depth: depth as i16,
            bound,
            generation,
        });
    }

    pub fn evict_older_than(&mut self, current_generation: u8, max_age: u8) {
        self.store.evict_older_than(current_generation, max_age);
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    #[must_use]
    pub fn fill_per_mille(&self) -> u32 {
        self.store.fill_per_mille()
    }
}

/// Shift a score to node-relative form for storage: a mate `n` plies from
/// the root, seen at `ply`, is a mate `n - ply` plies from this node.
#[inline]
#[must_use]
pub fn score_to_tt(score: Score, ply: i32) -> Score {
    if score > MATE_BOUND {
        score + ply
    } else if score < -MATE_BOUND {
        score - ply
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Move, MoveKind, Piece, Square};
    use crate::eval::score::{mate_in, mated_in};

    fn sample_move() -> Move {
        Move::new(
            Square::new(4, 1),
            Square::new(4, 3),
            Piece::WhitePawn,
            Piece::None,
            MoveKind::Normal,
        )
    }

    #[test]
    fn round_trips_ordinary_scores() {
        let mut tt = TranspositionTable::with_memory(1);
        tt.store(99, 16, 123, Bound::Exact, Some(sample_move()), 0);
        let entry = tt.probe(99).unwrap();
        assert_eq!(entry.score(5), 123);
        assert_eq!(entry.depth(), 16);
        assert_eq!(entry.bound(), Bound::Exact);
        assert_eq!(entry.best_move(), Some(sample_move()));
    }

    #[test]
    fn mate_scores_rebase_on_probe() {
        let mut tt = TranspositionTable::with_memory(1);
        // a mate found 7 plies from the root, stored at ply 3
        let found = mate_in(7);
        tt.store(7, 20, score_to_tt(found, 3), Bound::Exact, None, 0);
        // probed from a node 5 plies deep, the same mate is 9 from that root
        let entry = tt.probe(7).unwrap();
        assert_eq!(entry.score(5), mate_in(9));
        // and from ply 3 it reads back exactly
        assert_eq!(entry.score(3), found);
    }

    #[test]
    fn mated_scores_rebase_symmetrically() {
        let mut tt = TranspositionTable::with_memory(1);
        let found = mated_in(6);
        tt.store(8, 20, score_to_tt(found, 2), Bound::FailLow, None, 0);
        assert_eq!(tt.probe(8).unwrap().score(2), found);
    }

    #[test]
    fn missing_move_is_none() {
        let mut tt = TranspositionTable::with_memory(1);
        tt.store(1, 4, 0, Bound::FailLow, None, 0);
        assert!(tt.probe(1).unwrap().best_move().is_none());
    }
}
