//! The pawn-structure cache.
//!
//! Keyed by the pawn-and-king Zobrist, so entries survive across the many
//! positions that share a pawn skeleton. Stores the middlegame and endgame
//! structure scores (white's perspective) plus the derived passed-pawn
//! sets, which the evaluator reuses for other terms.

use crate::board::Bitboard;

use super::store::{Store, TableEntry};

#[derive(Clone, Copy, Debug)]
pub struct PawnEntry {
    key: u64,
    mg: i16,
    eg: i16,
    passers: [Bitboard; 2],
    generation: u8,
}

impl PawnEntry {
    /// Middlegame structure score, white's perspective.
    #[inline]
    #[must_use]
    pub fn mg(&self) -> i32 {
        i32::from(self.mg)
    }

    /// Endgame structure score, white's perspective.
    #[inline]
    #[must_use]
    pub fn eg(&self) -> i32 {
        i32::from(self.eg)
    }

    /// Passed pawns per colour.
    #[inline]
    #[must_use]
    pub fn passers(&self) -> [Bitboard; 2] {
        self.passers
    }
}

impl TableEntry for PawnEntry {
    #[inline]
    fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    fn generation(&self) -> u8 {
        self.generation
    }

    fn keep_priority(&self, current_generation: u8) -> i32 {
        -i32::from(current_generation.wrapping_sub(self.generation))
    }
}

pub struct PawnTable {
    store: Store<PawnEntry>,
}

impl PawnTable {
    #[must_use]
    pub fn with_memory(megabytes: usize) -> Self {
        PawnTable {
            store: Store::with_memory(megabytes.max(1)),
        }
    }

    #[inline]
    #[must_use]
    pub fn probe(&self, key: u64) -> Option<&PawnEntry> {
        self.store.probe(key)
    }

    pub fn store(
        &mut self,
        key: u64,
        mg: i32,
        eg: i32,
        passers: [Bitboard; 2],
        generation: u8,
    ) {
        self.store.insert(PawnEntry {
            key,
            mg: mg as i16,
            eg: eg as i16,
            passers,
            generation,
        });
    }

    pub fn evict_older_than(&mut self, current_generation: u8, max_age: u8) {
        self.store.evict_older_than(current_generation, max_age);
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }
}
