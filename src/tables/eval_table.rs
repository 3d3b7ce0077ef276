//! The evaluation cache: final static scores keyed by the full position
//! Zobrist.

use crate::eval::score::Score;

use super::store::{Store, TableEntry};

#[derive(Clone, Copy, Debug)]
pub struct EvalEntry {
    key: u64,
    score: i16,
    generation: u8,
}

impl EvalEntry {
    #[inline]
    #[must_use]
    pub fn score(&self) -> Score {
        Score::from(self.score)
    }
}

impl TableEntry for EvalEntry {
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

pub struct EvalTable {
    store: Store<EvalEntry>,
}

impl EvalTable {
    #[must_use]
    pub fn with_memory(megabytes: usize) -> Self {
        EvalTable {
            store: Store::with_memory(megabytes.max(1)),
        }
    }

    #[inline]
    #[must_use]
    pub fn probe(&self, key: u64) -> Option<Score> {
        self.store.probe(key).map(EvalEntry::score)
    }

    pub fn store(&mut self, key: u64, score: Score, generation: u8) {
        debug_assert!(score.abs() <= i32::from(i16::MAX));
        self.store.insert(EvalEntry {
            key,
            score: score as i16,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_probes() {
        let mut table = EvalTable::with_memory(1);
        assert_eq!(table.probe(11), None);
        table.store(11, -77, 3);
        assert_eq!(table.probe(11), Some(-77));
    }
}
