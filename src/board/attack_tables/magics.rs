//! Magic bitboard tables for sliding pieces.
//!
//! For every square we find a multiplier `M` and shift `S` such that
//! `((occupancy & mask) * M) >> S` perfectly indexes a per-square slice of
//! the attack table. The magics are discovered once at startup by seeded
//! random trial; after that the tables are immutable and shared freely.

use once_cell::sync::Lazy;
use rand::prelude::*;

use super::super::types::{Bitboard, Square};

/// Largest number of blocker permutations for one square: a rook in a
/// corner sees 12 relevant squares.
const MAX_BLOCKERS: usize = 4096;

/// Fixed seed so every process builds identical tables.
const MAGIC_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Per-square magic data: the relevant-occupancy mask, the multiplier, the
/// index shift and where in the flat attack table this square's slice
/// starts.
#[derive(Clone, Copy, Default)]
struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl MagicEntry {
    #[inline]
    fn index(&self, occupancy: Bitboard) -> usize {
        let blockers = occupancy.0 & self.mask;
        (blockers.wrapping_mul(self.magic) >> self.shift) as usize + self.offset
    }
}

/// One flat attack table plus the 64 magic entries indexing into it.
pub(crate) struct MagicTable {
    entries: [MagicEntry; 64],
    attacks: Vec<Bitboard>,
}

impl MagicTable {
    #[inline]
    pub(crate) fn attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let entry = &self.entries[sq.index() as usize];
        self.attacks[entry.index(occupancy)]
    }

    /// The relevant-occupancy mask for a square: every square whose
    /// occupancy can change the attack set, which excludes the origin and
    /// the non-blocking board edge.
    #[inline]
    pub(crate) fn relevant_mask(&self, sq: Square) -> Bitboard {
        Bitboard(self.entries[sq.index() as usize].mask)
    }
}

/// The four rook directions as (file, rank) steps.
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
/// The four bishop directions.
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub(crate) static ROOK_TABLE: Lazy<MagicTable> = Lazy::new(|| build_table(&ROOK_DIRECTIONS));
pub(crate) static BISHOP_TABLE: Lazy<MagicTable> = Lazy::new(|| build_table(&BISHOP_DIRECTIONS));

/// Walk the rays square by square; the reference attack generator the
/// tables are populated from (and validated against in tests).
pub(crate) fn sliding_attacks_slow(
    sq: Square,
    occupancy: Bitboard,
    directions: &[(i8, i8); 4],
) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(df, dr) in directions {
        let mut file = sq.file() as i8 + df;
        let mut rank = sq.rank() as i8 + dr;
        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let target = Square::new(file as u8, rank as u8);
            attacks |= Bitboard::from_square(target);
            if occupancy.is_set(target) {
                break;
            }
            file += df;
            rank += dr;
        }
    }
    attacks
}

/// The relevant occupancy mask: ray squares that can block, i.e. everything
/// up to but excluding the board edge in each direction.
fn relevant_mask(sq: Square, directions: &[(i8, i8); 4]) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    for &(df, dr) in directions {
        let mut file = sq.file() as i8 + df;
        let mut rank = sq.rank() as i8 + dr;
        // stop one short of the edge in the walked direction
        while (0..8).contains(&(file + df)) && (0..8).contains(&(rank + dr)) {
            mask |= Bitboard::from_square(Square::new(file as u8, rank as u8));
            file += df;
            rank += dr;
        }
    }
    mask
}

fn build_table(directions: &[(i8, i8); 4]) -> MagicTable {
    let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
    let mut entries = [MagicEntry::default(); 64];
    let mut attacks: Vec<Bitboard> = Vec::new();

    for sq in Square::all() {
        let mask = relevant_mask(sq, directions);
        let bits = mask.pop_count();
        let size = 1usize << bits;
        let shift = 64 - bits;

        // materialise every blocker permutation and its attack set
        let mut blockers = [Bitboard::EMPTY; MAX_BLOCKERS];
        let mut subset_attacks = [Bitboard::EMPTY; MAX_BLOCKERS];
        for (i, subset) in mask.subsets().enumerate() {
            blockers[i] = subset;
            subset_attacks[i] = sliding_attacks_slow(sq, subset, directions);
        }

        let magic = find_magic(&mut rng, &blockers[..size], &subset_attacks[..size], shift);

        let offset = attacks.len();
        attacks.resize(offset + size, Bitboard::EMPTY);
        for i in 0..size {
            let index = (blockers[i].0.wrapping_mul(magic) >> shift) as usize;
            attacks[offset + index] = subset_attacks[i];
        }

        entries[sq.index() as usize] = MagicEntry {
            mask: mask.0,
            magic,
            shift,
            offset,
        };
    }

    MagicTable { entries, attacks }
}

/// Try sparse random multipliers until one maps every blocker permutation
/// to a distinct index (or to the same attack set, which is a constructive
/// collision). The epoch array avoids re-clearing the scratch table per
/// candidate.
fn find_magic(
    rng: &mut StdRng,
    blockers: &[Bitboard],
    subset_attacks: &[Bitboard],
    shift: u32,
) -> u64 {
    let mut table = [Bitboard::EMPTY; MAX_BLOCKERS];
    let mut epoch = [0u32; MAX_BLOCKERS];
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        // roughly one bit in eight set
        let candidate: u64 = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();

        let mut ok = true;
        for (blocker, attack) in blockers.iter().zip(subset_attacks) {
            let index = (blocker.0.wrapping_mul(candidate) >> shift) as usize;
            if epoch[index] < attempt {
                epoch[index] = attempt;
                table[index] = *attack;
            } else if table[index] != *attack {
                ok = false;
                break;
            }
        }
        if ok {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_magic_matches_slow_generator() {
        for sq in [Square::A1, Square::E1, Square::from_index(28), Square::H8] {
            let mask = ROOK_TABLE.relevant_mask(sq);
            for occupancy in mask.subsets() {
                assert_eq!(
                    ROOK_TABLE.attacks(sq, occupancy),
                    sliding_attacks_slow(sq, occupancy, &ROOK_DIRECTIONS),
                    "rook on {sq} with blockers {occupancy:?}"
                );
            }
        }
    }

    #[test]
    fn bishop_magic_matches_slow_generator() {
        for sq in [Square::A1, Square::from_index(28), Square::from_index(35)] {
            let mask = BISHOP_TABLE.relevant_mask(sq);
            for occupancy in mask.subsets() {
                assert_eq!(
                    BISHOP_TABLE.attacks(sq, occupancy),
                    sliding_attacks_slow(sq, occupancy, &BISHOP_DIRECTIONS),
                    "bishop on {sq} with blockers {occupancy:?}"
                );
            }
        }
    }

    #[test]
    fn magic_ignores_irrelevant_occupancy() {
        // squares outside the relevant mask must not change the lookup
        let sq = Square::from_index(28);
        let mask = ROOK_TABLE.relevant_mask(sq);
        let noise = !mask & !Bitboard::from_square(sq);
        assert_eq!(
            ROOK_TABLE.attacks(sq, Bitboard::EMPTY),
            ROOK_TABLE.attacks(sq, noise)
        );
    }

    #[test]
    fn corner_rook_mask_has_twelve_bits() {
        assert_eq!(ROOK_TABLE.relevant_mask(Square::A1).pop_count(), 12);
        assert_eq!(BISHOP_TABLE.relevant_mask(Square::A1).pop_count(), 6);
    }
}
