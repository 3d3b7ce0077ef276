//! Pawn-structure evaluation.
//!
//! Everything here depends only on pawn and king placement, so results are
//! cached in the pawn table under the pawn-structure key. Scores are from
//! white's perspective; the caller interpolates mg/eg.

use crate::board::attack_tables::pawn_attacks;
use crate::board::{Bitboard, Color, PieceKind, Position, Square};
use crate::tables::PawnTable;

/// Bonus for a passed pawn by its relative rank (rank 1 and 8 unused).
const PASSED_BONUS_MG: [i32; 8] = [0, 5, 10, 20, 35, 60, 100, 0];
const PASSED_BONUS_EG: [i32; 8] = [0, 10, 20, 35, 60, 100, 160, 0];

const ISOLATED_PENALTY_MG: i32 = 12;
const ISOLATED_PENALTY_EG: i32 = 18;
const BACKWARD_PENALTY_MG: i32 = 8;
const BACKWARD_PENALTY_EG: i32 = 12;
const BLOCKED_PENALTY_MG: i32 = 6;
const BLOCKED_PENALTY_EG: i32 = 10;
const DOUBLED_PENALTY_MG: i32 = 10;
const DOUBLED_PENALTY_EG: i32 = 16;

/// Shield pawns directly in front of the king, by distance.
const SHIELD_BONUS: [i32; 3] = [18, 10, 4];
/// Enemy pawns storming the king's files, by how close they have come.
const STORM_PENALTY: [i32; 8] = [0, 0, 28, 18, 10, 4, 0, 0];

/// The computed structure terms plus derived passed-pawn sets.
pub struct PawnStructure {
    pub mg: i32,
    pub eg: i32,
    pub passers: [Bitboard; 2],
}

/// Evaluate (or fetch) the pawn structure for this position.
pub fn pawn_structure(pos: &Position, table: &mut PawnTable, generation: u8) -> PawnStructure {
    if let Some(entry) = table.probe(pos.pawn_key()) {
        return PawnStructure {
            mg: entry.mg(),
            eg: entry.eg(),
            passers: entry.passers(),
        };
    }

    let mut mg = 0;
    let mut eg = 0;
    let mut passers = [Bitboard::EMPTY; 2];

    for color in [Color::White, Color::Black] {
        let sign = if color.is_white() { 1 } else { -1 };
        let (structure_mg, structure_eg, side_passers) = evaluate_side(pos, color);
        mg += sign * structure_mg;
        eg += sign * structure_eg;
        passers[color.index()] = side_passers;

        let (shelter_mg, shelter_eg) = king_shelter(pos, color);
        mg += sign * shelter_mg;
        eg += sign * shelter_eg;
    }

    table.store(pos.pawn_key(), mg, eg, passers, generation);
    PawnStructure { mg, eg, passers }
}

fn evaluate_side(pos: &Position, color: Color) -> (i32, i32, Bitboard) {
    let us_pawns = pos.piece_bb(color, PieceKind::Pawn);
    let them_pawns = pos.piece_bb(color.opponent(), PieceKind::Pawn);
    let mut mg = 0;
    let mut eg = 0;
    let mut passers = Bitboard::EMPTY;

    for sq in us_pawns.squares() {
        let file = sq.file();
        let relative_rank = relative_rank(color, sq);

        if (passed_mask(color, sq) & them_pawns).is_empty() {
            passers |= Bitboard::from_square(sq);
            mg += PASSED_BONUS_MG[relative_rank as usize];
            eg += PASSED_BONUS_EG[relative_rank as usize];
        }

        let neighbours = adjacent_files(file) & us_pawns;
        if neighbours.is_empty() {
            mg -= ISOLATED_PENALTY_MG;
            eg -= ISOLATED_PENALTY_EG;
        } else if is_backward(color, sq, us_pawns, them_pawns) {
            mg -= BACKWARD_PENALTY_MG;
            eg -= BACKWARD_PENALTY_EG;
        }

        // a pawn stopped dead by an enemy pawn on its front square
        let stop = front_square(color, sq);
        if them_pawns.is_set(stop) {
            mg -= BLOCKED_PENALTY_MG;
            eg -= BLOCKED_PENALTY_EG;
        }

        // doubled: another friendly pawn ahead on the same file
        if !(front_span(color, sq) & us_pawns).is_empty() {
            mg -= DOUBLED_PENALTY_MG;
            eg -= DOUBLED_PENALTY_EG;
        }
    }

    (mg, eg, passers)
}

/// A backward pawn: its neighbours have all advanced past it, and its stop
/// square is covered by an enemy pawn, so it cannot safely catch up.
fn is_backward(color: Color, sq: Square, us_pawns: Bitboard, them_pawns: Bitboard) -> bool {
    let support = adjacent_files(sq.file()) & us_pawns & !front_only(color, sq.rank());
    if !support.is_empty() {
        return false;
    }
    // an enemy pawn covering the stop square attacks it "as" our colour
    let stop = front_square(color, sq);
    !(pawn_attacks(color, stop) & them_pawns).is_empty()
}

/// Pawn shield and storm around the king.
fn king_shelter(pos: &Position, color: Color) -> (i32, i32) {
    let ksq = pos.king_square(color);
    let us_pawns = pos.piece_bb(color, PieceKind::Pawn);
    let them_pawns = pos.piece_bb(color.opponent(), PieceKind::Pawn);
    let files = adjacent_files(ksq.file()) | Bitboard::file(ksq.file());

    let mut mg = 0;

    // shield: own pawns on the king's files, at most three ranks ahead
    for sq in (files & us_pawns).squares() {
        let ahead = rank_distance_ahead(color, ksq, sq);
        if (1..=3).contains(&ahead) {
            mg += SHIELD_BONUS[(ahead - 1) as usize];
        }
    }

    // storm: enemy pawns marching down those files
    for sq in (files & them_pawns).squares() {
        let distance = ksq.rank().abs_diff(sq.rank()) as usize;
        if distance < STORM_PENALTY.len() {
            mg -= STORM_PENALTY[distance];
        }
    }

    // shelter is a middlegame concern
    (mg, 0)
}

#[inline]
fn relative_rank(color: Color, sq: Square) -> u8 {
    match color {
        Color::White => sq.rank(),
        Color::Black => 7 - sq.rank(),
    }
}

/// How many ranks ahead of the king (in the king's forward direction) a
/// square lies, or 0 if level/behind/too far.
#[inline]
fn rank_distance_ahead(color: Color, ksq: Square, sq: Square) -> i32 {
    match color {
        Color::White => i32::from(sq.rank()) - i32::from(ksq.rank()),
        Color::Black => i32::from(ksq.rank()) - i32::from(sq.rank()),
    }
}

#[inline]
fn adjacent_files(file: u8) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    if file > 0 {
        mask |= Bitboard::file(file - 1);
    }
    if file < 7 {
        mask |= Bitboard::file(file + 1);
    }
    mask
}

/// All squares strictly ahead of `rank` from `color`'s point of view.
#[inline]
fn front_only(color: Color, rank: u8) -> Bitboard {
    match color {
        Color::White => Bitboard(u64::MAX.checked_shl((u32::from(rank) + 1) * 8).unwrap_or(0)),
        Color::Black => Bitboard(u64::MAX.checked_shr((8 - u32::from(rank)) * 8).unwrap_or(0)),
    }
}

/// The squares ahead of a pawn on its own file.
#[inline]
fn front_span(color: Color, sq: Square) -> Bitboard {
    Bitboard::file(sq.file()) & front_only(color, sq.rank())
}

/// The pawn's stop square.
#[inline]
fn front_square(color: Color, sq: Square) -> Square {
    sq.offset(color.pawn_push())
}

/// Front span plus both adjacent front spans: the mask an enemy pawn must
/// be absent from for this pawn to be passed.
#[inline]
fn passed_mask(color: Color, sq: Square) -> Bitboard {
    (Bitboard::file(sq.file()) | adjacent_files(sq.file())) & front_only(color, sq.rank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::PawnTable;

    fn structure(fen: &str) -> PawnStructure {
        let pos: Position = fen.parse().unwrap();
        let mut table = PawnTable::with_memory(1);
        pawn_structure(&pos, &mut table, 0)
    }

    #[test]
    fn lone_passed_pawn_is_recognised() {
        let s = structure("4k3/8/8/8/3P4/8/8/4K3 w - - 0 1");
        let d4: Square = "d4".parse().unwrap();
        assert!(s.passers[Color::White.index()].is_set(d4));
        assert!(s.passers[Color::Black.index()].is_empty());
        assert!(s.eg > 0);
    }

    #[test]
    fn opposed_pawn_is_not_passed() {
        let s = structure("4k3/3p4/8/8/3P4/8/8/4K3 w - - 0 1");
        assert!(s.passers[Color::White.index()].is_empty());
        assert!(s.passers[Color::Black.index()].is_empty());
    }

    #[test]
    fn enemy_pawn_on_adjacent_file_blocks_passage() {
        let s = structure("4k3/4p3/8/8/3P4/8/8/4K3 w - - 0 1");
        assert!(s.passers[Color::White.index()].is_empty());
    }

    #[test]
    fn isolated_pawn_scores_worse_than_supported() {
        // same material: an isolated d-pawn vs connected d+e pawns
        let isolated = structure("4k3/8/8/8/3P4/8/8/4K3 w - - 0 1");
        let connected = structure("4k3/8/8/8/3PP3/8/8/4K3 w - - 0 1");
        // per-pawn comparison: connected pair should not be isolated
        assert!(connected.mg > isolated.mg);
    }

    #[test]
    fn structure_is_colour_antisymmetric() {
        let white = structure("4k3/8/8/8/3P4/8/8/4K3 w - - 0 1");
        let black = structure("4k3/8/8/3p4/8/8/8/4K3 b - - 0 1");
        assert_eq!(white.mg, -black.mg);
        assert_eq!(white.eg, -black.eg);
    }

    #[test]
    fn cache_round_trips() {
        let pos: Position = "4k3/pppppppp/8/8/8/8/PPPPPPPP/4K3 w - - 0 1".parse().unwrap();
        let mut table = PawnTable::with_memory(1);
        let first = pawn_structure(&pos, &mut table, 0);
        let second = pawn_structure(&pos, &mut table, 0);
        assert_eq!(first.mg, second.mg);
        assert_eq!(first.eg, second.eg);
        assert_eq!(first.passers, second.passers);
    }
}
