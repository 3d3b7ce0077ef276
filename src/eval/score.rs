//! Score conventions shared by evaluation and search.
//!
//! Centipawns from the side-to-move's perspective. Mate scores encode the
//! distance in plies from the root so "mate in three" beats "mate in
//! five"; the transposition table strips and re-adds that distance so an
//! entry written at one depth stays correct when re-encountered at
//! another.

/// Centipawns from the perspective of the side to move.
pub type Score = i32;

/// Larger than any reachable score; the open search window.
pub const INFINITY: Score = 32_000;

/// Magnitude of a mate at the root.
pub const MATE: Score = 31_000;

/// Scores beyond this are mate scores and carry a ply distance.
pub const MATE_BOUND: Score = 30_000;

/// Being checkmated here and now.
pub const CHECKMATE: Score = -MATE;

/// Stalemate is a draw.
pub const STALEMATE: Score = 0;

/// Threefold repetition or the fifty-move rule.
pub const DRAW_CLAIMED: Score = 0;

/// The score for being mated `ply` plies from the root.
#[inline]
#[must_use]
pub const fn mated_in(ply: i32) -> Score {
    CHECKMATE + ply
}

/// The score for delivering mate `ply` plies from the root.
#[inline]
#[must_use]
pub const fn mate_in(ply: i32) -> Score {
    MATE - ply
}

/// Whether a score encodes a forced mate either way.
#[inline]
#[must_use]
pub const fn is_mate_score(score: Score) -> bool {
    score > MATE_BOUND || score < -MATE_BOUND
}

/// Signed full moves until mate, when `score` is a mate score: positive
/// when the side to move mates, negative when it is mated.
#[must_use]
pub fn mate_distance(score: Score) -> Option<i32> {
    if score > MATE_BOUND {
        Some((MATE - score + 1) / 2)
    } else if score < -MATE_BOUND {
        Some(-((MATE + score + 1) / 2))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_scores_order_by_distance() {
        assert!(mate_in(3) > mate_in(5));
        assert!(mated_in(3) < mated_in(5));
        assert!(mate_in(40) > MATE_BOUND);
        assert!(!is_mate_score(2500));
        assert!(is_mate_score(mate_in(1)));
        assert!(is_mate_score(mated_in(1)));
    }

    #[test]
    fn mate_distance_in_moves() {
        assert_eq!(mate_distance(mate_in(1)), Some(1));
        assert_eq!(mate_distance(mate_in(5)), Some(3));
        assert_eq!(mate_distance(mated_in(2)), Some(-1));
        assert_eq!(mate_distance(150), None);
    }
}
