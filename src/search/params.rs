//! Tunable search parameters.
//!
//! Depths are in quarter-ply units (`ONE_PLY` = 4). The defaults are the
//! played set; the tuning harness swaps whole blocks in and out, which is
//! why the struct is plain data and optionally serde-serializable.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::eval::score::Score;

use super::Depth;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchParams {
    /// Half-width of the first aspiration window.
    pub aspiration_delta: Score,
    /// Minimum remaining depth for a null-move try.
    pub null_min_depth: Depth,
    /// Base null-move reduction; deep nodes reduce one ply more per six.
    pub null_base_reduction: Depth,
    /// Minimum remaining depth for internal iterative deepening.
    pub iid_min_depth: Depth,
    /// IID searches this much shallower, which guarantees termination.
    pub iid_reduction: Depth,
    /// Futility margins indexed by remaining whole plies (0 unused).
    pub futility_margins: [Score; 4],
    /// Razoring margin at pre-frontier depth.
    pub razor_margin: Score,
    /// Minimum remaining depth before late moves are reduced.
    pub lmr_min_depth: Depth,
    /// Quiet moves tried at full depth before reductions start.
    pub lmr_move_threshold: usize,
    /// Beyond this many moves the reduction deepens by another ply.
    pub lmr_extra_threshold: usize,
    /// Quiescence delta-pruning margin.
    pub delta_margin: Score,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            aspiration_delta: 30,
            null_min_depth: 8,
            null_base_reduction: 12,
            iid_min_depth: 20,
            iid_reduction: 8,
            futility_margins: [0, 130, 250, 420],
            razor_margin: 300,
            lmr_min_depth: 12,
            lmr_move_threshold: 3,
            lmr_extra_threshold: 12,
            delta_margin: 200,
        }
    }
}
