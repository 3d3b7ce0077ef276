//! Iterative-deepening principal variation search.
//!
//! The driver deepens one nominal ply at a time inside aspiration windows
//! widened geometrically on failure, publishes a report to the subscriber
//! after every completed depth (and at bounded node intervals within one),
//! and extracts the principal variation from the transposition table. The
//! recursion itself lives in `alpha_beta` and `quiescence`.

mod alpha_beta;
mod ordering;
mod params;
mod quiescence;

pub use ordering::{KillerTable, MovePicker, MoveOrigin, RelativeHistory};
pub use params::SearchParams;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::board::{attack_tables, Move, MoveList, Position};
use crate::eval::score::{
    is_mate_score, mate_distance, Score, CHECKMATE, INFINITY, STALEMATE,
};
use crate::tables::{Bound, TableSet};

/// Search depth in quarter-ply units; fractional extensions stay integral.
pub type Depth = i32;

/// One nominal ply.
pub const ONE_PLY: Depth = 4;

/// Hard bound on the search stack.
pub const MAX_PLY: usize = 128;

/// Quarter-ply extension when the node is in check.
pub(crate) const CHECK_EXTENSION: Depth = 1;
/// Half-ply extension for recaptures on the square just captured on.
pub(crate) const RECAPTURE_EXTENSION: Depth = 2;
/// Half-ply extension when the null-move search detects a mate threat.
pub(crate) const MATE_THREAT_EXTENSION: Depth = 2;

/// Default hash budget in megabytes, split across the three tables.
pub const DEFAULT_TABLE_MB: usize = 64;

/// Publish an interval report roughly this often, in nodes.
const REPORT_INTERVAL_NODES: u64 = 1 << 20;

/// Check the deadline once per this many nodes.
const DEADLINE_STRIDE: u64 = 1024;

/// A deadline the host may adjust while the search runs.
pub struct SearchClock {
    deadline: Mutex<Option<Instant>>,
}

impl SearchClock {
    #[must_use]
    pub fn unbounded() -> Self {
        SearchClock {
            deadline: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn until(deadline: Instant) -> Self {
        SearchClock {
            deadline: Mutex::new(Some(deadline)),
        }
    }

    pub fn set_deadline(&self, deadline: Option<Instant>) {
        *self.deadline.lock() = deadline;
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        *self.deadline.lock()
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.deadline().is_some_and(|d| Instant::now() >= d)
    }
}

/// What bounds a search: deadline, nominal depth, node budget, and an
/// optional restriction of the root move set.
pub struct SearchLimits {
    pub clock: Arc<SearchClock>,
    /// Maximum nominal depth in whole plies.
    pub max_depth: u8,
    /// Node budget; 0 means unlimited.
    pub max_nodes: u64,
    /// Only consider these root moves when present.
    pub root_moves: Option<Vec<Move>>,
}

impl SearchLimits {
    /// Depth-limited search with no clock.
    #[must_use]
    pub fn depth(max_depth: u8) -> Self {
        SearchLimits {
            clock: Arc::new(SearchClock::unbounded()),
            max_depth,
            max_nodes: 0,
            root_moves: None,
        }
    }

    /// Search until the deadline, depth-capped only by the ply bound.
    #[must_use]
    pub fn until(deadline: Instant) -> Self {
        SearchLimits {
            clock: Arc::new(SearchClock::until(deadline)),
            max_depth: MAX_PLY as u8,
            max_nodes: 0,
            root_moves: None,
        }
    }

    #[must_use]
    pub fn with_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    #[must_use]
    pub fn with_root_moves(mut self, moves: Vec<Move>) -> Self {
        self.root_moves = Some(moves);
        self
    }
}

/// Long-lived search state: the hash tables and heuristics that persist
/// between searches of one game.
pub struct SearchState {
    pub tables: TableSet,
    pub killers: KillerTable,
    pub history: RelativeHistory,
    pub params: SearchParams,
}

impl SearchState {
    #[must_use]
    pub fn new(table_megabytes: usize) -> Self {
        SearchState {
            tables: TableSet::with_memory(table_megabytes),
            killers: KillerTable::new(),
            history: RelativeHistory::new(),
            params: SearchParams::default(),
        }
    }

    /// Prepare for a new root search: next hash generation, fresh killers,
    /// decayed history.
    pub fn new_search(&mut self) {
        self.tables.new_generation();
        self.killers.clear();
        self.history.decay();
    }

    /// Transposition-table fill factor in permille.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        self.tables.tt.fill_per_mille()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TABLE_MB)
    }
}

/// A status snapshot published to the subscriber.
#[derive(Clone, Debug)]
pub struct SearchReport {
    /// Completed (or current) nominal depth.
    pub depth: u8,
    /// Deepest ply reached including quiescence.
    pub seldepth: u8,
    pub nodes: u64,
    /// Score in centipawns (or a mate score) from the engine's side.
    pub score: Score,
    /// How the score bounds the true value.
    pub bound: Bound,
    /// Signed moves-to-mate when the score is a mate score.
    pub mate_in: Option<i32>,
    pub pv: Vec<Move>,
    pub best_move: Option<Move>,
    pub elapsed: Duration,
    /// True for the bounded-interval updates inside a depth.
    pub provisional: bool,
}

/// Subscriber invoked after every completed depth and at bounded
/// intervals during one.
pub type SearchObserver = Arc<dyn Fn(&SearchReport) + Send + Sync>;

/// The final result of a search.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    pub score: Score,
    pub pv: Vec<Move>,
    /// Deepest fully completed nominal depth.
    pub depth: u8,
    pub seldepth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
}

pub(crate) struct SearchContext<'a> {
    pub pos: &'a mut Position,
    pub state: &'a mut SearchState,
    pub stop: &'a AtomicBool,
    pub limits: &'a SearchLimits,
    pub observer: Option<&'a SearchObserver>,
    pub start: Instant,
    pub nodes: u64,
    pub seldepth: u8,
    pub tt_hits: u64,
    pub stopped: bool,
    pub next_report_at: u64,
    /// Last fully completed depth and its score, for interval reports.
    pub completed: (u8, Score),
}

impl SearchContext<'_> {
    /// Poll cancellation. Cheap checks every node; the clock only on a
    /// stride. Once true, the whole recursion unwinds without storing.
    #[inline]
    pub(crate) fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.stop.load(Ordering::Relaxed) {
            self.stopped = true;
            return true;
        }
        if self.limits.max_nodes > 0 && self.nodes >= self.limits.max_nodes {
            self.stopped = true;
            return true;
        }
        if self.nodes % DEADLINE_STRIDE == 0 && self.limits.clock.expired() {
            self.stopped = true;
            return true;
        }
        false
    }

    #[inline]
    pub(crate) fn visit_node(&mut self, ply: usize) {
        self.nodes += 1;
        if ply as u8 > self.seldepth {
            self.seldepth = ply as u8;
        }
        if self.observer.is_some() && self.nodes >= self.next_report_at {
            self.next_report_at = self.nodes + REPORT_INTERVAL_NODES;
            self.publish_interval_report();
        }
    }

    fn publish_interval_report(&mut self) {
        let (depth, score) = self.completed;
        let report = SearchReport {
            depth,
            seldepth: self.seldepth,
            nodes: self.nodes,
            score,
            bound: Bound::Exact,
            mate_in: mate_distance(score),
            pv: Vec::new(),
            best_move: None,
            elapsed: self.start.elapsed(),
            provisional: true,
        };
        if let Some(observer) = self.observer {
            observer(&report);
        }
    }

    /// Walk transposition-table best moves from the current position to
    /// recover the principal variation, stopping on a missing or stale
    /// move and on repetition.
    pub(crate) fn extract_pv(&mut self, max_len: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_len);
        while pv.len() < max_len {
            let Some(entry) = self.state.tables.tt.probe(self.pos.key()) else {
                break;
            };
            let Some(mv) = entry.best_move() else {
                break;
            };
            if !self.pos.is_legal_soft(mv) {
                break;
            }
            self.pos.make_move(mv);
            pv.push(mv);
            if self.pos.has_repeated(2) {
                break;
            }
        }
        for _ in 0..pv.len() {
            self.pos.unmake_move();
        }
        pv
    }
}

/// Run an iterative-deepening search on `pos` within `limits`.
///
/// `stop` may be raised from another thread at any time; the search then
/// unwinds and returns the best result of the last completed iteration.
/// The observer, when present, receives a report per completed depth and
/// bounded-interval updates within a depth.
pub fn search(
    pos: &mut Position,
    state: &mut SearchState,
    limits: &SearchLimits,
    stop: &AtomicBool,
    observer: Option<SearchObserver>,
) -> SearchOutcome {
    attack_tables::warm_up();
    state.new_search();
    let start = Instant::now();

    // the root move set, optionally restricted by the caller
    let mut all = MoveList::new();
    pos.generate_moves(&mut all);
    let mut root_moves: Vec<Move> = match &limits.root_moves {
        Some(allowed) => all.iter().copied().filter(|m| allowed.contains(m)).collect(),
        None => all.iter().copied().collect(),
    };

    if root_moves.is_empty() {
        let score = if pos.in_check() { CHECKMATE } else { STALEMATE };
        return SearchOutcome {
            best_move: None,
            score,
            pv: Vec::new(),
            depth: 0,
            seldepth: 0,
            nodes: 0,
            elapsed: start.elapsed(),
        };
    }

    let observer_ref = observer.as_ref();
    let mut ctx = SearchContext {
        pos,
        state,
        stop,
        limits,
        observer: observer_ref,
        start,
        nodes: 0,
        seldepth: 0,
        tt_hits: 0,
        stopped: false,
        next_report_at: REPORT_INTERVAL_NODES,
        completed: (0, 0),
    };

    let mut best_move = root_moves[0];
    let mut best_score: Score = 0;
    let mut pv: Vec<Move> = Vec::new();
    let mut completed_depth = 0u8;
    let delta = ctx.state.params.aspiration_delta;
    let widenings = [delta, 2 * delta, 5 * delta, INFINITY];

    for depth in 1..=limits.max_depth.min(MAX_PLY as u8 - 1) {
        let nominal = Depth::from(depth) * ONE_PLY;
        let mut low = 0usize;
        let mut high = 0usize;
        let mut iteration_best = best_move;
        let mut score;

        loop {
            // aspiration window around the previous score, wide open on
            // the first iteration
            let (alpha, beta) = if depth == 1 {
                (-INFINITY, INFINITY)
            } else {
                (
                    best_score.saturating_sub(widenings[low]).max(-INFINITY),
                    best_score.saturating_add(widenings[high]).min(INFINITY),
                )
            };

            score = ctx.root_search(nominal, alpha, beta, &mut root_moves, &mut iteration_best);
            if ctx.stopped {
                break;
            }
            if score <= alpha && low < widenings.len() - 1 {
                low += 1;
                log::trace!("depth {depth}: fail low at {score}, widening to stage {low}");
            } else if score >= beta && high < widenings.len() - 1 {
                high += 1;
                log::trace!("depth {depth}: fail high at {score}, widening to stage {high}");
            } else {
                break;
            }
        }

        if ctx.stopped {
            break;
        }

        best_score = score;
        best_move = iteration_best;
        completed_depth = depth;
        ctx.completed = (depth, score);
        pv = ctx.extract_pv(usize::from(depth).max(1));
        if pv.first() != Some(&best_move) {
            // hash replacement can lose the root entry; the searched best
            // move is authoritative
            pv.clear();
            pv.push(best_move);
        }

        let report = SearchReport {
            depth,
            seldepth: ctx.seldepth,
            nodes: ctx.nodes,
            score: best_score,
            bound: Bound::Exact,
            mate_in: mate_distance(best_score),
            pv: pv.clone(),
            best_move: Some(best_move),
            elapsed: ctx.start.elapsed(),
            provisional: false,
        };
        log::debug!(
            "depth {} score {} nodes {} tt_hits {} pv {}",
            depth,
            best_score,
            ctx.nodes,
            ctx.tt_hits,
            report.pv.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
        );
        if let Some(observer) = ctx.observer {
            observer(&report);
        }

        // no point deepening past a forced mate we can already see
        if is_mate_score(best_score) && usize::from(depth) >= pv.len() + 2 {
            break;
        }
    }

    let nodes = ctx.nodes;
    let seldepth = ctx.seldepth;
    SearchOutcome {
        best_move: Some(best_move),
        score: best_score,
        pv,
        depth: completed_depth,
        seldepth,
        nodes,
        elapsed: start.elapsed(),
    }
}
