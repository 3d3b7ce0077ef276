//! The principal variation search recursion.

use crate::board::{Move, MoveList};
use crate::eval::score::{
    is_mate_score, mate_in, mated_in, Score, DRAW_CLAIMED, INFINITY, MATE_BOUND, STALEMATE,
};
use crate::eval::{evaluate, has_non_pawn_material};
use crate::tables::{score_to_tt, Bound};

use super::ordering::{MoveOrigin, MovePicker};
use super::{
    Depth, SearchContext, CHECK_EXTENSION, MATE_THREAT_EXTENSION, MAX_PLY, ONE_PLY,
    RECAPTURE_EXTENSION,
};

impl SearchContext<'_> {
    /// Search the root move list. Like an interior PV node, but tracks the
    /// best root move and never prunes a root move away.
    pub(crate) fn root_search(
        &mut self,
        depth: Depth,
        mut alpha: Score,
        beta: Score,
        root_moves: &mut [Move],
        best_move: &mut Move,
    ) -> Score {
        debug_assert!(!root_moves.is_empty());

        // keep the previous iteration's best move in front
        if let Some(i) = root_moves.iter().position(|m| *m == *best_move) {
            root_moves[..=i].rotate_right(1);
        }

        let mut best_score = -INFINITY;
        for (index, &mv) in root_moves.iter().enumerate() {
            let gives_check = self.pos.gives_check(mv);
            let extension = if gives_check { CHECK_EXTENSION } else { 0 };
            let new_depth = depth - ONE_PLY + extension;

            self.pos.make_move(mv);
            let score = if index == 0 {
                -self.pv_search(new_depth, -beta, -alpha, 1, true)
            } else {
                let mut score = -self.pv_search(new_depth, -alpha - 1, -alpha, 1, true);
                if score > alpha && score < beta {
                    score = -self.pv_search(new_depth, -beta, -alpha, 1, true);
                }
                score
            };
            self.pos.unmake_move();

            if self.stopped {
                return best_score;
            }
            if score > best_score {
                best_score = score;
                *best_move = mv;
                if score > alpha {
                    alpha = score;
                    if score >= beta {
                        break;
                    }
                }
            }
        }

        if !self.stopped {
            let bound = if best_score >= beta {
                Bound::FailHigh
            } else {
                Bound::Exact
            };
            self.state.tables.tt.store(
                self.pos.key(),
                depth,
                score_to_tt(best_score, 0),
                bound,
                Some(*best_move),
                self.state.tables.generation(),
            );
        }
        best_score
    }

    /// Principal variation search over quarter-ply depths.
    pub(crate) fn pv_search(
        &mut self,
        mut depth: Depth,
        mut alpha: Score,
        mut beta: Score,
        ply: usize,
        null_ok: bool,
    ) -> Score {
        let is_pv = beta - alpha > 1;

        if self.should_stop() {
            return 0;
        }
        self.visit_node(ply);

        // draw claims; a mate delivered on the hundredth half-move still
        // outranks the fifty-move claim
        if self.pos.has_repeated(3) || self.pos.has_insufficient_material() {
            return DRAW_CLAIMED;
        }
        if self.pos.fifty_move_rule_reached() {
            if self.pos.in_check() {
                let mut evasions = MoveList::new();
                self.pos.generate_moves(&mut evasions);
                if evasions.is_empty() {
                    return mated_in(ply as i32);
                }
            }
            return DRAW_CLAIMED;
        }

        // mate-distance pruning: even a mate here cannot escape the window
        alpha = alpha.max(mated_in(ply as i32));
        beta = beta.min(mate_in(ply as i32 + 1));
        if alpha >= beta {
            return alpha;
        }

        if ply >= MAX_PLY - 1 {
            return evaluate(self.pos, alpha, beta, &mut self.state.tables);
        }

        // transposition probe; the move stays useful even when the score
        // cannot cut
        let mut tt_move = Move::NULL;
        if let Some(entry) = self.state.tables.tt.probe(self.pos.key()) {
            tt_move = entry.best_move().unwrap_or(Move::NULL);
            if entry.depth() >= depth {
                let score = entry.score(ply as i32);
                let usable = match entry.bound() {
                    Bound::Exact => !is_pv || (score > alpha && score < beta),
                    Bound::FailHigh => score >= beta,
                    Bound::FailLow => score <= alpha,
                };
                if usable {
                    self.tt_hits += 1;
                    return score;
                }
            }
        }

        let in_check = self.pos.in_check();
        if depth <= 0 && !in_check {
            return self.quiescence(alpha, beta, ply);
        }

        // fractional check extension
        if in_check {
            depth += CHECK_EXTENSION;
        }
        if depth <= 0 {
            return self.quiescence(alpha, beta, ply);
        }

        let params = self.state.params.clone();

        // internal iterative deepening: fill the table with a best guess
        // when a PV node has none
        if is_pv && tt_move.is_null() && depth >= params.iid_min_depth {
            self.pv_search(depth - params.iid_reduction, alpha, beta, ply, false);
            if self.stopped {
                return 0;
            }
            if let Some(entry) = self.state.tables.tt.probe(self.pos.key()) {
                tt_move = entry.best_move().unwrap_or(Move::NULL);
            }
        }

        let static_eval = if in_check {
            -INFINITY
        } else {
            evaluate(self.pos, alpha, beta, &mut self.state.tables)
        };

        // razoring: hopeless nodes drop straight into quiescence
        if !is_pv
            && !in_check
            && depth <= 2 * ONE_PLY
            && static_eval + params.razor_margin <= alpha
        {
            let score = self.quiescence(alpha, beta, ply);
            if score <= alpha {
                return score;
            }
        }

        // null move: hand the opponent a free shot; if the reduced search
        // still clears beta, the position is good enough to prune. Skipped
        // without non-pawn material, where zugzwang breaks the logic.
        if null_ok
            && !is_pv
            && !in_check
            && depth >= params.null_min_depth
            && static_eval >= beta
            && has_non_pawn_material(self.pos, self.pos.side_to_move())
        {
            let reduction = params.null_base_reduction + depth / 24 * ONE_PLY;
            let saved = self.pos.make_null_move();
            let score = -self.pv_search(depth - reduction - ONE_PLY, -beta, -beta + 1, ply + 1, false);
            self.pos.unmake_null_move(saved);
            if self.stopped {
                return 0;
            }
            if score >= beta {
                // never trust a mate from a null search
                return if is_mate_score(score) { beta } else { score };
            }
            if score < -MATE_BOUND {
                // doing nothing gets us mated: a real threat is hanging
                depth += MATE_THREAT_EXTENSION;
            }
        }

        self.search_moves(depth, alpha, beta, ply, tt_move, static_eval, is_pv, in_check)
    }

    /// The move loop of `pv_search`, in picker order.
    #[allow(clippy::too_many_arguments)]
    fn search_moves(
        &mut self,
        depth: Depth,
        mut alpha: Score,
        beta: Score,
        ply: usize,
        tt_move: Move,
        static_eval: Score,
        is_pv: bool,
        in_check: bool,
    ) -> Score {
        let params = self.state.params.clone();
        let previous = self.pos.last_move();
        let mut picker = MovePicker::new(self.pos, tt_move, self.state.killers.get(ply));

        let mut best_score = -INFINITY;
        let mut best_move = Move::NULL;
        let mut raised_alpha = false;
        let mut legal_moves = 0usize;
        let mut searched = 0usize;
        let mut quiets_behind = 0usize;

        while let Some((mv, origin)) = picker.next(self.pos, &self.state.history) {
            legal_moves += 1;
            let is_quiet = !mv.is_material();
            let gives_check = self.pos.gives_check(mv);

            // recapture extension keyed on the square of the previous
            // capture; an en-passant victim counts where it stood
            let mut extension = 0;
            if let Some(prev) = previous {
                if prev.is_capture() && mv.is_capture() && mv.capture_square() == prev.to() {
                    extension += RECAPTURE_EXTENSION;
                }
            }

            // futility: a quiet, checkless move at frontier depth whose
            // static margin cannot reach alpha is not worth making
            if searched > 0
                && !is_pv
                && !in_check
                && !gives_check
                && is_quiet
                && extension == 0
                && depth <= 3 * ONE_PLY
            {
                let margin = params.futility_margins[(depth / ONE_PLY).clamp(1, 3) as usize];
                if static_eval + margin <= alpha {
                    continue;
                }
            }

            // late move reductions for quiet moves past the first few
            let mut reduction = 0;
            if origin == MoveOrigin::Quiet
                && !is_pv
                && !in_check
                && !gives_check
                && depth >= params.lmr_min_depth
                && quiets_behind >= params.lmr_move_threshold
            {
                reduction = ONE_PLY;
                if searched >= params.lmr_extra_threshold {
                    reduction += ONE_PLY;
                }
            }
            if is_quiet {
                quiets_behind += 1;
            }

            let new_depth = depth - ONE_PLY + extension;
            self.pos.make_move(mv);
            let score = if searched == 0 {
                -self.pv_search(new_depth, -beta, -alpha, ply + 1, true)
            } else {
                // null-window probe, re-searched on promise
                let mut score =
                    -self.pv_search(new_depth - reduction, -alpha - 1, -alpha, ply + 1, true);
                if score > alpha && reduction > 0 {
                    score = -self.pv_search(new_depth, -alpha - 1, -alpha, ply + 1, true);
                }
                if score > alpha && score < beta {
                    score = -self.pv_search(new_depth, -beta, -alpha, ply + 1, true);
                }
                score
            };
            self.pos.unmake_move();
            searched += 1;

            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
                if score > alpha {
                    if is_quiet {
                        self.state.killers.insert(ply, mv);
                    }
                    if score >= beta {
                        if is_quiet {
                            self.state.history.reward(mv);
                        }
                        self.state.tables.tt.store(
                            self.pos.key(),
                            depth,
                            score_to_tt(score, ply as i32),
                            Bound::FailHigh,
                            Some(mv),
                            self.state.tables.generation(),
                        );
                        return score;
                    }
                    alpha = score;
                    raised_alpha = true;
                }
            }
            if is_quiet && score < beta {
                self.state.history.punish(mv);
            }
        }

        if legal_moves == 0 {
            return if in_check {
                mated_in(ply as i32)
            } else {
                STALEMATE
            };
        }
        if best_score == -INFINITY {
            // every legal move was futility-pruned; fail low on the margin
            return alpha;
        }

        self.state.tables.tt.store(
            self.pos.key(),
            depth,
            score_to_tt(best_score, ply as i32),
            if raised_alpha { Bound::Exact } else { Bound::FailLow },
            Some(best_move),
            self.state.tables.generation(),
        );
        best_score
    }
}
