//! Quiescence search: resolve captures (and checks) until the position is
//! quiet enough for the static evaluation to be trusted.

use crate::board::{MoveList, ScoredMoveList};
use crate::eval::evaluate;
use crate::eval::score::{mated_in, Score, INFINITY};

use super::ordering::{mvv_lva, order_by_see};
use super::{SearchContext, MAX_PLY};

impl SearchContext<'_> {
    pub(crate) fn quiescence(&mut self, mut alpha: Score, beta: Score, ply: usize) -> Score {
        if self.should_stop() {
            return 0;
        }
        self.visit_node(ply);

        if ply >= MAX_PLY - 1 {
            return evaluate(self.pos, alpha, beta, &mut self.state.tables);
        }

        // in check there is no standing pat: every evasion is searched
        if self.pos.in_check() {
            let mut evasions = MoveList::new();
            self.pos.generate_moves(&mut evasions);
            if evasions.is_empty() {
                return mated_in(ply as i32);
            }
            let mut scored = ScoredMoveList::new();
            for &mv in &evasions {
                scored.push(mv, mvv_lva(mv));
            }
            let mut best = -INFINITY;
            let mut index = 0;
            while let Some(entry) = scored.pick_best(index) {
                index += 1;
                self.pos.make_move(entry.mv);
                let score = -self.quiescence(-beta, -alpha, ply + 1);
                self.pos.unmake_move();
                if self.stopped {
                    return 0;
                }
                if score >= beta {
                    return score;
                }
                if score > best {
                    best = score;
                }
                if score > alpha {
                    alpha = score;
                }
            }
            return best;
        }

        // stand pat: the side to move may decline every capture
        let stand_pat = evaluate(self.pos, alpha, beta, &mut self.state.tables);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut material = MoveList::new();
        self.pos.generate_material_moves(&mut material);
        let mut scored = order_by_see(self.pos, &material);

        let delta_margin = self.state.params.delta_margin;
        let mut index = 0;
        while let Some(entry) = scored.pick_best(index) {
            index += 1;
            let mv = entry.mv;

            if mv.is_capture() {
                // losing captures cannot rescue a quiet position
                if entry.score < 0 {
                    continue;
                }
                // delta pruning: even banking the full exchange plus a
                // margin would leave us below alpha
                if stand_pat + entry.score + delta_margin <= alpha {
                    continue;
                }
            }

            self.pos.make_move(mv);
            let score = -self.quiescence(-beta, -alpha, ply + 1);
            self.pos.unmake_move();
            if self.stopped {
                return 0;
            }
            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}
