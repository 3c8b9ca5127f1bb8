//! The negamax node: pruning, principal-variation search, and the
//! heuristic bookkeeping around the move loop.

use crate::tt::Bound;

use super::super::types::{Move, MoveList, MAX_PLY, NULL_MOVE};
use super::constants::{
    CAPTURE_BASE, COUNTER_SCORE, KILLER1_SCORE, KILLER2_SCORE, LMP_LIMITS, MATE_SCORE,
    PROMOTION_BASE, RAZOR_MARGIN, SCORE_INFINITE, STATIC_NULL_MARGIN, TT_MOVE_SCORE,
};
use super::ordering::{mvv_lva, piece_value};
use super::SearchContext;
use crate::board::ScoredMoveList;

impl SearchContext<'_> {
    /// Alpha-beta negamax. Returns the score of the position from the
    /// side to move's perspective; `alpha` when cancelled mid-node.
    #[allow(clippy::too_many_lines)]
    pub(crate) fn negamax(&mut self, depth: u32, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        if self.should_stop() {
            return alpha;
        }
        self.nodes += 1;

        let in_check = self.pos.in_check();
        let static_eval = self.pos.evaluate();
        self.static_eval[ply] = static_eval;

        if depth == 0 || ply >= MAX_PLY - 1 {
            return self.quiescence(alpha, beta, ply);
        }

        // Razoring: far below alpha at shallow depth, verify with
        // quiescence and trust a confirming fail-low
        if !in_check && depth <= 2 && static_eval + RAZOR_MARGIN * depth as i32 <= alpha {
            let score = self.quiescence(alpha, beta, ply);
            if score <= alpha {
                return score;
            }
        }

        // Transposition table: deterministic cutoff when the stored depth
        // suffices and the bound allows it; otherwise keep the move hint
        let mut tt_move = NULL_MOVE;
        if let Some(entry) = self.tt.probe(self.pos.key()) {
            if let Some(mv) = entry.best_move() {
                tt_move = mv;
            }
            if entry.depth() >= depth {
                match entry.bound() {
                    Bound::Exact => return entry.score(),
                    Bound::Upper if entry.score() <= alpha => return alpha,
                    Bound::Lower if entry.score() >= beta => return beta,
                    _ => {}
                }
            }
        }

        // Static null move: eval is so far above beta that a shallow
        // search will not bring it back down
        if !in_check && depth <= 3 && static_eval - STATIC_NULL_MARGIN * depth as i32 >= beta {
            return static_eval;
        }

        // Null move: hand the opponent a free move; if the zero-width
        // search still fails high, this node would too. Forbidden in check.
        if !in_check && depth >= 3 {
            let r = if depth >= 5 { 3 } else { 2 };
            let undo = self.pos.make_null_move();
            self.prev_move[ply] = NULL_MOVE;
            let score = -self.negamax(depth - 1 - r, -beta, -beta + 1, ply + 1);
            self.pos.unmake_null_move(undo);
            if self.stopped {
                return alpha;
            }
            if score >= beta {
                return beta;
            }
        }

        let moves = self.pos.generate_legal();
        if moves.is_empty() {
            return if in_check { -(MATE_SCORE - ply as i32) } else { 0 };
        }

        let ordered = self.order_moves(&moves, tt_move, ply);

        let is_pv = beta > alpha + 1;
        let improving = ply >= 2 && static_eval > self.static_eval[ply - 2];
        let lmp_limit = LMP_LIMITS.get(depth as usize).copied().unwrap_or(usize::MAX);

        let alpha_orig = alpha;
        let mut best_score = -SCORE_INFINITE;
        let mut best_move = NULL_MOVE;
        let mut searched = 0usize;
        let mut quiets_seen = 0usize;

        for (index, scored) in ordered.as_slice().iter().enumerate() {
            let mv = scored.mv;
            let quiet = mv.is_quiet();

            // Late-move pruning: at shallow non-PV nodes, quiet moves this
            // deep in the ordering almost never matter
            if quiet {
                quiets_seen += 1;
                if !is_pv && !in_check && quiets_seen > lmp_limit && searched > 0 {
                    continue;
                }
            }

            // The mover is read before make; the board has already changed
            // underneath by the time the history update needs it
            let mover = self.pos.piece_at(mv.from());

            let Ok(undo) = self.pos.make_move(mv) else {
                continue;
            };
            self.prev_move[ply] = mv;
            searched += 1;

            // Late-move reduction for quiet moves
            let mut reduction = 0u32;
            if quiet && depth >= 3 {
                reduction = 1;
                if depth >= 5 && index >= 5 {
                    reduction += 1;
                }
                if !improving {
                    reduction += 1;
                }
                reduction = reduction.min(depth - 1);
            }

            // PVS: first move gets the full window, the rest prove
            // themselves against a zero-width window first
            let mut score;
            if searched == 1 {
                score = -self.negamax(depth - 1, -beta, -alpha, ply + 1);
            } else {
                score = -self.negamax(depth - 1 - reduction, -alpha - 1, -alpha, ply + 1);
                if !self.stopped && score > alpha && reduction > 0 {
                    score = -self.negamax(depth - 1, -alpha - 1, -alpha, ply + 1);
                }
                if !self.stopped && score > alpha && score < beta {
                    score = -self.negamax(depth - 1, -beta, -alpha, ply + 1);
                }
            }

            self.pos.unmake_move(mv, undo);
            if self.stopped {
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
                if quiet {
                    if let Some((color, piece)) = mover {
                        self.history.update(color, piece, mv, depth);
                    }
                }
                if alpha >= beta {
                    if quiet {
                        self.killers.update(ply, mv);
                        if ply > 0 {
                            self.counters.set(self.prev_move[ply - 1], mv);
                        }
                    }
                    break;
                }
            }
        }

        if searched == 0 {
            return alpha;
        }

        if !self.stopped && !best_move.is_null() {
            let bound = if best_score <= alpha_orig {
                Bound::Upper
            } else if best_score >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.store(
                self.pos.key(),
                depth,
                best_score,
                static_eval,
                bound,
                Some(best_move),
            );
        }

        best_score
    }

    /// Score moves for ordering, highest priority first: TT move,
    /// countermove, killers, captures by MVV-LVA, promotions, history.
    fn order_moves(&self, moves: &MoveList, tt_move: Move, ply: usize) -> ScoredMoveList {
        let prev = if ply > 0 {
            self.prev_move[ply - 1]
        } else {
            NULL_MOVE
        };
        let counter = self.counters.get(prev);
        let killer1 = self.killers.primary(ply);
        let killer2 = self.killers.secondary(ply);

        let mut scored = ScoredMoveList::new();
        for &mv in moves {
            let score = if mv == tt_move {
                TT_MOVE_SCORE
            } else if mv == counter && mv.is_quiet() {
                COUNTER_SCORE
            } else if mv == killer1 && mv.is_quiet() {
                KILLER1_SCORE
            } else if mv == killer2 && mv.is_quiet() {
                KILLER2_SCORE
            } else if mv.is_capture() {
                let promo_bonus = mv.promotion_piece().map_or(0, piece_value);
                CAPTURE_BASE + mvv_lva(self.pos, mv) + promo_bonus
            } else if let Some(promo) = mv.promotion_piece() {
                PROMOTION_BASE + piece_value(promo)
            } else {
                match self.pos.piece_at(mv.from()) {
                    Some((color, piece)) => self.history.score(color, piece, mv),
                    None => 0,
                }
            };
            scored.push(mv, score);
        }
        scored.sort_by_score_desc();
        scored
    }
}
