//! Iterative-deepening alpha-beta search.
//!
//! The entry point is [`think`]: configure a [`Position`], a
//! [`SearchLimits`], a transposition table and a cancellation token, and
//! get back the best root move with the node count. Per-iteration results
//! are published through an observer callback.
//!
//! All mutable search state (killers, history, countermoves, eval stack)
//! lives in a context created per call; the only shared structures are
//! the transposition table and the cancellation flag.

mod alphabeta;
mod constants;
mod ordering;
mod quiescence;

use std::sync::Arc;
use std::time::Instant;

use crate::sync::CancelToken;
use crate::tt::TranspositionTable;

use super::types::{Color, Move, Piece, MAX_PLY, NULL_MOVE};
use super::Position;

pub use constants::{MATE_BOUND, MATE_SCORE};
use constants::{ASPIRATION_WINDOW, HISTORY_MAX, NODES_PER_CLOCK_CHECK, SCORE_INFINITE};

/// Default maximum iterative-deepening depth.
const MAX_DEPTH: u32 = 64;

/// Limits for one search. Unset limits mean unlimited; cancellation is
/// always honored regardless.
#[derive(Clone, Debug)]
pub struct SearchLimits {
    /// Maximum iteration depth.
    pub depth: u32,
    /// Fixed budget for this move, in milliseconds.
    pub movetime_ms: Option<u64>,
    /// Node budget.
    pub max_nodes: Option<u64>,
    /// Remaining clock time, from which a soft budget is derived.
    pub time_ms: Option<u64>,
    /// Clock increment per move.
    pub inc_ms: u64,
    /// Reserve subtracted from the soft budget for communication latency.
    pub move_overhead_ms: u64,
    /// Search with aspiration windows (on by default).
    pub aspiration: bool,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            depth: MAX_DEPTH,
            movetime_ms: None,
            max_nodes: None,
            time_ms: None,
            inc_ms: 0,
            move_overhead_ms: 0,
            aspiration: true,
        }
    }
}

impl SearchLimits {
    /// Fixed-depth limits.
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth,
            ..Default::default()
        }
    }

    /// Fixed time-per-move limits.
    #[must_use]
    pub fn movetime(ms: u64) -> Self {
        SearchLimits {
            movetime_ms: Some(ms),
            ..Default::default()
        }
    }

    /// Node-budget limits.
    #[must_use]
    pub fn nodes(max_nodes: u64) -> Self {
        SearchLimits {
            max_nodes: Some(max_nodes),
            ..Default::default()
        }
    }

    /// Clock-based limits (remaining time plus increment).
    #[must_use]
    pub fn clock(time_ms: u64, inc_ms: u64) -> Self {
        SearchLimits {
            time_ms: Some(time_ms),
            inc_ms,
            ..Default::default()
        }
    }

    /// The soft time budget for this move, if any time limit is set.
    ///
    /// An explicit movetime is used as-is; otherwise the budget is
    /// `time_ms / 30 + 0.6 * inc_ms` minus the move overhead, floored at
    /// 10 ms whenever a clock time is provided at all.
    #[must_use]
    pub(crate) fn soft_time_ms(&self) -> Option<u64> {
        if let Some(movetime) = self.movetime_ms {
            return Some(movetime.max(1));
        }
        let time = self.time_ms?;
        let budget = time / 30 + self.inc_ms * 6 / 10;
        Some(budget.saturating_sub(self.move_overhead_ms).max(10))
    }
}

/// Info record published after each completed iteration. The principal
/// variation begins with the chosen root move.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub depth: u32,
    pub score_cp: i32,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub pv: Vec<Move>,
}

/// Observer callback for per-iteration info records.
pub type InfoCallback = Arc<dyn Fn(&SearchReport) + Send + Sync>;

/// Result of a completed (or cancelled) search.
#[derive(Clone, Copy, Debug)]
pub struct SearchOutcome {
    /// Best root move; `None` only when the position has no legal moves.
    pub best_move: Option<Move>,
    /// Nodes visited across all iterations.
    pub nodes: u64,
}

/// Two remembered quiet beta-cutoff moves per ply.
pub(crate) struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    fn new() -> Self {
        KillerTable {
            slots: [[NULL_MOVE; 2]; MAX_PLY],
        }
    }

    pub(crate) fn primary(&self, ply: usize) -> Move {
        self.slots[ply][0]
    }

    pub(crate) fn secondary(&self, ply: usize) -> Move {
        self.slots[ply][1]
    }

    /// Record a new first killer, demoting the previous one.
    pub(crate) fn update(&mut self, ply: usize, mv: Move) {
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }
}

/// Quiet-move history indexed by (color, moved piece, to-square).
pub(crate) struct HistoryTable {
    entries: [[i32; 64]; 12],
}

impl HistoryTable {
    fn new() -> Self {
        HistoryTable {
            entries: [[0; 64]; 12],
        }
    }

    pub(crate) fn score(&self, color: Color, piece: Piece, mv: Move) -> i32 {
        self.entries[color.index() * 6 + piece.index()][mv.to().index()]
    }

    pub(crate) fn update(&mut self, color: Color, piece: Piece, mv: Move, depth: u32) {
        let entry = &mut self.entries[color.index() * 6 + piece.index()][mv.to().index()];
        *entry = (*entry + (depth * depth) as i32).min(HISTORY_MAX);
    }
}

/// Remembered reply to a specific opponent move, indexed by its squares.
pub(crate) struct CounterMoveTable {
    entries: [[Move; 64]; 64],
}

impl CounterMoveTable {
    fn new() -> Self {
        CounterMoveTable {
            entries: [[NULL_MOVE; 64]; 64],
        }
    }

    pub(crate) fn get(&self, prev: Move) -> Move {
        if prev.is_null() {
            NULL_MOVE
        } else {
            self.entries[prev.from().index()][prev.to().index()]
        }
    }

    pub(crate) fn set(&mut self, prev: Move, reply: Move) {
        if !prev.is_null() {
            self.entries[prev.from().index()][prev.to().index()] = reply;
        }
    }
}

/// All state for one `think` call.
pub(crate) struct SearchContext<'a> {
    pub(crate) pos: &'a mut Position,
    pub(crate) tt: &'a mut TranspositionTable,
    cancel: &'a CancelToken,
    pub(crate) nodes: u64,
    max_nodes: Option<u64>,
    deadline: Option<Instant>,
    pub(crate) stopped: bool,
    pub(crate) killers: KillerTable,
    pub(crate) history: HistoryTable,
    pub(crate) counters: CounterMoveTable,
    /// Static eval per ply, for the "improving" test.
    pub(crate) static_eval: [i32; MAX_PLY],
    /// Move made at each ply, for the countermove heuristic.
    pub(crate) prev_move: [Move; MAX_PLY],
}

impl<'a> SearchContext<'a> {
    fn new(
        pos: &'a mut Position,
        tt: &'a mut TranspositionTable,
        cancel: &'a CancelToken,
        limits: &SearchLimits,
        start: Instant,
    ) -> Self {
        SearchContext {
            pos,
            tt,
            cancel,
            nodes: 0,
            max_nodes: limits.max_nodes,
            deadline: limits
                .soft_time_ms()
                .map(|ms| start + std::time::Duration::from_millis(ms)),
            stopped: false,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            counters: CounterMoveTable::new(),
            static_eval: [0; MAX_PLY],
            prev_move: [NULL_MOVE; MAX_PLY],
        }
    }

    /// Cooperative stop poll. The clock is consulted only when a deadline
    /// exists, and only every [`NODES_PER_CLOCK_CHECK`] nodes, so searches
    /// without time limits are fully deterministic.
    pub(crate) fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.cancel.is_cancelled() {
            self.stopped = true;
            return true;
        }
        if let Some(max) = self.max_nodes {
            if self.nodes >= max {
                self.stopped = true;
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if self.nodes % NODES_PER_CLOCK_CHECK == 0 && Instant::now() >= deadline {
                self.stopped = true;
                return true;
            }
        }
        false
    }

    /// Walk the transposition table from the current position to rebuild
    /// the principal variation, starting with the chosen root move. Every
    /// step is validated against the legal move list; repetition of a
    /// visited hash terminates the walk.
    fn extract_pv(&mut self, first: Move, max_len: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_len);
        let mut seen = Vec::with_capacity(max_len);
        let mut undo_stack = Vec::with_capacity(max_len);

        for step in 0..max_len {
            let hash = self.pos.key();
            if seen.contains(&hash) {
                break;
            }
            seen.push(hash);

            let mv = if step == 0 {
                first
            } else {
                match self.tt.probe(hash).and_then(|e| e.best_move()) {
                    Some(mv) => mv,
                    None => break,
                }
            };

            if !self.pos.generate_legal().contains(mv) {
                break;
            }
            let undo = self
                .pos
                .make_move(mv)
                .expect("legal PV move failed to apply");
            pv.push(mv);
            undo_stack.push((mv, undo));
        }

        while let Some((mv, undo)) = undo_stack.pop() {
            self.pos.unmake_move(mv, undo);
        }
        pv
    }
}

/// Search `pos` under `limits`, using `tt` for transpositions, until done
/// or cancelled. Returns the best move found at the most recently
/// completed iteration and the total node count.
///
/// Cancellation (or running out of time or nodes) is early termination,
/// not failure: the best move from the last completed iteration is
/// returned, falling back to the first legal move before any iteration
/// finishes.
pub fn think(
    pos: &mut Position,
    limits: &SearchLimits,
    tt: &mut TranspositionTable,
    cancel: &CancelToken,
    on_info: Option<InfoCallback>,
) -> SearchOutcome {
    let start = Instant::now();
    tt.new_generation();

    let root_moves = pos.generate_legal();
    let Some(mut best_move) = root_moves.first() else {
        return SearchOutcome {
            best_move: None,
            nodes: 0,
        };
    };

    let max_depth = limits.depth.clamp(1, MAX_PLY as u32 - 1);
    let mut ctx = SearchContext::new(pos, tt, cancel, limits, start);
    let mut last_score: i32 = 0;

    for depth in 1..=max_depth {
        if ctx.should_stop() {
            break;
        }

        let score = if limits.aspiration && depth > 1 && last_score.abs() < MATE_BOUND {
            // Aspiration: narrow window around the previous score, full
            // re-search on fail-low or fail-high
            let alpha = last_score - ASPIRATION_WINDOW;
            let beta = last_score + ASPIRATION_WINDOW;
            let score = ctx.negamax(depth, alpha, beta, 0);
            if !ctx.stopped && (score <= alpha || score >= beta) {
                ctx.negamax(depth, -SCORE_INFINITE, SCORE_INFINITE, 0)
            } else {
                score
            }
        } else {
            ctx.negamax(depth, -SCORE_INFINITE, SCORE_INFINITE, 0)
        };

        // A partial iteration never updates the result
        if ctx.stopped {
            break;
        }
        last_score = score;

        if let Some(mv) = ctx.tt.probe(ctx.pos.key()).and_then(|e| e.best_move()) {
            if root_moves.contains(mv) {
                best_move = mv;
            }
        }

        if let Some(callback) = &on_info {
            let report = SearchReport {
                depth,
                score_cp: score,
                nodes: ctx.nodes,
                elapsed_ms: start.elapsed().as_millis() as u64,
                pv: ctx.extract_pv(best_move, depth as usize),
            };
            callback(&report);
        }
    }

    SearchOutcome {
        best_move: Some(best_move),
        nodes: ctx.nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_time_formula() {
        // 60s + 3s increment: 2000 + 1800 = 3800ms
        let limits = SearchLimits::clock(60_000, 3_000);
        assert_eq!(limits.soft_time_ms(), Some(3_800));
    }

    #[test]
    fn test_soft_time_overhead_and_floor() {
        let mut limits = SearchLimits::clock(60_000, 0);
        limits.move_overhead_ms = 500;
        assert_eq!(limits.soft_time_ms(), Some(1_500));

        // Tiny clock: floored at 10ms, never zero
        let limits = SearchLimits::clock(30, 0);
        assert_eq!(limits.soft_time_ms(), Some(10));
    }

    #[test]
    fn test_movetime_takes_priority() {
        let mut limits = SearchLimits::movetime(250);
        limits.time_ms = Some(60_000);
        assert_eq!(limits.soft_time_ms(), Some(250));
    }

    #[test]
    fn test_no_time_limit_means_no_deadline() {
        assert_eq!(SearchLimits::depth(5).soft_time_ms(), None);
        assert_eq!(SearchLimits::nodes(1000).soft_time_ms(), None);
    }

    #[test]
    fn test_killer_demotion() {
        let mut killers = KillerTable::new();
        let a = Move::quiet(crate::board::Square::new(0, 0), crate::board::Square::new(0, 1));
        let b = Move::quiet(crate::board::Square::new(0, 2), crate::board::Square::new(0, 3));
        killers.update(3, a);
        killers.update(3, b);
        assert_eq!(killers.primary(3), b);
        assert_eq!(killers.secondary(3), a);
        // Re-recording the primary is a no-op
        killers.update(3, b);
        assert_eq!(killers.secondary(3), a);
    }

    #[test]
    fn test_history_is_clamped() {
        let mut history = HistoryTable::new();
        let mv = Move::quiet(crate::board::Square::new(0, 0), crate::board::Square::new(0, 1));
        for _ in 0..100 {
            history.update(Color::White, Piece::Knight, mv, 60);
        }
        assert_eq!(history.score(Color::White, Piece::Knight, mv), HISTORY_MAX);
    }

    #[test]
    fn test_countermove_round_trip() {
        let mut counters = CounterMoveTable::new();
        let prev = Move::quiet(crate::board::Square::new(6, 4), crate::board::Square::new(4, 4));
        let reply = Move::quiet(crate::board::Square::new(0, 6), crate::board::Square::new(2, 5));
        assert!(counters.get(prev).is_null());
        counters.set(prev, reply);
        assert_eq!(counters.get(prev), reply);
        assert!(counters.get(NULL_MOVE).is_null());
    }
}
