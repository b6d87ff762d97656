//! Time-boxed minimax search with alpha-beta pruning.
//!
//! The solver explores a fixed number of plies below every root candidate:
//! - Candidates come from a fixed center-out move order, generated once per turn
//! - Cells far from the stones already played are ignored
//! - Immediate wins and forced blocks short-circuit the tree
//! - Scores of visited positions are cached by symmetry-invariant hash
//! - Leaves, and every node reached after the deadline, get the static heuristic
//!
//! Scores are always from the brain's point of view: the brain maximizes,
//! the opponent minimizes.

use std::time::{Duration, Instant};

use crate::cache::EvalCache;
use crate::constants::{
    AWAY_LIMIT, CACHE_CAPACITY, DEPTH_LIMIT, FORCED_MOVE_THRESHOLD, LOSS_SCORE, MIN_TURN_TIME,
    TIMEOUT_MARGIN, WIN_SCORE,
};
use crate::position::{Move, Position};

/// Search limits that do not change during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Plies explored below each root candidate
    pub depth_limit: u32,
    /// Locality radius around the stones' bounding box
    pub away_limit: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth_limit: DEPTH_LIMIT,
            away_limit: AWAY_LIMIT,
        }
    }
}

/// Outcome of scanning for immediate wins and must-block cells.
enum Threats {
    /// The side to move wins by playing here
    Win(Move),
    /// The opponent would win here next turn (in move order)
    Blocks(Vec<Move>),
}

/// Move finder for one game.
pub struct Solver {
    width: usize,
    height: usize,
    params: SearchParams,
    /// Candidate cells, center first, rebuilt every turn
    move_order: Vec<Move>,
    cache: EvalCache,
    /// Milliseconds allowed per turn
    max_time: u32,
    started: Instant,
    nodes: u64,
}

impl Solver {
    /// Create a solver for a board with the default limits.
    pub fn new(width: usize, height: usize, max_time: u32) -> Self {
        Self::with_params(width, height, max_time, SearchParams::default())
    }

    pub fn with_params(width: usize, height: usize, max_time: u32, params: SearchParams) -> Self {
        Self {
            width,
            height,
            params,
            move_order: Vec::with_capacity(width * height),
            cache: EvalCache::new(CACHE_CAPACITY),
            max_time: max_time.max(MIN_TURN_TIME),
            started: Instant::now(),
            nodes: 0,
        }
    }

    /// Set the per-turn time limit in milliseconds.
    pub fn set_max_time(&mut self, max_time: u32) {
        self.max_time = max_time.max(MIN_TURN_TIME);
    }

    pub fn max_time(&self) -> u32 {
        self.max_time
    }

    /// Bound the evaluation cache to `capacity` entries.
    pub fn set_cache_capacity(&mut self, capacity: usize) {
        self.cache.resize(capacity);
    }

    pub fn cache(&self) -> &EvalCache {
        &self.cache
    }

    /// Nodes visited during the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn params(&self) -> SearchParams {
        self.params
    }

    /// Time left before the turn must be answered; zero once it is over.
    pub fn remaining_time(&self) -> Duration {
        let budget = Duration::from_millis(self.max_time.saturating_sub(TIMEOUT_MARGIN) as u64);
        budget.saturating_sub(self.started.elapsed())
    }

    #[inline]
    fn out_of_time(&self) -> bool {
        self.remaining_time().is_zero()
    }

    /// Fill the move order with every free cell, center outwards.
    ///
    /// Rows and columns are visited in zig-zag order: center, one before,
    /// one after, two before, and so on.
    pub fn generate_move_order(&mut self, pos: &Position) {
        self.move_order.clear();
        for row in zigzag(self.height) {
            for col in zigzag(self.width) {
                if pos.can_play(col, row) {
                    self.move_order.push(Move::new(col, row));
                }
            }
        }
    }

    pub fn move_order(&self) -> &[Move] {
        &self.move_order
    }

    /// True if (x, y) is outside the locality radius of the stones played.
    #[inline]
    fn is_too_far(&self, pos: &Position, x: usize, y: usize) -> bool {
        pos.bounds()
            .is_some_and(|b| !b.is_near(x, y, self.params.away_limit))
    }

    /// Candidates worth trying in `pos`, in move order.
    fn candidates<'a>(&'a self, pos: &'a Position) -> impl Iterator<Item = Move> + 'a {
        self.move_order
            .iter()
            .copied()
            .filter(move |m| !self.is_too_far(pos, m.x, m.y) && pos.can_play(m.x, m.y))
    }

    /// Look for a winning cell for the side to move, else collect the cells
    /// the opponent would win on.
    fn scan_threats(&self, pos: &Position) -> Threats {
        let mut blocks = Vec::new();
        for m in self.candidates(pos) {
            if pos.is_winning_move(m.x, m.y) {
                return Threats::Win(m);
            }
            if pos.is_winning_move_for(m.x, m.y, !pos.is_my_turn()) {
                blocks.push(m);
            }
        }
        Threats::Blocks(blocks)
    }

    /// Minimax value of `pos` searched `depth` plies deep.
    pub fn minimax(&mut self, pos: &Position, depth: u32, mut alpha: i64, mut beta: i64, maximizing: bool) -> i64 {
        self.nodes += 1;

        if depth == 0 || self.out_of_time() {
            return pos.heuristic();
        }

        let hash = pos.hash();
        if let Some(score) = self.cache.get(hash) {
            return score;
        }

        let (win, loss) = if maximizing {
            (WIN_SCORE, LOSS_SCORE)
        } else {
            (LOSS_SCORE, WIN_SCORE)
        };

        if pos.move_count() >= FORCED_MOVE_THRESHOLD {
            match self.scan_threats(pos) {
                Threats::Win(_) => {
                    self.cache.set(hash, win);
                    return win;
                }
                Threats::Blocks(blocks) if blocks.len() == 1 => {
                    let mut next = pos.clone();
                    next.play(blocks[0].x, blocks[0].y);
                    return self.minimax(&next, depth - 1, alpha, beta, !maximizing);
                }
                Threats::Blocks(blocks) if blocks.len() >= 2 => {
                    self.cache.set(hash, loss);
                    return loss;
                }
                Threats::Blocks(_) => {}
            }
        }

        let mut best = loss;
        let candidates: Vec<Move> = self.candidates(pos).collect();
        for m in candidates {
            let mut next = pos.clone();
            next.play(m.x, m.y);
            let score = self.minimax(&next, depth - 1, alpha, beta, !maximizing);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        self.cache.set(hash, best);
        best
    }

    /// Choose the brain's move in `pos`, which must have the brain to move.
    ///
    /// Returns `None` only when the board is full.
    pub fn find_best_move(&mut self, pos: &Position) -> Option<Move> {
        if pos.move_count() == 0 {
            return Some(pos.center());
        }

        self.started = Instant::now();
        self.nodes = 0;
        self.cache.clear();
        self.generate_move_order(pos);

        if pos.move_count() >= FORCED_MOVE_THRESHOLD {
            match self.scan_threats(pos) {
                Threats::Win(m) => {
                    log::debug!("winning move at {m}");
                    return Some(m);
                }
                Threats::Blocks(blocks) if !blocks.is_empty() => {
                    if blocks.len() > 1 {
                        log::debug!("{} threats to block, game is likely lost", blocks.len());
                    }
                    return Some(blocks[0]);
                }
                Threats::Blocks(_) => {}
            }
        }

        let mut best: Option<(Move, i64)> = None;
        let candidates: Vec<Move> = self.candidates(pos).collect();
        for m in candidates {
            let mut next = pos.clone();
            next.play(m.x, m.y);
            let score = self.minimax(&next, self.params.depth_limit, i64::MIN, i64::MAX, false);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((m, score));
            }
        }

        log::debug!(
            "searched {} nodes in {:?}, best {:?}",
            self.nodes,
            self.started.elapsed(),
            best
        );

        best.map(|(m, _)| m)
            .or_else(|| self.move_order.first().copied())
    }
}

/// Indices of `0..n` from the middle outwards, alternating sides.
fn zigzag(n: usize) -> impl Iterator<Item = usize> {
    let mid = (n / 2) as isize;
    (0..n as isize)
        .map(move |i| mid + (1 - 2 * (i % 2)) * ((i + 1) / 2))
        .filter(move |&v| v >= 0 && v < n as isize)
        .map(|v| v as usize)
}
