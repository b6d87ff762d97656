//! An agent that plays uniformly at random.
//!
//! Useful as a sparring partner and to exercise the protocol layer without
//! paying for search. Unlike the minimax agent it keeps a plain occupancy
//! grid, so it can also honour blocked squares.

use crate::agent::{Agent, AgentError, about_line};
use crate::config::Config;
use crate::constants::MIN_BOARD_SIZE;
use crate::position::{Move, Position};

/// What occupies a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Square {
    Free,
    Stone,
    Blocked,
}

/// Agent that picks any free square.
pub struct RandomAgent {
    rng: fastrand::Rng,
    width: usize,
    height: usize,
    squares: Vec<Square>,
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// Agent with a reproducible move sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            rng,
            width: 0,
            height: 0,
            squares: Vec::new(),
        }
    }

    fn index(&self, mv: Move) -> Result<usize, AgentError> {
        if self.squares.is_empty() {
            return Err(AgentError::NoGame);
        }
        if mv.x < self.width && mv.y < self.height {
            Ok(mv.y * self.width + mv.x)
        } else {
            Err(AgentError::IllegalMove(mv))
        }
    }

    fn occupy(&mut self, mv: Move, with: Square) -> Result<(), AgentError> {
        let i = self.index(mv)?;
        if self.squares[i] != Square::Free {
            return Err(AgentError::IllegalMove(mv));
        }
        self.squares[i] = with;
        Ok(())
    }

    /// Number of free squares left.
    pub fn free_squares(&self) -> usize {
        self.squares.iter().filter(|&&s| s == Square::Free).count()
    }
}

impl Agent for RandomAgent {
    fn about(&self) -> String {
        about_line("gomoku-brain-random", "Random move brain")
    }

    fn init(&mut self, config: &Config) -> Result<(), AgentError> {
        let (width, height) = (config.board_width as usize, config.board_height as usize);
        if !Position::is_playable_size(width, height) {
            return Err(AgentError::BoardTooSmall { min: MIN_BOARD_SIZE });
        }
        self.width = width;
        self.height = height;
        self.squares = vec![Square::Free; width * height];
        Ok(())
    }

    fn select_move(&mut self) -> Result<Move, AgentError> {
        if self.squares.is_empty() {
            return Err(AgentError::NoGame);
        }
        let free: Vec<usize> = (0..self.squares.len())
            .filter(|&i| self.squares[i] == Square::Free)
            .collect();
        if free.is_empty() {
            return Err(AgentError::NoMoves);
        }
        let i = free[self.rng.usize(..free.len())];
        Ok(Move::new(i % self.width, i / self.width))
    }

    fn my_move(&mut self, mv: Move) -> Result<(), AgentError> {
        self.occupy(mv, Square::Stone)
    }

    fn opponent_move(&mut self, mv: Move) -> Result<(), AgentError> {
        self.occupy(mv, Square::Stone)
            .map_err(|e| match e {
                AgentError::IllegalMove(m) => AgentError::IllegalOpponentMove(m),
                other => other,
            })
    }

    fn block(&mut self, mv: Move) -> Result<(), AgentError> {
        self.occupy(mv, Square::Blocked)
    }

    fn supports_blocks(&self) -> bool {
        true
    }

    fn is_free(&self, mv: Move) -> bool {
        self.index(mv)
            .is_ok_and(|i| self.squares[i] == Square::Free)
    }

    fn takeback(&mut self, mv: Move) -> Result<(), AgentError> {
        let i = self.index(mv).map_err(|_| AgentError::InvalidTakeback(mv))?;
        if self.squares[i] == Square::Free {
            return Err(AgentError::InvalidTakeback(mv));
        }
        self.squares[i] = Square::Free;
        Ok(())
    }

    fn end(&mut self) {
        self.squares.clear();
    }
}
