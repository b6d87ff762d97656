//! The searching agent.
//!
//! [`MinimaxAgent`] keeps the authoritative [`Position`] of the current game
//! and hands it to a [`Solver`] whenever the manager asks for a move.

use crate::agent::{Agent, AgentError, about_line};
use crate::config::{Config, InfoKind};
use crate::constants::MIN_BOARD_SIZE;
use crate::position::{Cell, Move, Position};
use crate::search::{SearchParams, Solver};

/// Board and solver of the game in progress.
struct Game {
    position: Position,
    solver: Solver,
}

/// Agent that plays the move found by alpha-beta search.
pub struct MinimaxAgent {
    params: SearchParams,
    game: Option<Game>,
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl MinimaxAgent {
    pub fn new() -> Self {
        Self::with_params(SearchParams::default())
    }

    pub fn with_params(params: SearchParams) -> Self {
        Self { params, game: None }
    }

    /// The current position, if a game is in progress.
    pub fn position(&self) -> Option<&Position> {
        self.game.as_ref().map(|g| &g.position)
    }

    fn reset(&mut self, config: &Config) -> Result<(), AgentError> {
        let (width, height) = (config.board_width as usize, config.board_height as usize);
        if !Position::is_playable_size(width, height) {
            return Err(AgentError::BoardTooSmall { min: MIN_BOARD_SIZE });
        }
        let mut position = Position::new(width, height);
        position.set_exact_five(config.rules.exactly_five);
        let mut solver = Solver::with_params(width, height, config.turn_budget_ms(), self.params);
        solver.set_cache_capacity(config.cache_capacity());
        log::info!("new {width}x{height} game");
        self.game = Some(Game { position, solver });
        Ok(())
    }

    fn game_mut(&mut self) -> Result<&mut Game, AgentError> {
        self.game.as_mut().ok_or(AgentError::NoGame)
    }
}

impl Agent for MinimaxAgent {
    fn about(&self) -> String {
        about_line("gomoku-brain", "Alpha-beta minimax brain")
    }

    fn init(&mut self, config: &Config) -> Result<(), AgentError> {
        self.reset(config)
    }

    fn config_changed(&mut self, config: &Config, info: InfoKind) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        match info {
            InfoKind::TimeoutTurn | InfoKind::TimeoutMatch | InfoKind::TimeLeft => {
                game.solver.set_max_time(config.turn_budget_ms());
            }
            InfoKind::MaxMemory => game.solver.set_cache_capacity(config.cache_capacity()),
            InfoKind::Rule => game.position.set_exact_five(config.rules.exactly_five),
            _ => {}
        }
    }

    fn select_move(&mut self) -> Result<Move, AgentError> {
        let game = self.game_mut()?;
        game.position.set_my_turn(true);
        game.solver
            .find_best_move(&game.position)
            .ok_or(AgentError::NoMoves)
    }

    fn my_move(&mut self, mv: Move) -> Result<(), AgentError> {
        let game = self.game_mut()?;
        if !game.position.can_play(mv.x, mv.y) {
            return Err(AgentError::IllegalMove(mv));
        }
        game.position.play_as(mv.x, mv.y, true);
        Ok(())
    }

    fn opponent_move(&mut self, mv: Move) -> Result<(), AgentError> {
        let game = self.game_mut()?;
        if !game.position.can_play(mv.x, mv.y) {
            return Err(AgentError::IllegalOpponentMove(mv));
        }
        game.position.play_as(mv.x, mv.y, false);
        Ok(())
    }

    fn is_free(&self, mv: Move) -> bool {
        self.game
            .as_ref()
            .is_some_and(|g| g.position.can_play(mv.x, mv.y))
    }

    fn takeback(&mut self, mv: Move) -> Result<(), AgentError> {
        let game = self.game_mut()?;
        match game.position.get(mv.x, mv.y) {
            Some(Cell::Mine | Cell::Theirs) => {
                game.position.clear(mv.x, mv.y);
                Ok(())
            }
            _ => Err(AgentError::InvalidTakeback(mv)),
        }
    }

    fn end(&mut self) {
        self.game = None;
    }
}
