//! The brain interface driven by the protocol engine.
//!
//! An [`Agent`] owns a game: it builds its board when the game starts, records
//! the moves the manager reports, and picks a move when asked. The engine and
//! the turn scheduler only ever talk to a `dyn Agent`, so agents with different
//! move-selection strategies are interchangeable.

use std::sync::{Arc, Mutex};

use crate::config::{Config, InfoKind};
use crate::constants::{ABOUT_AUTHOR, ABOUT_COUNTRY, ABOUT_WWW};
use crate::position::Move;

/// Why an agent refused a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// No `START` has been accepted yet
    NoGame,
    /// Board smaller than the minimum playable size
    BoardTooSmall { min: usize },
    /// Own move on an occupied or off-board cell
    IllegalMove(Move),
    /// Opponent move on an occupied or off-board cell
    IllegalOpponentMove(Move),
    /// Takeback of an empty or off-board cell
    InvalidTakeback(Move),
    /// The agent does not implement this request
    Unsupported(&'static str),
    /// Every cell is taken
    NoMoves,
}

impl std::fmt::Display for AgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentError::NoGame => write!(f, "no game in progress"),
            AgentError::BoardTooSmall { min } => write!(f, "board size must be at least {min}x{min}"),
            AgentError::IllegalMove(m) => write!(f, "invalid move {m}"),
            AgentError::IllegalOpponentMove(m) => write!(f, "invalid opponent move {m}"),
            AgentError::InvalidTakeback(m) => write!(f, "invalid takeback {m}"),
            AgentError::Unsupported(what) => write!(f, "{what} not supported"),
            AgentError::NoMoves => write!(f, "no move left to play"),
        }
    }
}

impl std::error::Error for AgentError {}

/// An agent shared between the command loop and the thinking thread.
pub type SharedAgent = Arc<Mutex<Box<dyn Agent>>>;

/// Wrap an agent for use by the engine.
pub fn shared(agent: impl Agent + 'static) -> SharedAgent {
    let agent: Box<dyn Agent> = Box::new(agent);
    Arc::new(Mutex::new(agent))
}

/// Capabilities every brain provides to the engine.
pub trait Agent: Send {
    /// Identity line returned for `ABOUT`.
    fn about(&self) -> String;

    /// Start a new game with the board size in `config`.
    fn init(&mut self, config: &Config) -> Result<(), AgentError>;

    /// Throw the current game away and start over with `config`.
    fn restart(&mut self, config: &Config) -> Result<(), AgentError> {
        self.init(config)
    }

    /// A setting changed; `config` already holds the new value.
    fn config_changed(&mut self, _config: &Config, _info: InfoKind) {}

    /// Pick the brain's next move. The move is not played yet.
    fn select_move(&mut self) -> Result<Move, AgentError>;

    /// Record a stone of the brain's.
    fn my_move(&mut self, mv: Move) -> Result<(), AgentError>;

    /// Record a stone of the opponent's.
    fn opponent_move(&mut self, mv: Move) -> Result<(), AgentError>;

    /// Record a square belonging to a winning line (continuous games).
    fn block(&mut self, _mv: Move) -> Result<(), AgentError> {
        Err(AgentError::Unsupported("blocked squares"))
    }

    /// True if [`Agent::block`] is implemented.
    fn supports_blocks(&self) -> bool {
        false
    }

    /// True if `mv` is on the board and nothing occupies it.
    fn is_free(&self, mv: Move) -> bool;

    /// Remove a stone.
    fn takeback(&mut self, mv: Move) -> Result<(), AgentError>;

    /// The match is over; release resources.
    fn end(&mut self) {}
}

/// Build an `ABOUT` line in the manager's `key="value"` format.
pub fn about_line(name: &str, description: &str) -> String {
    format!(
        "name=\"{name}\" version=\"{}\" author=\"{ABOUT_AUTHOR}\" country=\"{ABOUT_COUNTRY}\" www=\"{ABOUT_WWW}\" description=\"{description}\"",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_about_line() {
        let line = about_line("Test", "just testing");
        assert!(line.starts_with("name=\"Test\" version=\""));
        assert!(line.ends_with("description=\"just testing\""));
        assert!(line.contains("country=\"FR\""));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AgentError::NoGame.to_string(), "no game in progress");
        assert_eq!(
            AgentError::BoardTooSmall { min: 5 }.to_string(),
            "board size must be at least 5x5"
        );
        assert_eq!(
            AgentError::IllegalOpponentMove(Move::new(1, 2)).to_string(),
            "invalid opponent move 1,2"
        );
    }
}
