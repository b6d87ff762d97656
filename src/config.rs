//! Game configuration sent by the manager.
//!
//! A [`Config`] starts from the defaults in [`crate::constants`] and is then
//! updated field by field by `START`, `RECTSTART` and `INFO` commands. The
//! engine owns the only instance and lends it to the agent.

use std::path::PathBuf;

use crate::constants::{
    CACHE_CAPACITY, CACHE_ENTRY_BYTES, DEFAULT_BOARD_SIZE, DEFAULT_MAX_MEMORY, DEFAULT_TIME_LEFT,
    DEFAULT_TIMEOUT_MATCH, DEFAULT_TIMEOUT_TURN,
};

/// Kind of opponent, from `INFO game_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameType {
    #[default]
    Human,
    Ai,
    Tournament,
    NetworkTournament,
}

impl TryFrom<i32> for GameType {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GameType::Human),
            1 => Ok(GameType::Ai),
            2 => Ok(GameType::Tournament),
            3 => Ok(GameType::NetworkTournament),
            other => Err(other),
        }
    }
}

/// Rule flags, from the `INFO rule` bitfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rules {
    /// Bit 0: only a line of exactly five wins
    pub exactly_five: bool,
    /// Bit 1: continuous game, winning lines are highlighted
    pub continuous: bool,
    /// Bit 2: renju
    pub renju: bool,
}

impl Rules {
    pub fn from_bits(bits: u32) -> Self {
        Self {
            exactly_five: bits & 1 != 0,
            continuous: (bits >> 1) & 1 != 0,
            renju: (bits >> 2) & 1 != 0,
        }
    }

    pub fn bits(&self) -> u32 {
        self.exactly_five as u32 | (self.continuous as u32) << 1 | (self.renju as u32) << 2
    }
}

/// Which setting an `INFO` command changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    TimeoutTurn,
    TimeoutMatch,
    MaxMemory,
    TimeLeft,
    GameType,
    Rule,
    Folder,
    Evaluate,
}

/// All settings the manager can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub board_width: u32,
    pub board_height: u32,
    /// Milliseconds per turn (0 = play as fast as possible)
    pub timeout_turn: u32,
    /// Milliseconds per match (0 = unlimited)
    pub timeout_match: u32,
    /// Bytes of memory allowed (0 = unlimited)
    pub max_memory: u32,
    /// Milliseconds remaining in the match
    pub time_left: u32,
    pub game_type: GameType,
    pub rules: Rules,
    /// Directory for persistent files
    pub folder: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_SIZE,
            board_height: DEFAULT_BOARD_SIZE,
            timeout_turn: DEFAULT_TIMEOUT_TURN,
            timeout_match: DEFAULT_TIMEOUT_MATCH,
            max_memory: DEFAULT_MAX_MEMORY,
            time_left: DEFAULT_TIME_LEFT,
            game_type: GameType::default(),
            rules: Rules::default(),
            folder: PathBuf::new(),
        }
    }
}

impl Config {
    /// Time to spend on the next move, in milliseconds.
    ///
    /// The per-turn limit applies unless a match limit is running and less
    /// time than that is left in the match.
    pub fn turn_budget_ms(&self) -> u32 {
        if self.timeout_match > 0 && self.time_left < self.timeout_turn {
            self.time_left
        } else {
            self.timeout_turn
        }
    }

    /// Number of evaluation cache entries that fit in the memory ceiling.
    pub fn cache_capacity(&self) -> usize {
        if self.max_memory == 0 {
            return CACHE_CAPACITY;
        }
        let fit = self.max_memory as usize / (2 * CACHE_ENTRY_BYTES);
        fit.min(CACHE_CAPACITY)
    }
}
