//! Gomoku-Brain: a five-in-a-row brain for the Gomocup manager protocol.
//!
//! This crate provides an alpha-beta minimax player for Gomoku on boards of
//! any size from 5x5 up, together with the line protocol used by Piskvork
//! and other Gomocup managers to drive it.
//!
//! ## Modules
//!
//! - [`constants`] - Default settings, search limits and evaluation weights
//! - [`position`] - Board state, win detection, symmetries and hashing
//! - [`patterns`] - Score table for five-cell windows
//! - [`cache`] - Bounded score cache keyed by position hash
//! - [`search`] - Time-boxed minimax with alpha-beta pruning
//! - [`config`] - Settings received from the manager
//! - [`agent`] - The brain interface and its errors
//! - [`brain`] - The searching agent
//! - [`random`] - An agent playing random legal moves
//! - [`protocol`] - Command grammar and parsing
//! - [`output`] - Replies to the manager
//! - [`scheduler`] - The background thinking thread
//! - [`engine`] - The command loop tying it all together
//!
//! ## Example
//!
//! ```
//! use gomoku_brain::position::Position;
//! use gomoku_brain::search::Solver;
//!
//! // Opponent opened in the center of a 15x15 board
//! let mut pos = Position::new(15, 15);
//! pos.play_as(7, 7, false);
//!
//! // Search for a reply with a 200 ms budget
//! let mut solver = Solver::new(15, 15, 200);
//! let best = solver.find_best_move(&pos).unwrap();
//! assert!(pos.can_play(best.x, best.y));
//! println!("Best move: {best}");
//! ```

pub mod agent;
pub mod brain;
pub mod cache;
pub mod config;
pub mod constants;
pub mod engine;
pub mod output;
pub mod patterns;
pub mod position;
pub mod protocol;
pub mod random;
pub mod scheduler;
pub mod search;
