//! Gomoku-Brain: a five-in-a-row brain for Gomocup managers.
//!
//! ## Usage
//!
//! - `gomoku-brain` - Speak the manager protocol on stdin/stdout
//! - `gomoku-brain run --agent random` - Same, with the random agent
//! - `gomoku-brain demo` - Watch the brain play against itself
//!
//! Logs go to stderr; set `RUST_LOG=debug` for search statistics.

use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use gomoku_brain::agent::{self, Agent, AgentError, SharedAgent};
use gomoku_brain::brain::MinimaxAgent;
use gomoku_brain::config::Config;
use gomoku_brain::constants::{AWAY_LIMIT, DEPTH_LIMIT};
use gomoku_brain::engine::Engine;
use gomoku_brain::output::Output;
use gomoku_brain::random::RandomAgent;
use gomoku_brain::search::SearchParams;

/// Gomoku-Brain: a five-in-a-row brain for Gomocup managers
#[derive(Parser)]
#[command(name = "gomoku-brain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Move selection strategy
    #[arg(long, value_enum, default_value_t = AgentKind::Minimax, global = true)]
    agent: AgentKind,

    /// Plies searched below each candidate move
    #[arg(long, default_value_t = DEPTH_LIMIT, global = true)]
    depth: u32,

    /// Ignore cells further than this from the stones played
    #[arg(long, default_value_t = AWAY_LIMIT, global = true)]
    away: usize,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum AgentKind {
    /// Alpha-beta minimax search
    Minimax,
    /// Uniformly random legal moves
    Random,
}

#[derive(Subcommand)]
enum Commands {
    /// Speak the manager protocol on stdin/stdout (default)
    Run,
    /// Let the minimax brain play a game against itself
    Demo {
        /// Board width and height
        #[arg(long, default_value_t = 15)]
        size: u32,
        /// Milliseconds per move
        #[arg(long, default_value_t = 500)]
        turn_ms: u32,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let params = SearchParams {
        depth_limit: cli.depth,
        away_limit: cli.away,
    };

    match cli.command {
        Some(Commands::Demo { size, turn_ms }) => run_demo(size, turn_ms, params),
        Some(Commands::Run) | None => {
            let agent: SharedAgent = match cli.agent {
                AgentKind::Minimax => agent::shared(MinimaxAgent::with_params(params)),
                AgentKind::Random => agent::shared(RandomAgent::new()),
            };
            let mut engine = Engine::new(agent, Output::stdout());
            if io::stdin().is_terminal() {
                engine.greet();
            }
            engine.run(io::stdin().lock())
        }
    }
}

fn run_demo(size: u32, turn_ms: u32, params: SearchParams) -> anyhow::Result<()> {
    println!("Gomoku-Brain: minimax self-play on a {size}x{size} board\n");

    let config = Config {
        board_width: size,
        board_height: size,
        timeout_turn: turn_ms,
        ..Config::default()
    };
    let mut players = [
        MinimaxAgent::with_params(params),
        MinimaxAgent::with_params(params),
    ];
    for player in &mut players {
        player.init(&config).context("cannot start demo game")?;
    }

    let names = ["X", "O"];
    for turn in 0..(size as usize * size as usize) {
        let (me, other) = (turn % 2, 1 - turn % 2);
        let mv = match players[me].select_move() {
            Ok(mv) => mv,
            Err(AgentError::NoMoves) => break,
            Err(e) => return Err(e.into()),
        };
        let wins = players[me]
            .position()
            .is_some_and(|pos| pos.is_winning_move_for(mv.x, mv.y, true));
        players[me].my_move(mv)?;
        players[other].opponent_move(mv)?;
        println!("{:>3}. {} plays {mv}", turn + 1, names[me]);

        if wins {
            print_board(&players[0]);
            println!("{} wins", names[me]);
            return Ok(());
        }
    }

    print_board(&players[0]);
    println!("Draw");
    Ok(())
}

fn print_board(player: &MinimaxAgent) {
    if let Some(pos) = player.position() {
        println!("\n{pos}");
    }
}
