//! The manager-facing command loop.
//!
//! [`Engine`] reads one command per line, parses it with
//! [`crate::protocol::parse_command`] and applies it to the configuration, the
//! agent or the [`TurnScheduler`]. Commands that call for a move (`BEGIN`,
//! `TURN`, `BOARD`) only wake the thinking thread; the move itself is sent by
//! that thread once the search is done.
//!
//! The agent is locked by the thinking thread for a whole search, so commands
//! the manager may send during one never wait on it: `ABOUT` answers from a
//! copy taken at construction, and `INFO` changes are queued and handed to the
//! agent the next time the command loop locks it.
//!
//! ## Example
//!
//! ```ignore
//! use gomoku_brain::agent;
//! use gomoku_brain::brain::MinimaxAgent;
//! use gomoku_brain::engine::Engine;
//! use gomoku_brain::output::Output;
//!
//! let mut engine = Engine::new(agent::shared(MinimaxAgent::new()), Output::stdout());
//! engine.run(std::io::stdin().lock())?;
//! ```

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError};

use anyhow::Context;

use crate::agent::{Agent, AgentError, SharedAgent};
use crate::config::{Config, GameType, InfoKind, Rules};
use crate::constants::STARTED_DIRECTLY;
use crate::output::Output;
use crate::position::Move;
use crate::protocol::{Command, ParseError, Verb, parse_command};
use crate::scheduler::{State, TurnScheduler};

/// Why a command was rejected.
#[derive(Debug)]
pub enum EngineError {
    Parse(ParseError),
    Agent(AgentError),
    /// The command needs the thinking thread, which has not been started
    NotRunning,
    /// An argument is out of range
    InvalidValue(&'static str),
    /// The thinking thread could not be spawned
    Spawn(io::Error),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Parse(e) => write!(f, "{e}"),
            EngineError::Agent(e) => write!(f, "{e}"),
            EngineError::NotRunning => write!(f, "thinking thread is not running"),
            EngineError::InvalidValue(msg) => write!(f, "{msg}"),
            EngineError::Spawn(e) => write!(f, "failed to start thinking thread: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Parse(e) => Some(e),
            EngineError::Agent(e) => Some(e),
            EngineError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for EngineError {
    fn from(e: ParseError) -> Self {
        EngineError::Parse(e)
    }
}

impl From<AgentError> for EngineError {
    fn from(e: AgentError) -> Self {
        EngineError::Agent(e)
    }
}

/// Protocol engine state.
pub struct Engine {
    agent: SharedAgent,
    /// Settings received from the manager
    config: Config,
    scheduler: TurnScheduler,
    out: Output,
    /// Cleared by `END`
    running: bool,
    about: String,
    /// `INFO` changes the agent has not been told about yet
    pending: Vec<InfoKind>,
}

impl Engine {
    pub fn new(agent: SharedAgent, out: Output) -> Self {
        let about = agent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .about();
        Self {
            agent,
            config: Config::default(),
            scheduler: TurnScheduler::new(),
            out,
            running: true,
            about,
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// False once `END` has been handled.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scheduler_state(&self) -> State {
        self.scheduler.state()
    }

    /// Tell whoever is typing commands by hand that a manager should be
    /// driving the brain.
    pub fn greet(&self) {
        self.out.message(STARTED_DIRECTLY);
    }

    /// Run the command loop until `END` or the end of `input`.
    pub fn run<R: BufRead>(&mut self, input: R) -> anyhow::Result<()> {
        let mut failed = None;
        {
            let mut lines = input
                .lines()
                .map_while(|line| line.map_err(|e| failed = Some(e)).ok());
            while self.running {
                let Some(line) = lines.next() else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                self.execute(&line, &mut lines);
            }
        }

        self.shutdown();
        match failed {
            Some(e) => Err(e).context("failed to read command"),
            None => Ok(()),
        }
    }

    /// Execute one command line and report any failure to the manager.
    ///
    /// `more` supplies the following lines of multi-line commands.
    pub fn execute<I>(&mut self, line: &str, more: &mut I)
    where
        I: Iterator<Item = String>,
    {
        log::trace!("<< {line}");
        let result = parse_command(line, more)
            .map_err(EngineError::from)
            .and_then(|cmd| self.dispatch(&cmd));
        match result {
            Ok(()) => {}
            Err(EngineError::Parse(e @ ParseError::Unknown(_))) => self.out.unknown(e),
            Err(e) => {
                log::debug!("command failed: {e}");
                self.out.error(e);
            }
        }
    }

    fn dispatch(&mut self, cmd: &Command) -> Result<(), EngineError> {
        match cmd.verb {
            Verb::Start => {
                let size = self.board_size(cmd.int(0))?;
                self.config.board_width = size;
                self.config.board_height = size;
                self.start_game(false)
            }

            Verb::RectStart => {
                let width = self.board_size(cmd.int(0))?;
                let height = self.board_size(cmd.int(1))?;
                self.config.board_width = width;
                self.config.board_height = height;
                self.start_game(false)
            }

            Verb::Restart => {
                self.require_running()?;
                self.scheduler.stop();
                self.start_game(true)
            }

            Verb::End => {
                self.shutdown();
                Ok(())
            }

            Verb::Turn => {
                let mv = coordinates(cmd, "move values must be positive")?;
                self.require_running()?;
                self.with_agent(|agent| agent.opponent_move(mv))?;
                self.scheduler.request_turn();
                Ok(())
            }

            Verb::Begin => {
                self.require_running()?;
                self.with_agent(|_| ());
                self.scheduler.request_turn();
                Ok(())
            }

            Verb::Board => {
                self.require_running()?;
                self.with_agent(|agent| load_board(agent, cmd))?;
                self.scheduler.request_turn();
                Ok(())
            }

            Verb::Takeback => {
                let mv = coordinates(cmd, "takeback values must be positive")?;
                self.require_running()?;
                self.with_agent(|agent| agent.takeback(mv))?;
                self.out.ok();
                Ok(())
            }

            Verb::Play => {
                let mv = coordinates(cmd, "move values must be positive")?;
                self.require_running()?;
                self.with_agent(|agent| agent.my_move(mv))?;
                self.out.play(mv);
                Ok(())
            }

            Verb::InfoTimeoutTurn => {
                self.config.timeout_turn = non_negative(cmd);
                self.info_changed(InfoKind::TimeoutTurn);
                Ok(())
            }

            Verb::InfoTimeoutMatch => {
                self.config.timeout_match = non_negative(cmd);
                self.info_changed(InfoKind::TimeoutMatch);
                Ok(())
            }

            Verb::InfoMaxMemory => {
                self.config.max_memory = non_negative(cmd);
                self.info_changed(InfoKind::MaxMemory);
                Ok(())
            }

            Verb::InfoTimeLeft => {
                self.config.time_left = non_negative(cmd);
                self.info_changed(InfoKind::TimeLeft);
                Ok(())
            }

            Verb::InfoGameType => {
                self.config.game_type = GameType::try_from(cmd.int(0).max(0))
                    .map_err(|_| EngineError::InvalidValue("unknown game type"))?;
                self.info_changed(InfoKind::GameType);
                Ok(())
            }

            Verb::InfoRule => {
                self.config.rules = Rules::from_bits(non_negative(cmd));
                self.info_changed(InfoKind::Rule);
                Ok(())
            }

            Verb::InfoFolder => {
                let folder = cmd.args.first().map_or("", |a| a.text());
                self.config.folder = PathBuf::from(folder);
                self.info_changed(InfoKind::Folder);
                Ok(())
            }

            Verb::InfoEvaluate => {
                log::debug!("evaluate request {:?}", cmd.args);
                Ok(())
            }

            Verb::About => {
                self.out.send(&self.about);
                Ok(())
            }
        }
    }

    /// Size argument of `START`/`RECTSTART`. A negative size also stops the
    /// thinking thread.
    fn board_size(&mut self, value: i32) -> Result<u32, EngineError> {
        u32::try_from(value).map_err(|_| {
            self.scheduler.stop();
            EngineError::InvalidValue("board size must be positive")
        })
    }

    /// (Re)initialise the agent and make sure the thinking thread is up.
    fn start_game(&mut self, restart: bool) -> Result<(), EngineError> {
        // The agent reads the whole configuration when it starts
        self.pending.clear();
        let config = self.config.clone();
        let result = self.with_agent(|agent| {
            if restart {
                agent.restart(&config)
            } else {
                agent.init(&config)
            }
        });
        if let Err(e) = result {
            self.scheduler.stop();
            return Err(e.into());
        }
        log::info!(
            "game started on {}x{} board",
            config.board_width,
            config.board_height
        );
        self.out.ok();
        self.scheduler
            .start(Arc::clone(&self.agent), self.out.clone())
            .map_err(EngineError::Spawn)
    }

    fn require_running(&self) -> Result<(), EngineError> {
        if self.scheduler.is_running() {
            Ok(())
        } else {
            Err(EngineError::NotRunning)
        }
    }

    fn info_changed(&mut self, info: InfoKind) {
        if !self.pending.contains(&info) {
            self.pending.push(info);
        }
    }

    /// Lock the agent, bring it up to date with queued `INFO` changes and run
    /// `f` on it.
    fn with_agent<T>(&mut self, f: impl FnOnce(&mut dyn Agent) -> T) -> T {
        let mut agent = self.agent.lock().unwrap_or_else(PoisonError::into_inner);
        for info in self.pending.drain(..) {
            log::debug!("forwarding {info:?} change");
            agent.config_changed(&self.config, info);
        }
        f(&mut **agent)
    }

    /// Stop the thinking thread and release the agent's game.
    fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.scheduler.stop();
        self.with_agent(|agent| agent.end());
        log::info!("game ended");
    }
}

/// First two arguments as a move; `msg` is the error for negative values.
fn coordinates(cmd: &Command, msg: &'static str) -> Result<Move, EngineError> {
    match (usize::try_from(cmd.int(0)), usize::try_from(cmd.int(1))) {
        (Ok(x), Ok(y)) => Ok(Move::new(x, y)),
        _ => Err(EngineError::InvalidValue(msg)),
    }
}

/// First argument, with negative values read as 0.
fn non_negative(cmd: &Command) -> u32 {
    cmd.int(0).max(0).unsigned_abs()
}

/// Owner of a square in a `BOARD` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stone {
    Mine,
    Theirs,
    Blocked,
}

impl Stone {
    fn place(self, agent: &mut dyn Agent, mv: Move) -> Result<(), AgentError> {
        match self {
            Stone::Mine => agent.my_move(mv),
            Stone::Theirs => agent.opponent_move(mv),
            Stone::Blocked => agent.block(mv),
        }
    }

    fn illegal(self, mv: Move) -> AgentError {
        match self {
            Stone::Theirs => AgentError::IllegalOpponentMove(mv),
            Stone::Mine | Stone::Blocked => AgentError::IllegalMove(mv),
        }
    }
}

/// Check every `x,y,type` triple of a `BOARD` command, then apply them all.
///
/// A rejected command leaves the agent as it was.
fn load_board(agent: &mut dyn Agent, cmd: &Command) -> Result<(), EngineError> {
    let mut entries: Vec<(Move, Stone)> = Vec::with_capacity(cmd.args.len() / 3);
    for triple in cmd.args.chunks_exact(3) {
        let (x, y, kind) = (triple[0].int(), triple[1].int(), triple[2].int());
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return Err(EngineError::InvalidValue("move values must be positive"));
        };
        let mv = Move::new(x, y);
        let stone = match kind {
            1 => Stone::Mine,
            2 => Stone::Theirs,
            3 if agent.supports_blocks() => Stone::Blocked,
            3 => return Err(AgentError::Unsupported("blocked squares").into()),
            _ => return Err(EngineError::InvalidValue("unknown board state")),
        };
        if !agent.is_free(mv) || entries.iter().any(|&(seen, _)| seen == mv) {
            return Err(stone.illegal(mv).into());
        }
        entries.push((mv, stone));
    }

    for (i, &(mv, stone)) in entries.iter().enumerate() {
        if let Err(e) = stone.place(agent, mv) {
            for &(placed, _) in entries[..i].iter().rev() {
                if let Err(undo) = agent.takeback(placed) {
                    log::error!("could not undo board entry {placed}: {undo}");
                }
            }
            return Err(e.into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent;
    use crate::output::SharedBuffer;
    use crate::random::RandomAgent;
    use std::sync::Mutex;
    use std::thread;
    use std::time::{Duration, Instant};

    fn engine() -> (Engine, SharedBuffer) {
        let buf = SharedBuffer::new();
        let engine = Engine::new(
            agent::shared(RandomAgent::with_seed(7)),
            Output::new(buf.clone()),
        );
        (engine, buf)
    }

    fn exec(engine: &mut Engine, line: &str) {
        engine.execute(line, &mut std::iter::empty());
    }

    #[test]
    fn test_unknown_command() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "HELLO");
        assert_eq!(buf.lines(), vec!["UNKNOWN unknown command: HELLO"]);
    }

    #[test]
    fn test_parse_error_is_error() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "TURN 1");
        assert_eq!(
            buf.lines(),
            vec!["ERROR invalid argument count for TURN: expected 2, given 1"]
        );
    }

    #[test]
    fn test_requires_running_thread() {
        let (mut engine, buf) = engine();
        for cmd in ["BEGIN", "TURN 1,1", "TAKEBACK 1,1", "PLAY 1,1", "RESTART"] {
            exec(&mut engine, cmd);
        }
        assert!(
            buf.lines()
                .iter()
                .all(|l| l == "ERROR thinking thread is not running")
        );
        assert_eq!(buf.lines().len(), 5);
    }

    #[test]
    fn test_start() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "START 15");
        assert_eq!(buf.lines(), vec!["OK"]);
        assert_eq!(engine.config().board_width, 15);
        assert_eq!(engine.config().board_height, 15);
        assert_eq!(engine.scheduler_state(), State::Armed);
    }

    #[test]
    fn test_start_rejects_bad_sizes() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "START -3");
        exec(&mut engine, "START 4");
        assert_eq!(
            buf.lines(),
            vec![
                "ERROR board size must be positive",
                "ERROR board size must be at least 5x5",
            ]
        );
        assert_eq!(engine.scheduler_state(), State::Idle);
    }

    #[test]
    fn test_rectstart() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "RECTSTART 30,10");
        assert_eq!(buf.lines(), vec!["OK"]);
        assert_eq!(engine.config().board_width, 30);
        assert_eq!(engine.config().board_height, 10);
    }

    #[test]
    fn test_negative_coordinates() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "START 10");
        exec(&mut engine, "TURN -1,2");
        exec(&mut engine, "TAKEBACK 1,-2");
        assert_eq!(
            buf.lines(),
            vec![
                "OK",
                "ERROR move values must be positive",
                "ERROR takeback values must be positive",
            ]
        );
    }

    #[test]
    fn test_info_updates_config() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "INFO timeout_turn 1000");
        exec(&mut engine, "INFO timeout_match -5");
        exec(&mut engine, "INFO max_memory 83886080");
        exec(&mut engine, "INFO time_left 9000");
        exec(&mut engine, "INFO game_type 2");
        exec(&mut engine, "INFO rule 5");
        exec(&mut engine, "INFO folder /tmp/brain");
        exec(&mut engine, "INFO evaluate 3,4");
        assert!(buf.lines().is_empty());

        let config = engine.config();
        assert_eq!(config.timeout_turn, 1000);
        assert_eq!(config.timeout_match, 0);
        assert_eq!(config.max_memory, 83_886_080);
        assert_eq!(config.time_left, 9000);
        assert_eq!(config.game_type, GameType::Tournament);
        assert!(config.rules.exactly_five && !config.rules.continuous && config.rules.renju);
        assert_eq!(config.folder, PathBuf::from("/tmp/brain"));
    }

    #[test]
    fn test_unknown_game_type() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "INFO game_type 4");
        assert_eq!(buf.lines(), vec!["ERROR unknown game type"]);
        assert_eq!(engine.config().game_type, GameType::Human);
    }

    #[test]
    fn test_play_echoes_move() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "START 10");
        exec(&mut engine, "PLAY 3,4");
        exec(&mut engine, "PLAY 3,4");
        assert_eq!(buf.lines(), vec!["OK", "3,4", "ERROR invalid move 3,4"]);
    }

    #[test]
    fn test_takeback() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "START 10");
        exec(&mut engine, "PLAY 3,4");
        exec(&mut engine, "TAKEBACK 3,4");
        exec(&mut engine, "TAKEBACK 3,4");
        assert_eq!(
            buf.lines(),
            vec!["OK", "3,4", "OK", "ERROR invalid takeback 3,4"]
        );
    }

    fn board(engine: &mut Engine, body: &[&str]) {
        let mut lines = body.iter().map(|l| l.to_string());
        engine.execute("BOARD", &mut lines);
    }

    #[test]
    fn test_board_bad_state() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "START 10");
        board(&mut engine, &["2,2,1", "1,1,4", "DONE"]);
        exec(&mut engine, "PLAY 2,2");
        assert_eq!(buf.lines(), vec!["OK", "ERROR unknown board state", "2,2"]);
    }

    #[test]
    fn test_rejected_board_changes_nothing() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "START 10");

        board(&mut engine, &["1,1,1", "-1,2,2", "DONE"]);
        exec(&mut engine, "PLAY 1,1");

        // The same cell twice in one batch
        board(&mut engine, &["2,2,1", "3,3,2", "3,3,1", "DONE"]);
        exec(&mut engine, "PLAY 2,2");
        exec(&mut engine, "PLAY 3,3");

        // Off the board after a good entry
        board(&mut engine, &["4,4,2", "10,4,1", "DONE"]);
        exec(&mut engine, "PLAY 4,4");

        // Onto a stone already placed
        board(&mut engine, &["5,5,1", "1,1,2", "DONE"]);
        exec(&mut engine, "PLAY 5,5");

        assert_eq!(
            buf.lines(),
            vec![
                "OK",
                "ERROR move values must be positive",
                "1,1",
                "ERROR invalid move 3,3",
                "2,2",
                "3,3",
                "ERROR invalid move 10,4",
                "4,4",
                "ERROR invalid opponent move 1,1",
                "5,5",
            ]
        );
        assert_eq!(engine.scheduler_state(), State::Armed);
    }

    #[test]
    fn test_board_bad_line_is_one_error() {
        let (mut engine, buf) = engine();
        let input = "START 10\nBOARD\n1,1\n2,2,1\nDONE\nPLAY 2,2\n";
        engine.run(input.as_bytes()).unwrap();
        assert_eq!(
            buf.lines(),
            vec![
                "OK",
                "ERROR invalid argument count for BOARD: expected 3, given 2",
                "2,2",
            ]
        );
    }

    /// Spends a while on every move and records the settings it is told about.
    struct SlowAgent {
        changes: Arc<Mutex<Vec<InfoKind>>>,
    }

    impl Agent for SlowAgent {
        fn about(&self) -> String {
            "slow".to_string()
        }

        fn init(&mut self, _config: &Config) -> Result<(), AgentError> {
            Ok(())
        }

        fn config_changed(&mut self, _config: &Config, info: InfoKind) {
            self.changes.lock().unwrap().push(info);
        }

        fn select_move(&mut self) -> Result<Move, AgentError> {
            thread::sleep(Duration::from_millis(500));
            Ok(Move::new(4, 4))
        }

        fn my_move(&mut self, _mv: Move) -> Result<(), AgentError> {
            Ok(())
        }

        fn opponent_move(&mut self, _mv: Move) -> Result<(), AgentError> {
            Ok(())
        }

        fn is_free(&self, _mv: Move) -> bool {
            true
        }

        fn takeback(&mut self, _mv: Move) -> Result<(), AgentError> {
            Ok(())
        }
    }

    fn slow_engine() -> (Engine, SharedBuffer, Arc<Mutex<Vec<InfoKind>>>) {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let buf = SharedBuffer::new();
        let agent = SlowAgent {
            changes: Arc::clone(&changes),
        };
        let engine = Engine::new(agent::shared(agent), Output::new(buf.clone()));
        (engine, buf, changes)
    }

    fn wait_until(done: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_answers_while_computing() {
        let (mut engine, buf, changes) = slow_engine();
        exec(&mut engine, "START 10");
        exec(&mut engine, "BEGIN");
        wait_until(|| engine.scheduler_state() == State::Computing);
        assert_eq!(engine.scheduler_state(), State::Computing);

        let asked = Instant::now();
        exec(&mut engine, "ABOUT");
        exec(&mut engine, "INFO timeout_turn 700");
        exec(&mut engine, "INFO evaluate 1,1");
        assert!(asked.elapsed() < Duration::from_millis(200));
        assert_eq!(buf.lines(), vec!["OK", "slow"]);
        assert_eq!(engine.scheduler_state(), State::Computing);

        wait_until(|| buf.lines().len() == 3);
        assert_eq!(buf.lines(), vec!["OK", "slow", "4,4"]);
        assert!(changes.lock().unwrap().is_empty());
        exec(&mut engine, "END");
    }

    #[test]
    fn test_info_reaches_agent_before_next_turn() {
        let (mut engine, buf, changes) = slow_engine();
        exec(&mut engine, "INFO rule 1");
        exec(&mut engine, "START 10");
        // Already part of the configuration the agent started with
        assert!(changes.lock().unwrap().is_empty());

        exec(&mut engine, "INFO timeout_turn 700");
        exec(&mut engine, "INFO max_memory 1000000");
        exec(&mut engine, "INFO timeout_turn 800");
        exec(&mut engine, "INFO evaluate 2,2");
        assert!(changes.lock().unwrap().is_empty());

        exec(&mut engine, "TURN 1,1");
        assert_eq!(
            *changes.lock().unwrap(),
            vec![InfoKind::TimeoutTurn, InfoKind::MaxMemory]
        );
        assert_eq!(engine.config().timeout_turn, 800);

        wait_until(|| buf.lines().len() == 2);
        exec(&mut engine, "INFO time_left 100");
        exec(&mut engine, "BEGIN");
        assert_eq!(changes.lock().unwrap().last(), Some(&InfoKind::TimeLeft));
        wait_until(|| buf.lines().len() == 3);
        exec(&mut engine, "END");
        assert_eq!(buf.lines(), vec!["OK", "4,4", "4,4"]);
    }

    #[test]
    fn test_greet() {
        let (engine, buf) = engine();
        engine.greet();
        let lines = buf.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("MESSAGE Gomoku brains are not meant"));
        assert_eq!(engine.scheduler_state(), State::Idle);
    }

    #[test]
    fn test_end_stops_everything() {
        let (mut engine, buf) = engine();
        exec(&mut engine, "START 10");
        exec(&mut engine, "END");
        assert!(!engine.is_running());
        assert_eq!(engine.scheduler_state(), State::Idle);
        assert_eq!(buf.lines(), vec!["OK"]);
    }

    #[test]
    fn test_run_stops_at_end() {
        let (mut engine, buf) = engine();
        let input = "START 10\n\nABOUT\nEND\nSTART 12\n";
        engine.run(input.as_bytes()).unwrap();
        let lines = buf.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "OK");
        assert!(lines[1].starts_with("name=\"gomoku-brain-random\""));
        assert_eq!(engine.config().board_width, 10);
    }

    #[test]
    fn test_run_stops_at_eof() {
        let (mut engine, _buf) = engine();
        engine.run("START 10\n".as_bytes()).unwrap();
        assert!(!engine.is_running());
        assert_eq!(engine.scheduler_state(), State::Idle);
    }
}
