//! The background thinking thread.
//!
//! A [`TurnScheduler`] owns at most one worker thread. The worker announces
//! itself on a ready channel, then waits on a single-slot turn channel; every
//! turn request makes it select a move, play it on the agent and send it to
//! the manager. Stopping clears the keep-running flag, drops the turn sender so
//! the worker's wait ends, and joins the thread.
//!
//! ```text
//!   Idle --start--> Armed --request_turn--> Computing --move sent--> Armed
//!     ^               |                         |
//!     +-----stop------+----------stop-----------+  (after the search returns)
//! ```

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, PoisonError};
use std::thread::{self, JoinHandle};

use crate::agent::SharedAgent;
use crate::output::Output;

/// What the scheduler is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No worker thread
    Idle,
    /// Worker waiting for a turn request
    Armed,
    /// Worker selecting a move
    Computing,
}

/// Handle to the running worker.
struct Worker {
    turns: SyncSender<()>,
    keep_running: Arc<AtomicBool>,
    computing: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Runs the agent's move selection off the command loop.
#[derive(Default)]
pub struct TurnScheduler {
    worker: Option<Worker>,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the worker and wait until it is listening.
    ///
    /// Does nothing if a worker already exists.
    pub fn start(&mut self, agent: SharedAgent, out: Output) -> io::Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let (turns, turn_rx) = mpsc::sync_channel(1);
        let (ready_tx, ready_rx) = mpsc::channel();
        let keep_running = Arc::new(AtomicBool::new(true));
        let computing = Arc::new(AtomicBool::new(false));

        let handle = {
            let keep_running = Arc::clone(&keep_running);
            let computing = Arc::clone(&computing);
            thread::Builder::new()
                .name("think".to_string())
                .spawn(move || {
                    // The receiver only disappears if start() already gave up.
                    let _ = ready_tx.send(());
                    think_loop(&agent, &out, &turn_rx, &keep_running, &computing);
                })?
        };

        ready_rx
            .recv()
            .map_err(|_| io::Error::other("thinking thread exited before starting"))?;
        log::info!("thinking thread started");

        self.worker = Some(Worker {
            turns,
            keep_running,
            computing,
            handle,
        });
        Ok(())
    }

    /// Ask the worker for one move.
    ///
    /// Returns false if no worker is running. A request made while another is
    /// still pending is dropped.
    pub fn request_turn(&self) -> bool {
        let Some(worker) = &self.worker else {
            return false;
        };
        match worker.turns.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                log::warn!("turn already requested, ignoring");
                true
            }
            Err(TrySendError::Disconnected(())) => false,
        }
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// A search in progress runs to completion first.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.keep_running.store(false, Ordering::SeqCst);
        drop(worker.turns);
        if worker.handle.join().is_err() {
            log::error!("thinking thread panicked");
        }
        log::info!("thinking thread stopped");
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn state(&self) -> State {
        match &self.worker {
            None => State::Idle,
            Some(w) if w.computing.load(Ordering::SeqCst) => State::Computing,
            Some(_) => State::Armed,
        }
    }
}

impl Drop for TurnScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn think_loop(
    agent: &SharedAgent,
    out: &Output,
    turns: &Receiver<()>,
    keep_running: &AtomicBool,
    computing: &AtomicBool,
) {
    while turns.recv().is_ok() {
        if !keep_running.load(Ordering::SeqCst) {
            break;
        }
        computing.store(true, Ordering::SeqCst);
        play_turn(agent, out);
        computing.store(false, Ordering::SeqCst);
    }
}

/// Select a move, record it and send it.
fn play_turn(agent: &SharedAgent, out: &Output) {
    let mut agent = agent.lock().unwrap_or_else(PoisonError::into_inner);
    let result = agent.select_move().and_then(|mv| {
        agent.my_move(mv)?;
        Ok(mv)
    });
    match result {
        Ok(mv) => {
            log::debug!("playing {mv}");
            out.play(mv);
        }
        Err(e) => out.error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{self, Agent, AgentError};
    use crate::config::Config;
    use crate::output::SharedBuffer;
    use crate::position::Move;
    use std::time::{Duration, Instant};

    /// Plays along the first row, failing once the row is full.
    struct RowAgent {
        next: usize,
    }

    impl Agent for RowAgent {
        fn about(&self) -> String {
            "row".to_string()
        }

        fn init(&mut self, _config: &Config) -> Result<(), AgentError> {
            Ok(())
        }

        fn select_move(&mut self) -> Result<Move, AgentError> {
            if self.next < 3 {
                Ok(Move::new(self.next, 0))
            } else {
                Err(AgentError::NoMoves)
            }
        }

        fn my_move(&mut self, _mv: Move) -> Result<(), AgentError> {
            self.next += 1;
            Ok(())
        }

        fn opponent_move(&mut self, _mv: Move) -> Result<(), AgentError> {
            Ok(())
        }

        fn is_free(&self, mv: Move) -> bool {
            mv.y == 0 && mv.x >= self.next
        }

        fn takeback(&mut self, _mv: Move) -> Result<(), AgentError> {
            Ok(())
        }
    }

    fn wait_for_lines(buf: &SharedBuffer, n: usize) -> Vec<String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while buf.lines().len() < n && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        buf.lines()
    }

    fn started() -> (TurnScheduler, SharedBuffer) {
        let buf = SharedBuffer::new();
        let mut scheduler = TurnScheduler::new();
        scheduler
            .start(agent::shared(RowAgent { next: 0 }), Output::new(buf.clone()))
            .unwrap();
        (scheduler, buf)
    }

    #[test]
    fn test_idle_until_started() {
        let mut scheduler = TurnScheduler::new();
        assert_eq!(scheduler.state(), State::Idle);
        assert!(!scheduler.request_turn());
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_one_move_per_request() {
        let (mut scheduler, buf) = started();
        assert!(scheduler.is_running());

        assert!(scheduler.request_turn());
        assert_eq!(wait_for_lines(&buf, 1), vec!["0,0"]);
        assert!(scheduler.request_turn());
        assert_eq!(wait_for_lines(&buf, 2), vec!["0,0", "1,0"]);

        scheduler.stop();
        assert_eq!(scheduler.state(), State::Idle);
        assert_eq!(buf.lines().len(), 2);
    }

    #[test]
    fn test_agent_error_is_reported() {
        let (mut scheduler, buf) = started();
        for n in 1..=4 {
            scheduler.request_turn();
            wait_for_lines(&buf, n);
        }
        assert_eq!(buf.lines()[3], "ERROR no move left to play");
        scheduler.stop();
    }

    #[test]
    fn test_start_twice_keeps_worker() {
        let (mut scheduler, buf) = started();
        scheduler
            .start(agent::shared(RowAgent { next: 2 }), Output::new(buf.clone()))
            .unwrap();
        scheduler.request_turn();
        // Still the first agent
        assert_eq!(wait_for_lines(&buf, 1), vec!["0,0"]);
        scheduler.stop();
    }

    #[test]
    fn test_restart_after_stop() {
        let (mut scheduler, buf) = started();
        scheduler.stop();
        scheduler
            .start(agent::shared(RowAgent { next: 2 }), Output::new(buf.clone()))
            .unwrap();
        assert_eq!(scheduler.state(), State::Armed);
        scheduler.request_turn();
        assert_eq!(wait_for_lines(&buf, 1), vec!["2,0"]);
    }

    #[test]
    fn test_computing_while_searching() {
        /// Takes a while over every move.
        struct SlowAgent;

        impl Agent for SlowAgent {
            fn about(&self) -> String {
                "slow".to_string()
            }

            fn init(&mut self, _config: &Config) -> Result<(), AgentError> {
                Ok(())
            }

            fn select_move(&mut self) -> Result<Move, AgentError> {
                thread::sleep(Duration::from_millis(300));
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

        fn wait_for_state(scheduler: &TurnScheduler, state: State) -> bool {
            let deadline = Instant::now() + Duration::from_secs(5);
            while scheduler.state() != state && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(1));
            }
            scheduler.state() == state
        }

        let buf = SharedBuffer::new();
        let mut scheduler = TurnScheduler::new();
        scheduler
            .start(agent::shared(SlowAgent), Output::new(buf.clone()))
            .unwrap();
        assert_eq!(scheduler.state(), State::Armed);

        assert!(scheduler.request_turn());
        assert!(wait_for_state(&scheduler, State::Computing));
        assert!(buf.lines().is_empty());

        assert_eq!(wait_for_lines(&buf, 1), vec!["4,4"]);
        assert!(wait_for_state(&scheduler, State::Armed));
        scheduler.stop();
        assert_eq!(scheduler.state(), State::Idle);
    }
}
