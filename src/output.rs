//! Replies to the manager.
//!
//! Both the command loop and the thinking thread write to the manager, so the
//! writer sits behind a mutex and every reply is written and flushed as one
//! whole line.
//!
//! The engine answers with `OK`, `ERROR`, `UNKNOWN`, moves, the about line
//! and a `MESSAGE` when started from a terminal. [`Output::debug`] and
//! [`Output::suggest`] cover the remaining replies a manager understands, for
//! agents and front ends built on this crate; the engine never sends them.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::position::Move;

/// Clonable handle to the manager's input stream.
#[derive(Clone)]
pub struct Output {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Output {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        let writer: Box<dyn Write + Send> = Box::new(writer);
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Write one line. Failures are logged, not returned: a manager that
    /// stopped listening has nothing left to tell us.
    pub fn send(&self, line: &str) {
        log::trace!(">> {line}");
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
            log::error!("failed to write reply: {e}");
        }
    }

    pub fn ok(&self) {
        self.send("OK");
    }

    pub fn error(&self, msg: impl std::fmt::Display) {
        self.send(&format!("ERROR {msg}"));
    }

    pub fn unknown(&self, msg: impl std::fmt::Display) {
        self.send(&format!("UNKNOWN {msg}"));
    }

    /// Text the manager shows to the user.
    pub fn message(&self, msg: impl std::fmt::Display) {
        self.send(&format!("MESSAGE {msg}"));
    }

    /// Text the manager only shows in its debug log.
    pub fn debug(&self, msg: impl std::fmt::Display) {
        self.send(&format!("DEBUG {msg}"));
    }

    /// Propose a move instead of playing it; the manager may accept or not.
    pub fn suggest(&self, mv: Move) {
        self.send(&format!("SUGGEST {} {}", mv.x, mv.y));
    }

    /// A move of the brain's, in `x,y` form.
    pub fn play(&self, mv: Move) {
        self.send(&mv.to_string());
    }
}

/// In-memory writer whose contents stay readable after being handed to an
/// [`Output`].
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete lines written so far.
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_formats() {
        let buf = SharedBuffer::new();
        let out = Output::new(buf.clone());
        out.ok();
        out.error("not running");
        out.unknown("unknown command: FOO");
        out.message("hello");
        out.debug("depth 2");
        out.suggest(Move::new(3, 4));
        out.play(Move::new(10, 9));
        assert_eq!(
            buf.lines(),
            vec![
                "OK",
                "ERROR not running",
                "UNKNOWN unknown command: FOO",
                "MESSAGE hello",
                "DEBUG depth 2",
                "SUGGEST 3 4",
                "10,9",
            ]
        );
    }

    #[test]
    fn test_clones_share_writer() {
        let buf = SharedBuffer::new();
        let out = Output::new(buf.clone());
        let other = out.clone();
        std::thread::spawn(move || other.ok()).join().unwrap();
        out.ok();
        assert_eq!(buf.lines(), vec!["OK", "OK"]);
    }
}
