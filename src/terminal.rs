//! Raw-mode lifecycle for the controlling terminal.
//!
//! The shell owns its own line editing, so canonical input processing and
//! local echo are turned off for the whole session. Restoring the pre-shell
//! attributes on every exit path is the one safety-critical contract here: a
//! shell that leaves the terminal raw leaves it unusable.

use std::io;

use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("failed to read terminal attributes: {0}")]
    GetAttr(#[source] nix::errno::Errno),
    #[error("failed to switch the terminal to raw mode: {0}")]
    SetAttr(#[source] nix::errno::Errno),
}

/// Holds the pre-raw attribute snapshot from the moment of entry until
/// [`RawMode::restore`] consumes it. Dropping the guard restores as well, so
/// early returns and panics still put the terminal back.
pub struct RawMode {
    saved: Option<Termios>,
}

impl RawMode {
    /// Captures the current attributes, then disables canonical input, echo
    /// and keyboard signal generation, reading one byte at a time with no
    /// inter-byte timeout. `ISIG` goes too: Ctrl-C must arrive as byte 0x03
    /// for the line editor to handle, not as `SIGINT`.
    pub fn enter() -> Result<Self, TerminalError> {
        let saved = termios::tcgetattr(io::stdin()).map_err(TerminalError::GetAttr)?;

        let mut raw = saved.clone();
        raw.local_flags
            .remove(LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ISIG);
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;

        termios::tcsetattr(io::stdin(), SetArg::TCSAFLUSH, &raw)
            .map_err(TerminalError::SetAttr)?;
        debug!("terminal switched to raw mode");

        Ok(RawMode { saved: Some(saved) })
    }

    /// Puts the snapshot back. Idempotent: only the first call touches the
    /// terminal. Restoration failure is reported, not propagated; there is
    /// nothing further the shell can do about it.
    pub fn restore(&mut self) {
        if let Some(saved) = self.saved.take() {
            match termios::tcsetattr(io::stdin(), SetArg::TCSAFLUSH, &saved) {
                Ok(()) => debug!("terminal attributes restored"),
                Err(err) => warn!("failed to restore terminal attributes: {err}"),
            }
        }
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        self.restore();
    }
}
