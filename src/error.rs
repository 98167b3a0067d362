use std::io;

use thiserror::Error;

use crate::terminal::TerminalError;

/// Faults that end the shell itself. Failures of a single command never
/// surface here; the dispatcher folds those into `$?` with a diagnostic.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("terminal: {0}")]
    Terminal(#[from] TerminalError),
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
}
