//! Command dispatch: builtin lookup, external launch, error conversion.

use std::ffi::NulError;
use std::io;

use thiserror::Error;
use tracing::debug;

use crate::context::ShellContext;
use crate::lexer::{Token, TokenKind};

use super::builtins::Builtins;
use super::spawn;

pub type ExecStatus = Result<ExecOutcome, ExecError>;

/// What a dispatched command asks of the main loop.
#[derive(Debug, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Finished command: optional text for stdout plus the status for `$?`.
    Completed {
        output: Option<String>,
        status: i32,
    },
    /// `exit [n]`: leave the loop and end the process with this code.
    Exit { code: i32 },
}

impl ExecOutcome {
    pub fn completed(status: i32) -> Self {
        ExecOutcome::Completed {
            output: None,
            status,
        }
    }

    pub fn with_output(output: impl Into<String>, status: i32) -> Self {
        ExecOutcome::Completed {
            output: Some(output.into()),
            status,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{0}: command not found")]
    CommandNotFound(String),
    #[error("{0}")]
    Usage(String),
    #[error("cd: {path}: {source}")]
    Chdir {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] io::Error),
    #[error("failed to fork: {0}")]
    Fork(#[source] nix::errno::Errno),
    #[error("wait for child failed: {0}")]
    Wait(#[source] nix::errno::Errno),
    #[error("environment entry contains a NUL byte")]
    NulByte(#[from] NulError),
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl ExecError {
    /// Status recorded in `$?` when this error reaches the dispatch boundary.
    pub fn status(&self) -> i32 {
        match self {
            ExecError::CommandNotFound(_) => 127,
            ExecError::Usage(_) => 2,
            _ => 1,
        }
    }
}

pub struct Dispatcher {
    builtins: Builtins,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher {
            builtins: Builtins::new(),
        }
    }

    /// Runs one tokenized line. The first non-empty token is the command
    /// name; builtins take fixed precedence over external programs. Operator
    /// tokens have no execution semantics and ride along as plain arguments.
    ///
    /// This is the error boundary: every `ExecError` becomes one diagnostic
    /// line on stderr plus a status, and the loop above never sees a failure.
    pub fn dispatch(&self, tokens: &[Token], ctx: &mut ShellContext) -> ExecOutcome {
        let argv: Vec<String> = tokens
            .iter()
            .filter(|token| token.kind != TokenKind::Eof && !token.text.is_empty())
            .map(|token| token.text.clone())
            .collect();

        let Some((name, args)) = argv.split_first() else {
            return ExecOutcome::completed(0);
        };

        let result = if self.builtins.contains(name) {
            debug!(command = %name, "running builtin");
            self.builtins.run(name, args, ctx)
        } else {
            spawn::run_external(&argv, &ctx.env).map(ExecOutcome::completed)
        };

        result.unwrap_or_else(|err| {
            eprintln!("rawsh: {err}");
            ExecOutcome::completed(err.status())
        })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_empty_token_list_is_status_zero() {
        let dispatcher = Dispatcher::new();
        let mut ctx = ShellContext::default();
        let outcome = dispatcher.dispatch(&tokenize(""), &mut ctx);
        assert_eq!(outcome, ExecOutcome::completed(0));
    }

    #[test]
    fn test_builtin_takes_precedence_over_externals() {
        // The builtin returns its output as data; an external `echo` would
        // have written to the real stdout and produced no output here.
        let dispatcher = Dispatcher::new();
        let mut ctx = ShellContext::default();
        let outcome = dispatcher.dispatch(&tokenize("echo hi there"), &mut ctx);
        assert_eq!(outcome, ExecOutcome::with_output("hi there", 0));
    }

    #[test]
    fn test_unknown_command_reports_127() {
        let dispatcher = Dispatcher::new();
        // Empty environment: nothing on PATH to resolve against.
        let mut ctx = ShellContext::default();
        let outcome = dispatcher.dispatch(&tokenize("no-such-command-zzz"), &mut ctx);
        assert_eq!(outcome, ExecOutcome::completed(127));
    }

    #[test]
    fn test_operator_tokens_ride_along_as_arguments() {
        // Pipes have no execution semantics; they reach the command as text.
        let dispatcher = Dispatcher::new();
        let mut ctx = ShellContext::default();
        let outcome = dispatcher.dispatch(&tokenize("echo a | b"), &mut ctx);
        assert_eq!(outcome, ExecOutcome::with_output("a | b", 0));
    }

    #[test]
    fn test_tokens_expanding_to_nothing_leave_an_empty_line() {
        // A lone unset `$VAR` expands to an empty word, which dispatch drops.
        let dispatcher = Dispatcher::new();
        let mut ctx = ShellContext::default();
        let tokens = vec![
            Token::new(TokenKind::Word, ""),
            Token::new(TokenKind::Eof, ""),
        ];
        assert_eq!(
            dispatcher.dispatch(&tokens, &mut ctx),
            ExecOutcome::completed(0)
        );
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(ExecError::CommandNotFound("x".into()).status(), 127);
        assert_eq!(ExecError::Usage("u".into()).status(), 2);
        assert_eq!(
            ExecError::CurrentDir(io::Error::from(io::ErrorKind::NotFound)).status(),
            1
        );
    }
}
