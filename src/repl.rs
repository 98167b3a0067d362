//! The interactive read-tokenize-expand-dispatch loop.

use tracing::debug;

use crate::context::ShellContext;
use crate::editor::{LineEditor, LineEvent};
use crate::error::ShellError;
use crate::executor::{Dispatcher, ExecOutcome};
use crate::expander;
use crate::lexer::{self, Token};
use crate::prompt::ShellPrompt;
use crate::terminal::RawMode;

pub struct Repl {
    ctx: ShellContext,
    editor: LineEditor,
    prompt: ShellPrompt,
    dispatcher: Dispatcher,
}

impl Repl {
    pub fn new() -> Self {
        Repl {
            ctx: ShellContext::new(),
            editor: LineEditor::new(),
            prompt: ShellPrompt::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Runs the interactive session and yields the process exit code.
    ///
    /// Failing to enter raw mode at startup is fatal: the shell cannot edit
    /// lines on a terminal in an unknown mode. Every way out of the loop
    /// (`exit`, Ctrl-D, end of input) passes through the restore below, and
    /// the guard's `Drop` covers unwinding.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        let mut term = RawMode::enter()?;
        let code = self.read_eval_loop();
        term.restore();
        Ok(code)
    }

    fn read_eval_loop(&mut self) -> i32 {
        loop {
            let prompt = self.prompt.render(&self.ctx.env);
            match self.editor.read_line(&prompt) {
                LineEvent::Submitted(line) => {
                    if let ExecOutcome::Exit { code } = self.execute_line(&line) {
                        return code;
                    }
                }
                LineEvent::EndOfInput => return 0,
            }
        }
    }

    /// One trip through the pipeline: tokenize, expand word tokens, dispatch,
    /// print any returned output, record status and history.
    pub fn execute_line(&mut self, line: &str) -> ExecOutcome {
        let tokens: Vec<Token> = lexer::tokenize(line)
            .into_iter()
            .map(|mut token| {
                if token.is_word() {
                    token.text = expander::expand(&token.text, &self.ctx.env);
                }
                token
            })
            .collect();

        let outcome = self.dispatcher.dispatch(&tokens, &mut self.ctx);
        if let ExecOutcome::Completed { output, status } = &outcome {
            if let Some(text) = output {
                println!("{text}");
            }
            self.ctx.set_status(*status);
            debug!(status = *status, "command finished");
        }
        self.ctx.history.add(line);
        outcome
    }

    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }
}

impl Default for Repl {
    fn default() -> Self {
        Repl::new()
    }
}
