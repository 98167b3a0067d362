//! Byte-at-a-time line editor for the raw-mode terminal.
//!
//! The terminal does no editing of its own in raw mode, so every keystroke
//! lands here: printable bytes are echoed and buffered, a small set of
//! control bytes edit the buffer, and newline hands the assembled line back
//! to the caller.

use std::io::{self, Read, Write};

use tracing::warn;

const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const CTRL_H: u8 = 0x08;
const CTRL_T: u8 = 0x14;
const CTRL_U: u8 = 0x15;
const BACKSPACE: u8 = 0x7f;

/// Move back, blank the cell, move back again.
const ERASE: &[u8] = b"\x08 \x08";

#[derive(Debug, PartialEq, Eq)]
pub enum LineEvent {
    Submitted(String),
    EndOfInput,
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Pending,
    Submit(String),
    Eof,
}

#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: Vec<u8>,
}

impl LineEditor {
    pub fn new() -> Self {
        LineEditor { buffer: Vec::new() }
    }

    /// Draws the prompt and consumes bytes until a line is submitted or
    /// input ends. A read returning zero bytes, or any read/write failure,
    /// ends input; the caller restores the terminal and shuts down.
    pub fn read_line(&mut self, prompt: &str) -> LineEvent {
        let mut stdin = io::stdin().lock();
        let mut stdout = io::stdout().lock();

        if let Err(err) = stdout
            .write_all(prompt.as_bytes())
            .and_then(|_| stdout.flush())
        {
            warn!("terminal write failed: {err}");
            return LineEvent::EndOfInput;
        }

        let mut byte = [0u8; 1];
        loop {
            match stdin.read(&mut byte) {
                Ok(0) => return LineEvent::EndOfInput,
                Ok(_) => match self.apply(byte[0], prompt, &mut stdout) {
                    Ok(Step::Pending) => {}
                    Ok(Step::Submit(line)) => return LineEvent::Submitted(line),
                    Ok(Step::Eof) => return LineEvent::EndOfInput,
                    Err(err) => {
                        warn!("terminal write failed: {err}");
                        return LineEvent::EndOfInput;
                    }
                },
                // Retry reads interrupted by signal delivery.
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    warn!("read from terminal failed: {err}");
                    return LineEvent::EndOfInput;
                }
            }
        }
    }

    fn apply(&mut self, byte: u8, prompt: &str, out: &mut impl Write) -> io::Result<Step> {
        match byte {
            b'\n' => {
                out.write_all(b"\n")?;
                out.flush()?;
                let line = String::from_utf8_lossy(&self.buffer).into_owned();
                self.buffer.clear();
                Ok(Step::Submit(line))
            }
            BACKSPACE | CTRL_H => {
                if self.buffer.pop().is_some() {
                    out.write_all(ERASE)?;
                    out.flush()?;
                }
                Ok(Step::Pending)
            }
            CTRL_C => {
                self.buffer.clear();
                out.write_all(b"\n^C\n")?;
                out.write_all(prompt.as_bytes())?;
                out.flush()?;
                Ok(Step::Pending)
            }
            CTRL_D => {
                if self.buffer.is_empty() {
                    out.write_all(b"\n")?;
                    out.flush()?;
                    Ok(Step::Eof)
                } else {
                    // Reserved for EOF-forwarding once children can read
                    // from the shell; today a non-empty buffer ignores it.
                    Ok(Step::Pending)
                }
            }
            CTRL_T => {
                let n = self.buffer.len();
                if n >= 2 {
                    self.buffer.swap(n - 2, n - 1);
                    out.write_all(b"\x08\x08")?;
                    out.write_all(&[self.buffer[n - 2], self.buffer[n - 1]])?;
                    out.flush()?;
                }
                Ok(Step::Pending)
            }
            CTRL_U => {
                while self.buffer.pop().is_some() {
                    out.write_all(ERASE)?;
                }
                out.flush()?;
                Ok(Step::Pending)
            }
            other => {
                self.buffer.push(other);
                out.write_all(&[other])?;
                out.flush()?;
                Ok(Step::Pending)
            }
        }
    }
}
