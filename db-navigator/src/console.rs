//! Line-oriented console I/O.
//!
//! Workflows talk to the user through a [`Console`] so they can run against
//! stdin/stdout or against in-memory buffers in tests.

use std::fmt;
use std::io::{self, BufRead, IsTerminal, Stdout, StdinLock, Write};

use crossterm::style::ContentStyle;

use crate::board::View;

/// A prompt/answer console over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
    colored: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console on the process's stdin and stdout.
    ///
    /// Colours are enabled when stdout is a terminal.
    pub fn stdio() -> Self {
        let stdout = io::stdout();
        let colored = stdout.is_terminal();
        Self::new(io::stdin().lock(), stdout).with_color(colored)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create an uncoloured console.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            colored: false,
        }
    }

    /// Enable or disable ANSI colours in rendered tables.
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn colored(&self) -> bool {
        self.colored
    }

    /// Print `text` without a newline and read one line of input.
    ///
    /// The answer is returned with surrounding whitespace removed. End of
    /// input is reported as [`io::ErrorKind::UnexpectedEof`].
    pub fn prompt(&mut self, text: &str) -> io::Result<String> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }

        Ok(line.trim().to_string())
    }

    /// Print one line.
    pub fn say(&mut self, line: impl fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Print one line in `style`, or plain when colours are off.
    pub fn say_styled(&mut self, line: &str, style: ContentStyle) -> io::Result<()> {
        if self.colored {
            self.say(style.apply(line))
        } else {
            self.say(line)
        }
    }

    /// Print a table or placeholder.
    pub fn show(&mut self, view: &View) -> io::Result<()> {
        self.output.write_all(view.render(self.colored).as_bytes())?;
        self.output.flush()
    }

    /// Direct access to the output, for full-screen rendering.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    /// Take the reader and writer back.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}
