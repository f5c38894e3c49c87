use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use thiserror::Error;

/// The user backed out of a prompt (Esc). Ends the current operation only.
#[derive(Debug, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Source of the lines the session reads.
pub trait Prompter {
    fn text(&mut self, message: &str) -> Result<String>;

    /// Like [`Prompter::text`], but the input is not echoed.
    fn password(&mut self, message: &str) -> Result<String>;
}

/// Reads from an interactive terminal.
pub struct TerminalPrompter;

fn map_inquire(err: InquireError, what: &str) -> anyhow::Error {
    match err {
        InquireError::OperationCanceled => Cancelled.into(),
        err => anyhow::Error::new(err).context(format!("Failed to read {}", what)),
    }
}

impl Prompter for TerminalPrompter {
    fn text(&mut self, message: &str) -> Result<String> {
        Text::new(message)
            .prompt()
            .map_err(|err| map_inquire(err, &format!("input for '{}'", message.trim())))
    }

    fn password(&mut self, message: &str) -> Result<String> {
        Password::new(message)
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()
            .map_err(|err| map_inquire(err, "password input"))
    }
}

/// Reads plain lines, for when stdin is not a terminal.
///
/// Each prompt is written to `output` before its line is read; passwords
/// are read the same way.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn text(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{} ", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to write prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            bail!("Input closed at '{}'", message.trim());
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn password(&mut self, message: &str) -> Result<String> {
        self.text(message)
    }
}

/// Ask a yes/no question; only `y` (any case) counts as yes.
pub fn confirm(prompter: &mut impl Prompter, message: &str) -> Result<bool> {
    let answer = prompter.text(message)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
pub use scripted::ScriptedPrompter;
