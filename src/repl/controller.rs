//! # REPL Controller
//!
//! Reads one line at a time, splits it into a command name and the rest of
//! the line, and runs the matching command against the session. A failing
//! or unknown command prints a diagnostic and the loop carries on; only
//! `quit` or end of input stops it.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::repl::commands::{CommandContext, CommandOutcome, CommandRegistry};
use crate::repl::services::http::Transport;
use crate::repl::session::SessionState;

/// Prompt shown before each command when input is a terminal
pub const PROMPT: &str = "exist> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplState {
    Running,
    Terminated,
}

pub struct ReplController<T: Transport> {
    session: SessionState,
    registry: CommandRegistry,
    transport: T,
    state: ReplState,
}

impl<T: Transport> ReplController<T> {
    pub fn new(session: SessionState, transport: T) -> Self {
        Self {
            session,
            registry: CommandRegistry::new(),
            transport,
            state: ReplState::Running,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn state(&self) -> ReplState {
        self.state
    }

    /// Run until `quit` or end of input. A line that is not UTF-8 is
    /// reported and skipped.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W, prompt: bool) -> Result<()> {
        let mut buf = Vec::new();
        while self.state == ReplState::Running {
            if prompt {
                write!(out, "{PROMPT}")?;
                out.flush()?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                tracing::debug!("End of input");
                self.state = ReplState::Terminated;
                break;
            }

            match std::str::from_utf8(&buf) {
                Ok(line) => {
                    self.dispatch_line(line, out)?;
                }
                Err(e) => {
                    tracing::debug!("Skipping undecodable input line: {}", e);
                    writeln!(out, "error: input line is not valid UTF-8")?;
                }
            }
        }
        Ok(())
    }

    /// Handle one input line. Only an I/O error on `out` is returned; command
    /// failures are reported on `out` and leave the session running.
    pub fn dispatch_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<ReplState> {
        let Some((name, args)) = split_command(line) else {
            return Ok(self.state);
        };

        let Some(command) = self.registry.find(name) else {
            writeln!(out, "unknown command: {name} (type 'help' for a list)")?;
            return Ok(self.state);
        };

        tracing::debug!("Dispatching '{}' with args '{}'", command.name(), args);
        let mut ctx = CommandContext {
            session: &mut self.session,
            transport: &mut self.transport,
            out: &mut *out,
        };

        match command.execute(&mut ctx, args) {
            Ok(CommandOutcome::Continue) => {}
            Ok(CommandOutcome::Quit) => self.state = ReplState::Terminated,
            Err(e) => {
                tracing::debug!("Command '{}' failed: {:#}", command.name(), e);
                writeln!(out, "error: {e:#}")?;
            }
        }
        Ok(self.state)
    }
}

/// Split a line into the command token and the untouched remainder.
/// Blank lines yield `None`.
pub fn split_command(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (line, ""),
    })
}
