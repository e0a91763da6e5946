//! # Interactive Commands
//!
//! Every command the interpreter understands implements [`Command`]. A
//! command receives the session and the unparsed remainder of its input
//! line, and decides itself how to split that remainder.

use anyhow::{Context, Result};
use std::io::Write;

use crate::config;
use crate::repl::services::http::Transport;
use crate::repl::session::SessionState;
use crate::repl::utils::{envelope::RequestEnvelope, response::interpret_response};

pub mod app;
pub mod bench;
pub mod document;
pub mod query;
pub mod registry;
pub mod settings;

pub use app::{HelpCommand, QuitCommand};
pub use bench::BenchCommand;
pub use document::{GetCommand, ParseCommand, RemoveCommand};
pub use query::FindCommand;
pub use registry::CommandRegistry;
pub use settings::{DisplayCommand, OutputCommand, UrlCommand};

/// What the interpreter does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

/// Everything a command may touch while it runs
pub struct CommandContext<'a> {
    pub session: &'a mut SessionState,
    pub transport: &'a mut dyn Transport,
    pub out: &'a mut dyn Write,
}

/// Trait for interactive commands
pub trait Command {
    /// Canonical command name
    fn name(&self) -> &'static str;

    /// Short forms accepted in place of the name
    fn aliases(&self) -> &'static [&'static str];

    /// Execute the command with the rest of the input line
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<CommandOutcome>;
}

impl CommandContext<'_> {
    /// Send `request` to the session host and return the body of a
    /// successful response.
    pub fn send(&mut self, request: &RequestEnvelope) -> Result<String> {
        let host = self.session.host().to_string();
        let response = self.transport.send(&host, request)?;
        Ok(interpret_response(response)?)
    }

    /// Print a response body, or write it to the pending output file.
    pub fn deliver(&mut self, body: &str) -> Result<()> {
        match self.session.take_output_path() {
            Some(path) => {
                let path = config::expand_path(&path);
                std::fs::write(&path, body)
                    .with_context(|| format!("cannot write response to '{path}'"))?;
                tracing::info!("Wrote {} bytes to '{}'", body.len(), path);
                writeln!(self.out, "wrote {} bytes to {}", body.len(), path)?;
            }
            None => writeln!(self.out, "{body}")?,
        }
        Ok(())
    }
}

/// Split `args` into its first word and the rest, both trimmed
pub(crate) fn split_first_word(args: &str) -> (&str, Option<&str>) {
    let args = args.trim();
    match args.split_once(char::is_whitespace) {
        Some((first, rest)) => {
            let rest = rest.trim();
            (first, (!rest.is_empty()).then_some(rest))
        }
        None => (args, None),
    }
}
