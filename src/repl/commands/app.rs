//! Application commands: `help` and `quit`.

use anyhow::Result;
use std::io::Write;

use super::{Command, CommandContext, CommandOutcome};

pub const HELP_TEXT: &str = "\
find | f <query>                 run a query with the current display settings
get | g <document> [collection]  print a document
remove | r <document>            remove a document
parse | p <file> [collection]    store a local file, optionally below a collection
bench | b <file>                 run every query in a file and print timings
url | u [host:port]              show or set the repository address
display | d [all|a|summary|s|<n>]...
                                 show or set display mode and result window
output | o <file>                write the next response to a file
help | h | ?                     show this text
quit | q                         leave the client

Ctrl-C cancels a running request. Use quit or Ctrl-D to exit.";

pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["?", "h"]
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &str) -> Result<CommandOutcome> {
        writeln!(ctx.out, "{HELP_TEXT}")?;
        Ok(CommandOutcome::Continue)
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    fn name(&self) -> &'static str {
        "quit"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["q"]
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, _args: &str) -> Result<CommandOutcome> {
        Ok(CommandOutcome::Quit)
    }
}
