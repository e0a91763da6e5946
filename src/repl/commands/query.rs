//! The `find` command: run a query with the session's display settings.

use anyhow::Result;
use std::io::Write;

use super::{Command, CommandContext, CommandOutcome};
use crate::repl::utils::envelope::build_query;

/// First match requested by interactive queries
const FIRST_HIT: u32 = 1;

/// `find <query>`: the whole remainder is the query text
pub struct FindCommand;

impl Command for FindCommand {
    fn name(&self) -> &'static str {
        "find"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["f"]
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<CommandOutcome> {
        let query = args.trim();
        if query.is_empty() {
            anyhow::bail!("usage: find <query>");
        }

        let request = build_query(
            query,
            ctx.session.display_all(),
            ctx.session.result_window(),
            FIRST_HIT,
            ctx.session.indent(),
        );
        writeln!(ctx.out, "{request}")?;

        let body = ctx.send(&request)?;
        ctx.deliver(&body)?;
        Ok(CommandOutcome::Continue)
    }
}
