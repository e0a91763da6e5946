//! The `bench` command.

use anyhow::Result;

use super::{Command, CommandContext, CommandOutcome};
use crate::config;
use crate::repl::services::bench::BenchmarkRunner;

/// `bench <file>`: time every query in a file
pub struct BenchCommand;

impl Command for BenchCommand {
    fn name(&self) -> &'static str {
        "bench"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["b"]
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<CommandOutcome> {
        let file = args.trim();
        if file.is_empty() {
            anyhow::bail!("usage: bench <file>");
        }

        let host = ctx.session.host().to_string();
        BenchmarkRunner::new()
            .with_indent(ctx.session.indent())
            .run(
                &mut *ctx.transport,
                &host,
                &config::expand_path(file),
                &mut ctx.out,
            )?;
        Ok(CommandOutcome::Continue)
    }
}
