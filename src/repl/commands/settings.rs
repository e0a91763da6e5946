//! Session settings commands: `url`, `display` and `output`.

use anyhow::Result;
use std::io::Write;

use super::{Command, CommandContext, CommandOutcome};
use crate::repl::session::DisplayMode;

/// `url <host:port>`
pub struct UrlCommand;

impl Command for UrlCommand {
    fn name(&self) -> &'static str {
        "url"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["u"]
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<CommandOutcome> {
        let host = args.trim();
        if host.is_empty() {
            writeln!(ctx.out, "url: {}", ctx.session.host())?;
            return Ok(CommandOutcome::Continue);
        }
        ctx.session.set_host(host);
        tracing::info!("Host set to {}", host);
        Ok(CommandOutcome::Continue)
    }
}

/// `display [all|a|summary|s|<window>]...`, applied left to right
pub struct DisplayCommand;

impl Command for DisplayCommand {
    fn name(&self) -> &'static str {
        "display"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["d"]
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<CommandOutcome> {
        let mut tokens = args.split_whitespace().peekable();
        if tokens.peek().is_none() {
            writeln!(
                ctx.out,
                "mode: {}, window: {}, indent: {}",
                ctx.session.display_mode().element(),
                ctx.session.result_window(),
                ctx.session.indent()
            )?;
            return Ok(CommandOutcome::Continue);
        }

        for token in tokens {
            match token {
                "all" | "a" => ctx.session.set_display_mode(DisplayMode::All),
                "summary" | "s" => ctx.session.set_display_mode(DisplayMode::Summary),
                window => ctx.session.set_result_window_str(window)?,
            }
        }
        Ok(CommandOutcome::Continue)
    }
}

/// `output <file>`: send the next response to a file
pub struct OutputCommand;

impl Command for OutputCommand {
    fn name(&self) -> &'static str {
        "output"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["o"]
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<CommandOutcome> {
        let path = args.trim();
        if path.is_empty() {
            anyhow::bail!("usage: output <file>");
        }
        ctx.session.set_output_path(path);
        Ok(CommandOutcome::Continue)
    }
}
