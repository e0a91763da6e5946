//! Document commands: `get`, `remove` and `parse` (store).

use anyhow::{Context, Result};
use std::io::Write;

use super::{split_first_word, Command, CommandContext, CommandOutcome};
use crate::config;
use crate::repl::utils::envelope::{build_get, build_remove, build_store, store_target};

/// `get <document> [collection]`
pub struct GetCommand;

impl Command for GetCommand {
    fn name(&self) -> &'static str {
        "get"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["g"]
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<CommandOutcome> {
        let mut tokens = args.split_whitespace();
        let Some(document) = tokens.next() else {
            anyhow::bail!("usage: get <document> [collection]");
        };
        let collection = tokens.next();

        let request = build_get(document, collection, ctx.session.indent());
        let body = ctx.send(&request)?;
        ctx.deliver(&body)?;
        Ok(CommandOutcome::Continue)
    }
}

/// `remove <document>`
pub struct RemoveCommand;

impl Command for RemoveCommand {
    fn name(&self) -> &'static str {
        "remove"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["r"]
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<CommandOutcome> {
        let document = args.trim();
        if document.is_empty() {
            anyhow::bail!("usage: remove <document>");
        }

        let request = build_remove(document);
        writeln!(ctx.out, "{request}")?;
        let body = ctx.send(&request)?;
        writeln!(ctx.out, "{body}")?;
        Ok(CommandOutcome::Continue)
    }
}

/// `parse <file> [collection]`: store a local file in the repository
pub struct ParseCommand;

impl Command for ParseCommand {
    fn name(&self) -> &'static str {
        "parse"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["p"]
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<CommandOutcome> {
        let (file, collection) = split_first_word(args);
        if file.is_empty() {
            anyhow::bail!("usage: parse <file> [collection]");
        }

        let path = config::expand_path(file);
        let contents = std::fs::read(&path).with_context(|| format!("cannot read '{path}'"))?;
        let target = store_target(&path, collection)?;

        writeln!(ctx.out, "storing {path} as {target}")?;
        let body = ctx.send(&build_store(contents, &target))?;
        writeln!(ctx.out, "{body}")?;
        Ok(CommandOutcome::Continue)
    }
}
