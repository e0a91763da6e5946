//! # Non-interactive Flows
//!
//! `-b`, `-p` and the positional request file each send one batch of
//! requests and exit. Faults are reported on `err` and mapped to exit code 1;
//! there is no loop to return to.

use anyhow::{Context, Result};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cmd_args::{CommandLineArgs, StoreArgs};
use crate::config;
use crate::repl::services::bench::BenchmarkRunner;
use crate::repl::services::http::Transport;
use crate::repl::session::SessionState;
use crate::repl::utils::envelope::{build_raw, build_store, store_target, RequestEnvelope};
use crate::repl::utils::response::interpret_response;

/// A flow selected on the command line that runs without the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneShotFlow {
    /// `report` mirrors the benchmark table; `None` disables it
    Bench {
        file: String,
        report: Option<PathBuf>,
    },
    Store(StoreArgs),
    RequestFile { path: String },
}

impl OneShotFlow {
    /// Pick the flow from the flags; `None` means start the REPL.
    /// `-b` wins over `-p`, which wins over a request file.
    pub fn from_args(cmd_args: &CommandLineArgs) -> Option<Self> {
        if let Some(file) = cmd_args.bench() {
            return Some(OneShotFlow::Bench {
                file: file.to_string(),
                report: Some(PathBuf::from(config::BENCH_REPORT_FILE)),
            });
        }
        if let Some(store) = cmd_args.store() {
            return Some(OneShotFlow::Store(store.clone()));
        }
        cmd_args.request_file().map(|path| OneShotFlow::RequestFile {
            path: path.to_string(),
        })
    }
}

/// Run `flow` to completion and return the process exit code
pub fn run_one_shot(
    flow: &OneShotFlow,
    session: &SessionState,
    transport: &mut dyn Transport,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> ExitCode {
    let result = match flow {
        OneShotFlow::Bench { file, report } => {
            run_benchmark(file, report.clone(), session, transport, out)
        }
        OneShotFlow::Store(store) => store_file(store, session.host(), transport, out),
        OneShotFlow::RequestFile { path } => send_request_file(path, session.host(), transport, out, err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            // stderr may be closed; the exit code still reports the fault
            let _ = writeln!(err, "error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_benchmark(
    file: &str,
    report: Option<PathBuf>,
    session: &SessionState,
    transport: &mut dyn Transport,
    out: &mut dyn Write,
) -> Result<()> {
    BenchmarkRunner::new()
        .with_indent(session.indent())
        .with_report_path(report)
        .run(transport, session.host(), &config::expand_path(file), out)?;
    Ok(())
}

fn store_file(
    store: &StoreArgs,
    host: &str,
    transport: &mut dyn Transport,
    out: &mut dyn Write,
) -> Result<()> {
    let path = config::expand_path(&store.file);
    let contents = std::fs::read(&path).with_context(|| format!("cannot read '{path}'"))?;
    let target = store_target(&path, store.collection.as_deref())?;
    writeln!(out, "storing {path} as {target}")?;
    send_and_print(transport, host, &build_store(contents, &target), out)
}

/// A missing request file is not a fault: it is reported and the run ends cleanly.
fn send_request_file(
    path: &str,
    host: &str,
    transport: &mut dyn Transport,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()> {
    let path = config::expand_path(path);
    let body = match std::fs::read(&path) {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("Request file '{}' not found", path);
            writeln!(err, "request file '{path}' not found")?;
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("cannot read request file '{path}'")),
    };
    send_and_print(transport, host, &build_raw(body), out)
}

fn send_and_print(
    transport: &mut dyn Transport,
    host: &str,
    request: &RequestEnvelope,
    out: &mut dyn Write,
) -> Result<()> {
    let response = transport.send(host, request)?;
    let body = interpret_response(response)?;
    writeln!(out, "{body}")?;
    Ok(())
}
