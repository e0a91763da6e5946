//! # Benchmark Runner
//!
//! Runs every line of a query file once, in file order, and reports the
//! evaluation time the server measured for each. Rows are printed as each
//! query completes and mirrored into a report file.
//!
//! ```text
//! Query                                               Query ms  Retrieve ms      Hits
//! //SPEECH[SPEAKER='HAMLET']                                37            0       359
//! //LINE[near(., 'love')]                                    -            0         -
//! ```
//!
//! Retrieval time is never measured by the protocol and is always reported
//! as zero.

use anyhow::{Context, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::http::Transport;
use crate::config;
use crate::repl::utils::{envelope::build_query, response};

/// Server-reported evaluation time of one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTiming {
    Measured(u64),
    /// The response carried no `queryTime` attribute
    Unmeasured,
}

impl QueryTiming {
    pub fn millis(self) -> Option<u64> {
        match self {
            QueryTiming::Measured(ms) => Some(ms),
            QueryTiming::Unmeasured => None,
        }
    }
}

impl fmt::Display for QueryTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryTiming::Measured(ms) => write!(f, "{ms}"),
            QueryTiming::Unmeasured => f.write_str("-"),
        }
    }
}

/// One row of a benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkRecord {
    /// Query text, truncated to the display width
    pub query: String,
    pub query_time: QueryTiming,
    /// Placeholder, always zero
    pub retrieval_time: u64,
    pub hits: Option<u64>,
}

pub struct BenchmarkRunner {
    result_window: u32,
    indent: bool,
    query_width: usize,
    report_path: Option<PathBuf>,
}

impl BenchmarkRunner {
    pub fn new() -> Self {
        Self {
            result_window: config::BENCH_RESULT_WINDOW,
            indent: true,
            query_width: config::BENCH_QUERY_WIDTH,
            report_path: Some(PathBuf::from(config::BENCH_REPORT_FILE)),
        }
    }

    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_query_width(mut self, width: usize) -> Self {
        self.query_width = width;
        self
    }

    /// Where rows are mirrored; `None` disables the report file
    pub fn with_report_path(mut self, path: Option<PathBuf>) -> Self {
        self.report_path = path;
        self
    }

    /// Run every query in the file at `path` against `host`
    pub fn run<W: Write + ?Sized>(
        &self,
        transport: &mut dyn Transport,
        host: &str,
        path: &str,
        out: &mut W,
    ) -> Result<Vec<BenchmarkRecord>> {
        let queries = read_queries(path)?;
        tracing::info!("Benchmarking {} queries from '{}'", queries.len(), path);
        self.run_queries(transport, host, &queries, out)
    }

    /// Run `queries` in order. A transport or protocol failure aborts the run;
    /// rows written before it stay in the report.
    pub fn run_queries<W: Write + ?Sized>(
        &self,
        transport: &mut dyn Transport,
        host: &str,
        queries: &[String],
        out: &mut W,
    ) -> Result<Vec<BenchmarkRecord>> {
        let mut report = match &self.report_path {
            Some(path) => Some(BufWriter::new(File::create(path).with_context(|| {
                format!("cannot create benchmark report '{}'", path.display())
            })?)),
            None => None,
        };

        let header = self.format_header();
        emit(out, report.as_mut(), &header)?;

        let mut records = Vec::with_capacity(queries.len());
        for (index, query) in queries.iter().enumerate() {
            let request = build_query(query, false, self.result_window, 1, self.indent);
            let reply = transport
                .send(host, &request)
                .with_context(|| format!("benchmark aborted at query {}", index + 1))?;
            let body = response::interpret_response(reply)
                .with_context(|| format!("benchmark aborted at query {}", index + 1))?;

            let query_time = match response::extract_query_time(&body) {
                Some(ms) => QueryTiming::Measured(ms),
                None => {
                    tracing::warn!("No queryTime in response to query {}", index + 1);
                    QueryTiming::Unmeasured
                }
            };

            let record = BenchmarkRecord {
                query: truncate(query, self.query_width),
                query_time,
                retrieval_time: 0,
                hits: response::extract_hit_count(&body),
            };
            emit(out, report.as_mut(), &self.format_row(&record))?;
            records.push(record);
        }

        emit(out, report.as_mut(), &summarize(&records))?;
        Ok(records)
    }

    fn format_header(&self) -> String {
        format!(
            "{:<width$}  {:>10}  {:>11}  {:>8}",
            "Query",
            "Query ms",
            "Retrieve ms",
            "Hits",
            width = self.query_width
        )
    }

    pub fn format_row(&self, record: &BenchmarkRecord) -> String {
        let hits = record
            .hits
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<width$}  {:>10}  {:>11}  {:>8}",
            record.query,
            record.query_time.to_string(),
            record.retrieval_time,
            hits,
            width = self.query_width
        )
    }
}

impl Default for BenchmarkRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a query file into one query per line. Blank lines are kept.
pub fn read_queries(path: &str) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read query file '{path}'"))?;
    Ok(contents.lines().map(str::to_string).collect())
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn summarize(records: &[BenchmarkRecord]) -> String {
    let measured: Vec<u64> = records
        .iter()
        .filter_map(|r| r.query_time.millis())
        .collect();
    let total: u64 = measured.iter().sum();

    if measured.is_empty() {
        return format!("{} queries, none measured", records.len());
    }
    format!(
        "{} queries, {} measured, total {} ms, average {} ms",
        records.len(),
        measured.len(),
        total,
        total / measured.len() as u64
    )
}

fn emit<W: Write + ?Sized>(out: &mut W, report: Option<&mut BufWriter<File>>, line: &str) -> Result<()> {
    writeln!(out, "{line}")?;
    out.flush()?;
    if let Some(report) = report {
        writeln!(report, "{line}")?;
        report.flush()?;
    }
    Ok(())
}
