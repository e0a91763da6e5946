//! # Response Interpretation
//!
//! The server returns already formatted XML, so a successful body is printed
//! as-is. Only a few attributes are ever pulled out of it: `queryTime` for
//! benchmarking, `hitCount` for the benchmark table, and `errcode` plus the
//! `exist:message` text for error reporting.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::repl::services::http::TransportResponse;

static QUERY_TIME: LazyLock<Option<Regex>> = LazyLock::new(|| attribute_pattern("queryTime"));
static HIT_COUNT: LazyLock<Option<Regex>> = LazyLock::new(|| attribute_pattern("hitCount"));
static ERROR_CODE: LazyLock<Option<Regex>> = LazyLock::new(|| attribute_pattern("errcode"));
static ERROR_MESSAGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<exist:message>(.*?)</exist:message>").ok());

/// A response whose HTTP status was not 200
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("request failed with status {code}: {message}")]
pub struct ResponseError {
    pub code: u16,
    pub message: String,
}

/// Turn a transport response into the text to show, or a failure message.
pub fn interpret_response(response: TransportResponse) -> Result<String, ResponseError> {
    if response.status == 200 {
        if let Some(code) = extract_error_code(&response.body).filter(|code| *code != 0) {
            tracing::warn!(
                "Server reported error code {}: {}",
                code,
                extract_error_message(&response.body).unwrap_or_default()
            );
        }
        return Ok(response.body);
    }

    let message = extract_error_message(&response.body)
        .or(response.reason)
        .unwrap_or_else(|| "no message from server".to_string());

    tracing::debug!("Request failed with status {}: {}", response.status, message);
    Err(ResponseError {
        code: response.status,
        message,
    })
}

/// Server-reported evaluation time in milliseconds (`queryTime="N"`).
/// `None` when the attribute is missing; callers must not read that as zero.
pub fn extract_query_time(body: &str) -> Option<u64> {
    attribute_value(body, &QUERY_TIME)?.parse().ok()
}

/// Total number of hits (`hitCount="N"` on the result element)
pub fn extract_hit_count(body: &str) -> Option<u64> {
    attribute_value(body, &HIT_COUNT)?.parse().ok()
}

/// Error code of an `exist:result` error document
pub fn extract_error_code(body: &str) -> Option<u32> {
    attribute_value(body, &ERROR_CODE)?.parse().ok()
}

/// Text of the first `exist:message` element
pub fn extract_error_message(body: &str) -> Option<String> {
    ERROR_MESSAGE
        .as_ref()?
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|message| !message.is_empty())
}

/// `name="digits"`, capturing the digits
fn attribute_pattern(name: &str) -> Option<Regex> {
    Regex::new(&format!(r#"\b{}="(\d+)""#, regex::escape(name))).ok()
}

fn attribute_value<'a>(body: &'a str, pattern: &Option<Regex>) -> Option<&'a str> {
    pattern
        .as_ref()?
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
