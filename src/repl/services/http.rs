//! # HTTP Transport
//!
//! Sends one request envelope to the repository and returns the status and
//! decoded body. The public surface is synchronous: `HttpTransport` drives an
//! async `reqwest` client on a private current-thread runtime, so exactly one
//! request is in flight at a time. Each request is bounded by an optional
//! timeout and can be cancelled with Ctrl-C.
//!
//! With cancellation enabled the Ctrl-C listener is installed when the
//! transport is built and lives as long as it does. Ctrl-C never terminates
//! the process then, and an interrupt that arrives between requests is
//! discarded before the next request starts.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;

use crate::repl::utils::envelope::RequestEnvelope;

/// Content type sent with every request
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// How long the signal driver gets to deliver interrupts that arrived while idle
const INTERRUPT_SETTLE: Duration = Duration::from_millis(1);

#[cfg(unix)]
type InterruptListener = tokio::signal::unix::Signal;
#[cfg(windows)]
type InterruptListener = tokio::signal::windows::CtrlC;

#[cfg(unix)]
fn interrupt_listener() -> std::io::Result<InterruptListener> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
}

#[cfg(windows)]
fn interrupt_listener() -> std::io::Result<InterruptListener> {
    tokio::signal::windows::ctrl_c()
}

/// Status and decoded body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Canonical reason phrase for the status, if known
    pub reason: Option<String>,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string),
            body: body.into(),
        }
    }
}

/// Failure below the HTTP level; no status was received
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("cannot connect to {url}: {message}")]
    Connect { url: String, message: String },
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
    #[error("request to {url} cancelled")]
    Cancelled { url: String },
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Sends request envelopes to a repository host
pub trait Transport {
    /// Send `request` to `host` and block until a response or failure.
    fn send(
        &mut self,
        host: &str,
        request: &RequestEnvelope,
    ) -> Result<TransportResponse, TransportError>;
}

/// Settings for [`HttpTransport`]
#[derive(Debug, Clone, Default)]
pub struct HttpTransportConfig {
    /// `None` waits forever
    pub timeout: Option<Duration>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Cancel the in-flight request on Ctrl-C
    pub cancel_on_interrupt: bool,
}

/// Transport backed by `reqwest`
pub struct HttpTransport {
    client: reqwest::Client,
    runtime: Runtime,
    timeout: Option<Duration>,
    authorization: Option<HeaderValue>,
    /// Present when Ctrl-C cancels requests
    interrupt: Option<InterruptListener>,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        tracing::debug!("Creating HttpTransport with timeout {:?}", config.timeout);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start the I/O runtime")?;

        let client = reqwest::Client::builder()
            .build()
            .context("failed to create the HTTP client")?;

        let authorization = match config.user.as_deref() {
            Some(user) => Some(basic_authorization(user, config.password.as_deref())?),
            None => None,
        };

        let interrupt = if config.cancel_on_interrupt {
            let _guard = runtime.enter();
            Some(interrupt_listener().context("failed to listen for Ctrl-C")?)
        } else {
            None
        };

        Ok(Self {
            client,
            runtime,
            timeout: config.timeout,
            authorization,
            interrupt,
        })
    }
}

impl Transport for HttpTransport {
    fn send(
        &mut self,
        host: &str,
        request: &RequestEnvelope,
    ) -> Result<TransportResponse, TransportError> {
        let url = request_url(host, &request.path());
        let body = request.body();
        tracing::debug!("{} {} ({} bytes)", request.method(), url, body.len());

        let mut builder = self
            .client
            .request(request.method(), url.as_str())
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .header(CONTENT_LENGTH, body.len())
            .body(body);
        if let Some(authorization) = &self.authorization {
            builder = builder.header(AUTHORIZATION, authorization.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let timeout_secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
        let interrupt = self.interrupt.as_mut();

        let result = self.runtime.block_on(async {
            let exchange = async {
                let response = builder
                    .send()
                    .await
                    .map_err(|e| map_reqwest_error(&url, timeout_secs, e))?;
                read_response(response)
                    .await
                    .map_err(|e| map_reqwest_error(&url, timeout_secs, e))
            };

            match interrupt {
                Some(interrupt) => {
                    while let Ok(Some(())) =
                        tokio::time::timeout(INTERRUPT_SETTLE, interrupt.recv()).await
                    {
                        tracing::debug!("Discarding Ctrl-C received while idle");
                    }
                    tokio::select! {
                        result = exchange => result,
                        _ = interrupt.recv() => Err(TransportError::Cancelled { url: url.clone() }),
                    }
                }
                None => exchange.await,
            }
        });

        match &result {
            Ok(response) => tracing::debug!(
                "Response {} ({} bytes)",
                response.status,
                response.body.len()
            ),
            Err(e) => tracing::error!("{e}"),
        }
        result
    }
}

/// Absolute URL for `path` on `host`. A host without a scheme gets `http://`.
pub fn request_url(host: &str, path: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}{path}")
    } else {
        format!("http://{host}{path}")
    }
}

/// Decode a body using the charset named in its content type, UTF-8 otherwise.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(|ct| {
            ct.split(';')
                .filter_map(|param| param.trim().split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
                .map(|(_, value)| value.trim().trim_matches('"').to_string())
        })
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!("Response body is not valid {}", encoding.name());
    }
    text.into_owned()
}

async fn read_response(response: reqwest::Response) -> reqwest::Result<TransportResponse> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await?;

    Ok(TransportResponse {
        status: status.as_u16(),
        reason: status.canonical_reason().map(str::to_string),
        body: decode_body(&bytes, content_type.as_deref()),
    })
}

fn map_reqwest_error(url: &str, timeout_secs: u64, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
            secs: timeout_secs,
        }
    } else if e.is_connect() {
        TransportError::Connect {
            url: url.to_string(),
            message: error_chain(&e),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            message: error_chain(&e),
        }
    }
}

fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}

fn basic_authorization(user: &str, password: Option<&str>) -> Result<HeaderValue> {
    let credentials = format!("{user}:{}", password.unwrap_or_default());
    let mut value = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(credentials)))
        .context("invalid credentials")?;
    value.set_sensitive(true);
    Ok(value)
}
