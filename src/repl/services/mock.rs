//! # Mock Transport for Testing
//!
//! Replays scripted responses instead of touching the network and records
//! every request it is given.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::http::{Transport, TransportError, TransportResponse};
use crate::repl::utils::envelope::RequestEnvelope;

/// A request as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRequest {
    pub host: String,
    pub request: RequestEnvelope,
}

/// Type alias for the shared request history
pub type RequestHistory = Arc<Mutex<Vec<SentRequest>>>;

/// Transport that answers from a script.
///
/// Scripted results are consumed in order; once the script is empty every
/// request gets the fallback response.
pub struct MockTransport {
    script: VecDeque<Result<TransportResponse, TransportError>>,
    fallback: TransportResponse,
    history: RequestHistory,
}

impl MockTransport {
    /// Mock answering every request with `200` and an empty body
    pub fn new() -> Self {
        Self::always(TransportResponse::ok(""))
    }

    /// Mock answering every request with `response`
    pub fn always(response: TransportResponse) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: response,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response
    pub fn push_response(&mut self, response: TransportResponse) -> &mut Self {
        self.script.push_back(Ok(response));
        self
    }

    /// Queue a transport failure
    pub fn push_error(&mut self, error: TransportError) -> &mut Self {
        self.script.push_back(Err(error));
        self
    }

    /// Handle on the request history that stays valid after the mock is moved
    pub fn history(&self) -> RequestHistory {
        Arc::clone(&self.history)
    }

    /// Snapshot of every request sent so far
    pub fn requests(&self) -> Vec<SentRequest> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn send(
        &mut self,
        host: &str,
        request: &RequestEnvelope,
    ) -> Result<TransportResponse, TransportError> {
        if let Ok(mut history) = self.history.lock() {
            history.push(SentRequest {
                host: host.to_string(),
                request: request.clone(),
            });
        }

        self.script
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
