//! # Session State
//!
//! The mutable settings of one interactive session. Created once at start-up,
//! mutated in place by command handlers, discarded at exit.

use thiserror::Error;

use crate::config;

/// Whether a query returns matching content or per-document counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Full matching content (`exist:display`)
    All,
    /// Per-document match counts (`exist:summarize`)
    Summary,
}

impl DisplayMode {
    /// Element name used in the request envelope
    pub fn element(self) -> &'static str {
        match self {
            DisplayMode::All => "display",
            DisplayMode::Summary => "summarize",
        }
    }

    pub fn from_display_all(display_all: bool) -> Self {
        if display_all {
            DisplayMode::All
        } else {
            DisplayMode::Summary
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("result window must be positive")]
    ZeroWindow,
    #[error("invalid result window '{0}': expected a positive integer")]
    InvalidWindow(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    host: String,
    display_mode: DisplayMode,
    result_window: u32,
    output_path: Option<String>,
    indent: bool,
}

impl SessionState {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            display_mode: DisplayMode::All,
            result_window: config::DEFAULT_RESULT_WINDOW,
            output_path: None,
            indent: true,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn display_all(&self) -> bool {
        self.display_mode == DisplayMode::All
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    pub fn result_window(&self) -> u32 {
        self.result_window
    }

    /// Set the result window. Zero is rejected and leaves the window unchanged.
    pub fn set_result_window(&mut self, window: u32) -> Result<(), SessionError> {
        if window == 0 {
            return Err(SessionError::ZeroWindow);
        }
        self.result_window = window;
        Ok(())
    }

    /// Parse and apply a window token such as `"42"`
    pub fn set_result_window_str(&mut self, token: &str) -> Result<(), SessionError> {
        let window = token
            .parse::<u32>()
            .map_err(|_| SessionError::InvalidWindow(token.to_string()))?;
        self.set_result_window(window)
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    pub fn set_output_path(&mut self, path: impl Into<String>) {
        self.output_path = Some(path.into());
    }

    /// Consume the pending redirection; the next response goes to stdout again.
    pub fn take_output_path(&mut self) -> Option<String> {
        self.output_path.take()
    }

    pub fn indent(&self) -> bool {
        self.indent
    }

    pub fn set_indent(&mut self, indent: bool) {
        self.indent = indent;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(config::DEFAULT_HOST)
    }
}
