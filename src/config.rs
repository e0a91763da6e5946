//! Configuration constants and utilities for existline
//!
//! Holds the built-in defaults, the environment overrides and the INI profile
//! store. A profile is a section of the profile file:
//!
//! ```ini
//! [default]
//! host = localhost:8088
//! indent = true
//! window = 15
//! timeout = 60
//! ```

use anyhow::{Context, Result};
use ini::Ini;
use std::path::Path;

/// Default profile file path for existline
pub const DEFAULT_PROFILE_PATH: &str = "~/.existline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "EXISTLINE_PROFILE_PATH";

/// Environment variable name for overriding the repository host
pub const HOST_ENV_VAR: &str = "EXISTLINE_HOST";

/// Profile section used when none is named on the command line
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Repository address used when nothing else is configured
pub const DEFAULT_HOST: &str = "localhost:8088";

/// Default number of matches requested per interactive query
pub const DEFAULT_RESULT_WINDOW: u32 = 15;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Window used for every benchmark query, independent of the session window
pub const BENCH_RESULT_WINDOW: u32 = 100;

/// File the benchmark runner mirrors its report rows into
pub const BENCH_REPORT_FILE: &str = "benchmark.txt";

/// Number of characters of a query shown in a benchmark row
pub const BENCH_QUERY_WIDTH: usize = 50;

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Host override from the environment, if any
pub fn get_env_host() -> Option<String> {
    std::env::var_os(HOST_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .filter(|val| !val.trim().is_empty())
}

/// Expand `~` and environment variables in a user-supplied path.
/// Falls back to the raw input when expansion fails.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|expanded| expanded.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Connection and session settings read from one profile section.
/// Every field is optional; unset fields fall back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub host: Option<String>,
    pub indent: Option<bool>,
    pub window: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Profile {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn indent(&self) -> bool {
        self.indent.unwrap_or(true)
    }

    pub fn window(&self) -> u32 {
        self.window.unwrap_or(DEFAULT_RESULT_WINDOW)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// Reads profiles from an INI file
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    pub fn new(path: &str) -> Self {
        Self {
            path: expand_path(path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Load the named profile. A missing file or section is `Ok(None)`;
    /// an unreadable file or a malformed value is an error.
    pub fn get_profile(&self, name: &str) -> Result<Option<Profile>> {
        if !Path::new(&self.path).exists() {
            tracing::debug!("Profile file '{}' does not exist", self.path);
            return Ok(None);
        }

        let ini = Ini::load_from_file(&self.path)
            .with_context(|| format!("failed to read profile file '{}'", self.path))?;

        let Some(section) = ini.section(Some(name)) else {
            return Ok(None);
        };

        let profile = Profile {
            host: section.get("host").map(str::to_string),
            indent: section
                .get("indent")
                .map(|v| parse_bool("indent", v))
                .transpose()?,
            window: section
                .get("window")
                .map(parse_window)
                .transpose()?,
            timeout_secs: section
                .get("timeout")
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .with_context(|| format!("invalid value for 'timeout' in profile: {v}"))
                })
                .transpose()?,
            user: section.get("user").map(str::to_string),
            password: section.get("password").map(str::to_string),
        };

        Ok(Some(profile))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => anyhow::bail!("invalid value for '{key}' in profile: {value}"),
    }
}

fn parse_window(value: &str) -> Result<u32> {
    let window = value
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid value for 'window' in profile: {value}"))?;
    if window == 0 {
        anyhow::bail!("invalid value for 'window' in profile: must be positive");
    }
    Ok(window)
}
