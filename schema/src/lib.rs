//! Schema definitions for tripwire
//!
//! This crate contains the data structures shared between the probe engine
//! and the trigger daemon: the probe script format, the daemon configuration
//! values and the JSON body returned by the trigger endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// HTTP method used when a probe leaves `method` empty
pub const DEFAULT_METHOD: &str = "GET";

/// One declared HTTP check from the probe script
///
/// Every field except `url` may be absent (or `null`) in the script and then
/// takes its empty default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeSpec {
    /// Target to request
    pub url: String,

    /// HTTP verb; empty means [`DEFAULT_METHOD`]
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,

    /// Raw range text such as `"200-299"`, `"404"` or empty for the default band
    #[serde(default, deserialize_with = "null_as_default")]
    pub code_range: String,

    /// Substring the response body must contain; empty disables the body check
    #[serde(default, deserialize_with = "null_as_default")]
    pub contains: String,

    /// Headers added to the outbound request
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
}

impl ProbeSpec {
    /// Create a probe for `url` with every other field empty
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// The verb to send, falling back to [`DEFAULT_METHOD`] when unset
    pub fn method_or_default(&self) -> &str {
        if self.method.is_empty() {
            DEFAULT_METHOD
        } else {
            self.method.as_str()
        }
    }
}

impl fmt::Display for ProbeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method_or_default(), self.url)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Configuration structure for the trigger daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DaemonConfig {
    /// Host to bind the trigger listener to
    pub host: String,
    /// Port to bind the trigger listener to
    pub port: u16,
    /// Location of the probe script, reloaded on every run
    pub script_path: PathBuf,
    /// Dump full raw requests to the log
    #[serde(default)]
    pub verbose: bool,
    /// Skip server certificate validation for HTTPS probes
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Ceiling on the wait for response headers
    #[serde(default = "default_response_header_timeout_secs")]
    pub response_header_timeout_secs: u64,
}

impl DaemonConfig {
    /// Get the response header timeout as a Duration
    pub fn response_header_timeout(&self) -> Duration {
        Duration::from_secs(self.response_header_timeout_secs)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8023,
            script_path: PathBuf::from("script.json"),
            verbose: false,
            accept_invalid_certs: false,
            response_header_timeout_secs: default_response_header_timeout_secs(),
        }
    }
}

fn default_response_header_timeout_secs() -> u64 {
    10
}

/// Overall outcome reported by the trigger endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every probe passed
    Success,
    /// At least one probe failed
    Failure,
    /// The script could not be loaded; no probe ran
    LoadError,
}

/// JSON body returned by the trigger endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunResponse {
    pub status: RunStatus,
    /// Human-readable summary; on failure, every failure line joined by `\n`
    pub message: String,
    /// Individual failure descriptions in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl RunResponse {
    /// Response for a run where every probe passed
    pub fn success(probes: usize) -> Self {
        Self {
            status: RunStatus::Success,
            message: format!("Tests success: {probes} probe(s) passed"),
            failures: Vec::new(),
        }
    }

    /// Response for a run with failing probes
    pub fn failure(failures: Vec<String>) -> Self {
        Self {
            status: RunStatus::Failure,
            message: failures.join("\n"),
            failures,
        }
    }

    /// Response for a run that never started because the script failed to load
    pub fn load_error(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::LoadError,
            message: message.into(),
            failures: Vec::new(),
        }
    }
}
