//! Error types for probe execution and evaluation

use std::time::Duration;
use thiserror::Error;

use super::range::RangeParseError;

/// Errors that can occur while executing or evaluating a probe
///
/// Every variant is a probe-level failure: it is recorded against the probe
/// that produced it and never aborts the rest of a run.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe's `code_range` text is malformed
    #[error("invalid code range: {0}")]
    InvalidRange(#[from] RangeParseError),

    /// The probe's `url` could not be parsed
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The probe's `method` is not a valid HTTP token
    #[error("invalid method '{method}': {reason}")]
    InvalidMethod { method: String, reason: String },

    /// A header name or value cannot be sent on the wire
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The HTTP client or request could not be constructed
    #[error("failed to build request: {0}")]
    Request(#[source] reqwest::Error),

    /// DNS, connect or protocol failure reaching the target
    #[error("request failed with error: {0}")]
    Transport(#[source] reqwest::Error),

    /// No response headers (or body) arrived within the ceiling
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// The response body could not be read to the end
    #[error("reading of the response body failed with error: {source}, status: {status}")]
    BodyRead {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    /// The status code lies outside the expected range
    #[error("the response code {status} is not in expected range '{range}' ({min}-{max}), resp body: {body}")]
    RangeMismatch {
        status: u16,
        range: String,
        min: u16,
        max: u16,
        body: String,
    },

    /// The body does not contain the expected substring
    #[error("could not find expected string '{expected}' in response body '{body}'")]
    ContentMismatch { expected: String, body: String },
}

impl ProbeError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            ProbeError::InvalidRange(_) => "PROBE001",
            ProbeError::InvalidUrl { .. } => "PROBE002",
            ProbeError::InvalidMethod { .. } => "PROBE003",
            ProbeError::InvalidHeader { .. } => "PROBE004",
            ProbeError::Request(_) => "PROBE005",
            ProbeError::Transport(_) => "PROBE006",
            ProbeError::Timeout(_) => "PROBE007",
            ProbeError::BodyRead { .. } => "PROBE008",
            ProbeError::RangeMismatch { .. } => "PROBE009",
            ProbeError::ContentMismatch { .. } => "PROBE010",
        }
    }

    /// Whether the failure came from evaluating a completed response
    pub fn is_evaluation_failure(&self) -> bool {
        matches!(
            self,
            ProbeError::RangeMismatch { .. } | ProbeError::ContentMismatch { .. }
        )
    }
}
