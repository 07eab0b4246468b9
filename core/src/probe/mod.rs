//! Probe execution and evaluation
//!
//! This module turns one probe definition into one HTTP request and decides
//! whether the response satisfies the probe's expectations.
//!
//! ## Types
//!
//! - [`Probe`]: The main trait for probe implementations
//! - [`HttpProbe`]: HTTP request-based probing
//! - [`Expectation`]: Status range and body criteria for a response
//! - [`CodeRange`]: Inclusive status code interval parsed from range text
//! - [`ProbeOptions`]: Per-run request policy (timeouts, TLS, tracing detail)
//! - [`ProbeError`]: Error types for probe failures

pub mod error;
pub mod http;
pub mod range;
pub mod types;

pub use error::ProbeError;
pub use http::HttpProbe;
pub use range::{parse_code_range, CodeRange, RangeParseError, DEFAULT_CODE_RANGE};
pub use types::{Expectation, Probe, ProbeResponse};

use schema::{DaemonConfig, ProbeSpec};
use std::time::Duration;

/// Default ceiling on the wait for response headers
pub const DEFAULT_RESPONSE_HEADER_TIMEOUT: Duration = Duration::from_secs(10);

/// Request policy shared by every probe in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Ceiling on the wait for response headers; the body read gets the same ceiling
    pub response_header_timeout: Duration,
    /// Skip server certificate validation. Only meant for trusted test networks.
    pub accept_invalid_certs: bool,
    /// Include the full raw request in the request trace
    pub verbose: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            response_header_timeout: DEFAULT_RESPONSE_HEADER_TIMEOUT,
            accept_invalid_certs: false,
            verbose: false,
        }
    }
}

impl From<&DaemonConfig> for ProbeOptions {
    fn from(config: &DaemonConfig) -> Self {
        Self {
            response_header_timeout: config.response_header_timeout(),
            accept_invalid_certs: config.accept_invalid_certs,
            verbose: config.verbose,
        }
    }
}

/// Create a probe from a probe definition
pub fn create_probe(
    spec: &ProbeSpec,
    options: &ProbeOptions,
) -> Result<Box<dyn Probe>, ProbeError> {
    Ok(Box::new(HttpProbe::new(spec.clone(), options.clone())?))
}

/// Run a single probe definition end to end
///
/// This is a convenience function that creates a probe and immediately
/// executes and evaluates it.
pub async fn run_probe(spec: &ProbeSpec, options: &ProbeOptions) -> Result<(), ProbeError> {
    let probe = create_probe(spec, options)?;
    probe.check().await
}
