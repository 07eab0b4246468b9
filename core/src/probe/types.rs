//! Core types and traits for probing

use async_trait::async_trait;
use schema::ProbeSpec;

use super::range::{parse_code_range, CodeRange, RangeParseError};
use super::ProbeError;

/// Status code and body collected from one completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Expected response criteria for a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// Range text as written in the script, kept for failure messages
    range_text: String,
    range: CodeRange,
    contains: String,
}

impl Expectation {
    /// Build the expectation declared by a probe definition
    pub fn from_spec(spec: &ProbeSpec) -> Result<Self, RangeParseError> {
        Ok(Self {
            range_text: spec.code_range.clone(),
            range: parse_code_range(&spec.code_range)?,
            contains: spec.contains.clone(),
        })
    }

    /// The parsed status code range
    pub fn range(&self) -> CodeRange {
        self.range
    }

    /// Check if a status code matches this expectation
    pub fn matches_status(&self, status: u16) -> bool {
        self.range.contains(status)
    }

    /// Check if a response body matches this expectation
    pub fn matches_body(&self, body: &[u8]) -> bool {
        self.contains.is_empty() || String::from_utf8_lossy(body).contains(&self.contains)
    }

    /// Decide pass/fail for a completed response
    ///
    /// The status check runs first and short-circuits; the body is only
    /// inspected when `contains` is non-empty.
    pub fn evaluate(&self, response: &ProbeResponse) -> Result<(), ProbeError> {
        if !self.matches_status(response.status) {
            return Err(ProbeError::RangeMismatch {
                status: response.status,
                range: self.range_text.clone(),
                min: self.range.min,
                max: self.range.max,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        if self.contains.is_empty() {
            return Ok(());
        }

        let body = String::from_utf8_lossy(&response.body);
        if !body.contains(&self.contains) {
            return Err(ProbeError::ContentMismatch {
                expected: self.contains.clone(),
                body: body.into_owned(),
            });
        }

        Ok(())
    }
}

/// Trait for probe implementations
///
/// `execute` performs the request and collects the raw response; `check`
/// additionally evaluates it against the probe's expectation.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Perform exactly one request and collect status and body
    async fn execute(&self) -> Result<ProbeResponse, ProbeError>;

    /// The criteria the response is evaluated against
    fn expectation(&self) -> &Expectation;

    /// Execute the probe and evaluate its response
    async fn check(&self) -> Result<(), ProbeError> {
        let response = self.execute().await?;
        self.expectation().evaluate(&response)
    }
}
