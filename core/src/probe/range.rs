//! Status code range parsing

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Range applied when a probe leaves `code_range` empty
pub const DEFAULT_CODE_RANGE: CodeRange = CodeRange { min: 199, max: 399 };

/// Inclusive interval of acceptable HTTP status codes
///
/// Parsing is permissive: `min > max` is accepted and such a range simply
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRange {
    pub min: u16,
    pub max: u16,
}

impl CodeRange {
    /// Create a range from its inclusive bounds
    pub fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Whether `status` lies within `[min, max]`
    pub fn contains(&self, status: u16) -> bool {
        !(status < self.min || status > self.max)
    }
}

impl fmt::Display for CodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl FromStr for CodeRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code_range(s)
    }
}

/// A bound in the range text is not a valid status code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{bound}' in '{range}' is not a valid status code: {source}")]
pub struct RangeParseError {
    range: String,
    bound: String,
    #[source]
    source: ParseIntError,
}

impl RangeParseError {
    /// The full range text that failed to parse
    pub fn range(&self) -> &str {
        &self.range
    }
}

/// Parse `"min-max"`, a single code, or empty text into a [`CodeRange`]
///
/// Only the first two `-`-separated segments are read; anything after a
/// second `-` is ignored.
pub fn parse_code_range(input: &str) -> Result<CodeRange, RangeParseError> {
    if input.is_empty() {
        return Ok(DEFAULT_CODE_RANGE);
    }

    let mut parts = input.split('-');
    let min = parse_bound(input, parts.next().unwrap_or_default())?;
    let max = match parts.next() {
        Some(bound) => parse_bound(input, bound)?,
        None => min,
    };

    Ok(CodeRange { min, max })
}

fn parse_bound(range: &str, bound: &str) -> Result<u16, RangeParseError> {
    bound.parse().map_err(|source| RangeParseError {
        range: range.to_string(),
        bound: bound.to_string(),
        source,
    })
}
