//! Run aggregation: execute every probe of a script once, in order
//!
//! A run loads the probe list fresh from its [`ProbeSource`], executes each
//! probe sequentially and records one [`ProbeOutcome`] per probe. A failing
//! probe never stops the probes after it. Only a [`LoadError`] aborts a run,
//! and it does so before any probe executes.

use schema::{ProbeSpec, RunResponse};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::probe::{run_probe, ProbeError, ProbeOptions};
use crate::script::{LoadError, ProbeSource};

/// Result of executing one probe
#[derive(Debug)]
pub struct ProbeOutcome {
    /// Position of the probe in the script
    pub index: usize,
    /// The definition that was executed
    pub probe: ProbeSpec,
    /// Wall time spent on the probe
    pub elapsed: Duration,
    /// Why the probe failed, if it did
    pub error: Option<ProbeError>,
}

impl ProbeOutcome {
    /// Whether the probe passed
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// One-line description of the failure, prefixed with the probe's method and url
    pub fn failure_line(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|error| format!("{}: {}", self.probe, error))
    }
}

/// Aggregate over every probe outcome of one run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Outcomes in declaration order
    pub outcomes: Vec<ProbeOutcome>,
}

impl RunReport {
    /// Whether every probe passed
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ProbeOutcome::is_success)
    }

    /// Failure descriptions in declaration order
    pub fn failures(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(ProbeOutcome::failure_line)
            .collect()
    }

    /// Every failure description joined by newlines, or `None` when the run passed
    pub fn failure_message(&self) -> Option<String> {
        if self.is_success() {
            None
        } else {
            Some(self.failures().join("\n"))
        }
    }

    /// Total wall time across all probes
    pub fn elapsed(&self) -> Duration {
        self.outcomes.iter().map(|o| o.elapsed).sum()
    }

    /// Render the report as the trigger's response body
    pub fn to_response(&self) -> RunResponse {
        if self.is_success() {
            RunResponse::success(self.outcomes.len())
        } else {
            RunResponse::failure(self.failures())
        }
    }
}

/// Executes the full probe sequence of a script on demand
///
/// A `Runner` holds no per-run state, so concurrent runs through a shared
/// reference are independent of each other.
#[derive(Clone)]
pub struct Runner {
    source: Arc<dyn ProbeSource>,
    options: ProbeOptions,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runner {
    /// Create a runner over `source` using `options` for every probe
    pub fn new(source: Arc<dyn ProbeSource>, options: ProbeOptions) -> Self {
        Self { source, options }
    }

    /// The request policy applied to every probe
    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Load the script and execute every probe once, in declaration order
    ///
    /// # Errors
    /// Returns a [`LoadError`] if the script cannot be loaded; probe failures
    /// are reported inside the [`RunReport`] instead.
    pub async fn run(&self) -> Result<RunReport, LoadError> {
        let probes = self.source.load().await?;
        info!("Will execute {} probe(s)", probes.len());

        let mut outcomes = Vec::with_capacity(probes.len());
        for (index, probe) in probes.into_iter().enumerate() {
            let start = Instant::now();
            let result = run_probe(&probe, &self.options).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => info!(probe = %probe, "Probe execution success"),
                Err(e) => warn!(probe = %probe, code = e.code(), "Probe failed: {}", e),
            }
            info!(probe = %probe, "Took: {:?}", elapsed);

            outcomes.push(ProbeOutcome {
                index,
                probe,
                elapsed,
                error: result.err(),
            });
        }

        let report = RunReport { outcomes };
        if report.is_success() {
            info!("Run passed: {} probe(s)", report.outcomes.len());
        } else {
            warn!(
                "Run failed: {} of {} probe(s)",
                report.failures().len(),
                report.outcomes.len()
            );
        }
        Ok(report)
    }
}
