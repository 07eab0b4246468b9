//! Core functionality for tripwire
//!
//! This crate contains the probe engine used by the trigger daemon: range
//! parsing, request execution, response evaluation, script loading and run
//! aggregation.

pub mod error;
pub mod probe;
pub mod runner;
pub mod script;

#[cfg(test)]
mod test_server;

// Re-export schema types for convenience
pub use schema::*;

pub use error::{CoreError, Result};
pub use probe::{ProbeError, ProbeOptions};
pub use runner::{ProbeOutcome, RunReport, Runner};
pub use script::{LoadError, ProbeSource, ScriptFile, StaticProbes};

/// Core utilities and helper functions
pub mod utils {
    use tracing::{debug, info};

    /// Initialize tracing for the application
    pub fn init_tracing(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| crate::CoreError::InitializationError(e.to_string()))?;

        info!("Tracing initialized with level: {}", level);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate_config(config: &crate::DaemonConfig) -> crate::Result<()> {
        if config.host.is_empty() {
            return Err(crate::CoreError::ConfigurationError(
                "Host cannot be empty".to_string(),
            ));
        }

        if config.script_path.as_os_str().is_empty() {
            return Err(crate::CoreError::ConfigurationError(
                "Script path cannot be empty".to_string(),
            ));
        }

        if config.response_header_timeout_secs == 0 {
            return Err(crate::CoreError::ConfigurationError(
                "Response header timeout must be greater than 0".to_string(),
            ));
        }

        debug!("Configuration validated successfully");
        Ok(())
    }
}
