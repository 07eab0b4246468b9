//! Probe script loading and validation
//!
//! A probe script is a JSON array of probe objects. Scripts are read fresh on
//! every call to [`ProbeSource::load`]; nothing is cached between runs.

use async_trait::async_trait;
use schema::ProbeSpec;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that prevent a run from starting
#[derive(Error, Debug)]
pub enum LoadError {
    /// The script source could not be read
    #[error("failed to read probe script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The script is not a valid JSON probe list
    #[error("failed to parse {origin} as json probes: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The script parsed but a probe is unusable
    #[error("invalid probe script: {0}")]
    Invalid(String),
}

impl LoadError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => "LOAD001",
            LoadError::Parse { .. } => "LOAD002",
            LoadError::Invalid(_) => "LOAD003",
        }
    }
}

/// Provider of the probe sequence for a run
#[async_trait]
pub trait ProbeSource: Send + Sync {
    /// Load the current probe definitions in declaration order
    async fn load(&self) -> Result<Vec<ProbeSpec>, LoadError>;
}

/// Probe script stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct ScriptFile {
    path: PathBuf,
}

impl ScriptFile {
    /// Create a source reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the script
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProbeSource for ScriptFile {
    async fn load(&self) -> Result<Vec<ProbeSpec>, LoadError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        let probes = parse_script(&data)?;
        debug!("Loaded {} probe(s) from {:?}", probes.len(), self.path);
        Ok(probes)
    }
}

/// Fixed probe list, mainly for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticProbes(pub Vec<ProbeSpec>);

#[async_trait]
impl ProbeSource for StaticProbes {
    async fn load(&self) -> Result<Vec<ProbeSpec>, LoadError> {
        validate_probes(&self.0)?;
        Ok(self.0.clone())
    }
}

/// Parse and validate a probe script from a JSON string
pub fn parse_script(input: &str) -> Result<Vec<ProbeSpec>, LoadError> {
    let probes: Vec<ProbeSpec> =
        serde_json::from_str(input).map_err(|source| LoadError::Parse {
            origin: format!("'{}'", input),
            source,
        })?;
    validate_probes(&probes)?;
    Ok(probes)
}

/// Validate probe definitions with field-path error messages
pub fn validate_probes(probes: &[ProbeSpec]) -> Result<(), LoadError> {
    for (i, probe) in probes.iter().enumerate() {
        if probe.url.trim().is_empty() {
            return Err(LoadError::Invalid(format!(
                "probes[{}].url: cannot be empty",
                i
            )));
        }
        for name in probe.headers.keys() {
            if name.trim().is_empty() {
                return Err(LoadError::Invalid(format!(
                    "probes[{}].headers: names cannot be empty",
                    i
                )));
            }
        }
    }
    Ok(())
}
