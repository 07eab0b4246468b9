//! Simple daemon error types

use tripwire_core::LoadError;

#[derive(Debug)]
pub enum DaemonError {
    ServerError(String),
    ConfigError(String),
    ScriptError(LoadError),
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
}

impl std::fmt::Display for DaemonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DaemonError::ServerError(msg) => write!(f, "Server error: {}", msg),
            DaemonError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            DaemonError::ScriptError(err) => write!(f, "Script error: {}", err),
            DaemonError::IoError(err) => write!(f, "I/O error: {}", err),
            DaemonError::SerializationError(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for DaemonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DaemonError::ScriptError(err) => Some(err),
            DaemonError::IoError(err) => Some(err),
            DaemonError::SerializationError(err) => Some(err),
            DaemonError::ServerError(_) | DaemonError::ConfigError(_) => None,
        }
    }
}

impl From<std::io::Error> for DaemonError {
    fn from(err: std::io::Error) -> Self {
        DaemonError::IoError(err)
    }
}

impl From<serde_json::Error> for DaemonError {
    fn from(err: serde_json::Error) -> Self {
        DaemonError::SerializationError(err)
    }
}

impl From<LoadError> for DaemonError {
    fn from(err: LoadError) -> Self {
        DaemonError::ScriptError(err)
    }
}

impl From<tripwire_core::CoreError> for DaemonError {
    fn from(err: tripwire_core::CoreError) -> Self {
        DaemonError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DaemonError>;
