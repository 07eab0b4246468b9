#[cfg(test)]
mod tests {
    use crate::{DaemonError, Result};
    use std::error::Error;
    use std::io;
    use tripwire_core::LoadError;

    #[test]
    fn test_daemon_error_display() {
        let err = DaemonError::ServerError("failed to bind".to_string());
        assert_eq!(err.to_string(), "Server error: failed to bind");

        let err = DaemonError::ConfigError("host cannot be empty".to_string());
        assert_eq!(err.to_string(), "Configuration error: host cannot be empty");

        let err = DaemonError::ScriptError(LoadError::Invalid("probes[0].url: cannot be empty".into()));
        assert_eq!(
            err.to_string(),
            "Script error: invalid probe script: probes[0].url: cannot be empty"
        );

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = DaemonError::IoError(io_err);
        assert!(err.to_string().contains("access denied"));

        let serde_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err = DaemonError::SerializationError(serde_err);
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_daemon_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let daemon_err: DaemonError = io_err.into();

        if let DaemonError::IoError(_) = daemon_err {
            // Expected variant
        } else {
            panic!("Expected DaemonError::IoError variant");
        }
    }

    #[test]
    fn test_daemon_error_from_load_error() {
        let daemon_err: DaemonError = LoadError::Invalid("bad".to_string()).into();
        assert!(matches!(daemon_err, DaemonError::ScriptError(_)));
        assert!(daemon_err.source().is_some());
    }

    #[test]
    fn test_daemon_error_from_core_error() {
        let core_err = tripwire_core::CoreError::ConfigurationError("Host cannot be empty".into());
        let daemon_err: DaemonError = core_err.into();
        assert!(matches!(daemon_err, DaemonError::ConfigError(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<u32> {
            Ok(42)
        }

        fn returns_err() -> Result<u32> {
            Err(DaemonError::ServerError("test failure".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_source() {
        let err = DaemonError::ServerError("test".to_string());
        let _: &dyn Error = &err;
        assert!(err.source().is_none());
    }
}
