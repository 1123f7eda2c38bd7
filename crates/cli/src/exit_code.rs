//! Exit codes for the schema CLI.
//!
//! Each failing pipeline stage gets its own code so scripts and CI systems
//! can tell a misconfigured run from an unreachable endpoint.

use graphql_config::ConfigError;
use graphql_introspect::IntrospectionError;

/// Exit codes used by the CLI.
///
/// These follow standard Unix conventions where 0 indicates success
/// and non-zero values indicate different types of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - schema written
    Success = 0,
    /// Configuration error (no endpoint, invalid config file or URL)
    ConfigError = 2,
    /// The server answered with GraphQL errors
    SchemaError = 3,
    /// I/O error (output could not be written)
    IoError = 4,
    /// The response could not be decoded into a schema
    DecodeError = 5,
    /// Transport failure (connection, timeout, non-2xx status)
    NetworkError = 6,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema error"),
            Self::IoError => write!(f, "I/O error"),
            Self::DecodeError => write!(f, "decode error"),
            Self::NetworkError => write!(f, "network error"),
        }
    }
}

/// How a failed run is reported: which stage failed and the code to exit with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub stage: String,
    pub code: ExitCode,
}

impl Failure {
    /// Classify an error by the first known error type in its chain.
    ///
    /// Anything that is neither a pipeline nor an I/O error happened while
    /// working out what to download, so it counts as configuration.
    #[must_use]
    pub fn from_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if let Some(err) = cause.downcast_ref::<IntrospectionError>() {
                return Self {
                    stage: err.stage().to_string(),
                    code: code_for(err),
                };
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return Self::config();
            }
            if cause.downcast_ref::<std::io::Error>().is_some() {
                return Self {
                    stage: "write".to_string(),
                    code: ExitCode::IoError,
                };
            }
        }
        Self::config()
    }

    fn config() -> Self {
        Self {
            stage: "config".to_string(),
            code: ExitCode::ConfigError,
        }
    }
}

const fn code_for(err: &IntrospectionError) -> ExitCode {
    match err {
        IntrospectionError::InvalidUrl { .. } => ExitCode::ConfigError,
        IntrospectionError::Network(_) | IntrospectionError::Http(..) => ExitCode::NetworkError,
        IntrospectionError::Schema(_) => ExitCode::SchemaError,
        IntrospectionError::Decode(_)
        | IntrospectionError::Model(_)
        | IntrospectionError::Invalid(_) => ExitCode::DecodeError,
        IntrospectionError::Io { .. } => ExitCode::IoError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use graphql_introspect::GraphQLError;
    use std::path::PathBuf;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            ExitCode::Success,
            ExitCode::ConfigError,
            ExitCode::SchemaError,
            ExitCode::IoError,
            ExitCode::DecodeError,
            ExitCode::NetworkError,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a.code(), b.code(), "{a} and {b} share a code");
            }
        }
        assert_eq!(ExitCode::Success.code(), 0);
    }

    #[test]
    fn test_network_failure() {
        let err = anyhow::Error::new(IntrospectionError::Network("connection refused".into()));
        let failure = Failure::from_error(&err);
        assert_eq!(failure.stage, "fetch");
        assert_eq!(failure.code, ExitCode::NetworkError);

        let err = anyhow::Error::new(IntrospectionError::Http(502, "Bad Gateway".into()));
        assert_eq!(Failure::from_error(&err).code, ExitCode::NetworkError);
    }

    #[test]
    fn test_server_errors() {
        let err = anyhow::Error::new(IntrospectionError::Schema(vec![GraphQLError {
            message: "Introspection is disabled".into(),
            locations: None,
            path: None,
            extensions: None,
        }]));
        let failure = Failure::from_error(&err);
        assert_eq!(failure.stage, "validate");
        assert_eq!(failure.code, ExitCode::SchemaError);
    }

    #[test]
    fn test_decode_failures_keep_their_stage() {
        let err = anyhow::Error::new(IntrospectionError::Decode("expected value".into()));
        assert_eq!(
            Failure::from_error(&err),
            Failure {
                stage: "fetch".into(),
                code: ExitCode::DecodeError
            }
        );

        let err = anyhow::Error::new(IntrospectionError::Model("unknown variant".into()));
        assert_eq!(
            Failure::from_error(&err),
            Failure {
                stage: "encode".into(),
                code: ExitCode::DecodeError
            }
        );
    }

    #[test]
    fn test_write_failure() {
        let err = anyhow::Error::new(IntrospectionError::Io {
            path: PathBuf::from("/nonexistent/schema.graphql"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        let failure = Failure::from_error(&err);
        assert_eq!(failure.stage, "write");
        assert_eq!(failure.code, ExitCode::IoError);
    }

    #[test]
    fn test_stdout_failure_is_io() {
        let err = Err::<(), _>(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            .context("Failed to write to stdout")
            .unwrap_err();
        assert_eq!(Failure::from_error(&err).code, ExitCode::IoError);
    }

    #[test]
    fn test_context_wrapped_config_error() {
        let err = Err::<(), _>(ConfigError::UnsupportedFormat(PathBuf::from("x.toml")))
            .context("Failed to load config")
            .unwrap_err();
        let failure = Failure::from_error(&err);
        assert_eq!(failure.stage, "config");
        assert_eq!(failure.code, ExitCode::ConfigError);
    }

    #[test]
    fn test_plain_errors_are_config() {
        let err = anyhow::anyhow!("No GraphQL endpoint given");
        assert_eq!(Failure::from_error(&err).code, ExitCode::ConfigError);

        let err = anyhow::Error::new(IntrospectionError::InvalidUrl {
            url: "ftp://x".into(),
            reason: "unsupported scheme".into(),
        });
        let failure = Failure::from_error(&err);
        assert_eq!(failure.stage, "fetch");
        assert_eq!(failure.code, ExitCode::ConfigError);
    }
}
