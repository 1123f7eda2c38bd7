use crate::types::GraphQLError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntrospectionError>;

#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Failed to decode introspection response: {0}")]
    Decode(String),

    #[error("Introspection data does not match the schema model: {0}")]
    Model(String),

    #[error("Server returned {} error(s): {}", .0.len(), format_errors(.0))]
    Schema(Vec<GraphQLError>),

    #[error("Invalid introspection response: {0}")]
    Invalid(String),

    #[error("Failed to write schema to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Validate,
    Encode,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Validate => write!(f, "validate"),
            Self::Encode => write!(f, "encode"),
            Self::Write => write!(f, "write"),
        }
    }
}

impl IntrospectionError {
    /// The stage that failed.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::InvalidUrl { .. } | Self::Network(_) | Self::Http(..) | Self::Decode(_) => {
                Stage::Fetch
            }
            Self::Schema(_) | Self::Invalid(_) => Stage::Validate,
            Self::Model(_) => Stage::Encode,
            Self::Io { .. } => Stage::Write,
        }
    }

    /// Whether the payload could not be decoded, either as JSON or as a schema.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Model(_))
    }

    /// Whether the failure happened at the transport level.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http(..))
    }
}

fn format_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
