//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable errors surfaced to the peer bootstrap.
///
/// None of these are transient: they are a function of static configuration,
/// so callers abort startup rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The string cannot be split into a host and a port.
    #[error("malformed address {address:?}: {reason}")]
    MalformedAddress { address: String, reason: String },

    /// A wildcard host cannot be turned into a dialable address.
    #[error("unresolvable wildcard address {address:?}: {reason}")]
    UnresolvableWildcard { address: String, reason: String },

    /// The handler chain configuration is structurally malformed.
    #[error("invalid handler spec: {0}")]
    InvalidHandlerSpec(String),

    /// Configuration file could not be read or decoded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn malformed(address: &str, reason: impl Into<String>) -> Self {
        Error::MalformedAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn wildcard(address: &str, reason: impl Into<String>) -> Self {
        Error::UnresolvableWildcard {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}
