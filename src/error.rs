//! Error types for the Data Prepper exporter
//!
//! Construction-time problems (bad ARNs, missing endpoints, invalid signing
//! settings) are reported through [`ConfigError`]. Problems local to a single
//! send attempt that happen before anything reaches the network are reported
//! through [`SigningError`] or I/O errors. Everything the remote side says is
//! an [`Outcome`](crate::otlp::Outcome), not an error.

use thiserror::Error;

use crate::otlp::Signal;

/// Main error type for the Data Prepper exporter
#[derive(Error, Debug)]
pub enum ExporterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Request signing errors
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// I/O errors (payload compression)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be created
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Resource identifier is not a well-formed ARN
    #[error("failed to parse pipeline_arn: {0}")]
    MalformedIdentity(String),

    /// ARN resource does not match the active resource-path scheme
    #[error("invalid resource format in pipeline_arn: {0}")]
    InvalidResourcePath(String),

    /// Per-signal override URL is not a valid URL
    #[error("{signal}_endpoint must be a valid URL")]
    InvalidEndpointUrl {
        /// Signal whose override was rejected
        signal: Signal,
    },

    /// Neither the base endpoint nor the per-signal override is set
    #[error("either endpoint or {signal}_endpoint must be specified")]
    MissingEndpoint {
        /// Signal that has no destination
        signal: Signal,
    },

    /// Role ARN for SigV4 is not an ARN
    #[error("invalid role_arn: {0}")]
    InvalidRoleArn(String),

    /// SigV4 requested without a region
    #[error("region cannot be empty")]
    MissingRegion,

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Configuration source could not be read or parsed
    #[error("Failed to load configuration: {0}")]
    Load(String),
}

/// Request signing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The credentials provider could not supply credentials
    #[error("no AWS credentials available: {0}")]
    MissingCredentials(String),

    /// A header to sign, or a computed signature header, is not a valid value
    #[error("invalid header for signing: {0}")]
    InvalidHeader(String),

    /// The request could not be signed
    #[error("failed to sign request: {0}")]
    Signature(String),
}
