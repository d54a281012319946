//! Data Prepper Exporter
//!
//! Request construction and response classification for exporting OTLP
//! payloads over HTTP to Data Prepper pipelines.
//!
//! # Features
//!
//! - Per-signal endpoint composition (`/v1/traces`, `/v1/metrics`, `/v1/logs`)
//! - Pipeline routing header and host derived from a pipeline ARN
//! - Optional AWS SigV4 request signing
//! - Optional gzip compression
//! - Response classification for an external retry layer
//! - Configurable via YAML, environment variables, or programmatic API
//!
//! # Example
//!
//! ```no_run
//! use dataprepper_exporter::{ConfigLoader, DataPrepperExporter};
//!
//! # async fn example() -> Result<(), dataprepper_exporter::ExporterError> {
//! let config = ConfigLoader::from_yaml("exporter.yaml")?;
//! let exporter = DataPrepperExporter::new(config)?;
//!
//! // let outcome = exporter.export_traces(&payload).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod aws;
pub mod config;
pub mod error;
pub mod otlp;

// Re-export public API
pub use api::public::DataPrepperExporter;
pub use config::{
    AwsAuthConfig, Compression, ConfigBuilder, ConfigLoader, DestinationConfig, ExporterConfig,
    ResourcePathScheme, SigV4Config,
};
pub use error::{ConfigError, ExporterError, SigningError};
pub use otlp::{Outcome, Signal, SignalSender};

// Initialize tracing subscriber for structured logging
use tracing_subscriber::EnvFilter;

/// Initialize structured logging
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}

/// Initialize structured logging with JSON output
pub fn init_json_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init();
}
