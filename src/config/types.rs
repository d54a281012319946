//! Configuration type definitions
//!
//! Defines the destination and AWS authentication settings consumed by the
//! exporter. Each concern is its own named structure; the loader merges
//! sources into an [`ExporterConfig`] and validates it once.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::aws::arn::{ResourceIdentity, is_arn};
use crate::aws::routing::PipelineRouting;
use crate::error::ConfigError;
use crate::otlp::Signal;

/// Payload compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// Send the payload as-is
    #[default]
    None,
    /// Gzip the payload and set `Content-Encoding: gzip`
    Gzip,
}

impl Compression {
    /// Parse `none` or `gzip`, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(Self::None),
            "gzip" => Some(Self::Gzip),
            _ => None,
        }
    }
}

/// Expected shape of the resource path in a pipeline ARN
///
/// Only one scheme is active per exporter; the default is
/// [`ResourcePathScheme::DataPrepper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourcePathScheme {
    /// `pipeline/<name>`
    Pipeline,
    /// `es/dataprepper/<name>`
    #[default]
    #[serde(alias = "dataprepper")]
    DataPrepper,
}

impl ResourcePathScheme {
    /// Fixed segments preceding the pipeline name
    pub fn prefix(&self) -> &'static [&'static str] {
        match self {
            Self::Pipeline => &["pipeline"],
            Self::DataPrepper => &["es", "dataprepper"],
        }
    }

    /// Parse a scheme name as used in configuration
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pipeline" => Some(Self::Pipeline),
            "data_prepper" | "dataprepper" => Some(Self::DataPrepper),
            _ => None,
        }
    }
}

/// Where and how payloads are sent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DestinationConfig {
    /// Base endpoint; `/v1/<signal>` is appended per signal
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Trace URL, used verbatim when set
    #[serde(default)]
    pub traces_endpoint: Option<String>,

    /// Metrics URL, used verbatim when set
    #[serde(default)]
    pub metrics_endpoint: Option<String>,

    /// Logs URL, used verbatim when set
    #[serde(default)]
    pub logs_endpoint: Option<String>,

    /// Payload compression (default: none)
    #[serde(default)]
    pub compression: Compression,

    /// Static headers added to every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Per-attempt deadline in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            traces_endpoint: None,
            metrics_endpoint: None,
            logs_endpoint: None,
            compression: Compression::default(),
            headers: HashMap::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DestinationConfig {
    /// Base endpoint, empty when unset
    pub fn base_url(&self) -> &str {
        self.endpoint.as_deref().unwrap_or("")
    }

    /// Override URL for `signal`, empty when unset
    pub fn override_url(&self, signal: Signal) -> &str {
        let url = match signal {
            Signal::Traces => &self.traces_endpoint,
            Signal::Metrics => &self.metrics_endpoint,
            Signal::Logs => &self.logs_endpoint,
        };
        url.as_deref().unwrap_or("")
    }

    /// Set the override URL for `signal`
    pub fn set_override_url(&mut self, signal: Signal, url: Option<String>) {
        match signal {
            Signal::Traces => self.traces_endpoint = url,
            Signal::Metrics => self.metrics_endpoint = url,
            Signal::Logs => self.logs_endpoint = url,
        }
    }

    /// Per-attempt deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate destination settings
    ///
    /// Whether each signal has somewhere to go is checked when its sender is
    /// built, so a configuration that only serves some signals stays valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            let url = Url::parse(endpoint).map_err(|e| {
                ConfigError::ValidationFailed(format!("invalid endpoint {endpoint}: {e}"))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::ValidationFailed(
                    "endpoint must use http:// or https:// scheme".to_string(),
                ));
            }
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        for (name, value) in &self.headers {
            if reqwest::header::HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(ConfigError::ValidationFailed(format!(
                    "invalid header name: {name}"
                )));
            }
            if reqwest::header::HeaderValue::from_str(value).is_err() {
                return Err(ConfigError::ValidationFailed(format!(
                    "invalid value for header {name}"
                )));
            }
        }

        Ok(())
    }
}

/// AWS Signature Version 4 settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SigV4Config {
    /// Signing region
    pub region: String,

    /// Role to sign as (optional)
    #[serde(default)]
    pub role_arn: Option<String>,

    /// Extra request headers to include in the signature
    #[serde(default)]
    pub signed_headers: Vec<String>,
}

impl SigV4Config {
    /// SigV4 settings for `region`
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            role_arn: None,
            signed_headers: Vec::new(),
        }
    }

    /// Validate signing settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::MissingRegion);
        }
        if let Some(role_arn) = self.role_arn.as_deref().filter(|r| !r.is_empty()) {
            if !is_arn(role_arn) {
                return Err(ConfigError::InvalidRoleArn(role_arn.to_string()));
            }
        }
        Ok(())
    }
}

/// Pipeline identity and optional request signing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AwsAuthConfig {
    /// ARN naming the destination pipeline
    pub pipeline_arn: String,

    /// Resource path scheme the ARN must follow
    #[serde(default)]
    pub resource_path_scheme: ResourcePathScheme,

    /// Signing settings; `None` sends unsigned requests
    #[serde(default)]
    pub sigv4: Option<SigV4Config>,
}

impl AwsAuthConfig {
    /// Unsigned routing to `pipeline_arn` under the default scheme
    pub fn new(pipeline_arn: impl Into<String>) -> Self {
        Self {
            pipeline_arn: pipeline_arn.into(),
            resource_path_scheme: ResourcePathScheme::default(),
            sigv4: None,
        }
    }

    /// Use `scheme` for the resource path
    pub fn with_scheme(mut self, scheme: ResourcePathScheme) -> Self {
        self.resource_path_scheme = scheme;
        self
    }

    /// Sign requests with `sigv4`
    pub fn with_sigv4(mut self, sigv4: SigV4Config) -> Self {
        self.sigv4 = Some(sigv4);
        self
    }

    /// Parsed pipeline ARN
    pub fn identity(&self) -> Result<ResourceIdentity, ConfigError> {
        ResourceIdentity::parse(&self.pipeline_arn)
    }

    /// Routing header and host for the pipeline
    pub fn routing(&self) -> Result<PipelineRouting, ConfigError> {
        PipelineRouting::derive(&self.identity()?, self.resource_path_scheme)
    }

    /// Validate the pipeline ARN and signing settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.routing()?;
        if let Some(ref sigv4) = self.sigv4 {
            sigv4.validate()?;
        }
        Ok(())
    }
}

/// Exporter configuration
///
/// # Example
///
/// ```no_run
/// use dataprepper_exporter::config::{AwsAuthConfig, ConfigBuilder, SigV4Config};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConfigBuilder::new()
///     .endpoint("https://pipeline.us-east-1.osis.amazonaws.com")
///     .aws_auth(
///         AwsAuthConfig::new("arn:aws:es:us-east-1:123456789012:es/dataprepper/my-pipeline")
///             .with_sigv4(SigV4Config::new("us-east-1")),
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExporterConfig {
    /// Destination settings
    #[serde(default)]
    pub destination: DestinationConfig,

    /// Pipeline routing and signing (optional)
    #[serde(default)]
    pub aws_auth: Option<AwsAuthConfig>,
}

impl ExporterConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.destination.validate()?;
        if let Some(ref aws_auth) = self.aws_auth {
            aws_auth.validate()?;
        }
        Ok(())
    }

    /// Signing settings, if signing is enabled
    pub fn sigv4(&self) -> Option<&SigV4Config> {
        self.aws_auth.as_ref().and_then(|auth| auth.sigv4.as_ref())
    }
}

/// Builder for creating configurations programmatically
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: ExporterConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base endpoint
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.destination.endpoint = Some(url.into());
        self
    }

    /// Set the override URL for one signal
    pub fn signal_endpoint(mut self, signal: Signal, url: impl Into<String>) -> Self {
        self.config
            .destination
            .set_override_url(signal, Some(url.into()));
        self
    }

    /// Set payload compression
    pub fn compression(mut self, compression: Compression) -> Self {
        self.config.destination.compression = compression;
        self
    }

    /// Add a static header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .destination
            .headers
            .insert(name.into(), value.into());
        self
    }

    /// Set the per-attempt deadline in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.destination.timeout_secs = secs;
        self
    }

    /// Route to a pipeline, optionally signing
    pub fn aws_auth(mut self, aws_auth: AwsAuthConfig) -> Self {
        self.config.aws_auth = Some(aws_auth);
        self
    }

    /// Build the configuration with validation
    pub fn build(self) -> Result<ExporterConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIPELINE_ARN: &str = "arn:aws:es:us-east-1:123456789012:es/dataprepper/test-name";

    #[test]
    fn test_defaults() {
        let config = ExporterConfig::default();
        assert_eq!(config.destination.endpoint, None);
        assert_eq!(config.destination.timeout(), Duration::from_secs(30));
        assert_eq!(config.destination.compression, Compression::None);
        assert!(config.destination.headers.is_empty());
        assert!(config.aws_auth.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sigv4_requires_region() {
        let auth = AwsAuthConfig::new(PIPELINE_ARN).with_sigv4(SigV4Config::new(""));
        assert_eq!(auth.validate(), Err(ConfigError::MissingRegion));
    }

    #[test]
    fn test_sigv4_rejects_bad_role_arn() {
        let mut sigv4 = SigV4Config::new("us-east-1");
        sigv4.role_arn = Some("exporter-role".to_string());
        assert_eq!(
            sigv4.validate(),
            Err(ConfigError::InvalidRoleArn("exporter-role".to_string()))
        );

        sigv4.role_arn = Some("arn:aws:iam::123456789012:role/exporter".to_string());
        assert!(sigv4.validate().is_ok());
    }

    #[test]
    fn test_pipeline_arn_is_validated() {
        assert!(matches!(
            AwsAuthConfig::new("not-an-arn").validate(),
            Err(ConfigError::MalformedIdentity(_))
        ));
        assert!(matches!(
            AwsAuthConfig::new(PIPELINE_ARN)
                .with_scheme(ResourcePathScheme::Pipeline)
                .validate(),
            Err(ConfigError::InvalidResourcePath(_))
        ));
        assert!(AwsAuthConfig::new(PIPELINE_ARN).validate().is_ok());
    }

    #[test]
    fn test_builder_validates() {
        let err = ConfigBuilder::new().endpoint("ftp://example.com").build();
        assert!(matches!(err, Err(ConfigError::ValidationFailed(_))));

        let err = ConfigBuilder::new().timeout_secs(0).build();
        assert!(matches!(err, Err(ConfigError::ValidationFailed(_))));

        let config = ConfigBuilder::new()
            .endpoint("https://1.2.3.4:1234")
            .signal_endpoint(Signal::Logs, "https://logs.example.com/ingest")
            .compression(Compression::Gzip)
            .header("header1", "234")
            .timeout_secs(10)
            .build()
            .unwrap();

        assert_eq!(config.destination.base_url(), "https://1.2.3.4:1234");
        assert_eq!(
            config.destination.override_url(Signal::Logs),
            "https://logs.example.com/ingest"
        );
        assert_eq!(config.destination.override_url(Signal::Traces), "");
        assert_eq!(config.destination.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_static_header() {
        let err = ConfigBuilder::new().header("bad header", "v").build();
        assert!(matches!(err, Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn test_scheme_and_compression_parsing() {
        assert_eq!(ResourcePathScheme::parse("pipeline"), Some(ResourcePathScheme::Pipeline));
        assert_eq!(
            ResourcePathScheme::parse("DataPrepper"),
            Some(ResourcePathScheme::DataPrepper)
        );
        assert_eq!(ResourcePathScheme::parse("other"), None);
        assert_eq!(Compression::parse("GZIP"), Some(Compression::Gzip));
        assert_eq!(Compression::parse("zstd"), None);
    }
}
