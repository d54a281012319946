//! Configuration loader
//!
//! Loads configuration from YAML files, environment variables, or programmatic API.
//! Priority: environment variables > provided config or file > defaults

use std::env;

use crate::config::types::{
    AwsAuthConfig, Compression, ExporterConfig, ResourcePathScheme, SigV4Config,
};
use crate::error::ConfigError;
use crate::otlp::Signal;
use tracing::{debug, info, warn};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from YAML file
    pub fn from_yaml(path: impl AsRef<std::path::Path>) -> Result<ExporterConfig, ConfigError> {
        let path = path.as_ref();
        info!(
            config_path = %path.display(),
            "Loading configuration from YAML file"
        );

        let content = std::fs::read_to_string(path).map_err(|e| {
            warn!(
                config_path = %path.display(),
                error = %e,
                "Failed to read configuration file"
            );
            ConfigError::Load(format!("Failed to read config file: {}", e))
        })?;

        debug!(
            config_path = %path.display(),
            file_size_bytes = content.len(),
            "Read configuration file"
        );

        let config: ExporterConfig = serde_yaml::from_str(&content).map_err(|e| {
            warn!(
                config_path = %path.display(),
                error = %e,
                "Failed to parse YAML configuration"
            );
            ConfigError::Load(format!("Failed to parse YAML: {}", e))
        })?;

        Self::finish(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<ExporterConfig, ConfigError> {
        info!("Loading configuration from environment variables");
        Self::finish(ExporterConfig::default())
    }

    /// Load configuration with priority: environment variables > provided config > defaults
    pub fn load(provided: Option<ExporterConfig>) -> Result<ExporterConfig, ConfigError> {
        if provided.is_some() {
            info!("Loading configuration with provided config and environment variable overrides");
        } else {
            info!("Loading configuration with defaults and environment variable overrides");
        }
        Self::finish(provided.unwrap_or_default())
    }

    fn finish(mut config: ExporterConfig) -> Result<ExporterConfig, ConfigError> {
        Self::apply_env_overrides(&mut config);
        debug!("Applied environment variable overrides");

        config.validate().map_err(|e| {
            warn!(error = %e, "Configuration validation failed");
            e
        })?;

        info!(
            endpoint = %config.destination.base_url(),
            compression = ?config.destination.compression,
            timeout_secs = config.destination.timeout_secs,
            pipeline_arn = config.aws_auth.as_ref().map(|a| a.pipeline_arn.as_str()).unwrap_or("none"),
            sigv4_enabled = config.sigv4().is_some(),
            "Configuration loaded and validated successfully"
        );

        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut ExporterConfig) {
        // DATAPREPPER_ENDPOINT
        if let Ok(url) = env::var("DATAPREPPER_ENDPOINT") {
            debug!(
                env_var = "DATAPREPPER_ENDPOINT",
                value = %url,
                "Applying environment variable override"
            );
            config.destination.endpoint = Some(url);
        }

        // DATAPREPPER_{TRACES,METRICS,LOGS}_ENDPOINT
        for signal in Signal::ALL {
            let var = format!("DATAPREPPER_{}_ENDPOINT", signal.as_str().to_uppercase());
            if let Ok(url) = env::var(&var) {
                debug!(env_var = %var, value = %url, "Applying environment variable override");
                config.destination.set_override_url(signal, Some(url));
            }
        }

        // DATAPREPPER_COMPRESSION
        if let Ok(value) = env::var("DATAPREPPER_COMPRESSION") {
            match Compression::parse(&value) {
                Some(compression) => config.destination.compression = compression,
                None => warn!(
                    env_var = "DATAPREPPER_COMPRESSION",
                    value = %value,
                    "Unknown compression, keeping configured value"
                ),
            }
        }

        // DATAPREPPER_TIMEOUT_SECS
        if let Ok(value) = env::var("DATAPREPPER_TIMEOUT_SECS") {
            match value.parse::<u64>() {
                Ok(secs) => {
                    debug!(
                        env_var = "DATAPREPPER_TIMEOUT_SECS",
                        value = secs,
                        "Applying environment variable override"
                    );
                    config.destination.timeout_secs = secs;
                }
                Err(e) => {
                    warn!(
                        env_var = "DATAPREPPER_TIMEOUT_SECS",
                        value = %value,
                        error = %e,
                        "Failed to parse environment variable, using default"
                    );
                }
            }
        }

        // DATAPREPPER_HEADERS (comma-separated key=value pairs)
        if let Ok(value) = env::var("DATAPREPPER_HEADERS") {
            for pair in value.split(',').filter(|p| !p.trim().is_empty()) {
                match pair.split_once('=') {
                    Some((name, val)) => {
                        config
                            .destination
                            .headers
                            .insert(name.trim().to_string(), val.trim().to_string());
                    }
                    None => warn!(
                        env_var = "DATAPREPPER_HEADERS",
                        entry = %pair,
                        "Ignoring header entry without '='"
                    ),
                }
            }
        }

        // DATAPREPPER_PIPELINE_ARN
        if let Ok(arn) = env::var("DATAPREPPER_PIPELINE_ARN") {
            debug!(
                env_var = "DATAPREPPER_PIPELINE_ARN",
                value = %arn,
                "Applying environment variable override"
            );
            match config.aws_auth.as_mut() {
                Some(auth) => auth.pipeline_arn = arn,
                None => config.aws_auth = Some(AwsAuthConfig::new(arn)),
            }
        }

        let Some(auth) = config.aws_auth.as_mut() else {
            return;
        };

        // DATAPREPPER_RESOURCE_PATH_SCHEME
        if let Ok(value) = env::var("DATAPREPPER_RESOURCE_PATH_SCHEME") {
            match ResourcePathScheme::parse(&value) {
                Some(scheme) => auth.resource_path_scheme = scheme,
                None => warn!(
                    env_var = "DATAPREPPER_RESOURCE_PATH_SCHEME",
                    value = %value,
                    "Unknown resource path scheme, keeping configured value"
                ),
            }
        }

        // DATAPREPPER_SIGV4_REGION
        if let Ok(region) = env::var("DATAPREPPER_SIGV4_REGION") {
            match auth.sigv4.as_mut() {
                Some(sigv4) => sigv4.region = region,
                None => auth.sigv4 = Some(SigV4Config::new(region)),
            }
        }

        // DATAPREPPER_SIGV4_ROLE_ARN
        if let Ok(role_arn) = env::var("DATAPREPPER_SIGV4_ROLE_ARN") {
            match auth.sigv4.as_mut() {
                Some(sigv4) => sigv4.role_arn = Some(role_arn),
                None => {
                    // Signing was asked for; validation reports the missing region.
                    let mut sigv4 = SigV4Config::new(String::new());
                    sigv4.role_arn = Some(role_arn);
                    auth.sigv4 = Some(sigv4);
                }
            }
        }
    }
}
