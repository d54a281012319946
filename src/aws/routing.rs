//! Pipeline routing derived from a pipeline ARN
//!
//! A multi-tenant ingestion host selects the target pipeline from a routing
//! header and is addressed by an account- and region-specific host name.

use crate::aws::arn::ResourceIdentity;
use crate::config::ResourcePathScheme;
use crate::error::ConfigError;

/// Header carrying the pipeline name
pub const PIPELINE_HEADER: &str = "x-data-prepper-pipeline";

/// Domain suffix of the ingestion hosts
pub const INGESTION_DOMAIN: &str = "amazonaws.com";

/// Routing values for one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRouting {
    /// Value of [`PIPELINE_HEADER`]
    pub pipeline_name: String,
    /// Value of the HTTP `Host` header
    pub host: String,
}

impl PipelineRouting {
    /// Derive routing from a parsed identity under `scheme`
    pub fn derive(
        identity: &ResourceIdentity,
        scheme: ResourcePathScheme,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            pipeline_name: pipeline_header(identity, scheme)?,
            host: host_header(identity),
        })
    }

    /// Parse `pipeline_arn` and derive routing from it
    pub fn from_arn(pipeline_arn: &str, scheme: ResourcePathScheme) -> Result<Self, ConfigError> {
        let identity = ResourceIdentity::parse(pipeline_arn)?;
        Self::derive(&identity, scheme)
    }
}

/// Pipeline name carried in the routing header
///
/// The resource path must match `scheme` exactly and the trailing name must be
/// non-empty.
pub fn pipeline_header(
    identity: &ResourceIdentity,
    scheme: ResourcePathScheme,
) -> Result<String, ConfigError> {
    let prefix = scheme.prefix();
    let path = &identity.resource_path;

    let valid = path.len() == prefix.len() + 1
        && path.iter().zip(prefix).all(|(segment, expected)| segment == expected)
        && path.last().is_some_and(|name| !name.is_empty());

    if !valid {
        return Err(ConfigError::InvalidResourcePath(identity.resource()));
    }

    Ok(path[prefix.len()].clone())
}

/// Host name of the ingestion endpoint for `identity`
pub fn host_header(identity: &ResourceIdentity) -> String {
    format!(
        "{}.ingest.{}.{}",
        identity.account, identity.region, INGESTION_DOMAIN
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(arn: &str) -> ResourceIdentity {
        ResourceIdentity::parse(arn).unwrap()
    }

    #[test]
    fn test_pipeline_scheme() {
        let id = identity("arn:aws:osis:us-east-1:123456789012:pipeline/test-name");
        assert_eq!(
            pipeline_header(&id, ResourcePathScheme::Pipeline).unwrap(),
            "test-name"
        );
    }

    #[test]
    fn test_dataprepper_scheme() {
        let routing = PipelineRouting::from_arn(
            "arn:aws:es:us-east-1:123456789012:es/dataprepper/test-name",
            ResourcePathScheme::DataPrepper,
        )
        .unwrap();

        assert_eq!(routing.pipeline_name, "test-name");
        assert_eq!(routing.host, "123456789012.ingest.us-east-1.amazonaws.com");
    }

    #[test]
    fn test_schemes_reject_each_other() {
        let pipeline = identity("arn:aws:osis:us-east-1:123456789012:pipeline/test-name");
        let dataprepper = identity("arn:aws:es:us-east-1:123456789012:es/dataprepper/test-name");

        assert_eq!(
            pipeline_header(&pipeline, ResourcePathScheme::DataPrepper),
            Err(ConfigError::InvalidResourcePath("pipeline/test-name".to_string()))
        );
        assert!(matches!(
            pipeline_header(&dataprepper, ResourcePathScheme::Pipeline),
            Err(ConfigError::InvalidResourcePath(_))
        ));
    }

    #[test]
    fn test_invalid_resource_paths() {
        let cases = [
            ("pipeline", ResourcePathScheme::Pipeline),
            ("pipeline/", ResourcePathScheme::Pipeline),
            ("pipeline/a/b", ResourcePathScheme::Pipeline),
            ("pipelines/a", ResourcePathScheme::Pipeline),
            ("es/dataprepper", ResourcePathScheme::DataPrepper),
            ("es/dataprepper/", ResourcePathScheme::DataPrepper),
            ("es/other/test-name", ResourcePathScheme::DataPrepper),
            ("os/dataprepper/test-name", ResourcePathScheme::DataPrepper),
            ("es/dataprepper/a/b", ResourcePathScheme::DataPrepper),
        ];

        for (resource, scheme) in cases {
            let id = identity(&format!("arn:aws:es:us-east-1:123456789012:{resource}"));
            assert!(
                matches!(
                    PipelineRouting::derive(&id, scheme),
                    Err(ConfigError::InvalidResourcePath(_))
                ),
                "{resource} should be rejected under {scheme:?}"
            );
        }
    }

    #[test]
    fn test_host_allows_empty_region() {
        let id = identity("arn:aws:es::123456789012:es/dataprepper/pipeline-name");
        assert_eq!(host_header(&id), "123456789012.ingest..amazonaws.com");
    }
}
