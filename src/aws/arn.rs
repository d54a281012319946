//! Amazon Resource Name parsing
//!
//! Parses `arn:<partition>:<service>:<region>:<account>:<resource>` into a
//! [`ResourceIdentity`]. The resource section may itself contain colons; it is
//! split on `/` into path segments.

use crate::error::ConfigError;

const ARN_PREFIX: &str = "arn:";
const ARN_SECTIONS: usize = 6;

/// Typed view of a parsed ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
    /// Partition, e.g. `aws`
    pub partition: String,
    /// Service namespace, e.g. `es`
    pub service: String,
    /// Region, possibly empty
    pub region: String,
    /// Account identifier
    pub account: String,
    /// Resource path segments, in order
    pub resource_path: Vec<String>,
}

impl ResourceIdentity {
    /// Parse an ARN string
    ///
    /// Fails with [`ConfigError::MalformedIdentity`] when the string does not
    /// start with `arn:` or has fewer than six colon-delimited sections.
    pub fn parse(arn: &str) -> Result<Self, ConfigError> {
        if !arn.starts_with(ARN_PREFIX) {
            return Err(ConfigError::MalformedIdentity(arn.to_string()));
        }

        let sections: Vec<&str> = arn.splitn(ARN_SECTIONS, ':').collect();
        if sections.len() != ARN_SECTIONS {
            return Err(ConfigError::MalformedIdentity(arn.to_string()));
        }

        Ok(Self {
            partition: sections[1].to_string(),
            service: sections[2].to_string(),
            region: sections[3].to_string(),
            account: sections[4].to_string(),
            resource_path: sections[5].split('/').map(str::to_string).collect(),
        })
    }

    /// Resource section as it appeared in the ARN
    pub fn resource(&self) -> String {
        self.resource_path.join("/")
    }
}

/// Whether `value` has the structural shape of an ARN
pub fn is_arn(value: &str) -> bool {
    ResourceIdentity::parse(value).is_ok()
}
