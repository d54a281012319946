//! Credential sources for request signing
//!
//! Credential discovery belongs to the host application. The signer asks a
//! [`SharedCredentialsProvider`] for credentials at signing time, so any
//! `aws-credential-types` provider (profile chains, IMDS, assumed roles) plugs
//! in directly. [`EnvCredentialsProvider`] covers the plain environment
//! variables.

use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::{self, ProvideCredentials, future};
use std::env;

pub use aws_credential_types::Credentials;
pub use aws_credential_types::provider::SharedCredentialsProvider;

const PROVIDER_NAME: &str = "DataPrepperEnvironment";

/// Credentials read from the process environment on every call
///
/// Reads `AWS_ACCESS_KEY_ID` (or `AWS_ACCESS_KEY`), `AWS_SECRET_ACCESS_KEY`
/// (or `AWS_SECRET_KEY`) and the optional `AWS_SESSION_TOKEN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialsProvider;

impl EnvCredentialsProvider {
    /// Create a provider reading the standard AWS variables
    pub fn new() -> Self {
        Self
    }

    fn load(&self) -> provider::Result {
        let access_key_id = first_var(&["AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY"]).ok_or_else(|| {
            CredentialsError::not_loaded("AWS_ACCESS_KEY_ID or AWS_ACCESS_KEY is not set")
        })?;
        let secret = first_var(&["AWS_SECRET_ACCESS_KEY", "AWS_SECRET_KEY"]).ok_or_else(|| {
            CredentialsError::not_loaded("AWS_SECRET_ACCESS_KEY or AWS_SECRET_KEY is not set")
        })?;

        Ok(Credentials::new(
            access_key_id,
            secret,
            first_var(&["AWS_SESSION_TOKEN"]),
            None,
            PROVIDER_NAME,
        ))
    }
}

fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.is_empty())
}

impl ProvideCredentials for EnvCredentialsProvider {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::ready(self.load())
    }
}
