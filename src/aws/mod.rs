//! AWS integration
//!
//! Pipeline ARN parsing, routing derived from it, and SigV4 request signing.

pub mod arn;
pub mod credentials;
pub mod routing;
pub mod signer;

pub use arn::{ResourceIdentity, is_arn};
pub use credentials::{Credentials, EnvCredentialsProvider, SharedCredentialsProvider};
pub use routing::{PIPELINE_HEADER, PipelineRouting};
pub use signer::RequestSigner;
