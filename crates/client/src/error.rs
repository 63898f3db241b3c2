use ethers::providers::ProviderError;
use std::time::Duration;
use thiserror::Error;
use userop_builder::BuildError;
use userop_primitives::{AbiError, UserOperationHash};

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client could not be set up, it is not usable
    #[error("client configuration error: {inner}")]
    Configuration { inner: String },

    /// JSON-RPC call failed (never retried)
    #[error(transparent)]
    Transport(#[from] ProviderError),

    #[error(transparent)]
    Build(#[from] BuildError),

    /// Data could not be encoded or decoded
    #[error(transparent)]
    Encoding(#[from] AbiError),

    /// No result before the wait timeout
    #[error("user operation not resolved within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("waiting for user operation cancelled")]
    Cancelled,

    /// Waiting for a user operation that was built in dry run mode
    #[error("user operation {hash} was not submitted")]
    NotSubmitted { hash: UserOperationHash },
}
