use crate::context::UserOperationMiddlewareContext;
use async_trait::async_trait;
use ethers::providers::ProviderError;
use thiserror::Error;
use userop_primitives::AbiError;
use userop_provider::ContractCallError;

/// Error reported by a middleware
#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// JSON-RPC call failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Contract call could not be encoded or its result decoded
    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error("signer error: {inner}")]
    Signer { inner: String },

    #[error("{inner}")]
    Other { inner: String },
}

impl From<ContractCallError> for MiddlewareError {
    fn from(err: ContractCallError) -> Self {
        match err {
            ContractCallError::Provider(err) => Self::Provider(err),
            ContractCallError::Abi(err) => Self::Abi(err),
        }
    }
}

impl MiddlewareError {
    pub fn other<T: ToString>(inner: T) -> Self {
        Self::Other { inner: inner.to_string() }
    }
}

/// A build step of the user operation
///
/// Middleware run one after another in the order they were added to the builder, each one seeing
/// every change made by the ones before it.
#[async_trait]
pub trait UserOperationMiddleware: Send + Sync {
    /// Name used in logs and build errors
    fn name(&self) -> &str;

    async fn handle(&self, ctx: &mut UserOperationMiddlewareContext)
        -> Result<(), MiddlewareError>;
}

/// Middleware wrapping a synchronous closure
pub struct FnMiddleware<F> {
    name: String,
    f: F,
}

/// Creates middleware from a closure
pub fn middleware_fn<F>(name: impl Into<String>, f: F) -> FnMiddleware<F>
where
    F: Fn(&mut UserOperationMiddlewareContext) -> Result<(), MiddlewareError> + Send + Sync,
{
    FnMiddleware { name: name.into(), f }
}

#[async_trait]
impl<F> UserOperationMiddleware for FnMiddleware<F>
where
    F: Fn(&mut UserOperationMiddlewareContext) -> Result<(), MiddlewareError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(
        &self,
        ctx: &mut UserOperationMiddlewareContext,
    ) -> Result<(), MiddlewareError> {
        (self.f)(ctx)
    }
}
