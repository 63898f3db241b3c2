use crate::{
    context::UserOperationMiddlewareContext,
    middleware::{MiddlewareError, UserOperationMiddleware},
};
use async_trait::async_trait;
use ethers::signers::Signer;
use tracing::trace;
use userop_primitives::UserOperationField;

/// Signs the user operation hash (EIP-191 personal message) with the signer
///
/// Must come last in the stack, any later change to the user operation invalidates the signature.
/// A signature set explicitly on the builder is kept.
#[derive(Debug)]
pub struct SignatureMiddleware<S> {
    signer: S,
}

impl<S> SignatureMiddleware<S> {
    pub fn new(signer: S) -> Self {
        Self { signer }
    }
}

#[async_trait]
impl<S> UserOperationMiddleware for SignatureMiddleware<S>
where
    S: Signer + 'static,
{
    fn name(&self) -> &str {
        "signature"
    }

    async fn handle(
        &self,
        ctx: &mut UserOperationMiddlewareContext,
    ) -> Result<(), MiddlewareError> {
        if ctx.is_set(UserOperationField::Signature) {
            trace!("Signature set explicitly, not signing");
            return Ok(());
        }

        let hash = ctx.user_operation_hash();
        let sig = self
            .signer
            .sign_message(hash.as_fixed_bytes())
            .await
            .map_err(|e| MiddlewareError::Signer { inner: e.to_string() })?;
        ctx.op.signature = sig.to_vec().into();
        Ok(())
    }
}
