use crate::{
    context::UserOperationMiddlewareContext,
    middleware::{MiddlewareError, UserOperationMiddleware},
};
use async_trait::async_trait;
use ethers::{
    abi::Token,
    providers::{JsonRpcClient, Provider},
    types::U256,
};
use std::sync::Arc;
use tracing::trace;
use userop_primitives::{contract::KnownContract, UserOperationField};
use userop_provider::ContractReader;

/// Reads the sender's nonce for a nonce key from the entry point
///
/// A nonce set explicitly on the builder is kept.
#[derive(Debug)]
pub struct NonceMiddleware<P> {
    provider: Arc<Provider<P>>,
    key: U256,
}

impl<P> NonceMiddleware<P> {
    pub fn new(provider: Arc<Provider<P>>) -> Self {
        Self::with_key(provider, U256::zero())
    }

    /// Uses the nonce sequence of `key` (`uint192`)
    pub fn with_key(provider: Arc<Provider<P>>, key: U256) -> Self {
        Self { provider, key }
    }
}

#[async_trait]
impl<P> UserOperationMiddleware for NonceMiddleware<P>
where
    P: JsonRpcClient + 'static,
{
    fn name(&self) -> &str {
        "nonce"
    }

    async fn handle(
        &self,
        ctx: &mut UserOperationMiddlewareContext,
    ) -> Result<(), MiddlewareError> {
        if ctx.is_set(UserOperationField::Nonce) {
            trace!("Nonce set explicitly, not reading it from the entry point");
            return Ok(());
        }

        let res = self
            .provider
            .read_from_contract(
                ctx.entry_point,
                &KnownContract::EntryPoint.abi()?,
                "getNonce",
                &[Token::Address(ctx.op.sender), Token::Uint(self.key)],
                None,
            )
            .await?;

        match res.as_slice() {
            [Token::Uint(nonce)] => {
                ctx.op.nonce = *nonce;
                Ok(())
            }
            _ => Err(MiddlewareError::other("unexpected getNonce result")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{
        abi::encode,
        types::{Address, Bytes},
    };
    use userop_primitives::{contract::encode_function_call, UserOperation};

    #[test]
    fn call_data() {
        let sender: Address = "0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap();
        let data = encode_function_call(
            &KnownContract::EntryPoint.abi().unwrap(),
            "getNonce",
            &[Token::Address(sender), Token::Uint(1.into())],
        )
        .unwrap();

        // getNonce(address,uint192)
        assert_eq!(&data[..4], &[0x35, 0x56, 0x7e, 0x1a]);
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[16..36], sender.as_bytes());
        assert_eq!(data[67], 1);
    }

    #[tokio::test]
    async fn read_nonce() -> eyre::Result<()> {
        let (provider, mock) = Provider::mocked();
        mock.push::<Bytes, _>(Bytes::from(encode(&[Token::Uint(12.into())])))?;

        let mut ctx = UserOperationMiddlewareContext::new(
            UserOperation::default().sender(Address::random()),
            Address::random(),
            1.into(),
        );
        NonceMiddleware::with_key(Arc::new(provider), 1.into()).handle(&mut ctx).await?;

        assert_eq!(ctx.op.nonce, U256::from(12));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_result() -> eyre::Result<()> {
        let (provider, mock) = Provider::mocked();
        mock.push::<Bytes, _>(Bytes::from(vec![1, 2, 3]))?;

        let mut ctx = UserOperationMiddlewareContext::new(
            UserOperation::default(),
            Address::random(),
            1.into(),
        );
        let res = NonceMiddleware::new(Arc::new(provider)).handle(&mut ctx).await;
        assert!(matches!(res, Err(MiddlewareError::Abi(_))));
        Ok(())
    }

    #[tokio::test]
    async fn explicit_nonce_is_kept() -> eyre::Result<()> {
        // no response queued, a read would fail
        let (provider, _mock) = Provider::mocked();

        let mut ctx = UserOperationMiddlewareContext::new(
            UserOperation::default().nonce(7.into()),
            Address::random(),
            1.into(),
        )
        .with_explicit([UserOperationField::Nonce].into());
        NonceMiddleware::new(Arc::new(provider)).handle(&mut ctx).await?;

        assert_eq!(ctx.op.nonce, U256::from(7));
        Ok(())
    }
}
