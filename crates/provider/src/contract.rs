use async_trait::async_trait;
use ethers::{
    abi::{Abi, Token},
    providers::{JsonRpcClient, Middleware, Provider, ProviderError},
    types::{transaction::eip2718::TypedTransaction, Address, BlockId, TransactionRequest},
};
use thiserror::Error;
use tracing::trace;
use userop_primitives::{
    contract::{decode_function_output, encode_function_call},
    AbiError,
};

/// Error of a read-only contract call
#[derive(Debug, Error)]
pub enum ContractCallError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Abi(#[from] AbiError),
}

/// Read-only contract calls through `eth_call`
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ContractReader {
    /// Calls `function` of the contract at `address` and decodes what it returns
    async fn read_from_contract(
        &self,
        address: Address,
        abi: &Abi,
        function: &str,
        args: &[Token],
        block: Option<BlockId>,
    ) -> Result<Vec<Token>, ContractCallError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<P> ContractReader for Provider<P>
where
    P: JsonRpcClient,
{
    async fn read_from_contract(
        &self,
        address: Address,
        abi: &Abi,
        function: &str,
        args: &[Token],
        block: Option<BlockId>,
    ) -> Result<Vec<Token>, ContractCallError> {
        let data = encode_function_call(abi, function, args)?;
        trace!("Calling {function} of {address:?}");

        let tx: TypedTransaction = TransactionRequest::new().to(address).data(data).into();
        let res = self.call(&tx, block).await?;
        Ok(decode_function_output(abi, function, &res)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{abi::encode, types::Bytes};
    use userop_primitives::contract::KnownContract;

    #[tokio::test]
    async fn read_balance() -> eyre::Result<()> {
        let (provider, mock) = Provider::mocked();
        mock.push::<Bytes, _>(Bytes::from(encode(&[Token::Uint(1_000.into())])))?;

        let token = Address::random();
        let owner = Address::random();
        let res = provider
            .read_from_contract(
                token,
                &KnownContract::Erc20.abi()?,
                "balanceOf",
                &[Token::Address(owner)],
                None,
            )
            .await?;
        assert_eq!(res, vec![Token::Uint(1_000.into())]);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_function_is_not_sent() -> eyre::Result<()> {
        // no response queued, a request would fail with a provider error
        let (provider, _mock) = Provider::mocked();

        let res = provider
            .read_from_contract(
                Address::random(),
                &KnownContract::Erc20.abi()?,
                "mint",
                &[],
                None,
            )
            .await;
        assert!(matches!(res, Err(ContractCallError::Abi(AbiError::UnknownFunction { .. }))));
        Ok(())
    }
}
