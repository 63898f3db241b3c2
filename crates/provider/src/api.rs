use async_trait::async_trait;
use ethers::{
    providers::{JsonRpcClient, Provider, ProviderError},
    types::Address,
};
use userop_primitives::{
    constants::bundler::{
        ESTIMATE_USER_OPERATION_GAS, GET_USER_OPERATION_BY_HASH, GET_USER_OPERATION_RECEIPT,
        SEND_USER_OPERATION, SUPPORTED_ENTRY_POINTS,
    },
    UserOperation, UserOperationByHash, UserOperationGasEstimation, UserOperationHash,
    UserOperationReceipt,
};

/// Typed calls of the bundler JSON-RPC methods
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BundlerApi {
    /// Submits the user operation to the bundler's mempool
    async fn send_user_operation(
        &self,
        uo: &UserOperation,
        entry_point: &Address,
    ) -> Result<UserOperationHash, ProviderError>;

    /// Estimates the gas fields of the user operation
    async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
        entry_point: &Address,
    ) -> Result<UserOperationGasEstimation, ProviderError>;

    async fn get_user_operation_by_hash(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationByHash>, ProviderError>;

    /// Receipt of the user operation, `None` while it is not included yet
    async fn get_user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, ProviderError>;

    async fn supported_entry_points(&self) -> Result<Vec<Address>, ProviderError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<P> BundlerApi for Provider<P>
where
    P: JsonRpcClient,
{
    async fn send_user_operation(
        &self,
        uo: &UserOperation,
        entry_point: &Address,
    ) -> Result<UserOperationHash, ProviderError> {
        self.request(SEND_USER_OPERATION, (uo, entry_point)).await
    }

    async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
        entry_point: &Address,
    ) -> Result<UserOperationGasEstimation, ProviderError> {
        self.request(ESTIMATE_USER_OPERATION_GAS, (uo, entry_point)).await
    }

    async fn get_user_operation_by_hash(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationByHash>, ProviderError> {
        self.request(GET_USER_OPERATION_BY_HASH, [hash]).await
    }

    async fn get_user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, ProviderError> {
        self.request(GET_USER_OPERATION_RECEIPT, [hash]).await
    }

    async fn supported_entry_points(&self) -> Result<Vec<Address>, ProviderError> {
        self.request(SUPPORTED_ENTRY_POINTS, ()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BundlerProvider;
    use ethers::providers::MockProvider;
    use serde_json::{json, Value};

    fn provider() -> (Provider<BundlerProvider<MockProvider>>, MockProvider, MockProvider) {
        let default = MockProvider::new();
        let bundler = MockProvider::new();
        let provider =
            Provider::new(BundlerProvider::with_bundler(default.clone(), bundler.clone()));
        (provider, default, bundler)
    }

    #[tokio::test]
    async fn send_user_operation() -> eyre::Result<()> {
        let (provider, _, bundler) = provider();
        let entry_point: Address = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse()?;
        let uo = UserOperation::default().nonce(1.into());
        let hash = uo.hash(&entry_point, &1.into());

        bundler.push::<UserOperationHash, _>(hash)?;
        assert_eq!(provider.send_user_operation(&uo, &entry_point).await?, hash);
        bundler.assert_request(SEND_USER_OPERATION, (&uo, &entry_point))?;
        Ok(())
    }

    #[tokio::test]
    async fn estimate_user_operation_gas() -> eyre::Result<()> {
        let (provider, _, bundler) = provider();
        let entry_point = Address::random();
        bundler.push::<Value, _>(json!({
            "preVerificationGas": "0xafc8",
            "verificationGasLimit": "0x1d4c0",
            "callGasLimit": 33100
        }))?;

        let est =
            provider.estimate_user_operation_gas(&UserOperation::default(), &entry_point).await?;
        assert_eq!(est.call_gas_limit, 33_100.into());
        assert_eq!(est.verification_gas_limit(), Some(120_000.into()));
        Ok(())
    }

    #[tokio::test]
    async fn missing_receipt_is_none() -> eyre::Result<()> {
        let (provider, default, bundler) = provider();
        bundler.push::<Value, _>(Value::Null)?;

        let hash = UserOperationHash::default();
        assert!(provider.get_user_operation_receipt(&hash).await?.is_none());
        bundler.assert_request(GET_USER_OPERATION_RECEIPT, [hash])?;
        assert!(default.assert_request(GET_USER_OPERATION_RECEIPT, [hash]).is_err());
        Ok(())
    }

    #[tokio::test]
    async fn supported_entry_points() -> eyre::Result<()> {
        let (provider, _, bundler) = provider();
        let entry_point: Address = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse()?;
        bundler.push::<Vec<Address>, _>(vec![entry_point])?;

        assert_eq!(provider.supported_entry_points().await?, vec![entry_point]);
        Ok(())
    }
}
