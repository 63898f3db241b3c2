use crate::{
    context::UserOperationMiddlewareContext,
    middleware::{MiddlewareError, UserOperationMiddleware},
};
use async_trait::async_trait;
use ethers::{
    providers::{JsonRpcClient, Middleware, Provider},
    types::{BlockNumber, U256},
};
use std::sync::Arc;
use tracing::debug;
use userop_primitives::UserOperationField;
use userop_provider::BundlerApi;

const FEES: [UserOperationField; 2] =
    [UserOperationField::MaxFeePerGas, UserOperationField::MaxPriorityFeePerGas];

/// Fills the fee fields from the current network conditions
///
/// `max_fee_per_gas` is twice the base fee of the latest block plus the priority fee. Chains
/// without a base fee (or without `eth_maxPriorityFeePerGas`) get `eth_gasPrice` for both fields.
/// Fee fields set explicitly on the builder are kept.
#[derive(Debug)]
pub struct GasPriceMiddleware<P> {
    provider: Arc<Provider<P>>,
}

impl<P> GasPriceMiddleware<P> {
    pub fn new(provider: Arc<Provider<P>>) -> Self {
        Self { provider }
    }
}

impl<P> GasPriceMiddleware<P>
where
    P: JsonRpcClient,
{
    async fn eip1559_fees(&self) -> Result<Option<(U256, U256)>, MiddlewareError> {
        let base_fee = self
            .provider
            .get_block(BlockNumber::Latest)
            .await?
            .and_then(|block| block.base_fee_per_gas);
        let Some(base_fee) = base_fee else {
            return Ok(None);
        };

        match self.provider.request::<_, U256>("eth_maxPriorityFeePerGas", ()).await {
            Ok(priority_fee) => Ok(Some((base_fee * U256::from(2) + priority_fee, priority_fee))),
            Err(err) => {
                debug!("eth_maxPriorityFeePerGas unavailable, using gas price: {err:?}");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<P> UserOperationMiddleware for GasPriceMiddleware<P>
where
    P: JsonRpcClient + 'static,
{
    fn name(&self) -> &str {
        "gas-price"
    }

    async fn handle(
        &self,
        ctx: &mut UserOperationMiddlewareContext,
    ) -> Result<(), MiddlewareError> {
        if ctx.all_set(&FEES) {
            return Ok(());
        }

        let (max_fee, priority_fee) = match self.eip1559_fees().await? {
            Some(fees) => fees,
            None => {
                let gas_price = self.provider.get_gas_price().await?;
                (gas_price, gas_price)
            }
        };

        if !ctx.is_set(UserOperationField::MaxFeePerGas) {
            ctx.op.max_fee_per_gas = max_fee;
        }
        if !ctx.is_set(UserOperationField::MaxPriorityFeePerGas) {
            ctx.op.max_priority_fee_per_gas = priority_fee;
        }
        Ok(())
    }
}

const GAS_LIMITS: [UserOperationField; 3] = [
    UserOperationField::PreVerificationGas,
    UserOperationField::CallGasLimit,
    UserOperationField::VerificationGasLimit,
];

/// Fills the gas limits from `eth_estimateUserOperationGas`
///
/// Limits set explicitly on the builder are kept, the bundler is not asked when all three are.
#[derive(Debug)]
pub struct GasEstimateMiddleware<P> {
    provider: Arc<Provider<P>>,
}

impl<P> GasEstimateMiddleware<P> {
    pub fn new(provider: Arc<Provider<P>>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> UserOperationMiddleware for GasEstimateMiddleware<P>
where
    P: JsonRpcClient + 'static,
{
    fn name(&self) -> &str {
        "gas-estimate"
    }

    async fn handle(
        &self,
        ctx: &mut UserOperationMiddlewareContext,
    ) -> Result<(), MiddlewareError> {
        if ctx.all_set(&GAS_LIMITS) {
            return Ok(());
        }
        let est = self.provider.estimate_user_operation_gas(&ctx.op, &ctx.entry_point).await?;

        if !ctx.is_set(UserOperationField::PreVerificationGas) {
            ctx.op.pre_verification_gas = est.pre_verification_gas;
        }
        if !ctx.is_set(UserOperationField::CallGasLimit) {
            ctx.op.call_gas_limit = est.call_gas_limit;
        }
        if let Some(verification_gas_limit) = est.verification_gas_limit() {
            if !ctx.is_set(UserOperationField::VerificationGasLimit) {
                ctx.op.verification_gas_limit = verification_gas_limit;
            }
        }
        Ok(())
    }
}
