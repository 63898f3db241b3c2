use crate::{
    context::UserOperationMiddlewareContext,
    middleware::{MiddlewareError, UserOperationMiddleware},
};
use async_trait::async_trait;
use ethers::providers::{JsonRpcClient, Provider};
use serde_json::Value;
use std::sync::Arc;
use tracing::{trace, warn};
use userop_primitives::{
    constants::paymaster::SPONSOR_USER_OPERATION, UserOperationField, VerifyingPaymasterResult,
};

const SPONSORED: [UserOperationField; 3] = [
    UserOperationField::PreVerificationGas,
    UserOperationField::VerificationGasLimit,
    UserOperationField::CallGasLimit,
];

/// Asks a verifying paymaster to sponsor the user operation
///
/// The paymaster returns `paymasterAndData` together with gas limits that account for the
/// paymaster's own verification, all of which are written into the user operation. The paymaster
/// signs over the gas limits it returns, so they replace explicit ones. An explicit
/// `paymasterAndData` skips the paymaster altogether.
#[derive(Debug)]
pub struct VerifyingPaymasterMiddleware<P> {
    paymaster: Arc<Provider<P>>,
    context: Value,
}

impl<P> VerifyingPaymasterMiddleware<P> {
    pub fn new(paymaster: Arc<Provider<P>>, context: Value) -> Self {
        Self { paymaster, context }
    }
}

#[async_trait]
impl<P> UserOperationMiddleware for VerifyingPaymasterMiddleware<P>
where
    P: JsonRpcClient + 'static,
{
    fn name(&self) -> &str {
        "verifying-paymaster"
    }

    async fn handle(
        &self,
        ctx: &mut UserOperationMiddlewareContext,
    ) -> Result<(), MiddlewareError> {
        if ctx.is_set(UserOperationField::PaymasterAndData) {
            trace!("Paymaster and data set explicitly, not asking the paymaster");
            return Ok(());
        }

        let res: VerifyingPaymasterResult = self
            .paymaster
            .request(SPONSOR_USER_OPERATION, (&ctx.op, &ctx.entry_point, &self.context))
            .await?;

        for field in SPONSORED.into_iter().filter(|field| ctx.is_set(*field)) {
            warn!("Explicit {field:?} replaced by the sponsored value");
        }
        ctx.op.paymaster_and_data = res.paymaster_and_data;
        ctx.op.pre_verification_gas = res.pre_verification_gas;
        ctx.op.verification_gas_limit = res.verification_gas_limit;
        ctx.op.call_gas_limit = res.call_gas_limit;
        Ok(())
    }
}
