use crate::{
    error::ClientError,
    options::{ClientOptions, SendUserOperationOptions, WaitOptions},
    response::SendUserOperationResponse,
};
use ethers::{
    providers::{Http, JsonRpcClient, Middleware, Provider},
    types::{Address, U256},
};
use std::sync::Arc;
use tracing::{debug, info};
use userop_builder::UserOperationBuilder;
use userop_primitives::{
    UserOperation, UserOperationByHash, UserOperationEvent, UserOperationGasEstimation,
    UserOperationHash, UserOperationReceipt,
};
use userop_provider::{BundlerApi, BundlerProvider, UserOperationEventFilter};

/// Client building user operations and sending them to the bundler
///
/// The chain id is fetched once when the client is created.
#[derive(Debug)]
pub struct Client<P = BundlerProvider<Http>> {
    provider: Arc<Provider<P>>,
    entry_point: Address,
    chain_id: U256,
    wait: WaitOptions,
}

impl Client<BundlerProvider<Http>> {
    /// Connects to the RPC URL, sending the bundler methods to
    /// [override_bundler_rpc](ClientOptions::override_bundler_rpc) if set
    pub async fn connect(rpc_url: &str, options: ClientOptions) -> Result<Self, ClientError> {
        let mut provider = BundlerProvider::try_from_url(rpc_url)
            .map_err(|e| ClientError::Configuration { inner: e.to_string() })?;
        if let Some(bundler_rpc) = options.override_bundler_rpc.as_deref() {
            provider
                .set_bundler_rpc(bundler_rpc)
                .map_err(|e| ClientError::Configuration { inner: e.to_string() })?;
        }

        Self::new(Arc::new(Provider::new(provider)), options).await
    }
}

impl<P> Client<P>
where
    P: JsonRpcClient,
{
    pub async fn new(
        provider: Arc<Provider<P>>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let chain_id = provider.get_chainid().await.map_err(|e| ClientError::Configuration {
            inner: format!("failed to fetch chain id: {e}"),
        })?;
        debug!(%chain_id, entry_point = ?options.entry_point, "Client created");

        Ok(Self { provider, entry_point: options.entry_point, chain_id, wait: options.wait })
    }

    pub fn provider(&self) -> &Arc<Provider<P>> {
        &self.provider
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    pub fn chain_id(&self) -> U256 {
        self.chain_id
    }

    /// Builds the user operation for the client's entry point and chain
    pub async fn build_user_operation(
        &self,
        builder: &mut UserOperationBuilder,
    ) -> Result<UserOperation, ClientError> {
        Ok(builder.build(self.entry_point, self.chain_id).await?)
    }

    /// Submits a built user operation to the bundler
    pub async fn send(
        &self,
        uo: &UserOperation,
    ) -> Result<SendUserOperationResponse<P>, ClientError> {
        let hash = self.provider.send_user_operation(uo, &self.entry_point).await?;
        info!("User operation {hash} sent to the bundler");
        Ok(self.response(hash, true))
    }

    /// Builds the user operation and, unless it is a dry run, submits it
    ///
    /// A dry run returns the locally computed hash, waiting on it fails.
    pub async fn send_user_operation(
        &self,
        builder: &mut UserOperationBuilder,
        opts: SendUserOperationOptions,
    ) -> Result<SendUserOperationResponse<P>, ClientError> {
        let uo = self.build_user_operation(builder).await?;
        if let Some(on_build) = &opts.on_build {
            on_build(&uo);
        }

        if opts.dry_run {
            let hash = uo.hash(&self.entry_point, &self.chain_id);
            debug!("Dry run, user operation {hash} not sent");
            return Ok(self.response(hash, false));
        }

        self.send(&uo).await
    }

    pub async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationGasEstimation, ClientError> {
        Ok(self.provider.estimate_user_operation_gas(uo, &self.entry_point).await?)
    }

    pub async fn get_user_operation_by_hash(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationByHash>, ClientError> {
        Ok(self.provider.get_user_operation_by_hash(hash).await?)
    }

    pub async fn get_user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, ClientError> {
        Ok(self.provider.get_user_operation_receipt(hash).await?)
    }

    pub async fn supported_entry_points(&self) -> Result<Vec<Address>, ClientError> {
        Ok(self.provider.supported_entry_points().await?)
    }

    /// Looks up the `UserOperationEvent` of the user operation in the entry point logs
    pub async fn get_user_operation_event(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationEvent>, ClientError> {
        let filter = UserOperationEventFilter::from_hash(self.entry_point, hash).to_filter();
        let logs = self.provider.get_logs(&filter).await?;
        Ok(logs.first().map(UserOperationEvent::try_from).transpose()?)
    }

    fn response(&self, hash: UserOperationHash, submitted: bool) -> SendUserOperationResponse<P> {
        SendUserOperationResponse::new(
            hash,
            self.provider.clone(),
            self.entry_point,
            self.wait,
            submitted,
        )
    }
}
