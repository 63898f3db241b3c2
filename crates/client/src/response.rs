use crate::{error::ClientError, options::WaitOptions};
use ethers::{
    providers::{JsonRpcClient, Middleware, Provider},
    types::Address,
};
use std::{future::Future, sync::Arc};
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use userop_primitives::{UserOperationEvent, UserOperationHash, UserOperationReceipt};
use userop_provider::{BundlerApi, UserOperationEventFilter};

/// Result of sending a user operation
#[derive(Debug)]
pub struct SendUserOperationResponse<P> {
    pub user_operation_hash: UserOperationHash,
    provider: Arc<Provider<P>>,
    entry_point: Address,
    wait: WaitOptions,
    submitted: bool,
}

impl<P> SendUserOperationResponse<P>
where
    P: JsonRpcClient,
{
    pub(crate) fn new(
        user_operation_hash: UserOperationHash,
        provider: Arc<Provider<P>>,
        entry_point: Address,
        wait: WaitOptions,
        submitted: bool,
    ) -> Self {
        Self { user_operation_hash, provider, entry_point, wait, submitted }
    }

    /// Whether the user operation reached the bundler (false for dry runs)
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    /// Waits for the user operation receipt
    pub async fn wait(&self) -> Result<UserOperationReceipt, ClientError> {
        self.wait_with_cancellation(CancellationToken::new()).await
    }

    /// Polls `eth_getUserOperationReceipt` until there is a receipt, the timeout elapses or the
    /// token is cancelled
    pub async fn wait_with_cancellation(
        &self,
        token: CancellationToken,
    ) -> Result<UserOperationReceipt, ClientError> {
        self.ensure_submitted()?;
        let (provider, hash) = (&self.provider, self.user_operation_hash);
        poll(&self.wait, &token, move || async move {
            debug!("Polling receipt of user operation {hash}");
            Ok(provider.get_user_operation_receipt(&hash).await?)
        })
        .await
    }

    /// Polls the entry point logs until the `UserOperationEvent` of the user operation shows up
    pub async fn wait_for_event(
        &self,
        token: CancellationToken,
    ) -> Result<UserOperationEvent, ClientError> {
        self.ensure_submitted()?;
        let filter =
            UserOperationEventFilter::from_hash(self.entry_point, &self.user_operation_hash)
                .to_filter();
        let (provider, filter, hash) = (&self.provider, &filter, self.user_operation_hash);
        poll(&self.wait, &token, move || async move {
            debug!("Polling event of user operation {hash}");
            let logs = provider.get_logs(filter).await?;
            match logs.first() {
                Some(log) => Ok(Some(UserOperationEvent::try_from(log)?)),
                None => Ok(None),
            }
        })
        .await
    }

    fn ensure_submitted(&self) -> Result<(), ClientError> {
        if self.submitted {
            Ok(())
        } else {
            Err(ClientError::NotSubmitted { hash: self.user_operation_hash })
        }
    }
}

/// Calls `f` right away and then once per interval until it returns a value
///
/// Errors of `f` end the loop. Cancellation is checked between calls, never during one.
pub(crate) async fn poll<T, F, Fut>(
    opts: &WaitOptions,
    token: &CancellationToken,
    mut f: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ClientError>>,
{
    let deadline = Instant::now() + opts.timeout;
    loop {
        if token.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        if let Some(res) = f().await? {
            return Ok(res);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(ClientError::Timeout { timeout: opts.timeout });
        }
        tokio::select! {
            _ = token.cancelled() => return Err(ClientError::Cancelled),
            _ = sleep(opts.interval.min(deadline - now)) => {}
        }
    }
}
