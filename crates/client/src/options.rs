use ethers::types::Address;
use std::{fmt, time::Duration};
use userop_primitives::{
    constants::{entry_point, wait},
    UserOperation,
};

/// Polling of a submitted user operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitOptions {
    /// Time between two polls
    pub interval: Duration,
    /// Time after which waiting fails
    pub timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(wait::INTERVAL),
            timeout: Duration::from_secs(wait::TIMEOUT),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    pub entry_point: Address,
    /// Endpoint serving the bundler methods, the RPC URL serves them if not set
    pub override_bundler_rpc: Option<String>,
    pub wait: WaitOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            entry_point: entry_point::ADDRESS.parse().unwrap_or_default(),
            override_bundler_rpc: None,
            wait: WaitOptions::default(),
        }
    }
}

type OnBuild = Box<dyn Fn(&UserOperation) + Send + Sync>;

/// Options of [Client::send_user_operation](crate::Client::send_user_operation)
#[derive(Default)]
pub struct SendUserOperationOptions {
    /// Build without submitting
    pub dry_run: bool,
    /// Called with the built user operation before it is submitted
    pub on_build: Option<OnBuild>,
}

impl SendUserOperationOptions {
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn on_build<F>(mut self, f: F) -> Self
    where
        F: Fn(&UserOperation) + Send + Sync + 'static,
    {
        self.on_build = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for SendUserOperationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendUserOperationOptions")
            .field("dry_run", &self.dry_run)
            .field("on_build", &self.on_build.is_some())
            .finish()
    }
}
