use crate::utils::{parse_address, parse_bytes, parse_json, parse_u256, validate_private_key};
use clap::Parser;
use ethers::types::{Address, Bytes, U256};
use serde_json::Value;
use std::time::Duration;
use userop_client::{ClientOptions, WaitOptions};
use userop_primitives::{
    constants::{entry_point::ADDRESS, wait},
    UserOperationPartial,
};

/// Connection args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct ClientArgs {
    /// Execution client RPC URL
    #[clap(long, default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// Bundler RPC URL, bundler methods are sent to the execution client RPC URL if not set
    #[clap(long)]
    pub bundler_rpc: Option<String>,

    /// Entry point smart contract address
    #[clap(long, default_value = ADDRESS, value_parser = parse_address)]
    pub entry_point: Address,
}

impl ClientArgs {
    pub fn client_options(&self, wait: WaitOptions) -> ClientOptions {
        ClientOptions {
            entry_point: self.entry_point,
            override_bundler_rpc: self.bundler_rpc.clone(),
            wait,
        }
    }
}

/// Waiting for receipts args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct WaitArgs {
    /// Time between two receipt polls (in seconds)
    #[clap(long, default_value_t = wait::INTERVAL)]
    pub wait_interval: u64,

    /// Time after which waiting for the receipt gives up (in seconds)
    #[clap(long, default_value_t = wait::TIMEOUT)]
    pub wait_timeout: u64,
}

impl Default for WaitArgs {
    fn default() -> Self {
        Self { wait_interval: wait::INTERVAL, wait_timeout: wait::TIMEOUT }
    }
}

impl WaitArgs {
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            interval: Duration::from_secs(self.wait_interval),
            timeout: Duration::from_secs(self.wait_timeout),
        }
    }
}

/// User operation fields set explicitly on the builder
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct UserOperationArgs {
    /// Smart contract account sending the user operation
    #[clap(long, value_parser = parse_address)]
    pub sender: Address,

    /// Nonce, read from the entry point if not set
    #[clap(long, value_parser = parse_u256)]
    pub nonce: Option<U256>,

    #[clap(long, value_parser = parse_bytes)]
    pub init_code: Option<Bytes>,

    #[clap(long, value_parser = parse_bytes)]
    pub call_data: Option<Bytes>,

    #[clap(long, value_parser = parse_u256)]
    pub call_gas_limit: Option<U256>,

    #[clap(long, value_parser = parse_u256)]
    pub verification_gas_limit: Option<U256>,

    #[clap(long, value_parser = parse_u256)]
    pub pre_verification_gas: Option<U256>,

    /// Max fee per gas, derived from the latest block if not set
    #[clap(long, value_parser = parse_u256)]
    pub max_fee_per_gas: Option<U256>,

    #[clap(long, value_parser = parse_u256)]
    pub max_priority_fee_per_gas: Option<U256>,

    #[clap(long, value_parser = parse_bytes)]
    pub paymaster_and_data: Option<Bytes>,

    #[clap(long, value_parser = parse_bytes)]
    pub signature: Option<Bytes>,
}

impl UserOperationArgs {
    pub fn to_partial(&self) -> UserOperationPartial {
        UserOperationPartial {
            sender: Some(self.sender),
            nonce: self.nonce,
            init_code: self.init_code.clone(),
            call_data: self.call_data.clone(),
            call_gas_limit: self.call_gas_limit,
            verification_gas_limit: self.verification_gas_limit,
            pre_verification_gas: self.pre_verification_gas,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            paymaster_and_data: self.paymaster_and_data.clone(),
            signature: self.signature.clone(),
        }
    }

    /// Gas limit flags given on the command line
    pub fn gas_limit_flags(&self) -> Vec<&'static str> {
        [
            ("--call-gas-limit", self.call_gas_limit.is_some()),
            ("--verification-gas-limit", self.verification_gas_limit.is_some()),
            ("--pre-verification-gas", self.pre_verification_gas.is_some()),
        ]
        .into_iter()
        .filter_map(|(flag, set)| set.then_some(flag))
        .collect()
    }
}

/// Build pipeline args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct MiddlewareArgs {
    /// Key of the nonce sequence read from the entry point
    #[clap(long, default_value = "0", value_parser = parse_u256)]
    pub nonce_key: U256,

    /// Skip the bundler gas estimation
    #[clap(long)]
    pub skip_gas_estimation: bool,

    /// Verifying paymaster RPC URL, the paymaster replaces the bundler gas estimation and sets the
    /// gas limits, so it cannot be combined with explicit ones
    #[clap(long)]
    pub paymaster_rpc: Option<String>,

    /// Context sent along with `pm_sponsorUserOperation`
    #[clap(long, default_value = "{}", value_parser = parse_json)]
    pub paymaster_context: Value,

    /// Private key of the account owner signing the user operation hash
    #[clap(long, value_parser = validate_private_key)]
    pub private_key: Option<String>,
}
