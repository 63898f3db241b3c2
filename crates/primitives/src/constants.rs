//! Account abstraction (ERC-4337)-related constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract
    pub const ADDRESS: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";
    /// Signature of the event emitted by the entry point for every executed user operation
    pub const USER_OPERATION_EVENT: &str =
        "UserOperationEvent(bytes32,address,address,uint256,bool,uint256,uint256)";
}

/// Default values of a freshly built user operation
pub mod user_operation {
    pub const CALL_GAS_LIMIT: u64 = 35_000;
    pub const VERIFICATION_GAS_LIMIT: u64 = 70_000;
    pub const PRE_VERIFICATION_GAS: u64 = 21_000;
}

/// Bundler JSON-RPC surface
pub mod bundler {
    pub const SEND_USER_OPERATION: &str = "eth_sendUserOperation";
    pub const ESTIMATE_USER_OPERATION_GAS: &str = "eth_estimateUserOperationGas";
    pub const GET_USER_OPERATION_BY_HASH: &str = "eth_getUserOperationByHash";
    pub const GET_USER_OPERATION_RECEIPT: &str = "eth_getUserOperationReceipt";
    pub const SUPPORTED_ENTRY_POINTS: &str = "eth_supportedEntryPoints";

    /// Methods served by the bundler rather than by the execution client
    pub const METHODS: [&str; 5] = [
        SEND_USER_OPERATION,
        ESTIMATE_USER_OPERATION_GAS,
        GET_USER_OPERATION_BY_HASH,
        GET_USER_OPERATION_RECEIPT,
        SUPPORTED_ENTRY_POINTS,
    ];
}

/// Paymaster JSON-RPC surface
pub mod paymaster {
    pub const SPONSOR_USER_OPERATION: &str = "pm_sponsorUserOperation";
}

/// Waiting for a submitted user operation
pub mod wait {
    /// Default time between two polls (in seconds)
    pub const INTERVAL: u64 = 5;
    /// Default time after which waiting gives up (in seconds)
    pub const TIMEOUT: u64 = 30;
}
