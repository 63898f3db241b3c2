//! Account abstraction (ERC-4337) primitive types
//!
//! This crate contains the user operation type together with the request and response types of the
//! bundler JSON-RPC surface and a few ABI and contract call helpers shared by the rest of the SDK.

pub mod abi;
pub mod constants;
pub mod contract;
mod event;
mod paymaster;
mod user_operation;
mod utils;

pub use abi::AbiError;
pub use event::UserOperationEvent;
pub use paymaster::VerifyingPaymasterResult;
pub use user_operation::{
    UserOperation, UserOperationByHash, UserOperationField, UserOperationGasEstimation,
    UserOperationHash, UserOperationPartial, UserOperationReceipt, UserOperationUnsigned,
};
pub use utils::{as_checksum_addr, deserialize_u256_flexible, deserialize_u256_flexible_opt};
