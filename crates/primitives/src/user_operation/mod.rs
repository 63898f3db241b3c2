//! Basic transaction type for account abstraction (ERC-4337)

mod hash;
mod partial;

use crate::{
    constants::user_operation::{CALL_GAS_LIMIT, PRE_VERIFICATION_GAS, VERIFICATION_GAS_LIMIT},
    utils::{as_checksum_addr, deserialize_u256_flexible, deserialize_u256_flexible_opt},
};
use ethers::{
    abi::AbiEncode,
    contract::{EthAbiCodec, EthAbiType},
    types::{Address, Bytes, Log, TransactionReceipt, H256, U256, U64},
    utils::keccak256,
};
pub use hash::UserOperationHash;
pub use partial::{UserOperationField, UserOperationPartial};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Consuming setters, for putting a user operation together in one expression
macro_rules! field_setters {
    ($($field:ident: $ty:ty),+ $(,)?) => {
        $(
            #[doc = concat!("Returns the user operation with `", stringify!($field), "` replaced")]
            pub fn $field(mut self, $field: $ty) -> Self {
                self.$field = $field;
                self
            }
        )+
    };
}

/// Transaction type for ERC-4337 account abstraction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    /// Smart contract account sending the user operation
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,

    /// Anti replay nonce, the upper 192 bits being the key of the sequence
    pub nonce: U256,

    /// Factory address and calldata deploying the account, empty once it exists
    pub init_code: Bytes,

    /// Calldata of the execution call made to the account
    pub call_data: Bytes,

    pub call_gas_limit: U256,

    pub verification_gas_limit: U256,

    /// Gas paid to the bundler for calldata and the work outside of the entry point
    pub pre_verification_gas: U256,

    /// EIP-1559 fee cap
    pub max_fee_per_gas: U256,

    /// EIP-1559 tip
    pub max_priority_fee_per_gas: U256,

    /// Sponsoring paymaster followed by its data, empty when the account pays
    pub paymaster_and_data: Bytes,

    pub signature: Bytes,
}

impl Default for UserOperation {
    fn default() -> Self {
        Self {
            sender: Address::zero(),
            nonce: U256::zero(),
            init_code: Bytes::default(),
            call_data: Bytes::default(),
            call_gas_limit: CALL_GAS_LIMIT.into(),
            verification_gas_limit: VERIFICATION_GAS_LIMIT.into(),
            pre_verification_gas: PRE_VERIFICATION_GAS.into(),
            max_fee_per_gas: U256::zero(),
            max_priority_fee_per_gas: U256::zero(),
            paymaster_and_data: Bytes::default(),
            signature: Bytes::default(),
        }
    }
}

impl UserOperation {
    /// Packs the user operation without signature to bytes (used for calculating the hash)
    pub fn pack_without_signature(&self) -> Bytes {
        UserOperationUnsigned::from(self).encode().into()
    }

    /// Calculates the hash of the user operation
    ///
    /// The hash only depends on the field values, so two user operations with the same fields
    /// always share a hash no matter how they were put together.
    pub fn hash(&self, entry_point: &Address, chain_id: &U256) -> UserOperationHash {
        H256::from_slice(
            keccak256(
                [
                    keccak256(self.pack_without_signature().deref()).to_vec(),
                    entry_point.encode(),
                    chain_id.encode(),
                ]
                .concat(),
            )
            .as_slice(),
        )
        .into()
    }

    field_setters! {
        sender: Address,
        nonce: U256,
        init_code: Bytes,
        call_data: Bytes,
        call_gas_limit: U256,
        verification_gas_limit: U256,
        pre_verification_gas: U256,
        max_fee_per_gas: U256,
        max_priority_fee_per_gas: U256,
        paymaster_and_data: Bytes,
        signature: Bytes,
    }

    /// Creates random user operation (for testing purposes)
    #[cfg(feature = "test-utils")]
    pub fn random() -> Self {
        UserOperation::default()
            .sender(Address::random())
            .max_fee_per_gas(3_000_000_000_u64.into())
            .max_priority_fee_per_gas(1_000_000_000.into())
    }
}

/// User operation without signature
#[derive(EthAbiCodec, EthAbiType)]
pub struct UserOperationUnsigned {
    pub sender: Address,
    pub nonce: U256,
    pub init_code: H256,
    pub call_data: H256,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster_and_data: H256,
}

impl From<&UserOperation> for UserOperationUnsigned {
    fn from(value: &UserOperation) -> Self {
        Self {
            sender: value.sender,
            nonce: value.nonce,
            init_code: keccak256(value.init_code.deref()).into(),
            call_data: keccak256(value.call_data.deref()).into(),
            call_gas_limit: value.call_gas_limit,
            verification_gas_limit: value.verification_gas_limit,
            pre_verification_gas: value.pre_verification_gas,
            max_fee_per_gas: value.max_fee_per_gas,
            max_priority_fee_per_gas: value.max_priority_fee_per_gas,
            paymaster_and_data: keccak256(value.paymaster_and_data.deref()).into(),
        }
    }
}

/// Receipt of the user operation (returned from the RPC endpoint eth_getUserOperationReceipt)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    #[serde(rename = "userOpHash")]
    pub user_operation_hash: UserOperationHash,
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,
    pub nonce: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    pub actual_gas_cost: U256,
    pub actual_gas_used: U256,
    pub success: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub logs: Vec<Log>,
    #[serde(rename = "receipt")]
    pub tx_receipt: TransactionReceipt,
}

/// Struct that is returned from the RPC endpoint eth_getUserOperationByHash
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationByHash {
    pub user_operation: UserOperation,
    #[serde(serialize_with = "as_checksum_addr")]
    pub entry_point: Address,
    pub transaction_hash: H256,
    pub block_hash: H256,
    pub block_number: U64,
}

/// Gas estimations for user operation (returned from the RPC endpoint
/// eth_estimateUserOperationGas)
///
/// Bundlers disagree on the shape of this object: some return `verificationGasLimit`, older ones
/// `verificationGas`, and numbers come back either as hex or as decimal strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationGasEstimation {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_u256_flexible_opt"
    )]
    pub verification_gas_limit: Option<U256>,
    #[serde(deserialize_with = "deserialize_u256_flexible")]
    pub pre_verification_gas: U256,
    #[serde(deserialize_with = "deserialize_u256_flexible")]
    pub call_gas_limit: U256,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_u256_flexible_opt"
    )]
    pub verification_gas: Option<U256>,
}

impl UserOperationGasEstimation {
    /// Verification gas limit, falling back to the legacy `verificationGas` field
    pub fn verification_gas_limit(&self) -> Option<U256> {
        self.verification_gas_limit.or(self.verification_gas)
    }
}
