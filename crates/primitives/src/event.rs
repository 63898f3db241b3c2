//! `UserOperationEvent` emitted by the entry point once a user operation is executed

use crate::{
    abi::{decode_abi, AbiError},
    constants::entry_point::USER_OPERATION_EVENT,
    UserOperationHash,
};
use ethers::{
    abi::Token,
    types::{Address, Log, H256, U256, U64},
    utils::keccak256,
};
use serde::{Deserialize, Serialize};

/// Decoded `UserOperationEvent` log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationEvent {
    pub user_operation_hash: UserOperationHash,
    pub sender: Address,
    pub paymaster: Address,
    pub nonce: U256,
    pub success: bool,
    pub actual_gas_cost: U256,
    pub actual_gas_used: U256,
    pub transaction_hash: Option<H256>,
    pub block_number: Option<U64>,
}

impl UserOperationEvent {
    /// Topic 0 of the event
    pub fn signature() -> H256 {
        H256::from(keccak256(USER_OPERATION_EVENT))
    }
}

impl TryFrom<&Log> for UserOperationEvent {
    type Error = AbiError;

    fn try_from(log: &Log) -> Result<Self, Self::Error> {
        if log.topics.len() != 4 {
            return Err(AbiError::Decode {
                inner: format!("expected 4 topics, got {}", log.topics.len()),
            });
        }
        if log.topics[0] != Self::signature() {
            return Err(AbiError::Decode {
                inner: format!("unexpected event signature {:?}", log.topics[0]),
            });
        }

        let tokens = decode_abi(&["uint256", "bool", "uint256", "uint256"], &log.data)?;
        match tokens.as_slice() {
            [Token::Uint(nonce), Token::Bool(success), Token::Uint(actual_gas_cost), Token::Uint(actual_gas_used)] => {
                Ok(Self {
                    user_operation_hash: log.topics[1].into(),
                    sender: Address::from(log.topics[2]),
                    paymaster: Address::from(log.topics[3]),
                    nonce: *nonce,
                    success: *success,
                    actual_gas_cost: *actual_gas_cost,
                    actual_gas_used: *actual_gas_used,
                    transaction_hash: log.transaction_hash,
                    block_number: log.block_number,
                })
            }
            _ => Err(AbiError::Decode { inner: "unexpected event data".into() }),
        }
    }
}
