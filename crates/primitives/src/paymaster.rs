//! Paymaster sponsorship types

use crate::utils::deserialize_u256_flexible;
use ethers::types::{Bytes, U256};
use serde::{Deserialize, Serialize};

/// Result of the `pm_sponsorUserOperation` call of a verifying paymaster
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyingPaymasterResult {
    pub paymaster_and_data: Bytes,
    #[serde(deserialize_with = "deserialize_u256_flexible")]
    pub pre_verification_gas: U256,
    #[serde(deserialize_with = "deserialize_u256_flexible")]
    pub verification_gas_limit: U256,
    #[serde(deserialize_with = "deserialize_u256_flexible")]
    pub call_gas_limit: U256,
}
