//! User operation with all fields being optional

use super::UserOperation;
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Fields of a [UserOperation](UserOperation)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserOperationField {
    Sender,
    Nonce,
    InitCode,
    CallData,
    CallGasLimit,
    VerificationGasLimit,
    PreVerificationGas,
    MaxFeePerGas,
    MaxPriorityFeePerGas,
    PaymasterAndData,
    Signature,
}

/// User operation with all fields being optional
///
/// Used as a patch: a set field overwrites the target field, an unset field leaves it untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationPartial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_code: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_data: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_verification_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_and_data: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Bytes>,
}

macro_rules! merge_fields {
    ($partial:ident, $uo:ident, $include:ident, $merged:ident; $($field:ident => $variant:ident),+ $(,)?) => {
        $(
            if let Some(value) = $partial.$field {
                if $include(UserOperationField::$variant) {
                    $uo.$field = value;
                    $merged.push(UserOperationField::$variant);
                }
            }
        )+
    };
}

impl UserOperationPartial {
    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Writes every set field into the user operation
    pub fn merge_into(self, uo: &mut UserOperation) -> Vec<UserOperationField> {
        self.merge_into_filtered(uo, |_| true)
    }

    /// Writes the set fields accepted by `include` into the user operation
    ///
    /// # Returns
    /// * `Vec<UserOperationField>` - The fields that were written, in declaration order
    pub fn merge_into_filtered<F>(
        self,
        uo: &mut UserOperation,
        include: F,
    ) -> Vec<UserOperationField>
    where
        F: Fn(UserOperationField) -> bool,
    {
        let mut merged = Vec::new();
        merge_fields!(self, uo, include, merged;
            sender => Sender,
            nonce => Nonce,
            init_code => InitCode,
            call_data => CallData,
            call_gas_limit => CallGasLimit,
            verification_gas_limit => VerificationGasLimit,
            pre_verification_gas => PreVerificationGas,
            max_fee_per_gas => MaxFeePerGas,
            max_priority_fee_per_gas => MaxPriorityFeePerGas,
            paymaster_and_data => PaymasterAndData,
            signature => Signature,
        );
        merged
    }
}

impl From<UserOperation> for UserOperationPartial {
    fn from(uo: UserOperation) -> Self {
        Self {
            sender: Some(uo.sender),
            nonce: Some(uo.nonce),
            init_code: Some(uo.init_code),
            call_data: Some(uo.call_data),
            call_gas_limit: Some(uo.call_gas_limit),
            verification_gas_limit: Some(uo.verification_gas_limit),
            pre_verification_gas: Some(uo.pre_verification_gas),
            max_fee_per_gas: Some(uo.max_fee_per_gas),
            max_priority_fee_per_gas: Some(uo.max_priority_fee_per_gas),
            paymaster_and_data: Some(uo.paymaster_and_data),
            signature: Some(uo.signature),
        }
    }
}

impl From<UserOperationPartial> for UserOperation {
    /// Unset fields take the library defaults
    fn from(partial: UserOperationPartial) -> Self {
        let mut uo = UserOperation::default();
        partial.merge_into(&mut uo);
        uo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_leaves_unset_fields() {
        let mut uo = UserOperation::default().nonce(3.into()).signature("0x01".parse().unwrap());
        let partial = UserOperationPartial {
            call_gas_limit: Some(100_000.into()),
            paymaster_and_data: Some("0xaa".parse().unwrap()),
            ..Default::default()
        };

        let merged = partial.merge_into(&mut uo);

        assert_eq!(
            merged,
            vec![UserOperationField::CallGasLimit, UserOperationField::PaymasterAndData]
        );
        assert_eq!(uo.call_gas_limit, U256::from(100_000));
        assert_eq!(uo.paymaster_and_data, "0xaa".parse::<Bytes>().unwrap());
        assert_eq!(uo.nonce, U256::from(3));
        assert_eq!(uo.signature, "0x01".parse::<Bytes>().unwrap());
        assert_eq!(uo.pre_verification_gas, U256::from(21_000));
    }

    #[test]
    fn merge_filtered() {
        let mut uo = UserOperation::default();
        let partial = UserOperationPartial {
            nonce: Some(1.into()),
            max_fee_per_gas: Some(2.into()),
            ..Default::default()
        };

        let merged =
            partial.merge_into_filtered(&mut uo, |f| f != UserOperationField::MaxFeePerGas);

        assert_eq!(merged, vec![UserOperationField::Nonce]);
        assert_eq!(uo.nonce, U256::from(1));
        assert_eq!(uo.max_fee_per_gas, U256::zero());
    }

    #[test]
    fn partial_json() {
        let partial: UserOperationPartial =
            serde_json::from_str(r#"{"callGasLimit":"0x10","signature":"0x"}"#).unwrap();
        assert_eq!(partial.call_gas_limit, Some(16.into()));
        assert_eq!(partial.signature, Some(Bytes::default()));
        assert_eq!(partial.sender, None);
        assert!(!partial.is_empty());
        assert!(UserOperationPartial::default().is_empty());

        let uo: UserOperation = partial.into();
        assert_eq!(uo.call_gas_limit, U256::from(16));
        assert_eq!(uo.verification_gas_limit, U256::from(70_000));
    }
}
