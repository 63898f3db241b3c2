use ethers::types::{Address, U256};
use std::collections::BTreeSet;
use userop_primitives::{UserOperation, UserOperationField, UserOperationHash};

/// State threaded through the middleware stack during a single build
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserOperationMiddlewareContext {
    /// User operation being built, mutated in place by the middleware
    pub op: UserOperation,
    pub entry_point: Address,
    pub chain_id: U256,
    /// Fields the caller set on the builder, the presets leave them alone
    pub explicit: BTreeSet<UserOperationField>,
}

impl UserOperationMiddlewareContext {
    pub fn new(op: UserOperation, entry_point: Address, chain_id: U256) -> Self {
        Self { op, entry_point, chain_id, explicit: BTreeSet::new() }
    }

    pub fn with_explicit(mut self, explicit: BTreeSet<UserOperationField>) -> Self {
        self.explicit = explicit;
        self
    }

    /// Whether the caller set the field explicitly
    pub fn is_set(&self, field: UserOperationField) -> bool {
        self.explicit.contains(&field)
    }

    /// Whether every one of the fields was set explicitly
    pub fn all_set(&self, fields: &[UserOperationField]) -> bool {
        fields.iter().all(|field| self.is_set(*field))
    }

    /// Hash of the user operation in its current state
    pub fn user_operation_hash(&self) -> UserOperationHash {
        self.op.hash(&self.entry_point, &self.chain_id)
    }
}
