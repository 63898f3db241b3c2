use crate::{
    context::UserOperationMiddlewareContext,
    middleware::{MiddlewareError, UserOperationMiddleware},
};
use ethers::types::{Address, Bytes, U256};
use std::{collections::BTreeSet, fmt, sync::Arc};
use thiserror::Error;
use tracing::{debug, warn};
use userop_primitives::{UserOperation, UserOperationField, UserOperationPartial};

/// Error returned from [UserOperationBuilder::build]
#[derive(Debug, Error)]
pub enum BuildError {
    /// Middleware at position `index` of the stack failed
    #[error("middleware {index} ({name}) failed: {source}")]
    Middleware { index: usize, name: String, source: MiddlewareError },
}

macro_rules! setters {
    ($($(#[$doc:meta])* $setter:ident => $field:ident: $ty:ty, $variant:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $setter(&mut self, value: $ty) -> &mut Self {
                self.op.$field = value;
                self.explicit.insert(UserOperationField::$variant);
                self
            }
        )+
    };
}

/// Mutable builder of user operations
///
/// Fields set through the setters or [set_partial](UserOperationBuilder::set_partial) are
/// remembered as explicitly set and are never overwritten by
/// [use_defaults](UserOperationBuilder::use_defaults). The middleware stack runs on every
/// [build](UserOperationBuilder::build), in the order the middleware were added.
#[derive(Clone)]
pub struct UserOperationBuilder {
    op: UserOperation,
    defaults: UserOperation,
    explicit: BTreeSet<UserOperationField>,
    middleware: Vec<Arc<dyn UserOperationMiddleware>>,
}

impl Default for UserOperationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UserOperationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserOperationBuilder")
            .field("op", &self.op)
            .field("defaults", &self.defaults)
            .field("explicit", &self.explicit)
            .field("middleware", &self.middleware.iter().map(|m| m.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl UserOperationBuilder {
    pub fn new() -> Self {
        Self {
            op: UserOperation::default(),
            defaults: UserOperation::default(),
            explicit: BTreeSet::new(),
            middleware: Vec::new(),
        }
    }

    /// Current working user operation
    pub fn op(&self) -> &UserOperation {
        &self.op
    }

    /// Current defaults
    pub fn defaults(&self) -> &UserOperation {
        &self.defaults
    }

    /// Whether the field was explicitly set since the last reset
    pub fn is_set(&self, field: UserOperationField) -> bool {
        self.explicit.contains(&field)
    }

    /// Names of the middleware in execution order
    pub fn middleware_names(&self) -> Vec<&str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }

    setters! {
        set_sender => sender: Address, Sender;
        set_nonce => nonce: U256, Nonce;
        set_init_code => init_code: Bytes, InitCode;
        set_call_data => call_data: Bytes, CallData;
        set_call_gas_limit => call_gas_limit: U256, CallGasLimit;
        set_verification_gas_limit => verification_gas_limit: U256, VerificationGasLimit;
        set_pre_verification_gas => pre_verification_gas: U256, PreVerificationGas;
        set_max_fee_per_gas => max_fee_per_gas: U256, MaxFeePerGas;
        set_max_priority_fee_per_gas => max_priority_fee_per_gas: U256, MaxPriorityFeePerGas;
        set_paymaster_and_data => paymaster_and_data: Bytes, PaymasterAndData;
        set_signature => signature: Bytes, Signature;
    }

    /// Merges the set fields into the working user operation and marks them explicitly set
    pub fn set_partial(&mut self, partial: UserOperationPartial) -> &mut Self {
        let merged = partial.merge_into(&mut self.op);
        self.explicit.extend(merged);
        self
    }

    /// Merges the set fields into the defaults, and into the working user operation for the
    /// fields that were not explicitly set
    pub fn use_defaults(&mut self, partial: UserOperationPartial) -> &mut Self {
        partial.clone().merge_into(&mut self.defaults);
        let explicit = &self.explicit;
        partial.merge_into_filtered(&mut self.op, |field| !explicit.contains(&field));
        self
    }

    /// Restores the library defaults (the working user operation is left as is)
    pub fn reset_defaults(&mut self) -> &mut Self {
        self.defaults = UserOperation::default();
        self
    }

    /// Appends middleware to the end of the stack
    pub fn use_middleware<M>(&mut self, middleware: M) -> &mut Self
    where
        M: UserOperationMiddleware + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn reset_middleware(&mut self) -> &mut Self {
        self.middleware.clear();
        self
    }

    /// Replaces the working user operation with the current defaults
    pub fn reset_op(&mut self) -> &mut Self {
        self.op = self.defaults.clone();
        self.explicit.clear();
        self
    }

    /// Returns the builder to its freshly constructed state
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    /// Runs the middleware stack over the working user operation
    ///
    /// The result becomes the new working user operation, so a second build starts from the
    /// output of the first unless [reset_op](UserOperationBuilder::reset_op) is called in between.
    /// Changes made by middleware before a failing one are kept in the working user operation.
    pub async fn build(
        &mut self,
        entry_point: Address,
        chain_id: U256,
    ) -> Result<UserOperation, BuildError> {
        let mut ctx = UserOperationMiddlewareContext::new(self.op.clone(), entry_point, chain_id)
            .with_explicit(self.explicit.clone());
        let res = self.run_middleware(&mut ctx).await;
        self.op = ctx.op;
        res?;

        Ok(self.op.clone())
    }

    async fn run_middleware(
        &self,
        ctx: &mut UserOperationMiddlewareContext,
    ) -> Result<(), BuildError> {
        for (index, middleware) in self.middleware.iter().enumerate() {
            let name = middleware.name();
            debug!(index, name, "Running user operation middleware");
            if let Err(source) = middleware.handle(ctx).await {
                warn!(index, name, "User operation middleware failed: {source}");
                return Err(BuildError::Middleware { index, name: name.to_string(), source });
            }
        }
        Ok(())
    }
}
