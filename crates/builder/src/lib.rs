//! Account abstraction (ERC-4337) user operation builder
//!
//! The [UserOperationBuilder] keeps a working user operation and an ordered stack of
//! [UserOperationMiddleware]. Building runs the stack over a [UserOperationMiddlewareContext]
//! carrying the entry point and chain id.

mod builder;
mod context;
mod middleware;
pub mod presets;

pub use builder::{BuildError, UserOperationBuilder};
pub use context::UserOperationMiddlewareContext;
pub use middleware::{middleware_fn, FnMiddleware, MiddlewareError, UserOperationMiddleware};
