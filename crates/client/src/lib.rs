//! Account abstraction (ERC-4337) client
//!
//! Builds user operations through a [UserOperationBuilder](userop_builder::UserOperationBuilder),
//! sends them to the bundler and waits for their outcome.

mod client;
mod error;
mod options;
mod response;

pub use client::Client;
pub use error::ClientError;
pub use options::{ClientOptions, SendUserOperationOptions, WaitOptions};
pub use response::SendUserOperationResponse;
pub use tokio_util::sync::CancellationToken;
