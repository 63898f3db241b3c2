//! Account abstraction (ERC-4337) JSON-RPC provider
//!
//! [BundlerProvider] sends the bundler methods to a dedicated endpoint and everything else to the
//! execution client, [BundlerApi] adds typed calls of the bundler methods on top of any `ethers`
//! provider and [ContractReader] reads contract state through `eth_call`.

mod api;
mod bundler;
mod contract;
mod filter;

pub use api::BundlerApi;
pub use bundler::{route, BundlerProvider, Route, BUNDLER_METHODS};
pub use contract::{ContractCallError, ContractReader};
pub use filter::{FilterError, UserOperationEventFilter, MAX_TOPICS};
