//! Ready-made middleware covering the usual build steps

mod gas;
mod nonce;
mod paymaster;
mod signature;

pub use gas::{GasEstimateMiddleware, GasPriceMiddleware};
pub use nonce::NonceMiddleware;
pub use paymaster::VerifyingPaymasterMiddleware;
pub use signature::SignatureMiddleware;
