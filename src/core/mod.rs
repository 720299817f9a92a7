pub mod abi;
pub mod config;
pub mod errors;

pub use config::{GasLimitPolicy, WalletOptions};
pub use errors::AdapterError;
