// src/lib.rs
//! Custodial wallet provisioning through the GlobalP2P registry contract.

pub mod blockchain;
pub mod cli;
pub mod core;
pub mod security;

pub use blockchain::{TransactOptions, WalletAdapter, WalletRegistry, NIL_ADDRESS};
pub use crate::core::{AdapterError, GasLimitPolicy, WalletOptions};
