// src/security/mod.rs
//! Handling of the operator key material.

pub mod operator_key;

pub use operator_key::OperatorKey;
