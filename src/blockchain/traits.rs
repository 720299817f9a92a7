use async_trait::async_trait;

use crate::core::errors::AdapterError;

/// Defines the interface for provisioning custodial wallets per user.
#[async_trait]
pub trait WalletRegistry: Send + Sync {
    /// Registers a wallet for `user_id` and returns its address as checksummed hex.
    ///
    /// Not idempotent: every call submits a new transaction.
    async fn create_wallet(&self, user_id: &str) -> Result<String, AdapterError>;

    /// Looks up the wallet registered for `user_id`.
    ///
    /// Unregistered identifiers resolve to the zero address.
    async fn wallet_address_for(&self, user_id: &str) -> Result<String, AdapterError>;
}
