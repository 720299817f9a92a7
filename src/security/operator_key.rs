//! Operator key material: the single hex key that signs every registry transaction.

use ethers::{
    signers::{LocalWallet, Signer},
    types::Address,
};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use zeroize::Zeroizing;

use crate::core::errors::AdapterError;

/// Decoded operator private key. The raw bytes are zeroized on drop and never
/// appear in `Debug` output.
pub struct OperatorKey {
    bytes: Zeroizing<[u8; 32]>,
    address: Address,
}

impl OperatorKey {
    /// Decode a hex private key (an optional `0x` prefix is accepted).
    pub fn from_hex(hex_key: &str) -> Result<Self, AdapterError> {
        let trimmed = hex_key.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(AdapterError::InvalidPrivateKey("operator key is empty".into()));
        }

        // The decode error names the offending character, so it is not forwarded.
        let decoded = Zeroizing::new(hex::decode(digits).map_err(|_| {
            AdapterError::InvalidPrivateKey("operator key is not valid hex".into())
        })?);
        if decoded.len() != 32 {
            return Err(AdapterError::InvalidPrivateKey(format!(
                "Private key must be 32 bytes, got {}",
                decoded.len()
            )));
        }

        let mut bytes = Zeroizing::new([0u8; 32]);
        bytes.copy_from_slice(&decoded);

        let wallet = LocalWallet::from_bytes(&bytes[..])
            .map_err(|e| AdapterError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { address: wallet.address(), bytes })
    }

    pub fn from_secret(secret: &SecretString) -> Result<Self, AdapterError> {
        Self::from_hex(secret.expose_secret())
    }

    /// Address derived from the key's public half.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Build a local signer bound to `chain_id` (EIP-155).
    pub fn to_wallet(&self, chain_id: u64) -> Result<LocalWallet, AdapterError> {
        let wallet = LocalWallet::from_bytes(&self.bytes[..])
            .map_err(|e| AdapterError::InvalidPrivateKey(e.to_string()))?;
        Ok(wallet.with_chain_id(chain_id))
    }
}

impl fmt::Debug for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorKey")
            .field("address", &self.address)
            .field("key", &format_args!("<redacted len={}>", self.bytes.len()))
            .finish()
    }
}
