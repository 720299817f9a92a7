use thiserror::Error;

/// Error type for wallet adapter operations.
///
/// Underlying SDK and node messages are carried verbatim; the variant only
/// records which stage of the call produced them.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed or unusable operator key material.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Dialing the node or resolving the chain id failed.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A JSON-RPC request issued while building or submitting a transaction failed.
    #[error("RPC error during {operation}: {message}")]
    RpcError { operation: &'static str, message: String },

    /// A read-only contract call failed.
    #[error("Contract call {method} failed: {message}")]
    ContractError { method: &'static str, message: String },

    /// ABI encoding errors.
    #[error("ABI error: {0}")]
    AbiError(String),

    /// The signer refused or failed to sign.
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// `deployWallet` was submitted but the follow-up lookup failed.
    /// The wallet may exist on-chain; `tx_hash` identifies the submission.
    #[error("wallet for '{user_id}' submitted in {tx_hash} but address lookup failed: {source}")]
    ReadBackFailed {
        user_id: String,
        tx_hash: String,
        #[source]
        source: Box<AdapterError>,
    },
}

impl AdapterError {
    pub(crate) fn rpc(operation: &'static str, err: impl std::fmt::Display) -> Self {
        AdapterError::RpcError { operation, message: err.to_string() }
    }

    pub(crate) fn contract(method: &'static str, err: impl std::fmt::Display) -> Self {
        AdapterError::ContractError { method, message: err.to_string() }
    }

    /// Misconfiguration that cannot succeed on a later attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AdapterError::ConfigError(_) | AdapterError::InvalidPrivateKey(_))
    }

    /// Hash of a transaction that reached the node, if the error happened after submission.
    pub fn submitted_tx_hash(&self) -> Option<&str> {
        match self {
            AdapterError::ReadBackFailed { tx_hash, .. } => Some(tx_hash),
            _ => None,
        }
    }
}

impl From<ethers::abi::Error> for AdapterError {
    fn from(err: ethers::abi::Error) -> Self {
        AdapterError::AbiError(err.to_string())
    }
}

impl From<toml::de::Error> for AdapterError {
    fn from(err: toml::de::Error) -> Self {
        AdapterError::ConfigError(err.to_string())
    }
}
