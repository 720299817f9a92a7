//! Registry contract interface: the generated binding plus a parsed ABI used
//! for manual call encoding (gas estimation).

use ethers::{
    abi::{Abi, Token},
    contract::abigen,
    types::Bytes,
};
use sha3::{Digest, Keccak256};

use crate::core::errors::AdapterError;

abigen!(
    GlobalP2P,
    r#"[
        function deployWallet(string userId) external
        function wallets(string) external view returns (address)
    ]"#,
);

/// Human-readable form of the registry functions this crate consumes.
pub const REGISTRY_ABI: &[&str] = &[
    "function deployWallet(string userId) external",
    "function wallets(string) external view returns (address)",
];

pub const DEPLOY_WALLET: &str = "deployWallet";
pub const DEPLOY_WALLET_SIGNATURE: &str = "deployWallet(string)";
pub const WALLETS: &str = "wallets";

/// Parse [`REGISTRY_ABI`] into an [`Abi`].
pub fn registry_abi() -> Result<Abi, AdapterError> {
    ethers::abi::parse_abi(REGISTRY_ABI).map_err(|e| AdapterError::AbiError(e.to_string()))
}

/// Compute the first 4 bytes (function selector) from a signature string, e.g. "deployWallet(string)".
pub fn selector_from_signature(signature: &str) -> [u8; 4] {
    let mut keccak = Keccak256::new();
    keccak.update(signature.as_bytes());
    let out = keccak.finalize();
    [out[0], out[1], out[2], out[3]]
}

/// ABI-encode a call to `method` with `args` (selector followed by the encoded arguments).
pub fn encode_call(abi: &Abi, method: &str, args: &[Token]) -> Result<Bytes, AdapterError> {
    let function = abi.function(method)?;
    let data = function.encode_input(args)?;
    Ok(data.into())
}
