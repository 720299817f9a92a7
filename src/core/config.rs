use ethers::types::Address;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{fmt, fs, path::Path, str::FromStr, time::Duration};
use tracing::{debug, info};
use zeroize::Zeroize;

use crate::core::errors::AdapterError;

/// Gas limit applied to `deployWallet` unless the policy says otherwise.
pub const DEFAULT_GAS_LIMIT: u64 = 800_000;

pub const DEFAULT_CONFIG_PATH: &str = "globalp2p.toml";

pub const ENV_CONFIG_PATH: &str = "CONFIG_PATH";
pub const ENV_RPC_URL: &str = "GLOBALP2P_RPC_URL";
pub const ENV_REGISTRY_ADDRESS: &str = "GLOBALP2P_REGISTRY_ADDRESS";
pub const ENV_SIGNER_KEY: &str = "GLOBALP2P_SIGNER_KEY";
pub const ENV_CHAIN_ID: &str = "GLOBALP2P_CHAIN_ID";

/// How the gas limit of a write transaction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum GasLimitPolicy {
    /// Always use `limit`.
    Fixed { limit: u64 },
    /// Ask the node with `eth_estimateGas` before every submission.
    Estimate,
}

impl Default for GasLimitPolicy {
    fn default() -> Self {
        GasLimitPolicy::Fixed { limit: DEFAULT_GAS_LIMIT }
    }
}

/// Adapter configuration. Immutable once the adapter is built.
pub struct WalletOptions {
    /// JSON-RPC endpoint of the node (e.g. "https://public-en-kairos.node.kaia.io")
    pub rpc_url: String,
    /// Address of the deployed GlobalP2P registry
    pub registry_address: Address,
    /// Hex-encoded operator private key
    pub signer_private_key: SecretString,
    pub gas_limit: GasLimitPolicy,
    /// Chain id used for EIP-155 signing; fetched with `eth_chainId` when absent
    pub chain_id: Option<u64>,
    /// Timeout in seconds for each RPC request
    pub request_timeout_secs: u64,
}

impl WalletOptions {
    fn default_request_timeout() -> u64 {
        10
    }

    pub fn new(rpc_url: impl Into<String>, registry_address: Address, signer_private_key: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            registry_address,
            signer_private_key: SecretString::new(signer_private_key.into()),
            gas_limit: GasLimitPolicy::default(),
            chain_id: None,
            request_timeout_secs: Self::default_request_timeout(),
        }
    }

    pub fn with_gas_limit(mut self, policy: GasLimitPolicy) -> Self {
        self.gas_limit = policy;
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse options from TOML text, without environment overrides.
    pub fn from_toml_str(content: &str) -> Result<Self, AdapterError> {
        let raw: RawOptions = toml::from_str(content)?;
        raw.into_options()
    }

    /// Load options from `path` (or `CONFIG_PATH`, or `globalp2p.toml`) and apply
    /// `GLOBALP2P_*` environment overrides. A missing file is tolerated as long as
    /// the environment supplies every required field.
    pub fn load(path: Option<&Path>) -> Result<Self, AdapterError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::var(ENV_CONFIG_PATH)
                .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
                .into(),
        };

        let mut raw = if config_path.exists() {
            info!("Loading adapter config from {}", config_path.display());
            let content = fs::read_to_string(&config_path).map_err(|e| {
                AdapterError::ConfigError(format!("Cannot read {}: {}", config_path.display(), e))
            })?;
            toml::from_str::<RawOptions>(&content)?
        } else {
            debug!("No config file at {}, using environment only", config_path.display());
            RawOptions::default()
        };

        raw.apply_env()?;
        raw.into_options()
    }

    /// Check the fields that can be validated without touching the network.
    pub fn validate(&self) -> Result<(), AdapterError> {
        let url = reqwest::Url::parse(self.rpc_url.trim()).map_err(|e| {
            AdapterError::ConfigError(format!("Invalid RPC URL '{}': {}", self.rpc_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AdapterError::ConfigError(format!(
                "Unsupported RPC URL scheme '{}', expected http or https",
                url.scheme()
            )));
        }
        if self.registry_address.is_zero() {
            return Err(AdapterError::ConfigError("registry_address must not be the zero address".into()));
        }
        if let GasLimitPolicy::Fixed { limit: 0 } = self.gas_limit {
            return Err(AdapterError::ConfigError("fixed gas limit must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AdapterError::ConfigError("request_timeout_secs must be positive".into()));
        }
        if self.signer_private_key.expose_secret().trim().is_empty() {
            return Err(AdapterError::ConfigError("signer_private_key is required".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for WalletOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletOptions")
            .field("rpc_url", &self.rpc_url)
            .field("registry_address", &self.registry_address)
            .field("signer_private_key", &"<redacted>")
            .field("gas_limit", &self.gas_limit)
            .field("chain_id", &self.chain_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// On-disk shape of the config; every field is optional so the environment can fill gaps.
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptions {
    rpc_url: Option<String>,
    registry_address: Option<String>,
    signer_private_key: Option<String>,
    #[serde(default)]
    gas_limit: GasLimitPolicy,
    chain_id: Option<u64>,
    request_timeout_secs: Option<u64>,
}

impl RawOptions {
    fn apply_env(&mut self) -> Result<(), AdapterError> {
        if let Ok(v) = std::env::var(ENV_RPC_URL) {
            self.rpc_url = Some(v);
        }
        if let Ok(v) = std::env::var(ENV_REGISTRY_ADDRESS) {
            self.registry_address = Some(v);
        }
        if let Ok(v) = std::env::var(ENV_SIGNER_KEY) {
            if let Some(mut old) = self.signer_private_key.replace(v) {
                old.zeroize();
            }
        }
        if let Ok(v) = std::env::var(ENV_CHAIN_ID) {
            let id = v.trim().parse::<u64>().map_err(|e| {
                AdapterError::ConfigError(format!("{} must be an integer: {}", ENV_CHAIN_ID, e))
            })?;
            self.chain_id = Some(id);
        }
        Ok(())
    }

    fn into_options(mut self) -> Result<WalletOptions, AdapterError> {
        let rpc_url = self
            .rpc_url
            .take()
            .ok_or_else(|| AdapterError::ConfigError("rpc_url is required".into()))?;
        let registry = self
            .registry_address
            .take()
            .ok_or_else(|| AdapterError::ConfigError("registry_address is required".into()))?;
        let registry_address = Address::from_str(registry.trim()).map_err(|e| {
            AdapterError::ConfigError(format!("Invalid registry address '{}': {}", registry, e))
        })?;
        let key = self
            .signer_private_key
            .take()
            .ok_or_else(|| AdapterError::ConfigError("signer_private_key is required".into()))?;

        let options = WalletOptions {
            rpc_url,
            registry_address,
            signer_private_key: SecretString::new(key),
            gas_limit: self.gas_limit,
            chain_id: self.chain_id,
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or_else(WalletOptions::default_request_timeout),
        };
        options.validate()?;
        Ok(options)
    }
}

impl Drop for RawOptions {
    fn drop(&mut self) {
        if let Some(key) = self.signer_private_key.as_mut() {
            key.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REGISTRY: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn toml_with(extra: &str) -> String {
        format!(
            "rpc_url = \"http://127.0.0.1:8551\"\nregistry_address = \"{}\"\nsigner_private_key = \"{}\"\n{}",
            REGISTRY, KEY, extra
        )
    }

    #[test]
    fn defaults_to_fixed_gas_limit() {
        let opts = WalletOptions::from_toml_str(&toml_with("")).unwrap();
        assert_eq!(opts.gas_limit, GasLimitPolicy::Fixed { limit: DEFAULT_GAS_LIMIT });
        assert_eq!(opts.chain_id, None);
        assert_eq!(opts.request_timeout_secs, 10);
        assert_eq!(opts.registry_address, Address::from_str(REGISTRY).unwrap());
    }

    #[test]
    fn parses_estimate_policy_and_chain_id() {
        let opts = WalletOptions::from_toml_str(&toml_with(
            "chain_id = 1001\nrequest_timeout_secs = 3\n[gas_limit]\npolicy = \"estimate\"\n",
        ))
        .unwrap();
        assert_eq!(opts.gas_limit, GasLimitPolicy::Estimate);
        assert_eq!(opts.chain_id, Some(1001));
        assert_eq!(opts.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn parses_custom_fixed_limit() {
        let opts = WalletOptions::from_toml_str(&toml_with(
            "[gas_limit]\npolicy = \"fixed\"\nlimit = 250000\n",
        ))
        .unwrap();
        assert_eq!(opts.gas_limit, GasLimitPolicy::Fixed { limit: 250_000 });
    }

    #[test]
    fn missing_required_field_is_config_error() {
        let err = WalletOptions::from_toml_str("rpc_url = \"http://localhost:8545\"").unwrap_err();
        assert!(matches!(err, AdapterError::ConfigError(_)));
        assert!(err.to_string().contains("registry_address"));
    }

    #[test]
    fn rejects_zero_fixed_limit() {
        let err = WalletOptions::from_toml_str(&toml_with("[gas_limit]\npolicy = \"fixed\"\nlimit = 0\n"))
            .unwrap_err();
        assert!(err.to_string().contains("gas limit"));
    }

    #[test]
    fn rejects_non_http_url() {
        let opts = WalletOptions::new("ws://localhost:8546", Address::from_str(REGISTRY).unwrap(), KEY);
        assert!(opts.validate().is_err());
        let opts = WalletOptions::new("not a url", Address::from_str(REGISTRY).unwrap(), KEY);
        assert!(opts.validate().is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(WalletOptions::from_toml_str(&toml_with("gas_price = 1\n")).is_err());
    }

    #[test]
    fn debug_hides_signer_key() {
        let opts = WalletOptions::from_toml_str(&toml_with("")).unwrap();
        let dbg = format!("{:?}", opts);
        assert!(!dbg.contains(KEY));
        assert!(dbg.contains("<redacted>"));
    }
}
