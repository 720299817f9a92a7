// tests/config_tests.rs
//! Loading adapter options from TOML files and GLOBALP2P_* environment variables.

use ethers::types::Address;
use globalp2p_wallet::core::config::{
    ENV_CHAIN_ID, ENV_CONFIG_PATH, ENV_REGISTRY_ADDRESS, ENV_RPC_URL, ENV_SIGNER_KEY,
};
use globalp2p_wallet::{AdapterError, GasLimitPolicy, WalletOptions};
use serial_test::serial;
use std::io::Write;
use std::str::FromStr;

const REGISTRY: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const OTHER_REGISTRY: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn clear_env() {
    for var in [ENV_CONFIG_PATH, ENV_RPC_URL, ENV_REGISTRY_ADDRESS, ENV_SIGNER_KEY, ENV_CHAIN_ID] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

fn full_config() -> String {
    format!(
        "rpc_url = \"https://public-en-kairos.node.kaia.io\"\n\
         registry_address = \"{}\"\n\
         signer_private_key = \"{}\"\n\
         chain_id = 1001\n\
         [gas_limit]\n\
         policy = \"fixed\"\n\
         limit = 800000\n",
        REGISTRY, KEY
    )
}

#[test]
#[serial]
fn test_load_from_file() {
    clear_env();
    let file = write_config(&full_config());

    let opts = WalletOptions::load(Some(file.path())).unwrap();
    assert_eq!(opts.rpc_url, "https://public-en-kairos.node.kaia.io");
    assert_eq!(opts.registry_address, Address::from_str(REGISTRY).unwrap());
    assert_eq!(opts.chain_id, Some(1001));
    assert_eq!(opts.gas_limit, GasLimitPolicy::Fixed { limit: 800_000 });
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = write_config(&full_config());
    std::env::set_var(ENV_RPC_URL, "http://10.0.0.5:8551");
    std::env::set_var(ENV_REGISTRY_ADDRESS, OTHER_REGISTRY);
    std::env::set_var(ENV_CHAIN_ID, "8217");

    let opts = WalletOptions::load(Some(file.path())).unwrap();
    clear_env();

    assert_eq!(opts.rpc_url, "http://10.0.0.5:8551");
    assert_eq!(opts.registry_address, Address::from_str(OTHER_REGISTRY).unwrap());
    assert_eq!(opts.chain_id, Some(8217));
}

#[test]
#[serial]
fn test_env_only_when_file_missing() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var(ENV_CONFIG_PATH, dir.path().join("absent.toml"));
    std::env::set_var(ENV_RPC_URL, "http://127.0.0.1:8545");
    std::env::set_var(ENV_REGISTRY_ADDRESS, REGISTRY);
    std::env::set_var(ENV_SIGNER_KEY, KEY);

    let opts = WalletOptions::load(None).unwrap();
    clear_env();

    assert_eq!(opts.rpc_url, "http://127.0.0.1:8545");
    assert_eq!(opts.chain_id, None);
    assert_eq!(opts.gas_limit, GasLimitPolicy::default());
}

#[test]
#[serial]
fn test_missing_key_is_config_error() {
    clear_env();
    let file = write_config(&format!(
        "rpc_url = \"http://127.0.0.1:8545\"\nregistry_address = \"{}\"\n",
        REGISTRY
    ));

    let err = WalletOptions::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, AdapterError::ConfigError(_)));
    assert!(err.to_string().contains("signer_private_key"));
}

#[test]
#[serial]
fn test_bad_chain_id_env() {
    clear_env();
    let file = write_config(&full_config());
    std::env::set_var(ENV_CHAIN_ID, "kairos");

    let err = WalletOptions::load(Some(file.path())).unwrap_err();
    clear_env();
    assert!(err.to_string().contains(ENV_CHAIN_ID));
}

#[test]
#[serial]
fn test_bad_registry_address() {
    clear_env();
    let file = write_config(&format!(
        "rpc_url = \"http://127.0.0.1:8545\"\nregistry_address = \"0x1234\"\nsigner_private_key = \"{}\"\n",
        KEY
    ));

    let err = WalletOptions::load(Some(file.path())).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("registry address"));
}

#[test]
#[serial]
fn test_malformed_toml() {
    clear_env();
    let file = write_config("rpc_url = ");
    assert!(matches!(WalletOptions::load(Some(file.path())), Err(AdapterError::ConfigError(_))));
}
