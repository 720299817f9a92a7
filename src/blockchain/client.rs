// Chain client construction and chain id resolution.

use ethers::providers::{Http, Middleware, Provider};
use std::time::Duration;
use tracing::info;

use crate::core::errors::AdapterError;

/// Build an HTTP JSON-RPC provider for `rpc_url` with a per-request `timeout`.
///
/// No request is sent here; the first round-trip happens on first use.
pub fn connect_provider(rpc_url: &str, timeout: Duration) -> Result<Provider<Http>, AdapterError> {
    let rpc_url_clean = rpc_url.trim();
    let parsed_url = reqwest::Url::parse(rpc_url_clean).map_err(|e| {
        AdapterError::ConfigError(format!("Invalid RPC URL '{}': {}", rpc_url_clean, e))
    })?;

    info!("Connecting to node: {}", parsed_url);
    // Allow proxy environment vars.
    let mut builder = reqwest::Client::builder().timeout(timeout);
    if let Ok(proxy) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("HTTP_PROXY")) {
        if let Ok(p) = reqwest::Proxy::all(proxy) {
            builder = builder.proxy(p);
        }
    }
    let client = builder
        .build()
        .map_err(|e| AdapterError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

    Ok(Provider::new(Http::new_with_client(parsed_url, client)))
}

/// Use the configured chain id if there is one, otherwise ask the node.
pub async fn resolve_chain_id<M: Middleware>(
    client: &M,
    configured: Option<u64>,
) -> Result<u64, AdapterError> {
    let chain_id = match configured {
        Some(id) => id,
        None => client
            .get_chainid()
            .await
            .map_err(|e| {
                AdapterError::ConnectionError(format!(
                    "Failed to get chain ID: {}. This might be due to a network issue, firewall, or an invalid RPC URL.",
                    e
                ))
            })?
            .as_u64(),
    };
    info!("Using {} (Chain ID: {})", network_name(chain_id), chain_id);
    Ok(chain_id)
}

/// Human label for a chain id, used in logs.
pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        8217 => "klaytn".to_string(),
        1001 => "kairos".to_string(),
        1 => "ethereum".to_string(),
        11155111 => "sepolia".to_string(),
        137 => "polygon".to_string(),
        56 => "bsc".to_string(),
        31337 => "localhost".to_string(),
        _ => format!("evm-{}", chain_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::providers::{MockProvider, MockResponse};
    use ethers::types::U256;
    use serde_json::json;

    #[test]
    fn test_network_names() {
        assert_eq!(network_name(8217), "klaytn");
        assert_eq!(network_name(1001), "kairos");
        assert_eq!(network_name(1), "ethereum");
        assert_eq!(network_name(4242), "evm-4242");
    }

    #[test]
    fn test_connect_provider_invalid_url() {
        let res = connect_provider("not a url", Duration::from_secs(1));
        assert!(matches!(res, Err(AdapterError::ConfigError(_))));
    }

    #[test]
    fn test_connect_provider_does_not_dial() {
        // Nothing listens here; construction must still succeed.
        assert!(connect_provider(" http://127.0.0.1:1 ", Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_resolve_chain_id_prefers_configured() {
        // No responses queued: any RPC call would fail.
        let provider = Provider::new(MockProvider::new());
        assert_eq!(resolve_chain_id(&provider, Some(1001)).await.unwrap(), 1001);
    }

    #[tokio::test]
    async fn test_resolve_chain_id_from_node() {
        let mock = MockProvider::new();
        mock.push_response(MockResponse::Value(json!(U256::from(8217u64))));
        let provider = Provider::new(mock);
        assert_eq!(resolve_chain_id(&provider, None).await.unwrap(), 8217);
    }

    #[tokio::test]
    async fn test_resolve_chain_id_rpc_failure() {
        let provider = Provider::new(MockProvider::new());
        let err = resolve_chain_id(&provider, None).await.unwrap_err();
        assert!(matches!(err, AdapterError::ConnectionError(_)));
    }
}
