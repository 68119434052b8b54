//! Shared JSON-RPC utilities for interacting with Ethereum JSON-RPC endpoints.

use std::time::Duration;

use alloy_core::primitives::U256;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::GatewayError;

/// Create an HTTP client configured for JSON-RPC requests.
pub(crate) fn create_client(timeout: Duration) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(GatewayError::Client)
}

/// Make a JSON-RPC call and deserialize the result.
///
/// # Arguments
/// * `client` - The HTTP client to use
/// * `url` - The RPC endpoint URL
/// * `method` - The RPC method name
/// * `params` - The method parameters
///
/// # Returns
/// The deserialized result, or an error if the request failed or returned an error response.
pub(crate) async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Vec<Value>,
) -> Result<T, GatewayError> {
    let response = client
        .post(url)
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .map_err(|source| GatewayError::Transport {
            method: method.to_string(),
            source,
        })?;

    let result: Value = response
        .json()
        .await
        .map_err(|source| GatewayError::Transport {
            method: method.to_string(),
            source,
        })?;

    if let Some(error) = result.get("error") {
        return Err(GatewayError::Rpc {
            method: method.to_string(),
            message: error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown")
                .to_string(),
        });
    }

    let result_value = result
        .get("result")
        .ok_or_else(|| GatewayError::Decode {
            method: method.to_string(),
            message: "no result in response".to_string(),
        })?
        .clone();

    serde_json::from_value(result_value).map_err(|e| GatewayError::Decode {
        method: method.to_string(),
        message: e.to_string(),
    })
}

/// Parse a `0x`-prefixed hex quantity into a `u64`.
pub(crate) fn parse_u64_quantity(method: &str, value: &str) -> Result<u64, GatewayError> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16).map_err(|e| GatewayError::Decode {
        method: method.to_string(),
        message: format!("invalid hex quantity '{}': {}", value, e),
    })
}

/// Parse a `0x`-prefixed hex quantity into a `U256`.
pub(crate) fn parse_u256_quantity(method: &str, value: &str) -> Result<U256, GatewayError> {
    let digits = value.trim_start_matches("0x");
    // U256::from_str_radix accepts an empty digit string as zero; a bare
    // "0x" is a malformed quantity, not a zero balance.
    if digits.is_empty() {
        return Err(GatewayError::Decode {
            method: method.to_string(),
            message: format!("invalid hex quantity '{}': empty digit string", value),
        });
    }
    U256::from_str_radix(digits, 16).map_err(|e| GatewayError::Decode {
        method: method.to_string(),
        message: format!("invalid hex quantity '{}': {}", value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64_quantity() {
        assert_eq!(parse_u64_quantity("eth_blockNumber", "0x64").unwrap(), 100);
        assert_eq!(parse_u64_quantity("eth_blockNumber", "0x0").unwrap(), 0);
        assert_eq!(parse_u64_quantity("eth_chainId", "0xc488").unwrap(), 50312);
    }

    #[test]
    fn test_parse_u64_quantity_invalid() {
        assert!(parse_u64_quantity("eth_blockNumber", "0xzz").is_err());
        assert!(parse_u64_quantity("eth_blockNumber", "").is_err());
    }

    #[test]
    fn test_parse_u256_quantity() {
        let one_eth = parse_u256_quantity("eth_getBalance", "0xde0b6b3a7640000").unwrap();
        assert_eq!(one_eth, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(parse_u256_quantity("eth_getBalance", "0x0").unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_u256_quantity_invalid() {
        // A bare "0x" must decode-fail, not read as a zero balance.
        assert!(matches!(
            parse_u256_quantity("eth_getBalance", "0x"),
            Err(GatewayError::Decode { .. })
        ));
        assert!(matches!(
            parse_u256_quantity("eth_getBalance", ""),
            Err(GatewayError::Decode { .. })
        ));
        assert!(parse_u256_quantity("eth_getBalance", "0xzz").is_err());
    }
}
