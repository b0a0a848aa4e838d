//! Sui JSON-RPC client for module metadata and events.
//!
//! Speaks plain JSON-RPC 2.0 over HTTP. The normalized module shapes are
//! handed to the engine as-is; the module parser owns their interpretation.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::Value;

use movelens_engine::sources::{EventSource, ModuleSource, RawEvent};
use movelens_types::address::normalize_address;

/// JSON-RPC client for a Sui fullnode.
#[derive(Clone)]
pub struct RpcClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl RpcClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        let timeout_secs = std::env::var("MOVELENS_RPC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        let connect_secs = std::env::var("MOVELENS_RPC_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_CONNECT_TIMEOUT_SECS);
        (
            Duration::from_secs(timeout_secs),
            Duration::from_secs(connect_secs),
        )
    }

    /// Create a client for an explicit endpoint.
    pub fn new(endpoint: &str) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self::with_timeouts(endpoint, timeout, connect_timeout)
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout(timeout)
                .timeout_connect(connect_timeout)
                .build(),
        }
    }

    /// Execute one JSON-RPC call.
    fn call(&self, method: &str, params: Value) -> Result<Value> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response: Value = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|e| anyhow!("RPC request {} failed: {}", method, e))?
            .into_json()
            .map_err(|e| anyhow!("failed to parse RPC response for {}: {}", method, e))?;

        if let Some(error) = response.get("error") {
            let msg = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(anyhow!("RPC error from {}: {}", method, msg));
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| anyhow!("no result in RPC response for {}", method))
    }

    /// Cheap existence probe used by network detection.
    pub fn package_exists(&self, package: &str) -> Result<bool> {
        match self.call(
            "sui_getNormalizedMoveModulesByPackage",
            serde_json::json!([normalize_address(package)]),
        ) {
            Ok(result) => Ok(result.is_object()),
            Err(e) => {
                // A "not found"-style RPC error means the network answered.
                let msg = e.to_string();
                if msg.contains("RPC error") {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }
}

impl ModuleSource for RpcClient {
    fn normalized_modules(&self, package: &str) -> Result<BTreeMap<String, Value>> {
        let result = self.call(
            "sui_getNormalizedMoveModulesByPackage",
            serde_json::json!([normalize_address(package)]),
        )?;
        let map = result
            .as_object()
            .ok_or_else(|| anyhow!("normalized modules for {} is not an object", package))?;
        Ok(map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl EventSource for RpcClient {
    fn query_events(&self, package: &str, limit: usize) -> Result<Vec<RawEvent>> {
        let result = self.call(
            "suix_queryEvents",
            serde_json::json!([
                {"Package": normalize_address(package)},
                null,
                limit,
                true, // descending: most recent first
            ]),
        )?;

        let data = result
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("event query for {} returned no data array", package))?;

        Ok(data.iter().filter_map(parse_event).collect())
    }
}

fn parse_event(node: &Value) -> Option<RawEvent> {
    let id = node.get("id")?;
    let tx_digest = id.get("txDigest").and_then(Value::as_str)?.to_string();
    let event_seq = match id.get("eventSeq") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return None,
    };
    let type_fqn = node.get("type").and_then(Value::as_str)?.to_string();
    let timestamp_ms = match node.get("timestampMs") {
        Some(Value::String(s)) => s.parse().ok(),
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    };
    let sender = node
        .get("sender")
        .and_then(Value::as_str)
        .map(str::to_string);
    let parsed_json = node.get("parsedJson").cloned();

    Some(RawEvent {
        tx_digest,
        event_seq,
        type_fqn,
        timestamp_ms,
        sender,
        parsed_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_event_with_string_fields() {
        let node = json!({
            "id": {"txDigest": "8JTTa", "eventSeq": "3"},
            "type": "0xa::market::OrderFilled",
            "timestampMs": "1700000000000",
            "sender": "0xabc",
            "parsedJson": {"amount": "10"}
        });
        let ev = parse_event(&node).unwrap();
        assert_eq!(ev.tx_digest, "8JTTa");
        assert_eq!(ev.event_seq, "3");
        assert_eq!(ev.timestamp_ms, Some(1_700_000_000_000));
        assert_eq!(ev.sender.as_deref(), Some("0xabc"));
    }

    #[test]
    fn test_parse_event_rejects_missing_id() {
        assert!(parse_event(&json!({"type": "0xa::m::E"})).is_none());
    }
}
