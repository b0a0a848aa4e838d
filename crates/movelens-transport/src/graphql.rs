//! GraphQL client for object discovery.
//!
//! Object enumeration by type and dynamic-field listing are not exposed by
//! JSON-RPC, so those go through Sui's GraphQL API, following the Relay
//! connection conventions (cursor pagination via `pageInfo`).

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::Value;

use movelens_engine::sources::{
    CountEstimate, DynamicFieldSource, ObjectPage, ObjectSource, RawObject,
};

/// Maximum items per GraphQL page (Sui's server limit).
const MAX_PAGE_SIZE: usize = 50;

/// GraphQL client for Sui network queries.
#[derive(Clone)]
pub struct GraphQLClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl GraphQLClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        let timeout_secs = std::env::var("MOVELENS_GRAPHQL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        let connect_secs = std::env::var("MOVELENS_GRAPHQL_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_CONNECT_TIMEOUT_SECS);
        (
            Duration::from_secs(timeout_secs),
            Duration::from_secs(connect_secs),
        )
    }

    /// Create a client with a custom endpoint.
    pub fn new(endpoint: &str) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self {
            endpoint: endpoint.to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout(timeout)
                .timeout_connect(connect_timeout)
                .build(),
        }
    }

    /// Execute a GraphQL query.
    fn query(&self, query: &str, variables: Value) -> Result<Value> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response: Value = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|e| anyhow!("GraphQL request failed: {}", e))?
            .into_json()
            .map_err(|e| anyhow!("failed to parse GraphQL response: {}", e))?;

        if let Some(arr) = response.get("errors").and_then(Value::as_array) {
            if !arr.is_empty() {
                let msg = arr[0]
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                return Err(anyhow!("GraphQL error: {}", msg));
            }
        }

        response
            .get("data")
            .cloned()
            .ok_or_else(|| anyhow!("no data in GraphQL response"))
    }

    fn objects_page(
        &self,
        type_fqn: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<ObjectPage> {
        let query = r#"
            query ObjectsByType($type: String!, $first: Int!, $after: String) {
                objects(first: $first, after: $after, filter: { type: $type }) {
                    pageInfo {
                        hasNextPage
                        endCursor
                    }
                    nodes {
                        address
                        version
                        digest
                        owner {
                            __typename
                            ... on AddressOwner {
                                owner { address }
                            }
                            ... on Parent {
                                parent { address }
                            }
                        }
                        asMoveObject {
                            contents {
                                type { repr }
                                json
                            }
                        }
                    }
                }
            }
        "#;

        let variables = serde_json::json!({
            "type": type_fqn,
            "first": limit.min(MAX_PAGE_SIZE),
            "after": cursor,
        });

        let data = self.query(query, variables)?;
        let connection = data
            .get("objects")
            .ok_or_else(|| anyhow!("objects query returned no connection"))?;

        let page_info = connection.get("pageInfo");
        let has_next_page = page_info
            .and_then(|p| p.get("hasNextPage"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let next_cursor = page_info
            .and_then(|p| p.get("endCursor"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let objects = connection
            .get("nodes")
            .and_then(Value::as_array)
            .map(|nodes| nodes.iter().filter_map(parse_object_node).collect())
            .unwrap_or_default();

        Ok(ObjectPage {
            objects,
            next_cursor,
            has_next_page,
        })
    }
}

/// Convert a GraphQL object node into the engine's raw object, rebuilding
/// the wire owner shape the engine's decoder understands.
fn parse_object_node(node: &Value) -> Option<RawObject> {
    let object_id = node.get("address").and_then(Value::as_str)?.to_string();
    let version = node.get("version").and_then(Value::as_u64);
    let digest = node
        .get("digest")
        .and_then(Value::as_str)
        .map(str::to_string);

    let contents = node.get("asMoveObject").and_then(|m| m.get("contents"));
    let type_fqn = contents
        .and_then(|c| c.get("type"))
        .and_then(|t| t.get("repr"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let content = contents.and_then(|c| c.get("json")).cloned();

    Some(RawObject {
        object_id,
        type_fqn,
        owner: owner_to_wire(node.get("owner")),
        version,
        digest,
        content,
    })
}

fn owner_to_wire(owner: Option<&Value>) -> Value {
    let Some(owner) = owner else {
        return Value::String("Immutable".to_string());
    };
    match owner.get("__typename").and_then(Value::as_str) {
        Some("AddressOwner") => {
            match owner
                .get("owner")
                .and_then(|o| o.get("address"))
                .and_then(Value::as_str)
            {
                Some(addr) => serde_json::json!({ "AddressOwner": addr }),
                None => Value::String("Immutable".to_string()),
            }
        }
        Some("Shared") => Value::String("Shared".to_string()),
        Some("Parent") => {
            match owner
                .get("parent")
                .and_then(|p| p.get("address"))
                .and_then(Value::as_str)
            {
                Some(addr) => serde_json::json!({ "ObjectOwner": addr }),
                None => Value::String("Immutable".to_string()),
            }
        }
        _ => Value::String("Immutable".to_string()),
    }
}

impl ObjectSource for GraphQLClient {
    fn estimate_count(&self, type_fqn: &str) -> Result<CountEstimate> {
        let page = self.objects_page(type_fqn, MAX_PAGE_SIZE, None)?;
        Ok(CountEstimate {
            estimated_count: page.objects.len(),
            has_more: page.has_next_page,
        })
    }

    fn query_page(
        &self,
        type_fqn: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<ObjectPage> {
        self.objects_page(type_fqn, limit, cursor)
    }
}

impl DynamicFieldSource for GraphQLClient {
    fn list_dynamic_fields(&self, object_id: &str) -> Result<Vec<String>> {
        let query = r#"
            query DynamicFields($parent: SuiAddress!) {
                object(address: $parent) {
                    dynamicFields(first: 50) {
                        nodes {
                            value {
                                __typename
                                ... on MoveObject {
                                    address
                                }
                            }
                        }
                    }
                }
            }
        "#;

        let variables = serde_json::json!({ "parent": object_id });
        let data = self.query(query, variables)?;

        let nodes = data
            .get("object")
            .and_then(|o| o.get("dynamicFields"))
            .and_then(|d| d.get("nodes"))
            .and_then(Value::as_array);

        Ok(nodes
            .map(|nodes| {
                nodes
                    .iter()
                    .filter_map(|n| {
                        n.get("value")
                            .and_then(|v| v.get("address"))
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_object(&self, object_id: &str) -> Result<RawObject> {
        let query = r#"
            query GetObject($address: SuiAddress!) {
                object(address: $address) {
                    address
                    version
                    digest
                    owner {
                        __typename
                        ... on AddressOwner {
                            owner { address }
                        }
                        ... on Parent {
                            parent { address }
                        }
                    }
                    asMoveObject {
                        contents {
                            type { repr }
                            json
                        }
                    }
                }
            }
        "#;

        let variables = serde_json::json!({ "address": object_id });
        let data = self.query(query, variables)?;

        let obj = data.get("object");
        match obj {
            Some(obj) if !obj.is_null() => parse_object_node(obj)
                .ok_or_else(|| anyhow!("malformed object node for {}", object_id)),
            _ => Err(anyhow!("object not found: {}", object_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_owner_to_wire_address_owner() {
        let owner = json!({
            "__typename": "AddressOwner",
            "owner": {"address": "0xabc"}
        });
        assert_eq!(
            owner_to_wire(Some(&owner)),
            json!({"AddressOwner": "0xabc"})
        );
    }

    #[test]
    fn test_owner_to_wire_parent_becomes_object_owner() {
        let owner = json!({
            "__typename": "Parent",
            "parent": {"address": "0xdef"}
        });
        assert_eq!(owner_to_wire(Some(&owner)), json!({"ObjectOwner": "0xdef"}));
    }

    #[test]
    fn test_owner_to_wire_defaults_to_immutable() {
        assert_eq!(owner_to_wire(None), json!("Immutable"));
        assert_eq!(
            owner_to_wire(Some(&json!({"__typename": "Immutable"}))),
            json!("Immutable")
        );
    }

    #[test]
    fn test_parse_object_node() {
        let node = json!({
            "address": "0x1",
            "version": 7,
            "digest": "abc",
            "owner": {"__typename": "Shared"},
            "asMoveObject": {
                "contents": {
                    "type": {"repr": "0xa::m::Pool"},
                    "json": {"reserve": "10"}
                }
            }
        });
        let obj = parse_object_node(&node).unwrap();
        assert_eq!(obj.object_id, "0x1");
        assert_eq!(obj.version, Some(7));
        assert_eq!(obj.type_fqn.as_deref(), Some("0xa::m::Pool"));
        assert_eq!(obj.owner, json!("Shared"));
    }
}
