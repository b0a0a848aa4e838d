//! Recent-event collection for a package.
//!
//! The event window is count-bounded (most recent 100 events for the
//! package); the configured day window is advisory metadata only. A failure
//! of the whole query leaves the package with zero events.

use tracing::warn;

use movelens_types::address::normalize_address;
use movelens_types::node_id;
use movelens_types::{Edge, EdgeKind, EventKind, EventNode};

use crate::graph_builder::GraphBuilder;
use crate::sources::{EventSource, RawEvent};

/// Maximum events pulled per package.
const EVENT_LIMIT: usize = 100;

/// Fetch and link recent events for `package_address` (normalized).
pub fn collect_events(
    builder: &mut GraphBuilder,
    events: &dyn EventSource,
    package_address: &str,
    package_id: &str,
) {
    let fetched = match events.query_events(package_address, EVENT_LIMIT) {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(package = %package_address, error = %e, "event query failed");
            return;
        }
    };

    for raw in fetched {
        record_event(builder, package_address, package_id, raw);
    }
}

fn record_event(
    builder: &mut GraphBuilder,
    package_address: &str,
    package_id: &str,
    raw: RawEvent,
) {
    let kind = classify_event_kind(&raw.type_fqn);
    let module_id = emitting_module(&raw.type_fqn, package_address)
        .map(|fqn| node_id::module(&fqn))
        .filter(|id| builder.has_module(id));

    let event = EventNode {
        id: node_id::event(&raw.tx_digest, &raw.event_seq),
        kind,
        module: module_id.clone(),
        package: package_id.to_string(),
        timestamp_ms: raw.timestamp_ms,
        tx_digest: raw.tx_digest,
        sender: raw.sender,
        payload: raw.parsed_json,
    };
    let event_id = builder.add_event(event);

    if let Some(module_id) = module_id {
        builder.add_edge(Edge::new(EdgeKind::ModEmitsEvent, module_id, event_id.clone()));
    }
    builder.add_edge(Edge::new(
        EdgeKind::PkgEmitsEvent,
        package_id.to_string(),
        event_id,
    ));
}

/// Substring classification on the event type; anything unmatched is Custom.
fn classify_event_kind(type_fqn: &str) -> EventKind {
    let lower = type_fqn.to_ascii_lowercase();
    if lower.contains("::publish::") {
        EventKind::Publish
    } else if lower.contains("::upgrade::") {
        EventKind::Upgrade
    } else if lower.contains("::mint::") {
        EventKind::Mint
    } else if lower.contains("::burn::") {
        EventKind::Burn
    } else {
        EventKind::Custom
    }
}

/// Extract the emitting module FQN from an `address::module::…` event type,
/// rebased onto the analyzed package's address.
fn emitting_module(type_fqn: &str, package_address: &str) -> Option<String> {
    let mut parts = type_fqn.split("::");
    let addr = parts.next()?;
    let module = parts.next()?;
    if addr.is_empty() || module.is_empty() {
        return None;
    }
    let addr = normalize_address(addr);
    if addr != package_address {
        return None;
    }
    Some(format!("{}::{}", addr, module))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_event_kind() {
        assert_eq!(classify_event_kind("0xa::mint::MintEvent"), EventKind::Mint);
        assert_eq!(classify_event_kind("0xa::burn::Burned"), EventKind::Burn);
        assert_eq!(
            classify_event_kind("0xa::upgrade::UpgradeCommitted"),
            EventKind::Upgrade
        );
        assert_eq!(
            classify_event_kind("0xa::publish::Published"),
            EventKind::Publish
        );
        assert_eq!(
            classify_event_kind("0xa::market::OrderFilled"),
            EventKind::Custom
        );
    }

    #[test]
    fn test_emitting_module_requires_package_match() {
        let pkg = normalize_address("0xa");
        assert_eq!(
            emitting_module("0xa::market::OrderFilled", &pkg).as_deref(),
            Some(format!("{}::market", pkg).as_str())
        );
        assert!(emitting_module("0xb::market::OrderFilled", &pkg).is_none());
        assert!(emitting_module("garbage", &pkg).is_none());
    }
}
