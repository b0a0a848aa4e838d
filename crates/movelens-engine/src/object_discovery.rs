//! On-chain object discovery for key-ability types.
//!
//! For each object-capable type the engine picks a fetch strategy (exhaustive
//! for critical or verifiably small populations, sampled otherwise), walks
//! the cursor-paginated object source, and materializes object, ownership and
//! reference edges. Every failure is contained to the type or object it
//! occurred on; discovery never aborts the package.

use serde_json::Value;
use tracing::{debug, warn};

use movelens_types::address::looks_like_object_id;
use movelens_types::node_id;
use movelens_types::type_parsing::short_name;
use movelens_types::{AnalyzerConfig, Edge, EdgeKind, ObjectNode, OwnerKind, TypeStats};

use crate::graph_builder::GraphBuilder;
use crate::sources::{CountEstimate, DynamicFieldSource, ObjectSource, RawObject};

/// Fixed page size against the object source.
const PAGE_SIZE: usize = 50;
/// Safety cap on pages fetched per type, independent of the computed limit.
const MAX_PAGES: usize = 100;
/// Content snapshots are scanned for object ids to this nesting depth.
const CONTENT_SCAN_DEPTH: usize = 4;
/// At most this many referenced ids are taken from one content snapshot.
const CONTENT_SCAN_HITS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    All,
    Sample,
}

/// The per-type fetch decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    pub mode: FetchMode,
    pub limit: usize,
}

/// Strategy selection, first matching rule wins:
/// critical types are fetched exhaustively up to a hard cap; small
/// populations with no further pages are fetched whole; large populations
/// are sampled when sampling is enabled, otherwise truncated at the
/// threshold.
pub fn select_strategy(
    critical: bool,
    estimate: &CountEstimate,
    config: &AnalyzerConfig,
) -> FetchPlan {
    if critical {
        return FetchPlan {
            mode: FetchMode::All,
            limit: config.hard_cap_critical,
        };
    }
    if estimate.estimated_count <= config.type_count_threshold && !estimate.has_more {
        return FetchPlan {
            mode: FetchMode::All,
            limit: config.type_count_threshold,
        };
    }
    if config.sample_large_types {
        return FetchPlan {
            mode: FetchMode::Sample,
            limit: config.object_sample_size,
        };
    }
    FetchPlan {
        mode: FetchMode::All,
        limit: config.type_count_threshold,
    }
}

/// Run discovery for every `has_key` type currently in the builder.
pub fn discover_objects(
    builder: &mut GraphBuilder,
    config: &AnalyzerConfig,
    objects: &dyn ObjectSource,
    dynamic_fields: &dyn DynamicFieldSource,
) {
    let key_types: Vec<String> = builder
        .graph()
        .types
        .values()
        .filter(|t| t.has_key)
        .map(|t| t.fqn.clone())
        .collect();

    for type_fqn in key_types {
        if let Err(e) = discover_type(builder, config, objects, dynamic_fields, &type_fqn) {
            warn!(type_fqn = %type_fqn, error = %e, "object discovery failed for type");
        }
    }
}

fn discover_type(
    builder: &mut GraphBuilder,
    config: &AnalyzerConfig,
    objects: &dyn ObjectSource,
    dynamic_fields: &dyn DynamicFieldSource,
    type_fqn: &str,
) -> anyhow::Result<()> {
    let critical = config.is_critical_type(short_name(type_fqn));
    let estimate = objects.estimate_count(type_fqn)?;
    let plan = select_strategy(critical, &estimate, config);
    debug!(
        type_fqn = %type_fqn,
        critical,
        limit = plan.limit,
        sampled = plan.mode == FetchMode::Sample,
        "object fetch plan"
    );

    let fetched = fetch_pages(objects, type_fqn, plan.limit)?;

    let mut shared_count = 0;
    let mut owner_addresses = std::collections::BTreeSet::new();
    for raw in &fetched {
        match process_object(builder, config, dynamic_fields, type_fqn, raw) {
            Ok(owner) => {
                if owner == OwnerKind::Shared {
                    shared_count += 1;
                }
                if let Some(addr) = owner.address() {
                    owner_addresses.insert(addr.to_string());
                }
            }
            Err(e) => {
                warn!(object = %raw.object_id, error = %e, "skipping object");
            }
        }
    }

    // Count reconciliation: the first-page estimate is the exact total when
    // the source had no further pages; otherwise it is a floor that the
    // actually-fetched count may raise. Approximate either way once
    // `has_more` was true.
    let count = if estimate.has_more {
        estimate.estimated_count.max(fetched.len())
    } else {
        estimate.estimated_count
    };
    builder.set_type_stats(
        type_fqn,
        TypeStats {
            count,
            sampled: fetched.len(),
            shared: shared_count,
            owners: owner_addresses.len(),
        },
    );

    Ok(())
}

/// Paginate until the limit is met, the source runs out, or the page safety
/// cap is hit; trim any overshoot to the exact limit.
fn fetch_pages(
    objects: &dyn ObjectSource,
    type_fqn: &str,
    limit: usize,
) -> anyhow::Result<Vec<RawObject>> {
    let mut out: Vec<RawObject> = Vec::new();
    let mut cursor: Option<String> = None;

    for _ in 0..MAX_PAGES {
        if out.len() >= limit {
            break;
        }
        let page = objects.query_page(type_fqn, PAGE_SIZE, cursor.as_deref())?;
        out.extend(page.objects);
        if !page.has_next_page || page.next_cursor.is_none() {
            break;
        }
        cursor = page.next_cursor;
    }

    out.truncate(limit);
    Ok(out)
}

/// Decode the wire owner shape into an [`OwnerKind`].
///
/// Accepts both the tag-string form (`"Immutable"`) and the tagged-object
/// forms (`{"AddressOwner": "0x.."}`, `{"Shared": {..}}`,
/// `{"ObjectOwner": "0x.."}`). Unrecognized shapes decode as Immutable.
pub fn decode_owner(owner: &Value) -> OwnerKind {
    if let Some(s) = owner.as_str() {
        return match s {
            "Shared" => OwnerKind::Shared,
            _ => OwnerKind::Immutable,
        };
    }
    if let Some(addr) = owner.get("AddressOwner").and_then(Value::as_str) {
        return OwnerKind::AddressOwner {
            address: addr.to_string(),
        };
    }
    if let Some(addr) = owner.get("ObjectOwner").and_then(Value::as_str) {
        return OwnerKind::ObjectOwner {
            address: addr.to_string(),
        };
    }
    if owner.get("Shared").is_some() {
        return OwnerKind::Shared;
    }
    OwnerKind::Immutable
}

/// Materialize one fetched object: node, ownership, type instance edge,
/// content references and (optionally) dynamic-field children.
fn process_object(
    builder: &mut GraphBuilder,
    config: &AnalyzerConfig,
    dynamic_fields: &dyn DynamicFieldSource,
    type_fqn: &str,
    raw: &RawObject,
) -> anyhow::Result<OwnerKind> {
    let owner = decode_owner(&raw.owner);
    let shared = owner == OwnerKind::Shared;

    let object_id = builder.add_object(ObjectNode {
        object_id: raw.object_id.clone(),
        type_fqn: raw.type_fqn.clone().unwrap_or_else(|| type_fqn.to_string()),
        owner: owner.clone(),
        shared,
        version: raw.version,
        digest: raw.digest.clone(),
        content: raw.content.clone(),
    });

    builder.add_edge(Edge::new(
        EdgeKind::ObjInstanceOf,
        object_id.clone(),
        node_id::type_(type_fqn),
    ));

    if let OwnerKind::AddressOwner { address } = &owner {
        let addr_id = builder.ensure_address(address);
        builder.add_edge(Edge::new(EdgeKind::ObjOwnedBy, object_id.clone(), addr_id));
    }

    if let Some(content) = &raw.content {
        link_content_references(builder, &object_id, &raw.object_id, content);
    }

    if config.max_obj_depth > 0 {
        // A dynamic-field failure is contained to this object.
        if let Err(e) = expand_dynamic_fields(builder, dynamic_fields, &object_id, &raw.object_id)
        {
            warn!(object = %raw.object_id, error = %e, "dynamic field expansion failed");
        }
    }

    Ok(owner)
}

/// Scan a decoded content snapshot for strings shaped like 32-byte object
/// ids and link them, creating placeholders for ids not seen before.
fn link_content_references(
    builder: &mut GraphBuilder,
    object_id: &str,
    own_id: &str,
    content: &Value,
) {
    let mut hits = Vec::new();
    collect_object_ids(content, 0, &mut hits);
    for referenced in hits {
        if referenced == own_id {
            continue;
        }
        let ref_id = node_id::object(&referenced);
        if !builder.has_object(&ref_id) {
            builder.add_object(ObjectNode::placeholder(&referenced));
        }
        builder.add_edge(Edge::new(
            EdgeKind::ObjRefersObj,
            object_id.to_string(),
            ref_id,
        ));
    }
}

fn collect_object_ids(value: &Value, depth: usize, hits: &mut Vec<String>) {
    if depth > CONTENT_SCAN_DEPTH || hits.len() >= CONTENT_SCAN_HITS {
        return;
    }
    match value {
        Value::String(s) => {
            if looks_like_object_id(s) {
                hits.push(s.clone());
            }
        }
        Value::Array(arr) => {
            for v in arr {
                if hits.len() >= CONTENT_SCAN_HITS {
                    break;
                }
                collect_object_ids(v, depth + 1, hits);
            }
        }
        Value::Object(map) => {
            for v in map.values() {
                if hits.len() >= CONTENT_SCAN_HITS {
                    break;
                }
                collect_object_ids(v, depth + 1, hits);
            }
        }
        _ => {}
    }
}

/// Fetch an object's direct dynamic-field children and link them. Each child
/// that cannot be fetched becomes a minimal placeholder.
fn expand_dynamic_fields(
    builder: &mut GraphBuilder,
    dynamic_fields: &dyn DynamicFieldSource,
    object_id: &str,
    own_id: &str,
) -> anyhow::Result<()> {
    let children = dynamic_fields.list_dynamic_fields(own_id)?;
    for child_id in children {
        let child_node_id = match dynamic_fields.get_object(&child_id) {
            Ok(child) => builder.add_object(ObjectNode {
                object_id: child.object_id.clone(),
                type_fqn: child.type_fqn.clone().unwrap_or_else(|| "unknown".to_string()),
                owner: decode_owner(&child.owner),
                shared: decode_owner(&child.owner) == OwnerKind::Shared,
                version: child.version,
                digest: child.digest,
                content: child.content,
            }),
            Err(e) => {
                debug!(child = %child_id, error = %e, "child fetch failed, using placeholder");
                builder.add_object(ObjectNode::placeholder(&child_id))
            }
        };
        builder.add_edge(Edge::new(
            EdgeKind::ObjDfChild,
            object_id.to_string(),
            child_node_id,
        ));
    }
    Ok(())
}
