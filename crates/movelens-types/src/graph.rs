//! The typed package graph.
//!
//! Every entity carries a stable, prefixed string id (`pkg:`, `mod:`,
//! `type:`, `obj:`, `addr:`, `evt:`) so that merging the graphs of repeated
//! sub-analyses is a pure set union by id. Node maps use `BTreeMap` so the
//! serialized graph is deterministic across runs.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Id constructors. All ids are plain strings so the graph serializes to
/// JSON without an id registry; the prefix keeps the namespaces disjoint.
pub mod node_id {
    pub fn package(address: &str) -> String {
        format!("pkg:{}", address)
    }

    pub fn module(fqn: &str) -> String {
        format!("mod:{}", fqn)
    }

    pub fn type_(fqn: &str) -> String {
        format!("type:{}", fqn)
    }

    pub fn object(object_id: &str) -> String {
        format!("obj:{}", object_id)
    }

    pub fn address(address: &str) -> String {
        format!("addr:{}", address)
    }

    pub fn event(tx_digest: &str, seq: &str) -> String {
        format!("evt:{}:{}", tx_digest, seq)
    }
}

/// Function visibility, classified in priority order: the entry flag wins
/// over the declared visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Entry,
    Public,
    Private,
    Friend,
}

/// One exposed function of a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSummary {
    pub name: String,
    pub visibility: Visibility,
    pub is_entry: bool,
    /// Parameter type strings; non-string RPC shapes are serialized as-is.
    pub params: Vec<String>,
    pub returns: String,
}

/// A decoded module-level constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantRecord {
    pub name: String,
    pub type_: String,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageNode {
    pub address: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleNode {
    /// `address::module`.
    pub fqn: String,
    /// Owning package id (`pkg:` prefixed).
    pub package: String,
    pub functions: Vec<FunctionSummary>,
    /// Ids of types this module defines (`type:` prefixed).
    pub types: Vec<String>,
    /// Friend module FQNs.
    pub friends: Vec<String>,
    pub constants: Vec<ConstantRecord>,
    /// Kinds of flags this module triggered (details live in `Graph::flags`).
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

/// A struct definition. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    /// `address::module::Name`.
    pub fqn: String,
    /// Owning module id (`mod:` prefixed).
    pub module: String,
    pub fields: Vec<FieldDef>,
    /// Lowercased ability names (copy, drop, store, key), sorted.
    pub abilities: Vec<String>,
    /// The sole gate for object discovery eligibility.
    pub has_key: bool,
}

impl TypeNode {
    /// True for an empty stand-in created from a field reference, as opposed
    /// to a real parsed definition.
    pub fn is_stub(&self) -> bool {
        self.fields.is_empty() && self.abilities.is_empty() && !self.has_key
    }
}

/// Decoded object ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OwnerKind {
    AddressOwner { address: String },
    Shared,
    Immutable,
    ObjectOwner { address: String },
}

impl OwnerKind {
    /// The owning address, present only for address/object owners.
    pub fn address(&self) -> Option<&str> {
        match self {
            OwnerKind::AddressOwner { address } | OwnerKind::ObjectOwner { address } => {
                Some(address)
            }
            OwnerKind::Shared | OwnerKind::Immutable => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    pub object_id: String,
    /// Declared type FQN, or `"unknown"` for placeholder nodes that were
    /// referenced but never fetched.
    pub type_fqn: String,
    pub owner: OwnerKind,
    pub shared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Decoded content snapshot, when the source returned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl ObjectNode {
    /// Minimal placeholder for an object that was referenced (dynamic-field
    /// child, content pointer) but never fetched.
    pub fn placeholder(object_id: &str) -> Self {
        Self {
            object_id: object_id.to_string(),
            type_fqn: "unknown".to_string(),
            owner: OwnerKind::Immutable,
            shared: false,
            version: None,
            digest: None,
            content: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressNode {
    pub address: String,
}

/// Event kind, classified by substring on the event type FQN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Publish,
    Upgrade,
    Mint,
    Burn,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNode {
    /// `txDigest:eventSeq`.
    pub id: String,
    pub kind: EventKind,
    /// Emitting module id, when its module was found in the analyzed set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Emitting package id.
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    pub tx_digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Classification of a cross-module call edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallType {
    Friend,
    SamePackage,
    External,
}

/// Evidence that one module references another. The callee function is a
/// sentinel marker when the reference was derived from a type signature
/// rather than an observed call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEvidence {
    /// Referencing function in the caller module.
    pub function: String,
    /// Referenced function, or [`CallEvidence::TYPE_REF`].
    pub callee: String,
}

impl CallEvidence {
    /// Sentinel callee for evidence derived from type references only.
    pub const TYPE_REF: &'static str = "<type-ref>";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    PkgContains,
    PkgDepends,
    ModCalls,
    ModDefinesType,
    TypeUsesType,
    ModFriendAllow,
    ObjInstanceOf,
    ObjOwnedBy,
    ObjDfChild,
    ObjRefersObj,
    ModEmitsEvent,
    PkgEmitsEvent,
}

/// A typed directed relation between two entity ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub kind: EdgeKind,
    pub from: String,
    pub to: String,
    /// Present on MOD_CALLS edges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_type: Option<CallType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<CallEvidence>,
    /// Originating field name on TYPE_USES_TYPE edges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Edge {
    pub fn new(kind: EdgeKind, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind,
            from: from.into(),
            to: to.into(),
            call_type: None,
            evidence: Vec::new(),
            field: None,
        }
    }

    /// Dedup key used by the merge: edges are unique per `(kind, from, to)`.
    pub fn triple(&self) -> (EdgeKind, &str, &str) {
        (self.kind, self.from.as_str(), self.to.as_str())
    }
}

/// Per-type aggregate recorded by object discovery.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStats {
    /// Best-effort population estimate. Approximate whenever the source
    /// reported further pages beyond what was fetched.
    pub count: usize,
    /// Instances actually materialized.
    pub sampled: usize,
    /// Shared instances among those fetched.
    pub shared: usize,
    /// Distinct owner addresses among those fetched.
    pub owners: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MED")]
    Med,
    #[serde(rename = "LOW")]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlagScope {
    Module,
    Type,
    Object,
}

/// A heuristic security finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flag {
    pub severity: Severity,
    /// Free-form rule tag, e.g. "AdminCap" or "UnsafeShared".
    pub kind: String,
    pub scope: FlagScope,
    /// Referenced entity id.
    pub entity: String,
    pub detail: String,
}

/// The merged analysis graph: node maps keyed by id, a flat edge list, and
/// run-level aggregates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub packages: BTreeMap<String, PackageNode>,
    pub modules: BTreeMap<String, ModuleNode>,
    pub types: BTreeMap<String, TypeNode>,
    pub objects: BTreeMap<String, ObjectNode>,
    pub addresses: BTreeMap<String, AddressNode>,
    pub events: BTreeMap<String, EventNode>,
    pub edges: Vec<Edge>,
    /// Keyed by type FQN.
    pub type_stats: BTreeMap<String, TypeStats>,
    pub flags: Vec<Flag>,
}

impl Graph {
    /// Merge another graph into this one.
    ///
    /// Node maps are unioned by id with last-writer-wins on collisions (a
    /// duplicate module FQN across sibling sub-analyses is logged, since it
    /// silently discards one extraction). Stub modules, stub types and
    /// placeholder objects never replace a real entry, whichever side they
    /// arrive on. Edges are unioned and deduplicated
    /// by `(kind, from, to)`, keeping the first occurrence. Flags are
    /// concatenated. The operation is idempotent: merging a graph with
    /// itself leaves node-id sets and the edge triple-set unchanged.
    pub fn merge(&mut self, other: Graph) {
        self.packages.extend(other.packages);
        for (id, module) in other.modules {
            match self.modules.get(&id) {
                // An empty stand-in (external call target seen before its
                // package was analyzed) is overwritten silently.
                Some(existing)
                    if !(existing.functions.is_empty() && existing.types.is_empty()) =>
                {
                    if module.functions.is_empty() && module.types.is_empty() {
                        // Incoming stub never downgrades a real extraction.
                        continue;
                    }
                    warn!(module = %id, "duplicate module id in merge, keeping last extraction");
                }
                _ => {}
            }
            self.modules.insert(id, module);
        }
        for (id, type_node) in other.types {
            // Same rule as modules and objects: a field-reference stand-in
            // arriving from a later sub-analysis never downgrades a parsed
            // definition.
            match self.types.get(&id) {
                Some(existing) if !existing.is_stub() && type_node.is_stub() => {}
                _ => {
                    self.types.insert(id, type_node);
                }
            }
        }
        for (id, obj) in other.objects {
            // Never let a placeholder overwrite a fetched object.
            match self.objects.get(&id) {
                Some(existing) if existing.type_fqn != "unknown" && obj.type_fqn == "unknown" => {}
                _ => {
                    self.objects.insert(id, obj);
                }
            }
        }
        self.addresses.extend(other.addresses);
        self.events.extend(other.events);
        self.type_stats.extend(other.type_stats);
        self.flags.extend(other.flags);

        let mut seen: HashSet<(EdgeKind, String, String)> = self
            .edges
            .iter()
            .map(|e| (e.kind, e.from.clone(), e.to.clone()))
            .collect();
        // Dedupe pre-existing duplicates too: single-package passes are
        // allowed to emit the same triple more than once.
        let mut deduped = Vec::with_capacity(self.edges.len());
        let mut kept: HashSet<(EdgeKind, String, String)> = HashSet::new();
        for e in self.edges.drain(..) {
            if kept.insert((e.kind, e.from.clone(), e.to.clone())) {
                deduped.push(e);
            }
        }
        self.edges = deduped;
        for e in other.edges {
            let key = (e.kind, e.from.clone(), e.to.clone());
            if seen.insert(key) {
                self.edges.push(e);
            }
        }
    }

    /// Entity count summary for reporting.
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            packages: self.packages.len(),
            modules: self.modules.len(),
            types: self.types.len(),
            objects: self.objects.len(),
            addresses: self.addresses.len(),
            events: self.events.len(),
            edges: self.edges.len(),
            flags: self.flags.len(),
        }
    }

    /// True when every edge endpoint resolves to a node in this graph.
    /// Holds for any fully merged analysis result.
    pub fn edges_resolve(&self) -> bool {
        self.edges
            .iter()
            .all(|e| self.contains_id(&e.from) && self.contains_id(&e.to))
    }

    fn contains_id(&self, id: &str) -> bool {
        self.packages.contains_key(id)
            || self.modules.contains_key(id)
            || self.types.contains_key(id)
            || self.objects.contains_key(id)
            || self.addresses.contains_key(id)
            || self.events.contains_key(id)
    }
}

/// Entity counts of a finished graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub packages: usize,
    pub modules: usize,
    pub types: usize,
    pub objects: usize,
    pub addresses: usize,
    pub events: usize,
    pub edges: usize,
    pub flags: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> Graph {
        let mut g = Graph::default();
        g.packages.insert(
            node_id::package("0xa"),
            PackageNode {
                address: "0xa".to_string(),
                name: "0xa".to_string(),
            },
        );
        g.modules.insert(
            node_id::module("0xa::m"),
            ModuleNode {
                fqn: "0xa::m".to_string(),
                package: node_id::package("0xa"),
                functions: Vec::new(),
                types: Vec::new(),
                friends: Vec::new(),
                constants: Vec::new(),
                flags: Vec::new(),
            },
        );
        g.edges.push(Edge::new(
            EdgeKind::PkgContains,
            node_id::package("0xa"),
            node_id::module("0xa::m"),
        ));
        g
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut g = sample_graph();
        let before_nodes: Vec<String> = g.modules.keys().cloned().collect();
        let before_edges = g.edges.len();
        g.merge(sample_graph());
        assert_eq!(
            g.modules.keys().cloned().collect::<Vec<_>>(),
            before_nodes
        );
        assert_eq!(g.edges.len(), before_edges);
    }

    #[test]
    fn test_merge_dedupes_shared_edge() {
        let mut a = sample_graph();
        let mut b = sample_graph();
        let call = Edge {
            call_type: Some(CallType::External),
            ..Edge::new(EdgeKind::ModCalls, "mod:0xa::m", "mod:0xb::n")
        };
        a.edges.push(call.clone());
        b.edges.push(call);
        a.merge(b);
        let calls: Vec<_> = a
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::ModCalls)
            .collect();
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn test_merge_keeps_type_definition_over_field_reference_stub() {
        let type_id = node_id::type_("0xa::m::Thing");
        let definition = TypeNode {
            fqn: "0xa::m::Thing".to_string(),
            module: node_id::module("0xa::m"),
            fields: vec![FieldDef {
                name: "id".to_string(),
                type_: "0x2::object::UID".to_string(),
            }],
            abilities: vec!["key".to_string()],
            has_key: true,
        };
        let stub = TypeNode {
            fqn: "0xa::m::Thing".to_string(),
            module: node_id::module("0xa::m"),
            fields: Vec::new(),
            abilities: Vec::new(),
            has_key: false,
        };

        // Stub arrives after the definition.
        let mut a = Graph::default();
        a.types.insert(type_id.clone(), definition.clone());
        let mut b = Graph::default();
        b.types.insert(type_id.clone(), stub.clone());
        a.merge(b);
        assert!(a.types[&type_id].has_key);
        assert_eq!(a.types[&type_id].abilities, vec!["key"]);

        // Definition arrives after the stub.
        let mut c = Graph::default();
        c.types.insert(type_id.clone(), stub);
        let mut d = Graph::default();
        d.types.insert(type_id.clone(), definition);
        c.merge(d);
        assert!(c.types[&type_id].has_key);
        assert_eq!(c.types[&type_id].fields.len(), 1);
    }

    #[test]
    fn test_merge_keeps_fetched_object_over_placeholder() {
        let mut a = Graph::default();
        a.objects.insert(
            node_id::object("0x1"),
            ObjectNode {
                object_id: "0x1".to_string(),
                type_fqn: "0xa::m::T".to_string(),
                owner: OwnerKind::Shared,
                shared: true,
                version: Some(3),
                digest: None,
                content: None,
            },
        );
        let mut b = Graph::default();
        b.objects
            .insert(node_id::object("0x1"), ObjectNode::placeholder("0x1"));
        a.merge(b);
        assert_eq!(a.objects[&node_id::object("0x1")].type_fqn, "0xa::m::T");
    }

    #[test]
    fn test_owner_address_presence() {
        assert!(OwnerKind::AddressOwner {
            address: "0xabc".to_string()
        }
        .address()
        .is_some());
        assert!(OwnerKind::Shared.address().is_none());
        assert!(OwnerKind::Immutable.address().is_none());
    }

    #[test]
    fn test_edge_kind_serializes_screaming_snake() {
        let v = serde_json::to_value(EdgeKind::TypeUsesType).unwrap();
        assert_eq!(v, serde_json::json!("TYPE_USES_TYPE"));
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(
            serde_json::to_value(Severity::Med).unwrap(),
            serde_json::json!("MED")
        );
    }
}
