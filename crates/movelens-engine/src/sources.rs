//! Collaborator contracts consumed by the engine.
//!
//! Network access happens exclusively through these traits; the live
//! implementations live in `movelens-transport`, and the engine tests use
//! in-memory fakes. Keeping the boundary here means the engine never issues
//! a request itself and can be driven fully offline.

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::Value;

/// First-page population estimate for an object type.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountEstimate {
    /// Instances seen on the first page.
    pub estimated_count: usize,
    /// Whether the source reported further pages beyond the first.
    pub has_more: bool,
}

/// One page of objects from a cursor-paginated source.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    pub objects: Vec<RawObject>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

/// An object as returned by the chain, before owner decoding.
///
/// `owner` keeps the wire shape (`{"AddressOwner": "0x.."}`, `"Immutable"`,
/// `{"Shared": {..}}`, `{"ObjectOwner": "0x.."}`); the discovery engine is
/// the single place that decodes it into [`movelens_types::OwnerKind`].
#[derive(Debug, Clone)]
pub struct RawObject {
    pub object_id: String,
    pub type_fqn: Option<String>,
    pub owner: Value,
    pub version: Option<u64>,
    pub digest: Option<String>,
    pub content: Option<Value>,
}

/// An event as returned by the chain.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub tx_digest: String,
    pub event_seq: String,
    /// Fully-qualified event type, `address::module::Name`.
    pub type_fqn: String,
    pub timestamp_ms: Option<u64>,
    pub sender: Option<String>,
    pub parsed_json: Option<Value>,
}

/// Source of normalized module metadata for a package.
///
/// Fails (rather than returning an empty map) when the package does not
/// exist on the queried network.
pub trait ModuleSource {
    fn normalized_modules(&self, package: &str) -> Result<BTreeMap<String, Value>>;
}

/// Cursor-paginated source of on-chain objects by type.
pub trait ObjectSource {
    fn estimate_count(&self, type_fqn: &str) -> Result<CountEstimate>;
    fn query_page(
        &self,
        type_fqn: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<ObjectPage>;
}

/// Dynamic-field lookups for a parent object.
pub trait DynamicFieldSource {
    /// Object ids of the parent's direct dynamic-field children.
    fn list_dynamic_fields(&self, object_id: &str) -> Result<Vec<String>>;
    /// Fetch a single object (used to classify dynamic-field children).
    fn get_object(&self, object_id: &str) -> Result<RawObject>;
}

/// Recent-event source filtered by emitting package.
pub trait EventSource {
    fn query_events(&self, package: &str, limit: usize) -> Result<Vec<RawEvent>>;
}

/// The full set of collaborators one analysis needs.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub modules: &'a dyn ModuleSource,
    pub objects: &'a dyn ObjectSource,
    pub dynamic_fields: &'a dyn DynamicFieldSource,
    pub events: &'a dyn EventSource,
}

/// Caller-supplied progress callback, invoked with a percentage in 0..=100.
///
/// This is also the cooperative cancellation hook: returning an error
/// unwinds the analysis.
pub type ProgressSink<'a> = &'a mut dyn FnMut(u8) -> Result<()>;
