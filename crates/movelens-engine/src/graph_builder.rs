//! Owned graph accumulator for one package analysis.
//!
//! Each call into the single-package analyzer gets its own builder; the
//! builder is finalized into a [`Graph`] exactly once and results are
//! combined functionally via [`Graph::merge`]. Nothing here is shared
//! across analyses, which keeps sibling analyses trivially parallelizable.

use movelens_types::address::{normalize_address, short_address};
use movelens_types::node_id;
use movelens_types::{
    AddressNode, Edge, EventNode, Flag, Graph, ModuleNode, ObjectNode, PackageNode, TypeNode,
    TypeStats,
};

#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the package node for `address` if it is not present yet, and
    /// return its id. Packages are named by their short address until a
    /// better display name is known.
    pub fn ensure_package(&mut self, address: &str) -> String {
        let address = normalize_address(address);
        let id = node_id::package(&address);
        self.graph
            .packages
            .entry(id.clone())
            .or_insert_with(|| PackageNode {
                name: short_address(&address),
                address,
            });
        id
    }

    /// Insert a parsed module, returning its id. A later insert for the same
    /// FQN replaces the earlier one.
    pub fn add_module(&mut self, module: ModuleNode) -> String {
        let id = node_id::module(&module.fqn);
        self.graph.modules.insert(id.clone(), module);
        id
    }

    /// Create an empty stand-in for a referenced module that was not parsed
    /// in this pass (external call target, friend declaration). Real
    /// extractions never go through here.
    pub fn ensure_module_stub(&mut self, fqn: &str, package_id: &str) -> String {
        let id = node_id::module(fqn);
        self.graph
            .modules
            .entry(id.clone())
            .or_insert_with(|| ModuleNode {
                fqn: fqn.to_string(),
                package: package_id.to_string(),
                functions: Vec::new(),
                types: Vec::new(),
                friends: Vec::new(),
                constants: Vec::new(),
                flags: Vec::new(),
            });
        id
    }

    pub fn module_mut(&mut self, id: &str) -> Option<&mut ModuleNode> {
        self.graph.modules.get_mut(id)
    }

    pub fn has_module(&self, id: &str) -> bool {
        self.graph.modules.contains_key(id)
    }

    /// Insert a type definition, returning its id. Types are immutable once
    /// created, except that a definition replaces a previously created
    /// reference stub.
    pub fn add_type(&mut self, type_: TypeNode) -> String {
        let id = node_id::type_(&type_.fqn);
        match self.graph.types.get(&id) {
            Some(existing) if !existing.is_stub() => {}
            _ => {
                self.graph.types.insert(id.clone(), type_);
            }
        }
        id
    }

    /// Create an empty stand-in for a type that is referenced by a field but
    /// defined elsewhere, so that TYPE_USES_TYPE edges always resolve.
    pub fn ensure_type_stub(&mut self, fqn: &str, module_id: &str) -> String {
        let id = node_id::type_(fqn);
        self.graph.types.entry(id.clone()).or_insert_with(|| TypeNode {
            fqn: fqn.to_string(),
            module: module_id.to_string(),
            fields: Vec::new(),
            abilities: Vec::new(),
            has_key: false,
        });
        id
    }

    pub fn add_object(&mut self, object: ObjectNode) -> String {
        let id = node_id::object(&object.object_id);
        // A fetched object wins over a placeholder created earlier in the
        // same pass; a placeholder never downgrades a fetched object.
        match self.graph.objects.get(&id) {
            Some(existing) if existing.type_fqn != "unknown" && object.type_fqn == "unknown" => {}
            _ => {
                self.graph.objects.insert(id.clone(), object);
            }
        }
        id
    }

    pub fn has_object(&self, id: &str) -> bool {
        self.graph.objects.contains_key(id)
    }

    pub fn ensure_address(&mut self, address: &str) -> String {
        let id = node_id::address(address);
        self.graph
            .addresses
            .entry(id.clone())
            .or_insert_with(|| AddressNode {
                address: address.to_string(),
            });
        id
    }

    pub fn add_event(&mut self, event: EventNode) -> String {
        let id = event.id.clone();
        self.graph.events.insert(id.clone(), event);
        id
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.graph.edges.push(edge);
    }

    pub fn add_flag(&mut self, flag: Flag) {
        self.graph.flags.push(flag);
    }

    pub fn set_type_stats(&mut self, type_fqn: &str, stats: TypeStats) {
        self.graph.type_stats.insert(type_fqn.to_string(), stats);
    }

    /// Read access for components that scan what earlier stages built.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn finish(self) -> Graph {
        self.graph
    }
}
