//! Shared types for the movelens workspace.
//!
//! This crate provides the typed graph model produced by the analyzer and the
//! configuration surface shared across crates:
//!
//! - [`graph`]: node, edge, flag and stats types plus [`Graph`](graph::Graph)
//!   with its set-union merge
//! - [`config`]: analyzer configuration and the built-in critical-type table
//! - [`address`]: Sui address normalization helpers
//! - [`type_parsing`]: FQN extraction from Move type strings

pub mod address;
pub mod config;
pub mod graph;
pub mod type_parsing;

pub use config::{AnalyzerConfig, BUILTIN_CRITICAL_TYPES};
pub use graph::node_id;
pub use graph::{
    AddressNode, CallEvidence, CallType, ConstantRecord, Edge, EdgeKind, EventKind, EventNode,
    FieldDef, Flag, FlagScope, FunctionSummary, Graph, GraphSummary, ModuleNode, ObjectNode,
    OwnerKind, PackageNode, Severity, TypeNode, TypeStats, Visibility,
};
