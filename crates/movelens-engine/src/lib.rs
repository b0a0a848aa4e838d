//! Package analysis and graph-construction engine.
//!
//! Ingests normalized Move module metadata for an on-chain package, rebuilds
//! its structural model (packages, modules, types, functions, objects,
//! events) as a single typed graph, and emits heuristic security findings.
//!
//! The engine is network-agnostic: all fetching happens through the
//! [`sources`] traits, implemented for live RPC in `movelens-transport` and
//! by in-memory fakes in the tests.
//!
//! # Example
//!
//! ```ignore
//! use movelens_engine::{analyze_recursive, Sources};
//! use movelens_types::AnalyzerConfig;
//!
//! let config = AnalyzerConfig::default();
//! let mut on_progress = |pct: u8| { eprintln!("{pct}%"); Ok(()) };
//! let graph = analyze_recursive(sources, &config, "0xdee9", &mut on_progress)?;
//! println!("{} modules", graph.modules.len());
//! ```

pub mod analyzer;
pub mod events;
pub mod flags;
pub mod graph_builder;
pub mod module_parser;
pub mod object_discovery;
pub mod sources;

use serde::Serialize;

use movelens_types::{AnalyzerConfig, Graph, GraphSummary};

pub use analyzer::{analyze_package, analyze_recursive};
pub use graph_builder::GraphBuilder;
pub use sources::{
    CountEstimate, DynamicFieldSource, EventSource, ModuleSource, ObjectPage, ObjectSource,
    ProgressSink, RawEvent, RawObject, Sources,
};

/// A completed analysis run: the graph plus the metadata a persistence or
/// UI layer keys on. The engine itself is persistence-agnostic.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Generated run id, usable as a storage slug.
    pub id: String,
    pub network: String,
    pub root_package: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub config: AnalyzerConfig,
    pub summary: GraphSummary,
    pub graph: Graph,
}

impl AnalysisReport {
    pub fn new(network: &str, root_package: &str, config: AnalyzerConfig, graph: Graph) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            network: network.to_string(),
            root_package: root_package.to_string(),
            generated_at: chrono::Utc::now(),
            summary: graph.summary(),
            config,
            graph,
        }
    }
}
