//! Analysis orchestration.
//!
//! [`analyze_package`] drives one package through parse, dependency
//! derivation, object discovery, event collection and flag detection,
//! reporting progress at fixed milestones. [`analyze_recursive`] walks the
//! dependency frontier breadth-first with an explicit visited set and depth
//! counter, so termination holds on cyclic dependency graphs, and folds the
//! per-package graphs into one via [`Graph::merge`].

use std::collections::{BTreeSet, HashSet};

use anyhow::{Context, Result};
use tracing::{info, warn};

use movelens_types::address::normalize_address;
use movelens_types::{AnalyzerConfig, CallType, EdgeKind, Graph};

use crate::events::collect_events;
use crate::flags::detect_flags;
use crate::graph_builder::GraphBuilder;
use crate::module_parser::{build_package_dependencies, parse_package};
use crate::object_discovery::discover_objects;
use crate::sources::{ProgressSink, Sources};

/// Analyze a single package into its own graph.
///
/// Fails only when the module metadata fetch fails (package unresolvable on
/// this network); object, event and per-module problems degrade to partial
/// output per the engine's best-effort contract.
pub fn analyze_package(
    sources: Sources<'_>,
    config: &AnalyzerConfig,
    package_address: &str,
    progress: ProgressSink<'_>,
) -> Result<Graph> {
    let package_address = normalize_address(package_address);
    progress(5)?;

    let raw_modules = sources
        .modules
        .normalized_modules(&package_address)
        .with_context(|| format!("fetch normalized modules for {}", package_address))?;
    progress(15)?;

    let mut builder = GraphBuilder::new();
    let parsed = parse_package(&mut builder, config, &package_address, &raw_modules);
    progress(35)?;

    build_package_dependencies(&mut builder, &parsed);
    progress(45)?;

    discover_objects(&mut builder, config, sources.objects, sources.dynamic_fields);
    progress(65)?;

    collect_events(&mut builder, sources.events, &package_address, &parsed.package_id);
    progress(80)?;

    let mut graph = builder.finish();
    detect_flags(&mut graph);
    progress(90)?;

    info!(
        package = %package_address,
        modules = graph.modules.len(),
        objects = graph.objects.len(),
        flags = graph.flags.len(),
        "package analysis complete"
    );
    progress(100)?;
    Ok(graph)
}

/// Analyze the root package and its dependency closure up to
/// `config.max_pkg_depth`, merging everything into one graph.
///
/// Each package is visited at most once; a failure on a non-root frontier
/// package drops that branch and keeps going.
pub fn analyze_recursive(
    sources: Sources<'_>,
    config: &AnalyzerConfig,
    root_package: &str,
    progress: ProgressSink<'_>,
) -> Result<Graph> {
    let root = normalize_address(root_package);
    let max_depth = config.max_pkg_depth.max(1);

    let mut total = Graph::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier: Vec<String> = vec![root.clone()];

    for depth in 1..=max_depth {
        if frontier.is_empty() {
            break;
        }
        let mut next_frontier: BTreeSet<String> = BTreeSet::new();

        // Depth d spans an equal slice of the overall percentage, split
        // evenly across this level's frontier.
        let level_base = (depth - 1) as f64 / max_depth as f64 * 100.0;
        let level_span = 100.0 / max_depth as f64;
        let breadth = frontier.len() as f64;

        for (i, package) in frontier.iter().enumerate() {
            // Check-and-mark before analyzing, so a package reached via two
            // paths in the same level is analyzed once.
            if !visited.insert(package.clone()) {
                continue;
            }

            let base = level_base + level_span * i as f64 / breadth;
            let span = level_span / breadth;
            let mut scoped = |pct: u8| -> Result<()> {
                let overall = base + span * pct as f64 / 100.0;
                progress(overall.round().min(100.0) as u8)
            };

            let graph = match analyze_package(sources, config, package, &mut scoped) {
                Ok(graph) => graph,
                Err(e) if *package == root => {
                    return Err(e.context("root package analysis failed"));
                }
                Err(e) => {
                    warn!(package = %package, error = %e, "dropping dependency branch");
                    continue;
                }
            };

            if depth < max_depth {
                for dep in frontier_of(&graph) {
                    if !visited.contains(&dep) {
                        next_frontier.insert(dep);
                    }
                }
            }
            total.merge(graph);
        }

        frontier = next_frontier.into_iter().collect();
    }

    progress(100)?;
    Ok(total)
}

/// Next-frontier packages implied by one package's graph: PKG_DEPENDS
/// targets plus the packages behind external MOD_CALLS edges.
fn frontier_of(graph: &Graph) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for edge in &graph.edges {
        match edge.kind {
            EdgeKind::PkgDepends => {
                if let Some(addr) = edge.to.strip_prefix("pkg:") {
                    out.insert(addr.to_string());
                }
            }
            EdgeKind::ModCalls if edge.call_type == Some(CallType::External) => {
                if let Some(fqn) = edge.to.strip_prefix("mod:") {
                    if let Some(addr) = fqn.split("::").next() {
                        out.insert(addr.to_string());
                    }
                }
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use movelens_types::{node_id, Edge};

    #[test]
    fn test_frontier_of_collects_depends_and_external_calls() {
        let mut graph = Graph::default();
        graph.edges.push(Edge::new(
            EdgeKind::PkgDepends,
            node_id::package("0xa"),
            node_id::package("0xb"),
        ));
        graph.edges.push(Edge {
            call_type: Some(CallType::External),
            ..Edge::new(
                EdgeKind::ModCalls,
                node_id::module("0xa::m"),
                node_id::module("0xc::n"),
            )
        });
        graph.edges.push(Edge {
            call_type: Some(CallType::SamePackage),
            ..Edge::new(
                EdgeKind::ModCalls,
                node_id::module("0xa::m"),
                node_id::module("0xa::other"),
            )
        });
        let frontier = frontier_of(&graph);
        assert_eq!(frontier.len(), 2);
        assert!(frontier.contains("0xb"));
        assert!(frontier.contains("0xc"));
    }
}
