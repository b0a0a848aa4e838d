//! movelens: analyze an on-chain Sui package into a typed graph.
//!
//! Fetches a package's normalized module metadata, reconstructs its
//! structural model (modules, types, functions, objects, events) together
//! with heuristic security flags, and writes the result as JSON.
//!
//! ## Example Usage
//!
//! ```bash
//! # Analyze a package, auto-detecting the network
//! movelens analyze 0xdee9... --out graph.json
//!
//! # Deep analysis: follow dependencies two levels, no object sampling
//! movelens analyze 0xdee9... --max-depth 2 --no-sampling
//!
//! # Which candidate networks does this package resolve on?
//! movelens networks 0xdee9...
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use movelens_engine::{analyze_recursive, AnalysisReport};
use movelens_transport::{detect_network, LiveSources, Network, CANDIDATE_NETWORKS};
use movelens_types::AnalyzerConfig;

#[derive(Parser)]
#[command(
    name = "movelens",
    author,
    version,
    about = "On-chain Sui package graph analyzer",
    long_about = "Reconstructs the structural model of an on-chain Move package \
                  (modules, types, functions, objects, events) as a single typed \
                  graph with heuristic security flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a package and emit the graph as JSON
    Analyze(AnalyzeCmd),

    /// Show which candidate networks resolve a package
    Networks(NetworksCmd),
}

#[derive(Parser)]
struct AnalyzeCmd {
    /// Package id (0x-prefixed address)
    package: String,

    /// Network to query; auto-detected when omitted
    #[arg(long)]
    network: Option<Network>,

    /// Dependency traversal depth (1 = root package only)
    #[arg(long, default_value_t = 1)]
    max_depth: u32,

    /// Dynamic-field traversal depth per object (0 disables)
    #[arg(long, default_value_t = 1)]
    max_obj_depth: u32,

    /// Population size at or below which a type is fetched exhaustively
    #[arg(long, default_value_t = 100)]
    threshold: usize,

    /// Objects fetched per sampled type
    #[arg(long, default_value_t = 10)]
    sample_size: usize,

    /// Fetch large types up to the threshold instead of sampling
    #[arg(long)]
    no_sampling: bool,

    /// Extra critical-type marker (repeatable), unioned with the built-ins
    #[arg(long = "critical-type")]
    critical_types: Vec<String>,

    /// Write the report here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Suppress the progress meter on stderr
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Parser)]
struct NetworksCmd {
    /// Package id (0x-prefixed address)
    package: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(cmd) => run_analyze(cmd),
        Commands::Networks(cmd) => run_networks(cmd),
    }
}

fn run_analyze(cmd: AnalyzeCmd) -> Result<()> {
    let network = detect_network(&cmd.package, cmd.network)?;
    let live = LiveSources::new(network);

    let config = AnalyzerConfig {
        max_pkg_depth: cmd.max_depth,
        max_obj_depth: cmd.max_obj_depth,
        type_count_threshold: cmd.threshold,
        sample_large_types: !cmd.no_sampling,
        object_sample_size: cmd.sample_size,
        critical_types: cmd.critical_types.clone(),
        ..Default::default()
    };

    let quiet = cmd.quiet;
    let mut on_progress = move |pct: u8| -> Result<()> {
        if !quiet {
            eprint!("\ranalyzing... {:3}%", pct);
            if pct >= 100 {
                eprintln!();
            }
            std::io::stderr().flush().ok();
        }
        Ok(())
    };

    let graph = analyze_recursive(live.sources(), &config, &cmd.package, &mut on_progress)?;
    let report = AnalysisReport::new(network.as_str(), &cmd.package, config, graph);

    let json = if cmd.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &cmd.out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("write report to {}", path.display()))?;
            eprintln!(
                "wrote {} ({} modules, {} objects, {} flags)",
                path.display(),
                report.summary.modules,
                report.summary.objects,
                report.summary.flags
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_networks(cmd: NetworksCmd) -> Result<()> {
    let mut any = false;
    for network in CANDIDATE_NETWORKS {
        match detect_network(&cmd.package, Some(*network)) {
            Ok(n) => {
                println!("{}", n);
                any = true;
            }
            Err(_) => {}
        }
    }
    if !any {
        anyhow::bail!("package {} does not resolve on any candidate network", cmd.package);
    }
    Ok(())
}
