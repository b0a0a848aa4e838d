//! Network transport layer for movelens.
//!
//! Live implementations of the engine's collaborator traits:
//! - [`rpc::RpcClient`]: Sui JSON-RPC for normalized module metadata and
//!   recent events
//! - [`graphql::GraphQLClient`]: Sui GraphQL for object enumeration by type
//!   and dynamic-field discovery
//! - [`network`]: candidate-network probing when the caller does not state
//!   where a package lives
//!
//! # Example
//!
//! ```ignore
//! use movelens_transport::{detect_network, LiveSources};
//!
//! let network = detect_network("0xdee9...", None)?;
//! let live = LiveSources::new(network);
//! let graph = movelens_engine::analyze_recursive(
//!     live.sources(), &config, "0xdee9...", &mut on_progress)?;
//! ```

pub mod graphql;
pub mod network;
pub mod rpc;

pub use graphql::GraphQLClient;
pub use network::{detect_network, Network, CANDIDATE_NETWORKS};
pub use rpc::RpcClient;

use movelens_engine::sources::Sources;

/// The live collaborator set for one network.
pub struct LiveSources {
    rpc: RpcClient,
    graphql: GraphQLClient,
}

impl LiveSources {
    pub fn new(network: Network) -> Self {
        Self {
            rpc: RpcClient::new(network.rpc_endpoint()),
            graphql: GraphQLClient::new(network.graphql_endpoint()),
        }
    }

    /// Custom endpoints, mainly for tests and self-hosted nodes.
    pub fn with_endpoints(rpc_endpoint: &str, graphql_endpoint: &str) -> Self {
        Self {
            rpc: RpcClient::new(rpc_endpoint),
            graphql: GraphQLClient::new(graphql_endpoint),
        }
    }

    /// Borrow as the engine's source bundle.
    pub fn sources(&self) -> Sources<'_> {
        Sources {
            modules: &self.rpc,
            objects: &self.graphql,
            dynamic_fields: &self.graphql,
            events: &self.rpc,
        }
    }
}
