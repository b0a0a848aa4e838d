//! Network selection.
//!
//! A package id does not say which network it lives on. When the caller has
//! no preference we probe a fixed candidate order (mainnet first, then
//! testnet) with a cheap module-metadata query and use the first network
//! that resolves the package.

use anyhow::{anyhow, Result};
use std::str::FromStr;
use tracing::debug;

use crate::rpc::RpcClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

/// Candidate order when no network preference is given.
pub const CANDIDATE_NETWORKS: &[Network] = &[Network::Mainnet, Network::Testnet];

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    pub fn rpc_endpoint(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
        }
    }

    pub fn graphql_endpoint(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://graphql.mainnet.sui.io/graphql",
            Network::Testnet => "https://graphql.testnet.sui.io/graphql",
        }
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(anyhow!("unknown network: {}", other)),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the network a package lives on.
///
/// With a preference, only that network is tried. Otherwise the candidates
/// are probed in order and the first that resolves wins; failure on all of
/// them is fatal for the analysis.
pub fn detect_network(package: &str, preferred: Option<Network>) -> Result<Network> {
    let candidates: Vec<Network> = match preferred {
        Some(n) => vec![n],
        None => CANDIDATE_NETWORKS.to_vec(),
    };

    for network in &candidates {
        let client = RpcClient::new(network.rpc_endpoint());
        match client.package_exists(package) {
            Ok(true) => return Ok(*network),
            Ok(false) => {
                debug!(package = %package, network = %network, "package not on network");
            }
            Err(e) => {
                debug!(package = %package, network = %network, error = %e, "network probe failed");
            }
        }
    }

    Err(anyhow!(
        "package {} does not resolve on any candidate network ({})",
        package,
        candidates
            .iter()
            .map(Network::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_str() {
        assert_eq!(Network::from_str("mainnet").unwrap(), Network::Mainnet);
        assert_eq!(Network::from_str("Testnet").unwrap(), Network::Testnet);
        assert!(Network::from_str("devnet").is_err());
    }

    #[test]
    fn test_candidate_order_is_mainnet_first() {
        assert_eq!(CANDIDATE_NETWORKS[0], Network::Mainnet);
    }
}
