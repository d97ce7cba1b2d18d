//! Core and Gateway discovery
//!
//! Discovery walks three layers: a shuffled Core seed list, the peer list of
//! the first seed that answers, then the public Gateway lists of as many
//! Cores as needed to collect `min_gateways` addresses. The static fallback
//! list is applied by the submission path, not here.

use crate::config::NetworkConfig;
use crate::error::{ClientError, ClientResult, DiscoveryError, FetchError};
use crate::network::dispatcher::EndpointDispatcher;
use crate::network::strategy::{accumulate_until, first_success, RetryPolicy};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde_json::Value;
use std::time::Duration;

/// Source of Gateway URIs for submissions
#[async_trait]
pub trait GatewayDiscovery: Send + Sync {
    /// Return at least `min_gateways` Gateway URIs or fail
    async fn discover_gateways(&self) -> Result<Vec<String>, DiscoveryError>;
}

/// Network-backed discovery chain
pub struct DiscoveryChain {
    config: NetworkConfig,
    dispatcher: EndpointDispatcher,
}

impl DiscoveryChain {
    pub fn new(config: NetworkConfig, dispatcher: EndpointDispatcher) -> Self {
        Self { config, dispatcher }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.config.discovery_retries,
            backoff: Duration::from_millis(self.config.retry_backoff_ms),
        }
    }

    /// Draw up to `count` Core addresses from the shuffled seed list
    pub fn discover_cores(&self, count: usize) -> ClientResult<Vec<String>> {
        if count < 1 {
            return Err(ClientError::InvalidArgument(
                "count arg must be an Integer >= 1".into(),
            ));
        }

        let mut cores = self.config.core_seeds.clone();
        cores.shuffle(&mut rand::thread_rng());
        cores.truncate(count);
        Ok(cores)
    }

    /// Expand seed Cores into the peer list of the first seed that answers
    ///
    /// The responding seed is appended to the returned peers.
    pub async fn core_peer_list(&self, seeds: Vec<String>) -> Result<Vec<String>, DiscoveryError> {
        let mut seeds = seeds;
        seeds.shuffle(&mut rand::thread_rng());

        let timeout = self.config.discovery_timeout();
        let found = first_success(seeds, self.retry_policy(), |core| {
            let uri = format!("{}/peers", self.config.node_uri(&core));
            async move { address_list(self.dispatcher.fetch_json(&uri, timeout).await?) }
        })
        .await;

        match found {
            Some((seed, mut peers)) => {
                tracing::debug!(core = %seed, peers = peers.len(), "Retrieved Core peer list");
                peers.push(seed);
                Ok(peers)
            }
            None => {
                tracing::error!("No seed Core answered the peer list request");
                Err(DiscoveryError::PeerListUnavailable)
            }
        }
    }

    /// Collect Gateway addresses across Cores until `min_gateways` are found
    ///
    /// A Core that returns an empty list counts as a failed candidate.
    pub async fn gateway_list(&self, cores: Vec<String>) -> Result<Vec<String>, DiscoveryError> {
        let timeout = self.config.discovery_timeout();
        let required = self.config.min_gateways;

        let result = accumulate_until(cores, required, self.retry_policy(), |core| {
            let uri = format!("{}/gateways/public", self.config.node_uri(&core));
            async move {
                let gateways = address_list(self.dispatcher.fetch_json(&uri, timeout).await?)?;
                if gateways.is_empty() {
                    return Err(FetchError::InvalidResponse(format!(
                        "no gateway IPs returned from Core {core}"
                    )));
                }
                Ok(gateways)
            }
        })
        .await;

        result.map_err(|partial| {
            tracing::error!(found = partial.len(), required, "Core candidates exhausted");
            DiscoveryError::GatewayListUnavailable {
                found: partial.len(),
                required,
            }
        })
    }

    /// Run the full chain: seeds, peers, Gateway lists
    ///
    /// The denylisted address is removed from the result.
    pub async fn discover(&self) -> Result<Vec<String>, DiscoveryError> {
        if self.config.core_seeds.is_empty() {
            return Err(DiscoveryError::NoCoreSeeds);
        }

        let seeds = self
            .discover_cores(self.config.core_count)
            .map_err(|_| DiscoveryError::NoCoreSeeds)?;
        let cores = self.core_peer_list(seeds).await?;
        let gateways = self.gateway_list(cores).await?;

        let uris: Vec<String> = gateways
            .iter()
            .filter(|address| !self.is_denylisted(address))
            .map(|address| self.config.node_uri(address))
            .collect();

        tracing::info!(gateways = uris.len(), "Discovered Gateways");
        Ok(uris)
    }

    fn is_denylisted(&self, address: &str) -> bool {
        let host = address.split(':').next().unwrap_or(address);
        host == self.config.denylisted_gateway
    }
}

#[async_trait]
impl GatewayDiscovery for DiscoveryChain {
    async fn discover_gateways(&self) -> Result<Vec<String>, DiscoveryError> {
        self.discover().await
    }
}

/// Fixed Gateway list, for callers that manage their own node set
pub struct StaticGateways(pub Vec<String>);

#[async_trait]
impl GatewayDiscovery for StaticGateways {
    async fn discover_gateways(&self) -> Result<Vec<String>, DiscoveryError> {
        if self.0.is_empty() {
            return Err(DiscoveryError::GatewayListUnavailable {
                found: 0,
                required: 1,
            });
        }
        Ok(self.0.clone())
    }
}

/// Interpret a response body as a list of node addresses
fn address_list(body: Value) -> Result<Vec<String>, FetchError> {
    let Value::Array(items) = body else {
        return Err(FetchError::InvalidResponse(
            "expected an array of addresses".into(),
        ));
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .collect())
}
