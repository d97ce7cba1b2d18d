//! Public client: submit hashes, retrieve proofs, verify proofs
//!
//! A `ChainpointClient` owns its configuration and collaborators. It holds no
//! per-call state, so one instance can serve concurrent calls.

mod retrieve;
mod submit;
mod verify;

use crate::config::NetworkConfig;
use crate::error::{ClientError, ClientResult};
use crate::network::{DiscoveryChain, EndpointDispatcher, GatewayDiscovery};
use crate::proof::{JsonAssertionEvaluator, ProofEvaluator};
use std::sync::Arc;

pub use submit::map_submit_responses_to_handles;
pub use verify::anchor_value;

/// Client for the anchoring network
pub struct ChainpointClient {
    config: NetworkConfig,
    dispatcher: EndpointDispatcher,
    discovery: Arc<dyn GatewayDiscovery>,
    evaluator: Arc<dyn ProofEvaluator>,
}

impl ChainpointClient {
    /// Create a client with network discovery and the JSON assertion evaluator
    pub fn new(config: NetworkConfig) -> ClientResult<Self> {
        let dispatcher = EndpointDispatcher::new().map_err(|e| ClientError::Http(e.to_string()))?;
        let discovery = Arc::new(DiscoveryChain::new(config.clone(), dispatcher.clone()));
        Self::with_parts(config, dispatcher, discovery, Arc::new(JsonAssertionEvaluator))
    }

    /// Create a client from explicit collaborators
    pub fn with_parts(
        config: NetworkConfig,
        dispatcher: EndpointDispatcher,
        discovery: Arc<dyn GatewayDiscovery>,
        evaluator: Arc<dyn ProofEvaluator>,
    ) -> ClientResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dispatcher,
            discovery,
            evaluator,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Discover Gateways without falling back to the static list
    pub async fn discover_gateways(&self) -> ClientResult<Vec<String>> {
        Ok(self.discovery.discover_gateways().await?)
    }

    /// Probe each Gateway's `/config` endpoint with the short probe timeout
    pub async fn probe_gateways(&self, gateways: &[String]) -> Vec<(String, bool)> {
        let timeout = self.config.probe_timeout();
        let probes = gateways.iter().map(|gateway| async move {
            let uri = format!("{}/config", gateway.trim_end_matches('/'));
            (gateway.clone(), self.dispatcher.probe(&uri, timeout).await)
        });
        futures::future::join_all(probes).await
    }
}
