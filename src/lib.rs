//! chainpoint-client library: submit hashes to Gateways, retrieve proofs and
//! verify them against the network

pub mod client;
pub mod config;
pub mod error;
pub mod network;
pub mod proof;
pub mod validate;

// Re-exports
pub use client::{anchor_value, map_submit_responses_to_handles, ChainpointClient};
pub use config::NetworkConfig;
pub use error::{ClientError, ClientResult, DiscoveryError, FetchError};
pub use network::{EndpointDispatcher, GatewayDiscovery, StaticGateways};
pub use proof::{
    AnchorAssertion, JsonAssertionEvaluator, Proof, ProofEvaluator, ProofHandle, SubmitResponse,
    VerificationResult,
};
