//! Outbound networking: request fan-out and node discovery

pub mod discovery;
pub mod dispatcher;
pub mod strategy;

pub use discovery::{DiscoveryChain, GatewayDiscovery, StaticGateways};
pub use dispatcher::{origin_of, EndpointDispatcher, FetchResult, RequestSpec};
pub use strategy::RetryPolicy;
