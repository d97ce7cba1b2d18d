//! Client error types

use thiserror::Error;

/// Failure of a single dispatched request
///
/// Carried inside a `FetchResult`; never aborts sibling requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded its timeout
    #[error("timeout after {0} ms")]
    Timeout(u64),

    /// Endpoint answered with a non-2xx status
    #[error("endpoint returned status {status}: {reason}")]
    Status { status: u16, reason: String },

    /// Body could not be read or did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Request could not be built (bad URI, bad header)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// Map a reqwest error, reporting timeouts with the configured budget
    pub fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(timeout_ms)
        } else if e.is_connect() {
            FetchError::Network(format!("connection failed: {}", e))
        } else if e.is_builder() {
            FetchError::InvalidRequest(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Discovery exhaustion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// No Core seeds configured
    #[error("no Core seed addresses configured")]
    NoCoreSeeds,

    /// Every seed Core failed to answer the peers request
    #[error("Unable to retrieve peer list")]
    PeerListUnavailable,

    /// Candidate Cores exhausted before enough Gateways were collected
    #[error("Unable to retrieve Gateway list: found {found} of {required} required")]
    GatewayListUnavailable { found: usize, required: usize },
}

/// Main client error type
#[derive(Debug, Error)]
pub enum ClientError {
    // ========== Validation Errors ==========
    /// Malformed or oversized input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // ========== Discovery Errors ==========
    /// Discovery chain exhausted
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    // ========== Aggregate Errors ==========
    /// No Gateway accepted the submitted hashes
    #[error("no Gateway accepted the submission")]
    NoGatewayAccepted,

    /// Every targeted Gateway failed
    #[error("all {count} Gateways failed to {operation}")]
    AllGatewaysFailed {
        operation: &'static str,
        count: usize,
    },

    /// No anchor position returned a value to verify against
    #[error("No hashes were found.")]
    NoHashesFound,

    // ========== Collaborator Errors ==========
    /// Proof evaluator rejected the input
    #[error("proof evaluation failed: {0}")]
    Evaluation(String),

    /// HTTP client could not be constructed
    #[error("http client error: {0}")]
    Http(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Check if error is recoverable (caller can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClientError::Discovery(_)
                | ClientError::NoGatewayAccepted
                | ClientError::AllGatewaysFailed { .. }
                | ClientError::NoHashesFound
        )
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::InvalidArgument(e.to_string())
    }
}
