//! Proof data model

use crate::proof::normalize::camel_case_keys;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference to a proof held by a specific Gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofHandle {
    /// Gateway URI the hash was submitted to
    pub uri: String,

    /// Submitted hash (hex)
    pub hash: String,

    /// Proof identifier issued by the Gateway (UUIDv1 or ULID)
    pub proof_id: String,

    /// Shared by every handle produced for the same hash in one submission
    pub group_id: String,
}

/// Response body of `POST /hashes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub meta: SubmitMeta,
    pub hashes: Vec<SubmittedHash>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_hints: Option<Value>,

    /// Gateway URI as reached by this client, stamped after the response
    /// arrives since a Gateway cannot report its own external address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_to: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedHash {
    pub proof_id: String,
    pub hash: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One proof as returned by `GET /proofs`
#[derive(Debug, Clone, Deserialize)]
pub struct WireProof {
    pub proof_id: String,

    #[serde(default)]
    pub proof: Option<Value>,

    #[serde(default)]
    pub anchors_complete: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A retrieved proof with normalized field names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub proof_id: String,

    /// Encoded proof, `None` while the Gateway has not produced it yet
    #[serde(default)]
    pub proof: Option<Value>,

    #[serde(default)]
    pub anchors_complete: Vec<String>,

    /// Unrecognized fields, keys already camelCased
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<WireProof> for Proof {
    fn from(wire: WireProof) -> Self {
        Self {
            proof_id: wire.proof_id,
            proof: wire.proof,
            anchors_complete: wire.anchors_complete.unwrap_or_default(),
            extra: camel_case_keys(wire.extra),
        }
    }
}

/// A claim that `expected_value` was anchored at the position named by `uri`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorAssertion {
    #[serde(default)]
    pub hash: Option<String>,

    #[serde(default)]
    pub proof_id: Option<String>,

    #[serde(default)]
    pub hash_received: Option<String>,

    #[serde(default)]
    pub branch: Option<String>,

    /// Position endpoint; the second-to-last path segment identifies the position
    pub uri: String,

    #[serde(rename = "type", default)]
    pub anchor_type: Option<String>,

    #[serde(default)]
    pub anchor_id: Option<String>,

    pub expected_value: String,

    /// Evaluator fields not listed above, passed through to the result
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnchorAssertion {
    /// Position identifier carried by `uri`
    pub fn position_id(&self) -> Option<&str> {
        position_id(&self.uri)
    }
}

/// Second-to-last `/`-separated segment of a URI
pub(crate) fn position_id(uri: &str) -> Option<&str> {
    let segments: Vec<&str> = uri.split('/').collect();
    segments
        .len()
        .checked_sub(2)
        .map(|i| segments[i])
        .filter(|s| !s.is_empty())
}

/// Verdict for one anchor assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    #[serde(flatten)]
    pub assertion: AnchorAssertion,

    pub verified: bool,

    /// UTC, truncated to seconds; set only when verified
    pub verified_at: Option<String>,
}
