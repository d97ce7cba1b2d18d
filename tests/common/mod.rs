//! Common test utilities and fixtures
//!
//! Mock Gateways are `mockito` servers bound to 127.0.0.1, which are valid
//! IPv4 node URIs.

#![allow(dead_code)]

use std::sync::Arc;

use chainpoint_client::{
    ChainpointClient, EndpointDispatcher, JsonAssertionEvaluator, NetworkConfig, StaticGateways,
};
use mockito::{Mock, ServerGuard};
use serde_json::{json, Value};

/// Endpoint that refuses connections
pub const DEAD_GATEWAY: &str = "http://127.0.0.1:1";

pub const HASH_A: &str = "1957db7fe23e4be1740ddeb941ddda7ae0a6b782e536a9e00b5aa82db1e84547";
pub const HASH_B: &str = "a0b1c2d3e4f5";

/// UUIDv1 proof ids, one per (Gateway, hash) pair
pub const PROOF_IDS: [[&str; 2]; 3] = [
    [
        "5e0433d0-46da-11ea-a79e-017f19452571",
        "5e0433d1-46da-11ea-a79e-017f19452571",
    ],
    [
        "6f1544e0-46da-11ea-b89f-028a2a563682",
        "6f1544e1-46da-11ea-b89f-028a2a563682",
    ],
    [
        "01E0J2Y5N3K9G8X7W6V5T4S3R2",
        "01E0J2Y5N3K9G8X7W6V5T4S3R3",
    ],
];

pub fn test_config() -> NetworkConfig {
    NetworkConfig {
        request_timeout_ms: 2_000,
        discovery_timeout_ms: 2_000,
        ..NetworkConfig::default()
    }
}

/// Client whose discovery always yields `gateways`
pub fn client_with_gateways(gateways: Vec<String>) -> ChainpointClient {
    ChainpointClient::with_parts(
        test_config(),
        EndpointDispatcher::new().unwrap(),
        Arc::new(StaticGateways(gateways)),
        Arc::new(JsonAssertionEvaluator),
    )
    .unwrap()
}

/// Body of a successful `POST /hashes`
pub fn submit_body(entries: &[(&str, &str)]) -> Value {
    let hashes: Vec<Value> = entries
        .iter()
        .map(|(hash, proof_id)| {
            json!({ "hash_id_node": proof_id, "proof_id": proof_id, "hash": hash })
        })
        .collect();
    json!({
        "meta": {
            "submitted_at": "2020-02-04T19:51:48Z",
            "processing_hints": { "cal": "2020-02-04T19:52:48Z" }
        },
        "hashes": hashes
    })
}

/// Register a Gateway accepting `hashes` with the given proof ids
pub async fn mock_submit(server: &mut ServerGuard, hashes: &[&str], ids: &[&str]) -> Mock {
    let entries: Vec<(&str, &str)> = hashes.iter().copied().zip(ids.iter().copied()).collect();
    server
        .mock("POST", "/hashes")
        .match_body(mockito::Matcher::Json(json!({ "hashes": hashes })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(submit_body(&entries).to_string())
        .expect(1)
        .create_async()
        .await
}

/// Register a Gateway serving proofs for `ids`
pub async fn mock_proofs(server: &mut ServerGuard, ids: &[&str]) -> Mock {
    let proofs: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "proof_id": id, "proof": "eJyNUT1v", "anchors_complete": ["cal"] }))
        .collect();
    server
        .mock("GET", "/proofs")
        .match_header("proofids", ids.join(",").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(Value::Array(proofs).to_string())
        .expect(1)
        .create_async()
        .await
}

/// Anchor assertion as produced by an evaluator
pub fn assertion(hash: &str, proof_id: &str, position: &str, expected: &str) -> Value {
    json!({
        "hash": hash,
        "proof_id": proof_id,
        "hash_received": "2020-02-04T19:51:48Z",
        "branch": "cal_anchor_branch",
        "uri": format!("http://18.220.31.138/calendar/{position}/data"),
        "type": "cal",
        "anchor_id": position,
        "expected_value": expected
    })
}
