//! Proof retrieval

use super::ChainpointClient;
use crate::error::{ClientError, ClientResult};
use crate::network::RequestSpec;
use crate::proof::{Proof, ProofHandle, WireProof};
use crate::validate::{is_valid_proof_id, is_valid_uri, validate_array_arg};
use serde_json::Value;
use std::collections::BTreeMap;

impl ChainpointClient {
    /// Retrieve proofs for handles produced by [`ChainpointClient::submit_hashes`]
    ///
    /// Issues one request per distinct Gateway carrying all of that Gateway's
    /// proof ids. Gateways that fail are skipped; the call fails only when
    /// every Gateway failed.
    pub async fn get_proofs(&self, handles: &[ProofHandle]) -> ClientResult<Vec<Proof>> {
        validate_array_arg(handles.len(), "proofHandles")?;

        let bad_uris: Vec<&str> = handles
            .iter()
            .filter(|h| !is_valid_uri(&h.uri))
            .map(|h| h.uri.as_str())
            .collect();
        if !bad_uris.is_empty() {
            return Err(ClientError::InvalidArgument(format!(
                "some proof handles contain invalid URI values : {}",
                bad_uris.join(", ")
            )));
        }

        let bad_ids: Vec<&str> = handles
            .iter()
            .filter(|h| !is_valid_proof_id(&h.proof_id))
            .map(|h| h.proof_id.as_str())
            .collect();
        if !bad_ids.is_empty() {
            return Err(ClientError::InvalidArgument(format!(
                "some proof handles contain invalid proofId values : {}",
                bad_ids.join(", ")
            )));
        }

        let mut ids_by_gateway: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for handle in handles {
            ids_by_gateway
                .entry(handle.uri.trim_end_matches('/'))
                .or_default()
                .push(handle.proof_id.as_str());
        }

        let timeout = self.config.request_timeout();
        let requests: Vec<RequestSpec> = ids_by_gateway
            .iter()
            .map(|(gateway, ids)| {
                RequestSpec::get(format!("{gateway}/proofs"), timeout)
                    .header("proofids", ids.join(","))
            })
            .collect();
        let gateway_count = requests.len();

        let results = self.dispatcher.dispatch(requests).await;

        let mut answered = 0;
        let mut proofs = Vec::new();
        for result in results {
            match result.outcome {
                Ok(Value::Array(items)) => {
                    answered += 1;
                    for item in items {
                        match serde_json::from_value::<WireProof>(item) {
                            Ok(wire) => proofs.push(Proof::from(wire)),
                            Err(e) => tracing::warn!(
                                gateway = %result.origin_uri,
                                error = %e,
                                "Skipping malformed proof"
                            ),
                        }
                    }
                }
                Ok(_) => {
                    tracing::warn!(
                        gateway = %result.origin_uri,
                        "Gateway returned a non-array proofs response, skipping"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        gateway = %result.origin_uri,
                        error = %e,
                        "Client error getting proofs, skipping Gateway"
                    );
                }
            }
        }

        if answered == 0 {
            tracing::error!(gateways = gateway_count, "No Gateway returned proofs");
            return Err(ClientError::AllGatewaysFailed {
                operation: "get proofs",
                count: gateway_count,
            });
        }

        tracing::info!(proofs = proofs.len(), gateways = answered, "Proofs retrieved");
        Ok(proofs)
    }
}
