//! Hash submission

use super::ChainpointClient;
use crate::error::{ClientError, ClientResult};
use crate::network::RequestSpec;
use crate::proof::{ProofHandle, SubmitResponse};
use crate::validate::{is_valid_proof_id, validate_hashes_arg, validate_uris_arg};
use serde_json::json;

impl ChainpointClient {
    /// Submit hashes to Gateways, returning one handle per hash per accepting Gateway
    ///
    /// With no `uris`, Gateways are discovered; if discovery fails the
    /// configured fallback Gateways are used instead. Fails only when no
    /// Gateway accepted the submission.
    pub async fn submit_hashes(
        &self,
        hashes: &[String],
        uris: &[String],
    ) -> ClientResult<Vec<ProofHandle>> {
        validate_hashes_arg(hashes)?;
        let uris = validate_uris_arg(uris)?;

        let gateways = if uris.is_empty() {
            self.resolve_gateways().await
        } else {
            uris
        };

        let timeout = self.config.request_timeout();
        let body = json!({ "hashes": hashes });
        let requests: Vec<RequestSpec> = gateways
            .iter()
            .map(|gateway| {
                let uri = format!("{}/hashes", gateway.trim_end_matches('/'));
                RequestSpec::post_json(uri, body.clone(), timeout)
            })
            .collect();

        tracing::debug!(
            hashes = hashes.len(),
            gateways = requests.len(),
            "Submitting hashes"
        );

        let results = self.dispatcher.dispatch(requests).await;

        let mut responses = Vec::with_capacity(results.len());
        for result in results {
            let body = match result.outcome {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        gateway = %result.origin_uri,
                        error = %e,
                        "Client error submitting hashes, skipping Gateway"
                    );
                    continue;
                }
            };

            match serde_json::from_value::<SubmitResponse>(body) {
                Ok(mut response) => {
                    response.meta.submitted_to = Some(result.origin_uri);
                    responses.push(response);
                }
                Err(e) => {
                    tracing::warn!(
                        gateway = %result.origin_uri,
                        error = %e,
                        "Unexpected submit response shape, skipping Gateway"
                    );
                }
            }
        }

        let handles = map_submit_responses_to_handles(&responses);
        if handles.is_empty() {
            tracing::error!(gateways = gateways.len(), "No Gateway accepted the submission");
            return Err(ClientError::NoGatewayAccepted);
        }

        tracing::info!(
            handles = handles.len(),
            gateways = responses.len(),
            "Hashes submitted"
        );
        Ok(handles)
    }

    /// Discovered Gateways, or the static fallback list when discovery fails
    async fn resolve_gateways(&self) -> Vec<String> {
        match self.discovery.discover_gateways().await {
            Ok(gateways) if !gateways.is_empty() => gateways,
            Ok(_) => {
                tracing::warn!("Discovery returned no Gateways, falling back to defaults");
                self.config.fallback_gateways.clone()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Getting Gateway URIs from network failed, falling back to defaults"
                );
                self.config.fallback_gateways.clone()
            }
        }
    }
}

/// Map stamped submit responses to proof handles
///
/// Responses without `meta.submitted_to` are skipped, as are entries whose
/// `proof_id` is neither a UUIDv1 nor a ULID. Every Gateway receives the same
/// hash list, so handles sharing a position in that list share one
/// `group_id`, including repeated hashes at different positions.
pub fn map_submit_responses_to_handles(responses: &[SubmitResponse]) -> Vec<ProofHandle> {
    let node_id: [u8; 6] = rand::random();
    let mut group_ids: Vec<String> = Vec::new();
    let mut handles = Vec::new();

    for response in responses {
        let Some(gateway) = response.meta.submitted_to.as_deref() else {
            continue;
        };

        for (position, entry) in response.hashes.iter().enumerate() {
            if !is_valid_proof_id(&entry.proof_id) {
                tracing::warn!(
                    gateway = %gateway,
                    proof_id = %entry.proof_id,
                    "Gateway returned an invalid proof id, dropping handle"
                );
                continue;
            }

            while group_ids.len() <= position {
                group_ids.push(uuid::Uuid::now_v1(&node_id).to_string());
            }
            let group_id = group_ids[position].clone();

            handles.push(ProofHandle {
                uri: gateway.to_string(),
                hash: entry.hash.clone(),
                proof_id: entry.proof_id.clone(),
                group_id,
            });
        }
    }
    handles
}
