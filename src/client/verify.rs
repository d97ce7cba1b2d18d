//! Proof verification against a single Gateway's view of the network

use super::ChainpointClient;
use crate::error::{ClientError, ClientResult};
use crate::network::RequestSpec;
use crate::proof::{position_id, AnchorAssertion, VerificationResult};
use crate::validate::is_valid_gateway_uri;
use reqwest::Url;
use serde_json::Value;
use std::collections::HashMap;

impl ChainpointClient {
    /// Verify proofs using one Gateway for every anchor lookup
    ///
    /// `uri` defaults to the configured verification Gateway. Fails when the
    /// Gateway returns no value for any referenced position.
    pub async fn verify_proofs(
        &self,
        proofs: &[Value],
        uri: Option<&str>,
    ) -> ClientResult<Vec<VerificationResult>> {
        let assertions = self.evaluator.evaluate(proofs)?;
        let gateway = self.verification_gateway(uri)?;

        let mut unique: Vec<AnchorAssertion> = Vec::with_capacity(assertions.len());
        for mut assertion in assertions {
            assertion.uri = rebase_uri(&gateway, &assertion.uri)?;
            if !unique.contains(&assertion) {
                unique.push(assertion);
            }
        }

        let mut anchor_uris: Vec<&str> = Vec::new();
        for assertion in &unique {
            if !anchor_uris.contains(&assertion.uri.as_str()) {
                anchor_uris.push(assertion.uri.as_str());
            }
        }

        let timeout = self.config.request_timeout();
        let requests: Vec<RequestSpec> = anchor_uris
            .iter()
            .map(|uri| RequestSpec::get(*uri, timeout))
            .collect();

        tracing::debug!(
            gateway = %gateway,
            assertions = unique.len(),
            positions = requests.len(),
            "Fetching anchor values"
        );

        let results = self.dispatcher.dispatch(requests).await;

        // position id -> value published by the network
        let mut hashes_found: HashMap<String, String> = HashMap::new();
        for (anchor_uri, result) in anchor_uris.iter().zip(results) {
            let body = match result.outcome {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        uri = %anchor_uri,
                        error = %e,
                        "Client error in verify response, skipping"
                    );
                    continue;
                }
            };

            match (position_id(anchor_uri), anchor_value(&body)) {
                (Some(position), Some(value)) => {
                    hashes_found.insert(position.to_string(), value);
                }
                (None, _) => {
                    tracing::warn!(uri = %anchor_uri, "Anchor URI has no position segment");
                }
                (_, None) => {
                    tracing::debug!(uri = %anchor_uri, "No anchor value available yet");
                }
            }
        }

        if hashes_found.is_empty() {
            tracing::error!(gateway = %gateway, "No anchor values found for any position");
            return Err(ClientError::NoHashesFound);
        }

        let results: Vec<VerificationResult> = unique
            .into_iter()
            .map(|assertion| {
                let verified = assertion
                    .position_id()
                    .and_then(|position| hashes_found.get(position))
                    .is_some_and(|actual| *actual == assertion.expected_value);
                let verified_at = verified.then(verified_timestamp);
                VerificationResult {
                    assertion,
                    verified,
                    verified_at,
                }
            })
            .collect();

        tracing::info!(
            gateway = %gateway,
            verified = results.iter().filter(|r| r.verified).count(),
            total = results.len(),
            "Proofs verified"
        );
        Ok(results)
    }

    fn verification_gateway(&self, uri: Option<&str>) -> ClientResult<String> {
        match uri.map(str::trim).filter(|u| !u.is_empty()) {
            None => Ok(self.config.default_verify_gateway.clone()),
            Some(uri) if is_valid_gateway_uri(uri) => Ok(uri.trim_end_matches('/').to_string()),
            Some(uri) => Err(ClientError::InvalidArgument(format!(
                "uri arg contains invalid Gateway URI : {uri}"
            ))),
        }
    }
}

/// Point an anchor URI at `gateway`, keeping its path and query
fn rebase_uri(gateway: &str, uri: &str) -> ClientResult<String> {
    let parsed = Url::parse(uri)
        .map_err(|e| ClientError::Evaluation(format!("invalid anchor URI {uri}: {e}")))?;

    let mut rebased = format!("{}{}", gateway.trim_end_matches('/'), parsed.path());
    if let Some(query) = parsed.query() {
        rebased.push('?');
        rebased.push_str(query);
    }
    Ok(rebased)
}

/// Extract the anchored value from a position response
///
/// The value is a non-empty JSON string, or the single string of a
/// one-element array. It is returned exactly as published, untrimmed.
/// Anything else carries nothing to compare against.
pub fn anchor_value(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => match items.as_slice() {
            [Value::String(s)] if !s.is_empty() => Some(s.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Current UTC time truncated to whole seconds
fn verified_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
