//! Proof evaluation seam
//!
//! Decoding the proof format itself lives outside this crate. Verification
//! only needs the flat list of anchor assertions a proof makes.

use crate::error::{ClientError, ClientResult};
use crate::proof::normalize::camel_case_keys;
use crate::proof::types::AnchorAssertion;
use serde_json::Value;

/// Expands proofs into anchor assertions
pub trait ProofEvaluator: Send + Sync {
    fn evaluate(&self, proofs: &[Value]) -> ClientResult<Vec<AnchorAssertion>>;
}

/// Evaluator for proofs that were already expanded into assertion records
///
/// Each input is either one assertion object or an array of them. Keys may
/// be snake_case or camelCase.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAssertionEvaluator;

impl ProofEvaluator for JsonAssertionEvaluator {
    fn evaluate(&self, proofs: &[Value]) -> ClientResult<Vec<AnchorAssertion>> {
        if proofs.is_empty() {
            return Err(ClientError::InvalidArgument(
                "proofs arg must be a non-empty Array".into(),
            ));
        }

        let mut assertions = Vec::new();
        for (index, proof) in proofs.iter().enumerate() {
            match proof {
                Value::Array(items) => {
                    for item in items {
                        assertions.push(parse_assertion(index, item)?);
                    }
                }
                Value::Object(_) => assertions.push(parse_assertion(index, proof)?),
                _ => {
                    return Err(ClientError::Evaluation(format!(
                        "proof {index} is not an assertion object or array"
                    )))
                }
            }
        }
        Ok(assertions)
    }
}

fn parse_assertion(index: usize, value: &Value) -> ClientResult<AnchorAssertion> {
    let Value::Object(map) = value else {
        return Err(ClientError::Evaluation(format!(
            "proof {index} contains a non-object assertion"
        )));
    };

    serde_json::from_value(Value::Object(camel_case_keys(map.clone())))
        .map_err(|e| ClientError::Evaluation(format!("proof {index}: {e}")))
}
