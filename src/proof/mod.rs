//! Proof handles, proofs and verification records
//!
//! Wire records mirror the Gateway's snake_case JSON and are converted into
//! the camelCase public types at the boundary.

mod evaluator;
mod normalize;
mod types;

pub use evaluator::{JsonAssertionEvaluator, ProofEvaluator};
pub use normalize::{camel_case, camel_case_keys};
pub(crate) use types::position_id;
pub use types::{
    AnchorAssertion, Proof, ProofHandle, SubmitMeta, SubmitResponse, SubmittedHash,
    VerificationResult, WireProof,
};
