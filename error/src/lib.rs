//! Failure kinds shared across the verifier stack.
//!
//! Every fallible operation in this workspace returns [`VerifierResult`].
//! Verification is a pure function to accept/reject: on the first failure,
//! callers should stop immediately and surface the [`VerifierError`] as-is,
//! never retry or partially accept.

#![forbid(unsafe_code)]

use thiserror::Error;

/// All ways a verification can fail. Each variant is fatal; there is no
/// recoverable failure mode in this protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// Fewer scalars remained in the transcript than a read required.
    #[error("transcript exhausted: requested {requested}, only {remaining} scalars remain")]
    TranscriptExhausted { requested: usize, remaining: usize },

    /// A transcript scalar was not a canonical representative (`>= P`).
    #[error("non-canonical field element in transcript: {value} >= P")]
    FieldDecode { value: u64 },

    /// A computed Merkle root did not match the expected root.
    #[error("merkle authentication path does not reach the expected root")]
    MerkleMismatch,

    /// A grinding nonce failed to produce the required run of zero low bits.
    #[error("proof-of-work grinding check failed for {bits} bits")]
    PowInvalid { bits: usize },

    /// A sumcheck round polynomial failed `p(0) + p(1) == target`.
    #[error("sumcheck consistency check failed at round {round}")]
    SumcheckMismatch { round: usize },

    /// The overall AIR zerocheck claim was not zero.
    #[error("zerocheck claimed sum is not zero")]
    ZerocheckNonZero,

    /// The combined constraint evaluation did not match the zerocheck value.
    #[error("combined constraint evaluation does not match the zerocheck delayed value")]
    ConstraintMismatch,

    /// The secondary ("inner") sumcheck closing identity failed.
    #[error("inner sumcheck closing identity failed")]
    InnerMismatch,

    /// A WHIR folding round failed its sumcheck consistency check.
    #[error("WHIR folding sumcheck failed at round {round}, step {step}")]
    WhirSumcheck { round: usize, step: usize },

    /// The WHIR final constant-polynomial identity failed.
    #[error("WHIR final consistency check failed")]
    WhirFinal,

    /// A structural mismatch between parameters and the statement/claim.
    #[error("parameter inconsistency: {0}")]
    ParamInconsistency(&'static str),
}

/// Convenience alias used throughout the workspace.
pub type VerifierResult<T> = Result<T, VerifierError>;
