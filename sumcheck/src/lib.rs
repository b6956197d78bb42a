//! The sumcheck sub-protocol, plain and with an optional univariate-skip
//! prefix.
//!
//! Both variants read round polynomials from the transcript, check the
//! running `p(0) + p(1) == target` consistency, and squeeze one challenge
//! per round. The skip variant collapses the first `skips` rounds into a
//! single higher-degree round, which is how the driving PIOP keeps the
//! round count proportional to `log_n_rows` instead of paying a full round
//! per skipped variable.

#![forbid(unsafe_code)]

use sv_challenger::Transcript;
use sv_error::{VerifierError, VerifierResult};
use sv_field::Ef;
use sv_poly::{Evaluation, UnivariatePoly};
use sv_symmetric::Permutation;

/// Run the plain sumcheck verifier over `n_vars` variables with per-round
/// polynomials of degree `<= degree_bound`.
///
/// Returns the round-0 claimed sum (which the caller checks against its own
/// expectation) and the delayed evaluation claim at the squeezed point.
#[tracing::instrument(skip(transcript), fields(n_vars, degree_bound))]
pub fn sumcheck_verify<Perm: Permutation>(
    transcript: &mut Transcript<Perm>,
    degree_bound: usize,
    n_vars: usize,
) -> VerifierResult<(Ef, Evaluation)> {
    let mut challenges = Vec::with_capacity(n_vars);
    let mut claimed_sum = Ef::ZERO;
    let mut target = Ef::ZERO;

    for i in 0..n_vars {
        let poly = UnivariatePoly::new(transcript.receive_ext(degree_bound + 1)?);
        let round_sum = poly.evaluate(Ef::ZERO) + poly.evaluate(Ef::ONE);
        if i == 0 {
            claimed_sum = round_sum;
        } else if round_sum != target {
            tracing::warn!(round = i, "sumcheck round consistency check failed");
            return Err(VerifierError::SumcheckMismatch { round: i });
        }
        let challenge = transcript.challenge_ext();
        target = poly.evaluate(challenge);
        challenges.push(challenge);
    }

    Ok((claimed_sum, Evaluation::new(challenges, target)))
}

/// Run the sumcheck verifier with the first `skips` variables collapsed
/// into a single round of degree `<= degree_bound * 2^skips`, followed by
/// `n_vars - skips` ordinary rounds of degree `<= degree_bound`.
#[tracing::instrument(skip(transcript), fields(n_vars, degree_bound, skips))]
pub fn sumcheck_verify_with_univariate_skip<Perm: Permutation>(
    transcript: &mut Transcript<Perm>,
    degree_bound: usize,
    n_vars: usize,
    skips: usize,
) -> VerifierResult<(Ef, Evaluation)> {
    let fan_out = 1usize << skips;
    let skip_degree = degree_bound * fan_out;

    let poly = UnivariatePoly::new(transcript.receive_ext(skip_degree)?);
    let claimed_sum = (0..fan_out).fold(Ef::ZERO, |acc, j| {
        acc + poly.evaluate(Ef::from_base(sv_field::Fp::new(j as u64)))
    });

    let mut challenges = Vec::with_capacity(n_vars);
    let challenge = transcript.challenge_ext();
    challenges.push(challenge);
    let mut target = poly.evaluate(challenge);

    for round in 0..(n_vars - skips) {
        let poly = UnivariatePoly::new(transcript.receive_ext(degree_bound + 1)?);
        let round_sum = poly.evaluate(Ef::ZERO) + poly.evaluate(Ef::ONE);
        if round_sum != target {
            tracing::warn!(round = round + 1, "sumcheck round consistency check failed");
            return Err(VerifierError::SumcheckMismatch { round: round + 1 });
        }
        let challenge = transcript.challenge_ext();
        target = poly.evaluate(challenge);
        challenges.push(challenge);
    }

    Ok((claimed_sum, Evaluation::new(challenges, target)))
}
