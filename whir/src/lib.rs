//! The WHIR polynomial-commitment verifier: iterated round-folding over a
//! Reed-Solomon proximity gap, out-of-domain sampling, Merkle-authenticated
//! shift queries, and a final constant-polynomial consistency check.

#![forbid(unsafe_code)]

use sv_challenger::Transcript;
use sv_error::{VerifierError, VerifierResult};
use sv_field::{Ef, Fp};
use sv_merkle_tree::verify_merkle_path;
use sv_poly::{eq_tensor, multilinear_from_univariate, Evaluation, MultilinearCoeffs, UnivariatePoly};
use sv_symmetric::{Digest, Permutation, DIGEST_LEN};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundParams {
    /// Number of variables of the polynomial entering this round, before folding.
    pub n_variables: usize,
    /// log2 of the evaluation domain size, before folding.
    pub domain_size: usize,
    pub folding_factor: usize,
    /// Out-of-domain samples taken on the folded polynomial.
    pub ood_samples: usize,
    /// Shift queries made against the pre-fold codeword.
    pub num_queries: usize,
    pub combination_pow_bits: u32,
    pub folding_pow_bits: u32,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhirParams {
    pub initial_ood_samples: usize,
    pub rounds: Vec<RoundParams>,
    /// Parameters for a trailing direct-send-the-polynomial round. Unused
    /// by [`whir_verify`]: this verifier always folds the committed
    /// polynomial down to a single constant, the simpler of the two
    /// strategies the protocol supports (see module docs).
    pub final_queries: usize,
    pub final_sumcheck_rounds: usize,
    pub final_combination_pow_bits: u32,
    pub final_folding_pow_bits: u32,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommitment {
    pub merkle_root: Digest,
    pub ood_points: Vec<Vec<Ef>>,
    pub ood_answers: Vec<Ef>,
}

/// Parse a WHIR commitment off the front of the transcript: a digest root,
/// then `initial_ood_samples` out-of-domain `(point, answer)` pairs.
pub fn whir_parse_commitment<Perm: Permutation>(
    params: &WhirParams,
    transcript: &mut Transcript<Perm>,
) -> VerifierResult<ParsedCommitment> {
    let first_round = params
        .rounds
        .first()
        .ok_or(VerifierError::ParamInconsistency("WHIR params must have at least one round"))?;

    let root_raw = transcript.receive_base(DIGEST_LEN)?;
    let merkle_root: Digest = root_raw
        .try_into()
        .map_err(|_| VerifierError::ParamInconsistency("merkle root must be DIGEST_LEN scalars"))?;

    let mut ood_points = Vec::with_capacity(params.initial_ood_samples);
    for _ in 0..params.initial_ood_samples {
        let z = transcript.challenge_ext();
        ood_points.push(multilinear_from_univariate(z, first_round.n_variables));
    }
    let ood_answers = transcript.receive_ext(params.initial_ood_samples)?;

    Ok(ParsedCommitment {
        merkle_root,
        ood_points,
        ood_answers,
    })
}

/// Verify a WHIR opening of `claim` against `commitment`.
#[tracing::instrument(skip(params, transcript, perm, commitment, claim), fields(n_rounds = params.rounds.len()))]
pub fn whir_verify<Perm: Permutation>(
    params: &WhirParams,
    transcript: &mut Transcript<Perm>,
    perm: &Perm,
    commitment: &ParsedCommitment,
    claim: &Evaluation,
) -> VerifierResult<()> {
    let first_round = params
        .rounds
        .first()
        .ok_or(VerifierError::ParamInconsistency("WHIR params must have at least one round"))?;
    if claim.point.len() != first_round.n_variables {
        return Err(VerifierError::ParamInconsistency(
            "claim width does not match the first round's n_variables",
        ));
    }

    let mut evaluation_points: Vec<Vec<Vec<Ef>>> = vec![{
        let mut pts = commitment.ood_points.clone();
        pts.push(claim.point.clone());
        pts
    }];
    let mut expected_evals: Vec<Ef> = {
        let mut v = commitment.ood_answers.clone();
        v.push(claim.value);
        v
    };
    let mut merkle_root = commitment.merkle_root;
    let mut all_folding_randomness: Vec<Ef> = Vec::new();
    let mut combination_randomness_per_round: Vec<Ef> = Vec::with_capacity(params.rounds.len());

    for (round_idx, round) in params.rounds.iter().enumerate() {
        transcript.grind(round.combination_pow_bits)?;
        let gamma = transcript.challenge_ext();

        // Each round opens a fresh sumcheck over this round's freshly
        // claimed evaluations; the previous round's residual target does
        // not carry over.
        let mut expected_sumcheck_target = expected_evals
            .iter()
            .enumerate()
            .fold(Ef::ZERO, |acc, (i, &e)| acc + e * gamma.exp_u64(i as u64));

        let mut folding_randomness = Vec::with_capacity(round.folding_factor);
        for step in 0..round.folding_factor {
            let poly = UnivariatePoly::new(transcript.receive_ext(3)?);
            if poly.evaluate(Ef::ZERO) + poly.evaluate(Ef::ONE) != expected_sumcheck_target {
                tracing::warn!(round = round_idx, step, "WHIR round sumcheck consistency check failed");
                return Err(VerifierError::WhirSumcheck { round: round_idx, step });
            }
            let r = transcript.challenge_ext();
            expected_sumcheck_target = poly.evaluate(r);
            folding_randomness.push(r);
            transcript.grind(round.folding_pow_bits)?;
        }

        let folded_root_raw = transcript.receive_base(DIGEST_LEN)?;
        let folded_merkle_root: Digest = folded_root_raw
            .try_into()
            .map_err(|_| VerifierError::ParamInconsistency("merkle root must be DIGEST_LEN scalars"))?;

        let folded_n_variables = round.n_variables - round.folding_factor;
        let mut ood_points = Vec::with_capacity(round.ood_samples);
        for _ in 0..round.ood_samples {
            let z = transcript.challenge_ext();
            ood_points.push(multilinear_from_univariate(z, folded_n_variables));
        }
        let ood_answers = transcript.receive_ext(round.ood_samples)?;

        let domain_bits = round.domain_size - round.folding_factor;
        let group_gen = Ef::from_base(Fp::two_adic_generator(domain_bits as u32));
        let leaf_len = 1usize << round.folding_factor;

        let mut z_points = Vec::with_capacity(round.num_queries);
        let mut folded_evals = Vec::with_capacity(round.num_queries);
        for _ in 0..round.num_queries {
            let idx = transcript.challenge_bits(domain_bits as u32);
            let z = group_gen.exp_u64(idx as u64);

            let (leaf_fp, leaf_ef): (Vec<Fp>, Vec<Ef>) = if round_idx == 0 {
                let raw = transcript.receive_base(leaf_len)?;
                let ef = raw.iter().map(|&f| Ef::from_base(f)).collect();
                (raw, ef)
            } else {
                let ext = transcript.receive_ext(leaf_len)?;
                let fp = ext.iter().flat_map(|e| e.coeffs().to_vec()).collect();
                (fp, ext)
            };

            let path_raw = transcript.receive_base(domain_bits * DIGEST_LEN)?;
            let auth_path: Vec<Digest> = path_raw
                .chunks_exact(DIGEST_LEN)
                .map(|c| c.try_into().expect("chunks_exact(DIGEST_LEN) yields DIGEST_LEN items"))
                .collect();

            verify_merkle_path(perm, merkle_root, idx, &leaf_fp, &auth_path, domain_bits)?;

            let folded = MultilinearCoeffs::new(leaf_ef).evaluate(&folding_randomness);
            z_points.push(multilinear_from_univariate(z, folded_n_variables));
            folded_evals.push(folded);
        }

        let mut round_points = ood_points;
        round_points.extend(z_points);
        evaluation_points.push(round_points);

        expected_evals = ood_answers;
        expected_evals.extend(folded_evals);
        merkle_root = folded_merkle_root;
        all_folding_randomness.extend(folding_randomness);
        combination_randomness_per_round.push(gamma);
    }

    let final_const = transcript.receive_ext(1)?[0];
    verify_merkle_path(perm, merkle_root, 0, &final_const.coeffs(), &[], 0)?;

    let mut expected_constant = Ef::ZERO;
    for (points, &gamma) in evaluation_points.iter().zip(&combination_randomness_per_round) {
        for (i, point) in points.iter().enumerate() {
            let suffix = &all_folding_randomness[all_folding_randomness.len() - point.len()..];
            expected_constant += eq_tensor(point, suffix) * gamma.exp_u64(i as u64);
        }
    }

    if expected_constant == final_const {
        Ok(())
    } else {
        tracing::warn!("WHIR final constant consistency check failed");
        Err(VerifierError::WhirFinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_symmetric::StubPermutation;

    fn trivial_params() -> WhirParams {
        WhirParams {
            initial_ood_samples: 0,
            rounds: vec![RoundParams {
                n_variables: 0,
                domain_size: 0,
                folding_factor: 0,
                ood_samples: 0,
                num_queries: 0,
                combination_pow_bits: 0,
                folding_pow_bits: 0,
            }],
            final_queries: 0,
            final_sumcheck_rounds: 0,
            final_combination_pow_bits: 0,
            final_folding_pow_bits: 0,
        }
    }

    #[test]
    fn parsing_a_commitment_with_no_ood_samples_just_reads_the_root() {
        let params = trivial_params();
        let mut transcript = Transcript::new(StubPermutation, vec![1, 2]);
        let commitment = whir_parse_commitment(&params, &mut transcript).unwrap();
        assert_eq!(commitment.merkle_root, [Fp::new(1), Fp::new(2)]);
        assert!(commitment.ood_points.is_empty());
        assert!(commitment.ood_answers.is_empty());
    }

    #[test]
    fn a_single_round_with_no_queries_closes_on_the_degenerate_claim() {
        // With zero variables, zero folding, zero queries, and no OOD
        // samples at any stage, every evaluation point in the run is the
        // empty point, so the final identity collapses to
        // `expected_constant = eq_tensor([], []) * gamma^0 = 1`: the
        // claimed constant must equal `Ef::ONE` regardless of `claim.value`
        // (which, with nothing left to fold or query, never gets checked
        // against anything else).
        let params = trivial_params();
        let perm = StubPermutation;
        let claim = Evaluation::new(vec![], Ef::from_base(Fp::new(99)));

        let final_leaf = [Fp::ONE, Fp::ZERO, Fp::ZERO, Fp::ZERO];
        let folded_root = sv_merkle_tree::hash_leaf(&perm, &final_leaf);

        let mut raw = vec![1u64, 2]; // commitment merkle root
        raw.push(0); // combination-pow nonce
        raw.extend(folded_root.iter().map(|f| f.value())); // folded merkle root
        raw.extend([1, 0, 0, 0]); // final constant = Ef::ONE

        let mut transcript = Transcript::new(perm, raw);
        let commitment = whir_parse_commitment(&params, &mut transcript).unwrap();
        let result = whir_verify(&params, &mut transcript, &perm, &commitment, &claim);
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn a_wrong_final_constant_fails_whir_final() {
        let params = trivial_params();
        let perm = StubPermutation;
        let claim = Evaluation::new(vec![], Ef::from_base(Fp::new(99)));

        let final_leaf = [Fp::new(2), Fp::ZERO, Fp::ZERO, Fp::ZERO];
        let folded_root = sv_merkle_tree::hash_leaf(&perm, &final_leaf);

        let mut raw = vec![1u64, 2];
        raw.push(0);
        raw.extend(folded_root.iter().map(|f| f.value()));
        raw.extend([2, 0, 0, 0]); // final constant = 2, should have been 1

        let mut transcript = Transcript::new(perm, raw);
        let commitment = whir_parse_commitment(&params, &mut transcript).unwrap();
        let result = whir_verify(&params, &mut transcript, &perm, &commitment, &claim);
        assert_eq!(result, Err(VerifierError::WhirFinal));
    }
}
