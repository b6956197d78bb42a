//! The AIR statement type (`AirTable`) and the PIOP verifier driver:
//! zerocheck (with an optional univariate-skip prefix) over the combined
//! constraint polynomial, a secondary ("inner") sumcheck closing the
//! witness row-shift claims, and a final discharge of the resulting
//! evaluation claim to WHIR.

#![forbid(unsafe_code)]

use sv_challenger::Transcript;
use sv_circuit::{matrix_down_lde, matrix_up_lde, CircuitNode};
use sv_error::{VerifierError, VerifierResult};
use sv_field::{Ef, Fp};
use sv_poly::{eq_tensor, Evaluation, MultilinearEvals, UnivariatePoly};
use sv_sumcheck::{sumcheck_verify, sumcheck_verify_with_univariate_skip};
use sv_symmetric::Permutation;
use sv_whir::{whir_parse_commitment, whir_verify, WhirParams};

/// Number of sumcheck variables collapsed into the zerocheck's leading
/// univariate round.
pub const UNIVARIATE_SKIPS: usize = 3;

/// A statement: an AIR constraint system over a fixed number of rows and
/// columns, together with the WHIR parameters used to open committed
/// witness polynomials.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct AirTable {
    pub n_columns: usize,
    pub log_n_rows: usize,
    /// Each constraint is a circuit over `2 * n_columns` inputs: the
    /// up-shifted then down-shifted evaluation of every column, in column
    /// order (preprocessed columns first, then witness columns).
    pub constraints: Vec<CircuitNode>,
    pub max_constraint_degree: usize,
    /// Fixed (non-witness) column values, one `2^log_n_rows`-length vector
    /// per column.
    pub preprocessed_columns: Vec<Vec<Fp>>,
    pub whir_params: WhirParams,
    /// The `i`-th polynomial is `1` at `i` and `0` on
    /// `{0, .., 2^UNIVARIATE_SKIPS - 1} \ {i}`; degree `<= 2^UNIVARIATE_SKIPS - 1`.
    pub univariate_selectors: Vec<UnivariatePoly>,
}

impl AirTable {
    pub fn n_witness_columns(&self) -> usize {
        self.n_columns - self.preprocessed_columns.len()
    }

    /// `ceil(log2(n_witness_columns))`.
    pub fn log_n_witness_columns(&self) -> usize {
        let n = self.n_witness_columns();
        n.next_power_of_two().trailing_zeros() as usize
    }
}

/// The "up" row shift: every row keeps its own value except the last, which
/// is redirected to the second-to-last row's value (there is no row above
/// the last one to pull from).
pub fn column_up(col: &[Fp]) -> Vec<Fp> {
    let mut up = col.to_vec();
    let n = up.len();
    up[n - 1] = up[n - 2];
    up
}

/// The "down" row shift: every row takes the value of the row below it;
/// the last row has no row below, so it repeats its own (new) last value.
pub fn column_down(col: &[Fp]) -> Vec<Fp> {
    let mut down = col[1..].to_vec();
    let last = *down
        .last()
        .expect("column must have at least two rows");
    down.push(last);
    down
}

/// Collapse the low `log2(selector_evals.len())` rows of a `2^n`-row
/// column's evaluation table into a `2^(n - skips)`-row table, weighting
/// each low-order row by the matching univariate-skip selector value. This
/// is how a preprocessed column's up/down shift gets evaluated at a
/// zerocheck point whose leading coordinate came from the collapsed
/// univariate-skip round rather than a plain boolean variable.
fn fold_rectangular(col: &[Fp], selector_evals: &[Ef]) -> MultilinearEvals {
    let skip_width = selector_evals.len();
    assert_eq!(
        col.len() % skip_width,
        0,
        "column length must be a multiple of the selector fan-out"
    );
    let out_len = col.len() / skip_width;
    let folded: Vec<Ef> = (0..out_len)
        .map(|c| {
            (0..skip_width).fold(Ef::ZERO, |acc, r| {
                acc + selector_evals[r] * Ef::from_base(col[c * skip_width + r])
            })
        })
        .collect();
    MultilinearEvals::new(folded)
}

fn combined_constraint_eval(constraints: &[CircuitNode], alpha: Ef, point: &[Ef]) -> Ef {
    constraints
        .iter()
        .enumerate()
        .fold(Ef::ZERO, |acc, (i, c)| acc + alpha.exp_u64(i as u64) * c.evaluate(point))
}

/// Stitch the zerocheck point's non-skip tail between the skip-prefix and
/// non-skip-tail of the inner sumcheck's challenge point.
fn matrix_lde_point(inner_point: &[Ef], zerocheck_point_tail: &[Ef], skips: usize) -> Vec<Ef> {
    let mut point = inner_point[..skips].to_vec();
    point.extend_from_slice(zerocheck_point_tail);
    point.extend_from_slice(&inner_point[skips..]);
    point
}

/// Verify a PIOP transcript against `table`, discharging the final
/// evaluation claim to WHIR.
#[tracing::instrument(skip(table, transcript, perm))]
pub fn piop_verify<Perm: Permutation>(
    table: &AirTable,
    transcript: &mut Transcript<Perm>,
    perm: &Perm,
) -> VerifierResult<()> {
    if table.log_n_rows < UNIVARIATE_SKIPS {
        return Err(VerifierError::ParamInconsistency(
            "log_n_rows must be at least UNIVARIATE_SKIPS",
        ));
    }

    let commitment = whir_parse_commitment(&table.whir_params, transcript)?;

    let alpha = transcript.challenge_ext();
    let n_zerocheck_challenges = table.log_n_rows - UNIVARIATE_SKIPS + 1;
    let zerocheck_challenges: Vec<Ef> = (0..n_zerocheck_challenges)
        .map(|_| transcript.challenge_ext())
        .collect();

    let (zero_sum, zerocheck_eval) = sumcheck_verify_with_univariate_skip(
        transcript,
        table.max_constraint_degree + 1,
        table.log_n_rows,
        UNIVARIATE_SKIPS,
    )?;
    if zero_sum != Ef::ZERO {
        return Err(VerifierError::ZerocheckNonZero);
    }

    let n_witness = table.n_witness_columns();
    let witness_shifted_evals = transcript.receive_ext(2 * n_witness)?;
    let witness_up = &witness_shifted_evals[..n_witness];
    let witness_down = &witness_shifted_evals[n_witness..];

    let selector_evals_at_skip_eval: Vec<Ef> = table
        .univariate_selectors
        .iter()
        .map(|s| s.evaluate(zerocheck_eval.point[0]))
        .collect();
    // The step-12 closing multiply re-evaluates the same selectors at the
    // pre-sumcheck zerocheck challenge, not at the skip round's own folded
    // challenge: it connects the inner sumcheck's plain skip-prefix
    // variables back to the batching scalar the constraint identity above
    // was built from, not to `zerocheck_eval.point[0]`.
    let selector_evals_at_zerocheck_challenge: Vec<Ef> = table
        .univariate_selectors
        .iter()
        .map(|s| s.evaluate(zerocheck_challenges[0]))
        .collect();

    let preprocessed_up: Vec<Ef> = table
        .preprocessed_columns
        .iter()
        .map(|col| fold_rectangular(&column_up(col), &selector_evals_at_skip_eval).evaluate(&zerocheck_eval.point[1..]))
        .collect();
    let preprocessed_down: Vec<Ef> = table
        .preprocessed_columns
        .iter()
        .map(|col| {
            fold_rectangular(&column_down(col), &selector_evals_at_skip_eval).evaluate(&zerocheck_eval.point[1..])
        })
        .collect();

    let mut global_point = preprocessed_up;
    global_point.extend_from_slice(witness_up);
    global_point.extend(preprocessed_down);
    global_point.extend_from_slice(witness_down);

    let constraint_sum = combined_constraint_eval(&table.constraints, alpha, &global_point);
    let closing = constraint_sum * eq_tensor(&zerocheck_challenges[1..], &zerocheck_eval.point[1..]);
    if closing != zerocheck_eval.value {
        return Err(VerifierError::ConstraintMismatch);
    }

    let beta = transcript.challenge_ext();
    let (batched_inner_sum, inner_eval) =
        sumcheck_verify(transcript, 3, table.log_n_rows + UNIVARIATE_SKIPS)?;
    let expected_inner_sum = witness_shifted_evals
        .iter()
        .enumerate()
        .fold(Ef::ZERO, |acc, (i, &e)| acc + beta.exp_u64(i as u64) * e);
    if batched_inner_sum != expected_inner_sum {
        return Err(VerifierError::InnerMismatch);
    }

    let lde_point = matrix_lde_point(&inner_eval.point, &zerocheck_eval.point[1..], UNIVARIATE_SKIPS);
    let matrix_up_eval = matrix_up_lde(table.log_n_rows).evaluate(&lde_point);
    let matrix_down_eval = matrix_down_lde(table.log_n_rows).evaluate(&lde_point);

    let final_inner_claims = transcript.receive_ext(n_witness)?;
    let batched_inner_value = final_inner_claims
        .iter()
        .enumerate()
        .fold(Ef::ZERO, |acc, (u, &claim)| {
            acc + claim
                * (beta.exp_u64(u as u64) * matrix_up_eval
                    + beta.exp_u64((u + n_witness) as u64) * matrix_down_eval)
        });
    let selector_factor = MultilinearEvals::new(selector_evals_at_zerocheck_challenge)
        .evaluate(&inner_eval.point[..UNIVARIATE_SKIPS]);
    if batched_inner_value * selector_factor != inner_eval.value {
        return Err(VerifierError::InnerMismatch);
    }

    let log_n_witness = table.log_n_witness_columns();
    let final_random_scalars: Vec<Ef> = (0..log_n_witness).map(|_| transcript.challenge_ext()).collect();
    let mut final_point = final_random_scalars.clone();
    final_point.extend_from_slice(&inner_eval.point[UNIVARIATE_SKIPS..]);

    let mut padded_claims = final_inner_claims;
    padded_claims.resize(1 << log_n_witness, Ef::ZERO);
    let packed_value = MultilinearEvals::new(padded_claims).evaluate(&final_random_scalars);

    let final_claim = Evaluation::new(final_point, packed_value);
    whir_verify(&table.whir_params, transcript, perm, &commitment, &final_claim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_field::Fp;

    fn ef(v: u64) -> Ef {
        Ef::from_base(Fp::new(v))
    }

    #[test]
    fn column_up_redirects_the_last_row_to_the_second_to_last() {
        let col = vec![fp(1), fp(2), fp(3), fp(4)];
        assert_eq!(column_up(&col), vec![fp(1), fp(2), fp(3), fp(3)]);
    }

    #[test]
    fn column_down_drops_the_first_row_and_repeats_the_new_last() {
        let col = vec![fp(1), fp(2), fp(3), fp(4)];
        assert_eq!(column_down(&col), vec![fp(2), fp(3), fp(4), fp(4)]);
    }

    fn fp(v: u64) -> Fp {
        Fp::new(v)
    }

    #[test]
    fn n_witness_columns_subtracts_preprocessed_from_total() {
        let table = sample_table(5, 2);
        assert_eq!(table.n_witness_columns(), 3);
    }

    #[test]
    fn log_n_witness_columns_is_the_ceiling_of_log2() {
        assert_eq!(sample_table(5, 0).log_n_witness_columns(), 3); // 5 witness columns
        assert_eq!(sample_table(4, 0).log_n_witness_columns(), 2); // 4 witness columns
        assert_eq!(sample_table(8, 0).log_n_witness_columns(), 3); // 8 witness columns
    }

    fn sample_table(n_columns: usize, n_preprocessed: usize) -> AirTable {
        AirTable {
            n_columns,
            log_n_rows: UNIVARIATE_SKIPS,
            constraints: vec![],
            max_constraint_degree: 1,
            preprocessed_columns: vec![vec![Fp::ZERO; 1 << UNIVARIATE_SKIPS]; n_preprocessed],
            whir_params: sv_whir::WhirParams {
                initial_ood_samples: 0,
                rounds: vec![],
                final_queries: 0,
                final_sumcheck_rounds: 0,
                final_combination_pow_bits: 0,
                final_folding_pow_bits: 0,
            },
            univariate_selectors: vec![],
        }
    }

    #[test]
    fn fold_rectangular_weights_the_selected_rows() {
        // A 2-row-wide rectangle (skip_width = 2) folded with weights
        // [1, 0] should just pick out the even-indexed entries.
        let col = vec![Fp::new(10), Fp::new(20), Fp::new(30), Fp::new(40)];
        let selector_evals = [Ef::ONE, Ef::ZERO];
        let folded = fold_rectangular(&col, &selector_evals);
        assert_eq!(folded.evals(), &[ef(10), ef(30)]);
    }

    #[test]
    fn matrix_lde_point_interleaves_skip_prefix_and_tail() {
        let inner_point = [ef(1), ef(2), ef(3), ef(4), ef(5)];
        let zerocheck_tail = [ef(100), ef(200)];
        let point = matrix_lde_point(&inner_point, &zerocheck_tail, 2);
        assert_eq!(point, vec![ef(1), ef(2), ef(100), ef(200), ef(3), ef(4), ef(5)]);
    }

    #[test]
    fn combined_constraint_eval_batches_with_powers_of_alpha() {
        let constraints = vec![CircuitNode::constant(Fp::new(2)), CircuitNode::constant(Fp::new(3))];
        let alpha = ef(5);
        let result = combined_constraint_eval(&constraints, alpha, &[]);
        // 2 * 5^0 + 3 * 5^1 = 2 + 15 = 17
        assert_eq!(result, ef(17));
    }
}
