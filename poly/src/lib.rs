//! Polynomial primitives over the extension field: a univariate type, and
//! the two multilinear representations (by coefficients, by evaluations)
//! the PIOP and WHIR verifiers juggle between.

#![forbid(unsafe_code)]

mod evaluation;
mod multilinear;
mod univariate;

pub use evaluation::Evaluation;
pub use multilinear::{MultilinearCoeffs, MultilinearEvals};
pub use univariate::UnivariatePoly;

use sv_field::Ef;

/// `eq(s1, s2) = Π_i (s1_i s2_i + (1 - s1_i)(1 - s2_i))`. Returns `Ef::ONE`
/// on empty input.
pub fn eq_tensor(s1: &[Ef], s2: &[Ef]) -> Ef {
    assert_eq!(s1.len(), s2.len(), "eq_tensor: mismatched vector lengths");
    s1.iter().zip(s2).fold(Ef::ONE, |acc, (&a, &b)| {
        acc * (a * b + (Ef::ONE - a) * (Ef::ONE - b))
    })
}

/// `(z, z^2, z^4, ..., z^{2^(n-1)})`, mapping a single univariate challenge
/// to a multilinear evaluation point (the "powers of 2 embedding" trick).
pub fn multilinear_from_univariate(z: Ef, n: usize) -> Vec<Ef> {
    let mut out = Vec::with_capacity(n);
    let mut cur = z;
    for _ in 0..n {
        out.push(cur);
        cur = cur * cur;
    }
    out
}
