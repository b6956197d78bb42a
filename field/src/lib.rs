//! The two-layer field used by the verifier: a prime base field `Fp` and its
//! degree-[`DEG`] algebraic extension `Ef`.
//!
//! Concrete parameters are fixed compile-time constants (see `SPEC_FULL.md`
//! §C for where these come from): a 31-bit prime with two-adicity 24, and an
//! extension `x^DEG - W` irreducible over `Fp`.

#![forbid(unsafe_code)]

mod base;
mod extension;

pub use base::Fp;
pub use extension::Ef;

/// The field modulus.
pub const P: u64 = 2_130_706_433;

/// `ceil(log2(P))`.
pub const P_BITS: u32 = 31;

/// Largest `k` such that `2^k` divides `P - 1`.
pub const TWO_ADICITY: u32 = 24;

/// A generator of the multiplicative subgroup of order `2^TWO_ADICITY`.
pub const TWO_ADIC_GENERATOR: u64 = 1_791_270_792;

/// Extension degree of `Ef` over `Fp`.
pub const DEG: usize = 4;

/// The non-residue such that `x^DEG - W` is irreducible over `Fp`.
pub const W: u64 = 3;
