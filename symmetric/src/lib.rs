//! The sponge primitive shared by the transcript (`sv-challenger`) and the
//! Merkle tree (`sv-merkle-tree`): a fixed-width permutation of base-field
//! elements.
//!
//! The concrete round function is out of scope for this core (see
//! `spec.md` §9, "Stubbed permutation"): a real deployment plugs in a
//! soundness-analyzed construction (e.g. Poseidon2) behind the same
//! [`CryptographicPermutation`] trait used here.

#![forbid(unsafe_code)]

use sv_field::Fp;

/// Width of the permutation state, in base-field elements.
pub const WIDTH: usize = 4;

/// Length of a digest: the first half of a permutation output.
pub const DIGEST_LEN: usize = WIDTH / 2;

/// A digest: the first [`DIGEST_LEN`] elements of a permutation output.
pub type Digest = [Fp; DIGEST_LEN];

/// A pure, deterministic endomorphism of a fixed-width state.
///
/// Same input must always produce the same output; implementations must not
/// carry any interior mutability that affects the result.
pub trait Permutation: Clone {
    fn permute(&self, input: [Fp; WIDTH]) -> [Fp; WIDTH];

    fn permute_mut(&self, state: &mut [Fp; WIDTH]) {
        *state = self.permute(*state);
    }
}

/// Marker for permutations sound enough to use as the basis of a sponge /
/// Merkle hash (as opposed to, say, a permutation used only for testing).
pub trait CryptographicPermutation: Permutation {}

/// Placeholder round function. **Not cryptographically sound** — ported
/// verbatim from the reference implementation's dummy permutation so the
/// rest of the stack has something concrete to run against. A production
/// deployment replaces this with a real Poseidon2 instantiation implementing
/// the same [`CryptographicPermutation`] trait, with a domain-separated
/// initial state per use-site if the sponge is shared across subprotocols.
#[derive(Clone, Copy, Debug, Default)]
pub struct StubPermutation;

impl Permutation for StubPermutation {
    fn permute(&self, input: [Fp; WIDTH]) -> [Fp; WIDTH] {
        let [s1, s2, s3, s4] = input;
        let o1 = s1 + s2 * Fp::new(785) + s3 * Fp::new(123) + s4 * Fp::new(456);
        let o2 = s1 * Fp::new(789) + s2 + s3 * Fp::new(321) + s4 * Fp::new(654);
        let o3 = s1 * Fp::new(159) + s2 * Fp::new(753) + s3 + s4 * Fp::new(951);
        let o4 = s1 * Fp::new(357) + s2 * Fp::new(159) + s3 * Fp::new(753) + s4;
        [o1 * o2, o3 * o4, o1 * o1, o4 * o4]
    }
}

impl CryptographicPermutation for StubPermutation {}
