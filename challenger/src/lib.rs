//! The Fiat-Shamir transcript.
//!
//! The verifier never sees an interactive prover: it reads a flat, ordered
//! sequence of base-field scalars and replays the verifier's side of the
//! sponge construction against it. [`Transcript`] is strictly sequential —
//! `cursor` only ever advances, and reading zero scalars is a no-op that
//! does not touch the sponge state.

#![forbid(unsafe_code)]

use sv_error::{VerifierError, VerifierResult};
use sv_field::{Ef, Fp, DEG, P, P_BITS};
use sv_symmetric::{Permutation, DIGEST_LEN, WIDTH};

const _: () = assert!(DEG <= WIDTH, "challenge_ext reads DEG slots out of a WIDTH-wide state");

/// A Fiat-Shamir transcript over a flat slice of raw (not-yet-validated)
/// base-field scalars.
///
/// `P2` is the permutation shared with the Merkle layer; plugging in a
/// different permutation changes the whole protocol's Fiat-Shamir instance.
pub struct Transcript<Perm: Permutation> {
    raw: Vec<u64>,
    cursor: usize,
    state: [Fp; WIDTH],
    perm: Perm,
}

impl<Perm: Permutation> Transcript<Perm> {
    /// Build a transcript over `raw`, a flat ordered sequence of canonical
    /// (or to-be-validated) base-field integers, with sponge state zeroed.
    pub fn new(perm: Perm, raw: Vec<u64>) -> Self {
        Self {
            raw,
            cursor: 0,
            state: [Fp::ZERO; WIDTH],
            perm,
        }
    }

    /// Index of the next scalar to be read.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total length of the underlying transcript.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Scalars not yet consumed.
    pub fn remaining(&self) -> usize {
        self.raw.len() - self.cursor
    }

    /// Whether the cursor has reached the end of the transcript.
    ///
    /// Trailing, unconsumed data is rejected by the caller for determinism:
    /// a verifier that accepts with leftover transcript bytes would accept
    /// multiple distinct proofs for the same statement.
    pub fn fully_consumed(&self) -> bool {
        self.cursor == self.raw.len()
    }

    /// Read `n` base-field scalars, absorbing them into the sponge.
    pub fn receive_base(&mut self, n: usize) -> VerifierResult<Vec<Fp>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        if self.cursor + n > self.raw.len() {
            return Err(VerifierError::TranscriptExhausted {
                requested: n,
                remaining: self.remaining(),
            });
        }
        let mut out = Vec::with_capacity(n);
        for &raw in &self.raw[self.cursor..self.cursor + n] {
            if raw >= P {
                return Err(VerifierError::FieldDecode { value: raw });
            }
            out.push(Fp::new(raw));
        }
        self.cursor += n;
        self.absorb(&out);
        Ok(out)
    }

    /// Read `n` extension-field scalars (`n * DEG` base scalars under the hood).
    pub fn receive_ext(&mut self, n: usize) -> VerifierResult<Vec<Ef>> {
        let base = self.receive_base(n * DEG)?;
        Ok(base
            .chunks_exact(DEG)
            .map(|chunk| {
                let coeffs: [Fp; DEG] = chunk.try_into().expect("chunks_exact(DEG) yields DEG items");
                Ef::new(coeffs)
            })
            .collect())
    }

    /// Absorb `scalars` `DIGEST_LEN` at a time; the last (partial) block is
    /// zero-padded. One permutation call per block; only the first
    /// `DIGEST_LEN` state slots are overwritten, the rest carry capacity.
    fn absorb(&mut self, scalars: &[Fp]) {
        for chunk in scalars.chunks(DIGEST_LEN) {
            for i in 0..DIGEST_LEN {
                self.state[i] = chunk.get(i).copied().unwrap_or(Fp::ZERO);
            }
            self.perm.permute_mut(&mut self.state);
        }
    }

    /// Squeeze a single extension-field challenge and permute once.
    pub fn challenge_ext(&mut self) -> Ef {
        let coeffs: [Fp; DEG] = self.state[..DEG]
            .try_into()
            .expect("state is at least DEG elements wide");
        self.perm.permute_mut(&mut self.state);
        Ef::new(coeffs)
    }

    /// Squeeze an extension challenge, reduce its index-0 base coordinate
    /// modulo `2^k`. Requires `k < P_BITS`.
    pub fn challenge_bits(&mut self, k: u32) -> usize {
        assert!(k < P_BITS, "challenge_bits: k must be less than P_BITS");
        let challenge = self.challenge_ext();
        let coord0 = challenge.coeffs()[0].value();
        if k == 0 {
            0
        } else {
            (coord0 as usize) & ((1usize << k) - 1)
        }
    }

    /// Read one grinding nonce and assert it zeroes the low `bits` bits of
    /// the next challenge.
    pub fn grind(&mut self, bits: u32) -> VerifierResult<()> {
        let _nonce = self.receive_base(1)?;
        if self.challenge_bits(bits) != 0 {
            tracing::warn!(bits, "proof-of-work grinding check failed");
            return Err(VerifierError::PowInvalid { bits: bits as usize });
        }
        Ok(())
    }
}
