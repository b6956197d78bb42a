//! Merkle authentication against a root computed with the same permutation
//! used by the Fiat-Shamir transcript.

#![forbid(unsafe_code)]

use sv_error::{VerifierError, VerifierResult};
use sv_field::Fp;
use sv_symmetric::{Digest, Permutation, DIGEST_LEN, WIDTH};

/// Hash a leaf: absorb it `DIGEST_LEN` elements at a time into a
/// zero-initialized state (the last block zero-padded), one permutation per
/// block. The hash is the first `DIGEST_LEN` elements of the final state.
pub fn hash_leaf<Perm: Permutation>(perm: &Perm, leaf: &[Fp]) -> Digest {
    let mut state = [Fp::ZERO; WIDTH];
    // An empty leaf still hashes one (all-zero) block.
    let blocks = leaf.chunks(DIGEST_LEN).collect::<Vec<_>>();
    let iters = if blocks.is_empty() { 1 } else { blocks.len() };
    for i in 0..iters {
        let chunk = blocks.get(i).copied().unwrap_or(&[]);
        for j in 0..DIGEST_LEN {
            state[j] = chunk.get(j).copied().unwrap_or(Fp::ZERO);
        }
        perm.permute_mut(&mut state);
    }
    state[..DIGEST_LEN]
        .try_into()
        .expect("state is at least DIGEST_LEN wide")
}

/// Verify that `leaf` sits at `index` under `root`, given an authentication
/// path of `height` sibling digests.
///
/// Bit `i` of `index` (little-endian) decides sibling placement at level
/// `i`: if the bit is 1, `leaf`'s running digest is the right child (upper
/// half of the state) and the sibling occupies the lower half; otherwise the
/// reverse. `height == 0` degenerates to a direct equality check between the
/// leaf hash and the root (used for WHIR's final constant check).
pub fn verify_merkle_path<Perm: Permutation>(
    perm: &Perm,
    root: Digest,
    index: usize,
    leaf: &[Fp],
    auth_path: &[Digest],
    height: usize,
) -> VerifierResult<()> {
    if auth_path.len() != height {
        return Err(VerifierError::ParamInconsistency(
            "authentication path length does not match the claimed height",
        ));
    }

    let mut digest = hash_leaf(perm, leaf);

    for (i, sibling) in auth_path.iter().enumerate() {
        let is_right = (index >> i) & 1 == 1;
        let mut state = [Fp::ZERO; WIDTH];
        if is_right {
            state[..DIGEST_LEN].copy_from_slice(sibling);
            state[DIGEST_LEN..].copy_from_slice(&digest);
        } else {
            state[..DIGEST_LEN].copy_from_slice(&digest);
            state[DIGEST_LEN..].copy_from_slice(sibling);
        }
        perm.permute_mut(&mut state);
        digest = state[..DIGEST_LEN]
            .try_into()
            .expect("state is at least DIGEST_LEN wide");
    }

    if digest == root {
        Ok(())
    } else {
        Err(VerifierError::MerkleMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_symmetric::StubPermutation;

    /// A minimal in-memory prover oracle: builds a tree over `leaves` and
    /// hands back roots/paths, used only to exercise the verifier above.
    struct ReferenceTree {
        levels: Vec<Vec<Digest>>,
    }

    impl ReferenceTree {
        fn build(perm: StubPermutation, leaves: &[Vec<Fp>]) -> Self {
            assert!(leaves.len().is_power_of_two());
            let mut level: Vec<Digest> = leaves.iter().map(|l| hash_leaf(&perm, l)).collect();
            let mut levels = vec![level.clone()];
            while level.len() > 1 {
                let mut next = Vec::with_capacity(level.len() / 2);
                for pair in level.chunks(2) {
                    let mut state = [Fp::ZERO; WIDTH];
                    state[..DIGEST_LEN].copy_from_slice(&pair[0]);
                    state[DIGEST_LEN..].copy_from_slice(&pair[1]);
                    perm.permute_mut(&mut state);
                    next.push(state[..DIGEST_LEN].try_into().unwrap());
                }
                levels.push(next.clone());
                level = next;
            }
            Self { levels }
        }

        fn root(&self) -> Digest {
            self.levels.last().unwrap()[0]
        }

        fn height(&self) -> usize {
            self.levels.len() - 1
        }

        fn path(&self, mut index: usize) -> Vec<Digest> {
            let mut path = Vec::with_capacity(self.height());
            for level in &self.levels[..self.levels.len() - 1] {
                let sibling = level[index ^ 1];
                path.push(sibling);
                index >>= 1;
            }
            path
        }
    }

    fn sample_leaves() -> Vec<Vec<Fp>> {
        (0..8u64)
            .map(|i| vec![Fp::new(i), Fp::new(i * 17 + 3)])
            .collect()
    }

    #[test]
    fn honest_path_is_accepted() {
        let perm = StubPermutation;
        let leaves = sample_leaves();
        let tree = ReferenceTree::build(perm, &leaves);
        for i in 0..leaves.len() {
            let path = tree.path(i);
            assert!(verify_merkle_path(&perm, tree.root(), i, &leaves[i], &path, tree.height()).is_ok());
        }
    }

    #[test]
    fn mutated_leaf_is_rejected() {
        let perm = StubPermutation;
        let leaves = sample_leaves();
        let tree = ReferenceTree::build(perm, &leaves);
        let path = tree.path(3);
        let mut bad_leaf = leaves[3].clone();
        bad_leaf[0] += Fp::ONE;
        assert_eq!(
            verify_merkle_path(&perm, tree.root(), 3, &bad_leaf, &path, tree.height()),
            Err(VerifierError::MerkleMismatch)
        );
    }

    #[test]
    fn mutated_sibling_is_rejected() {
        let perm = StubPermutation;
        let leaves = sample_leaves();
        let tree = ReferenceTree::build(perm, &leaves);
        let mut path = tree.path(3);
        path[0][0] += Fp::ONE;
        assert_eq!(
            verify_merkle_path(&perm, tree.root(), 3, &leaves[3], &path, tree.height()),
            Err(VerifierError::MerkleMismatch)
        );
    }

    #[test]
    fn mutated_index_is_rejected() {
        let perm = StubPermutation;
        let leaves = sample_leaves();
        let tree = ReferenceTree::build(perm, &leaves);
        let path = tree.path(3);
        assert_eq!(
            verify_merkle_path(&perm, tree.root(), 2, &leaves[3], &path, tree.height()),
            Err(VerifierError::MerkleMismatch)
        );
    }

    #[test]
    fn height_zero_path_is_a_direct_equality_check() {
        let perm = StubPermutation;
        let leaf = vec![Fp::new(123)];
        let root = hash_leaf(&perm, &leaf);
        assert!(verify_merkle_path(&perm, root, 0, &leaf, &[], 0).is_ok());

        let mut other = leaf.clone();
        other[0] += Fp::ONE;
        assert_eq!(
            verify_merkle_path(&perm, root, 0, &other, &[], 0),
            Err(VerifierError::MerkleMismatch)
        );
    }
}
