//! Pure inclusion-proof verification. Nothing here touches claim state.

use crate::bytes::Bytes32;
use crate::hashes::node_hash;
use crate::leaf::encode_leaf;
use alloy_primitives::{Address, U256};

/// Folds `proof` into `leaf`, hashing each step as a sorted pair.
#[must_use]
pub fn process_proof(leaf: &Bytes32, proof: &[Bytes32]) -> Bytes32 {
    proof
        .iter()
        .fold(*leaf, |current, sibling| node_hash(&current, sibling))
}

/// Returns true when `leaf` together with `proof` recomputes `root`.
#[must_use]
pub fn verify_leaf(root: &Bytes32, leaf: &Bytes32, proof: &[Bytes32]) -> bool {
    process_proof(leaf, proof) == *root
}

/// Checks that `(recipient, amount)` is committed to by `root`.
#[must_use]
pub fn verify(root: &Bytes32, recipient: Address, amount: U256, proof: &[Bytes32]) -> bool {
    verify_leaf(root, &encode_leaf(recipient, amount), proof)
}
