use crate::bytes::{Bytes32, concat_sorted};
use sha3::{Digest, Keccak256};

#[must_use]
pub fn keccak256(data: &[u8]) -> Bytes32 {
    Keccak256::digest(data).into()
}

/// Leaf hashing: `keccak256(keccak256(data))`. The second round keeps a
/// 64-byte leaf preimage from ever colliding with an internal node.
#[must_use]
pub fn standard_leaf_hash(data: &[u8]) -> Bytes32 {
    keccak256(&keccak256(data))
}

/// Commutative pair hash: `keccak256(min(a, b) || max(a, b))`.
#[must_use]
pub fn node_hash(a: &Bytes32, b: &Bytes32) -> Bytes32 {
    keccak256(&concat_sorted(a, b))
}
