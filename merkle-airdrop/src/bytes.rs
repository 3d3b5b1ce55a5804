use crate::error::{MerkleTreeError, Result};
use alloy_primitives::B256;

/// A tree node: leaf hash, internal node or root.
pub type Bytes32 = [u8; 32];
pub type HexString = String;

pub trait ToBytes32 {
    fn to_bytes32(&self) -> Result<Bytes32>;
}

impl ToBytes32 for [u8; 32] {
    fn to_bytes32(&self) -> Result<Bytes32> {
        Ok(*self)
    }
}

impl ToBytes32 for &[u8] {
    fn to_bytes32(&self) -> Result<Bytes32> {
        <[u8; 32]>::try_from(*self).map_err(|_| MerkleTreeError::InvalidNodeLength)
    }
}

impl ToBytes32 for &str {
    fn to_bytes32(&self) -> Result<Bytes32> {
        hex_to_bytes32(self)
    }
}

impl ToBytes32 for String {
    fn to_bytes32(&self) -> Result<Bytes32> {
        hex_to_bytes32(self)
    }
}

impl ToBytes32 for B256 {
    fn to_bytes32(&self) -> Result<Bytes32> {
        Ok(self.0)
    }
}

pub fn hex_to_bytes32(s: &str) -> Result<Bytes32> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| MerkleTreeError::HexDecode(e.to_string()))?;
    bytes.as_slice().to_bytes32()
}

#[must_use]
pub fn bytes32_to_hex(bytes: &Bytes32) -> HexString {
    format!("0x{}", hex::encode(bytes))
}

/// Concatenates two nodes smaller-first, so the pair hash does not depend on
/// which side a sibling sits.
#[must_use]
pub fn concat_sorted(a: &Bytes32, b: &Bytes32) -> [u8; 64] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(lo);
    out[32..].copy_from_slice(hi);
    out
}

/// Serde adapter for lists of nodes, e.g. an inclusion proof.
pub mod hex_nodes {
    use super::{Bytes32, bytes32_to_hex, hex_to_bytes32};
    use serde::{Deserialize, Deserializer, Serializer, de::Error, ser::SerializeSeq};

    pub fn serialize<S: Serializer>(nodes: &[Bytes32], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(nodes.len()))?;
        for node in nodes {
            seq.serialize_element(&bytes32_to_hex(node))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Bytes32>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| hex_to_bytes32(s).map_err(D::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MerkleTreeError;

    #[test]
    fn test_hex_roundtrip() {
        let original = [0xab; 32];
        let hex = bytes32_to_hex(&original);
        assert!(hex.starts_with("0x"));
        let recovered = hex_to_bytes32(&hex).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn test_hex_without_prefix() {
        let hex = "0000000000000000000000000000000000000000000000000000000000000001";
        let bytes = hex_to_bytes32(hex).unwrap();
        assert_eq!(bytes[31], 1);
    }

    #[test]
    fn test_invalid_hex_length() {
        let result = hex_to_bytes32("0x00");
        assert!(matches!(result, Err(MerkleTreeError::InvalidNodeLength)));
    }

    #[test]
    fn test_invalid_hex_chars() {
        let result = hex_to_bytes32("0xzz");
        assert!(matches!(result, Err(MerkleTreeError::HexDecode(_))));
    }

    #[test]
    fn test_concat_sorted_orders_smaller_first() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        a[0] = 2;
        b[0] = 1;

        let joined = concat_sorted(&a, &b);
        assert_eq!(&joined[..32], &b);
        assert_eq!(&joined[32..], &a);
        assert_eq!(concat_sorted(&a, &b), concat_sorted(&b, &a));
    }

    #[test]
    fn test_to_bytes32_from_slice() {
        let slice: &[u8] = &[1u8; 32];
        assert_eq!(slice.to_bytes32().unwrap(), [1u8; 32]);
    }

    #[test]
    fn test_to_bytes32_wrong_length() {
        let slice: &[u8] = &[1u8; 31];
        let result = slice.to_bytes32();
        assert!(matches!(result, Err(MerkleTreeError::InvalidNodeLength)));
    }

    #[test]
    fn test_to_bytes32_from_b256() {
        let b = B256::repeat_byte(7);
        assert_eq!(b.to_bytes32().unwrap(), [7u8; 32]);
    }
}
