//! Leaf encoding for `(recipient, amount)` eligibility entries.
//!
//! A leaf is `keccak256(keccak256(abi.encode(address, uint256)))`. Off-chain
//! proof generation and claim verification must both go through
//! [`encode_leaf`]; any other encoding silently invalidates every proof.

use crate::bytes::Bytes32;
use crate::error::{MerkleTreeError, Result};
use crate::hashes::standard_leaf_hash;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

/// One eligibility record: `recipient` may claim up to `amount` in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AirdropEntry {
    pub recipient: Address,
    #[serde(with = "amount_serde")]
    pub amount: U256,
}

impl AirdropEntry {
    pub fn new(recipient: Address, amount: U256) -> Self {
        Self { recipient, amount }
    }

    /// Parses a `[address, amount]` JSON pair. The amount may be a JSON
    /// number, a decimal string or a `0x` hex string.
    pub fn from_json(value: &[serde_json::Value]) -> Result<Self> {
        let [recipient, amount] = value else {
            return Err(MerkleTreeError::InvalidEntry(format!(
                "Expected [address, amount], got {} values",
                value.len()
            )));
        };

        let recipient = recipient
            .as_str()
            .ok_or_else(|| MerkleTreeError::InvalidEntry("Expected string for address".into()))?
            .parse::<Address>()
            .map_err(|e| MerkleTreeError::InvalidEntry(format!("Invalid address: {e}")))?;

        Ok(Self::new(recipient, parse_amount(amount)?))
    }

    pub fn leaf(&self) -> Bytes32 {
        encode_leaf(self.recipient, self.amount)
    }
}

impl From<(Address, U256)> for AirdropEntry {
    fn from((recipient, amount): (Address, U256)) -> Self {
        Self::new(recipient, amount)
    }
}

/// Hashes the 64-byte ABI encoding of `(recipient, amount)` twice.
#[must_use]
pub fn encode_leaf(recipient: Address, amount: U256) -> Bytes32 {
    let mut encoded = recipient.abi_encode();
    encoded.extend(amount.abi_encode());
    standard_leaf_hash(&encoded)
}

pub fn parse_amount(value: &serde_json::Value) -> Result<U256> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(|| {
            MerkleTreeError::InvalidEntry("Number is not a u64, use a string".into())
        }),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if let Some(hex_str) = s.strip_prefix("0x") {
                U256::from_str_radix(hex_str, 16)
                    .map_err(|e| MerkleTreeError::InvalidEntry(format!("Invalid hex amount: {e}")))
            } else {
                U256::from_str_radix(s, 10)
                    .map_err(|e| MerkleTreeError::InvalidEntry(format!("Invalid amount: {e}")))
            }
        }
        _ => Err(MerkleTreeError::InvalidEntry(
            "Expected number or string for amount".into(),
        )),
    }
}

/// Amounts are written as decimal strings; 256-bit values do not fit a JSON
/// number.
mod amount_serde {
    use super::parse_amount;
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(amount: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        parse_amount(&value).map_err(D::Error::custom)
    }
}
