use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::access::Capability;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleTreeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Merkle tree nodes must be 32 bytes")]
    InvalidNodeLength,

    #[error("Expected non-zero number of leaves")]
    EmptyLeaves,

    #[error("Leaf is not in tree")]
    LeafNotInTree,

    #[error("Index out of bounds")]
    IndexOutOfBounds,

    #[error("Merkle tree is invalid")]
    InvalidTree,

    #[error("Merkle tree does not contain the expected value")]
    ValueMismatch,

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Invalid airdrop entry: {0}")]
    InvalidEntry(String),

    #[error("Hex decode error: {0}")]
    HexDecode(String),
}

pub type Result<T> = std::result::Result<T, MerkleTreeError>;

/// Failures of the custody holder while moving payout funds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Insufficient balance: holder {holder} has {available}, needs {required}")]
    InsufficientBalance {
        holder: Address,
        available: U256,
        required: U256,
    },

    #[error("Insufficient allowance: {spender} may move {available} from {holder}, needs {required}")]
    InsufficientAllowance {
        holder: Address,
        spender: Address,
        available: U256,
        required: U256,
    },
}

/// Reasons a claim-engine operation was rejected. Every variant means the
/// operation had no effect on state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Invalid construction: {0}")]
    InvalidConstruction(String),

    #[error("Account {caller} is missing capability {capability:?}")]
    Unauthorized {
        caller: Address,
        capability: Capability,
    },

    #[error("Merkle root has not been set")]
    NoActiveRoot,

    #[error("Proof failed")]
    ProofFailed,

    #[error("Already claimed: {claimed} paid out, {requested} requested")]
    AlreadyClaimed { claimed: U256, requested: U256 },

    #[error("Insufficient custody funds: {0}")]
    InsufficientCustody(#[from] CustodyError),
}

pub type ClaimResult<T> = std::result::Result<T, ClaimError>;

#[inline]
pub fn validate_argument<T: AsRef<str>>(condition: bool, message: T) -> Result<()> {
    if !condition {
        Err(MerkleTreeError::InvalidArgument(
            message.as_ref().to_string(),
        ))
    } else {
        Ok(())
    }
}

#[inline]
pub fn invariant<T: AsRef<str>>(condition: bool, message: T) -> Result<()> {
    if !condition {
        Err(MerkleTreeError::Invariant(message.as_ref().to_string()))
    } else {
        Ok(())
    }
}
