//! # merkle-airdrop
//!
//! Airdrop eligibility and claim engine backed by a Merkle commitment.
//!
//! ## Features
//!
//! - **`AirdropTree`**: sorted, order-independent Merkle tree over
//!   `(address, uint256)` entries with double-hashed leaves
//! - **`proof::verify`**: pure inclusion-proof verification against a root
//! - **`AirdropDistributor`**: updatable root, owner/manager roles and
//!   cumulative per-recipient claims that pay only the increase on re-rooting
//! - **`Custody`**: pluggable payout asset holder, with an in-memory token
//! - Serialization of trees and claim tickets with serde
//! - Keccak256 hashing and ABI encoding (Ethereum compatible)
//!
//! ## Example
//!
//! ```rust
//! use alloy_primitives::{Address, U256};
//! use merkle_airdrop::{AirdropDistributor, AirdropEntry, AirdropTree, InMemoryToken};
//!
//! let owner = Address::repeat_byte(1);
//! let user = Address::repeat_byte(2);
//! let token_address = Address::repeat_byte(3);
//! let storage = Address::repeat_byte(4);
//! let distributor_address = Address::repeat_byte(5);
//!
//! let mut token = InMemoryToken::new(token_address);
//! token.mint(storage, U256::from(1_000u64));
//! token.approve(storage, distributor_address, U256::from(1_000u64));
//!
//! let mut distributor =
//!     AirdropDistributor::new(distributor_address, owner, token_address, storage, token).unwrap();
//!
//! let entry = AirdropEntry::new(user, U256::from(100u64));
//! let tree = AirdropTree::of(vec![entry, AirdropEntry::new(owner, U256::from(5u64))]).unwrap();
//! distributor.update_root(owner, *tree.root()).unwrap();
//!
//! let proof = tree.proof(&entry).unwrap();
//! let receipt = distributor.claim(user, entry.amount, &proof).unwrap();
//! assert_eq!(receipt.payout, U256::from(100u64));
//! ```

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod access;
pub mod bytes;
pub mod config;
pub mod custody;
pub mod distributor;
pub mod error;
pub mod hashes;
pub mod leaf;
pub mod ledger;
pub mod proof;
pub mod tree;

pub use access::{AccessControl, Capability, Role};
pub use bytes::{Bytes32, HexString, ToBytes32};
pub use config::{ConfigError, DistributorConfig};
pub use custody::{Custody, InMemoryToken};
pub use distributor::{AirdropDistributor, ClaimReceipt};
pub use error::{ClaimError, ClaimResult, CustodyError, MerkleTreeError, Result};
pub use hashes::{keccak256, node_hash, standard_leaf_hash};
pub use leaf::{AirdropEntry, encode_leaf};
pub use ledger::ClaimLedger;
pub use tree::{AirdropTree, AirdropTreeData, ClaimTicket};
