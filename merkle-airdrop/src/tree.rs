//! Merkle tree over airdrop entries.
//!
//! Leaves are sorted byte-wise before pairing, so the root depends only on
//! the set of entries and not on their input order. Each parent is the
//! sorted-pair hash of two neighbours; an unpaired last node is carried up
//! to the next level unchanged and contributes no proof element.

use crate::bytes::{Bytes32, HexString, bytes32_to_hex, hex_nodes};
use crate::error::{MerkleTreeError, Result, invariant, validate_argument};
use crate::hashes::node_hash;
use crate::leaf::AirdropEntry;
use crate::proof::{process_proof, verify_leaf};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const FORMAT: &str = "airdrop-v1";

/// Serialized form of an [`AirdropTree`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropTreeData {
    pub format: String,
    pub levels: Vec<Level>,
    pub values: Vec<ValueEntry>,
}

/// One tree level, leaves first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(#[serde(with = "hex_nodes")] pub Vec<Bytes32>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueEntry {
    pub entry: AirdropEntry,
    pub leaf_index: usize,
}

/// What a recipient needs to claim: its entry and the inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTicket {
    #[serde(flatten)]
    pub entry: AirdropEntry,
    #[serde(with = "hex_nodes")]
    pub proof: Vec<Bytes32>,
}

pub struct AirdropTree {
    levels: Vec<Vec<Bytes32>>,
    values: Vec<ValueEntry>,
    hash_lookup: HashMap<Bytes32, usize>,
}

fn parent_level(level: &[Bytes32]) -> Vec<Bytes32> {
    level
        .chunks(2)
        .map(|pair| {
            pair.get(1)
                .map_or(pair[0], |right| node_hash(&pair[0], right))
        })
        .collect()
}

/// Builds every level above `leaves`, ending with the single-node root level.
pub fn make_levels(leaves: Vec<Bytes32>) -> Result<Vec<Vec<Bytes32>>> {
    if leaves.is_empty() {
        return Err(MerkleTreeError::EmptyLeaves);
    }

    let mut levels = vec![leaves];
    while let Some(level) = levels.last().filter(|level| level.len() > 1) {
        let next = parent_level(level);
        levels.push(next);
    }

    Ok(levels)
}

/// Collects the sibling of `leaf_index` at every level below the root.
pub fn level_proof(levels: &[Vec<Bytes32>], leaf_index: usize) -> Result<Vec<Bytes32>> {
    let leaves = levels.first().ok_or(MerkleTreeError::InvalidTree)?;
    if leaf_index >= leaves.len() {
        return Err(MerkleTreeError::IndexOutOfBounds);
    }

    let mut proof = Vec::with_capacity(levels.len().saturating_sub(1));
    let mut index = leaf_index;
    for level in &levels[..levels.len() - 1] {
        if let Some(sibling) = level.get(index ^ 1) {
            proof.push(*sibling);
        }
        index /= 2;
    }

    Ok(proof)
}

pub fn is_valid_levels(levels: &[Vec<Bytes32>]) -> bool {
    let Some((root, below)) = levels.split_last() else {
        return false;
    };
    if root.len() != 1 || levels[0].is_empty() {
        return false;
    }
    if !levels[0].windows(2).all(|w| w[0] <= w[1]) {
        return false;
    }

    below
        .iter()
        .zip(&levels[1..])
        .all(|(child, parent)| parent_level(child) == *parent)
}

impl AirdropTree {
    fn new(levels: Vec<Vec<Bytes32>>, values: Vec<ValueEntry>) -> Self {
        let hash_lookup = values
            .iter()
            .enumerate()
            .filter_map(|(value_index, value)| {
                levels
                    .first()
                    .and_then(|leaves| leaves.get(value.leaf_index))
                    .map(|leaf| (*leaf, value_index))
            })
            .collect();

        Self {
            levels,
            values,
            hash_lookup,
        }
    }

    /// Builds the tree. Fails with [`MerkleTreeError::EmptyLeaves`] for an
    /// empty list. Duplicate entries each get their own leaf.
    pub fn of(entries: Vec<AirdropEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(MerkleTreeError::EmptyLeaves);
        }

        let mut hashed: Vec<(usize, Bytes32)> =
            entries.iter().map(AirdropEntry::leaf).enumerate().collect();
        hashed.sort_by(|a, b| a.1.cmp(&b.1));

        let levels = make_levels(hashed.iter().map(|(_, leaf)| *leaf).collect())?;

        let mut values: Vec<ValueEntry> = entries
            .into_iter()
            .map(|entry| ValueEntry {
                entry,
                leaf_index: 0,
            })
            .collect();
        for (leaf_index, (value_index, _)) in hashed.iter().enumerate() {
            values[*value_index].leaf_index = leaf_index;
        }

        let tree = Self::new(levels, values);
        debug!(
            entries = tree.len(),
            depth = tree.depth(),
            root = %bytes32_to_hex(tree.root()),
            "built airdrop tree"
        );
        Ok(tree)
    }

    /// Builds from `[address, amount]` JSON pairs.
    pub fn from_json(values: &[Vec<serde_json::Value>]) -> Result<Self> {
        let entries = values
            .iter()
            .map(|value| AirdropEntry::from_json(value))
            .collect::<Result<Vec<_>>>()?;
        Self::of(entries)
    }

    pub fn load(data: AirdropTreeData) -> Result<Self> {
        if data.format != FORMAT {
            return Err(MerkleTreeError::UnknownFormat(data.format));
        }

        let levels: Vec<Vec<Bytes32>> = data.levels.into_iter().map(|level| level.0).collect();
        if !is_valid_levels(&levels) {
            return Err(MerkleTreeError::InvalidTree);
        }
        let tree = Self::new(levels, data.values);
        tree.validate()?;
        Ok(tree)
    }

    pub fn dump(&self) -> AirdropTreeData {
        AirdropTreeData {
            format: FORMAT.to_string(),
            levels: self.levels.iter().cloned().map(Level).collect(),
            values: self.values.clone(),
        }
    }

    pub fn root(&self) -> &Bytes32 {
        // make_levels never yields an empty top level
        &self.levels[self.levels.len() - 1][0]
    }

    pub fn root_hex(&self) -> HexString {
        bytes32_to_hex(self.root())
    }

    /// Number of levels including leaves and root.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&AirdropEntry> {
        self.values.get(index).map(|v| &v.entry)
    }

    pub fn entries(&self) -> impl Iterator<Item = (usize, &AirdropEntry)> {
        self.values.iter().enumerate().map(|(i, v)| (i, &v.entry))
    }

    pub fn validate(&self) -> Result<()> {
        validate_argument(!self.values.is_empty(), "Expected non-zero number of leaves")?;
        invariant(
            self.values.len() == self.levels.first().map_or(0, Vec::len),
            "Every leaf must belong to exactly one entry",
        )?;

        let mut seen = vec![false; self.values.len()];
        for value in &self.values {
            self.validate_value(value)?;
            invariant(
                !std::mem::replace(&mut seen[value.leaf_index], true),
                "Two entries share a leaf index",
            )?;
        }

        if !is_valid_levels(&self.levels) {
            return Err(MerkleTreeError::InvalidTree);
        }
        Ok(())
    }

    fn validate_value(&self, value: &ValueEntry) -> Result<()> {
        let stored = self.levels[0]
            .get(value.leaf_index)
            .ok_or(MerkleTreeError::IndexOutOfBounds)?;
        if value.entry.leaf() != *stored {
            return Err(MerkleTreeError::ValueMismatch);
        }
        Ok(())
    }

    pub fn leaf_lookup(&self, entry: &AirdropEntry) -> Result<usize> {
        self.hash_lookup
            .get(&entry.leaf())
            .copied()
            .ok_or(MerkleTreeError::LeafNotInTree)
    }

    pub fn proof_by_index(&self, index: usize) -> Result<Vec<Bytes32>> {
        let value = self.values.get(index).ok_or(MerkleTreeError::IndexOutOfBounds)?;
        self.validate_value(value)?;

        let proof = level_proof(&self.levels, value.leaf_index)?;
        invariant(
            verify_leaf(self.root(), &self.levels[0][value.leaf_index], &proof),
            "Unable to prove value",
        )?;
        Ok(proof)
    }

    /// Inclusion proof for `entry`, the sibling hashes from leaf to root.
    pub fn proof(&self, entry: &AirdropEntry) -> Result<Vec<Bytes32>> {
        let index = self.leaf_lookup(entry)?;
        self.proof_by_index(index)
    }

    pub fn verify_proof(&self, entry: &AirdropEntry, proof: &[Bytes32]) -> bool {
        process_proof(&entry.leaf(), proof) == *self.root()
    }

    /// One ticket per entry, in input order, ready for out-of-band
    /// distribution to recipients.
    pub fn tickets(&self) -> Result<Vec<ClaimTicket>> {
        (0..self.values.len())
            .map(|index| {
                Ok(ClaimTicket {
                    entry: self.values[index].entry,
                    proof: self.proof_by_index(index)?,
                })
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let top = self.levels.len() - 1;
        let mut stack: Vec<((usize, usize), Vec<bool>)> = vec![((top, 0), vec![])];
        let mut lines = Vec::new();

        while let Some(((level, index), path)) = stack.pop() {
            let mut line = String::new();
            for &more in path.iter().take(path.len().saturating_sub(1)) {
                line.push_str(if more { "│  " } else { "   " });
            }
            if let Some(&more) = path.last() {
                line.push_str(if more { "├─ " } else { "└─ " });
            }
            line.push_str(&format!(
                "{}:{}) {}",
                level,
                index,
                bytes32_to_hex(&self.levels[level][index])
            ));
            lines.push(line);

            if level > 0 {
                let left = 2 * index;
                let right = left + 1;
                let has_right = right < self.levels[level - 1].len();
                if has_right {
                    stack.push(((level - 1, right), [path.clone(), vec![false]].concat()));
                }
                stack.push(((level - 1, left), [path, vec![has_right]].concat()));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::keccak256;
    use crate::proof::verify;
    use alloy_primitives::{Address, U256};
    use serde_json::json;

    fn entries(count: u8) -> Vec<AirdropEntry> {
        (1..=count)
            .map(|i| AirdropEntry::new(Address::repeat_byte(i), U256::from(i as u64 * 100)))
            .collect()
    }

    #[test]
    fn test_empty_entries_rejected() {
        assert!(matches!(
            AirdropTree::of(vec![]),
            Err(MerkleTreeError::EmptyLeaves)
        ));
        assert!(matches!(make_levels(vec![]), Err(MerkleTreeError::EmptyLeaves)));
    }

    #[test]
    fn test_single_entry_root_is_leaf() {
        let entry = entries(1)[0];
        let tree = AirdropTree::of(vec![entry]).unwrap();

        assert_eq!(*tree.root(), entry.leaf());
        assert_eq!(tree.depth(), 1);
        assert!(tree.proof(&entry).unwrap().is_empty());
    }

    #[test]
    fn test_every_entry_verifies() {
        for count in [2, 3, 4, 5, 7, 8, 9, 10, 16, 33] {
            let list = entries(count);
            let tree = AirdropTree::of(list.clone()).unwrap();
            assert_eq!(tree.len(), count as usize);

            for entry in &list {
                let proof = tree.proof(entry).unwrap();
                assert!(tree.verify_proof(entry, &proof));
                assert!(verify(tree.root(), entry.recipient, entry.amount, &proof));
            }
        }
    }

    #[test]
    fn test_root_independent_of_input_order() {
        let list = entries(9);
        let mut reversed = list.clone();
        reversed.reverse();

        let a = AirdropTree::of(list).unwrap();
        let b = AirdropTree::of(reversed).unwrap();
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn test_odd_node_carried_up() {
        let leaves: Vec<Bytes32> = (0..3u8).map(|i| keccak256(&[i])).collect();
        let levels = make_levels(leaves.clone()).unwrap();

        assert_eq!(levels.len(), 3);
        assert_eq!(levels[1][1], leaves[2]);
        assert_eq!(levels[2][0], node_hash(&node_hash(&leaves[0], &leaves[1]), &leaves[2]));

        // the carried leaf has only one sibling on its path
        assert_eq!(level_proof(&levels, 2).unwrap().len(), 1);
        assert_eq!(level_proof(&levels, 0).unwrap().len(), 2);
    }

    #[test]
    fn test_level_proof_out_of_bounds() {
        let levels = make_levels(vec![[1u8; 32], [2u8; 32]]).unwrap();
        assert!(matches!(
            level_proof(&levels, 2),
            Err(MerkleTreeError::IndexOutOfBounds)
        ));
    }

    #[test]
    fn test_duplicate_entries_each_provable() {
        let entry = entries(1)[0];
        let mut list = entries(4);
        list.push(entry);

        let tree = AirdropTree::of(list).unwrap();
        assert_eq!(tree.len(), 5);

        let first = tree.proof_by_index(0).unwrap();
        let dup = tree.proof_by_index(4).unwrap();
        assert!(tree.verify_proof(&entry, &first));
        assert!(tree.verify_proof(&entry, &dup));
    }

    #[test]
    fn test_leaf_not_in_tree() {
        let tree = AirdropTree::of(entries(4)).unwrap();
        let outsider = AirdropEntry::new(Address::repeat_byte(0xee), U256::from(1u64));
        assert!(matches!(
            tree.proof(&outsider),
            Err(MerkleTreeError::LeafNotInTree)
        ));
        assert!(matches!(
            tree.proof_by_index(4),
            Err(MerkleTreeError::IndexOutOfBounds)
        ));
    }

    #[test]
    fn test_tampered_proof_fails() {
        let list = entries(10);
        let tree = AirdropTree::of(list.clone()).unwrap();
        let entry = list[3];
        let proof = tree.proof(&entry).unwrap();

        for i in 0..proof.len() {
            for bit in [0usize, 77, 255] {
                let mut tampered = proof.clone();
                tampered[i][bit / 8] ^= 1 << (bit % 8);
                assert!(!tree.verify_proof(&entry, &tampered));
            }
        }

        let other_proof = tree.proof(&list[4]).unwrap();
        assert!(!tree.verify_proof(&entry, &other_proof));
    }

    #[test]
    fn test_dump_and_load() {
        let tree = AirdropTree::of(entries(7)).unwrap();
        let json_str = serde_json::to_string(&tree.dump()).unwrap();
        let data: AirdropTreeData = serde_json::from_str(&json_str).unwrap();
        let loaded = AirdropTree::load(data).unwrap();

        assert_eq!(tree.root(), loaded.root());
        assert_eq!(tree.len(), loaded.len());
        for (i, entry) in tree.entries() {
            assert_eq!(loaded.at(i), Some(entry));
            assert_eq!(loaded.proof(entry).unwrap(), tree.proof(entry).unwrap());
        }
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let mut data = AirdropTree::of(entries(2)).unwrap().dump();
        data.format = "standard-v1".to_string();
        assert!(matches!(
            AirdropTree::load(data),
            Err(MerkleTreeError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_load_rejects_tampered_amount() {
        let mut data = AirdropTree::of(entries(4)).unwrap().dump();
        data.values[0].entry.amount += U256::from(1u64);
        assert!(matches!(
            AirdropTree::load(data),
            Err(MerkleTreeError::ValueMismatch)
        ));
    }

    #[test]
    fn test_load_rejects_tampered_root() {
        let mut data = AirdropTree::of(entries(4)).unwrap().dump();
        if let Some(root) = data.levels.last_mut() {
            root.0[0][0] ^= 1;
        }
        assert!(matches!(
            AirdropTree::load(data),
            Err(MerkleTreeError::InvalidTree)
        ));
    }

    #[test]
    fn test_from_json_pairs() {
        let tree = AirdropTree::from_json(&[
            vec![json!("0x1111111111111111111111111111111111111111"), json!(100u64)],
            vec![json!("0x2222222222222222222222222222222222222222"), json!("200")],
        ])
        .unwrap();
        assert_eq!(tree.len(), 2);
        assert!(tree.root_hex().starts_with("0x"));
    }

    #[test]
    fn test_tickets_serialize_with_hex_proofs() {
        let tree = AirdropTree::of(entries(3)).unwrap();
        let tickets = tree.tickets().unwrap();
        assert_eq!(tickets.len(), 3);

        let value = serde_json::to_value(&tickets[0]).unwrap();
        assert!(value["recipient"].is_string());
        assert_eq!(value["amount"], json!("100"));
        assert!(value["proof"][0].as_str().unwrap().starts_with("0x"));

        let back: ClaimTicket = serde_json::from_value(value).unwrap();
        assert_eq!(back, tickets[0]);
        assert!(tree.verify_proof(&back.entry, &back.proof));
    }

    #[test]
    fn test_render_tree() {
        let tree = AirdropTree::of(entries(3)).unwrap();
        let rendered = tree.render();
        assert!(rendered.starts_with("2:0) 0x"));
        assert!(rendered.contains("1:1)"));
        assert!(rendered.contains("0:2)"));
        assert_eq!(rendered.lines().count(), 6);
    }
}
