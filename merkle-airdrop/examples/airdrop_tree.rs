//! Airdrop tree example.
//!
//! Builds a tree from `(address, amount)` pairs, prints the root, one proof
//! and the claim tickets a frontend would hand out.
//!
//! Run: `cargo run --example airdrop_tree`

use merkle_airdrop::{AirdropEntry, AirdropTree, AirdropTreeData, bytes::bytes32_to_hex, proof};
use serde_json::json;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> Result<()> {
    // Airdrop data: (address, amount)
    let recipients = vec![
        vec![json!("0x1111111111111111111111111111111111111111"), json!(1000)],
        vec![json!("0x2222222222222222222222222222222222222222"), json!("2500")],
        vec![json!("0x3333333333333333333333333333333333333333"), json!(500)],
        vec![json!("0x4444444444444444444444444444444444444444"), json!("0x2ee")],
        vec![json!("0x5555555555555555555555555555555555555555"), json!(1)],
    ];

    let tree = AirdropTree::from_json(&recipients)?;

    println!("=== Airdrop Merkle Tree ===\n");
    println!("Root: {}", tree.root_hex());
    println!("Recipients: {}\n", tree.len());

    let entry = AirdropEntry::from_json(&recipients[1])?;
    let entry_proof = tree.proof(&entry)?;

    println!("Recipient: {} -> {} tokens", entry.recipient, entry.amount);
    println!("Proof:");
    for (i, hash) in entry_proof.iter().enumerate() {
        println!("  [{}] {}", i, bytes32_to_hex(hash));
    }

    // Verification needs only the root, never the full list
    let valid = proof::verify(tree.root(), entry.recipient, entry.amount, &entry_proof);
    println!("\nProof valid: {}", valid);

    println!("\n=== Tree Structure ===\n");
    println!("{}", tree.render());

    println!("\n=== Claim Tickets ===\n");
    println!("{}", serde_json::to_string_pretty(&tree.tickets()?)?);

    // Persist and reload
    let json_str = serde_json::to_string(&tree.dump())?;
    let loaded = AirdropTree::load(serde_json::from_str::<AirdropTreeData>(&json_str)?)?;
    println!("\nRoots match after reload: {}", tree.root() == loaded.root());

    Ok(())
}
