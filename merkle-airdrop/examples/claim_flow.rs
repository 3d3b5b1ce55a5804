//! Claim flow example.
//!
//! Publishes a root, claims it, raises the entitlement in a second root and
//! claims again: the second payout is only the increase.
//!
//! Run: `cargo run --example claim_flow`

use alloy_primitives::{Address, U256};
use merkle_airdrop::{
    AirdropDistributor, AirdropEntry, AirdropTree, ClaimError, Custody, InMemoryToken, Role,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> Result<()> {
    let owner = Address::repeat_byte(0x01);
    let manager = Address::repeat_byte(0x02);
    let user = Address::repeat_byte(0x03);
    let token_address = Address::repeat_byte(0x70);
    let storage = Address::repeat_byte(0x51);
    let distributor_address = Address::repeat_byte(0xd1);

    let funding = U256::from(1_000_000u64);
    let mut token = InMemoryToken::new(token_address);
    token.mint(storage, funding);
    token.approve(storage, distributor_address, funding);

    let mut distributor =
        AirdropDistributor::new(distributor_address, owner, token_address, storage, token)?;
    distributor.grant_role(owner, Role::Manager, manager)?;

    let others: Vec<AirdropEntry> = (0x10..0x19u8)
        .map(|i| AirdropEntry::new(Address::repeat_byte(i), U256::from(i as u64 * 10)))
        .collect();

    for amount in [100u64, 300] {
        let entry = AirdropEntry::new(user, U256::from(amount));
        let mut entries = others.clone();
        entries.push(entry);

        let tree = AirdropTree::of(entries)?;
        distributor.update_root(manager, *tree.root())?;
        println!("Root updated to {}", tree.root_hex());

        let proof = tree.proof(&entry)?;
        let receipt = distributor.claim(user, entry.amount, &proof)?;
        println!(
            "Claimed {} (cumulative {}), storage balance {}",
            receipt.payout,
            receipt.total_claimed,
            distributor.custody().balance_of(storage)
        );

        // A replay is rejected with the reason
        match distributor.claim(user, entry.amount, &proof) {
            Err(err @ ClaimError::AlreadyClaimed { .. }) => println!("Replay rejected: {err}"),
            other => println!("Unexpected replay result: {other:?}"),
        }
    }

    println!("User balance: {}", distributor.custody().balance_of(user));
    Ok(())
}
