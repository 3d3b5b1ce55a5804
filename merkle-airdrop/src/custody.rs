//! Payout asset custody and the payout step of a claim.
//!
//! The claim engine never mints or burns. It moves funds from the custody
//! holder to a recipient through an allowance the holder granted to the
//! engine beforehand.

use crate::error::CustodyError;
use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use tracing::debug;

/// Fungible token balances held outside the claim engine.
pub trait Custody {
    /// Address of the token this custody moves.
    fn token(&self) -> Address;

    fn balance_of(&self, holder: Address) -> U256;

    fn allowance(&self, holder: Address, spender: Address) -> U256;

    /// Moves `amount` from `holder` to `recipient` on behalf of `spender`.
    /// Either every balance and the allowance change, or nothing does.
    fn transfer_from(
        &mut self,
        spender: Address,
        holder: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<(), CustodyError>;

    /// Read-only check that `transfer_from` with the same arguments would
    /// succeed.
    fn ensure_transferable(
        &self,
        spender: Address,
        holder: Address,
        amount: U256,
    ) -> Result<(), CustodyError> {
        let available = self.balance_of(holder);
        if available < amount {
            return Err(CustodyError::InsufficientBalance {
                holder,
                available,
                required: amount,
            });
        }

        let allowance = self.allowance(holder, spender);
        if allowance < amount {
            return Err(CustodyError::InsufficientAllowance {
                holder,
                spender,
                available: allowance,
                required: amount,
            });
        }
        Ok(())
    }
}

/// Moves `amount` of the payout asset from `holder` to `recipient`.
pub fn pay<C: Custody + ?Sized>(
    custody: &mut C,
    spender: Address,
    holder: Address,
    recipient: Address,
    amount: U256,
) -> Result<(), CustodyError> {
    custody.ensure_transferable(spender, holder, amount)?;
    custody.transfer_from(spender, holder, recipient, amount)?;
    debug!(token = %custody.token(), %holder, %recipient, %amount, "payout transferred");
    Ok(())
}

/// Map-backed token ledger with ERC-20 style allowances.
#[derive(Debug, Clone, Default)]
pub struct InMemoryToken {
    address: Address,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

impl InMemoryToken {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    pub fn mint(&mut self, to: Address, amount: U256) {
        *self.balances.entry(to).or_default() += amount;
    }

    pub fn approve(&mut self, holder: Address, spender: Address, amount: U256) {
        self.allowances.insert((holder, spender), amount);
    }

    pub fn total_supply(&self) -> U256 {
        self.balances.values().fold(U256::ZERO, |acc, b| acc + *b)
    }
}

impl Custody for InMemoryToken {
    fn token(&self) -> Address {
        self.address
    }

    fn balance_of(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    fn allowance(&self, holder: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(holder, spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        holder: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<(), CustodyError> {
        self.ensure_transferable(spender, holder, amount)?;

        // an unlimited allowance is never decremented
        let allowance = self.allowance(holder, spender);
        if allowance != U256::MAX {
            self.allowances.insert((holder, spender), allowance - amount);
        }
        *self.balances.entry(holder).or_default() -= amount;
        *self.balances.entry(recipient).or_default() += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Address = Address::new([0x70; 20]);
    const STORAGE: Address = Address::new([0x51; 20]);
    const SPENDER: Address = Address::new([0xd1; 20]);
    const USER: Address = Address::new([0x0a; 20]);

    fn funded(balance: u64, allowance: u64) -> InMemoryToken {
        let mut token = InMemoryToken::new(TOKEN);
        token.mint(STORAGE, U256::from(balance));
        token.approve(STORAGE, SPENDER, U256::from(allowance));
        token
    }

    #[test]
    fn test_pay_moves_funds_and_spends_allowance() {
        let mut token = funded(1_000, 600);
        pay(&mut token, SPENDER, STORAGE, USER, U256::from(250u64)).unwrap();

        assert_eq!(token.balance_of(STORAGE), U256::from(750u64));
        assert_eq!(token.balance_of(USER), U256::from(250u64));
        assert_eq!(token.allowance(STORAGE, SPENDER), U256::from(350u64));
        assert_eq!(token.total_supply(), U256::from(1_000u64));
    }

    #[test]
    fn test_insufficient_balance_changes_nothing() {
        let mut token = funded(100, 1_000);
        let err = pay(&mut token, SPENDER, STORAGE, USER, U256::from(101u64)).unwrap_err();

        assert!(matches!(err, CustodyError::InsufficientBalance { .. }));
        assert_eq!(token.balance_of(STORAGE), U256::from(100u64));
        assert_eq!(token.balance_of(USER), U256::ZERO);
        assert_eq!(token.allowance(STORAGE, SPENDER), U256::from(1_000u64));
    }

    #[test]
    fn test_insufficient_allowance_changes_nothing() {
        let mut token = funded(1_000, 10);
        let err = token
            .transfer_from(SPENDER, STORAGE, USER, U256::from(11u64))
            .unwrap_err();

        assert!(matches!(err, CustodyError::InsufficientAllowance { .. }));
        assert_eq!(token.balance_of(STORAGE), U256::from(1_000u64));
        assert_eq!(token.balance_of(USER), U256::ZERO);
    }

    #[test]
    fn test_unlimited_allowance_not_decremented() {
        let mut token = InMemoryToken::new(TOKEN);
        token.mint(STORAGE, U256::from(10u64));
        token.approve(STORAGE, SPENDER, U256::MAX);

        pay(&mut token, SPENDER, STORAGE, USER, U256::from(4u64)).unwrap();
        assert_eq!(token.allowance(STORAGE, SPENDER), U256::MAX);
    }
}
