//! The claim engine: root management, eligibility checks and payouts.
//!
//! Every mutating operation takes `&mut self` and either completes or
//! returns an error with no state changed. Read-only checks take `&self`.

use crate::access::{AccessControl, Capability, Role};
use crate::bytes::{Bytes32, bytes32_to_hex};
use crate::config::DistributorConfig;
use crate::custody::{Custody, pay};
use crate::error::{ClaimError, ClaimResult};
use crate::ledger::ClaimLedger;
use crate::proof::verify;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const ZERO_ROOT: Bytes32 = [0u8; 32];

/// Outcome of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReceipt {
    pub recipient: Address,
    /// Amount transferred by this claim.
    pub payout: U256,
    /// Cumulative amount paid to the recipient after this claim.
    pub total_claimed: U256,
}

pub struct AirdropDistributor<C> {
    address: Address,
    airdrop_token: Address,
    airdrop_token_storage: Address,
    merkle_root: Bytes32,
    access: AccessControl,
    ledger: ClaimLedger,
    custody: C,
}

impl<C: Custody> AirdropDistributor<C> {
    /// `address` is the identity the custody holder approved as spender.
    pub fn new(
        address: Address,
        owner: Address,
        airdrop_token: Address,
        airdrop_token_storage: Address,
        custody: C,
    ) -> ClaimResult<Self> {
        if airdrop_token.is_zero() {
            return Err(ClaimError::InvalidConstruction(
                "airdropToken address is zero".into(),
            ));
        }
        if airdrop_token_storage.is_zero() {
            return Err(ClaimError::InvalidConstruction(
                "airdropToken storage address is zero".into(),
            ));
        }
        if address.is_zero() {
            return Err(ClaimError::InvalidConstruction(
                "distributor address is zero".into(),
            ));
        }
        if custody.token() != airdrop_token {
            return Err(ClaimError::InvalidConstruction(format!(
                "custody moves token {}, expected {}",
                custody.token(),
                airdrop_token
            )));
        }

        let access = AccessControl::new(owner)?;
        info!(
            %address,
            %owner,
            token = %airdrop_token,
            storage = %airdrop_token_storage,
            "airdrop distributor created"
        );

        Ok(Self {
            address,
            airdrop_token,
            airdrop_token_storage,
            merkle_root: ZERO_ROOT,
            access,
            ledger: ClaimLedger::new(),
            custody,
        })
    }

    pub fn from_config(
        address: Address,
        owner: Address,
        config: &DistributorConfig,
        custody: C,
    ) -> ClaimResult<Self> {
        Self::new(
            address,
            owner,
            config.airdrop_token_address,
            config.airdrop_token_storage_address,
            custody,
        )
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    pub fn airdrop_token(&self) -> Address {
        self.airdrop_token
    }

    pub fn airdrop_token_storage(&self) -> Address {
        self.airdrop_token_storage
    }

    /// Active root; all zeros until the first update.
    pub fn merkle_root(&self) -> &Bytes32 {
        &self.merkle_root
    }

    pub fn has_active_root(&self) -> bool {
        self.merkle_root != ZERO_ROOT
    }

    pub fn claimed(&self, recipient: Address) -> U256 {
        self.ledger.claimed(recipient)
    }

    pub fn ledger(&self) -> &ClaimLedger {
        &self.ledger
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.access.has_role(role, account)
    }

    /// Replaces the root wholesale. No compatibility with the previous root
    /// is checked.
    pub fn update_root(&mut self, caller: Address, new_root: Bytes32) -> ClaimResult<()> {
        self.access.authorize(caller, Capability::ChangeRoot)?;
        info!(
            sender = %caller,
            previous = %bytes32_to_hex(&self.merkle_root),
            root = %bytes32_to_hex(&new_root),
            "merkle root updated"
        );
        self.merkle_root = new_root;
        Ok(())
    }

    pub fn grant_role(&mut self, caller: Address, role: Role, account: Address) -> ClaimResult<bool> {
        self.access.grant_role(caller, role, account)
    }

    pub fn revoke_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> ClaimResult<bool> {
        self.access.revoke_role(caller, role, account)
    }

    pub fn renounce_role(&mut self, caller: Address, role: Role) -> bool {
        self.access.renounce_role(caller, role)
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> ClaimResult<()> {
        self.access.transfer_ownership(caller, new_owner)
    }

    /// Whether `(recipient, amount)` is committed to by the active root.
    pub fn verify_claim(&self, recipient: Address, amount: U256, proof: &[Bytes32]) -> bool {
        let valid = verify(&self.merkle_root, recipient, amount, proof);
        debug!(%recipient, %amount, valid, "claim proof verified");
        valid
    }

    /// Runs every check `claim` would run, without changing anything.
    /// Returns the payout a claim would transfer.
    pub fn check_claim(
        &self,
        recipient: Address,
        amount: U256,
        proof: &[Bytes32],
    ) -> ClaimResult<U256> {
        if !self.has_active_root() {
            return Err(ClaimError::NoActiveRoot);
        }
        if !self.verify_claim(recipient, amount, proof) {
            return Err(ClaimError::ProofFailed);
        }

        let payout = self.ledger.payout_for(recipient, amount)?;
        self.custody
            .ensure_transferable(self.address, self.airdrop_token_storage, payout)?;
        Ok(payout)
    }

    /// Claims the caller's cumulative entitlement `amount`, paying the part
    /// not yet received.
    pub fn claim(
        &mut self,
        caller: Address,
        amount: U256,
        proof: &[Bytes32],
    ) -> ClaimResult<ClaimReceipt> {
        let payout = self.check_claim(caller, amount, proof).inspect_err(|err| {
            warn!(%caller, %amount, error = %err, "claim rejected");
        })?;

        let already_claimed = amount - payout;
        pay(
            &mut self.custody,
            self.address,
            self.airdrop_token_storage,
            caller,
            payout,
        )?;
        self.ledger
            .compare_and_set(caller, already_claimed, amount)?;

        info!(recipient = %caller, %payout, total = %amount, "airdrop claimed");
        Ok(ClaimReceipt {
            recipient: caller,
            payout,
            total_claimed: amount,
        })
    }
}
