//! Two-tier authorization: one owner, any number of managers.
//!
//! The owner holds every capability. Managers may only change the root.

use crate::error::{ClaimError, ClaimResult};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

/// Privileged actions on the claim engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    ChangeRoot,
    ManageRoles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Manager,
}

impl Role {
    fn grants(self, capability: Capability) -> bool {
        match self {
            Role::Manager => capability == Capability::ChangeRoot,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessControl {
    owner: Address,
    managers: HashSet<Address>,
}

impl AccessControl {
    pub fn new(owner: Address) -> ClaimResult<Self> {
        if owner.is_zero() {
            return Err(ClaimError::InvalidConstruction(
                "owner address is zero".into(),
            ));
        }
        Ok(Self {
            owner,
            managers: HashSet::new(),
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn has_role(&self, role: Role, account: Address) -> bool {
        match role {
            Role::Manager => self.managers.contains(&account),
        }
    }

    pub fn can(&self, caller: Address, capability: Capability) -> bool {
        caller == self.owner
            || (self.has_role(Role::Manager, caller) && Role::Manager.grants(capability))
    }

    /// The single authorization gate for every privileged mutation.
    pub fn authorize(&self, caller: Address, capability: Capability) -> ClaimResult<()> {
        if self.can(caller, capability) {
            Ok(())
        } else {
            warn!(%caller, ?capability, "unauthorized call rejected");
            Err(ClaimError::Unauthorized { caller, capability })
        }
    }

    /// Returns whether `account` did not hold `role` before.
    pub fn grant_role(&mut self, caller: Address, role: Role, account: Address) -> ClaimResult<bool> {
        self.authorize(caller, Capability::ManageRoles)?;
        let granted = match role {
            Role::Manager => self.managers.insert(account),
        };
        if granted {
            info!(?role, %account, sender = %caller, "role granted");
        }
        Ok(granted)
    }

    /// Returns whether `account` held `role` before.
    pub fn revoke_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> ClaimResult<bool> {
        self.authorize(caller, Capability::ManageRoles)?;
        Ok(self.remove_role(role, account, caller))
    }

    /// Lets an account drop one of its own roles.
    pub fn renounce_role(&mut self, caller: Address, role: Role) -> bool {
        self.remove_role(role, caller, caller)
    }

    fn remove_role(&mut self, role: Role, account: Address, sender: Address) -> bool {
        let revoked = match role {
            Role::Manager => self.managers.remove(&account),
        };
        if revoked {
            info!(?role, %account, %sender, "role revoked");
        }
        revoked
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> ClaimResult<()> {
        self.authorize(caller, Capability::ManageRoles)?;
        if new_owner.is_zero() {
            return Err(ClaimError::InvalidConstruction(
                "new owner address is zero".into(),
            ));
        }
        info!(previous = %self.owner, %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }
}
