//! # Ownership
//!
//! Single-owner access control shared by the registry and every campaign.
//!
//! [`Ownable`] is the narrow capability the entry points consume;
//! [`Ownership`] is its only implementation, pointed at one storage slot.
//! Renouncing leaves the slot empty, after which every owner-gated call
//! fails with [`Error::AccessDenied`].

use soroban_sdk::{Address, Env};

use crate::events;
use crate::storage;
use crate::types::CampaignId;
use crate::Error;

pub trait Ownable {
    fn owner(&self) -> Option<Address>;

    /// Reassign ownership. `caller` must be the current owner.
    fn transfer_ownership(&self, caller: &Address, new_owner: &Address) -> Result<(), Error>;

    /// Give up ownership for good. `caller` must be the current owner.
    fn renounce_ownership(&self, caller: &Address) -> Result<(), Error>;

    fn require_owner(&self, caller: &Address) -> Result<(), Error> {
        match self.owner() {
            Some(owner) if owner == *caller => Ok(()),
            _ => Err(Error::AccessDenied),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum OwnerSlot {
    Registry,
    Campaign(CampaignId),
}

pub struct Ownership<'a> {
    env: &'a Env,
    slot: OwnerSlot,
}

impl<'a> Ownership<'a> {
    pub fn registry(env: &'a Env) -> Self {
        Ownership {
            env,
            slot: OwnerSlot::Registry,
        }
    }

    pub fn campaign(env: &'a Env, id: CampaignId) -> Self {
        Ownership {
            env,
            slot: OwnerSlot::Campaign(id),
        }
    }

    /// Record the first owner. Emits the transfer event from `None`.
    pub fn init(&self, owner: &Address) {
        self.write(Some(owner));
        events::emit_ownership_transferred(self.env, self.campaign_id(), None, Some(owner.clone()));
    }

    fn campaign_id(&self) -> Option<CampaignId> {
        match self.slot {
            OwnerSlot::Registry => None,
            OwnerSlot::Campaign(id) => Some(id),
        }
    }

    fn write(&self, owner: Option<&Address>) {
        match self.slot {
            OwnerSlot::Registry => storage::set_registry_owner(self.env, owner),
            OwnerSlot::Campaign(id) => storage::set_campaign_owner(self.env, id, owner),
        }
    }
}

impl Ownable for Ownership<'_> {
    fn owner(&self) -> Option<Address> {
        match self.slot {
            OwnerSlot::Registry => storage::get_registry_owner(self.env),
            OwnerSlot::Campaign(id) => storage::get_campaign_owner(self.env, id),
        }
    }

    fn transfer_ownership(&self, caller: &Address, new_owner: &Address) -> Result<(), Error> {
        self.require_owner(caller)?;
        self.write(Some(new_owner));
        events::emit_ownership_transferred(
            self.env,
            self.campaign_id(),
            Some(caller.clone()),
            Some(new_owner.clone()),
        );
        Ok(())
    }

    fn renounce_ownership(&self, caller: &Address) -> Result<(), Error> {
        self.require_owner(caller)?;
        self.write(None);
        events::emit_ownership_transferred(self.env, self.campaign_id(), Some(caller.clone()), None);
        Ok(())
    }
}
