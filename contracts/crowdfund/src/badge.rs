//! # Badges
//!
//! Non-fungible reward badges. Each campaign is its own collection (named
//! and symbolised after the campaign) but ids are drawn from one counter,
//! so a badge id is unique across every collection.
//!
//! The ledger only ever issues badges; it never burns or moves them.

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::types::{BadgeId, BadgeRecord, CampaignId};

pub trait BadgeIssuer {
    /// Issue a fresh badge to `to` and return its id.
    fn issue(&self, to: &Address) -> BadgeId;

    /// Badges of this collection held by `holder`.
    fn balance_of(&self, holder: &Address) -> u32;
}

pub struct BadgeLedger<'a> {
    env: &'a Env,
    campaign_id: CampaignId,
}

impl<'a> BadgeLedger<'a> {
    pub fn new(env: &'a Env, campaign_id: CampaignId) -> Self {
        BadgeLedger { env, campaign_id }
    }

    /// Look up any badge, whichever collection it belongs to.
    pub fn owner_of(env: &Env, badge_id: BadgeId) -> Option<BadgeRecord> {
        storage::get_badge(env, badge_id)
    }
}

impl BadgeIssuer for BadgeLedger<'_> {
    fn issue(&self, to: &Address) -> BadgeId {
        let badge_id = storage::get_and_increment_badge_id(self.env);
        storage::save_badge(
            self.env,
            &BadgeRecord {
                badge_id,
                campaign_id: self.campaign_id,
                owner: to.clone(),
            },
        );
        let held = self.balance_of(to);
        storage::set_badge_balance(self.env, self.campaign_id, to, held + 1);
        badge_id
    }

    fn balance_of(&self, holder: &Address) -> u32 {
        storage::get_badge_balance(self.env, self.campaign_id, holder)
    }
}
