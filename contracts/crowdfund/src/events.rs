//! # Events
//!
//! Every event is published with a short symbol as its first topic and,
//! for campaign-scoped events, the campaign id as its second topic. The
//! body is one of the structs below. The off-chain indexer keys on these
//! topic symbols, so they must not change.
//!
//! | Topic       | Body                   |
//! |-------------|------------------------|
//! | `created`   | [`CampaignCreated`]    |
//! | `contrib`   | [`Contribution`]       |
//! | `cancelled` | [`CampaignCancelled`]  |
//! | `refunded`  | [`Refund`]             |
//! | `withdrawn` | [`Withdraw`]           |
//! | `badge`     | [`BadgeMinted`]        |
//! | `owner_set` | [`OwnershipTransferred`] |

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::types::{BadgeId, CampaignId};

pub const CREATED: Symbol = symbol_short!("created");
pub const CONTRIBUTED: Symbol = symbol_short!("contrib");
pub const CANCELLED: Symbol = symbol_short!("cancelled");
pub const REFUNDED: Symbol = symbol_short!("refunded");
pub const WITHDRAWN: Symbol = symbol_short!("withdrawn");
pub const BADGE_MINTED: Symbol = symbol_short!("badge");
pub const OWNER_SET: Symbol = symbol_short!("owner_set");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub creator: Address,
    pub campaign_id: CampaignId,
    /// Position in the registry's global list.
    pub index: u64,
    pub fundraising_goal: i128,
    pub end_time: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contribution {
    pub from: Address,
    pub campaign_id: CampaignId,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCancelled {
    pub owner: Address,
    pub campaign_id: CampaignId,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Refund {
    pub to: Address,
    pub campaign_id: CampaignId,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdraw {
    pub to: Address,
    pub campaign_id: CampaignId,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BadgeMinted {
    pub to: Address,
    pub campaign_id: CampaignId,
    pub badge_id: BadgeId,
}

/// `campaign_id` is `None` for the registry's own ownership.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferred {
    pub campaign_id: Option<CampaignId>,
    pub previous_owner: Option<Address>,
    pub new_owner: Option<Address>,
}

pub fn emit_campaign_created(
    env: &Env,
    creator: Address,
    campaign_id: CampaignId,
    fundraising_goal: i128,
    end_time: u64,
) {
    env.events().publish(
        (CREATED, campaign_id),
        CampaignCreated {
            creator,
            campaign_id,
            index: campaign_id,
            fundraising_goal,
            end_time,
        },
    );
}

pub fn emit_contribution(env: &Env, campaign_id: CampaignId, from: Address, amount: i128) {
    env.events().publish(
        (CONTRIBUTED, campaign_id),
        Contribution {
            from,
            campaign_id,
            amount,
        },
    );
}

pub fn emit_cancelled(env: &Env, campaign_id: CampaignId, owner: Address) {
    env.events().publish(
        (CANCELLED, campaign_id),
        CampaignCancelled { owner, campaign_id },
    );
}

pub fn emit_refund(env: &Env, campaign_id: CampaignId, to: Address, amount: i128) {
    env.events().publish(
        (REFUNDED, campaign_id),
        Refund {
            to,
            campaign_id,
            amount,
        },
    );
}

pub fn emit_withdraw(env: &Env, campaign_id: CampaignId, to: Address, amount: i128) {
    env.events().publish(
        (WITHDRAWN, campaign_id),
        Withdraw {
            to,
            campaign_id,
            amount,
        },
    );
}

pub fn emit_badge_minted(env: &Env, campaign_id: CampaignId, to: Address, badge_id: BadgeId) {
    env.events().publish(
        (BADGE_MINTED, campaign_id),
        BadgeMinted {
            to,
            campaign_id,
            badge_id,
        },
    );
}

pub fn emit_ownership_transferred(
    env: &Env,
    campaign_id: Option<CampaignId>,
    previous_owner: Option<Address>,
    new_owner: Option<Address>,
) {
    let body = OwnershipTransferred {
        campaign_id,
        previous_owner,
        new_owner,
    };
    match campaign_id {
        Some(id) => env.events().publish((OWNER_SET, id), body),
        None => env.events().publish((OWNER_SET,), body),
    }
}
