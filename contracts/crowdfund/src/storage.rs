//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the ledger.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key             | Type      | Description                           |
//! |-----------------|-----------|---------------------------------------|
//! | `Token`         | `Address` | Funding asset; doubles as init marker |
//! | `RegistryOwner` | `Address` | Owner of the registry itself          |
//! | `CampaignCount` | `u64`     | Next campaign index                   |
//! | `NextBadgeId`   | `u64`     | Next badge identifier                 |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                          | Type             | Description                 |
//! |------------------------------|------------------|-----------------------------|
//! | `CampConfig(id)`             | `CampaignConfig` | Immutable parameters        |
//! | `CampState(id)`              | `CampaignState`  | Balance and lifecycle flags |
//! | `CampOwner(id)`              | `Address`        | Campaign owner              |
//! | `CreatorCampaigns(creator)`  | `Vec<u64>`       | Indices created by `creator`|
//! | `Contribution(id, addr)`     | `i128`           | Outstanding contribution    |
//! | `MintedBadges(id, addr)`     | `u32`            | Badges claimed              |
//! | `BadgeBalance(id, addr)`     | `u32`            | Badges held                 |
//! | `Badge(badge_id)`            | `BadgeRecord`    | Badge provenance            |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Every campaign-scoped key carries the campaign id, so no two campaigns
//! ever read or write the same entry.

use core::fmt::Debug;

use soroban_sdk::{contracttype, Address, Env, IntoVal, TryFromVal, Val, Vec};

use crate::types::{
    BadgeId, BadgeRecord, Campaign, CampaignConfig, CampaignId, CampaignState,
};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Funding asset (Instance).
    Token,
    /// Registry owner (Instance).
    RegistryOwner,
    /// Number of campaigns created so far (Instance).
    CampaignCount,
    /// Badge id counter shared by every collection (Instance).
    NextBadgeId,
    CampConfig(CampaignId),
    CampState(CampaignId),
    CampOwner(CampaignId),
    CreatorCampaigns(Address),
    Contribution(CampaignId, Address),
    MintedBadges(CampaignId, Address),
    BadgeBalance(CampaignId, Address),
    Badge(BadgeId),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Token)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

pub fn get_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub fn get_registry_owner(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::RegistryOwner)
}

pub fn set_registry_owner(env: &Env, owner: Option<&Address>) {
    match owner {
        Some(owner) => env.storage().instance().set(&DataKey::RegistryOwner, owner),
        None => env.storage().instance().remove(&DataKey::RegistryOwner),
    }
    bump_instance(env);
}

pub fn campaign_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0)
}

/// Reads, increments and stores the campaign counter.
/// Returns the index for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> CampaignId {
    let current = campaign_count(env);
    env.storage()
        .instance()
        .set(&DataKey::CampaignCount, &(current + 1));
    current
}

/// Same scheme as the campaign counter, shared by all badge collections.
pub fn get_and_increment_badge_id(env: &Env) -> BadgeId {
    bump_instance(env);
    let current: BadgeId = env
        .storage()
        .instance()
        .get(&DataKey::NextBadgeId)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::NextBadgeId, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn set_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

/// Read a persistent entry, bumping its TTL only when it exists.
fn get_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: TryFromVal<Env, Val>,
    <V as TryFromVal<Env, Val>>::Error: Debug,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

/// Save the parameters and opening state of a new campaign.
pub fn save_campaign(env: &Env, config: &CampaignConfig, state: &CampaignState) {
    set_persistent(env, &DataKey::CampConfig(config.id), config);
    set_persistent(env, &DataKey::CampState(config.id), state);
}

pub fn load_campaign_config(env: &Env, id: CampaignId) -> Result<CampaignConfig, Error> {
    get_persistent(env, &DataKey::CampConfig(id)).ok_or(Error::CampaignNotFound)
}

pub fn load_campaign_state(env: &Env, id: CampaignId) -> Result<CampaignState, Error> {
    get_persistent(env, &DataKey::CampState(id)).ok_or(Error::CampaignNotFound)
}

/// Load config and state together; every mutating entry point needs both.
pub fn load_campaign_pair(
    env: &Env,
    id: CampaignId,
) -> Result<(CampaignConfig, CampaignState), Error> {
    let config = load_campaign_config(env, id)?;
    let state = load_campaign_state(env, id)?;
    Ok((config, state))
}

pub fn save_campaign_state(env: &Env, id: CampaignId, state: &CampaignState) {
    set_persistent(env, &DataKey::CampState(id), state);
}

/// Reassemble the public [`Campaign`] view.
pub fn load_campaign(env: &Env, id: CampaignId) -> Result<Campaign, Error> {
    let (config, state) = load_campaign_pair(env, id)?;
    Ok(Campaign {
        id: config.id,
        creator: config.creator,
        owner: get_campaign_owner(env, id),
        name: config.name,
        description: config.description,
        symbol: config.symbol,
        fundraising_goal: config.fundraising_goal,
        created_at: config.created_at,
        end_time: config.end_time,
        balance: state.balance,
        cancelled: state.cancelled,
        finished: state.finished,
        withdrawn: state.withdrawn,
    })
}

pub fn get_campaign_owner(env: &Env, id: CampaignId) -> Option<Address> {
    get_persistent(env, &DataKey::CampOwner(id))
}

pub fn set_campaign_owner(env: &Env, id: CampaignId, owner: Option<&Address>) {
    let key = DataKey::CampOwner(id);
    match owner {
        Some(owner) => set_persistent(env, &key, owner),
        None => env.storage().persistent().remove(&key),
    }
}

// ── Registry index ───────────────────────────────────────────────────

pub fn get_creator_campaigns(env: &Env, creator: &Address) -> Vec<CampaignId> {
    get_persistent(env, &DataKey::CreatorCampaigns(creator.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

/// Append `id` to the creator's list. Entries are never removed.
pub fn push_creator_campaign(env: &Env, creator: &Address, id: CampaignId) {
    let mut ids = get_creator_campaigns(env, creator);
    ids.push_back(id);
    set_persistent(env, &DataKey::CreatorCampaigns(creator.clone()), &ids);
}

// ── Per-contributor ledger ───────────────────────────────────────────

pub fn get_contribution(env: &Env, id: CampaignId, contributor: &Address) -> i128 {
    get_persistent(env, &DataKey::Contribution(id, contributor.clone())).unwrap_or(0)
}

/// A zero amount removes the entry rather than storing an explicit zero.
pub fn set_contribution(env: &Env, id: CampaignId, contributor: &Address, amount: i128) {
    let key = DataKey::Contribution(id, contributor.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        set_persistent(env, &key, &amount);
    }
}

pub fn get_minted_badges(env: &Env, id: CampaignId, contributor: &Address) -> u32 {
    get_persistent(env, &DataKey::MintedBadges(id, contributor.clone())).unwrap_or(0)
}

pub fn set_minted_badges(env: &Env, id: CampaignId, contributor: &Address, count: u32) {
    set_persistent(env, &DataKey::MintedBadges(id, contributor.clone()), &count);
}

// ── Badge collection ─────────────────────────────────────────────────

pub fn get_badge_balance(env: &Env, id: CampaignId, holder: &Address) -> u32 {
    get_persistent(env, &DataKey::BadgeBalance(id, holder.clone())).unwrap_or(0)
}

pub fn set_badge_balance(env: &Env, id: CampaignId, holder: &Address, count: u32) {
    set_persistent(env, &DataKey::BadgeBalance(id, holder.clone()), &count);
}

pub fn get_badge(env: &Env, badge_id: BadgeId) -> Option<BadgeRecord> {
    get_persistent(env, &DataKey::Badge(badge_id))
}

pub fn save_badge(env: &Env, record: &BadgeRecord) {
    set_persistent(env, &DataKey::Badge(record.badge_id), record);
}
