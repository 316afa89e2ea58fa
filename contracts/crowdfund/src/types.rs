//! # Types
//!
//! Shared data structures and ledger constants.
//!
//! ## Config / State split
//!
//! A campaign is stored as two ledger entries:
//!
//! - [`CampaignConfig`]: written once by [`CampaignConfig::new`]; never mutated.
//! - [`CampaignState`]: rewritten by every contribution, cancel, refund and
//!   withdrawal.
//!
//! The owner lives in its own entry (see [`crate::ownable`]) because it is
//! reassignable independently of the lifecycle.
//!
//! ## Lifecycle
//!
//! ```text
//! Active ──► Cancelled
//!   │  └───► Finished
//!   └──(now >= end_time)──► Expired   (derived, never stored)
//! ```

use soroban_sdk::{contracttype, Address, String};

use crate::Error;

/// Registry index of a campaign. Doubles as the campaign's address.
pub type CampaignId = u64;

/// Globally unique badge identifier.
pub type BadgeId = u64;

pub const DAY_IN_SECONDS: u64 = 86_400;

/// Every campaign accepts contributions for exactly this long.
pub const FUNDRAISING_WINDOW: u64 = 30 * DAY_IN_SECONDS;

/// One whole unit of the funding asset, in minor units.
pub const ONE_UNIT: i128 = 1_000_000_000_000_000_000;

/// Smallest accepted contribution (0.01 unit).
pub const MIN_CONTRIBUTION: i128 = ONE_UNIT / 100;

/// Derived lifecycle status of a campaign.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CampaignStatus {
    /// Accepting contributions.
    Active,
    /// Window closed without reaching the goal; contributors may refund.
    Expired,
    /// Cancelled by the owner; contributors may refund.
    Cancelled,
    /// Goal reached; the owner may withdraw.
    Finished,
}

/// Immutable campaign parameters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub id: CampaignId,
    pub creator: Address,
    pub name: String,
    pub description: String,
    pub symbol: String,
    pub fundraising_goal: i128,
    pub created_at: u64,
    pub end_time: u64,
}

impl CampaignConfig {
    /// Build the parameters of a new campaign opened at `now`.
    ///
    /// Rejects empty descriptive strings and a non-positive goal.
    pub fn new(
        id: CampaignId,
        creator: Address,
        name: String,
        description: String,
        symbol: String,
        fundraising_goal: i128,
        now: u64,
    ) -> Result<Self, Error> {
        if name.len() == 0 || description.len() == 0 || symbol.len() == 0 {
            return Err(Error::InvalidParameters);
        }
        if fundraising_goal <= 0 {
            return Err(Error::InvalidParameters);
        }
        let end_time = now
            .checked_add(FUNDRAISING_WINDOW)
            .ok_or(Error::InvalidParameters)?;

        Ok(CampaignConfig {
            id,
            creator,
            name,
            description,
            symbol,
            fundraising_goal,
            created_at: now,
            end_time,
        })
    }
}

/// Mutable campaign ledger summary.
///
/// `balance` always equals the sum of outstanding contributions until the
/// single withdrawal, after which it is zero.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    pub balance: i128,
    pub cancelled: bool,
    pub finished: bool,
    pub withdrawn: bool,
}

impl CampaignState {
    pub fn opened() -> Self {
        CampaignState {
            balance: 0,
            cancelled: false,
            finished: false,
            withdrawn: false,
        }
    }
}

/// Full view of a campaign, reconstructed from its config, state and owner.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Registry index.
    pub id: CampaignId,
    /// Address that created the campaign. Never changes.
    pub creator: Address,
    /// Current owner; `None` once ownership has been renounced.
    pub owner: Option<Address>,
    pub name: String,
    pub description: String,
    /// Symbol of the campaign's badge collection.
    pub symbol: String,
    /// Target amount in minor units.
    pub fundraising_goal: i128,
    pub created_at: u64,
    /// Contributions are rejected from this timestamp on.
    pub end_time: u64,
    /// Funds currently held for this campaign.
    pub balance: i128,
    pub cancelled: bool,
    pub finished: bool,
    pub withdrawn: bool,
}

/// Provenance of an issued badge.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BadgeRecord {
    pub badge_id: BadgeId,
    pub campaign_id: CampaignId,
    pub owner: Address,
}
