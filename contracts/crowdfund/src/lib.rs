//! # Crowdfund Ledger Contract
//!
//! A registry that opens independent fundraising campaigns, and the
//! campaigns themselves: per-contributor accounting, a fixed 30 day window,
//! a goal, outcome-gated refunds and withdrawal, and reward badges earned
//! per whole unit contributed.
//!
//! | Phase        | Entry Point(s)                                              |
//! |--------------|-------------------------------------------------------------|
//! | Bootstrap    | [`CrowdfundLedger::init`]                                   |
//! | Registry     | `create_campaign`, `campaign_at`, `campaign_indices_of`     |
//! | Funding      | [`CrowdfundLedger::contribute`]                             |
//! | Outcome      | `cancel`, `refund`, `withdraw`                              |
//! | Rewards      | [`CrowdfundLedger::mint_badge`]                             |
//! | Ownership    | `transfer_ownership`, `transfer_campaign_ownership`, ...    |
//! | Queries      | `get_campaign`, `status`, `contribution_of`, `badge_balance` |
//!
//! ## Architecture
//!
//! Lifecycle decisions live in [`lifecycle`], storage access in
//! [`storage`], access control in [`ownable`] and badge issuance in
//! [`badge`]. This file wires them together and emits events.
//!
//! Every fund movement out of the contract happens after the ledger entries
//! it depends on have been written, so a re-entrant call would already see
//! the zeroed contribution or the `withdrawn` flag.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, log, token, Address, Env, String, Vec};

pub mod badge;
pub mod events;
pub mod lifecycle;
pub mod ownable;
mod storage;
mod types;

#[cfg(test)]
mod test_badges;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_registry;

use badge::{BadgeIssuer, BadgeLedger};
use ownable::{Ownable, Ownership};
pub use types::{
    BadgeId, BadgeRecord, Campaign, CampaignConfig, CampaignId, CampaignState, CampaignStatus,
    FUNDRAISING_WINDOW, MIN_CONTRIBUTION, ONE_UNIT,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AccessDenied             = 1,
    AlreadyCancelled         = 2,
    AlreadyFinished          = 3,
    Expired                  = 4,
    BelowMinimumContribution = 5,
    NotRefundable            = 6,
    NoContribution           = 7,
    NotFinished              = 8,
    NoEligibleBadge          = 9,
    AlreadyWithdrawn         = 10,
    Cancelled                = 11,
    CampaignNotFound         = 12,
    InvalidParameters        = 13,
    AlreadyInitialized       = 14,
    NotInitialized           = 15,
}

impl Error {
    /// Human-readable reason, for clients that surface failures to users.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::AccessDenied => "Ownable: caller is not the owner",
            Error::AlreadyCancelled | Error::Cancelled => "Project: project is cancelled",
            Error::AlreadyFinished => "Project: project has finished",
            Error::Expired => "Project: time limit for project expired",
            Error::BelowMinimumContribution => "Project: contribution must be >= 0.01 unit",
            Error::NotRefundable => "Project: refunds are not open",
            Error::NoContribution => "Project: no contribution to refund",
            Error::NotFinished => "Project: project has not reached its goal",
            Error::NoEligibleBadge => "Project: no badge available to mint",
            Error::AlreadyWithdrawn => "Project: funds already withdrawn",
            Error::CampaignNotFound => "Registry: campaign does not exist",
            Error::InvalidParameters => "Registry: invalid campaign parameters",
            Error::AlreadyInitialized => "Registry: already initialized",
            Error::NotInitialized => "Registry: not initialized",
        }
    }
}

#[contract]
pub struct CrowdfundLedger;

#[contractimpl]
impl CrowdfundLedger {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Set the registry owner and the funding asset.
    ///
    /// Must be called exactly once after deployment.
    pub fn init(env: Env, owner: Address, token: Address) -> Result<(), Error> {
        owner.require_auth();
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        storage::set_token(&env, &token);
        Ownership::registry(&env).init(&owner);

        log!(&env, "crowdfund ledger initialised", owner, token);
        Ok(())
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Registry ownership
    // ─────────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Option<Address> {
        Ownership::registry(&env).owner()
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        caller.require_auth();
        Ownership::registry(&env).transfer_ownership(&caller, &new_owner)
    }

    pub fn renounce_ownership(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        Ownership::registry(&env).renounce_ownership(&caller)
    }

    // ─────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────

    /// Open a new campaign owned by `creator`.
    ///
    /// Open to any address. The returned id is also the campaign's index in
    /// the global list.
    pub fn create_campaign(
        env: Env,
        creator: Address,
        name: String,
        description: String,
        symbol: String,
        fundraising_goal: i128,
    ) -> Result<CampaignId, Error> {
        creator.require_auth();
        if !storage::is_initialized(&env) {
            return Err(Error::NotInitialized);
        }

        let id = storage::campaign_count(&env);
        let config = CampaignConfig::new(
            id,
            creator.clone(),
            name,
            description,
            symbol,
            fundraising_goal,
            env.ledger().timestamp(),
        )?;
        storage::get_and_increment_campaign_id(&env);

        storage::save_campaign(&env, &config, &CampaignState::opened());
        Ownership::campaign(&env, id).init(&creator);
        storage::push_creator_campaign(&env, &creator, id);

        log!(&env, "campaign opened", id, creator, fundraising_goal);
        events::emit_campaign_created(&env, creator, id, fundraising_goal, config.end_time);
        Ok(id)
    }

    pub fn campaign_count(env: Env) -> u64 {
        storage::campaign_count(&env)
    }

    pub fn campaign_at(env: Env, index: u64) -> Result<Campaign, Error> {
        if index >= storage::campaign_count(&env) {
            return Err(Error::CampaignNotFound);
        }
        storage::load_campaign(&env, index)
    }

    /// Indices of every campaign `creator` has opened, oldest first.
    pub fn campaign_indices_of(env: Env, creator: Address) -> Vec<CampaignId> {
        storage::get_creator_campaigns(&env, &creator)
    }

    // ─────────────────────────────────────────────────────────
    // Campaign queries
    // ─────────────────────────────────────────────────────────

    pub fn get_campaign(env: Env, campaign_id: CampaignId) -> Result<Campaign, Error> {
        storage::load_campaign(&env, campaign_id)
    }

    pub fn status(env: Env, campaign_id: CampaignId) -> Result<CampaignStatus, Error> {
        let (config, state) = storage::load_campaign_pair(&env, campaign_id)?;
        Ok(lifecycle::status(&state, env.ledger().timestamp(), config.end_time))
    }

    pub fn is_cancelled(env: Env, campaign_id: CampaignId) -> Result<bool, Error> {
        Ok(storage::load_campaign_state(&env, campaign_id)?.cancelled)
    }

    pub fn is_finished(env: Env, campaign_id: CampaignId) -> Result<bool, Error> {
        Ok(storage::load_campaign_state(&env, campaign_id)?.finished)
    }

    pub fn contribution_of(env: Env, campaign_id: CampaignId, contributor: Address) -> i128 {
        storage::get_contribution(&env, campaign_id, &contributor)
    }

    pub fn minted_badges_of(env: Env, campaign_id: CampaignId, contributor: Address) -> u32 {
        storage::get_minted_badges(&env, campaign_id, &contributor)
    }

    pub fn eligible_badges(env: Env, campaign_id: CampaignId, contributor: Address) -> u32 {
        lifecycle::eligible_badges(
            storage::get_contribution(&env, campaign_id, &contributor),
            storage::get_minted_badges(&env, campaign_id, &contributor),
        )
    }

    pub fn badge_balance(env: Env, campaign_id: CampaignId, holder: Address) -> u32 {
        BadgeLedger::new(&env, campaign_id).balance_of(&holder)
    }

    pub fn badge_owner(env: Env, badge_id: BadgeId) -> Option<BadgeRecord> {
        BadgeLedger::owner_of(&env, badge_id)
    }

    // ─────────────────────────────────────────────────────────
    // Campaign ownership
    // ─────────────────────────────────────────────────────────

    pub fn campaign_owner(env: Env, campaign_id: CampaignId) -> Result<Option<Address>, Error> {
        storage::load_campaign_config(&env, campaign_id)?;
        Ok(Ownership::campaign(&env, campaign_id).owner())
    }

    pub fn transfer_campaign_ownership(
        env: Env,
        campaign_id: CampaignId,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), Error> {
        caller.require_auth();
        storage::load_campaign_config(&env, campaign_id)?;
        Ownership::campaign(&env, campaign_id).transfer_ownership(&caller, &new_owner)
    }

    pub fn renounce_campaign_ownership(
        env: Env,
        campaign_id: CampaignId,
        caller: Address,
    ) -> Result<(), Error> {
        caller.require_auth();
        storage::load_campaign_config(&env, campaign_id)?;
        Ownership::campaign(&env, campaign_id).renounce_ownership(&caller)
    }

    // ─────────────────────────────────────────────────────────
    // Campaign operations
    // ─────────────────────────────────────────────────────────

    /// Move `amount` of the funding asset from `contributor` into the campaign.
    ///
    /// Marks the campaign finished once its balance reaches the goal.
    pub fn contribute(
        env: Env,
        campaign_id: CampaignId,
        contributor: Address,
        amount: i128,
    ) -> Result<(), Error> {
        contributor.require_auth();

        let (config, mut state) = storage::load_campaign_pair(&env, campaign_id)?;
        lifecycle::check_contribution(&state, env.ledger().timestamp(), config.end_time, amount)?;

        let total = storage::get_contribution(&env, campaign_id, &contributor) + amount;
        storage::set_contribution(&env, campaign_id, &contributor, total);

        state.balance += amount;
        if lifecycle::goal_reached(&state, config.fundraising_goal) {
            state.finished = true;
            log!(&env, "campaign reached its goal", campaign_id, state.balance);
        }
        storage::save_campaign_state(&env, campaign_id, &state);

        token_client(&env)?.transfer(&contributor, &env.current_contract_address(), &amount);

        events::emit_contribution(&env, campaign_id, contributor, amount);
        Ok(())
    }

    /// Cancel a live, unfunded campaign. Owner only.
    pub fn cancel(env: Env, campaign_id: CampaignId, caller: Address) -> Result<(), Error> {
        caller.require_auth();

        let (config, mut state) = storage::load_campaign_pair(&env, campaign_id)?;
        Ownership::campaign(&env, campaign_id).require_owner(&caller)?;
        lifecycle::check_cancel(&state, env.ledger().timestamp(), config.end_time)?;

        state.cancelled = true;
        storage::save_campaign_state(&env, campaign_id, &state);

        log!(&env, "campaign cancelled", campaign_id);
        events::emit_cancelled(&env, campaign_id, caller);
        Ok(())
    }

    /// Return the caller's whole outstanding contribution.
    ///
    /// Open once the campaign is cancelled, or once it expired short of its
    /// goal. The contribution entry is cleared before the transfer.
    pub fn refund(env: Env, campaign_id: CampaignId, contributor: Address) -> Result<i128, Error> {
        contributor.require_auth();

        let (config, mut state) = storage::load_campaign_pair(&env, campaign_id)?;
        lifecycle::check_refundable(&state, env.ledger().timestamp(), config.end_time)?;

        let amount = storage::get_contribution(&env, campaign_id, &contributor);
        if amount <= 0 {
            return Err(Error::NoContribution);
        }

        storage::set_contribution(&env, campaign_id, &contributor, 0);
        state.balance -= amount;
        storage::save_campaign_state(&env, campaign_id, &state);

        token_client(&env)?.transfer(&env.current_contract_address(), &contributor, &amount);

        events::emit_refund(&env, campaign_id, contributor, amount);
        Ok(amount)
    }

    /// Send the whole balance of a finished campaign to its owner.
    ///
    /// Succeeds once; later calls fail with [`Error::AlreadyWithdrawn`].
    pub fn withdraw(env: Env, campaign_id: CampaignId, caller: Address) -> Result<i128, Error> {
        caller.require_auth();

        let mut state = storage::load_campaign_state(&env, campaign_id)?;
        Ownership::campaign(&env, campaign_id).require_owner(&caller)?;
        lifecycle::check_withdrawable(&state)?;

        let amount = state.balance;
        state.balance = 0;
        state.withdrawn = true;
        storage::save_campaign_state(&env, campaign_id, &state);

        if amount > 0 {
            token_client(&env)?.transfer(&env.current_contract_address(), &caller, &amount);
        }

        log!(&env, "campaign funds withdrawn", campaign_id, amount);
        events::emit_withdraw(&env, campaign_id, caller, amount);
        Ok(amount)
    }

    /// Claim one badge for a whole unit of outstanding contribution.
    ///
    /// Not gated by the lifecycle: contributors can claim after a
    /// cancellation or a withdrawal, as long as their contribution stands.
    pub fn mint_badge(
        env: Env,
        campaign_id: CampaignId,
        contributor: Address,
    ) -> Result<BadgeId, Error> {
        contributor.require_auth();
        storage::load_campaign_config(&env, campaign_id)?;

        let contribution = storage::get_contribution(&env, campaign_id, &contributor);
        let minted = storage::get_minted_badges(&env, campaign_id, &contributor);
        if lifecycle::eligible_badges(contribution, minted) == 0 {
            return Err(Error::NoEligibleBadge);
        }

        storage::set_minted_badges(&env, campaign_id, &contributor, minted + 1);
        let badge_id = BadgeLedger::new(&env, campaign_id).issue(&contributor);

        events::emit_badge_minted(&env, campaign_id, contributor, badge_id);
        Ok(badge_id)
    }
}

fn token_client(env: &Env) -> Result<token::Client<'_>, Error> {
    Ok(token::Client::new(env, &storage::get_token(env)?))
}
