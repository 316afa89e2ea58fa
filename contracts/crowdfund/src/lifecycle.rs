//! # Lifecycle
//!
//! Pure guard functions for the campaign state machine. Each takes the
//! stored [`CampaignState`] plus the current ledger time and decides
//! whether an operation may proceed; none of them touch storage.
//!
//! Expiry is never stored: a campaign is expired whenever
//! `now >= end_time`, evaluated at the top of every gated operation.
//!
//! Check order matters. When several conditions fail at once the first
//! one listed in each guard is reported.

use crate::types::{CampaignState, CampaignStatus, MIN_CONTRIBUTION, ONE_UNIT};
use crate::Error;

pub fn is_expired(now: u64, end_time: u64) -> bool {
    now >= end_time
}

pub fn goal_reached(state: &CampaignState, fundraising_goal: i128) -> bool {
    state.balance >= fundraising_goal
}

/// Derived status. Terminal flags win over the clock.
pub fn status(state: &CampaignState, now: u64, end_time: u64) -> CampaignStatus {
    if state.cancelled {
        CampaignStatus::Cancelled
    } else if state.finished {
        CampaignStatus::Finished
    } else if is_expired(now, end_time) {
        CampaignStatus::Expired
    } else {
        CampaignStatus::Active
    }
}

/// cancelled → expired → finished → below minimum.
pub fn check_contribution(
    state: &CampaignState,
    now: u64,
    end_time: u64,
    amount: i128,
) -> Result<(), Error> {
    if state.cancelled {
        return Err(Error::Cancelled);
    }
    if is_expired(now, end_time) {
        return Err(Error::Expired);
    }
    if state.finished {
        return Err(Error::AlreadyFinished);
    }
    if amount < MIN_CONTRIBUTION {
        return Err(Error::BelowMinimumContribution);
    }
    Ok(())
}

/// already cancelled → expired → finished. Ownership is checked by the caller.
pub fn check_cancel(state: &CampaignState, now: u64, end_time: u64) -> Result<(), Error> {
    if state.cancelled {
        return Err(Error::AlreadyCancelled);
    }
    if is_expired(now, end_time) {
        return Err(Error::Expired);
    }
    if state.finished {
        return Err(Error::AlreadyFinished);
    }
    Ok(())
}

/// Refunds open on cancellation, or on expiry without reaching the goal.
pub fn check_refundable(state: &CampaignState, now: u64, end_time: u64) -> Result<(), Error> {
    if state.cancelled || (is_expired(now, end_time) && !state.finished) {
        Ok(())
    } else {
        Err(Error::NotRefundable)
    }
}

/// Exactly one withdrawal, and only once the goal was reached.
pub fn check_withdrawable(state: &CampaignState) -> Result<(), Error> {
    if !state.finished {
        return Err(Error::NotFinished);
    }
    if state.withdrawn {
        return Err(Error::AlreadyWithdrawn);
    }
    Ok(())
}

/// Badges still claimable: one per whole unit of outstanding contribution,
/// minus those already minted.
pub fn eligible_badges(contribution: i128, minted: u32) -> u32 {
    let earned = contribution.max(0) / ONE_UNIT;
    let remaining = (earned - minted as i128).max(0);
    u32::try_from(remaining).unwrap_or(u32::MAX)
}
