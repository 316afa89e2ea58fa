//! Canonical event types emitted by the crowdfund ledger contract.
//!
//! These mirror the topics published from `contracts/crowdfund/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdfund contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A campaign was opened by the registry (`created` topic).
    CampaignCreated,
    /// Funds were contributed to a campaign (`contrib` topic).
    Contribution,
    /// The campaign owner cancelled (`cancelled` topic).
    CampaignCancelled,
    /// A contributor took their funds back (`refunded` topic).
    Refund,
    /// The owner collected a finished campaign (`withdrawn` topic).
    Withdraw,
    /// A reward badge was issued (`badge` topic).
    BadgeMinted,
    /// Registry or campaign ownership changed (`owner_set` topic).
    OwnershipTransferred,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "contrib" => Self::Contribution,
            "cancelled" => Self::CampaignCancelled,
            "refunded" => Self::Refund,
            "withdrawn" => Self::Withdraw,
            "badge" => Self::BadgeMinted,
            "owner_set" => Self::OwnershipTransferred,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::Contribution => "contribution",
            Self::CampaignCancelled => "campaign_cancelled",
            Self::Refund => "refund",
            Self::Withdraw => "withdraw",
            Self::BadgeMinted => "badge_minted",
            Self::OwnershipTransferred => "ownership_transferred",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded crowdfund event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    /// RPC event id, or a key derived from the event's contents.
    pub event_id: String,
    pub event_type: String,
    /// `None` for registry-level events.
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    /// Minor units, kept as a decimal string since it can exceed `i64`.
    pub amount: Option<String>,
    pub badge_id: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub badge_id: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
