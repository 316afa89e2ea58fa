//! Soroban RPC client — polls `getEvents` and decodes crowdfund events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//! * JSON-RPC codes -32600 / -32601 mean the request itself is wrong and are
//!   returned to the caller instead of retried.
//!
//! ## Value shapes
//!
//! Depending on the RPC version and `xdrFormat`, topics and bodies arrive as
//! base64 XDR, as typed JSON (`{"symbol":"created"}`,
//! `{"map":[{"key":…,"val":…}]}`) or as the older `{"type":…,"value":…}`
//! objects. Decoding accepts all three.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{CampaignEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// XDR discriminants of the `ScVal` arms that appear in our topics.
const SCV_U64: u32 = 5;
const SCV_SYMBOL: u32 = 15;

/// Type tags used by the typed JSON rendering of `ScVal`.
const SCVAL_TAGS: &[&str] = &[
    "bool", "u32", "i32", "u64", "i64", "timepoint", "duration", "u128", "i128", "u256",
    "i256", "bytes", "string", "symbol", "address", "vec", "error",
];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list; each entry is base64 XDR or decoded JSON.
    #[serde(alias = "topicJson")]
    pub topic: Vec<Value>,
    /// Event body; base64 XDR or decoded JSON.
    #[serde(alias = "valueJson")]
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive).
/// * `cursor`       — optional opaque pagination cursor from a previous response.
/// * `limit`        — maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                backoff = sleep_backoff(backoff).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {backoff}s)");
            backoff = sleep_backoff(backoff).await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if is_hard_error(err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            warn!(
                "RPC soft error (will retry in {backoff}s): {} {}",
                err.code, err.message
            );
            backoff = sleep_backoff(backoff).await;
            continue;
        }

        let result = body
            .result
            .ok_or_else(|| IndexerError::EventParse("Empty result from getEvents".to_string()))?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok((result.events, result.cursor, result.latest_ledger));
    }
}

fn is_hard_error(code: i64) -> bool {
    code == -32600 || code == -32601
}

async fn sleep_backoff(current: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(current)).await;
    next_backoff(current)
}

fn next_backoff(current: u64) -> u64 {
    (current * 2).min(MAX_BACKOFF_SECS)
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`CampaignEvent`] structs.
///
/// Events from failed contract calls are dropped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<CampaignEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<CampaignEvent> {
    // Leading topic symbol determines the event type.
    let kind = EventKind::from_topic(&extract_symbol(raw.topic.first()?)?);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let campaign_id = raw.topic.get(1).and_then(extract_u64_or_raw);
    let body = flatten(&raw.value);
    let fields = decode_data(&body, kind);
    let tx_hash = raw.tx_hash.as_deref().map(normalize_tx_hash);

    let event_id = raw.id.clone().unwrap_or_else(|| {
        [
            ledger.to_string(),
            tx_hash.clone().unwrap_or_default(),
            kind.as_str().to_string(),
            campaign_id.clone().unwrap_or_default(),
            fields.actor.clone().unwrap_or_default(),
            fields.amount.clone().unwrap_or_default(),
            fields.badge_id.clone().unwrap_or_default(),
        ]
        .join(":")
    });

    Some(CampaignEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        campaign_id,
        actor: fields.actor,
        amount: fields.amount,
        badge_id: fields.badge_id,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash,
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
struct EventFields {
    actor: Option<String>,
    amount: Option<String>,
    badge_id: Option<String>,
}

/// Pick the indexed columns out of a flattened event body.
fn decode_data(body: &Value, kind: EventKind) -> EventFields {
    match kind {
        EventKind::CampaignCreated => EventFields {
            actor: extract_field(body, &["creator"]),
            amount: extract_field(body, &["fundraising_goal"]),
            badge_id: None,
        },
        EventKind::Contribution => EventFields {
            actor: extract_field(body, &["from"]),
            amount: extract_field(body, &["amount"]),
            badge_id: None,
        },
        EventKind::Refund | EventKind::Withdraw => EventFields {
            actor: extract_field(body, &["to"]),
            amount: extract_field(body, &["amount"]),
            badge_id: None,
        },
        EventKind::CampaignCancelled => EventFields {
            actor: extract_field(body, &["owner"]),
            ..EventFields::default()
        },
        EventKind::BadgeMinted => EventFields {
            actor: extract_field(body, &["to"]),
            amount: None,
            badge_id: extract_field(body, &["badge_id"]),
        },
        // A renounce has no new owner; attribute it to the one who gave up.
        EventKind::OwnershipTransferred => EventFields {
            actor: extract_field(body, &["new_owner", "previous_owner"]),
            ..EventFields::default()
        },
        EventKind::Unknown => EventFields::default(),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(scalar_to_string)
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reduce a typed JSON `ScVal` to plain JSON.
///
/// `{"map":[{"key":{"symbol":"amount"},"val":{"i128":"5"}}]}` becomes
/// `{"amount":"5"}`; single-key type wrappers such as `{"u64":"7"}` or
/// `{"address":"G…"}` collapse to their inner value and `"void"` becomes
/// `null`. Anything already plain is returned unchanged.
fn flatten(value: &Value) -> Value {
    match value {
        Value::String(s) if s == "void" => Value::Null,
        Value::Object(obj) => {
            if let Some(Value::Array(entries)) = obj.get("map") {
                let mut out = Map::new();
                for entry in entries {
                    let key = entry.get("key").map(flatten);
                    if let Some(Value::String(key)) = key {
                        let val = entry.get("val").map(flatten).unwrap_or(Value::Null);
                        out.insert(key, val);
                    }
                }
                return Value::Object(out);
            }
            if let Some(inner) = obj.get("value") {
                return flatten(inner);
            }
            if obj.len() == 1 {
                if let Some((tag, inner)) = obj.iter().next() {
                    if SCVAL_TAGS.contains(&tag.as_str()) {
                        return flatten(inner);
                    }
                }
            }
            Value::Object(obj.iter().map(|(k, v)| (k.clone(), flatten(v))).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(flatten).collect()),
        other => other.clone(),
    }
}

/// Extract a Soroban Symbol from a topic entry.
///
/// Accepts `{"symbol":"created"}`, `{"type":"symbol","value":"created"}`,
/// a base64 XDR `ScVal::Symbol`, a JSON string holding any of those, or the
/// bare symbol text.
fn extract_symbol(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => {
            if let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(s) {
                return extract_symbol(&parsed);
            }
            Some(decode_xdr_symbol(s).unwrap_or_else(|| s.clone()))
        }
        Value::Object(_) => match flatten(raw) {
            Value::String(s) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

/// Extract the campaign id from a topic entry.
fn extract_u64_or_raw(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => {
            if let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(s) {
                return extract_u64_or_raw(&parsed);
            }
            Some(
                decode_xdr_u64(s)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| s.clone()),
            )
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(_) => scalar_to_string(&flatten(raw)),
        _ => None,
    }
}

fn xdr_arm(b64: &str, discriminant: u32) -> Option<Vec<u8>> {
    let bytes = BASE64.decode(b64).ok()?;
    let (head, rest) = bytes.split_first_chunk::<4>()?;
    (u32::from_be_bytes(*head) == discriminant).then(|| rest.to_vec())
}

fn decode_xdr_symbol(b64: &str) -> Option<String> {
    let body = xdr_arm(b64, SCV_SYMBOL)?;
    let (len, rest) = body.split_first_chunk::<4>()?;
    let len = u32::from_be_bytes(*len) as usize;
    let text = rest.get(..len)?;
    String::from_utf8(text.to_vec()).ok()
}

fn decode_xdr_u64(b64: &str) -> Option<u64> {
    let body = xdr_arm(b64, SCV_U64)?;
    let (value, _) = body.split_first_chunk::<8>()?;
    Some(u64::from_be_bytes(*value))
}

/// Lower-case hex hashes so the same transaction always indexes identically.
fn normalize_tx_hash(raw: &str) -> String {
    match hex::decode(raw.trim()) {
        Ok(bytes) => hex::encode(bytes),
        Err(_) => raw.trim().to_string(),
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
