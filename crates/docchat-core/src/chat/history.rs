//! Reconciliation of the backend's flat history log into sessions.
//!
//! The backend stores one row per message for a category. The UI wants
//! sessions. Every record for a category is folded into a single synthetic
//! session whose id is the category id; the backend's notion of multiple
//! sessions per category is not recovered.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::message::{ChatMessage, ChatSender};
use super::session::ChatSession;

/// One row of `GET /chat/history/{categoryId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub sender: ChatSender,
    pub message: String,
    #[serde(deserialize_with = "deserialize_backend_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl From<&HistoryRecord> for ChatMessage {
    fn from(record: &HistoryRecord) -> Self {
        ChatMessage::new(record.sender, record.message.clone(), record.timestamp)
    }
}

/// Folds a chronologically ordered history log into sessions.
///
/// - empty log: no sessions
/// - otherwise: exactly one session, `id = category_id`, messages mapped 1:1
///   in input order, `start_time` = first message's timestamp
///
/// Pure: the input is not modified and the same input always yields an equal output.
pub fn reconcile(category_id: &str, records: &[HistoryRecord]) -> Vec<ChatSession> {
    let messages: Vec<ChatMessage> = records.iter().map(ChatMessage::from).collect();
    ChatSession::from_messages(category_id, messages)
        .into_iter()
        .collect()
}

/// Decodes the rows of a history response one at a time.
///
/// A row whose sender or timestamp is not recognized is skipped with a
/// warning; the remaining rows keep their order.
pub fn decode_history_rows(rows: Vec<serde_json::Value>) -> Vec<HistoryRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!("[History] Skipping history row {}: {}", index, err);
                None
            }
        })
        .collect()
}

/// Accepts RFC 3339 timestamps and the database's naive `YYYY-MM-DD HH:MM:SS`
/// form, which is UTC.
pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_backend_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_backend_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp '{raw}'")))
}
