//! Notification value and its two wire forms.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use console_types::WireId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A feed entry. Only `read` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Deduplication key.
    pub id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            title: title.into(),
            body: String::new(),
            payload: Value::Null,
            read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Convert a live push. Timestamp priority: push timestamp, server
    /// creation time, `received_at`.
    pub fn from_push(event: PushEvent, received_at: DateTime<Utc>) -> Self {
        let created_at = event
            .timestamp
            .as_ref()
            .and_then(parse_timestamp)
            .or_else(|| event.created_at.as_ref().and_then(parse_timestamp))
            .unwrap_or(received_at);
        Self {
            id: event.id.into_string(),
            kind: event.kind,
            title: event.title,
            body: event.body,
            payload: event.payload,
            read: false,
            created_at,
        }
    }

    /// Convert a snapshot entry. Falls back to `received_at` when the server
    /// sent no usable creation time.
    pub fn from_server(item: ServerNotification, received_at: DateTime<Utc>) -> Self {
        let created_at = item
            .created_at
            .as_ref()
            .and_then(parse_timestamp)
            .unwrap_or(received_at);
        Self {
            id: item.id.into_string(),
            kind: item.kind,
            title: item.title,
            body: item.body,
            payload: item.payload,
            read: item.read,
            created_at,
        }
    }

    /// Related campaign, from `campaign_id` or `campaignId` in the payload.
    pub fn campaign_reference(&self) -> Option<String> {
        ["campaign_id", "campaignId"]
            .iter()
            .filter_map(|key| self.payload.get(key))
            .find_map(|value| match value {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// Generic link carried in the payload.
    pub fn link_url(&self) -> Option<&str> {
        self.payload
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.trim().is_empty())
    }
}

/// Notification as returned by the snapshot endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerNotification {
    pub id: WireId,
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "message")]
    pub body: String,
    #[serde(default, alias = "data")]
    pub payload: Value,
    #[serde(default, alias = "isRead", alias = "is_read")]
    pub read: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<Value>,
}

/// Notification as delivered by the live channel.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    pub id: WireId,
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "message")]
    pub body: String,
    #[serde(default, alias = "data")]
    pub payload: Value,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<Value>,
}

impl PushEvent {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: WireId::Text(id.into()),
            kind: kind.into(),
            title: title.into(),
            body: String::new(),
            payload: Value::Null,
            timestamp: None,
            created_at: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Accepts RFC 3339 strings, naive `YYYY-MM-DD HH:MM:SS` strings (read as
/// UTC) and epoch milliseconds.
fn parse_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                        .iter()
                        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                        .map(|naive| Utc.from_utc_datetime(&naive))
                })
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}
