use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire model
// ---------------------------------------------------------------------------

/// One entry in a transcript's raw timeline, as the store serves it.
///
/// The payload shape depends on `kind`; fields we do not model are
/// ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<EventPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Text,
    Request,
    #[serde(other)]
    Other,
}

/// The `payload` envelope. For `request` events `kind` carries the
/// sub-tag (`launch`, `intent`, `path-*`, ...); for `text` events it is
/// usually absent and the message sits in `inner`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "payload", default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<InnerPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InnerPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DialogEvent {
    fn payload_kind(&self) -> Option<&str> {
        self.payload.as_ref().and_then(|p| p.kind.as_deref())
    }

    /// A `request` event carrying the `launch` sub-tag marks a session
    /// restart.
    pub fn is_launch(&self) -> bool {
        self.kind == EventKind::Request && self.payload_kind() == Some("launch")
    }

    /// A `request` event whose sub-tag is `intent` or starts with
    /// `path-` represents a user turn.
    pub fn is_user_turn(&self) -> bool {
        if self.kind != EventKind::Request {
            return false;
        }
        match self.payload_kind() {
            Some(tag) => tag == "intent" || tag.starts_with("path-"),
            None => false,
        }
    }

    /// The chatbot message of a `text` event, if present.
    pub fn chat_message(&self) -> Option<&str> {
        if self.kind != EventKind::Text {
            return None;
        }
        self.payload
            .as_ref()
            .and_then(|p| p.inner.as_ref())
            .and_then(|inner| inner.message.as_deref())
    }
}

/// Summary row from the transcript list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Ordered dialogue events of one transcript, in server order.
/// The order is chronological as served and must never be rearranged.
#[derive(Debug, Clone)]
pub struct EventLog {
    pub transcript_id: String,
    pub events: Vec<DialogEvent>,
}

// ---------------------------------------------------------------------------
// Pipeline model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Positive,
    Negative,
    #[default]
    Exclude,
}

impl Rating {
    /// Binary CSAT contribution. `Exclude` contributes nothing, to
    /// numerator or denominator.
    pub fn as_score(self) -> Option<u32> {
        match self {
            Rating::Positive => Some(1),
            Rating::Negative => Some(0),
            Rating::Exclude => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Positive => "Positive",
            Rating::Negative => "Negative",
            Rating::Exclude => "Exclude",
        }
    }
}

/// A contiguous slice of one transcript's events, bounded by launch
/// markers. `report` and `session_date` are filled by rendering;
/// `rating` by classification (and possibly a later human override).
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub events: Vec<DialogEvent>,
    pub report: Option<String>,
    pub session_date: Option<String>,
    pub rating: Rating,
}

impl Session {
    pub fn new(session_id: String, events: Vec<DialogEvent>) -> Self {
        Self {
            session_id,
            events,
            report: None,
            session_date: None,
            rating: Rating::Exclude,
        }
    }
}

/// One fetched transcript and the sessions carved out of it.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub info: TranscriptSummary,
    pub sessions: Vec<Session>,
}

impl Transcript {
    pub fn new(info: TranscriptSummary) -> Self {
        Self {
            info,
            sessions: Vec::new(),
        }
    }
}

/// The tuple handed to the review surface, one per session.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRow {
    pub transcript_id: String,
    pub session_id: String,
    pub rating: Rating,
    pub report: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_store_dialog() {
        let raw = r#"[
            {
                "type": "request",
                "startTime": "2024-03-01T14:02:11+00:00",
                "payload": { "type": "launch" }
            },
            {
                "type": "text",
                "startTime": "2024-03-01T14:02:12+00:00",
                "payload": { "payload": { "message": "Welcome back!" } }
            },
            {
                "type": "request",
                "startTime": "2024-03-01T14:02:20+00:00",
                "payload": {
                    "type": "intent",
                    "payload": { "query": "track my order", "intent": { "name": "Track Order" } }
                }
            },
            {
                "type": "debug",
                "payload": { "type": "flow-start" }
            }
        ]"#;

        let events: Vec<DialogEvent> = serde_json::from_str(raw).expect("should parse");
        assert_eq!(events.len(), 4);
        assert!(events[0].is_launch());
        assert_eq!(events[1].chat_message(), Some("Welcome back!"));
        assert!(events[2].is_user_turn());
        assert_eq!(events[3].kind, EventKind::Other);
        assert!(!events[3].is_user_turn());
    }

    #[test]
    fn path_subtags_are_user_turns() {
        let raw = r#"{
            "type": "request",
            "payload": { "type": "path-abc123", "payload": { "label": "Main Menu" } }
        }"#;
        let event: DialogEvent = serde_json::from_str(raw).expect("should parse");
        assert!(event.is_user_turn());
        assert!(!event.is_launch());
    }

    #[test]
    fn rating_roundtrip_and_score() {
        assert_eq!(Rating::default(), Rating::Exclude);
        assert_eq!(Rating::Positive.as_score(), Some(1));
        assert_eq!(Rating::Negative.as_score(), Some(0));
        assert_eq!(Rating::Exclude.as_score(), None);

        let json = serde_json::to_string(&Rating::Positive).unwrap();
        assert_eq!(json, "\"Positive\"");
        let back: Rating = serde_json::from_str("\"Exclude\"").unwrap();
        assert_eq!(back, Rating::Exclude);
    }

    #[test]
    fn transcript_summary_uses_store_field_names() {
        let raw = r#"{ "_id": "t-42", "createdAt": "2024-03-01T00:00:00Z", "tags": ["vip"] }"#;
        let summary: TranscriptSummary = serde_json::from_str(raw).expect("should parse");
        assert_eq!(summary.id, "t-42");
        assert_eq!(summary.tags, vec!["vip".to_string()]);
    }
}
