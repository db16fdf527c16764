use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use transcript_types::{DialogEvent, Session};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("session has no events")]
    EmptySession,
    #[error("first event has no parseable start time")]
    InvalidTimestamp,
}

/// Output of rendering one session. `report` is the full markdown;
/// `title` is the first user message, pre-uppercasing.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub report: String,
    pub title: String,
    pub session_date: String,
}

/// Render a session to its markdown report.
///
/// Pure in the session's events and the reference zone: the same input
/// always yields byte-identical output.
pub fn render(session: &Session, tz: Tz) -> Result<Rendered, RenderError> {
    let first = session.events.first().ok_or(RenderError::EmptySession)?;
    let start = first
        .start_time
        .as_deref()
        .and_then(parse_instant)
        .ok_or(RenderError::InvalidTimestamp)?;
    let session_date = start
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    let mut title = String::new();
    let mut body = format!("### Date: {session_date}\n\n---\n\n");
    let mut last_user_message = String::new();

    for event in &session.events {
        if let Some(message) = event.chat_message() {
            body.push_str("*Chatbot:* ");
            body.push_str(message);
            body.push_str("\n\n\n");
        }

        if event.is_user_turn() {
            let Some(candidate) = resolve_user_message(event) else {
                tracing::warn!(
                    session_id = %session.session_id,
                    "skipping user turn with no label, query, or intent name"
                );
                continue;
            };
            if title.is_empty() {
                title = candidate.to_string();
            }
            // Collapse consecutive duplicates and drop the terminal
            // "End" marker.
            if candidate != last_user_message && candidate != "End" {
                body.push_str("*User:* ");
                body.push_str(candidate);
                body.push_str("\n\n\n");
                last_user_message = candidate.to_string();
            }
        }
    }

    let report = format!("# {} Report type\n\n{body}", title.to_uppercase());
    Ok(Rendered {
        report,
        title,
        session_date,
    })
}

/// Resolve the user-visible text of a qualifying request event with the
/// ordered fallback `label` -> `query` -> `intent.name`. Empty strings
/// do not satisfy a tier.
pub fn resolve_user_message(event: &DialogEvent) -> Option<&str> {
    let inner = event.payload.as_ref()?.inner.as_ref()?;
    non_empty(inner.label.as_deref())
        .or_else(|| non_empty(inner.query.as_deref()))
        .or_else(|| non_empty(inner.intent.as_ref().and_then(|i| i.name.as_deref())))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Some stores drop the offset; treat bare instants as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
