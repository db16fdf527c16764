use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use thiserror::Error;
use transcript_types::{DialogEvent, EventLog, TranscriptSummary};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("transcript store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("transcript store returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// The store's fixed time-range vocabulary for the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    AllTime,
}

impl TimeRange {
    pub fn as_query(self) -> &'static str {
        match self {
            TimeRange::Today => "Today",
            TimeRange::Yesterday => "Yesterday",
            TimeRange::Last7Days => "Last 7 Days",
            TimeRange::Last30Days => "Last 30 Days",
            TimeRange::AllTime => "All Time",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Today" => Some(TimeRange::Today),
            "Yesterday" => Some(TimeRange::Yesterday),
            "Last 7 Days" => Some(TimeRange::Last7Days),
            "Last 30 Days" => Some(TimeRange::Last30Days),
            "All Time" => Some(TimeRange::AllTime),
            _ => None,
        }
    }
}

/// Read side of the transcript store: list what arrived in a range,
/// then fetch each dialog by id.
pub trait TranscriptSource {
    fn list_transcripts(
        &self,
        range: TimeRange,
        tag: Option<&str>,
    ) -> Result<Vec<TranscriptSummary>, SourceError>;

    fn fetch_dialog(&self, transcript_id: &str) -> Result<EventLog, SourceError>;
}

/// Blocking HTTP client for the hosted transcript store.
pub struct StoreClient {
    http: Client,
    base_url: String,
    api_key: String,
    project_id: String,
}

impl StoreClient {
    pub fn new(base_url: String, api_key: String, project_id: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
            project_id,
        }
    }
}

impl TranscriptSource for StoreClient {
    fn list_transcripts(
        &self,
        range: TimeRange,
        tag: Option<&str>,
    ) -> Result<Vec<TranscriptSummary>, SourceError> {
        let url = format!("{}/v2/transcripts/{}", self.base_url, self.project_id);
        let mut request = self
            .http
            .get(url)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, "application/json")
            .query(&[("range", range.as_query())]);
        if let Some(tag) = tag {
            request = request.query(&[("tag", tag)]);
        }

        let res = request.send()?;
        if !res.status().is_success() {
            return Err(SourceError::Status(res.status()));
        }
        Ok(res.json()?)
    }

    fn fetch_dialog(&self, transcript_id: &str) -> Result<EventLog, SourceError> {
        let url = format!(
            "{}/v2/transcripts/{}/{}",
            self.base_url, self.project_id, transcript_id
        );
        let res = self
            .http
            .get(url)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()?;
        if !res.status().is_success() {
            return Err(SourceError::Status(res.status()));
        }

        let events: Vec<DialogEvent> = res.json()?;
        Ok(EventLog {
            transcript_id: transcript_id.to_string(),
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_query_values_match_the_store() {
        assert_eq!(TimeRange::Today.as_query(), "Today");
        assert_eq!(TimeRange::Last7Days.as_query(), "Last 7 Days");
        assert_eq!(TimeRange::AllTime.as_query(), "All Time");
    }

    #[test]
    fn time_range_parses_its_own_vocabulary() {
        for range in [
            TimeRange::Today,
            TimeRange::Yesterday,
            TimeRange::Last7Days,
            TimeRange::Last30Days,
            TimeRange::AllTime,
        ] {
            assert_eq!(TimeRange::parse(range.as_query()), Some(range));
        }
        assert_eq!(TimeRange::parse("last week"), None);
        assert_eq!(TimeRange::parse(" Today "), Some(TimeRange::Today));
    }
}
