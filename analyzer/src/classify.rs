use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use transcript_types::Rating;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classification oracle unavailable: {0}")]
    Unavailable(String),
}

/// The external text-classification oracle, reduced to text-in /
/// text-out. Transport problems are the only failure mode; whatever
/// text comes back is mapped, never retried.
pub trait Oracle {
    fn complete(&self, prompt: &str) -> Result<String, ClassifyError>;
}

/// Chat-completion oracle speaking the OpenAI-style API.
pub struct ChatOracle {
    http: Client,
    url: String,
    api_key: String,
    model: String,
}

impl ChatOracle {
    pub fn new(url: String, api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("build oracle http client")?;
        Ok(Self {
            http,
            url,
            api_key,
            model,
        })
    }
}

impl Oracle for ChatOracle {
    fn complete(&self, prompt: &str) -> Result<String, ClassifyError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ]
        });

        let res = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ClassifyError::Unavailable(e.to_string()))?;

        if !res.status().is_success() {
            return Err(ClassifyError::Unavailable(format!(
                "HTTP {}",
                res.status()
            )));
        }

        let json: Value = res
            .json()
            .map_err(|e| ClassifyError::Unavailable(e.to_string()))?;
        let content = json
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(content.to_string())
    }
}

/// Map a raw oracle reply to a rating. Anything that is not exactly
/// `0` or `1` after trimming is `Exclude` - a valid fallback for
/// unparseable output, not an error.
pub fn rating_from_reply(raw: &str) -> Rating {
    match raw.trim() {
        "0" => Rating::Negative,
        "1" => Rating::Positive,
        _ => Rating::Exclude,
    }
}

fn satisfaction_prompt(report: &str) -> String {
    format!(
        "Analyze the satisfaction of the following text log for the user and provide a score \
         of 0 for (Bad Satisfaction) or 1 for (Positive Satisfaction). A neutral satisfaction \
         should be skewed towards giving 1 for (Positive Satisfaction). Only return 0 or 1, \
         no other characters: {report}"
    )
}

pub struct Classifier<O> {
    oracle: O,
    test_mode: bool,
}

impl<O: Oracle> Classifier<O> {
    pub fn new(oracle: O, test_mode: bool) -> Self {
        Self { oracle, test_mode }
    }

    /// Score one rendered report. In test mode the oracle is never
    /// contacted and every session is `Exclude`.
    pub fn classify(&self, report: &str) -> Result<Rating, ClassifyError> {
        if self.test_mode {
            return Ok(Rating::Exclude);
        }
        let reply = self.oracle.complete(&satisfaction_prompt(report))?;
        Ok(rating_from_reply(&reply))
    }
}
