use crate::source::TimeRange;
use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use std::env;
use std::time::Duration;

// ── Defaults ────────────────────────────────────────────────────────────

const DEFAULT_BASE_URL: &str = "https://api.voiceflow.com";
const DEFAULT_ORACLE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_ORACLE_MODEL: &str = "gpt-4o-mini";

/// Reference zone of the original deployment's locale.
const DEFAULT_TIME_ZONE: &str = "America/Toronto";

const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 30;

// ── Config struct ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AnalyzerConfig {
    pub api_key: String,
    pub project_id: String,
    pub base_url: String,
    pub time_range: TimeRange,
    pub tag: Option<String>,
    pub time_zone: Tz,
    pub oracle_url: String,
    pub oracle_key: Option<String>,
    pub oracle_model: String,
    pub oracle_timeout: Duration,
    pub test_mode: bool,
}

impl AnalyzerConfig {
    pub fn from_env() -> Result<Self> {
        let test_mode = env_bool("CSAT_TEST_MODE", false);
        let oracle_key = env_opt("CSAT_ORACLE_KEY");
        if !test_mode && oracle_key.is_none() {
            return Err(anyhow!(
                "CSAT_ORACLE_KEY is required unless CSAT_TEST_MODE is on"
            ));
        }

        let range_raw = env_str("CSAT_TIME_RANGE", "Today");
        let time_range = TimeRange::parse(&range_raw)
            .ok_or_else(|| anyhow!("unrecognized CSAT_TIME_RANGE: {range_raw}"))?;

        let zone_raw = env_str("CSAT_TIME_ZONE", DEFAULT_TIME_ZONE);
        let time_zone = zone_raw
            .parse::<Tz>()
            .map_err(|e| anyhow!("invalid CSAT_TIME_ZONE {zone_raw}: {e}"))?;

        Ok(Self {
            api_key: env::var("CSAT_API_KEY").context("CSAT_API_KEY is required")?,
            project_id: env::var("CSAT_PROJECT_ID").context("CSAT_PROJECT_ID is required")?,
            base_url: env_str("CSAT_BASE_URL", DEFAULT_BASE_URL),
            time_range,
            tag: env_opt("CSAT_TAG"),
            time_zone,
            oracle_url: env_str("CSAT_ORACLE_URL", DEFAULT_ORACLE_URL),
            oracle_key,
            oracle_model: env_str("CSAT_ORACLE_MODEL", DEFAULT_ORACLE_MODEL),
            oracle_timeout: Duration::from_secs(env_u64(
                "CSAT_ORACLE_TIMEOUT_SECS",
                DEFAULT_ORACLE_TIMEOUT_SECS,
            )),
            test_mode,
        })
    }
}

fn env_str(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default.to_string(),
    }
}

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        _ => None,
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(val) => val.parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}
