//! Live flight status lookup
//!
//! Best-effort client for the AviationStack `flights` endpoint. Every failure
//! is logged and turned into an empty result so callers never block on it.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::normalize_code;

/// Default AviationStack endpoint
pub const DEFAULT_STATUS_URL: &str = "http://api.aviationstack.com/v1/flights";

/// Default timeout for status requests
pub const DEFAULT_STATUS_TIMEOUT_SECONDS: u64 = 30;

/// Connection settings for the status service
#[derive(Debug, Clone, PartialEq)]
pub struct StatusConfig {
    /// Service access key; lookups are skipped without one
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_STATUS_URL.to_string(),
            timeout_seconds: DEFAULT_STATUS_TIMEOUT_SECONDS,
        }
    }
}

impl StatusConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

/// One live flight between the requested airports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRecord {
    pub airline: String,
    pub flight_number: String,
    pub departure_scheduled: String,
    pub arrival_scheduled: String,
    pub status: String,
}

/// Source of live flight status records
pub trait StatusSource {
    /// Flights from `dep` to `arr`; empty when none are found or the lookup fails
    fn fetch_status(&self, dep: &str, arr: &str) -> Vec<StatusRecord>;
}

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("undecodable response: {0}")]
    Decode(String),

    #[error("service error: {0}")]
    Api(String),
}

/// HTTP client for the AviationStack flights endpoint
pub struct AviationStackClient {
    config: StatusConfig,
    agent: ureq::Agent,
}

impl AviationStackClient {
    pub fn new(config: StatusConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build();
        Self { config, agent }
    }

    /// Performs the lookup, reporting why it failed
    pub fn try_fetch(&self, dep: &str, arr: &str) -> Result<Vec<StatusRecord>, StatusError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(StatusError::MissingApiKey)?;

        let response = self
            .agent
            .get(&self.config.base_url)
            .query("access_key", api_key)
            .query("dep_iata", &normalize_code(dep))
            .query("arr_iata", &normalize_code(arr))
            .call();

        let payload: Value = match response {
            Ok(res) => res
                .into_json()
                .map_err(|e| StatusError::Decode(e.to_string()))?,
            Err(ureq::Error::Status(code, _)) => return Err(StatusError::HttpStatus(code)),
            Err(ureq::Error::Transport(e)) => return Err(StatusError::Network(e.to_string())),
        };

        parse_status_payload(&payload)
    }
}

impl StatusSource for AviationStackClient {
    fn fetch_status(&self, dep: &str, arr: &str) -> Vec<StatusRecord> {
        match self.try_fetch(dep, arr) {
            Ok(records) => {
                debug!(dep, arr, flights = records.len(), "fetched live status");
                records
            }
            Err(e) => {
                warn!(dep, arr, error = %e, "live status lookup failed");
                Vec::new()
            }
        }
    }
}

fn str_at(value: &Value, path: &[&str]) -> String {
    path.iter()
        .try_fold(value, |v, key| v.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Extracts status records from a decoded response body
pub fn parse_status_payload(payload: &Value) -> Result<Vec<StatusRecord>, StatusError> {
    if let Some(error) = payload.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(StatusError::Api(message.to_string()));
    }

    let flights = match payload.get("data") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(flights)) => flights,
        Some(_) => return Err(StatusError::Decode("\"data\" is not a list".into())),
    };

    Ok(flights
        .iter()
        .map(|flight| StatusRecord {
            airline: str_at(flight, &["airline", "name"]),
            flight_number: str_at(flight, &["flight", "iata"]),
            departure_scheduled: str_at(flight, &["departure", "scheduled"]),
            arrival_scheduled: str_at(flight, &["arrival", "scheduled"]),
            status: str_at(flight, &["flight_status"]),
        })
        .collect())
}
