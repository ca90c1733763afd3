// SerpApi google_flights client. One GET per query tuple, no retries and
// no caching; a failed request surfaces to the caller as-is.
use async_trait::async_trait;
use chrono::Local;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::combos::{OneWayQuery, RoundTripQuery};
use crate::provider::FETCHED_AT_KEY;

// Provider-side trip-type discriminators for the `type` query parameter
const TYPE_ROUND_TRIP: &str = "1";
const TYPE_ONE_WAY: &str = "2";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}")]
    Api { status: u16 },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://serpapi.com".to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// Seam for the pipeline; tests substitute their own implementation.
#[async_trait]
pub trait FlightSearchApi: Send + Sync {
    async fn fetch_one_way(&self, query: &OneWayQuery) -> Result<Value, FetchError>;

    // Round-trip documents come back stamped with a `_fetched_at` timestamp
    // so every record derived from them can carry the fetch time.
    async fn fetch_round_trip(&self, query: &RoundTripQuery) -> Result<Value, FetchError>;
}

pub struct SerpApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl SerpApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    async fn search(&self, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = format!("{}/search", self.config.base_url);
        debug!("GET {} ({} params)", url, params.len());

        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl FlightSearchApi for SerpApiClient {
    async fn fetch_one_way(&self, query: &OneWayQuery) -> Result<Value, FetchError> {
        let outbound = query.outbound_date.to_string();
        let params = [
            ("engine", "google_flights"),
            ("departure_id", query.origin.as_str()),
            ("arrival_id", query.destination.as_str()),
            ("outbound_date", outbound.as_str()),
            ("type", TYPE_ONE_WAY),
            ("api_key", self.config.api_key.as_str()),
        ];
        self.search(&params).await
    }

    async fn fetch_round_trip(&self, query: &RoundTripQuery) -> Result<Value, FetchError> {
        let outbound = query.outbound_date.to_string();
        let return_date = query.return_date.to_string();
        let params = [
            ("engine", "google_flights"),
            ("departure_id", query.origin.as_str()),
            ("arrival_id", query.destination.as_str()),
            ("outbound_date", outbound.as_str()),
            ("return_date", return_date.as_str()),
            ("type", TYPE_ROUND_TRIP),
            ("api_key", self.config.api_key.as_str()),
        ];

        let mut document = self.search(&params).await?;
        if let Value::Object(map) = &mut document {
            let fetched_at = Local::now().to_rfc3339();
            map.insert(FETCHED_AT_KEY.to_string(), Value::String(fetched_at));
        }
        Ok(document)
    }
}
