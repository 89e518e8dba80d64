//! Transit API HTTP client.
//!
//! Provides async methods for the three `db.transport.rest` endpoints the
//! navigator uses, behind the [`TransitApi`] trait so workflows can run
//! against [`MockTransitApi`](super::MockTransitApi) in tests.

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use super::types::{DeparturesResponse, JourneysResponse, Station, StationSearchResponse};

/// Default base URL for the public DB transport API.
const DEFAULT_BASE_URL: &str = "https://v6.db.transport.rest";

/// Default number of station search results.
const DEFAULT_SEARCH_LIMIT: u8 = 5;

/// Default departure board window in minutes.
const DEFAULT_DEPARTURES_DURATION_MINS: u16 = 120;

/// How much of an unparsable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Operations the navigator needs from the transit API.
///
/// Each call is a single best-effort attempt: no retries, no caching.
#[allow(async_fn_in_trait)]
pub trait TransitApi {
    /// Search stations by free-text name, in the server's ranking order.
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, ApiError>;

    /// Fetch the departure board for a station.
    async fn departures(&self, station_id: &str) -> Result<DeparturesResponse, ApiError>;

    /// Fetch journeys between two stations.
    async fn journeys(&self, from_id: &str, to_id: &str) -> Result<JourneysResponse, ApiError>;
}

/// Configuration for the transit API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for the API (defaults to the public v6 instance)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of station search results
    pub search_limit: u8,
    /// Departure board window in minutes
    pub departures_duration_mins: u16,
}

impl ApiConfig {
    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the number of station search results.
    pub fn with_search_limit(mut self, limit: u8) -> Self {
        self.search_limit = limit;
        self
    }

    /// Set the departure board window.
    pub fn with_departures_duration(mut self, mins: u16) -> Self {
        self.departures_duration_mins = mins;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            search_limit: DEFAULT_SEARCH_LIMIT,
            departures_duration_mins: DEFAULT_DEPARTURES_DURATION_MINS,
        }
    }
}

/// HTTP client for `db.transport.rest`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    search_limit: u8,
    departures_duration_mins: u16,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("db-navigator/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            search_limit: config.search_limit,
            departures_duration_mins: config.departures_duration_mins,
        })
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn stations_url(&self) -> Result<Url, ApiError> {
        self.endpoint(&["stations"])
    }

    fn departures_url(&self, station_id: &str) -> Result<Url, ApiError> {
        self.endpoint(&["stations", station_id, "departures"])
    }

    fn journeys_url(&self) -> Result<Url, ApiError> {
        self.endpoint(&["journeys"])
    }

    /// Issue one GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!(url = %url, ?query, "GET");

        let response = self.http.get(url.clone()).query(query).send().await?;
        let status = response.status();

        debug!(url = %url, status = status.as_u16(), "response");

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.chars().take(BODY_SNIPPET_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        decode_json(&url, &body)
    }
}

/// Decode a response body, keeping a snippet of it when that fails.
fn decode_json<T: DeserializeOwned>(url: &Url, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        let snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
        debug!(url = %url, error = %e, body = %snippet, "undecodable response body");
        ApiError::Json {
            message: e.to_string(),
            body: Some(snippet),
        }
    })
}

impl TransitApi for ApiClient {
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, ApiError> {
        let response: StationSearchResponse = self
            .get_json(
                self.stations_url()?,
                &[
                    ("query", query.to_string()),
                    ("limit", self.search_limit.to_string()),
                ],
            )
            .await?;

        Ok(response.into_stations())
    }

    async fn departures(&self, station_id: &str) -> Result<DeparturesResponse, ApiError> {
        self.get_json(
            self.departures_url(station_id)?,
            &[("duration", self.departures_duration_mins.to_string())],
        )
        .await
    }

    async fn journeys(&self, from_id: &str, to_id: &str) -> Result<JourneysResponse, ApiError> {
        self.get_json(
            self.journeys_url()?,
            &[("from", from_id.to_string()), ("to", to_id.to_string())],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ApiConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.departures_duration_mins, 120);
    }

    #[test]
    fn config_builder() {
        let config = ApiConfig::default()
            .with_base_url("http://localhost:3000")
            .with_timeout(5)
            .with_search_limit(10)
            .with_departures_duration(30);

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.departures_duration_mins, 30);
    }

    #[test]
    fn client_creation() {
        let client = ApiClient::new(ApiConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn endpoint_urls() {
        let client =
            ApiClient::new(ApiConfig::default().with_base_url("http://localhost:3000/")).unwrap();

        assert_eq!(
            client.stations_url().unwrap().as_str(),
            "http://localhost:3000/stations"
        );
        assert_eq!(
            client.departures_url("8011160").unwrap().as_str(),
            "http://localhost:3000/stations/8011160/departures"
        );
        assert_eq!(
            client.journeys_url().unwrap().as_str(),
            "http://localhost:3000/journeys"
        );
    }

    #[test]
    fn base_url_path_is_kept() {
        let client =
            ApiClient::new(ApiConfig::default().with_base_url("http://localhost:3000/db")).unwrap();

        assert_eq!(
            client.journeys_url().unwrap().as_str(),
            "http://localhost:3000/db/journeys"
        );
    }

    #[test]
    fn station_id_is_percent_encoded() {
        let client = ApiClient::new(ApiConfig::default()).unwrap();

        let url = client.departures_url("../journeys?from=1#x").unwrap();

        assert_eq!(
            url.as_str(),
            "https://v6.db.transport.rest/stations/..%2Fjourneys%3Ffrom=1%23x/departures"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn unusable_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new(ApiConfig::default().with_base_url("not a url")),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ApiClient::new(ApiConfig::default().with_base_url("mailto:ops@example.com")),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn undecodable_body_keeps_a_snippet() {
        let url = Url::parse("http://localhost:3000/journeys").unwrap();
        let body = format!("<html>{}</html>", "x".repeat(1000));

        let err = decode_json::<JourneysResponse>(&url, &body).unwrap_err();

        match err {
            ApiError::Json { body: Some(snippet), .. } => {
                assert!(snippet.starts_with("<html>"));
                assert_eq!(snippet.chars().count(), BODY_SNIPPET_CHARS);
            }
            other => panic!("expected a JSON error with body, got {other:?}"),
        }
    }

    #[test]
    fn decodes_valid_body() {
        let url = Url::parse("http://localhost:3000/journeys").unwrap();

        let response: JourneysResponse = decode_json(&url, r#"{"journeys": []}"#).unwrap();

        assert_eq!(response.journeys.map(|j| j.len()), Some(0));
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error_not_a_panic() {
        // Port 9 (discard) on localhost is closed on any sane test machine.
        let client = ApiClient::new(
            ApiConfig::default()
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(2),
        )
        .unwrap();

        let result = client.departures("8011160").await;
        assert!(matches!(result, Err(ApiError::Http(_))));
    }
}
