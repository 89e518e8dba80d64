//! In-memory transit API for tests and offline development.
//!
//! Serves canned responses as if they came from the live API and counts
//! how often each endpoint was hit.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::client::TransitApi;
use super::error::ApiError;
use super::types::{DeparturesResponse, JourneysResponse, Station};

/// Mock transit API backed by hash maps.
///
/// - Station searches are keyed by lowercased query; unknown queries yield
///   an empty result.
/// - Departures and journeys for unknown stations yield a 404 error, as the
///   live API does for unknown ids.
/// - Queries registered with [`MockTransitApi::failing_search`] yield a 503.
#[derive(Debug, Clone, Default)]
pub struct MockTransitApi {
    stations: HashMap<String, Vec<Station>>,
    failing_searches: Vec<String>,
    departures: HashMap<String, DeparturesResponse>,
    journeys: HashMap<(String, String), JourneysResponse>,
    search_calls: Arc<AtomicUsize>,
    departure_calls: Arc<AtomicUsize>,
    journey_calls: Arc<AtomicUsize>,
}

impl MockTransitApi {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the search result for a query.
    pub fn with_stations(mut self, query: &str, stations: Vec<Station>) -> Self {
        self.stations.insert(query.to_lowercase(), stations);
        self
    }

    /// Make searches for a query fail with a server error.
    pub fn failing_search(mut self, query: &str) -> Self {
        self.failing_searches.push(query.to_lowercase());
        self
    }

    /// Register the departure board for a station id.
    pub fn with_departures(mut self, station_id: &str, response: DeparturesResponse) -> Self {
        self.departures.insert(station_id.to_string(), response);
        self
    }

    /// Register the journeys between two station ids.
    pub fn with_journeys(mut self, from_id: &str, to_id: &str, response: JourneysResponse) -> Self {
        self.journeys
            .insert((from_id.to_string(), to_id.to_string()), response);
        self
    }

    /// Number of station searches served so far.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of departure boards served so far.
    pub fn departure_calls(&self) -> usize {
        self.departure_calls.load(Ordering::SeqCst)
    }

    /// Number of journey queries served so far.
    pub fn journey_calls(&self) -> usize {
        self.journey_calls.load(Ordering::SeqCst)
    }
}

fn not_found(what: String) -> ApiError {
    ApiError::Status {
        status: 404,
        message: what,
    }
}

impl TransitApi for MockTransitApi {
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, ApiError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        let key = query.to_lowercase();
        if self.failing_searches.contains(&key) {
            return Err(ApiError::Status {
                status: 503,
                message: "mock search unavailable".to_string(),
            });
        }

        Ok(self.stations.get(&key).cloned().unwrap_or_default())
    }

    async fn departures(&self, station_id: &str) -> Result<DeparturesResponse, ApiError> {
        self.departure_calls.fetch_add(1, Ordering::SeqCst);

        self.departures
            .get(station_id)
            .cloned()
            .ok_or_else(|| not_found(format!("no mock departures for station {station_id}")))
    }

    async fn journeys(&self, from_id: &str, to_id: &str) -> Result<JourneysResponse, ApiError> {
        self.journey_calls.fetch_add(1, Ordering::SeqCst);

        self.journeys
            .get(&(from_id.to_string(), to_id.to_string()))
            .cloned()
            .ok_or_else(|| not_found(format!("no mock journeys from {from_id} to {to_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, name: &str) -> Station {
        Station {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let api = MockTransitApi::new().with_stations("Berlin", vec![station("1", "Berlin Hbf")]);

        let stations = api.search_stations("BERLIN").await.unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(api.search_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_query_is_empty() {
        let api = MockTransitApi::new();

        let stations = api.search_stations("nowhere").await.unwrap();
        assert!(stations.is_empty());
    }

    #[tokio::test]
    async fn failing_search_returns_error() {
        let api = MockTransitApi::new().failing_search("down");

        let result = api.search_stations("down").await;
        assert!(matches!(result, Err(ApiError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn unknown_station_departures_is_error() {
        let api = MockTransitApi::new();

        let result = api.departures("42").await;
        assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
        assert_eq!(api.departure_calls(), 1);
    }

    #[tokio::test]
    async fn counters_are_shared_between_clones() {
        let api = MockTransitApi::new().with_departures("1", DeparturesResponse::default());
        let clone = api.clone();

        clone.departures("1").await.unwrap();
        clone.departures("1").await.unwrap();

        assert_eq!(api.departure_calls(), 2);
    }
}
