//! Transit API response DTOs.
//!
//! These map onto the JSON returned by `db.transport.rest`. Only the fields
//! the navigator displays are modelled; everything else is ignored. Fields
//! the API may omit or send as `null` are `Option`s so that missing data
//! degrades to a placeholder instead of failing the whole response.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A station (or stop) returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Station {
    /// Stable identifier used for departures and journeys queries.
    pub id: String,
    /// Human-readable station name.
    pub name: String,
}

/// Response from `GET /stations`.
///
/// The autocomplete endpoint answers with an object keyed by station id,
/// in ranking order. A plain array is accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StationSearchResponse {
    List(Vec<serde_json::Value>),
    Keyed(serde_json::Map<String, serde_json::Value>),
}

impl StationSearchResponse {
    /// Flatten into a list of stations, keeping the server's order.
    ///
    /// Entries without an `id` and `name` are skipped.
    pub fn into_stations(self) -> Vec<Station> {
        let entries: Vec<(String, serde_json::Value)> = match self {
            StationSearchResponse::List(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, value)| (i.to_string(), value))
                .collect(),
            StationSearchResponse::Keyed(map) => map.into_iter().collect(),
        };

        entries
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(station) => Some(station),
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping malformed station search entry");
                    None
                }
            })
            .collect()
    }
}

/// Response from `GET /stations/{id}/departures`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeparturesResponse {
    pub departures: Option<Vec<Departure>>,
}

/// A single departure on a station board.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Departure {
    /// Real-time departure (ISO 8601 with offset). `null` when unknown or cancelled.
    pub when: Option<String>,

    /// Delay in seconds. `null` when no real-time data is available.
    pub delay: Option<i64>,

    pub line: Option<Line>,

    /// Final destination shown on the train.
    pub direction: Option<String>,

    pub platform: Option<String>,
}

/// Line information shared by departures and journey legs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Line {
    /// Display name, e.g. "RE 1" or "S 5".
    pub name: Option<String>,

    /// Product class, e.g. "regional", "suburban", "nationalExpress".
    pub product: Option<String>,
}

/// Response from `GET /journeys`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JourneysResponse {
    pub journeys: Option<Vec<Journey>>,
}

/// A journey made of one or more legs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Journey {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// One uninterrupted segment of a journey.
///
/// Walking legs have no `line`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Leg {
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub line: Option<Line>,
}
