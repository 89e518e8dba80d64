//! Client for the `db.transport.rest` public transit API.
//!
//! Three endpoints are used:
//! - `GET /stations?query=..&limit=..` for station search
//! - `GET /stations/{id}/departures?duration=..` for departure boards
//! - `GET /journeys?from=..&to=..` for journey planning
//!
//! Every call is a single attempt. Failures surface as [`ApiError`] and it is
//! up to the caller to report them and carry on with "no data".

mod client;
mod error;
mod mock;
mod types;

pub use client::{ApiClient, ApiConfig, TransitApi};
pub use error::ApiError;
pub use mock::MockTransitApi;
pub use types::{
    Departure, DeparturesResponse, Journey, JourneysResponse, Leg, Line, Station,
    StationSearchResponse,
};
