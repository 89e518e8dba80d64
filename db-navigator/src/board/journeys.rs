//! Journey table formatting.

use ratatui::style::Color;
use tracing::warn;

use crate::api::{Journey, JourneysResponse};

use super::time::Timestamp;
use super::{NOT_AVAILABLE, Table, View};

/// Shown when there is no journey list to display.
pub const JOURNEYS_PLACEHOLDER: &str = "Keine Fahrtinformationen verfügbar.";

/// Why a journey could not be turned into a row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum JourneyRowError {
    #[error("journey has no legs")]
    NoLegs,

    #[error("missing {0} time")]
    MissingTime(&'static str),

    #[error(transparent)]
    Timestamp(#[from] super::TimestampError),
}

/// Build the journeys table.
///
/// Duration is measured from the first leg's departure to the last leg's
/// arrival, so waiting time between legs is included. Journeys that cannot
/// be summarised (no legs, missing or bad times) are skipped.
pub fn format_journeys(response: Option<&JourneysResponse>) -> View {
    let Some(journeys) = response.and_then(|r| r.journeys.as_ref()) else {
        return View::Placeholder(JOURNEYS_PLACEHOLDER);
    };

    let mut table = Table::new("Fahrten")
        .with_colored_column("Abfahrt", Color::Cyan)
        .with_colored_column("Ankunft", Color::Cyan)
        .with_column("Umstiege")
        .with_column("Dauer (min)")
        .with_column("Produkte");

    for (index, journey) in journeys.iter().enumerate() {
        match journey_row(journey) {
            Ok(row) => table.push_row(row),
            Err(e) => warn!(index, error = %e, "skipping journey"),
        }
    }

    View::Table(table)
}

fn journey_row(journey: &Journey) -> Result<Vec<String>, JourneyRowError> {
    let (Some(first), Some(last)) = (journey.legs.first(), journey.legs.last()) else {
        return Err(JourneyRowError::NoLegs);
    };

    let departure = first
        .departure
        .as_deref()
        .ok_or(JourneyRowError::MissingTime("departure"))?;
    let arrival = last
        .arrival
        .as_deref()
        .ok_or(JourneyRowError::MissingTime("arrival"))?;

    let departure = Timestamp::parse(departure)?;
    let arrival = Timestamp::parse(arrival)?;

    let transfers = journey.legs.len() - 1;
    let duration = arrival.minutes_since(&departure);

    let products: Vec<&str> = journey
        .legs
        .iter()
        .map(|leg| {
            leg.line
                .as_ref()
                .and_then(|l| l.product.as_deref())
                .unwrap_or(NOT_AVAILABLE)
        })
        .collect();

    Ok(vec![
        departure.to_string(),
        arrival.to_string(),
        transfers.to_string(),
        duration.to_string(),
        products.join(", "),
    ])
}
