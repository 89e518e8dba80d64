//! Departure board formatting.

use ratatui::style::Color;
use tracing::warn;

use crate::api::{Departure, DeparturesResponse};

use super::time::Timestamp;
use super::{NOT_AVAILABLE, Table, View};

/// Shown when there is no departure list to display.
pub const DEPARTURES_PLACEHOLDER: &str = "Keine Abfahrtsinformationen verfügbar.";

/// Delay in whole minutes, truncated toward zero. A missing delay counts as 0.
///
/// ```
/// use db_navigator::board::delay_minutes;
///
/// assert_eq!(delay_minutes(Some(180)), 3);
/// assert_eq!(delay_minutes(Some(119)), 1);
/// assert_eq!(delay_minutes(Some(-90)), -1);
/// assert_eq!(delay_minutes(None), 0);
/// ```
pub fn delay_minutes(delay_secs: Option<i64>) -> i64 {
    delay_secs.unwrap_or(0) / 60
}

/// Delay cell text: only positive delays are shown.
pub fn delay_cell(minutes: i64) -> String {
    if minutes > 0 {
        minutes.to_string()
    } else {
        String::new()
    }
}

/// Build the departure board for a station.
///
/// Rows keep the order the API returned them in.
pub fn format_departures(response: Option<&DeparturesResponse>) -> View {
    let Some(departures) = response.and_then(|r| r.departures.as_ref()) else {
        return View::Placeholder(DEPARTURES_PLACEHOLDER);
    };

    let mut table = Table::new("Abfahrten")
        .with_colored_column("Zeit", Color::Cyan)
        .with_column("Zug")
        .with_column("Richtung")
        .with_column("Gleis")
        .with_colored_column("Verspätung (min)", Color::Red);

    for departure in departures {
        table.push_row(departure_row(departure));
    }

    View::Table(table)
}

fn departure_row(departure: &Departure) -> Vec<String> {
    let time = match departure.when.as_deref() {
        Some(when) => match Timestamp::parse(when) {
            Ok(ts) => ts.to_string(),
            Err(e) => {
                warn!(error = %e, "unparsable departure time");
                NOT_AVAILABLE.to_string()
            }
        },
        None => NOT_AVAILABLE.to_string(),
    };

    let line = departure
        .line
        .as_ref()
        .and_then(|l| l.name.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    vec![
        time,
        line,
        or_not_available(departure.direction.as_deref()),
        or_not_available(departure.platform.as_deref()),
        delay_cell(delay_minutes(departure.delay)),
    ]
}

fn or_not_available(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}
