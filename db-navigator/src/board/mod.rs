//! Departure and journey boards.
//!
//! Pure transformations from API payloads into printable views. A missing
//! payload (failed fetch) and a payload without the expected list both
//! render as a fixed placeholder line.

mod departures;
mod journeys;
mod table;
mod time;

use std::fmt;

pub use departures::{DEPARTURES_PLACEHOLDER, delay_cell, delay_minutes, format_departures};
pub use journeys::{JOURNEYS_PLACEHOLDER, format_journeys};
pub use table::{Column, Table};
pub use time::{Timestamp, TimestampError};

/// Cell text for data the API did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// What a formatter produces: a table, or placeholder text when there is
/// nothing to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Table(Table),
    Placeholder(&'static str),
}

impl View {
    /// Render for output, with ANSI colours if `colored` is set.
    pub fn render(&self, colored: bool) -> String {
        match self {
            View::Table(table) => table.render(colored),
            View::Placeholder(text) => format!("{text}\n"),
        }
    }

    /// The table, if this view has one.
    pub fn table(&self) -> Option<&Table> {
        match self {
            View::Table(table) => Some(table),
            View::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, View::Placeholder(_))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_renders_as_single_line() {
        let view = View::Placeholder("nothing here");
        assert_eq!(view.to_string(), "nothing here\n");
        assert!(view.is_placeholder());
        assert!(view.table().is_none());
    }

    #[test]
    fn table_view_exposes_table() {
        let view = View::Table(Table::new("T").with_column("A"));
        assert!(!view.is_placeholder());
        assert_eq!(view.table().unwrap().title(), "T");
    }
}
