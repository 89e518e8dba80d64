//! Interactive station selection.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::api::{Station, TransitApi};
use crate::console::Console;

const NO_STATIONS: &str = "Keine Bahnhöfe gefunden.";
const CHOOSE_PROMPT: &str = "Wählen Sie einen Bahnhof nach Nummer aus: ";
const INVALID_SELECTION: &str = "Ungültige Auswahl.";

/// Ask for a station name, list the matches and let the user pick one.
///
/// Returns `Ok(None)` when nothing was found, the search failed, or the
/// choice was invalid; each case has already been reported on the console.
/// There is exactly one attempt, no re-prompt.
pub async fn select_station<A, R, W>(
    api: &A,
    console: &mut Console<R, W>,
    prompt: &str,
) -> io::Result<Option<Station>>
where
    A: TransitApi,
    R: BufRead,
    W: Write,
{
    let query = console.prompt(prompt)?;

    let stations = match api.search_stations(&query).await {
        Ok(stations) => stations,
        Err(e) => {
            warn!(query = %query, error = %e, "station search failed");
            console.say(format_args!("Fehler bei der Stationssuche: {e}"))?;
            Vec::new()
        }
    };

    if stations.is_empty() {
        console.say(NO_STATIONS)?;
        return Ok(None);
    }

    for (i, station) in stations.iter().enumerate() {
        console.say(format_args!("[{i}] {}", station.name))?;
    }

    let answer = console.prompt(CHOOSE_PROMPT)?;
    match parse_selection(&answer, stations.len()) {
        Some(index) => Ok(stations.into_iter().nth(index)),
        None => {
            console.say(INVALID_SELECTION)?;
            Ok(None)
        }
    }
}

/// Parse a zero-based index into a list of `count` entries.
fn parse_selection(input: &str, count: usize) -> Option<usize> {
    input.trim().parse::<usize>().ok().filter(|&i| i < count)
}
