//! Interactive menu and workflows.
//!
//! The menu offers three choices: a live departure board for one station,
//! a one-off journey search between two stations, and exit. Invalid input
//! inside a workflow only aborts that workflow; the menu is shown again.

mod error;
mod select;

use std::io::{BufRead, Write};

use crossterm::style::{Attribute, Color, ContentStyle};
use tracing::{debug, warn};

use crate::api::TransitApi;
use crate::board::format_journeys;
use crate::console::Console;
use crate::live::{CancelToken, Interrupts, LiveBoard, LiveBoardConfig};

pub use error::NavigatorError;
pub use select::select_station;

const MENU_TITLE: &str = "DB Navigator CLI";
const MENU_OPTIONS: &str = "1. Abfahrten für einen Bahnhof anzeigen\n\
2. Fahrten zwischen zwei Bahnhöfen finden\n\
3. Beenden";
const CHOICE_PROMPT: &str = "Geben Sie Ihre Wahl ein: ";
const INVALID_CHOICE: &str = "Ungültige Auswahl. Bitte versuchen Sie es erneut.";
const GOODBYE: &str = "Wird beendet.";

const DEPARTURES_PROMPT: &str = "Geben Sie einen Bahnhofsnamen für die Suche ein: ";
const FROM_PROMPT: &str = "Geben Sie den Abfahrtsbahnhof ein: ";
const TO_PROMPT: &str = "Geben Sie den Ankunftsbahnhof ein: ";

/// A choice from the main menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Departures,
    Journeys,
    Exit,
    Invalid,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => MenuChoice::Departures,
            "2" => MenuChoice::Journeys,
            "3" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

/// The interactive navigator: menu loop plus workflows.
pub struct Navigator<A, R, W> {
    api: A,
    console: Console<R, W>,
    live: LiveBoardConfig,
    interrupts: Interrupts,
}

impl<A, R, W> Navigator<A, R, W>
where
    A: TransitApi,
    R: BufRead,
    W: Write,
{
    pub fn new(api: A, console: Console<R, W>) -> Self {
        Self {
            api,
            console,
            live: LiveBoardConfig::default(),
            interrupts: Interrupts::new(),
        }
    }

    /// Use a custom live board configuration.
    pub fn with_live_config(mut self, live: LiveBoardConfig) -> Self {
        self.live = live;
        self
    }

    /// Share interrupt routing with a Ctrl+C listener.
    pub fn with_interrupts(mut self, interrupts: Interrupts) -> Self {
        self.interrupts = interrupts;
        self
    }

    /// Run the menu until the user exits.
    ///
    /// Only console I/O failures (including end of input) end the loop
    /// with an error.
    pub async fn run(&mut self) -> Result<(), NavigatorError> {
        loop {
            self.console.say("")?;
            self.console.say_styled(MENU_TITLE, bold())?;
            self.console.say(MENU_OPTIONS)?;
            let choice = MenuChoice::parse(&self.console.prompt(CHOICE_PROMPT)?);
            debug!(?choice, "menu choice");

            match choice {
                MenuChoice::Departures => self.show_departures().await?,
                MenuChoice::Journeys => self.find_journeys().await?,
                MenuChoice::Exit => {
                    self.console.say(GOODBYE)?;
                    return Ok(());
                }
                MenuChoice::Invalid => self.console.say_styled(INVALID_CHOICE, alert())?,
            }
        }
    }

    /// Pick a station and show its live departure board until Ctrl+C.
    pub async fn show_departures(&mut self) -> Result<(), NavigatorError> {
        let Some(station) = select_station(&self.api, &mut self.console, DEPARTURES_PROMPT).await?
        else {
            return Ok(());
        };

        let token = CancelToken::new();
        let _active = self.interrupts.activate(token.clone());

        let colored = self.console.colored();
        let board = LiveBoard::new(&self.api, &station, &self.live);
        board.run(self.console.output_mut(), colored, &token).await?;
        Ok(())
    }

    /// Pick origin and destination, then show the journeys between them once.
    pub async fn find_journeys(&mut self) -> Result<(), NavigatorError> {
        let Some(from) = select_station(&self.api, &mut self.console, FROM_PROMPT).await? else {
            return Ok(());
        };
        let Some(to) = select_station(&self.api, &mut self.console, TO_PROMPT).await? else {
            return Ok(());
        };

        let response = match self.api.journeys(&from.id, &to.id).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(from = %from.id, to = %to.id, error = %e, "journeys fetch failed");
                self.console
                    .say(format_args!("Fehler beim Abrufen der Fahrten: {e}"))?;
                None
            }
        };

        self.console.show(&format_journeys(response.as_ref()))?;
        Ok(())
    }

    /// Give back the console, e.g. to inspect test output.
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }
}

fn bold() -> ContentStyle {
    ContentStyle {
        attributes: Attribute::Bold.into(),
        ..ContentStyle::default()
    }
}

fn alert() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Red),
        ..bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        Departure, DeparturesResponse, Journey, JourneysResponse, Leg, Line, MockTransitApi,
        Station,
    };
    use std::io::{self, Cursor};
    use std::time::Duration;

    type TestNavigator = Navigator<MockTransitApi, Cursor<Vec<u8>>, Vec<u8>>;

    fn navigator(api: MockTransitApi, input: &str) -> TestNavigator {
        let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        Navigator::new(api, console)
            .with_live_config(LiveBoardConfig::default().with_alternate_screen(false))
    }

    fn output(navigator: TestNavigator) -> String {
        String::from_utf8(navigator.into_console().into_parts().1).unwrap()
    }

    fn station(id: &str, name: &str) -> Station {
        Station {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn journeys_api() -> MockTransitApi {
        MockTransitApi::new()
            .with_stations("hamburg", vec![station("8002549", "Hamburg Hbf")])
            .with_stations("bremen", vec![station("8000050", "Bremen Hbf")])
            .with_journeys(
                "8002549",
                "8000050",
                JourneysResponse {
                    journeys: Some(vec![Journey {
                        legs: vec![Leg {
                            departure: Some("2024-05-01T08:00:00+02:00".into()),
                            arrival: Some("2024-05-01T08:47:00+02:00".into()),
                            line: Some(Line {
                                name: Some("RE 4".into()),
                                product: Some("regional".into()),
                            }),
                        }],
                    }]),
                },
            )
    }

    #[test]
    fn parse_menu_choices() {
        assert_eq!(MenuChoice::parse("1"), MenuChoice::Departures);
        assert_eq!(MenuChoice::parse(" 2 "), MenuChoice::Journeys);
        assert_eq!(MenuChoice::parse("3"), MenuChoice::Exit);
        assert_eq!(MenuChoice::parse("9"), MenuChoice::Invalid);
        assert_eq!(MenuChoice::parse(""), MenuChoice::Invalid);
        assert_eq!(MenuChoice::parse("13"), MenuChoice::Invalid);
    }

    #[tokio::test]
    async fn exit_terminates() {
        let mut nav = navigator(MockTransitApi::new(), "3\n");

        nav.run().await.unwrap();

        let out = output(nav);
        assert!(out.contains("DB Navigator CLI"));
        assert!(out.ends_with("Wird beendet.\n"));
    }

    #[tokio::test]
    async fn invalid_choice_shows_menu_again() {
        let mut nav = navigator(MockTransitApi::new(), "9\n3\n");

        nav.run().await.unwrap();

        let out = output(nav);
        assert!(out.contains(INVALID_CHOICE));
        assert_eq!(out.matches("DB Navigator CLI").count(), 2);
        assert_eq!(out.matches(CHOICE_PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn end_of_input_is_an_error() {
        let mut nav = navigator(MockTransitApi::new(), "9\n");

        let err = nav.run().await.unwrap_err();

        assert!(matches!(
            err,
            NavigatorError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof
        ));
    }

    #[tokio::test]
    async fn departures_with_unknown_station_returns_to_menu() {
        let api = MockTransitApi::new();
        let mut nav = navigator(api.clone(), "1\nAtlantis\n3\n");

        nav.run().await.unwrap();

        assert_eq!(api.departure_calls(), 0);
        let out = output(nav);
        assert!(out.contains(DEPARTURES_PROMPT));
        assert!(out.contains("Keine Bahnhöfe gefunden."));
        assert_eq!(out.matches("DB Navigator CLI").count(), 2);
    }

    #[tokio::test]
    async fn journeys_are_shown_once() {
        let api = journeys_api();
        let mut nav = navigator(api.clone(), "2\nHamburg\n0\nBremen\n0\n3\n");

        nav.run().await.unwrap();

        assert_eq!(api.journey_calls(), 1);
        let out = output(nav);
        assert!(out.contains(FROM_PROMPT));
        assert!(out.contains(TO_PROMPT));
        assert!(out.contains("Fahrten"));
        assert!(out.contains("│ 08:00    08:47    0         47           regional │"));
        assert!(out.ends_with("Wird beendet.\n"));
    }

    #[tokio::test]
    async fn journeys_abort_when_origin_is_invalid() {
        let api = journeys_api();
        let mut nav = navigator(api.clone(), "2\nHamburg\nx\n3\n");

        nav.run().await.unwrap();

        assert_eq!(api.journey_calls(), 0);
        let out = output(nav);
        assert!(out.contains("Ungültige Auswahl.\n"));
        // Destination is never asked for
        assert!(!out.contains(TO_PROMPT));
    }

    #[tokio::test]
    async fn journeys_fetch_failure_shows_placeholder() {
        // Stations resolve but no journeys are registered, so the fetch 404s.
        let api = MockTransitApi::new()
            .with_stations("a", vec![station("1", "A")])
            .with_stations("b", vec![station("2", "B")]);
        let mut nav = navigator(api, "2\na\n0\nb\n0\n3\n");

        nav.run().await.unwrap();

        let out = output(nav);
        assert!(out.contains("Fehler beim Abrufen der Fahrten: API error 404"));
        assert!(out.contains("Keine Fahrtinformationen verfügbar."));
    }

    #[tokio::test]
    async fn colored_menu_highlights_title_and_invalid_choice() {
        let console = Console::new(Cursor::new(b"9\n3\n".to_vec()), Vec::new()).with_color(true);
        let mut nav = Navigator::new(MockTransitApi::new(), console);

        nav.run().await.unwrap();

        let out = output(nav);
        // Bold title, then bold red warning
        assert!(out.contains("\u{1b}[1mDB Navigator CLI"));
        assert!(out.contains("\u{1b}[38;5;9m"));
        assert!(out.contains(INVALID_CHOICE));
    }

    #[tokio::test]
    async fn plain_menu_has_no_escape_codes() {
        let mut nav = navigator(MockTransitApi::new(), "9\n3\n");

        nav.run().await.unwrap();

        assert!(!output(nav).contains('\u{1b}'));
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_ends_live_board_and_returns_to_menu() {
        let api = MockTransitApi::new()
            .with_stations("berlin", vec![station("8011160", "Berlin Hbf")])
            .with_departures(
                "8011160",
                DeparturesResponse {
                    departures: Some(vec![Departure {
                        when: Some("2024-05-01T08:05:00+02:00".into()),
                        line: Some(Line {
                            name: Some("RE1".into()),
                            product: None,
                        }),
                        ..Departure::default()
                    }]),
                },
            );
        let interrupts = Interrupts::new();
        let mut nav = navigator(api.clone(), "1\nBerlin\n0\n3\n").with_interrupts(interrupts.clone());

        let ctrl_c = async {
            // Between the second and third refresh
            tokio::time::sleep(Duration::from_secs(90)).await;
            assert!(interrupts.interrupt());
        };
        let (result, ()) = tokio::join!(nav.run(), ctrl_c);
        result.unwrap();

        // Frames at t = 0 and t = 60
        assert_eq!(api.departure_calls(), 2);
        // The board is no longer registered once it has stopped
        assert!(!interrupts.interrupt());

        let out = output(nav);
        assert!(out.contains("Abfahrten für Berlin Hbf"));
        assert_eq!(out.matches("DB Navigator CLI").count(), 2);
        assert!(out.ends_with("Wird beendet.\n"));
    }
}
