//! Live-refreshing departure board.
//!
//! Renders the departures for one station, then re-fetches and redraws in
//! place on a fixed interval until its [`CancelToken`] fires. The token is
//! checked before every fetch and raced against the sleep; a request that is
//! already in flight is allowed to finish.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Local;
use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{Station, TransitApi};
use crate::board::format_departures;

/// Default time between refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the live board.
#[derive(Debug, Clone)]
pub struct LiveBoardConfig {
    /// Time between refreshes
    pub interval: Duration,
    /// Draw on the terminal's alternate screen and restore it afterwards
    pub alternate_screen: bool,
}

impl LiveBoardConfig {
    /// Set the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Enable or disable the alternate screen.
    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }
}

impl Default for LiveBoardConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            alternate_screen: true,
        }
    }
}

/// Cooperative cancellation signal.
///
/// Clones share state: cancelling any clone cancels them all. Cancellation
/// is permanent.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Completes once the token is cancelled (immediately if it already is).
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender outlives `rx` because `self` holds it.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Exit status after an interrupt outside the live board (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Routes Ctrl+C to the live board that is currently running, if any.
///
/// Clones share state. One process-wide listener ([`listen_for_ctrl_c`])
/// feeds every interrupt through [`Interrupts::interrupt`].
#[derive(Debug, Clone, Default)]
pub struct Interrupts {
    active: Arc<Mutex<Option<CancelToken>>>,
}

impl Interrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send interrupts to `token` until the returned guard is dropped.
    pub fn activate(&self, token: CancelToken) -> ActiveBoard<'_> {
        *self.slot() = Some(token);
        ActiveBoard { interrupts: self }
    }

    /// Deliver one interrupt.
    ///
    /// Returns `true` if a live board was running and has been told to stop,
    /// `false` if nothing claimed the interrupt.
    pub fn interrupt(&self) -> bool {
        match self.slot().as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<CancelToken>> {
        // The slot holds no invariant a panicking holder could break
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a live board registered with [`Interrupts`].
#[must_use = "the board is unregistered as soon as the guard is dropped"]
pub struct ActiveBoard<'a> {
    interrupts: &'a Interrupts,
}

impl Drop for ActiveBoard<'_> {
    fn drop(&mut self) {
        *self.interrupts.slot() = None;
    }
}

/// Listen for Ctrl+C for the rest of the process's life.
///
/// An interrupt stops the running live board. With no board running the
/// process exits with [`INTERRUPTED_EXIT_CODE`], as it would without a
/// handler installed.
pub fn listen_for_ctrl_c(interrupts: Interrupts) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "unable to listen for Ctrl+C");
                return;
            }

            if interrupts.interrupt() {
                debug!("interrupt stops the live board");
            } else {
                info!("interrupted, exiting");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
    })
}

/// A departure board for one station that refreshes until cancelled.
pub struct LiveBoard<'a, A> {
    api: &'a A,
    station: &'a Station,
    config: &'a LiveBoardConfig,
}

impl<'a, A: TransitApi> LiveBoard<'a, A> {
    pub fn new(api: &'a A, station: &'a Station, config: &'a LiveBoardConfig) -> Self {
        Self {
            api,
            station,
            config,
        }
    }

    /// Run until `cancel` fires. Returns the number of frames drawn.
    pub async fn run<W: Write>(
        &self,
        out: &mut W,
        colored: bool,
        cancel: &CancelToken,
    ) -> io::Result<usize> {
        info!(station = %self.station.name, interval = ?self.config.interval, "live board started");

        if self.config.alternate_screen {
            out.execute(EnterAlternateScreen)?;
        }

        let result = self.refresh_until_cancelled(out, colored, cancel).await;

        if self.config.alternate_screen {
            out.execute(LeaveAlternateScreen)?;
        }

        if let Ok(frames) = result {
            info!(station = %self.station.name, frames, "live board stopped");
        }
        result
    }

    async fn refresh_until_cancelled<W: Write>(
        &self,
        out: &mut W,
        colored: bool,
        cancel: &CancelToken,
    ) -> io::Result<usize> {
        let mut frames = 0;

        while !cancel.is_cancelled() {
            let frame = self.frame(colored).await;

            out.queue(MoveTo(0, 0))?.queue(Clear(ClearType::All))?;
            out.write_all(frame.as_bytes())?;
            out.flush()?;
            frames += 1;

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.config.interval) => {}
            }
        }

        Ok(frames)
    }

    /// Fetch departures and build one full frame of output.
    pub async fn frame(&self, colored: bool) -> String {
        let mut frame = format!(
            "Abfahrten für {} werden angezeigt. Drücken Sie Strg+C, um zum Menü zurückzukehren.\n",
            self.station.name
        );

        let response = match self.api.departures(&self.station.id).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(station_id = %self.station.id, error = %e, "departures fetch failed");
                frame.push_str(&format!("Fehler beim Abrufen der Abfahrten: {e}\n"));
                None
            }
        };

        frame.push_str(&format!("Stand: {}\n\n", Local::now().format("%H:%M:%S")));
        frame.push_str(&format_departures(response.as_ref()).render(colored));
        frame
    }
}
