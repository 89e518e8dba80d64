use db_navigator::api::{ApiClient, ApiConfig};
use db_navigator::console::Console;
use db_navigator::live::{Interrupts, listen_for_ctrl_c};
use db_navigator::navigator::{Navigator, NavigatorError};
use tracing_subscriber::EnvFilter;

// Prompts block the main thread on stdin; the Ctrl+C listener runs on a
// worker so an interrupt at a prompt still ends the process.
#[tokio::main]
async fn main() -> Result<(), NavigatorError> {
    // Logs go to stderr and default to warnings only, so the menu and the
    // live board stay readable. Override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let interrupts = Interrupts::new();
    let _listener = listen_for_ctrl_c(interrupts.clone());

    let client = ApiClient::new(ApiConfig::default())?;
    let mut navigator = Navigator::new(client, Console::stdio()).with_interrupts(interrupts);

    navigator.run().await
}
