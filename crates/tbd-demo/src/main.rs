//! Headless entry point for the trunk-based development demo.
//!
//! Plays the demo page without a browser: flags persist to a JSON file
//! standing in for `localStorage`, the page is an in-memory model, and
//! each stdin line is one click on a checkbox or scenario button.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `tbd-config.yaml` (or `TBD_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the local storage file
//! 4. Open the flag store (load, persist, apply every flag)
//! 5. Start the session (sync checkboxes) and read commands until `quit`

mod commands;
mod error;
mod session;

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tbd_flags::{
    DemoConfig, FileStorage, FlagStore, KeyValueStore, PageModel, ScenarioCatalog, StoreSettings,
    ToastBoard,
};
use tbd_types::Flag;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, CommandError, HELP};
use crate::error::DemoError;
use crate::session::{Reply, Session};

/// Upper bound on a single idle wait when no toast is visible.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, storage, or stdin fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("tbd-demo starting");
    info!(
        storage_path = %config.storage.path.display(),
        storage_key = config.storage.key,
        toast_duration_ms = config.toast.duration_ms,
        "Configuration loaded"
    );

    // 3. Open local storage. A corrupt file starts the demo from defaults.
    let storage = FileStorage::open_or_empty(&config.storage.path).map_err(DemoError::from)?;

    // 4. Open the flag store.
    let settings = StoreSettings::from(&config);
    let page = PageModel::standard(&settings.page);
    let store = FlagStore::open(storage, page, settings);

    // 5. Start the session.
    let catalog = ScenarioCatalog::standard();
    let flags: Vec<&str> = Flag::ALL.iter().map(|f| f.key()).collect();
    info!(flags = ?flags, "feature flags available");
    info!(scenarios = catalog.len(), "development scenarios available");

    let mut session = Session::start(store, catalog, ToastBoard::new(config.toast.duration()));
    println!("Trunk Based Development demo\n{HELP}");

    run(&mut session, BufReader::new(tokio::io::stdin())).await?;

    info!(
        enabled = session.store().flags().enabled_count(),
        events_tracked = session.events_tracked(),
        "tbd-demo shutdown complete"
    );
    Ok(())
}

/// Read commands from `input` until `quit` or end of input, expiring the
/// visible toast when its time is up.
async fn run<S, R>(session: &mut Session<S>, input: R) -> Result<(), DemoError>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        let wait = session.toasts().time_until_expiry(Utc::now());

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(command) => match session.handle(command) {
                        Reply::Continue(text) if text.is_empty() => {}
                        Reply::Continue(text) => println!("{text}"),
                        Reply::Quit => break,
                    },
                    Err(CommandError::Empty) => {}
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            () = tokio::time::sleep(wait.unwrap_or(IDLE_WAIT)), if wait.is_some() => {
                if let Some(toast) = session.expire_due_toast() {
                    println!("[toast dismissed] {}", toast.message);
                }
            }
        }
    }

    Ok(())
}

/// Load the demo configuration.
///
/// Uses `TBD_CONFIG` when set, otherwise `tbd-config.yaml` in the current
/// directory. A missing default file means the stock configuration.
fn load_config() -> Result<DemoConfig, DemoError> {
    let explicit = std::env::var_os("TBD_CONFIG").map(PathBuf::from);
    let path = explicit
        .clone()
        .unwrap_or_else(|| PathBuf::from("tbd-config.yaml"));

    if explicit.is_some() || path.exists() {
        Ok(DemoConfig::from_file(&path)?)
    } else {
        Ok(DemoConfig::parse("")?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tbd_flags::MemoryStorage;
    use tbd_types::FlagSet;
    use tokio::io::AsyncWriteExt;

    use super::*;

    fn session() -> Session<MemoryStorage> {
        let settings = StoreSettings::default();
        let page = PageModel::standard(&settings.page);
        let store = FlagStore::open(MemoryStorage::new(), page, settings);
        Session::start(
            store,
            ScenarioCatalog::standard(),
            ToastBoard::new(Duration::from_secs(3)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn toast_is_dismissed_after_its_duration() {
        let mut session = session();
        let (mut input, reader) = tokio::io::duplex(256);

        let typist = async move {
            input.write_all(b"scenario 1\n").await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            input.write_all(b"quit\n").await.unwrap();
        };
        let (result, ()) = tokio::join!(run(&mut session, BufReader::new(reader)), typist);
        result.unwrap();

        assert!(session.toasts().current().is_none());
        assert_eq!(
            *session.store().flags(),
            FlagSet::with_enabled(&[Flag::DarkMode, Flag::NewHeader])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn toast_stays_within_its_duration() {
        let mut session = session();
        let (mut input, reader) = tokio::io::duplex(256);

        let typist = async move {
            input.write_all(b"scenario 2\n").await.unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
            input.write_all(b"toggle darkMode\nquit\n").await.unwrap();
        };
        let (result, ()) = tokio::join!(run(&mut session, BufReader::new(reader)), typist);
        result.unwrap();

        assert_eq!(
            session.toasts().current().map(|t| t.message.as_str()),
            Some("Cenário aplicado: Sprint 2 - Analytics")
        );
        assert!(!session.store().is_enabled(Flag::DarkMode));
    }

    #[tokio::test]
    async fn end_of_input_stops_the_loop() {
        let mut session = session();
        let input: &[u8] = b"toggle analytics on\nbogus\n\n";

        run(&mut session, input).await.unwrap();
        assert!(session.store().is_enabled(Flag::Analytics));
        assert_eq!(session.events_tracked(), 1);
    }
}
