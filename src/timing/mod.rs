use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use display::DisplayModule;
use ticker::{TickUpdate, TickerModule};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    error::WorklogError,
    store::slot::{JsonFileSlot, StoreSlot},
    tracker::Tracker,
    utils::clock::{Clock, DefaultClock},
};

pub mod display;
pub mod shutdown;
pub mod ticker;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Represents the starting point for an interactive timing run: load the
/// store, time the chosen project until Ctrl-C, and leave the session
/// closed behind.
pub async fn start_timing(dir: PathBuf, project: Option<String>) -> Result<()> {
    let slot = JsonFileSlot::new(&dir)?;
    let mut tracker = Tracker::load(slot, Box::new(DefaultClock)).await;

    if let Some(name) = &project {
        tracker.select_project(name).await?;
    }
    if tracker.current_project().is_none() {
        return Err(WorklogError::NoCurrentProject.into());
    }

    let (sender, receiver) = mpsc::channel::<TickUpdate>(10);
    let shutdown_token = CancellationToken::new();

    let ticker = create_ticker(sender, tracker, &shutdown_token, DefaultClock);
    let display = DisplayModule::new(receiver);

    let (_, ticker_result, display_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token),
        ticker.run(),
        display.run(),
    );

    if let Err(ticker_result) = ticker_result {
        error!("Ticker module got an error {:?}", ticker_result);
    }

    if let Err(display_result) = display_result {
        error!("Display module got an error {:?}", display_result);
    }

    Ok(())
}

fn create_ticker<S: StoreSlot>(
    sender: mpsc::Sender<TickUpdate>,
    tracker: Tracker<S>,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> TickerModule<S> {
    TickerModule::new(
        sender,
        tracker,
        shutdown_token.clone(),
        TICK_INTERVAL,
        Box::new(clock),
    )
}

#[cfg(test)]
mod timing_tests {
    use std::time::Duration;

    use anyhow::Result;
    use tempfile::tempdir;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::{
        store::slot::{JsonFileSlot, StoreSlot},
        timing::{create_ticker, display::DisplayModule, ticker::TickUpdate},
        tracker::Tracker,
        utils::{clock::DefaultClock, logging::TEST_LOGGING},
    };

    /// Smoke test for a whole interactive run. Time is paused, so the three
    /// ticks and the shutdown fire in deterministic virtual order.
    #[tokio::test(start_paused = true)]
    async fn smoke_test_timing_run() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;

        let slot = JsonFileSlot::new(dir.path())?;
        let mut tracker = Tracker::load(slot, Box::new(DefaultClock)).await;
        tracker.create_project("Alpha").await?;

        let shutdown_token = CancellationToken::new();
        let (sender, receiver) = mpsc::channel::<TickUpdate>(10);

        let ticker = create_ticker(sender, tracker, &shutdown_token, DefaultClock);
        let display = DisplayModule::new(receiver);

        let (_, ticker_result, display_result) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(3500)).await;
                shutdown_token.cancel()
            },
            ticker.run(),
            display.run(),
        );

        ticker_result?;
        display_result?;

        let stored = JsonFileSlot::new(dir.path())?.load().await?;
        let project = stored.find_project("Alpha").unwrap();
        assert_eq!(project.time, 3);
        assert_eq!(project.sessions.len(), 1);
        let session = &project.sessions[0];
        assert!(!session.is_open());
        assert_eq!(session.duration_secs(), Some(3));
        Ok(())
    }

    /// Cancelling before the first tick still opens and closes a session,
    /// recording zero worked seconds.
    #[tokio::test(start_paused = true)]
    async fn immediate_shutdown_records_an_empty_session() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;

        let slot = JsonFileSlot::new(dir.path())?;
        let mut tracker = Tracker::load(slot, Box::new(DefaultClock)).await;
        tracker.create_project("Alpha").await?;

        let shutdown_token = CancellationToken::new();
        let (sender, receiver) = mpsc::channel::<TickUpdate>(10);

        let ticker = create_ticker(sender, tracker, &shutdown_token, DefaultClock);
        let display = DisplayModule::new(receiver);

        let (_, ticker_result, display_result) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                shutdown_token.cancel()
            },
            ticker.run(),
            display.run(),
        );

        ticker_result?;
        display_result?;

        let stored = JsonFileSlot::new(dir.path())?.load().await?;
        let project = stored.find_project("Alpha").unwrap();
        assert_eq!(project.time, 0);
        assert_eq!(project.sessions.len(), 1);
        assert_eq!(project.sessions[0].duration_secs(), Some(0));
        Ok(())
    }
}
