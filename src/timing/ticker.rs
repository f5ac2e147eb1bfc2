use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{store::slot::StoreSlot, tracker::Tracker, utils::clock::Clock};

/// Snapshot sent to the display after every counted second.
#[derive(Debug, Clone)]
pub struct TickUpdate {
    pub project: Arc<str>,
    pub total_secs: u64,
}

/// Drives the timer at a fixed cadence. Owns the [Tracker]: every store
/// mutation of an interactive run happens inside this module's event loop.
pub struct TickerModule<S: StoreSlot> {
    next: mpsc::Sender<TickUpdate>,
    tracker: Tracker<S>,
    shutdown: CancellationToken,
    tick_interval: Duration,
    clock: Box<dyn Clock>,
}

impl<S: StoreSlot> TickerModule<S> {
    pub fn new(
        next: mpsc::Sender<TickUpdate>,
        tracker: Tracker<S>,
        shutdown: CancellationToken,
        tick_interval: Duration,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            tracker,
            shutdown,
            tick_interval,
            clock,
        }
    }

    /// Executes the tick event loop: start the timer, count seconds until
    /// cancellation, then close the session. Ticks accumulate from a fixed
    /// reference point, so scheduling delay doesn't stretch the cadence,
    /// and cancellation wins the race, so no tick fires after stop.
    pub async fn run(mut self) -> Result<()> {
        self.tracker.start_timer().await?;
        let project = self
            .tracker
            .timer()
            .running_project()
            .expect("the timer was just started");
        info!("Timing \"{project}\"");

        let mut tick_point = self.clock.instant();
        loop {
            tick_point += self.tick_interval;

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = self.clock.sleep_until(tick_point) => {}
            }

            if let Some(total_secs) = self.tracker.tick().await {
                debug!("Counted a second against \"{project}\": {total_secs}");
                let update = TickUpdate {
                    project: project.clone(),
                    total_secs,
                };
                self.next
                    .send(update)
                    .await
                    .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
            }
        }

        // Teardown always stops, so no session is left open across runs.
        let closed = self.tracker.stop_timer().await;
        info!("Timer stopped, session closed: {closed}");
        Ok(())
    }
}
