use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Provides wall-clock time and tick scheduling to the rest of the
/// application. Keeping this behind a trait lets tests drive the timer
/// deterministically.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    /// Wall-clock time used for session boundary timestamps.
    fn time(&self) -> DateTime<Utc>;

    /// Monotonic reference point for the tick cadence.
    fn instant(&self) -> Instant;

    async fn sleep_until(&self, instant: Instant);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}
