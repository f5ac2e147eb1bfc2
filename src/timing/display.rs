use std::io::Write;

use anyhow::Result;
use tokio::sync::mpsc::Receiver;
use tracing::debug;

use crate::utils::time::format_clock;

use super::ticker::TickUpdate;

/// Repaints the running clock line for every update the ticker emits. Only
/// receives snapshots; the store itself never leaves the ticker's loop.
pub struct DisplayModule {
    receiver: Receiver<TickUpdate>,
}

impl DisplayModule {
    pub fn new(receiver: Receiver<TickUpdate>) -> Self {
        Self { receiver }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut stdout = std::io::stdout();
        while let Some(update) = self.receiver.recv().await {
            debug!("Displaying update {:?}", update);
            write!(
                stdout,
                "\r{} {}",
                update.project,
                format_clock(update.total_secs)
            )?;
            stdout.flush()?;
        }

        writeln!(stdout)?;
        self.receiver.close();
        Ok(())
    }
}
