use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use super::entities::Store;

/// Name of the single slot the whole store is persisted under.
pub const SLOT_NAME: &str = "time-tracker.json";

/// Interface for abstracting durable storage of the store document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreSlot: Send + Sync + 'static {
    /// Reads the persisted store. Missing or corrupt documents yield an
    /// empty store rather than an error.
    async fn load(&self) -> Result<Store>;

    /// Serializes the whole store and overwrites the slot. The document is
    /// small enough that batching or partial writes are not worth it.
    async fn save(&self, store: &Store) -> Result<()>;
}

/// The main realization of [StoreSlot]: one JSON document in the
/// application directory.
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(application_dir: &Path) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(application_dir)?;

        Ok(Self {
            path: application_dir.join(SLOT_NAME),
        })
    }

    async fn read_slot(&self) -> Result<String, std::io::Error> {
        debug!("Extracting {:?}", self.path);
        let mut file = File::open(&self.path).await?;
        file.lock_shared()?;
        let mut buffer = String::new();
        let result = file.read_to_string(&mut buffer).await;
        file.unlock_async().await?;
        result?;
        Ok(buffer)
    }
}

#[async_trait]
impl StoreSlot for JsonFileSlot {
    async fn load(&self) -> Result<Store> {
        let raw = match self.read_slot().await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No slot at {:?}, starting empty", self.path);
                return Ok(Store::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Store>(&raw) {
            Ok(store) => Ok(store),
            Err(e) => {
                // Might happen after shutdowns cutting off a write. Treated
                // the same as an absent slot.
                warn!("Slot {:?} held illegal json: {e}", self.path);
                Ok(Store::default())
            }
        }
    }

    async fn save(&self, store: &Store) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;

        file.lock_exclusive()?;
        let result = Self::write_with_file(&mut file, store).await;
        file.unlock_async().await?;
        result
    }
}

impl JsonFileSlot {
    async fn write_with_file(file: &mut File, store: &Store) -> Result<()> {
        let mut buffer = serde_json::to_vec(store)?;
        buffer.push(b'\n');
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;

    use super::{JsonFileSlot, StoreSlot, SLOT_NAME};
    use crate::store::entities::{Session, Store};

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn test_store() -> Store {
        let started = Utc.from_utc_datetime(&TEST_START_DATE);
        let mut store = Store::default();
        let project = store.create_project("Alpha").unwrap();
        project.time = 3;
        project.sessions.push(Session {
            started_at: started,
            time_at_start: 0,
            ended_at: Some(started + chrono::Duration::seconds(3)),
            time_at_end: Some(3),
        });
        store.create_project("Beta").unwrap();
        store
    }

    #[tokio::test]
    async fn round_trip_reproduces_the_store() -> Result<()> {
        let dir = tempdir()?;
        let slot = JsonFileSlot::new(dir.path())?;

        let store = test_store();
        slot.save(&store).await?;

        assert_eq!(slot.load().await?, store);
        Ok(())
    }

    #[tokio::test]
    async fn missing_slot_loads_empty() -> Result<()> {
        let dir = tempdir()?;
        let slot = JsonFileSlot::new(dir.path())?;

        assert_eq!(slot.load().await?, Store::default());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_slot_is_treated_as_absent() -> Result<()> {
        let dir = tempdir()?;
        let slot = JsonFileSlot::new(dir.path())?;
        std::fs::write(dir.path().join(SLOT_NAME), "{\"projects\": [truncated")?;

        assert_eq!(slot.load().await?, Store::default());
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_the_previous_document() -> Result<()> {
        let dir = tempdir()?;
        let slot = JsonFileSlot::new(dir.path())?;

        slot.save(&test_store()).await?;
        let mut smaller = Store::default();
        smaller.create_project("Gamma").unwrap();
        slot.save(&smaller).await?;

        assert_eq!(slot.load().await?, smaller);
        Ok(())
    }
}
