//! The coordinating context around the store. [Tracker] owns the loaded
//! [Store](crate::store::entities::Store), the selection, the timer state
//! machine, and the slot it persists into; the command surface of the
//! application goes through it.

pub mod selection;
pub mod timer;

use selection::Selection;
use timer::TimerEngine;
use tracing::warn;

use crate::{
    error::WorklogError,
    store::{
        entities::{Project, Store},
        slot::StoreSlot,
    },
    utils::{clock::Clock, time::format_clock},
};

pub struct Tracker<S: StoreSlot> {
    store: Store,
    selection: Selection,
    timer: TimerEngine,
    slot: S,
    clock: Box<dyn Clock>,
}

impl<S: StoreSlot> Tracker<S> {
    /// Loads the persisted store, closes sessions a previous run left open,
    /// and preselects the last-open project. An unreadable slot degrades to
    /// an empty in-memory store; the session stays interactive either way.
    pub async fn load(slot: S, clock: Box<dyn Clock>) -> Tracker<S> {
        let mut store = slot.load().await.unwrap_or_else(|e| {
            warn!("Couldn't read the store slot, starting empty: {e:?}");
            Store::default()
        });

        let recovered = store.recover_open_sessions();

        let mut selection = Selection::default();
        match store.last_open_project.clone() {
            Some(name) if store.find_project(&name).is_some() => selection.select(name),
            Some(name) => warn!("Last open project \"{name}\" no longer exists"),
            None => {}
        }

        let tracker = Tracker {
            store,
            selection,
            timer: TimerEngine::new(),
            slot,
            clock,
        };
        if recovered > 0 {
            tracker.save().await;
        }
        tracker
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.selection.resolve(&self.store)
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    /// Creates a project, selects it, and persists. Fails on empty or
    /// duplicate names without touching the store.
    pub async fn create_project(&mut self, name: &str) -> Result<(), WorklogError> {
        let name = self.store.create_project(name)?.name.clone();
        self.selection.select(name);
        self.save().await;
        Ok(())
    }

    /// Makes an existing project current and persists the choice.
    pub async fn select_project(&mut self, name: &str) -> Result<(), WorklogError> {
        let name = self.store.set_last_open(name)?;
        self.selection.select(name);
        self.save().await;
        Ok(())
    }

    /// Starts the timer when idle, stops it when running. Returns the state
    /// the timer ended up in.
    pub async fn toggle_timer(&mut self) -> Result<&TimerEngine, WorklogError> {
        if self.timer.is_running() {
            self.stop_timer().await;
        } else {
            self.start_timer().await?;
        }
        Ok(&self.timer)
    }

    /// Opens a session on the current project. Requires a selection.
    pub async fn start_timer(&mut self) -> Result<(), WorklogError> {
        let now = self.clock.time();
        let project = self
            .selection
            .resolve_mut(&mut self.store)
            .ok_or(WorklogError::NoCurrentProject)?;
        self.timer.start(project, now)?;
        self.save().await;
        Ok(())
    }

    /// Counts one second against the project captured at start and
    /// persists. `None` when no timer is running.
    pub async fn tick(&mut self) -> Option<u64> {
        let total = self.timer.tick(&mut self.store);
        if total.is_some() {
            self.save().await;
        }
        total
    }

    /// Closes the open session. A no-op when the timer is already idle, so
    /// teardown paths can call it unconditionally.
    pub async fn stop_timer(&mut self) -> bool {
        let now = self.clock.time();
        let closed = self.timer.stop(&mut self.store, now);
        if closed {
            self.save().await;
        }
        closed
    }

    /// Total recorded time of the current project as `HH:MM:SS`.
    pub fn formatted_elapsed(&self) -> Option<String> {
        self.current_project().map(|p| format_clock(p.time))
    }

    /// Persistence is fire-and-forget: a failed write must never take down
    /// the session, so it is logged and dropped.
    async fn save(&self) {
        if let Err(e) = self.slot.save(&self.store).await {
            warn!("Couldn't persist the store, keeping changes in memory: {e:?}");
        }
    }
}
