use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{
    error::WorklogError,
    store::entities::{Project, Session, Store},
};

/// The timer is either idle or counting against one project. The running
/// variant carries the project name captured at [TimerEngine::start], so a
/// selection change mid-run never redirects ticks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running { project: Arc<str> },
}

#[derive(Debug, Default)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Name of the project ticks are currently applied to.
    pub fn running_project(&self) -> Option<Arc<str>> {
        match &self.state {
            TimerState::Idle => None,
            TimerState::Running { project } => Some(project.clone()),
        }
    }

    /// Opens a new session on `project` and transitions to Running. Only
    /// valid from Idle.
    pub fn start(
        &mut self,
        project: &mut Project,
        now: DateTime<Utc>,
    ) -> Result<(), WorklogError> {
        if self.is_running() {
            return Err(WorklogError::TimerAlreadyRunning);
        }

        if project.open_session().is_some() {
            // Should have been recovered at load. Close it from the counter
            // so the new session stays the only open one.
            warn!(
                "\"{}\" already had an open session, closing it before starting",
                project.name
            );
            project.recover_open_sessions();
        }

        project
            .sessions
            .push(Session::open(now, project.time));
        self.state = TimerState::Running {
            project: project.name.clone(),
        };
        Ok(())
    }

    /// Counts one elapsed second against the captured project and returns
    /// its new total. Never fires while Idle; a vanished project is
    /// tolerated by skipping the tick.
    pub fn tick(&mut self, store: &mut Store) -> Option<u64> {
        let TimerState::Running { project } = &self.state else {
            return None;
        };
        let Some(project) = store.find_project_mut(project) else {
            warn!("Timed project no longer exists, skipping tick");
            return None;
        };
        project.time += 1;
        Some(project.time)
    }

    /// Closes the open session and transitions to Idle. Calling this while
    /// already Idle is a no-op, mirroring stop-on-teardown calls that can
    /// arrive when no timer is active. Returns whether the store changed.
    pub fn stop(&mut self, store: &mut Store, now: DateTime<Utc>) -> bool {
        let TimerState::Running { project } =
            std::mem::replace(&mut self.state, TimerState::Idle)
        else {
            return false;
        };

        let Some(project) = store.find_project_mut(&project) else {
            warn!("Timed project \"{project}\" no longer exists, nothing to close");
            return false;
        };

        let time_at_end = project.time;
        match project.open_session_mut() {
            Some(session) => {
                session.ended_at = Some(now);
                session.time_at_end = Some(time_at_end);
                true
            }
            None => {
                // Prior corruption or a double stop. Not worth crashing an
                // interactive session over.
                warn!("No open session to close on \"{}\"", project.name);
                false
            }
        }
    }
}
