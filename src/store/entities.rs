use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::WorklogError;

/// Label frontends show in place of a project list when nothing has been
/// created yet. Reserved: accepting it as a project name would collide with
/// the rendered placeholder.
pub const EMPTY_PLACEHOLDER: &str = "No projects added yet";

/// One stretch of timed work on a project. `time_at_end - time_at_start` is
/// the worked duration in seconds and always equals the number of ticks that
/// fired during the session. A session without `ended_at` is still open.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    pub time_at_start: u64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_at_end: Option<u64>,
}

impl Session {
    pub fn open(started_at: DateTime<Utc>, time_at_start: u64) -> Self {
        Self {
            started_at,
            time_at_start,
            ended_at: None,
            time_at_end: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Worked seconds of a closed session. `None` while the session is open.
    pub fn duration_secs(&self) -> Option<u64> {
        self.time_at_end
            .map(|end| end.saturating_sub(self.time_at_start))
    }
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Project {
    pub name: Arc<str>,
    pub time: u64,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Project {
    pub fn new(name: Arc<str>) -> Self {
        Self {
            name,
            time: 0,
            sessions: Vec::new(),
        }
    }

    /// The session still lacking `ended_at`, if any. The invariant is that
    /// at most one exists, and only as the most recent entry.
    pub fn open_session(&self) -> Option<&Session> {
        self.sessions.iter().rev().find(|s| s.is_open())
    }

    pub fn open_session_mut(&mut self) -> Option<&mut Session> {
        self.sessions.iter_mut().rev().find(|s| s.is_open())
    }

    /// Closes sessions left open by a previous run that never stopped. The
    /// worked duration is always the counted ticks, so the end timestamp is
    /// reconstructed from the counter rather than read off the wall clock.
    pub fn recover_open_sessions(&mut self) -> usize {
        let time_now = self.time;
        let mut recovered = 0;
        for session in self.sessions.iter_mut().filter(|s| s.is_open()) {
            let worked = time_now.saturating_sub(session.time_at_start);
            session.ended_at = Some(session.started_at + Duration::seconds(worked as i64));
            session.time_at_end = Some(time_now);
            recovered += 1;
        }
        recovered
    }
}

/// The root persisted document. Created empty on first run and mutated in
/// place afterwards; it outlives the process through the store slot.
#[derive(PartialEq, Eq, Debug, Default, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_open_project: Option<Arc<str>>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Store {
    /// Appends a new project with a zeroed counter and marks it last-open.
    /// Names are case-sensitive, must be non-empty, and must not collide
    /// with an existing project or the placeholder label.
    pub fn create_project(&mut self, name: &str) -> Result<&mut Project, WorklogError> {
        if name.trim().is_empty() {
            return Err(WorklogError::EmptyName);
        }
        if name == EMPTY_PLACEHOLDER || self.find_project(name).is_some() {
            return Err(WorklogError::DuplicateName(Arc::from(name)));
        }

        let name: Arc<str> = Arc::from(name);
        self.last_open_project = Some(name.clone());
        self.projects.push(Project::new(name));
        Ok(self.projects.last_mut().unwrap())
    }

    pub fn find_project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| &*p.name == name)
    }

    pub fn find_project_mut(&mut self, name: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| &*p.name == name)
    }

    /// Records which project should be preselected on the next load. The
    /// name must refer to an existing project; the canonical name is
    /// returned for the caller's selection context.
    pub fn set_last_open(&mut self, name: &str) -> Result<Arc<str>, WorklogError> {
        let project = self
            .find_project(name)
            .ok_or_else(|| WorklogError::UnknownProject(name.to_string()))?;
        let name = project.name.clone();
        self.last_open_project = Some(name.clone());
        Ok(name)
    }

    /// Closes every crash-orphaned open session in the store. Returns how
    /// many were recovered so the caller can decide whether to re-save.
    pub fn recover_open_sessions(&mut self) -> usize {
        let mut recovered = 0;
        for project in &mut self.projects {
            let count = project.recover_open_sessions();
            if count > 0 {
                warn!(
                    "Closed {count} session(s) left open on \"{}\" by a previous run",
                    project.name
                );
            }
            recovered += count;
        }
        recovered
    }
}
