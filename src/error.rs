use std::sync::Arc;

use thiserror::Error;

/// Domain errors reported back to the user. Consistency faults (a missing
/// open session, an unreadable slot) are handled with logged warnings
/// instead of variants here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorklogError {
    #[error("a project named \"{0}\" already exists")]
    DuplicateName(Arc<str>),

    #[error("project names cannot be empty")]
    EmptyName,

    #[error("no project named \"{0}\"")]
    UnknownProject(String),

    #[error("no project is selected. Create one with `worklog new <name>`")]
    NoCurrentProject,

    #[error("the timer is already running")]
    TimerAlreadyRunning,
}
