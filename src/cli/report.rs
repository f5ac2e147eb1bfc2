use std::fmt::Write;

use chrono::Local;

use crate::{
    error::WorklogError,
    store::entities::{Project, Store},
    utils::time::{format_clock, format_duration},
};

/// Renders the session log for one project: the running total, then one
/// line per session. Defaults to the last-open project when no name is
/// given, like every other command.
pub fn render_session_report(
    store: &Store,
    project: Option<&str>,
) -> Result<String, WorklogError> {
    let name = project
        .or(store.last_open_project.as_deref())
        .ok_or(WorklogError::NoCurrentProject)?;
    let project = store
        .find_project(name)
        .ok_or_else(|| WorklogError::UnknownProject(name.to_string()))?;

    Ok(render_project(project))
}

fn render_project(project: &Project) -> String {
    let mut out = String::new();
    writeln!(out, "{}\t{}", project.name, format_clock(project.time)).unwrap();

    if project.sessions.is_empty() {
        writeln!(out, "No sessions recorded.").unwrap();
        return out;
    }

    for session in &project.sessions {
        let started = session.started_at.with_timezone(&Local);
        match session.duration_secs() {
            Some(duration) => writeln!(
                out,
                "{}\t{}",
                started.format("%x %H:%M:%S"),
                format_duration(duration)
            )
            .unwrap(),
            None => writeln!(out, "{}\tin progress", started.format("%x %H:%M:%S")).unwrap(),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use super::render_session_report;
    use crate::{
        error::WorklogError,
        store::entities::{Session, Store},
    };

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn store_with_sessions() -> Store {
        let started = Utc.from_utc_datetime(&TEST_START_DATE);
        let mut store = Store::default();
        let project = store.create_project("Alpha").unwrap();
        project.time = 3661;
        project.sessions.push(Session {
            started_at: started,
            time_at_start: 0,
            ended_at: Some(started + chrono::Duration::seconds(3661)),
            time_at_end: Some(3661),
        });
        project.sessions.push(Session::open(started, 3661));
        store
    }

    #[test]
    fn report_lists_totals_and_sessions() {
        let store = store_with_sessions();
        let report = render_session_report(&store, Some("Alpha")).unwrap();

        assert!(report.starts_with("Alpha\t01:01:01"));
        assert!(report.contains("1 hour and 1 minute and 1 second."));
        assert!(report.contains("in progress"));
    }

    #[test]
    fn report_defaults_to_the_last_open_project() {
        let store = store_with_sessions();
        let report = render_session_report(&store, None).unwrap();
        assert!(report.starts_with("Alpha"));
    }

    #[test]
    fn report_needs_a_resolvable_project() {
        let store = Store::default();
        assert_eq!(
            render_session_report(&store, None).unwrap_err(),
            WorklogError::NoCurrentProject
        );
        assert_eq!(
            render_session_report(&store_with_sessions(), Some("Gamma")).unwrap_err(),
            WorklogError::UnknownProject("Gamma".into())
        );
    }

    #[test]
    fn empty_projects_say_so() {
        let mut store = Store::default();
        store.create_project("Alpha").unwrap();
        let report = render_session_report(&store, None).unwrap();
        assert!(report.contains("No sessions recorded."));
    }
}
