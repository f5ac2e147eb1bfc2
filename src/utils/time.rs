/// Renders a second count as a zero-padded `HH:MM:SS` clock. Totals of 100
/// hours or more grow the hour field instead of truncating it.
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = total_seconds % 3600 / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Renders a second count as a sentence, listing only nonzero components:
/// `3661` becomes "1 hour and 1 minute and 1 second.". Zero renders as
/// "0 seconds.".
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = total_seconds % 3600 / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(count_noun(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(count_noun(minutes, "minute"));
    }
    if seconds > 0 {
        parts.push(count_noun(seconds, "second"));
    }
    if parts.is_empty() {
        parts.push("0 seconds".to_string());
    }

    format!("{}.", parts.join(" and "))
}

fn count_noun(value: u64, unit: &str) -> String {
    if value == 1 {
        format!("1 {unit}")
    } else {
        format!("{value} {unit}s")
    }
}
