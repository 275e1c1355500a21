//! Colored terminal rendering of session log entries.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::events::Severity;
use crate::session::{IngestReport, LogEntry};

/// Timestamp format for log lines, matching the tracing output.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Indentation applied to continuation lines of a multi-line body.
const CONTINUATION_INDENT: &str = "    ";

/// Color the prefix tag by severity.
fn paint_prefix(prefix: &str, severity: Severity) -> String {
    match severity {
        Severity::Error => prefix.red().bold().to_string(),
        Severity::Warning => prefix.yellow().bold().to_string(),
        Severity::Success => prefix.green().bold().to_string(),
        Severity::Processing => prefix.magenta().bold().to_string(),
        Severity::Info => prefix.cyan().bold().to_string(),
    }
}

/// Render one entry as terminal text.
///
/// The first body line follows the timestamp and prefix; later lines are
/// indented. With `plain` set no escape codes are emitted.
#[must_use]
pub fn format_entry(entry: &LogEntry<'_>, plain: bool) -> String {
    let ts = entry.record.occurred_at.format(TIMESTAMP_FORMAT).to_string();
    let mut lines = entry.label.body.lines();
    let first = lines.next().unwrap_or_default();

    let mut out = if plain {
        format!("{ts} {} {first}", entry.label.prefix)
    } else {
        format!(
            "{} {} {first}",
            ts.dimmed(),
            paint_prefix(entry.label.prefix, entry.severity)
        )
    };

    for line in lines {
        out.push('\n');
        out.push_str(CONTINUATION_INDENT);
        if plain {
            out.push_str(line);
        } else {
            out.push_str(&line.dimmed().to_string());
        }
    }
    out
}

/// Print entries to stdout.
pub fn print_entries(entries: &[LogEntry<'_>], plain: bool) {
    let mut stdout = io::stdout().lock();
    for entry in entries {
        let _ = writeln!(stdout, "{}", format_entry(entry, plain));
    }
    let _ = stdout.flush();
}

/// Print a one-line summary of an ingest batch.
pub fn print_report(session: &str, report: &IngestReport, plain: bool) {
    let summary = format!(
        "read={} accepted={} rejected={}{}",
        report.read,
        report.accepted,
        report.rejected,
        if report.replaced { " (feed replaced)" } else { "" }
    );
    if plain {
        println!("[AUDIT] session={session} {summary}");
    } else {
        println!(
            "{} session={} {}",
            "[AUDIT]".blue().bold(),
            session.cyan(),
            summary.dimmed()
        );
    }
    let _ = io::stdout().flush();
}

/// Print a notice that a session log was cleared.
pub fn print_cleared(session: &str, plain: bool) {
    if plain {
        println!("[AUDIT] Cleared session {session}");
    } else {
        println!("{} Cleared session {}", "[AUDIT]".blue().bold(), session.cyan());
    }
    let _ = io::stdout().flush();
}
