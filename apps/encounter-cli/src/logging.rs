//! Logging initialization and log file management.
//!
//! Headless commands log human-readable lines to stderr. The interactive
//! `play` command owns the terminal, so it logs JSON lines to
//! `<log-dir>/<session>/<timestamp>.log` instead. Filtering follows
//! `RUST_LOG` in both cases.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log files older than this are removed at startup.
const LOG_RETENTION: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Install the global tracing subscriber.
///
/// With a `session`, events go to a JSON log file under `log_dir` and the
/// returned [`WorkerGuard`] must be held until exit so buffered lines are
/// flushed. Without one, events go to stderr and no guard is returned.
///
/// # Errors
///
/// Returns an error if the log directory or file cannot be created.
pub fn init_tracing(log_dir: &Path, session: Option<&str>) -> Result<Option<WorkerGuard>> {
    let Some(session) = session else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let (writer, guard) = open_log_writer(log_dir, session)?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer),
        )
        .init();
    Ok(Some(guard))
}

/// Create the session directory and a fresh log file inside it.
fn open_log_writer(log_dir: &Path, session: &str) -> Result<(NonBlocking, WorkerGuard)> {
    let log_path = build_log_path(log_dir, session, SystemTime::now());
    let session_dir = log_dir.join(session);

    fs::create_dir_all(&session_dir)
        .with_context(|| format!("failed to create log directory: {}", session_dir.display()))?;

    let log_file = fs::File::create(&log_path)
        .with_context(|| format!("failed to create log file: {}", log_path.display()))?;

    Ok(tracing_appender::non_blocking(log_file))
}

/// `<log_dir>/<session>/<YYYYMMDD_HHMMSS>.log`
fn build_log_path(log_dir: &Path, session: &str, now: SystemTime) -> PathBuf {
    log_dir
        .join(session)
        .join(format!("{}.log", utc_timestamp(now)))
}

/// Remove `.log` files past the retention window, then any session
/// directories left empty.
///
/// Best effort: failures are reported with `eprintln!` because tracing is
/// not installed yet when this runs.
pub fn cleanup_old_logs(log_dir: &Path) {
    if !log_dir.is_dir() {
        return;
    }
    let Some(cutoff) = SystemTime::now().checked_sub(LOG_RETENTION) else {
        return;
    };

    remove_stale_logs(log_dir, cutoff);
    prune_empty_dirs(log_dir);
}

fn remove_stale_logs(dir: &Path, cutoff: SystemTime) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("warning: cannot read log directory {}: {e}", dir.display());
            return;
        }
    };

    for path in entries.filter_map(|entry| entry.ok().map(|e| e.path())) {
        if path.is_dir() {
            remove_stale_logs(&path, cutoff);
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }

        let stale = fs::metadata(&path)
            .and_then(|m| m.modified())
            .is_ok_and(|modified| modified < cutoff);
        if stale && let Err(e) = fs::remove_file(&path) {
            eprintln!("warning: cannot remove old log {}: {e}", path.display());
        }
    }
}

/// Remove empty subdirectories of `dir`, keeping `dir` itself.
fn prune_empty_dirs(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.filter_map(|entry| entry.ok().map(|e| e.path())) {
        if path.is_dir() {
            prune_empty_dirs(&path);
            // fails on non-empty directories
            let _ = fs::remove_dir(&path);
        }
    }
}

/// Format `time` as `YYYYMMDD_HHMMSS` in UTC.
fn utc_timestamp(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let (year, month, day) = civil_date(secs / 86_400);
    let of_day = secs % 86_400;

    format!(
        "{year:04}{month:02}{day:02}_{:02}{:02}{:02}",
        of_day / 3600,
        (of_day % 3600) / 60,
        of_day % 60
    )
}

/// Days since 1970-01-01 to a Gregorian (year, month, day).
///
/// Hinnant's `civil_from_days`, with eras of 400 years starting on March 1.
fn civil_date(days: u64) -> (u64, u64, u64) {
    let z = days as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let day_of_era = z.rem_euclid(146_097) as u64;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = year_of_era as i64 + era * 400 + i64::from(month <= 2);

    (year as u64, month, day)
}
