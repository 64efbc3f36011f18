// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for GrayMatter
//!
//! Console output is always on. With the `file-logging` feature, a combined
//! log file is written into a timestamped run folder and old runs are pruned.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogLevel, LoggingOptions};

const RUN_FOLDER_PREFIX: &str = "run_";
const RUN_FOLDER_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Keeps file writers alive; logs are flushed when this is dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving file output, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Build the event filter
///
/// Debug flags win. Without flags, `RUST_LOG` is honored before falling back
/// to `level`.
pub fn build_env_filter(debug_flags: &CrateDebugFlags, level: LogLevel) -> EnvFilter {
    if debug_flags.any_enabled() {
        return EnvFilter::new(debug_flags.to_filter_string_with_base(level.as_str()));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Initialize the global subscriber
///
/// Layout with file logging enabled:
/// ```text
/// ./logs/
///   └── run_20250101_120000/
///       └── graymatter.log
/// ```
///
/// # Errors
///
/// Fails when a global subscriber is already installed or the run folder
/// cannot be created.
pub fn init_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(options.console_targets)
        .with_file(false)
        .with_line_number(false)
        .with_filter(build_env_filter(debug_flags, options.level))
        .boxed();
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let mut file_guards = Vec::new();
    #[allow(unused_mut)]
    let mut log_dir = None;
    #[allow(unused_mut)]
    let mut file_logging_unavailable = false;

    if let Some(file) = &options.file {
        #[cfg(feature = "file-logging")]
        {
            let run_folder = create_run_folder(&file.log_dir)?;
            cleanup_old_logs(&file.log_dir, file.retention_days, file.retention_runs)?;

            let appender = tracing_appender::rolling::never(&run_folder, "graymatter.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            file_guards.push(guard);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(build_env_filter(debug_flags, options.level))
                .boxed();
            layers.push(file_layer);
            log_dir = Some(run_folder);
        }
        #[cfg(not(feature = "file-logging"))]
        {
            let _ = file;
            file_logging_unavailable = true;
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    if file_logging_unavailable {
        tracing::warn!("File logging requested but this build lacks the `file-logging` feature");
    }

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
    })
}

/// Initialize console logging at `info`
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingOptions::default())
}

#[cfg(feature = "file-logging")]
fn create_run_folder(base_log_dir: &Path) -> Result<PathBuf> {
    let timestamp = Utc::now().format(RUN_FOLDER_FORMAT);
    let run_folder = base_log_dir.join(format!("{}{}", RUN_FOLDER_PREFIX, timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    Ok(run_folder)
}

/// Remove old run folders under `base_log_dir`
///
/// Folders older than `retention_days` go first, then the oldest survivors
/// until at most `retention_runs` remain. Entries that are not run folders
/// are left alone. Returns the number of folders removed.
///
/// # Errors
///
/// Fails when `retention_days` reaches past the representable date range.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let cutoff_date = i64::try_from(retention_days)
        .ok()
        .and_then(chrono::Duration::try_days)
        .and_then(|retention| Utc::now().checked_sub_signed(retention))
        .with_context(|| format!("Log retention of {} days is out of range", retention_days))?;

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let started = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(RUN_FOLDER_PREFIX))
            .and_then(|ts| NaiveDateTime::parse_from_str(ts, RUN_FOLDER_FORMAT).ok());
        if let Some(started) = started {
            runs.push((path, started.and_utc()));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, dt)| *dt);

    let expired = runs.iter().take_while(|(_, dt)| *dt < cutoff_date).count();
    let surplus = (runs.len() - expired).saturating_sub(retention_runs);

    let mut removed = 0;
    for (path, _) in runs.iter().take(expired + surplus) {
        match std::fs::remove_dir_all(path) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            ),
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn run_folder(base: &Path, started: DateTime<Utc>) -> PathBuf {
        let path = base.join(format!(
            "{}{}",
            RUN_FOLDER_PREFIX,
            started.format(RUN_FOLDER_FORMAT)
        ));
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn test_cleanup_removes_expired_runs() {
        let dir = tempdir().unwrap();
        let now = Utc::now();
        let ancient = run_folder(dir.path(), now - chrono::Duration::days(90));
        let recent = run_folder(dir.path(), now - chrono::Duration::hours(1));
        let unrelated = dir.path().join("notes");
        std::fs::create_dir_all(&unrelated).unwrap();

        let removed = cleanup_old_logs(dir.path(), 30, 10).unwrap();

        assert_eq!(removed, 1);
        assert!(!ancient.exists());
        assert!(recent.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_cleanup_caps_run_count() {
        let dir = tempdir().unwrap();
        let now = Utc::now();
        let oldest = run_folder(dir.path(), now - chrono::Duration::hours(3));
        let middle = run_folder(dir.path(), now - chrono::Duration::hours(2));
        let newest = run_folder(dir.path(), now - chrono::Duration::hours(1));

        let removed = cleanup_old_logs(dir.path(), 30, 1).unwrap();

        assert_eq!(removed, 2);
        assert!(!oldest.exists());
        assert!(!middle.exists());
        assert!(newest.exists());
    }

    #[test]
    fn test_cleanup_rejects_unrepresentable_retention() {
        let dir = tempdir().unwrap();
        let current = run_folder(dir.path(), Utc::now());

        assert!(cleanup_old_logs(dir.path(), 1_000_000_000, 10).is_err());
        assert!(cleanup_old_logs(dir.path(), u64::MAX, 10).is_err());
        assert!(current.exists());
    }

    #[test]
    fn test_cleanup_missing_dir() {
        let dir = tempdir().unwrap();
        assert_eq!(cleanup_old_logs(&dir.path().join("absent"), 1, 1).unwrap(), 0);
    }

    #[test]
    fn test_debug_flags_drive_filter() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-graymatter-evolutionary".to_string()]);
        let filter = build_env_filter(&flags, LogLevel::Warn).to_string();
        assert!(filter.contains("graymatter_evolutionary=debug"));
        assert!(filter.contains("warn"));
    }

    #[test]
    fn test_second_init_fails() {
        let flags = CrateDebugFlags::default();
        let _guard = init_logging_default(&flags).unwrap();
        assert!(init_logging_default(&flags).is_err());
    }
}
