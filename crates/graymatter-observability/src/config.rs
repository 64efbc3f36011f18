// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging configuration types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Base log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown log level '{0}' (expected trace, debug, info, warn or error)")]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(UnknownLogLevel(s.to_string())),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLoggingOptions {
    /// Base directory; each run gets its own `run_YYYYMMDD_HHMMSS` folder
    pub log_dir: PathBuf,
    /// Remove run folders older than this many days
    pub retention_days: u64,
    /// Keep at most this many run folders
    pub retention_runs: usize,
}

impl Default for FileLoggingOptions {
    fn default() -> Self {
        FileLoggingOptions {
            log_dir: PathBuf::from("./logs"),
            retention_days: 7,
            retention_runs: 10,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingOptions {
    pub level: LogLevel,
    /// Show event targets on the console
    pub console_targets: bool,
    /// `None` keeps output on the console only
    pub file: Option<FileLoggingOptions>,
}
