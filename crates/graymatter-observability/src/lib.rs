// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # graymatter-observability
//!
//! Logging infrastructure shared by the GrayMatter crates and tools.
//!
//! Provides console logging with per-crate debug flags and, behind the
//! `file-logging` feature, timestamped log folders with retention cleanup.
//!
//! ## Features
//! - `file-logging`: Write a combined log file per run (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known GrayMatter crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "graymatter",
    "graymatter-config",
    "graymatter-evolutionary",
    "graymatter-brain-development",
    "graymatter-burst-engine",
];
