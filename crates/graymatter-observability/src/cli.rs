// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-graymatter-evolutionary` to raise a single
//! crate to debug level while everything else stays at the base level.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Per-crate debug switches
///
/// # Example
/// ```rust
/// use graymatter_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-graymatter-burst-engine".to_string()]);
/// assert!(flags.is_enabled("graymatter-burst-engine"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}`.
    /// `--debug-all` enables every crate in [`KNOWN_CRATES`].
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }

        flags
    }

    /// Enable debug output for one crate
    pub fn enable(&mut self, crate_name: &str) {
        let crate_name = crate_name.trim();
        if !crate_name.is_empty() {
            self.enabled_crates.insert(crate_name.to_string(), true);
        }
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Get all enabled crates
    pub fn enabled_crates(&self) -> Vec<&String> {
        self.enabled_crates.keys().collect()
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get log level for a crate
    ///
    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Filter directives with `info` as the base level
    pub fn to_filter_string(&self) -> String {
        self.to_filter_string_with_base("info")
    }

    /// Build an `EnvFilter` directive string
    ///
    /// Events carry either an explicit target (`graymatter-burst-engine`) or
    /// their module path (`graymatter_burst_engine::scheduler`), so each enabled
    /// crate gets a directive in both spellings.
    pub fn to_filter_string_with_base(&self, base_level: &str) -> String {
        let mut crate_names: Vec<&String> = self.enabled_crates.keys().collect();
        crate_names.sort();

        let mut filters = vec![base_level.to_string()];
        for crate_name in crate_names {
            filters.push(format!("{}=debug", crate_name));
            let module_path = crate_name.replace('-', "_");
            if module_path != *crate_name {
                filters.push(format!("{}=debug", module_path));
            }
        }
        filters.join(",")
    }
}

/// Parse debug flags from the process arguments and `GRAYMATTER_DEBUG`
///
/// Environment variable format: comma-separated crate names, e.g.
/// `graymatter-evolutionary,graymatter-burst-engine`, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var("GRAYMATTER_DEBUG") {
        if env_var.trim() == "all" {
            flags.enable_all();
        } else {
            for crate_name in env_var.split(',') {
                flags.enable(crate_name);
            }
        }
    }

    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  GRAYMATTER_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  GRAYMATTER_DEBUG=all                               Enable debug for all crates

Examples:
  --debug-graymatter-evolutionary
  --debug-graymatter-brain-development --debug-graymatter-burst-engine
  GRAYMATTER_DEBUG=graymatter-burst-engine
"#,
        KNOWN_CRATES.join(", ")
    )
}
