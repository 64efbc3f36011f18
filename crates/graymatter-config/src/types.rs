// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `graymatter_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GrayMatterConfig {
    pub system: SystemConfig,
    pub genome: GenomeConfig,
    pub graph: GraphConfig,
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
}

impl GrayMatterConfig {
    /// Resolve a configured path against `system.data_dir` unless it is absolute
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.system.data_dir.join(path)
        }
    }
}

/// System-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Worker threads for parallel stepping (0 = auto-detect)
    pub max_cores: usize,
    /// Base directory for relative paths
    pub data_dir: PathBuf,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            max_cores: 0,
            data_dir: PathBuf::from("."),
        }
    }
}

/// Genome location
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenomeConfig {
    pub path: PathBuf,
    /// Re-save the loaded genome here (pretty JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_path: Option<PathBuf>,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("genomes/starter_genome.json"),
            save_path: None,
        }
    }
}

/// Connectome graph inspection
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Write the dependency graph as Graphviz DOT
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_output: Option<PathBuf>,
}

/// Step scheduler settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// "sequential" or "parallel"
    pub mode: String,
    /// Ticks to run after loading
    pub ticks: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            mode: "parallel".to_string(),
            ticks: 10,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub file_logging: bool,
    pub log_dir: PathBuf,
    pub retention_days: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("logs"),
            retention_days: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: GrayMatterConfig = toml::from_str("").unwrap();
        assert_eq!(config.scheduler.mode, "parallel");
        assert_eq!(config.scheduler.ticks, 10);
        assert_eq!(config.genome.path, PathBuf::from("genomes/starter_genome.json"));
        assert!(config.graph.dot_output.is_none());
    }

    #[test]
    fn test_resolve_path() {
        let mut config = GrayMatterConfig::default();
        config.system.data_dir = PathBuf::from("/srv/graymatter");
        assert_eq!(
            config.resolve_path(Path::new("genomes/a.json")),
            PathBuf::from("/srv/graymatter/genomes/a.json")
        );
        assert_eq!(
            config.resolve_path(Path::new("/tmp/a.json")),
            PathBuf::from("/tmp/a.json")
        );
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut config = GrayMatterConfig::default();
        config.graph.dot_output = Some(PathBuf::from("connectome.dot"));
        let text = toml::to_string(&config).unwrap();
        let back: GrayMatterConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.graph.dot_output, config.graph.dot_output);
        assert!(!text.contains("save_path"));
    }
}
