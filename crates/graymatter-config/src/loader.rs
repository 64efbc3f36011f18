// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, GrayMatterConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "graymatter_configuration.toml";

/// Find the GrayMatter configuration file
///
/// Search order:
/// 1. `GRAYMATTER_CONFIG_PATH` environment variable
/// 2. Current working directory: `./graymatter_configuration.toml`
/// 3. Parent directories (searches up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("GRAYMATTER_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by GRAYMATTER_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        for ancestor in cwd.ancestors().skip(1).take(5) {
            search_paths.push(ancestor.join(CONFIG_FILE_NAME));
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "GrayMatter configuration file '{}' not found in any of these locations:\n{}\n\nSet GRAYMATTER_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Call [`crate::validate_config`] on the result before use.
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<GrayMatterConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: GrayMatterConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `GRAYMATTER_MAX_CORES` -> `system.max_cores`
/// - `GRAYMATTER_DATA_DIR` -> `system.data_dir`
/// - `GRAYMATTER_GENOME_PATH` -> `genome.path`
/// - `GRAYMATTER_GENOME_SAVE_PATH` -> `genome.save_path`
/// - `GRAYMATTER_DOT_OUTPUT` -> `graph.dot_output`
/// - `GRAYMATTER_SCHEDULER_MODE` -> `scheduler.mode`
/// - `GRAYMATTER_TICKS` -> `scheduler.ticks`
/// - `GRAYMATTER_LOG_LEVEL` -> `logging.level`
/// - `GRAYMATTER_FILE_LOGGING` -> `logging.file_logging`
/// - `GRAYMATTER_LOG_DIR` -> `logging.log_dir`
pub fn apply_environment_overrides(config: &mut GrayMatterConfig) {
    // System settings
    if let Ok(value) = env::var("GRAYMATTER_MAX_CORES") {
        if let Ok(cores) = value.parse::<usize>() {
            config.system.max_cores = cores;
        }
    }
    if let Ok(value) = env::var("GRAYMATTER_DATA_DIR") {
        config.system.data_dir = PathBuf::from(value);
    }

    // Genome + graph
    if let Ok(value) = env::var("GRAYMATTER_GENOME_PATH") {
        config.genome.path = PathBuf::from(value);
    }
    if let Ok(value) = env::var("GRAYMATTER_GENOME_SAVE_PATH") {
        config.genome.save_path = Some(PathBuf::from(value));
    }
    if let Ok(value) = env::var("GRAYMATTER_DOT_OUTPUT") {
        config.graph.dot_output = Some(PathBuf::from(value));
    }

    // Scheduler
    if let Ok(value) = env::var("GRAYMATTER_SCHEDULER_MODE") {
        config.scheduler.mode = value;
    }
    if let Ok(value) = env::var("GRAYMATTER_TICKS") {
        if let Ok(ticks) = value.parse::<u64>() {
            config.scheduler.ticks = ticks;
        }
    }

    // Logging
    if let Ok(value) = env::var("GRAYMATTER_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("GRAYMATTER_FILE_LOGGING") {
        config.logging.file_logging = parse_bool(&value);
    }
    if let Ok(value) = env::var("GRAYMATTER_LOG_DIR") {
        config.logging.log_dir = PathBuf::from(value);
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"genome_path": "brain.json", "ticks": "100"}`)
pub fn apply_cli_overrides(config: &mut GrayMatterConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("max_cores") {
        if let Ok(cores) = value.parse::<usize>() {
            config.system.max_cores = cores;
        }
    }
    if let Some(value) = cli_args.get("data_dir") {
        config.system.data_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("genome_path") {
        config.genome.path = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("save_path") {
        config.genome.save_path = Some(PathBuf::from(value));
    }
    if let Some(value) = cli_args.get("dot_output") {
        config.graph.dot_output = Some(PathBuf::from(value));
    }
    if let Some(value) = cli_args.get("scheduler_mode") {
        config.scheduler.mode = value.clone();
    }
    if let Some(value) = cli_args.get("ticks") {
        if let Ok(ticks) = value.parse::<u64>() {
            config.scheduler.ticks = ticks;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("file_logging") {
        config.logging.file_logging = parse_bool(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("GRAYMATTER_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("GRAYMATTER_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();

        env::set_var("GRAYMATTER_CONFIG_PATH", dir.path().join("absent.toml"));
        let result = find_config_file();
        env::remove_var("GRAYMATTER_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let saved_ticks = env::var("GRAYMATTER_TICKS").ok();
        env::remove_var("GRAYMATTER_TICKS");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[scheduler]").unwrap();
        writeln!(file, "ticks = 250").unwrap();
        writeln!(file, "[genome]").unwrap();
        writeln!(file, "path = \"brains/brain-data.json\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.scheduler.ticks, 250);
        assert_eq!(config.genome.path, PathBuf::from("brains/brain-data.json"));
        assert_eq!(config.scheduler.mode, "parallel");

        if let Some(value) = saved_ticks {
            env::set_var("GRAYMATTER_TICKS", value);
        }
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[scheduler\nticks = ").unwrap();

        assert!(matches!(
            load_config(Some(&config_path), None),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = GrayMatterConfig::default();

        env::set_var("GRAYMATTER_SCHEDULER_MODE", "sequential");
        env::set_var("GRAYMATTER_TICKS", "42");
        env::set_var("GRAYMATTER_FILE_LOGGING", "yes");

        apply_environment_overrides(&mut config);

        env::remove_var("GRAYMATTER_SCHEDULER_MODE");
        env::remove_var("GRAYMATTER_TICKS");
        env::remove_var("GRAYMATTER_FILE_LOGGING");

        assert_eq!(config.scheduler.mode, "sequential");
        assert_eq!(config.scheduler.ticks, 42);
        assert!(config.logging.file_logging);
    }

    #[test]
    fn test_unparseable_env_value_is_ignored() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = GrayMatterConfig::default();

        env::set_var("GRAYMATTER_TICKS", "many");
        apply_environment_overrides(&mut config);
        env::remove_var("GRAYMATTER_TICKS");

        assert_eq!(config.scheduler.ticks, 10);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = GrayMatterConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("genome_path".to_string(), "other.json".to_string());
        cli_args.insert("dot_output".to_string(), "graph.dot".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.genome.path, PathBuf::from("other.json"));
        assert_eq!(config.graph.dot_output, Some(PathBuf::from("graph.dot")));
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        // CLI overrides take precedence over environment variables
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[scheduler]").unwrap();
        writeln!(file, "mode = \"sequential\"").unwrap();
        writeln!(file, "ticks = 5").unwrap();

        env::set_var("GRAYMATTER_SCHEDULER_MODE", "parallel");
        env::set_var("GRAYMATTER_TICKS", "50");

        let mut cli_args = HashMap::new();
        cli_args.insert("ticks".to_string(), "500".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("GRAYMATTER_SCHEDULER_MODE");
        env::remove_var("GRAYMATTER_TICKS");

        // CLI wins for ticks, env wins for mode (no CLI override)
        assert_eq!(config.scheduler.ticks, 500);
        assert_eq!(config.scheduler.mode, "parallel");
    }
}
