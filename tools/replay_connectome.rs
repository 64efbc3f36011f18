// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connectome Replay Tool

Loads a genome, assembles its connectome, steps it for the configured number
of ticks and reports the result. Optionally re-saves the genome and writes
the region dependency graph as Graphviz DOT.

Usage:
  cargo run --bin replay_connectome -- [--config <file>] [--genome <file>] [--ticks N]
      [--mode sequential|parallel] [--save <file>] [--dot <file>] [--debug-<crate>]

Example:
  cargo run --bin replay_connectome -- --genome crates/graymatter-evolutionary/genomes/starter_genome.json --ticks 25 --dot connectome.dot

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use graymatter::config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    validate_config, ConfigError, GrayMatterConfig,
};
use graymatter::observability::{
    debug_flags_help, init_logging, parse_debug_flags, FileLoggingOptions, LoggingOptions,
};
use graymatter::prelude::*;
use tracing::info;

/// Flags taking a value, mapped to configuration override keys
const VALUE_FLAGS: &[(&str, &str)] = &[
    ("--genome", "genome_path"),
    ("--save", "save_path"),
    ("--dot", "dot_output"),
    ("--ticks", "ticks"),
    ("--mode", "scheduler_mode"),
    ("--log-level", "log_level"),
    ("--max-cores", "max_cores"),
    ("--data-dir", "data_dir"),
];

struct Invocation {
    config_path: Option<PathBuf>,
    overrides: HashMap<String, String>,
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} [--config <file>] [--genome <file>] [--ticks N] [--mode sequential|parallel]",
        program
    );
    eprintln!("       [--save <file>] [--dot <file>] [--log-level <level>] [--max-cores N] [--data-dir <dir>]");
    eprintln!();
    eprintln!("{}", debug_flags_help());
}

fn parse_invocation(args: &[String]) -> Result<Invocation> {
    let mut config_path = None;
    let mut overrides = HashMap::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg.starts_with("--debug-") {
            continue;
        }
        if arg == "--config" {
            let value = iter.next().context("--config requires a value")?;
            config_path = Some(PathBuf::from(value));
            continue;
        }
        match VALUE_FLAGS.iter().find(|(flag, _)| flag == arg) {
            Some((flag, key)) => {
                let value = iter
                    .next()
                    .with_context(|| format!("{} requires a value", flag))?;
                overrides.insert(key.to_string(), value.clone());
            }
            None => bail!("Unknown argument: {}", arg),
        }
    }

    Ok(Invocation {
        config_path,
        overrides,
    })
}

/// Load the configuration file, or run on defaults when none is found
fn resolve_config(invocation: &Invocation) -> Result<GrayMatterConfig> {
    let config_path = match &invocation.config_path {
        Some(path) => Some(path.clone()),
        None => match find_config_file() {
            Ok(path) => Some(path),
            Err(ConfigError::FileNotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
    };

    let config = match config_path {
        Some(path) => load_config(Some(&path), Some(&invocation.overrides))
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            let mut config = GrayMatterConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, &invocation.overrides);
            config
        }
    };

    validate_config(&config)?;
    Ok(config)
}

fn logging_options(config: &GrayMatterConfig) -> Result<LoggingOptions> {
    let file = config.logging.file_logging.then(|| FileLoggingOptions {
        log_dir: config.resolve_path(&config.logging.log_dir),
        retention_days: config.logging.retention_days,
        ..FileLoggingOptions::default()
    });

    Ok(LoggingOptions {
        level: config.logging.level.parse()?,
        console_targets: false,
        file,
    })
}

/// Leaky integrator driven by its sign-adjusted inputs plus a constant bias
fn leaky_integrator(dynamics: &LayerDynamics, inputs: &[f64], previous: f64) -> f64 {
    let leak = dynamics.recovery_rate.first().copied().unwrap_or(0.0);
    let gain = dynamics.coupling.first().copied().unwrap_or(1.0);
    let bias = dynamics.increment.first().copied().unwrap_or(0.0);
    previous * (1.0 - leak) + gain * inputs.iter().sum::<f64>() + bias
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        return Ok(());
    }

    let invocation = match parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("❌ {}", e);
            print_usage(&args[0]);
            std::process::exit(2);
        }
    };

    let config = resolve_config(&invocation)?;
    let _logging = init_logging(&parse_debug_flags(), &logging_options(&config)?)?;

    #[cfg(feature = "parallel")]
    if config.system.max_cores > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.system.max_cores)
            .build_global()
            .context("Failed to size the rayon thread pool")?;
    }

    let mode = match config.scheduler.mode.as_str() {
        "sequential" => StepMode::Sequential,
        _ => StepMode::Parallel,
    };
    let genome_path = config.resolve_path(&config.genome.path);

    println!("🧬 GrayMatter Connectome Replay");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Genome: {}", genome_path.display());
    println!("⏱️  Ticks:  {} ({:?})", config.scheduler.ticks, mode);
    println!();

    let genome = load_genome_from_file(&genome_path)
        .with_context(|| format!("Failed to load genome {}", genome_path.display()))?;

    if let Some(save_path) = &config.genome.save_path {
        let save_path = config.resolve_path(save_path);
        save_genome_to_file(&genome, &save_path)
            .with_context(|| format!("Failed to save genome {}", save_path.display()))?;
        println!("💾 Saved genome to {}", save_path.display());
    }

    let mut connectome = ConnectomeAssembler::from_genome(&genome)?;
    let graph = connectome.graph();
    println!(
        "🏗️  Assembled {} regions, {} edges ({} self-loops)",
        connectome.region_count(),
        graph.edge_count(),
        graph.self_loops().count()
    );

    if let Some(dot_path) = &config.graph.dot_output {
        let dot_path = config.resolve_path(dot_path);
        fs::write(&dot_path, connectome.to_dot())
            .with_context(|| format!("Failed to write {}", dot_path.display()))?;
        println!("🕸️  Wrote dependency graph to {}", dot_path.display());
    }

    let mut scheduler = StepScheduler::new(leaky_integrator).with_mode(mode);
    let report = scheduler.run(&mut connectome, config.scheduler.ticks)?;
    info!(
        "Replay finished: {} ticks in {:.2}ms",
        report.ticks, report.duration_ms
    );

    println!();
    println!("🔥 Ran {} ticks in {:.2}ms", report.ticks, report.duration_ms);
    for region in connectome.regions() {
        let last = region.outputs().last().copied().unwrap_or(0.0);
        println!(
            "   [{}] {:<16} tick {:>6}  last layer {:>12.4}",
            region.id(),
            region.name(),
            region.tick(),
            last
        );
    }

    Ok(())
}
