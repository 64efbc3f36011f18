// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end: configuration -> genome file -> connectome -> stepping

use std::fs;
use std::path::Path;

use graymatter::config::{load_config, validate_config};
use graymatter::prelude::*;
use tempfile::tempdir;

fn flat(bias: f64) -> LayerDynamics {
    LayerDynamics::with_flags(vec![0.0], vec![1.0], 0.0, vec![bias], &[])
}

/// sensor -> excitatory integrator, sensor -> inhibitory integrator
fn two_way_genome() -> Genome {
    let mut genome = Genome::new();

    let mut sensor = genome.create_chunk(&[], &[], "sensor").unwrap();
    sensor.append_layer(4, &[], flat(1.0)).unwrap();
    genome.commit_chunk(sensor).unwrap();

    for name in ["excited", "inhibited"] {
        let mut chunk = genome.create_chunk(&[], &[], name).unwrap();
        chunk.append_layer(4, &[], flat(0.0)).unwrap();
        genome.commit_chunk(chunk).unwrap();
    }

    genome.wire_input(1, &[(0, 0)], &[0]).unwrap();
    genome
        .wire_input_with_polarity(2, &[(0, 0)], &[0], &[Polarity::Inhibitory])
        .unwrap();
    genome
}

fn write_config(dir: &Path, ticks: u64) -> std::path::PathBuf {
    let config_path = dir.join("graymatter_configuration.toml");
    fs::write(
        &config_path,
        format!(
            "[system]\ndata_dir = \"{}\"\n\n[genome]\npath = \"brain.json\"\n\n[scheduler]\nmode = \"sequential\"\nticks = {}\n",
            dir.display().to_string().replace('\\', "\\\\"),
            ticks
        ),
    )
    .unwrap();
    config_path
}

#[test]
fn test_configured_replay() {
    let dir = tempdir().unwrap();
    let config = load_config(Some(&write_config(dir.path(), 3)), None).unwrap();
    validate_config(&config).unwrap();

    let genome_path = config.resolve_path(&config.genome.path);
    save_genome_to_file(&two_way_genome(), &genome_path).unwrap();

    let genome = load_genome_from_file(&genome_path).unwrap();
    let mut connectome = ConnectomeAssembler::from_genome(&genome).unwrap();
    assert_eq!(connectome.region_count(), 3);
    assert_eq!(connectome.graph().edge_count(), 2);

    // Accumulate inputs on top of a constant bias
    let accumulate = |d: &LayerDynamics, inputs: &[f64], previous: f64| {
        previous + d.increment[0] + inputs.iter().sum::<f64>()
    };
    let mut scheduler = StepScheduler::new(accumulate).with_mode(StepMode::Sequential);
    let report = scheduler
        .run(&mut connectome, config.scheduler.ticks)
        .unwrap();
    assert_eq!(report.final_tick, 3);

    // Integrators read the sensor's previous-tick output: 0, 1, 2
    let regions = connectome.regions();
    assert_eq!(regions[0].outputs(), &[3.0]);
    assert_eq!(regions[1].outputs(), &[3.0]);
    assert_eq!(regions[2].outputs(), &[-3.0]);
    assert!(regions.iter().all(|r| r.tick() == 3));
}

#[test]
fn test_resaved_genome_is_identical() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.json");
    let resaved = dir.path().join("resaved.json");

    save_genome_to_file(&two_way_genome(), &original).unwrap();
    let loaded = load_genome_from_file(&original).unwrap();
    save_genome_to_file(&loaded, &resaved).unwrap();

    assert_eq!(loaded, two_way_genome());
    assert_eq!(
        fs::read_to_string(&original).unwrap(),
        fs::read_to_string(&resaved).unwrap()
    );
}

#[test]
fn test_dot_export_names_regions() {
    let connectome = ConnectomeAssembler::from_genome(&two_way_genome()).unwrap();
    let dot = connectome.to_dot();

    assert!(dot.starts_with("digraph connectome {"));
    assert!(dot.contains("sensor (0)"));
    assert!(dot.contains("inhibited (2)"));
    assert_eq!(dot.matches("->").count(), 2);
}

#[test]
fn test_shared_connectome_steps_under_lock() {
    let shared = share(ConnectomeAssembler::from_genome(&two_way_genome()).unwrap());
    let mut scheduler = StepScheduler::new(QuiescentEvaluator).with_mode(StepMode::Parallel);

    for _ in 0..4 {
        scheduler.step_shared(&shared).unwrap();
    }

    let connectome = shared.read();
    assert!(connectome.regions().iter().all(|r| r.tick() == 4));
    assert_eq!(scheduler.steps_taken(), 4);
}
