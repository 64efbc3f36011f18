// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Step scheduler - advances every region by one tick per call.

A step runs in two phases:

1. **Compute**: snapshot all layer outputs, then evaluate every layer of
   every region against the snapshot (sequentially or on the rayon pool)
2. **Apply**: install the new outputs and bump each region's tick

If any layer fails to resolve its inputs the compute phase returns the error
and no region advances, so ticks never drift apart.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::sync::Arc;
use std::time::Instant;

use graymatter_brain_development::{Connectome, Region};
use parking_lot::RwLock;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::dynamics::{DynamicsEvaluator, QuiescentEvaluator};
use crate::input_resolution::{resolve_inputs, OutputSnapshot};
use crate::types::BurstResult;

/// Connectome shared between a stepping thread and readers
pub type SharedConnectome = Arc<RwLock<Connectome>>;

/// Wrap a connectome for shared access
pub fn share(connectome: Connectome) -> SharedConnectome {
    Arc::new(RwLock::new(connectome))
}

/// How regions are visited within a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepMode {
    #[default]
    Sequential,
    /// Rayon thread pool; falls back to sequential without the `parallel` feature
    Parallel,
}

/// Outcome of one `step_all` call
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Highest region tick after the step (0 when there are no regions)
    pub tick: u64,
    pub regions_stepped: usize,
    pub duration_ms: f64,
}

/// Outcome of a multi-tick run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub ticks: u64,
    pub final_tick: u64,
    pub duration_ms: f64,
}

/// Steps regions with a dynamics evaluator
#[derive(Debug)]
pub struct StepScheduler<E = QuiescentEvaluator> {
    evaluator: E,
    mode: StepMode,
    steps_taken: u64,
}

impl Default for StepScheduler<QuiescentEvaluator> {
    fn default() -> Self {
        Self::new(QuiescentEvaluator)
    }
}

impl<E: DynamicsEvaluator> StepScheduler<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            mode: StepMode::default(),
            steps_taken: 0,
        }
    }

    pub fn with_mode(mut self, mode: StepMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Number of successful `step_all` calls made through this scheduler
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Advance every region exactly once
    pub fn step_all(&mut self, regions: &mut [Region]) -> BurstResult<StepReport> {
        let start = Instant::now();

        let snapshot = OutputSnapshot::capture(regions);
        let next = self.compute(regions, &snapshot)?;

        let mut tick: u64 = 0;
        for (region, outputs) in regions.iter_mut().zip(next) {
            tick = tick.max(region.advance(outputs)?);
        }
        self.steps_taken += 1;

        let report = StepReport {
            tick,
            regions_stepped: regions.len(),
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        trace!(
            target: "graymatter-burst-engine",
            "🔥 [STEP] tick {} ({} regions, {:.3}ms)",
            report.tick,
            report.regions_stepped,
            report.duration_ms
        );
        Ok(report)
    }

    /// Advance every region of a connectome exactly once
    pub fn step_connectome(&mut self, connectome: &mut Connectome) -> BurstResult<StepReport> {
        self.step_all(connectome.regions_mut())
    }

    /// Step a shared connectome, holding the write lock for this call only
    pub fn step_shared(&mut self, shared: &SharedConnectome) -> BurstResult<StepReport> {
        let mut connectome = shared.write();
        self.step_connectome(&mut connectome)
    }

    /// Step `ticks` times, stopping at the first error
    pub fn run(&mut self, connectome: &mut Connectome, ticks: u64) -> BurstResult<RunReport> {
        let start = Instant::now();
        let mut final_tick = connectome
            .regions()
            .iter()
            .map(Region::tick)
            .max()
            .unwrap_or(0);

        for _ in 0..ticks {
            final_tick = self.step_connectome(connectome)?.tick;
        }

        let report = RunReport {
            ticks,
            final_tick,
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        debug!(
            target: "graymatter-burst-engine",
            "🔥 [STEP] Ran {} ticks over {} regions in {:.2}ms ({:?})",
            report.ticks,
            connectome.region_count(),
            report.duration_ms,
            self.mode
        );
        Ok(report)
    }

    fn compute(&self, regions: &[Region], snapshot: &OutputSnapshot) -> BurstResult<Vec<Vec<f64>>> {
        match self.mode {
            StepMode::Sequential => regions
                .iter()
                .map(|region| compute_region(&self.evaluator, region, snapshot))
                .collect(),
            StepMode::Parallel => self.compute_parallel(regions, snapshot),
        }
    }

    #[cfg(feature = "parallel")]
    fn compute_parallel(
        &self,
        regions: &[Region],
        snapshot: &OutputSnapshot,
    ) -> BurstResult<Vec<Vec<f64>>> {
        regions
            .par_iter()
            .map(|region| compute_region(&self.evaluator, region, snapshot))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_parallel(
        &self,
        regions: &[Region],
        snapshot: &OutputSnapshot,
    ) -> BurstResult<Vec<Vec<f64>>> {
        regions
            .iter()
            .map(|region| compute_region(&self.evaluator, region, snapshot))
            .collect()
    }
}

/// Next output of every layer of one region
fn compute_region<E: DynamicsEvaluator>(
    evaluator: &E,
    region: &Region,
    snapshot: &OutputSnapshot,
) -> BurstResult<Vec<f64>> {
    region
        .layers()
        .iter()
        .zip(region.outputs())
        .map(|(layer, &previous)| {
            let inputs = resolve_inputs(region, layer, snapshot)?;
            Ok(evaluator.evaluate(layer.dynamics(), &inputs, previous))
        })
        .collect()
}
