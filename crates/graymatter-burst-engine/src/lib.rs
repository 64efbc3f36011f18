// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # GrayMatter Burst Engine
//!
//! Advances the regions of an assembled connectome one tick at a time.
//!
//! ## Architecture
//! - Double-buffered stepping: every layer reads the previous tick's outputs
//! - Neuron models plug in through [`DynamicsEvaluator`]
//! - Rayon for multi-threading (`parallel` feature)
//! - [`SharedConnectome`] for stepping while other threads read

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod dynamics;
pub mod input_resolution;
pub mod scheduler;
pub mod types;

pub use dynamics::{DynamicsEvaluator, QuiescentEvaluator};
pub use input_resolution::{resolve_inputs, OutputSnapshot};
pub use scheduler::{share, RunReport, SharedConnectome, StepMode, StepReport, StepScheduler};
pub use types::{BurstError, BurstResult};
