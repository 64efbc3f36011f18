// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # GrayMatter
//!
//! Architecture genomes and the connectomes grown from them.
//!
//! - [`evolutionary`]: build genomes chunk by chunk with deduplicated input
//!   wiring, and persist them as JSON
//! - [`brain_development`]: assemble a genome into regions plus the
//!   dependency multigraph between them
//! - [`burst_engine`]: step every region once per tick
//! - [`config`] and [`observability`]: TOML configuration and logging setup
//!
//! ## Feature Flags
//! - **`parallel`** (default): step regions on the rayon thread pool
//! - **`file-logging`**: write per-run log files
//!
//! ## Usage
//!
//! ```rust
//! use graymatter::prelude::*;
//!
//! let mut genome = Genome::new();
//! let mut sensor = genome.create_chunk(&[], &[], "sensor").unwrap();
//! sensor
//!     .append_layer(16, &[], LayerDynamics::with_flags(vec![0.1], vec![1.0], 0.0, vec![1.0], &[]))
//!     .unwrap();
//! genome.commit_chunk(sensor).unwrap();
//!
//! let bytes = serialize_genome(&genome).unwrap();
//! let mut connectome = ConnectomeAssembler::load(&bytes).unwrap();
//!
//! let mut scheduler = StepScheduler::new(QuiescentEvaluator);
//! scheduler.run(&mut connectome, 3).unwrap();
//! assert_eq!(connectome.regions()[0].tick(), 3);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Genotype
pub use graymatter_evolutionary as evolutionary;

// Phenotype
pub use graymatter_brain_development as brain_development;
pub use graymatter_burst_engine as burst_engine;

// Infrastructure
pub use graymatter_config as config;
pub use graymatter_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::evolutionary::{
        deserialize_genome, load_genome_from_file, save_genome_to_file, serialize_genome, Chunk,
        ChunkId, Genome, GenomeError, LayerDynamics, LayerIndex, LocalExternalId, Polarity,
    };

    pub use crate::brain_development::{
        BduError, Connectome, ConnectomeAssembler, ConnectomeEdge, ConnectomeGraph, Region,
    };

    pub use crate::burst_engine::{
        share, BurstError, DynamicsEvaluator, QuiescentEvaluator, SharedConnectome, StepMode,
        StepScheduler,
    };
}
