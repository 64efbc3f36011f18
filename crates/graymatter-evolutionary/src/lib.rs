// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# GrayMatter Evolution & Genome Management

Handles all **genotype** operations for GrayMatter:

- Genome construction (chunks, layers, cross-chunk input wiring)
- Input deduplication and local external id allocation
- Genome I/O (JSON ↔ Rust structs)
- Genome validation

## Architecture

This crate manages the **architectural blueprint** (genotype) of a brain.
The instantiated structure (phenotype) is handled by
`graymatter-brain-development`, and stepping by `graymatter-burst-engine`.

```text
graymatter-evolutionary      graymatter-brain-development     graymatter-burst-engine
───────────────────────      ────────────────────────────     ───────────────────────
│ Genome builder      │  →   │ Region per chunk         │  →  │ step_all (one tick)  │
│ Dedup allocator     │      │ Dependency multigraph    │     │ Dynamics evaluator   │
│ JSON I/O + validate │      └──────────────────────────┘     └──────────────────────┘
└─────────────────────┘
```

## Example

```rust
use graymatter_evolutionary::{Genome, LayerDynamics, serialize_genome, deserialize_genome};

let mut genome = Genome::new();
let mut retina = genome.create_chunk(&[], &[], "retina")?;
retina.append_layer(64, &[], LayerDynamics::with_flags(vec![0.02], vec![0.2], -65.0, vec![8.0], &[]))?;
genome.commit_chunk(retina)?;

let mut cortex = genome.create_chunk(&[0], &[0], "cortex")?;
cortex.append_layer(128, &[-1], LayerDynamics::with_flags(vec![0.02], vec![0.25], -55.0, vec![4.0], &[true]))?;
let cortex_id = genome.commit_chunk(cortex)?;

// Wiring the same source again reuses its local id
assert_eq!(genome.wire_input(cortex_id, &[(0, 0)], &[0])?, vec![-1]);

let bytes = serialize_genome(&genome)?;
assert_eq!(deserialize_genome(&bytes)?, genome);
# Ok::<(), graymatter_evolutionary::GenomeError>(())
```

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod genome;
pub mod runtime;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use genome::{
    deserialize_genome, load_genome_from_file, load_genome_from_json, save_genome_to_file,
    save_genome_to_json, serialize_genome, GenomeParser, GenomeSaver,
};
pub use runtime::{
    Chunk, Genome, InputManifest, Layer, LayerDynamics, LayerRef, ManifestEntry, Polarity,
};
pub use types::{ChunkId, GenomeError, GenomeResult, LayerIndex, LocalExternalId};
pub use validator::{validate_genome, ValidationResult};
