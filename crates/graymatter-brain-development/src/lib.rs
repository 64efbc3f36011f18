// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# GrayMatter BDU (Brain Development Utilities)

Turns a persisted genome (genotype) into a runnable connectome (phenotype):

- one [`Region`] per chunk, owning a copy of the chunk's layers and manifest
- a [`ConnectomeGraph`]: directed multigraph with one edge per input
  manifest entry, parallel edges and self-loops preserved

Stepping regions is the job of `graymatter-burst-engine`.

## Example

```rust
use graymatter_brain_development::ConnectomeAssembler;

let json = br#"{"chunks": [
    {"id": 0, "name": "loop",
     "input": {"from_node": [0], "from_layer": [0], "local_layer_assigned_id": [-1]},
     "layers": [{"layer": 0, "size": 4, "dynamics": {"a": [], "b": [], "c": 0, "d": []},
                 "input_layers": [-1], "exci_inhi": [true]}]}
]}"#;

let connectome = ConnectomeAssembler::load(json)?;
assert_eq!(connectome.region_count(), 1);
assert_eq!(connectome.graph().self_loops().count(), 1);
# Ok::<(), graymatter_brain_development::BduError>(())
```

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod assembler;
pub mod connectome;
pub mod models;
pub mod types;

pub use assembler::ConnectomeAssembler;
pub use connectome::Connectome;
pub use models::{ConnectomeEdge, ConnectomeGraph, Region};
pub use types::{BduError, BduResult};

// Re-export genome operations from graymatter-evolutionary
pub use graymatter_evolutionary::{ChunkId, Genome, GenomeError};
