// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Genome construction and I/O for GrayMatter.

This module handles:
- Building genomes chunk by chunk (`builder`)
- Parsing persisted genomes with re-validation (`parser`, `loader`)
- Saving genomes back to JSON (`saver`)

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

pub mod builder;
pub mod loader;
pub mod parser;
pub mod saver;

// Re-export main types
pub use loader::load_genome_from_file;
pub use parser::{deserialize_genome, load_genome_from_json, GenomeParser};
pub use saver::{save_genome_to_file, save_genome_to_json, serialize_genome, GenomeSaver};
