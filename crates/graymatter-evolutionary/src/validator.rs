// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Genome validation for GrayMatter.

Two passes over a genome:

1. **Structure** (`MalformedGenome`): chunk ids match positions, layer
   ordinals match positions, manifest ids run -1, -2, ... in row order,
   each source pair appears once, sizes are positive and every layer has one
   polarity flag per reference.
2. **References** (`DanglingReference`): every layer reference names an
   existing layer or a manifest id, and every manifest row names an existing
   chunk and layer.

Structure problems take precedence when both are present.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use ahash::AHashSet;

use crate::runtime::{Chunk, Genome, LayerRef};
use crate::types::{GenomeError, GenomeResult};

/// Validation result
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Invariant violations in the genome's own records
    pub structural: Vec<String>,
    /// References that resolve to nothing
    pub dangling: Vec<String>,
    /// Non-blocking observations
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.structural.is_empty() && self.dangling.is_empty()
    }

    /// Collapse into the error kind callers act on
    pub fn into_result(self) -> GenomeResult<()> {
        if !self.structural.is_empty() {
            return Err(GenomeError::MalformedGenome(self.structural.join("; ")));
        }
        if !self.dangling.is_empty() {
            return Err(GenomeError::DanglingReference(self.dangling.join("; ")));
        }
        Ok(())
    }
}

/// Validate a genome
pub fn validate_genome(genome: &Genome) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (position, chunk) in genome.chunks().iter().enumerate() {
        validate_chunk_structure(position, chunk, &mut result);
    }

    // Reference checks assume well-formed records
    if result.structural.is_empty() {
        for chunk in genome.chunks() {
            validate_chunk_references(genome, chunk, &mut result);
        }
    }

    result
}

fn validate_chunk_structure(position: usize, chunk: &Chunk, result: &mut ValidationResult) {
    if chunk.id() as usize != position {
        result.structural.push(format!(
            "chunk at position {} carries id {}",
            position,
            chunk.id()
        ));
    }

    let mut seen_ids = AHashSet::new();
    let mut seen_sources = AHashSet::new();
    for (row, entry) in chunk.input().iter().enumerate() {
        // Ids are handed out -1, -2, ... in row order
        let expected = i32::try_from(row).ok().and_then(|r| r.checked_add(1)).map(|n| -n);
        if expected != Some(entry.local_id) {
            result.structural.push(format!(
                "chunk {}: input row {} carries local external id {}, expected -{}",
                chunk.id(),
                row,
                entry.local_id,
                row + 1
            ));
        }
        if entry.local_id >= 0 {
            result.structural.push(format!(
                "chunk {}: local external id {} is not negative",
                chunk.id(),
                entry.local_id
            ));
        }
        if !seen_ids.insert(entry.local_id) {
            result.structural.push(format!(
                "chunk {}: local external id {} assigned twice",
                chunk.id(),
                entry.local_id
            ));
        }
        if !seen_sources.insert((entry.source_chunk, entry.source_layer)) {
            result.structural.push(format!(
                "chunk {}: source ({}, {}) listed more than once",
                chunk.id(),
                entry.source_chunk,
                entry.source_layer
            ));
        }
    }

    for (ordinal, layer) in chunk.layers().iter().enumerate() {
        if layer.ordinal() as usize != ordinal {
            result.structural.push(format!(
                "chunk {}: layer at position {} carries ordinal {}",
                chunk.id(),
                ordinal,
                layer.ordinal()
            ));
        }
        if layer.size() == 0 {
            result
                .structural
                .push(format!("chunk {}: layer {} has size 0", chunk.id(), ordinal));
        }
        if layer.dynamics().polarity.len() != layer.input_layers().len() {
            result.structural.push(format!(
                "chunk {}: layer {} has {} references but {} polarity flags",
                chunk.id(),
                ordinal,
                layer.input_layers().len(),
                layer.dynamics().polarity.len()
            ));
        }
    }

    if chunk.layers().is_empty() {
        result
            .warnings
            .push(format!("chunk {} '{}' has no layers", chunk.id(), chunk.name()));
    }
}

fn validate_chunk_references(genome: &Genome, chunk: &Chunk, result: &mut ValidationResult) {
    let mut used_ids = AHashSet::new();

    for layer in chunk.layers() {
        for reference in layer.references() {
            match reference {
                LayerRef::Local(ordinal) => {
                    if ordinal as usize >= chunk.layer_count() {
                        result.dangling.push(format!(
                            "chunk {}: layer {} references missing layer {}",
                            chunk.id(),
                            layer.ordinal(),
                            ordinal
                        ));
                    }
                }
                LayerRef::External(local_id) => {
                    if chunk.input().contains_local_id(local_id) {
                        used_ids.insert(local_id);
                    } else {
                        result.dangling.push(format!(
                            "chunk {}: layer {} references local id {} missing from the input manifest",
                            chunk.id(),
                            layer.ordinal(),
                            local_id
                        ));
                    }
                }
            }
        }
    }

    for entry in chunk.input().iter() {
        match genome.chunk(entry.source_chunk) {
            None => result.dangling.push(format!(
                "chunk {}: input {} names missing chunk {}",
                chunk.id(),
                entry.local_id,
                entry.source_chunk
            )),
            Some(source) if source.layer(entry.source_layer).is_none() => {
                result.dangling.push(format!(
                    "chunk {}: input {} names missing layer {} of chunk {}",
                    chunk.id(),
                    entry.local_id,
                    entry.source_layer,
                    entry.source_chunk
                ))
            }
            Some(_) => {}
        }
        if !used_ids.contains(&entry.local_id) {
            result.warnings.push(format!(
                "chunk {}: input {} from ({}, {}) is not used by any layer",
                chunk.id(),
                entry.local_id,
                entry.source_chunk,
                entry.source_layer
            ));
        }
    }
}
