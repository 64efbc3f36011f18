// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Genome JSON saver.

Serializes a genome to pretty-printed JSON (two-space indent). JSON has no
encoding for NaN or infinities, so genomes carrying non-finite dynamics are
refused instead of being written in a form that cannot be read back.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::fs;
use std::path::Path;

use tracing::info;

use crate::runtime::Genome;
use crate::types::{GenomeError, GenomeResult};

/// Genome saver
pub struct GenomeSaver;

impl GenomeSaver {
    /// Serialize a genome to pretty JSON text
    pub fn to_json(genome: &Genome) -> GenomeResult<String> {
        ensure_finite(genome)?;
        Ok(serde_json::to_string_pretty(genome)?)
    }

    /// Serialize a genome to pretty JSON bytes
    pub fn to_bytes(genome: &Genome) -> GenomeResult<Vec<u8>> {
        ensure_finite(genome)?;
        Ok(serde_json::to_vec_pretty(genome)?)
    }
}

fn ensure_finite(genome: &Genome) -> GenomeResult<()> {
    for chunk in genome.chunks() {
        for layer in chunk.layers() {
            let dynamics = layer.dynamics();
            let finite = dynamics.reset.is_finite()
                && dynamics
                    .recovery_rate
                    .iter()
                    .chain(&dynamics.coupling)
                    .chain(&dynamics.increment)
                    .all(|v| v.is_finite());
            if !finite {
                return Err(GenomeError::MalformedGenome(format!(
                    "chunk {} layer {} has non-finite dynamics",
                    chunk.id(),
                    layer.ordinal()
                )));
            }
        }
    }
    Ok(())
}

/// Serialize a genome to its persisted byte form
pub fn serialize_genome(genome: &Genome) -> GenomeResult<Vec<u8>> {
    GenomeSaver::to_bytes(genome)
}

/// Serialize a genome to JSON text
pub fn save_genome_to_json(genome: &Genome) -> GenomeResult<String> {
    GenomeSaver::to_json(genome)
}

/// Write a genome to a JSON file, replacing any existing file
pub fn save_genome_to_file<P: AsRef<Path>>(genome: &Genome, path: P) -> GenomeResult<()> {
    let json = GenomeSaver::to_json(genome)?;
    fs::write(path.as_ref(), json)?;
    info!(
        "💾 [GENOME-SAVE] Wrote {} chunks to {}",
        genome.chunk_count(),
        path.as_ref().display()
    );
    Ok(())
}
