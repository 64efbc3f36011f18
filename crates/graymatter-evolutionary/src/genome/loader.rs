// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
High-level genome loading API.

Reads a persisted genome from disk so it can be stepped or extended with
more chunks before being saved again.
*/

use std::fs;
use std::path::Path;

use tracing::info;

use super::parser::GenomeParser;
use crate::runtime::Genome;
use crate::types::GenomeResult;

/// Load and validate a genome from a JSON file
pub fn load_genome_from_file<P: AsRef<Path>>(path: P) -> GenomeResult<Genome> {
    let bytes = fs::read(path.as_ref())?;
    let genome = GenomeParser::parse_bytes(&bytes)?;
    info!(
        "📖 [GENOME-LOAD] Loaded {} chunks from {}",
        genome.chunk_count(),
        path.as_ref().display()
    );
    Ok(genome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::saver::save_genome_to_file;
    use crate::runtime::LayerDynamics;
    use crate::types::GenomeError;

    #[test]
    fn test_file_round_trip_then_extend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brain-data.json");

        let mut genome = Genome::new();
        let mut chunk = genome.create_chunk(&[], &[], "base").unwrap();
        chunk
            .append_layer(8, &[], LayerDynamics::with_flags(vec![], vec![], 0.0, vec![], &[]))
            .unwrap();
        genome.commit_chunk(chunk).unwrap();
        save_genome_to_file(&genome, &path).unwrap();

        let mut reopened = load_genome_from_file(&path).unwrap();
        assert_eq!(reopened, genome);

        let next = reopened.create_chunk(&[0], &[0], "next").unwrap();
        assert_eq!(next.id(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_genome_from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, GenomeError::Io(_)));
    }
}
