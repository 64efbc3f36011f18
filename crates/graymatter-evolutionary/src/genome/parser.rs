// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Genome JSON parser.

Decodes the persisted genome and re-validates it. Record-level problems
(uneven manifest vectors, polarity/reference length mismatch, wrong value
types) fail during decoding; genome-level invariants are checked by
[`crate::validator`] before a genome is handed out.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use tracing::{debug, warn};

use crate::runtime::Genome;
use crate::types::GenomeResult;
use crate::validator::validate_genome;

/// Genome parser
pub struct GenomeParser;

impl GenomeParser {
    /// Parse and validate a genome from JSON text
    pub fn parse(json_str: &str) -> GenomeResult<Genome> {
        Self::parse_bytes(json_str.as_bytes())
    }

    /// Parse and validate a genome from raw bytes
    ///
    /// # Errors
    ///
    /// - `MalformedGenome` for syntax, type or structural invariant violations
    /// - `DanglingReference` when a layer or manifest reference resolves to nothing
    pub fn parse_bytes(bytes: &[u8]) -> GenomeResult<Genome> {
        let genome: Genome = serde_json::from_slice(bytes)?;

        let result = validate_genome(&genome);
        for warning in &result.warnings {
            warn!("⚠️  [GENOME-LOAD] {}", warning);
        }
        result.into_result()?;

        debug!(
            "🧬 [GENOME-LOAD] Parsed genome with {} chunks",
            genome.chunk_count()
        );
        Ok(genome)
    }

    /// Decode without invariant checks
    pub(crate) fn parse_unchecked(json_str: &str) -> GenomeResult<Genome> {
        Ok(serde_json::from_str(json_str)?)
    }
}

/// Deserialize a persisted genome, rejecting anything that violates its invariants
pub fn deserialize_genome(bytes: &[u8]) -> GenomeResult<Genome> {
    GenomeParser::parse_bytes(bytes)
}

/// Load a genome from a JSON string
pub fn load_genome_from_json(json_str: &str) -> GenomeResult<Genome> {
    GenomeParser::parse(json_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenomeError;

    #[test]
    fn test_parse_minimal_genome() {
        let json = r#"{
            "chunks": [
                {
                    "id": 0,
                    "name": "retina",
                    "input": {"from_node": [], "from_layer": [], "local_layer_assigned_id": []},
                    "layers": [
                        {
                            "layer": 0,
                            "size": 32,
                            "dynamics": {"a": [0.02], "b": [0.2], "c": -65, "d": [8]},
                            "input_layers": [],
                            "exci_inhi": []
                        }
                    ]
                }
            ]
        }"#;

        let genome = load_genome_from_json(json).unwrap();
        assert_eq!(genome.chunk_count(), 1);
        let layer = genome.chunk(0).unwrap().layer(0).unwrap();
        assert_eq!(layer.size(), 32);
        assert_eq!(layer.dynamics().reset, -65.0);
    }

    #[test]
    fn test_parse_empty_genome() {
        let genome = load_genome_from_json(r#"{"chunks": []}"#).unwrap();
        assert!(genome.is_empty());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            deserialize_genome(b"not json"),
            Err(GenomeError::MalformedGenome(_))
        ));
        assert!(matches!(
            deserialize_genome(br#"{"chunks": [{"id": -1}]}"#),
            Err(GenomeError::MalformedGenome(_))
        ));
    }

    #[test]
    fn test_rejects_zero_sized_layer() {
        let json = r#"{"chunks":[{"id":0,"name":"",
            "input":{"from_node":[],"from_layer":[],"local_layer_assigned_id":[]},
            "layers":[{"layer":0,"size":0,"dynamics":{"a":[],"b":[],"c":0,"d":[]},
                       "input_layers":[],"exci_inhi":[]}]}]}"#;
        assert!(matches!(
            load_genome_from_json(json),
            Err(GenomeError::MalformedGenome(_))
        ));
    }
}
