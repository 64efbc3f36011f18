// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types and error handling for GrayMatter genomes.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use thiserror::Error;

/// Chunk identifier (position of the chunk in the genome)
pub type ChunkId = u32;

/// Ordinal of a layer within its chunk
pub type LayerIndex = u32;

/// Strictly negative id naming one deduplicated external input of a chunk
pub type LocalExternalId = i32;

/// Result type for genome operations
pub type GenomeResult<T> = Result<T, GenomeError>;

/// Error types for genome operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenomeError {
    /// Parallel sequences handed to a builder call differ in length
    #[error("Arity mismatch in {context}: {left} vs {right} entries")]
    ArityMismatch {
        context: &'static str,
        left: usize,
        right: usize,
    },

    /// Structural or invariant violation in a persisted genome
    #[error("Malformed genome: {0}")]
    MalformedGenome(String),

    /// A manifest entry or layer reference points at nothing
    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    /// A chunk was created against a different genome length than it is committed to
    #[error("Identifier drift: chunk was created as {predicted} but the next free position is {actual}")]
    IdentifierDrift { predicted: ChunkId, actual: ChunkId },

    /// No id below the chunk's lowest local external id is representable
    #[error("Local external id space exhausted below {0}")]
    LocalIdExhausted(LocalExternalId),

    #[error("Invalid layer size {0}: a layer must hold at least one unit")]
    InvalidLayerSize(u32),

    #[error("I/O error: {0}")]
    Io(String),
}

// Decoding failures (syntax, types, record-level checks) are all malformed genomes
impl From<serde_json::Error> for GenomeError {
    fn from(err: serde_json::Error) -> Self {
        GenomeError::MalformedGenome(err.to_string())
    }
}

impl From<std::io::Error> for GenomeError {
    fn from(err: std::io::Error) -> Self {
        GenomeError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_become_malformed_genome() {
        let err = serde_json::from_str::<u32>("\"not a number\"").unwrap_err();
        assert!(matches!(GenomeError::from(err), GenomeError::MalformedGenome(_)));
    }

    #[test]
    fn test_arity_message_names_context() {
        let err = GenomeError::ArityMismatch {
            context: "create_chunk",
            left: 2,
            right: 1,
        };
        assert_eq!(
            err.to_string(),
            "Arity mismatch in create_chunk: 2 vs 1 entries"
        );
    }
}
