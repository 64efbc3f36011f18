// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types for connectome assembly.
*/

use graymatter_evolutionary::{ChunkId, GenomeError};

/// Result type for BDU operations
pub type BduResult<T> = Result<T, BduError>;

/// Errors that can occur during connectome assembly
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BduError {
    /// Decoding or validation of the underlying genome failed
    #[error(transparent)]
    Genome(#[from] GenomeError),

    #[error("Unknown region: {0}")]
    UnknownRegion(ChunkId),

    #[error("Region {region} produced {actual} layer outputs, expected {expected}")]
    OutputArity {
        region: ChunkId,
        expected: usize,
        actual: usize,
    },
}
