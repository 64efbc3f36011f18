// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for region stepping

use graymatter_brain_development::BduError;
use graymatter_evolutionary::{ChunkId, LayerIndex, LayerRef};

/// Result type for burst engine operations
pub type BurstResult<T> = Result<T, BurstError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BurstError {
    #[error(transparent)]
    Region(#[from] BduError),

    /// A layer reference has no value in the previous-tick snapshot
    #[error("Region {region} layer {layer}: input reference {reference:?} does not resolve")]
    UnresolvedInput {
        region: ChunkId,
        layer: LayerIndex,
        reference: LayerRef,
    },
}
