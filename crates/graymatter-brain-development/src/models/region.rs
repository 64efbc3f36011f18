// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Region - runtime stand-in for one genome chunk.

A region is created from its chunk at load time and owns a copy of the
chunk's layers and input manifest, so the connectome never refers back to
the genome it was built from. It carries one scalar output per layer and a
tick counter that only the scheduler advances.
*/

use graymatter_evolutionary::{Chunk, ChunkId, InputManifest, Layer, LayerIndex};

use crate::types::{BduError, BduResult};

/// One instantiated chunk
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: ChunkId,
    name: String,
    tick: u64,
    layers: Vec<Layer>,
    input: InputManifest,
    outputs: Vec<f64>,
}

impl Region {
    /// Instantiate a chunk at tick 0 with every layer output at rest
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            id: chunk.id(),
            name: chunk.name().to_string(),
            tick: 0,
            layers: chunk.layers().to_vec(),
            input: chunk.input().clone(),
            outputs: vec![0.0; chunk.layer_count()],
        }
    }

    pub fn id(&self) -> ChunkId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of completed steps
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input(&self) -> &InputManifest {
        &self.input
    }

    /// Current output of every layer, indexed by ordinal
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    pub fn output(&self, layer: LayerIndex) -> Option<f64> {
        self.outputs.get(layer as usize).copied()
    }

    /// Complete one step: install the new layer outputs and bump the tick
    ///
    /// # Errors
    ///
    /// `OutputArity` when `next_outputs` does not hold exactly one value per
    /// layer; the region is left untouched.
    pub fn advance(&mut self, next_outputs: Vec<f64>) -> BduResult<u64> {
        if next_outputs.len() != self.layers.len() {
            return Err(BduError::OutputArity {
                region: self.id,
                expected: self.layers.len(),
                actual: next_outputs.len(),
            });
        }
        self.outputs = next_outputs;
        self.tick += 1;
        Ok(self.tick)
    }
}
