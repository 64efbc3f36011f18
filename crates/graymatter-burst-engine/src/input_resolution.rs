// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Input resolution against the previous tick.

Before any region advances, the outputs of every layer are copied into an
[`OutputSnapshot`]. Layers then read their inputs only from that snapshot,
so a step's result does not depend on the order regions are visited in.

Local references (non-negative) read a layer of the same region; external
references (negative) go through the region's input manifest to the
source region's layer. Each value is sign-adjusted by the reference's
polarity.
*/

use ahash::AHashMap;
use graymatter_brain_development::Region;
use graymatter_evolutionary::{ChunkId, Layer, LayerIndex, LayerRef};

use crate::types::{BurstError, BurstResult};

/// Layer outputs of every region as of the end of the previous tick
#[derive(Debug, Clone, Default)]
pub struct OutputSnapshot {
    outputs: AHashMap<ChunkId, Vec<f64>>,
}

impl OutputSnapshot {
    pub fn capture(regions: &[Region]) -> Self {
        let outputs = regions
            .iter()
            .map(|region| (region.id(), region.outputs().to_vec()))
            .collect();
        Self { outputs }
    }

    pub fn output(&self, region: ChunkId, layer: LayerIndex) -> Option<f64> {
        self.outputs
            .get(&region)
            .and_then(|layers| layers.get(layer as usize))
            .copied()
    }
}

/// Sign-adjusted input values for one layer of `region`, in reference order
pub fn resolve_inputs(
    region: &Region,
    layer: &Layer,
    snapshot: &OutputSnapshot,
) -> BurstResult<Vec<f64>> {
    layer
        .inputs()
        .map(|(reference, polarity)| {
            let value = match reference {
                LayerRef::Local(ordinal) => snapshot.output(region.id(), ordinal),
                LayerRef::External(local_id) => region
                    .input()
                    .source_of(local_id)
                    .and_then(|(chunk, source_layer)| snapshot.output(chunk, source_layer)),
            };
            value
                .map(|v| polarity.apply(v))
                .ok_or(BurstError::UnresolvedInput {
                    region: region.id(),
                    layer: layer.ordinal(),
                    reference,
                })
        })
        .collect()
}
