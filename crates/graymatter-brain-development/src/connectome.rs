// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connectome - assembled regions plus their dependency multigraph.

Produced by [`crate::ConnectomeAssembler`]. Regions are stored in chunk
order, so a region's id is also its position.
*/

use graymatter_evolutionary::ChunkId;

use crate::models::{ConnectomeGraph, Region};
use crate::types::{BduError, BduResult};

/// Regions and graph of one loaded genome
#[derive(Debug, Clone)]
pub struct Connectome {
    regions: Vec<Region>,
    graph: ConnectomeGraph,
}

impl Connectome {
    pub(crate) fn new(regions: Vec<Region>, graph: ConnectomeGraph) -> Self {
        Self { regions, graph }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Mutable access for the step scheduler
    pub fn regions_mut(&mut self) -> &mut [Region] {
        &mut self.regions
    }

    pub fn region(&self, id: ChunkId) -> Option<&Region> {
        self.regions.get(id as usize)
    }

    /// Region lookup that reports unknown ids as errors
    pub fn require_region(&self, id: ChunkId) -> BduResult<&Region> {
        self.region(id).ok_or(BduError::UnknownRegion(id))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn graph(&self) -> &ConnectomeGraph {
        &self.graph
    }

    /// Split into the region list and the graph
    pub fn into_parts(self) -> (Vec<Region>, ConnectomeGraph) {
        (self.regions, self.graph)
    }

    /// Graphviz DOT rendering with region names as node labels
    pub fn to_dot(&self) -> String {
        self.graph
            .to_dot_labeled(|id| self.region(id).map(|r| format!("{} ({})", r.name(), id)))
    }
}
