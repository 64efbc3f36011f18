// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Runtime genome representation for GrayMatter.

In-memory records for a genome: chunks, their layers, the dynamics payload
attached to each layer and the input manifest that names a chunk's external
sources. These are produced by the builder or the parser and consumed by
connectome assembly.

The serde layout of these types *is* the persisted genome format:

```text
Genome  := { chunks: [Chunk] }
Chunk   := { id, name, input: { from_node, from_layer, local_layer_assigned_id }, layers: [Layer] }
Layer   := { layer, size, dynamics: { a, b, c, d }, input_layers, exci_inhi }
```

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::types::{ChunkId, GenomeError, GenomeResult, LayerIndex, LocalExternalId};

/// Sign applied to an input before it reaches the dynamics evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Excitatory,
    Inhibitory,
}

impl Polarity {
    /// Decode a persisted `exci_inhi` flag (`true` = excitatory)
    pub fn from_flag(excitatory: bool) -> Self {
        if excitatory {
            Polarity::Excitatory
        } else {
            Polarity::Inhibitory
        }
    }

    pub fn is_excitatory(self) -> bool {
        matches!(self, Polarity::Excitatory)
    }

    /// Sign-adjust an input value
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Polarity::Excitatory => value,
            Polarity::Inhibitory => -value,
        }
    }
}

/// Opaque per-layer parameters consumed by the dynamics evaluator
///
/// Field names follow the persisted `dynamics` record: `a` recovery rates,
/// `b` couplings, `c` reset, `d` update increments. Polarity flags are
/// persisted next to the layer's references as `exci_inhi`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDynamics {
    pub recovery_rate: Vec<f64>,
    pub coupling: Vec<f64>,
    pub reset: f64,
    pub increment: Vec<f64>,
    pub polarity: Vec<Polarity>,
}

impl LayerDynamics {
    pub fn new(
        recovery_rate: Vec<f64>,
        coupling: Vec<f64>,
        reset: f64,
        increment: Vec<f64>,
        polarity: Vec<Polarity>,
    ) -> Self {
        Self {
            recovery_rate,
            coupling,
            reset,
            increment,
            polarity,
        }
    }

    /// Build from raw `exci_inhi` flags
    pub fn with_flags(
        recovery_rate: Vec<f64>,
        coupling: Vec<f64>,
        reset: f64,
        increment: Vec<f64>,
        excitatory: &[bool],
    ) -> Self {
        Self::new(
            recovery_rate,
            coupling,
            reset,
            increment,
            excitatory.iter().copied().map(Polarity::from_flag).collect(),
        )
    }
}

/// A decoded entry of a layer's reference sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRef {
    /// Ordinal of another layer in the same chunk
    Local(LayerIndex),
    /// Local external id resolved through the chunk's input manifest
    External(LocalExternalId),
}

impl LayerRef {
    pub fn classify(raw: i32) -> Self {
        if raw < 0 {
            LayerRef::External(raw)
        } else {
            LayerRef::Local(raw as LayerIndex)
        }
    }

    /// Persisted integer form
    ///
    /// # Errors
    ///
    /// `MalformedGenome` for a local ordinal above `i32::MAX`, which the
    /// persisted format cannot carry.
    pub fn raw(self) -> GenomeResult<i32> {
        match self {
            LayerRef::Local(ordinal) => i32::try_from(ordinal).map_err(|_| {
                GenomeError::MalformedGenome(format!(
                    "layer ordinal {} does not fit a persisted reference",
                    ordinal
                ))
            }),
            LayerRef::External(local_id) => Ok(local_id),
        }
    }
}

impl From<i32> for LayerRef {
    fn from(raw: i32) -> Self {
        LayerRef::classify(raw)
    }
}

/// One population of units inside a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayerRecord", into = "LayerRecord")]
pub struct Layer {
    pub(crate) ordinal: LayerIndex,
    pub(crate) size: u32,
    pub(crate) dynamics: LayerDynamics,
    pub(crate) input_layers: Vec<i32>,
}

impl Layer {
    pub fn ordinal(&self) -> LayerIndex {
        self.ordinal
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn dynamics(&self) -> &LayerDynamics {
        &self.dynamics
    }

    /// Raw reference sequence (persisted `input_layers`)
    pub fn input_layers(&self) -> &[i32] {
        &self.input_layers
    }

    pub fn references(&self) -> impl Iterator<Item = LayerRef> + '_ {
        self.input_layers.iter().copied().map(LayerRef::classify)
    }

    /// References paired with the polarity that applies to each of them
    pub fn inputs(&self) -> impl Iterator<Item = (LayerRef, Polarity)> + '_ {
        self.references()
            .zip(self.dynamics.polarity.iter().copied())
    }

    /// Append one external input, keeping references and polarity aligned
    pub(crate) fn push_external(&mut self, local_id: LocalExternalId, polarity: Polarity) {
        self.input_layers.push(local_id);
        self.dynamics.polarity.push(polarity);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DynamicsRecord {
    a: Vec<f64>,
    b: Vec<f64>,
    c: f64,
    d: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LayerRecord {
    layer: LayerIndex,
    size: u32,
    dynamics: DynamicsRecord,
    input_layers: Vec<i32>,
    exci_inhi: Vec<bool>,
}

impl TryFrom<LayerRecord> for Layer {
    type Error = GenomeError;

    fn try_from(record: LayerRecord) -> Result<Self, Self::Error> {
        if record.input_layers.len() != record.exci_inhi.len() {
            return Err(GenomeError::MalformedGenome(format!(
                "layer {} has {} input_layers but {} exci_inhi flags",
                record.layer,
                record.input_layers.len(),
                record.exci_inhi.len()
            )));
        }
        if record.size == 0 {
            return Err(GenomeError::InvalidLayerSize(record.size));
        }

        let dynamics = LayerDynamics::with_flags(
            record.dynamics.a,
            record.dynamics.b,
            record.dynamics.c,
            record.dynamics.d,
            &record.exci_inhi,
        );

        Ok(Layer {
            ordinal: record.layer,
            size: record.size,
            dynamics,
            input_layers: record.input_layers,
        })
    }
}

impl From<Layer> for LayerRecord {
    fn from(layer: Layer) -> Self {
        let exci_inhi = layer
            .dynamics
            .polarity
            .iter()
            .map(|p| p.is_excitatory())
            .collect();
        LayerRecord {
            layer: layer.ordinal,
            size: layer.size,
            dynamics: DynamicsRecord {
                a: layer.dynamics.recovery_rate,
                b: layer.dynamics.coupling,
                c: layer.dynamics.reset,
                d: layer.dynamics.increment,
            },
            input_layers: layer.input_layers,
            exci_inhi,
        }
    }
}

/// One row of a chunk's input manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManifestEntry {
    pub source_chunk: ChunkId,
    pub source_layer: LayerIndex,
    pub local_id: LocalExternalId,
}

/// External inputs of a chunk, one row per distinct (source chunk, source layer)
///
/// Rows keep allocation order. The lookup index is derived from the rows and
/// is rebuilt on decode; it is never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "ManifestRecord", into = "ManifestRecord")]
pub struct InputManifest {
    entries: Vec<ManifestEntry>,
    index: AHashMap<(ChunkId, LayerIndex), LocalExternalId>,
}

impl PartialEq for InputManifest {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl InputManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    /// Local id already assigned to a source, if any
    pub fn local_id_for(&self, source_chunk: ChunkId, source_layer: LayerIndex) -> Option<LocalExternalId> {
        self.index.get(&(source_chunk, source_layer)).copied()
    }

    /// Source a local id stands for
    pub fn source_of(&self, local_id: LocalExternalId) -> Option<(ChunkId, LayerIndex)> {
        self.entries
            .iter()
            .find(|e| e.local_id == local_id)
            .map(|e| (e.source_chunk, e.source_layer))
    }

    pub fn contains_local_id(&self, local_id: LocalExternalId) -> bool {
        self.entries.iter().any(|e| e.local_id == local_id)
    }

    /// Id the next new source would receive: `min − 1`, or −1 when empty
    ///
    /// # Errors
    ///
    /// `LocalIdExhausted` when `min − 1` is not representable.
    pub fn next_local_id(&self) -> GenomeResult<LocalExternalId> {
        match self.entries.iter().map(|e| e.local_id).min() {
            None => Ok(-1),
            Some(min) => min
                .checked_sub(1)
                .ok_or(GenomeError::LocalIdExhausted(min)),
        }
    }

    /// Check that every new source in `sources` can be given an id
    pub(crate) fn ensure_capacity(&self, sources: &[(ChunkId, LayerIndex)]) -> GenomeResult<()> {
        let mut fresh = AHashSet::new();
        for &source in sources {
            if !self.index.contains_key(&source) {
                fresh.insert(source);
            }
        }
        if fresh.is_empty() {
            return Ok(());
        }
        let first = self.next_local_id()?;
        let extra =
            i32::try_from(fresh.len() - 1).map_err(|_| GenomeError::LocalIdExhausted(first))?;
        first
            .checked_sub(extra)
            .map(|_| ())
            .ok_or(GenomeError::LocalIdExhausted(first))
    }

    /// Reuse the id of a known source or allocate a new one
    pub(crate) fn resolve_or_allocate(
        &mut self,
        source_chunk: ChunkId,
        source_layer: LayerIndex,
    ) -> GenomeResult<LocalExternalId> {
        if let Some(existing) = self.local_id_for(source_chunk, source_layer) {
            return Ok(existing);
        }
        let local_id = self.next_local_id()?;
        self.entries.push(ManifestEntry {
            source_chunk,
            source_layer,
            local_id,
        });
        self.index.insert((source_chunk, source_layer), local_id);
        Ok(local_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestRecord {
    from_node: Vec<ChunkId>,
    from_layer: Vec<LayerIndex>,
    local_layer_assigned_id: Vec<LocalExternalId>,
}

impl TryFrom<ManifestRecord> for InputManifest {
    type Error = GenomeError;

    fn try_from(record: ManifestRecord) -> Result<Self, Self::Error> {
        let n = record.from_node.len();
        if record.from_layer.len() != n || record.local_layer_assigned_id.len() != n {
            return Err(GenomeError::MalformedGenome(format!(
                "input manifest lengths differ: from_node={}, from_layer={}, local_layer_assigned_id={}",
                n,
                record.from_layer.len(),
                record.local_layer_assigned_id.len()
            )));
        }

        let mut manifest = InputManifest::new();
        for ((source_chunk, source_layer), local_id) in record
            .from_node
            .into_iter()
            .zip(record.from_layer)
            .zip(record.local_layer_assigned_id)
        {
            manifest.entries.push(ManifestEntry {
                source_chunk,
                source_layer,
                local_id,
            });
            // First row wins; duplicate rows are reported by the validator
            manifest
                .index
                .entry((source_chunk, source_layer))
                .or_insert(local_id);
        }
        Ok(manifest)
    }
}

impl From<InputManifest> for ManifestRecord {
    fn from(manifest: InputManifest) -> Self {
        let mut record = ManifestRecord {
            from_node: Vec::with_capacity(manifest.len()),
            from_layer: Vec::with_capacity(manifest.len()),
            local_layer_assigned_id: Vec::with_capacity(manifest.len()),
        };
        for entry in manifest.entries {
            record.from_node.push(entry.source_chunk);
            record.from_layer.push(entry.source_layer);
            record.local_layer_assigned_id.push(entry.local_id);
        }
        record
    }
}

/// Named region of the architecture: ordered layers plus an input manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub(crate) id: ChunkId,
    pub(crate) name: String,
    pub(crate) input: InputManifest,
    pub(crate) layers: Vec<Layer>,
}

impl Chunk {
    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Informational only, not unique
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &InputManifest {
        &self.input
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, ordinal: LayerIndex) -> Option<&Layer> {
        self.layers.get(ordinal as usize)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// The full collection of chunks describing an architecture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub(crate) chunks: Vec<Chunk>,
}

impl Genome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id as usize)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }
}
