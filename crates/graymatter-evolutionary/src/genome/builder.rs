// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Incremental genome construction.

A chunk is created against a genome (which predicts its identifier), filled
with layers, then committed. Cross-chunk inputs are wired afterwards through
[`Genome::wire_input`], which deduplicates sources per chunk.

Every operation validates before it mutates, so a failed call leaves the
genome and the chunk exactly as they were.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use tracing::{debug, trace};

use crate::runtime::{Chunk, Genome, InputManifest, Layer, LayerDynamics, Polarity};
use crate::types::{ChunkId, GenomeError, GenomeResult, LayerIndex, LocalExternalId};

impl Genome {
    /// Start a new chunk fed by the given (source chunk, source layer) pairs
    ///
    /// Local external ids are allocated `−1, −2, …` in input order. The chunk
    /// is predicted to land at the current chunk count but is not appended
    /// until [`Genome::commit_chunk`].
    ///
    /// # Errors
    ///
    /// `ArityMismatch` when the two source lists differ in length.
    pub fn create_chunk(
        &self,
        source_chunk_ids: &[ChunkId],
        source_layer_indices: &[LayerIndex],
        name: impl Into<String>,
    ) -> GenomeResult<Chunk> {
        if source_chunk_ids.len() != source_layer_indices.len() {
            return Err(GenomeError::ArityMismatch {
                context: "create_chunk",
                left: source_chunk_ids.len(),
                right: source_layer_indices.len(),
            });
        }

        let mut input = InputManifest::new();
        for (&source_chunk, &source_layer) in source_chunk_ids.iter().zip(source_layer_indices) {
            input.resolve_or_allocate(source_chunk, source_layer)?;
        }

        let chunk = Chunk {
            id: self.chunks.len() as ChunkId,
            name: name.into(),
            input,
            layers: Vec::new(),
        };
        debug!(
            "🧬 [GENOME] Created chunk {} '{}' with {} external inputs",
            chunk.id,
            chunk.name,
            chunk.input.len()
        );
        Ok(chunk)
    }

    /// Append a chunk at its predicted position
    ///
    /// # Errors
    ///
    /// `IdentifierDrift` when another chunk was committed since this one was
    /// created, i.e. the predicted id no longer matches the append position.
    pub fn commit_chunk(&mut self, chunk: Chunk) -> GenomeResult<ChunkId> {
        let position = self.chunks.len() as ChunkId;
        if chunk.id != position {
            return Err(GenomeError::IdentifierDrift {
                predicted: chunk.id,
                actual: position,
            });
        }
        debug!(
            "🧬 [GENOME] Committed chunk {} '{}' ({} layers)",
            chunk.id,
            chunk.name,
            chunk.layers.len()
        );
        self.chunks.push(chunk);
        Ok(position)
    }

    /// Wire external sources into layers of an already committed chunk
    ///
    /// Each new reference is excitatory. See [`Genome::wire_input_with_polarity`].
    pub fn wire_input(
        &mut self,
        target_chunk_id: ChunkId,
        sources: &[(ChunkId, LayerIndex)],
        target_layer_indices: &[LayerIndex],
    ) -> GenomeResult<Vec<LocalExternalId>> {
        let polarity = vec![Polarity::Excitatory; sources.len()];
        self.wire_input_with_polarity(target_chunk_id, sources, target_layer_indices, &polarity)
    }

    /// Wire external sources into layers, deduplicating per source
    ///
    /// Pairs are processed left to right. For each one the target chunk's
    /// manifest is searched for the source; a hit reuses its local id, a miss
    /// allocates `min − 1` (or −1) and appends a manifest row. The resolved id
    /// and its polarity are appended to the target layer. Later pairs see the
    /// rows added by earlier ones, so repeats within one call also dedup.
    ///
    /// Returns the resolved local id of every pair, in order. Source chunks
    /// are not checked here; they may be committed later and are resolved at
    /// load time.
    ///
    /// # Errors
    ///
    /// - `ArityMismatch` when `sources`, `target_layer_indices` and `polarity`
    ///   differ in length
    /// - `DanglingReference` when the target chunk or a target layer does not exist
    /// - `LocalIdExhausted` when the new sources cannot all be given an id
    pub fn wire_input_with_polarity(
        &mut self,
        target_chunk_id: ChunkId,
        sources: &[(ChunkId, LayerIndex)],
        target_layer_indices: &[LayerIndex],
        polarity: &[Polarity],
    ) -> GenomeResult<Vec<LocalExternalId>> {
        if sources.len() != target_layer_indices.len() {
            return Err(GenomeError::ArityMismatch {
                context: "wire_input",
                left: sources.len(),
                right: target_layer_indices.len(),
            });
        }
        if polarity.len() != sources.len() {
            return Err(GenomeError::ArityMismatch {
                context: "wire_input polarity",
                left: sources.len(),
                right: polarity.len(),
            });
        }

        let chunk = self
            .chunks
            .get_mut(target_chunk_id as usize)
            .ok_or_else(|| {
                GenomeError::DanglingReference(format!(
                    "wire_input target chunk {} does not exist",
                    target_chunk_id
                ))
            })?;
        if let Some(&missing) = target_layer_indices
            .iter()
            .find(|&&ordinal| ordinal as usize >= chunk.layers.len())
        {
            return Err(GenomeError::DanglingReference(format!(
                "wire_input target layer {} does not exist in chunk {} ({} layers)",
                missing,
                target_chunk_id,
                chunk.layers.len()
            )));
        }

        chunk.input.ensure_capacity(sources)?;

        let mut resolved = Vec::with_capacity(sources.len());
        for ((&(source_chunk, source_layer), &target_layer), &sign) in
            sources.iter().zip(target_layer_indices).zip(polarity)
        {
            let local_id = chunk.input.resolve_or_allocate(source_chunk, source_layer)?;
            chunk.layers[target_layer as usize].push_external(local_id, sign);
            trace!(
                "🔗 [GENOME] chunk {} layer {} <- ({}, {}) as {}",
                target_chunk_id,
                target_layer,
                source_chunk,
                source_layer,
                local_id
            );
            resolved.push(local_id);
        }

        debug!(
            "🔗 [GENOME] Wired {} inputs into chunk {} (manifest now {} entries)",
            resolved.len(),
            target_chunk_id,
            chunk.input.len()
        );
        Ok(resolved)
    }
}

impl Chunk {
    /// Append a layer and return its ordinal
    ///
    /// `layer_refs` may hold ordinals of layers in this chunk (non-negative) or
    /// local external ids (negative). They are not resolved here; dangling
    /// references surface when the genome is validated or loaded.
    ///
    /// # Errors
    ///
    /// - `ArityMismatch` when the polarity flags do not match `layer_refs` one to one
    /// - `InvalidLayerSize` when `size` is zero
    pub fn append_layer(
        &mut self,
        size: u32,
        layer_refs: &[i32],
        dynamics: LayerDynamics,
    ) -> GenomeResult<LayerIndex> {
        if dynamics.polarity.len() != layer_refs.len() {
            return Err(GenomeError::ArityMismatch {
                context: "append_layer",
                left: layer_refs.len(),
                right: dynamics.polarity.len(),
            });
        }
        if size == 0 {
            return Err(GenomeError::InvalidLayerSize(size));
        }

        let ordinal = self.layers.len() as LayerIndex;
        self.layers.push(Layer {
            ordinal,
            size,
            dynamics,
            input_layers: layer_refs.to_vec(),
        });
        trace!(
            "🧬 [GENOME] chunk {} gained layer {} (size {})",
            self.id,
            ordinal,
            size
        );
        Ok(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamics(flags: &[bool]) -> LayerDynamics {
        LayerDynamics::with_flags(vec![0.02], vec![0.2], -65.0, vec![8.0], flags)
    }

    fn committed_source(genome: &mut Genome, name: &str) -> ChunkId {
        let mut chunk = genome.create_chunk(&[], &[], name).unwrap();
        chunk.append_layer(16, &[], dynamics(&[])).unwrap();
        genome.commit_chunk(chunk).unwrap()
    }

    #[test]
    fn test_create_chunk_allocates_in_input_order() {
        let genome = Genome::new();
        let chunk = genome.create_chunk(&[0, 1], &[0, 1], "test1").unwrap();

        assert_eq!(chunk.id(), 0);
        assert_eq!(chunk.name(), "test1");
        assert!(chunk.layers().is_empty());
        let ids: Vec<_> = chunk.input().iter().map(|e| e.local_id).collect();
        assert_eq!(ids, vec![-1, -2]);
        assert_eq!(chunk.input().local_id_for(1, 1), Some(-2));
    }

    #[test]
    fn test_create_chunk_arity_mismatch() {
        let genome = Genome::new();
        let err = genome.create_chunk(&[0, 1], &[0], "x").unwrap_err();
        assert!(matches!(
            err,
            GenomeError::ArityMismatch { left: 2, right: 1, .. }
        ));
    }

    #[test]
    fn test_create_chunk_predicts_next_position() {
        let mut genome = Genome::new();
        committed_source(&mut genome, "a");
        committed_source(&mut genome, "b");
        let chunk = genome.create_chunk(&[], &[], "c").unwrap();
        assert_eq!(chunk.id(), 2);
    }

    #[test]
    fn test_append_layer_assigns_ordinals() {
        let genome = Genome::new();
        let mut chunk = genome.create_chunk(&[0, 1], &[0, 1], "test1").unwrap();

        let first = chunk
            .append_layer(64, &[-2, 0, 1], dynamics(&[false, true, false]))
            .unwrap();
        let second = chunk
            .append_layer(128, &[-1, 0, 1], dynamics(&[true, false, false]))
            .unwrap();

        assert_eq!((first, second), (0, 1));
        assert_eq!(chunk.layer(1).unwrap().size(), 128);
        assert_eq!(chunk.layer(0).unwrap().input_layers(), &[-2, 0, 1]);
    }

    #[test]
    fn test_append_layer_rejects_polarity_mismatch_without_change() {
        let genome = Genome::new();
        let mut chunk = genome.create_chunk(&[], &[], "x").unwrap();
        let before = chunk.clone();

        let err = chunk.append_layer(8, &[0, 1], dynamics(&[true])).unwrap_err();
        assert!(matches!(err, GenomeError::ArityMismatch { .. }));
        assert_eq!(chunk, before);
    }

    #[test]
    fn test_append_layer_rejects_empty_population() {
        let genome = Genome::new();
        let mut chunk = genome.create_chunk(&[], &[], "x").unwrap();
        assert_eq!(
            chunk.append_layer(0, &[], dynamics(&[])),
            Err(GenomeError::InvalidLayerSize(0))
        );
        assert_eq!(chunk.layer_count(), 0);
    }

    #[test]
    fn test_commit_detects_identifier_drift() {
        let mut genome = Genome::new();
        let first = genome.create_chunk(&[], &[], "first").unwrap();
        let second = genome.create_chunk(&[], &[], "second").unwrap();
        assert_eq!(first.id(), second.id());

        genome.commit_chunk(first).unwrap();
        let err = genome.commit_chunk(second).unwrap_err();
        assert_eq!(
            err,
            GenomeError::IdentifierDrift {
                predicted: 0,
                actual: 1
            }
        );
        assert_eq!(genome.chunk_count(), 1);
        assert_eq!(genome.chunk(0).unwrap().name(), "first");
    }

    #[test]
    fn test_wire_input_reuses_existing_source() {
        let mut genome = Genome::new();
        let source = committed_source(&mut genome, "source");
        let mut sink = genome.create_chunk(&[], &[], "sink").unwrap();
        sink.append_layer(8, &[], dynamics(&[])).unwrap();
        let sink = genome.commit_chunk(sink).unwrap();

        let first = genome.wire_input(sink, &[(source, 0)], &[0]).unwrap();
        let second = genome.wire_input(sink, &[(source, 0)], &[0]).unwrap();

        assert_eq!(first, vec![-1]);
        assert_eq!(second, vec![-1]);
        let chunk = genome.chunk(sink).unwrap();
        assert_eq!(chunk.input().len(), 1);
        assert_eq!(chunk.layer(0).unwrap().input_layers(), &[-1, -1]);
        assert_eq!(chunk.layer(0).unwrap().dynamics().polarity.len(), 2);
    }

    #[test]
    fn test_wire_input_dedups_within_one_call() {
        let mut genome = Genome::new();
        let source = committed_source(&mut genome, "source");
        let mut sink = genome.create_chunk(&[], &[], "sink").unwrap();
        sink.append_layer(8, &[], dynamics(&[])).unwrap();
        sink.append_layer(8, &[], dynamics(&[])).unwrap();
        let sink = genome.commit_chunk(sink).unwrap();

        let ids = genome
            .wire_input(sink, &[(source, 0), (sink, 1), (source, 0)], &[0, 0, 1])
            .unwrap();

        assert_eq!(ids, vec![-1, -2, -1]);
        let chunk = genome.chunk(sink).unwrap();
        assert_eq!(chunk.input().len(), 2);
        assert_eq!(chunk.layer(0).unwrap().input_layers(), &[-1, -2]);
        assert_eq!(chunk.layer(1).unwrap().input_layers(), &[-1]);
    }

    #[test]
    fn test_wire_input_continues_below_creation_ids() {
        let mut genome = Genome::new();
        committed_source(&mut genome, "a");
        committed_source(&mut genome, "b");
        let mut sink = genome.create_chunk(&[0, 1], &[0, 0], "sink").unwrap();
        sink.append_layer(8, &[-1, -2], dynamics(&[true, true])).unwrap();
        let sink = genome.commit_chunk(sink).unwrap();

        let ids = genome.wire_input(sink, &[(1, 0), (0, 1)], &[0, 0]).unwrap();
        assert_eq!(ids, vec![-2, -3]);
    }

    #[test]
    fn test_wire_input_failure_leaves_genome_unchanged() {
        let mut genome = Genome::new();
        let source = committed_source(&mut genome, "source");
        let before = genome.clone();

        let err = genome
            .wire_input(source, &[(source, 0), (source, 0)], &[0])
            .unwrap_err();
        assert!(matches!(err, GenomeError::ArityMismatch { .. }));

        let err = genome
            .wire_input(source, &[(source, 0), (source, 0)], &[0, 5])
            .unwrap_err();
        assert!(matches!(err, GenomeError::DanglingReference(_)));

        let err = genome.wire_input(9, &[(source, 0)], &[0]).unwrap_err();
        assert!(matches!(err, GenomeError::DanglingReference(_)));

        assert_eq!(genome, before);
    }

    #[test]
    fn test_wire_input_with_polarity_records_signs() {
        let mut genome = Genome::new();
        let source = committed_source(&mut genome, "source");
        genome
            .wire_input_with_polarity(source, &[(source, 0)], &[0], &[Polarity::Inhibitory])
            .unwrap();

        let layer = genome.chunk(source).unwrap().layer(0).unwrap();
        let inputs: Vec<_> = layer.inputs().collect();
        assert_eq!(
            inputs,
            vec![(crate::runtime::LayerRef::External(-1), Polarity::Inhibitory)]
        );
    }

    #[test]
    fn test_wire_input_refuses_to_overflow_local_ids() {
        let json = r#"{"chunks":[{"id":0,"name":"floor",
            "input":{"from_node":[0],"from_layer":[0],"local_layer_assigned_id":[-2147483648]},
            "layers":[{"layer":0,"size":2,"dynamics":{"a":[],"b":[],"c":0,"d":[]},
                       "input_layers":[],"exci_inhi":[]},
                      {"layer":1,"size":2,"dynamics":{"a":[],"b":[],"c":0,"d":[]},
                       "input_layers":[],"exci_inhi":[]}]}]}"#;
        let mut genome = crate::genome::parser::GenomeParser::parse_unchecked(json).unwrap();
        let before = genome.clone();

        // A known source first, then a new one: nothing is applied
        let err = genome
            .wire_input(0, &[(0, 0), (0, 1)], &[0, 0])
            .unwrap_err();
        assert_eq!(err, GenomeError::LocalIdExhausted(i32::MIN));
        assert_eq!(genome, before);

        assert_eq!(genome.wire_input(0, &[(0, 0)], &[1]).unwrap(), vec![i32::MIN]);
    }
}
