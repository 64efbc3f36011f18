// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connectome assembly - phenotype from a persisted genome.

Assembly runs in two stages once the genome has passed validation:

1. **Regiogenesis**: one [`Region`] per chunk, in chunk order, at tick 0
2. **Wiring**: one graph node per chunk, then one edge per input manifest
   entry from the source chunk to the owning chunk

Nothing is constructed until every reference in the genome resolves, so a
failed load never yields a partial connectome.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::path::Path;
use std::time::Instant;

use graymatter_evolutionary::{deserialize_genome, load_genome_from_file, validate_genome, Genome};
use tracing::{debug, info, trace};

use crate::connectome::Connectome;
use crate::models::{ConnectomeEdge, ConnectomeGraph, Region};
use crate::types::BduResult;

/// Builds a [`Connectome`] from a genome
pub struct ConnectomeAssembler;

impl ConnectomeAssembler {
    /// Load a persisted genome and assemble it
    ///
    /// # Errors
    ///
    /// Propagates `MalformedGenome` and `DanglingReference` from decoding;
    /// an input naming a chunk that is not in the genome is a `DanglingReference`.
    pub fn load(bytes: &[u8]) -> BduResult<Connectome> {
        let genome = deserialize_genome(bytes)?;
        Ok(Self::assemble(&genome))
    }

    /// Load a genome file and assemble it
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BduResult<Connectome> {
        let genome = load_genome_from_file(path)?;
        Ok(Self::assemble(&genome))
    }

    /// Assemble an in-memory genome after validating it the same way as a load
    pub fn from_genome(genome: &Genome) -> BduResult<Connectome> {
        validate_genome(genome).into_result()?;
        Ok(Self::assemble(genome))
    }

    /// Build regions and graph from a genome that has passed validation
    fn assemble(genome: &Genome) -> Connectome {
        let start = Instant::now();
        info!(
            target: "graymatter-brain-development",
            "🧠 [CONNECTOME] Assembling {} chunks",
            genome.chunk_count()
        );

        // Stage 1: Regiogenesis
        let regions: Vec<Region> = genome.iter().map(Region::from_chunk).collect();
        debug!(
            target: "graymatter-brain-development",
            "  ✓ Created {} regions",
            regions.len()
        );

        // Stage 2: Wiring
        let mut graph = ConnectomeGraph::new();
        for chunk in genome.iter() {
            graph.add_node(chunk.id());
        }
        for chunk in genome.iter() {
            for entry in chunk.input().iter() {
                let edge = ConnectomeEdge {
                    source: entry.source_chunk,
                    target: chunk.id(),
                    source_layer: entry.source_layer,
                    local_id: entry.local_id,
                };
                trace!(
                    target: "graymatter-brain-development",
                    "  🔗 {} (layer {}) -> {} as {}",
                    edge.source,
                    edge.source_layer,
                    edge.target,
                    edge.local_id
                );
                graph.add_edge(edge);
            }
        }

        info!(
            target: "graymatter-brain-development",
            "✅ [CONNECTOME] {} regions, {} edges ({} self-loops) in {:.2}ms",
            regions.len(),
            graph.edge_count(),
            graph.self_loops().count(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Connectome::new(regions, graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BduError;
    use graymatter_evolutionary::{serialize_genome, GenomeError, LayerDynamics};

    fn flat(flags: &[bool]) -> LayerDynamics {
        LayerDynamics::with_flags(vec![0.02], vec![0.2], -65.0, vec![8.0], flags)
    }

    #[test]
    fn test_from_genome_matches_chunk_order() {
        let mut genome = Genome::new();
        for name in ["a", "b", "c"] {
            let mut chunk = genome.create_chunk(&[], &[], name).unwrap();
            chunk.append_layer(2, &[], flat(&[])).unwrap();
            genome.commit_chunk(chunk).unwrap();
        }

        let connectome = ConnectomeAssembler::from_genome(&genome).unwrap();
        let names: Vec<_> = connectome.regions().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(connectome.regions().iter().all(|r| r.tick() == 0));
        assert_eq!(connectome.graph().nodes(), &[0, 1, 2]);
        assert_eq!(connectome.graph().edge_count(), 0);
    }

    #[test]
    fn test_from_genome_validates_first() {
        let mut genome = Genome::new();
        let mut chunk = genome.create_chunk(&[4], &[0], "orphan").unwrap();
        chunk.append_layer(2, &[-1], flat(&[true])).unwrap();
        genome.commit_chunk(chunk).unwrap();

        assert!(matches!(
            ConnectomeAssembler::from_genome(&genome),
            Err(BduError::Genome(GenomeError::DanglingReference(_)))
        ));
    }

    #[test]
    fn test_self_loop_is_kept() {
        let mut genome = Genome::new();
        let mut chunk = genome.create_chunk(&[], &[], "recurrent").unwrap();
        chunk.append_layer(2, &[], flat(&[])).unwrap();
        let id = genome.commit_chunk(chunk).unwrap();
        genome.wire_input(id, &[(id, 0)], &[0]).unwrap();

        let bytes = serialize_genome(&genome).unwrap();
        let connectome = ConnectomeAssembler::load(&bytes).unwrap();
        let (regions, graph) = connectome.into_parts();

        assert_eq!(regions.len(), 1);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.self_loops().count(), 1);
        assert_eq!(graph.edges_between(id, id)[0].local_id, -1);
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(
            ConnectomeAssembler::load(b"{\"chunks\": 5}"),
            Err(BduError::Genome(GenomeError::MalformedGenome(_)))
        ));
    }
}
