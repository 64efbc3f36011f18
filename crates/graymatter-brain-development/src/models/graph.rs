// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
ConnectomeGraph - directed multigraph of region dependencies.

Nodes are chunk ids. Every manifest entry of a chunk contributes one edge
from the source chunk to the owning chunk, so parallel edges (several source
layers of the same chunk) and self-loops (a chunk feeding itself) are kept
as distinct edges.

The graph is rebuilt on every load and is read-only afterwards.
*/

use std::fmt::Write as _;

use ahash::AHashMap;
use graymatter_evolutionary::{ChunkId, LayerIndex, LocalExternalId};

/// One dependency: `source` layer `source_layer` feeds `target` as `local_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectomeEdge {
    pub source: ChunkId,
    pub target: ChunkId,
    pub source_layer: LayerIndex,
    pub local_id: LocalExternalId,
}

impl ConnectomeEdge {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Directed multigraph over chunk ids
#[derive(Debug, Clone, Default)]
pub struct ConnectomeGraph {
    nodes: Vec<ChunkId>,
    edges: Vec<ConnectomeEdge>,
    /// node -> indices into `edges`
    outgoing: AHashMap<ChunkId, Vec<usize>>,
    incoming: AHashMap<ChunkId, Vec<usize>>,
}

impl ConnectomeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_node(&mut self, id: ChunkId) {
        if !self.outgoing.contains_key(&id) {
            self.nodes.push(id);
            self.outgoing.insert(id, Vec::new());
            self.incoming.insert(id, Vec::new());
        }
    }

    /// Add an edge; both endpoints must already be nodes
    pub(crate) fn add_edge(&mut self, edge: ConnectomeEdge) {
        let index = self.edges.len();
        self.edges.push(edge);
        self.outgoing.entry(edge.source).or_default().push(index);
        self.incoming.entry(edge.target).or_default().push(index);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node ids in insertion (chunk) order
    pub fn nodes(&self) -> &[ChunkId] {
        &self.nodes
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[ConnectomeEdge] {
        &self.edges
    }

    pub fn contains_node(&self, id: ChunkId) -> bool {
        self.outgoing.contains_key(&id)
    }

    /// Edges leaving `id` (empty for unknown nodes)
    pub fn outgoing(&self, id: ChunkId) -> impl Iterator<Item = &ConnectomeEdge> + '_ {
        self.outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    /// Edges entering `id` (empty for unknown nodes)
    pub fn incoming(&self, id: ChunkId) -> impl Iterator<Item = &ConnectomeEdge> + '_ {
        self.incoming
            .get(&id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    pub fn out_degree(&self, id: ChunkId) -> usize {
        self.outgoing.get(&id).map_or(0, Vec::len)
    }

    pub fn in_degree(&self, id: ChunkId) -> usize {
        self.incoming.get(&id).map_or(0, Vec::len)
    }

    /// All parallel edges from `source` to `target`
    pub fn edges_between(&self, source: ChunkId, target: ChunkId) -> Vec<&ConnectomeEdge> {
        self.outgoing(source).filter(|e| e.target == target).collect()
    }

    pub fn self_loops(&self) -> impl Iterator<Item = &ConnectomeEdge> + '_ {
        self.edges.iter().filter(|e| e.is_self_loop())
    }

    /// Render as Graphviz DOT with node ids as labels
    pub fn to_dot(&self) -> String {
        self.to_dot_labeled(|_| None)
    }

    /// Render as Graphviz DOT, labelling nodes through `label`
    ///
    /// Nodes for which `label` returns `None` are labelled with their id.
    pub fn to_dot_labeled<F>(&self, label: F) -> String
    where
        F: Fn(ChunkId) -> Option<String>,
    {
        let mut dot = String::from("digraph connectome {\n");
        for &id in &self.nodes {
            let text = label(id).unwrap_or_else(|| id.to_string());
            // Writing to a String cannot fail
            let _ = writeln!(dot, "    {} [label=\"{}\"];", id, escape(&text));
        }
        for edge in &self.edges {
            let _ = writeln!(
                dot,
                "    {} -> {} [label=\"L{} as {}\"];",
                edge.source, edge.target, edge.source_layer, edge.local_id
            );
        }
        dot.push_str("}\n");
        dot
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
