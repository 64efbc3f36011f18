// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Runtime models built from a genome: regions and the dependency graph

pub mod graph;
pub mod region;

pub use graph::{ConnectomeEdge, ConnectomeGraph};
pub use region::Region;
