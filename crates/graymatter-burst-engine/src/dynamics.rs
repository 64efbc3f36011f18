// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Dynamics evaluation seam.

The scheduler does not know any neuron model. For each layer it hands the
layer's dynamics payload, its sign-adjusted inputs and its previous output
to a [`DynamicsEvaluator`] and stores whatever comes back.

Any `Fn(&LayerDynamics, &[f64], f64) -> f64` closure that is `Send + Sync`
is an evaluator.
*/

use graymatter_evolutionary::LayerDynamics;

/// Computes a layer's next output
pub trait DynamicsEvaluator: Send + Sync {
    /// `inputs` holds one value per layer reference, already sign-adjusted
    fn evaluate(&self, dynamics: &LayerDynamics, inputs: &[f64], previous: f64) -> f64;
}

/// Evaluator that keeps every layer at rest (output `0.0`)
#[derive(Debug, Clone, Copy, Default)]
pub struct QuiescentEvaluator;

impl DynamicsEvaluator for QuiescentEvaluator {
    fn evaluate(&self, _dynamics: &LayerDynamics, _inputs: &[f64], _previous: f64) -> f64 {
        0.0
    }
}

impl<F> DynamicsEvaluator for F
where
    F: Fn(&LayerDynamics, &[f64], f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, dynamics: &LayerDynamics, inputs: &[f64], previous: f64) -> f64 {
        self(dynamics, inputs, previous)
    }
}
