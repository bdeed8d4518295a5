//! Random sampling, mutation and crossover of pattern networks.

use rand::prelude::*;
use rand_distr::{StandardNormal, Uniform};

use crate::compute::{Activation, Layer, NetworkError, PatternNetwork};
use crate::schema::{MutationConfig, NetworkConfig};

/// Parameters are sampled from, and mutations clamped to, this range.
pub const PARAMETER_BOUNDS: (f32, f32) = (-1.0, 1.0);

/// Random number generator wrapper for network sampling and breeding.
///
/// All randomness in a run flows through one of these, so a fixed seed
/// reproduces every generation exactly.
pub struct BreedRng {
    rng: StdRng,
}

impl BreedRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Sample a fresh network: Uniform[-1, 1] weights and biases, hidden
    /// activations drawn from the configured menu, sigmoid output.
    pub fn random_network(
        &mut self,
        config: &NetworkConfig,
    ) -> Result<PatternNetwork, NetworkError> {
        let widths = config.layer_widths();
        let transitions = widths.len() - 1;

        let layers = widths
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let (inputs, outputs) = (pair[0], pair[1]);
                let weights = self.uniform_vec(inputs * outputs);
                let biases = self.uniform_vec(outputs);
                let activation = if i == transitions - 1 {
                    Activation::OUTPUT
                } else {
                    self.random_activation(&config.activations)
                };
                Layer::new(inputs, outputs, weights, biases, activation)
            })
            .collect::<Result<Vec<_>, _>>()?;

        PatternNetwork::from_layers(layers)
    }

    fn random_activation(&mut self, menu: &[Activation]) -> Activation {
        menu.choose(&mut self.rng)
            .copied()
            .unwrap_or(Activation::OUTPUT)
    }

    fn uniform_vec(&mut self, len: usize) -> Vec<f32> {
        let dist = Uniform::new_inclusive(PARAMETER_BOUNDS.0, PARAMETER_BOUNDS.1);
        (0..len).map(|_| dist.sample(&mut self.rng)).collect()
    }

    /// Gaussian mutation: add noise scaled to the parameter range, then clamp.
    pub fn gaussian_mutate(&mut self, value: f32, strength: f32) -> f32 {
        let (lo, hi) = PARAMETER_BOUNDS;
        let noise: f32 = self.rng.sample(StandardNormal);
        let mutated = value + noise * strength * (hi - lo);
        mutated.clamp(lo, hi)
    }

    /// Return a mutated copy of `parent`. The parent is never modified.
    ///
    /// The child always differs from the parent in at least one parameter.
    pub fn mutate(
        &mut self,
        parent: &PatternNetwork,
        config: &MutationConfig,
        menu: &[Activation],
    ) -> PatternNetwork {
        let mut child = parent.clone();
        let mut changed = false;
        let output_layer = child.layers().len() - 1;

        for (index, layer) in child.layers_mut().iter_mut().enumerate() {
            for w in layer.weights_mut() {
                if self.rng.r#gen::<f32>() < config.rate {
                    let mutated = self.gaussian_mutate(*w, config.strength);
                    changed |= mutated != *w;
                    *w = mutated;
                }
            }
            for b in layer.biases_mut() {
                if self.rng.r#gen::<f32>() < config.rate {
                    let mutated = self.gaussian_mutate(*b, config.strength);
                    changed |= mutated != *b;
                    *b = mutated;
                }
            }

            // Output layer stays sigmoid
            if index != output_layer && self.rng.r#gen::<f32>() < config.activation_rate {
                let activation = self.random_activation(menu);
                changed |= activation != layer.activation();
                layer.set_activation(activation);
            }
        }

        if !changed {
            self.resample_parameter(&mut child);
        }

        child
    }

    /// Redraw one randomly chosen weight or bias from the full range.
    fn resample_parameter(&mut self, network: &mut PatternNetwork) {
        let total = network.parameter_count();
        let mut target = self.rng.gen_range(0..total);
        let dist = Uniform::new_inclusive(PARAMETER_BOUNDS.0, PARAMETER_BOUNDS.1);

        for layer in network.layers_mut() {
            let weights = layer.weights().len();
            if target < weights {
                let old = layer.weights()[target];
                layer.weights_mut()[target] = self.draw_different(&dist, old);
                return;
            }
            target -= weights;

            let biases = layer.biases().len();
            if target < biases {
                let old = layer.biases()[target];
                layer.biases_mut()[target] = self.draw_different(&dist, old);
                return;
            }
            target -= biases;
        }
    }

    fn draw_different(&mut self, dist: &Uniform<f32>, old: f32) -> f32 {
        loop {
            let value = dist.sample(&mut self.rng);
            if value != old {
                return value;
            }
        }
    }

    /// Combine two parents layer by layer, taking each layer whole from
    /// either parent. Parents of different topology yield a copy of `a`.
    pub fn crossover(&mut self, a: &PatternNetwork, b: &PatternNetwork) -> PatternNetwork {
        if a.layer_widths() != b.layer_widths() {
            return a.clone();
        }

        let layers: Vec<Layer> = a
            .layers()
            .iter()
            .zip(b.layers().iter())
            .map(|(la, lb)| {
                if self.rng.gen_bool(0.5) {
                    la.clone()
                } else {
                    lb.clone()
                }
            })
            .collect();

        PatternNetwork::from_layers(layers).unwrap_or_else(|_| a.clone())
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.r#gen::<f32>() < p
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
