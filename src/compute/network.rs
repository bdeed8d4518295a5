//! Pattern networks: small feed-forward functions from pixel coordinates to colour.
//!
//! Parameters are sampled once (see [`BreedRng::random_network`]) and never
//! trained or edited in place. Evolution produces new networks from copies.
//!
//! [`BreedRng::random_network`]: super::evolution::BreedRng::random_network

use serde::{Deserialize, Serialize};

use super::activation::Activation;
use super::colour::{ColourGrid, Rgb, to_rgb};
use super::evolution::BreedRng;
use crate::schema::NetworkConfig;

/// Input width required by [`PatternNetwork::colour`]: row and column.
pub const COORDINATE_WIDTH: usize = 2;
/// Input width required by [`PatternNetwork::colour_at`]: row, column and frame.
pub const TIMED_WIDTH: usize = 3;
/// Output width required by [`PatternNetwork::colour`].
pub const COLOUR_WIDTH: usize = 3;

/// Network evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Network has no layers")]
    EmptyNetwork,
    #[error("Layer widths must be non-zero")]
    EmptyLayer,
}

/// One layer transition: `activation(weights · x + biases)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayer")]
pub struct Layer {
    inputs: usize,
    outputs: usize,
    /// Row-major `outputs x inputs` matrix.
    weights: Vec<f32>,
    biases: Vec<f32>,
    activation: Activation,
}

/// Unchecked serialized layer, passed through [`Layer::new`] on the way in.
#[derive(Deserialize)]
struct RawLayer {
    inputs: usize,
    outputs: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
    activation: Activation,
}

impl TryFrom<RawLayer> for Layer {
    type Error = NetworkError;

    fn try_from(raw: RawLayer) -> Result<Self, Self::Error> {
        Layer::new(raw.inputs, raw.outputs, raw.weights, raw.biases, raw.activation)
    }
}

impl Layer {
    /// Build a layer from explicit parameters.
    pub fn new(
        inputs: usize,
        outputs: usize,
        weights: Vec<f32>,
        biases: Vec<f32>,
        activation: Activation,
    ) -> Result<Self, NetworkError> {
        if inputs == 0 || outputs == 0 {
            return Err(NetworkError::EmptyLayer);
        }
        if weights.len() != inputs * outputs {
            return Err(NetworkError::DimensionMismatch {
                expected: inputs * outputs,
                actual: weights.len(),
            });
        }
        if biases.len() != outputs {
            return Err(NetworkError::DimensionMismatch {
                expected: outputs,
                actual: biases.len(),
            });
        }
        Ok(Self {
            inputs,
            outputs,
            weights,
            biases,
            activation,
        })
    }

    #[inline]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[inline]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn biases(&self) -> &[f32] {
        &self.biases
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub(crate) fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weights
    }

    pub(crate) fn biases_mut(&mut self) -> &mut [f32] {
        &mut self.biases
    }

    pub(crate) fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
    }

    /// Evaluate one sample. `input.len() == inputs`, `output.len() == outputs`.
    ///
    /// Both the single and batched paths go through here, which keeps their
    /// results bit-identical.
    #[inline]
    fn evaluate(&self, input: &[f32], output: &mut [f32]) {
        for ((out, row), bias) in output
            .iter_mut()
            .zip(self.weights.chunks_exact(self.inputs))
            .zip(self.biases.iter())
        {
            let dot: f32 = row.iter().zip(input.iter()).map(|(w, x)| w * x).sum();
            *out = dot + bias;
        }
        self.activation.apply_in_place(output);
    }
}

/// Immutable feed-forward network mapping a coordinate to a colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct PatternNetwork {
    layers: Vec<Layer>,
}

/// Layers are validated individually; this checks that they chain.
#[derive(Deserialize)]
struct RawNetwork {
    layers: Vec<Layer>,
}

impl TryFrom<RawNetwork> for PatternNetwork {
    type Error = NetworkError;

    fn try_from(raw: RawNetwork) -> Result<Self, Self::Error> {
        Self::from_layers(raw.layers)
    }
}

impl PatternNetwork {
    /// Sample a fresh network for the given topology.
    pub fn random(config: &NetworkConfig, rng: &mut BreedRng) -> Result<Self, NetworkError> {
        rng.random_network(config)
    }

    /// Build a network from explicit layers, checking that widths chain.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }
        for pair in layers.windows(2) {
            if pair[0].outputs != pair[1].inputs {
                return Err(NetworkError::DimensionMismatch {
                    expected: pair[0].outputs,
                    actual: pair[1].inputs,
                });
            }
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Full width sequence, input first and output last.
    pub fn layer_widths(&self) -> Vec<usize> {
        std::iter::once(self.input_width())
            .chain(self.layers.iter().map(|l| l.outputs))
            .collect()
    }

    /// Number of entries in [`layer_widths`](Self::layer_widths).
    #[inline]
    pub fn depth(&self) -> usize {
        self.layers.len() + 1
    }

    #[inline]
    pub fn input_width(&self) -> usize {
        self.layers[0].inputs
    }

    #[inline]
    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].outputs
    }

    fn max_width(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.outputs.max(l.inputs))
            .max()
            .unwrap_or(0)
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }

    /// Activation of every layer transition, in order.
    pub fn activations(&self) -> Vec<Activation> {
        self.layers.iter().map(|l| l.activation).collect()
    }

    /// Run one sample through the network using two scratch buffers.
    fn forward_into(&self, x: &[f32], front: &mut Vec<f32>, back: &mut Vec<f32>) {
        front.clear();
        front.extend_from_slice(x);
        for layer in &self.layers {
            back.clear();
            back.resize(layer.outputs, 0.0);
            layer.evaluate(front.as_slice(), back.as_mut_slice());
            std::mem::swap(front, back);
        }
    }

    /// Evaluate a single input vector.
    pub fn forward(&self, x: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if x.len() != self.input_width() {
            return Err(NetworkError::DimensionMismatch {
                expected: self.input_width(),
                actual: x.len(),
            });
        }
        let mut front = Vec::with_capacity(self.max_width());
        let mut back = Vec::with_capacity(self.max_width());
        self.forward_into(x, &mut front, &mut back);
        Ok(front)
    }

    /// Evaluate a row-major batch of inputs, `input_width` values per sample.
    ///
    /// Returns `output_width` values per sample, in the same order.
    pub fn forward_batch(&self, batch: &[f32]) -> Result<Vec<f32>, NetworkError> {
        let input_width = self.input_width();
        if batch.len() % input_width != 0 {
            return Err(NetworkError::DimensionMismatch {
                expected: batch.len().next_multiple_of(input_width),
                actual: batch.len(),
            });
        }

        let samples = batch.len() / input_width;
        let mut output = Vec::with_capacity(samples * self.output_width());
        let mut front = Vec::with_capacity(self.max_width());
        let mut back = Vec::with_capacity(self.max_width());

        for x in batch.chunks_exact(input_width) {
            self.forward_into(x, &mut front, &mut back);
            output.extend_from_slice(&front);
        }

        Ok(output)
    }

    fn check_colour_shape(&self, input_width: usize) -> Result<(), NetworkError> {
        if self.input_width() != input_width {
            return Err(NetworkError::DimensionMismatch {
                expected: input_width,
                actual: self.input_width(),
            });
        }
        if self.output_width() != COLOUR_WIDTH {
            return Err(NetworkError::DimensionMismatch {
                expected: COLOUR_WIDTH,
                actual: self.output_width(),
            });
        }
        Ok(())
    }

    /// Whether the network takes a frame index as its third input.
    #[inline]
    pub fn is_animated(&self) -> bool {
        self.input_width() == TIMED_WIDTH
    }

    /// Colour of pixel (i, j).
    pub fn colour(&self, i: usize, j: usize) -> Result<Rgb, NetworkError> {
        self.check_colour_shape(COORDINATE_WIDTH)?;
        let output = self.forward(&[i as f32, j as f32])?;
        Ok(to_rgb(&output))
    }

    /// Colour of pixel (i, j) in frame `t` of an animated network.
    pub fn colour_at(&self, i: usize, j: usize, t: usize) -> Result<Rgb, NetworkError> {
        self.check_colour_shape(TIMED_WIDTH)?;
        let output = self.forward(&[i as f32, j as f32, t as f32])?;
        Ok(to_rgb(&output))
    }

    /// Colour of every pixel in a `height x width` grid in one batched pass.
    ///
    /// `colour_batch(h, w).get(i, j)` equals `colour(i, j)` exactly.
    pub fn colour_batch(&self, height: usize, width: usize) -> Result<ColourGrid, NetworkError> {
        self.check_colour_shape(COORDINATE_WIDTH)?;
        self.colour_grid(height, width, None)
    }

    /// Frame `t` of an animated network, batched like [`colour_batch`](Self::colour_batch).
    pub fn colour_batch_at(
        &self,
        height: usize,
        width: usize,
        t: usize,
    ) -> Result<ColourGrid, NetworkError> {
        self.check_colour_shape(TIMED_WIDTH)?;
        self.colour_grid(height, width, Some(t))
    }

    fn colour_grid(
        &self,
        height: usize,
        width: usize,
        frame: Option<usize>,
    ) -> Result<ColourGrid, NetworkError> {
        let mut inputs = Vec::with_capacity(height * width * self.input_width());
        for i in 0..height {
            for j in 0..width {
                inputs.push(i as f32);
                inputs.push(j as f32);
                if let Some(t) = frame {
                    inputs.push(t as f32);
                }
            }
        }

        let output = self.forward_batch(&inputs)?;
        let pixels = output.chunks_exact(COLOUR_WIDTH).map(to_rgb).collect();

        ColourGrid::from_pixels(height, width, pixels).ok_or(NetworkError::DimensionMismatch {
            expected: height * width * COLOUR_WIDTH,
            actual: output.len(),
        })
    }

    /// Genetic distance: mean absolute parameter difference, plus 1 per
    /// differing activation. Networks of different topology are infinitely far.
    pub fn parameter_distance(&self, other: &PatternNetwork) -> f32 {
        if self.layer_widths() != other.layer_widths() {
            return f32::INFINITY;
        }

        let mut distance = 0.0f32;
        let mut count = 0;

        for (a, b) in self.layers.iter().zip(other.layers.iter()) {
            for (x, y) in a
                .weights
                .iter()
                .chain(a.biases.iter())
                .zip(b.weights.iter().chain(b.biases.iter()))
            {
                distance += (x - y).abs();
                count += 1;
            }
        }

        let mut mean = if count > 0 {
            distance / count as f32
        } else {
            0.0
        };

        mean += self
            .layers
            .iter()
            .zip(other.layers.iter())
            .filter(|(a, b)| a.activation != b.activation)
            .count() as f32;

        mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn identity_layer(width: usize, activation: Activation) -> Layer {
        let mut weights = vec![0.0; width * width];
        for k in 0..width {
            weights[k * width + k] = 1.0;
        }
        Layer::new(width, width, weights, vec![0.0; width], activation).unwrap()
    }

    fn sampled(seed: u64) -> PatternNetwork {
        let mut rng = BreedRng::new(seed);
        PatternNetwork::random(&NetworkConfig::default(), &mut rng).unwrap()
    }

    fn sampled_animated(seed: u64) -> PatternNetwork {
        let config = NetworkConfig {
            input_width: TIMED_WIDTH,
            ..Default::default()
        };
        let mut rng = BreedRng::new(seed);
        PatternNetwork::random(&config, &mut rng).unwrap()
    }

    #[test]
    fn test_layer_shape_checked() {
        let result = Layer::new(2, 3, vec![0.0; 5], vec![0.0; 3], Activation::Relu);
        assert_eq!(
            result,
            Err(NetworkError::DimensionMismatch {
                expected: 6,
                actual: 5
            })
        );
        let result = Layer::new(2, 3, vec![0.0; 6], vec![0.0; 2], Activation::Relu);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_width_layer_rejected() {
        assert_eq!(
            Layer::new(0, 3, vec![], vec![0.0; 3], Activation::Relu),
            Err(NetworkError::EmptyLayer)
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"layers":[{"inputs":2,"outputs":3,"weights":[0.0],"biases":[0.0,0.0,0.0],"activation":"relu"}]}"#;
        assert!(serde_json::from_str::<PatternNetwork>(json).is_err());
        let json = r#"{"layers":[]}"#;
        assert!(serde_json::from_str::<PatternNetwork>(json).is_err());
    }

    #[test]
    fn test_layer_deserialize_validates() {
        let zero_inputs = r#"{"inputs":0,"outputs":3,"weights":[],"biases":[0.0,0.0,0.0],"activation":"relu"}"#;
        assert!(serde_json::from_str::<Layer>(zero_inputs).is_err());

        let short_weights = r#"{"inputs":2,"outputs":1,"weights":[0.5],"biases":[0.0],"activation":"sigmoid"}"#;
        assert!(serde_json::from_str::<Layer>(short_weights).is_err());

        let valid = r#"{"inputs":2,"outputs":1,"weights":[0.5,0.5],"biases":[0.0],"activation":"sigmoid"}"#;
        let layer: Layer = serde_json::from_str(valid).unwrap();
        assert_eq!((layer.inputs(), layer.outputs()), (2, 1));
    }

    #[test]
    fn test_from_layers_checks_chain() {
        let a = Layer::new(2, 3, vec![0.0; 6], vec![0.0; 3], Activation::Relu).unwrap();
        let b = Layer::new(4, 3, vec![0.0; 12], vec![0.0; 3], Activation::Sigmoid).unwrap();
        assert!(matches!(
            PatternNetwork::from_layers(vec![a, b]),
            Err(NetworkError::DimensionMismatch {
                expected: 3,
                actual: 4
            })
        ));
        assert_eq!(
            PatternNetwork::from_layers(vec![]),
            Err(NetworkError::EmptyNetwork)
        );
    }

    #[test]
    fn test_forward_known_values() {
        // relu(W x + b) then sigmoid(identity)
        let first = Layer::new(
            2,
            3,
            vec![1.0, 0.0, 0.0, 1.0, -1.0, -1.0],
            vec![0.0, 0.5, 0.0],
            Activation::Relu,
        )
        .unwrap();
        let network =
            PatternNetwork::from_layers(vec![first, identity_layer(3, Activation::Sigmoid)])
                .unwrap();

        let output = network.forward(&[2.0, 1.0]).unwrap();
        let expected = [2.0f32, 1.5, 0.0].map(|v| 1.0 / (1.0 + (-v).exp()));
        for (o, e) in output.iter().zip(expected.iter()) {
            assert!((o - e).abs() < 1e-6);
        }
    }

    #[test]
    fn test_topology() {
        let network = sampled(1);
        assert_eq!(network.layer_widths(), vec![2, 3, 3, 3, 3]);
        assert_eq!(network.depth(), 5);
        assert_eq!(network.layers().len(), network.depth() - 1);
        assert_eq!(network.parameter_count(), (6 + 3) + 3 * (9 + 3));
    }

    #[test]
    fn test_output_layer_is_sigmoid() {
        for seed in 0..20 {
            let network = sampled(seed);
            assert_eq!(
                network.activations().last().copied(),
                Some(Activation::Sigmoid)
            );
        }
    }

    #[test]
    fn test_forward_dimension_mismatch() {
        let network = sampled(2);
        assert_eq!(
            network.forward(&[1.0, 2.0, 3.0]),
            Err(NetworkError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert!(matches!(
            network.forward_batch(&[1.0, 2.0, 3.0]),
            Err(NetworkError::DimensionMismatch { actual: 3, .. })
        ));
    }

    #[test]
    fn test_colour_requires_rgb_output() {
        let layer = Layer::new(2, 2, vec![0.0; 4], vec![0.0; 2], Activation::Sigmoid).unwrap();
        let network = PatternNetwork::from_layers(vec![layer]).unwrap();
        assert!(network.colour(0, 0).is_err());
        assert!(network.colour_batch(2, 2).is_err());
    }

    #[test]
    fn test_batch_matches_single() {
        let network = sampled(3);
        let batch = [0.0, 0.0, 3.0, 7.0, 31.0, 1.0];
        let output = network.forward_batch(&batch).unwrap();
        for (x, y) in batch.chunks(2).zip(output.chunks(3)) {
            assert_eq!(network.forward(x).unwrap(), y);
        }
    }

    #[test]
    fn test_colour_batch_deterministic() {
        let a = sampled(42).colour_batch(32, 32).unwrap();
        let b = sampled(42).colour_batch(32, 32).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_batch() {
        let network = sampled(4);
        assert!(network.forward_batch(&[]).unwrap().is_empty());
        let grid = network.colour_batch(0, 5).unwrap();
        assert!(grid.pixels().is_empty());
    }

    #[test]
    fn test_animated_colour_shape() {
        let still = sampled(9);
        let animated = sampled_animated(9);
        assert!(!still.is_animated());
        assert!(animated.is_animated());
        assert_eq!(animated.layer_widths(), vec![3, 3, 3, 3, 3]);

        assert!(still.colour_at(0, 0, 0).is_err());
        assert!(still.colour_batch_at(2, 2, 0).is_err());
        assert_eq!(
            animated.colour(0, 0),
            Err(NetworkError::DimensionMismatch {
                expected: COORDINATE_WIDTH,
                actual: TIMED_WIDTH
            })
        );
        assert!(animated.colour_batch(2, 2).is_err());
    }

    #[test]
    fn test_frames_differ_over_time() {
        let moves = |seed| {
            let animated = sampled_animated(seed);
            let first = animated.colour_batch_at(8, 8, 0).unwrap();
            (1..8).any(|t| animated.colour_batch_at(8, 8, t).unwrap() != first)
        };
        assert!((0..8).any(moves));
    }

    #[test]
    fn test_parameter_distance() {
        let a = sampled(5);
        let b = sampled(6);
        assert_eq!(a.parameter_distance(&a.clone()), 0.0);
        assert!(a.parameter_distance(&b) > 0.0);
    }

    #[test]
    fn test_serde_roundtrip_preserves_output() {
        let network = sampled(8);
        let json = serde_json::to_string(&network).unwrap();
        let parsed: PatternNetwork = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.colour(5, 9).unwrap(), network.colour(5, 9).unwrap());
    }

    proptest! {
        #[test]
        fn prop_colour_batch_equals_colour(seed in any::<u64>(), h in 1usize..12, w in 1usize..12) {
            let network = sampled(seed);
            let grid = network.colour_batch(h, w).unwrap();
            for i in 0..h {
                for j in 0..w {
                    prop_assert_eq!(grid.get(i, j), Some(network.colour(i, j).unwrap()));
                }
            }
        }

        #[test]
        fn prop_colour_batch_at_equals_colour_at(seed in any::<u64>(), h in 1usize..10, w in 1usize..10, t in 0usize..64) {
            let network = sampled_animated(seed);
            let grid = network.colour_batch_at(h, w, t).unwrap();
            for i in 0..h {
                for j in 0..w {
                    prop_assert_eq!(grid.get(i, j), Some(network.colour_at(i, j, t).unwrap()));
                }
            }
        }

        #[test]
        fn prop_outputs_in_unit_interval(seed in any::<u64>(), i in 0usize..256, j in 0usize..256) {
            let network = sampled(seed);
            let output = network.forward(&[i as f32, j as f32]).unwrap();
            prop_assert_eq!(output.len(), 3);
            for v in output {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
