//! Configuration types for pattern networks, breeding and display.

use serde::{Deserialize, Serialize};

use crate::compute::{Activation, COLOUR_WIDTH, COORDINATE_WIDTH, TIMED_WIDTH};

fn default_hidden_widths() -> Vec<usize> {
    vec![3, 3, 3]
}
fn default_input_width() -> usize {
    2
}
fn default_output_width() -> usize {
    3
}
fn default_activations() -> Vec<Activation> {
    Activation::ALL.to_vec()
}

/// Topology and activation menu shared by every network in a population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Hidden layer widths, in order.
    #[serde(default = "default_hidden_widths")]
    pub hidden_widths: Vec<usize>,
    /// Input dimensionality: 2 for (row, column), 3 to add a frame index.
    #[serde(default = "default_input_width")]
    pub input_width: usize,
    /// Output dimensionality (3 for RGB).
    #[serde(default = "default_output_width")]
    pub output_width: usize,
    /// Activations hidden layers are drawn from.
    #[serde(default = "default_activations")]
    pub activations: Vec<Activation>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden_widths: default_hidden_widths(),
            input_width: default_input_width(),
            output_width: default_output_width(),
            activations: default_activations(),
        }
    }
}

impl NetworkConfig {
    /// Full width sequence: input, hidden layers, output.
    pub fn layer_widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.hidden_widths.len() + 2);
        widths.push(self.input_width);
        widths.extend_from_slice(&self.hidden_widths);
        widths.push(self.output_width);
        widths
    }

    /// Whether networks take the frame index as a third input.
    #[inline]
    pub fn is_animated(&self) -> bool {
        self.input_width == TIMED_WIDTH
    }
}

fn default_mutation_rate() -> f32 {
    0.2
}
fn default_mutation_strength() -> f32 {
    0.15
}
fn default_activation_rate() -> f32 {
    0.1
}
fn default_crossover_rate() -> f32 {
    0.3
}

/// Reproduction settings used when evolving from a selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability that a single weight or bias is perturbed.
    #[serde(default = "default_mutation_rate")]
    pub rate: f32,
    /// Standard deviation of the perturbation, relative to the [-1, 1] range.
    #[serde(default = "default_mutation_strength")]
    pub strength: f32,
    /// Probability that a hidden layer re-rolls its activation.
    #[serde(default = "default_activation_rate")]
    pub activation_rate: f32,
    /// Probability that a child combines layers of two selected parents.
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            rate: default_mutation_rate(),
            strength: default_mutation_strength(),
            activation_rate: default_activation_rate(),
            crossover_rate: default_crossover_rate(),
        }
    }
}

fn default_grid_size() -> usize {
    4
}

/// Population settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Cells per side of the on-screen grid; population size is its square.
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    /// Network topology.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Reproduction settings.
    #[serde(default)]
    pub mutation: MutationConfig,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            network: NetworkConfig::default(),
            mutation: MutationConfig::default(),
        }
    }
}

impl PopulationConfig {
    /// Number of individuals (grid_size squared).
    #[inline]
    pub fn size(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::InvalidGridSize);
        }

        let network = &self.network;
        if !matches!(network.input_width, COORDINATE_WIDTH | TIMED_WIDTH)
            || network.output_width != COLOUR_WIDTH
        {
            return Err(ConfigError::InvalidWidth {
                input: network.input_width,
                output: network.output_width,
            });
        }
        if let Some(layer) = network.hidden_widths.iter().position(|&w| w == 0) {
            return Err(ConfigError::EmptyHiddenLayer { layer });
        }
        if network.activations.is_empty() {
            return Err(ConfigError::NoActivations);
        }

        let mutation = &self.mutation;
        for (name, p) in [
            ("rate", mutation.rate),
            ("activation_rate", mutation.activation_rate),
            ("crossover_rate", mutation.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidProbability {
                    name: name.to_string(),
                    value: p,
                });
            }
        }
        if mutation.strength.is_nan() || mutation.strength < 0.0 {
            return Err(ConfigError::InvalidStrength(mutation.strength));
        }

        Ok(())
    }
}

fn default_window_size() -> usize {
    500
}
fn default_canvas_size() -> usize {
    32
}

/// Window and per-cell canvas resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Window width in pixels.
    #[serde(default = "default_window_size")]
    pub window_width: usize,
    /// Window height in pixels.
    #[serde(default = "default_window_size")]
    pub window_height: usize,
    /// Canvas width each network is evaluated at.
    #[serde(default = "default_canvas_size")]
    pub canvas_width: usize,
    /// Canvas height each network is evaluated at.
    #[serde(default = "default_canvas_size")]
    pub canvas_height: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_size(),
            window_height: default_window_size(),
            canvas_width: default_canvas_size(),
            canvas_height: default_canvas_size(),
        }
    }
}

impl DisplayConfig {
    /// Validate display dimensions against the grid they will show.
    pub fn validate(&self, grid_size: usize) -> Result<(), ConfigError> {
        if grid_size == 0 {
            return Err(ConfigError::InvalidGridSize);
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::InvalidCanvas);
        }
        // Every tile needs at least one pixel after the 1px gutter.
        if self.window_width / grid_size < 2 || self.window_height / grid_size < 2 {
            return Err(ConfigError::WindowTooSmall {
                width: self.window_width,
                height: self.window_height,
                grid_size,
            });
        }
        Ok(())
    }
}

/// Top-level configuration read by the command line driver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreederConfig {
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl BreederConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.population.validate()?;
        self.display.validate(self.population.grid_size)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid size must be non-zero")]
    InvalidGridSize,
    #[error("Networks map 2 or 3 inputs to 3 colour channels, got {input} -> {output}")]
    InvalidWidth { input: usize, output: usize },
    #[error("Hidden layer {layer} has zero width")]
    EmptyHiddenLayer { layer: usize },
    #[error("Activation menu must not be empty")]
    NoActivations,
    #[error("Probability {name} = {value} is outside [0, 1]")]
    InvalidProbability { name: String, value: f32 },
    #[error("Mutation strength {0} must be non-negative")]
    InvalidStrength(f32),
    #[error("Canvas dimensions must be non-zero")]
    InvalidCanvas,
    #[error("Window {width}x{height} is too small for a {grid_size}x{grid_size} grid")]
    WindowTooSmall {
        width: usize,
        height: usize,
        grid_size: usize,
    },
}
