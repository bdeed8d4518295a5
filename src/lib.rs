//! Picbreed - Interactive breeding of images drawn by random pattern networks.
//!
//! Every individual is a small feed-forward network mapping a pixel
//! coordinate to a colour. Weights, biases and per-layer activations are
//! sampled once and never trained. The user marks favourite cells on a grid
//! and the next generation is bred from mutated copies of those.
//! Networks configured with a third input also see the frame index and
//! animate.
//!
//! # Architecture
//!
//! - `schema`: Configuration types
//! - `compute`: Pattern networks and population evolution
//! - `display`: Headless tiling, selection and frame output
//!
//! # Example
//!
//! ```rust,no_run
//! use picbreed::{
//!     compute::evolution::{BreedRng, Population},
//!     schema::PopulationConfig,
//! };
//!
//! let mut rng = BreedRng::new(7);
//! let mut population = Population::new(PopulationConfig::default()).unwrap();
//! population.initialize(&mut rng).unwrap();
//!
//! let rgb = population.member(3).unwrap().colour(0, 0).unwrap();
//! println!("Cell 3 at (0, 0): {:?}", rgb);
//!
//! population.evolve(&[3, 7], &mut rng).unwrap();
//! ```

pub mod compute;
pub mod display;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{BreedRng, Population, PopulationError};
pub use compute::{Activation, ColourGrid, NetworkError, PatternNetwork, Rgb};
pub use schema::{BreederConfig, PopulationConfig};
