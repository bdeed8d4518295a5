//! Interactive evolution of pattern network populations.
//!
//! There is no fitness function: the user marks favourite cells each
//! generation, and the next generation is bred from those.
//!
//! - **Breeding** (`breeding`): seeded sampling, mutation and crossover
//! - **Population** (`population`): the grid of networks and the evolve step
//!
//! # Example
//!
//! ```rust,no_run
//! use picbreed::compute::evolution::{BreedRng, Population};
//! use picbreed::schema::PopulationConfig;
//!
//! let mut rng = BreedRng::new(42);
//! let mut population = Population::new(PopulationConfig::default()).unwrap();
//! population.initialize(&mut rng).unwrap();
//!
//! // User picked cells 3 and 7
//! population.evolve(&[3, 7], &mut rng).unwrap();
//! let canvases = population.render(32, 32).unwrap();
//! assert_eq!(canvases.len(), population.size());
//! ```

mod breeding;
mod population;

pub use breeding::{BreedRng, PARAMETER_BOUNDS};
pub use population::{Population, PopulationError};
