//! Interactive population: one network per on-screen grid cell.

use log::{Level, debug, info, log_enabled};
use rayon::prelude::*;

use super::breeding::BreedRng;
use crate::compute::{ColourGrid, NetworkError, PatternNetwork};
use crate::schema::{ConfigError, PopulationConfig};

/// Population errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PopulationError {
    #[error("Population has not been initialized")]
    Uninitialized,
    #[error("Selected index {index} is outside population of size {size}")]
    InvalidSelection { index: usize, size: usize },
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

/// Ordered, fixed-size collection of pattern networks.
///
/// Index `k` always corresponds to grid cell `k`. [`evolve`](Self::evolve)
/// builds a complete new generation before replacing the old one.
#[derive(Debug, Clone)]
pub struct Population {
    config: PopulationConfig,
    members: Vec<PatternNetwork>,
    /// Previous-generation indices each member was bred from.
    parents: Vec<Vec<usize>>,
    generation: usize,
}

impl Population {
    /// Create an empty population. Call [`initialize`](Self::initialize) before use.
    pub fn new(config: PopulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            members: Vec::new(),
            parents: Vec::new(),
            generation: 0,
        })
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// Number of individuals (grid_size squared).
    #[inline]
    pub fn size(&self) -> usize {
        self.config.size()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.members.is_empty()
    }

    /// Generations evolved since the last initialize.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Read-only view of the current generation, in cell order.
    pub fn members(&self) -> &[PatternNetwork] {
        &self.members
    }

    /// Member shown in cell `index`.
    pub fn member(&self, index: usize) -> Result<&PatternNetwork, PopulationError> {
        if !self.is_initialized() {
            return Err(PopulationError::Uninitialized);
        }
        self.members
            .get(index)
            .ok_or(PopulationError::InvalidSelection {
                index,
                size: self.size(),
            })
    }

    /// Previous-generation indices member `index` descends from.
    /// Empty for freshly sampled members.
    pub fn parents(&self, index: usize) -> Option<&[usize]> {
        self.parents.get(index).map(Vec::as_slice)
    }

    /// Fill every cell with an independently sampled network.
    pub fn initialize(&mut self, rng: &mut BreedRng) -> Result<(), PopulationError> {
        let members = self.fresh_generation(rng)?;

        self.members = members;
        self.parents = vec![Vec::new(); self.size()];
        self.generation = 0;

        info!("Initialized population of {} networks", self.size());
        Ok(())
    }

    fn fresh_generation(&self, rng: &mut BreedRng) -> Result<Vec<PatternNetwork>, NetworkError> {
        (0..self.size())
            .map(|_| rng.random_network(&self.config.network))
            .collect()
    }

    /// Replace the population with a new generation bred from `selected`.
    ///
    /// An empty selection resamples every member. Otherwise each cell gets a
    /// mutated copy (occasionally a crossover) of parents drawn with
    /// replacement from the selection. Out-of-range indices fail with
    /// [`PopulationError::InvalidSelection`] and leave the population as it was.
    pub fn evolve(&mut self, selected: &[usize], rng: &mut BreedRng) -> Result<(), PopulationError> {
        if !self.is_initialized() {
            return Err(PopulationError::Uninitialized);
        }

        let size = self.size();
        if let Some(&index) = selected.iter().find(|&&k| k >= size) {
            return Err(PopulationError::InvalidSelection { index, size });
        }

        let mut pool = selected.to_vec();
        pool.sort_unstable();
        pool.dedup();

        let (members, parents) = if pool.is_empty() {
            info!("No members selected, sampling a fresh generation");
            (self.fresh_generation(rng)?, vec![Vec::new(); size])
        } else {
            self.offspring(&pool, rng)
        };

        // Swap in only once the whole generation exists.
        self.members = members;
        self.parents = parents;
        self.generation += 1;

        info!(
            "Generation {} bred from {} parent(s): {:?}",
            self.generation,
            pool.len(),
            pool
        );
        if log_enabled!(Level::Debug) {
            debug!("Generation {} diversity: {:.4}", self.generation, self.diversity());
        }
        Ok(())
    }

    fn offspring(
        &self,
        pool: &[usize],
        rng: &mut BreedRng,
    ) -> (Vec<PatternNetwork>, Vec<Vec<usize>>) {
        let mutation = &self.config.mutation;
        let menu = &self.config.network.activations;

        let mut members = Vec::with_capacity(self.size());
        let mut parents = Vec::with_capacity(self.size());

        while members.len() < self.size() {
            let first = pool[rng.index(pool.len())];

            let (base, lineage) = if pool.len() > 1 && rng.chance(mutation.crossover_rate) {
                // Second parent distinct from the first
                let mut second = pool[rng.index(pool.len() - 1)];
                if second == first {
                    second = pool[pool.len() - 1];
                }
                let child = rng.crossover(&self.members[first], &self.members[second]);
                (child, vec![first, second])
            } else {
                (self.members[first].clone(), vec![first])
            };

            members.push(rng.mutate(&base, mutation, menu));
            parents.push(lineage);
        }

        (members, parents)
    }

    /// Colour grids for every member, evaluated in parallel, in cell order.
    pub fn render(&self, height: usize, width: usize) -> Result<Vec<ColourGrid>, PopulationError> {
        self.render_with(height, width, move |member| member.colour_batch(height, width))
    }

    /// Frame `t` of every member of an animated population.
    pub fn render_at(
        &self,
        height: usize,
        width: usize,
        t: usize,
    ) -> Result<Vec<ColourGrid>, PopulationError> {
        self.render_with(height, width, move |member| {
            member.colour_batch_at(height, width, t)
        })
    }

    fn render_with<F>(
        &self,
        height: usize,
        width: usize,
        draw: F,
    ) -> Result<Vec<ColourGrid>, PopulationError>
    where
        F: Fn(&PatternNetwork) -> Result<ColourGrid, NetworkError> + Send + Sync,
    {
        if !self.is_initialized() {
            return Err(PopulationError::Uninitialized);
        }

        let start = std::time::Instant::now();
        let grids = self
            .members
            .par_iter()
            .map(draw)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "Rendered {} canvases of {}x{} in {:.1?}",
            grids.len(),
            height,
            width,
            start.elapsed()
        );

        Ok(grids)
    }

    /// Mean pairwise parameter distance between members.
    pub fn diversity(&self) -> f32 {
        if self.members.len() < 2 {
            return 0.0;
        }

        let mut total_distance = 0.0f32;
        let mut count = 0;

        for i in 0..self.members.len() {
            for j in (i + 1)..self.members.len() {
                total_distance += self.members[i].parameter_distance(&self.members[j]);
                count += 1;
            }
        }

        total_distance / count as f32
    }
}
