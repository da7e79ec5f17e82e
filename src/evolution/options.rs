//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the run configuration of the optimizer. It
//! is set once before a run starts and only read afterwards.
//!
//! ## Example
//!
//! ```rust
//! use knapsack_ga::evolution::options::EvolutionOptions;
//! use knapsack_ga::strategy::CrossoverStrategy;
//!
//! let options = EvolutionOptions::builder()
//!     .num_items(50)
//!     .population_size(200)
//!     .num_generations(100)
//!     .elitism_fraction(0.1)
//!     .crossover_probability(0.8)
//!     .crossover_strategy(CrossoverStrategy::TwoPoint)
//!     .capacity(500)
//!     .worker_count(4)
//!     .build();
//!
//! assert_eq!(options.get_mutation_steps(), 50);
//! assert_eq!(options.elite_count(), 20);
//! assert!(options.validate(50).is_ok());
//! ```
//!
//! ## Fields
//!
//! - `num_items`: Number of genes per individual; the first `num_items` catalog items take part.
//! - `population_size`: Number of individuals in every generation.
//! - `num_generations`: Upper bound on evolved generations.
//! - `elitism_fraction`: Share of the ranked population copied through unchanged.
//! - `crossover_probability`: Chance that a non-elite child is bred by crossover instead of mutation.
//! - `crossover_strategy`: Crossover operator used for bred children.
//! - `mutation_steps`: Random flips per mutation, `num_items` unless set.
//! - `capacity`: Knapsack weight limit.
//! - `worker_count`: Number of parallel workers per phase.
//! - `seed`: Optional seed making a run reproducible.

use crate::error::{GeneticError, Result};
use crate::strategy::CrossoverStrategy;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    num_items: usize,
    population_size: usize,
    num_generations: usize,
    elitism_fraction: f64,
    crossover_probability: f64,
    crossover_strategy: CrossoverStrategy,
    /// Falls back to `num_items` when `None`.
    mutation_steps: Option<usize>,
    capacity: u64,
    worker_count: usize,
    seed: Option<u64>,
}

impl EvolutionOptions {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num_items: usize,
        population_size: usize,
        num_generations: usize,
        elitism_fraction: f64,
        crossover_probability: f64,
        crossover_strategy: CrossoverStrategy,
        capacity: u64,
        worker_count: usize,
    ) -> Self {
        Self {
            num_items,
            population_size,
            num_generations,
            elitism_fraction,
            crossover_probability,
            crossover_strategy,
            mutation_steps: None,
            capacity,
            worker_count,
            seed: None,
        }
    }

    pub fn get_num_items(&self) -> usize {
        self.num_items
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_elitism_fraction(&self) -> f64 {
        self.elitism_fraction
    }

    pub fn get_crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn get_crossover_strategy(&self) -> CrossoverStrategy {
        self.crossover_strategy
    }

    /// Returns the number of random flips per mutation.
    pub fn get_mutation_steps(&self) -> usize {
        self.mutation_steps.unwrap_or(self.num_items)
    }

    pub fn get_capacity(&self) -> u64 {
        self.capacity
    }

    pub fn get_worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of top ranks copied into the next generation unchanged.
    pub fn elite_count(&self) -> usize {
        ((self.elitism_fraction * self.population_size as f64).round() as usize)
            .min(self.population_size)
    }

    /// Size of the top slice that crossover parents are drawn from.
    pub fn parent_pool_size(&self) -> usize {
        (self.population_size / 2).max(1)
    }

    /// Sets the number of random flips per mutation.
    pub fn set_mutation_steps(&mut self, steps: usize) {
        self.mutation_steps = Some(steps);
    }

    /// Sets the seed used to derive worker generators.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Checks the configuration against a catalog of `catalog_len` items.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` describing the first problem found.
    pub fn validate(&self, catalog_len: usize) -> Result<()> {
        if self.population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        if self.worker_count == 0 {
            return Err(GeneticError::Configuration(
                "Worker count cannot be zero".to_string(),
            ));
        }

        if self.worker_count > self.population_size {
            return Err(GeneticError::Configuration(format!(
                "Worker count ({}) cannot exceed population size ({})",
                self.worker_count, self.population_size
            )));
        }

        if self.num_items == 0 {
            return Err(GeneticError::Configuration(
                "Number of items cannot be zero".to_string(),
            ));
        }

        if self.num_items > catalog_len {
            return Err(GeneticError::Configuration(format!(
                "Number of items ({}) exceeds catalog size ({})",
                self.num_items, catalog_len
            )));
        }

        if !(0.0..=1.0).contains(&self.elitism_fraction) {
            return Err(GeneticError::Configuration(format!(
                "Elitism fraction must be within [0, 1], got {}",
                self.elitism_fraction
            )));
        }

        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(GeneticError::Configuration(format!(
                "Crossover probability must be within [0, 1], got {}",
                self.crossover_probability
            )));
        }

        if self.capacity == 0 {
            return Err(GeneticError::Configuration(
                "Capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            num_items: 0,
            population_size: 100,
            num_generations: 100,
            elitism_fraction: 0.1,
            crossover_probability: 0.8,
            crossover_strategy: CrossoverStrategy::OnePoint,
            mutation_steps: None,
            capacity: 0,
            worker_count: 1,
            seed: None,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Unset values fall back to `EvolutionOptions::default()`.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    num_items: Option<usize>,
    population_size: Option<usize>,
    num_generations: Option<usize>,
    elitism_fraction: Option<f64>,
    crossover_probability: Option<f64>,
    crossover_strategy: Option<CrossoverStrategy>,
    mutation_steps: Option<usize>,
    capacity: Option<u64>,
    worker_count: Option<usize>,
    seed: Option<u64>,
}

impl EvolutionOptionsBuilder {
    pub fn num_items(mut self, value: usize) -> Self {
        self.num_items = Some(value);
        self
    }

    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    pub fn elitism_fraction(mut self, value: f64) -> Self {
        self.elitism_fraction = Some(value);
        self
    }

    pub fn crossover_probability(mut self, value: f64) -> Self {
        self.crossover_probability = Some(value);
        self
    }

    pub fn crossover_strategy(mut self, value: CrossoverStrategy) -> Self {
        self.crossover_strategy = Some(value);
        self
    }

    pub fn mutation_steps(mut self, value: usize) -> Self {
        self.mutation_steps = Some(value);
        self
    }

    pub fn capacity(mut self, value: u64) -> Self {
        self.capacity = Some(value);
        self
    }

    pub fn worker_count(mut self, value: usize) -> Self {
        self.worker_count = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance. Validation happens when a run starts.
    pub fn build(self) -> EvolutionOptions {
        let default = EvolutionOptions::default();
        EvolutionOptions {
            num_items: self.num_items.unwrap_or(default.num_items),
            population_size: self.population_size.unwrap_or(default.population_size),
            num_generations: self.num_generations.unwrap_or(default.num_generations),
            elitism_fraction: self.elitism_fraction.unwrap_or(default.elitism_fraction),
            crossover_probability: self
                .crossover_probability
                .unwrap_or(default.crossover_probability),
            crossover_strategy: self
                .crossover_strategy
                .unwrap_or(default.crossover_strategy),
            mutation_steps: self.mutation_steps,
            capacity: self.capacity.unwrap_or(default.capacity),
            worker_count: self.worker_count.unwrap_or(default.worker_count),
            seed: self.seed,
        }
    }
}
