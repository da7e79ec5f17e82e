//! # Population
//!
//! An ordered collection of individuals. A population is rebuilt from scheduler
//! output every generation and then sorted by descending fitness, so rank `0` is
//! always the fittest individual of the generation.

use crate::individual::Individual;

/// Share of the ranked population that has to agree on one fitness value for the
/// run to count as converged.
pub const CONVERGENCE_SHARE: f64 = 0.95;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Sorts by descending fitness. Equal fitness keeps the previous relative order.
    pub fn sort(&mut self) {
        self.individuals.sort_by(|a, b| b.fitness().cmp(&a.fitness()));
    }

    /// Whether the top `round(0.95 * len)` ranks all share the fitness of rank `0`.
    ///
    /// Expects a sorted population. An empty population never converges.
    pub fn has_converged(&self) -> bool {
        let Some(leader) = self.individuals.first() else {
            return false;
        };
        let ranks = ((CONVERGENCE_SHARE * self.len() as f64).round() as usize).min(self.len());
        self.individuals[..ranks]
            .iter()
            .all(|individual| individual.fitness() == leader.fitness())
    }

    /// Sum of all fitness values, saturating at `u64::MAX`.
    pub fn total_fitness(&self) -> u64 {
        self.individuals
            .iter()
            .fold(0u64, |total, individual| total.saturating_add(individual.fitness()))
    }

    pub fn mean_fitness(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        let total: f64 = self.individuals.iter().map(|i| i.fitness() as f64).sum();
        total / self.len() as f64
    }
}
