//! Best-so-far record shared by the workers of one run.

use std::fmt;
use std::sync::Mutex;

use crate::catalog::ItemCatalog;
use crate::error::{GeneticError, Result};
use crate::individual::Individual;

/// Fitness and gene snapshot of the best individual seen during a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestSolution {
    pub fitness: u64,
    pub genes: Vec<bool>,
}

impl BestSolution {
    /// Ids of the included items.
    pub fn selected_items(&self) -> Vec<usize> {
        self.genes
            .iter()
            .enumerate()
            .filter_map(|(idx, &included)| included.then_some(idx))
            .collect()
    }

    /// Total weight of the included items.
    pub fn total_weight(&self, catalog: &ItemCatalog) -> Result<u64> {
        self.selected_items()
            .into_iter()
            .map(|id| catalog.get(id).map(|item| item.weight))
            .sum()
    }
}

impl fmt::Display for BestSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .selected_items()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "fitness {} with items [{}]", self.fitness, items)
    }
}

/// Lock-guarded best-so-far cell. Lives exactly as long as one run.
#[derive(Debug)]
pub struct SharedBest {
    inner: Mutex<BestSolution>,
}

impl SharedBest {
    /// Starts from the empty knapsack over `num_items` items, with fitness `0`.
    pub fn new(num_items: usize) -> Self {
        Self {
            inner: Mutex::new(BestSolution {
                fitness: 0,
                genes: vec![false; num_items],
            }),
        }
    }

    /// Records `candidate` if its fitness strictly beats the current best.
    ///
    /// The comparison and the write happen under one lock acquisition. Returns
    /// whether the record changed.
    pub fn offer(&self, candidate: &Individual) -> Result<bool> {
        let mut best = self
            .inner
            .lock()
            .map_err(|e| GeneticError::LockPoisoned(format!("best-so-far record: {}", e)))?;

        if candidate.fitness() > best.fitness {
            best.fitness = candidate.fitness();
            best.genes = candidate.genes().to_vec();
            tracing::debug!(fitness = best.fitness, "New best-so-far");
            return Ok(true);
        }
        Ok(false)
    }

    /// Copies the current record.
    pub fn snapshot(&self) -> Result<BestSolution> {
        self.inner
            .lock()
            .map(|best| best.clone())
            .map_err(|e| GeneticError::LockPoisoned(format!("best-so-far record: {}", e)))
    }

    pub fn into_inner(self) -> Result<BestSolution> {
        self.inner
            .into_inner()
            .map_err(|e| GeneticError::LockPoisoned(format!("best-so-far record: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomNumberGenerator;
    use std::sync::Arc;
    use std::thread;

    fn individual_with_fitness(value: u64) -> Individual {
        let catalog = ItemCatalog::from_values_and_weights(&[value], &[1]).unwrap();
        let mut individual = Individual::new(vec![true]);
        individual
            .evaluate(&mut RandomNumberGenerator::from_seed(0), &catalog, 1)
            .unwrap();
        individual
    }

    #[test]
    fn test_offer_requires_strict_improvement() {
        let best = SharedBest::new(1);
        assert!(best.offer(&individual_with_fitness(5)).unwrap());
        assert!(!best.offer(&individual_with_fitness(5)).unwrap());
        assert!(!best.offer(&individual_with_fitness(3)).unwrap());
        assert!(best.offer(&individual_with_fitness(8)).unwrap());
        assert_eq!(best.snapshot().unwrap().fitness, 8);
    }

    #[test]
    fn test_zero_fitness_keeps_empty_knapsack_of_full_length() {
        let best = SharedBest::new(3);
        let mut empty = Individual::new(vec![false; 3]);
        let catalog = ItemCatalog::from_values_and_weights(&[1, 1, 1], &[1, 1, 1]).unwrap();
        empty
            .evaluate(&mut RandomNumberGenerator::from_seed(0), &catalog, 3)
            .unwrap();
        assert!(!best.offer(&empty).unwrap());
        let record = best.snapshot().unwrap();
        assert_eq!(record.fitness, 0);
        assert_eq!(record.genes, vec![false; 3]);
        assert_eq!(record.to_string(), "fitness 0 with items []");
    }

    #[test]
    fn test_concurrent_offers_keep_maximum() {
        let best = Arc::new(SharedBest::new(1));
        let handles: Vec<_> = (1..=8u64)
            .map(|worker| {
                let best = Arc::clone(&best);
                thread::spawn(move || {
                    for step in 0..50u64 {
                        let fitness = worker * 100 + step;
                        best.offer(&individual_with_fitness(fitness)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let record = Arc::try_unwrap(best).unwrap().into_inner().unwrap();
        assert_eq!(record.fitness, 849);
        assert_eq!(record.genes, vec![true]);
    }

    #[test]
    fn test_total_weight_and_display() {
        let catalog = ItemCatalog::from_values_and_weights(&[10, 20, 30], &[5, 10, 15]).unwrap();
        let solution = BestSolution {
            fitness: 40,
            genes: vec![true, false, true],
        };
        assert_eq!(solution.selected_items(), vec![0, 2]);
        assert_eq!(solution.total_weight(&catalog).unwrap(), 20);
        assert_eq!(solution.to_string(), "fitness 40 with items [0, 2]");
    }
}
