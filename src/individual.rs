//! # Individual
//!
//! An `Individual` is one candidate solution: a fixed-length vector of genes where
//! gene `i` says whether item `i` goes into the knapsack, plus the cached fitness
//! of that vector.
//!
//! The fitness is only meaningful after [`Individual::evaluate`] has run since the
//! genes were last changed. Evaluation also repairs overweight candidates by
//! dropping randomly chosen items until the capacity holds, so every evaluated
//! individual is feasible.
//!
//! ## Example
//!
//! ```rust
//! use knapsack_ga::catalog::ItemCatalog;
//! use knapsack_ga::individual::Individual;
//! use knapsack_ga::rng::RandomNumberGenerator;
//!
//! let catalog = ItemCatalog::from_values_and_weights(&[10, 20, 30], &[5, 10, 15]).unwrap();
//! let mut rng = RandomNumberGenerator::from_seed(1);
//!
//! let mut individual = Individual::new(vec![true, true, true]);
//! individual.evaluate(&mut rng, &catalog, 15).unwrap();
//!
//! let (weight, value) = individual.totals(&catalog).unwrap();
//! assert!(weight <= 15);
//! assert_eq!(individual.fitness(), value);
//! ```

use crate::catalog::ItemCatalog;
use crate::error::{GeneticError, OptionExt, Result};
use crate::rng::RandomNumberGenerator;

/// A candidate solution with its cached fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Individual {
    genes: Vec<bool>,
    fitness: u64,
}

impl Individual {
    /// Wraps a gene vector. The fitness starts at zero.
    pub fn new(genes: Vec<bool>) -> Self {
        Self { genes, fitness: 0 }
    }

    /// Builds an individual of `num_items` genes, each an independent fair bit.
    pub fn random(num_items: usize, rng: &mut RandomNumberGenerator) -> Self {
        Self::new((0..num_items).map(|_| rng.next_bit()).collect())
    }

    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    pub(crate) fn genes_mut(&mut self) -> &mut [bool] {
        &mut self.genes
    }

    pub fn fitness(&self) -> u64 {
        self.fitness
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Ids of the items whose gene is set.
    pub fn selected_items(&self) -> Vec<usize> {
        self.genes
            .iter()
            .enumerate()
            .filter_map(|(idx, &included)| included.then_some(idx))
            .collect()
    }

    /// Sums `(weight, value)` over every included item.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::RepresentationMismatch` if there are more genes than
    /// catalog items, and `GeneticError::InvalidInput` if a total overflows.
    pub fn totals(&self, catalog: &ItemCatalog) -> Result<(u64, u64)> {
        if self.genes.len() > catalog.len() {
            return Err(GeneticError::RepresentationMismatch {
                genes: self.genes.len(),
                items: catalog.len(),
            });
        }

        let mut total_weight = 0u64;
        let mut total_value = 0u64;
        for (id, &included) in self.genes.iter().enumerate() {
            if !included {
                continue;
            }
            let item = catalog.get(id)?;
            total_weight = total_weight
                .checked_add(item.weight)
                .ok_or_else_genetic(|| overflow("weight"))?;
            total_value = total_value
                .checked_add(item.value)
                .ok_or_else_genetic(|| overflow("value"))?;
        }
        Ok((total_weight, total_value))
    }

    /// Recomputes the fitness, repairing the genes first if they exceed `capacity`.
    ///
    /// Repair draws uniformly random gene positions until it hits an included item,
    /// drops it, and recomputes the totals, repeating while the knapsack is still
    /// overweight. Removal only ever turns genes off, so the loop ends at the latest
    /// when every gene is off.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::RepresentationMismatch` if there are more genes than
    /// catalog items. The genes are left untouched in that case.
    pub fn evaluate(
        &mut self,
        rng: &mut RandomNumberGenerator,
        catalog: &ItemCatalog,
        capacity: u64,
    ) -> Result<()> {
        let (mut total_weight, mut total_value) = self.totals(catalog)?;

        while total_weight > capacity {
            loop {
                let index = rng.index_below(self.genes.len());
                if self.genes[index] {
                    self.genes[index] = false;
                    break;
                }
            }
            (total_weight, total_value) = self.totals(catalog)?;
        }

        self.fitness = total_value;
        Ok(())
    }
}

fn overflow(total: &str) -> GeneticError {
    GeneticError::InvalidInput(format!("Total {} overflows u64", total))
}
