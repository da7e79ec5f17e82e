//! # Item Catalog
//!
//! The `ItemCatalog` is the immutable lookup of items a knapsack can hold. Item
//! `i` always has id `i`, its position in the catalog. The catalog is built once
//! before evolution starts and only read afterwards, so it can be shared by
//! reference across every worker without synchronization.
//!
//! ## Example
//!
//! ```rust
//! use knapsack_ga::catalog::ItemCatalog;
//!
//! let catalog = ItemCatalog::from_values_and_weights(&[10, 20, 30], &[5, 10, 15]).unwrap();
//! assert_eq!(catalog.len(), 3);
//! assert_eq!(catalog.get(2).unwrap().value, 30);
//! assert!(catalog.get(3).is_err());
//! ```

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{GeneticError, OptionExt, Result};

/// A single item with a value and a weight.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item {
    pub id: usize,
    pub value: u64,
    pub weight: u64,
}

impl Item {
    pub fn new(id: usize, value: u64, weight: u64) -> Self {
        Self { id, value, weight }
    }

    /// Value-to-weight ratio. Weightless items are infinitely dense.
    pub fn value_density(&self) -> f64 {
        if self.weight == 0 {
            f64::INFINITY
        } else {
            self.value as f64 / self.weight as f64
        }
    }
}

/// Immutable, index-addressed collection of items.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCatalog {
    items: Vec<Item>,
}

impl ItemCatalog {
    /// Builds a catalog from two equal-length sequences; item `i` gets id `i`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidInput` if the sequences differ in length, or
    /// if the summed values or summed weights do not fit in a `u64`.
    pub fn from_values_and_weights(values: &[u64], weights: &[u64]) -> Result<Self> {
        if values.len() != weights.len() {
            return Err(GeneticError::InvalidInput(format!(
                "Got {} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        checked_total(values, "values")?;
        checked_total(weights, "weights")?;

        let items = values
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(id, (&value, &weight))| Item::new(id, value, weight))
            .collect();

        Ok(Self { items })
    }

    /// Reads whitespace-separated integers from two sources and pairs them up.
    ///
    /// Pairing stops as soon as either source runs out, so the catalog has the
    /// length of the shorter input.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidInput` for a token that is not a
    /// non-negative integer and `GeneticError::Io` if reading fails.
    pub fn from_readers<V, W>(values: V, weights: W) -> Result<Self>
    where
        V: BufRead,
        W: BufRead,
    {
        let values = read_integers(values, "values")?;
        let weights = read_integers(weights, "weights")?;
        let len = values.len().min(weights.len());
        if values.len() != weights.len() {
            tracing::warn!(
                values = values.len(),
                weights = weights.len(),
                "Item inputs differ in length, keeping the first {} pairs",
                len
            );
        }
        Self::from_values_and_weights(&values[..len], &weights[..len])
    }

    /// Opens two files and delegates to [`ItemCatalog::from_readers`].
    pub fn from_files<P, Q>(values_path: P, weights_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let values = BufReader::new(File::open(values_path)?);
        let weights = BufReader::new(File::open(weights_path)?);
        Self::from_readers(values, weights)
    }

    /// Looks up an item by id.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::NotFound` if `id` is outside the catalog.
    pub fn get(&self, id: usize) -> Result<&Item> {
        self.items
            .get(id)
            .ok_or_else_genetic(|| GeneticError::NotFound(id))
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items sorted by descending value density; ties keep catalog order.
    pub fn by_density(&self) -> Vec<&Item> {
        let mut sorted: Vec<&Item> = self.items.iter().collect();
        sorted.sort_by(|a, b| {
            b.value_density()
                .partial_cmp(&a.value_density())
                .unwrap_or(Ordering::Equal)
        });
        sorted
    }
}

/// Every subset total of the catalog is bounded by this sum.
fn checked_total(numbers: &[u64], label: &str) -> Result<u64> {
    numbers
        .iter()
        .try_fold(0u64, |total, &n| total.checked_add(n))
        .ok_or_else_genetic(|| {
            GeneticError::InvalidInput(format!("Sum of item {} overflows u64", label))
        })
}

fn read_integers<R: BufRead>(reader: R, label: &str) -> Result<Vec<u64>> {
    let mut numbers = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        for token in line.split_whitespace() {
            let number = token.parse::<u64>().map_err(|e| {
                GeneticError::InvalidInput(format!(
                    "Bad token `{}` in {} at line {}: {}",
                    token,
                    label,
                    line_no + 1,
                    e
                ))
            })?;
            numbers.push(number);
        }
    }
    Ok(numbers)
}
