//! # CrossoverStrategy
//!
//! The `CrossoverStrategy` enum selects which crossover operator the evolution
//! loop applies when a child is bred from two parents. Strategies are chosen
//! once per run, either directly or from the numeric codes `1`, `2` and `3`.
//!
//! ## Example
//!
//! ```rust
//! use knapsack_ga::strategy::CrossoverStrategy;
//!
//! let strategy = CrossoverStrategy::from_code(2).unwrap();
//! assert_eq!(strategy, CrossoverStrategy::TwoPoint);
//!
//! let strategy: CrossoverStrategy = "uniform".parse().unwrap();
//! assert_eq!(strategy, CrossoverStrategy::Uniform);
//!
//! assert!(CrossoverStrategy::from_code(4).is_err());
//! ```
pub mod crossover;
pub mod mutation;

use std::fmt;
use std::str::FromStr;

use crate::{
    error::{GeneticError, Result},
    individual::Individual,
    rng::RandomNumberGenerator,
};

pub use crossover::{one_point_crossover, two_point_crossover, uniform_crossover};
pub use mutation::mutate;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrossoverStrategy {
    /// Genes before a single cut come from the second parent.
    #[default]
    OnePoint,
    /// Genes strictly between two cuts come from the second parent.
    TwoPoint,
    /// Every gene comes from either parent on a fair coin flip.
    Uniform,
}

impl CrossoverStrategy {
    /// Maps the numeric strategy codes `1`, `2` and `3`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidCrossoverStrategy` for any other code.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Self::OnePoint),
            2 => Ok(Self::TwoPoint),
            3 => Ok(Self::Uniform),
            other => Err(GeneticError::InvalidCrossoverStrategy(other.to_string())),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::OnePoint => 1,
            Self::TwoPoint => 2,
            Self::Uniform => 3,
        }
    }

    /// Overwrites every gene of `child` from `first` or `second`.
    ///
    /// Cut points are drawn uniformly from `[0, child.len())`. The child keeps its
    /// previous fitness until it is evaluated again.
    pub fn apply(
        &self,
        child: &mut Individual,
        first: &Individual,
        second: &Individual,
        rng: &mut RandomNumberGenerator,
    ) {
        let len = child.len();
        if len == 0 {
            return;
        }
        match self {
            Self::OnePoint => {
                let cut = rng.index_below(len);
                one_point_crossover(child, cut, first, second);
            }
            Self::TwoPoint => {
                let cut_a = rng.index_below(len);
                let cut_b = rng.index_below(len);
                two_point_crossover(child, cut_a, cut_b, first, second);
            }
            Self::Uniform => uniform_crossover(child, rng, first, second),
        }
    }
}

impl TryFrom<u8> for CrossoverStrategy {
    type Error = GeneticError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(i64::from(code))
    }
}

impl FromStr for CrossoverStrategy {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "one-point" | "onepoint" | "one_point" => Ok(Self::OnePoint),
            "2" | "two-point" | "twopoint" | "two_point" => Ok(Self::TwoPoint),
            "3" | "uniform" => Ok(Self::Uniform),
            _ => Err(GeneticError::InvalidCrossoverStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for CrossoverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OnePoint => "one-point",
            Self::TwoPoint => "two-point",
            Self::Uniform => "uniform",
        };
        f.write_str(name)
    }
}
