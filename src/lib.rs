pub mod catalog;
pub mod error;
pub mod evolution;
pub mod individual;
pub mod population;
pub mod rng;
pub mod strategy;

// Re-export commonly used types for convenience
pub use catalog::{Item, ItemCatalog};
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{EvolutionLauncher, EvolutionOptions, EvolutionResult, EvolutionState};
pub use individual::Individual;
pub use population::Population;
pub use strategy::CrossoverStrategy;
