pub mod best;
pub mod launcher;
pub mod options;
pub mod scheduler;

pub use best::{BestSolution, SharedBest};
pub use launcher::{EvolutionLauncher, EvolutionResult, EvolutionState, GenerationStats};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder};
pub use scheduler::{GenerationScheduler, Offspring};
