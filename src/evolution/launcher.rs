use tracing::instrument;

use super::best::{BestSolution, SharedBest};
use super::options::EvolutionOptions;
use super::scheduler::GenerationScheduler;
use crate::{
    catalog::ItemCatalog, error::Result, population::Population, rng::RandomNumberGenerator,
};

/// Lifecycle of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionState {
    Running,
    /// The top 95% of the ranked population shares a single fitness value.
    Converged,
    /// The configured number of generations ran without convergence.
    Exhausted,
}

/// Summary of one generation. Generation `0` is the initial population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    /// Fitness at rank 0 of this generation.
    pub best_fitness: u64,
    /// Best-so-far fitness over the run up to and including this generation.
    pub best_so_far: u64,
    pub mean_fitness: f64,
    pub crossovers: usize,
    pub mutations: usize,
}

impl GenerationStats {
    fn new(
        generation: usize,
        population: &Population,
        best_so_far: u64,
        crossovers: usize,
        mutations: usize,
    ) -> Self {
        Self {
            generation,
            best_fitness: population.best().map(|b| b.fitness()).unwrap_or_default(),
            best_so_far,
            mean_fitness: population.mean_fitness(),
            crossovers,
            mutations,
        }
    }
}

/// Represents the outcome of a run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best individual seen at any point of the run.
    pub best: BestSolution,
    /// Terminal state, either `Converged` or `Exhausted`.
    pub state: EvolutionState,
    /// Number of evolved generations, not counting the initial population.
    pub generations: usize,
    pub history: Vec<GenerationStats>,
    /// Last generation, sorted by descending fitness.
    pub final_population: Population,
}

/// Drives a run over a fixed item catalog.
#[derive(Debug, Clone)]
pub struct EvolutionLauncher {
    catalog: ItemCatalog,
}

impl EvolutionLauncher {
    /// Creates a new `EvolutionLauncher` over the given catalog.
    pub fn new(catalog: ItemCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Runs the optimizer with a generator seeded from `options.get_seed()`, or
    /// from system entropy when no seed is set.
    pub fn evolve(&self, options: &EvolutionOptions) -> Result<EvolutionResult> {
        let mut rng = match options.get_seed() {
            Some(seed) => RandomNumberGenerator::from_seed(seed),
            None => RandomNumberGenerator::new(),
        };
        self.evolve_with_rng(options, &mut rng)
    }

    /// Evolves a population until it converges or runs out of generations.
    ///
    /// `rng` only seeds one generator per worker before the first phase; the
    /// workers never touch it.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The options do not validate against the catalog
    /// - The worker pool cannot be created
    /// - Any phase fails: a worker panics, a reassembled generation has the wrong
    ///   size, or evaluation rejects an individual
    ///
    /// A failed phase aborts the run; there is no partial result.
    #[instrument(
        level = "info",
        skip_all,
        fields(
            population = options.get_population_size(),
            workers = options.get_worker_count()
        )
    )]
    pub fn evolve_with_rng(
        &self,
        options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        options.validate(self.catalog.len())?;

        tracing::info!(
            items = options.get_num_items(),
            generations = options.get_num_generations(),
            elitism = options.get_elitism_fraction(),
            crossover_probability = options.get_crossover_probability(),
            strategy = %options.get_crossover_strategy(),
            capacity = options.get_capacity(),
            "Starting evolution"
        );

        let scheduler = GenerationScheduler::new(options, &self.catalog)?;
        let mut worker_rngs = rng.spawn_workers(options.get_worker_count());
        let best = SharedBest::new(options.get_num_items());

        let mut population = scheduler.initial_population(&mut worker_rngs, &best)?;
        population.sort();

        let mut history = Vec::with_capacity(options.get_num_generations() + 1);
        history.push(GenerationStats::new(
            0,
            &population,
            best.snapshot()?.fitness,
            0,
            0,
        ));

        let mut state = EvolutionState::Running;
        let mut generation = 0;
        while state == EvolutionState::Running {
            if generation == options.get_num_generations() {
                state = EvolutionState::Exhausted;
                break;
            }
            generation += 1;

            let offspring = scheduler.next_generation(&population, &mut worker_rngs, &best)?;
            population = offspring.population;
            population.sort();

            let stats = GenerationStats::new(
                generation,
                &population,
                best.snapshot()?.fitness,
                offspring.crossovers,
                offspring.mutations,
            );
            tracing::debug!(
                generation,
                best = stats.best_fitness,
                best_so_far = stats.best_so_far,
                mean = stats.mean_fitness,
                crossovers = stats.crossovers,
                mutations = stats.mutations,
                "Generation complete"
            );
            history.push(stats);

            if population.has_converged() {
                state = EvolutionState::Converged;
            }
        }

        let best = best.into_inner()?;
        tracing::info!(
            state = ?state,
            generations = generation,
            fitness = best.fitness,
            "Evolution finished"
        );

        Ok(EvolutionResult {
            best,
            state,
            generations: generation,
            history,
            final_population: population,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneticError;
    use crate::strategy::CrossoverStrategy;

    fn launcher() -> EvolutionLauncher {
        let values = [60, 100, 120, 30, 70, 90, 20, 50];
        let weights = [10, 20, 30, 5, 15, 25, 5, 10];
        EvolutionLauncher::new(ItemCatalog::from_values_and_weights(&values, &weights).unwrap())
    }

    fn options() -> EvolutionOptions {
        EvolutionOptions::builder()
            .num_items(8)
            .population_size(24)
            .num_generations(30)
            .elitism_fraction(0.1)
            .crossover_probability(0.7)
            .crossover_strategy(CrossoverStrategy::TwoPoint)
            .capacity(50)
            .worker_count(3)
            .seed(2024)
            .build()
    }

    #[test]
    fn test_invalid_options_abort_before_running() {
        let options = EvolutionOptions::builder()
            .num_items(8)
            .population_size(0)
            .capacity(50)
            .build();

        let result = launcher().evolve(&options);
        match result {
            Err(GeneticError::Configuration(msg)) => {
                assert!(msg.contains("Population size cannot be zero"))
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_generations_is_exhausted_immediately() {
        let options = EvolutionOptions::builder()
            .num_items(8)
            .population_size(24)
            .num_generations(0)
            .capacity(50)
            .worker_count(3)
            .seed(5)
            .build();

        let result = launcher().evolve(&options).unwrap();
        assert_eq!(result.state, EvolutionState::Exhausted);
        assert_eq!(result.generations, 0);
        assert_eq!(result.history.len(), 1);
        assert_eq!(
            result.best.fitness,
            result.final_population.best().unwrap().fitness()
        );
    }

    #[test]
    fn test_history_tracks_every_generation() {
        let result = launcher().evolve(&options()).unwrap();

        assert_eq!(result.history.len(), result.generations + 1);
        for (idx, stats) in result.history.iter().enumerate() {
            assert_eq!(stats.generation, idx);
            assert!(stats.best_so_far >= stats.best_fitness);
            if idx > 0 {
                // round(0.1 * 24) = 2 elites, the other 22 are bred
                assert_eq!(stats.crossovers + stats.mutations, 22);
            }
        }
        assert!(result
            .history
            .windows(2)
            .all(|pair| pair[0].best_so_far <= pair[1].best_so_far));
    }

    #[test]
    fn test_best_never_worse_than_final_leader() {
        let launcher = launcher();
        let result = launcher.evolve(&options()).unwrap();

        let leader = result.final_population.best().unwrap().fitness();
        assert!(result.best.fitness >= leader);
        assert!(result.best.total_weight(launcher.catalog()).unwrap() <= 50);
        assert_eq!(result.best.genes.len(), 8);
    }

    #[test]
    fn test_seeded_runs_agree_on_best_fitness() {
        let launcher = launcher();
        let first = launcher.evolve(&options()).unwrap();
        let second = launcher.evolve(&options()).unwrap();

        assert_eq!(first.best.fitness, second.best.fitness);
        assert_eq!(first.generations, second.generations);
        assert_eq!(first.final_population, second.final_population);
    }
}
