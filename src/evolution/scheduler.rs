//! # GenerationScheduler
//!
//! Splits the work of one phase across a fixed number of workers and stitches the
//! results back together. Both phases follow the same fork-join pattern:
//!
//! 1. `[0, population_size)` is cut into `worker_count` contiguous shares; every
//!    share has `population_size / worker_count` slots and the last one also takes
//!    the remainder.
//! 2. Each share runs on its own worker with a generator that worker owns
//!    exclusively.
//! 3. Every worker returns one sub-list. Sub-lists are concatenated in worker
//!    order, never in completion order, so rank `i` of the result always comes
//!    from the share that covers `i`.
//! 4. The concatenation must have exactly `population_size` individuals.
//!
//! The initial phase fills every slot with a fresh random individual. The
//! evolution phase copies elites through verbatim and breeds every other slot by
//! crossover or mutation.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::instrument;

use super::best::SharedBest;
use super::options::EvolutionOptions;
use crate::catalog::ItemCatalog;
use crate::error::{GeneticError, Result};
use crate::individual::Individual;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::strategy::mutate;

/// Cuts `[0, total)` into `workers` contiguous ranges in worker order.
///
/// Every range has `total / workers` elements except the last, which runs to
/// `total`. Returns no ranges when `workers` is zero.
pub fn partition(total: usize, workers: usize) -> Vec<Range<usize>> {
    if workers == 0 {
        return Vec::new();
    }
    let share = total / workers;
    (0..workers)
        .map(|worker| {
            let start = worker * share;
            let end = if worker == workers - 1 {
                total
            } else {
                start + share
            };
            start..end
        })
        .collect()
}

/// Concatenates worker sub-lists in the order given and checks the total size.
///
/// # Errors
///
/// Returns `GeneticError::PopulationSizeMismatch` if the concatenation does not
/// hold exactly `expected` individuals.
pub fn reassemble(parts: Vec<Vec<Individual>>, expected: usize) -> Result<Vec<Individual>> {
    let individuals: Vec<Individual> = parts.into_iter().flatten().collect();
    if individuals.len() != expected {
        return Err(GeneticError::PopulationSizeMismatch {
            expected,
            actual: individuals.len(),
        });
    }
    Ok(individuals)
}

/// What one worker hands back at the join.
#[derive(Debug, Default)]
struct WorkerOutput {
    individuals: Vec<Individual>,
    crossovers: usize,
    mutations: usize,
}

/// A freshly evolved, still unsorted generation plus how it was bred.
#[derive(Debug, Clone)]
pub struct Offspring {
    pub population: Population,
    /// Children bred by crossover.
    pub crossovers: usize,
    /// Children bred by mutation.
    pub mutations: usize,
}

/// Runs the parallel phases of one run.
pub struct GenerationScheduler<'a> {
    options: &'a EvolutionOptions,
    catalog: &'a ItemCatalog,
    pool: ThreadPool,
}

impl<'a> GenerationScheduler<'a> {
    /// Creates a scheduler with a pool of `options.get_worker_count()` threads.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::ThreadPool` if the pool cannot be built.
    pub fn new(options: &'a EvolutionOptions, catalog: &'a ItemCatalog) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.get_worker_count())
            .thread_name(|index| format!("ga-worker-{}", index))
            .build()?;

        Ok(Self {
            options,
            catalog,
            pool,
        })
    }

    /// Builds and evaluates the first generation.
    ///
    /// Every individual is offered to `best`. `rngs` must hold one generator per
    /// worker.
    #[instrument(level = "debug", skip_all)]
    pub fn initial_population(
        &self,
        rngs: &mut [RandomNumberGenerator],
        best: &SharedBest,
    ) -> Result<Population> {
        let num_items = self.options.get_num_items();
        let capacity = self.options.get_capacity();

        let outputs = self.fork_join(rngs, |_, share, rng| {
            let mut output = WorkerOutput::default();
            output.individuals.reserve(share.len());
            for _ in share {
                let mut individual = Individual::random(num_items, rng);
                individual.evaluate(rng, self.catalog, capacity)?;
                best.offer(&individual)?;
                output.individuals.push(individual);
            }
            Ok(output)
        })?;

        let parts = outputs.into_iter().map(|o| o.individuals).collect();
        let individuals = reassemble(parts, self.options.get_population_size())?;
        Ok(Population::new(individuals))
    }

    /// Breeds the generation that follows the sorted `current` population.
    ///
    /// Ranks below the elite count are copied unchanged. Every other rank draws a
    /// unit float: below the crossover probability the child is bred from two
    /// parents drawn with replacement from the top half of `current`, otherwise
    /// the individual at that rank is mutated. Bred children are evaluated and
    /// offered to `best`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::PopulationSizeMismatch` if `current` or the result
    /// does not have the configured size, and propagates evaluation, lock and
    /// worker failures.
    #[instrument(level = "debug", skip_all)]
    pub fn next_generation(
        &self,
        current: &Population,
        rngs: &mut [RandomNumberGenerator],
        best: &SharedBest,
    ) -> Result<Offspring> {
        let population_size = self.options.get_population_size();
        if current.len() != population_size {
            return Err(GeneticError::PopulationSizeMismatch {
                expected: population_size,
                actual: current.len(),
            });
        }

        let elite_count = self.options.elite_count();
        let parent_pool = self.options.parent_pool_size();
        let crossover_probability = self.options.get_crossover_probability();
        let strategy = self.options.get_crossover_strategy();
        let mutation_steps = self.options.get_mutation_steps();
        let capacity = self.options.get_capacity();
        let ranked = current.individuals();

        let outputs = self.fork_join(rngs, |_, share, rng| {
            let mut output = WorkerOutput::default();
            output.individuals.reserve(share.len());
            for rank in share {
                if rank < elite_count {
                    output.individuals.push(ranked[rank].clone());
                    continue;
                }

                let mut child = ranked[rank].clone();
                if rng.next_unit() < crossover_probability {
                    let first = &ranked[rng.index_below(parent_pool)];
                    let second = &ranked[rng.index_below(parent_pool)];
                    strategy.apply(&mut child, first, second, rng);
                    output.crossovers += 1;
                } else {
                    mutate(&mut child, mutation_steps, rng);
                    output.mutations += 1;
                }

                child.evaluate(rng, self.catalog, capacity)?;
                best.offer(&child)?;
                output.individuals.push(child);
            }
            Ok(output)
        })?;

        let crossovers = outputs.iter().map(|o| o.crossovers).sum();
        let mutations = outputs.iter().map(|o| o.mutations).sum();
        let parts = outputs.into_iter().map(|o| o.individuals).collect();
        let individuals = reassemble(parts, population_size)?;

        Ok(Offspring {
            population: Population::new(individuals),
            crossovers,
            mutations,
        })
    }

    /// Runs `task` once per share on the pool and returns the outputs in worker order.
    ///
    /// A failing or panicking worker fails the whole phase; nothing is retried.
    fn fork_join<F>(&self, rngs: &mut [RandomNumberGenerator], task: F) -> Result<Vec<WorkerOutput>>
    where
        F: Fn(usize, Range<usize>, &mut RandomNumberGenerator) -> Result<WorkerOutput> + Sync,
    {
        let shares = partition(
            self.options.get_population_size(),
            self.options.get_worker_count(),
        );
        if rngs.len() != shares.len() {
            return Err(GeneticError::Configuration(format!(
                "Expected {} worker generators, got {}",
                shares.len(),
                rngs.len()
            )));
        }

        let results: Vec<Result<WorkerOutput>> = self.pool.install(|| {
            rngs.par_iter_mut()
                .zip(shares.into_par_iter())
                .enumerate()
                .map(|(worker, (rng, share))| {
                    tracing::trace!(worker, start = share.start, end = share.end, "Worker share");
                    panic::catch_unwind(AssertUnwindSafe(|| task(worker, share, rng)))
                        .unwrap_or_else(|payload| {
                            Err(GeneticError::WorkerFailed {
                                worker,
                                reason: panic_message(payload.as_ref()),
                            })
                        })
                })
                .collect()
        });

        results.into_iter().collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::CrossoverStrategy;

    fn catalog() -> ItemCatalog {
        let values: Vec<u64> = (1..=12).collect();
        let weights: Vec<u64> = (1..=12).map(|w| w * 2).collect();
        ItemCatalog::from_values_and_weights(&values, &weights).unwrap()
    }

    fn options(population_size: usize, workers: usize) -> EvolutionOptions {
        EvolutionOptions::builder()
            .num_items(12)
            .population_size(population_size)
            .elitism_fraction(0.25)
            .crossover_probability(0.5)
            .crossover_strategy(CrossoverStrategy::Uniform)
            .capacity(30)
            .worker_count(workers)
            .build()
    }

    #[test]
    fn test_partition_covers_range_in_order() {
        for total in 1..40 {
            for workers in 1..=total {
                let shares = partition(total, workers);
                assert_eq!(shares.len(), workers);
                assert_eq!(shares[0].start, 0);
                assert_eq!(shares[workers - 1].end, total);
                for pair in shares.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
                let covered: usize = shares.iter().map(|s| s.len()).sum();
                assert_eq!(covered, total);
            }
        }
    }

    #[test]
    fn test_partition_last_share_takes_remainder() {
        assert_eq!(partition(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(partition(4, 2), vec![0..2, 2..4]);
        assert!(partition(4, 0).is_empty());
    }

    #[test]
    fn test_reassemble_keeps_worker_order() {
        let a = Individual::new(vec![true]);
        let b = Individual::new(vec![false]);
        let merged = reassemble(vec![vec![a.clone()], vec![b.clone(), b.clone()]], 3).unwrap();
        assert_eq!(merged, vec![a, b.clone(), b]);
    }

    #[test]
    fn test_reassemble_detects_size_mismatch() {
        let parts = vec![vec![Individual::new(vec![true])], Vec::new()];
        match reassemble(parts, 2) {
            Err(GeneticError::PopulationSizeMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected PopulationSizeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_population_has_exact_size() {
        let catalog = catalog();
        for (size, workers) in [(7, 3), (10, 4), (5, 5), (9, 1)] {
            let options = options(size, workers);
            let scheduler = GenerationScheduler::new(&options, &catalog).unwrap();
            let mut rngs = RandomNumberGenerator::from_seed(1).spawn_workers(workers);
            let best = SharedBest::new(12);

            let population = scheduler.initial_population(&mut rngs, &best).unwrap();
            assert_eq!(population.len(), size);
            for individual in population.individuals() {
                let (weight, value) = individual.totals(&catalog).unwrap();
                assert!(weight <= 30);
                assert_eq!(individual.fitness(), value);
            }
            let top = population.individuals().iter().map(|i| i.fitness()).max().unwrap();
            assert_eq!(best.snapshot().unwrap().fitness, top);
        }
    }

    #[test]
    fn test_next_generation_keeps_elites_and_size() {
        let catalog = catalog();
        let options = options(10, 3);
        let scheduler = GenerationScheduler::new(&options, &catalog).unwrap();
        let mut rngs = RandomNumberGenerator::from_seed(2).spawn_workers(3);
        let best = SharedBest::new(12);

        let mut current = scheduler.initial_population(&mut rngs, &best).unwrap();
        current.sort();
        let offspring = scheduler.next_generation(&current, &mut rngs, &best).unwrap();

        assert_eq!(offspring.population.len(), 10);
        // round(0.25 * 10) = 3 elites
        assert_eq!(
            &offspring.population.individuals()[..3],
            &current.individuals()[..3]
        );
        assert_eq!(offspring.crossovers + offspring.mutations, 7);
    }

    #[test]
    fn test_next_generation_rejects_wrong_sized_input() {
        let catalog = catalog();
        let options = options(6, 2);
        let scheduler = GenerationScheduler::new(&options, &catalog).unwrap();
        let mut rngs = RandomNumberGenerator::from_seed(3).spawn_workers(2);
        let current = Population::new(vec![Individual::new(vec![false; 12]); 5]);

        let result = scheduler.next_generation(&current, &mut rngs, &SharedBest::new(12));
        assert!(matches!(
            result,
            Err(GeneticError::PopulationSizeMismatch { expected: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_same_seed_same_generation() {
        let catalog = catalog();
        let options = options(12, 4);
        let scheduler = GenerationScheduler::new(&options, &catalog).unwrap();

        let run = || {
            let mut rngs = RandomNumberGenerator::from_seed(77).spawn_workers(4);
            let best = SharedBest::new(12);
            let mut population = scheduler.initial_population(&mut rngs, &best).unwrap();
            population.sort();
            scheduler
                .next_generation(&population, &mut rngs, &best)
                .unwrap()
                .population
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_mismatched_generator_count_is_rejected() {
        let catalog = catalog();
        let options = options(6, 3);
        let scheduler = GenerationScheduler::new(&options, &catalog).unwrap();
        let mut rngs = RandomNumberGenerator::from_seed(3).spawn_workers(2);

        let result = scheduler.initial_population(&mut rngs, &SharedBest::new(12));
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_panicking_worker_fails_the_phase() {
        let catalog = catalog();
        let options = options(6, 3);
        let scheduler = GenerationScheduler::new(&options, &catalog).unwrap();
        let mut rngs = RandomNumberGenerator::from_seed(3).spawn_workers(3);

        let result = scheduler.fork_join(&mut rngs, |worker, _, _| {
            if worker == 1 {
                panic!("share lost");
            }
            Ok(WorkerOutput::default())
        });

        match result {
            Err(GeneticError::WorkerFailed { worker, reason }) => {
                assert_eq!(worker, 1);
                assert_eq!(reason, "share lost");
            }
            other => panic!("Expected WorkerFailed, got {:?}", other),
        }
    }
}
