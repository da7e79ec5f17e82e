//! Mutation operator.

use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;

/// Flips a uniformly chosen gene `steps` times.
///
/// Positions are drawn independently, so a gene may be flipped more than once and
/// the number of genes that actually change can be smaller than `steps`.
pub fn mutate(individual: &mut Individual, steps: usize, rng: &mut RandomNumberGenerator) {
    let genes = individual.genes_mut();
    if genes.is_empty() {
        return;
    }
    for _ in 0..steps {
        let index = rng.index_below(genes.len());
        genes[index] = !genes[index];
    }
}
