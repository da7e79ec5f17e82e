//! Crossover operators.
//!
//! Each operator writes into an existing child slot by copying genes from two
//! parents. None of them evaluates the child. The parents and the child are
//! expected to have the same length; only the child's length is iterated.

use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;

/// Genes at `i < cut` come from `second`, the rest from `first`.
pub fn one_point_crossover(
    child: &mut Individual,
    cut: usize,
    first: &Individual,
    second: &Individual,
) {
    let (first, second) = (first.genes(), second.genes());
    for (i, gene) in child.genes_mut().iter_mut().enumerate() {
        *gene = if i < cut { second[i] } else { first[i] };
    }
}

/// Genes strictly between the two cuts come from `second`, the rest from `first`.
///
/// Equal cuts copy `first` unchanged.
pub fn two_point_crossover(
    child: &mut Individual,
    cut_a: usize,
    cut_b: usize,
    first: &Individual,
    second: &Individual,
) {
    let (lo, hi) = (cut_a.min(cut_b), cut_a.max(cut_b));
    let (first, second) = (first.genes(), second.genes());
    for (i, gene) in child.genes_mut().iter_mut().enumerate() {
        *gene = if lo < i && i < hi { second[i] } else { first[i] };
    }
}

/// Each gene comes from `second` on heads and from `first` on tails.
pub fn uniform_crossover(
    child: &mut Individual,
    rng: &mut RandomNumberGenerator,
    first: &Individual,
    second: &Individual,
) {
    let (first, second) = (first.genes(), second.genes());
    for (i, gene) in child.genes_mut().iter_mut().enumerate() {
        *gene = if rng.next_bit() { second[i] } else { first[i] };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parents() -> (Individual, Individual) {
        (
            Individual::new(vec![true; 6]),
            Individual::new(vec![false; 6]),
        )
    }

    #[test]
    fn test_one_point() {
        let (first, second) = parents();
        let mut child = Individual::new(vec![true; 6]);
        one_point_crossover(&mut child, 2, &first, &second);
        assert_eq!(child.genes(), &[false, false, true, true, true, true]);
    }

    #[test]
    fn test_one_point_at_zero_copies_first() {
        let (first, second) = parents();
        let mut child = Individual::new(vec![false; 6]);
        one_point_crossover(&mut child, 0, &first, &second);
        assert_eq!(child.genes(), first.genes());
    }

    #[test]
    fn test_two_point_excludes_cut_positions() {
        let (first, second) = parents();
        let mut child = Individual::new(vec![true; 6]);
        two_point_crossover(&mut child, 4, 1, &first, &second);
        assert_eq!(child.genes(), &[true, true, false, false, true, true]);
    }

    #[test]
    fn test_two_point_equal_cuts_copies_first() {
        let first = Individual::new(vec![true, false, true, false]);
        let second = Individual::new(vec![false, true, false, true]);
        let mut child = Individual::new(vec![false; 4]);
        two_point_crossover(&mut child, 2, 2, &first, &second);
        assert_eq!(child.genes(), first.genes());
    }

    #[test]
    fn test_uniform_is_deterministic_per_seed() {
        let first = Individual::new(vec![true, false, true, false, true, false, true, false]);
        let second = Individual::new(vec![false, true, false, true, false, true, false, true]);

        let mut child_a = Individual::new(vec![false; 8]);
        let mut child_b = Individual::new(vec![false; 8]);
        uniform_crossover(&mut child_a, &mut RandomNumberGenerator::from_seed(4), &first, &second);
        uniform_crossover(&mut child_b, &mut RandomNumberGenerator::from_seed(4), &first, &second);

        assert_eq!(child_a, child_b);
        for (i, &gene) in child_a.genes().iter().enumerate() {
            assert!(gene == first.genes()[i] || gene == second.genes()[i]);
        }
    }

    #[test]
    fn test_crossover_is_repeatable() {
        let first = Individual::new(vec![true, true, false, false, true]);
        let second = Individual::new(vec![false, true, true, false, false]);

        let mut child_a = Individual::new(vec![false; 5]);
        let mut child_b = Individual::new(vec![true; 5]);
        two_point_crossover(&mut child_a, 0, 4, &first, &second);
        two_point_crossover(&mut child_b, 0, 4, &first, &second);
        assert_eq!(child_a.genes(), child_b.genes());
    }
}
