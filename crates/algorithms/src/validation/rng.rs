//! Seeded pseudo-random generator for reproducible partitions.
//!
//! Partitioning must be deterministic given a seed, so the splitter
//! carries its own small LCG instead of reaching for OS entropy.

/// LCG with the Numerical Recipes constants.
#[derive(Debug)]
pub(crate) struct SplitRng {
    state: u64,
}

impl SplitRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    pub fn next_index(&mut self, bound: usize) -> usize {
        ((self.next_u64() >> 33) as usize) % bound
    }

    /// Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SplitRng::new(42);
        let mut b = SplitRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_index(1000), b.next_index(1000));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SplitRng::new(1);
        let mut b = SplitRng::new(2);
        let same = (0..100)
            .filter(|_| a.next_index(1000) == b.next_index(1000))
            .count();
        assert!(same < 10, "sequences should differ, {same} collisions");
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SplitRng::new(7);
        let mut items: Vec<usize> = (0..50).collect();
        rng.shuffle(&mut items);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, (0..50).collect::<Vec<_>>(), "seed 7 should move something");
    }

    #[test]
    fn test_indices_within_bound() {
        let mut rng = SplitRng::new(99);
        for _ in 0..1000 {
            assert!(rng.next_index(17) < 17);
        }
    }
}
