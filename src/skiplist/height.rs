use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::options::Options;

/// Draws node heights from a geometric distribution.
///
/// P(h = k) ≈ (1 - p) · p^(k-1) with p = 1 / branching, capped so that an
/// ordinary node is always shorter than the sentinels.
pub(crate) struct HeightGenerator {
    rng: StdRng,
    seed: u64,
    max_height: usize,
    branching: u32,
}

impl HeightGenerator {
    pub(crate) fn new(options: &Options) -> Self {
        HeightGenerator {
            rng: StdRng::seed_from_u64(options.seed),
            seed: options.seed,
            max_height: options.max_height,
            branching: options.branching,
        }
    }

    /// Returns a height in `1..max_height`.
    pub(crate) fn next_height(&mut self) -> usize {
        let mut height = 1;
        while height < self.max_height - 1 && self.rng.gen_ratio(1, self.branching) {
            height += 1;
        }

        debug_assert!(height >= 1 && height < self.max_height);
        height
    }

    /// Rewinds to the state right after construction.
    pub(crate) fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights_stay_below_max() {
        let mut heights = HeightGenerator::new(&Options::default().with_max_height(4));
        for _ in 0..10_000 {
            let h = heights.next_height();
            assert!((1..4).contains(&h));
        }
    }

    #[test]
    fn minimum_max_height_always_yields_one() {
        let mut heights = HeightGenerator::new(&Options::default().with_max_height(2));
        for _ in 0..1_000 {
            assert_eq!(heights.next_height(), 1);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let opts = Options::default();
        let mut a = HeightGenerator::new(&opts);
        let mut b = HeightGenerator::new(&opts);
        let xs: Vec<_> = (0..256).map(|_| a.next_height()).collect();
        let ys: Vec<_> = (0..256).map(|_| b.next_height()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn reset_replays_sequence() {
        let mut heights = HeightGenerator::new(&Options::default());
        let first: Vec<_> = (0..128).map(|_| heights.next_height()).collect();
        heights.reset();
        let second: Vec<_> = (0..128).map(|_| heights.next_height()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn distribution_decays_by_branching_factor() {
        let mut heights = HeightGenerator::new(&Options::default());
        let mut counts = [0usize; 20];
        for _ in 0..100_000 {
            counts[heights.next_height()] += 1;
        }

        // With p = 1/4, roughly 75% of nodes have height 1 and ~19% height 2.
        assert!(counts[1] > 70_000 && counts[1] < 80_000, "{counts:?}");
        assert!(counts[2] > 15_000 && counts[2] < 23_000, "{counts:?}");
        assert!(counts[1] > counts[2] && counts[2] > counts[3]);
    }
}
