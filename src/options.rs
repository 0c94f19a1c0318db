use crate::error::{Error, Result};

/// Maximum height of the skip list, sentinels included. Ordinary nodes are
/// always strictly shorter.
pub const DEFAULT_MAX_HEIGHT: usize = 20;

/// One in `DEFAULT_BRANCHING` nodes grows one more level.
pub const DEFAULT_BRANCHING: u32 = 4;

/// Fixed seed so the shape of the structure is reproducible across runs.
pub const DEFAULT_SEED: u64 = 0xdead_beef;

/// Upper limit accepted for `max_height`.
const HEIGHT_LIMIT: usize = 64;

/// Construction knobs for [`SkipMap`](crate::SkipMap).
///
/// The defaults reproduce the classic layout: 20 levels, p = 1/4 and a
/// fixed seed.
///
/// ```
/// use skipmap::{Options, SkipMap};
///
/// let opts = Options::default().with_max_height(12).with_seed(7);
/// let map: SkipMap<u32, &str> = SkipMap::with_options(opts).unwrap();
/// assert!(map.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Number of levels carried by the head and tail sentinels.
    pub max_height: usize,
    /// Inverse of the probability that a node grows one more level.
    pub branching: u32,
    /// Seed for the height randomizer.
    pub seed: u64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_height: DEFAULT_MAX_HEIGHT,
            branching: DEFAULT_BRANCHING,
            seed: DEFAULT_SEED,
        }
    }
}

impl Options {
    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn with_branching(mut self, branching: u32) -> Self {
        self.branching = branching;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the options before a map is built from them.
    pub fn validate(&self) -> Result<()> {
        if self.max_height < 2 {
            return Err(Error::InvalidOptions("max_height must be at least 2"));
        }
        if self.max_height > HEIGHT_LIMIT {
            return Err(Error::InvalidOptions("max_height must not exceed 64"));
        }
        if self.branching < 2 {
            return Err(Error::InvalidOptions("branching must be at least 2"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let opts = Options::default();
        assert_eq!(opts.max_height, 20);
        assert_eq!(opts.branching, 4);
        assert_eq!(opts.seed, 0xdeadbeef);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_values() {
        assert!(matches!(
            Options::default().with_max_height(1).validate(),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            Options::default().with_max_height(65).validate(),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            Options::default().with_branching(1).validate(),
            Err(Error::InvalidOptions(_))
        ));
        assert!(Options::default().with_max_height(2).validate().is_ok());
    }
}
