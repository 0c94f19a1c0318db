use super::SkipMap;
use super::node::{HEAD, TAIL};
use crate::error::{Error, Result};

impl<K: Ord, V> SkipMap<K, V> {
    /// Walks the whole structure and checks its invariants:
    ///
    /// - level 0 runs head to tail in strictly increasing key order, and
    ///   backward links are its exact inverse
    /// - every node reached at level `i` is taller than `i`, and level `i`
    ///   holds exactly the level-0 nodes taller than `i`
    /// - the entry count matches `len()`, and so does the number of
    ///   occupied arena slots
    ///
    /// Returns [`Error::Corruption`] describing the first violation.
    pub fn verify(&self) -> Result<()> {
        let arena = self.arena();
        let max_height = arena.node(HEAD).height();
        if arena.node(TAIL).height() != max_height {
            return Err(corruption(format!(
                "sentinel heights differ: head {max_height}, tail {}",
                arena.node(TAIL).height()
            )));
        }

        // Level 0: ordering, backward links, node heights.
        let mut order = Vec::with_capacity(self.len());
        let mut prev = HEAD;
        let mut curr = arena.node(HEAD).next();
        while curr != TAIL {
            if order.len() >= arena.capacity() {
                return Err(corruption("level 0 does not reach the tail".into()));
            }
            if arena.stamp(curr).is_none() {
                return Err(corruption(format!("level 0 links to vacant slot {curr}")));
            }

            let node = arena.node(curr);
            let Some(key) = node.key() else {
                return Err(corruption(format!("slot {curr} is linked but holds no entry")));
            };
            if node.height() == 0 || node.height() >= max_height {
                return Err(corruption(format!(
                    "slot {curr} has height {} outside 1..{max_height}",
                    node.height()
                )));
            }
            if node.backward != Some(prev) {
                return Err(corruption(format!(
                    "slot {curr} points back to {:?}, expected {prev}",
                    node.backward
                )));
            }
            if let Some(prev_key) = arena.node(prev).key() {
                if prev_key >= key {
                    return Err(corruption(format!(
                        "keys out of order between slots {prev} and {curr}"
                    )));
                }
            }

            order.push((curr, node.height()));
            prev = curr;
            curr = node.next();
        }

        if arena.node(TAIL).backward != Some(prev) {
            return Err(corruption(format!(
                "tail points back to {:?}, expected {prev}",
                arena.node(TAIL).backward
            )));
        }
        if order.len() != self.len() {
            return Err(corruption(format!(
                "counted {} entries, len() reports {}",
                order.len(),
                self.len()
            )));
        }
        // Every slot past the sentinels is either linked or on the free list.
        let occupied = arena.capacity() - 2 - arena.vacant();
        if occupied != self.len() {
            return Err(corruption(format!(
                "{occupied} occupied slots for {} entries",
                self.len()
            )));
        }

        // Upper levels: each is the level-0 sequence filtered by height.
        for level in 1..max_height {
            let mut expected = order
                .iter()
                .filter(|&&(_, height)| height > level)
                .map(|&(idx, _)| idx);

            let mut curr = arena.node(HEAD).forward[level];
            while curr != TAIL {
                if expected.next() != Some(curr) {
                    return Err(corruption(format!(
                        "level {level} links to slot {curr} out of turn"
                    )));
                }
                curr = arena.node(curr).forward[level];
            }
            if let Some(missing) = expected.next() {
                return Err(corruption(format!(
                    "slot {missing} is missing from level {level}"
                )));
            }
        }

        Ok(())
    }

    /// Counts entries by node height; index `h` holds the number of nodes of
    /// height `h`.
    pub fn height_histogram(&self) -> Vec<usize> {
        let arena = self.arena();
        let mut counts = vec![0; arena.node(HEAD).height()];
        let mut curr = arena.node(HEAD).next();
        while curr != TAIL {
            let node = arena.node(curr);
            counts[node.height()] += 1;
            curr = node.next();
        }
        counts
    }
}

fn corruption(msg: String) -> Error {
    Error::Corruption(msg)
}
