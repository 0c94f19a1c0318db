use std::borrow::Borrow;

use super::node::{Arena, HEAD};

impl<K, V> Arena<K, V> {
    /// Returns the first node whose key is `>= key`, or the tail if none is.
    ///
    /// When `prevs` is given, `prevs[i]` is set to the last node visited at
    /// level `i` before dropping to level `i - 1`. Those are exactly the
    /// nodes whose forward links a mutation has to patch.
    ///
    /// Algorithm:
    ///   1. Start at the head, top level
    ///   2. Move forward while the next key < target
    ///   3. Record the current node, drop one level
    ///   4. Repeat until level 0 is done
    pub(crate) fn find_greater_or_equal<Q>(&self, key: &Q, mut prevs: Option<&mut [usize]>) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut p = HEAD;

        for level in (0..self.node(HEAD).height()).rev() {
            loop {
                let next = self.node(p).forward[level];
                // The tail carries no key, so the walk always stops there.
                match self.node(next).key() {
                    Some(k) if k.borrow() < key => p = next,
                    _ => break,
                }
            }

            if let Some(prevs) = prevs.as_deref_mut() {
                prevs[level] = p;
            }
        }

        self.node(p).next()
    }

    /// Whether `idx` is a real node holding exactly `key`.
    pub(crate) fn holds<Q>(&self, idx: usize, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        matches!(self.node(idx).key(), Some(k) if k.borrow() == key)
    }

    /// Splices `idx` in after `prevs[i]` on each of its levels and patches
    /// the level-0 backward links around it.
    pub(crate) fn link(&mut self, idx: usize, prevs: &[usize]) {
        let prev = prevs[0];
        let next = self.node(prev).next();
        self.node_mut(idx).backward = Some(prev);
        self.node_mut(next).backward = Some(idx);

        for level in 0..self.node(idx).height() {
            let prev = prevs[level];
            let next = self.node(prev).forward[level];
            self.node_mut(idx).forward[level] = next;
            self.node_mut(prev).forward[level] = idx;
        }
    }

    /// Bypasses `idx` on each of its levels. The node itself is left as is.
    pub(crate) fn unlink(&mut self, idx: usize, prevs: &[usize]) {
        let node = self.node(idx);
        let next = node.next();
        let back = node.backward;

        for level in 0..self.node(idx).height() {
            let after = self.node(idx).forward[level];
            debug_assert_eq!(self.node(prevs[level]).forward[level], idx);
            self.node_mut(prevs[level]).forward[level] = after;
        }

        self.node_mut(next).backward = back;
    }
}
