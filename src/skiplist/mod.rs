mod height;
pub(crate) mod node;
mod search;
mod verify;

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::options::Options;

use height::HeightGenerator;
use node::{Arena, HEAD, NIL, Node, TAIL};

/// Source of container identities, so cursors can tell which map made them.
static NEXT_MAP_ID: AtomicU64 = AtomicU64::new(1);

/// A probabilistic sorted map.
///
/// Why a skip list over a balanced tree?
///   - No rotations: structure comes from random node heights
///   - Level 0 is a plain doubly linked list, so iteration is trivial
///   - Every mutation patches a bounded number of links
///
/// Average case: O(log n) insert, lookup and removal, O(n) iteration.
/// Worst case: O(n), but astronomically unlikely with random heights.
///
/// Nodes live in an arena owned by the map and link to each other by slot
/// index. Positions are exposed as [`Cursor`]s, which stay valid until the
/// entry they point at is removed.
///
/// ```
/// use skipmap::SkipMap;
///
/// let mut map = SkipMap::new();
/// map.insert(5, "e");
/// map.insert(1, "a");
/// map.insert(3, "c");
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [1, 3, 5]);
///
/// let at = map.lower_bound(&2);
/// assert_eq!(map.entry_at(at).unwrap(), (&3, &"c"));
/// ```
pub struct SkipMap<K, V> {
    arena: Arena<K, V>,
    heights: HeightGenerator,
    /// Scratch predecessor array reused by every mutation.
    prevs: Vec<usize>,
    len: usize,
    id: u64,
}

impl<K: Ord, V> SkipMap<K, V> {
    /// Creates an empty map with the default [`Options`].
    pub fn new() -> Self {
        Self::build(Options::default())
    }

    /// Creates an empty map with custom options.
    pub fn with_options(options: Options) -> Result<Self> {
        options.validate()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            max_height = options.max_height,
            branching = options.branching,
            seed = options.seed,
            "skip map options accepted"
        );

        Ok(Self::build(options))
    }

    fn build(options: Options) -> Self {
        SkipMap {
            arena: Arena::new(options.max_height),
            heights: HeightGenerator::new(&options),
            prevs: vec![HEAD; options.max_height],
            len: 0,
            id: NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Inserts a key-value pair unless the key is already present.
    ///
    /// Returns the position of the entry holding `key` and whether a new
    /// entry was created. An existing entry keeps its value; `value` is
    /// dropped.
    ///
    /// Algorithm:
    ///   1. Find the insertion point at each level (track predecessors)
    ///   2. Generate a random height for the new node
    ///   3. Create node with that height
    ///   4. Splice into the list at each level up to the node's height
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        let found = self.arena.find_greater_or_equal(&key, Some(&mut self.prevs[..]));
        if self.arena.holds(found, &key) {
            return (self.cursor(found), false);
        }

        let height = self.heights.next_height();
        let idx = self.link_new(key, value, vec![NIL; height]);
        (self.cursor(idx), true)
    }

    /// Like [`insert`](Self::insert), but reports allocation failure instead
    /// of aborting. On error the map is unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Cursor, bool)> {
        let found = self.arena.find_greater_or_equal(&key, Some(&mut self.prevs[..]));
        if self.arena.holds(found, &key) {
            return Ok((self.cursor(found), false));
        }

        self.arena.try_reserve()?;
        let forward = self.try_tower()?;
        let idx = self.link_new(key, value, forward);
        Ok((self.cursor(idx), true))
    }

    /// Builds the entry first, then inserts it unless its key is present.
    ///
    /// The node (payload and link tower) is constructed before the search,
    /// so a duplicate key costs one throw-away node. The duplicate path is
    /// expected to be rare.
    pub fn emplace<F>(&mut self, make: F) -> (Cursor, bool)
    where
        F: FnOnce() -> (K, V),
    {
        let (key, value) = make();
        let forward = vec![NIL; self.heights.next_height()];

        let found = self.arena.find_greater_or_equal(&key, Some(&mut self.prevs[..]));
        if self.arena.holds(found, &key) {
            return (self.cursor(found), false);
        }

        let idx = self.link_new(key, value, forward);
        (self.cursor(idx), true)
    }

    /// Fallible form of [`emplace`](Self::emplace). On error the map is
    /// unchanged.
    pub fn try_emplace<F>(&mut self, make: F) -> Result<(Cursor, bool)>
    where
        F: FnOnce() -> (K, V),
    {
        let (key, value) = make();
        let forward = self.try_tower()?;
        self.arena.try_reserve()?;

        let found = self.arena.find_greater_or_equal(&key, Some(&mut self.prevs[..]));
        if self.arena.holds(found, &key) {
            return Ok((self.cursor(found), false));
        }

        let idx = self.link_new(key, value, forward);
        Ok((self.cursor(idx), true))
    }

    /// Returns the value for `key`, inserting `V::default()` first if the
    /// key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let found = self.arena.find_greater_or_equal(&key, Some(&mut self.prevs[..]));
        let idx = if self.arena.holds(found, &key) {
            found
        } else {
            let height = self.heights.next_height();
            self.link_new(key, V::default(), vec![NIL; height])
        };

        match &mut self.arena.node_mut(idx).entry {
            Some((_, value)) => value,
            None => unreachable!("slot {idx} was just linked with an entry"),
        }
    }

    /// Allocates a link tower of random height without aborting on OOM.
    fn try_tower(&mut self) -> Result<Vec<usize>> {
        let height = self.heights.next_height();
        let mut forward = Vec::new();
        forward.try_reserve_exact(height)?;
        forward.resize(height, NIL);
        Ok(forward)
    }

    /// Stores a new node and links it after the predecessors left in
    /// `self.prevs` by the preceding search.
    fn link_new(&mut self, key: K, value: V, forward: Vec<usize>) -> usize {
        let idx = self.arena.alloc(Node::new(key, value, forward));
        self.arena.link(idx, &self.prevs);
        self.len += 1;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            slot = idx,
            height = self.arena.node(idx).height(),
            len = self.len,
            "linked node"
        );

        idx
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.arena.find_greater_or_equal(key, Some(&mut self.prevs[..]));
        if !self.arena.holds(found, key) {
            return None;
        }
        self.unlink_and_release(found)
    }

    /// Removes the entry at `cursor`.
    ///
    /// Returns a cursor to the entry that followed it (or [`end`](Self::end))
    /// together with the removed pair. The removed cursor and its copies
    /// become stale.
    pub fn remove_at(&mut self, cursor: Cursor) -> Result<(Cursor, (K, V))> {
        let idx = self.resolve(cursor)?;
        let key = self.arena.node(idx).key().ok_or(Error::PastEnd)?;

        let found = self.arena.find_greater_or_equal(key, Some(&mut self.prevs[..]));
        debug_assert_eq!(found, idx);

        // Capture the successor before the node goes away.
        let next = self.arena.node(idx).next();
        let entry = self.unlink_and_release(idx).ok_or(Error::PastEnd)?;
        Ok((self.cursor(next), entry))
    }

    /// Removes and returns the smallest entry.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.arena.node(HEAD).next();
        if first == TAIL {
            return None;
        }

        // The first node is preceded by the head on every level it is on.
        self.prevs.fill(HEAD);
        self.unlink_and_release(first)
    }

    /// Removes and returns the largest entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.arena.node(TAIL).backward?;
        let key = self.arena.node(last).key()?;
        self.arena.find_greater_or_equal(key, Some(&mut self.prevs[..]));
        self.unlink_and_release(last)
    }

    /// Unlinks `idx` using the predecessors in `self.prevs` and frees it.
    fn unlink_and_release(&mut self, idx: usize) -> Option<(K, V)> {
        self.arena.unlink(idx, &self.prevs);
        let node = self.arena.release(idx);
        self.len -= 1;

        #[cfg(feature = "tracing")]
        tracing::trace!(slot = idx, height = node.height(), len = self.len, "unlinked node");

        node.entry
    }

    /// Removes every entry. The map ends up exactly as a new one built from
    /// the same options, including the height sequence it will draw.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(len = self.len, "clearing skip map");

        self.arena.reset();
        self.heights.reset();
        self.prevs.fill(HEAD);
        self.len = 0;
    }

    /// Returns a reference to the value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.arena.find_greater_or_equal(key, None);
        if !self.arena.holds(found, key) {
            return None;
        }
        self.arena.node(found).entry.as_ref().map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.arena.find_greater_or_equal(key, None);
        if !self.arena.holds(found, key) {
            return None;
        }
        self.arena.node_mut(found).entry.as_mut().map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.arena.find_greater_or_equal(key, None);
        self.arena.holds(found, key)
    }

    /// Position of `key`, or [`end`](Self::end) if it is absent.
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.arena.find_greater_or_equal(key, None);
        if self.arena.holds(found, key) {
            self.cursor(found)
        } else {
            self.end()
        }
    }

    /// Position of the first entry whose key is `>= key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor(self.lower_bound_idx(key))
    }

    /// Position of the first entry whose key is `> key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor(self.upper_bound_idx(key))
    }

    pub(crate) fn lower_bound_idx<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.arena.find_greater_or_equal(key, None)
    }

    pub(crate) fn upper_bound_idx<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.arena.find_greater_or_equal(key, None);
        // skip the equal key
        if self.arena.holds(found, key) {
            self.arena.node(found).next()
        } else {
            found
        }
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let first = self.arena.node(HEAD).next();
        self.arena.node(first).entry.as_ref().map(|(k, v)| (k, v))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let last = self.arena.node(TAIL).backward?;
        self.arena.node(last).entry.as_ref().map(|(k, v)| (k, v))
    }
}

impl<K, V> SkipMap<K, V> {
    /// Number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn arena(&self) -> &Arena<K, V> {
        &self.arena
    }

    pub(crate) fn arena_mut(&mut self) -> &mut Arena<K, V> {
        &mut self.arena
    }
}

impl<K: Ord, V> Default for SkipMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SkipMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SkipMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for SkipMap<K, V> {
    /// Inserts every pair; for repeated keys the first value is kept.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_map_is_empty() {
        let map: SkipMap<u32, u32> = SkipMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.arena.capacity(), 2);
        assert_eq!(map.prevs.len(), 20);
    }

    #[test]
    fn maps_get_distinct_ids() {
        let a: SkipMap<u32, u32> = SkipMap::new();
        let b: SkipMap<u32, u32> = SkipMap::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut map = SkipMap::new();
        for i in 0..10 {
            map.insert(i, i);
        }
        assert_eq!(map.arena.capacity(), 12);

        for i in 0..5 {
            map.remove(&i);
        }
        assert_eq!(map.arena.vacant(), 5);

        for i in 10..15 {
            map.insert(i, i);
        }
        assert_eq!(map.arena.capacity(), 12);
        assert_eq!(map.arena.vacant(), 0);
        map.verify().unwrap();
    }

    #[test]
    fn duplicate_emplace_releases_nothing_into_the_arena() {
        let mut map = SkipMap::new();
        map.insert(1, "one");
        let (_, inserted) = map.emplace(|| (1, "uno"));
        assert!(!inserted);
        assert_eq!(map.arena.capacity(), 3);
        assert_eq!(map.get(&1), Some(&"one"));
    }

    #[test]
    fn pop_first_relinks_head_on_all_levels() {
        let mut map = SkipMap::new();
        for i in 0..200 {
            map.insert(i, ());
        }
        for i in 0..200 {
            assert_eq!(map.pop_first(), Some((i, ())));
            map.verify().unwrap();
        }
        assert_eq!(map.pop_first(), None);
        assert_eq!(map.arena.node(HEAD).forward, vec![TAIL; 20]);
    }

    #[test]
    fn clear_restores_fresh_shape() {
        let mut used = SkipMap::new();
        for i in 0..100 {
            used.insert(i, i);
        }
        used.clear();
        assert!(used.is_empty());
        assert_eq!(used.arena.node(HEAD).forward, vec![TAIL; 20]);
        assert_eq!(used.arena.node(TAIL).backward, Some(HEAD));

        let mut fresh = SkipMap::new();
        for i in 0..100 {
            used.insert(i, i);
            fresh.insert(i, i);
        }
        assert_eq!(used.height_histogram(), fresh.height_histogram());
    }
}
