//! Iterators over a [`SkipMap`].
//!
//! All of them follow level 0 only: it is a sorted doubly linked list
//! holding every entry, so forward steps use `forward[0]` and backward steps
//! use the single backward link. Each iterator is double-ended and lazy;
//! calling `iter()` again restarts the traversal.
//!
//! Whole-map iterators know their length up front. Range iterators do not,
//! so they are separate types without `ExactSizeIterator`.

use std::borrow::Borrow;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use crate::skiplist::SkipMap;
use crate::skiplist::node::{Arena, HEAD, LevelZeroMut, TAIL};

/// Shared level-0 walk between two slots.
///
/// `front` is the next node to yield from the front; `back` is the node
/// just past the last one to yield. The walk is exhausted when they meet.
struct Walk<'a, K, V> {
    arena: &'a Arena<K, V>,
    front: usize,
    back: usize,
}

impl<K, V> Clone for Walk<'_, K, V> {
    fn clone(&self) -> Self {
        Walk { ..*self }
    }
}

impl<'a, K, V> Walk<'a, K, V> {
    fn is_done(&self) -> bool {
        self.front == self.back
    }

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        if self.is_done() {
            return None;
        }
        let node = self.arena.node(self.front);
        let (k, v) = node.entry.as_ref()?;
        self.front = node.next();
        Some((k, v))
    }

    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        if self.is_done() {
            return None;
        }
        let prev = self.arena.node(self.back).backward?;
        let (k, v) = self.arena.node(prev).entry.as_ref()?;
        self.back = prev;
        Some((k, v))
    }
}

/// Mutable level-0 walk. Each entry borrow is taken out of its slot when
/// yielded, so it can be handed out only once.
struct WalkMut<'a, K, V> {
    slots: Vec<LevelZeroMut<'a, K, V>>,
    front: usize,
    back: usize,
}

impl<'a, K, V> WalkMut<'a, K, V> {
    fn new(arena: &'a mut Arena<K, V>, front: usize, back: usize) -> Self {
        WalkMut {
            slots: arena.level_zero_mut(),
            front,
            back,
        }
    }

    fn is_done(&self) -> bool {
        self.front == self.back
    }

    fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
        if self.is_done() {
            return None;
        }
        let slot = &mut self.slots[self.front];
        let (k, v) = slot.entry.take()?;
        self.front = slot.next;
        Some((&*k, v))
    }

    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        if self.is_done() {
            return None;
        }
        let prev = self.slots[self.back].prev?;
        let (k, v) = self.slots[prev].entry.take()?;
        self.back = prev;
        Some((&*k, v))
    }
}

/// Borrowing iterator over `(&K, &V)` in key order.
pub struct Iter<'a, K, V> {
    walk: Walk<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.walk.next()?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.walk.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            walk: self.walk.clone(),
            remaining: self.remaining,
        }
    }
}

/// Borrowing iterator over `(&K, &mut V)` in key order.
pub struct IterMut<'a, K, V> {
    walk: WalkMut<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.walk.next()?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.walk.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Iterator over `(&K, &V)` for the keys inside a range.
pub struct Range<'a, K, V> {
    walk: Walk<'a, K, V>,
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.walk.is_done() { (0, Some(0)) } else { (1, None) }
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.walk.next_back()
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            walk: self.walk.clone(),
        }
    }
}

/// Iterator over `(&K, &mut V)` for the keys inside a range.
pub struct RangeMut<'a, K, V> {
    walk: WalkMut<'a, K, V>,
}

impl<'a, K, V> Iterator for RangeMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.walk.is_done() { (0, Some(0)) } else { (1, None) }
    }
}

impl<K, V> DoubleEndedIterator for RangeMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.walk.next_back()
    }
}

impl<K, V> FusedIterator for RangeMut<'_, K, V> {}

/// Owning iterator; drains the map in key order.
pub struct IntoIter<K, V> {
    map: SkipMap<K, V>,
}

impl<K: Ord, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.map.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.len(), Some(self.map.len()))
    }
}

impl<K: Ord, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map.pop_last()
    }
}

impl<K: Ord, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K: Ord, V> FusedIterator for IntoIter<K, V> {}

/// Iterator over keys in order.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys(self.0.clone())
    }
}

/// Iterator over values in key order.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values(self.0.clone())
    }
}

/// Iterator over mutable values in key order.
pub struct ValuesMut<'a, K, V>(IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> SkipMap<K, V> {
    pub fn iter(&self) -> Iter<'_, K, V> {
        let first = self.arena().node(HEAD).next();
        Iter {
            walk: Walk {
                arena: self.arena(),
                front: first,
                back: TAIL,
            },
            remaining: self.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let first = self.arena().node(HEAD).next();
        let remaining = self.len();
        IterMut {
            walk: WalkMut::new(self.arena_mut(), first, TAIL),
            remaining,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }
}

impl<K: Ord, V> SkipMap<K, V> {
    /// Iterates over the entries whose keys fall in `range`.
    ///
    /// # Panics
    /// Panics if the start of the range is greater than its end, or if both
    /// bounds exclude the same key.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        let (front, back) = self.range_slots(&range);
        Range {
            walk: Walk {
                arena: self.arena(),
                front,
                back,
            },
        }
    }

    /// Mutable form of [`range`](Self::range).
    pub fn range_mut<Q, R>(&mut self, range: R) -> RangeMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        let (front, back) = self.range_slots(&range);
        RangeMut {
            walk: WalkMut::new(self.arena_mut(), front, back),
        }
    }

    /// Maps a range onto `(first slot to yield, slot just past the last)`.
    fn range_slots<Q, R>(&self, range: &R) -> (usize, usize)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        match (range.start_bound(), range.end_bound()) {
            (Bound::Excluded(s), Bound::Excluded(e)) if s == e => {
                panic!("range start and end are equal and excluded in SkipMap")
            }
            (Bound::Included(s) | Bound::Excluded(s), Bound::Included(e) | Bound::Excluded(e))
                if s > e =>
            {
                panic!("range start is greater than range end in SkipMap")
            }
            _ => {}
        }

        let front = match range.start_bound() {
            Bound::Included(s) => self.lower_bound_idx(s),
            Bound::Excluded(s) => self.upper_bound_idx(s),
            Bound::Unbounded => self.arena().node(HEAD).next(),
        };
        let back = match range.end_bound() {
            Bound::Included(e) => self.upper_bound_idx(e),
            Bound::Excluded(e) => self.lower_bound_idx(e),
            Bound::Unbounded => TAIL,
        };
        (front, back)
    }
}

impl<'a, K, V> IntoIterator for &'a SkipMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut SkipMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: Ord, V> IntoIterator for SkipMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { map: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_and_back_meet_in_the_middle() {
        let map: SkipMap<u32, u32> = (0..6).map(|i| (i, i * 10)).collect();
        let mut it = map.iter();
        assert_eq!(it.size_hint(), (6, Some(6)));
        assert_eq!(it.next(), Some((&0, &0)));
        assert_eq!(it.next_back(), Some((&5, &50)));
        assert_eq!(it.next(), Some((&1, &10)));
        assert_eq!(it.next_back(), Some((&4, &40)));
        assert_eq!(it.next(), Some((&2, &20)));
        assert_eq!(it.next_back(), Some((&3, &30)));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
        assert_eq!(it.size_hint(), (0, Some(0)));
    }

    #[test]
    fn iter_mut_meets_in_the_middle() {
        let mut map: SkipMap<u32, u32> = (0..5).map(|i| (i, 0)).collect();
        let mut it = map.iter_mut();
        *it.next().unwrap().1 = 1;
        *it.next_back().unwrap().1 = 2;
        *it.next().unwrap().1 = 3;
        *it.next_back().unwrap().1 = 4;
        *it.next().unwrap().1 = 5;
        assert!(it.next().is_none());
        assert!(it.next_back().is_none());

        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, [1, 3, 5, 4, 2]);
    }
}
