//! Positions inside a [`SkipMap`].
//!
//! A [`Cursor`] is a plain `Copy` handle: it names a node by slot index and
//! stamp and remembers which map produced it. It borrows nothing, so it can
//! be held across mutations; the map checks it on every use and rejects
//! cursors that are foreign or whose entry has been removed.

use crate::error::{Error, Result};
use crate::skiplist::SkipMap;
use crate::skiplist::node::{HEAD, TAIL};

/// An opaque position in a [`SkipMap`]: either an entry or the end.
///
/// Comparing cursors from two different maps is a contract violation;
/// `==` panics on it and [`Cursor::try_eq`] reports
/// [`Error::ForeignCursor`].
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    owner: u64,
    slot: usize,
    stamp: u64,
}

impl Cursor {
    /// Compares positions, refusing cursors from different maps.
    pub fn try_eq(&self, other: &Cursor) -> Result<bool> {
        if self.owner != other.owner {
            return Err(Error::ForeignCursor);
        }
        Ok(self.slot == other.slot && self.stamp == other.stamp)
    }

    /// Whether this is an end position.
    pub fn is_end(&self) -> bool {
        self.slot == TAIL
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        assert_eq!(
            self.owner, other.owner,
            "compared cursors from different maps"
        );
        self.slot == other.slot && self.stamp == other.stamp
    }
}

impl Eq for Cursor {}

impl<K, V> SkipMap<K, V> {
    /// Position of the smallest entry, or [`end`](Self::end) if empty.
    pub fn begin(&self) -> Cursor {
        self.cursor(self.arena().node(HEAD).next())
    }

    /// The position one past the largest entry.
    pub fn end(&self) -> Cursor {
        self.cursor(TAIL)
    }

    pub(crate) fn cursor(&self, slot: usize) -> Cursor {
        Cursor {
            owner: self.id(),
            slot,
            stamp: self.arena().stamp(slot).unwrap_or_default(),
        }
    }

    /// Checks that `cursor` belongs to this map and still names a live node.
    pub(crate) fn resolve(&self, cursor: Cursor) -> Result<usize> {
        if cursor.owner != self.id() {
            return Err(Error::ForeignCursor);
        }
        match self.arena().stamp(cursor.slot) {
            Some(stamp) if stamp == cursor.stamp && cursor.slot != HEAD => Ok(cursor.slot),
            _ => Err(Error::StaleCursor),
        }
    }

    /// Moves one entry towards the end.
    ///
    /// Stepping from [`end`](Self::end) is [`Error::PastEnd`].
    pub fn step_forward(&self, cursor: Cursor) -> Result<Cursor> {
        let idx = self.resolve(cursor)?;
        if idx == TAIL {
            return Err(Error::PastEnd);
        }
        Ok(self.cursor(self.arena().node(idx).next()))
    }

    /// Moves one entry towards the beginning.
    ///
    /// Stepping back from `end()` lands on the largest entry, which is how
    /// reverse traversal starts. Stepping back from [`begin`](Self::begin)
    /// is [`Error::BeforeBegin`].
    pub fn step_backward(&self, cursor: Cursor) -> Result<Cursor> {
        let idx = self.resolve(cursor)?;
        match self.arena().node(idx).backward {
            Some(prev) if prev != HEAD => Ok(self.cursor(prev)),
            _ => Err(Error::BeforeBegin),
        }
    }

    /// Key and value at `cursor`.
    pub fn entry_at(&self, cursor: Cursor) -> Result<(&K, &V)> {
        let idx = self.resolve(cursor)?;
        self.arena()
            .node(idx)
            .entry
            .as_ref()
            .map(|(k, v)| (k, v))
            .ok_or(Error::PastEnd)
    }

    pub fn key_at(&self, cursor: Cursor) -> Result<&K> {
        self.entry_at(cursor).map(|(k, _)| k)
    }

    pub fn value_at(&self, cursor: Cursor) -> Result<&V> {
        self.entry_at(cursor).map(|(_, v)| v)
    }

    /// Mutable access to the value at `cursor`. Keys are never mutable.
    pub fn value_at_mut(&mut self, cursor: Cursor) -> Result<&mut V> {
        let idx = self.resolve(cursor)?;
        self.arena_mut()
            .node_mut(idx)
            .entry
            .as_mut()
            .map(|(_, v)| v)
            .ok_or(Error::PastEnd)
    }
}
