//! # Skip Map
//!
//! An ordered in-memory map built on a skip list instead of a balanced
//! tree. Same contract as an ordered tree map: unique keys, expected
//! O(log n) lookup, insertion and removal, and ordered iteration in both
//! directions.
//!
//! ## Core idea
//! Every node gets a random height when it is created. Tall nodes form
//! "express lanes" over short ones, so a search starts at the top level,
//! runs forward, and drops a level whenever the next key would overshoot.
//! Balance comes from the dice, not from rotations.
//!
//! ```text
//! Level 2:  HEAD ─────────────► 30 ─────────────────► TAIL
//! Level 1:  HEAD ──► 10 ──────► 30 ──────► 50 ──────► TAIL
//! Level 0:  HEAD ──► 10 ──► 20 ──► 30 ──► 40 ──► 50 ──► TAIL
//! ```
//!
//! Nodes live in an arena and link to each other by slot index, so a
//! removed node can never be reached through a dangling link. Positions are
//! handed out as [`Cursor`]s that the map validates on every use.
//!
//! The map is single-owner and not synchronized; wrap it in a lock to share
//! it between threads.

pub mod cursor;
pub mod error;
pub mod iterator;
pub mod options;
pub mod skiplist;

// Public re-exports for the top-level API
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use iterator::{IntoIter, Iter, IterMut, Keys, Range, RangeMut, Values, ValuesMut};
pub use options::Options;
pub use skiplist::SkipMap;
