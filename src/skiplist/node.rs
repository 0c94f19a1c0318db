use std::mem;

use crate::error::Result;

/// Slot index of the head sentinel.
pub(crate) const HEAD: usize = 0;

/// Slot index of the tail sentinel.
pub(crate) const TAIL: usize = 1;

/// Placeholder for forward links that are never followed (the tail's).
pub(crate) const NIL: usize = usize::MAX;

/// Stamp of a vacant slot. Live stamps start at 1.
const VACANT: u64 = 0;

/// A single node in the skip list.
///
/// `forward[i]` is the next node at level `i`; a node takes part in exactly
/// `forward.len()` levels. `backward` is the previous node at level 0 and is
/// only used for reverse iteration.
///
/// ```text
/// Level 3:  HEAD ──────────────────────────────► 50 ──────────► TAIL
/// Level 2:  HEAD ──────────► 20 ────────────────► 50 ──────────► TAIL
/// Level 1:  HEAD ──► 10 ──► 20 ────► 35 ────────► 50 ──► 60 ──► TAIL
/// Level 0:  HEAD ──► 10 ──► 20 ──► 25 ──► 35 ──► 50 ──► 60 ──► TAIL
///                  ◄──    ◄──    ◄──    ◄──     ◄──    ◄──    ◄──
/// ```
///
/// Sentinels carry no entry.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) entry: Option<(K, V)>,
    pub(crate) forward: Vec<usize>,
    pub(crate) backward: Option<usize>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, forward: Vec<usize>) -> Self {
        Node {
            entry: Some((key, value)),
            forward,
            backward: None,
        }
    }

    fn sentinel(height: usize) -> Self {
        Node {
            entry: None,
            forward: vec![NIL; height],
            backward: None,
        }
    }

    fn vacant() -> Self {
        Node {
            entry: None,
            forward: Vec::new(),
            backward: None,
        }
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    pub(crate) fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|(k, _)| k)
    }

    #[inline]
    pub(crate) fn next(&self) -> usize {
        self.forward[0]
    }
}

struct Slot<K, V> {
    stamp: u64,
    node: Node<K, V>,
}

/// Owns every node of one skip list, sentinels included.
///
/// Links are slot indices. A removed node leaves a vacant slot that goes on
/// the free list and is reused by a later insert; its stamp changes, so any
/// handle still holding the old `(slot, stamp)` pair can tell it is stale.
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    next_stamp: u64,
}

impl<K, V> Arena<K, V> {
    /// Creates an arena holding just the head and tail sentinels, linked to
    /// each other at every level.
    pub(crate) fn new(max_height: usize) -> Self {
        let mut arena = Arena {
            slots: Vec::new(),
            free: Vec::new(),
            next_stamp: 1,
        };
        let head = arena.alloc(Node::sentinel(max_height));
        let tail = arena.alloc(Node::sentinel(max_height));
        debug_assert_eq!((head, tail), (HEAD, TAIL));
        arena.link_sentinels();
        arena
    }

    fn link_sentinels(&mut self) {
        for link in self.slots[HEAD].node.forward.iter_mut() {
            *link = TAIL;
        }
        // head.backward stays None: it is never read.
        self.slots[TAIL].node.backward = Some(HEAD);
    }

    /// Makes sure the next `alloc` does not have to grow the slot vector.
    pub(crate) fn try_reserve(&mut self) -> Result<()> {
        if self.free.is_empty() {
            self.slots.try_reserve(1)?;
        }
        Ok(())
    }

    /// Stores `node` and returns its slot index.
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> usize {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Slot { stamp, node };
                idx
            }
            None => {
                self.slots.push(Slot { stamp, node });
                self.slots.len() - 1
            }
        }
    }

    /// Vacates `idx` and hands back the node that lived there.
    pub(crate) fn release(&mut self, idx: usize) -> Node<K, V> {
        debug_assert!(idx != HEAD && idx != TAIL, "sentinels are never released");
        let slot = &mut self.slots[idx];
        slot.stamp = VACANT;
        self.free.push(idx);
        mem::replace(&mut slot.node, Node::vacant())
    }

    /// Drops every ordinary node and relinks the sentinels.
    ///
    /// Stamps keep counting up, so handles taken before the reset stay stale
    /// even when their slot index is reused.
    pub(crate) fn reset(&mut self) {
        self.slots.truncate(2);
        self.free.clear();
        self.link_sentinels();
    }

    /// Returns the stamp of a live slot.
    pub(crate) fn stamp(&self, idx: usize) -> Option<u64> {
        self.slots
            .get(idx)
            .map(|slot| slot.stamp)
            .filter(|&stamp| stamp != VACANT)
    }

    #[inline]
    pub(crate) fn node(&self, idx: usize) -> &Node<K, V> {
        &self.slots[idx].node
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        &mut self.slots[idx].node
    }

    /// Number of slots, vacant ones included.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of vacated slots waiting on the free list.
    pub(crate) fn vacant(&self) -> usize {
        self.free.len()
    }

    /// Splits every slot into its level-0 links and a mutable borrow of its
    /// entry, indexed by slot. Sentinels and vacant slots have no entry.
    pub(crate) fn level_zero_mut(&mut self) -> Vec<LevelZeroMut<'_, K, V>> {
        self.slots
            .iter_mut()
            .map(|slot| {
                let Node {
                    entry,
                    forward,
                    backward,
                } = &mut slot.node;
                LevelZeroMut {
                    next: forward.first().copied().unwrap_or(NIL),
                    prev: *backward,
                    entry: entry.as_mut(),
                }
            })
            .collect()
    }
}

/// One slot as seen by a mutable level-0 walk.
pub(crate) struct LevelZeroMut<'a, K, V> {
    pub(crate) next: usize,
    pub(crate) prev: Option<usize>,
    pub(crate) entry: Option<&'a mut (K, V)>,
}
