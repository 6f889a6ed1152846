//! Intrusive doubly linked list backed by `SlotArena`.
//!
//! Nodes live in the list's own [`SlotArena`] and point at each other by
//! [`SlotId`], giving stable handles and O(1) splicing without raw pointers.
//! Both engines use it: the LRU engine for its recency order, the LFU engine
//! twice (the outer list of frequency tiers and each tier's entry list).
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬──────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, link: Link { prev, next } }    │
//!   ├────────┼──────────────────────────────────────────────┤
//!   │ id_1   │ { A, prev: None,       next: Some(id_2) }    │
//!   │ id_2   │ { B, prev: Some(id_1), next: Some(id_3) }    │
//!   │ id_3   │ { C, prev: Some(id_2), next: None }          │
//!   └────────┴──────────────────────────────────────────────┘
//!
//!   head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//! ```
//!
//! Every insertion and move goes through one private `splice(id, prev, next)`
//! that wires a detached node between two neighbours (either may be the list
//! boundary), and every removal through `unlink(id)`.
//!
//! ## Operations
//!
//! | Operation                              | Time |
//! |----------------------------------------|------|
//! | `push_front` / `push_back`             | O(1) |
//! | `insert_before(at)`                    | O(1) |
//! | `remove` / `pop_front` / `pop_back`    | O(1) |
//! | `move_to_front`                        | O(1) |
//! | `front_id` / `back_id` / `prev_id` / `next_id` | O(1) |
//! | `iter` / `iter_ids`                    | O(n) |
//!
//! A `SlotId` is only meaningful for the list that returned it, and only until
//! that node is removed; freed slots are handed out again.

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Link {
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    link: Link,
}

/// Doubly linked list whose nodes are addressed by [`SlotId`].
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns `true` if `id` refers to a live node of this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn front(&self) -> Option<&T> {
        self.get(self.head?)
    }

    pub fn back(&self) -> Option<&T> {
        self.get(self.tail?)
    }

    /// Neighbour of `id` toward the front.
    pub fn prev_id(&self, id: SlotId) -> Option<SlotId> {
        self.link(id)?.prev
    }

    /// Neighbour of `id` toward the back.
    pub fn next_id(&self, id: SlotId) -> Option<SlotId> {
        self.link(id)?.next
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Handles from front to back.
    pub fn iter_ids(&self) -> Ids<'_, T> {
        Ids {
            list: self,
            cursor: self.head,
        }
    }

    /// Values from front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter_ids().filter_map(move |id| self.get(id))
    }

    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.alloc(value);
        self.splice(id, None, self.head);
        id
    }

    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.alloc(value);
        self.splice(id, self.tail, None);
        id
    }

    /// Inserts `value` immediately in front of `at` (toward the head).
    ///
    /// Returns `None` if `at` is not a node of this list; `value` is dropped.
    pub fn insert_before(&mut self, at: SlotId, value: T) -> Option<SlotId> {
        let prev = self.link(at)?.prev;
        let id = self.alloc(value);
        self.splice(id, prev, Some(at));
        Some(id)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.unlink(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.remove(self.head?)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.remove(self.tail?)
    }

    /// Makes `id` the head. Returns `false` if `id` is not in the list.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if self.head == Some(id) {
            return true;
        }
        if self.unlink(id).is_none() {
            return false;
        }
        self.splice(id, None, self.head);
        true
    }

    /// Drops every node. The arena keeps its allocation for reuse.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    fn alloc(&mut self, value: T) -> SlotId {
        self.arena.insert(Node {
            value,
            link: Link::default(),
        })
    }

    fn link(&self, id: SlotId) -> Option<Link> {
        self.arena.get(id).map(|node| node.link)
    }

    fn set_next(&mut self, id: Option<SlotId>, next: Option<SlotId>) {
        match id.and_then(|id| self.arena.get_mut(id)) {
            Some(node) => node.link.next = next,
            None => self.head = next,
        }
    }

    fn set_prev(&mut self, id: Option<SlotId>, prev: Option<SlotId>) {
        match id.and_then(|id| self.arena.get_mut(id)) {
            Some(node) => node.link.prev = prev,
            None => self.tail = prev,
        }
    }

    /// Wires the detached node `id` between `prev` and `next`, which must be
    /// adjacent (`None` stands for the list boundary).
    fn splice(&mut self, id: SlotId, prev: Option<SlotId>, next: Option<SlotId>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.link = Link { prev, next };
        }
        self.set_next(prev, Some(id));
        self.set_prev(next, Some(id));
    }

    /// Joins the neighbours of `id` and clears its links.
    fn unlink(&mut self, id: SlotId) -> Option<()> {
        let Link { prev, next } = self.link(id)?;
        self.set_next(prev, next);
        self.set_prev(next, prev);
        if let Some(node) = self.arena.get_mut(id) {
            node.link = Link::default();
        }
        Some(())
    }

    /// Walks the list in both directions and panics on any broken link.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let forward: Vec<SlotId> = self.iter_ids().take(self.len() + 1).collect();
        assert_eq!(forward.len(), self.len(), "forward walk length");
        assert_eq!(forward.first().copied(), self.head, "head mismatch");
        assert_eq!(forward.last().copied(), self.tail, "tail mismatch");

        let mut backward = Vec::with_capacity(forward.len());
        let mut cursor = self.tail;
        while let Some(id) = cursor {
            backward.push(id);
            assert!(backward.len() <= self.len(), "backward walk overran");
            cursor = self.prev_id(id);
        }
        backward.reverse();
        assert_eq!(forward, backward, "prev links disagree with next links");
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over node handles, front to back.
pub struct Ids<'a, T> {
    list: &'a IntrusiveList<T>,
    cursor: Option<SlotId>,
}

impl<T> Iterator for Ids<'_, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<SlotId> {
        let id = self.cursor?;
        self.cursor = self.list.next_id(id);
        Some(id)
    }
}
