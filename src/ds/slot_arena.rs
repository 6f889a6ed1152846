//! Slot arena with stable integer handles.
//!
//! Vacant slots form a singly linked free chain threaded through the slots
//! themselves, so reuse is LIFO and needs no side allocation. A [`SlotId`]
//! stays valid until its slot is removed; after that the index may be handed
//! out again.

/// Handle to a slot in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        match self.free_head {
            Some(index) => {
                let old = std::mem::replace(&mut self.slots[index], Slot::Occupied(value));
                if let Slot::Vacant { next_free } = old {
                    self.free_head = next_free;
                }
                SlotId(index)
            }
            None => {
                self.slots.push(Slot::Occupied(value));
                SlotId(self.slots.len() - 1)
            }
        }
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if !matches!(slot, Slot::Occupied(_)) {
            return None;
        }
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match std::mem::replace(slot, vacant) {
            Slot::Occupied(value) => {
                self.free_head = Some(id.0);
                self.len -= 1;
                Some(value)
            }
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots the backing vector holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every value and restarts indexing at zero. The allocation stays.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacated_slots_are_reused_last_in_first_out() {
        let mut arena = SlotArena::new();
        let ids: Vec<_> = (0..4).map(|i| arena.insert(i)).collect();
        arena.remove(ids[1]);
        arena.remove(ids[3]);
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.insert(30), ids[3]);
        assert_eq!(arena.insert(10), ids[1]);
        assert_eq!(arena.insert(4).index(), 4);
        assert_eq!(arena.get(ids[1]), Some(&10));
        assert_eq!(arena.len(), 5);
    }

    #[test]
    fn stale_handle_sees_nothing() {
        let mut arena = SlotArena::new();
        let id = arena.insert('q');
        assert_eq!(arena.remove(id), Some('q'));
        assert_eq!(arena.remove(id), None);
        assert_eq!(arena.get(id), None);
        assert!(arena.get_mut(id).is_none());
        assert!(!arena.contains(id));
        assert!(!arena.contains(SlotId(99)));
        assert!(arena.is_empty());
    }

    #[test]
    fn clear_restarts_indices_without_shrinking() {
        let mut arena = SlotArena::with_capacity(8);
        for i in 0..8u8 {
            arena.insert(i);
        }
        arena.remove(SlotId(2));
        let before = arena.capacity();
        arena.clear();
        assert_eq!(arena.capacity(), before);
        assert_eq!(arena.insert(0).index(), 0);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn values_are_mutable_in_place() {
        let mut arena = SlotArena::default();
        let id = arena.insert(vec![1]);
        if let Some(v) = arena.get_mut(id) {
            v.push(2);
        }
        assert_eq!(arena.get(id), Some(&vec![1, 2]));
    }
}
