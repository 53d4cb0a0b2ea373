//! Slot storage with a free list and stable handles.
//!
//! Values live in a `Vec<Option<T>>`; removing a value leaves a hole that is
//! recorded on the free list and reused by the next insert. A [`SlotId`]
//! stays valid until its value is removed, which is what lets the recency
//! list link nodes by index instead of by pointer.

use std::ops::{Index, IndexMut};

/// Stable handle to a value stored in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an arena with room for `capacity` values before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value`, reusing a freed slot when one is available.
    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
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

    /// Number of slots ever allocated, occupied or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Panics if `id` does not refer to an occupied slot.
impl<T> Index<SlotId> for SlotArena<T> {
    type Output = T;

    fn index(&self, id: SlotId) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("stale slot id {}", id.0),
        }
    }
}

impl<T> IndexMut<SlotId> for SlotArena<T> {
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("stale slot id {}", id.0),
        }
    }
}
