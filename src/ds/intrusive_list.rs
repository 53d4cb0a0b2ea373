//! Doubly linked list backed by [`SlotArena`].
//!
//! Nodes live in the arena and link to each other by [`SlotId`], so a node
//! handle stays valid while other nodes are pushed, moved or popped.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, prev: None, next: Some(id_2) }  │
//!   │ id_2   │ { value: B, prev: Some(id_1), next: id_3 }  │
//!   │ id_3   │ { value: C, prev: Some(id_2), next: None }  │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   head (MRU) ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail (LRU)
//! ```
//!
//! ## Performance
//! - `push_front` / `pop_back`: O(1)
//! - `move_to_front`: O(1)
//! - `iter`: O(n)

use std::collections::HashSet;
use std::ops::Index;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// List that stores nodes in a `SlotArena` and links them via `SlotId`.
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

    /// Creates an empty list with reserved node capacity.
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
        self.arena.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|id| &self.arena[id].value)
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.map(|id| &self.arena[id].value)
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    /// Returns an iterator from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Returns an iterator of node ids from front to back.
    pub fn iter_ids(&self) -> IdIter<'_, T> {
        IdIter {
            list: self,
            current: self.head,
        }
    }

    /// Inserts a new node at the front and returns its `SlotId`.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(head) => self.arena[head].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        id
    }

    /// Removes and returns the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.detach(id);
        self.arena.remove(id).map(|node| node.value)
    }

    /// Moves an existing node to the front; returns `false` if `id` is not present.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    fn detach(&mut self, id: SlotId) {
        let (prev, next) = {
            let node = &self.arena[id];
            (node.prev, node.next)
        };

        match prev {
            Some(prev_id) => self.arena[prev_id].next = next,
            None => self.head = next,
        }
        match next {
            Some(next_id) => self.arena[next_id].prev = prev,
            None => self.tail = prev,
        }

        let node = &mut self.arena[id];
        node.prev = None;
        node.next = None;
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        {
            let node = &mut self.arena[id];
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old_head) => self.arena[old_head].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Walks the list from head to tail and checks link symmetry, the
    /// head/tail markers and that every arena node is reachable exactly once.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.head.is_none() || self.tail.is_none() {
            if self.head.is_some() || self.tail.is_some() || !self.is_empty() {
                return Err(InvariantError::new("head/tail disagree on emptiness"));
            }
            return Ok(());
        }

        let mut seen = HashSet::with_capacity(self.len());
        let mut prev = None;
        let mut current = self.head;

        while let Some(id) = current {
            if !seen.insert(id) {
                return Err(InvariantError::new(format!(
                    "cycle at slot {}",
                    id.index()
                )));
            }
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("dangling slot {}", id.index())))?;
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "broken prev link at slot {}",
                    id.index()
                )));
            }
            if node.next.is_none() && self.tail != Some(id) {
                return Err(InvariantError::new("tail does not match last node"));
            }
            prev = Some(id);
            current = node.next;
        }

        if seen.len() != self.len() {
            return Err(InvariantError::new(format!(
                "reachable nodes {} != arena len {}",
                seen.len(),
                self.len()
            )));
        }
        Ok(())
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<SlotId> for IntrusiveList<T> {
    type Output = T;

    fn index(&self, id: SlotId) -> &T {
        &self.arena[id].value
    }
}

pub struct Iter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.arena.get(self.current?)?;
        self.current = node.next;
        Some(&node.value)
    }
}

pub struct IdIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<T> Iterator for IdIter<'_, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.list.arena.get(id)?.next;
        Some(id)
    }
}
