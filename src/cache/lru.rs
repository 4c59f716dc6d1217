//! LRU Order Module
//!
//! Recency order for cache eviction, kept as a doubly linked list whose nodes
//! live in an arena and link to each other by generational index.
//!
//! ```text
//!   slots: [ 0: A {prev: -, next: 2} | 1: <free> | 2: B {prev: 0, next: -} ]
//!
//!   head (LRU) ─► [0] ◄──► [2] ◄── tail (MRU)
//! ```
//!
//! A [`NodeId`] carries the generation of the slot it was issued for, so an
//! id whose slot has since been freed or reused is rejected instead of
//! aliasing another entry.

// == Node Id ==
/// Handle to a node in a [`RecencyList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    node: Option<Node<T>>,
}

// == Recency List ==
/// Arena-backed list ordered from least to most recently used.
///
/// - Front (head) = least recently used
/// - Back (tail) = most recently used
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Length ==
    /// Returns the number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Lookup ==
    /// Returns the value for `id`, or None if the id is stale.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value for `id`.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|node| &mut node.value)
    }

    /// Returns the least recently used value.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    // == Push Back ==
    /// Appends a value at the most recently used end.
    pub fn push_back(&mut self, value: T) -> NodeId {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        self.len += 1;
        self.attach_back(id);
        id
    }

    // == Move To Back ==
    /// Marks a node as most recently used.
    ///
    /// Returns false if `id` is stale.
    pub fn move_to_back(&mut self, id: NodeId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if self.tail != Some(id) {
            self.detach(id);
            self.attach_back(id);
        }
        true
    }

    // == Pop Front ==
    /// Removes and returns the least recently used value.
    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    // == Remove ==
    /// Unlinks a node and frees its slot.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        self.node(id)?;
        self.detach(id);

        let slot = &mut self.slots[id.index];
        let node = slot.node.take()?;
        slot.generation += 1;
        self.free.push(id.index);
        self.len -= 1;
        Some(node.value)
    }

    // == Clear ==
    /// Drops every node.
    ///
    /// Slots are released rather than bumped, so ids issued before the clear
    /// could alias new nodes; callers must discard them along with the list
    /// contents.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates `(id, value)` pairs from least to most recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Splices `id` out of the chain, leaving its own links cleared.
    fn detach(&mut self, id: NodeId) {
        let (prev, next) = match self.node_mut(id) {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.node_mut(prev_id) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_id) => {
                if let Some(next_node) = self.node_mut(next_id) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    /// Links a detached node in after the current tail.
    fn attach_back(&mut self, id: NodeId) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(id) {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(tail_id) => {
                if let Some(tail_node) = self.node_mut(tail_id) {
                    tail_node.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    #[cfg(test)]
    fn assert_links_consistent(&self) {
        let mut count = 0;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let node = self.node(id).expect("linked id must be live");
            assert_eq!(node.prev, prev, "prev link mismatch");
            prev = Some(id);
            current = node.next;
            count += 1;
        }
        assert_eq!(prev, self.tail, "walk must end at tail");
        assert_eq!(count, self.len, "walk length must equal len");
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterator ==
/// Iterator over a [`RecencyList`], least recently used first.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<NodeId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.node(id)?;
        self.current = node.next;
        Some((id, &node.value))
    }
}
