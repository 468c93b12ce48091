//! An in-memory store of nodes
//!
//! The [`MemoryStore`] is the simplest [`Store`]: nodes are held contiguously
//! with an index from identifier to slot. It also serves as the index behind
//! the filesystem-backed [`Directory`](crate::Directory).

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{NewNode, Node},
    storage::{Filter, Store, StoreError},
};

/// A [`Store`] that keeps every node in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    /// The nodes, stored contiguously in no particular order.
    nodes: Vec<Node>,

    /// An index from identifier to position in `nodes`.
    index: HashMap<Uuid, usize>,

    /// The next position stamp to hand out.
    next_position: u64,
}

impl MemoryStore {
    /// Creates an empty store with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            next_position: 0,
        }
    }

    /// Inserts an existing record, as read back from durable storage.
    ///
    /// The position counter is advanced past the record's position.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if a node with the same identifier
    /// is already present.
    pub fn insert(&mut self, node: Node) -> Result<(), StoreError> {
        if self.index.contains_key(&node.id) {
            return Err(StoreError::DuplicateId(node.id));
        }
        self.next_position = self.next_position.max(node.position + 1);
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Borrow a node by identifier.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Node> {
        self.index.get(&id).and_then(|&slot| self.nodes.get(slot))
    }

    /// Number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn select(&self, filter: &Filter) -> Vec<Node> {
        let mut selected: Vec<Node> = match filter {
            Filter::Ids(ids) => ids.iter().filter_map(|id| self.get(*id)).cloned().collect(),
            _ => self
                .nodes
                .iter()
                .filter(|node| filter.matches(node))
                .cloned()
                .collect(),
        };
        selected.sort_by_key(Node::position);
        selected
    }

    pub(crate) fn put(&mut self, node: &Node) {
        self.next_position = self.next_position.max(node.position + 1);
        if let Some(&slot) = self.index.get(&node.id) {
            self.nodes[slot] = node.clone();
        } else {
            self.index.insert(node.id, self.nodes.len());
            self.nodes.push(node.clone());
        }
    }

    pub(crate) fn remove(&mut self, id: Uuid) -> Option<Node> {
        let slot = self.index.remove(&id)?;
        let removed = self.nodes.swap_remove(slot);

        // The last node now lives in the vacated slot.
        if let Some(moved) = self.nodes.get(slot) {
            self.index.insert(moved.id, slot);
        }

        Some(removed)
    }

    pub(crate) const fn reserve_position(&mut self) -> u64 {
        let position = self.next_position;
        self.next_position += 1;
        position
    }
}

impl Store for MemoryStore {
    fn create(&mut self, node: NewNode) -> Result<Node, StoreError> {
        let position = self.reserve_position();
        let node = node.into_node(Uuid::new_v4(), position, Utc::now());
        self.put(&node);
        Ok(node)
    }

    fn find(&self, id: Uuid) -> Result<Option<Node>, StoreError> {
        Ok(self.get(id).cloned())
    }

    fn find_by(&self, filter: &Filter) -> Result<Vec<Node>, StoreError> {
        Ok(self.select(filter))
    }

    fn save(&mut self, node: &Node) -> Result<(), StoreError> {
        self.put(node);
        Ok(())
    }

    fn destroy(&mut self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.remove(id).is_some())
    }

    fn next_position(&mut self) -> Result<u64, StoreError> {
        Ok(self.reserve_position())
    }
}

impl Extend<Node> for MemoryStore {
    fn extend<T: IntoIterator<Item = Node>>(&mut self, iter: T) {
        for node in iter {
            self.put(&node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_increasing_positions() {
        let mut store = MemoryStore::default();
        let a = store.create(NewNode::new("a")).unwrap();
        let b = store.create(NewNode::new("b")).unwrap();

        assert_ne!(a.id(), b.id());
        assert!(a.position() < b.position());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn find_by_orders_by_position() {
        let mut store = MemoryStore::default();
        let a = store.create(NewNode::new("a")).unwrap();
        let mut b = store.create(NewNode::new("b")).unwrap();
        let c = store.create(NewNode::new("c")).unwrap();

        // Re-stamping moves `b` to the end.
        b.position = store.next_position().unwrap();
        store.save(&b).unwrap();

        let names: Vec<_> = store
            .all()
            .unwrap()
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(names, ["a", "c", "b"]);

        let selected = store.find_by(&Filter::Ids(vec![c.id(), a.id()])).unwrap();
        assert_eq!(selected, vec![a, c]);
    }

    #[test]
    fn destroy_keeps_index_consistent() {
        let mut store = MemoryStore::default();
        let a = store.create(NewNode::new("a")).unwrap();
        let b = store.create(NewNode::new("b")).unwrap();
        let c = store.create(NewNode::new("c")).unwrap();

        assert!(store.destroy(a.id()).unwrap());
        assert!(!store.destroy(a.id()).unwrap());

        assert!(store.find(a.id()).unwrap().is_none());
        assert_eq!(store.find(b.id()).unwrap().unwrap().name(), "b");
        assert_eq!(store.find(c.id()).unwrap().unwrap().name(), "c");
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut store = MemoryStore::default();
        let a = store.create(NewNode::new("a")).unwrap();

        let err = store.insert(a.clone()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == a.id()));
    }

    #[test]
    fn insert_advances_position_counter() {
        let mut store = MemoryStore::default();
        let node = NewNode::new("loaded").into_node(Uuid::new_v4(), 41, Utc::now());
        store.insert(node).unwrap();

        assert_eq!(store.next_position().unwrap(), 42);
    }

    #[test]
    fn reload_refreshes_snapshot() {
        let mut store = MemoryStore::default();
        let a = store.create(NewNode::new("a")).unwrap();

        let mut stale = a.clone();
        let mut fresh = a;
        fresh.set_name("renamed");
        store.save(&fresh).unwrap();

        assert!(store.reload(&mut stale).unwrap());
        assert_eq!(stale.name(), "renamed");

        store.destroy(stale.id()).unwrap();
        assert!(!store.reload(&mut stale).unwrap());
    }
}
