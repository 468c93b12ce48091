use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::MaterializedPath;

/// A document that takes part in a tree.
///
/// Besides its payload (`name` and `body`, which the tree logic never looks
/// at) a node carries its parent link and a cached materialized path.
///
/// A `Node` value is a snapshot. Mutations made through a
/// [`Tree`](crate::Tree) update the snapshot they are given, but other
/// snapshots of the same node (or of its descendants) go stale until they are
/// reloaded.
///
/// Equality and hashing use the identifier only, so a stale snapshot compares
/// equal to a fresh one.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) body: String,
    pub(crate) created: DateTime<Utc>,
    pub(crate) position: u64,
    pub(crate) parent_id: Option<Uuid>,
    pub(crate) path: MaterializedPath,
    pub(crate) depth: usize,
}

impl Node {
    /// The unique, stable identifier of this node.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The display name of the node.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form content attached to the node.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// When the node was first created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Ordering stamp used for children, siblings and roots.
    ///
    /// Assigned by the store on creation and re-stamped whenever the node is
    /// attached through a [`Children`](crate::Children) collection.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// The identifier of the parent, or `None` for a root.
    #[must_use]
    pub const fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    /// Ancestor identifiers, root first.
    #[must_use]
    pub const fn path(&self) -> &MaterializedPath {
        &self.path
    }

    /// Number of ancestors.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Stage a new parent.
    ///
    /// Nothing is validated or persisted until the node is passed to
    /// [`Tree::save`](crate::Tree::save).
    pub const fn set_parent(&mut self, parent_id: Option<Uuid>) {
        self.parent_id = parent_id;
    }

    /// Stage a new name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Stage a new body.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Whether the node has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// `other` is somewhere below `self`.
    ///
    /// A path never contains its own node, so a node is never its own
    /// ancestor.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        other.path.contains(self.id)
    }

    /// `self == other`, or `self` is an ancestor of `other`.
    #[must_use]
    pub fn is_or_is_ancestor_of(&self, other: &Self) -> bool {
        self == other || self.is_ancestor_of(other)
    }

    /// `self` is somewhere below `other`.
    #[must_use]
    pub fn is_descendant_of(&self, other: &Self) -> bool {
        other.is_ancestor_of(self)
    }

    /// `self == other`, or `self` is a descendant of `other`.
    #[must_use]
    pub fn is_or_is_descendant_of(&self, other: &Self) -> bool {
        self == other || self.is_descendant_of(other)
    }

    /// Distinct nodes with the same parent. All roots are siblings.
    #[must_use]
    pub fn is_sibling_of(&self, other: &Self) -> bool {
        self != other && self.parent_id == other.parent_id
    }

    /// `self == other`, or the two are siblings.
    ///
    /// Unlike [`Node::is_sibling_of`], a node satisfies this with itself.
    #[must_use]
    pub fn is_or_is_sibling_of(&self, other: &Self) -> bool {
        self == other || self.is_sibling_of(other)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The fields of a node that does not exist yet.
///
/// The store fills in the identifier, position and creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNode {
    /// Display name.
    pub name: String,
    /// Free-form content.
    pub body: String,
    /// Parent link; `None` creates a root.
    pub parent_id: Option<Uuid>,
    /// Materialized path, which must agree with `parent_id`.
    pub path: MaterializedPath,
}

impl NewNode {
    /// A root node with the given name and an empty body.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Build the stored record. Used by [`Store`](crate::Store)
    /// implementations.
    #[must_use]
    pub fn into_node(self, id: Uuid, position: u64, created: DateTime<Utc>) -> Node {
        let depth = self.path.len();
        Node {
            id,
            name: self.name,
            body: self.body,
            created,
            position,
            parent_id: self.parent_id,
            path: self.path,
            depth,
        }
    }
}

/// Anything that identifies a node: a [`Node`] or a raw [`Uuid`].
pub trait NodeId {
    /// The identifier of the node.
    fn node_id(&self) -> Uuid;
}

impl NodeId for Uuid {
    fn node_id(&self) -> Uuid {
        *self
    }
}

impl NodeId for Node {
    fn node_id(&self) -> Uuid {
        self.id
    }
}

impl<T: NodeId + ?Sized> NodeId for &T {
    fn node_id(&self) -> Uuid {
        (**self).node_id()
    }
}

impl<T: NodeId + ?Sized> NodeId for &mut T {
    fn node_id(&self) -> Uuid {
        (**self).node_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(name: &str) -> Node {
        NewNode::new(name).into_node(Uuid::new_v4(), 0, Utc::now())
    }

    fn child(parent: &Node, name: &str) -> Node {
        NewNode {
            name: name.to_string(),
            body: String::new(),
            parent_id: Some(parent.id),
            path: MaterializedPath::child_of(&parent.path, parent.id),
        }
        .into_node(Uuid::new_v4(), 0, Utc::now())
    }

    #[test]
    fn depth_matches_path_length() {
        let a = root("a");
        let b = child(&a, "b");
        let c = child(&b, "c");

        assert_eq!(a.depth(), 0);
        assert_eq!(b.depth(), 1);
        assert_eq!(c.depth(), 2);
        assert_eq!(c.path().as_slice(), &[a.id(), b.id()]);
    }

    #[test]
    fn ancestry_predicates() {
        let a = root("a");
        let b = child(&a, "b");
        let c = child(&b, "c");
        let other = root("other");

        assert!(a.is_ancestor_of(&c));
        assert!(!c.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&a));
        assert!(a.is_or_is_ancestor_of(&a));
        assert!(!other.is_or_is_ancestor_of(&c));

        assert!(c.is_descendant_of(&a));
        assert!(!a.is_descendant_of(&c));
        assert!(!b.is_descendant_of(&b));
        assert!(b.is_or_is_descendant_of(&b));
    }

    #[test]
    fn sibling_predicates() {
        let a = root("a");
        let b = child(&a, "b");
        let c = child(&a, "c");
        let other = root("other");

        assert!(b.is_sibling_of(&c));
        assert!(a.is_sibling_of(&other));
        assert!(!b.is_sibling_of(&b));
        assert!(!a.is_sibling_of(&b));

        assert!(b.is_or_is_sibling_of(&b));
        assert!(b.is_or_is_sibling_of(&c));
        assert!(!a.is_or_is_sibling_of(&b));
    }

    #[test]
    fn equality_is_by_identity() {
        let a = root("a");
        let mut renamed = a.clone();
        renamed.set_name("renamed");
        renamed.set_parent(Some(Uuid::new_v4()));

        assert_eq!(a, renamed);
        assert_ne!(a, root("a"));
    }

    #[test]
    fn node_id_accepts_nodes_and_raw_ids() {
        let a = root("a");
        let by_ref: &Node = &a;
        assert_eq!(a.node_id(), a.id());
        assert_eq!(by_ref.node_id(), a.id());
        assert_eq!(a.id().node_id(), a.id());
    }
}
