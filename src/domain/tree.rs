//! Tree maintenance over a flat store of nodes.
//!
//! The [`Tree`] knows nothing about how nodes are persisted. It keeps the
//! materialized path of every node consistent with its parent link, rejects
//! reparenting operations that would introduce a cycle, and answers
//! relationship queries from the stored `path` and `parent_id` fields.
//!
//! Parent links are the source of truth. Paths are a cache: every save
//! recomputes the saved node's path and walks its subtree, rewriting any
//! descendant whose path is stale. An interrupted cascade is therefore healed
//! by the next save of the same node, or by [`Tree::repair`].

use std::collections::{HashMap, HashSet};

use nonempty::NonEmpty;
use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    domain::{
        Children, Config, DanglingParent, MaterializedPath, NewNode, Node, NodeId,
    },
    storage::{Filter, MemoryStore, Store, StoreError},
};

/// A hierarchy of nodes layered over a [`Store`].
#[derive(Debug)]
pub struct Tree<S = MemoryStore> {
    store: S,
    config: Config,
}

/// Errors that can occur when reading or modifying a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The node could not be found.
    #[error("node {0} not found")]
    NotFound(Uuid),
    /// The requested new parent could not be found.
    #[error("parent node {0} not found")]
    ParentNotFound(Uuid),
    /// Moving the node under the parent would make it its own ancestor.
    #[error("moving {node} under {parent} would create a cycle")]
    Cycle {
        /// The node being moved.
        node: Uuid,
        /// The rejected parent.
        parent: Uuid,
    },
    /// A stored parent link points at a node that no longer exists.
    #[error("node {node} refers to missing parent {parent}")]
    DanglingParent {
        /// The node holding the link.
        node: Uuid,
        /// The missing parent.
        parent: Uuid,
    },
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A structural problem found by [`Tree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// `parent_id` refers to a node that does not exist.
    DanglingParent {
        /// The node holding the link.
        node: Uuid,
        /// The missing parent.
        parent: Uuid,
    },
    /// The stored path does not match the parent links.
    StalePath {
        /// The affected node.
        node: Uuid,
        /// Path derived from the parent links.
        expected: MaterializedPath,
        /// Path found in the store.
        actual: MaterializedPath,
    },
    /// The stored depth does not match the stored path.
    StaleDepth {
        /// The affected node.
        node: Uuid,
        /// Length of the stored path.
        expected: usize,
        /// Depth found in the store.
        actual: usize,
    },
    /// Parent links form a loop. Members are sorted.
    Cycle(Vec<Uuid>),
}

/// Failure report from [`Tree::repair`].
///
/// Repair does not stop at the first problem; everything that could be fixed
/// was fixed.
#[derive(Debug, Error)]
#[error("{} node(s) could not be repaired", failures.len())]
pub struct RepairError {
    /// Nodes that were rewritten before the failures were collected.
    pub repaired: Vec<Uuid>,
    /// The problems that remain.
    pub failures: NonEmpty<TreeError>,
}

impl Tree<MemoryStore> {
    /// A tree over an empty [`MemoryStore`] with the default configuration.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }
}

impl<S: Store + Default> Default for Tree<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Store> Tree<S> {
    /// Wrap a store using the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, Config::default())
    }

    /// Wrap a store.
    pub const fn with_config(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub(crate) const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Unwrap the backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Create a root node with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the node.
    pub fn create(&mut self, name: impl Into<String>) -> Result<Node, TreeError> {
        self.create_node(NewNode::new(name))
    }

    /// Create a node directly below `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::ParentNotFound`] if the parent does not exist.
    pub fn create_child(
        &mut self,
        parent: impl NodeId,
        name: impl Into<String>,
    ) -> Result<Node, TreeError> {
        self.create_node(NewNode {
            parent_id: Some(parent.node_id()),
            ..NewNode::new(name)
        })
    }

    /// Create a node from a draft. The draft's path is ignored and derived
    /// from its parent.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::ParentNotFound`] if the draft names a parent that
    /// does not exist.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn create_node(&mut self, mut draft: NewNode) -> Result<Node, TreeError> {
        draft.path = match draft.parent_id {
            None => MaterializedPath::root(),
            Some(parent_id) => {
                let parent = self
                    .store
                    .find(parent_id)?
                    .ok_or(TreeError::ParentNotFound(parent_id))?;
                MaterializedPath::child_of(&parent.path, parent.id)
            }
        };

        let node = self.store.create(draft)?;
        tracing::debug!(id = %node.id, depth = node.depth, "created node");
        Ok(node)
    }

    /// Look up a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn find(&self, id: Uuid) -> Result<Option<Node>, TreeError> {
        Ok(self.store.find(id)?)
    }

    /// Refresh a snapshot from the store. Returns `false` if the node no
    /// longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn reload(&self, node: &mut Node) -> Result<bool, TreeError> {
        Ok(self.store.reload(node)?)
    }

    /// A live view of the children of `owner`, through which children can be
    /// attached and detached.
    pub fn children_of(&mut self, owner: impl NodeId) -> Children<'_, S> {
        Children::new(self, owner.node_id())
    }

    /// Start a batch of changes to a stored node, applied by
    /// [`Edit::commit`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if the node does not exist.
    pub fn edit(&mut self, id: Uuid) -> Result<Edit<'_, S>, TreeError> {
        let node = self.fetch(id)?;
        Ok(Edit { tree: self, node })
    }

    /// Persist the staged fields of `node`.
    ///
    /// The node's path and depth are recomputed from its (possibly new)
    /// parent and its subtree is brought up to date. On success `node` holds
    /// the stored state. If the parent is rejected nothing is written; a store
    /// failure during the cascade leaves stale descendants that the next save
    /// of `node` repairs.
    ///
    /// # Errors
    ///
    /// - [`TreeError::NotFound`] if the node was never created or has been
    ///   destroyed
    /// - [`TreeError::ParentNotFound`] if a newly assigned parent does not
    ///   exist
    /// - [`TreeError::Cycle`] if the parent is the node itself or one of its
    ///   descendants
    /// - [`TreeError::DanglingParent`] if the existing parent has vanished and
    ///   the configuration rejects dangling links
    #[instrument(skip(self, node), fields(id = %node.id))]
    pub fn save(&mut self, node: &mut Node) -> Result<(), TreeError> {
        let stored = self.fetch(node.id)?;
        let reparented = stored.parent_id != node.parent_id;

        // Resolving the parent is the last read before the write.
        let mut placed = node.clone();
        self.place(&mut placed, reparented)?;
        self.store.save(&placed)?;
        *node = placed;

        if reparented {
            tracing::info!(parent = ?node.parent_id, depth = node.depth, "reparented node");
        }

        self.cascade(node.id)?;
        Ok(())
    }

    /// Move `node` under `parent` (or make it a root), validating and
    /// persisting immediately.
    ///
    /// On failure `node` is restored to the snapshot it had before the call.
    /// A store error raised by the cascade happens after `node` itself was
    /// written, so the store may already hold the new parent; call
    /// [`Tree::reload`] to pick up the stored state.
    ///
    /// # Errors
    ///
    /// See [`Tree::save`].
    pub fn reparent(&mut self, node: &mut Node, parent: Option<Uuid>) -> Result<(), TreeError> {
        let previous = node.clone();
        node.parent_id = parent;
        self.save(node).inspect_err(|_| *node = previous)
    }

    /// Recompute the path and depth of `node` from its parent and persist
    /// them. Descendants are not touched; see [`Tree::cascade`].
    ///
    /// Returns `true` if anything changed. Calling this twice in a row is a
    /// no-op the second time.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent cannot be resolved (see [`Tree::save`]).
    pub fn recompute(&mut self, node: &mut Node) -> Result<bool, TreeError> {
        let before = (node.parent_id, node.path.clone(), node.depth);
        self.place(node, false)?;

        let changed = before != (node.parent_id, node.path.clone(), node.depth);
        if changed {
            self.store.save(node)?;
        }
        Ok(changed)
    }

    /// Bring the subtree below `id` up to date with the node's stored path.
    ///
    /// Walks parent links with an explicit stack, rewriting every descendant
    /// whose path or depth is stale. Returns the rewritten identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if the node does not exist.
    #[instrument(skip(self))]
    pub fn cascade(&mut self, id: Uuid) -> Result<Vec<Uuid>, TreeError> {
        let root = self.fetch(id)?;
        let mut rewritten = Vec::new();
        let mut visited = HashSet::from([root.id]);
        let mut stack = vec![root];

        while let Some(parent) = stack.pop() {
            for mut child in self.store.find_by(&Filter::Parent(Some(parent.id)))? {
                if !visited.insert(child.id) {
                    tracing::warn!(id = %child.id, "parent links loop back, skipping");
                    continue;
                }

                let path = MaterializedPath::child_of(&parent.path, parent.id);
                if child.path != path || child.depth != path.len() {
                    tracing::debug!(id = %child.id, %path, "rewriting stale path");
                    child.depth = path.len();
                    child.path = path;
                    self.store.save(&child)?;
                    rewritten.push(child.id);
                }
                stack.push(child);
            }
        }

        Ok(rewritten)
    }

    /// Delete a node together with its entire subtree.
    ///
    /// Descendants are removed deepest first, so an interrupted destroy never
    /// leaves a node whose parent is gone. Returns `false` if the node did not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails part-way through.
    #[instrument(skip(self, target), fields(id = %target.node_id()))]
    pub fn destroy(&mut self, target: impl NodeId) -> Result<bool, TreeError> {
        let Some(node) = self.store.find(target.node_id())? else {
            return Ok(false);
        };

        let subtree = self.subtree_ids(&node)?;
        for id in subtree.iter().rev() {
            self.store.destroy(*id)?;
        }

        tracing::info!(removed = subtree.len(), "destroyed subtree");
        Ok(true)
    }

    /// Check every stored node against the tree invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn validate(&self) -> Result<Vec<Inconsistency>, TreeError> {
        let nodes = self.store.all()?;
        let by_id: HashMap<Uuid, &Node> = nodes.iter().map(|n| (n.id, n)).collect();
        let mut problems = Vec::new();

        for node in &nodes {
            if let Some(parent) = node.parent_id {
                if !by_id.contains_key(&parent) {
                    problems.push(Inconsistency::DanglingParent {
                        node: node.id,
                        parent,
                    });
                }
            }

            if let Some(expected) = expected_path(&by_id, node) {
                if expected != node.path {
                    problems.push(Inconsistency::StalePath {
                        node: node.id,
                        expected,
                        actual: node.path.clone(),
                    });
                }
            }

            if node.depth != node.path.len() {
                problems.push(Inconsistency::StaleDepth {
                    node: node.id,
                    expected: node.path.len(),
                    actual: node.depth,
                });
            }
        }

        problems.extend(parent_cycles(&nodes).into_iter().map(Inconsistency::Cycle));
        Ok(problems)
    }

    /// Recompute every path from the parent links.
    ///
    /// Dangling parents are handled according to
    /// [`Config::dangling_parent`]. Returns the identifiers of rewritten
    /// nodes.
    ///
    /// # Errors
    ///
    /// Returns a [`RepairError`] listing the problems that could not be fixed:
    /// dangling parents under [`DanglingParent::Reject`], parent-link cycles,
    /// and store failures. Everything else is still repaired.
    #[instrument(skip(self))]
    pub fn repair(&mut self) -> Result<Vec<Uuid>, RepairError> {
        let mut repaired = Vec::new();
        let mut failures = Vec::new();

        let nodes = match self.store.all() {
            Ok(nodes) => nodes,
            Err(e) => {
                return Err(RepairError {
                    repaired,
                    failures: NonEmpty::new(e.into()),
                });
            }
        };
        let existing: HashSet<Uuid> = nodes.iter().map(|n| n.id).collect();

        for mut node in nodes {
            let dangling = node.parent_id.filter(|p| !existing.contains(p));
            let is_root = node.parent_id.is_none();
            if dangling.is_none() && !is_root {
                continue;
            }

            match self.recompute(&mut node) {
                Ok(true) => repaired.push(node.id),
                Ok(false) => {}
                Err(e) => {
                    failures.push(e);
                    continue;
                }
            }

            match self.cascade(node.id) {
                Ok(ids) => repaired.extend(ids),
                Err(e) => failures.push(e),
            }
        }

        match self.store.all() {
            Ok(nodes) => {
                for cycle in parent_cycles(&nodes) {
                    let node = cycle[0];
                    let parent = nodes
                        .iter()
                        .find(|n| n.id == node)
                        .and_then(|n| n.parent_id)
                        .unwrap_or(node);
                    failures.push(TreeError::Cycle { node, parent });
                }
            }
            Err(e) => failures.push(e.into()),
        }

        tracing::info!(repaired = repaired.len(), failed = failures.len(), "repair finished");

        match NonEmpty::from_vec(failures) {
            Some(failures) => Err(RepairError { repaired, failures }),
            None => Ok(repaired),
        }
    }
}

/// Relationship queries.
///
/// All queries read the stored `path` and `parent_id` fields; the snapshot
/// passed in only supplies the starting identifiers.
impl<S: Store> Tree<S> {
    /// All nodes without a parent, in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn roots(&self) -> Result<Vec<Node>, TreeError> {
        Ok(self.store.find_by(&Filter::Parent(None))?)
    }

    /// The outermost ancestor of `node`, or `node` itself for a root.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if the recorded root no longer exists.
    pub fn root(&self, node: &Node) -> Result<Node, TreeError> {
        match node.path.first() {
            Some(root) => self.fetch(root),
            None => Ok(node.clone()),
        }
    }

    /// The parent of `node`, or `None` for a root.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn parent(&self, node: &Node) -> Result<Option<Node>, TreeError> {
        match node.parent_id {
            Some(parent) => self.find(parent),
            None => Ok(None),
        }
    }

    /// Ancestors of `node`, root first.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if an ancestor recorded in the path no
    /// longer exists.
    pub fn ancestors(&self, node: &Node) -> Result<Vec<Node>, TreeError> {
        if node.path.is_empty() {
            return Ok(Vec::new());
        }

        let found = self
            .store
            .find_by(&Filter::Ids(node.path.as_slice().to_vec()))?;
        let mut by_id: HashMap<Uuid, Node> = found.into_iter().map(|n| (n.id, n)).collect();

        node.path
            .iter()
            .map(|id| by_id.remove(&id).ok_or(TreeError::NotFound(id)))
            .collect()
    }

    /// [`Tree::ancestors`] followed by `node`.
    ///
    /// # Errors
    ///
    /// See [`Tree::ancestors`].
    pub fn self_and_ancestors(&self, node: &Node) -> Result<Vec<Node>, TreeError> {
        let mut nodes = self.ancestors(node)?;
        nodes.push(node.clone());
        Ok(nodes)
    }

    /// Direct children of `node`, in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn children(&self, node: impl NodeId) -> Result<Vec<Node>, TreeError> {
        Ok(self.store.find_by(&Filter::Parent(Some(node.node_id())))?)
    }

    /// Every node below `node`, in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn descendants(&self, node: impl NodeId) -> Result<Vec<Node>, TreeError> {
        Ok(self.store.find_by(&Filter::PathContains(node.node_id()))?)
    }

    /// `node` followed by [`Tree::descendants`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn self_and_descendants(&self, node: &Node) -> Result<Vec<Node>, TreeError> {
        let mut nodes = vec![node.clone()];
        nodes.extend(self.descendants(node)?);
        Ok(nodes)
    }

    /// Descendants of `node` that have no children.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn leaves(&self, node: impl NodeId) -> Result<Vec<Node>, TreeError> {
        let descendants = self.descendants(node)?;
        let parents: HashSet<Uuid> = descendants.iter().filter_map(|n| n.parent_id).collect();
        Ok(descendants
            .into_iter()
            .filter(|n| !parents.contains(&n.id))
            .collect())
    }

    /// Whether `node` has no children.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_leaf(&self, node: impl NodeId) -> Result<bool, TreeError> {
        Ok(self.children(node)?.is_empty())
    }

    /// Other nodes with the same parent as `node`. For a root, the other
    /// roots.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn siblings(&self, node: &Node) -> Result<Vec<Node>, TreeError> {
        let mut nodes = self.store.find_by(&Filter::Parent(node.parent_id))?;
        nodes.retain(|n| n.id != node.id);
        Ok(nodes)
    }

    /// [`Tree::siblings`] plus `node` itself, exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn self_and_siblings(&self, node: &Node) -> Result<Vec<Node>, TreeError> {
        let mut nodes = self.store.find_by(&Filter::Parent(node.parent_id))?;
        if !nodes.contains(node) {
            nodes.push(node.clone());
        }
        Ok(nodes)
    }
}

impl<S: Store> Tree<S> {
    fn fetch(&self, id: Uuid) -> Result<Node, TreeError> {
        self.store.find(id)?.ok_or(TreeError::NotFound(id))
    }

    /// Set `node.path` and `node.depth` from its parent link, checking for
    /// cycles.
    ///
    /// A missing parent is an error when the link was just assigned; for an
    /// existing link the dangling-parent policy applies.
    fn place(&self, node: &mut Node, newly_assigned: bool) -> Result<(), TreeError> {
        let path = match node.parent_id {
            None => MaterializedPath::root(),
            Some(parent_id) => match self.store.find(parent_id)? {
                Some(parent) => {
                    if parent.id == node.id
                        || parent.path.contains(node.id)
                        || self.links_reach(&parent, node.id)?
                    {
                        return Err(TreeError::Cycle {
                            node: node.id,
                            parent: parent.id,
                        });
                    }
                    MaterializedPath::child_of(&parent.path, parent.id)
                }
                None if newly_assigned => return Err(TreeError::ParentNotFound(parent_id)),
                None => match self.config.dangling_parent {
                    DanglingParent::Reject => {
                        return Err(TreeError::DanglingParent {
                            node: node.id,
                            parent: parent_id,
                        });
                    }
                    DanglingParent::Promote => {
                        tracing::warn!(id = %node.id, parent = %parent_id, "promoting node with missing parent to root");
                        node.parent_id = None;
                        MaterializedPath::root()
                    }
                },
            },
        };

        node.depth = path.len();
        node.path = path;
        Ok(())
    }

    /// Whether following parent links up from `start` reaches `target`.
    ///
    /// Stored paths can lag behind the links after an interrupted cascade, so
    /// the cycle check cannot trust them alone.
    fn links_reach(&self, start: &Node, target: Uuid) -> Result<bool, TreeError> {
        let mut visited = HashSet::from([start.id]);
        let mut current = start.parent_id;

        while let Some(id) = current {
            if id == target {
                return Ok(true);
            }
            if !visited.insert(id) {
                break;
            }
            current = self.store.find(id)?.and_then(|ancestor| ancestor.parent_id);
        }

        Ok(false)
    }

    /// `node` and everything below it by parent links, parents before
    /// children.
    fn subtree_ids(&self, node: &Node) -> Result<Vec<Uuid>, TreeError> {
        let mut order = vec![node.id];
        let mut visited = HashSet::from([node.id]);
        let mut next = 0;

        while let Some(&id) = order.get(next) {
            next += 1;
            for child in self.store.find_by(&Filter::Parent(Some(id)))? {
                if visited.insert(child.id) {
                    order.push(child.id);
                }
            }
        }

        Ok(order)
    }
}

/// The path implied by following parent links to a root, or `None` if the
/// links dangle or loop.
fn expected_path(by_id: &HashMap<Uuid, &Node>, node: &Node) -> Option<MaterializedPath> {
    let mut chain = Vec::new();
    let mut seen = HashSet::from([node.id]);
    let mut current = node.parent_id;

    while let Some(parent_id) = current {
        if !seen.insert(parent_id) {
            return None;
        }
        let parent = by_id.get(&parent_id)?;
        chain.push(parent_id);
        current = parent.parent_id;
    }

    chain.reverse();
    MaterializedPath::try_from(chain).ok()
}

/// Groups of nodes whose parent links form a loop.
fn parent_cycles(nodes: &[Node]) -> Vec<Vec<Uuid>> {
    let mut graph: DiGraphMap<Uuid, ()> = DiGraphMap::with_capacity(nodes.len(), nodes.len());
    for node in nodes {
        graph.add_node(node.id);
        if let Some(parent) = node.parent_id {
            graph.add_edge(node.id, parent, ());
        }
    }

    let mut cycles = Vec::new();
    for mut component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&id| graph.contains_edge(id, id));
        if is_cycle {
            component.sort();
            cycles.push(component);
        }
    }

    cycles.sort();
    cycles
}

/// Staged changes to a stored node.
///
/// Nothing is validated or written until [`Edit::commit`].
#[derive(Debug)]
#[must_use = "changes are only applied by `commit`"]
pub struct Edit<'t, S: Store> {
    tree: &'t mut Tree<S>,
    node: Node,
}

impl<S: Store> Edit<'_, S> {
    /// Stage a new parent (`None` detaches the node).
    pub fn set_parent(mut self, parent: Option<Uuid>) -> Self {
        self.node.parent_id = parent;
        self
    }

    /// Stage a new name.
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.node.name = name.into();
        self
    }

    /// Stage a new body.
    pub fn set_body(mut self, body: impl Into<String>) -> Self {
        self.node.body = body.into();
        self
    }

    /// Validate and persist the staged changes, returning the stored node.
    ///
    /// # Errors
    ///
    /// See [`Tree::save`]. On error nothing is written.
    pub fn commit(self) -> Result<Node, TreeError> {
        let Self { tree, mut node } = self;
        tree.save(&mut node)?;
        Ok(node)
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::{Node, Store, Tree};

    /// The reference tree used throughout the tests:
    ///
    /// ```text
    /// Root 1
    /// ├── Child 1
    /// ├── Child 2
    /// │   └── Child 2.1
    /// └── Child 3
    /// Root 2
    /// ```
    pub struct Fixture {
        pub root_1: Node,
        pub child_1: Node,
        pub child_2: Node,
        pub child_2_1: Node,
        pub child_3: Node,
        pub root_2: Node,
    }

    impl Fixture {
        /// Builds the tree the way a user would: create everything as roots,
        /// then attach through the children collections.
        pub fn build<S: Store>(tree: &mut Tree<S>) -> Self {
            let root_1 = tree.create("Root 1").unwrap();
            let mut child_1 = tree.create("Child 1").unwrap();
            let mut child_2 = tree.create("Child 2").unwrap();
            let mut child_2_1 = tree.create("Child 2.1").unwrap();
            let mut child_3 = tree.create("Child 3").unwrap();
            let root_2 = tree.create("Root 2").unwrap();

            let mut children = tree.children_of(&root_1);
            children.append(&mut child_1).unwrap();
            children.append(&mut child_2).unwrap();
            children.append(&mut child_3).unwrap();

            tree.children_of(&child_2).append(&mut child_2_1).unwrap();

            Self {
                root_1,
                child_1,
                child_2,
                child_2_1,
                child_3,
                root_2,
            }
        }
    }

    /// Compare two node lists as sets.
    pub fn same_set(actual: &[Node], expected: &[&Node]) -> bool {
        actual.len() == expected.len() && expected.iter().all(|n| actual.contains(n))
    }
}
