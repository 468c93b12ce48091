use uuid::Uuid;

use crate::{
    domain::{Node, NodeId, Tree, TreeError},
    storage::Store,
};

/// The children of one node, as a mutable collection.
///
/// Reads always go to the store, so a `Children` never holds stale members.
/// Attaching a node re-stamps its position so that [`Children::list`] returns
/// children in the order they were attached.
///
/// Obtained from [`Tree::children_of`].
#[derive(Debug)]
pub struct Children<'t, S: Store> {
    tree: &'t mut Tree<S>,
    owner: Uuid,
}

impl<'t, S: Store> Children<'t, S> {
    pub(crate) const fn new(tree: &'t mut Tree<S>, owner: Uuid) -> Self {
        Self { tree, owner }
    }

    /// The node whose children these are.
    #[must_use]
    pub const fn owner(&self) -> Uuid {
        self.owner
    }

    /// The current children, in the order they were attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&self) -> Result<Vec<Node>, TreeError> {
        self.tree.children(self.owner)
    }

    /// Number of children.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn len(&self) -> Result<usize, TreeError> {
        Ok(self.list()?.len())
    }

    /// Whether there are no children.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_empty(&self) -> Result<bool, TreeError> {
        Ok(self.list()?.is_empty())
    }

    /// The earliest attached child.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn first(&self) -> Result<Option<Node>, TreeError> {
        Ok(self.list()?.into_iter().next())
    }

    /// Whether `node` is currently a child.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn contains(&self, node: impl NodeId) -> Result<bool, TreeError> {
        let id = node.node_id();
        Ok(self
            .tree
            .find(id)?
            .is_some_and(|n| n.parent_id == Some(self.owner)))
    }

    /// Attach `child` as the last child, persisting it (and its subtree)
    /// immediately.
    ///
    /// Appending a node that is already a child keeps its position but still
    /// saves it, which brings any stale paths in its subtree up to date. On
    /// failure `child` is left as it was.
    ///
    /// # Errors
    ///
    /// See [`Tree::save`]. In particular [`TreeError::Cycle`] if `child` is
    /// the owner or one of its ancestors.
    pub fn append(&mut self, child: &mut Node) -> Result<(), TreeError> {
        let existing = self
            .tree
            .find(child.id)?
            .filter(|stored| stored.parent_id == Some(self.owner));

        match existing {
            Some(stored) => {
                let previous = child.position;
                child.position = stored.position;
                self.tree
                    .reparent(child, Some(self.owner))
                    .inspect_err(|_| child.position = previous)
            }
            None => self.attach(child),
        }
    }

    /// Detach a child, making it a root. Accepts a node or a bare identifier.
    ///
    /// Returns the detached node, or `None` if it was not a child.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn delete(&mut self, child: impl NodeId) -> Result<Option<Node>, TreeError> {
        let Some(mut node) = self.tree.find(child.node_id())? else {
            return Ok(None);
        };
        if node.parent_id != Some(self.owner) {
            return Ok(None);
        }

        self.tree.reparent(&mut node, None)?;
        tracing::debug!(owner = %self.owner, child = %node.id, "detached child");
        Ok(Some(node))
    }

    /// Detach every child. Returns the detached nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn clear(&mut self) -> Result<Vec<Node>, TreeError> {
        let mut detached = self.list()?;
        for node in &mut detached {
            self.tree.reparent(node, None)?;
        }
        Ok(detached)
    }

    /// Make `nodes` the complete set of children, in the given order.
    ///
    /// Current children not in `nodes` are detached. Every node in `nodes` is
    /// checked before anything is written, so a cycle or a missing node leaves
    /// the tree unchanged. An empty slice clears the collection.
    ///
    /// # Errors
    ///
    /// - [`TreeError::NotFound`] if the owner or one of `nodes` does not exist
    /// - [`TreeError::Cycle`] if one of `nodes` is the owner or its ancestor
    pub fn replace(&mut self, nodes: &mut [Node]) -> Result<(), TreeError> {
        let owner = self
            .tree
            .find(self.owner)?
            .ok_or(TreeError::NotFound(self.owner))?;

        for node in nodes.iter() {
            if node.id == owner.id || owner.path.contains(node.id) {
                return Err(TreeError::Cycle {
                    node: node.id,
                    parent: owner.id,
                });
            }
            if self.tree.find(node.id)?.is_none() {
                return Err(TreeError::NotFound(node.id));
            }
        }

        for mut current in self.list()? {
            if !nodes.contains(&current) {
                self.tree.reparent(&mut current, None)?;
            }
        }

        for node in nodes.iter_mut() {
            self.attach(node)?;
        }
        Ok(())
    }

    fn attach(&mut self, child: &mut Node) -> Result<(), TreeError> {
        let previous = child.position;
        child.position = self.tree.store_mut().next_position()?;
        self.tree
            .reparent(child, Some(self.owner))
            .inspect_err(|_| child.position = previous)
    }
}
