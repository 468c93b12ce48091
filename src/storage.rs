//! Backing stores for tree nodes.
//!
//! A [`Store`] is a flat collection of [`Node`] records keyed by identifier.
//! It knows nothing about tree invariants; the [`Tree`](crate::Tree) is
//! responsible for keeping `parent_id`, `path` and `depth` consistent.

use std::{io, path::PathBuf};

use uuid::Uuid;

use crate::domain::{NewNode, Node};

pub mod directory;
pub mod markdown;
mod memory;

pub use directory::{Directory, DirectoryLoadError};
pub use markdown::MarkdownNode;
pub use memory::MemoryStore;

/// Selects nodes by field value.
///
/// Results are always ordered by [`Node::position`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every node.
    All,
    /// Nodes whose `parent_id` equals the given value (`None` selects roots).
    Parent(Option<Uuid>),
    /// Nodes whose materialized path contains the identifier, i.e. its
    /// descendants.
    PathContains(Uuid),
    /// Nodes with any of the given identifiers.
    Ids(Vec<Uuid>),
    /// Nodes with exactly this name.
    Name(String),
}

impl Filter {
    /// Whether `node` is selected by this filter.
    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Self::All => true,
            Self::Parent(parent_id) => node.parent_id == *parent_id,
            Self::PathContains(id) => node.path.contains(*id),
            Self::Ids(ids) => ids.contains(&node.id),
            Self::Name(name) => node.name == *name,
        }
    }
}

/// Persistence operations required by the tree logic.
///
/// Writes are raw: a store never validates tree structure. Failures here are
/// infrastructure failures (I/O, corrupt data), not rejected operations.
pub trait Store {
    /// Persist a new node, assigning its identifier, position and creation
    /// time.
    ///
    /// # Errors
    ///
    /// Returns an error if the node cannot be written.
    fn create(&mut self, node: NewNode) -> Result<Node, StoreError>;

    /// Look up a node by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn find(&self, id: Uuid) -> Result<Option<Node>, StoreError>;

    /// All nodes matching `filter`, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn find_by(&self, filter: &Filter) -> Result<Vec<Node>, StoreError>;

    /// Insert or overwrite a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node cannot be written.
    fn save(&mut self, node: &Node) -> Result<(), StoreError>;

    /// Delete a node. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the node exists but cannot be removed.
    fn destroy(&mut self, id: Uuid) -> Result<bool, StoreError>;

    /// Reserve the next position stamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be advanced.
    fn next_position(&mut self) -> Result<u64, StoreError>;

    /// Refresh `node` from the store. Returns `false` if it no longer exists,
    /// leaving `node` untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn reload(&self, node: &mut Node) -> Result<bool, StoreError> {
        match self.find(node.id)? {
            Some(fresh) => {
                *node = fresh;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Every node, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn all(&self) -> Result<Vec<Node>, StoreError> {
        self.find_by(&Filter::All)
    }
}

/// Errors raised by a [`Store`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A stored node could not be decoded.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: markdown::LoadError,
    },
    /// Two records claim the same identifier.
    #[error("duplicate node identifier {0}")]
    DuplicateId(Uuid),
}
