//! Materialized-path trees over a flat document store.
//!
//! Every node records its parent and the ordered list of its ancestors. The
//! ancestor list makes subtree queries a single filter on the store, at the
//! cost of rewriting descendants when a node moves. A [`Tree`] does that
//! rewriting, and refuses moves that would make a node its own ancestor.
//!
//! ```
//! use arbor::Tree;
//!
//! # fn main() -> Result<(), arbor::TreeError> {
//! let mut tree = Tree::in_memory();
//! let root = tree.create("Root")?;
//! let mut child = tree.create("Child")?;
//! let grandchild = tree.create_child(&child, "Grandchild")?;
//!
//! tree.children_of(&root).append(&mut child)?;
//!
//! let grandchild = tree.find(grandchild.id())?.unwrap();
//! assert_eq!(grandchild.depth(), 2);
//! assert!(root.is_ancestor_of(&grandchild));
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub use domain::{
    Children, Config, DanglingParent, Edit, Inconsistency, MaterializedPath, NewNode, Node,
    NodeId, RepairError, Tree, TreeError,
};

/// Backing stores for nodes, in memory and on the filesystem.
pub mod storage;
pub use storage::{Directory, Filter, MemoryStore, Store, StoreError};
