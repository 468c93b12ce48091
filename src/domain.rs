//! Domain models for tree maintenance.
//!
//! This module contains the node record and its materialized path, the
//! [`Tree`] that keeps paths consistent with parent links, and configuration.

mod children;
pub use children::Children;

mod config;
pub use config::{Config, DanglingParent};

mod node;
pub use node::{NewNode, Node, NodeId};

mod path;
pub use path::{MaterializedPath, PathParseError};

pub(crate) mod tree;
pub use tree::{Edit, Inconsistency, RepairError, Tree, TreeError};
