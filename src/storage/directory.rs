//! A filesystem backed store of nodes
//!
//! The [`Directory`] keeps every node in a markdown file named after its
//! identifier. All nodes are read into an in-memory [`MemoryStore`] when the
//! directory is opened; writes go to disk first and then to the index, so the
//! index never holds state that was not persisted.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use chrono::Utc;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::{
    domain::{Config, NewNode, Node, Tree},
    storage::{
        markdown::{LoadError, MarkdownNode},
        Filter, MemoryStore, Store, StoreError,
    },
};

/// Name of the metadata directory, which is never scanned for nodes.
pub const METADATA_DIR: &str = ".arbor";

/// A filesystem backed store of nodes.
#[derive(Debug)]
pub struct Directory {
    /// The root of the directory nodes are stored in.
    root: PathBuf,
    config: Config,
    index: MemoryStore,
}

impl Directory {
    /// Load every node below `root`.
    ///
    /// # Errors
    ///
    /// This method has different behaviour depending on the configuration file
    /// in the root. If `allow_unrecognised` is `true`, then any markdown files
    /// whose names are not node identifiers, or that cannot be parsed, are
    /// skipped. If `allow_unrecognised` is `false` (the default), they make
    /// loading fail.
    ///
    /// Two files claiming the same identifier are always an error.
    pub fn open(root: PathBuf) -> Result<Self, DirectoryLoadError> {
        let config = load_config(&root);
        let md_paths = collect_markdown_paths(&root);

        let (nodes, unrecognised): (Vec<_>, Vec<_>) = md_paths
            .par_iter()
            .map(|path| try_load_node(path))
            .partition_map(|result| match result {
                Ok(node) => rayon::iter::Either::Left(node),
                Err(path) => rayon::iter::Either::Right(path),
            });

        if !config.allow_unrecognised && !unrecognised.is_empty() {
            return Err(DirectoryLoadError::UnrecognisedFiles(unrecognised));
        }

        let mut index = MemoryStore::with_capacity(nodes.len());
        for node in nodes {
            index.insert(node)?;
        }

        tracing::debug!(root = %root.display(), nodes = index.len(), "opened directory");
        Ok(Self {
            root,
            config,
            index,
        })
    }

    /// Load the directory and wrap it in a [`Tree`] using its configuration.
    ///
    /// # Errors
    ///
    /// See [`Directory::open`].
    pub fn open_tree(root: PathBuf) -> Result<Tree<Self>, DirectoryLoadError> {
        let directory = Self::open(root)?;
        let config = directory.config.clone();
        Ok(Tree::with_config(directory, config))
    }

    /// The directory nodes are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration read from `config.toml`, or the default.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Number of loaded nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the directory holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn write(&self, node: &Node) -> Result<(), StoreError> {
        MarkdownNode::from(node.clone())
            .save(&self.root)
            .map_err(|source| StoreError::Io {
                path: MarkdownNode::path_for(&self.root, node.id),
                source,
            })
    }
}

impl Store for Directory {
    fn create(&mut self, node: NewNode) -> Result<Node, StoreError> {
        let position = self.index.reserve_position();
        let node = node.into_node(Uuid::new_v4(), position, Utc::now());
        self.write(&node)?;
        self.index.put(&node);
        Ok(node)
    }

    fn find(&self, id: Uuid) -> Result<Option<Node>, StoreError> {
        self.index.find(id)
    }

    fn find_by(&self, filter: &Filter) -> Result<Vec<Node>, StoreError> {
        self.index.find_by(filter)
    }

    fn save(&mut self, node: &Node) -> Result<(), StoreError> {
        self.write(node)?;
        self.index.put(node);
        Ok(())
    }

    fn destroy(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let path = MarkdownNode::path_for(&self.root, id);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "node file already gone");
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        }
        Ok(self.index.remove(id).is_some())
    }

    fn next_position(&mut self) -> Result<u64, StoreError> {
        Ok(self.index.reserve_position())
    }
}

/// Errors that can occur when opening a [`Directory`].
#[derive(Debug, thiserror::Error)]
pub enum DirectoryLoadError {
    /// Markdown files that are not nodes were found.
    #[error("unrecognised files: {}", display_paths(.0))]
    UnrecognisedFiles(Vec<PathBuf>),
    /// The loaded nodes could not be indexed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn load_config(root: &Path) -> Config {
    let path = root.join("config.toml");
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

fn collect_markdown_paths(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != METADATA_DIR)
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension() == Some(OsStr::new("md")))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn try_load_node(path: &Path) -> Result<Node, PathBuf> {
    let id = match path
        .file_stem()
        .and_then(OsStr::to_str)
        .map(Uuid::parse_str)
    {
        Some(Ok(id)) => id,
        _ => {
            tracing::debug!("Skipping file without a node identifier: {}", path.display());
            return Err(path.to_path_buf());
        }
    };

    MarkdownNode::load_from_path(path, id)
        .map(Node::from)
        .map_err(|e: LoadError| {
            tracing::debug!("Failed to load node from {}: {e}", path.display());
            path.to_path_buf()
        })
}
