//! Markdown serialization for nodes.
//!
//! Each node is stored as `<id>.md`: YAML front matter holding the tree
//! fields, followed by a level-one heading with the node's name and then the
//! body.
//!
//! ```text
//! ---
//! _version: '1'
//! created: 2025-01-01T00:00:00Z
//! position: 3
//! parent: 67e55044-10b1-426f-9247-bb680e5fe0c8
//! path: 67e55044-10b1-426f-9247-bb680e5fe0c8
//! depth: 1
//! ---
//! # Child 1
//!
//! Body text.
//! ```

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{MaterializedPath, Node};

/// A node serialized in markdown format with YAML front matter.
#[derive(Debug, Clone)]
pub struct MarkdownNode {
    id: Uuid,
    frontmatter: FrontMatter,
    name: String,
    body: String,
}

impl MarkdownNode {
    /// The file name used for a node.
    #[must_use]
    pub fn file_name(id: Uuid) -> String {
        format!("{id}.md")
    }

    /// The file path of a node under `root`.
    #[must_use]
    pub fn path_for(root: &Path, id: Uuid) -> PathBuf {
        root.join(Self::file_name(id))
    }

    fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let frontmatter = serde_yaml::to_string(&self.frontmatter)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let heading = if self.name.is_empty() {
            "#".to_string()
        } else {
            format!("# {}", self.name)
        };

        let result = if self.body.is_empty() {
            format!("---\n{frontmatter}---\n{heading}\n")
        } else {
            format!("---\n{frontmatter}---\n{heading}\n\n{}\n", self.body)
        };

        writer.write_all(result.as_bytes())
    }

    /// Parse a node from its markdown representation.
    ///
    /// The identifier is not part of the file contents; it comes from the file
    /// name.
    ///
    /// # Errors
    ///
    /// Returns an error if the front matter is missing or malformed, or if
    /// there is no heading.
    pub fn read<R: BufRead>(reader: &mut R, id: Uuid) -> Result<Self, LoadError> {
        let mut lines = reader.lines();

        let first_line = lines
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "Empty input"))??;

        if first_line.trim() != "---" {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Expected frontmatter starting with '---'",
            )
            .into());
        }

        let frontmatter = lines
            .by_ref()
            .map_while(|line| match line {
                Ok(content) if content.trim() == "---" => None,
                Ok(content) => Some(Ok(content)),
                Err(e) => Some(Err(e)),
            })
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        let content = lines.collect::<Result<Vec<_>, _>>()?.join("\n");

        let frontmatter: FrontMatter = serde_yaml::from_str(&frontmatter)?;
        let (name, body) = parse_content(&content)?;

        Ok(Self {
            id,
            frontmatter,
            name,
            body,
        })
    }

    /// Load the node with the given identifier from `root`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if there is no such file, or another
    /// error if it cannot be read or parsed.
    pub fn load(root: &Path, id: Uuid) -> Result<Self, LoadError> {
        Self::load_from_path(&Self::path_for(root, id), id)
    }

    /// Load a node from a specific file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if there is no such file, or another
    /// error if it cannot be read or parsed.
    pub fn load_from_path(path: &Path, id: Uuid) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            _ => LoadError::Io(io_error),
        })?;

        let mut reader = BufReader::new(file);
        Self::read(&mut reader, id)
    }

    /// Write the node to `root/<id>.md`, creating `root` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save(&self, root: &Path) -> io::Result<()> {
        std::fs::create_dir_all(root)?;

        let file = File::create(Self::path_for(root, self.id))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()
    }
}

/// Splits markdown content into the name (first heading) and body.
///
/// # Errors
///
/// Returns an error if no heading is found.
fn parse_content(content: &str) -> Result<(String, String), LoadError> {
    let (heading_line_idx, line) = content
        .lines()
        .enumerate()
        .find(|(_, line)| line.trim().starts_with('#'))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "No heading found in content - the node name must be the first heading",
            )
        })?;

    let name = line.trim().trim_start_matches('#').trim().to_string();

    let body = content
        .lines()
        .skip(heading_line_idx + 1)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    Ok((name, body))
}

/// Errors that can occur when loading a node from markdown.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The node file was not found.
    #[error("node file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The YAML front matter could not be parsed.
    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "FrontMatterVersion")]
#[serde(into = "FrontMatterVersion")]
struct FrontMatter {
    created: DateTime<Utc>,
    position: u64,
    parent: Option<Uuid>,
    path: MaterializedPath,
    depth: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum FrontMatterVersion {
    #[serde(rename = "1")]
    V1 {
        created: DateTime<Utc>,
        #[serde(default)]
        position: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<Uuid>,
        #[serde(default, skip_serializing_if = "MaterializedPath::is_empty")]
        path: MaterializedPath,
        #[serde(default)]
        depth: usize,
    },
}

impl From<FrontMatterVersion> for FrontMatter {
    fn from(version: FrontMatterVersion) -> Self {
        match version {
            FrontMatterVersion::V1 {
                created,
                position,
                parent,
                path,
                depth,
            } => Self {
                created,
                position,
                parent,
                path,
                depth,
            },
        }
    }
}

impl From<FrontMatter> for FrontMatterVersion {
    fn from(front_matter: FrontMatter) -> Self {
        let FrontMatter {
            created,
            position,
            parent,
            path,
            depth,
        } = front_matter;
        Self::V1 {
            created,
            position,
            parent,
            path,
            depth,
        }
    }
}

impl From<Node> for MarkdownNode {
    fn from(node: Node) -> Self {
        let Node {
            id,
            name,
            body,
            created,
            position,
            parent_id,
            path,
            depth,
        } = node;

        Self {
            id,
            frontmatter: FrontMatter {
                created,
                position,
                parent: parent_id,
                path,
                depth,
            },
            name,
            body,
        }
    }
}

impl From<MarkdownNode> for Node {
    fn from(node: MarkdownNode) -> Self {
        let MarkdownNode {
            id,
            frontmatter:
                FrontMatter {
                    created,
                    position,
                    parent,
                    path,
                    depth,
                },
            name,
            body,
        } = node;

        Self {
            id,
            name,
            body,
            created,
            position,
            parent_id: parent,
            path,
            depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn sample(parent: Option<Uuid>) -> Node {
        let path = parent.map_or_else(MaterializedPath::root, |p| {
            MaterializedPath::child_of(&MaterializedPath::root(), p)
        });
        Node {
            id: Uuid::new_v4(),
            name: "Child 1".to_string(),
            body: "Some body text.".to_string(),
            created: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            position: 3,
            parent_id: parent,
            depth: path.len(),
            path,
        }
    }

    fn render(node: Node) -> String {
        let mut buf = Vec::new();
        MarkdownNode::from(node).write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn root_omits_parent_and_path() {
        let text = render(sample(None));

        assert!(text.starts_with("---\n_version: '1'\n"));
        assert!(!text.contains("parent:"));
        assert!(!text.contains("path:"));
        assert!(text.contains("depth: 0"));
        assert!(text.contains("# Child 1\n\nSome body text.\n"));
    }

    #[test]
    fn child_fields_survive_a_write_and_read() {
        let parent = Uuid::new_v4();
        let node = sample(Some(parent));
        let text = render(node.clone());

        assert!(text.contains("parent:"));
        assert!(text.contains(&parent.to_string()));

        let read = MarkdownNode::read(&mut Cursor::new(text), node.id).unwrap();
        let read = Node::from(read);

        assert_eq!(read.id, node.id);
        assert_eq!(read.name, node.name);
        assert_eq!(read.body, node.body);
        assert_eq!(read.created, node.created);
        assert_eq!(read.position, 3);
        assert_eq!(read.parent_id, Some(parent));
        assert_eq!(read.path.as_slice(), &[parent]);
        assert_eq!(read.depth, 1);
    }

    #[test]
    fn reads_handwritten_file() {
        let id = Uuid::new_v4();
        let text = "---\n_version: '1'\ncreated: 2025-01-01T00:00:00Z\n---\n# Loose note\n";

        let node = Node::from(MarkdownNode::read(&mut Cursor::new(text), id).unwrap());

        assert_eq!(node.name, "Loose note");
        assert!(node.body.is_empty());
        assert!(node.is_root());
        assert_eq!(node.position, 0);
    }

    #[test]
    fn missing_frontmatter_is_an_error() {
        let err = MarkdownNode::read(&mut Cursor::new("# No front matter\n"), Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn malformed_path_is_an_error() {
        let text = "---\n_version: '1'\ncreated: 2025-01-01T00:00:00Z\npath: nonsense\n---\n# X\n";
        let err = MarkdownNode::read(&mut Cursor::new(text), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, LoadError::Yaml(_)));
    }

    #[test]
    fn missing_heading_is_an_error() {
        let text = "---\n_version: '1'\ncreated: 2025-01-01T00:00:00Z\n---\nno heading\n";
        let err = MarkdownNode::read(&mut Cursor::new(text), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn save_then_load_from_disk() {
        let tmp = TempDir::new().unwrap();
        let node = sample(None);

        MarkdownNode::from(node.clone()).save(tmp.path()).unwrap();
        assert!(tmp.path().join(format!("{}.md", node.id)).exists());

        let loaded = Node::from(MarkdownNode::load(tmp.path(), node.id).unwrap());
        assert_eq!(loaded.name, node.name);

        let missing = MarkdownNode::load(tmp.path(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(missing, LoadError::NotFound));
    }
}
