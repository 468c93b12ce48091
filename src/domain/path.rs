use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// The ordered list of ancestor identifiers of a node, root first.
///
/// The node's own identifier is never part of its path. A root node has an
/// empty path. The compact string form joins the identifiers with `/`, so a
/// path of depth two reads `<root>/<parent>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MaterializedPath(Vec<Uuid>);

impl MaterializedPath {
    /// The empty path of a root node.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// The path of a child of a node with the given path and identifier.
    #[must_use]
    pub fn child_of(parent_path: &Self, parent_id: Uuid) -> Self {
        let mut ids = Vec::with_capacity(parent_path.len() + 1);
        ids.extend_from_slice(&parent_path.0);
        ids.push(parent_id);
        Self(ids)
    }

    /// Number of ancestors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the path of a root node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first (outermost) ancestor.
    #[must_use]
    pub fn first(&self) -> Option<Uuid> {
        self.0.first().copied()
    }

    /// The direct parent, i.e. the last element.
    #[must_use]
    pub fn last(&self) -> Option<Uuid> {
        self.0.last().copied()
    }

    /// Whether `id` is one of the ancestors.
    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.0.contains(&id)
    }

    /// Whether `prefix` is a leading subsequence of this path.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Iterate over the ancestor identifiers, root first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Uuid> + '_ {
        self.0.iter().copied()
    }

    /// The identifiers as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Uuid] {
        &self.0
    }
}

impl TryFrom<Vec<Uuid>> for MaterializedPath {
    type Error = PathParseError;

    fn try_from(ids: Vec<Uuid>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(ids.len());
        for id in &ids {
            if !seen.insert(*id) {
                return Err(PathParseError::Repeated(*id));
            }
        }
        Ok(Self(ids))
    }
}

impl fmt::Display for MaterializedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

impl FromStr for MaterializedPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::root());
        }

        let ids = s
            .split('/')
            .map(|segment| {
                Uuid::parse_str(segment)
                    .map_err(|_| PathParseError::InvalidSegment(segment.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::try_from(ids)
    }
}

impl Serialize for MaterializedPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MaterializedPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when a compact path string cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathParseError {
    /// A segment between separators is not a valid identifier.
    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),
    /// An identifier appears more than once.
    #[error("identifier {0} appears more than once in path")]
    Repeated(Uuid),
}
