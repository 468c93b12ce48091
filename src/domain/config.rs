use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a tree.
///
/// Stored as `config.toml` at the root of a [`Directory`](crate::Directory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// What to do when a node's parent no longer exists.
    pub dangling_parent: DanglingParent,

    /// Whether the directory may contain markdown files that are not nodes.
    ///
    /// When `false` (the default), a file whose name is not a node identifier,
    /// or that cannot be parsed, makes loading fail.
    pub allow_unrecognised: bool,
}

/// Policy for a `parent_id` that refers to a node that does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingParent {
    /// Report [`TreeError::DanglingParent`](crate::TreeError::DanglingParent).
    #[default]
    Reject,
    /// Clear the parent link, making the node a root.
    Promote,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        dangling_parent: DanglingParent,

        #[serde(default)]
        allow_unrecognised: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                dangling_parent,
                allow_unrecognised,
            } => Self {
                dangling_parent,
                allow_unrecognised,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            dangling_parent: config.dangling_parent,
            allow_unrecognised: config.allow_unrecognised,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ndangling_parent = \"promote\"\nallow_unrecognised = true\n")
            .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.dangling_parent, DanglingParent::Promote);
        assert!(config.allow_unrecognised);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ndangling_parent = \"ignore\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.dangling_parent, DanglingParent::Reject);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let config = Config {
            dangling_parent: DanglingParent::Promote,
            allow_unrecognised: true,
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
