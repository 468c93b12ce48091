use std::{fs, path::Path};

use arbor::{Config, DanglingParent, storage::directory::METADATA_DIR};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Turn nodes whose parent is missing into roots instead of failing
    #[arg(long)]
    promote_dangling: bool,

    /// Tolerate markdown files that are not nodes
    #[arg(long)]
    allow_unrecognised: bool,
}

impl Init {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let metadata_dir = root.join(METADATA_DIR);
        if metadata_dir.exists() {
            anyhow::bail!("Tree already initialized (found existing {METADATA_DIR} directory)");
        }

        fs::create_dir_all(&metadata_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create {METADATA_DIR} directory: {e}"))?;

        let config = Config {
            dangling_parent: if self.promote_dangling {
                DanglingParent::Promote
            } else {
                DanglingParent::Reject
            },
            allow_unrecognised: self.allow_unrecognised,
        };
        config
            .save(&root.join("config.toml"))
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!(
            "{}",
            format!("Initialized tree in {}", root.display()).success()
        );
        println!("  Created: {METADATA_DIR}/");
        println!("  Created: config.toml");
        println!();
        println!("Next steps:");
        println!("  arbor create \"Your first node\"");

        Ok(())
    }
}
