use std::path::Path;

use tracing::instrument;

use super::{open, resolve, short_id, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Move {
    /// Identifier (or unique prefix) of the node to move
    node: String,

    /// Identifier (or unique prefix) of the new parent; omit to make the node
    /// a root
    #[arg(long, short)]
    parent: Option<String>,
}

impl Move {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut tree = open(root)?;
        let mut node = resolve(&tree, &self.node)?;
        let before = tree.descendants(&node)?.len();

        match &self.parent {
            Some(reference) => {
                let parent = resolve(&tree, reference)?;
                tree.children_of(&parent).append(&mut node)?;
                println!(
                    "{}",
                    format!(
                        "Moved {} ({}) under {} ({})",
                        node.name(),
                        short_id(&node),
                        parent.name(),
                        short_id(&parent)
                    )
                    .success()
                );
            }
            None => {
                tree.reparent(&mut node, None)?;
                println!(
                    "{}",
                    format!("Moved {} ({}) to the top level", node.name(), short_id(&node))
                        .success()
                );
            }
        }

        if before > 0 {
            println!(
                "{}",
                format!("  {before} descendant(s) moved with it").dim()
            );
        }
        Ok(())
    }
}
