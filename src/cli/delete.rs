use std::path::Path;

use tracing::instrument;

use super::{confirm, open, resolve, short_id, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// Identifier (or unique prefix) of the node to delete
    node: String,

    /// Show what would be deleted without deleting
    #[arg(long)]
    dry_run: bool,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut tree = open(root)?;
        let node = resolve(&tree, &self.node)?;
        let descendants = tree.descendants(&node)?;
        let total = descendants.len() + 1;

        if !self.yes || self.dry_run {
            println!("Will delete {total} node(s):");
            println!("  • {} ({})", node.name(), short_id(&node));
            for descendant in &descendants {
                let indent = "  ".repeat(descendant.depth().saturating_sub(node.depth()));
                println!("  {indent}• {} ({})", descendant.name(), short_id(descendant));
            }
        }

        if self.dry_run {
            println!("{}", format!("Would delete {total} node(s)").dim());
            return Ok(());
        }

        if !self.yes && !confirm("Proceed?")? {
            println!("Cancelled");
            std::process::exit(130);
        }

        tree.destroy(&node)?;

        println!("{}", format!("Deleted {total} node(s)").success());
        Ok(())
    }
}
