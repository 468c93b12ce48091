use std::path::Path;

use arbor::NewNode;
use tracing::instrument;

use super::{open, resolve, short_id, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Create {
    /// The name of the node
    name: String,

    /// Identifier (or unique prefix) of the parent node; omit to create a root
    #[arg(long, short)]
    parent: Option<String>,

    /// Body text of the node
    #[arg(long, short)]
    body: Option<String>,
}

impl Create {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut tree = open(root)?;

        let parent_id = match &self.parent {
            Some(reference) => Some(resolve(&tree, reference)?.id()),
            None => None,
        };

        let node = tree.create_node(NewNode {
            parent_id,
            ..NewNode::new(self.name).with_body(self.body.unwrap_or_default())
        })?;

        println!(
            "{}",
            format!("Created {} ({})", node.name(), short_id(&node)).success()
        );
        println!("{}", node.id().to_string().dim());
        Ok(())
    }
}
