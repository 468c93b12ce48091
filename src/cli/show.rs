use std::path::Path;

use arbor::{Directory, Node, Tree};
use clap::Parser;
use tracing::instrument;

use super::{open, resolve, short_id, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Display a node and its place in the tree")]
pub struct Show {
    /// Identifier (or unique prefix) of the node to display
    node: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let tree = open(root)?;
        let node = resolve(&tree, &self.node)?;

        match self.output {
            OutputFormat::Table => Self::output_table(&tree, &node)?,
            OutputFormat::Json => Self::output_json(&tree, &node)?,
        }
        Ok(())
    }

    fn output_table(tree: &Tree<Directory>, node: &Node) -> anyhow::Result<()> {
        let ancestors = tree.ancestors(node)?;
        let children = tree.children(node)?;
        let descendants = tree.descendants(node)?.len();

        println!("# {}", node.name());
        println!("{}\n", node.id().to_string().dim());

        println!("{}", "Tree".dim());
        let trail: Vec<_> = ancestors.iter().map(Node::name).collect();
        if trail.is_empty() {
            println!("  Path:        (root)");
        } else {
            println!("  Path:        {} / {}", trail.join(" / "), node.name());
        }
        println!("  Depth:       {}", node.depth());
        println!("  Children:    {}", children.len());
        println!("  Descendants: {descendants}");
        println!("  Created:     {}", node.created().format("%Y-%m-%d %H:%M:%S UTC"));

        if !children.is_empty() {
            println!();
            println!("{}", "Children".dim());
            for child in &children {
                println!("  • {} ({})", child.name(), short_id(child));
            }
        }

        if !node.body().is_empty() {
            println!();
            println!("{}", node.body());
        }
        Ok(())
    }

    fn output_json(tree: &Tree<Directory>, node: &Node) -> anyhow::Result<()> {
        use serde_json::json;

        let ancestors: Vec<_> = tree
            .ancestors(node)?
            .iter()
            .map(|a| json!({ "id": a.id(), "name": a.name() }))
            .collect();
        let children: Vec<_> = tree
            .children(node)?
            .iter()
            .map(|c| json!({ "id": c.id(), "name": c.name() }))
            .collect();

        let output = json!({
            "node": node,
            "ancestors": ancestors,
            "children": children,
            "descendants": tree.descendants(node)?.len(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
