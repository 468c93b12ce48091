use std::path::Path;

use arbor::{Directory, Node, Tree};
use clap::Parser;
use tracing::instrument;

use super::{
    open, resolve, short_id,
    terminal::{is_narrow, terminal_width, truncate, Colorize},
};

#[derive(Debug, Default, Parser)]
#[command(about = "Print the tree")]
pub struct List {
    /// Only print the subtree below this node
    #[arg(long, short)]
    from: Option<String>,

    /// Stop at this depth below the starting point
    #[arg(long)]
    max_depth: Option<usize>,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let tree = open(root)?;

        let starts = match &self.from {
            Some(reference) => vec![resolve(&tree, reference)?],
            None => tree.roots()?,
        };

        if starts.is_empty() {
            println!("{}", "No nodes yet. Run 'arbor create NAME' to add one.".dim());
            return Ok(());
        }

        let show_ids = !is_narrow();
        let width = terminal_width().map_or(usize::MAX, usize::from);

        for start in starts {
            for (level, node) in self.walk(&tree, start)? {
                let indent = "  ".repeat(level);
                let budget = width.saturating_sub(indent.len() + if show_ids { 11 } else { 0 });
                let name = truncate(node.name(), budget.max(8));
                if show_ids {
                    println!("{indent}{name} {}", format!("({})", short_id(&node)).dim());
                } else {
                    println!("{indent}{name}");
                }
            }
        }
        Ok(())
    }

    /// Depth-first, children in position order, each paired with its level
    /// below `start`.
    fn walk(&self, tree: &Tree<Directory>, start: Node) -> anyhow::Result<Vec<(usize, Node)>> {
        let mut out = Vec::new();
        let mut stack = vec![(0, start)];

        while let Some((level, node)) = stack.pop() {
            if self.max_depth.is_none_or(|max| level < max) {
                let children = tree.children(&node)?;
                stack.extend(children.into_iter().rev().map(|child| (level + 1, child)));
            }
            out.push((level, node));
        }
        Ok(out)
    }
}
