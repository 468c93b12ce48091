use std::path::Path;

use arbor::Inconsistency;
use clap::Parser;
use tracing::instrument;

use super::{open, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Check stored paths and depths against parent links")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let tree = open(root)?;
        let problems = tree.validate()?;

        if !self.quiet {
            match self.output {
                OutputFormat::Table => Self::output_table(&problems),
                OutputFormat::Json => Self::output_json(&problems)?,
            }
        }

        if !problems.is_empty() {
            std::process::exit(2);
        }
        Ok(())
    }

    fn output_table(problems: &[Inconsistency]) {
        if problems.is_empty() {
            println!("{}", "✅ Tree is consistent.".success());
            return;
        }

        println!(
            "{}",
            format!("⚠️  {} problem(s) found", problems.len()).warning()
        );
        for problem in problems {
            println!("  • {}", describe(problem));
        }
        println!();
        println!("{}", "Run 'arbor repair' to rewrite stale paths.".dim());
    }

    fn output_json(problems: &[Inconsistency]) -> anyhow::Result<()> {
        use serde_json::json;

        let items: Vec<_> = problems
            .iter()
            .map(|problem| match problem {
                Inconsistency::DanglingParent { node, parent } => json!({
                    "kind": "dangling_parent",
                    "node": node,
                    "parent": parent,
                }),
                Inconsistency::StalePath {
                    node,
                    expected,
                    actual,
                } => json!({
                    "kind": "stale_path",
                    "node": node,
                    "expected": expected,
                    "actual": actual,
                }),
                Inconsistency::StaleDepth {
                    node,
                    expected,
                    actual,
                } => json!({
                    "kind": "stale_depth",
                    "node": node,
                    "expected": expected,
                    "actual": actual,
                }),
                Inconsistency::Cycle(members) => json!({
                    "kind": "cycle",
                    "members": members,
                }),
            })
            .collect();

        let output = json!({
            "consistent": problems.is_empty(),
            "problems": items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn describe(problem: &Inconsistency) -> String {
    match problem {
        Inconsistency::DanglingParent { node, parent } => {
            format!("{node}: parent {parent} does not exist")
        }
        Inconsistency::StalePath {
            node,
            expected,
            actual,
        } => format!("{node}: stored path '{actual}', expected '{expected}'"),
        Inconsistency::StaleDepth {
            node,
            expected,
            actual,
        } => format!("{node}: stored depth {actual}, expected {expected}"),
        Inconsistency::Cycle(members) => {
            let ids: Vec<_> = members.iter().map(ToString::to_string).collect();
            format!("parent links loop: {}", ids.join(" -> "))
        }
    }
}
