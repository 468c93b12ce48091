use std::path::Path;

use clap::Parser;
use tracing::instrument;

use super::{open, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Recompute every stored path from the parent links")]
pub struct Repair {
    /// Suppress output
    #[arg(long, short)]
    quiet: bool,
}

impl Repair {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut tree = open(root)?;

        match tree.repair() {
            Ok(repaired) => {
                if !self.quiet {
                    if repaired.is_empty() {
                        println!("{}", "✅ All paths are current.".success());
                    } else {
                        println!(
                            "{}",
                            format!("✅ Rewrote {} node(s)", repaired.len()).success()
                        );
                    }
                }
                Ok(())
            }
            Err(e) => {
                if !e.repaired.is_empty() && !self.quiet {
                    println!("Rewrote {} node(s)", e.repaired.len());
                }
                for failure in e.failures.iter() {
                    eprintln!("  • {}", failure.to_string().error());
                }
                Err(e.into())
            }
        }
    }
}
