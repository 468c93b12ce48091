use std::path::{Path, PathBuf};

mod create;
mod delete;
mod init;
mod list;
mod r#move;
mod repair;
mod show;
mod terminal;
mod validate;

use arbor::{Directory, Node, Store, Tree};
use clap::ArgAction;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the tree directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(list::List::default()))
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Initialize a new tree directory
    Init(init::Init),

    /// Create a node
    Create(create::Create),

    /// Move a node under a new parent, or make it a root
    ///
    /// The node's descendants move with it.
    Move(r#move::Move),

    /// Delete a node and everything below it
    Delete(delete::Delete),

    /// Show a single node
    Show(show::Show),

    /// Print the tree (default)
    List(list::List),

    /// Check stored paths against parent links
    Validate(validate::Validate),

    /// Rewrite stale paths
    Repair(repair::Repair),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(root),
            Self::Create(command) => command.run(root),
            Self::Move(command) => command.run(root),
            Self::Delete(command) => command.run(root),
            Self::Show(command) => command.run(root),
            Self::List(command) => command.run(root),
            Self::Validate(command) => command.run(root),
            Self::Repair(command) => command.run(root),
        }
    }
}

fn open(root: &Path) -> anyhow::Result<Tree<Directory>> {
    Ok(Directory::open_tree(root.to_path_buf())?)
}

/// Find a node by full identifier or by an unambiguous identifier prefix.
fn resolve(tree: &Tree<Directory>, reference: &str) -> anyhow::Result<Node> {
    if let Ok(id) = reference.parse() {
        return tree
            .find(id)?
            .ok_or_else(|| anyhow::anyhow!("Node {reference} not found"));
    }

    let prefix = reference.to_lowercase();
    let mut matches = tree
        .store()
        .all()?
        .into_iter()
        .filter(|node| node.id().to_string().starts_with(&prefix));

    match (matches.next(), matches.next()) {
        (Some(node), None) => Ok(node),
        (None, _) => anyhow::bail!("Node {reference} not found"),
        (Some(_), Some(_)) => anyhow::bail!("Node reference {reference} is ambiguous"),
    }
}

/// The first eight characters of an identifier, for display.
fn short_id(node: &Node) -> String {
    node.id().to_string()[..8].to_owned()
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::tempdir;
    use uuid::Uuid;

    use super::*;

    fn open_tree(root: &Path) -> Tree<Directory> {
        Directory::open_tree(root.to_path_buf()).expect("failed to load directory")
    }

    fn run_args(root: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec![
            "arbor".to_string(),
            "--root".to_string(),
            root.display().to_string(),
        ];
        argv.extend(args.iter().map(|arg| (*arg).to_string()));

        let cli = Cli::try_parse_from(argv)?;
        cli.command
            .expect("a subcommand was given")
            .run(&cli.root)
    }

    fn find_by_name(tree: &Tree<Directory>, name: &str) -> Option<Node> {
        tree.store()
            .all()
            .unwrap()
            .into_iter()
            .find(|node| node.name() == name)
    }

    /// The shortest prefix of `id` that `other` does not share.
    fn distinguishing_prefix(id: Uuid, other: Uuid) -> String {
        let (id, other) = (id.to_string(), other.to_string());
        (1..=id.len())
            .map(|len| &id[..len])
            .find(|prefix| !other.starts_with(prefix))
            .expect("distinct ids differ somewhere")
            .to_string()
    }

    #[test]
    fn resolve_accepts_full_id() {
        let tmp = tempdir().unwrap();
        let mut tree = open_tree(tmp.path());
        let node = tree.create("Root").unwrap();
        tree.create("Other").unwrap();

        let resolved = resolve(&tree, &node.id().to_string()).unwrap();
        assert_eq!(resolved.id(), node.id());
    }

    #[test]
    fn resolve_accepts_unique_prefix_in_any_case() {
        let tmp = tempdir().unwrap();
        let mut tree = open_tree(tmp.path());
        let node = tree.create("Root").unwrap();
        let other = tree.create("Other").unwrap();

        let prefix = distinguishing_prefix(node.id(), other.id());
        assert_eq!(resolve(&tree, &prefix).unwrap().id(), node.id());
        assert_eq!(
            resolve(&tree, &prefix.to_uppercase()).unwrap().id(),
            node.id()
        );
    }

    #[test]
    fn resolve_rejects_ambiguous_prefix() {
        let tmp = tempdir().unwrap();
        let mut tree = open_tree(tmp.path());
        let a = tree.create("A").unwrap().id().to_string();
        let b = tree.create("B").unwrap().id().to_string();

        let shared: String = a
            .chars()
            .zip(b.chars())
            .take_while(|(x, y)| x == y)
            .map(|(x, _)| x)
            .collect();

        let err = resolve(&tree, &shared).unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn resolve_rejects_unknown_reference() {
        let tmp = tempdir().unwrap();
        let mut tree = open_tree(tmp.path());
        tree.create("Root").unwrap();

        let missing = Uuid::new_v4().to_string();
        let err = resolve(&tree, &missing).unwrap_err();
        assert_eq!(err.to_string(), format!("Node {missing} not found"));

        let err = resolve(&tree, "not-an-id").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn create_run_creates_child_under_parent() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let parent = open_tree(root).create("Parent").unwrap();

        run_args(
            root,
            &[
                "create",
                "Child",
                "--parent",
                &parent.id().to_string()[..8],
                "--body",
                "body text",
            ],
        )
        .expect("create command should succeed");

        let tree = open_tree(root);
        let child = find_by_name(&tree, "Child").expect("child was written");
        assert_eq!(child.parent_id(), Some(parent.id()));
        assert_eq!(child.depth(), 1);
        assert!(child.path().contains(parent.id()));
        assert_eq!(child.body(), "body text");
    }

    #[test]
    fn create_run_creates_root_without_parent() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();

        run_args(root, &["create", "Alone"]).expect("create command should succeed");

        let tree = open_tree(root);
        let node = find_by_name(&tree, "Alone").expect("node was written");
        assert!(node.is_root());
        assert_eq!(node.depth(), 0);
    }

    #[test]
    fn move_run_carries_the_subtree() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();

        let mut tree = open_tree(root);
        let from = tree.create("From").unwrap();
        let to = tree.create("To").unwrap();
        let child = tree.create_child(&from, "Child").unwrap();
        let grandchild = tree.create_child(&child, "Grandchild").unwrap();

        run_args(
            root,
            &["move", &child.id().to_string(), "--parent", &to.id().to_string()],
        )
        .expect("move command should succeed");

        let tree = open_tree(root);
        let grandchild = tree.find(grandchild.id()).unwrap().unwrap();
        assert_eq!(grandchild.depth(), 2);
        assert!(grandchild.path().contains(to.id()));
        assert!(!grandchild.path().contains(from.id()));
        assert!(tree.validate().unwrap().is_empty());

        run_args(root, &["move", &child.id().to_string()]).expect("move command should succeed");

        let tree = open_tree(root);
        assert!(tree.find(child.id()).unwrap().unwrap().is_root());
        assert_eq!(tree.find(grandchild.id()).unwrap().unwrap().depth(), 1);
    }

    #[test]
    fn move_run_rejects_cycles() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();

        let mut tree = open_tree(root);
        let parent = tree.create("Parent").unwrap();
        let child = tree.create_child(&parent, "Child").unwrap();

        let result = run_args(
            root,
            &["move", &parent.id().to_string(), "--parent", &child.id().to_string()],
        );
        assert!(result.is_err());

        let tree = open_tree(root);
        assert!(tree.find(parent.id()).unwrap().unwrap().is_root());
    }

    #[test]
    fn delete_run_with_yes_removes_the_subtree() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();

        let mut tree = open_tree(root);
        let keep = tree.create("Keep").unwrap();
        let doomed = tree.create_child(&keep, "Doomed").unwrap();
        let below = tree.create_child(&doomed, "Below").unwrap();

        run_args(root, &["delete", &doomed.id().to_string(), "--dry-run"])
            .expect("dry run should succeed");
        assert!(open_tree(root).find(below.id()).unwrap().is_some());

        run_args(root, &["delete", &doomed.id().to_string(), "--yes"])
            .expect("delete command should succeed");

        let tree = open_tree(root);
        assert!(tree.find(doomed.id()).unwrap().is_none());
        assert!(tree.find(below.id()).unwrap().is_none());
        assert!(tree.find(keep.id()).unwrap().is_some());
        assert!(!root.join(format!("{}.md", below.id())).exists());
    }

    #[test]
    fn repair_run_rewrites_stale_paths() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();

        let mut tree = open_tree(root);
        let top = tree.create("Top").unwrap();
        let middle = tree.create_child(&top, "Middle").unwrap();
        let bottom = tree.create_child(&middle, "Bottom").unwrap();

        let file = root.join(format!("{}.md", bottom.id()));
        let text = std::fs::read_to_string(&file).unwrap();
        assert!(text.contains("depth: 2\n"));
        std::fs::write(&file, text.replace("depth: 2\n", "depth: 9\n")).unwrap();
        assert!(!open_tree(root).validate().unwrap().is_empty());

        run_args(root, &["repair", "--quiet"]).expect("repair command should succeed");

        let tree = open_tree(root);
        assert!(tree.validate().unwrap().is_empty());
        assert_eq!(tree.find(bottom.id()).unwrap().unwrap().depth(), 2);
    }
}
