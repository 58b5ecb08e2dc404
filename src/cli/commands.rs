use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info, instrument};

use crate::cli::args::{Cli, Commands, EditOp};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::edit::Edit;
use crate::navigator::Transform;
use crate::node::Node;
use crate::outline;
use crate::path::TreePath;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { file }) => show(file),
        Some(Commands::Locate { file, path }) => locate(file, path),
        Some(Commands::Edit {
            file,
            path,
            write,
            op,
        }) => edit(file, path, op, *write),
        Some(Commands::Completion { shell }) => {
            completion(*shell);
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help".to_string(),
        )),
    }
}

#[instrument(level = "debug")]
pub fn load_outline(file: &Path) -> CliResult<Node<String>> {
    let text = fs::read_to_string(file)
        .map_err(|e| CliError::io(format!("cannot read {}", file.display()), e))?;
    Ok(outline::parse(&text)?)
}

pub fn to_edit(op: &EditOp) -> Edit<String> {
    match op {
        EditOp::Set { payload } => Edit::SetPayload(payload.clone()),
        EditOp::Add { payload } => Edit::AddChildren(vec![Node::leaf(payload.clone())]),
        EditOp::Insert { index, payload } => {
            Edit::InsertChildAt(*index, Node::leaf(payload.clone()))
        }
        EditOp::Remove { index } => Edit::RemoveChildAt(*index),
    }
}

/// Applies `op` at `path` (as typed on the command line) to `root`.
/// Payloads that cannot be written back as one outline line are refused.
#[instrument(level = "debug", skip(root))]
pub fn apply_edit(root: &Node<String>, path: &str, op: &EditOp) -> CliResult<Node<String>> {
    let path: TreePath = path.parse()?;
    match op {
        EditOp::Set { payload } | EditOp::Add { payload } | EditOp::Insert { payload, .. } => {
            outline::check_payload(payload)?
        }
        EditOp::Remove { .. } => {}
    }
    let edited = Transform::at(path).edit(to_edit(op)).apply(root)?;
    Ok(edited)
}

#[instrument(level = "debug")]
fn show(file: &Path) -> CliResult<()> {
    let root = load_outline(file)?;
    output::tree(&root);
    Ok(())
}

#[instrument(level = "debug")]
fn locate(file: &Path, path: &str) -> CliResult<()> {
    let root = load_outline(file)?;
    let path: TreePath = path.parse()?;
    let node = root.locate(&path)?;
    output::header(&format!("{} @ {}", file.display(), path));
    output::tree(node);
    Ok(())
}

#[instrument(level = "debug")]
fn edit(file: &Path, path: &str, op: &EditOp, write: bool) -> CliResult<()> {
    let root = load_outline(file)?;
    let edited = apply_edit(&root, path, op)?;
    let stats = edited.shared_with(&root);
    debug!(?stats, "edit applied");

    output::tree(&edited);
    output::sharing(&stats);

    if write {
        fs::write(file, outline::render(&edited))
            .map_err(|e| CliError::io(format!("cannot write {}", file.display()), e))?;
        info!(file = %file.display(), "outline updated");
    }
    Ok(())
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    eprintln!("Generating completion file for {shell:?}...");
    generate(shell, &mut cmd, name, &mut io::stdout());
}
