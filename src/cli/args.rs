//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Inspect and edit outline files as persistent trees
#[derive(Parser, Debug)]
#[command(name = "rstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print an outline as a tree with its size and height
    Show {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the subtree at a path, e.g. 0/2/1
    Locate {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Child indices separated by '/'; '/' is the root
        path: String,
    },

    /// Apply one edit at a path and print the new version
    Edit {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Child indices separated by '/'; '/' is the root
        path: String,
        /// Write the new version back to the file
        #[arg(short, long)]
        write: bool,
        #[command(subcommand)]
        op: EditOp,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Edits applied to the node at the given path
#[derive(Subcommand, Debug, Clone)]
pub enum EditOp {
    /// Replace the node's text
    Set { payload: String },
    /// Append a new leaf child
    Add { payload: String },
    /// Insert a new leaf child before INDEX
    Insert { index: usize, payload: String },
    /// Remove the child at INDEX
    Remove { index: usize },
}
