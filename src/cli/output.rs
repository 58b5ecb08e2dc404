//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Display;

use colored::Colorize;

use crate::iter::SharingStats;
use crate::node::Node;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print a cyan heading line
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print a tree followed by its metrics
pub fn tree<T: Display>(node: &Node<T>) {
    print!("{}", node);
    println!(
        "{} {}  {} {}",
        "size".dimmed(),
        node.size(),
        "height".dimmed(),
        node.height()
    );
}

/// Print how many nodes a new version shares with the old one
pub fn sharing(stats: &SharingStats) {
    println!(
        "{}: {} of {} nodes shared, {} new",
        "sharing".green(),
        stats.shared,
        stats.total,
        stats.fresh()
    );
}
