//! Indented text outlines as trees of strings.
//!
//! One node per line; each level of nesting is two spaces or one tab.
//! Blank lines and lines starting with `#` are skipped. The first node sits
//! at indent 0 and is the only one allowed there.
//!
//! A payload that would otherwise read back differently (empty, starting
//! with `#` or `\`, or with surrounding whitespace) is written behind a
//! single `\`; everything after that marker is taken verbatim. Payloads
//! cannot span lines, see [`check_payload`].

use std::fmt;

use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::node::Node;

const INDENT: &str = "  ";
const ESCAPE: char = '\\';

fn outline_error(line: usize, reason: impl Into<String>) -> TreeError {
    TreeError::Outline {
        line,
        reason: reason.into(),
    }
}

/// Nesting level of `raw`: tabs count one level, spaces count in pairs.
fn indent_level(raw: &str, line: usize) -> TreeResult<usize> {
    let mut tabs = 0;
    let mut spaces = 0;
    for c in raw.chars() {
        match c {
            '\t' => tabs += 1,
            ' ' => spaces += 1,
            _ => break,
        }
    }
    if spaces % 2 != 0 {
        return Err(outline_error(line, format!("odd indentation of {spaces} spaces")));
    }
    Ok(tabs + spaces / 2)
}

/// Fails with `InvalidPayload` if `payload` cannot be stored on one
/// outline line.
pub fn check_payload(payload: &str) -> TreeResult<()> {
    if payload.contains(['\n', '\r']) {
        return Err(TreeError::InvalidPayload(format!("{payload:?} contains a line break")));
    }
    Ok(())
}

fn needs_escape(payload: &str) -> bool {
    payload.is_empty()
        || payload.starts_with(['#', ESCAPE])
        || payload.starts_with(char::is_whitespace)
        || payload.ends_with(char::is_whitespace)
}

/// Payload text of a non-blank, non-comment line.
fn unescape(raw: &str) -> &str {
    let text = raw.trim_start();
    match text.strip_prefix(ESCAPE) {
        Some(verbatim) => verbatim,
        None => text.trim_end(),
    }
}

/// Folds the innermost open entry into its parent, or returns it when it was
/// the root.
fn close(stack: &mut Vec<(String, Vec<Node<String>>)>) -> Option<Node<String>> {
    let (payload, children) = stack.pop()?;
    let node = Node::new(payload, children);
    match stack.last_mut() {
        Some((_, siblings)) => {
            siblings.push(node);
            None
        }
        None => Some(node),
    }
}

#[instrument(level = "debug", skip_all)]
pub fn parse(input: &str) -> TreeResult<Node<String>> {
    // open ancestors of the current line, outermost first
    let mut stack: Vec<(String, Vec<Node<String>>)> = Vec::new();
    let mut root = None;
    let mut seen_root = false;

    for (no, raw) in input.lines().enumerate() {
        let line = no + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let level = indent_level(raw, line)?;
        if level == 0 && seen_root {
            return Err(outline_error(line, "second root entry"));
        }
        if level > stack.len() {
            let from = stack.len().saturating_sub(1);
            return Err(outline_error(
                line,
                format!("indentation jumps from level {from} to {level}"),
            ));
        }

        while stack.len() > level {
            if let Some(node) = close(&mut stack) {
                root = Some(node);
            }
        }
        stack.push((unescape(raw).to_string(), Vec::new()));
        seen_root = true;
    }

    while !stack.is_empty() {
        if let Some(node) = close(&mut stack) {
            root = Some(node);
        }
    }

    let root = root.ok_or_else(|| outline_error(0, "empty outline"))?;
    debug!(size = root.size(), height = root.height(), "parsed outline");
    Ok(root)
}

/// Renders a tree in the format [`parse`] reads. Payloads are expected to
/// pass [`check_payload`].
pub fn render<T: fmt::Display>(root: &Node<T>) -> String {
    root.fold(String::new(), |mut out, node, depth| {
        let payload = node.payload().to_string();
        out.push_str(&INDENT.repeat(depth));
        if needs_escape(&payload) {
            out.push(ESCAPE);
        }
        out.push_str(&payload);
        out.push('\n');
        out
    })
}
