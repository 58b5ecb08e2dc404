use std::collections::HashSet;

use tracing::instrument;

use crate::node::{Node, NodeId};
use crate::path::TreePath;

/// Pre-order, left-to-right iterator over a subtree.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

pub struct PostOrderIter<'a, T> {
    stack: Vec<(&'a Node<T>, bool)>,
}

impl<'a, T> Iterator for PostOrderIter<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(node);
            }
            self.stack.push((node, true));
            for child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Pre-order iterator yielding each node with its path from the start node.
pub struct Paths<'a, T> {
    stack: Vec<(TreePath, &'a Node<T>)>,
}

impl<'a, T> Iterator for Paths<'a, T> {
    type Item = (TreePath, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for (index, child) in node.children().iter().enumerate().rev() {
            self.stack.push((path.child(index), child));
        }
        Some((path, node))
    }
}

/// How much of one tree is physically shared with another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharingStats {
    pub total: usize,
    pub shared: usize,
}

impl SharingStats {
    pub fn fresh(&self) -> usize {
        self.total - self.shared
    }
}

impl<T> Node<T> {
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { stack: vec![self] }
    }

    pub fn iter_postorder(&self) -> PostOrderIter<'_, T> {
        PostOrderIter {
            stack: vec![(self, false)],
        }
    }

    pub fn paths(&self) -> Paths<'_, T> {
        Paths {
            stack: vec![(TreePath::root(), self)],
        }
    }

    /// Leaf nodes of this subtree, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &Node<T>> {
        self.iter().filter(|node| node.is_leaf())
    }

    /// Counts the nodes of `self` whose body is also reachable from `other`.
    #[instrument(level = "debug", skip_all)]
    pub fn shared_with(&self, other: &Node<T>) -> SharingStats {
        let known: HashSet<NodeId> = other.iter().map(Node::id).collect();
        self.iter().fold(
            SharingStats {
                total: 0,
                shared: 0,
            },
            |mut stats, node| {
                stats.total += 1;
                if known.contains(&node.id()) {
                    stats.shared += 1;
                }
                stats
            },
        )
    }
}

impl<'a, T> IntoIterator for &'a Node<T> {
    type Item = &'a Node<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
