use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::errors::{TreeError, TreeResult};

/// Immutable body shared by every handle to the same node.
struct NodeInner<T> {
    payload: T,
    children: Vec<Node<T>>,
    /// Memoized on first access, never invalidated: `children` is fixed.
    size: OnceLock<usize>,
    height: OnceLock<usize>,
}

/// Persistent tree node.
///
/// A `Node` is a cheap handle to an immutable body. Cloning it clones the
/// handle, so the same subtree can hang below any number of parents across
/// tree versions. Edits never touch an existing body; they build a new node
/// that shares every untouched child with the original.
///
/// `size`, `height`, iteration, `fold` and dropping use explicit stacks and
/// handle chains of any depth. `PartialEq`, `Debug`, termtree rendering,
/// visitor walks and `rewrite` recurse once per level and are bounded by the
/// thread's stack.
pub struct Node<T> {
    inner: Arc<NodeInner<T>>,
}

/// Opaque identity token of a node body.
///
/// Two handles have the same `NodeId` iff [`Node::ptr_eq`] holds for them.
/// An id is only meaningful while the node it was taken from is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Sparse set of field replacements for [`Node::derive`].
#[derive(Debug)]
pub struct Overrides<T> {
    payload: Option<T>,
    children: Option<Vec<Node<T>>>,
}

impl<T> Default for Overrides<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Overrides<T> {
    pub fn new() -> Self {
        Self {
            payload: None,
            children: None,
        }
    }

    pub fn payload(mut self, payload: T) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn children(mut self, children: Vec<Node<T>>) -> Self {
        self.children = Some(children);
        self
    }
}

impl<T> Node<T> {
    pub fn new(payload: T, children: Vec<Node<T>>) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                payload,
                children,
                size: OnceLock::new(),
                height: OnceLock::new(),
            }),
        }
    }

    pub fn leaf(payload: T) -> Self {
        Self::new(payload, Vec::new())
    }

    pub fn payload(&self) -> &T {
        &self.inner.payload
    }

    pub fn children(&self) -> &[Node<T>] {
        &self.inner.children
    }

    pub fn child_count(&self) -> usize {
        self.inner.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.inner.children.is_empty()
    }

    /// Returns the child at `index`, failing with `IndexOutOfRange`
    /// unless `index < child_count()`.
    pub fn get_child_at(&self, index: usize) -> TreeResult<&Node<T>> {
        self.inner
            .children
            .get(index)
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: self.child_count(),
            })
    }

    /// Number of nodes in this subtree, self included.
    pub fn size(&self) -> usize {
        self.memoized(Node::size_cell, Node::compute_size)
    }

    /// Length of the longest downward path; 0 for a leaf.
    pub fn height(&self) -> usize {
        self.memoized(Node::height_cell, Node::compute_height)
    }

    fn size_cell(&self) -> &OnceLock<usize> {
        &self.inner.size
    }

    fn height_cell(&self) -> &OnceLock<usize> {
        &self.inner.height
    }

    fn compute_size(&self) -> usize {
        1 + self.children().iter().map(Node::size).sum::<usize>()
    }

    fn compute_height(&self) -> usize {
        self.children()
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Fills `cell` bottom-up with an explicit stack, so `compute` only ever
    /// reads children whose value is already set.
    fn memoized(
        &self,
        cell: fn(&Node<T>) -> &OnceLock<usize>,
        compute: fn(&Node<T>) -> usize,
    ) -> usize {
        if let Some(value) = cell(self).get() {
            return *value;
        }
        let mut stack = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                cell(node).get_or_init(|| compute(node));
                continue;
            }
            stack.push((node, true));
            stack.extend(
                node.children()
                    .iter()
                    .filter(|child| cell(child).get().is_none())
                    .map(|child| (child, false)),
            );
        }
        *cell(self).get_or_init(|| compute(self))
    }

    pub fn id(&self) -> NodeId {
        NodeId(Arc::as_ptr(&self.inner) as *const () as usize)
    }

    /// Identity comparison: true iff both handles point at the same body.
    pub fn ptr_eq(a: &Node<T>, b: &Node<T>) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<T: Clone> Node<T> {
    /// Clone-with-override: copies every field of `self` that `overrides`
    /// leaves unset. Size and height stay lazy on the new node.
    pub fn derive(&self, overrides: Overrides<T>) -> Node<T> {
        let payload = overrides
            .payload
            .unwrap_or_else(|| self.inner.payload.clone());
        let children = overrides
            .children
            .unwrap_or_else(|| self.inner.children.clone());
        Node::new(payload, children)
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Unlinks uniquely owned descendants onto a heap stack, so dropping a deep
/// chain does not recurse once per level.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let Some(inner) = Arc::get_mut(&mut self.inner) else {
            return;
        };
        let mut stack = std::mem::take(&mut inner.children);
        while let Some(mut node) = stack.pop() {
            if let Some(inner) = Arc::get_mut(&mut node.inner) {
                stack.append(&mut inner.children);
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("payload", self.payload())
            .field("children", &self.children())
            .finish()
    }
}

/// Deep value equality, short-circuiting on identity.
impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        Node::ptr_eq(self, other)
            || (self.payload() == other.payload() && self.children() == other.children())
    }
}

impl<T: Eq> Eq for Node<T> {}

impl<T> From<T> for Node<T> {
    fn from(payload: T) -> Self {
        Node::leaf(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node<&'static str> {
        Node::new(
            "root",
            vec![
                Node::new("a", vec![Node::leaf("a1"), Node::leaf("a2")]),
                Node::leaf("b"),
            ],
        )
    }

    #[test]
    fn test_leaf_metrics() {
        let leaf = Node::leaf(1);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.size(), 1);
        assert_eq!(leaf.height(), 0);
        assert_eq!(leaf.child_count(), 0);
    }

    #[test]
    fn test_internal_metrics() {
        let tree = sample();
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.height(), 2);
        // memoized value is stable
        assert_eq!(tree.size(), 5);
    }

    #[test]
    fn test_metrics_reuse_memoized_shared_subtree() {
        let shared = sample();
        assert_eq!(shared.height(), 2);
        let tree = Node::new("top", vec![shared.clone(), Node::new("x", vec![shared])]);
        assert_eq!(tree.size(), 12);
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn test_get_child_at_out_of_range() {
        let tree = sample();
        assert_eq!(
            tree.get_child_at(2).unwrap_err(),
            TreeError::IndexOutOfRange { index: 2, len: 2 }
        );
        assert_eq!(*tree.get_child_at(1).unwrap().payload(), "b");
    }

    #[test]
    fn test_clone_shares_identity() {
        let tree = sample();
        let handle = tree.clone();
        assert!(Node::ptr_eq(&tree, &handle));
        assert_eq!(tree.id(), handle.id());
    }

    #[test]
    fn test_equal_values_have_distinct_identity() {
        let a = sample();
        let b = sample();
        assert_eq!(a, b);
        assert!(!Node::ptr_eq(&a, &b));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_derive_overrides_only_given_fields() {
        let tree = sample();
        let renamed = tree.derive(Overrides::new().payload("top"));
        assert_eq!(*renamed.payload(), "top");
        assert!(Node::ptr_eq(&renamed.children()[0], &tree.children()[0]));
        assert!(!Node::ptr_eq(&renamed, &tree));

        let pruned = tree.derive(Overrides::new().children(Vec::new()));
        assert_eq!(*pruned.payload(), "root");
        assert!(pruned.is_leaf());
        assert_eq!(tree.child_count(), 2);
    }
}
