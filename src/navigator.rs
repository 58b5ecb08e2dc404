//! Path-addressed lookup and copy-on-write along a path.

use tracing::{debug, instrument, trace};

use crate::edit::Edit;
use crate::errors::{TreeError, TreeResult};
use crate::node::Node;
use crate::path::TreePath;

impl<T> Node<T> {
    /// Follows `path` from this node. The empty path returns `self`.
    pub fn locate(&self, path: impl AsRef<[usize]>) -> TreeResult<&Node<T>> {
        let mut current = self;
        for &index in path.as_ref() {
            current = current.get_child_at(index)?;
        }
        Ok(current)
    }

    pub fn locate_opt(&self, path: impl AsRef<[usize]>) -> Option<&Node<T>> {
        self.locate(path).ok()
    }
}

impl<T: Clone> Node<T> {
    /// Applies `edit` to the node at `path` and rebuilds only the nodes
    /// between it and `self`.
    ///
    /// If the edit hands back the very node it was given, every ancestor
    /// is returned as-is and nothing is allocated.
    #[instrument(level = "trace", skip_all, fields(path = ?path.as_ref()))]
    pub fn transform(&self, path: impl AsRef<[usize]>, edit: Edit<T>) -> TreeResult<Node<T>> {
        self.transform_at(path.as_ref(), |node| edit.apply(node))
    }

    /// Like [`Node::transform`] with a closure as the edit.
    pub fn transform_with<F>(&self, path: impl AsRef<[usize]>, f: F) -> TreeResult<Node<T>>
    where
        F: FnOnce(&Node<T>) -> TreeResult<Node<T>>,
    {
        self.transform_at(path.as_ref(), f)
    }

    fn transform_at<F>(&self, path: &[usize], f: F) -> TreeResult<Node<T>>
    where
        F: FnOnce(&Node<T>) -> TreeResult<Node<T>>,
    {
        let Some((&head, rest)) = path.split_first() else {
            return f(self);
        };
        let child = self.get_child_at(head)?;
        let rewritten = child.transform_at(rest, f)?;
        if Node::ptr_eq(&rewritten, child) {
            trace!(index = head, "subtree unchanged");
            return Ok(self.clone());
        }
        self.set_child_at(head, rewritten)
    }
}

/// Deferred `transform`: collects a path and an edit, then applies them to
/// any root.
#[derive(Debug)]
pub struct Transform<T> {
    path: TreePath,
    edit: Option<Edit<T>>,
}

impl<T: Clone> Transform<T> {
    pub fn at(path: impl Into<TreePath>) -> Self {
        Self {
            path: path.into(),
            edit: None,
        }
    }

    pub fn edit(mut self, edit: Edit<T>) -> Self {
        self.edit = Some(edit);
        self
    }

    pub fn path(&self) -> &TreePath {
        &self.path
    }

    /// Fails with `MissingOperation` if no edit was supplied.
    pub fn apply(self, root: &Node<T>) -> TreeResult<Node<T>> {
        let edit = self
            .edit
            .ok_or(TreeError::MissingOperation("transform"))?;
        debug!(path = %self.path, "applying transform");
        root.transform(&self.path, edit)
    }
}
