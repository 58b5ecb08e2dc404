//! Structural editor: every operation derives a new node from an old one.
//!
//! Only the edited node's own child list is copied; every child subtree is
//! carried over by handle. No operation touches `self`.

use std::any::{type_name, Any};
use std::fmt;

use tracing::{instrument, trace};

use crate::errors::{TreeError, TreeResult};
use crate::node::{Node, Overrides};

type EditFn<T> = Box<dyn FnOnce(&Node<T>) -> TreeResult<Node<T>> + Send>;

/// A structural edit expressed as a value, applied at the end of a path by
/// [`Node::transform`].
pub enum Edit<T> {
    SetPayload(T),
    AddChildren(Vec<Node<T>>),
    SetChildAt(usize, Node<T>),
    InsertChildAt(usize, Node<T>),
    RemoveChildAt(usize),
    /// Swap the node wholesale.
    Replace(Node<T>),
    /// Arbitrary caller-supplied edit.
    Map(EditFn<T>),
}

impl<T: Clone> Edit<T> {
    pub fn map<F>(f: F) -> Self
    where
        F: FnOnce(&Node<T>) -> TreeResult<Node<T>> + Send + 'static,
    {
        Edit::Map(Box::new(f))
    }

    pub fn apply(self, node: &Node<T>) -> TreeResult<Node<T>> {
        match self {
            Edit::SetPayload(payload) => Ok(node.set_payload(payload)),
            Edit::AddChildren(children) => Ok(node.add_children(children)),
            Edit::SetChildAt(index, child) => node.set_child_at(index, child),
            Edit::InsertChildAt(index, child) => node.insert_child_at(index, child),
            Edit::RemoveChildAt(index) => node.remove_child_at(index),
            Edit::Replace(other) => Ok(node.replace(other)),
            Edit::Map(f) => f(node),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Edit<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::SetPayload(p) => f.debug_tuple("SetPayload").field(p).finish(),
            Edit::AddChildren(c) => f.debug_tuple("AddChildren").field(c).finish(),
            Edit::SetChildAt(i, c) => f.debug_tuple("SetChildAt").field(i).field(c).finish(),
            Edit::InsertChildAt(i, c) => {
                f.debug_tuple("InsertChildAt").field(i).field(c).finish()
            }
            Edit::RemoveChildAt(i) => f.debug_tuple("RemoveChildAt").field(i).finish(),
            Edit::Replace(n) => f.debug_tuple("Replace").field(n).finish(),
            Edit::Map(_) => f.write_str("Map(..)"),
        }
    }
}

impl<T: Clone> Node<T> {
    pub fn set_payload(&self, payload: T) -> Node<T> {
        self.derive(Overrides::new().payload(payload))
    }

    pub fn add_children<I>(&self, new_children: I) -> Node<T>
    where
        I: IntoIterator<Item = Node<T>>,
    {
        let mut children = self.children().to_vec();
        children.extend(new_children);
        trace!(
            added = children.len() - self.child_count(),
            "add_children"
        );
        self.derive(Overrides::new().children(children))
    }

    pub fn add_child(&self, child: Node<T>) -> Node<T> {
        self.add_children([child])
    }

    /// Replaces the child at `index`. Writing past the end is an error, not
    /// an append. Putting back the identical child returns `self`.
    #[instrument(level = "trace", skip_all, fields(index = index))]
    pub fn set_child_at(&self, index: usize, child: Node<T>) -> TreeResult<Node<T>> {
        let current = self.get_child_at(index)?;
        if Node::ptr_eq(current, &child) {
            trace!("identical child, sharing parent");
            return Ok(self.clone());
        }
        let mut children = self.children().to_vec();
        children[index] = child;
        Ok(self.derive(Overrides::new().children(children)))
    }

    /// Inserts `child` before position `index`; `index == child_count()`
    /// appends.
    #[instrument(level = "trace", skip_all, fields(index = index))]
    pub fn insert_child_at(&self, index: usize, child: Node<T>) -> TreeResult<Node<T>> {
        if index > self.child_count() {
            return Err(TreeError::IndexOutOfRange {
                index,
                len: self.child_count(),
            });
        }
        let mut children = self.children().to_vec();
        children.insert(index, child);
        Ok(self.derive(Overrides::new().children(children)))
    }

    #[instrument(level = "trace", skip_all, fields(index = index))]
    pub fn remove_child_at(&self, index: usize) -> TreeResult<Node<T>> {
        self.get_child_at(index)?;
        let mut children = self.children().to_vec();
        children.remove(index);
        Ok(self.derive(Overrides::new().children(children)))
    }

    /// Returns `other` unchanged; the wholesale-replace edit.
    pub fn replace(&self, other: Node<T>) -> Node<T> {
        other
    }
}

impl<T: Clone + 'static> Node<T> {
    /// Recovers a node from a type-erased value, failing with `TypeMismatch`
    /// if the value is not a `Node<T>`.
    pub fn from_any(value: Box<dyn Any>) -> TreeResult<Node<T>> {
        value
            .downcast::<Node<T>>()
            .map(|node| *node)
            .map_err(|_| TreeError::TypeMismatch {
                expected: type_name::<Node<T>>(),
            })
    }

    /// Type-erased [`Node::add_children`]. Every value is checked before the
    /// new node is built, so a single mismatch leaves nothing half-done.
    pub fn add_children_any<I>(&self, values: I) -> TreeResult<Node<T>>
    where
        I: IntoIterator<Item = Box<dyn Any>>,
    {
        let children = values
            .into_iter()
            .map(Node::from_any)
            .collect::<TreeResult<Vec<_>>>()?;
        Ok(self.add_children(children))
    }

    pub fn set_child_at_any(&self, index: usize, value: Box<dyn Any>) -> TreeResult<Node<T>> {
        self.set_child_at(index, Node::from_any(value)?)
    }

    pub fn insert_child_at_any(&self, index: usize, value: Box<dyn Any>) -> TreeResult<Node<T>> {
        self.insert_child_at(index, Node::from_any(value)?)
    }
}
