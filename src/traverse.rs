//! Depth-first, parent-before-children traversal with per-node control.
//!
//! A [`Visitor`] sees each node together with its [`VisitContext`] (depth
//! and the chain of ancestors) and answers with a [`Flow`] deciding whether
//! and how the walk descends. Visiting, searching with early exit and
//! folding are all expressed through this one protocol.

use std::ops::ControlFlow;

use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::node::{Node, Overrides};

/// Decision returned by a visitor for the node it was just shown.
#[derive(Debug)]
pub enum Flow<T> {
    /// Descend into the node's own children.
    Continue,
    /// Descend into this sequence instead of the node's children.
    Descend(Vec<Node<T>>),
    /// Leave this subtree alone; siblings are still visited.
    Skip,
    /// Abort the whole walk.
    Stop,
}

/// Where the visited node sits relative to the walk's starting point.
#[derive(Debug)]
pub struct VisitContext<'a, T> {
    pub depth: usize,
    /// Ancestors of the visited node, outermost first.
    pub path: &'a [Node<T>],
}

impl<'a, T> VisitContext<'a, T> {
    pub fn parent(&self) -> Option<&'a Node<T>> {
        self.path.last()
    }
}

pub trait Visitor<T> {
    fn visit(&mut self, node: &Node<T>, cx: &VisitContext<'_, T>) -> Flow<T>;
}

/// Visitor backed by a closure, see [`from_fn`].
pub struct FnVisitor<F>(F);

impl<T, F> Visitor<T> for FnVisitor<F>
where
    F: FnMut(&Node<T>, &VisitContext<'_, T>) -> Flow<T>,
{
    fn visit(&mut self, node: &Node<T>, cx: &VisitContext<'_, T>) -> Flow<T> {
        (self.0)(node, cx)
    }
}

pub fn from_fn<T, F>(f: F) -> FnVisitor<F>
where
    F: FnMut(&Node<T>, &VisitContext<'_, T>) -> Flow<T>,
{
    FnVisitor(f)
}

/// Configurable walk: starting depth, ancestor path and an optional
/// replacement for the start node's children.
pub struct Traversal<'v, T> {
    visitor: Option<&'v mut dyn Visitor<T>>,
    depth: usize,
    path: Vec<Node<T>>,
    children: Option<Vec<Node<T>>>,
}

impl<'v, T> Default for Traversal<'v, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'v, T> Traversal<'v, T> {
    pub fn new() -> Self {
        Self {
            visitor: None,
            depth: 0,
            path: Vec::new(),
            children: None,
        }
    }

    pub fn visitor(mut self, visitor: &'v mut dyn Visitor<T>) -> Self {
        self.visitor = Some(visitor);
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn path(mut self, path: Vec<Node<T>>) -> Self {
        self.path = path;
        self
    }

    pub fn children(mut self, children: Vec<Node<T>>) -> Self {
        self.children = Some(children);
        self
    }

    /// Visits `node` and, as the visitor directs, everything below it.
    /// Fails with `MissingOperation` if no visitor was attached.
    #[instrument(level = "debug", skip_all, fields(depth = self.depth))]
    pub fn run(self, node: &Node<T>) -> TreeResult<ControlFlow<()>> {
        let Traversal {
            visitor,
            depth,
            mut path,
            children,
        } = self;
        let visitor = visitor.ok_or(TreeError::MissingOperation("traversal"))?;
        let flow = {
            let cx = VisitContext {
                depth,
                path: &path,
            };
            visitor.visit(node, &cx)
        };
        let outcome = match (flow, children) {
            (Flow::Stop, _) => ControlFlow::Break(()),
            (Flow::Skip, _) => ControlFlow::Continue(()),
            (Flow::Continue, None) => descend(node, node.children(), visitor, depth, &mut path),
            (Flow::Continue, Some(over)) | (Flow::Descend(over), _) => {
                descend(node, &over, visitor, depth, &mut path)
            }
        };
        if outcome.is_break() {
            debug!("traversal stopped early");
        }
        Ok(outcome)
    }
}

fn walk_node<T, V>(
    node: &Node<T>,
    visitor: &mut V,
    depth: usize,
    path: &mut Vec<Node<T>>,
) -> ControlFlow<()>
where
    V: Visitor<T> + ?Sized,
{
    let flow = visitor.visit(
        node,
        &VisitContext {
            depth,
            path: path.as_slice(),
        },
    );
    match flow {
        Flow::Stop => ControlFlow::Break(()),
        Flow::Skip => ControlFlow::Continue(()),
        Flow::Continue => descend(node, node.children(), visitor, depth, path),
        Flow::Descend(over) => descend(node, &over, visitor, depth, path),
    }
}

fn descend<T, V>(
    node: &Node<T>,
    children: &[Node<T>],
    visitor: &mut V,
    depth: usize,
    path: &mut Vec<Node<T>>,
) -> ControlFlow<()>
where
    V: Visitor<T> + ?Sized,
{
    path.push(node.clone());
    let mut outcome = ControlFlow::Continue(());
    for child in children {
        outcome = walk_node(child, visitor, depth + 1, path);
        if outcome.is_break() {
            break;
        }
    }
    path.pop();
    outcome
}

impl<T> Node<T> {
    /// Visits this node and its subtree, starting at depth 0.
    pub fn walk<V>(&self, visitor: &mut V) -> ControlFlow<()>
    where
        V: Visitor<T> + ?Sized,
    {
        walk_node(self, visitor, 0, &mut Vec::new())
    }

    /// Visits every descendant, not `self`. Children start at depth 1 with
    /// `self` as their parent.
    pub fn traverse<V>(&self, visitor: &mut V) -> ControlFlow<()>
    where
        V: Visitor<T> + ?Sized,
    {
        descend(self, self.children(), visitor, 0, &mut Vec::new())
    }

    /// Pre-order fold over this subtree, self included, with each node's
    /// depth relative to `self`.
    pub fn fold<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(B, &Node<T>, usize) -> B,
    {
        let mut acc = init;
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            acc = f(acc, node, depth);
            for child in node.children().iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        acc
    }
}

impl<T: Clone> Node<T> {
    /// Bottom-up rewrite. Children are rewritten first; `f` then sees the
    /// (possibly rebuilt) node and returns a replacement or `None` to keep
    /// it. Subtrees where nothing changed come back by identity.
    pub fn rewrite<F>(&self, mut f: F) -> Node<T>
    where
        F: FnMut(&Node<T>) -> Option<Node<T>>,
    {
        self.rewrite_inner(&mut f)
    }

    fn rewrite_inner<F>(&self, f: &mut F) -> Node<T>
    where
        F: FnMut(&Node<T>) -> Option<Node<T>>,
    {
        let mut changed = false;
        let children: Vec<Node<T>> = self
            .children()
            .iter()
            .map(|child| {
                let rewritten = child.rewrite_inner(f);
                changed |= !Node::ptr_eq(&rewritten, child);
                rewritten
            })
            .collect();
        let base = if changed {
            self.derive(Overrides::new().children(children))
        } else {
            self.clone()
        };
        f(&base).unwrap_or(base)
    }
}
