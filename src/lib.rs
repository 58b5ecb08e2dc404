//! Persistent n-ary trees.
//!
//! Every edit returns a new [`Node`] and leaves the original untouched.
//! Subtrees off the edited path are shared by handle between versions, so an
//! edit at depth `d` allocates at most `d + 1` nodes no matter how large the
//! tree is.
//!
//! ```
//! use rstree::{Edit, Node};
//!
//! let tree = Node::new("root", vec![Node::leaf("a"), Node::leaf("b")]);
//! let edited = tree.transform([1], Edit::SetPayload("B")).unwrap();
//!
//! assert_eq!(*edited.locate([1]).unwrap().payload(), "B");
//! assert_eq!(*tree.locate([1]).unwrap().payload(), "b");
//! assert!(Node::ptr_eq(&edited.children()[0], &tree.children()[0]));
//! ```

pub mod cli;
pub mod edit;
pub mod errors;
pub mod exitcode;
pub mod iter;
pub mod navigator;
pub mod node;
pub mod outline;
pub mod path;
pub mod traverse;
pub mod tree_traits;
pub mod util;

pub use edit::Edit;
pub use errors::{TreeError, TreeResult};
pub use iter::SharingStats;
pub use navigator::Transform;
pub use node::{Node, NodeId, Overrides};
pub use path::TreePath;
pub use traverse::{from_fn, Flow, Traversal, VisitContext, Visitor};
pub use tree_traits::TreeNodeConvert;
