use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::errors::TreeError;

/// Ordered child indices addressing a node relative to some ancestor.
///
/// Renders as `0/2/1`; the empty path (the ancestor itself) renders as `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath(Vec<usize>);

impl TreePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push(index);
        path
    }

    /// Path of the parent, `None` for the root path.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, init)| Self(init.to_vec()))
    }

    pub fn split_first(&self) -> Option<(usize, &[usize])> {
        self.0.split_first().map(|(head, rest)| (*head, rest))
    }
}

impl AsRef<[usize]> for TreePath {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for TreePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for TreePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for TreePath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.0.iter().join("/"))
        }
    }
}

impl FromStr for TreePath {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .split('/')
            .map(|segment| {
                segment.trim().parse::<usize>().map_err(|_| {
                    TreeError::InvalidPath(format!("bad segment {segment:?} in {s:?}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TreePath::root().to_string(), "/");
        assert_eq!(TreePath::from([0, 2, 1]).to_string(), "0/2/1");
    }

    #[test]
    fn test_parse() {
        assert_eq!("".parse::<TreePath>().unwrap(), TreePath::root());
        assert_eq!("/".parse::<TreePath>().unwrap(), TreePath::root());
        assert_eq!("/0/2/".parse::<TreePath>().unwrap(), TreePath::from([0, 2]));
        assert!(matches!(
            "0/x".parse::<TreePath>(),
            Err(TreeError::InvalidPath(_))
        ));
        assert!("0//1".parse::<TreePath>().is_err());
    }

    #[test]
    fn test_parent_and_child() {
        let path = TreePath::from([1, 3]);
        assert_eq!(path.parent(), Some(TreePath::from([1])));
        assert_eq!(TreePath::root().parent(), None);
        assert_eq!(path.child(0), TreePath::from([1, 3, 0]));
    }
}
