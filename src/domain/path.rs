//! Structural addressing: root-to-node sequences of sibling indices.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::domain::error::{OutlineError, OutlineResult};

/// Separator between sibling indices in a rendered path key.
pub const PATH_SEPARATOR: char = '.';

/// Position of a line within an outline, as the sequence of sibling
/// indices from the top level down to the line itself.
///
/// Paths order numerically per segment, with a parent sorting before its
/// descendants. Ascending `NodePath` order is exactly depth-first
/// pre-order of the lines the paths address, independent of how the
/// rendered keys would sort as strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path of a top-level line at the given position.
    pub fn top_level(position: usize) -> Self {
        Self(vec![position])
    }

    pub fn from_segments(segments: Vec<usize>) -> Self {
        debug_assert!(!segments.is_empty());
        Self(segments)
    }

    /// Parse a rendered path key.
    ///
    /// Empty keys and non-numeric segments are rejected as recoverable
    /// format errors.
    pub fn parse(key: &str) -> OutlineResult<Self> {
        if key.is_empty() {
            return Err(OutlineError::InvalidPath {
                key: key.to_string(),
                reason: "empty path key".to_string(),
            });
        }
        let segments = key
            .split(PATH_SEPARATOR)
            .map(|segment| {
                segment.parse::<usize>().map_err(|_| OutlineError::InvalidPath {
                    key: key.to_string(),
                    reason: format!("non-numeric segment: '{}'", segment),
                })
            })
            .collect::<OutlineResult<Vec<usize>>>()?;
        Ok(Self(segments))
    }

    /// Path of the parent, `None` for a top-level path.
    pub fn parent(&self) -> Option<NodePath> {
        if self.0.len() <= 1 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Path of a child of this node at the given sibling position.
    pub fn child(&self, position: usize) -> NodePath {
        let mut segments = self.0.clone();
        segments.push(position);
        Self(segments)
    }

    /// Sibling position of the addressed line within its parent.
    pub fn leaf(&self) -> usize {
        *self.0.last().expect("a path has at least one segment")
    }

    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(&PATH_SEPARATOR.to_string()))
    }
}

impl FromStr for NodePath {
    type Err = OutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
