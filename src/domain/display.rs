//! Diagnostic tree rendering for logs and test output.

use std::fmt;

use termtree::Tree;

use crate::domain::multi::OutlineMulti;
use crate::domain::outline::Outline;

/// Render an outline as a [`termtree::Tree`] for diagnostics.
///
/// Developer tooling only; presentation bindings go through the view
/// registry instead.
pub trait ToTreeString {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T: fmt::Display> ToTreeString for Outline<T> {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self
            .items()
            .map(|item| Tree::new(item.to_string()))
            .collect();
        Tree::new("outline".to_string()).with_leaves(leaves)
    }
}

impl<T: fmt::Display> ToTreeString for OutlineMulti<T> {
    fn to_tree_string(&self) -> Tree<String> {
        fn build<T: fmt::Display>(outline: &OutlineMulti<T>, line: crate::domain::Line) -> Tree<String> {
            let label = outline
                .get_item(line)
                .map(|item| item.to_string())
                .unwrap_or_default();
            let leaves: Vec<_> = outline
                .child_lines(Some(line))
                .into_iter()
                .map(|child| build(outline, child))
                .collect();
            Tree::new(label).with_leaves(leaves)
        }

        let leaves: Vec<_> = self
            .child_lines(None)
            .into_iter()
            .map(|root| build(self, root))
            .collect();
        Tree::new("outline".to_string()).with_leaves(leaves)
    }
}
