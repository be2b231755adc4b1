//! Shared contract implemented by both outline topologies.

use std::rc::Rc;

use crate::domain::error::OutlineResult;
use crate::domain::line::Line;
use crate::domain::path::NodePath;
use crate::view::{OutlineView, StoreHandle};

/// The one contract shared by the flat and the tree-shaped outline.
///
/// Collaborators that do not care about tree shape (the persistence codec,
/// generic model plumbing) are written once against this trait. Anchored
/// insertion, lookup, clearing, structural path addressing, and the view
/// registry surface behave identically across topologies.
pub trait OutlineStore<T> {
    /// Insert `item` immediately before `anchor`; `None` appends at the
    /// end. A stale anchor is collaborator misuse and fails without
    /// mutating the outline.
    fn insert_before(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line>;

    /// Insert `item` immediately after `anchor`; `None` prepends at the
    /// start.
    fn insert_after(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line>;

    /// Direct lookup. A stale or foreign line logs a warning and returns
    /// `None`, never panics.
    fn get_item(&self, line: Line) -> Option<&T>;

    /// Number of occupied slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove everything, replace the storage handle, and notify attached
    /// views. Idempotent.
    fn clear(&mut self);

    /// Identity of the backing storage, for view binding.
    fn store(&self) -> StoreHandle;

    fn attach(&mut self, view: Rc<dyn OutlineView>);

    fn detach(&mut self, view: &Rc<dyn OutlineView>);

    fn detach_all(&mut self);

    /// Structural path of a live line, `None` for a stale one.
    fn path_of(&self, line: Line) -> Option<NodePath>;

    /// Every live line with its path, in depth-first pre-order. Drives the
    /// persistence codec's export walk.
    fn line_paths(&self) -> Vec<(NodePath, Line)>;

    /// Insert `item` at the slot a structural path denotes. The parent is
    /// the path truncated by one segment (top level when the truncation is
    /// empty) and must already exist. Drives the codec's import walk.
    fn insert_at_path(&mut self, path: &NodePath, item: T) -> OutlineResult<Line>;
}
