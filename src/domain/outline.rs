//! Single-level outline: an ordered sequence of (line, item) pairs.

use std::rc::Rc;

use generational_arena::{Arena, Index};
use tracing::{instrument, warn};

use crate::domain::error::{OutlineError, OutlineResult};
use crate::domain::line::Line;
use crate::domain::path::NodePath;
use crate::domain::store::OutlineStore;
use crate::view::{OutlineView, StoreHandle, ViewRegistry};

/// Flat outline engine.
///
/// Items live in a generational arena; an explicit order vector carries
/// the sequence. Insertion order is significant and preserved across all
/// mutations.
#[derive(Debug)]
pub struct Outline<T> {
    arena: Arena<T>,
    order: Vec<Index>,
    store: StoreHandle,
    views: ViewRegistry,
}

impl<T> Default for Outline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Outline<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            order: Vec::new(),
            store: StoreHandle::next(),
            views: ViewRegistry::new(),
        }
    }

    /// Insert immediately before `anchor`; `None` appends at the end.
    #[instrument(level = "trace", skip(self, item))]
    pub fn insert_before(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line> {
        let position = match anchor {
            Some(line) => self.position(line)?,
            None => self.order.len(),
        };
        Ok(self.insert_at(position, item))
    }

    /// Insert immediately after `anchor`; `None` prepends at the start.
    #[instrument(level = "trace", skip(self, item))]
    pub fn insert_after(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line> {
        let position = match anchor {
            Some(line) => self.position(line)? + 1,
            None => 0,
        };
        Ok(self.insert_at(position, item))
    }

    /// Direct lookup. A stale or foreign line warns and returns `None`.
    pub fn get_item(&self, line: Line) -> Option<&T> {
        let item = self.arena.get(line.index());
        if item.is_none() {
            warn!("line {:?} does not resolve to an item", line);
        }
        item
    }

    pub fn get_item_mut(&mut self, line: Line) -> Option<&mut T> {
        let item = self.arena.get_mut(line.index());
        if item.is_none() {
            warn!("line {:?} does not resolve to an item", line);
        }
        item
    }

    /// Lines in current order. Each call starts a fresh traversal.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            order: self.order.iter(),
        }
    }

    /// Items in current order. Each call starts a fresh traversal.
    pub fn items(&self) -> Items<'_, T> {
        Items {
            arena: &self.arena,
            order: self.order.iter(),
        }
    }

    /// (Line, item) pairs in current order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: &self.arena,
            order: self.order.iter(),
        }
    }

    /// Remove everything and replace the storage handle. Idempotent.
    #[instrument(level = "trace", skip(self))]
    pub fn clear(&mut self) {
        for index in self.order.drain(..) {
            self.arena.remove(index);
        }
        self.store = StoreHandle::next();
        self.views.notify(self.store);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identity of the backing storage, for view binding.
    pub fn store(&self) -> StoreHandle {
        self.store
    }

    pub fn attach(&mut self, view: Rc<dyn OutlineView>) {
        self.views.attach(view);
    }

    pub fn detach(&mut self, view: &Rc<dyn OutlineView>) {
        self.views.detach(view);
    }

    pub fn detach_all(&mut self) {
        self.views.detach_all();
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Structural path of a live line.
    pub fn path_of(&self, line: Line) -> Option<NodePath> {
        self.order
            .iter()
            .position(|&index| index == line.index())
            .map(NodePath::top_level)
    }

    /// Every live line with its path, in order.
    pub fn line_paths(&self) -> Vec<(NodePath, Line)> {
        self.order
            .iter()
            .enumerate()
            .map(|(position, &index)| (NodePath::top_level(position), Line(index)))
            .collect()
    }

    /// Insert at the numeric index a single-segment path denotes.
    pub fn insert_at_path(&mut self, path: &NodePath, item: T) -> OutlineResult<Line> {
        if path.depth() != 1 {
            return Err(OutlineError::InvalidPath {
                key: path.to_string(),
                reason: "flat outline expects a single-segment path".to_string(),
            });
        }
        let position = path.leaf();
        if position > self.order.len() {
            return Err(OutlineError::DanglingParent {
                key: path.to_string(),
            });
        }
        Ok(self.insert_at(position, item))
    }

    fn insert_at(&mut self, position: usize, item: T) -> Line {
        let index = self.arena.insert(item);
        self.order.insert(position, index);
        Line(index)
    }

    fn position(&self, line: Line) -> OutlineResult<usize> {
        self.order
            .iter()
            .position(|&index| index == line.index())
            .ok_or(OutlineError::StaleLine(line))
    }
}

impl<T: Clone> Clone for Outline<T> {
    /// Clones contents only. The clone gets a fresh storage handle and an
    /// empty view registry.
    fn clone(&self) -> Self {
        let mut clone = Self::new();
        for item in self.items() {
            let index = clone.arena.insert(item.clone());
            clone.order.push(index);
        }
        clone
    }
}

/// Two outlines are equal iff same length and item-wise equal. Line
/// identity, storage handle, and attached views never participate.
impl<T: PartialEq> PartialEq for Outline<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.items().eq(other.items())
    }
}

impl<T: Eq> Eq for Outline<T> {}

impl<T> OutlineStore<T> for Outline<T> {
    fn insert_before(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line> {
        Outline::insert_before(self, item, anchor)
    }

    fn insert_after(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line> {
        Outline::insert_after(self, item, anchor)
    }

    fn get_item(&self, line: Line) -> Option<&T> {
        Outline::get_item(self, line)
    }

    fn len(&self) -> usize {
        Outline::len(self)
    }

    fn clear(&mut self) {
        Outline::clear(self)
    }

    fn store(&self) -> StoreHandle {
        Outline::store(self)
    }

    fn attach(&mut self, view: Rc<dyn OutlineView>) {
        Outline::attach(self, view)
    }

    fn detach(&mut self, view: &Rc<dyn OutlineView>) {
        Outline::detach(self, view)
    }

    fn detach_all(&mut self) {
        Outline::detach_all(self)
    }

    fn path_of(&self, line: Line) -> Option<NodePath> {
        Outline::path_of(self, line)
    }

    fn line_paths(&self) -> Vec<(NodePath, Line)> {
        Outline::line_paths(self)
    }

    fn insert_at_path(&mut self, path: &NodePath, item: T) -> OutlineResult<Line> {
        Outline::insert_at_path(self, path, item)
    }
}

pub struct Lines<'a> {
    order: std::slice::Iter<'a, Index>,
}

impl Iterator for Lines<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        self.order.next().map(|&index| Line(index))
    }
}

pub struct Items<'a, T> {
    arena: &'a Arena<T>,
    order: std::slice::Iter<'a, Index>,
}

impl<'a, T> Iterator for Items<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.order.next().and_then(|&index| self.arena.get(index))
    }
}

pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    order: std::slice::Iter<'a, Index>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Line, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.order
            .next()
            .and_then(|&index| self.arena.get(index).map(|item| (Line(index), item)))
    }
}
