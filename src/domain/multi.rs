//! Multi-level outline: an ordered forest on the same line/item model.

use std::rc::Rc;

use generational_arena::{Arena, Index};
use tracing::{instrument, warn};

use crate::domain::error::{OutlineError, OutlineResult};
use crate::domain::line::Line;
use crate::domain::path::NodePath;
use crate::domain::store::OutlineStore;
use crate::view::{OutlineView, StoreHandle, ViewRegistry};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
struct Node<T> {
    item: T,
    /// Non-owning back-reference to the parent, `None` for top-level lines
    parent: Option<Index>,
    /// Child indices in sibling order
    children: Vec<Index>,
}

/// Tree-shaped outline engine.
///
/// Conceptually a forest: an ordered sequence of top-level lines, each
/// optionally owning an ordered sequence of child lines, recursively.
/// Nodes live in a generational arena; parent fields are back-references
/// resolved by lookup, never freed through that reference. Canonical
/// traversal is depth-first pre-order: a line precedes all its
/// descendants, which precede its next sibling.
#[derive(Debug)]
pub struct OutlineMulti<T> {
    arena: Arena<Node<T>>,
    roots: Vec<Index>,
    store: StoreHandle,
    views: ViewRegistry,
}

impl<T> Default for OutlineMulti<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OutlineMulti<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            store: StoreHandle::next(),
            views: ViewRegistry::new(),
        }
    }

    /// Append as last child of `parent`, or as a new top-level line when
    /// `parent` is `None`.
    #[instrument(level = "trace", skip(self, item))]
    pub fn insert_child(&mut self, item: T, parent: Option<Line>) -> OutlineResult<Line> {
        let parent_index = match parent {
            Some(line) => {
                if !self.arena.contains(line.index()) {
                    return Err(OutlineError::StaleLine(line));
                }
                Some(line.index())
            }
            None => None,
        };
        Ok(Line(self.append(item, parent_index)))
    }

    /// Insert immediately before `anchor` within its sibling list; `None`
    /// appends at the end of the top level.
    #[instrument(level = "trace", skip(self, item))]
    pub fn insert_before(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line> {
        match anchor {
            Some(line) => {
                let (parent, position) = self.sibling_slot(line)?;
                Ok(Line(self.place(item, parent, position)))
            }
            None => Ok(Line(self.append(item, None))),
        }
    }

    /// Insert immediately after `anchor` within its sibling list; `None`
    /// prepends at the start of the top level.
    #[instrument(level = "trace", skip(self, item))]
    pub fn insert_after(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line> {
        match anchor {
            Some(line) => {
                let (parent, position) = self.sibling_slot(line)?;
                Ok(Line(self.place(item, parent, position + 1)))
            }
            None => Ok(Line(self.place(item, None, 0))),
        }
    }

    /// Direct lookup. A stale or foreign line warns and returns `None`.
    pub fn get_item(&self, line: Line) -> Option<&T> {
        let node = self.arena.get(line.index());
        if node.is_none() {
            warn!("line {:?} does not resolve to an item", line);
        }
        node.map(|node| &node.item)
    }

    pub fn get_item_mut(&mut self, line: Line) -> Option<&mut T> {
        let node = self.arena.get_mut(line.index());
        if node.is_none() {
            warn!("line {:?} does not resolve to an item", line);
        }
        node.map(|node| &mut node.item)
    }

    /// (Line, item) pairs of the section rooted at `root` inclusive, in
    /// depth-first pre-order; `None` traverses the whole forest. Each call
    /// starts a fresh traversal.
    pub fn iter_section(&self, root: Option<Line>) -> SectionIter<'_, T> {
        let stack = match root {
            None => self.roots.iter().rev().copied().collect(),
            Some(line) if self.arena.contains(line.index()) => vec![line.index()],
            Some(line) => {
                warn!("line {:?} does not resolve to a section", line);
                Vec::new()
            }
        };
        SectionIter {
            arena: &self.arena,
            stack,
        }
    }

    pub fn lines_section(&self, root: Option<Line>) -> SectionLines<'_, T> {
        SectionLines {
            inner: self.iter_section(root),
        }
    }

    pub fn items_section(&self, root: Option<Line>) -> SectionItems<'_, T> {
        SectionItems {
            inner: self.iter_section(root),
        }
    }

    pub fn iter(&self) -> SectionIter<'_, T> {
        self.iter_section(None)
    }

    pub fn lines(&self) -> SectionLines<'_, T> {
        self.lines_section(None)
    }

    pub fn items(&self) -> SectionItems<'_, T> {
        self.items_section(None)
    }

    /// Depth-first post-order companion traversal (children before their
    /// parent).
    pub fn lines_postorder(&self) -> PostOrderLines<'_, T> {
        PostOrderLines {
            arena: &self.arena,
            stack: self.roots.iter().rev().map(|&index| (index, false)).collect(),
        }
    }

    /// Copy a section of `other` into this outline, appended as the last
    /// child of `target_parent` (top level when `None`).
    ///
    /// With `source_root == None` the entire `other` forest is appended:
    /// all top-level lines with their full subtrees, preserving relative
    /// order and nesting. Structure is duplicated with newly minted
    /// destination lines; items are shallow-copied via `Clone` (payloads
    /// that must be shared by reference use reference-counted item types).
    /// `other` is left unmodified. Returns the destination lines of the
    /// copied roots.
    #[instrument(level = "trace", skip(self, other))]
    pub fn insert_section(
        &mut self,
        other: &OutlineMulti<T>,
        target_parent: Option<Line>,
        source_root: Option<Line>,
    ) -> OutlineResult<Vec<Line>>
    where
        T: Clone,
    {
        // validate both anchors before any mutation
        let target = match target_parent {
            Some(line) => {
                if !self.arena.contains(line.index()) {
                    return Err(OutlineError::StaleLine(line));
                }
                Some(line.index())
            }
            None => None,
        };
        let source_roots = match source_root {
            Some(line) => {
                if !other.arena.contains(line.index()) {
                    return Err(OutlineError::StaleLine(line));
                }
                vec![line.index()]
            }
            None => other.roots.clone(),
        };

        let mut copied = Vec::with_capacity(source_roots.len());
        for source in source_roots {
            if let Some(line) = self.copy_section(other, source, target) {
                copied.push(line);
            }
        }
        Ok(copied)
    }

    /// Remove `line` and its entire descendant subtree, returning the
    /// number of slots removed. `None` is a no-op; a stale line warns and
    /// removes nothing.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_section(&mut self, line: Option<Line>) -> usize {
        let Some(line) = line else { return 0 };
        let Some(parent) = self.arena.get(line.index()).map(|node| node.parent) else {
            warn!("line {:?} does not resolve to a section", line);
            return 0;
        };

        // detach from the sibling list first, then drain the subtree
        match parent {
            Some(parent_index) => {
                if let Some(parent_node) = self.arena.get_mut(parent_index) {
                    parent_node.children.retain(|&child| child != line.index());
                }
            }
            None => self.roots.retain(|&root| root != line.index()),
        }

        let mut removed = 0;
        let mut stack = vec![line.index()];
        while let Some(index) = stack.pop() {
            if let Some(node) = self.arena.remove(index) {
                removed += 1;
                stack.extend(node.children);
            }
        }
        removed
    }

    /// Remove everything and replace the storage handle. Idempotent.
    #[instrument(level = "trace", skip(self))]
    pub fn clear(&mut self) {
        let indices: Vec<Index> = self.arena.iter().map(|(index, _)| index).collect();
        for index in indices {
            self.arena.remove(index);
        }
        self.roots.clear();
        self.store = StoreHandle::next();
        self.views.notify(self.store);
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Longest top-level-to-leaf chain over the whole forest.
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.depth_below(root))
            .max()
            .unwrap_or(0)
    }

    fn depth_below(&self, index: Index) -> usize {
        match self.arena.get(index) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.depth_below(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Lines with no children, in traversal order.
    pub fn leaf_lines(&self) -> Vec<Line> {
        self.lines()
            .filter(|line| {
                self.arena
                    .get(line.index())
                    .is_some_and(|node| node.children.is_empty())
            })
            .collect()
    }

    /// Children of `parent` in sibling order; `None` lists the top level.
    /// A stale parent warns and returns an empty list.
    pub fn child_lines(&self, parent: Option<Line>) -> Vec<Line> {
        match parent {
            None => self.roots.iter().map(|&index| Line(index)).collect(),
            Some(line) => match self.arena.get(line.index()) {
                Some(node) => node.children.iter().map(|&index| Line(index)).collect(),
                None => {
                    warn!("line {:?} does not resolve to an item", line);
                    Vec::new()
                }
            },
        }
    }

    /// Parent of `line`, `None` for top-level or stale lines.
    pub fn parent_line(&self, line: Line) -> Option<Line> {
        match self.arena.get(line.index()) {
            Some(node) => node.parent.map(Line),
            None => {
                warn!("line {:?} does not resolve to an item", line);
                None
            }
        }
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
        self.arena.get(line.index())?;
        let mut segments = Vec::new();
        let mut current = line.index();
        loop {
            let node = self.arena.get(current)?;
            match node.parent {
                Some(parent) => {
                    let parent_node = self.arena.get(parent)?;
                    let position = parent_node
                        .children
                        .iter()
                        .position(|&child| child == current)?;
                    segments.push(position);
                    current = parent;
                }
                None => {
                    let position = self.roots.iter().position(|&root| root == current)?;
                    segments.push(position);
                    break;
                }
            }
        }
        segments.reverse();
        Some(NodePath::from_segments(segments))
    }

    /// Every live line with its path, in depth-first pre-order.
    pub fn line_paths(&self) -> Vec<(NodePath, Line)> {
        let mut paths = Vec::with_capacity(self.arena.len());
        let mut stack: Vec<(Index, NodePath)> = self
            .roots
            .iter()
            .enumerate()
            .rev()
            .map(|(position, &index)| (index, NodePath::top_level(position)))
            .collect();
        while let Some((index, path)) = stack.pop() {
            let Some(node) = self.arena.get(index) else {
                continue;
            };
            for (position, &child) in node.children.iter().enumerate().rev() {
                stack.push((child, path.child(position)));
            }
            paths.push((path, Line(index)));
        }
        paths
    }

    /// Append under the parent a structural path denotes; the parent (path
    /// truncated by one segment) must already exist.
    pub fn insert_at_path(&mut self, path: &NodePath, item: T) -> OutlineResult<Line> {
        let parent = match path.parent() {
            Some(parent_path) => Some(self.resolve(&parent_path).ok_or_else(|| {
                OutlineError::DanglingParent {
                    key: path.to_string(),
                }
            })?),
            None => None,
        };
        Ok(Line(self.append(item, parent)))
    }

    fn resolve(&self, path: &NodePath) -> Option<Index> {
        let mut segments = path.segments().iter();
        let mut current = *self.roots.get(*segments.next()?)?;
        for &segment in segments {
            current = *self.arena.get(current)?.children.get(segment)?;
        }
        Some(current)
    }

    fn mint(&mut self, item: T, parent: Option<Index>) -> Index {
        self.arena.insert(Node {
            item,
            parent,
            children: Vec::new(),
        })
    }

    fn append(&mut self, item: T, parent: Option<Index>) -> Index {
        let index = self.mint(item, parent);
        match parent {
            Some(parent_index) => {
                if let Some(parent_node) = self.arena.get_mut(parent_index) {
                    parent_node.children.push(index);
                }
            }
            None => self.roots.push(index),
        }
        index
    }

    fn place(&mut self, item: T, parent: Option<Index>, position: usize) -> Index {
        let index = self.mint(item, parent);
        match parent {
            Some(parent_index) => {
                if let Some(parent_node) = self.arena.get_mut(parent_index) {
                    parent_node.children.insert(position, index);
                }
            }
            None => self.roots.insert(position, index),
        }
        index
    }

    /// Sibling list and position of `anchor` within it.
    fn sibling_slot(&self, anchor: Line) -> OutlineResult<(Option<Index>, usize)> {
        let node = self
            .arena
            .get(anchor.index())
            .ok_or(OutlineError::StaleLine(anchor))?;
        match node.parent {
            Some(parent) => {
                let parent_node = self
                    .arena
                    .get(parent)
                    .ok_or(OutlineError::StaleLine(anchor))?;
                let position = parent_node
                    .children
                    .iter()
                    .position(|&child| child == anchor.index())
                    .ok_or(OutlineError::StaleLine(anchor))?;
                Ok((Some(parent), position))
            }
            None => {
                let position = self
                    .roots
                    .iter()
                    .position(|&root| root == anchor.index())
                    .ok_or(OutlineError::StaleLine(anchor))?;
                Ok((None, position))
            }
        }
    }

    fn copy_section(
        &mut self,
        other: &OutlineMulti<T>,
        source: Index,
        target: Option<Index>,
    ) -> Option<Line>
    where
        T: Clone,
    {
        let mut copied_root = None;
        let mut stack = vec![(source, target)];
        while let Some((source_index, destination_parent)) = stack.pop() {
            let Some(node) = other.arena.get(source_index) else {
                continue;
            };
            let destination = self.append(node.item.clone(), destination_parent);
            if source_index == source {
                copied_root = Some(Line(destination));
            }
            // children pushed in reverse so sibling order is preserved
            for &child in node.children.iter().rev() {
                stack.push((child, Some(destination)));
            }
        }
        copied_root
    }
}

impl<T: Clone> Clone for OutlineMulti<T> {
    /// Clones the forest only. The clone gets a fresh storage handle and
    /// an empty view registry.
    fn clone(&self) -> Self {
        let mut clone = Self::new();
        for &root in &self.roots {
            clone.copy_section(self, root, None);
        }
        clone
    }
}

/// Two outlines are equal iff they have the same forest shape and are
/// item-wise equal in depth-first order. Line identity, storage handle,
/// and attached views never participate.
impl<T: PartialEq> PartialEq for OutlineMulti<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.arena.len() != other.arena.len() || self.roots.len() != other.roots.len() {
            return false;
        }
        let mut stack: Vec<(Index, Index)> = self
            .roots
            .iter()
            .zip(other.roots.iter())
            .map(|(&a, &b)| (a, b))
            .collect();
        while let Some((left, right)) = stack.pop() {
            let (left_node, right_node) = match (self.arena.get(left), other.arena.get(right)) {
                (Some(l), Some(r)) => (l, r),
                _ => return false,
            };
            if left_node.item != right_node.item
                || left_node.children.len() != right_node.children.len()
            {
                return false;
            }
            stack.extend(
                left_node
                    .children
                    .iter()
                    .zip(right_node.children.iter())
                    .map(|(&a, &b)| (a, b)),
            );
        }
        true
    }
}

impl<T: Eq> Eq for OutlineMulti<T> {}

impl<T> OutlineStore<T> for OutlineMulti<T> {
    fn insert_before(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line> {
        OutlineMulti::insert_before(self, item, anchor)
    }

    fn insert_after(&mut self, item: T, anchor: Option<Line>) -> OutlineResult<Line> {
        OutlineMulti::insert_after(self, item, anchor)
    }

    fn get_item(&self, line: Line) -> Option<&T> {
        OutlineMulti::get_item(self, line)
    }

    fn len(&self) -> usize {
        OutlineMulti::len(self)
    }

    fn clear(&mut self) {
        OutlineMulti::clear(self)
    }

    fn store(&self) -> StoreHandle {
        OutlineMulti::store(self)
    }

    fn attach(&mut self, view: Rc<dyn OutlineView>) {
        OutlineMulti::attach(self, view)
    }

    fn detach(&mut self, view: &Rc<dyn OutlineView>) {
        OutlineMulti::detach(self, view)
    }

    fn detach_all(&mut self) {
        OutlineMulti::detach_all(self)
    }

    fn path_of(&self, line: Line) -> Option<NodePath> {
        OutlineMulti::path_of(self, line)
    }

    fn line_paths(&self) -> Vec<(NodePath, Line)> {
        OutlineMulti::line_paths(self)
    }

    fn insert_at_path(&mut self, path: &NodePath, item: T) -> OutlineResult<Line> {
        OutlineMulti::insert_at_path(self, path, item)
    }
}

pub struct SectionIter<'a, T> {
    arena: &'a Arena<Node<T>>,
    stack: Vec<Index>,
}

impl<'a, T> Iterator for SectionIter<'a, T> {
    type Item = (Line, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.stack.pop() {
            if let Some(node) = self.arena.get(index) {
                // push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((Line(index), &node.item));
            }
        }
        None
    }
}

pub struct SectionLines<'a, T> {
    inner: SectionIter<'a, T>,
}

impl<T> Iterator for SectionLines<'_, T> {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(line, _)| line)
    }
}

pub struct SectionItems<'a, T> {
    inner: SectionIter<'a, T>,
}

impl<'a, T> Iterator for SectionItems<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, item)| item)
    }
}

pub struct PostOrderLines<'a, T> {
    arena: &'a Arena<Node<T>>,
    stack: Vec<(Index, bool)>,
}

impl<T> Iterator for PostOrderLines<'_, T> {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get(index) {
                if !visited {
                    self.stack.push((index, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some(Line(index));
                }
            }
        }
        None
    }
}
