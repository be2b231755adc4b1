//! Persistence codec: outline <-> path-keyed mapping.
//!
//! The codec is written once against [`OutlineStore`] and works for both
//! topologies. It never touches files; the persistence layer moves the
//! [`PersistentForm`] to and from its durable container.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{NodePath, OutlineResult, OutlineStore};

/// Durable form of an outline: structural path key -> item.
///
/// Every live line has exactly one key; rebuilding in ascending path order
/// reproduces the original depth-first item sequence exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistentForm<T> {
    entries: BTreeMap<String, T>,
}

impl<T> PersistentForm<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: String, item: T) -> Option<T> {
        self.entries.insert(key, item)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PersistentForm<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize `outline` to its durable form.
///
/// Walks the outline in `lines()` order and records each line's unique
/// path string mapped to a clone of its item.
#[instrument(level = "debug", skip_all)]
pub fn export<T, O>(outline: &O) -> PersistentForm<T>
where
    T: Clone,
    O: OutlineStore<T>,
{
    let mut form = PersistentForm::new();
    for (path, line) in outline.line_paths() {
        if let Some(item) = outline.get_item(line) {
            form.insert(path.to_string(), item.clone());
        }
    }
    form
}

/// Rebuild an outline from its durable form.
///
/// Every key is parsed before the outline is touched, so syntactic errors
/// never mutate. Entries are then replayed in ascending numeric path
/// order; each parent is found by truncating the path by one segment. A
/// dangling parent reference aborts the import; the caller must discard
/// the partially populated outline rather than use it.
#[instrument(level = "debug", skip_all)]
pub fn import<T, O>(outline: &mut O, form: &PersistentForm<T>) -> OutlineResult<()>
where
    T: Clone,
    O: OutlineStore<T>,
{
    let entries = form
        .iter()
        .map(|(key, item)| NodePath::parse(key).map(|path| (path, item)))
        .collect::<OutlineResult<Vec<_>>>()?;

    // ascending numeric path order equals depth-first pre-order; the
    // rendered keys would sort wrongly past nine siblings
    for (path, item) in entries
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
    {
        outline.insert_at_path(&path, item.clone())?;
    }
    Ok(())
}
