//! Generic ordered-tree/outline engine.
//!
//! Two topologies share one contract: [`Outline`] keeps a flat ordered
//! sequence of items, [`OutlineMulti`] an ordered forest, both addressed
//! through stable [`Line`] handles backed by a generational arena. The
//! [`codec`] serializes either form to a path-keyed [`PersistentForm`];
//! the [`view`] registry fans storage-handle changes out to attached
//! observers without the engine depending on any presentation toolkit.
//!
//! The engine never renders and never performs file I/O; those belong to
//! the collaborators at its boundary.

pub mod codec;
pub mod domain;
pub mod util;
pub mod view;

pub use codec::{export, import, PersistentForm};
pub use domain::{
    Line, NodePath, Outline, OutlineError, OutlineMulti, OutlineResult, OutlineStore, ToTreeString,
};
pub use view::{OutlineView, StoreHandle, ViewRegistry};
