//! View layer: observer registry for presentation bindings.
//!
//! The engine exposes only `attach`/`detach` and the storage handle; it
//! performs no rendering, layout, or event handling.

pub mod registry;

pub use registry::{OutlineView, StoreHandle, ViewRegistry};
