//! Persistence codec for outlines.

pub mod persist;

pub use persist::{export, import, PersistentForm};
