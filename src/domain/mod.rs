//! Domain layer: outline engines and structural addressing
//!
//! This layer is independent of external concerns (no I/O, no rendering,
//! no persistence format knowledge beyond structural paths).

pub mod display;
pub mod error;
pub mod line;
pub mod multi;
pub mod outline;
pub mod path;
pub mod store;

pub use display::ToTreeString;
pub use error::{OutlineError, OutlineResult};
pub use line::Line;
pub use multi::OutlineMulti;
pub use outline::Outline;
pub use path::NodePath;
pub use store::OutlineStore;
