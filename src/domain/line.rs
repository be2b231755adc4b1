//! Stable handles to outline slots.

use generational_arena::Index;

/// Opaque handle to one slot in an outline.
///
/// A line stays valid for as long as its slot exists; removing the slot
/// invalidates the line. The generational index guarantees that a stale
/// line never resolves to a re-occupied slot. Lines carry no externally
/// meaningful ordering value and are resolvable only through outline
/// operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line(pub(crate) Index);

impl Line {
    pub(crate) fn index(self) -> Index {
        self.0
    }
}
