use crate::Dimensions;
use std::sync::OnceLock;

/// Representative dimensions shared across every template unit of a build.
///
/// Write-once: the first unit that resolves a representative image wins and
/// later units never overwrite it.
#[derive(Debug, Default)]
pub struct FallbackDimensions {
    cell: OnceLock<Dimensions>,
}

impl FallbackDimensions {
    /// Creates an empty fallback cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fallback, if any unit has set it.
    pub fn get(&self) -> Option<Dimensions> {
        self.cell.get().copied()
    }

    /// Stores `dims` if nothing is stored yet. Returns `true` when this call set it.
    pub fn set_if_unset(&self, dims: Dimensions) -> bool {
        self.cell.set(dims).is_ok()
    }
}
