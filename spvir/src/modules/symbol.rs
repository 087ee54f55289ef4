//! Function references used by metadata operands.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reference to a function defined within a [`crate::Module`].
///
/// References stay valid for as long as the function is part of the module;
/// functions are identified by UUID, never by position, so reordering or
/// renaming a function does not invalidate metadata pointing at it.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionRef(pub Uuid);

impl FunctionRef {
    /// Get the UUID of the referenced function.
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}
