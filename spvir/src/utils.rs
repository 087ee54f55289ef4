use strum::{EnumIs, EnumTryAs};
use thiserror::Error;
use uuid::Uuid;

/// Well-formedness violations reported by [`crate::Module::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum Error {
    /// A metadata operand refers to a function that is not defined in the module.
    #[error(
        "Metadata `{location}` refers to function `{function}` which is not defined within the module."
    )]
    DanglingFunctionRef { location: String, function: Uuid },

    /// Two functions of the module share the same symbol name.
    #[error("Function name `{name}` is defined more than once within the module.")]
    DuplicateFunctionName { name: String },
}
