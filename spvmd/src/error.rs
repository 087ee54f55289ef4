use strum::EnumIs;
use thiserror::Error;

/// Fatal conditions. The module is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum TranscodeError {
    /// The module carries no target triple, so no addressing model can be chosen.
    #[error("The module has no target triple. An addressing model cannot be chosen without one.")]
    MissingTriple,

    /// The target triple is not one of the supported SPIR/NVPTX triples.
    #[error(
        "Target triple `{triple}` is not supported. Expected one of `spir`, `spir64`, `nvptx` or `nvptx64` as architecture."
    )]
    UnsupportedTriple { triple: String },

    /// An NVPTX module lacks the list that marks its kernel entry points.
    #[error(
        "Named metadata `!{list}` is required for target `{triple}`; kernel entry points cannot be inferred without it."
    )]
    MissingKernelAnnotations { list: &'static str, triple: String },
}

/// Local failures while decoding one annotation. They abort only the rule
/// being applied to the current function.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum DecodeError {
    #[error("Expected at least {expected} operands but the node only has {found}.")]
    TooFewOperands { expected: usize, found: usize },

    #[error("Operand #{index} is expected to be an integer constant.")]
    NotAnInteger { index: usize },

    #[error("Operand #{index} holds {value}, which does not fit in 32 bits.")]
    IntegerOutOfRange { index: usize, value: u64 },

    #[error("Attribute value `{value}` is not a valid 32-bit integer.")]
    InvalidInteger { value: String },

    #[error("`vec_type_hint` must be `!{{<type> undef, i32 <signedness>}}`.")]
    MalformedVecTypeHint,

    #[error("`{ty}` is not a valid `vec_type_hint` component type.")]
    UnsupportedVecTypeHint { ty: String },
}

/// Errors raised while loading [`crate::options::TranscodeOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error while reading options file '{file}': {source}")]
    Io {
        source: std::io::Error,
        file: String,
    },

    #[error("Failed to parse options file '{file}': {source}")]
    Parse {
        source: toml::de::Error,
        file: String,
    },
}
