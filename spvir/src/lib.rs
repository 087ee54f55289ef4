//! Host IR model for the metadata transcoder.
//!
//! This crate exposes the small slice of a compiler IR that metadata
//! transcoding needs: modules holding functions in a stable order, calling
//! conventions, parameter types, string attributes, per-function metadata and
//! module-level named metadata lists.

pub mod modules;
pub mod types;
pub mod utils;

pub use modules::{
    CallingConvention, Module,
    function::{Function, Param},
    metadata::{IConst, Metadata, MetadataNode, NamedMetadata},
    symbol::FunctionRef,
};
pub use utils::Error;
