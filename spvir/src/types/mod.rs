//! Types module
//!
//! Parameter and metadata operand types. Only primary types are modelled:
//! integers, floating-point values, pointers, vectors and by-value
//! aggregates. The transcoder only inspects them coarsely (pointer vs.
//! scalar, floating vs. integer), so no type registry or interning is needed.
pub mod primary;

pub use primary::{FType, IType, PrimaryType, PtrType, ScalarType, VcType};
