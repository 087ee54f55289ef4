//! Metadata operands, nodes and named lists.
//!
//! Metadata is the side channel attached to modules and functions. A
//! [`MetadataNode`] is an ordered tuple of [`Metadata`] operands; a
//! [`NamedMetadata`] is the ordered list of nodes stored under a name at
//! module level (e.g. `!spirv.ExecutionMode = !{!0, !1}`).
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{EnumIs, EnumTryAs};

use crate::{
    modules::{Module, symbol::FunctionRef},
    types::{IType, PrimaryType},
};

/// Integer constant carried by metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IConst {
    pub ty: IType,
    pub value: u64,
}

impl IConst {
    /// 32-bit integer constant, the width used for every canonical operand.
    pub const fn i32(value: u32) -> Self {
        Self {
            ty: IType::I32,
            value: value as u64,
        }
    }
}

impl std::fmt::Display for IConst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.ty, self.value)
    }
}

/// A single metadata operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Metadata {
    /// Integer constant (`i32 17`).
    Int(IConst),
    /// Metadata string (`!"kernel"`).
    String(String),
    /// Reference to a function of the enclosing module.
    Function(FunctionRef),
    /// Typed undefined value, used where only the type matters (`<4 x float> undef`).
    Undef(PrimaryType),
}

impl Metadata {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Metadata::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render this operand, resolving function references against `module`
    /// when one is given.
    pub fn fmt<'a>(&'a self, module: Option<&'a Module>) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            operand: &'a Metadata,
            module: Option<&'a Module>,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.operand {
                    Metadata::Int(constant) => write!(f, "{}", constant),
                    Metadata::String(s) => write!(f, "!{:?}", s),
                    Metadata::Function(func) => match self
                        .module
                        .and_then(|module| module.function(*func))
                    {
                        Some(function) => write!(f, "@{}", function.name),
                        None => write!(f, "{}", func),
                    },
                    Metadata::Undef(ty) => write!(f, "{} undef", ty),
                }
            }
        }

        Fmt {
            operand: self,
            module,
        }
    }
}

impl From<u32> for Metadata {
    fn from(value: u32) -> Self {
        Metadata::Int(IConst::i32(value))
    }
}

impl From<IConst> for Metadata {
    fn from(value: IConst) -> Self {
        Metadata::Int(value)
    }
}

impl From<&str> for Metadata {
    fn from(value: &str) -> Self {
        Metadata::String(value.to_string())
    }
}

impl From<String> for Metadata {
    fn from(value: String) -> Self {
        Metadata::String(value)
    }
}

impl From<FunctionRef> for Metadata {
    fn from(value: FunctionRef) -> Self {
        Metadata::Function(value)
    }
}

/// An ordered tuple of metadata operands (`!{...}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetadataNode {
    pub operands: SmallVec<[Metadata; 4]>,
}

impl MetadataNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.operands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    pub fn operand(&self, index: usize) -> Option<&Metadata> {
        self.operands.get(index)
    }

    pub fn push(&mut self, operand: impl Into<Metadata>) {
        self.operands.push(operand.into());
    }

    /// Iterate over every function referenced by this node.
    pub fn referenced_functions(&self) -> impl Iterator<Item = FunctionRef> + '_ {
        self.operands.iter().filter_map(|op| match op {
            Metadata::Function(func) => Some(*func),
            _ => None,
        })
    }

    pub fn fmt<'a>(&'a self, module: Option<&'a Module>) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            node: &'a MetadataNode,
            module: Option<&'a Module>,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "!{{")?;
                for (idx, op) in self.node.operands.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", op.fmt(self.module))?;
                }
                write!(f, "}}")
            }
        }

        Fmt { node: self, module }
    }
}

impl<M: Into<Metadata>> FromIterator<M> for MetadataNode {
    fn from_iter<T: IntoIterator<Item = M>>(iter: T) -> Self {
        Self {
            operands: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Module-level named list of metadata nodes, stored in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedMetadata {
    pub nodes: Vec<MetadataNode>,
}

impl NamedMetadata {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataNode> {
        self.nodes.iter()
    }
}

impl<'a> IntoIterator for &'a NamedMetadata {
    type Item = &'a MetadataNode;
    type IntoIter = std::slice::Iter<'a, MetadataNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl FromIterator<MetadataNode> for NamedMetadata {
    fn from_iter<T: IntoIterator<Item = MetadataNode>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
