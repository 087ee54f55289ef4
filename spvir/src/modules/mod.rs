//! Module, function and metadata model
//!
//! A [`Module`] is the unit of metadata transcoding. It owns:
//!
//! - `functions`: function declarations in a stable, insertion-defined order;
//! - `named_metadata`: module-level metadata lists keyed by name;
//! - `target_triple`: the target identifier (`spir64-unknown-unknown`, ...).
//!
//! Submodules:
//!
//! - `function`: function declarations, parameters, attributes
//! - `metadata`: metadata operands, nodes and named lists
//! - `symbol`: stable references to functions
use std::collections::{BTreeMap, BTreeSet};

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    modules::{
        function::Function,
        metadata::{MetadataNode, NamedMetadata},
        symbol::FunctionRef,
    },
    utils::Error,
};

pub mod function;
pub mod metadata;
pub mod symbol;

/// Calling conventions a function may carry.
///
/// Only the conventions relevant to device code are listed explicitly; any
/// other convention can be referenced by number.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CallingConvention {
    /// The C calling convention
    ///
    /// The default if no other calling convention is specified.
    #[default]
    C,

    /// The fast calling convention
    FastC,

    /// The cold calling convention
    ColdC,

    /// SPIR device function
    ///
    /// A function callable from device code but not from the host.
    SpirFunc,

    /// SPIR kernel entry point
    ///
    /// A device-invocable entry point. This is the only convention that marks
    /// a function as a kernel for execution-mode purposes.
    SpirKernel,

    /// PTX kernel entry point
    PtxKernel,

    /// PTX device function
    PtxDevice,

    /// Numbered/target-specific calling convention (cc &lt;n&gt;)
    Numbered(u32),
}

impl CallingConvention {
    /// Returns `true` if the convention designates a kernel entry point.
    pub fn is_kernel(&self) -> bool {
        matches!(self, CallingConvention::SpirKernel)
    }
}

/// A module containing functions and named metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Module {
    pub target_triple: Option<String>,
    pub functions: Vec<Function>,
    pub named_metadata: BTreeMap<String, NamedMetadata>,
}

impl Module {
    /// Create an empty module for the given target triple.
    pub fn new(target_triple: impl Into<String>) -> Self {
        Self {
            target_triple: Some(target_triple.into()),
            ..Default::default()
        }
    }

    /// Append `function` to the module and return a reference to it.
    pub fn add_function(&mut self, function: Function) -> FunctionRef {
        let reference = function.reference();
        self.functions.push(function);
        reference
    }

    pub fn function(&self, func: FunctionRef) -> Option<&Function> {
        self.functions.iter().find(|f| f.uuid == func.0)
    }

    pub fn function_mut(&mut self, func: FunctionRef) -> Option<&mut Function> {
        self.functions.iter_mut().find(|f| f.uuid == func.0)
    }

    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn named_metadata(&self, name: &str) -> Option<&NamedMetadata> {
        self.named_metadata.get(name)
    }

    /// Return the named list `name`, creating an empty one if absent.
    pub fn get_or_insert_named_metadata(&mut self, name: &str) -> &mut NamedMetadata {
        self.named_metadata.entry(name.to_string()).or_default()
    }

    /// Remove the named list `name`, returning it if it was present.
    pub fn remove_named_metadata(&mut self, name: &str) -> Option<NamedMetadata> {
        self.named_metadata.remove(name)
    }

    /// Check module-level well-formedness:
    /// 1) Function names are unique.
    /// 2) Every function referenced from metadata is defined in the module.
    pub fn verify(&self) -> Result<(), Error> {
        let mut names = BTreeSet::new();
        for function in &self.functions {
            if !names.insert(function.name.as_str()) {
                return Err(Error::DuplicateFunctionName {
                    name: function.name.clone(),
                });
            }
        }

        let defined: BTreeSet<_> = self.functions.iter().map(Function::reference).collect();
        let check = |location: &dyn Fn() -> String, node: &MetadataNode| {
            match node.referenced_functions().find(|f| !defined.contains(f)) {
                Some(func) => Err(Error::DanglingFunctionRef {
                    location: location(),
                    function: func.uuid(),
                }),
                None => Ok(()),
            }
        };

        for (name, list) in &self.named_metadata {
            for (idx, node) in list.iter().enumerate() {
                check(&|| format!("!{}[{}]", name, idx), node)?;
            }
        }

        for function in &self.functions {
            for (key, node) in &function.metadata {
                check(&|| format!("@{} !{}", function.name, key), node)?;
            }
        }

        debug!(
            "Verified module with {} functions and {} named metadata lists",
            self.functions.len(),
            self.named_metadata.len()
        );
        Ok(())
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(triple) = &self.target_triple {
            writeln!(f, "target triple = {:?}", triple)?;
        }

        for function in &self.functions {
            write!(f, "define {:?} @{}(", function.cconv, function.name)?;
            for (idx, param) in function.params.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} %{}", param.ty, param.name)?;
            }
            write!(f, ")")?;
            for (key, value) in &function.attributes {
                write!(f, " {:?}={:?}", key, value)?;
            }
            for (key, node) in &function.metadata {
                write!(f, " !{} {}", key, node.fmt(Some(self)))?;
            }
            writeln!(f)?;
        }

        for (name, list) in &self.named_metadata {
            write!(f, "!{} = !{{", name)?;
            for (idx, node) in list.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", node.fmt(Some(self)))?;
            }
            writeln!(f, "}}")?;
        }

        Ok(())
    }
}
