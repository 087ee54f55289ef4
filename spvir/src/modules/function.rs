use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    modules::{CallingConvention, metadata::MetadataNode, symbol::FunctionRef},
    types::PrimaryType,
};

/// A formal parameter of a [`Function`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: PrimaryType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<PrimaryType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A function declaration together with its annotations.
///
/// Bodies are irrelevant to metadata transcoding and are not modelled. What
/// matters is the calling convention (kernel entry points use
/// [`CallingConvention::SpirKernel`]), the parameter types, string-keyed
/// attributes (`"VCFloatControl" = "48"`) and attached metadata nodes
/// (`!reqd_work_group_size !{i32 8, i32 8, i32 1}`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Function {
    pub uuid: Uuid,
    pub name: String,
    pub params: Vec<Param>,
    pub cconv: CallingConvention,
    pub attributes: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, MetadataNode>,
}

impl Function {
    /// Create a function with a fresh identity and the default calling convention.
    pub fn new(name: impl Into<String>, params: impl IntoIterator<Item = Param>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            params: params.into_iter().collect(),
            cconv: CallingConvention::default(),
            attributes: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Reference usable as a metadata operand.
    pub fn reference(&self) -> FunctionRef {
        FunctionRef(self.uuid)
    }

    /// Returns `true` if the function is a kernel entry point.
    pub fn is_kernel(&self) -> bool {
        self.cconv.is_kernel()
    }

    pub fn with_cconv(mut self, cconv: CallingConvention) -> Self {
        self.cconv = cconv;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, node: MetadataNode) -> Self {
        self.metadata.insert(key.into(), node);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn metadata(&self, key: &str) -> Option<&MetadataNode> {
        self.metadata.get(key)
    }

    /// Attach `node` under `key`, replacing any node previously attached under that key.
    pub fn set_metadata(&mut self, key: impl Into<String>, node: MetadataNode) {
        self.metadata.insert(key.into(), node);
    }
}
