//! Read-only queries over a module's input annotations.
use std::collections::BTreeSet;

use spvir::{Function, Metadata, MetadataNode, Module, NamedMetadata};

use crate::error::DecodeError;

/// Read-only view of the annotations of one module.
#[derive(Clone, Copy)]
pub struct MetadataWalker<'a> {
    module: &'a Module,
}

impl<'a> MetadataWalker<'a> {
    pub fn new(module: &'a Module) -> Self {
        Self { module }
    }

    pub fn module(&self) -> &'a Module {
        self.module
    }

    pub fn get_named_list(&self, name: &str) -> Option<&'a NamedMetadata> {
        self.module.named_metadata(name)
    }

    pub fn get_function_attribute(&self, function: &'a Function, key: &str) -> Option<&'a str> {
        function.attribute(key)
    }

    pub fn get_function_metadata(&self, function: &'a Function, key: &str) -> Option<&'a MetadataNode> {
        function.metadata(key)
    }

    /// Kernel entry points in module order.
    pub fn kernels(self) -> impl Iterator<Item = &'a Function> + 'a {
        self.module.functions.iter().filter(|f| f.is_kernel())
    }

    /// Every string operand of every entry of the list `name`, deduplicated.
    /// Returns an empty set if the list is absent.
    pub fn collect_distinct_strings(&self, name: &str) -> BTreeSet<String> {
        self.get_named_list(name)
            .into_iter()
            .flatten()
            .flat_map(|node| node.operands.iter())
            .filter_map(Metadata::as_str)
            .map(str::to_string)
            .collect()
    }

    /// Decode the first `N` operands of `node` as 32-bit integers.
    pub fn decode_int_tuple<const N: usize>(node: &MetadataNode) -> Result<[u32; N], DecodeError> {
        Self::decode_int_tuple_at(node, 0)
    }

    /// Decode `N` operands of `node` starting at `offset` as 32-bit integers.
    pub fn decode_int_tuple_at<const N: usize>(
        node: &MetadataNode,
        offset: usize,
    ) -> Result<[u32; N], DecodeError> {
        if node.len() < offset + N {
            return Err(DecodeError::TooFewOperands {
                expected: offset + N,
                found: node.len(),
            });
        }

        let mut values = [0u32; N];
        for (slot, index) in values.iter_mut().zip(offset..) {
            *slot = match &node.operands[index] {
                Metadata::Int(constant) => u32::try_from(constant.value).map_err(|_| {
                    DecodeError::IntegerOutOfRange {
                        index,
                        value: constant.value,
                    }
                })?,
                _ => return Err(DecodeError::NotAnInteger { index }),
            };
        }
        Ok(values)
    }
}

/// Parse an integer-valued string attribute.
///
/// The radix is detected from the prefix: `0x` hexadecimal, `0b` binary,
/// `0o` or a leading `0` octal, decimal otherwise.
///
/// Malformed values are an error rather than `0`, so a rule reading a broken
/// `VCFloatControl` emits nothing instead of the RTE/IEEE/flush-to-zero
/// records a zero value would give.
pub fn parse_int_attribute(value: &str) -> Result<u32, DecodeError> {
    let invalid = || DecodeError::InvalidInteger {
        value: value.to_string(),
    };

    let (digits, radix) = if let Some(rest) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        (rest, 16)
    } else if let Some(rest) = value
        .strip_prefix("0b")
        .or_else(|| value.strip_prefix("0B"))
    {
        (rest, 2)
    } else if let Some(rest) = value.strip_prefix("0o") {
        (rest, 8)
    } else if value.len() > 1 && value.starts_with('0') {
        (&value[1..], 8)
    } else {
        (value, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    u32::from_str_radix(digits, radix).map_err(|_| invalid())
}
