//! Dialect rules
//!
//! Each input dialect is handled by a group of independent rules:
//!
//! - `opencl`: kernel metadata (`reqd_work_group_size`, ...) shared by every
//!   OpenCL-derived producer
//! - `vector_compute`: float-control and SLM attributes of vector-compute kernels
//! - `nvptx`: NVPTX annotations and module-level declarations
//!
//! Per-function rules are static [`ExecutionModeRule`] entries made of a
//! predicate (the annotation key), an extractor (decoding the annotation into
//! integers) and an emitter (mapping those integers to execution modes). A
//! [`RuleGroup`] applies its rules, in table order, to every kernel in module
//! order.
use log::{trace, warn};
use smallvec::{SmallVec, smallvec};
use spvir::{Function, MetadataNode};

use crate::{
    error::DecodeError,
    records::{ExecutionMode, ExecutionModeCode},
    walker::{MetadataWalker, parse_int_attribute},
};

pub mod nvptx;
pub mod opencl;
pub mod vector_compute;

/// Where a rule looks for its annotation on a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKey {
    /// Metadata node attached to the function (`!reqd_work_group_size`).
    Metadata(&'static str),
    /// String attribute of the function (`"VCSLMSize"="65536"`).
    Attribute(&'static str),
}

impl AnnotationKey {
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKey::Metadata(name) | AnnotationKey::Attribute(name) => name,
        }
    }

    /// Find the annotation on `function`, if present.
    pub fn lookup<'a>(
        &self,
        walker: MetadataWalker<'a>,
        function: &'a Function,
    ) -> Option<Annotation<'a>> {
        match self {
            AnnotationKey::Metadata(key) => walker
                .get_function_metadata(function, key)
                .map(Annotation::Node),
            AnnotationKey::Attribute(key) => walker
                .get_function_attribute(function, key)
                .map(Annotation::Attribute),
        }
    }
}

/// An annotation found on a function.
#[derive(Debug, Clone, Copy)]
pub enum Annotation<'a> {
    Node(&'a MetadataNode),
    Attribute(&'a str),
}

impl<'a> Annotation<'a> {
    pub fn node(&self) -> Option<&'a MetadataNode> {
        match self {
            Annotation::Node(node) => Some(*node),
            Annotation::Attribute(_) => None,
        }
    }

    /// Decode the first `N` integers of the annotation. Attributes hold a
    /// single integer.
    pub fn int_tuple<const N: usize>(&self) -> Result<[u32; N], DecodeError> {
        match self {
            Annotation::Node(node) => MetadataWalker::decode_int_tuple(node),
            Annotation::Attribute(value) => {
                let value = parse_int_attribute(value)?;
                <[u32; N]>::try_from([value].as_slice()).map_err(|_| {
                    DecodeError::TooFewOperands {
                        expected: N,
                        found: 1,
                    }
                })
            }
        }
    }
}

/// One execution mode produced by a rule, before it is bound to a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeEntry {
    pub mode: ExecutionModeCode,
    pub operands: SmallVec<[u32; 3]>,
}

impl ModeEntry {
    pub fn new(mode: ExecutionModeCode, operands: &[u32]) -> Self {
        Self {
            mode,
            operands: SmallVec::from_slice(operands),
        }
    }
}

pub type Extracted = SmallVec<[u32; 3]>;

/// Translation of one per-function annotation into execution modes.
pub struct ExecutionModeRule {
    pub name: &'static str,
    pub key: AnnotationKey,
    pub extract: fn(&Annotation<'_>) -> Result<Extracted, DecodeError>,
    pub emit: fn(&[u32]) -> SmallVec<[ModeEntry; 3]>,
}

impl ExecutionModeRule {
    /// Apply the rule to `function`.
    ///
    /// Returns `None` when the annotation is absent.
    pub fn apply(
        &self,
        walker: MetadataWalker<'_>,
        function: &Function,
    ) -> Option<Result<Vec<ExecutionMode>, DecodeError>> {
        let annotation = self.key.lookup(walker, function)?;
        Some((self.extract)(&annotation).map(|values| {
            (self.emit)(&values)
                .into_iter()
                .map(|entry| ExecutionMode {
                    target: function.reference(),
                    mode: entry.mode,
                    operands: entry.operands,
                })
                .collect()
        }))
    }
}

/// Extractor for annotations made of one integer.
pub fn extract_scalar(annotation: &Annotation<'_>) -> Result<Extracted, DecodeError> {
    let [value] = annotation.int_tuple::<1>()?;
    Ok(smallvec![value])
}

/// Extractor for annotations made of three integers.
pub fn extract_triple(annotation: &Annotation<'_>) -> Result<Extracted, DecodeError> {
    Ok(SmallVec::from_slice(&annotation.int_tuple::<3>()?))
}

/// A rule that could not be applied to a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRule {
    pub function: String,
    pub rule: &'static str,
    pub error: DecodeError,
}

/// Execution modes collected by a [`RuleGroup`].
#[derive(Debug, Default)]
pub struct GroupOutput {
    pub records: Vec<ExecutionMode>,
    pub skipped: Vec<SkippedRule>,
}

/// An ordered table of rules for one input dialect.
pub struct RuleGroup {
    pub name: &'static str,
    pub rules: &'static [ExecutionModeRule],
}

impl RuleGroup {
    /// Apply every rule to every kernel of the module.
    ///
    /// Records are ordered by kernel (module order) then by rule (table
    /// order). A failing rule only loses its own records.
    pub fn collect(&self, walker: MetadataWalker<'_>) -> GroupOutput {
        let mut output = GroupOutput::default();
        for function in walker.kernels() {
            for rule in self.rules {
                match rule.apply(walker, function) {
                    None => {}
                    Some(Ok(records)) => {
                        trace!(
                            "[{}] {} produced {} records for @{}",
                            self.name,
                            rule.name,
                            records.len(),
                            function.name
                        );
                        output.records.extend(records);
                    }
                    Some(Err(error)) => {
                        warn!(
                            "[{}] Skipping {} on @{}: {}",
                            self.name, rule.name, function.name, error
                        );
                        output.skipped.push(SkippedRule {
                            function: function.name.clone(),
                            rule: rule.name,
                            error,
                        });
                    }
                }
            }
        }
        output
    }
}
