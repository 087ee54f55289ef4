//! Builder for canonical metadata.
//!
//! [`MetadataBuilder`] wraps the module being transcoded and appends entries
//! to named lists in the order they are finished:
//!
//! ```rust
//! # use spvir::Module;
//! # use spvmd::builder::MetadataBuilder;
//! let mut module = Module::new("spir64");
//! let mut builder = MetadataBuilder::new(&mut module);
//! builder
//!     .add_named_list("opencl.spir.version")
//!     .new_entry()
//!     .add(1u32)
//!     .add(2u32)
//!     .finish();
//! builder.erase_named_list("nvvmir.version").erase_named_list("absent");
//! assert_eq!(module.named_metadata("opencl.spir.version").map(|l| l.len()), Some(1));
//! ```
//!
//! None of the operations fail; malformed output is left for the host's
//! verifier to report.
use log::{trace, warn};
use spvir::{CallingConvention, FunctionRef, Metadata, MetadataNode, Module, NamedMetadata};

/// Appends metadata to one module.
pub struct MetadataBuilder<'m> {
    module: &'m mut Module,
}

impl<'m> MetadataBuilder<'m> {
    pub fn new(module: &'m mut Module) -> Self {
        Self { module }
    }

    /// Read access to the module being built.
    pub fn module(&self) -> &Module {
        self.module
    }

    /// Open the named list `name` for appending, creating it if absent.
    ///
    /// Entries already stored under `name` are kept; new entries go after them.
    pub fn add_named_list(&mut self, name: &str) -> ListHandle<'_> {
        ListHandle {
            list: self.module.get_or_insert_named_metadata(name),
        }
    }

    /// Remove the named list `name`. Absent lists are ignored.
    pub fn erase_named_list(&mut self, name: &str) -> &mut Self {
        if self.module.remove_named_metadata(name).is_some() {
            trace!("Erased named metadata !{}", name);
        }
        self
    }

    /// Attach `node` to `func` under `key`, replacing any previous node.
    pub fn set_function_metadata(
        &mut self,
        func: FunctionRef,
        key: &str,
        node: MetadataNode,
    ) -> &mut Self {
        match self.module.function_mut(func) {
            Some(function) => {
                trace!("Attached !{} {} to @{}", key, node.fmt(None), function.name);
                function.set_metadata(key, node);
            }
            None => warn!("Cannot attach !{} to undefined function {}", key, func),
        }
        self
    }

    /// Rewrite the calling convention of `func`.
    pub fn set_calling_convention(&mut self, func: FunctionRef, cconv: CallingConvention) -> &mut Self {
        match self.module.function_mut(func) {
            Some(function) => function.cconv = cconv,
            None => warn!("Cannot set calling convention of undefined function {}", func),
        }
        self
    }
}

/// A named list opened for appending.
pub struct ListHandle<'b> {
    list: &'b mut NamedMetadata,
}

impl ListHandle<'_> {
    /// Number of entries currently stored in the list.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Start a new entry. It is committed by [`EntryBuilder::finish`].
    pub fn new_entry(&mut self) -> EntryBuilder<'_> {
        EntryBuilder {
            list: &mut *self.list,
            node: MetadataNode::new(),
        }
    }
}

/// An entry under construction. Dropping it without calling
/// [`EntryBuilder::finish`] discards it.
#[must_use = "entries are only stored once `finish` is called"]
pub struct EntryBuilder<'l> {
    list: &'l mut NamedMetadata,
    node: MetadataNode,
}

impl EntryBuilder<'_> {
    /// Append one operand.
    pub fn add(mut self, operand: impl Into<Metadata>) -> Self {
        self.node.push(operand);
        self
    }

    /// Append every operand of `operands`, in order.
    pub fn extend<M: Into<Metadata>>(mut self, operands: impl IntoIterator<Item = M>) -> Self {
        for operand in operands {
            self.node.push(operand);
        }
        self
    }

    /// Commit the entry at the end of the list.
    pub fn finish(self) {
        self.list.nodes.push(self.node);
    }
}
