//! Module-level declarations and NVPTX kernel marking.
//!
//! Every supported target gets its memory model and source extensions
//! declared here and loses its legacy OpenCL lists. NVPTX modules also have
//! their `nvvm.annotations` kernels rewritten into OpenCL-style kernels:
//!
//! ```text
//! !nvvm.annotations = !{!0}
//! !0 = !{ptr @k, !"kernel", i32 1}
//! ```
//!
//! gives `@k` the `kernel_arg_access_qual`, `kernel_arg_type` and
//! `kernel_arg_addr_space` metadata and the `SpirKernel` calling convention.
//!
//! The work is split in two: [`plan`] only reads the module and checks the
//! preconditions, [`apply`] performs the mutations.
use log::{debug, trace, warn};
use spvir::{
    CallingConvention, Function, FunctionRef, Metadata, MetadataNode,
    types::{FType, PrimaryType},
};

use crate::{
    builder::MetadataBuilder,
    error::TranscodeError,
    magic,
    options::TranscodeOptions,
    records::{MemoryModel, MemoryModelDecl, Record, SourceExtensionList},
    target::TargetTriple,
    walker::MetadataWalker,
};

/// Derived metadata for one annotated NVPTX kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelArgs {
    pub function: FunctionRef,
    pub access_qual: MetadataNode,
    pub types: MetadataNode,
    pub addr_spaces: MetadataNode,
}

impl KernelArgs {
    fn describe(function: &Function) -> Self {
        let access_qual = function.params.iter().map(|_| "none").collect();
        let types = function
            .params
            .iter()
            .filter_map(|param| {
                let class = classify_arg(&param.ty);
                if class.is_none() {
                    debug!(
                        "No kernel_arg_type entry for %{}: {} in @{}",
                        param.name, param.ty, function.name
                    );
                }
                class
            })
            .collect();
        let addr_spaces = function
            .params
            .iter()
            .map(|param| u32::from(param.ty.is_ptr()))
            .collect();

        Self {
            function: function.reference(),
            access_qual,
            types,
            addr_spaces,
        }
    }
}

/// Everything the group will write, computed without touching the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvptxPlan {
    pub memory_model: MemoryModelDecl,
    pub source_extensions: Option<SourceExtensionList>,
    pub kernels: Vec<KernelArgs>,
}

/// Coarse OpenCL type name of a kernel argument.
///
/// Pointers are `float*` when their pointee is known to be floating point and
/// `int*` otherwise. Among scalars only `float` and integers are named; other
/// floating-point widths, vectors and aggregates have no name.
pub fn classify_arg(ty: &PrimaryType) -> Option<&'static str> {
    match ty {
        PrimaryType::Ptr(ptr) if ptr.pointee.is_some_and(|p| p.is_float()) => Some("float*"),
        PrimaryType::Ptr(_) => Some("int*"),
        PrimaryType::Float(FType::Fp32) => Some("float"),
        PrimaryType::Int(_) => Some("int"),
        PrimaryType::Float(_) | PrimaryType::Vc(_) | PrimaryType::Struct(_) => None,
    }
}

/// Functions marked as kernels by `nvvm.annotations`, in list order and
/// without duplicates.
fn annotated_kernels<'a>(walker: MetadataWalker<'a>) -> Vec<&'a Function> {
    let mut kernels: Vec<&Function> = Vec::new();
    for (idx, node) in walker
        .get_named_list(magic::NVVM_ANNOTATIONS)
        .into_iter()
        .flatten()
        .enumerate()
    {
        if node.len() != 3
            || node.operand(1).and_then(Metadata::as_str) != Some(magic::NVVM_KERNEL_MARKER)
        {
            continue;
        }

        let function = match node.operand(0) {
            Some(Metadata::Function(func)) => walker.module().function(*func),
            _ => None,
        };
        match function {
            Some(function) if kernels.iter().any(|k| k.uuid == function.uuid) => {}
            Some(function) => kernels.push(function),
            None => warn!(
                "Skipping !{}[{}]: operand 0 is not a function of the module",
                magic::NVVM_ANNOTATIONS,
                idx
            ),
        }
    }
    kernels
}

/// Check the preconditions of the group and compute its output.
pub fn plan(walker: MetadataWalker<'_>, target: &TargetTriple) -> Result<NvptxPlan, TranscodeError> {
    let kernels = if target.arch.is_nvptx_family() {
        if walker.get_named_list(magic::NVVM_ANNOTATIONS).is_none() {
            return Err(TranscodeError::MissingKernelAnnotations {
                list: magic::NVVM_ANNOTATIONS,
                triple: target.triple.clone(),
            });
        }
        annotated_kernels(walker)
            .into_iter()
            .map(KernelArgs::describe)
            .collect()
    } else {
        Vec::new()
    };

    let names = walker.collect_distinct_strings(magic::OPENCL_USED_EXTENSIONS);
    let source_extensions = (!names.is_empty()).then(|| SourceExtensionList {
        names: names.into_iter().collect(),
    });

    Ok(NvptxPlan {
        memory_model: MemoryModelDecl {
            addressing: target.arch.addressing_model(),
            memory: MemoryModel::OpenCL,
        },
        source_extensions,
        kernels,
    })
}

/// Write the planned declarations and kernel rewrites.
pub fn apply(plan: NvptxPlan, builder: &mut MetadataBuilder<'_>, options: &TranscodeOptions) {
    builder.erase_named_list(magic::NVVMIR_VERSION);

    Record::from(plan.memory_model).emit(builder);
    if let Some(extensions) = plan.source_extensions {
        debug!("Declaring {} source extensions", extensions.names.len());
        Record::from(extensions).emit(builder);
    }

    if options.erase_legacy_metadata {
        builder
            .erase_named_list(magic::OPENCL_USED_EXTENSIONS)
            .erase_named_list(magic::OPENCL_USED_OPTIONAL_CORE_FEATURES)
            .erase_named_list(magic::OPENCL_ENABLE_FP_CONTRACT);
    }

    for kernel in plan.kernels {
        trace!("Marking {} as a kernel", kernel.function);
        builder
            .set_function_metadata(kernel.function, magic::KERNEL_ARG_ACCESS_QUAL, kernel.access_qual)
            .set_function_metadata(kernel.function, magic::KERNEL_ARG_TYPE, kernel.types)
            .set_function_metadata(kernel.function, magic::KERNEL_ARG_ADDR_SPACE, kernel.addr_spaces)
            .set_calling_convention(kernel.function, CallingConvention::SpirKernel);
    }
}
