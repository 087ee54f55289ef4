//! Metadata names shared with upstream producers and downstream consumers.

/// Canonical list of `OpExecutionMode` records.
pub const SPIRV_EXECUTION_MODE: &str = "spirv.ExecutionMode";

/// Canonical addressing/memory model declaration.
pub const SPIRV_MEMORY_MODEL: &str = "spirv.MemoryModel";

/// Canonical list of source extensions.
pub const SPIRV_SOURCE_EXTENSION: &str = "spirv.SourceExtension";

/// SPIR version pair, always `!{i32 1, i32 2}`.
pub const OPENCL_SPIR_VERSION: &str = "opencl.spir.version";

/// OpenCL version pair, always `!{i32 1, i32 0}`.
pub const OPENCL_OCL_VERSION: &str = "opencl.ocl.version";

/// Legacy OpenCL list of used extensions (`!{!"cl_khr_fp64"}` per entry).
pub const OPENCL_USED_EXTENSIONS: &str = "opencl.used.extensions";

/// Legacy OpenCL list of used optional core features.
pub const OPENCL_USED_OPTIONAL_CORE_FEATURES: &str = "opencl.used.optional.core.features";

/// Legacy OpenCL floating-point contraction marker.
pub const OPENCL_ENABLE_FP_CONTRACT: &str = "opencl.enable.FP_CONTRACT";

/// NVVM IR version marker, dropped unconditionally.
pub const NVVMIR_VERSION: &str = "nvvmir.version";

/// NVPTX annotations: `!{<fn>, !"kernel", i32 1}` marks a kernel.
pub const NVVM_ANNOTATIONS: &str = "nvvm.annotations";

/// Marker string found in operand 1 of an NVPTX kernel annotation.
pub const NVVM_KERNEL_MARKER: &str = "kernel";

/// Per-kernel metadata derived from NVPTX annotations.
pub const KERNEL_ARG_ACCESS_QUAL: &str = "kernel_arg_access_qual";
pub const KERNEL_ARG_TYPE: &str = "kernel_arg_type";
pub const KERNEL_ARG_ADDR_SPACE: &str = "kernel_arg_addr_space";

/// OpenCL kernel metadata attached to functions.
pub const REQD_WORK_GROUP_SIZE: &str = "reqd_work_group_size";
pub const WORK_GROUP_SIZE_HINT: &str = "work_group_size_hint";
pub const VEC_TYPE_HINT: &str = "vec_type_hint";
pub const INTEL_REQD_SUB_GROUP_SIZE: &str = "intel_reqd_sub_group_size";
pub const MAX_WORK_GROUP_SIZE: &str = "max_work_group_size";
pub const MAX_GLOBAL_WORK_DIM: &str = "max_global_work_dim";
pub const NUM_SIMD_WORK_ITEMS: &str = "num_simd_work_items";

/// Vector-compute function attributes.
pub const VC_FLOAT_CONTROL: &str = "VCFloatControl";
pub const VC_SLM_SIZE: &str = "VCSLMSize";

/// Name of the environment variable containing the path to the options file.
/// If not set, defaults to `$XDG_CONFIG_HOME/spvmd/options.toml` or
/// `$HOME/.config/spvmd/options.toml`.
pub const ENV_OPTIONS_PATH: &str = "SPVMD_CONFIG_PATH";
