//! Metadata transcoder.
//!
//! Rewrites the side-channel annotations of OpenCL, NVPTX and vector-compute
//! modules into the canonical SPIR-V named metadata:
//!
//! - `spirv.MemoryModel`: addressing and memory model;
//! - `spirv.SourceExtension`: extensions used by the source;
//! - `opencl.spir.version` / `opencl.ocl.version`: version pairs;
//! - `spirv.ExecutionMode`: one `!{<fn>, i32 <mode>, i32 <operand>...}` entry
//!   per execution mode of every kernel.
//!
//! ```rust
//! use spvir::{CallingConvention, Function, Metadata, Module};
//!
//! let mut module = Module::new("spir64-unknown-unknown");
//! module.add_function(
//!     Function::new("k", [])
//!         .with_cconv(CallingConvention::SpirKernel)
//!         .with_metadata(
//!             "reqd_work_group_size",
//!             [8u32, 4, 1].into_iter().map(Metadata::from).collect(),
//!         ),
//! );
//!
//! let report = spvmd::transcode_default(&mut module).unwrap();
//! assert_eq!(report.records_emitted, 1);
//! assert_eq!(module.named_metadata("spirv.ExecutionMode").map(|l| l.len()), Some(1));
//! ```

pub mod builder;
pub mod error;
pub mod magic;
pub mod options;
pub mod records;
pub mod rules;
pub mod target;
pub mod transcode;
pub mod walker;

pub use error::{ConfigError, DecodeError, TranscodeError};
pub use options::TranscodeOptions;
pub use transcode::{TranscodeReport, transcode, transcode_default};
