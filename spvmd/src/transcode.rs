//! Transcoding driver.
//!
//! [`transcode`] runs the dialect groups over one module in a fixed order:
//!
//! 1. module-level declarations and NVPTX kernel marking ([`rules::nvptx`]);
//! 2. `opencl.spir.version` and `opencl.ocl.version`;
//! 3. OpenCL kernel metadata → `spirv.ExecutionMode` ([`rules::opencl`]);
//! 4. vector-compute attributes → `spirv.ExecutionMode` ([`rules::vector_compute`]);
//! 5. module verification.
//!
//! Preconditions are checked before the module is touched, so a returned
//! [`TranscodeError`] means the module is unchanged.
use log::{debug, info, warn};
use spvir::{FunctionRef, Module};

use crate::{
    builder::MetadataBuilder,
    error::TranscodeError,
    magic,
    options::TranscodeOptions,
    records::{Record, VersionDecl},
    rules::{self, GroupOutput, RuleGroup, SkippedRule, nvptx},
    target::TargetTriple,
    walker::MetadataWalker,
};

/// Summary of one transcoding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscodeReport {
    /// Kernels whose annotations were translated, in module order.
    pub kernels: Vec<FunctionRef>,
    /// Number of execution-mode records appended.
    pub records_emitted: usize,
    /// Rules that failed to decode their annotation.
    pub skipped: Vec<SkippedRule>,
    /// Verification failure of the transcoded module, if any.
    pub verification: Option<spvir::Error>,
}

/// Transcode the annotations of `module` into canonical metadata.
///
/// The driver is one-shot: running it twice on the same module duplicates the
/// module-level declarations.
pub fn transcode(
    module: &mut Module,
    options: &TranscodeOptions,
) -> Result<TranscodeReport, TranscodeError> {
    let target = TargetTriple::from_module(module.target_triple.as_deref())?;
    let plan = nvptx::plan(MetadataWalker::new(module), &target)?;
    debug!("Transcoding module for {}", target.triple);

    let mut builder = MetadataBuilder::new(module);
    nvptx::apply(plan, &mut builder, options);

    Record::from(VersionDecl::SPIR).emit(&mut builder);
    Record::from(VersionDecl::OPENCL).emit(&mut builder);

    builder.add_named_list(magic::SPIRV_EXECUTION_MODE);

    let mut report = TranscodeReport {
        kernels: MetadataWalker::new(builder.module())
            .kernels()
            .map(|f| f.reference())
            .collect(),
        ..Default::default()
    };

    for group in [&rules::opencl::OPENCL_KERNEL_GROUP, &rules::vector_compute::VECTOR_COMPUTE_GROUP] {
        run_group(group, &mut builder, &mut report);
    }

    if let Err(err) = module.verify() {
        warn!("Transcoded module failed verification: {}", err);
        report.verification = Some(err);
    }

    info!(
        "Transcoded {} kernels into {} execution modes ({} skipped rules)",
        report.kernels.len(),
        report.records_emitted,
        report.skipped.len()
    );
    Ok(report)
}

/// [`transcode`] with [`TranscodeOptions::default`].
pub fn transcode_default(module: &mut Module) -> Result<TranscodeReport, TranscodeError> {
    transcode(module, &TranscodeOptions::default())
}

fn run_group(group: &RuleGroup, builder: &mut MetadataBuilder<'_>, report: &mut TranscodeReport) {
    let GroupOutput { records, skipped } = group.collect(MetadataWalker::new(builder.module()));
    debug!(
        "[{}] {} execution modes, {} skipped rules",
        group.name,
        records.len(),
        skipped.len()
    );

    report.records_emitted += records.len();
    report.skipped.extend(skipped);
    for record in records {
        Record::from(record).emit(builder);
    }
}
