use std::collections::BTreeSet;

use spvir::{
    CallingConvention, Function, FunctionRef, Metadata, MetadataNode, Module, Param,
    types::{FType, IType, PrimaryType, PtrType, VcType},
};
use spvmd::{TranscodeError, TranscodeOptions, transcode, transcode_default};

fn ints(values: &[u32]) -> MetadataNode {
    values.iter().copied().map(Metadata::from).collect()
}

fn strings(values: &[&str]) -> MetadataNode {
    values.iter().copied().map(Metadata::from).collect()
}

fn kernel(name: &str) -> Function {
    Function::new(name, []).with_cconv(CallingConvention::SpirKernel)
}

/// `spirv.ExecutionMode` as `(function, mode, operands)` triples.
fn execution_modes(module: &Module) -> Vec<(FunctionRef, u32, Vec<u32>)> {
    let as_int = |m: &Metadata| match m {
        Metadata::Int(c) => c.value as u32,
        other => panic!("expected an integer, found {other:?}"),
    };
    module
        .named_metadata("spirv.ExecutionMode")
        .expect("execution mode list")
        .iter()
        .map(|node| {
            let func = match node.operand(0) {
                Some(Metadata::Function(f)) => *f,
                other => panic!("expected a function, found {other:?}"),
            };
            let mode = as_int(&node.operands[1]);
            let operands = node.operands[2..].iter().map(as_int).collect();
            (func, mode, operands)
        })
        .collect()
}

fn list_strings(module: &Module, name: &str) -> BTreeSet<String> {
    module
        .named_metadata(name)
        .into_iter()
        .flatten()
        .flat_map(|node| node.operands.iter())
        .filter_map(Metadata::as_str)
        .map(str::to_string)
        .collect()
}

fn single_pair(module: &Module, name: &str) -> Vec<Metadata> {
    let list = module.named_metadata(name).expect("list");
    assert_eq!(list.len(), 1, "{name}");
    list.nodes[0].operands.to_vec()
}

#[test]
fn module_without_kernels_gets_an_empty_execution_mode_list() {
    let mut module = Module::new("spir64-unknown-unknown");
    module.add_function(
        Function::new("helper", []).with_metadata("reqd_work_group_size", ints(&[8, 8, 1])),
    );

    let report = transcode_default(&mut module).unwrap();
    assert!(report.kernels.is_empty());
    assert_eq!(report.records_emitted, 0);
    assert!(module.named_metadata("spirv.ExecutionMode").is_some_and(|l| l.is_empty()));

    let helper = &module.functions[0];
    assert!(helper.metadata("kernel_arg_type").is_none());
    assert!(helper.metadata("kernel_arg_access_qual").is_none());
    assert!(helper.metadata("kernel_arg_addr_space").is_none());
    assert!(module.named_metadata("spirv.SourceExtension").is_none());
}

#[test]
fn version_pairs_are_always_declared() {
    let mut module = Module::new("spir");
    transcode_default(&mut module).unwrap();
    assert_eq!(single_pair(&module, "opencl.spir.version"), [Metadata::from(1u32), Metadata::from(2u32)]);
    assert_eq!(single_pair(&module, "opencl.ocl.version"), [Metadata::from(1u32), Metadata::from(0u32)]);
}

#[test]
fn local_size_records_follow_module_order() {
    let mut module = Module::new("spir64");
    let first = module.add_function(kernel("first").with_metadata("reqd_work_group_size", ints(&[8, 4, 1])));
    module.add_function(Function::new("helper", []).with_metadata("reqd_work_group_size", ints(&[1, 1, 1])));
    let second = module.add_function(kernel("second").with_metadata("reqd_work_group_size", ints(&[16, 1, 1])));

    let report = transcode_default(&mut module).unwrap();
    assert_eq!(report.kernels, [first, second]);
    assert_eq!(
        execution_modes(&module),
        [(first, 17, vec![8, 4, 1]), (second, 17, vec![16, 1, 1])]
    );
}

#[test]
fn records_follow_rule_table_then_vector_compute() {
    let mut module = Module::new("spir64");
    let float4 = PrimaryType::Vc(VcType {
        ty: FType::Fp32.into(),
        num_elements: 4,
    });
    let a = module.add_function(
        kernel("a")
            .with_metadata("num_simd_work_items", ints(&[4]))
            .with_metadata("max_global_work_dim", ints(&[2]))
            .with_metadata("max_work_group_size", ints(&[64, 1, 1]))
            .with_metadata("intel_reqd_sub_group_size", ints(&[16]))
            .with_metadata(
                "vec_type_hint",
                [Metadata::Undef(float4), Metadata::from(0u32)].into_iter().collect(),
            )
            .with_metadata("work_group_size_hint", ints(&[32, 1, 1]))
            .with_metadata("reqd_work_group_size", ints(&[8, 8, 1]))
            .with_attribute("VCSLMSize", "0x10000"),
    );
    let b = module.add_function(kernel("b").with_metadata("reqd_work_group_size", ints(&[1, 1, 1])));

    let report = transcode_default(&mut module).unwrap();
    assert_eq!(report.records_emitted, 9);
    assert_eq!(
        execution_modes(&module),
        [
            (a, 17, vec![8, 8, 1]),
            (a, 18, vec![32, 1, 1]),
            (a, 30, vec![0x4_0005]),
            (a, 35, vec![16]),
            (a, 5893, vec![64, 1, 1]),
            (a, 5894, vec![2]),
            (a, 5896, vec![4]),
            (b, 17, vec![1, 1, 1]),
            (a, 5618, vec![65536]),
        ]
    );
}

#[test]
fn float_control_emits_three_records_per_width() {
    let mut module = Module::new("spir64");
    // RTZ, ALT, float denormals preserved
    let bits = (3 << 4) | 1 | (1 << 7);
    let k = module.add_function(kernel("k").with_attribute("VCFloatControl", bits.to_string()));

    transcode_default(&mut module).unwrap();
    assert_eq!(
        execution_modes(&module),
        [
            (k, 4463, vec![64]),
            (k, 5622, vec![64]),
            (k, 4460, vec![64]),
            (k, 4463, vec![32]),
            (k, 5622, vec![32]),
            (k, 4459, vec![32]),
            (k, 4463, vec![16]),
            (k, 5622, vec![16]),
            (k, 4460, vec![16]),
        ]
    );
}

#[test]
fn decode_errors_only_drop_the_failing_rule() {
    let mut module = Module::new("spir64");
    let k = module.add_function(
        kernel("k")
            .with_metadata("reqd_work_group_size", ints(&[8, 8]))
            .with_metadata("intel_reqd_sub_group_size", ints(&[8]))
            .with_attribute("VCSLMSize", "lots"),
    );
    let other = module.add_function(kernel("other").with_metadata("max_global_work_dim", ints(&[1])));

    let report = transcode_default(&mut module).unwrap();
    assert_eq!(execution_modes(&module), [(k, 35, vec![8]), (other, 5894, vec![1])]);

    let skipped: Vec<_> = report.skipped.iter().map(|s| (s.function.as_str(), s.rule)).collect();
    assert_eq!(skipped, [("k", "local-size"), ("k", "vc-slm-size")]);
    assert!(report.skipped[0].error.is_too_few_operands());
    assert!(report.skipped[1].error.is_invalid_integer());
}

#[test]
fn malformed_float_control_emits_no_default_modes() {
    let mut module = Module::new("spir64");
    module.add_function(kernel("k").with_attribute("VCFloatControl", "0x3z"));

    let report = transcode_default(&mut module).unwrap();
    assert!(execution_modes(&module).is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].rule, "vc-float-control");
    assert!(report.skipped[0].error.is_invalid_integer());
}

#[test]
fn memory_model_follows_pointer_width() {
    let cases = [
        ("spir-unknown-unknown", 1u32),
        ("spir64-unknown-unknown", 2),
        ("nvptx-nvidia-cuda", 1),
        ("nvptx64-nvidia-cuda", 2),
    ];
    for (triple, addressing) in cases {
        let mut module = Module::new(triple);
        module.get_or_insert_named_metadata("nvvm.annotations");
        transcode_default(&mut module).unwrap();
        assert_eq!(
            single_pair(&module, "spirv.MemoryModel"),
            [Metadata::from(addressing), Metadata::from(2u32)],
            "{triple}"
        );
    }
}

#[test]
fn unsupported_or_missing_triples_leave_the_module_untouched() {
    let mut module = Module::new("x86_64-unknown-linux-gnu");
    module.add_function(kernel("k").with_metadata("reqd_work_group_size", ints(&[1, 1, 1])));
    module.get_or_insert_named_metadata("nvvmir.version").nodes.push(ints(&[2, 0]));
    let before = module.clone();

    assert!(transcode_default(&mut module).unwrap_err().is_unsupported_triple());
    assert_eq!(module, before);

    module.target_triple = None;
    let before = module.clone();
    assert_eq!(transcode_default(&mut module), Err(TranscodeError::MissingTriple));
    assert_eq!(module, before);
}

#[test]
fn nvptx_without_annotations_is_fatal() {
    let mut module = Module::new("nvptx64-nvidia-cuda");
    module.get_or_insert_named_metadata("nvvmir.version").nodes.push(ints(&[2, 0]));
    let before = module.clone();

    assert!(transcode_default(&mut module).unwrap_err().is_missing_kernel_annotations());
    assert_eq!(module, before);
}

#[test]
fn extensions_are_declared_and_legacy_lists_erased() {
    let build = || {
        let mut module = Module::new("spir64");
        let legacy = module.get_or_insert_named_metadata("opencl.used.extensions");
        legacy.nodes.push(strings(&["cl_khr_fp64"]));
        legacy.nodes.push(strings(&["cl_khr_int64", "cl_khr_fp64"]));
        module.get_or_insert_named_metadata("opencl.used.optional.core.features");
        module.get_or_insert_named_metadata("opencl.enable.FP_CONTRACT");
        module
    };
    let expected: BTreeSet<String> = ["cl_khr_fp64", "cl_khr_int64"].map(String::from).into();

    let mut erased = build();
    transcode_default(&mut erased).unwrap();
    assert_eq!(list_strings(&erased, "spirv.SourceExtension"), expected);
    assert_eq!(erased.named_metadata("spirv.SourceExtension").map(|l| l.len()), Some(2));
    assert!(erased.named_metadata("opencl.used.extensions").is_none());
    assert!(erased.named_metadata("opencl.used.optional.core.features").is_none());
    assert!(erased.named_metadata("opencl.enable.FP_CONTRACT").is_none());

    let mut kept = build();
    let legacy_before = kept.named_metadata("opencl.used.extensions").cloned();
    let options = TranscodeOptions::default().with_erase_legacy_metadata(false);
    transcode(&mut kept, &options).unwrap();
    assert_eq!(list_strings(&kept, "spirv.SourceExtension"), expected);
    assert_eq!(kept.named_metadata("opencl.used.extensions").cloned(), legacy_before);
    assert!(kept.named_metadata("opencl.enable.FP_CONTRACT").is_some());
}

#[test]
fn nvptx_kernels_are_marked_and_described() {
    let mut module = Module::new("nvptx64-nvidia-cuda");
    let k = module.add_function(
        Function::new(
            "saxpy",
            [
                Param::new("x", PtrType::to(FType::Fp32).in_address_space(1)),
                Param::new("y", PtrType::to(IType::I32).in_address_space(1)),
                Param::new("a", FType::Fp32),
                Param::new("n", IType::I32),
            ],
        )
        .with_cconv(CallingConvention::PtxKernel)
        .with_metadata("reqd_work_group_size", ints(&[32, 1, 1])),
    );
    let helper = module.add_function(Function::new("helper", []).with_cconv(CallingConvention::PtxDevice));
    let annotations = module.get_or_insert_named_metadata("nvvm.annotations");
    annotations
        .nodes
        .push([Metadata::from(k), Metadata::from("kernel"), Metadata::from(1u32)].into_iter().collect());
    annotations
        .nodes
        .push([Metadata::from(helper), Metadata::from("maxntidx"), Metadata::from(64u32)].into_iter().collect());
    module.get_or_insert_named_metadata("nvvmir.version").nodes.push(ints(&[2, 0]));

    let report = transcode_default(&mut module).unwrap();
    assert_eq!(report.kernels, [k]);
    assert!(report.verification.is_none());
    assert!(module.named_metadata("nvvmir.version").is_none());

    let function = module.function(k).unwrap();
    assert_eq!(function.cconv, CallingConvention::SpirKernel);
    assert_eq!(
        function.metadata("kernel_arg_access_qual"),
        Some(&strings(&["none", "none", "none", "none"]))
    );
    assert_eq!(
        function.metadata("kernel_arg_type"),
        Some(&strings(&["float*", "int*", "float", "int"]))
    );
    assert_eq!(function.metadata("kernel_arg_addr_space"), Some(&ints(&[1, 1, 0, 0])));
    assert_eq!(module.function(helper).unwrap().cconv, CallingConvention::PtxDevice);

    // marked kernels take part in the execution mode scan
    assert_eq!(execution_modes(&module), [(k, 17, vec![32, 1, 1])]);
}

#[test]
fn verification_failures_are_reported_not_returned() {
    let mut module = Module::new("spir64");
    module
        .get_or_insert_named_metadata("custom")
        .nodes
        .push([Metadata::from(FunctionRef(uuid::Uuid::new_v4()))].into_iter().collect());

    let report = transcode_default(&mut module).unwrap();
    assert!(
        report
            .verification
            .is_some_and(|err| err.is_dangling_function_ref())
    );
}
