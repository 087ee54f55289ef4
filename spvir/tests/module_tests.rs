use spvir::{
    CallingConvention, Error, Function, FunctionRef, Metadata, MetadataNode, Module, Param,
    types::{FType, IType, PtrType},
};
use uuid::Uuid;

fn sample_module() -> (Module, FunctionRef) {
    let mut module = Module::new("spir64-unknown-unknown");
    let kernel = module.add_function(
        Function::new(
            "vecadd",
            [
                Param::new("a", PtrType::to(FType::Fp32).in_address_space(1)),
                Param::new("n", IType::I32),
            ],
        )
        .with_cconv(CallingConvention::SpirKernel),
    );
    module.add_function(Function::new("helper", []));
    (module, kernel)
}

#[test]
fn functions_keep_insertion_order() {
    let (module, kernel) = sample_module();
    let names: Vec<_> = module.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["vecadd", "helper"]);
    assert_eq!(module.functions[0].reference(), kernel);
    assert!(module.function(kernel).is_some_and(Function::is_kernel));
    assert!(!module.function_by_name("helper").unwrap().is_kernel());
}

#[test]
fn named_metadata_can_be_created_and_removed() {
    let (mut module, kernel) = sample_module();
    module
        .get_or_insert_named_metadata("spirv.ExecutionMode")
        .nodes
        .push([Metadata::from(kernel), Metadata::from(17u32)].into_iter().collect());

    assert_eq!(module.named_metadata("spirv.ExecutionMode").map(|l| l.len()), Some(1));
    assert!(module.remove_named_metadata("spirv.ExecutionMode").is_some());
    assert!(module.named_metadata("spirv.ExecutionMode").is_none());
    assert!(module.remove_named_metadata("spirv.ExecutionMode").is_none());
}

#[test]
fn verify_accepts_well_formed_module() {
    let (mut module, kernel) = sample_module();
    module
        .get_or_insert_named_metadata("nvvm.annotations")
        .nodes
        .push(
            [
                Metadata::from(kernel),
                Metadata::from("kernel"),
                Metadata::from(1u32),
            ]
            .into_iter()
            .collect(),
        );
    assert_eq!(module.verify(), Ok(()));
}

#[test]
fn verify_reports_dangling_function_reference() {
    let (mut module, _) = sample_module();
    let ghost = FunctionRef(Uuid::new_v4());
    module
        .get_or_insert_named_metadata("spirv.ExecutionMode")
        .nodes
        .push([Metadata::from(ghost), Metadata::from(17u32)].into_iter().collect());

    let err = module.verify().unwrap_err();
    assert!(err.is_dangling_function_ref());
    assert_eq!(
        err,
        Error::DanglingFunctionRef {
            location: "!spirv.ExecutionMode[0]".to_string(),
            function: ghost.uuid(),
        }
    );
}

#[test]
fn verify_reports_dangling_reference_in_function_metadata() {
    let (mut module, kernel) = sample_module();
    let ghost = FunctionRef(Uuid::new_v4());
    module
        .function_mut(kernel)
        .unwrap()
        .set_metadata("callee", MetadataNode::from_iter([ghost]));

    assert!(module.verify().unwrap_err().is_dangling_function_ref());
}

#[test]
fn verify_reports_duplicate_function_names() {
    let (mut module, _) = sample_module();
    module.add_function(Function::new("helper", []));
    assert_eq!(
        module.verify(),
        Err(Error::DuplicateFunctionName {
            name: "helper".to_string()
        })
    );
}

#[test]
fn display_lists_functions_and_named_metadata() {
    let (mut module, kernel) = sample_module();
    module
        .get_or_insert_named_metadata("spirv.ExecutionMode")
        .nodes
        .push([Metadata::from(kernel), Metadata::from(17u32)].into_iter().collect());

    let text = module.to_string();
    assert!(text.contains("target triple = \"spir64-unknown-unknown\""));
    assert!(text.contains("define SpirKernel @vecadd(float addrspace(1)* %a, i32 %n)"));
    assert!(text.contains("!spirv.ExecutionMode = !{!{@vecadd, i32 17}}"));
}
