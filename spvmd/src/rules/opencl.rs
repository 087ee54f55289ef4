//! OpenCL kernel metadata → execution modes.
//!
//! | Function metadata            | Execution mode           | Operands  |
//! |------------------------------|--------------------------|-----------|
//! | `reqd_work_group_size`       | `LocalSize`              | X, Y, Z   |
//! | `work_group_size_hint`       | `LocalSizeHint`          | X, Y, Z   |
//! | `vec_type_hint`              | `VecTypeHint`            | hint      |
//! | `intel_reqd_sub_group_size`  | `SubgroupSize`           | size      |
//! | `max_work_group_size`        | `MaxWorkgroupSizeINTEL`  | X, Y, Z   |
//! | `max_global_work_dim`        | `MaxWorkDimINTEL`        | dim       |
//! | `num_simd_work_items`        | `NumSIMDWorkitemsINTEL`  | num       |
use smallvec::smallvec;
use spvir::{
    Metadata,
    types::{FType, PrimaryType, ScalarType},
};

use crate::{
    error::DecodeError,
    magic,
    records::ExecutionModeCode,
    rules::{
        Annotation, AnnotationKey, ExecutionModeRule, Extracted, ModeEntry, RuleGroup,
        extract_scalar, extract_triple,
    },
};

pub static OPENCL_KERNEL_RULES: [ExecutionModeRule; 7] = [
    ExecutionModeRule {
        name: "local-size",
        key: AnnotationKey::Metadata(magic::REQD_WORK_GROUP_SIZE),
        extract: extract_triple,
        emit: |v| smallvec![ModeEntry::new(ExecutionModeCode::LocalSize, v)],
    },
    ExecutionModeRule {
        name: "local-size-hint",
        key: AnnotationKey::Metadata(magic::WORK_GROUP_SIZE_HINT),
        extract: extract_triple,
        emit: |v| smallvec![ModeEntry::new(ExecutionModeCode::LocalSizeHint, v)],
    },
    ExecutionModeRule {
        name: "vec-type-hint",
        key: AnnotationKey::Metadata(magic::VEC_TYPE_HINT),
        extract: extract_vec_type_hint,
        emit: |v| smallvec![ModeEntry::new(ExecutionModeCode::VecTypeHint, v)],
    },
    ExecutionModeRule {
        name: "subgroup-size",
        key: AnnotationKey::Metadata(magic::INTEL_REQD_SUB_GROUP_SIZE),
        extract: extract_scalar,
        emit: |v| smallvec![ModeEntry::new(ExecutionModeCode::SubgroupSize, v)],
    },
    ExecutionModeRule {
        name: "max-work-group-size",
        key: AnnotationKey::Metadata(magic::MAX_WORK_GROUP_SIZE),
        extract: extract_triple,
        emit: |v| smallvec![ModeEntry::new(ExecutionModeCode::MaxWorkgroupSizeINTEL, v)],
    },
    ExecutionModeRule {
        name: "max-work-dim",
        key: AnnotationKey::Metadata(magic::MAX_GLOBAL_WORK_DIM),
        extract: extract_scalar,
        emit: |v| smallvec![ModeEntry::new(ExecutionModeCode::MaxWorkDimINTEL, v)],
    },
    ExecutionModeRule {
        name: "num-simd-work-items",
        key: AnnotationKey::Metadata(magic::NUM_SIMD_WORK_ITEMS),
        extract: extract_scalar,
        emit: |v| smallvec![ModeEntry::new(ExecutionModeCode::NumSIMDWorkitemsINTEL, v)],
    },
];

pub static OPENCL_KERNEL_GROUP: RuleGroup = RuleGroup {
    name: "opencl",
    rules: &OPENCL_KERNEL_RULES,
};

/// Component code of a `vec_type_hint` type.
fn vec_type_hint_component(ty: ScalarType) -> Option<u32> {
    match ty {
        ScalarType::Int(itype) => match itype.num_bits() {
            8 => Some(0),
            16 => Some(1),
            32 => Some(2),
            64 => Some(3),
            _ => None,
        },
        ScalarType::Float(FType::Fp16) => Some(4),
        ScalarType::Float(FType::Fp32) => Some(5),
        ScalarType::Float(FType::Fp64) => Some(6),
        ScalarType::Float(_) => None,
    }
}

/// Encode the type of a `!{<type> undef, i32 <signedness>}` node: the low
/// 16 bits hold the component code, the high 16 bits the element count of a
/// vector. Scalars leave the high bits zero.
pub fn encode_vec_type_hint(ty: &PrimaryType) -> Result<u32, DecodeError> {
    let unsupported = || DecodeError::UnsupportedVecTypeHint { ty: ty.to_string() };
    let (component, num_elements) = match ty {
        PrimaryType::Vc(vc) => (vc.ty, u32::from(vc.num_elements)),
        _ => (ty.scalar().ok_or_else(unsupported)?, 0),
    };
    let code = vec_type_hint_component(component).ok_or_else(unsupported)?;
    Ok(num_elements << 16 | code)
}

fn extract_vec_type_hint(annotation: &Annotation<'_>) -> Result<Extracted, DecodeError> {
    let node = annotation.node().ok_or(DecodeError::MalformedVecTypeHint)?;
    if node.len() != 2 {
        return Err(DecodeError::MalformedVecTypeHint);
    }
    match node.operand(0) {
        Some(Metadata::Undef(ty)) => Ok(smallvec![encode_vec_type_hint(ty)?]),
        _ => Err(DecodeError::MalformedVecTypeHint),
    }
}

#[cfg(test)]
mod tests {
    use spvir::{
        MetadataNode,
        types::{IType, PtrType, VcType},
    };

    use super::*;

    #[test]
    fn encodes_vector_hints_with_element_count() {
        let float4 = PrimaryType::Vc(VcType {
            ty: FType::Fp32.into(),
            num_elements: 4,
        });
        assert_eq!(encode_vec_type_hint(&float4), Ok(0x4_0005));
        let int2 = PrimaryType::Vc(VcType {
            ty: IType::I32.into(),
            num_elements: 2,
        });
        assert_eq!(encode_vec_type_hint(&int2), Ok(0x2_0002));
    }

    #[test]
    fn scalar_hints_are_the_bare_component_code() {
        assert_eq!(encode_vec_type_hint(&IType::I32.into()), Ok(2));
        assert_eq!(encode_vec_type_hint(&FType::Fp32.into()), Ok(5));
        assert_eq!(encode_vec_type_hint(&FType::Fp64.into()), Ok(6));
        assert_eq!(encode_vec_type_hint(&IType::I8.into()), Ok(0));
    }

    #[test]
    fn rejects_unsupported_hint_types() {
        assert!(
            encode_vec_type_hint(&IType::I1.into())
                .unwrap_err()
                .is_unsupported_vec_type_hint()
        );
        assert!(
            encode_vec_type_hint(&PtrType::OPAQUE.into())
                .unwrap_err()
                .is_unsupported_vec_type_hint()
        );
        assert!(
            encode_vec_type_hint(&FType::Bf16.into())
                .unwrap_err()
                .is_unsupported_vec_type_hint()
        );
    }

    #[test]
    fn vec_type_hint_node_must_have_type_and_signedness() {
        let ok: MetadataNode = [
            Metadata::Undef(IType::I16.into()),
            Metadata::from(1u32),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            extract_vec_type_hint(&Annotation::Node(&ok)).unwrap().as_slice(),
            &[1]
        );

        let missing_signedness: MetadataNode = [Metadata::Undef(IType::I16.into())].into_iter().collect();
        assert_eq!(
            extract_vec_type_hint(&Annotation::Node(&missing_signedness)),
            Err(DecodeError::MalformedVecTypeHint)
        );

        let not_a_type: MetadataNode = [Metadata::from(2u32), Metadata::from(1u32)].into_iter().collect();
        assert_eq!(
            extract_vec_type_hint(&Annotation::Node(&not_a_type)),
            Err(DecodeError::MalformedVecTypeHint)
        );
    }

    #[test]
    fn table_covers_seven_annotations_in_order() {
        let keys: Vec<_> = OPENCL_KERNEL_RULES.iter().map(|r| r.key.name()).collect();
        assert_eq!(
            keys,
            [
                "reqd_work_group_size",
                "work_group_size_hint",
                "vec_type_hint",
                "intel_reqd_sub_group_size",
                "max_work_group_size",
                "max_global_work_dim",
                "num_simd_work_items",
            ]
        );
    }
}
