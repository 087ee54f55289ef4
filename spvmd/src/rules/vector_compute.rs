//! Vector-compute kernel attributes → execution modes.
//!
//! `VCFloatControl` packs the rounding mode, the single-precision operation
//! mode and one denormal flag per floating-point type into one integer.
//! Rounding and operation modes are shared by all types, while the denormal
//! mode may differ between double, float and half. One triple of records
//! (rounding, operation, denormal) is emitted per floating-point width.
//!
//! `VCSLMSize` carries the shared local memory size in bytes.
use std::sync::LazyLock;

use bitflags::bitflags;
use enum_map::{Enum, EnumMap, enum_map};
use smallvec::{SmallVec, smallvec};

use crate::{
    magic,
    records::ExecutionModeCode,
    rules::{AnnotationKey, ExecutionModeRule, ModeEntry, RuleGroup, extract_scalar},
};

bitflags! {
    /// Packed `VCFloatControl` value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FloatControl: u32 {
        /// Single precision ALT mode (IEEE when clear).
        const FLOAT_MODE_ALT = 1;
        /// Two-bit rounding mode field: RTE 0, RTP 1, RTN 2, RTZ 3.
        const ROUNDING_MASK = 0b11 << 4;
        const DENORM_DOUBLE_ALLOW = 1 << 6;
        const DENORM_FLOAT_ALLOW = 1 << 7;
        const DENORM_HALF_ALLOW = 1 << 10;
    }
}

const ROUNDING_SHIFT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum RoundingMode {
    /// Round to nearest even
    Rte,
    /// Round towards +inf
    Rtp,
    /// Round towards -inf
    Rtn,
    /// Round towards zero
    Rtz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum OperationMode {
    Ieee,
    Alt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum DenormMode {
    FlushToZero,
    Preserve,
}

/// Floating-point types tracked by float control, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum FloatType {
    Double,
    Float,
    Half,
}

static FLOAT_TYPE_WIDTHS: LazyLock<EnumMap<FloatType, u32>> = LazyLock::new(|| {
    enum_map! {
        FloatType::Double => 64,
        FloatType::Float => 32,
        FloatType::Half => 16,
    }
});

static DENORM_ALLOW_FLAGS: LazyLock<EnumMap<FloatType, FloatControl>> = LazyLock::new(|| {
    enum_map! {
        FloatType::Double => FloatControl::DENORM_DOUBLE_ALLOW,
        FloatType::Float => FloatControl::DENORM_FLOAT_ALLOW,
        FloatType::Half => FloatControl::DENORM_HALF_ALLOW,
    }
});

static ROUNDING_EXEC_MODES: LazyLock<EnumMap<RoundingMode, ExecutionModeCode>> =
    LazyLock::new(|| {
        enum_map! {
            RoundingMode::Rte => ExecutionModeCode::RoundingModeRTE,
            RoundingMode::Rtp => ExecutionModeCode::RoundingModeRTPINTEL,
            RoundingMode::Rtn => ExecutionModeCode::RoundingModeRTNINTEL,
            RoundingMode::Rtz => ExecutionModeCode::RoundingModeRTZ,
        }
    });

static OPERATION_EXEC_MODES: LazyLock<EnumMap<OperationMode, ExecutionModeCode>> =
    LazyLock::new(|| {
        enum_map! {
            OperationMode::Ieee => ExecutionModeCode::FloatingPointModeIEEEINTEL,
            OperationMode::Alt => ExecutionModeCode::FloatingPointModeALTINTEL,
        }
    });

static DENORM_EXEC_MODES: LazyLock<EnumMap<DenormMode, ExecutionModeCode>> = LazyLock::new(|| {
    enum_map! {
        DenormMode::FlushToZero => ExecutionModeCode::DenormFlushToZero,
        DenormMode::Preserve => ExecutionModeCode::DenormPreserve,
    }
});

impl FloatControl {
    pub fn rounding_mode(&self) -> RoundingMode {
        match (self.bits() & Self::ROUNDING_MASK.bits()) >> ROUNDING_SHIFT {
            0 => RoundingMode::Rte,
            1 => RoundingMode::Rtp,
            2 => RoundingMode::Rtn,
            _ => RoundingMode::Rtz,
        }
    }

    pub fn operation_mode(&self) -> OperationMode {
        if self.contains(Self::FLOAT_MODE_ALT) {
            OperationMode::Alt
        } else {
            OperationMode::Ieee
        }
    }

    pub fn denorm_mode(&self, ty: FloatType) -> DenormMode {
        if self.contains(DENORM_ALLOW_FLAGS[ty]) {
            DenormMode::Preserve
        } else {
            DenormMode::FlushToZero
        }
    }
}

/// Rounding, operation and denormal records for every tracked width.
pub fn float_control_entries(control: FloatControl) -> SmallVec<[ModeEntry; 3]> {
    let rounding = ROUNDING_EXEC_MODES[control.rounding_mode()];
    let operation = OPERATION_EXEC_MODES[control.operation_mode()];

    let mut entries = SmallVec::new();
    for (ty, &width) in FLOAT_TYPE_WIDTHS.iter() {
        let denorm = DENORM_EXEC_MODES[control.denorm_mode(ty)];
        entries.push(ModeEntry::new(rounding, &[width]));
        entries.push(ModeEntry::new(operation, &[width]));
        entries.push(ModeEntry::new(denorm, &[width]));
    }
    entries
}

fn emit_float_control(values: &[u32]) -> SmallVec<[ModeEntry; 3]> {
    match values {
        [bits] => float_control_entries(FloatControl::from_bits_retain(*bits)),
        _ => SmallVec::new(),
    }
}

pub static VECTOR_COMPUTE_RULES: [ExecutionModeRule; 2] = [
    ExecutionModeRule {
        name: "vc-float-control",
        key: AnnotationKey::Attribute(magic::VC_FLOAT_CONTROL),
        extract: extract_scalar,
        emit: emit_float_control,
    },
    ExecutionModeRule {
        name: "vc-slm-size",
        key: AnnotationKey::Attribute(magic::VC_SLM_SIZE),
        extract: extract_scalar,
        emit: |v| smallvec![ModeEntry::new(ExecutionModeCode::SharedLocalMemorySizeINTEL, v)],
    },
];

pub static VECTOR_COMPUTE_GROUP: RuleGroup = RuleGroup {
    name: "vector-compute",
    rules: &VECTOR_COMPUTE_RULES,
};
