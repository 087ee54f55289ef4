//! Canonical record vocabulary.
//!
//! Every record the transcoder produces is one of the typed [`Record`]
//! variants below. Numeric codes are centralised in closed enumerations whose
//! discriminants are the wire values expected by downstream consumers; no
//! rule embeds a literal code.
use smallvec::SmallVec;
use spvir::FunctionRef;
use strum::{EnumIs, EnumIter, FromRepr};

use crate::{builder::MetadataBuilder, magic};

/// `OpExecutionMode` modes produced by the transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, FromRepr)]
#[repr(u32)]
pub enum ExecutionModeCode {
    LocalSize = 17,
    LocalSizeHint = 18,
    VecTypeHint = 30,
    SubgroupSize = 35,
    DenormPreserve = 4459,
    DenormFlushToZero = 4460,
    RoundingModeRTE = 4462,
    RoundingModeRTZ = 4463,
    SharedLocalMemorySizeINTEL = 5618,
    RoundingModeRTPINTEL = 5620,
    RoundingModeRTNINTEL = 5621,
    FloatingPointModeALTINTEL = 5622,
    FloatingPointModeIEEEINTEL = 5623,
    MaxWorkgroupSizeINTEL = 5893,
    MaxWorkDimINTEL = 5894,
    NumSIMDWorkitemsINTEL = 5896,
}

impl ExecutionModeCode {
    /// Wire value of the mode.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr)]
#[repr(u32)]
pub enum AddressingModel {
    Logical = 0,
    Physical32 = 1,
    Physical64 = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr)]
#[repr(u32)]
pub enum MemoryModel {
    Simple = 0,
    Glsl450 = 1,
    OpenCL = 2,
    Vulkan = 3,
}

/// One `OpExecutionMode` record: `!{<fn>, i32 <mode>, i32 <operand>...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionMode {
    pub target: FunctionRef,
    pub mode: ExecutionModeCode,
    pub operands: SmallVec<[u32; 3]>,
}

impl ExecutionMode {
    pub fn new(target: FunctionRef, mode: ExecutionModeCode, operands: &[u32]) -> Self {
        Self {
            target,
            mode,
            operands: SmallVec::from_slice(operands),
        }
    }
}

/// Module-level addressing and memory model: `!{i32 <addressing>, i32 <memory>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryModelDecl {
    pub addressing: AddressingModel,
    pub memory: MemoryModel,
}

/// Source extensions; lowered as one `!{!"<name>"}` entry per name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceExtensionList {
    pub names: Vec<String>,
}

/// Which version list a [`VersionDecl`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionList {
    Spir,
    OpenCL,
}

/// Version pair: `!{i32 <major>, i32 <minor>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionDecl {
    pub list: VersionList,
    pub major: u32,
    pub minor: u32,
}

impl VersionDecl {
    pub const SPIR: Self = Self {
        list: VersionList::Spir,
        major: 1,
        minor: 2,
    };

    pub const OPENCL: Self = Self {
        list: VersionList::OpenCL,
        major: 1,
        minor: 0,
    };
}

/// Any canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs)]
pub enum Record {
    ExecutionMode(ExecutionMode),
    MemoryModel(MemoryModelDecl),
    SourceExtensions(SourceExtensionList),
    Version(VersionDecl),
}

impl Record {
    /// Named list the record is stored in.
    pub fn list_name(&self) -> &'static str {
        match self {
            Record::ExecutionMode(_) => magic::SPIRV_EXECUTION_MODE,
            Record::MemoryModel(_) => magic::SPIRV_MEMORY_MODEL,
            Record::SourceExtensions(_) => magic::SPIRV_SOURCE_EXTENSION,
            Record::Version(decl) => match decl.list {
                VersionList::Spir => magic::OPENCL_SPIR_VERSION,
                VersionList::OpenCL => magic::OPENCL_OCL_VERSION,
            },
        }
    }

    /// Append the record to its list.
    pub fn emit(&self, builder: &mut MetadataBuilder<'_>) {
        let mut list = builder.add_named_list(self.list_name());
        match self {
            Record::ExecutionMode(em) => list
                .new_entry()
                .add(em.target)
                .add(em.mode.code())
                .extend(em.operands.iter().copied())
                .finish(),
            Record::MemoryModel(decl) => list
                .new_entry()
                .add(decl.addressing as u32)
                .add(decl.memory as u32)
                .finish(),
            Record::SourceExtensions(exts) => {
                for name in &exts.names {
                    list.new_entry().add(name.as_str()).finish();
                }
            }
            Record::Version(decl) => list.new_entry().add(decl.major).add(decl.minor).finish(),
        }
    }
}

impl From<ExecutionMode> for Record {
    fn from(value: ExecutionMode) -> Self {
        Record::ExecutionMode(value)
    }
}

impl From<MemoryModelDecl> for Record {
    fn from(value: MemoryModelDecl) -> Self {
        Record::MemoryModel(value)
    }
}

impl From<SourceExtensionList> for Record {
    fn from(value: SourceExtensionList) -> Self {
        Record::SourceExtensions(value)
    }
}

impl From<VersionDecl> for Record {
    fn from(value: VersionDecl) -> Self {
        Record::Version(value)
    }
}
