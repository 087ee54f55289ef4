#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

/// Represents an integer type with a specific bit width.
///
/// Signedness is not represented here; all integer types are treated as unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct IType {
    num_bits: u32,
}

impl IType {
    pub const I1: Self = Self { num_bits: 1 };
    pub const I8: Self = Self { num_bits: 8 };
    pub const I16: Self = Self { num_bits: 16 };
    pub const I32: Self = Self { num_bits: 32 };
    pub const I64: Self = Self { num_bits: 64 };
    pub const MIN_BITS: u32 = 1;
    pub const MAX_BITS: u32 = (1 << 23) - 1;

    /// Creates a new `IType` with the specified number of bits.
    #[inline]
    pub const fn new(num_bits: u32) -> Option<Self> {
        if num_bits >= Self::MIN_BITS && num_bits <= Self::MAX_BITS {
            Some(Self { num_bits })
        } else {
            None
        }
    }

    /// Returns the number of bits of the integer type.
    #[inline]
    pub const fn num_bits(&self) -> u32 {
        self.num_bits
    }
}

impl std::fmt::Display for IType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "i{}", self.num_bits)
    }
}

/// Represents a floating-point type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FType {
    /// 16-bit floating point value (IEEE-754 binary16), "half precision".
    Fp16,

    /// 16-bit "brain" floating point value (7-bit significand).
    Bf16,

    /// 32-bit floating point value (IEEE-754 binary32), "single precision".
    Fp32,

    /// 64-bit floating point value (IEEE-754 binary64), "double precision".
    Fp64,

    /// 128-bit floating point value (IEEE-754 binary128).
    Fp128,
}

impl FType {
    /// Width of the type in bits.
    pub const fn num_bits(&self) -> u32 {
        match self {
            FType::Fp16 | FType::Bf16 => 16,
            FType::Fp32 => 32,
            FType::Fp64 => 64,
            FType::Fp128 => 128,
        }
    }
}

impl std::fmt::Display for FType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FType::Fp16 => "half",
            FType::Bf16 => "bfloat",
            FType::Fp32 => "float",
            FType::Fp64 => "double",
            FType::Fp128 => "fp128",
        };
        write!(f, "{}", s)
    }
}

/// Scalar types that may appear as vector components or pointees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalarType {
    Int(IType),
    Float(FType),
}

impl From<IType> for ScalarType {
    fn from(itype: IType) -> Self {
        ScalarType::Int(itype)
    }
}

impl From<FType> for ScalarType {
    fn from(ftype: FType) -> Self {
        ScalarType::Float(ftype)
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarType::Int(itype) => itype.fmt(f),
            ScalarType::Float(ftype) => ftype.fmt(f),
        }
    }
}

/// Pointer type.
///
/// Pointers live in an address space and may carry the scalar type they point
/// to. Opaque pointers (`pointee == None`) only carry the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PtrType {
    pub address_space: u32,
    pub pointee: Option<ScalarType>,
}

impl PtrType {
    /// Opaque pointer in the default address space.
    pub const OPAQUE: Self = Self {
        address_space: 0,
        pointee: None,
    };

    /// Pointer to `pointee` in the default address space.
    pub fn to(pointee: impl Into<ScalarType>) -> Self {
        Self {
            address_space: 0,
            pointee: Some(pointee.into()),
        }
    }

    /// Same pointer moved into `address_space`.
    pub fn in_address_space(self, address_space: u32) -> Self {
        Self {
            address_space,
            ..self
        }
    }
}

impl std::fmt::Display for PtrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.pointee {
            Some(pointee) => write!(f, "{}", pointee)?,
            None => write!(f, "ptr")?,
        }
        if self.address_space != 0 {
            write!(f, " addrspace({})", self.address_space)?;
        }
        if self.pointee.is_some() {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// A vector type: a fixed number of scalar components operated in parallel (SIMD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VcType {
    pub ty: ScalarType,
    pub num_elements: u16,
}

impl std::fmt::Display for VcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{} x {}>", self.num_elements, self.ty)
    }
}

/// Represents any type a function parameter or metadata operand may carry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimaryType {
    Int(IType),
    Float(FType),
    Ptr(PtrType),
    Vc(VcType),
    /// Aggregate passed by value; elements are listed in declaration order.
    Struct(Vec<PrimaryType>),
}

impl PrimaryType {
    /// Scalar view of this type: the type itself for integers and floats,
    /// the component type for vectors.
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            PrimaryType::Int(itype) => Some(ScalarType::Int(*itype)),
            PrimaryType::Float(ftype) => Some(ScalarType::Float(*ftype)),
            PrimaryType::Vc(vc) => Some(vc.ty),
            PrimaryType::Ptr(_) | PrimaryType::Struct(_) => None,
        }
    }
}

macro_rules! primary_type_from {
    ($typ:ty, $lbl:ident) => {
        impl From<$typ> for PrimaryType {
            fn from(value: $typ) -> Self {
                PrimaryType::$lbl(value)
            }
        }
    };
}

primary_type_from! { IType, Int }
primary_type_from! { FType, Float }
primary_type_from! { PtrType, Ptr }
primary_type_from! { VcType, Vc }

impl From<ScalarType> for PrimaryType {
    fn from(value: ScalarType) -> Self {
        match value {
            ScalarType::Int(itype) => PrimaryType::Int(itype),
            ScalarType::Float(ftype) => PrimaryType::Float(ftype),
        }
    }
}

impl std::fmt::Display for PrimaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimaryType::Int(itype) => itype.fmt(f),
            PrimaryType::Float(ftype) => ftype.fmt(f),
            PrimaryType::Ptr(ptr_type) => ptr_type.fmt(f),
            PrimaryType::Vc(vc_type) => vc_type.fmt(f),
            PrimaryType::Struct(elements) => {
                write!(f, "{{ ")?;
                for (idx, elem) in elements.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    elem.fmt(f)?;
                }
                write!(f, " }}")
            }
        }
    }
}
