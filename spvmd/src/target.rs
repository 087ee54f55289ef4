//! Target triple recognition.
use strum::EnumIs;

use crate::{error::TranscodeError, records::AddressingModel};

/// Architectures whose modules can be transcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum TargetArch {
    Spir,
    Spir64,
    Nvptx,
    Nvptx64,
}

impl TargetArch {
    /// Returns `true` for 32-bit pointer architectures.
    pub fn is_32_bit(&self) -> bool {
        matches!(self, TargetArch::Spir | TargetArch::Nvptx)
    }

    /// Returns `true` for the NVPTX family, whose kernels are marked through
    /// `nvvm.annotations` rather than by calling convention.
    pub fn is_nvptx_family(&self) -> bool {
        matches!(self, TargetArch::Nvptx | TargetArch::Nvptx64)
    }

    pub fn addressing_model(&self) -> AddressingModel {
        if self.is_32_bit() {
            AddressingModel::Physical32
        } else {
            AddressingModel::Physical64
        }
    }
}

/// A recognised target triple (`arch[-vendor[-os[-env]]]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTriple {
    pub arch: TargetArch,
    pub triple: String,
}

impl TargetTriple {
    /// Recognise `triple`. Only the architecture component is significant.
    pub fn parse(triple: &str) -> Result<Self, TranscodeError> {
        let arch = match triple.split('-').next().unwrap_or_default() {
            "spir" => TargetArch::Spir,
            "spir64" => TargetArch::Spir64,
            "nvptx" => TargetArch::Nvptx,
            "nvptx64" => TargetArch::Nvptx64,
            _ => {
                return Err(TranscodeError::UnsupportedTriple {
                    triple: triple.to_string(),
                });
            }
        };
        Ok(Self {
            arch,
            triple: triple.to_string(),
        })
    }

    /// Recognise an optional module triple; absence is an error.
    pub fn from_module(triple: Option<&str>) -> Result<Self, TranscodeError> {
        match triple {
            Some(triple) if !triple.is_empty() => Self::parse(triple),
            _ => Err(TranscodeError::MissingTriple),
        }
    }
}
