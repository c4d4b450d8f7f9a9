//! Vertex attributes and vertex formats
//!
//! A single [`VertexFormat`] enum describes both the source layout of a
//! scene's vertex data (as floats) and the destination encoding written to
//! the ORB file. Every variant has a statically known source arity
//! ([`VertexFormat::num_items`]) and destination size
//! ([`VertexFormat::byte_size`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::INVALID_CODE;

/// Default quantization scale for [`VertexFormat::Short2`].
///
/// 3.15 fixed point: 8192 units per 1.0, which covers texture coordinates in
/// the range [-4, 4).
pub const DEFAULT_SHORT2_SCALE: f32 = 8192.0;

/// Vertex attribute semantic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum VertexAttr {
    Position = 0,
    Normal = 1,
    TexCoord0 = 2,
    TexCoord1 = 3,
    TexCoord2 = 4,
    TexCoord3 = 5,
    Tangent = 6,
    Binormal = 7,
    Weights = 8,
    Indices = 9,
    Color0 = 10,
    Color1 = 11,
}

impl VertexAttr {
    pub const ALL: [VertexAttr; 12] = [
        VertexAttr::Position,
        VertexAttr::Normal,
        VertexAttr::TexCoord0,
        VertexAttr::TexCoord1,
        VertexAttr::TexCoord2,
        VertexAttr::TexCoord3,
        VertexAttr::Tangent,
        VertexAttr::Binormal,
        VertexAttr::Weights,
        VertexAttr::Indices,
        VertexAttr::Color0,
        VertexAttr::Color1,
    ];

    /// On-disk attribute code
    #[inline]
    pub const fn orb_code(self) -> u32 {
        self as u32
    }

    pub fn from_orb_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            VertexAttr::Position => "position",
            VertexAttr::Normal => "normal",
            VertexAttr::TexCoord0 => "texcoord0",
            VertexAttr::TexCoord1 => "texcoord1",
            VertexAttr::TexCoord2 => "texcoord2",
            VertexAttr::TexCoord3 => "texcoord3",
            VertexAttr::Tangent => "tangent",
            VertexAttr::Binormal => "binormal",
            VertexAttr::Weights => "weights",
            VertexAttr::Indices => "indices",
            VertexAttr::Color0 => "color0",
            VertexAttr::Color1 => "color1",
        }
    }
}

impl fmt::Display for VertexAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vertex component format
///
/// Names follow the `<type><components>[N]` convention, where `N` marks a
/// normalized integer format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexFormat {
    Float,
    Float2,
    Float3,
    Float4,
    Byte4,
    Byte4N,
    UByte4,
    UByte4N,
    Short2,
    Short2N,
    Short4,
    Short4N,
    /// Packed 10/10/10/2 normalized. Valid as a source description, but the
    /// ORB format has no encoding for it.
    UInt10_2N,
}

impl VertexFormat {
    pub const ALL: [VertexFormat; 13] = [
        VertexFormat::Float,
        VertexFormat::Float2,
        VertexFormat::Float3,
        VertexFormat::Float4,
        VertexFormat::Byte4,
        VertexFormat::Byte4N,
        VertexFormat::UByte4,
        VertexFormat::UByte4N,
        VertexFormat::Short2,
        VertexFormat::Short2N,
        VertexFormat::Short4,
        VertexFormat::Short4N,
        VertexFormat::UInt10_2N,
    ];

    /// Number of logical components (source floats consumed per vertex)
    #[inline]
    pub const fn num_items(self) -> usize {
        match self {
            VertexFormat::Float => 1,
            VertexFormat::Float2 | VertexFormat::Short2 | VertexFormat::Short2N => 2,
            VertexFormat::Float3 => 3,
            VertexFormat::Float4
            | VertexFormat::Byte4
            | VertexFormat::Byte4N
            | VertexFormat::UByte4
            | VertexFormat::UByte4N
            | VertexFormat::Short4
            | VertexFormat::Short4N
            | VertexFormat::UInt10_2N => 4,
        }
    }

    /// Encoded size in bytes
    #[inline]
    pub const fn byte_size(self) -> usize {
        match self {
            VertexFormat::Float => 4,
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
            VertexFormat::Byte4
            | VertexFormat::Byte4N
            | VertexFormat::UByte4
            | VertexFormat::UByte4N
            | VertexFormat::Short2
            | VertexFormat::Short2N
            | VertexFormat::UInt10_2N => 4,
            VertexFormat::Short4 | VertexFormat::Short4N => 8,
        }
    }

    /// On-disk format code, [`INVALID_CODE`] for formats ORB cannot store
    pub const fn orb_code(self) -> u32 {
        match self {
            VertexFormat::Float => 0,
            VertexFormat::Float2 => 1,
            VertexFormat::Float3 => 2,
            VertexFormat::Float4 => 3,
            VertexFormat::Byte4 => 4,
            VertexFormat::Byte4N => 5,
            VertexFormat::UByte4 => 6,
            VertexFormat::UByte4N => 7,
            VertexFormat::Short2 => 8,
            VertexFormat::Short2N => 9,
            VertexFormat::Short4 => 10,
            VertexFormat::Short4N => 11,
            VertexFormat::UInt10_2N => INVALID_CODE,
        }
    }

    pub fn from_orb_code(code: u32) -> Option<Self> {
        if code == INVALID_CODE {
            return None;
        }
        Self::ALL.iter().copied().find(|f| f.orb_code() == code)
    }

    /// Whether the vertex codec can produce this format
    #[inline]
    pub const fn is_encodable(self) -> bool {
        self.orb_code() != INVALID_CODE
    }

    /// Whether quantization scale applies to this format
    ///
    /// Only unnormalized integer formats multiply by a scale before rounding.
    pub const fn is_scaled(self) -> bool {
        matches!(
            self,
            VertexFormat::Byte4 | VertexFormat::UByte4 | VertexFormat::Short2 | VertexFormat::Short4
        )
    }

    /// Quantization scale used when no per-attribute scale is configured
    pub const fn default_scale(self) -> f32 {
        match self {
            VertexFormat::Short2 => DEFAULT_SHORT2_SCALE,
            _ => 1.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            VertexFormat::Float => "float",
            VertexFormat::Float2 => "float2",
            VertexFormat::Float3 => "float3",
            VertexFormat::Float4 => "float4",
            VertexFormat::Byte4 => "byte4",
            VertexFormat::Byte4N => "byte4n",
            VertexFormat::UByte4 => "ubyte4",
            VertexFormat::UByte4N => "ubyte4n",
            VertexFormat::Short2 => "short2",
            VertexFormat::Short2N => "short2n",
            VertexFormat::Short4 => "short4",
            VertexFormat::Short4N => "short4n",
            VertexFormat::UInt10_2N => "uint10_2n",
        }
    }
}

impl fmt::Display for VertexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
