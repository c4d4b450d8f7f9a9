//! Shared types and utilities for the ORB model format
//!
//! This crate provides everything that describes an `.orb` file on disk,
//! shared between the exporter (`orb-export`) and anything that inspects
//! the produced artifacts.
//!
//! # Modules
//!
//! - [`formats`] - ORB header, fixed-size section records and format enums
//! - [`codec`] - Vertex attribute encoding (f32 → float/byte/short packings)

pub mod codec;
pub mod formats;

// Re-export commonly used codec items
pub use codec::{
    encode, f32_to_snorm8, f32_to_snorm16, f32_to_unorm8, quantize_i8, quantize_i16,
    quantize_u8, CodecError, EncodeScratch, ENCODE_SCRATCH_CAPACITY,
};

// Re-export commonly used format items
pub use formats::{
    BinarySerializable, KeyType, OrbAnimClip, OrbAnimCurve, OrbAnimKeyComponent, OrbBone,
    OrbHeader, OrbMaterial, OrbMesh, OrbNode, OrbTextureProperty, OrbValueProperty,
    OrbVertexComponent, PropType, SectionInfo, SectionKind, VertexAttr, VertexFormat,
    DEFAULT_SHORT2_SCALE, INVALID_CODE, ORB_EXT, ORB_MAGIC, ROOT_PARENT, STATIC_KEY_OFFSET,
};
