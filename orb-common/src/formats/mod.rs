//! ORB binary model format
//!
//! A single `.orb` file holds a whole model: a fixed-size header, ten
//! fixed-size record arrays, the vertex and index payloads, an (unused)
//! animation key payload and a NUL-terminated string pool, all back to back.
//!
//! Records and the header are written in native byte order.
//!
//! All structures implement the [`BinarySerializable`] trait for consistent
//! serialization/deserialization.

pub mod animation;
pub mod header;
pub mod material;
pub mod records;
mod serialization;
pub mod vertex;

pub use animation::*;
pub use header::*;
pub use material::*;
pub use records::*;
pub use serialization::BinarySerializable;
pub use vertex::*;

/// Code stored for enum values the ORB format cannot represent
pub const INVALID_CODE: u32 = u32::MAX;
