//! Binary format definitions for ORB files
//!
//! Re-exports from orb-common for writing ORB files.

pub use orb_common::formats::*;

use bytemuck::Pod;
use std::io::Write;

use crate::error::Result;

/// Write a slice of fixed-size records as raw bytes (native byte order)
///
/// Returns the number of bytes written.
pub fn write_records<W: Write, T: Pod>(w: &mut W, records: &[T]) -> Result<u64> {
    let bytes: &[u8] = bytemuck::cast_slice(records);
    w.write_all(bytes)?;
    Ok(bytes.len() as u64)
}
