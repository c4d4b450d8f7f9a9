//! Vertex attribute codec
//!
//! Converts one attribute's source floats into its destination encoding:
//! - f32 → f32 (float, float2, float3, float4)
//! - f32 → snorm8/unorm8 (byte4n, ubyte4n)
//! - f32 → i8/u8 under a scale (byte4, ubyte4)
//! - f32 → snorm16 (short2n, short4n)
//! - f32 → i16 under a scale (short2, short4; short2 defaults to 3.15 fixed point)
//!
//! Output goes into a bounded [`EncodeScratch`] that holds one encoded vertex.
//! Encoded bytes use native byte order, like the ORB records.

use bytemuck::bytes_of;
use thiserror::Error;

use crate::formats::VertexFormat;

/// Capacity of the per-vertex encode scratch buffer in bytes
pub const ENCODE_SCRATCH_CAPACITY: usize = 1024;

/// Vertex codec failure
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CodecError {
    #[error("vertex format '{0}' cannot be encoded")]
    UnsupportedFormat(VertexFormat),

    #[error("encode scratch overflow: {needed} bytes needed, {available} of {capacity} available")]
    ScratchOverflow {
        needed: usize,
        available: usize,
        capacity: usize,
    },
}

/// Bounded scratch buffer for one encoded vertex
///
/// Reused across vertices: [`clear`](Self::clear) before each vertex, encode
/// every component, then copy out [`as_bytes`](Self::as_bytes).
pub struct EncodeScratch {
    buf: [u8; ENCODE_SCRATCH_CAPACITY],
    len: usize,
}

impl EncodeScratch {
    pub fn new() -> Self {
        Self {
            buf: [0; ENCODE_SCRATCH_CAPACITY],
            len: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        ENCODE_SCRATCH_CAPACITY - self.len
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Append bytes, failing without writing anything if they do not fit
    fn push(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        if bytes.len() > self.remaining() {
            return Err(CodecError::ScratchOverflow {
                needed: bytes.len(),
                available: self.remaining(),
                capacity: ENCODE_SCRATCH_CAPACITY,
            });
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }
}

impl Default for EncodeScratch {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Basic Conversion Functions
// ============================================================================

/// Convert f32 to signed normalized 8-bit integer (snorm8)
///
/// Maps f32 range [-1.0, 1.0] to i8 range [-127, 127].
#[inline]
pub fn f32_to_snorm8(value: f32) -> i8 {
    (value.clamp(-1.0, 1.0) * 127.0).round() as i8
}

/// Convert f32 to unsigned normalized 8-bit integer (unorm8)
///
/// Maps f32 range [0.0, 1.0] to u8 range [0, 255].
#[inline]
pub fn f32_to_unorm8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert f32 to signed normalized 16-bit integer (snorm16)
///
/// Maps f32 range [-1.0, 1.0] to i16 range [-32767, 32767].
#[inline]
pub fn f32_to_snorm16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Scale, round to nearest and clamp to i8
#[inline]
pub fn quantize_i8(value: f32, scale: f32) -> i8 {
    (value * scale)
        .round()
        .clamp(f32::from(i8::MIN), f32::from(i8::MAX)) as i8
}

/// Scale, round to nearest and clamp to u8
#[inline]
pub fn quantize_u8(value: f32, scale: f32) -> u8 {
    (value * scale)
        .round()
        .clamp(f32::from(u8::MIN), f32::from(u8::MAX)) as u8
}

/// Scale, round to nearest and clamp to i16
#[inline]
pub fn quantize_i16(value: f32, scale: f32) -> i16 {
    (value * scale)
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

/// Take `N` source items, padding missing ones with 0.0
#[inline]
fn items<const N: usize>(src: &[f32]) -> [f32; N] {
    let mut out = [0.0; N];
    let n = src.len().min(N);
    out[..n].copy_from_slice(&src[..n]);
    out
}

// ============================================================================
// Attribute Encoding
// ============================================================================

/// Encode one attribute of one vertex
///
/// `src` holds the source component's floats. Items beyond the destination's
/// component count are dropped, missing items encode as 0.0. `scale` only
/// affects unnormalized integer formats (see [`VertexFormat::is_scaled`]).
///
/// Returns the number of bytes appended to `out`, which always equals
/// `format.byte_size()`.
pub fn encode(
    format: VertexFormat,
    scale: f32,
    src: &[f32],
    out: &mut EncodeScratch,
) -> Result<usize, CodecError> {
    let start = out.len();
    match format {
        VertexFormat::Float => out.push(bytes_of(&items::<1>(src)))?,
        VertexFormat::Float2 => out.push(bytes_of(&items::<2>(src)))?,
        VertexFormat::Float3 => out.push(bytes_of(&items::<3>(src)))?,
        VertexFormat::Float4 => out.push(bytes_of(&items::<4>(src)))?,
        VertexFormat::Byte4 => {
            let packed = items::<4>(src).map(|v| quantize_i8(v, scale));
            out.push(bytes_of(&packed))?;
        }
        VertexFormat::Byte4N => {
            let packed = items::<4>(src).map(f32_to_snorm8);
            out.push(bytes_of(&packed))?;
        }
        VertexFormat::UByte4 => {
            let packed = items::<4>(src).map(|v| quantize_u8(v, scale));
            out.push(&packed)?;
        }
        VertexFormat::UByte4N => {
            let packed = items::<4>(src).map(f32_to_unorm8);
            out.push(&packed)?;
        }
        VertexFormat::Short2 => {
            let packed = items::<2>(src).map(|v| quantize_i16(v, scale));
            out.push(bytes_of(&packed))?;
        }
        VertexFormat::Short2N => {
            let packed = items::<2>(src).map(f32_to_snorm16);
            out.push(bytes_of(&packed))?;
        }
        VertexFormat::Short4 => {
            let packed = items::<4>(src).map(|v| quantize_i16(v, scale));
            out.push(bytes_of(&packed))?;
        }
        VertexFormat::Short4N => {
            let packed = items::<4>(src).map(f32_to_snorm16);
            out.push(bytes_of(&packed))?;
        }
        VertexFormat::UInt10_2N => return Err(CodecError::UnsupportedFormat(format)),
    }
    let written = out.len() - start;
    debug_assert_eq!(written, format.byte_size());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::DEFAULT_SHORT2_SCALE;

    fn encode_one(format: VertexFormat, scale: f32, src: &[f32]) -> Vec<u8> {
        let mut scratch = EncodeScratch::new();
        let n = encode(format, scale, src, &mut scratch).unwrap();
        assert_eq!(n, format.byte_size());
        scratch.as_bytes().to_vec()
    }

    fn i16s(bytes: &[u8]) -> Vec<i16> {
        bytes
            .chunks_exact(2)
            .map(|c| i16::from_ne_bytes([c[0], c[1]]))
            .collect()
    }

    fn f32s(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn test_snorm_unorm_conversion() {
        assert_eq!(f32_to_snorm16(1.0), 32767);
        assert_eq!(f32_to_snorm16(-1.0), -32767);
        assert_eq!(f32_to_snorm16(2.0), 32767);
        assert_eq!(f32_to_snorm8(0.5), 64);
        assert_eq!(f32_to_unorm8(0.5), 128);
        assert_eq!(f32_to_unorm8(-0.5), 0);
        assert_eq!(f32_to_unorm8(1.0), 255);
    }

    #[test]
    fn test_short2_fixed_point_texcoord() {
        let bytes = encode_one(VertexFormat::Short2, DEFAULT_SHORT2_SCALE, &[0.5, 0.25]);
        assert_eq!(i16s(&bytes), vec![4096, 2048]);
    }

    #[test]
    fn test_short2_custom_scale_and_clamp() {
        let bytes = encode_one(VertexFormat::Short2, 4096.0, &[0.5, 100.0]);
        assert_eq!(i16s(&bytes), vec![2048, i16::MAX]);
    }

    #[test]
    fn test_float_passthrough_ignores_scale() {
        let bytes = encode_one(VertexFormat::Float3, 8192.0, &[1.5, -2.0, 3.25]);
        assert_eq!(f32s(&bytes), vec![1.5, -2.0, 3.25]);
    }

    #[test]
    fn test_float_pads_and_truncates() {
        let bytes = encode_one(VertexFormat::Float4, 1.0, &[1.0, 2.0, 3.0]);
        assert_eq!(f32s(&bytes), vec![1.0, 2.0, 3.0, 0.0]);

        let bytes = encode_one(VertexFormat::Float2, 1.0, &[1.0, 2.0, 3.0]);
        assert_eq!(f32s(&bytes), vec![1.0, 2.0]);
    }

    #[test]
    fn test_byte4n_normal() {
        let bytes = encode_one(VertexFormat::Byte4N, 1.0, &[0.0, 1.0, -1.0]);
        let values: Vec<i8> = bytes.iter().map(|b| *b as i8).collect();
        assert_eq!(values, vec![0, 127, -127, 0]);
    }

    #[test]
    fn test_ubyte4n_color() {
        let bytes = encode_one(VertexFormat::UByte4N, 1.0, &[1.0, 0.0, 0.5, 2.0]);
        assert_eq!(bytes, vec![255, 0, 128, 255]);
    }

    #[test]
    fn test_ubyte4_skin_indices() {
        let bytes = encode_one(VertexFormat::UByte4, 1.0, &[0.0, 3.0, 17.4, 300.0]);
        assert_eq!(bytes, vec![0, 3, 17, 255]);
    }

    #[test]
    fn test_byte4_clamps_to_signed_range() {
        let bytes = encode_one(VertexFormat::Byte4, 1.0, &[-200.0, -1.6, 1.5, 127.0]);
        let values: Vec<i8> = bytes.iter().map(|b| *b as i8).collect();
        assert_eq!(values, vec![-128, -2, 2, 127]);
    }

    #[test]
    fn test_short4n_and_short4() {
        let bytes = encode_one(VertexFormat::Short4N, 1.0, &[0.5, -0.5, 1.0, 0.0]);
        assert_eq!(i16s(&bytes), vec![16384, -16384, 32767, 0]);

        let bytes = encode_one(VertexFormat::Short4, 1.0, &[10.4, -10.6, 0.0, 1.0]);
        assert_eq!(i16s(&bytes), vec![10, -11, 0, 1]);
    }

    #[test]
    fn test_unsupported_format_writes_nothing() {
        let mut scratch = EncodeScratch::new();
        let err = encode(VertexFormat::UInt10_2N, 1.0, &[0.0; 4], &mut scratch).unwrap_err();
        assert_eq!(err, CodecError::UnsupportedFormat(VertexFormat::UInt10_2N));
        assert!(scratch.is_empty());
    }

    #[test]
    fn test_scratch_overflow_is_reported() {
        let mut scratch = EncodeScratch::new();
        for _ in 0..ENCODE_SCRATCH_CAPACITY / 16 {
            encode(VertexFormat::Float4, 1.0, &[0.0; 4], &mut scratch).unwrap();
        }
        assert_eq!(scratch.remaining(), 0);

        let err = encode(VertexFormat::Float, 1.0, &[0.0], &mut scratch).unwrap_err();
        assert!(matches!(err, CodecError::ScratchOverflow { needed: 4, available: 0, .. }));
        assert_eq!(scratch.len(), ENCODE_SCRATCH_CAPACITY);

        scratch.clear();
        assert!(scratch.is_empty());
    }
}
