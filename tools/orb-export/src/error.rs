//! Export error type
//!
//! Every failure aborts the export. A partially written file must be
//! discarded by the caller.

use orb_common::{CodecError, SectionKind, VertexAttr, VertexFormat};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for ORB export.
#[derive(Debug, Error)]
pub enum OrbError {
    #[error("Failed to create output file {path:?}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while writing ORB data: {0}")]
    Io(#[from] io::Error),

    #[error("File offset error ({section}): planned {expected}, cursor at {actual}")]
    OffsetMismatch {
        section: SectionKind,
        expected: u64,
        actual: u64,
    },

    #[error("Vertex data size mismatch: {floats} floats is not a multiple of the {stride}-float source stride")]
    VertexDataLength { floats: usize, stride: usize },

    #[error("Number of vertices mismatch: meshes declare {mesh_vertices}, vertex data holds {vertices}")]
    VertexCountMismatch { mesh_vertices: u64, vertices: usize },

    #[error("Mesh {mesh} {range} range {first}..{end} exceeds the {available} available")]
    MeshRangeOutOfBounds {
        mesh: usize,
        range: &'static str,
        first: u32,
        end: u64,
        available: usize,
    },

    #[error("{owner} {index} references {target} {reference}, but only {count} exist")]
    InvalidReference {
        owner: &'static str,
        index: usize,
        target: &'static str,
        reference: u32,
        count: usize,
    },

    #[error("Vertex attribute '{attr}' maps to format '{format}', which ORB cannot encode")]
    UnsupportedVertexFormat {
        attr: VertexAttr,
        format: VertexFormat,
    },

    #[error("Quantization scale {scale} for '{attr}' ({format}) must be finite and positive")]
    InvalidScale {
        attr: VertexAttr,
        format: VertexFormat,
        scale: f32,
    },

    #[error("Destination vertex stride too big: {stride} bytes, encode scratch holds {capacity}")]
    StrideTooLarge { stride: usize, capacity: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Encoded length error ({section}): wrote {encoded} bytes, planned {planned}")]
    EncodedLengthMismatch {
        section: SectionKind,
        encoded: u64,
        planned: u64,
    },

    #[error("Encoding source length error: consumed {consumed} of {available} floats")]
    SourceLengthMismatch { consumed: usize, available: usize },

    #[error("String pool size mismatch: wrote {written} bytes, expected {expected}")]
    StringPoolSizeMismatch { written: u64, expected: u64 },

    #[error("{owner} {index} string {text:?} contains a NUL byte")]
    InteriorNul {
        owner: &'static str,
        index: usize,
        text: String,
    },

    #[error("Writing animation key data is not supported ({size} bytes planned)")]
    AnimKeysUnsupported { size: u32 },

    #[error("{what} does not fit the 32-bit ORB layout")]
    LayoutOverflow { what: &'static str },
}

pub type Result<T, E = OrbError> = std::result::Result<T, E>;
