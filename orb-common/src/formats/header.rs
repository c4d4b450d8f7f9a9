//! ORB file header (.orb)
//!
//! Fixed-size header at offset 0. Every section of the file is located by an
//! (offset, count) pair for record arrays or an (offset, size) pair for raw
//! payloads. Sections are stored back to back in [`SectionKind::ALL`] order.
//!
//! # Layout
//! ```text
//! 0x00: magic u32 ('ORB1')
//! 0x04: vertex components    offset u32, count u32
//! 0x0C: value properties     offset u32, count u32
//! 0x14: texture properties   offset u32, count u32
//! 0x1C: materials            offset u32, count u32
//! 0x24: meshes               offset u32, count u32
//! 0x2C: bones                offset u32, count u32
//! 0x34: nodes                offset u32, count u32
//! 0x3C: anim key formats     offset u32, count u32
//! 0x44: anim curves          offset u32, count u32
//! 0x4C: anim clips           offset u32, count u32
//! 0x54: vertex data          offset u32, size u32
//! 0x5C: index data           offset u32, size u32
//! 0x64: anim key data        offset u32, size u32
//! 0x6C: string pool          offset u32, size u32
//! ```
//!
//! The string pool size is written as 0 first and patched in place once the
//! pool has been written (see [`OrbHeader::STRING_POOL_SIZE_OFFSET`]).

use bytemuck::{Pod, Zeroable};
use std::fmt;

use super::records::{
    OrbAnimClip, OrbAnimCurve, OrbAnimKeyComponent, OrbBone, OrbMaterial, OrbMesh, OrbNode,
    OrbTextureProperty, OrbValueProperty, OrbVertexComponent,
};

/// ORB magic tag ('ORB1' as a multi-character constant)
pub const ORB_MAGIC: u32 = u32::from_be_bytes(*b"ORB1");

/// File extension for ORB model files
pub const ORB_EXT: &str = "orb";

/// Section of an ORB file, in on-disk order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    VertexComponents,
    ValueProps,
    TextureProps,
    Materials,
    Meshes,
    Bones,
    Nodes,
    AnimKeyComponents,
    AnimCurves,
    AnimClips,
    VertexData,
    IndexData,
    AnimKeyData,
    StringPool,
}

impl SectionKind {
    /// All sections in file order. The string pool is always last.
    pub const ALL: [SectionKind; 14] = [
        SectionKind::VertexComponents,
        SectionKind::ValueProps,
        SectionKind::TextureProps,
        SectionKind::Materials,
        SectionKind::Meshes,
        SectionKind::Bones,
        SectionKind::Nodes,
        SectionKind::AnimKeyComponents,
        SectionKind::AnimCurves,
        SectionKind::AnimClips,
        SectionKind::VertexData,
        SectionKind::IndexData,
        SectionKind::AnimKeyData,
        SectionKind::StringPool,
    ];

    /// Record size for record-array sections, `None` for raw payloads
    pub const fn record_size(self) -> Option<usize> {
        match self {
            SectionKind::VertexComponents => Some(OrbVertexComponent::SIZE),
            SectionKind::ValueProps => Some(OrbValueProperty::SIZE),
            SectionKind::TextureProps => Some(OrbTextureProperty::SIZE),
            SectionKind::Materials => Some(OrbMaterial::SIZE),
            SectionKind::Meshes => Some(OrbMesh::SIZE),
            SectionKind::Bones => Some(OrbBone::SIZE),
            SectionKind::Nodes => Some(OrbNode::SIZE),
            SectionKind::AnimKeyComponents => Some(OrbAnimKeyComponent::SIZE),
            SectionKind::AnimCurves => Some(OrbAnimCurve::SIZE),
            SectionKind::AnimClips => Some(OrbAnimClip::SIZE),
            SectionKind::VertexData
            | SectionKind::IndexData
            | SectionKind::AnimKeyData
            | SectionKind::StringPool => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SectionKind::VertexComponents => "vertex components",
            SectionKind::ValueProps => "value properties",
            SectionKind::TextureProps => "texture properties",
            SectionKind::Materials => "materials",
            SectionKind::Meshes => "meshes",
            SectionKind::Bones => "bones",
            SectionKind::Nodes => "nodes",
            SectionKind::AnimKeyComponents => "anim key formats",
            SectionKind::AnimCurves => "anim curves",
            SectionKind::AnimClips => "anim clips",
            SectionKind::VertexData => "vertex data",
            SectionKind::IndexData => "index data",
            SectionKind::AnimKeyData => "anim key data",
            SectionKind::StringPool => "string pool",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Location of one section
///
/// For record arrays `count` is the number of records; for raw payloads it is
/// the payload size in bytes, so `byte_size == count` there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionInfo {
    pub kind: SectionKind,
    pub offset: u32,
    pub count: u32,
    pub byte_size: u32,
}

impl SectionInfo {
    /// Offset one past the last byte of the section
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.byte_size)
    }
}

/// ORB header (116 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct OrbHeader {
    pub magic: u32,
    pub vertex_component_offset: u32,
    pub num_vertex_components: u32,
    pub value_prop_offset: u32,
    pub num_value_props: u32,
    pub texture_prop_offset: u32,
    pub num_texture_props: u32,
    pub material_offset: u32,
    pub num_materials: u32,
    pub mesh_offset: u32,
    pub num_meshes: u32,
    pub bone_offset: u32,
    pub num_bones: u32,
    pub node_offset: u32,
    pub num_nodes: u32,
    pub anim_key_component_offset: u32,
    pub num_anim_key_components: u32,
    pub anim_curve_offset: u32,
    pub num_anim_curves: u32,
    pub anim_clip_offset: u32,
    pub num_anim_clips: u32,
    pub vertex_data_offset: u32,
    pub vertex_data_size: u32,
    pub index_data_offset: u32,
    pub index_data_size: u32,
    pub anim_key_data_offset: u32,
    pub anim_key_data_size: u32,
    pub string_pool_data_offset: u32,
    pub string_pool_data_size: u32,
}

const _: () = assert!(std::mem::size_of::<OrbHeader>() == OrbHeader::SIZE);

impl OrbHeader {
    pub const SIZE: usize = 116;

    /// Byte offset of the `string_pool_data_size` field, patched after the
    /// string pool is written
    pub const STRING_POOL_SIZE_OFFSET: usize = std::mem::offset_of!(OrbHeader, string_pool_data_size);

    /// Empty header carrying only the magic tag
    pub fn new() -> Self {
        Self {
            magic: ORB_MAGIC,
            ..Self::zeroed()
        }
    }

    /// Write header to bytes (native byte order)
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes.copy_from_slice(bytemuck::bytes_of(self));
        bytes
    }

    /// Read header from bytes
    ///
    /// Returns `None` if the slice is too short or the magic tag is wrong.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let header: Self = bytemuck::pod_read_unaligned(&bytes[..Self::SIZE]);
        if header.magic != ORB_MAGIC {
            return None;
        }
        Some(header)
    }

    /// Store the (offset, count-or-size) pair of a section
    pub fn set_section(&mut self, kind: SectionKind, offset: u32, value: u32) {
        let (o, v) = self.fields_mut(kind);
        *o = offset;
        *v = value;
    }

    /// Location of a section as declared by this header
    pub fn section(&self, kind: SectionKind) -> SectionInfo {
        let (offset, count) = self.fields(kind);
        let byte_size = match kind.record_size() {
            Some(size) => count.saturating_mul(size as u32),
            None => count,
        };
        SectionInfo {
            kind,
            offset,
            count,
            byte_size,
        }
    }

    /// All sections in file order
    pub fn sections(&self) -> [SectionInfo; 14] {
        SectionKind::ALL.map(|kind| self.section(kind))
    }

    fn fields(&self, kind: SectionKind) -> (u32, u32) {
        let mut copy = *self;
        let (o, v) = copy.fields_mut(kind);
        (*o, *v)
    }

    fn fields_mut(&mut self, kind: SectionKind) -> (&mut u32, &mut u32) {
        match kind {
            SectionKind::VertexComponents => (
                &mut self.vertex_component_offset,
                &mut self.num_vertex_components,
            ),
            SectionKind::ValueProps => (&mut self.value_prop_offset, &mut self.num_value_props),
            SectionKind::TextureProps => {
                (&mut self.texture_prop_offset, &mut self.num_texture_props)
            }
            SectionKind::Materials => (&mut self.material_offset, &mut self.num_materials),
            SectionKind::Meshes => (&mut self.mesh_offset, &mut self.num_meshes),
            SectionKind::Bones => (&mut self.bone_offset, &mut self.num_bones),
            SectionKind::Nodes => (&mut self.node_offset, &mut self.num_nodes),
            SectionKind::AnimKeyComponents => (
                &mut self.anim_key_component_offset,
                &mut self.num_anim_key_components,
            ),
            SectionKind::AnimCurves => (&mut self.anim_curve_offset, &mut self.num_anim_curves),
            SectionKind::AnimClips => (&mut self.anim_clip_offset, &mut self.num_anim_clips),
            SectionKind::VertexData => (&mut self.vertex_data_offset, &mut self.vertex_data_size),
            SectionKind::IndexData => (&mut self.index_data_offset, &mut self.index_data_size),
            SectionKind::AnimKeyData => {
                (&mut self.anim_key_data_offset, &mut self.anim_key_data_size)
            }
            SectionKind::StringPool => (
                &mut self.string_pool_data_offset,
                &mut self.string_pool_data_size,
            ),
        }
    }

    /// Calculate total file size declared by the header
    pub fn file_size(&self) -> u64 {
        self.section(SectionKind::StringPool).end()
    }
}
