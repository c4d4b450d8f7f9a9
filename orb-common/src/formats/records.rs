//! Fixed-size ORB section records
//!
//! One record type per section. Every field is 4 bytes wide, so the
//! `#[repr(C)]` layout has no padding and a record can be written as its
//! in-memory bytes. Name and path fields are indices into the string pool.
//!
//! # Sizes
//! ```text
//! OrbVertexComponent    8
//! OrbValueProperty     24
//! OrbTextureProperty    8
//! OrbMaterial          24
//! OrbMesh              32
//! OrbBone              48
//! OrbNode              56
//! OrbAnimKeyComponent   4
//! OrbAnimCurve         20
//! OrbAnimClip          16
//! ```

use bytemuck::{Pod, Zeroable};

/// Parent reference stored by root nodes and root bones
pub const ROOT_PARENT: i32 = -1;

/// Vertex layout entry: attribute plus destination format
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbVertexComponent {
    pub attr: u32,
    pub format: u32,
}

/// Material value property (scalar/vector parameter)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbValueProperty {
    pub name: u32,
    /// Number of meaningful floats in `value`
    pub dim: u32,
    pub value: [f32; 4],
}

/// Material texture property
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbTextureProperty {
    pub name: u32,
    pub location: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbMaterial {
    pub name: u32,
    pub shader: u32,
    pub first_value_prop: u32,
    pub num_value_props: u32,
    pub first_texture_prop: u32,
    pub num_texture_props: u32,
}

/// Draw range into the shared vertex/index payloads
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbMesh {
    pub material: u32,
    pub first_vertex: u32,
    pub num_vertices: u32,
    pub first_index: u32,
    pub num_indices: u32,
    /// Bounding box extents
    pub size: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbBone {
    pub name: u32,
    pub parent: i32,
    pub translate: [f32; 3],
    pub rotate: [f32; 4],
    pub scale: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbNode {
    pub name: u32,
    pub parent: i32,
    pub first_mesh: u32,
    pub num_meshes: u32,
    pub translate: [f32; 3],
    pub rotate: [f32; 4],
    pub scale: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbAnimKeyComponent {
    pub key_format: u32,
}

/// Animation curve
///
/// `key_offset` is [`super::STATIC_KEY_OFFSET`] when the curve holds a single
/// static key in `static_key`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbAnimCurve {
    pub key_offset: i32,
    pub static_key: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbAnimClip {
    pub name: u32,
    pub key_duration: f32,
    pub first_curve: u32,
    pub num_curves: u32,
}

macro_rules! record_size {
    ($($ty:ty => $size:expr),* $(,)?) => {
        $(
            impl $ty {
                pub const SIZE: usize = $size;
            }
            const _: () = assert!(std::mem::size_of::<$ty>() == <$ty>::SIZE);
        )*
    };
}

record_size! {
    OrbVertexComponent => 8,
    OrbValueProperty => 24,
    OrbTextureProperty => 8,
    OrbMaterial => 24,
    OrbMesh => 32,
    OrbBone => 48,
    OrbNode => 56,
    OrbAnimKeyComponent => 4,
    OrbAnimCurve => 20,
    OrbAnimClip => 16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_bytes_follow_field_order() {
        let material = OrbMaterial {
            name: 1,
            shader: 2,
            first_value_prop: 3,
            num_value_props: 4,
            first_texture_prop: 5,
            num_texture_props: 6,
        };
        let bytes = bytemuck::bytes_of(&material);
        assert_eq!(bytes.len(), OrbMaterial::SIZE);
        assert_eq!(&bytes[8..12], &3u32.to_ne_bytes());
        assert_eq!(&bytes[20..24], &6u32.to_ne_bytes());
    }

    #[test]
    fn test_node_parent_is_signed() {
        let node = OrbNode {
            parent: ROOT_PARENT,
            ..Default::default()
        };
        let bytes = bytemuck::bytes_of(&node);
        assert_eq!(&bytes[4..8], &(-1i32).to_ne_bytes());
    }
}
