//! Layout planning
//!
//! Computes the offset and size of every section before anything is written.
//! Sections follow [`SectionKind::ALL`]; each starts where the previous one
//! ends, the first right after the header. The string pool size is unknown at
//! this point and planned as 0.
//!
//! Planning also validates the scene, so an invalid scene never creates or
//! touches an output file.

use orb_common::{OrbHeader, SectionInfo, SectionKind, ENCODE_SCRATCH_CAPACITY};

use crate::error::{OrbError, Result};
use crate::scene::{AnimCurve, Scene};
use crate::vertex_format::VertexFormatMapper;

/// Round a byte count up to a 4-byte boundary
#[inline]
pub fn round_up4(value: u64) -> u64 {
    (value + 3) & !3
}

/// Precomputed file layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    /// Header as first written (string pool size still 0)
    pub header: OrbHeader,
    pub num_vertices: usize,
    /// Source vertex stride in floats
    pub source_stride: usize,
    /// Destination vertex stride in bytes
    pub destination_stride: usize,
}

impl LayoutPlan {
    pub fn new(scene: &Scene, mapper: &VertexFormatMapper) -> Result<Self> {
        let source_stride = scene.source_stride();
        let num_vertices = vertex_count(scene, source_stride)?;
        let destination_stride = mapper.destination_stride(&scene.vertex_components);

        check_vertex_formats(scene, mapper, destination_stride)?;
        check_meshes(scene, num_vertices)?;
        check_references(scene)?;
        check_strings(scene)?;

        let mut header = OrbHeader::new();
        let mut offset = OrbHeader::SIZE as u64;
        for kind in SectionKind::ALL {
            let (value, byte_size) = match kind.record_size() {
                Some(record_size) => {
                    let count = record_count(scene, kind) as u64;
                    (count, count * record_size as u64)
                }
                None => {
                    let size = payload_size(scene, kind, num_vertices, destination_stride);
                    (size, size)
                }
            };
            header.set_section(kind, to_u32(offset, kind.name())?, to_u32(value, kind.name())?);
            offset += byte_size;
        }

        Ok(Self {
            header,
            num_vertices,
            source_stride,
            destination_stride,
        })
    }

    pub fn section(&self, kind: SectionKind) -> SectionInfo {
        self.header.section(kind)
    }
}

fn to_u32(value: u64, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| OrbError::LayoutOverflow { what })
}

fn record_count(scene: &Scene, kind: SectionKind) -> usize {
    match kind {
        SectionKind::VertexComponents => scene.vertex_components.len(),
        SectionKind::ValueProps => scene.num_value_props(),
        SectionKind::TextureProps => scene.num_texture_props(),
        SectionKind::Materials => scene.materials.len(),
        SectionKind::Meshes => scene.num_meshes(),
        SectionKind::Bones => scene.bones.len(),
        SectionKind::Nodes => scene.nodes.len(),
        SectionKind::AnimKeyComponents => scene.key_components.len(),
        SectionKind::AnimCurves => scene.num_anim_curves(),
        SectionKind::AnimClips => scene.anim_clips.len(),
        SectionKind::VertexData
        | SectionKind::IndexData
        | SectionKind::AnimKeyData
        | SectionKind::StringPool => 0,
    }
}

fn payload_size(
    scene: &Scene,
    kind: SectionKind,
    num_vertices: usize,
    destination_stride: usize,
) -> u64 {
    match kind {
        SectionKind::VertexData => num_vertices as u64 * destination_stride as u64,
        SectionKind::IndexData => round_up4(scene.index_data.len() as u64 * 2),
        SectionKind::AnimKeyData => scene.key_data.len() as u64 * 4,
        // Patched once the pool has been written
        SectionKind::StringPool => 0,
        SectionKind::VertexComponents
        | SectionKind::ValueProps
        | SectionKind::TextureProps
        | SectionKind::Materials
        | SectionKind::Meshes
        | SectionKind::Bones
        | SectionKind::Nodes
        | SectionKind::AnimKeyComponents
        | SectionKind::AnimCurves
        | SectionKind::AnimClips => 0,
    }
}

fn vertex_count(scene: &Scene, source_stride: usize) -> Result<usize> {
    let floats = scene.vertex_data.len();
    if source_stride == 0 {
        if floats != 0 {
            return Err(OrbError::VertexDataLength {
                floats,
                stride: source_stride,
            });
        }
        return Ok(0);
    }
    if floats % source_stride != 0 {
        return Err(OrbError::VertexDataLength {
            floats,
            stride: source_stride,
        });
    }
    Ok(floats / source_stride)
}

fn check_vertex_formats(
    scene: &Scene,
    mapper: &VertexFormatMapper,
    destination_stride: usize,
) -> Result<()> {
    for component in &scene.vertex_components {
        let format = mapper.resolve(component.attr, component.format);
        if !format.is_encodable() {
            return Err(OrbError::UnsupportedVertexFormat {
                attr: component.attr,
                format,
            });
        }
        if format.is_scaled() {
            let scale = mapper.scale(component.attr, format);
            if !scale.is_finite() || scale <= 0.0 {
                return Err(OrbError::InvalidScale {
                    attr: component.attr,
                    format,
                    scale,
                });
            }
        }
        if format.num_items() < component.format.num_items() {
            tracing::warn!(
                "Vertex attribute '{}' narrows from {} to {}, extra components are dropped",
                component.attr,
                component.format,
                format
            );
        }
    }
    if destination_stride > ENCODE_SCRATCH_CAPACITY {
        return Err(OrbError::StrideTooLarge {
            stride: destination_stride,
            capacity: ENCODE_SCRATCH_CAPACITY,
        });
    }
    Ok(())
}

fn check_meshes(scene: &Scene, num_vertices: usize) -> Result<()> {
    // A scene without meshes may still carry raw vertex data
    if scene.num_meshes() > 0 {
        let mesh_vertices = scene.num_mesh_vertices();
        if mesh_vertices != num_vertices as u64 {
            return Err(OrbError::VertexCountMismatch {
                mesh_vertices,
                vertices: num_vertices,
            });
        }
    }

    let num_indices = scene.index_data.len();
    for (i, mesh) in scene.meshes().enumerate() {
        let vertex_end = u64::from(mesh.first_vertex) + u64::from(mesh.num_vertices);
        if vertex_end > num_vertices as u64 {
            return Err(OrbError::MeshRangeOutOfBounds {
                mesh: i,
                range: "vertex",
                first: mesh.first_vertex,
                end: vertex_end,
                available: num_vertices,
            });
        }
        let index_end = u64::from(mesh.first_index) + u64::from(mesh.num_indices);
        if index_end > num_indices as u64 {
            return Err(OrbError::MeshRangeOutOfBounds {
                mesh: i,
                range: "index",
                first: mesh.first_index,
                end: index_end,
                available: num_indices,
            });
        }
        if mesh.material as usize >= scene.materials.len() {
            return Err(OrbError::InvalidReference {
                owner: "mesh",
                index: i,
                target: "material",
                reference: mesh.material,
                count: scene.materials.len(),
            });
        }
    }
    Ok(())
}

fn check_references(scene: &Scene) -> Result<()> {
    let parents = |owner: &'static str, parents: Vec<Option<u32>>| -> Result<()> {
        let count = parents.len();
        for (index, parent) in parents.into_iter().enumerate() {
            if let Some(parent) = parent {
                if parent as usize >= count || parent > i32::MAX as u32 {
                    return Err(OrbError::InvalidReference {
                        owner,
                        index,
                        target: owner,
                        reference: parent,
                        count,
                    });
                }
            }
        }
        Ok(())
    };
    parents("node", scene.nodes.iter().map(|n| n.parent).collect())?;
    parents("bone", scene.bones.iter().map(|b| b.parent).collect())?;

    // Curve `i` of a clip reads keys of format `key_components[i]`
    let num_keys = scene.key_data.len();
    let mut index = 0;
    for clip in &scene.anim_clips {
        for (i, curve) in clip.curves.iter().enumerate() {
            if let AnimCurve::Keyed { key_offset } = *curve {
                let arity = scene.key_components.get(i).map_or(1, |k| k.num_floats());
                if u64::from(key_offset) + arity as u64 > num_keys as u64 {
                    return Err(OrbError::InvalidReference {
                        owner: "anim curve",
                        index,
                        target: "anim key",
                        reference: key_offset,
                        count: num_keys,
                    });
                }
            }
            index += 1;
        }
    }
    Ok(())
}

/// Names and paths must be representable as NUL-terminated pool entries
fn check_strings(scene: &Scene) -> Result<()> {
    let check = |owner: &'static str, index: usize, text: &str| -> Result<()> {
        if text.contains('\0') {
            return Err(OrbError::InteriorNul {
                owner,
                index,
                text: text.to_owned(),
            });
        }
        Ok(())
    };
    for (i, material) in scene.materials.iter().enumerate() {
        for prop in &material.values {
            check("material", i, &prop.name)?;
        }
        for tex in &material.textures {
            check("material", i, &tex.name)?;
            check("material", i, &tex.location)?;
        }
        check("material", i, &material.name)?;
        check("material", i, &material.shader)?;
    }
    for (i, bone) in scene.bones.iter().enumerate() {
        check("bone", i, &bone.name)?;
    }
    for (i, node) in scene.nodes.iter().enumerate() {
        check("node", i, &node.name)?;
    }
    for (i, clip) in scene.anim_clips.iter().enumerate() {
        check("anim clip", i, &clip.name)?;
    }
    Ok(())
}
