//! ORB writer
//!
//! Writes a [`Scene`] as a single ORB file: header, ten record arrays, vertex
//! data, index data, anim key data and the string pool, in that order. The
//! layout is planned up front ([`LayoutPlan`]); every section write is checked
//! against its planned offset. The string pool size is only known after the
//! pool has been written and is patched into the header at the end.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use orb_common::{encode, EncodeScratch, STATIC_KEY_OFFSET};

use crate::config::ExportConfig;
use crate::error::{OrbError, Result};
use crate::formats::*;
use crate::layout::LayoutPlan;
use crate::scene::{AnimCurve, Scene, Transform};
use crate::strings::StringPool;
use crate::vertex_format::VertexFormatMapper;

/// Result of a successful export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Final header, string pool size included
    pub header: OrbHeader,
    pub file_size: u64,
    pub num_vertices: usize,
    pub string_pool_size: u32,
}

/// Record arrays of one scene, in section order
#[derive(Debug, Default)]
struct SceneRecords {
    vertex_components: Vec<OrbVertexComponent>,
    value_props: Vec<OrbValueProperty>,
    texture_props: Vec<OrbTextureProperty>,
    materials: Vec<OrbMaterial>,
    meshes: Vec<OrbMesh>,
    bones: Vec<OrbBone>,
    nodes: Vec<OrbNode>,
    key_components: Vec<OrbAnimKeyComponent>,
    curves: Vec<OrbAnimCurve>,
    clips: Vec<OrbAnimClip>,
}

impl SceneRecords {
    fn build(scene: &Scene, mapper: &VertexFormatMapper, pool: &mut StringPool) -> Result<Self> {
        let mut records = Self {
            vertex_components: scene
                .vertex_components
                .iter()
                .map(|c| OrbVertexComponent {
                    attr: c.attr.orb_code(),
                    format: mapper.resolve(c.attr, c.format).orb_code(),
                })
                .collect(),
            key_components: scene
                .key_components
                .iter()
                .map(|k| OrbAnimKeyComponent {
                    key_format: k.orb_code(),
                })
                .collect(),
            ..Default::default()
        };

        // Materials with their value and texture properties
        for material in &scene.materials {
            let first_value_prop = index_u32(records.value_props.len(), "value properties")?;
            let first_texture_prop = index_u32(records.texture_props.len(), "texture properties")?;
            for prop in &material.values {
                records.value_props.push(OrbValueProperty {
                    name: pool.intern(&prop.name),
                    dim: prop.prop_type.num_floats(),
                    value: prop.value,
                });
            }
            for tex in &material.textures {
                let name = pool.intern(&tex.name);
                let location = pool.intern(&tex.location);
                records.texture_props.push(OrbTextureProperty { name, location });
            }
            let name = pool.intern(&material.name);
            let shader = pool.intern(&material.shader);
            records.materials.push(OrbMaterial {
                name,
                shader,
                first_value_prop,
                num_value_props: index_u32(material.values.len(), "value properties")?,
                first_texture_prop,
                num_texture_props: index_u32(material.textures.len(), "texture properties")?,
            });
        }

        for bone in &scene.bones {
            let Transform { translate, rotate, scale } = bone.transform;
            records.bones.push(OrbBone {
                name: pool.intern(&bone.name),
                parent: parent_index(bone.parent),
                translate,
                rotate,
                scale,
            });
        }

        // Nodes with their meshes
        for node in &scene.nodes {
            let first_mesh = index_u32(records.meshes.len(), "meshes")?;
            records.meshes.extend(node.meshes.iter().map(|m| OrbMesh {
                material: m.material,
                first_vertex: m.first_vertex,
                num_vertices: m.num_vertices,
                first_index: m.first_index,
                num_indices: m.num_indices,
                size: m.size,
            }));
            let Transform { translate, rotate, scale } = node.transform;
            records.nodes.push(OrbNode {
                name: pool.intern(&node.name),
                parent: parent_index(node.parent),
                first_mesh,
                num_meshes: index_u32(node.meshes.len(), "meshes")?,
                translate,
                rotate,
                scale,
            });
        }

        // Clips with their curves
        for clip in &scene.anim_clips {
            let first_curve = index_u32(records.curves.len(), "anim curves")?;
            for curve in &clip.curves {
                records.curves.push(match *curve {
                    AnimCurve::Static { value } => OrbAnimCurve {
                        key_offset: STATIC_KEY_OFFSET,
                        static_key: value,
                    },
                    AnimCurve::Keyed { key_offset } => OrbAnimCurve {
                        key_offset: i32::try_from(key_offset)
                            .map_err(|_| OrbError::LayoutOverflow { what: "anim key offset" })?,
                        static_key: [0.0; 4],
                    },
                });
            }
            records.clips.push(OrbAnimClip {
                name: pool.intern(&clip.name),
                key_duration: clip.key_duration,
                first_curve,
                num_curves: index_u32(clip.curves.len(), "anim curves")?,
            });
        }

        Ok(records)
    }
}

fn index_u32(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| OrbError::LayoutOverflow { what })
}

/// Parents are validated by the planner, so they fit in an i32
fn parent_index(parent: Option<u32>) -> i32 {
    parent.map_or(ROOT_PARENT, |p| p as i32)
}

/// Writes scenes as ORB files
#[derive(Debug, Clone, Default)]
pub struct OrbSaver {
    mapper: VertexFormatMapper,
}

impl OrbSaver {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            mapper: VertexFormatMapper::from_config(config),
        }
    }

    pub fn with_mapper(mapper: VertexFormatMapper) -> Self {
        Self { mapper }
    }

    /// Validate `scene` and compute its file layout
    pub fn plan(&self, scene: &Scene) -> Result<LayoutPlan> {
        LayoutPlan::new(scene, &self.mapper)
    }

    /// Plan and write `scene` to `w`
    ///
    /// Returns the final header. On error the output is incomplete and must be
    /// discarded.
    pub fn write<W: Write + Seek>(&self, w: &mut W, scene: &Scene) -> Result<OrbHeader> {
        let plan = self.plan(scene)?;
        self.write_planned(w, scene, &plan)
    }

    /// Write `scene` with a layout from [`OrbSaver::plan`]
    ///
    /// Offsets are relative to the writer's position on entry.
    pub fn write_planned<W: Write + Seek>(
        &self,
        w: &mut W,
        scene: &Scene,
        plan: &LayoutPlan,
    ) -> Result<OrbHeader> {
        let base = w.stream_position()?;
        let mut pool = StringPool::new();
        let records = SceneRecords::build(scene, &self.mapper, &mut pool)?;

        let mut header = plan.header;
        w.write_all(&header.to_bytes())?;

        let mut out = SectionWriter { w, base, plan };
        out.records(SectionKind::VertexComponents, &records.vertex_components)?;
        out.records(SectionKind::ValueProps, &records.value_props)?;
        out.records(SectionKind::TextureProps, &records.texture_props)?;
        out.records(SectionKind::Materials, &records.materials)?;
        out.records(SectionKind::Meshes, &records.meshes)?;
        out.records(SectionKind::Bones, &records.bones)?;
        out.records(SectionKind::Nodes, &records.nodes)?;
        out.records(SectionKind::AnimKeyComponents, &records.key_components)?;
        out.records(SectionKind::AnimCurves, &records.curves)?;
        out.records(SectionKind::AnimClips, &records.clips)?;
        out.vertex_data(scene, &self.mapper)?;
        out.index_data(&scene.index_data)?;
        out.anim_key_data()?;
        header.string_pool_data_size = out.string_pool(&pool)?;

        Ok(header)
    }
}

struct SectionWriter<'a, W> {
    w: &'a mut W,
    base: u64,
    plan: &'a LayoutPlan,
}

impl<W: Write + Seek> SectionWriter<'_, W> {
    /// Check the write cursor against the planned section offset
    fn begin(&mut self, kind: SectionKind) -> Result<SectionInfo> {
        let section = self.plan.section(kind);
        let expected = u64::from(section.offset);
        let actual = self.w.stream_position()? - self.base;
        if actual != expected {
            return Err(OrbError::OffsetMismatch {
                section: kind,
                expected,
                actual,
            });
        }
        tracing::debug!(
            "Writing {} at offset {} ({} bytes)",
            kind,
            section.offset,
            section.byte_size
        );
        Ok(section)
    }

    fn records<T: bytemuck::Pod>(&mut self, kind: SectionKind, records: &[T]) -> Result<()> {
        self.begin(kind)?;
        write_records(self.w, records)?;
        Ok(())
    }

    fn vertex_data(&mut self, scene: &Scene, mapper: &VertexFormatMapper) -> Result<()> {
        let section = self.begin(SectionKind::VertexData)?;

        let components: Vec<_> = scene
            .vertex_components
            .iter()
            .map(|c| {
                let format = mapper.resolve(c.attr, c.format);
                (c.format.num_items(), format, mapper.scale(c.attr, format))
            })
            .collect();

        let src = &scene.vertex_data;
        let mut scratch = EncodeScratch::new();
        let mut cursor = 0usize;
        let mut encoded = 0u64;
        for _ in 0..self.plan.num_vertices {
            scratch.clear();
            for &(items, format, scale) in &components {
                let end = (cursor + items).min(src.len());
                encode(format, scale, &src[cursor.min(end)..end], &mut scratch)?;
                cursor += items;
            }
            self.w.write_all(scratch.as_bytes())?;
            encoded += scratch.len() as u64;
        }

        if cursor != src.len() {
            return Err(OrbError::SourceLengthMismatch {
                consumed: cursor,
                available: src.len(),
            });
        }
        if encoded != u64::from(section.byte_size) {
            return Err(OrbError::EncodedLengthMismatch {
                section: SectionKind::VertexData,
                encoded,
                planned: u64::from(section.byte_size),
            });
        }
        Ok(())
    }

    fn index_data(&mut self, indices: &[u16]) -> Result<()> {
        let section = self.begin(SectionKind::IndexData)?;
        let raw = indices.len() as u64 * 2;
        let planned = u64::from(section.byte_size);
        let padding = match planned.checked_sub(raw) {
            Some(padding) if padding < 4 => padding as usize,
            _ => {
                return Err(OrbError::EncodedLengthMismatch {
                    section: SectionKind::IndexData,
                    encoded: raw,
                    planned,
                });
            }
        };
        write_records(self.w, indices)?;
        self.w.write_all(&[0u8; 3][..padding])?;
        Ok(())
    }

    fn anim_key_data(&mut self) -> Result<()> {
        let section = self.begin(SectionKind::AnimKeyData)?;
        if section.byte_size > 0 {
            return Err(OrbError::AnimKeysUnsupported {
                size: section.byte_size,
            });
        }
        Ok(())
    }

    /// Write the pool and patch its size into the header
    fn string_pool(&mut self, pool: &StringPool) -> Result<u32> {
        self.begin(SectionKind::StringPool)?;
        let start = self.w.stream_position()?;
        pool.write_to(self.w)?;
        let written = self.w.stream_position()? - start;
        let expected = pool.byte_len();
        if written != expected {
            return Err(OrbError::StringPoolSizeMismatch { written, expected });
        }
        let size = index_u32(written as usize, "string pool")?;

        self.w
            .seek(SeekFrom::Start(self.base + OrbHeader::STRING_POOL_SIZE_OFFSET as u64))?;
        self.w.write_all(&size.to_ne_bytes())?;
        self.w.seek(SeekFrom::End(0))?;
        Ok(size)
    }
}

/// Export `scene` to an ORB file at `path`
///
/// The scene is validated before the file is created. A file left behind by
/// a failed write is incomplete.
pub fn save(path: &Path, scene: &Scene, config: &ExportConfig) -> Result<ExportSummary> {
    let saver = OrbSaver::new(config);
    let plan = saver.plan(scene)?;

    let file = File::create(path).map_err(|source| OrbError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut w = BufWriter::new(file);
    let header = saver.write_planned(&mut w, scene, &plan)?;
    w.flush()?;

    let summary = ExportSummary {
        header,
        file_size: header.file_size(),
        num_vertices: plan.num_vertices,
        string_pool_size: header.string_pool_data_size,
    };
    tracing::info!(
        "Wrote {:?}: {} bytes, {} vertices, {} string bytes",
        path,
        summary.file_size,
        summary.num_vertices,
        summary.string_pool_size
    );
    Ok(summary)
}
