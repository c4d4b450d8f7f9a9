//! Source scene description
//!
//! The in-memory model handed to the exporter: one interleaved float vertex
//! stream, one u16 index stream, materials, a node tree with meshes, a bone
//! list and animation clips. Importers build a [`Scene`]; the exporter only
//! reads it.
//!
//! Scenes also deserialize from JSON, which is what the CLI reads.

use anyhow::{Context, Result};
use orb_common::{KeyType, PropType, VertexAttr, VertexFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One entry of the source vertex layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexComponent {
    pub attr: VertexAttr,
    /// Source format; only its item count matters for the float stream
    pub format: VertexFormat,
}

impl VertexComponent {
    pub fn new(attr: VertexAttr, format: VertexFormat) -> Self {
        Self { attr, format }
    }
}

/// Local transform shared by nodes and bones
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translate: [f32; 3],
    /// Rotation quaternion (x, y, z, w)
    pub rotate: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: [0.0; 3],
            rotate: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub prop_type: PropType,
    #[serde(default)]
    pub value: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureProperty {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub shader: String,
    #[serde(default)]
    pub values: Vec<ValueProperty>,
    #[serde(default)]
    pub textures: Vec<TextureProperty>,
}

/// Draw range into the scene's shared vertex and index streams
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Index into [`Scene::materials`]
    pub material: u32,
    pub first_vertex: u32,
    pub num_vertices: u32,
    #[serde(default)]
    pub first_index: u32,
    #[serde(default)]
    pub num_indices: u32,
    /// Bounding box extents
    #[serde(default)]
    pub size: [f32; 3],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// Index into [`Scene::nodes`], `None` for a root
    #[serde(default)]
    pub parent: Option<u32>,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Index into [`Scene::bones`], `None` for a root
    #[serde(default)]
    pub parent: Option<u32>,
    #[serde(default)]
    pub transform: Transform,
}

/// Key source of one animation curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimCurve {
    /// Single constant key
    Static { value: [f32; 4] },
    /// Keys stored in [`Scene::key_data`] starting at `key_offset`
    Keyed { key_offset: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimClip {
    pub name: String,
    #[serde(default)]
    pub key_duration: f32,
    #[serde(default)]
    pub curves: Vec<AnimCurve>,
}

/// Complete source model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub vertex_components: Vec<VertexComponent>,
    pub vertex_data: Vec<f32>,
    pub index_data: Vec<u16>,
    pub materials: Vec<Material>,
    pub nodes: Vec<Node>,
    pub bones: Vec<Bone>,
    pub key_components: Vec<KeyType>,
    pub anim_clips: Vec<AnimClip>,
    pub key_data: Vec<f32>,
}

impl Scene {
    /// Source vertex stride in floats
    pub fn source_stride(&self) -> usize {
        self.vertex_components
            .iter()
            .map(|c| c.format.num_items())
            .sum()
    }

    pub fn num_value_props(&self) -> usize {
        self.materials.iter().map(|m| m.values.len()).sum()
    }

    pub fn num_texture_props(&self) -> usize {
        self.materials.iter().map(|m| m.textures.len()).sum()
    }

    pub fn num_meshes(&self) -> usize {
        self.nodes.iter().map(|n| n.meshes.len()).sum()
    }

    pub fn num_anim_curves(&self) -> usize {
        self.anim_clips.iter().map(|c| c.curves.len()).sum()
    }

    /// Sum of vertex counts over all meshes
    pub fn num_mesh_vertices(&self) -> u64 {
        self.meshes().map(|m| u64::from(m.num_vertices)).sum()
    }

    /// All meshes in node order
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.nodes.iter().flat_map(|n| n.meshes.iter())
    }
}

/// Load a scene from a JSON file
pub fn load_scene(path: &Path) -> Result<Scene> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene: {:?}", path))?;
    let scene: Scene = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scene: {:?}", path))?;
    Ok(scene)
}
