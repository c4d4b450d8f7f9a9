//! Integration tests for orb-export
//!
//! Tests the full pipeline: write scene description -> export -> verify output

use std::path::Path;
use tempfile::tempdir;

use orb_export::formats::{
    BinarySerializable, OrbHeader, OrbMaterial, OrbMesh, OrbNode, SectionKind, ORB_MAGIC,
};
use orb_export::{ExportConfig, Scene, VertexAttr, VertexFormat};

/// Textured quad: position + normal + uv, two triangles, one material
const QUAD_SCENE: &str = r#"{
    "vertex_components": [
        { "attr": "position", "format": "float3" },
        { "attr": "normal", "format": "float3" },
        { "attr": "texcoord0", "format": "float2" }
    ],
    "vertex_data": [
        -1, -1, 0,  0, 0, 1,  0, 0,
         1, -1, 0,  0, 0, 1,  1, 0,
         1,  1, 0,  0, 0, 1,  1, 1,
        -1,  1, 0,  0, 0, 1,  0, 1
    ],
    "index_data": [0, 1, 2, 0, 2, 3],
    "materials": [{
        "name": "quad_mat",
        "shader": "lambert",
        "values": [{ "name": "diffuse_color", "type": "color", "value": [1, 1, 1, 1] }],
        "textures": [{ "name": "diffuse", "location": "tex/quad.png" }]
    }],
    "nodes": [
        { "name": "root" },
        {
            "name": "quad",
            "parent": 0,
            "transform": { "translate": [0, 0, -5] },
            "meshes": [{
                "material": 0,
                "first_vertex": 0,
                "num_vertices": 4,
                "first_index": 0,
                "num_indices": 6,
                "size": [2, 2, 0]
            }]
        }
    ]
}"#;

const QUANTIZED_CONFIG: &str = r#"
[vertex_formats]
normal = "byte4n"
texcoord0 = "short2"

[quantization]
texcoord0 = 4096.0
"#;

fn write_quad_scene(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("quad.json");
    std::fs::write(&path, QUAD_SCENE).expect("Failed to write scene");
    path
}

fn read_records<T: BinarySerializable>(data: &[u8], header: &OrbHeader, kind: SectionKind) -> Vec<T> {
    let section = header.section(kind);
    data[section.offset as usize..section.end() as usize]
        .chunks_exact(T::SIZE)
        .map(|chunk| T::deserialize(chunk).expect("Truncated record"))
        .collect()
}

fn verify_quad(data: &[u8], vertex_stride: u32) -> OrbHeader {
    let header = OrbHeader::from_bytes(data).expect("Invalid ORB header");
    assert_eq!(header.magic, ORB_MAGIC);
    assert_eq!(header.file_size(), data.len() as u64);

    assert_eq!(header.num_vertex_components, 3);
    assert_eq!(header.num_value_props, 1);
    assert_eq!(header.num_texture_props, 1);
    assert_eq!(header.num_materials, 1);
    assert_eq!(header.num_meshes, 1);
    assert_eq!(header.num_nodes, 2);
    assert_eq!(header.vertex_data_size, 4 * vertex_stride);
    assert_eq!(header.index_data_size, 12);

    let sections = header.sections();
    for pair in sections.windows(2) {
        assert_eq!(u64::from(pair[1].offset), pair[0].end());
    }

    let materials: Vec<OrbMaterial> = read_records(data, &header, SectionKind::Materials);
    assert_eq!(materials[0].num_value_props, 1);
    assert_eq!(materials[0].num_texture_props, 1);

    let meshes: Vec<OrbMesh> = read_records(data, &header, SectionKind::Meshes);
    assert_eq!(meshes[0].num_indices, 6);
    assert_eq!(meshes[0].size, [2.0, 2.0, 0.0]);

    let nodes: Vec<OrbNode> = read_records(data, &header, SectionKind::Nodes);
    assert_eq!((nodes[1].first_mesh, nodes[1].num_meshes), (0, 1));
    assert_eq!(nodes[1].parent, 0);
    assert_eq!(nodes[1].translate, [0.0, 0.0, -5.0]);

    let pool = header.section(SectionKind::StringPool);
    let strings = &data[pool.offset as usize..pool.end() as usize];
    assert!(strings.starts_with(b"diffuse_color\0diffuse\0tex/quad.png\0quad_mat\0lambert\0"));
    assert!(strings.ends_with(b"root\0quad\0"));

    header
}

/// Library export with source formats
#[test]
fn test_save_quad() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = orb_export::load_scene(&write_quad_scene(dir.path())).expect("Failed to load scene");
    let out = dir.path().join("quad.orb");

    let summary = orb_export::save(&out, &scene, &ExportConfig::default()).expect("Export failed");
    assert_eq!(summary.num_vertices, 4);

    let data = std::fs::read(&out).expect("Failed to read ORB file");
    let header = verify_quad(&data, 32);
    assert_eq!(header, summary.header);
}

/// Library export with quantized normals and uvs
#[test]
fn test_save_quad_quantized() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = orb_export::load_scene(&write_quad_scene(dir.path())).expect("Failed to load scene");
    let out = dir.path().join("quad.orb");
    let config = ExportConfig::default()
        .with_vertex_format(VertexAttr::Normal, VertexFormat::Byte4N)
        .with_vertex_format(VertexAttr::TexCoord0, VertexFormat::Short2)
        .with_quantization(VertexAttr::TexCoord0, 4096.0);

    orb_export::save(&out, &scene, &config).expect("Export failed");
    let data = std::fs::read(&out).expect("Failed to read ORB file");
    let header = verify_quad(&data, 12 + 4 + 4);

    // Third vertex: position (1, 1, 0), normal (0, 0, 1), uv (1, 1)
    let vertex = header.vertex_data_offset as usize + 2 * 20;
    assert_eq!(&data[vertex + 12..vertex + 16], &[0, 0, 127, 0]);
    let u = i16::from_ne_bytes([data[vertex + 16], data[vertex + 17]]);
    let v = i16::from_ne_bytes([data[vertex + 18], data[vertex + 19]]);
    assert_eq!((u, v), (4096, 4096));
}

/// Invalid scenes fail without creating the output
#[test]
fn test_save_rejects_invalid_scene() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut scene: Scene = serde_json::from_str(QUAD_SCENE).expect("Failed to parse scene");
    scene.nodes[1].meshes[0].num_vertices = 3;
    let out = dir.path().join("bad.orb");

    let err = orb_export::save(&out, &scene, &ExportConfig::default()).unwrap_err();
    assert!(matches!(err, orb_export::OrbError::VertexCountMismatch { .. }));
    assert!(!out.exists());
}

/// CLI export with a config file, default output path
#[test]
fn test_cli_export_with_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene_path = write_quad_scene(dir.path());
    let config_path = dir.path().join("export.toml");
    std::fs::write(&config_path, QUANTIZED_CONFIG).expect("Failed to write config");

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_orb-export"))
        .args([
            "export",
            scene_path.to_str().unwrap(),
            "-c",
            config_path.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run orb-export");
    assert!(status.success(), "orb-export export command failed");

    let out = dir.path().join("quad.orb");
    assert!(out.exists(), "ORB file should exist");
    let data = std::fs::read(&out).expect("Failed to read ORB file");
    verify_quad(&data, 20);
}

/// CLI info on an exported file
#[test]
fn test_cli_info() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene_path = write_quad_scene(dir.path());
    let out = dir.path().join("model.orb");

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_orb-export"))
        .args([
            "export",
            scene_path.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run orb-export");
    assert!(status.success(), "orb-export export command failed");

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_orb-export"))
        .args(["info", out.to_str().unwrap()])
        .output()
        .expect("Failed to run orb-export");
    assert!(output.status.success(), "orb-export info command failed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("string pool"));
    assert!(stdout.contains("vertex data"));
}

/// CLI fails on a malformed scene
#[test]
fn test_cli_rejects_bad_scene() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene_path = dir.path().join("bad.json");
    std::fs::write(&scene_path, r#"{ "vertex_components": [{ "attr": "position" }] }"#)
        .expect("Failed to write scene");

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_orb-export"))
        .args(["export", scene_path.to_str().unwrap()])
        .status()
        .expect("Failed to run orb-export");
    assert!(!status.success());
    assert!(!dir.path().join("bad.orb").exists());
}
