//! orb-export library
//!
//! Serializes scene descriptions (vertex/index streams, materials, node tree,
//! bones, animation clips) into a single binary `.orb` file.

pub mod config;
pub mod error;
pub mod formats;
pub mod info;
pub mod layout;
pub mod saver;
pub mod scene;
pub mod strings;
pub mod vertex_format;

// Re-export codec and format identifiers from orb-common
pub use orb_common::{encode, EncodeScratch, KeyType, PropType, VertexAttr, VertexFormat, ORB_EXT};

pub use config::{load_config, ExportConfig};
pub use error::{OrbError, Result};
pub use layout::LayoutPlan;
pub use saver::{save, ExportSummary, OrbSaver};
pub use scene::{load_scene, Scene};
pub use strings::StringPool;
pub use vertex_format::VertexFormatMapper;
