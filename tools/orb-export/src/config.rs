//! Export configuration (export.toml)
//!
//! Per-attribute vertex format overrides and quantization scales:
//!
//! ```toml
//! [vertex_formats]
//! normal = "byte4n"
//! texcoord0 = "short2"
//!
//! [quantization]
//! texcoord0 = 4096.0
//! ```
//!
//! Every section is optional. An empty config exports vertices in their
//! source formats.

use anyhow::{Context, Result};
use hashbrown::HashMap;
use orb_common::{VertexAttr, VertexFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Destination format per vertex attribute
    #[serde(default)]
    pub vertex_formats: HashMap<VertexAttr, VertexFormat>,
    /// Quantization scale per vertex attribute (unnormalized integer formats)
    #[serde(default)]
    pub quantization: HashMap<VertexAttr, f32>,
}

impl ExportConfig {
    pub fn with_vertex_format(mut self, attr: VertexAttr, format: VertexFormat) -> Self {
        self.vertex_formats.insert(attr, format);
        self
    }

    pub fn with_quantization(mut self, attr: VertexAttr, scale: f32) -> Self {
        self.quantization.insert(attr, scale);
        self
    }

    /// Check overrides before any export runs
    pub fn validate(&self) -> Result<()> {
        for (attr, format) in &self.vertex_formats {
            if !format.is_encodable() {
                anyhow::bail!("Vertex format '{}' for '{}' cannot be written to ORB", format, attr);
            }
        }
        for (attr, scale) in &self.quantization {
            if !scale.is_finite() || *scale <= 0.0 {
                anyhow::bail!("Quantization scale for '{}' must be positive, got {}", attr, scale);
            }
        }
        Ok(())
    }
}

/// Load and parse an export config file
pub fn load_config(path: &Path) -> Result<ExportConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    let config: ExportConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {:?}", path))?;
    config.validate()?;
    Ok(config)
}
