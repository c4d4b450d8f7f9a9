//! Per-attribute vertex format mapping
//!
//! Resolves which destination format and quantization scale each vertex
//! attribute is exported with. Attributes without an override keep their
//! source format.

use hashbrown::HashMap;
use orb_common::{VertexAttr, VertexFormat};

use crate::config::ExportConfig;
use crate::scene::VertexComponent;

#[derive(Debug, Clone, Default)]
pub struct VertexFormatMapper {
    formats: HashMap<VertexAttr, VertexFormat>,
    scales: HashMap<VertexAttr, f32>,
}

impl VertexFormatMapper {
    /// Identity mapping with default scales
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            formats: config.vertex_formats.clone(),
            scales: config.quantization.clone(),
        }
    }

    pub fn with_format(mut self, attr: VertexAttr, format: VertexFormat) -> Self {
        self.formats.insert(attr, format);
        self
    }

    pub fn with_scale(mut self, attr: VertexAttr, scale: f32) -> Self {
        self.scales.insert(attr, scale);
        self
    }

    /// Destination format for `attr`, falling back to the source format
    pub fn resolve(&self, attr: VertexAttr, source: VertexFormat) -> VertexFormat {
        self.formats.get(&attr).copied().unwrap_or(source)
    }

    /// Quantization scale for `attr` encoded as `destination`
    pub fn scale(&self, attr: VertexAttr, destination: VertexFormat) -> f32 {
        self.scales
            .get(&attr)
            .copied()
            .unwrap_or_else(|| destination.default_scale())
    }

    /// Destination vertex stride in bytes
    pub fn destination_stride(&self, components: &[VertexComponent]) -> usize {
        components
            .iter()
            .map(|c| self.resolve(c.attr, c.format).byte_size())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passthrough() {
        let mapper = VertexFormatMapper::new();
        for format in VertexFormat::ALL {
            assert_eq!(mapper.resolve(VertexAttr::Normal, format), format);
        }
    }

    #[test]
    fn test_override_wins() {
        let mapper = VertexFormatMapper::new().with_format(VertexAttr::Normal, VertexFormat::Byte4N);
        assert_eq!(
            mapper.resolve(VertexAttr::Normal, VertexFormat::Float3),
            VertexFormat::Byte4N
        );
        assert_eq!(
            mapper.resolve(VertexAttr::Position, VertexFormat::Float3),
            VertexFormat::Float3
        );
        // Same inputs, same answer
        assert_eq!(
            mapper.resolve(VertexAttr::Normal, VertexFormat::Float3),
            VertexFormat::Byte4N
        );
    }

    #[test]
    fn test_scales() {
        let mapper = VertexFormatMapper::new().with_scale(VertexAttr::TexCoord1, 1024.0);
        assert_eq!(mapper.scale(VertexAttr::TexCoord0, VertexFormat::Short2), 8192.0);
        assert_eq!(mapper.scale(VertexAttr::TexCoord1, VertexFormat::Short2), 1024.0);
        assert_eq!(mapper.scale(VertexAttr::Position, VertexFormat::Float3), 1.0);
    }

    #[test]
    fn test_destination_stride() {
        let components = [
            VertexComponent::new(VertexAttr::Position, VertexFormat::Float3),
            VertexComponent::new(VertexAttr::Normal, VertexFormat::Float3),
            VertexComponent::new(VertexAttr::TexCoord0, VertexFormat::Float2),
        ];
        assert_eq!(VertexFormatMapper::new().destination_stride(&components), 32);

        let config = ExportConfig::default()
            .with_vertex_format(VertexAttr::Normal, VertexFormat::Byte4N)
            .with_vertex_format(VertexAttr::TexCoord0, VertexFormat::Short2);
        let mapper = VertexFormatMapper::from_config(&config);
        assert_eq!(mapper.destination_stride(&components), 12 + 4 + 4);
    }
}
