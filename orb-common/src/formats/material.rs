//! Material value property types

use serde::{Deserialize, Serialize};

/// Semantic type of a material value property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    Float,
    Float2,
    Float3,
    Float4,
    /// RGBA color
    Color,
    /// Stored as a single float (0.0 or 1.0)
    Bool,
}

impl PropType {
    /// Number of meaningful floats in the property's 4-float value slot
    pub const fn num_floats(self) -> u32 {
        match self {
            PropType::Float | PropType::Bool => 1,
            PropType::Float2 => 2,
            PropType::Float3 => 3,
            PropType::Float4 | PropType::Color => 4,
        }
    }
}
