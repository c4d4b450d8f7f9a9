//! Animation key formats
//!
//! Each animation channel declares the shape of its keys with a [`KeyType`].
//! Curves reference either a run of keys in the shared key-data stream or
//! carry one static key inline (see [`super::OrbAnimCurve`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key offset stored by curves that carry a static key instead of keyed data
pub const STATIC_KEY_OFFSET: i32 = -1;

/// Shape of a single animation key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Float,
    Float2,
    Float3,
    Float4,
    Quaternion,
}

impl KeyType {
    pub const ALL: [KeyType; 5] = [
        KeyType::Float,
        KeyType::Float2,
        KeyType::Float3,
        KeyType::Float4,
        KeyType::Quaternion,
    ];

    /// On-disk key format code
    pub const fn orb_code(self) -> u32 {
        match self {
            KeyType::Float => 0,
            KeyType::Float2 => 1,
            KeyType::Float3 => 2,
            KeyType::Float4 => 3,
            KeyType::Quaternion => 4,
        }
    }

    pub fn from_orb_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.orb_code() == code)
    }

    /// Number of floats in one key
    pub const fn num_floats(self) -> usize {
        match self {
            KeyType::Float => 1,
            KeyType::Float2 => 2,
            KeyType::Float3 => 3,
            KeyType::Float4 | KeyType::Quaternion => 4,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyType::Float => "float",
            KeyType::Float2 => "float2",
            KeyType::Float3 => "float3",
            KeyType::Float4 => "float4",
            KeyType::Quaternion => "quaternion",
        };
        f.write_str(name)
    }
}
