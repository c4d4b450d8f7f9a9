//! Binary serialization trait for ORB header and section records.
//!
//! The header and every section record implement `BinarySerializable` so
//! writers and inspection tools can handle them uniformly. Records are plain
//! old data, so their serialized form is their in-memory bytes.

use bytemuck::Pod;

use super::{
    OrbAnimClip, OrbAnimCurve, OrbAnimKeyComponent, OrbBone, OrbHeader, OrbMaterial, OrbMesh,
    OrbNode, OrbTextureProperty, OrbValueProperty, OrbVertexComponent,
};

/// Trait for binary-serializable ORB structures.
///
/// The trait uses `Vec<u8>` for the return type because associated const
/// generics in return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
/// For the header, [`OrbHeader::to_bytes`] returns a fixed-size array.
///
/// # Example
///
/// ```
/// use orb_common::formats::{BinarySerializable, OrbMesh};
///
/// let mesh = OrbMesh { num_vertices: 24, ..Default::default() };
/// let bytes = mesh.serialize();
/// let parsed = OrbMesh::deserialize(&bytes).unwrap();
/// assert_eq!(parsed.num_vertices, 24);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized structure in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or contains invalid data.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for OrbHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

fn read_record<T: Pod>(bytes: &[u8]) -> Option<T> {
    let size = std::mem::size_of::<T>();
    if bytes.len() < size {
        return None;
    }
    Some(bytemuck::pod_read_unaligned(&bytes[..size]))
}

macro_rules! impl_record_serializable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BinarySerializable for $ty {
                const SIZE: usize = <$ty>::SIZE;

                fn serialize(&self) -> Vec<u8> {
                    bytemuck::bytes_of(self).to_vec()
                }

                fn deserialize(bytes: &[u8]) -> Option<Self> {
                    read_record(bytes)
                }
            }
        )*
    };
}

impl_record_serializable!(
    OrbVertexComponent,
    OrbValueProperty,
    OrbTextureProperty,
    OrbMaterial,
    OrbMesh,
    OrbBone,
    OrbNode,
    OrbAnimKeyComponent,
    OrbAnimCurve,
    OrbAnimClip,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_property_trait() {
        let prop = OrbValueProperty {
            name: 7,
            dim: 3,
            value: [0.25, 0.5, 0.75, 0.0],
        };
        let bytes = prop.serialize();
        assert_eq!(bytes.len(), 24);

        let parsed = OrbValueProperty::deserialize(&bytes).unwrap();
        assert_eq!(parsed, prop);
    }

    #[test]
    fn test_deserialize_insufficient_bytes() {
        assert!(OrbHeader::deserialize(&[0; 115]).is_none());
        assert!(OrbMesh::deserialize(&[0; 31]).is_none());
        assert!(OrbNode::deserialize(&[0; 55]).is_none());
        assert!(OrbAnimKeyComponent::deserialize(&[0; 3]).is_none());
    }

    /// Demonstrates generic function using the trait
    fn record_size<T: BinarySerializable>() -> usize {
        T::SIZE
    }

    #[test]
    fn test_generic_usage() {
        assert_eq!(record_size::<OrbHeader>(), 116);
        assert_eq!(record_size::<OrbVertexComponent>(), 8);
        assert_eq!(record_size::<OrbBone>(), 48);
        assert_eq!(record_size::<OrbAnimCurve>(), 20);
        assert_eq!(record_size::<OrbAnimClip>(), 16);
    }
}
