//! Vertex math for the drawing primitives: bounding boxes, anchored meshes,
//! and the byte layout handed to vertex buffers.
//!
//! Vertex buffers hold tightly packed native-endian `f32` components in the
//! order the attribute bindings declare them (3 per position, 2 per texture
//! coordinate).

use glam::Vec2;

use crate::error::GgError;

/// Floats per vertex position (x, y, z).
pub const POSITION_COMPONENTS: i32 = 3;

/// Floats per texture coordinate (u, v).
pub const TEX_COORD_COMPONENTS: i32 = 2;

/// Texture coordinates of a sprite quad, in triangle-fan order.
pub const QUAD_TEX_COORDS: [f32; 8] = [
    0.0, 0.0, //
    0.0, 1.0, //
    1.0, 1.0, //
    1.0, 0.0,
];

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Computes the bounding box of a polygon.
///
/// # Errors
///
/// Returns `GgError::TooFewVertices` for fewer than three vertices.
pub fn bounding_box(vertices: &[Vec2]) -> Result<Aabb, GgError> {
    if vertices.len() < 3 {
        return Err(GgError::TooFewVertices(vertices.len()));
    }
    let first = vertices[0];
    Ok(vertices.iter().fold(
        Aabb {
            min: first,
            max: first,
        },
        |aabb, &v| Aabb {
            min: aabb.min.min(v),
            max: aabb.max.max(v),
        },
    ))
}

/// Re-expresses `vertices` relative to `anchor` as packed `x, y, 0` triples.
pub fn anchored_mesh(vertices: &[Vec2], anchor: Vec2) -> Vec<f32> {
    vertices
        .iter()
        .flat_map(|&v| {
            let local = v - anchor;
            [local.x, local.y, 0.0]
        })
        .collect()
}

/// Position mesh of a `width` x `height` quad anchored at its top-left
/// corner, in the same fan order as [`QUAD_TEX_COORDS`].
pub fn quad_mesh(width: f32, height: f32) -> [f32; 12] {
    [
        0.0, 0.0, 0.0, //
        0.0, height, 0.0, //
        width, height, 0.0, //
        width, 0.0, 0.0,
    ]
}

/// Views packed floats as the bytes a vertex buffer receives.
pub fn to_bytes(floats: &[f32]) -> &[u8] {
    bytemuck::cast_slice(floats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_of_triangle() {
        let tri = [
            Vec2::new(320.0, 100.0),
            Vec2::new(240.0, 200.0),
            Vec2::new(400.0, 200.0),
        ];
        let aabb = bounding_box(&tri).unwrap();
        assert_eq!(aabb.min, Vec2::new(240.0, 100.0));
        assert_eq!(aabb.max, Vec2::new(400.0, 200.0));
        assert_eq!(aabb.size(), Vec2::new(160.0, 100.0));
    }

    #[test]
    fn bounding_box_rejects_two_vertices() {
        let err = bounding_box(&[Vec2::ZERO, Vec2::ONE]).unwrap_err();
        assert!(matches!(err, GgError::TooFewVertices(2)), "got {err:?}");
    }

    #[test]
    fn bounding_box_rejects_empty_input() {
        assert!(matches!(bounding_box(&[]), Err(GgError::TooFewVertices(0))));
    }

    #[test]
    fn anchored_mesh_subtracts_anchor_and_pads_z() {
        let mesh = anchored_mesh(
            &[Vec2::new(320.0, 100.0), Vec2::new(240.0, 200.0)],
            Vec2::new(240.0, 100.0),
        );
        assert_eq!(mesh, vec![80.0, 0.0, 0.0, 0.0, 100.0, 0.0]);
    }

    #[test]
    fn quad_mesh_spans_width_and_height() {
        assert_eq!(
            quad_mesh(64.0, 32.0),
            [0.0, 0.0, 0.0, 0.0, 32.0, 0.0, 64.0, 32.0, 0.0, 64.0, 0.0, 0.0]
        );
    }

    #[test]
    fn to_bytes_is_native_endian_and_tightly_packed() {
        let floats = [1.0_f32, -2.5];
        let bytes = to_bytes(&floats);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &1.0_f32.to_ne_bytes());
        assert_eq!(&bytes[4..], &(-2.5_f32).to_ne_bytes());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn polygon() -> impl Strategy<Value = Vec<Vec2>> {
            prop::collection::vec((-1.0e4_f32..1.0e4, -1.0e4_f32..1.0e4), 3..32)
                .prop_map(|pts| pts.into_iter().map(|(x, y)| Vec2::new(x, y)).collect())
        }

        proptest! {
            #[test]
            fn min_corner_is_componentwise_minimum(vertices in polygon()) {
                let aabb = bounding_box(&vertices).unwrap();
                let min_x = vertices.iter().map(|v| v.x).fold(f32::INFINITY, f32::min);
                let min_y = vertices.iter().map(|v| v.y).fold(f32::INFINITY, f32::min);
                prop_assert_eq!(aabb.min, Vec2::new(min_x, min_y));
                for v in &vertices {
                    prop_assert!(v.x <= aabb.max.x && v.y <= aabb.max.y);
                }
            }

            #[test]
            fn anchored_mesh_has_no_negative_components(vertices in polygon()) {
                let aabb = bounding_box(&vertices).unwrap();
                let mesh = anchored_mesh(&vertices, aabb.min);
                prop_assert_eq!(mesh.len(), vertices.len() * 3);
                prop_assert!(mesh.iter().all(|&c| c >= 0.0));
            }
        }
    }
}
