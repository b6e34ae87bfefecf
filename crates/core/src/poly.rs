//! Flat-colored convex polygons.

use glam::Vec2;

use crate::backend::Backend;
use crate::consts;
use crate::error::GgError;
use crate::registry::Registered;
use crate::geometry::{self, POSITION_COMPONENTS};
use crate::shader::{COLOR_UNIFORM, MIX_UNIFORM, MODEL_UNIFORM, POSITION_ATTRIBUTE};
use crate::transform::Transform;

/// Default polygon color: opaque black.
pub const DEFAULT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// A convex polygon drawn as a triangle fan in a single color.
///
/// Vertices are given in world space. The polygon's position is anchored at
/// the minimum corner of their bounding box and the geometry is stored
/// relative to it, so moving the polygon never re-uploads vertices.
#[derive(Debug)]
pub struct Poly<B: Backend> {
    transform: Transform,
    program: B::Program,
    vertices: B::Buffer,
    n: i32,
    color: [f32; 4],
}

impl<B: Backend> Poly<B> {
    /// Uploads `vertices` (in triangle-fan order) and anchors the polygon.
    ///
    /// # Panics
    ///
    /// Panics if fewer than three vertices are given; a degenerate polygon
    /// is a programming error.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Resource` if the vertex buffer cannot be created.
    pub fn new(
        backend: Registered<'_, B>,
        program: &B::Program,
        vertices: &[Vec2],
    ) -> Result<Self, GgError> {
        let aabb = match geometry::bounding_box(vertices) {
            Ok(aabb) => aabb,
            Err(e) => panic!("gg: {e}"),
        };
        let n = i32::try_from(vertices.len())
            .map_err(|_| GgError::Resource(format!("polygon with {} vertices", vertices.len())))?;

        let mesh = geometry::anchored_mesh(vertices, aabb.min);
        let buffer = backend.create_buffer()?;
        backend.bind_buffer(consts::ARRAY_BUFFER, Some(&buffer));
        backend.buffer_data(
            consts::ARRAY_BUFFER,
            geometry::to_bytes(&mesh),
            consts::STATIC_DRAW,
        );

        Ok(Self {
            transform: Transform::at(aabb.min),
            program: program.clone(),
            vertices: buffer,
            n,
            color: DEFAULT_COLOR,
        })
    }

    /// Number of vertices in the fan.
    pub fn len(&self) -> usize {
        self.n as usize
    }

    /// Always false: construction rejects fewer than three vertices.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = [r, g, b, a];
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position()
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.transform.set_position(x, y);
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.transform.set_rotation(degrees);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.transform.set_scale(scale);
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.transform.move_by(dx, dy);
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.transform.rotate(degrees);
    }

    pub fn scale_by(&mut self, factor: f32) {
        self.transform.scale_by(factor);
    }

    /// The backend buffer holding the anchored vertices.
    pub fn vertex_buffer(&self) -> &B::Buffer {
        &self.vertices
    }

    /// Issues one triangle-fan draw with the current transform and color.
    ///
    /// # Errors
    ///
    /// Returns `GgError::NotFound` if the program lacks `model`, `mix_value`,
    /// `color` or `vertex_position`. The draw is not issued; callers should
    /// stop rather than render a partial frame.
    pub fn draw(&self, backend: Registered<'_, B>) -> Result<(), GgError> {
        backend.use_program(&self.program);

        let model = backend.get_uniform_location(&self.program, MODEL_UNIFORM)?;
        backend.uniform_matrix4fv(&model, &self.transform.model_matrix().to_cols_array());

        let mix = backend.get_uniform_location(&self.program, MIX_UNIFORM)?;
        backend.uniform1f(&mix, 0.0);

        let color = backend.get_uniform_location(&self.program, COLOR_UNIFORM)?;
        let [r, g, b, a] = self.color;
        backend.uniform4f(&color, r, g, b, a);

        let position = backend.get_attrib_location(&self.program, POSITION_ATTRIBUTE)?;
        backend.enable_vertex_attrib_array(&position);
        backend.bind_buffer(consts::ARRAY_BUFFER, Some(&self.vertices));
        backend.vertex_attrib_pointer(&position, POSITION_COMPONENTS, consts::FLOAT, false, 0, 0);

        log::trace!("gg: draw poly ({} vertices)", self.n);
        backend.draw_arrays(consts::TRIANGLE_FAN, 0, self.n);
        Ok(())
    }

    /// Releases the vertex buffer. The shared program is left alone.
    pub fn destroy(self, backend: Registered<'_, B>) {
        backend.delete_buffer(self.vertices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{Call, RecordingBackend};
    use crate::registry::recording;
    use crate::shader::{compile_program, DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER};

    fn setup() -> (Registered<'static, RecordingBackend>, u32) {
        let backend = recording();
        let program =
            compile_program(backend, DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER).unwrap();
        backend.take_calls();
        (backend, program)
    }

    fn triangle() -> Vec<Vec2> {
        vec![
            Vec2::new(320.0, 100.0),
            Vec2::new(240.0, 200.0),
            Vec2::new(400.0, 200.0),
        ]
    }

    #[test]
    fn new_anchors_at_bounding_box_minimum() {
        let (backend, program) = setup();
        let poly = Poly::new(backend, &program, &triangle()).unwrap();
        assert_eq!(poly.position(), Vec2::new(240.0, 100.0));
        assert_eq!(poly.len(), 3);
        assert!(!poly.is_empty());

        let uploaded = backend.buffer_floats(*poly.vertex_buffer()).unwrap();
        assert_eq!(&uploaded[..3], &[80.0, 0.0, 0.0]);
        assert_eq!(
            uploaded,
            vec![80.0, 0.0, 0.0, 0.0, 100.0, 0.0, 160.0, 100.0, 0.0]
        );
    }

    #[test]
    fn default_color_is_opaque_black() {
        let (backend, program) = setup();
        let mut poly = Poly::new(backend, &program, &triangle()).unwrap();
        assert_eq!(poly.color(), [0.0, 0.0, 0.0, 1.0]);
        poly.set_color(1.0, 0.5, 0.25, 0.75);
        assert_eq!(poly.color(), [1.0, 0.5, 0.25, 0.75]);
    }

    #[test]
    #[should_panic(expected = "can't compute bounding box for 2 vertices")]
    fn new_with_two_vertices_panics() {
        let (backend, program) = setup();
        let _ = Poly::new(backend, &program, &[Vec2::ZERO, Vec2::ONE]);
    }

    #[test]
    fn draw_issues_uniforms_then_triangle_fan() {
        let (backend, program) = setup();
        let mut poly = Poly::new(backend, &program, &triangle()).unwrap();
        poly.set_color(1.0, 0.0, 1.0, 1.0);
        poly.move_by(10.0, 20.0);
        backend.take_calls();

        poly.draw(backend).unwrap();

        let calls = backend.calls();
        assert_eq!(calls[0], Call::UseProgram { program });
        match &calls[1] {
            Call::UniformMatrix4fv { values, .. } => {
                assert_eq!(values[12], 250.0);
                assert_eq!(values[13], 120.0);
            }
            other => panic!("expected model matrix, got {other:?}"),
        }
        assert!(matches!(calls[2], Call::Uniform1f { value, .. } if value == 0.0));
        assert!(matches!(calls[3], Call::Uniform4f { value, .. } if value == [1.0, 0.0, 1.0, 1.0]));
        assert!(matches!(calls[4], Call::EnableVertexAttribArray { .. }));
        assert_eq!(
            calls[5],
            Call::BindBuffer {
                target: consts::ARRAY_BUFFER,
                buffer: Some(*poly.vertex_buffer())
            }
        );
        assert!(matches!(
            calls[6],
            Call::VertexAttribPointer { size: 3, ty: consts::FLOAT, normalized: false, .. }
        ));
        assert_eq!(
            calls.last(),
            Some(&Call::DrawArrays {
                mode: consts::TRIANGLE_FAN,
                first: 0,
                count: 3
            })
        );
    }

    #[test]
    fn draw_fails_without_color_uniform_and_issues_no_draw() {
        let backend = recording();
        let program = compile_program(
            backend,
            DEFAULT_VERTEX_SHADER,
            "uniform float mix_value;\nvoid main() {}\n",
        )
        .unwrap();
        let poly = Poly::new(backend, &program, &triangle()).unwrap();

        let err = poly.draw(backend).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains(COLOR_UNIFORM));
        assert!(!backend
            .calls()
            .iter()
            .any(|c| matches!(c, Call::DrawArrays { .. })));
    }

    #[test]
    fn moving_does_not_reupload_geometry() {
        let (backend, program) = setup();
        let mut poly = Poly::new(backend, &program, &triangle()).unwrap();
        backend.take_calls();
        poly.set_position(0.0, 0.0);
        poly.rotate(45.0);
        poly.scale_by(2.0);
        poly.draw(backend).unwrap();
        assert!(!backend
            .calls()
            .iter()
            .any(|c| matches!(c, Call::BufferData { .. })));
    }

    #[test]
    fn destroy_releases_vertex_buffer() {
        let (backend, program) = setup();
        let poly = Poly::new(backend, &program, &triangle()).unwrap();
        assert_eq!(backend.live_buffers(), 1);
        poly.destroy(backend);
        assert_eq!(backend.live_buffers(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn polygon() -> impl Strategy<Value = Vec<Vec2>> {
            prop::collection::vec((-4096_i32..4096, -4096_i32..4096), 3..24).prop_map(|pts| {
                pts.into_iter()
                    .map(|(x, y)| Vec2::new(x as f32 * 0.25, y as f32 * 0.25))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn uploaded_vertices_plus_position_reconstruct_input(vertices in polygon()) {
                let (backend, program) = setup();
                let poly = Poly::new(backend, &program, &vertices).unwrap();
                let pos = poly.position();
                let uploaded = backend.buffer_floats(*poly.vertex_buffer()).unwrap();
                prop_assert_eq!(uploaded.len(), vertices.len() * 3);
                for (chunk, original) in uploaded.chunks_exact(3).zip(&vertices) {
                    prop_assert_eq!(Vec2::new(chunk[0], chunk[1]) + pos, *original);
                    prop_assert_eq!(chunk[2], 0.0);
                }
            }
        }
    }
}
