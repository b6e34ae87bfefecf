//! Textured quads.

use std::rc::Rc;

use glam::Vec2;

use crate::backend::Backend;
use crate::consts;
use crate::error::GgError;
use crate::registry::Registered;
use crate::geometry::{self, POSITION_COMPONENTS, QUAD_TEX_COORDS, TEX_COORD_COMPONENTS};
use crate::shader::{
    MIX_UNIFORM, MODEL_UNIFORM, POSITION_ATTRIBUTE, TEXTURE_UNIFORM, TEX_COORD_ATTRIBUTE,
};
use crate::texture::Texture;
use crate::transform::Transform;

/// A texture drawn on a quad the size of the texture.
///
/// The texture is shared: any number of sprites may draw the same
/// [`Texture`], and none of them mutates it.
#[derive(Debug)]
pub struct Sprite<B: Backend> {
    transform: Transform,
    program: B::Program,
    positions: B::Buffer,
    tex_coords: B::Buffer,
    texture: Rc<Texture<B>>,
    width: f32,
    height: f32,
}

impl<B: Backend> Sprite<B> {
    /// Builds the quad for `texture` at the origin.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Resource` if a vertex buffer cannot be created.
    pub fn new(
        backend: Registered<'_, B>,
        program: &B::Program,
        texture: Rc<Texture<B>>,
    ) -> Result<Self, GgError> {
        let width = texture.width() as f32;
        let height = texture.height() as f32;

        let positions = upload(backend, &geometry::quad_mesh(width, height))?;
        let tex_coords = match upload(backend, &QUAD_TEX_COORDS) {
            Ok(buffer) => buffer,
            Err(e) => {
                backend.delete_buffer(positions);
                return Err(e);
            }
        };

        Ok(Self {
            transform: Transform::default(),
            program: program.clone(),
            positions,
            tex_coords,
            texture,
            width,
            height,
        })
    }

    /// Quad width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Quad height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn texture(&self) -> &Rc<Texture<B>> {
        &self.texture
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

    /// Buffer holding the quad's corner positions.
    pub fn position_buffer(&self) -> &B::Buffer {
        &self.positions
    }

    /// Buffer holding the quad's texture coordinates.
    pub fn tex_coord_buffer(&self) -> &B::Buffer {
        &self.tex_coords
    }

    /// Draws the quad with the texture bound to unit 0.
    ///
    /// # Errors
    ///
    /// Returns `GgError::NotFound` if the program lacks any of `model`,
    /// `tex_loc`, `mix_value`, `vertex_position` or `vertex_texture`; the
    /// draw is not issued.
    pub fn draw(&self, backend: Registered<'_, B>) -> Result<(), GgError> {
        backend.use_program(&self.program);

        let model = backend.get_uniform_location(&self.program, MODEL_UNIFORM)?;
        backend.uniform_matrix4fv(&model, &self.transform.model_matrix().to_cols_array());

        backend.active_texture(consts::TEXTURE0);
        backend.bind_texture(consts::TEXTURE_2D, Some(self.texture.handle()));
        let sampler = backend.get_uniform_location(&self.program, TEXTURE_UNIFORM)?;
        backend.uniform1i(&sampler, 0);

        let mix = backend.get_uniform_location(&self.program, MIX_UNIFORM)?;
        backend.uniform1f(&mix, 1.0);

        let position = backend.get_attrib_location(&self.program, POSITION_ATTRIBUTE)?;
        backend.enable_vertex_attrib_array(&position);
        backend.bind_buffer(consts::ARRAY_BUFFER, Some(&self.positions));
        backend.vertex_attrib_pointer(&position, POSITION_COMPONENTS, consts::FLOAT, false, 0, 0);

        let tex_coord = backend.get_attrib_location(&self.program, TEX_COORD_ATTRIBUTE)?;
        backend.enable_vertex_attrib_array(&tex_coord);
        backend.bind_buffer(consts::ARRAY_BUFFER, Some(&self.tex_coords));
        backend.vertex_attrib_pointer(
            &tex_coord,
            TEX_COORD_COMPONENTS,
            consts::FLOAT,
            false,
            0,
            0,
        );

        log::trace!("gg: draw sprite {}x{}", self.width, self.height);
        backend.draw_arrays(consts::TRIANGLE_FAN, 0, 4);
        Ok(())
    }

    /// Releases both vertex buffers. The texture is only dropped from this
    /// sprite; other sprites keep drawing it.
    pub fn destroy(self, backend: Registered<'_, B>) {
        backend.delete_buffer(self.positions);
        backend.delete_buffer(self.tex_coords);
    }
}

fn upload<B: Backend>(
    backend: Registered<'_, B>,
    floats: &[f32],
) -> Result<B::Buffer, GgError> {
    let buffer = backend.create_buffer()?;
    backend.bind_buffer(consts::ARRAY_BUFFER, Some(&buffer));
    backend.buffer_data(
        consts::ARRAY_BUFFER,
        geometry::to_bytes(floats),
        consts::STATIC_DRAW,
    );
    Ok(buffer)
}
