//! The capability contract every graphics runtime implements.
//!
//! A [`Backend`] is a thin, synchronous forward to one native graphics API.
//! Exactly one backend is active per process; the drawing primitives in this
//! crate take it by reference and call it in the exact order they issue
//! operations. All calls must happen on the thread that owns the graphics
//! context.
//!
//! Handle types are associated types, so a desktop GL object name can never
//! be handed to the WebGL backend (or vice versa).

use crate::consts::Enum;
use crate::error::GgError;
use crate::handle::Handle;

/// Primitive GPU operations needed by the drawing layer.
///
/// Methods mirror the GL entry points of the same name. Methods that only
/// mutate pipeline state return nothing: the enum arguments are assumed to
/// be valid members of [`crate::consts`].
pub trait Backend {
    /// Vertex buffer object.
    type Buffer: Handle;
    /// Compiled shader stage.
    type Shader: Handle;
    /// Linked shader program.
    type Program: Handle;
    /// Uniform location within a program.
    type Uniform: Handle;
    /// Vertex attribute location within a program.
    type Attribute: Handle;
    /// Texture object.
    type Texture: Handle;
    /// What [`Backend::tex_image_2d`] uploads from: raw RGBA bytes on the
    /// desktop, a self-describing image element in the browser.
    type PixelSource: ?Sized;

    // Pipeline state.

    fn enable(&self, capability: Enum);

    fn depth_func(&self, func: Enum);

    fn blend_func(&self, src: Enum, dst: Enum);

    fn clear(&self, mask: Enum);

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);

    // Buffers.

    /// Allocates a new buffer object.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Resource` if the native layer refuses the allocation.
    fn create_buffer(&self) -> Result<Self::Buffer, GgError>;

    /// Binds `buffer` to `target`; `None` unbinds.
    fn bind_buffer(&self, target: Enum, buffer: Option<&Self::Buffer>);

    /// Uploads raw bytes to the buffer bound to `target`.
    ///
    /// The byte layout is the caller's contract; backends do not interpret it.
    fn buffer_data(&self, target: Enum, data: &[u8], usage: Enum);

    fn delete_buffer(&self, buffer: Self::Buffer);

    // Shaders and programs.

    /// Compiles `source` as a shader of the given stage.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Compile` carrying the source and the driver log when
    /// compilation fails; no shader handle survives a failure.
    fn create_shader(&self, source: &str, stage: Enum) -> Result<Self::Shader, GgError>;

    fn delete_shader(&self, shader: Self::Shader);

    /// Allocates an empty program object.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Resource` if the native layer refuses the allocation.
    fn create_program(&self) -> Result<Self::Program, GgError>;

    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);

    /// Links the attached stages.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Link` with the driver log when linking fails.
    fn link_program(&self, program: &Self::Program) -> Result<(), GgError>;

    /// Makes `program` current.
    fn use_program(&self, program: &Self::Program);

    fn delete_program(&self, program: Self::Program);

    // Uniforms and attributes.

    /// Looks up a uniform by name.
    ///
    /// # Errors
    ///
    /// Returns `GgError::NotFound` when the linked program has no active
    /// uniform of that name. The lookup never changes GPU state.
    fn get_uniform_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Result<Self::Uniform, GgError>;

    /// Looks up a vertex attribute by name.
    ///
    /// # Errors
    ///
    /// Returns `GgError::NotFound` when the linked program has no active
    /// attribute of that name. The lookup never changes GPU state.
    fn get_attrib_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Result<Self::Attribute, GgError>;

    fn uniform1f(&self, uniform: &Self::Uniform, v0: f32);

    fn uniform1i(&self, uniform: &Self::Uniform, v0: i32);

    fn uniform4f(&self, uniform: &Self::Uniform, v0: f32, v1: f32, v2: f32, v3: f32);

    /// Uploads a column-major 4x4 matrix (16 floats).
    fn uniform_matrix4fv(&self, uniform: &Self::Uniform, values: &[f32]);

    fn enable_vertex_attrib_array(&self, attribute: &Self::Attribute);

    /// Describes how the currently bound ARRAY_BUFFER feeds `attribute`.
    fn vertex_attrib_pointer(
        &self,
        attribute: &Self::Attribute,
        size: i32,
        ty: Enum,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    // Textures.

    /// Allocates a new texture object.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Resource` if the native layer refuses the allocation.
    fn create_texture(&self) -> Result<Self::Texture, GgError>;

    fn active_texture(&self, unit: Enum);

    fn bind_texture(&self, target: Enum, texture: Option<&Self::Texture>);

    /// Uploads pixel data to the texture bound to `target`.
    ///
    /// Backends whose [`Backend::PixelSource`] carries its own dimensions
    /// ignore `width`, `height` and `border`.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Resource` if the native upload is rejected.
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: Enum,
        level: i32,
        internal_format: Enum,
        width: i32,
        height: i32,
        border: i32,
        format: Enum,
        ty: Enum,
        data: &Self::PixelSource,
    ) -> Result<(), GgError>;

    fn tex_parameteri(&self, target: Enum, pname: Enum, param: Enum);

    fn delete_texture(&self, texture: Self::Texture);

    // Draw.

    /// Draws `count` vertices starting at `first` from the bound attributes.
    fn draw_arrays(&self, mode: Enum, first: i32, count: i32);
}
