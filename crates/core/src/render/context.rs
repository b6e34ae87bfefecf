//! `glow`-backed implementation of the backend contract.
//!
//! The host owns window and context creation; `GlBackend` only takes the
//! finished `glow::Context`. When the context supports vertex array objects
//! it creates and binds one at construction, since core profiles require a
//! bound VAO before any attribute can be enabled. GL 2.1 contexts without
//! the extension run on the default vertex state instead.
//!
//! Pair the context with matching shader sources: a 3.3+ core profile
//! needs [`CORE_VERTEX_SHADER`](crate::shader::CORE_VERTEX_SHADER) and
//! [`CORE_FRAGMENT_SHADER`](crate::shader::CORE_FRAGMENT_SHADER); GL 2.1 and
//! compatibility profiles take the `DEFAULT_*` pair.

use std::fmt;

use glow::HasContext;

use crate::backend::Backend;
use crate::consts::{self, Enum};
use crate::error::GgError;

/// Wraps a `glow::Context` and implements [`Backend`] over it.
pub struct GlBackend {
    gl: glow::Context,
    vao: Option<glow::VertexArray>,
}

/// Extension names that provide vertex array objects below GL 3.0.
const VERTEX_ARRAY_EXTENSIONS: [&str; 2] =
    ["GL_ARB_vertex_array_object", "GL_OES_vertex_array_object"];

/// Whether a context of major version `major` can create vertex array
/// objects, given whether it advertises one of the VAO extensions.
fn supports_vertex_arrays(major: u32, has_extension: bool) -> bool {
    major >= 3 || has_extension
}

impl GlBackend {
    /// Wraps `gl`, binding a fresh vertex array object if the context
    /// supports one.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Resource` if a supported vertex array cannot be
    /// created.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Result<Self, GgError> {
        let extensions = gl.supported_extensions();
        let has_extension = VERTEX_ARRAY_EXTENSIONS
            .iter()
            .any(|name| extensions.contains(*name));

        let vao = if supports_vertex_arrays(gl.version().major, has_extension) {
            // SAFETY: glow wraps raw GL calls as unsafe. The context is
            // current on this thread (the caller's contract) and the VAO is
            // freshly made.
            let vao = unsafe { gl.create_vertex_array() }
                .map_err(|e| GgError::Resource(format!("vertex array: {e}")))?;
            unsafe { gl.bind_vertex_array(Some(vao)) };
            Some(vao)
        } else {
            log::debug!("gg: no vertex array support, using default vertex state");
            None
        };

        log::debug!("gg: GL backend ready ({:?})", gl.version());
        Ok(Self { gl, vao })
    }

    /// Returns a reference to the underlying `glow::Context`.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Releases the vertex array, if any, and returns the underlying
    /// `glow::Context`.
    #[allow(unsafe_code)]
    pub fn into_gl(self) -> glow::Context {
        if let Some(vao) = self.vao {
            // SAFETY: the VAO was created on this context and is not used
            // again.
            unsafe {
                self.gl.bind_vertex_array(None);
                self.gl.delete_vertex_array(vao);
            }
        }
        self.gl
    }

    #[allow(unsafe_code)]
    fn check_upload(&self) -> Result<(), GgError> {
        // SAFETY: querying the error flag has no preconditions.
        match unsafe { self.gl.get_error() } {
            glow::NO_ERROR => Ok(()),
            code => Err(GgError::Resource(format!("texture upload: GL error 0x{code:04X}"))),
        }
    }
}

impl fmt::Debug for GlBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlBackend")
            .field("version", self.gl.version())
            .field("vao", &self.vao)
            .finish_non_exhaustive()
    }
}

// SAFETY (all methods below): glow exposes every GL entry point as unsafe
// because the driver cannot check its arguments. Handles passed in were
// produced by this same context, and enums come from `crate::consts`.
#[allow(unsafe_code)]
impl Backend for GlBackend {
    type Buffer = glow::Buffer;
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Uniform = glow::UniformLocation;
    type Attribute = u32;
    type Texture = glow::Texture;
    type PixelSource = [u8];

    fn enable(&self, capability: Enum) {
        unsafe { self.gl.enable(capability) }
    }

    fn depth_func(&self, func: Enum) {
        unsafe { self.gl.depth_func(func) }
    }

    fn blend_func(&self, src: Enum, dst: Enum) {
        unsafe { self.gl.blend_func(src, dst) }
    }

    fn clear(&self, mask: Enum) {
        unsafe { self.gl.clear(mask) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, GgError> {
        let buffer =
            unsafe { self.gl.create_buffer() }.map_err(|e| GgError::Resource(format!("buffer: {e}")))?;
        log::debug!("gg: created buffer {buffer:?}");
        Ok(buffer)
    }

    fn bind_buffer(&self, target: Enum, buffer: Option<&Self::Buffer>) {
        unsafe { self.gl.bind_buffer(target, buffer.copied()) }
    }

    fn buffer_data(&self, target: Enum, data: &[u8], usage: Enum) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn create_shader(&self, source: &str, stage: Enum) -> Result<Self::Shader, GgError> {
        let stage_name = consts::stage_name(stage);
        unsafe {
            let shader = self
                .gl
                .create_shader(stage)
                .map_err(|e| GgError::Resource(format!("{stage_name} shader: {e}")))?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);

            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(GgError::Compile {
                    stage: stage_name.to_string(),
                    source_text: source.to_string(),
                    log,
                });
            }
            Ok(shader)
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, GgError> {
        unsafe { self.gl.create_program() }.map_err(|e| GgError::Resource(format!("program: {e}")))
    }

    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader) {
        unsafe { self.gl.attach_shader(*program, *shader) }
    }

    fn link_program(&self, program: &Self::Program) -> Result<(), GgError> {
        unsafe {
            self.gl.link_program(*program);
            if self.gl.get_program_link_status(*program) {
                Ok(())
            } else {
                Err(GgError::Link(self.gl.get_program_info_log(*program)))
            }
        }
    }

    fn use_program(&self, program: &Self::Program) {
        unsafe { self.gl.use_program(Some(*program)) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn get_uniform_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Result<Self::Uniform, GgError> {
        unsafe { self.gl.get_uniform_location(*program, name) }
            .ok_or_else(|| GgError::uniform_not_found(name))
    }

    fn get_attrib_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Result<Self::Attribute, GgError> {
        unsafe { self.gl.get_attrib_location(*program, name) }
            .ok_or_else(|| GgError::attribute_not_found(name))
    }

    fn uniform1f(&self, uniform: &Self::Uniform, v0: f32) {
        unsafe { self.gl.uniform_1_f32(Some(uniform), v0) }
    }

    fn uniform1i(&self, uniform: &Self::Uniform, v0: i32) {
        unsafe { self.gl.uniform_1_i32(Some(uniform), v0) }
    }

    fn uniform4f(&self, uniform: &Self::Uniform, v0: f32, v1: f32, v2: f32, v3: f32) {
        unsafe { self.gl.uniform_4_f32(Some(uniform), v0, v1, v2, v3) }
    }

    fn uniform_matrix4fv(&self, uniform: &Self::Uniform, values: &[f32]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(uniform), false, values) }
    }

    fn enable_vertex_attrib_array(&self, attribute: &Self::Attribute) {
        unsafe { self.gl.enable_vertex_attrib_array(*attribute) }
    }

    fn vertex_attrib_pointer(
        &self,
        attribute: &Self::Attribute,
        size: i32,
        ty: Enum,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(*attribute, size, ty, normalized, stride, offset)
        }
    }

    fn create_texture(&self) -> Result<Self::Texture, GgError> {
        unsafe { self.gl.create_texture() }.map_err(|e| GgError::Resource(format!("texture: {e}")))
    }

    fn active_texture(&self, unit: Enum) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn bind_texture(&self, target: Enum, texture: Option<&Self::Texture>) {
        unsafe { self.gl.bind_texture(target, texture.copied()) }
    }

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
        data: &[u8],
    ) -> Result<(), GgError> {
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                internal_format as i32,
                width,
                height,
                border,
                format,
                ty,
                glow::PixelUnpackData::Slice(Some(data)),
            );
        }
        self.check_upload()
    }

    fn tex_parameteri(&self, target: Enum, pname: Enum, param: Enum) {
        unsafe { self.gl.tex_parameter_i32(target, pname, param as i32) }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }

    fn draw_arrays(&self, mode: Enum, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }
}
