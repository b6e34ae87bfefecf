//! `web-sys` WebGL2 implementation of the backend contract.

use gg_core::consts::{self, Enum};
use gg_core::{Backend, GgError};
use wasm_bindgen::JsValue;
use web_sys::{
    HtmlImageElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation,
};

/// Forwards every [`Backend`] call to a browser WebGL2 context.
///
/// Handles are the browser's own `WebGl*` objects. Textures upload from a
/// loaded [`HtmlImageElement`], which carries its own size.
#[derive(Debug, Clone)]
pub struct WebGlBackend {
    gl: Gl,
}

impl WebGlBackend {
    pub fn new(gl: Gl) -> Self {
        Self { gl }
    }

    /// Returns a reference to the underlying rendering context.
    pub fn gl(&self) -> &Gl {
        &self.gl
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

impl Backend for WebGlBackend {
    type Buffer = WebGlBuffer;
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Uniform = WebGlUniformLocation;
    type Attribute = u32;
    type Texture = WebGlTexture;
    type PixelSource = HtmlImageElement;

    fn enable(&self, capability: Enum) {
        self.gl.enable(capability);
    }

    fn depth_func(&self, func: Enum) {
        self.gl.depth_func(func);
    }

    fn blend_func(&self, src: Enum, dst: Enum) {
        self.gl.blend_func(src, dst);
    }

    fn clear(&self, mask: Enum) {
        self.gl.clear(mask);
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.clear_color(r, g, b, a);
    }

    fn create_buffer(&self) -> Result<Self::Buffer, GgError> {
        self.gl
            .create_buffer()
            .ok_or_else(|| GgError::Resource("buffer: context lost".into()))
    }

    fn bind_buffer(&self, target: Enum, buffer: Option<&Self::Buffer>) {
        self.gl.bind_buffer(target, buffer);
    }

    fn buffer_data(&self, target: Enum, data: &[u8], usage: Enum) {
        self.gl.buffer_data_with_u8_array(target, data, usage);
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        self.gl.delete_buffer(Some(&buffer));
    }

    fn create_shader(&self, source: &str, stage: Enum) -> Result<Self::Shader, GgError> {
        let stage_name = consts::stage_name(stage);
        let shader = self
            .gl
            .create_shader(stage)
            .ok_or_else(|| GgError::Resource(format!("{stage_name} shader: context lost")))?;
        self.gl.shader_source(&shader, source);
        self.gl.compile_shader(&shader);

        let compiled = self
            .gl
            .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if compiled {
            return Ok(shader);
        }
        let log = self.gl.get_shader_info_log(&shader).unwrap_or_default();
        self.gl.delete_shader(Some(&shader));
        Err(GgError::Compile {
            stage: stage_name.to_string(),
            source_text: source.to_string(),
            log,
        })
    }

    fn delete_shader(&self, shader: Self::Shader) {
        self.gl.delete_shader(Some(&shader));
    }

    fn create_program(&self) -> Result<Self::Program, GgError> {
        self.gl
            .create_program()
            .ok_or_else(|| GgError::Resource("program: context lost".into()))
    }

    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader) {
        self.gl.attach_shader(program, shader);
    }

    fn link_program(&self, program: &Self::Program) -> Result<(), GgError> {
        self.gl.link_program(program);
        let linked = self
            .gl
            .get_program_parameter(program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if linked {
            Ok(())
        } else {
            Err(GgError::Link(
                self.gl.get_program_info_log(program).unwrap_or_default(),
            ))
        }
    }

    fn use_program(&self, program: &Self::Program) {
        self.gl.use_program(Some(program));
    }

    fn delete_program(&self, program: Self::Program) {
        self.gl.delete_program(Some(&program));
    }

    fn get_uniform_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Result<Self::Uniform, GgError> {
        self.gl
            .get_uniform_location(program, name)
            .ok_or_else(|| GgError::uniform_not_found(name))
    }

    fn get_attrib_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Result<Self::Attribute, GgError> {
        // -1 marks an inactive or missing attribute.
        u32::try_from(self.gl.get_attrib_location(program, name))
            .map_err(|_| GgError::attribute_not_found(name))
    }

    fn uniform1f(&self, uniform: &Self::Uniform, v0: f32) {
        self.gl.uniform1f(Some(uniform), v0);
    }

    fn uniform1i(&self, uniform: &Self::Uniform, v0: i32) {
        self.gl.uniform1i(Some(uniform), v0);
    }

    fn uniform4f(&self, uniform: &Self::Uniform, v0: f32, v1: f32, v2: f32, v3: f32) {
        self.gl.uniform4f(Some(uniform), v0, v1, v2, v3);
    }

    fn uniform_matrix4fv(&self, uniform: &Self::Uniform, values: &[f32]) {
        self.gl
            .uniform_matrix4fv_with_f32_array(Some(uniform), false, values);
    }

    fn enable_vertex_attrib_array(&self, attribute: &Self::Attribute) {
        self.gl.enable_vertex_attrib_array(*attribute);
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
        self.gl
            .vertex_attrib_pointer_with_i32(*attribute, size, ty, normalized, stride, offset);
    }

    fn create_texture(&self) -> Result<Self::Texture, GgError> {
        self.gl
            .create_texture()
            .ok_or_else(|| GgError::Resource("texture: context lost".into()))
    }

    fn active_texture(&self, unit: Enum) {
        self.gl.active_texture(unit);
    }

    fn bind_texture(&self, target: Enum, texture: Option<&Self::Texture>) {
        self.gl.bind_texture(target, texture);
    }

    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: Enum,
        level: i32,
        internal_format: Enum,
        _width: i32,
        _height: i32,
        _border: i32,
        format: Enum,
        ty: Enum,
        data: &HtmlImageElement,
    ) -> Result<(), GgError> {
        self.gl
            .tex_image_2d_with_u32_and_u32_and_html_image_element(
                target,
                level,
                internal_format as i32,
                format,
                ty,
                data,
            )
            .map_err(|e| GgError::Resource(format!("texture upload: {}", js_message(&e))))
    }

    fn tex_parameteri(&self, target: Enum, pname: Enum, param: Enum) {
        self.gl.tex_parameteri(target, pname, param as i32);
    }

    fn delete_texture(&self, texture: Self::Texture) {
        self.gl.delete_texture(Some(&texture));
    }

    fn draw_arrays(&self, mode: Enum, first: i32, count: i32) {
        self.gl.draw_arrays(mode, first, count);
    }
}
