//! In-memory backend that records GPU calls instead of issuing them.
//!
//! [`RecordingBackend`] behaves enough like a GL driver to drive the drawing
//! primitives without a window: it hands out object names, stores buffer and
//! texture uploads, "compiles" shaders by reading their `uniform` /
//! `attribute` declarations, and fails lookups for names a program does not
//! declare. Every state-changing call is appended to a log that tests and the
//! CLI inspect.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::backend::Backend;
use crate::consts::{self, Enum};
use crate::error::GgError;

/// One recorded backend call, in issue order.
///
/// Buffer and texture uploads record their byte length; the bytes themselves
/// are kept by the backend (see [`RecordingBackend::buffer_floats`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    Enable { capability: Enum },
    DepthFunc { func: Enum },
    BlendFunc { src: Enum, dst: Enum },
    Clear { mask: Enum },
    ClearColor { rgba: [f32; 4] },
    CreateBuffer { buffer: u32 },
    BindBuffer { target: Enum, buffer: Option<u32> },
    BufferData { target: Enum, len: usize, usage: Enum },
    DeleteBuffer { buffer: u32 },
    CreateShader { shader: u32, stage: Enum },
    DeleteShader { shader: u32 },
    CreateProgram { program: u32 },
    AttachShader { program: u32, shader: u32 },
    LinkProgram { program: u32 },
    UseProgram { program: u32 },
    DeleteProgram { program: u32 },
    Uniform1f { location: i32, value: f32 },
    Uniform1i { location: i32, value: i32 },
    Uniform4f { location: i32, value: [f32; 4] },
    UniformMatrix4fv { location: i32, values: Vec<f32> },
    EnableVertexAttribArray { attribute: u32 },
    VertexAttribPointer {
        attribute: u32,
        size: i32,
        ty: Enum,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    CreateTexture { texture: u32 },
    ActiveTexture { unit: Enum },
    BindTexture { target: Enum, texture: Option<u32> },
    TexImage2D {
        target: Enum,
        level: i32,
        internal_format: Enum,
        width: i32,
        height: i32,
        format: Enum,
        ty: Enum,
        len: usize,
    },
    TexParameteri { target: Enum, pname: Enum, param: Enum },
    DeleteTexture { texture: u32 },
    DrawArrays { mode: Enum, first: i32, count: i32 },
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::Enable { capability } => write!(f, "enable(0x{capability:04X})"),
            Call::DepthFunc { func } => write!(f, "depth_func(0x{func:04X})"),
            Call::BlendFunc { src, dst } => write!(f, "blend_func(0x{src:04X}, 0x{dst:04X})"),
            Call::Clear { mask } => write!(f, "clear(0x{mask:04X})"),
            Call::ClearColor { rgba: [r, g, b, a] } => {
                write!(f, "clear_color({r}, {g}, {b}, {a})")
            }
            Call::CreateBuffer { buffer } => write!(f, "create_buffer() -> {buffer}"),
            Call::BindBuffer { target, buffer } => match buffer {
                Some(b) => write!(f, "bind_buffer(0x{target:04X}, {b})"),
                None => write!(f, "bind_buffer(0x{target:04X}, none)"),
            },
            Call::BufferData { target, len, usage } => {
                write!(f, "buffer_data(0x{target:04X}, {len} bytes, 0x{usage:04X})")
            }
            Call::DeleteBuffer { buffer } => write!(f, "delete_buffer({buffer})"),
            Call::CreateShader { shader, stage } => write!(
                f,
                "create_shader({}) -> {shader}",
                consts::stage_name(*stage)
            ),
            Call::DeleteShader { shader } => write!(f, "delete_shader({shader})"),
            Call::CreateProgram { program } => write!(f, "create_program() -> {program}"),
            Call::AttachShader { program, shader } => {
                write!(f, "attach_shader({program}, {shader})")
            }
            Call::LinkProgram { program } => write!(f, "link_program({program})"),
            Call::UseProgram { program } => write!(f, "use_program({program})"),
            Call::DeleteProgram { program } => write!(f, "delete_program({program})"),
            Call::Uniform1f { location, value } => write!(f, "uniform1f({location}, {value})"),
            Call::Uniform1i { location, value } => write!(f, "uniform1i({location}, {value})"),
            Call::Uniform4f {
                location,
                value: [x, y, z, w],
            } => write!(f, "uniform4f({location}, {x}, {y}, {z}, {w})"),
            Call::UniformMatrix4fv { location, values } => {
                write!(f, "uniform_matrix4fv({location}, {values:?})")
            }
            Call::EnableVertexAttribArray { attribute } => {
                write!(f, "enable_vertex_attrib_array({attribute})")
            }
            Call::VertexAttribPointer {
                attribute,
                size,
                ty,
                normalized,
                stride,
                offset,
            } => write!(
                f,
                "vertex_attrib_pointer({attribute}, {size}, 0x{ty:04X}, {normalized}, {stride}, {offset})"
            ),
            Call::CreateTexture { texture } => write!(f, "create_texture() -> {texture}"),
            Call::ActiveTexture { unit } => write!(f, "active_texture(0x{unit:04X})"),
            Call::BindTexture { target, texture } => match texture {
                Some(t) => write!(f, "bind_texture(0x{target:04X}, {t})"),
                None => write!(f, "bind_texture(0x{target:04X}, none)"),
            },
            Call::TexImage2D {
                target,
                level,
                internal_format,
                width,
                height,
                format,
                ty,
                len,
            } => write!(
                f,
                "tex_image_2d(0x{target:04X}, {level}, 0x{internal_format:04X}, {width}x{height}, 0x{format:04X}, 0x{ty:04X}, {len} bytes)"
            ),
            Call::TexParameteri {
                target,
                pname,
                param,
            } => write!(
                f,
                "tex_parameteri(0x{target:04X}, 0x{pname:04X}, 0x{param:04X})"
            ),
            Call::DeleteTexture { texture } => write!(f, "delete_texture({texture})"),
            Call::DrawArrays { mode, first, count } => {
                write!(f, "draw_arrays(0x{mode:04X}, {first}, {count})")
            }
        }
    }
}

#[derive(Debug)]
struct ShaderInfo {
    stage: Enum,
    uniforms: Vec<String>,
    attributes: Vec<String>,
}

#[derive(Debug, Default)]
struct ProgramInfo {
    attached: Vec<u32>,
    /// Active uniforms and attributes; `None` until a successful link.
    linked: Option<(Vec<String>, Vec<String>)>,
}

#[derive(Debug)]
struct TextureInfo {
    width: i32,
    height: i32,
    bytes: usize,
}

#[derive(Debug)]
struct State {
    next_name: u32,
    buffers: HashMap<u32, Vec<u8>>,
    array_buffer: Option<u32>,
    shaders: HashMap<u32, ShaderInfo>,
    programs: HashMap<u32, ProgramInfo>,
    textures: HashMap<u32, Option<TextureInfo>>,
    texture_2d: Option<u32>,
    calls: Vec<Call>,
}

impl State {
    fn name(&mut self) -> u32 {
        let name = self.next_name;
        self.next_name += 1;
        name
    }
}

/// A backend that keeps GPU state in memory and logs every call.
///
/// Object names start at 1, as GL reserves 0.
#[derive(Debug)]
pub struct RecordingBackend {
    state: RefCell<State>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                next_name: 1,
                buffers: HashMap::new(),
                array_buffer: None,
                shaders: HashMap::new(),
                programs: HashMap::new(),
                textures: HashMap::new(),
                texture_2d: None,
                calls: Vec::new(),
            }),
        }
    }

    /// Returns a copy of the call log.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Returns the call log and clears it.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    /// Contents of a live buffer, decoded as native-endian `f32`s.
    pub fn buffer_floats(&self, buffer: u32) -> Option<Vec<f32>> {
        let state = self.state.borrow();
        let bytes = state.buffers.get(&buffer)?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    /// Size of a live texture's level-0 image, if one was uploaded.
    pub fn texture_size(&self, texture: u32) -> Option<(i32, i32)> {
        let state = self.state.borrow();
        let info = state.textures.get(&texture)?.as_ref()?;
        Some((info.width, info.height))
    }

    /// Byte length of a live texture's level-0 image.
    pub fn texture_bytes(&self, texture: u32) -> Option<usize> {
        let state = self.state.borrow();
        state.textures.get(&texture)?.as_ref().map(|t| t.bytes)
    }

    /// Number of buffers created and not yet deleted.
    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    /// Number of textures created and not yet deleted.
    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Names declared by `uniform` (and, for vertex shaders, `attribute`/`in`)
/// statements.
fn parse_declarations(source: &str, stage: Enum) -> (Vec<String>, Vec<String>) {
    let mut uniforms = Vec::new();
    let mut attributes = Vec::new();
    for line in source.lines() {
        let line = line.trim();
        if line.starts_with("//") {
            continue;
        }
        let Some(statement) = line.split(';').next() else {
            continue;
        };
        let mut words = statement.split_whitespace();
        let target = match words.next() {
            Some("uniform") => &mut uniforms,
            Some("attribute") => &mut attributes,
            Some("in") if stage == consts::VERTEX_SHADER => &mut attributes,
            _ => continue,
        };
        let mut words = words.skip_while(|w| matches!(*w, "lowp" | "mediump" | "highp"));
        // Type name.
        words.next();
        let names: String = words.collect();
        target.extend(
            names
                .split(',')
                .map(|n| n.split('[').next().unwrap_or(n).trim().to_string())
                .filter(|n| !n.is_empty()),
        );
    }
    (uniforms, attributes)
}

impl Backend for RecordingBackend {
    type Buffer = u32;
    type Shader = u32;
    type Program = u32;
    type Uniform = i32;
    type Attribute = u32;
    type Texture = u32;
    type PixelSource = [u8];

    fn enable(&self, capability: Enum) {
        self.record(Call::Enable { capability });
    }

    fn depth_func(&self, func: Enum) {
        self.record(Call::DepthFunc { func });
    }

    fn blend_func(&self, src: Enum, dst: Enum) {
        self.record(Call::BlendFunc { src, dst });
    }

    fn clear(&self, mask: Enum) {
        self.record(Call::Clear { mask });
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor { rgba: [r, g, b, a] });
    }

    fn create_buffer(&self) -> Result<u32, GgError> {
        let mut state = self.state.borrow_mut();
        let buffer = state.name();
        state.buffers.insert(buffer, Vec::new());
        state.calls.push(Call::CreateBuffer { buffer });
        Ok(buffer)
    }

    fn bind_buffer(&self, target: Enum, buffer: Option<&u32>) {
        let mut state = self.state.borrow_mut();
        if target == consts::ARRAY_BUFFER {
            state.array_buffer = buffer.copied();
        }
        state.calls.push(Call::BindBuffer {
            target,
            buffer: buffer.copied(),
        });
    }

    fn buffer_data(&self, target: Enum, data: &[u8], usage: Enum) {
        let mut state = self.state.borrow_mut();
        if target == consts::ARRAY_BUFFER {
            if let Some(bound) = state.array_buffer {
                if let Some(contents) = state.buffers.get_mut(&bound) {
                    *contents = data.to_vec();
                }
            }
        }
        state.calls.push(Call::BufferData {
            target,
            len: data.len(),
            usage,
        });
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        if state.array_buffer == Some(buffer) {
            state.array_buffer = None;
        }
        state.calls.push(Call::DeleteBuffer { buffer });
    }

    fn create_shader(&self, source: &str, stage: Enum) -> Result<u32, GgError> {
        if !source.contains("main") {
            return Err(GgError::Compile {
                stage: consts::stage_name(stage).to_string(),
                source_text: source.to_string(),
                log: "ERROR: 0:1: 'main' : missing entry point\n".to_string(),
            });
        }
        let (uniforms, attributes) = parse_declarations(source, stage);
        let mut state = self.state.borrow_mut();
        let shader = state.name();
        state.shaders.insert(
            shader,
            ShaderInfo {
                stage,
                uniforms,
                attributes,
            },
        );
        state.calls.push(Call::CreateShader { shader, stage });
        Ok(shader)
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.calls.push(Call::DeleteShader { shader });
    }

    fn create_program(&self) -> Result<u32, GgError> {
        let mut state = self.state.borrow_mut();
        let program = state.name();
        state.programs.insert(program, ProgramInfo::default());
        state.calls.push(Call::CreateProgram { program });
        Ok(program)
    }

    fn attach_shader(&self, program: &u32, shader: &u32) {
        let mut state = self.state.borrow_mut();
        if let Some(info) = state.programs.get_mut(program) {
            info.attached.push(*shader);
        }
        state.calls.push(Call::AttachShader {
            program: *program,
            shader: *shader,
        });
    }

    fn link_program(&self, program: &u32) -> Result<(), GgError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::LinkProgram { program: *program });

        let attached = match state.programs.get(program) {
            Some(info) => info.attached.clone(),
            None => return Err(GgError::Link(format!("no program named {program}\n"))),
        };
        let mut uniforms: Vec<String> = Vec::new();
        let mut attributes: Vec<String> = Vec::new();
        let mut stages = Vec::new();
        for shader in &attached {
            // Deleted stages no longer contribute.
            if let Some(info) = state.shaders.get(shader) {
                stages.push(info.stage);
                for name in &info.uniforms {
                    if !uniforms.contains(name) {
                        uniforms.push(name.clone());
                    }
                }
                attributes.extend(info.attributes.iter().cloned());
            }
        }
        for (stage, label) in [
            (consts::VERTEX_SHADER, "vertex"),
            (consts::FRAGMENT_SHADER, "fragment"),
        ] {
            if !stages.contains(&stage) {
                return Err(GgError::Link(format!(
                    "error: program {program} has no {label} shader attached\n"
                )));
            }
        }
        if let Some(info) = state.programs.get_mut(program) {
            info.linked = Some((uniforms, attributes));
        }
        Ok(())
    }

    fn use_program(&self, program: &u32) {
        self.record(Call::UseProgram { program: *program });
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.calls.push(Call::DeleteProgram { program });
    }

    fn get_uniform_location(&self, program: &u32, name: &str) -> Result<i32, GgError> {
        let state = self.state.borrow();
        state
            .programs
            .get(program)
            .and_then(|info| info.linked.as_ref())
            .and_then(|(uniforms, _)| uniforms.iter().position(|u| u == name))
            .and_then(|index| i32::try_from(index).ok())
            .ok_or_else(|| GgError::uniform_not_found(name))
    }

    fn get_attrib_location(&self, program: &u32, name: &str) -> Result<u32, GgError> {
        let state = self.state.borrow();
        state
            .programs
            .get(program)
            .and_then(|info| info.linked.as_ref())
            .and_then(|(_, attributes)| attributes.iter().position(|a| a == name))
            .and_then(|index| u32::try_from(index).ok())
            .ok_or_else(|| GgError::attribute_not_found(name))
    }

    fn uniform1f(&self, uniform: &i32, v0: f32) {
        self.record(Call::Uniform1f {
            location: *uniform,
            value: v0,
        });
    }

    fn uniform1i(&self, uniform: &i32, v0: i32) {
        self.record(Call::Uniform1i {
            location: *uniform,
            value: v0,
        });
    }

    fn uniform4f(&self, uniform: &i32, v0: f32, v1: f32, v2: f32, v3: f32) {
        self.record(Call::Uniform4f {
            location: *uniform,
            value: [v0, v1, v2, v3],
        });
    }

    fn uniform_matrix4fv(&self, uniform: &i32, values: &[f32]) {
        self.record(Call::UniformMatrix4fv {
            location: *uniform,
            values: values.to_vec(),
        });
    }

    fn enable_vertex_attrib_array(&self, attribute: &u32) {
        self.record(Call::EnableVertexAttribArray {
            attribute: *attribute,
        });
    }

    fn vertex_attrib_pointer(
        &self,
        attribute: &u32,
        size: i32,
        ty: Enum,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(Call::VertexAttribPointer {
            attribute: *attribute,
            size,
            ty,
            normalized,
            stride,
            offset,
        });
    }

    fn create_texture(&self) -> Result<u32, GgError> {
        let mut state = self.state.borrow_mut();
        let texture = state.name();
        state.textures.insert(texture, None);
        state.calls.push(Call::CreateTexture { texture });
        Ok(texture)
    }

    fn active_texture(&self, unit: Enum) {
        self.record(Call::ActiveTexture { unit });
    }

    fn bind_texture(&self, target: Enum, texture: Option<&u32>) {
        let mut state = self.state.borrow_mut();
        if target == consts::TEXTURE_2D {
            state.texture_2d = texture.copied();
        }
        state.calls.push(Call::BindTexture {
            target,
            texture: texture.copied(),
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: Enum,
        level: i32,
        internal_format: Enum,
        width: i32,
        height: i32,
        _border: i32,
        format: Enum,
        ty: Enum,
        data: &[u8],
    ) -> Result<(), GgError> {
        let expected = usize::try_from(i64::from(width) * i64::from(height) * 4).unwrap_or(0);
        if format == consts::RGBA && ty == consts::UNSIGNED_BYTE && data.len() != expected {
            return Err(GgError::Resource(format!(
                "texture image: {width}x{height} RGBA needs {expected} bytes, got {}",
                data.len()
            )));
        }
        let mut state = self.state.borrow_mut();
        if target == consts::TEXTURE_2D && level == 0 {
            if let Some(bound) = state.texture_2d {
                if let Some(slot) = state.textures.get_mut(&bound) {
                    *slot = Some(TextureInfo {
                        width,
                        height,
                        bytes: data.len(),
                    });
                }
            }
        }
        state.calls.push(Call::TexImage2D {
            target,
            level,
            internal_format,
            width,
            height,
            format,
            ty,
            len: data.len(),
        });
        Ok(())
    }

    fn tex_parameteri(&self, target: Enum, pname: Enum, param: Enum) {
        self.record(Call::TexParameteri {
            target,
            pname,
            param,
        });
    }

    fn delete_texture(&self, texture: u32) {
        let mut state = self.state.borrow_mut();
        state.textures.remove(&texture);
        if state.texture_2d == Some(texture) {
            state.texture_2d = None;
        }
        state.calls.push(Call::DeleteTexture { texture });
    }

    fn draw_arrays(&self, mode: Enum, first: i32, count: i32) {
        self.record(Call::DrawArrays { mode, first, count });
    }
}
