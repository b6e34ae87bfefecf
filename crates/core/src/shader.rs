//! Shader sources, interface names, and program setup helpers.
//!
//! Shader text is opaque configuration: the library forwards it to the
//! backend untouched and only relays compile/link diagnostics. The default
//! sources below expose the interface the primitives draw through: a flat
//! `color` mixed with a sampled texture by `mix_value` (0 for polygons, 1 for
//! sprites).
//!
//! Three source pairs ship with the library, one per kind of context:
//!
//! - [`DEFAULT_VERTEX_SHADER`] / [`DEFAULT_FRAGMENT_SHADER`]: GLSL 1.20, for
//!   GL 2.1 and compatibility-profile contexts.
//! - [`CORE_VERTEX_SHADER`] / [`CORE_FRAGMENT_SHADER`]: GLSL 3.30, for 3.3+
//!   core-profile contexts, which reject `attribute`, `varying` and
//!   `gl_FragColor`.
//! - [`WEB_VERTEX_SHADER`] / [`WEB_FRAGMENT_SHADER`]: GLSL ES 1.00, for WebGL.

use crate::backend::Backend;
use crate::config::ViewConfig;
use crate::consts::{self, Enum};
use crate::error::GgError;
use crate::registry::Registered;

/// Projection matrix uniform.
pub const PROJ_UNIFORM: &str = "proj";
/// View matrix uniform.
pub const VIEW_UNIFORM: &str = "view";
/// Per-object model matrix uniform.
pub const MODEL_UNIFORM: &str = "model";
/// Flat RGBA color uniform.
pub const COLOR_UNIFORM: &str = "color";
/// Texture sampler uniform.
pub const TEXTURE_UNIFORM: &str = "tex_loc";
/// Blend between `color` (0.0) and the sampled texture (1.0).
pub const MIX_UNIFORM: &str = "mix_value";
/// Vertex position attribute (3 floats).
pub const POSITION_ATTRIBUTE: &str = "vertex_position";
/// Texture coordinate attribute (2 floats).
pub const TEX_COORD_ATTRIBUTE: &str = "vertex_texture";

/// GLSL 1.20 vertex shader for desktop GL.
pub const DEFAULT_VERTEX_SHADER: &str = r#"#version 120

uniform mat4 proj, view, model;
attribute vec3 vertex_position;
attribute vec2 vertex_texture;
varying vec2 texture_coordinates;

void main() {
    gl_Position = proj * view * model * vec4(vertex_position, 1);
    texture_coordinates = vertex_texture;
}
"#;

/// GLSL 1.20 fragment shader for desktop GL.
pub const DEFAULT_FRAGMENT_SHADER: &str = r#"#version 120

uniform sampler2D tex_loc;
uniform float mix_value;
uniform vec4 color;
varying vec2 texture_coordinates;

void main() {
    gl_FragColor = mix(
        color,
        texture2D(tex_loc, texture_coordinates),
        mix_value
    );
}
"#;

/// GLSL 3.30 vertex shader for core-profile desktop contexts.
pub const CORE_VERTEX_SHADER: &str = r#"#version 330 core

uniform mat4 proj, view, model;
in vec3 vertex_position;
in vec2 vertex_texture;
out vec2 texture_coordinates;

void main() {
    gl_Position = proj * view * model * vec4(vertex_position, 1);
    texture_coordinates = vertex_texture;
}
"#;

/// GLSL 3.30 fragment shader for core-profile desktop contexts.
pub const CORE_FRAGMENT_SHADER: &str = r#"#version 330 core

uniform sampler2D tex_loc;
uniform float mix_value;
uniform vec4 color;
in vec2 texture_coordinates;
out vec4 frag_color;

void main() {
    frag_color = mix(
        color,
        texture(tex_loc, texture_coordinates),
        mix_value
    );
}
"#;

/// GLSL ES 1.00 vertex shader for WebGL.
pub const WEB_VERTEX_SHADER: &str = r#"#version 100

uniform mat4 proj, view, model;
attribute vec3 vertex_position;
attribute vec2 vertex_texture;
varying highp vec2 texture_coordinates;

void main() {
    gl_Position = proj * view * model * vec4(vertex_position, 1);
    texture_coordinates = vertex_texture;
}
"#;

/// GLSL ES 1.00 fragment shader for WebGL.
pub const WEB_FRAGMENT_SHADER: &str = r#"#version 100

precision mediump float;

uniform sampler2D tex_loc;
uniform float mix_value;
uniform vec4 color;
varying highp vec2 texture_coordinates;

void main() {
    gl_FragColor = mix(
        color,
        texture2D(tex_loc, texture_coordinates),
        mix_value
    );
}
"#;

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`. This makes it easy to correlate
/// error messages (which reference line numbers) with the actual GLSL.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = source.lines().collect();
    let width = source_lines.len().max(1).to_string().len();

    let numbered: String = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1, width = width))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles one stage, logging a numbered listing when the driver rejects it.
fn compile_stage<B: Backend>(
    backend: Registered<'_, B>,
    source: &str,
    stage: Enum,
) -> Result<B::Shader, GgError> {
    backend.create_shader(source, stage).inspect_err(|e| {
        if let GgError::Compile { stage, log, .. } = e {
            log::error!(
                "gg: {stage} shader failed to compile:\n{}",
                format_shader_error(source, log)
            );
        }
    })
}

/// Compiles vertex and fragment sources and links them into a program.
///
/// The stage objects are deleted once linking is attempted; the program
/// keeps what it needs.
///
/// # Errors
///
/// Returns `GgError::Compile` if either stage fails to compile, or
/// `GgError::Link` if linking fails. Nothing is left allocated on error.
pub fn compile_program<B: Backend>(
    backend: Registered<'_, B>,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<B::Program, GgError> {
    let vert = compile_stage(backend, vertex_src, consts::VERTEX_SHADER)?;
    let frag = match compile_stage(backend, fragment_src, consts::FRAGMENT_SHADER) {
        Ok(f) => f,
        Err(e) => {
            backend.delete_shader(vert);
            return Err(e);
        }
    };

    let program = match backend.create_program() {
        Ok(p) => p,
        Err(e) => {
            backend.delete_shader(vert);
            backend.delete_shader(frag);
            return Err(e);
        }
    };
    backend.attach_shader(&program, &vert);
    backend.attach_shader(&program, &frag);
    let linked = backend.link_program(&program);

    backend.delete_shader(vert);
    backend.delete_shader(frag);

    match linked {
        Ok(()) => {
            log::debug!("gg: linked program {program:?}");
            Ok(program)
        }
        Err(e) => {
            log::error!("gg: {e}");
            backend.delete_program(program);
            Err(e)
        }
    }
}

/// Uploads the scene-wide `proj` and `view` matrices to `program`.
///
/// Leaves `program` current.
///
/// # Errors
///
/// Returns `GgError::NotFound` if the program lacks either uniform.
pub fn apply_view<B: Backend>(
    backend: Registered<'_, B>,
    program: &B::Program,
    view: &ViewConfig,
) -> Result<(), GgError> {
    backend.use_program(program);
    let proj_uniform = backend.get_uniform_location(program, PROJ_UNIFORM)?;
    backend.uniform_matrix4fv(&proj_uniform, &view.projection().to_cols_array());
    let view_uniform = backend.get_uniform_location(program, VIEW_UNIFORM)?;
    backend.uniform_matrix4fv(&view_uniform, &view.view().to_cols_array());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::Call;
    use crate::registry::recording;

    #[test]
    fn format_shader_error_prepends_line_numbers() {
        let source = "#version 120\nvoid main() {\n}\n";
        let log = "ERROR: 0:2: syntax error";
        let formatted = format_shader_error(source, log);

        assert!(formatted.contains("1: #version 120"), "got:\n{formatted}");
        assert!(formatted.contains("2: void main() {"), "got:\n{formatted}");
        assert!(formatted.contains("3: }"), "got:\n{formatted}");
        assert!(formatted.ends_with(log), "got:\n{formatted}");
    }

    #[test]
    fn format_shader_error_handles_empty_inputs() {
        assert_eq!(format_shader_error("", "some error"), "some error");
        assert_eq!(format_shader_error("void main() {}", ""), "1: void main() {}");
        assert!(format_shader_error("", "").is_empty());
    }

    #[test]
    fn format_shader_error_right_aligns_line_numbers() {
        let source = (1..=12)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let formatted = format_shader_error(&source, "err");
        let lines: Vec<&str> = formatted.lines().collect();
        assert!(lines[0].starts_with(" 1: "), "got: '{}'", lines[0]);
        assert!(lines[9].starts_with("10: "), "got: '{}'", lines[9]);
    }

    #[test]
    fn compile_program_links_default_shaders() {
        let backend = recording();
        let program =
            compile_program(backend, DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER).unwrap();
        for name in [MODEL_UNIFORM, COLOR_UNIFORM, TEXTURE_UNIFORM, MIX_UNIFORM] {
            assert!(
                backend.get_uniform_location(&program, name).is_ok(),
                "missing uniform {name}"
            );
        }
        for name in [POSITION_ATTRIBUTE, TEX_COORD_ATTRIBUTE] {
            assert!(
                backend.get_attrib_location(&program, name).is_ok(),
                "missing attribute {name}"
            );
        }
    }

    #[test]
    fn web_shaders_declare_the_same_interface() {
        let backend = recording();
        let program = compile_program(backend, WEB_VERTEX_SHADER, WEB_FRAGMENT_SHADER).unwrap();
        for name in [PROJ_UNIFORM, VIEW_UNIFORM, MODEL_UNIFORM, COLOR_UNIFORM, MIX_UNIFORM] {
            assert!(backend.get_uniform_location(&program, name).is_ok(), "{name}");
        }
        assert!(backend.get_uniform_location(&program, TEXTURE_UNIFORM).is_ok());
    }

    #[test]
    fn core_shaders_declare_the_same_interface() {
        let backend = recording();
        let program = compile_program(backend, CORE_VERTEX_SHADER, CORE_FRAGMENT_SHADER).unwrap();
        for name in [
            PROJ_UNIFORM,
            VIEW_UNIFORM,
            MODEL_UNIFORM,
            COLOR_UNIFORM,
            TEXTURE_UNIFORM,
            MIX_UNIFORM,
        ] {
            assert!(backend.get_uniform_location(&program, name).is_ok(), "{name}");
        }
        for name in [POSITION_ATTRIBUTE, TEX_COORD_ATTRIBUTE] {
            assert!(backend.get_attrib_location(&program, name).is_ok(), "{name}");
        }
    }

    #[test]
    fn core_fragment_output_is_not_an_attribute() {
        let backend = recording();
        let program = compile_program(backend, CORE_VERTEX_SHADER, CORE_FRAGMENT_SHADER).unwrap();
        assert!(backend
            .get_attrib_location(&program, "frag_color")
            .unwrap_err()
            .is_not_found());
        assert!(backend
            .get_attrib_location(&program, "texture_coordinates")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn compile_program_deletes_stages_after_link() {
        let backend = recording();
        compile_program(backend, DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER).unwrap();
        let deletes = backend
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::DeleteShader { .. }))
            .count();
        assert_eq!(deletes, 2);
    }

    #[test]
    fn fragment_compile_failure_cleans_up_vertex_stage() {
        let backend = recording();
        let err = compile_program(backend, DEFAULT_VERTEX_SHADER, "garbage").unwrap_err();
        assert!(matches!(err, GgError::Compile { ref stage, .. } if stage == "fragment"));
        let calls = backend.calls();
        assert!(matches!(calls.last(), Some(Call::DeleteShader { .. })), "{calls:?}");
        assert!(!calls.iter().any(|c| matches!(c, Call::CreateProgram { .. })));
    }

    #[test]
    fn apply_view_uploads_projection_and_identity_view() {
        let backend = recording();
        let program =
            compile_program(backend, DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER).unwrap();
        backend.take_calls();

        let view = ViewConfig::new(800.0, 600.0);
        apply_view(backend, &program, &view).unwrap();

        let calls = backend.calls();
        assert_eq!(calls[0], Call::UseProgram { program });
        let matrices: Vec<&Vec<f32>> = calls
            .iter()
            .filter_map(|c| match c {
                Call::UniformMatrix4fv { values, .. } => Some(values),
                _ => None,
            })
            .collect();
        assert_eq!(matrices.len(), 2);
        assert_eq!(matrices[0].as_slice(), &view.projection().to_cols_array()[..]);
        assert_eq!(matrices[1].as_slice(), &glam::Mat4::IDENTITY.to_cols_array()[..]);
    }

    #[test]
    fn apply_view_reports_missing_projection_uniform() {
        let backend = recording();
        let program = compile_program(
            backend,
            "attribute vec3 vertex_position;\nvoid main() {}\n",
            "void main() {}\n",
        )
        .unwrap();
        let err = apply_view(backend, &program, &ViewConfig::default()).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains(PROJ_UNIFORM));
    }
}
