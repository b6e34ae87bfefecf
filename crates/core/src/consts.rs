//! Symbolic GL constants shared by every backend.
//!
//! Desktop GL and WebGL agree on the numeric token values of everything the
//! drawing layer uses, so call sites name these constants and each backend
//! forwards the value unchanged. Passing a value that is not defined here is
//! a caller error.

/// An unsigned 32-bit symbolic constant (blend factor, buffer target, draw
/// mode, texture parameter, shader stage, ...).
pub type Enum = u32;

// Capabilities.
pub const BLEND: Enum = 0x0BE2;
pub const CULL_FACE: Enum = 0x0B44;
pub const DEPTH_TEST: Enum = 0x0B71;

// Depth functions.
pub const LESS: Enum = 0x0201;
pub const LEQUAL: Enum = 0x0203;
pub const ALWAYS: Enum = 0x0207;

// Blend factors.
pub const ZERO: Enum = 0;
pub const ONE: Enum = 1;
pub const SRC_ALPHA: Enum = 0x0302;
pub const ONE_MINUS_SRC_ALPHA: Enum = 0x0303;

// Clear mask bits.
pub const DEPTH_BUFFER_BIT: Enum = 0x0000_0100;
pub const COLOR_BUFFER_BIT: Enum = 0x0000_4000;

// Buffers.
pub const ARRAY_BUFFER: Enum = 0x8892;
pub const STATIC_DRAW: Enum = 0x88E4;
pub const DYNAMIC_DRAW: Enum = 0x88E8;

// Element types.
pub const UNSIGNED_BYTE: Enum = 0x1401;
pub const FLOAT: Enum = 0x1406;

// Draw modes.
pub const TRIANGLES: Enum = 0x0004;
pub const TRIANGLE_STRIP: Enum = 0x0005;
pub const TRIANGLE_FAN: Enum = 0x0006;

// Shader stages.
pub const FRAGMENT_SHADER: Enum = 0x8B30;
pub const VERTEX_SHADER: Enum = 0x8B31;

// Textures.
pub const TEXTURE_2D: Enum = 0x0DE1;
pub const TEXTURE0: Enum = 0x84C0;
pub const RGBA: Enum = 0x1908;
pub const NEAREST: Enum = 0x2600;
pub const LINEAR: Enum = 0x2601;
pub const TEXTURE_MAG_FILTER: Enum = 0x2800;
pub const TEXTURE_MIN_FILTER: Enum = 0x2801;
pub const TEXTURE_WRAP_S: Enum = 0x2802;
pub const TEXTURE_WRAP_T: Enum = 0x2803;
pub const CLAMP_TO_EDGE: Enum = 0x812F;

/// Human-readable name of a shader stage, used in compile errors.
pub fn stage_name(stage: Enum) -> &'static str {
    match stage {
        VERTEX_SHADER => "vertex",
        FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_name_maps_known_stages() {
        assert_eq!(stage_name(VERTEX_SHADER), "vertex");
        assert_eq!(stage_name(FRAGMENT_SHADER), "fragment");
        assert_eq!(stage_name(TEXTURE_2D), "unknown");
    }

    #[test]
    fn clear_bits_do_not_overlap() {
        assert_eq!(COLOR_BUFFER_BIT & DEPTH_BUFFER_BIT, 0);
    }

    #[cfg(feature = "render")]
    #[test]
    fn constants_match_native_gl_tokens() {
        let pairs = [
            (BLEND, glow::BLEND),
            (CULL_FACE, glow::CULL_FACE),
            (DEPTH_TEST, glow::DEPTH_TEST),
            (LESS, glow::LESS),
            (LEQUAL, glow::LEQUAL),
            (ALWAYS, glow::ALWAYS),
            (ZERO, glow::ZERO),
            (ONE, glow::ONE),
            (SRC_ALPHA, glow::SRC_ALPHA),
            (ONE_MINUS_SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA),
            (DEPTH_BUFFER_BIT, glow::DEPTH_BUFFER_BIT),
            (COLOR_BUFFER_BIT, glow::COLOR_BUFFER_BIT),
            (ARRAY_BUFFER, glow::ARRAY_BUFFER),
            (STATIC_DRAW, glow::STATIC_DRAW),
            (DYNAMIC_DRAW, glow::DYNAMIC_DRAW),
            (UNSIGNED_BYTE, glow::UNSIGNED_BYTE),
            (FLOAT, glow::FLOAT),
            (TRIANGLES, glow::TRIANGLES),
            (TRIANGLE_STRIP, glow::TRIANGLE_STRIP),
            (TRIANGLE_FAN, glow::TRIANGLE_FAN),
            (FRAGMENT_SHADER, glow::FRAGMENT_SHADER),
            (VERTEX_SHADER, glow::VERTEX_SHADER),
            (TEXTURE_2D, glow::TEXTURE_2D),
            (TEXTURE0, glow::TEXTURE0),
            (RGBA, glow::RGBA),
            (NEAREST, glow::NEAREST),
            (LINEAR, glow::LINEAR),
            (TEXTURE_MAG_FILTER, glow::TEXTURE_MAG_FILTER),
            (TEXTURE_MIN_FILTER, glow::TEXTURE_MIN_FILTER),
            (TEXTURE_WRAP_S, glow::TEXTURE_WRAP_S),
            (TEXTURE_WRAP_T, glow::TEXTURE_WRAP_T),
            (CLAMP_TO_EDGE, glow::CLAMP_TO_EDGE),
        ];
        for (i, (ours, native)) in pairs.iter().enumerate() {
            assert_eq!(ours, native, "constant #{i} differs: 0x{ours:04X} vs 0x{native:04X}");
        }
    }
}
