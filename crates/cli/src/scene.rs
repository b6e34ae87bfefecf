//! Demo scenes drawn once against any registered backend.

use std::path::Path;
use std::rc::Rc;

use clap::ValueEnum;
use gg_core::backend::Backend;
use gg_core::headless::RecordingBackend;
use gg_core::{consts, shader, Poly, Registered, Sprite, Texture, Vec2, ViewConfig};
use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::CliError;

/// Which demo to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// One magenta triangle in the middle of the view.
    Triangle,
    /// A rotated hexagon next to a translucent square.
    Poly,
    /// A textured sprite centered in the view.
    Texture,
}

/// Side length of the generated checkerboard texture.
pub const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;

/// Opaque black and white squares, `CHECKER_CELL` pixels each.
pub fn checkerboard(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

/// Points of a regular polygon around `center`, first vertex straight up.
pub fn regular_polygon(center: Vec2, radius: f32, sides: usize) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / sides as f32;
            center + Vec2::new(angle.sin(), -angle.cos()) * radius
        })
        .collect()
}

fn begin_frame<B: Backend>(
    backend: Registered<'_, B>,
    view: &ViewConfig,
) -> Result<B::Program, CliError> {
    backend.enable(consts::BLEND);
    backend.blend_func(consts::SRC_ALPHA, consts::ONE_MINUS_SRC_ALPHA);

    let program = shader::compile_program(
        backend,
        shader::DEFAULT_VERTEX_SHADER,
        shader::DEFAULT_FRAGMENT_SHADER,
    )?;
    shader::apply_view(backend, &program, view)?;

    backend.clear_color(0.5, 0.5, 0.5, 1.0);
    backend.clear(consts::COLOR_BUFFER_BIT | consts::DEPTH_BUFFER_BIT);
    Ok(program)
}

fn draw_triangle<B: Backend>(
    backend: Registered<'_, B>,
    view: &ViewConfig,
) -> Result<(), CliError> {
    let program = begin_frame(backend, view)?;
    let (cx, cy) = (view.width / 2.0, view.height / 2.0);
    let mut triangle = Poly::new(
        backend,
        &program,
        &[
            Vec2::new(cx, cy - 50.0),
            Vec2::new(cx - 50.0, cy + 50.0),
            Vec2::new(cx + 50.0, cy + 50.0),
        ],
    )?;
    triangle.set_color(1.0, 0.0, 1.0, 1.0);
    triangle.draw(backend)?;

    triangle.destroy(backend);
    backend.delete_program(program);
    Ok(())
}

fn draw_polys<B: Backend>(
    backend: Registered<'_, B>,
    view: &ViewConfig,
) -> Result<(), CliError> {
    let program = begin_frame(backend, view)?;
    let third = view.width / 3.0;
    let mid = view.height / 2.0;

    let mut hexagon = Poly::new(
        backend,
        &program,
        &regular_polygon(Vec2::new(third, mid), 60.0, 6),
    )?;
    hexagon.set_color(0.2, 0.6, 1.0, 1.0);
    hexagon.set_rotation(30.0);

    let mut square = Poly::new(
        backend,
        &program,
        &[
            Vec2::new(2.0 * third - 40.0, mid - 40.0),
            Vec2::new(2.0 * third - 40.0, mid + 40.0),
            Vec2::new(2.0 * third + 40.0, mid + 40.0),
            Vec2::new(2.0 * third + 40.0, mid - 40.0),
        ],
    )?;
    square.set_color(1.0, 0.8, 0.0, 0.5);
    square.scale_by(1.5);

    hexagon.draw(backend)?;
    square.draw(backend)?;

    hexagon.destroy(backend);
    square.destroy(backend);
    backend.delete_program(program);
    Ok(())
}

fn draw_sprite<B: Backend>(
    backend: Registered<'_, B>,
    view: &ViewConfig,
    texture: Texture<B>,
) -> Result<(), CliError> {
    let program = begin_frame(backend, view)?;
    let texture = Rc::new(texture);
    let mut sprite = Sprite::new(backend, &program, Rc::clone(&texture))?;
    sprite.set_position(
        (view.width - sprite.width()) / 2.0,
        (view.height - sprite.height()) / 2.0,
    );
    sprite.draw(backend)?;

    sprite.destroy(backend);
    if let Ok(texture) = Rc::try_unwrap(texture) {
        texture.destroy(backend);
    }
    backend.delete_program(program);
    Ok(())
}

/// Loads `path` as a texture, or generates a checkerboard when `None`.
pub fn load_texture(
    backend: Registered<'_, RecordingBackend>,
    path: Option<&Path>,
) -> Result<Texture<RecordingBackend>, CliError> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| CliError::texture_read(path, e))?;
            Ok(Texture::from_png_bytes(backend, &bytes)?)
        }
        None => Ok(Texture::from_image(
            backend,
            &DynamicImage::ImageRgba8(checkerboard(CHECKER_SIZE)),
        )?),
    }
}

/// Draws one frame of `kind` on `backend`, releasing everything afterwards.
pub fn draw(
    backend: Registered<'_, RecordingBackend>,
    kind: SceneKind,
    view: &ViewConfig,
    texture: Option<&Path>,
) -> Result<(), CliError> {
    log::debug!("drawing {kind:?} scene at {}x{}", view.width, view.height);
    match kind {
        SceneKind::Triangle => draw_triangle(backend, view),
        SceneKind::Poly => draw_polys(backend, view),
        SceneKind::Texture => {
            let texture = load_texture(backend, texture)?;
            draw_sprite(backend, view, texture)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gg_core::headless::Call;
    use gg_core::Registry;

    fn draws(backend: &RecordingBackend) -> Vec<Call> {
        backend
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::DrawArrays { .. }))
            .collect()
    }

    #[test]
    fn triangle_scene_draws_three_vertex_fan() {
        let registry = Registry::new();
        let backend = registry.register(RecordingBackend::new());
        draw(backend, SceneKind::Triangle, &ViewConfig::default(), None).unwrap();
        assert_eq!(
            draws(&backend),
            vec![Call::DrawArrays {
                mode: consts::TRIANGLE_FAN,
                first: 0,
                count: 3
            }]
        );
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn poly_scene_draws_hexagon_then_square() {
        let registry = Registry::new();
        let backend = registry.register(RecordingBackend::new());
        draw(backend, SceneKind::Poly, &ViewConfig::new(900.0, 600.0), None).unwrap();
        let counts: Vec<i32> = draws(&backend)
            .iter()
            .map(|c| match c {
                Call::DrawArrays { count, .. } => *count,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(counts, vec![6, 4]);
    }

    #[test]
    fn texture_scene_uses_checkerboard_by_default() {
        let registry = Registry::new();
        let backend = registry.register(RecordingBackend::new());
        draw(backend, SceneKind::Texture, &ViewConfig::default(), None).unwrap();
        let uploaded = backend.calls().into_iter().find_map(|c| match c {
            Call::TexImage2D { width, height, .. } => Some((width, height)),
            _ => None,
        });
        assert_eq!(
            uploaded,
            Some((CHECKER_SIZE as i32, CHECKER_SIZE as i32))
        );
        assert_eq!(backend.live_textures(), 0);
        assert_eq!(draws(&backend).len(), 1);
    }

    #[test]
    fn texture_scene_reads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        checkerboard(16).save(&path).unwrap();

        let registry = Registry::new();
        let backend = registry.register(RecordingBackend::new());
        draw(backend, SceneKind::Texture, &ViewConfig::default(), Some(&path)).unwrap();
        assert!(backend
            .calls()
            .iter()
            .any(|c| matches!(c, Call::TexImage2D { width: 16, height: 16, .. })));
    }

    #[test]
    fn missing_texture_file_is_io_error() {
        let registry = Registry::new();
        let backend = registry.register(RecordingBackend::new());
        let err = draw(
            backend,
            SceneKind::Texture,
            &ViewConfig::default(),
            Some(Path::new("/no/such/texture.png")),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let img = checkerboard(16);
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(8, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(8, 8), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn regular_polygon_starts_straight_up() {
        let pts = regular_polygon(Vec2::new(100.0, 100.0), 10.0, 4);
        assert_eq!(pts.len(), 4);
        assert!((pts[0] - Vec2::new(100.0, 90.0)).length() < 1e-4);
        assert!((pts[1] - Vec2::new(110.0, 100.0)).length() < 1e-4);
    }
}
