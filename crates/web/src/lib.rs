#![deny(unsafe_code)]
//! Browser backend for gg.
//!
//! [`WebGlBackend`] implements [`gg_core::Backend`] over a WebGL2 context
//! obtained from a canvas. Textures come from [`load_texture`], which waits
//! for the browser to finish decoding the image.

pub mod backend;
pub mod image;

use std::rc::Rc;

use gg_core::{consts, shader, Backend, Poly, Registry, Sprite, Vec2, ViewConfig};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub use backend::WebGlBackend;
pub use image::{load_image, load_texture};

thread_local! {
    // Leaked so `start` can hold the registered backend across awaits.
    static REGISTRY: &'static Registry<WebGlBackend> = Box::leak(Box::new(Registry::new()));
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn context_for(canvas_id: &str) -> Result<(HtmlCanvasElement, WebGl2RenderingContext), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()?;
    let gl = canvas
        .get_context("webgl2")?
        .ok_or_else(|| JsValue::from_str("webgl2 unavailable"))?
        .dyn_into::<WebGl2RenderingContext>()?;
    Ok((canvas, gl))
}

/// Draws a triangle and a sprite of `image_url` onto the canvas `canvas_id`.
///
/// Registers the WebGL backend for this page before touching the GPU;
/// calling it twice panics.
#[wasm_bindgen]
pub async fn start(canvas_id: String, image_url: String) -> Result<(), JsValue> {
    let (canvas, context) = context_for(&canvas_id)?;
    let view = ViewConfig::new(canvas.width() as f32, canvas.height() as f32);
    let gl = REGISTRY.with(|registry| *registry).register(WebGlBackend::new(context));

    let texture = Rc::new(load_texture(gl, &image_url).await.map_err(to_js)?);

    gl.enable(consts::BLEND);
    gl.blend_func(consts::SRC_ALPHA, consts::ONE_MINUS_SRC_ALPHA);

    let program =
        shader::compile_program(gl, shader::WEB_VERTEX_SHADER, shader::WEB_FRAGMENT_SHADER)
            .map_err(to_js)?;
    shader::apply_view(gl, &program, &view).map_err(to_js)?;

    let (w, h) = (view.width, view.height);
    let mut triangle = Poly::new(
        gl,
        &program,
        &[
            Vec2::new(w / 2.0, h / 4.0),
            Vec2::new(w / 4.0, h * 3.0 / 4.0),
            Vec2::new(w * 3.0 / 4.0, h * 3.0 / 4.0),
        ],
    )
    .map_err(to_js)?;
    triangle.set_color(1.0, 0.0, 1.0, 1.0);

    let mut sprite = Sprite::new(gl, &program, texture).map_err(to_js)?;
    sprite.set_position(w - sprite.width() - 16.0, 16.0);

    gl.clear_color(0.5, 0.5, 0.5, 1.0);
    gl.clear(consts::COLOR_BUFFER_BIT | consts::DEPTH_BUFFER_BIT);
    triangle.draw(gl).map_err(to_js)?;
    sprite.draw(gl).map_err(to_js)?;
    log::debug!("gg: drew demo scene on #{canvas_id}");
    Ok(())
}
