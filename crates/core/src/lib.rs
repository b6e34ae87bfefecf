#![deny(unsafe_code)]
//! Core of the gg 2D rendering helper.
//!
//! Provides the [`Backend`] contract over a GL-like graphics API, the
//! process-wide [`Registry`], and the drawing primitives built on it:
//! [`Poly`] (flat-colored convex polygons), [`Sprite`] (textured quads) and
//! [`Texture`]. Every primitive carries a [`Transform`] and draws through a
//! [`Registered`] backend, which only the registry hands out.
//!
//! Backends shipped here: [`headless::RecordingBackend`], an in-memory GPU
//! that records every call, and (with the `render` feature)
//! [`render::GlBackend`] over `glow`. The browser backend lives in `gg-web`.

pub mod backend;
pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod handle;
pub mod headless;
pub mod poly;
pub mod registry;
pub mod shader;
pub mod sprite;
pub mod texture;
pub mod transform;

#[cfg(feature = "render")]
pub mod render;

pub use backend::Backend;
pub use config::ViewConfig;
pub use consts::Enum;
pub use error::GgError;
pub use geometry::Aabb;
pub use glam::Vec2;
pub use handle::{Handle, HandleKind};
pub use poly::Poly;
pub use registry::{Registered, Registry, RegistryError};
pub use shader::{apply_view, compile_program};
pub use sprite::Sprite;
pub use texture::Texture;
pub use transform::Transform;
