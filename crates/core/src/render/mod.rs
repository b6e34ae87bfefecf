//! Desktop OpenGL backend.
//!
//! This module is only available when the `render` feature is enabled.
//! [`GlBackend`] forwards every [`crate::Backend`] call to a `glow::Context`
//! created by the host application (glutin, SDL, winit, ...).

pub mod context;

pub use context::GlBackend;
