//! Error types for the gg rendering layer.

use thiserror::Error;

use crate::handle::HandleKind;

/// Errors produced by backends and drawing primitives.
#[derive(Debug, Clone, Error)]
pub enum GgError {
    /// A shader stage failed to compile.
    ///
    /// The message carries the offending source followed by the driver's
    /// info log.
    #[error("compile shader ({stage}): {source_text}{log}")]
    Compile {
        /// The shader stage that failed (e.g. "vertex", "fragment").
        stage: String,
        /// The GLSL source handed to the driver.
        source_text: String,
        /// The driver's info log describing the error.
        log: String,
    },

    /// A program failed to link.
    #[error("link program: {0}")]
    Link(String),

    /// A uniform or attribute name is absent from a linked program.
    #[error("no {kind} named {name}")]
    NotFound {
        /// Whether a uniform or an attribute was requested.
        kind: HandleKind,
        /// The name that was looked up.
        name: String,
    },

    /// Image bytes could not be decoded, or a browser image failed to load.
    #[error("decode image: {0}")]
    Decode(String),

    /// The backend could not allocate a GPU object.
    #[error("create {0}")]
    Resource(String),

    /// A bounding box needs at least three vertices.
    #[error("can't compute bounding box for {0} vertices")]
    TooFewVertices(usize),

    /// A view configuration could not be parsed.
    #[error("invalid view config: {0}")]
    Config(String),
}

impl GgError {
    /// Returns true for a uniform/attribute lookup miss.
    ///
    /// Callers use this to tell an optional uniform that was optimized away
    /// apart from a broken shader.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GgError::NotFound { .. })
    }

    /// Lookup miss for a uniform.
    pub fn uniform_not_found(name: &str) -> Self {
        GgError::NotFound {
            kind: HandleKind::Uniform,
            name: name.to_string(),
        }
    }

    /// Lookup miss for a vertex attribute.
    pub fn attribute_not_found(name: &str) -> Self {
        GgError::NotFound {
            kind: HandleKind::Attribute,
            name: name.to_string(),
        }
    }
}
