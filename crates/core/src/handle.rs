//! Opaque GPU resource handles.
//!
//! Every [`Backend`](crate::backend::Backend) names its own concrete handle
//! types (GL object names on the desktop, foreign `WebGl*` objects in the
//! browser). The drawing layer only stores and forwards them; it never looks
//! inside.

use std::fmt;

/// Bound shared by every backend handle type.
///
/// Handles are cheap to clone: cloning copies the reference to the GPU
/// object, never the object itself.
pub trait Handle: Clone + fmt::Debug {}

impl<T: Clone + fmt::Debug> Handle for T {}

/// The two kinds of named program inputs that can be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Uniform,
    Attribute,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Uniform => f.write_str("uniform"),
            HandleKind::Attribute => f.write_str("attribute"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_kind_displays_lowercase() {
        assert_eq!(HandleKind::Uniform.to_string(), "uniform");
        assert_eq!(HandleKind::Attribute.to_string(), "attribute");
    }

    #[test]
    fn plain_ids_satisfy_handle_bound() {
        fn assert_handle<T: Handle>() {}
        assert_handle::<u32>();
        assert_handle::<i32>();
    }
}
