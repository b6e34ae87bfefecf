//! Failures of the `gg` binary and the exit code each one maps to.
//!
//! | Code | Cause |
//! |------|-------|
//! | 2    | bad arguments (reported by clap before `run`) |
//! | 10   | the backend refused a shader, program, lookup or upload |
//! | 11   | a `--texture` file could not be read |
//! | 12   | the texture bytes or `--view` JSON were unusable |
//! | 13   | the call trace could not be written as JSON |

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use gg_core::GgError;

#[derive(Debug)]
pub enum CliError {
    /// Compile, link, lookup or allocation failure while drawing.
    Graphics(GgError),
    /// The texture file named on the command line could not be read.
    TextureRead { path: PathBuf, source: io::Error },
    /// Arguments that parsed but describe nothing drawable.
    Input(String),
    /// Writing the JSON trace failed.
    Serialization(serde_json::Error),
}

impl CliError {
    pub fn texture_read(path: &Path, source: io::Error) -> Self {
        CliError::TextureRead {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Graphics(_) => 10,
            CliError::TextureRead { .. } => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Graphics(e) => write!(f, "{e}"),
            CliError::TextureRead { path, source } => {
                write!(f, "cannot read texture {}: {source}", path.display())
            }
            CliError::Input(msg) => f.write_str(msg),
            CliError::Serialization(e) => write!(f, "cannot encode trace: {e}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::Graphics(e) => Some(e),
            CliError::TextureRead { source, .. } => Some(source),
            CliError::Input(_) => None,
            CliError::Serialization(e) => Some(e),
        }
    }
}

/// Undecodable images and bad view JSON are the user's input; everything
/// else the backend reports is a graphics failure.
impl From<GgError> for CliError {
    fn from(e: GgError) -> Self {
        match e {
            GgError::Decode(msg) | GgError::Config(msg) => CliError::Input(msg),
            other => CliError::Graphics(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_texture_names_the_path_and_exits_11() {
        let err = CliError::texture_read(
            Path::new("assets/ship.png"),
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.exit_code(), 11);
        assert_eq!(err.to_string(), "cannot read texture assets/ship.png: no such file");
        assert!(err.source().is_some());
    }

    #[test]
    fn link_failure_exits_10_and_keeps_driver_log() {
        let err = CliError::from(GgError::Link("varying mismatch".into()));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("varying mismatch"));
    }

    #[test]
    fn missing_uniform_is_a_graphics_failure() {
        let err = CliError::from(GgError::NotFound {
            kind: gg_core::HandleKind::Uniform,
            name: "color".into(),
        });
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("color"));
    }

    #[test]
    fn undecodable_png_is_an_input_error() {
        let err = CliError::from(GgError::Decode("ship.png: not a png".into()));
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("ship.png"));
        assert!(err.source().is_none());
    }

    #[test]
    fn bad_view_config_is_an_input_error() {
        let err = CliError::from(GgError::Config("width must be positive".into()));
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn json_encoding_failure_exits_13() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = CliError::from(json_err);
        assert_eq!(err.exit_code(), 13);
        assert!(err.to_string().starts_with("cannot encode trace"));
    }
}
