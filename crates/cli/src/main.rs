#![deny(unsafe_code)]
//! CLI binary for the gg rendering helper.
//!
//! Subcommands:
//! - `trace <scene>`: draw a demo scene on the recording backend and print
//!   every GPU call it issued
//! - `shaders`: print the default shader sources (`--core` for GLSL 3.30,
//!   `--web` for GLSL ES)

mod error;
mod logging;
mod scene;

use clap::{Parser, Subcommand};
use error::CliError;
use gg_core::headless::RecordingBackend;
use gg_core::{shader, Registry, ViewConfig};
use scene::SceneKind;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "gg", about = "Headless gg demo scenes")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draw one frame of a demo scene and print the recorded GPU calls.
    Trace {
        #[arg(value_enum)]
        scene: SceneKind,

        /// View width in pixels (overrides --view).
        #[arg(short = 'W', long)]
        width: Option<f32>,

        /// View height in pixels (overrides --view).
        #[arg(short = 'H', long)]
        height: Option<f32>,

        /// View configuration as a JSON string.
        #[arg(long, default_value = "{}")]
        view: String,

        /// PNG file for the texture scene (default: a generated checkerboard).
        #[arg(short, long)]
        texture: Option<PathBuf>,
    },
    /// Print the default shader sources.
    Shaders {
        /// Print the WebGL (GLSL ES 1.00) variants.
        #[arg(long, conflicts_with = "core")]
        web: bool,

        /// Print the GLSL 3.30 variants for core-profile contexts.
        #[arg(long)]
        core: bool,
    },
}

fn view_config(json: &str, width: Option<f32>, height: Option<f32>) -> Result<ViewConfig, CliError> {
    let mut view = ViewConfig::from_json(json)?;
    if let Some(w) = width {
        view.width = w;
    }
    if let Some(h) = height {
        view.height = h;
    }
    if view.width <= 0.0 || view.height <= 0.0 {
        return Err(CliError::Input(format!(
            "view size must be positive, got {}x{}",
            view.width, view.height
        )));
    }
    Ok(view)
}

fn shader_sources(web: bool, core: bool) -> (&'static str, &'static str) {
    if web {
        (shader::WEB_VERTEX_SHADER, shader::WEB_FRAGMENT_SHADER)
    } else if core {
        (shader::CORE_VERTEX_SHADER, shader::CORE_FRAGMENT_SHADER)
    } else {
        (shader::DEFAULT_VERTEX_SHADER, shader::DEFAULT_FRAGMENT_SHADER)
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Trace {
            scene,
            width,
            height,
            view,
            texture,
        } => {
            let view = view_config(&view, width, height)?;
            let registry = Registry::new();
            let backend = registry.register(RecordingBackend::new());
            scene::draw(backend, scene, &view, texture.as_deref())?;

            let calls = backend.take_calls();
            if cli.json {
                let info = serde_json::json!({
                    "scene": format!("{scene:?}").to_lowercase(),
                    "width": view.width,
                    "height": view.height,
                    "calls": calls,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for call in &calls {
                    println!("{call}");
                }
                eprintln!("{} calls", calls.len());
            }
        }
        Command::Shaders { web, core } => {
            let (vertex, fragment) = shader_sources(web, core);
            if cli.json {
                let info = serde_json::json!({ "vertex": vertex, "fragment": fragment });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("// vertex\n{vertex}\n// fragment\n{fragment}");
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn trace_parses_scene_and_size() {
        let cli = Cli::try_parse_from(["gg", "trace", "poly", "-W", "800", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Trace { scene, width, .. } => {
                assert_eq!(scene, SceneKind::Poly);
                assert_eq!(width, Some(800.0));
            }
            Command::Shaders { .. } => panic!("expected trace"),
        }
    }

    #[test]
    fn unknown_scene_is_rejected() {
        assert!(Cli::try_parse_from(["gg", "trace", "cube"]).is_err());
    }

    #[test]
    fn flags_override_view_json() {
        let view = view_config(r#"{"width": 320, "height": 200}"#, None, Some(100.0)).unwrap();
        assert_eq!((view.width, view.height), (320.0, 100.0));
    }

    #[test]
    fn bad_view_json_is_input_error() {
        let err = view_config("{nope", None, None).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn shaders_core_selects_glsl_330() {
        let cli = Cli::try_parse_from(["gg", "shaders", "--core"]).unwrap();
        let Command::Shaders { web, core } = cli.command else {
            panic!("expected shaders");
        };
        let (vertex, fragment) = shader_sources(web, core);
        assert!(vertex.starts_with("#version 330"));
        assert!(fragment.starts_with("#version 330"));
        assert!(shader_sources(false, false).0.starts_with("#version 120"));
    }

    #[test]
    fn shaders_rejects_web_with_core() {
        assert!(Cli::try_parse_from(["gg", "shaders", "--web", "--core"]).is_err());
    }

    #[test]
    fn trace_registers_backend_and_draws() {
        let cli = Cli::try_parse_from(["gg", "trace", "triangle", "--json"]).unwrap();
        run(cli).unwrap();
    }

    #[test]
    fn non_positive_size_is_input_error() {
        let err = view_config("{}", Some(0.0), None).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }
}
