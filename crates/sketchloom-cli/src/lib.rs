//! Sketchloom command-line shell.
//!
//! Opens the editing session stored in a directory, restores it, runs one
//! command against it and leaves the updated session on disk.

use clap::{Parser, Subcommand, ValueEnum};
use kurbo::Size;
use sketchloom_core::export::ExportError;
use sketchloom_core::shortcuts::ShortcutRegistry;
use sketchloom_core::storage::{FileBlobStore, FileStore, StorageError};
use sketchloom_core::{Editor, EditorConfig, ExportFormat, ExportPlan, OutlineShape, SerializableColor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid colour: {0}")]
    InvalidColor(String),
    #[error("{0} has no outline variant")]
    NoOutline(&'static str),
    #[error("{0} is not a PNG, JPEG, GIF or WebP image")]
    UnsupportedImage(PathBuf),
}

#[derive(Parser, Debug)]
#[command(name = "sketchloom", about = "Inspect and edit a stored Sketchloom session")]
pub struct Cli {
    /// Session directory. Defaults to the platform data directory.
    #[arg(long, env = "SKETCHLOOM_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// JSON file overriding editor defaults.
    #[arg(long, env = "SKETCHLOOM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List layers, top-most last.
    Layers,
    /// Show the history cursor.
    History,
    Undo,
    Redo,
    /// Add an object with its default geometry.
    Add {
        #[arg(value_enum)]
        shape: ShapeArg,
        /// Transparent fill with an outline.
        #[arg(long, default_value_t = false)]
        outline: bool,
    },
    /// Embed an image file, scaled down to fit the canvas.
    Image {
        path: PathBuf,
        /// Natural width in pixels.
        #[arg(long)]
        width: f64,
        /// Natural height in pixels.
        #[arg(long)]
        height: f64,
    },
    /// Set the canvas background, e.g. `#075b5e`.
    Background { color: String },
    /// Remove every object and start a new history.
    Clear,
    /// Write `design.json` into a directory.
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Describe what exporting to a format would produce.
    Plan { format: String },
    /// List keyboard shortcuts.
    Shortcuts,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeArg {
    Rectangle,
    Star,
    Circle,
    Line,
    Triangle,
    Text,
}

impl ShapeArg {
    fn outline(self) -> Result<OutlineShape, CliError> {
        match self {
            ShapeArg::Rectangle => Ok(OutlineShape::Rect),
            ShapeArg::Star => Ok(OutlineShape::Star),
            ShapeArg::Circle => Ok(OutlineShape::Circle),
            ShapeArg::Triangle => Ok(OutlineShape::Triangle),
            ShapeArg::Line => Err(CliError::NoOutline("line")),
            ShapeArg::Text => Err(CliError::NoOutline("text")),
        }
    }
}

/// Load the editor config, falling back to defaults when the file is
/// missing or invalid.
pub fn load_config(path: Option<&Path>) -> EditorConfig {
    let Some(path) = path else {
        return EditorConfig::default();
    };
    match EditorConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config {}: {}", path.display(), e);
            EditorConfig::default()
        }
    }
}

/// Open the session stored under `data_dir` (or the default location).
pub async fn open_session(data_dir: Option<&Path>, config: EditorConfig) -> Result<Editor, CliError> {
    let store = match data_dir {
        Some(dir) => FileStore::new(dir.to_path_buf())?,
        None => FileStore::default_location()?,
    };
    let blobs = FileBlobStore::new(store.base_path().join("media"))?;
    log::info!("Opening session at {}", store.base_path().display());

    let mut editor = Editor::new(config, Arc::new(store), Arc::new(blobs));
    let outcome = editor.restore().await;
    log::debug!("Restore: {:?}", outcome);
    Ok(editor)
}

/// Run a command and return what to print.
pub async fn run(cli: Cli) -> Result<String, CliError> {
    let config = load_config(cli.config.as_deref());
    let mut editor = open_session(cli.data_dir.as_deref(), config).await?;

    let output = match cli.command {
        Command::Layers => serde_json::to_string_pretty(editor.layers())?,
        Command::History => {
            let history = editor.history();
            format!("{}/{}", history.index() + 1, history.len())
        }
        Command::Undo => moved("undo", editor.undo().await),
        Command::Redo => moved("redo", editor.redo().await),
        Command::Add { shape, outline } => {
            let id = if outline {
                editor.add_empty_shape(shape.outline()?)
            } else {
                match shape {
                    ShapeArg::Rectangle => editor.add_rectangle(),
                    ShapeArg::Star => editor.add_star(),
                    ShapeArg::Circle => editor.add_circle(),
                    ShapeArg::Line => editor.add_line(),
                    ShapeArg::Triangle => editor.add_triangle(),
                    ShapeArg::Text => editor.add_text(),
                }
            };
            editor.flush();
            id.to_string()
        }
        Command::Image { path, width, height } => {
            let data = std::fs::read(&path)?;
            let id = editor
                .add_image_bytes(&data, Size::new(width, height))
                .ok_or(CliError::UnsupportedImage(path))?;
            editor.flush();
            id.to_string()
        }
        Command::Background { color } => {
            let color = SerializableColor::from_hex(&color).ok_or(CliError::InvalidColor(color))?;
            editor.set_bg_color(color);
            color.to_hex()
        }
        Command::Clear => {
            editor.clear_canvas();
            String::new()
        }
        Command::Export { out } => {
            let artifact = editor.export("json", None)?;
            let path = out.join(&artifact.file_name);
            std::fs::write(&path, &artifact.bytes)?;
            path.display().to_string()
        }
        Command::Plan { format } => {
            let format: ExportFormat = format.parse()?;
            let plan = ExportPlan::new(format, editor.scene().size(), editor.config().export_multiplier);
            serde_json::to_string_pretty(&plan)?
        }
        Command::Shortcuts => ShortcutRegistry::all()
            .iter()
            .map(|s| format!("{:<16} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(output)
}

fn moved(action: &str, moved: bool) -> String {
    if moved {
        action.to_string()
    } else {
        format!("nothing to {action}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_in(dir: &Path, args: &[&str]) -> Result<String, CliError> {
        let mut argv = vec!["sketchloom", "--data-dir"];
        let dir = dir.to_str().unwrap();
        argv.push(dir);
        argv.extend_from_slice(args);
        pollster::block_on(run(Cli::try_parse_from(argv).unwrap()))
    }

    #[test]
    fn test_add_undo_redo_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        run_in(dir.path(), &["add", "rectangle"]).unwrap();
        run_in(dir.path(), &["add", "circle", "--outline"]).unwrap();
        assert_eq!(run_in(dir.path(), &["history"]).unwrap(), "3/3");

        assert_eq!(run_in(dir.path(), &["undo"]).unwrap(), "undo");
        let layers: serde_json::Value =
            serde_json::from_str(&run_in(dir.path(), &["layers"]).unwrap()).unwrap();
        assert_eq!(layers.as_array().map(Vec::len), Some(1));
        assert_eq!(layers[0]["type"], "rect");

        assert_eq!(run_in(dir.path(), &["redo"]).unwrap(), "redo");
        assert_eq!(run_in(dir.path(), &["redo"]).unwrap(), "nothing to redo");
    }

    #[test]
    fn test_export_and_plan() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        run_in(dir.path(), &["add", "text"]).unwrap();
        let path = run_in(dir.path(), &["export", "--out", out.path().to_str().unwrap()]).unwrap();
        assert!(path.ends_with("design.json"));
        assert!(out.path().join("design.json").exists());

        let plan: serde_json::Value =
            serde_json::from_str(&run_in(dir.path(), &["plan", "pdf"]).unwrap()).unwrap();
        assert_eq!(plan["width"], 2000);
        assert_eq!(plan["page"]["orientation"], "landscape");
        assert!(matches!(
            run_in(dir.path(), &["plan", "psd"]),
            Err(CliError::Export(ExportError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_background_persists() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run_in(dir.path(), &["background", "#FF0000"]).unwrap(), "#ff0000");
        let editor = pollster::block_on(open_session(Some(dir.path()), EditorConfig::default())).unwrap();
        assert_eq!(editor.scene().background(), SerializableColor::new(255, 0, 0, 255));
        assert!(run_in(dir.path(), &["background", "teal"]).is_err());
    }

    #[test]
    fn test_line_has_no_outline() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            run_in(dir.path(), &["add", "line", "--outline"]),
            Err(CliError::NoOutline("line"))
        ));
    }

    #[test]
    fn test_image_upload() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("pixel.png");
        std::fs::write(&png, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();
        run_in(dir.path(), &["image", png.to_str().unwrap(), "--width", "2000", "--height", "1400"]).unwrap();
        let layers: serde_json::Value =
            serde_json::from_str(&run_in(dir.path(), &["layers"]).unwrap()).unwrap();
        assert_eq!(layers[0]["type"], "image");

        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "hello").unwrap();
        assert!(matches!(
            run_in(dir.path(), &["image", notes.to_str().unwrap(), "--width", "10", "--height", "10"]),
            Err(CliError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config(Some(&path)), EditorConfig::default());
    }
}
