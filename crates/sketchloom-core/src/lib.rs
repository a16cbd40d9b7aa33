//! Sketchloom Core Library
//!
//! Platform-agnostic editing core for the Sketchloom design canvas: the
//! scene graph, layer panel model, snapshot history, alignment and grouping,
//! and the keyboard command layer, tied together by [`Editor`].

pub mod config;
pub mod editor;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod history;
pub mod input;
pub mod layers;
pub mod media;
pub mod presets;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod transform;
pub mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, OutlineShape, UiState};
pub use export::{ExportArtifact, ExportEncoder, ExportError, ExportFormat, ExportPlan};
pub use geometry::{Origin, Transform};
pub use history::{HistoryManager, RestoreOutcome};
pub use input::{FocusTarget, KeyEvent, Modifiers};
pub use layers::{Layer, LayerRegistry};
pub use presets::CanvasPreset;
pub use scene::{Scene, SceneEvent};
pub use selection::Selection;
pub use shapes::{ObjectKind, SceneObject, SerializableColor, ShapeId};
pub use shortcuts::EditorCommand;
pub use snap::{GRID_SIZE, SnapResult, snap_to_grid};
pub use transform::{Alignment, Axis};
pub use viewport::Viewport;
