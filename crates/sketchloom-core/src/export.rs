//! Export planning and JSON export.
//!
//! Raster, vector and PDF bytes come from an [`ExportEncoder`] supplied by
//! the host; the core decides what to produce (format, pixel size, file
//! name) and produces the JSON document itself.

use crate::scene::Scene;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("Encoder error: {0}")]
    Encoder(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Svg,
    Pdf,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "svg" => Ok(ExportFormat::Svg),
            "pdf" => Ok(ExportFormat::Pdf),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

/// PDF page layout. The page holds one rasterized image of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfPage {
    pub orientation: PageOrientation,
    pub width: f64,
    pub height: f64,
}

/// What an export will produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPlan {
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub multiplier: f64,
    pub file_name: String,
    pub page: Option<PdfPage>,
}

impl ExportPlan {
    /// Plan an export of a canvas of the given size at a pixel-density
    /// multiplier.
    pub fn new(format: ExportFormat, canvas: Size, multiplier: f64) -> Self {
        let width = (canvas.width * multiplier).round().max(0.0) as u32;
        let height = (canvas.height * multiplier).round().max(0.0) as u32;
        let page = (format == ExportFormat::Pdf).then(|| PdfPage {
            orientation: PageOrientation::Landscape,
            width: width as f64,
            height: height as f64,
        });
        Self {
            format,
            width,
            height,
            multiplier,
            file_name: format!("design.{}", format.extension()),
            page,
        }
    }
}

/// Produces file bytes for raster, vector and PDF exports.
pub trait ExportEncoder {
    fn encode(&self, scene: &Scene, plan: &ExportPlan) -> ExportResult<Vec<u8>>;
}

/// A finished export, ready to be downloaded or written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialize the scene's content (helpers excluded) as a JSON document.
pub fn export_json(scene: &Scene) -> ExportResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&scene.snapshot())?)
}

/// Run an export by format name.
///
/// Unknown formats fail before anything is produced. JSON is handled here;
/// every other format needs an encoder.
pub fn export(
    scene: &Scene,
    format: &str,
    multiplier: f64,
    encoder: Option<&dyn ExportEncoder>,
) -> ExportResult<ExportArtifact> {
    let format: ExportFormat = format.parse().inspect_err(|e| log::warn!("Export aborted: {}", e))?;
    let plan = ExportPlan::new(format, scene.size(), multiplier);
    let bytes = match (format, encoder) {
        (ExportFormat::Json, _) => export_json(scene)?,
        (_, Some(encoder)) => encoder.encode(scene, &plan)?,
        (_, None) => {
            return Err(ExportError::Encoder(format!(
                "no encoder available for {}",
                format.extension()
            )));
        }
    };
    log::info!("Exported {} ({} bytes)", plan.file_name, bytes.len());
    Ok(ExportArtifact {
        file_name: plan.file_name,
        mime_type: format.mime_type(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;
    use crate::shapes::{ObjectKind, ObjectStyle, Rectangle, SceneObject, SerializableColor};

    struct FakeEncoder;

    impl ExportEncoder for FakeEncoder {
        fn encode(&self, _scene: &Scene, plan: &ExportPlan) -> ExportResult<Vec<u8>> {
            Ok(format!("{}x{}", plan.width, plan.height).into_bytes())
        }
    }

    fn scene() -> Scene {
        let mut scene = Scene::new(Size::new(1000.0, 700.0), SerializableColor::white());
        scene.add(SceneObject::new(
            ObjectKind::Rect(Rectangle::new(10.0, 10.0)),
            Transform::default(),
            ObjectStyle::default(),
        ));
        scene.add_helper(SceneObject::new(
            ObjectKind::Rect(Rectangle::new(1.0, 1.0)),
            Transform::default(),
            ObjectStyle::default(),
        ));
        scene
    }

    #[test]
    fn test_plan() {
        let plan = ExportPlan::new(ExportFormat::Png, Size::new(1000.0, 700.0), 2.0);
        assert_eq!((plan.width, plan.height), (2000, 1400));
        assert_eq!(plan.file_name, "design.png");
        assert!(plan.page.is_none());

        let plan = ExportPlan::new(ExportFormat::Pdf, Size::new(1000.0, 700.0), 2.0);
        let page = plan.page.unwrap();
        assert_eq!(page.orientation, PageOrientation::Landscape);
        assert_eq!((page.width, page.height), (2000.0, 1400.0));
    }

    #[test]
    fn test_unsupported_format() {
        let err = export(&scene(), "psd", 2.0, Some(&FakeEncoder)).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(f) if f == "psd"));
    }

    #[test]
    fn test_json_excludes_helpers() {
        let artifact = export(&scene(), "json", 2.0, None).unwrap();
        assert_eq!(artifact.file_name, "design.json");
        let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(value["objects"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_encoder_formats() {
        let artifact = export(&scene(), "JPG", 2.0, Some(&FakeEncoder)).unwrap();
        assert_eq!(artifact.file_name, "design.jpeg");
        assert_eq!(artifact.bytes, b"2000x1400");
        assert!(matches!(
            export(&scene(), "svg", 2.0, None),
            Err(ExportError::Encoder(_))
        ));
    }
}
