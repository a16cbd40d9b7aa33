//! Video shape backed by the blob store.

use super::ShapeTrait;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// A video frame on the canvas.
///
/// Snapshots only carry the object id; the video bytes live in the blob
/// store under that same id. After a scene load the object is a placeholder
/// until [`crate::media::resolve_video_placeholders`] attaches a playable
/// source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub width: f64,
    pub height: f64,
    /// Playable handle (object URL or file URL). Never persisted.
    #[serde(skip)]
    pub source: Option<String>,
}

impl Video {
    /// Frame size used before the media reports its own dimensions.
    pub const DEFAULT_SIZE: Size = Size::new(300.0, 200.0);

    pub fn new(source: Option<String>) -> Self {
        Self {
            width: Self::DEFAULT_SIZE.width,
            height: Self::DEFAULT_SIZE.height,
            source,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.source.is_some()
    }
}

impl ShapeTrait for Video {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn type_name(&self) -> &'static str {
        "video"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_not_serialized() {
        let video = Video::new(Some("blob:abc".to_string()));
        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("source").is_none());

        let back: Video = serde_json::from_value(json).unwrap();
        assert!(!back.is_resolved());
        assert_eq!(back.size(), Video::DEFAULT_SIZE);
    }
}
