//! Canvas size presets.

use kurbo::Size;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanvasPreset {
    Default,
    A4,
    InstagramPost,
    InstagramStory,
    FacebookCover,
    YoutubeThumbnail,
    TwitterPost,
    Poster,
}

impl CanvasPreset {
    pub const ALL: [CanvasPreset; 8] = [
        CanvasPreset::Default,
        CanvasPreset::A4,
        CanvasPreset::InstagramPost,
        CanvasPreset::InstagramStory,
        CanvasPreset::FacebookCover,
        CanvasPreset::YoutubeThumbnail,
        CanvasPreset::TwitterPost,
        CanvasPreset::Poster,
    ];

    pub fn size(self) -> Size {
        let (w, h) = match self {
            CanvasPreset::Default => (1000.0, 700.0),
            CanvasPreset::A4 => (2480.0, 3508.0),
            CanvasPreset::InstagramPost => (1080.0, 1080.0),
            CanvasPreset::InstagramStory => (1080.0, 1920.0),
            CanvasPreset::FacebookCover => (820.0, 312.0),
            CanvasPreset::YoutubeThumbnail => (1280.0, 720.0),
            CanvasPreset::TwitterPost => (1024.0, 512.0),
            CanvasPreset::Poster => (2550.0, 3300.0),
        };
        Size::new(w, h)
    }

    pub fn label(self) -> &'static str {
        match self {
            CanvasPreset::Default => "Default",
            CanvasPreset::A4 => "A4",
            CanvasPreset::InstagramPost => "Instagram Post",
            CanvasPreset::InstagramStory => "Instagram Story",
            CanvasPreset::FacebookCover => "Facebook Cover",
            CanvasPreset::YoutubeThumbnail => "YouTube Thumbnail",
            CanvasPreset::TwitterPost => "Twitter Post",
            CanvasPreset::Poster => "Poster",
        }
    }

    /// Look a preset up by its label or kebab-case name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|p| p.label().to_ascii_lowercase() == wanted)
    }
}
