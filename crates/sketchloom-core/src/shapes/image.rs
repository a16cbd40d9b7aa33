//! Image shape for embedding raster images.

use super::ShapeTrait;
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Image format for embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }
        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A raster image referenced by URL (usually an inline data URL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub width: f64,
    pub height: f64,
}

impl Image {
    pub fn from_url(src: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            src: src.into(),
            width,
            height,
        }
    }

    /// Embed raw image bytes as a data URL.
    ///
    /// Returns `None` when the bytes are not a recognised image format.
    pub fn from_bytes(data: &[u8], width: f64, height: f64) -> Option<Self> {
        let format = ImageFormat::from_magic_bytes(data)?;
        let src = format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data));
        Some(Self::from_url(src, width, height))
    }

    /// Scale the image to fit within max dimensions while preserving aspect ratio.
    pub fn fit_within(mut self, max_width: f64, max_height: f64) -> Self {
        if self.width <= 0.0 || self.height <= 0.0 {
            return self;
        }
        let scale = (max_width / self.width).min(max_height / self.height).min(1.0);
        self.width *= scale;
        self.height *= scale;
        self
    }
}

impl ShapeTrait for Image {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn type_name(&self) -> &'static str {
        "image"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_magic_bytes(&PNG_HEADER), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"hello"), None);
    }

    #[test]
    fn test_bytes_become_data_url() {
        let img = Image::from_bytes(&PNG_HEADER, 10.0, 10.0).unwrap();
        assert_eq!(img.src, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_unknown_bytes_rejected() {
        assert!(Image::from_bytes(b"not an image", 1.0, 1.0).is_none());
    }

    #[test]
    fn test_fit_within() {
        let img = Image::from_url("a.png", 1000.0, 500.0).fit_within(400.0, 400.0);
        assert!((img.width - 400.0).abs() < 0.01);
        assert!((img.height - 200.0).abs() < 0.01);

        let small = Image::from_url("b.png", 100.0, 50.0).fit_within(400.0, 400.0);
        assert_eq!(small.width, 100.0);
    }
}
