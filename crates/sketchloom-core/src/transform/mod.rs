//! Alignment, distribution and grouping of scene objects.
//!
//! Positions are measured on the unrotated scaled box of each object
//! (`x`, `y`, `scaled_width`, `scaled_height`).

mod align;
mod group;

pub use align::{align_objects, align_selection, align_to_canvas, distribute, distribute_selection};
pub use group::{group_objects, group_selection, ungroup, ungroup_selection};

use serde::{Deserialize, Serialize};

/// Edge or center to align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    CenterHorizontal,
    CenterVertical,
}

impl Alignment {
    /// Parse a toolbar command name. Accepts `center-h`/`center-v` shorthands.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "right" => Some(Alignment::Right),
            "top" => Some(Alignment::Top),
            "bottom" => Some(Alignment::Bottom),
            "center-horizontal" | "center-h" | "centerh" => Some(Alignment::CenterHorizontal),
            "center-vertical" | "center-v" | "centerv" => Some(Alignment::CenterVertical),
            _ => None,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Alignment::Left | Alignment::Right | Alignment::CenterHorizontal => Axis::Horizontal,
            Alignment::Top | Alignment::Bottom | Alignment::CenterVertical => Axis::Vertical,
        }
    }
}

/// Axis for distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" | "h" | "x" => Some(Axis::Horizontal),
            "vertical" | "v" | "y" => Some(Axis::Vertical),
            _ => None,
        }
    }
}
