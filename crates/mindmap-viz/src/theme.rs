//! Depth styles mapped to colours.

use egui::Color32;
use mindmap_core::StyleVariant;

/// Background and accent for one depth style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthColors {
    pub fill: Color32,
    pub accent: Color32,
}

impl DepthColors {
    pub fn for_style(style: StyleVariant) -> Self {
        let (fill, accent) = match style {
            StyleVariant::Blue => ((20, 32, 52), (96, 165, 250)),
            StyleVariant::Purple => ((36, 24, 52), (192, 132, 252)),
            StyleVariant::Green => ((18, 42, 30), (74, 222, 128)),
            StyleVariant::Red => ((48, 20, 24), (248, 113, 113)),
            StyleVariant::Indigo => ((26, 26, 56), (129, 140, 248)),
            StyleVariant::Yellow => ((46, 40, 16), (250, 204, 21)),
            StyleVariant::Teal => ((16, 42, 42), (45, 212, 191)),
            StyleVariant::Orange => ((50, 32, 16), (251, 146, 60)),
        };
        Self {
            fill: Color32::from_rgb(fill.0, fill.1, fill.2),
            accent: Color32::from_rgb(accent.0, accent.1, accent.2),
        }
    }
}
