//! Glass bubble theme

use geoar_config::OverlayConfig;

use super::Palette;
use crate::renderer::{Gradient, Paint};

/// Glass bubble theme settings
#[derive(Debug, Clone, PartialEq)]
pub struct GlassTheme {
    /// Base color palette
    pub palette: Palette,
    /// Opacity of the base fill
    pub fill_opacity: f32,
    /// Opacity of the gradient overlay (top, bottom)
    pub gradient_opacity: (f32, f32),
    /// Border opacity
    pub border_opacity: f32,
    /// Border width in pixels
    pub border_width: f32,
}

impl Default for GlassTheme {
    fn default() -> Self {
        Self {
            palette: Palette::glass(),
            fill_opacity: 0.15,
            gradient_opacity: (0.35, 0.2),
            border_opacity: 0.4,
            border_width: 1.0,
        }
    }
}

impl From<&OverlayConfig> for GlassTheme {
    fn from(config: &OverlayConfig) -> Self {
        if config.high_contrast {
            Self::high_visibility()
        } else {
            Self::default()
        }
    }
}

impl GlassTheme {
    /// High visibility theme
    pub fn high_visibility() -> Self {
        Self {
            palette: Palette::high_contrast(),
            fill_opacity: 0.85,
            gradient_opacity: (0.5, 0.5),
            border_opacity: 1.0,
            border_width: 2.0,
        }
    }

    pub fn fill(&self) -> Paint {
        self.palette.surface.with_alpha(self.fill_opacity)
    }

    pub fn gradient(&self) -> Gradient {
        let (top, bottom) = self.gradient_opacity;
        Gradient::vertical(
            self.palette.gradient_top.with_alpha(top),
            self.palette.gradient_bottom.with_alpha(bottom),
        )
    }

    pub fn border(&self) -> Paint {
        self.palette.border.with_alpha(self.border_opacity)
    }

    pub fn author(&self) -> Paint {
        Paint::opaque(self.palette.title)
    }

    pub fn content(&self) -> Paint {
        Paint::opaque(self.palette.text)
    }

    pub fn label(&self) -> Paint {
        self.palette.muted.with_alpha(0.9)
    }

    pub fn indicator(&self) -> Paint {
        Paint::opaque(self.palette.accent)
    }
}
