//! Rendering surface capabilities and color types

/// Rendering surface capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceCapabilities {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Supports real alpha blending (terminals approximate it)
    pub supports_alpha: bool,
    /// Pixels covered by one drawing unit, if the surface is coarse
    pub cell_size: Option<(f32, f32)>,
}

impl Default for SurfaceCapabilities {
    fn default() -> Self {
        Self {
            width: 640,
            height: 384,
            supports_alpha: true,
            cell_size: None,
        }
    }
}

/// Color representation supporting multiple formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Reset to default
    #[default]
    Reset,
    /// Standard ANSI color
    Black,
    DarkGrey,
    Red,
    DarkRed,
    Green,
    DarkGreen,
    Yellow,
    DarkYellow,
    Blue,
    DarkBlue,
    Magenta,
    DarkMagenta,
    Cyan,
    DarkCyan,
    White,
    Grey,
    /// 256-color palette
    AnsiValue(u8),
    /// True color RGB
    Rgb(u8, u8, u8),
}

impl Color {
    /// Overlay theme colors
    pub const GLASS_WHITE: Self = Color::Rgb(255, 255, 255);
    pub const BUBBLE_BLUE: Self = Color::Rgb(59, 130, 246);
    pub const BUBBLE_VIOLET: Self = Color::Rgb(139, 92, 246);
    pub const LABEL_GREY: Self = Color::Rgb(203, 213, 225);
    pub const INDICATOR_AMBER: Self = Color::Rgb(251, 191, 36);
    pub const NIGHT: Self = Color::Rgb(5, 7, 12);

    /// Pair this color with an opacity
    pub fn with_alpha(self, alpha: f32) -> Paint {
        Paint::new(self, alpha)
    }

    /// Convert to crossterm color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        match self {
            Color::Reset => crossterm::style::Color::Reset,
            Color::Black => crossterm::style::Color::Black,
            Color::DarkGrey => crossterm::style::Color::DarkGrey,
            Color::Red => crossterm::style::Color::Red,
            Color::DarkRed => crossterm::style::Color::DarkRed,
            Color::Green => crossterm::style::Color::Green,
            Color::DarkGreen => crossterm::style::Color::DarkGreen,
            Color::Yellow => crossterm::style::Color::Yellow,
            Color::DarkYellow => crossterm::style::Color::DarkYellow,
            Color::Blue => crossterm::style::Color::Blue,
            Color::DarkBlue => crossterm::style::Color::DarkBlue,
            Color::Magenta => crossterm::style::Color::Magenta,
            Color::DarkMagenta => crossterm::style::Color::DarkMagenta,
            Color::Cyan => crossterm::style::Color::Cyan,
            Color::DarkCyan => crossterm::style::Color::DarkCyan,
            Color::White => crossterm::style::Color::White,
            Color::Grey => crossterm::style::Color::Grey,
            Color::AnsiValue(v) => crossterm::style::Color::AnsiValue(*v),
            Color::Rgb(r, g, b) => crossterm::style::Color::Rgb {
                r: *r,
                g: *g,
                b: *b,
            },
        }
    }

    /// Blend two colors with alpha (0.0 = self, 1.0 = other)
    pub fn blend(&self, other: &Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        match (self.to_rgb(), other.to_rgb()) {
            (Some((r1, g1, b1)), Some((r2, g2, b2))) => {
                let mix = |a: u8, b: u8| (a as f32 * (1.0 - alpha) + b as f32 * alpha).round() as u8;
                Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
            }
            _ => {
                if alpha > 0.5 {
                    *other
                } else {
                    *self
                }
            }
        }
    }

    /// Convert to RGB tuple if possible
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Rgb(r, g, b) => Some((*r, *g, *b)),
            Color::Black => Some((0, 0, 0)),
            Color::White => Some((255, 255, 255)),
            Color::Red => Some((255, 0, 0)),
            Color::Green => Some((0, 255, 0)),
            Color::Blue => Some((0, 0, 255)),
            Color::Yellow => Some((255, 255, 0)),
            Color::Cyan => Some((0, 255, 255)),
            Color::Magenta => Some((255, 0, 255)),
            Color::Grey => Some((128, 128, 128)),
            Color::DarkGrey => Some((64, 64, 64)),
            Color::DarkRed => Some((128, 0, 0)),
            Color::DarkGreen => Some((0, 128, 0)),
            Color::DarkBlue => Some((0, 0, 128)),
            Color::DarkYellow => Some((128, 128, 0)),
            Color::DarkCyan => Some((0, 128, 128)),
            Color::DarkMagenta => Some((128, 0, 128)),
            _ => None,
        }
    }
}

/// A color with opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    /// Opacity (0.0 - 1.0)
    pub alpha: f32,
}

impl Paint {
    pub fn new(color: Color, alpha: f32) -> Self {
        Self {
            color,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn opaque(color: Color) -> Self {
        Self::new(color, 1.0)
    }
}

/// Vertical linear gradient, `top` at the upper edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub top: Paint,
    pub bottom: Paint,
}

impl Gradient {
    pub fn vertical(top: Paint, bottom: Paint) -> Self {
        Self { top, bottom }
    }

    /// Paint at `t` in [0, 1] from top to bottom
    pub fn sample(&self, t: f32) -> Paint {
        let t = t.clamp(0.0, 1.0);
        Paint {
            color: self.top.color.blend(&self.bottom.color, t),
            alpha: self.top.alpha + (self.bottom.alpha - self.top.alpha) * t,
        }
    }
}
