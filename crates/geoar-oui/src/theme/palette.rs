//! Color palette definitions

use crate::renderer::Color;

/// A color palette for theming
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Bubble body
    pub surface: Color,
    /// Top of the bubble gradient
    pub gradient_top: Color,
    /// Bottom of the bubble gradient
    pub gradient_bottom: Color,
    /// Bubble outline
    pub border: Color,
    /// Author name
    pub title: Color,
    /// Message body
    pub text: Color,
    /// Distance label
    pub muted: Color,
    /// Bearing indicator
    pub accent: Color,
    /// Notices shown by the host
    pub warning: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::glass()
    }
}

impl Palette {
    /// Frosted glass over blue/violet
    pub fn glass() -> Self {
        Self {
            surface: Color::GLASS_WHITE,
            gradient_top: Color::BUBBLE_BLUE,
            gradient_bottom: Color::BUBBLE_VIOLET,
            border: Color::GLASS_WHITE,
            title: Color::White,
            text: Color::Rgb(241, 245, 249),
            muted: Color::LABEL_GREY,
            accent: Color::INDICATOR_AMBER,
            warning: Color::Yellow,
        }
    }

    /// Solid colors for bright outdoor scenes
    pub fn high_contrast() -> Self {
        Self {
            surface: Color::Black,
            gradient_top: Color::Rgb(30, 41, 59),
            gradient_bottom: Color::Black,
            border: Color::White,
            title: Color::Yellow,
            text: Color::White,
            muted: Color::Grey,
            accent: Color::Yellow,
            warning: Color::Red,
        }
    }
}
