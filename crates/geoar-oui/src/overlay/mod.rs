//! Message bubble overlay
//!
//! Every frame is drawn from scratch: the surface is cleared and each visible
//! item gets a glass bubble with the author, wrapped content, a distance label
//! and a bearing indicator underneath. Nothing is retained between frames.

mod indicator;
mod label;
mod wrap;

pub use indicator::indicator_points;
pub use label::distance_label;
pub use wrap::wrap_text;

use geoar_config::BubbleConfig;
use tracing::{debug, info, warn};

use crate::projection::VisibleItem;
use crate::renderer::{Font, Rect, RenderBackend, RenderError};
use crate::theme::GlassTheme;

/// Gap between the bubble and its indicator
const INDICATOR_GAP: f32 = 4.0;

/// Resolved geometry for one bubble
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleLayout {
    pub rect: Rect,
    pub lines: Vec<String>,
    pub font: Font,
    pub author_font: Font,
    pub line_height: f32,
    pub label: String,
}

impl BubbleLayout {
    /// Center of the bearing indicator, just below the bubble
    pub fn indicator_center(&self, size: f32) -> (f32, f32) {
        (self.rect.center_x(), self.rect.bottom() + INDICATOR_GAP + size / 2.0)
    }
}

/// Result of one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame presented with this many bubbles
    Drawn(usize),
    /// Surface unavailable; nothing was drawn
    Skipped,
}

/// Draws proximity bubbles onto any [`RenderBackend`]
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    bubble: BubbleConfig,
    theme: GlassTheme,
    surface_lost: bool,
    frames_skipped: u64,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(BubbleConfig::default(), GlassTheme::default())
    }
}

impl OverlayRenderer {
    pub fn new(bubble: BubbleConfig, theme: GlassTheme) -> Self {
        Self {
            bubble,
            theme,
            surface_lost: false,
            frames_skipped: 0,
        }
    }

    pub fn bubble(&self) -> &BubbleConfig {
        &self.bubble
    }

    pub fn theme(&self) -> &GlassTheme {
        &self.theme
    }

    /// Number of frames skipped because the surface was unavailable
    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    /// Compute bubble geometry for one item.
    ///
    /// The bubble is `max_width` wide; its height is
    /// `lines × line_height + 2 × padding + header_space`. It is centered
    /// horizontally on the projected point and sits above it.
    pub fn layout_bubble<B>(&self, backend: &B, visible: &VisibleItem<'_>) -> BubbleLayout
    where
        B: RenderBackend + ?Sized,
    {
        let cfg = &self.bubble;
        let font = Font::regular(visible.projected.font_size_px);
        let author_font = Font::bold(visible.projected.font_size_px);
        let text_width = (cfg.max_width - 2.0 * cfg.padding).max(0.0);

        let lines = wrap_text(&visible.item.content, text_width, |candidate| {
            backend.measure_text(candidate, font)
        });
        let line_height = font.size_px * cfg.line_spacing;
        let height = lines.len() as f32 * line_height + 2.0 * cfg.padding + cfg.header_space;

        let rect = Rect::new(
            visible.projected.screen_x - cfg.max_width / 2.0,
            visible.projected.screen_y - height,
            cfg.max_width,
            height,
        );

        BubbleLayout {
            rect,
            lines,
            font,
            author_font,
            line_height,
            label: distance_label(visible.item.distance_meters),
        }
    }

    /// Draw one frame. A missing surface skips the frame without failing.
    pub fn render_frame<B>(&mut self, backend: &mut B, items: &[VisibleItem<'_>]) -> FrameOutcome
    where
        B: RenderBackend + ?Sized,
    {
        if let Err(err) = backend.begin_frame() {
            return self.skip(err);
        }

        backend.clear();
        for visible in items {
            let layout = self.layout_bubble(&*backend, visible);
            self.draw_bubble(backend, visible, &layout);
        }

        if let Err(err) = backend.end_frame() {
            return self.skip(err);
        }

        if self.surface_lost {
            info!("Render surface available again");
            self.surface_lost = false;
        }
        FrameOutcome::Drawn(items.len())
    }

    fn skip(&mut self, err: RenderError) -> FrameOutcome {
        self.frames_skipped += 1;
        if self.surface_lost {
            debug!("Skipping frame: {}", err);
        } else {
            warn!("Render surface unavailable, skipping frames: {}", err);
            self.surface_lost = true;
        }
        FrameOutcome::Skipped
    }

    fn draw_bubble<B>(&self, backend: &mut B, visible: &VisibleItem<'_>, layout: &BubbleLayout)
    where
        B: RenderBackend + ?Sized,
    {
        let cfg = &self.bubble;
        let theme = &self.theme;
        let rect = layout.rect;

        // Glass body
        backend.fill_rounded_rect(rect, cfg.corner_radius, theme.fill());
        backend.fill_rounded_rect_gradient(rect, cfg.corner_radius, theme.gradient());
        backend.stroke_rounded_rect(rect, cfg.corner_radius, theme.border(), theme.border_width);

        // Header row: author on the left, distance on the right
        let header_y = rect.y + cfg.padding;
        backend.fill_text(
            rect.x + cfg.padding,
            header_y,
            &visible.item.author.name,
            layout.author_font,
            theme.author(),
        );
        let label_font = Font::regular((layout.font.size_px - 2.0).max(10.0));
        let label_width = backend.measure_text(&layout.label, label_font);
        backend.fill_text(
            rect.right() - cfg.padding - label_width,
            header_y,
            &layout.label,
            label_font,
            theme.label(),
        );

        let content_y = header_y + cfg.header_space;
        for (i, line) in layout.lines.iter().enumerate() {
            backend.fill_text(
                rect.x + cfg.padding,
                content_y + i as f32 * layout.line_height,
                line,
                layout.font,
                theme.content(),
            );
        }

        let (ix, iy) = layout.indicator_center(cfg.indicator_size);
        let points = indicator_points(ix, iy, cfg.indicator_size, visible.item.bearing_degrees);
        backend.fill_triangle(points, theme.indicator());
    }
}
