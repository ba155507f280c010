//! Geographic bearing to screen-space projection
//!
//! Items are placed horizontally by how far their bearing is from the
//! direction the device faces, scaled so that the horizontal field of view
//! spans the viewport width. Vertical placement follows device pitch only.

use geoar_config::{ForwardReference, OverlayConfig};

use crate::geo::ProximityItem;
use crate::input::OrientationSample;
use crate::renderer::SurfaceCapabilities;

/// Default horizontal field of view in degrees
pub const DEFAULT_FOV_DEGREES: f64 = 60.0;

/// Pixels of vertical shift per degree of pitch away from upright
const PITCH_PX_PER_DEGREE: f64 = 10.0;

/// Pitch at which items sit on the vertical center line
const UPRIGHT_PITCH: f64 = 90.0;

/// Drawing area in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl From<&SurfaceCapabilities> for Viewport {
    fn from(caps: &SurfaceCapabilities) -> Self {
        Self::new(caps.width as f32, caps.height as f32)
    }
}

/// Screen placement of one item for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedItem {
    pub id: String,
    pub screen_x: f32,
    pub screen_y: f32,
    pub visible: bool,
    pub font_size_px: f32,
}

/// A visible item paired with its placement
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleItem<'a> {
    pub item: &'a ProximityItem,
    pub projected: ProjectedItem,
}

/// Font size shrinking with distance, never below 12px
pub fn font_size_for(distance_meters: f64) -> f32 {
    (16.0 - distance_meters / 100.0).max(12.0) as f32
}

/// Projects proximity items into screen space
#[derive(Debug, Clone)]
pub struct ArProjector {
    fov_degrees: f64,
    reference: ForwardReference,
}

impl Default for ArProjector {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            reference: ForwardReference::Reverse,
        }
    }
}

impl From<&OverlayConfig> for ArProjector {
    fn from(config: &OverlayConfig) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            reference: config.forward_reference,
        }
    }
}

impl ArProjector {
    pub fn new(fov_degrees: f64) -> Self {
        Self {
            fov_degrees,
            ..Self::default()
        }
    }

    /// Choose which relative bearing counts as straight ahead
    pub fn with_reference(mut self, reference: ForwardReference) -> Self {
        self.reference = reference;
        self
    }

    pub fn fov_degrees(&self) -> f64 {
        self.fov_degrees
    }

    pub fn reference(&self) -> ForwardReference {
        self.reference
    }

    /// `(bearing - heading + 360) mod 360`
    pub fn relative_bearing(&self, bearing_degrees: f64, heading: f64) -> f64 {
        (bearing_degrees - heading + 360.0).rem_euclid(360.0)
    }

    /// Signed offset from the forward direction, in degrees
    fn offset_from_forward(&self, relative: f64) -> f64 {
        match self.reference {
            // Window is [180 - fov/2, 180 + fov/2]
            ForwardReference::Reverse => relative - 180.0,
            ForwardReference::Heading => {
                if relative > 180.0 {
                    relative - 360.0
                } else {
                    relative
                }
            }
        }
    }

    /// Project one item for the current orientation
    pub fn project(
        &self,
        item: &ProximityItem,
        orientation: OrientationSample,
        viewport: Viewport,
    ) -> ProjectedItem {
        let relative = self.relative_bearing(item.bearing_degrees, orientation.heading);
        let offset = self.offset_from_forward(relative);
        let half_fov = self.fov_degrees / 2.0;
        let visible = offset.abs() <= half_fov;

        let (cx, cy) = viewport.center();
        let px_per_degree = viewport.width as f64 / self.fov_degrees;
        let screen_x = cx as f64 + offset * px_per_degree;
        let screen_y = cy as f64 - (orientation.pitch - UPRIGHT_PITCH) * PITCH_PX_PER_DEGREE;

        ProjectedItem {
            id: item.id.clone(),
            screen_x: screen_x as f32,
            screen_y: screen_y as f32,
            visible,
            font_size_px: font_size_for(item.distance_meters),
        }
    }

    /// Project every item and keep only the visible ones, preserving order
    pub fn project_visible<'a>(
        &self,
        items: &'a [ProximityItem],
        orientation: OrientationSample,
        viewport: Viewport,
    ) -> Vec<VisibleItem<'a>> {
        items
            .iter()
            .map(|item| (item, self.project(item, orientation, viewport)))
            .filter(|(_, projected)| projected.visible)
            .map(|(item, projected)| VisibleItem { item, projected })
            .collect()
    }
}
