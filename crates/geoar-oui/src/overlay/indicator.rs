//! Bearing indicator geometry

/// Triangle centered on `(cx, cy)` pointing toward `bearing_degrees`, with 0°
/// pointing up the screen and angles growing clockwise. The tip comes first.
pub fn indicator_points(cx: f32, cy: f32, size: f32, bearing_degrees: f64) -> [(f32, f32); 3] {
    let half = size / 2.0;
    let local = [(0.0, -half * 1.2), (-half, half * 0.8), (half, half * 0.8)];

    let theta = (bearing_degrees as f32).to_radians();
    let (sin, cos) = theta.sin_cos();
    local.map(|(x, y)| (cx + x * cos - y * sin, cy + x * sin + y * cos))
}
