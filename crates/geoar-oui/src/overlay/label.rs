//! Distance label text

/// `"Nm away"` under 100 m, otherwise `"X.Xkm away"`
pub fn distance_label(distance_meters: f64) -> String {
    if distance_meters < 100.0 {
        format!("{}m away", distance_meters.round() as i64)
    } else {
        format!("{:.1}km away", distance_meters / 1000.0)
    }
}
