//! Planar point helpers used by the part recipes.

use glam::DVec2;

/// Rotate `point` counter-clockwise about the origin by `angle` radians.
pub fn rotate_around_origin(point: DVec2, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    DVec2::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
}

/// `n` copies of `start` spread evenly around the origin.
///
/// The i-th point is `start` rotated by `i * 2π / n`. `n == 0` yields nothing.
pub fn radial_pattern(start: DVec2, n: usize) -> Vec<DVec2> {
    if n == 0 {
        return Vec::new();
    }
    let step = std::f64::consts::TAU / n as f64;
    (0..n)
        .map(|i| rotate_around_origin(start, step * i as f64))
        .collect()
}

/// Angles in degrees of `n` evenly spaced copies, starting at zero.
pub fn pattern_angles_deg(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64 * 360.0 / n as f64).collect()
}

/// Unit vector perpendicular to `v` (rotated +90°).
pub fn perpendicular(v: DVec2) -> DVec2 {
    rotate_around_origin(v, std::f64::consts::FRAC_PI_2).normalize_or_zero()
}
