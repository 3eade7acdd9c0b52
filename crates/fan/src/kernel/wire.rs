//! Closed 2D outlines: polygon profiles and the wire builder that produces
//! them from lines, three-point arcs and splines.

use glam::DVec2;
use kurbo::{BezPath, Circle, PathEl, Point, Shape, Vec2};

use super::{KernelError, KernelResult, FLATTEN_TOLERANCE};

const POINT_EPS: f64 = 1e-9;

fn to_point(p: DVec2) -> Point {
    Point::new(p.x, p.y)
}

fn from_point(p: Point) -> DVec2 {
    DVec2::new(p.x, p.y)
}

/// Flatten a kurbo shape into a polyline (MoveTo and LineTo vertices).
fn flatten_shape(shape: &impl Shape) -> Vec<DVec2> {
    let mut points = Vec::new();
    kurbo::flatten(
        shape.path_elements(FLATTEN_TOLERANCE),
        FLATTEN_TOLERANCE,
        |el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(from_point(p)),
            _ => {}
        },
    );
    points
}

/// Polygon approximation of a circle.
pub(crate) fn circle_points(center: DVec2, radius: f64) -> Vec<DVec2> {
    let mut points = flatten_shape(&Circle::new(to_point(center), radius));
    dedup_closed(&mut points);
    points
}

/// Points of the arc from `start` through `mid` to `end`, excluding `start`.
pub(crate) fn arc_points(start: DVec2, mid: DVec2, end: DVec2) -> KernelResult<Vec<DVec2>> {
    let degenerate = KernelError::DegenerateArc { start, mid, end };

    let ab = mid - start;
    let ac = end - start;
    let cross = ab.perp_dot(ac);
    if cross.abs() <= POINT_EPS * ab.length() * ac.length() || ac.length() <= POINT_EPS {
        return Err(degenerate);
    }

    // Circumcenter of the three points
    let d = 2.0 * cross;
    let center = start
        + DVec2::new(
            ac.y * ab.length_squared() - ab.y * ac.length_squared(),
            ab.x * ac.length_squared() - ac.x * ab.length_squared(),
        ) / d;
    let radius = (start - center).length();

    let angle_of = |p: DVec2| (p.y - center.y).atan2(p.x - center.x);
    let start_angle = angle_of(start);
    let to_mid = (angle_of(mid) - start_angle).rem_euclid(std::f64::consts::TAU);
    let to_end = (angle_of(end) - start_angle).rem_euclid(std::f64::consts::TAU);

    // The arc runs counter-clockwise when mid comes before end going CCW
    let sweep = if to_mid < to_end {
        to_end
    } else {
        to_end - std::f64::consts::TAU
    };

    let arc = kurbo::Arc {
        center: to_point(center),
        radii: Vec2::new(radius, radius),
        start_angle,
        sweep_angle: sweep,
        x_rotation: 0.0,
    };

    let mut points = flatten_shape(&arc);
    if !points.is_empty() {
        points.remove(0);
    }
    match points.last_mut() {
        Some(last) => *last = end,
        None => points.push(end),
    }
    Ok(points)
}

/// Catmull-Rom spline through `points`, flattened. Includes both ends.
pub(crate) fn spline_points(points: &[DVec2]) -> Vec<DVec2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let at = |i: isize| points[i.clamp(0, points.len() as isize - 1) as usize];

    let mut path = BezPath::new();
    path.move_to(to_point(points[0]));
    for i in 0..points.len() as isize - 1 {
        let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
        let c1 = p1 + (p2 - p0) / 6.0;
        let c2 = p2 - (p3 - p1) / 6.0;
        path.curve_to(to_point(c1), to_point(c2), to_point(p2));
    }

    let mut flat = flatten_shape(&path);
    if let Some(last) = flat.last_mut() {
        *last = points[points.len() - 1];
    }
    flat
}

/// Drop consecutive duplicates and a closing point equal to the first.
fn dedup_closed(points: &mut Vec<DVec2>) {
    points.dedup_by(|a, b| a.distance(*b) <= POINT_EPS);
    while points.len() > 1 && points[0].distance(points[points.len() - 1]) <= POINT_EPS {
        points.pop();
    }
}

/// Closed simple polygon in a workplane.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    points: Vec<DVec2>,
}

impl Profile {
    /// Build a profile from its vertices; the closing edge is implicit.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> KernelResult<Self> {
        let mut points: Vec<DVec2> = points.into_iter().collect();
        dedup_closed(&mut points);

        if points.len() < 3 {
            return Err(KernelError::InvalidProfile(format!(
                "need at least 3 distinct vertices, got {}",
                points.len()
            )));
        }
        let profile = Self { points };
        if profile.signed_area().abs() <= POINT_EPS {
            return Err(KernelError::InvalidProfile(
                "outline encloses no area".to_string(),
            ));
        }
        Ok(profile)
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Shoelace area, positive for counter-clockwise outlines.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].perp_dot(self.points[(i + 1) % n]))
            .sum::<f64>()
            / 2.0
    }

    pub fn translated(&self, offset: DVec2) -> Self {
        Self {
            points: self.points.iter().map(|p| *p + offset).collect(),
        }
    }

    /// Same outline wound counter-clockwise.
    pub fn counter_clockwise(&self) -> Self {
        let mut points = self.points.clone();
        if self.signed_area() < 0.0 {
            points.reverse();
        }
        Self { points }
    }

    /// Interleaved `x, y` coordinates, counter-clockwise.
    pub(crate) fn flat_ccw(&self) -> Vec<f64> {
        self.counter_clockwise()
            .points
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }
}

/// Builder for a closed outline made of connected segments.
#[derive(Debug, Clone)]
pub struct Wire {
    points: Vec<DVec2>,
}

impl Wire {
    /// Start a wire at `start`.
    pub fn new(start: DVec2) -> Self {
        Self {
            points: vec![start],
        }
    }

    fn current(&self) -> DVec2 {
        self.points[self.points.len() - 1]
    }

    /// Move the pen. Before any segment this relocates the start; afterwards
    /// a jump is joined with a straight edge.
    pub fn move_to(mut self, point: DVec2) -> Self {
        if self.points.len() == 1 {
            self.points[0] = point;
        } else if self.current().distance(point) > POINT_EPS {
            self.points.push(point);
        }
        self
    }

    pub fn line_to(mut self, point: DVec2) -> Self {
        self.points.push(point);
        self
    }

    /// Circular arc from the current point through `mid` to `end`.
    pub fn three_point_arc(mut self, mid: DVec2, end: DVec2) -> KernelResult<Self> {
        let points = arc_points(self.current(), mid, end)?;
        self.points.extend(points);
        Ok(self)
    }

    /// Smooth curve from the current point through `through`.
    pub fn spline(mut self, through: &[DVec2]) -> Self {
        let mut all = Vec::with_capacity(through.len() + 1);
        all.push(self.current());
        all.extend_from_slice(through);
        let points = spline_points(&all);
        self.points.extend(points.into_iter().skip(1));
        self
    }

    /// Close the outline back to the start point.
    pub fn close(self) -> KernelResult<Profile> {
        Profile::from_points(self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_points_radius() {
        let points = circle_points(DVec2::new(1.0, 2.0), 3.0);
        assert!(points.len() > 16);
        for p in &points {
            let r = p.distance(DVec2::new(1.0, 2.0));
            assert!((r - 3.0).abs() < 0.01);
        }
        let profile = Profile::from_points(points).unwrap();
        let expected = std::f64::consts::PI * 9.0;
        assert!((profile.signed_area().abs() - expected).abs() < 0.1);
    }

    #[test]
    fn test_arc_passes_through_points() {
        let start = DVec2::new(1.0, 0.0);
        let mid = DVec2::new(0.0, 1.0);
        let end = DVec2::new(-1.0, 0.0);
        let points = arc_points(start, mid, end).unwrap();
        assert_eq!(*points.last().unwrap(), end);
        for p in &points {
            assert!((p.length() - 1.0).abs() < 0.01);
            assert!(p.y >= -1e-6);
        }
    }

    #[test]
    fn test_clockwise_arc() {
        let start = DVec2::new(-1.0, 0.0);
        let mid = DVec2::new(0.0, 1.0);
        let end = DVec2::new(1.0, 0.0);
        let points = arc_points(start, mid, end).unwrap();
        for p in &points {
            assert!(p.y >= -1e-6);
        }
    }

    #[test]
    fn test_collinear_arc_is_degenerate() {
        let result = arc_points(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
        );
        assert!(matches!(result, Err(KernelError::DegenerateArc { .. })));
    }

    #[test]
    fn test_spline_hits_control_points() {
        let controls = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 2.0),
            DVec2::new(3.0, 3.0),
        ];
        let points = spline_points(&controls);
        assert_eq!(points[0], controls[0]);
        assert_eq!(*points.last().unwrap(), controls[2]);
        assert!(points.iter().any(|p| p.distance(controls[1]) < 1e-6));
    }

    #[test]
    fn test_wire_closes_into_profile() {
        let profile = Wire::new(DVec2::new(0.0, 0.0))
            .line_to(DVec2::new(2.0, 0.0))
            .line_to(DVec2::new(2.0, 1.0))
            .line_to(DVec2::new(0.0, 0.0))
            .close()
            .unwrap();
        assert_eq!(profile.points().len(), 3);
        assert!((profile.signed_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wire_too_few_vertices() {
        let result = Wire::new(DVec2::ZERO).line_to(DVec2::X).close();
        assert!(matches!(result, Err(KernelError::InvalidProfile(_))));
    }

    #[test]
    fn test_move_to_same_point_continues() {
        let wire = Wire::new(DVec2::new(0.0, 1.0))
            .three_point_arc(DVec2::new(0.5, 0.5), DVec2::new(1.0, 1.0))
            .unwrap();
        let count = wire.points.len();
        let wire = wire.move_to(DVec2::new(1.0, 1.0));
        assert_eq!(wire.points.len(), count);
    }

    #[test]
    fn test_counter_clockwise_flips_winding() {
        let cw = Profile::from_points([
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 0.0),
        ])
        .unwrap();
        assert!(cw.signed_area() < 0.0);
        assert!(cw.counter_clockwise().signed_area() > 0.0);
    }
}
