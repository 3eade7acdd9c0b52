//! 2D sketches folded from add/subtract shapes, and their extrusion.

use glam::DVec2;
use manifold_rs::Manifold;
use vcad::Part;

use super::wire::{circle_points, Profile};
use super::{KernelError, KernelResult, Solid};

/// How a shape combines with what the sketch holds so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Subtract,
}

/// Workplane a sketch is drawn on.
///
/// `XY` extrudes along +Z. `YZ` maps sketch `(u, v)` to world `(y, z)` and
/// extrudes along +X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plane {
    #[default]
    XY,
    YZ,
}

impl Plane {
    fn orient(self, part: Part) -> Part {
        match self {
            Plane::XY => part,
            // (u, v, w) -> (u, -w, v) -> (w, u, v)
            Plane::YZ => part.rotate(90.0, 0.0, 0.0).rotate(0.0, 0.0, 90.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SketchShape {
    Circle {
        center: DVec2,
        radius: f64,
    },
    Rect {
        center: DVec2,
        width: f64,
        height: f64,
    },
    RegularPolygon {
        center: DVec2,
        circumradius: f64,
        sides: usize,
    },
    Outline(Profile),
}

impl SketchShape {
    fn profile(&self) -> KernelResult<Profile> {
        match self {
            SketchShape::Circle { center, radius } => {
                if !(*radius > 0.0) {
                    return Err(KernelError::InvalidProfile(format!(
                        "circle radius must be positive, got {}",
                        radius
                    )));
                }
                Profile::from_points(circle_points(*center, *radius))
            }
            SketchShape::Rect {
                center,
                width,
                height,
            } => {
                let half = DVec2::new(width / 2.0, height / 2.0);
                Profile::from_points([
                    *center - half,
                    *center + DVec2::new(half.x, -half.y),
                    *center + half,
                    *center + DVec2::new(-half.x, half.y),
                ])
            }
            SketchShape::RegularPolygon {
                center,
                circumradius,
                sides,
            } => {
                if *sides < 3 {
                    return Err(KernelError::InvalidProfile(format!(
                        "regular polygon needs at least 3 sides, got {}",
                        sides
                    )));
                }
                // vertex i sits at angle i * 2π / sides, so vertex 0 is on +X
                // and a hexagon has flats facing ±Y
                let step = std::f64::consts::TAU / *sides as f64;
                Profile::from_points((0..*sides).map(|i| {
                    let (sin, cos) = (step * i as f64).sin_cos();
                    *center + DVec2::new(cos, sin) * *circumradius
                }))
            }
            SketchShape::Outline(profile) => Ok(profile.clone()),
        }
    }
}

/// A planar face assembled from shapes in add or subtract mode.
///
/// Shapes are placed at every current location (the origin until `push` is
/// called) and fold in insertion order.
#[derive(Debug, Clone)]
pub struct Sketch {
    shapes: Vec<(Mode, SketchShape)>,
    locations: Vec<DVec2>,
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}

impl Sketch {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            locations: vec![DVec2::ZERO],
        }
    }

    /// Replace the current locations.
    pub fn push(mut self, locations: impl IntoIterator<Item = DVec2>) -> Self {
        self.locations = locations.into_iter().collect();
        self
    }

    /// Return to the single origin location.
    pub fn reset(mut self) -> Self {
        self.locations = vec![DVec2::ZERO];
        self
    }

    pub fn circle(self, radius: f64, mode: Mode) -> Self {
        self.place(mode, |center| SketchShape::Circle { center, radius })
    }

    /// Axis-aligned rectangle centered on each location.
    pub fn rect(self, width: f64, height: f64, mode: Mode) -> Self {
        self.place(mode, |center| SketchShape::Rect {
            center,
            width,
            height,
        })
    }

    /// Regular polygon with its first vertex on the +X side of each location.
    pub fn regular_polygon(self, circumradius: f64, sides: usize, mode: Mode) -> Self {
        self.place(mode, |center| SketchShape::RegularPolygon {
            center,
            circumradius,
            sides,
        })
    }

    /// Closed outline, offset by each location.
    pub fn wire(self, profile: &Profile, mode: Mode) -> Self {
        self.place(mode, |offset| SketchShape::Outline(profile.translated(offset)))
    }

    fn place(mut self, mode: Mode, shape: impl Fn(DVec2) -> SketchShape) -> Self {
        for location in &self.locations {
            self.shapes.push((mode, shape(*location)));
        }
        self
    }

    /// Extrude the folded face along the plane normal.
    ///
    /// Negative distances extrude toward the opposite side of the plane.
    pub fn extrude(&self, plane: Plane, distance: f64) -> KernelResult<Solid> {
        if distance == 0.0 || !distance.is_finite() {
            return Err(KernelError::InvalidDistance(distance));
        }
        let height = distance.abs();

        let mut folded: Option<Part> = None;
        for (mode, shape) in &self.shapes {
            let prism = extrude_profile(&shape.profile()?, height)?;
            folded = match (mode, folded) {
                (Mode::Add, Some(acc)) => Some(acc.union(&prism)),
                (Mode::Add, None) => Some(prism),
                (Mode::Subtract, Some(acc)) => Some(acc.difference(&prism)),
                (Mode::Subtract, None) => {
                    tracing::debug!("subtract before any add ignored");
                    None
                }
            };
        }

        let part = folded.ok_or(KernelError::EmptySketch)?;
        let part = if distance < 0.0 {
            part.translate(0.0, 0.0, distance)
        } else {
            part
        };

        let solid = Solid::from_part("sketch", plane.orient(part));
        if solid.volume() <= 0.0 {
            return Err(KernelError::EmptySketch);
        }
        Ok(solid)
    }
}

/// Prism of `profile` from z = 0 to z = `height`.
fn extrude_profile(profile: &Profile, height: f64) -> KernelResult<Part> {
    let polygon = profile.flat_ccw();
    let polygon_slice: &[f64] = &polygon;

    let manifold = Manifold::extrude(
        &[polygon_slice],
        height,
        1,   // n_divisions
        0.0, // twist_degrees
        1.0, // scale_top_x
        1.0, // scale_top_y
    );

    if manifold.is_empty() {
        tracing::warn!("Manifold::extrude returned empty geometry");
        return Err(KernelError::EmptyResult("extrusion".to_string()));
    }

    Ok(Part::new("prism", manifold))
}
