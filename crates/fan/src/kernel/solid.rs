//! Opaque kernel geometry and the queries the builders rely on.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use glam::DVec3;
use manifold_rs::Manifold;
use vcad::Part;

use super::wire::Profile;
use super::{KernelError, KernelResult, REVOLVE_SEGMENTS};

/// Rotation axis through the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) / 2.0
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    fn from_points(mut points: impl Iterator<Item = DVec3>) -> Option<BoundingBox> {
        let first = points.next()?;
        Some(points.fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |bb, p| BoundingBox {
                min: bb.min.min(p),
                max: bb.max.max(p),
            },
        ))
    }
}

/// Triangle mesh of one body.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    fn from_part(name: String, part: &Part) -> Self {
        let mesh = part.to_mesh();
        let vertices = mesh.vertices();
        let indices = mesh.indices();

        let positions = vertices
            .chunks_exact(3)
            .map(|v| [v[0] as f32, v[1] as f32, v[2] as f32])
            .collect();
        let indices = indices.iter().map(|&i| i as u32).collect();

        Self {
            name,
            positions,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(
            self.positions
                .iter()
                .map(|p| DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        )
    }
}

/// Solid geometry produced by the kernel.
///
/// A solid holds zero or more bodies. `add` collects bodies without fusing
/// them; `union` and `subtract` fuse everything into a single body.
#[derive(Clone)]
pub struct Solid {
    name: String,
    bodies: Vec<Rc<Part>>,
    /// Filled on first `bounding_box` call, or carried over by `translate` and `add`.
    bounds: OnceCell<Option<BoundingBox>>,
}

impl fmt::Debug for Solid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solid")
            .field("name", &self.name)
            .field("bodies", &self.bodies.len())
            .finish()
    }
}

impl Solid {
    /// A solid without bodies.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::with_bodies(name, Vec::new())
    }

    pub(crate) fn from_part(name: impl Into<String>, part: Part) -> Self {
        Self::with_bodies(name, vec![Rc::new(part)])
    }

    fn with_bodies(name: impl Into<String>, bodies: Vec<Rc<Part>>) -> Self {
        Self {
            name: name.into(),
            bodies,
            bounds: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Each body as its own solid.
    pub fn bodies(&self) -> Vec<Solid> {
        let single = self.bodies.len() == 1;
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| {
                let name = if single {
                    self.name.clone()
                } else {
                    format!("{}_{}", self.name, i)
                };
                Solid::with_bodies(name, vec![Rc::clone(body)])
            })
            .collect()
    }

    fn map_bodies(&self, f: impl Fn(&Part) -> Part) -> Solid {
        Solid::with_bodies(
            self.name.clone(),
            self.bodies.iter().map(|b| Rc::new(f(b.as_ref()))).collect(),
        )
    }

    pub fn translate(&self, offset: DVec3) -> Solid {
        let moved = self.map_bodies(|b| b.translate(offset.x, offset.y, offset.z));
        if let Some(bounds) = self.bounds.get() {
            let shifted = bounds.map(|bb| BoundingBox {
                min: bb.min + offset,
                max: bb.max + offset,
            });
            let _ = moved.bounds.set(shifted);
        }
        moved
    }

    /// Rotate about an axis through the origin, right-handed, in degrees.
    pub fn rotate(&self, axis: Axis, degrees: f64) -> Solid {
        self.map_bodies(|b| match axis {
            Axis::X => b.rotate(degrees, 0.0, 0.0),
            Axis::Y => b.rotate(0.0, degrees, 0.0),
            Axis::Z => b.rotate(0.0, 0.0, degrees),
        })
    }

    /// Collect the bodies of both solids without fusing them.
    pub fn add(&self, other: &Solid) -> Solid {
        let mut bodies = self.bodies.clone();
        bodies.extend(other.bodies.iter().cloned());
        let combined = Solid::with_bodies(self.name.clone(), bodies);
        if let (Some(a), Some(b)) = (self.bounds.get(), other.bounds.get()) {
            let union = match (*a, *b) {
                (Some(a), Some(b)) => Some(a.union(&b)),
                (a, b) => a.or(b),
            };
            let _ = combined.bounds.set(union);
        }
        combined
    }

    /// Fuse both solids into a single body.
    pub fn union(&self, other: &Solid) -> Solid {
        let combined = self.add(other);
        match combined.fused() {
            Some(body) => Solid::with_bodies(self.name.clone(), vec![body]),
            None => combined,
        }
    }

    /// Remove `tool` from this solid. The result is a single body.
    pub fn subtract(&self, tool: &Solid) -> Solid {
        let Some(base) = self.fused() else {
            return self.clone();
        };
        let Some(tool) = tool.fused() else {
            return Solid::with_bodies(self.name.clone(), vec![base]);
        };
        Solid::from_part(self.name.clone(), base.difference(&tool))
    }

    /// All bodies fused into one kernel part.
    pub(crate) fn fused(&self) -> Option<Rc<Part>> {
        let (first, rest) = self.bodies.split_first()?;
        if rest.is_empty() {
            return Some(Rc::clone(first));
        }
        let mut fused = first.union(&rest[0]);
        for body in &rest[1..] {
            fused = fused.union(body);
        }
        Some(Rc::new(fused))
    }

    #[cfg(test)]
    pub(crate) fn has_cached_bounds(&self) -> bool {
        self.bounds.get().is_some()
    }

    /// Bounds of the tessellation, computed once per solid.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        *self.bounds.get_or_init(|| {
            self.tessellate()
                .iter()
                .filter_map(TriangleMesh::bounding_box)
                .reduce(|a, b| a.union(&b))
        })
    }

    pub fn volume(&self) -> f64 {
        self.bodies.iter().map(|b| b.volume() as f64).sum()
    }

    pub fn surface_area(&self) -> f64 {
        self.bodies.iter().map(|b| b.surface_area() as f64).sum()
    }

    /// One triangle mesh per body.
    pub fn tessellate(&self) -> Vec<TriangleMesh> {
        self.bodies()
            .iter()
            .map(|solid| TriangleMesh::from_part(solid.name.clone(), &solid.bodies[0]))
            .collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.tessellate().iter().map(TriangleMesh::triangle_count).sum()
    }
}

/// Revolve a closed `(r, z)` outline a full turn about the Z axis.
pub fn revolve(name: &str, outline: &Profile) -> KernelResult<Solid> {
    if let Some(p) = outline.points().iter().find(|p| p.x < -1e-9) {
        return Err(KernelError::InvalidProfile(format!(
            "revolve outline crosses the axis at ({}, {})",
            p.x, p.y
        )));
    }

    let polygon = outline.flat_ccw();
    let polygon_slices: Vec<&[f64]> = vec![polygon.as_slice()];

    // Profile x is the radius, profile y becomes Z
    let manifold = Manifold::revolve(&polygon_slices, REVOLVE_SEGMENTS, 360.0);

    if manifold.is_empty() {
        tracing::warn!("Manifold::revolve returned empty geometry for {}", name);
        return Err(KernelError::EmptyResult(name.to_string()));
    }

    Ok(Solid::from_part(name, Part::new(name, manifold)))
}
