//! Boundary to the solid-modeling kernel.
//!
//! Booleans, extrusion, revolution and tessellation are delegated to
//! `vcad`/`manifold-rs`. This module only shapes 2D outlines and forwards
//! them, so part recipes never touch the kernel types directly.

mod sketch;
mod solid;
mod wire;

pub use sketch::{Mode, Plane, Sketch};
pub use solid::{revolve, Axis, BoundingBox, Solid, TriangleMesh};
pub use wire::{Profile, Wire};

pub(crate) use wire::spline_points;

use glam::DVec2;

/// Maximum deviation of flattened arcs, circles and splines (mm).
pub const FLATTEN_TOLERANCE: f64 = 0.005;

/// Angular segments of a full revolution.
pub const REVOLVE_SEGMENTS: u32 = 96;

pub type KernelResult<T> = Result<T, KernelError>;

/// Geometric failures reported by the kernel boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("sketch encloses no area")]
    EmptySketch,
    #[error("extrusion distance must be non-zero and finite, got {0}")]
    InvalidDistance(f64),
    #[error("arc points are collinear: {start} {mid} {end}")]
    DegenerateArc {
        start: DVec2,
        mid: DVec2,
        end: DVec2,
    },
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    #[error("kernel returned empty geometry for {0}")]
    EmptyResult(String),
}
