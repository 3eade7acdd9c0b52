//! Mesh validation utilities.
//!
//! `MeshValidator` checks tessellation output before it is exported:
//! index stride, in-range indices, finite positions, non-degenerate
//! triangles and closed surfaces.

use std::collections::HashMap;

use crate::kernel::{BoundingBox, TriangleMesh};

/// Doubled triangle area (mm²) below which `validate_all` reports a triangle.
pub const DEGENERATE_EPSILON: f32 = 1e-9;

/// Validator for `TriangleMesh` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a TriangleMesh,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a TriangleMesh) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.indices.len() / 3
    }

    /// Check that the index buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    pub fn are_positions_finite(&self) -> bool {
        self.mesh
            .positions
            .iter()
            .all(|p| p.iter().all(|c| c.is_finite()))
    }

    /// Triangles whose doubled area is below `epsilon` (mm²).
    pub fn degenerate_triangles(&self, epsilon: f32) -> usize {
        if !self.are_indices_in_range() {
            return 0;
        }
        self.mesh
            .indices
            .chunks_exact(3)
            .filter(|tri| {
                let [a, b, c] = [0, 1, 2].map(|k| glam::Vec3::from(self.mesh.positions[tri[k] as usize]));
                (b - a).cross(c - a).length() < epsilon
            })
            .count()
    }

    /// Every edge is shared by exactly two triangles with opposite winding.
    pub fn is_watertight(&self) -> bool {
        // (winding balance, number of uses) per undirected edge
        let mut edges: HashMap<(u32, u32), (i32, u32)> = HashMap::new();
        for tri in self.mesh.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let (key, dir) = if a < b { ((a, b), 1) } else { ((b, a), -1) };
                let entry = edges.entry(key).or_insert((0, 0));
                entry.0 += dir;
                entry.1 += 1;
            }
        }
        !edges.is_empty() && edges.values().all(|&(balance, uses)| balance == 0 && uses == 2)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.mesh.bounding_box()
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
        }

        if !self.are_positions_finite() {
            errors.push("Some positions are not finite".to_string());
        }

        if self.triangle_count() == 0 {
            errors.push(format!("Mesh '{}' has no triangles", self.mesh.name));
        }

        // surface checks only make sense on a well-formed index buffer
        if errors.is_empty() {
            let degenerate = self.degenerate_triangles(DEGENERATE_EPSILON);
            if degenerate > 0 {
                errors.push(format!(
                    "Mesh '{}' has {} degenerate triangles",
                    self.mesh.name, degenerate
                ));
            }
            if !self.is_watertight() {
                errors.push(format!("Mesh '{}' is not closed", self.mesh.name));
            }
        }

        errors
    }
}
