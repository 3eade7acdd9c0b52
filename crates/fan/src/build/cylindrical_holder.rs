//! Clip holding two cylinders of different radii a short distance apart.

use glam::{DVec2, DVec3};

use super::PartBuilder;
use crate::kernel::{KernelResult, Mode, Plane, Sketch, Solid, Wire};

/// Two open rings joined by a curved handle.
#[derive(Debug, Clone, PartialEq)]
pub struct CylindricalHolderBuilder {
    pub bottom_radius: f64,
    pub top_radius: f64,
    pub thickness: f64,
    /// Axial distance between the rings.
    pub length: f64,
    pub deviation_ratio: f64,
    pub inner_ratio: f64,
}

impl CylindricalHolderBuilder {
    pub fn new(bottom_radius: f64, top_radius: f64, thickness: f64) -> Self {
        Self {
            bottom_radius,
            top_radius,
            thickness,
            length: thickness * 4.0,
            deviation_ratio: 1.0 / 1.5,
            inner_ratio: 0.85,
        }
    }

    /// C-shaped ring: annulus with an opening cut on the +X side.
    fn ring(&self, radius: f64) -> Sketch {
        Sketch::new()
            .circle(radius, Mode::Add)
            .circle(radius * self.inner_ratio, Mode::Subtract)
            .push([DVec2::new(radius / 1.1, 0.0)])
            .rect(radius / 2.0, radius, Mode::Subtract)
            .reset()
    }

    fn handle(&self) -> KernelResult<Solid> {
        let t = self.thickness;
        let bottom = DVec2::new(self.bottom_radius, t / 2.0);
        let top = DVec2::new(self.top_radius, self.length + t / 2.0);
        let bulge = (bottom + top) / 2.0 + DVec2::new(self.deviation_ratio * self.length, 0.0);

        let outline = Wire::new(bottom)
            .three_point_arc(bulge, top)?
            .move_to(top)
            .line_to(DVec2::new(top.x * (1.0 + self.inner_ratio) / 2.0, top.y))
            .close()?;

        Ok(Sketch::new()
            .wire(&outline, Mode::Add)
            .extrude(Plane::YZ, t)?
            .translate(DVec3::new(-t / 2.0, 0.0, -t / 2.0)))
    }
}

impl PartBuilder for CylindricalHolderBuilder {
    fn name(&self) -> &'static str {
        "cylindrical_holder"
    }

    fn build(&self) -> KernelResult<Solid> {
        let t = self.thickness;

        let bottom = self
            .ring(self.bottom_radius)
            .extrude(Plane::XY, t)?
            .translate(DVec3::new(0.0, 0.0, -t / 2.0));
        let top = self
            .ring(self.top_radius)
            .extrude(Plane::XY, t)?
            .translate(DVec3::new(0.0, 0.0, self.length - t / 2.0));

        Ok(bottom
            .with_name(self.name())
            .add(&top)
            .add(&self.handle()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holder_layout() {
        let builder = CylindricalHolderBuilder::new(3.55, 4.03, 0.89 * 3.0);
        let solid = builder.build().unwrap();
        assert_eq!(solid.body_count(), 3);

        let t = builder.thickness;
        let bb = solid.bounding_box().unwrap();
        assert!((bb.min.z + t / 2.0).abs() < 1e-4);
        assert!((bb.max.z - (builder.length + t / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_handle_bulges_along_y() {
        let builder = CylindricalHolderBuilder::new(3.55, 4.03, 2.67);
        let handle = builder.handle().unwrap();
        let bb = handle.bounding_box().unwrap();
        // handle is extruded along X and centered on x = 0
        assert!((bb.min.x + 1.335).abs() < 1e-4);
        assert!((bb.max.x - 1.335).abs() < 1e-4);
        assert!(bb.max.y > builder.top_radius);
    }

    #[test]
    fn test_print_rests_on_bed() {
        let (solid, parts) = CylindricalHolderBuilder::new(3.0, 4.0, 1.0)
            .build_for_print()
            .unwrap();
        assert_eq!(parts.len(), 1);
        assert!(solid.bounding_box().unwrap().min.z.abs() < 1e-5);
    }
}
