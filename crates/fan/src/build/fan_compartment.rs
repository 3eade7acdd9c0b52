//! Volute housing around the impeller, with an outlet duct toward +X.

use glam::DVec2;

use super::{flipped_for_print, PartBuilder, PrintParts};
use crate::kernel::{KernelResult, Mode, Plane, Sketch, Solid};

/// Fan housing.
///
/// `hull_radius` is the outer radius of the wall; it is stored as the given
/// radius plus twice the wall thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct FanCompartmentBuilder {
    pub hull_radius: f64,
    pub hull_length: f64,
    pub thickness: f64,
    pub outward_overhang: f64,
    /// Thinner walls and a longer housing, for tall impellers.
    pub hotfix_length: bool,
}

impl FanCompartmentBuilder {
    pub fn new(
        fan_hull_radius: f64,
        hull_length: f64,
        thickness: f64,
        outward_overhang: f64,
    ) -> Self {
        Self {
            hull_radius: fan_hull_radius + thickness * 2.0,
            hull_length,
            thickness,
            outward_overhang,
            hotfix_length: false,
        }
    }

    pub fn with_hotfix_length(mut self, hotfix_length: bool) -> Self {
        self.hotfix_length = hotfix_length;
        self
    }

    fn wall(&self) -> f64 {
        if self.hotfix_length {
            self.thickness / 2.0
        } else {
            self.thickness
        }
    }

    /// Wall outline of a housing with outer radius `radius`.
    ///
    /// Three quarters of a ring, the top duct wall running out to
    /// `radius + outward_overhang`, and (without `cap`) the lower duct wall.
    /// With `cap` the cut-out quadrant extends a further `thickness` on both
    /// sides of the duct.
    pub fn outline(&self, radius: f64, cap: bool) -> Sketch {
        let t = self.wall();
        let o = self.outward_overhang;
        let cap_add = if cap { self.thickness * 2.0 } else { 0.0 };

        let sketch = Sketch::new()
            .circle(radius, Mode::Add)
            .circle(radius - t, Mode::Subtract)
            .push([DVec2::new(radius / 2.0, radius / 2.0)])
            .rect(radius, radius + cap_add, Mode::Subtract)
            .push([DVec2::new(radius / 2.0 + o / 2.0, radius / 2.0)])
            .rect(radius + o, radius, Mode::Add)
            .push([DVec2::new(radius / 2.0 + o / 2.0, radius / 2.0 - t / 2.0)])
            .rect(radius + o, radius - t, Mode::Subtract);

        if cap {
            return sketch.reset();
        }
        sketch
            .push([DVec2::new(radius + o / 2.0 - t / 4.0, -t / 2.0)])
            .rect(o + t / 2.0, t, Mode::Add)
            .reset()
    }

    /// Floor of the outlet duct: the duct rectangle minus the inner circle.
    pub fn base(&self, radius: f64) -> Sketch {
        let t = self.wall();
        let o = self.outward_overhang;

        Sketch::new()
            .push([DVec2::new(radius / 2.0 + o / 2.0, radius / 2.0)])
            .rect(radius + o, radius, Mode::Add)
            .reset()
            .circle(radius - t, Mode::Subtract)
    }

    /// Height of the extruded wall.
    pub fn wall_height(&self) -> f64 {
        if self.hotfix_length {
            self.hull_length + 3.5 * self.thickness
        } else {
            self.hull_length
        }
    }
}

impl PartBuilder for FanCompartmentBuilder {
    fn name(&self) -> &'static str {
        "fan_compartment"
    }

    fn build(&self) -> KernelResult<Solid> {
        let wall = self
            .outline(self.hull_radius, false)
            .extrude(Plane::XY, self.wall_height())?;
        let floor = self
            .base(self.hull_radius)
            .extrude(Plane::XY, self.thickness)?;

        tracing::info!(
            "built fan compartment: hull r={:.3} length={:.3}",
            self.hull_radius,
            self.wall_height()
        );
        Ok(wall.union(&floor).with_name(self.name()))
    }

    fn build_for_print(&self) -> KernelResult<PrintParts> {
        let solid = flipped_for_print(&self.build()?);
        Ok((solid.clone(), vec![solid]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compartment() -> FanCompartmentBuilder {
        FanCompartmentBuilder::new(6.74, 21.3, 1.78, 2.6625)
    }

    #[test]
    fn test_hull_radius_includes_walls() {
        let builder = compartment();
        assert!((builder.hull_radius - (6.74 + 3.56)).abs() < 1e-12);
    }

    #[test]
    fn test_compartment_extent() {
        let builder = compartment();
        let bb = builder.build().unwrap().bounding_box().unwrap();
        let r = builder.hull_radius;

        assert!(bb.min.z.abs() < 1e-4);
        assert!((bb.max.z - 21.3).abs() < 1e-4);
        // outlet duct reaches past the hull
        assert!((bb.max.x - (r + builder.outward_overhang)).abs() < 1e-3);
        assert!((bb.max.y - r).abs() < 1e-3);
        // lower duct wall hangs one wall thickness below the axis
        assert!((bb.min.y + r).abs() < 0.01);
        assert!((bb.min.x + r).abs() < 0.01);
    }

    #[test]
    fn test_hotfix_extends_wall() {
        let builder = compartment().with_hotfix_length(true);
        let bb = builder.build().unwrap().bounding_box().unwrap();
        assert!((bb.max.z - (21.3 + 3.5 * 1.78)).abs() < 1e-3);
    }

    #[test]
    fn test_capped_outline_differs() {
        let builder = compartment();
        let open = builder
            .outline(builder.hull_radius, false)
            .extrude(Plane::XY, 1.0)
            .unwrap();
        let capped = builder
            .outline(builder.hull_radius, true)
            .extrude(Plane::XY, 1.0)
            .unwrap();
        assert!(capped.volume() < open.volume());
    }

    #[test]
    fn test_compartment_print_is_flipped_onto_bed() {
        let (solid, parts) = compartment().build_for_print().unwrap();
        assert_eq!(parts.len(), 1);
        let bb = solid.bounding_box().unwrap();
        assert!(bb.min.z.abs() < 1e-4);
        assert!((bb.max.z - 21.3).abs() < 1e-3);
    }
}
