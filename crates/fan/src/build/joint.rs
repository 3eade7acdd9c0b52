//! Screw joints: a disk with hexagonal nut pockets and matching bosses.

use glam::DVec2;

use super::{rest_on_bed, PartBuilder, PrintParts};
use crate::kernel::{KernelResult, Mode, Plane, Sketch, Solid};
use crate::math::radial_pattern;

const MOTOR_SHAFT_RADIUS: f64 = 0.65;

/// Disk joint with `num_screws` evenly spaced screw positions.
#[derive(Debug, Clone, PartialEq)]
pub struct JointBuilder {
    pub radius: f64,
    pub thickness: f64,
    pub num_screws: usize,
    pub screw_inner: f64,
    /// Circumradius of the hexagonal nut pocket.
    pub nut_side: f64,
    /// Distance of the screw centers from the rim.
    pub from_outside: f64,
    /// Central bore, used by the motor variant.
    pub shaft_radius: Option<f64>,
}

impl JointBuilder {
    /// M3 joint: 10 mm disk, three screws.
    pub fn m3_5() -> Self {
        Self {
            radius: 10.0,
            thickness: 2.1,
            num_screws: 3,
            screw_inner: 3.0 / 2.0,
            nut_side: 6.5 / 2.0,
            from_outside: 4.0,
            shaft_radius: None,
        }
    }

    pub fn screw_centers(&self) -> Vec<DVec2> {
        radial_pattern(
            DVec2::new(0.0, self.radius - self.from_outside),
            self.num_screws,
        )
    }

    /// Disk with nut pockets (and the shaft bore when present).
    pub fn build_base(&self) -> KernelResult<Solid> {
        let mut sketch = Sketch::new().circle(self.radius, Mode::Add);
        for center in self.screw_centers() {
            sketch = sketch
                .push([center])
                .regular_polygon(self.nut_side, 6, Mode::Subtract);
        }
        sketch = sketch.reset();
        if let Some(shaft) = self.shaft_radius {
            sketch = sketch.circle(shaft, Mode::Subtract);
        }
        sketch.extrude(Plane::XY, self.thickness)
    }

    /// Hexagonal bosses with screw holes, matching the nut pockets.
    pub fn build_connections(&self) -> KernelResult<Solid> {
        let centers = self.screw_centers();
        Sketch::new()
            .push(centers.clone())
            .regular_polygon(self.nut_side, 6, Mode::Add)
            .push(centers)
            .circle(self.screw_inner, Mode::Subtract)
            .extrude(Plane::XY, self.thickness - self.thickness / 2.3)
    }
}

impl PartBuilder for JointBuilder {
    fn name(&self) -> &'static str {
        "joint"
    }

    fn build(&self) -> KernelResult<Solid> {
        let mut joint = self.build_base()?.with_name(self.name());
        if self.num_screws > 0 {
            joint = joint.add(&self.build_connections()?);
        }
        Ok(joint)
    }

    /// Base and bosses print as separate bodies.
    fn build_for_print(&self) -> KernelResult<PrintParts> {
        let solid = rest_on_bed(&self.build()?);
        let parts = solid.bodies();
        Ok((solid, parts))
    }
}

/// Joint on the motor shaft: a joint with a central shaft bore.
#[derive(Debug, Clone, PartialEq)]
pub struct MotorJoint(pub JointBuilder);

impl MotorJoint {
    pub fn m3_5() -> Self {
        Self(JointBuilder {
            shaft_radius: Some(MOTOR_SHAFT_RADIUS),
            ..JointBuilder::m3_5()
        })
    }

    /// Plain hub of `radius` and `length` without screws.
    pub fn no_screw(radius: f64, length: f64) -> Self {
        Self(JointBuilder {
            radius,
            thickness: length,
            num_screws: 0,
            shaft_radius: Some(MOTOR_SHAFT_RADIUS),
            ..JointBuilder::m3_5()
        })
    }
}

impl PartBuilder for MotorJoint {
    fn name(&self) -> &'static str {
        "motor_joint"
    }

    fn build(&self) -> KernelResult<Solid> {
        Ok(self.0.build()?.with_name(self.name()))
    }

    fn build_for_print(&self) -> KernelResult<PrintParts> {
        self.0.build_for_print()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screw_centers_on_pattern() {
        for n in [1, 2, 3, 4, 6, 8] {
            let joint = JointBuilder {
                num_screws: n,
                ..JointBuilder::m3_5()
            };
            let centers = joint.screw_centers();
            assert_eq!(centers.len(), n);
            assert!((centers[0] - DVec2::new(0.0, 6.0)).length() < 1e-12);

            let step = 360.0 / n as f64;
            for (i, c) in centers.iter().enumerate() {
                assert!((c.length() - 6.0).abs() < 1e-12, "n={n} center {i} off radius");
                let angle = c.y.atan2(c.x).to_degrees();
                let expected = 90.0 + step * i as f64;
                let diff = (angle - expected).rem_euclid(360.0);
                assert!(diff < 1e-9 || diff > 360.0 - 1e-9, "n={n} center {i} at {angle}");
            }
        }
    }

    #[test]
    fn test_m3_joint_is_compound() {
        let solid = JointBuilder::m3_5().build().unwrap();
        assert_eq!(solid.body_count(), 2);
        let bb = solid.bounding_box().unwrap();
        assert!((bb.max.z - 2.1).abs() < 1e-4);
    }

    #[test]
    fn test_joint_print_parts_are_bodies() {
        let (solid, parts) = JointBuilder::m3_5().build_for_print().unwrap();
        assert_eq!(parts.len(), 2);
        assert!(solid.bounding_box().unwrap().min.z.abs() < 1e-5);
        let boss_height = parts[1].bounding_box().unwrap().size().z;
        assert!((boss_height - (2.1 - 2.1 / 2.3)).abs() < 1e-4);
    }

    #[test]
    fn test_no_screw_motor_joint() {
        let joint = MotorJoint::no_screw(2.8, 6.0);
        let solid = joint.build().unwrap();
        assert_eq!(solid.body_count(), 1);
        assert_eq!(solid.name(), "motor_joint");

        let pi = std::f64::consts::PI;
        let expected = pi * (2.8 * 2.8 - 0.65 * 0.65) * 6.0;
        assert!((solid.volume() - expected).abs() / expected < 0.01);
    }
}
