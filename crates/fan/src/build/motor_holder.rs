//! Lid of the fan compartment carrying the motor sleeve.

use std::rc::Rc;

use super::{flipped_for_print, FanCompartmentBuilder, PartBuilder, PrintParts};
use crate::kernel::{KernelResult, Mode, Plane, Sketch, Solid};

/// Lid that slips over the compartment wall and holds the motor.
#[derive(Debug, Clone)]
pub struct FanMotorHolderBuilder {
    pub compartment: Rc<FanCompartmentBuilder>,
    pub thickness: f64,
    pub motor_radius: f64,
    pub motor_length: f64,
    /// Bore scale for a press fit on the motor can.
    pub tighten: f64,
}

impl FanMotorHolderBuilder {
    pub fn new(compartment: Rc<FanCompartmentBuilder>, motor_radius: f64, motor_length: f64) -> Self {
        let thickness = compartment.thickness;
        Self {
            compartment,
            thickness,
            motor_radius,
            motor_length,
            tighten: 1.03,
        }
    }

    /// Outer radius of the lid rim, enlarged to clear the housing wall.
    pub fn rim_radius(&self) -> f64 {
        self.compartment.hull_radius + self.thickness * 0.95
    }

    pub fn bore_radius(&self) -> f64 {
        self.motor_radius * self.tighten
    }

    pub fn sleeve_radius(&self) -> f64 {
        self.bore_radius() * 1.4
    }
}

impl PartBuilder for FanMotorHolderBuilder {
    fn name(&self) -> &'static str {
        "fan_motor_holder"
    }

    fn build(&self) -> KernelResult<Solid> {
        let t = self.thickness;
        let rim = self.rim_radius();

        let around = self
            .compartment
            .outline(rim, false)
            .extrude(Plane::XY, t)?;
        let skirt = self
            .compartment
            .outline(rim, true)
            .extrude(Plane::XY, -t * 3.0)?;
        let base = self.compartment.base(rim).extrude(Plane::XY, t)?;

        let fill = Sketch::new()
            .circle(rim, Mode::Add)
            .circle(self.bore_radius(), Mode::Subtract)
            .extrude(Plane::XY, t)?;

        let sleeve = Sketch::new()
            .circle(self.sleeve_radius(), Mode::Add)
            .circle(self.bore_radius(), Mode::Subtract)
            .extrude(Plane::XY, self.motor_length)?;

        tracing::info!(
            "built motor holder: rim r={:.3} bore r={:.3}",
            rim,
            self.bore_radius()
        );
        Ok(base
            .union(&around.add(&skirt))
            .union(&fill)
            .union(&sleeve)
            .with_name(self.name()))
    }

    fn build_for_print(&self) -> KernelResult<PrintParts> {
        let solid = flipped_for_print(&self.build()?);
        Ok((solid.clone(), vec![solid]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder() -> FanMotorHolderBuilder {
        let compartment = Rc::new(FanCompartmentBuilder::new(6.74, 21.3, 1.78, 2.6625));
        FanMotorHolderBuilder::new(compartment, 4.03, 16.0)
    }

    #[test]
    fn test_holder_does_not_change_compartment() {
        let h = holder();
        let before = h.compartment.hull_radius;
        h.build().unwrap();
        assert_eq!(h.compartment.hull_radius, before);
        assert!((h.rim_radius() - (before + 1.78 * 0.95)).abs() < 1e-12);
    }

    #[test]
    fn test_holder_extent() {
        let h = holder();
        let solid = h.build().unwrap();
        assert_eq!(solid.body_count(), 1);
        let bb = solid.bounding_box().unwrap();
        assert!((bb.min.z + 3.0 * 1.78).abs() < 1e-4);
        assert!((bb.max.z - 16.0).abs() < 1e-4);
        assert!((bb.min.x + h.rim_radius()).abs() < 0.01);
    }

    #[test]
    fn test_holder_print_rests_on_bed() {
        let (solid, _) = holder().build_for_print().unwrap();
        let bb = solid.bounding_box().unwrap();
        assert!(bb.min.z.abs() < 1e-4);
        assert!((bb.max.z - (16.0 + 3.0 * 1.78)).abs() < 1e-3);
    }
}
