//! Impeller: curved blades on a base ring, closed by a top disc with the
//! motor shaft hub.

use std::rc::Rc;

use glam::{DVec2, DVec3};

use super::{FanCompartmentBuilder, MotorJoint, PartBuilder};
use crate::kernel::{Axis, KernelResult, Mode, Plane, Profile, Sketch, Solid, Wire};
use crate::math::{pattern_angles_deg, perpendicular, rotate_around_origin};

const HUB_LENGTH: f64 = 6.0;

/// Centrifugal impeller sized to spin inside a fan compartment.
#[derive(Debug, Clone)]
pub struct CentrifugeBuilder {
    pub compartment: Rc<FanCompartmentBuilder>,
    pub inside_slack: f64,
    pub inner_ring_radius: f64,
    /// Angle between the blade root and tip directions (radians).
    pub blade_angle: f64,
    pub fan_length_offset: f64,
    pub top_height: Option<f64>,
    pub holder_thickness: Option<f64>,
    pub num_blades: usize,
    pub blade_midpoint_deviation_ratio: f64,
    pub blade_follower_deviation_ratio: f64,
}

impl CentrifugeBuilder {
    pub fn new(
        compartment: Rc<FanCompartmentBuilder>,
        inside_slack: f64,
        inner_ring_radius: f64,
        blade_angle: f64,
    ) -> Self {
        Self {
            compartment,
            inside_slack,
            inner_ring_radius,
            blade_angle,
            fan_length_offset: 0.0,
            top_height: None,
            holder_thickness: None,
            num_blades: 8,
            blade_midpoint_deviation_ratio: 1.0 / 3.2,
            blade_follower_deviation_ratio: 1.0 / 2.3,
        }
    }

    pub fn with_fan_length_offset(mut self, offset: f64) -> Self {
        self.fan_length_offset = offset;
        self
    }

    pub fn with_top_height(mut self, top_height: f64) -> Self {
        self.top_height = Some(top_height);
        self
    }

    pub fn with_holder_thickness(mut self, holder_thickness: f64) -> Self {
        self.holder_thickness = Some(holder_thickness);
        self
    }

    pub fn fan_radius(&self) -> f64 {
        self.compartment.hull_radius - self.compartment.thickness - self.inside_slack
    }

    pub fn base_height(&self) -> f64 {
        self.compartment.thickness / 2.0
    }

    pub fn top_height(&self) -> f64 {
        self.top_height
            .unwrap_or(self.compartment.thickness / 2.0)
    }

    /// Height of the blades, measured from the bottom of the base ring.
    pub fn fan_height(&self) -> f64 {
        self.compartment.hull_length - 5.0 * self.compartment.thickness
            - self.base_height() * 2.0
            + self.top_height()
            + self.fan_length_offset
    }

    pub fn holder_thickness(&self) -> f64 {
        self.holder_thickness
            .unwrap_or(self.compartment.thickness * 2.0)
    }

    /// Crescent blade outline from the inner ring out to the fan radius.
    pub fn blade_profile(&self) -> KernelResult<Profile> {
        let fan_radius = self.fan_radius();
        let tip = rotate_around_origin(DVec2::new(0.0, fan_radius), self.blade_angle);
        let perp = perpendicular(tip);
        let midpoint = tip / 2.0;

        let leading_mid = midpoint - perp * fan_radius * self.blade_midpoint_deviation_ratio;
        let trailing_mid = midpoint - perp * fan_radius * self.blade_follower_deviation_ratio;
        let root = DVec2::new(0.0, self.inner_ring_radius);

        Wire::new(root)
            .three_point_arc(leading_mid, tip)?
            .move_to(tip)
            .three_point_arc(trailing_mid, root)?
            .close()
    }

    /// Blades repeated around Z, fused with the base ring.
    pub fn build_fan_and_bottom(&self) -> KernelResult<Solid> {
        let blade = Sketch::new()
            .wire(&self.blade_profile()?, Mode::Add)
            .extrude(Plane::XY, self.fan_height())?;

        let mut blades = Solid::empty("blades");
        for angle in pattern_angles_deg(self.num_blades) {
            blades = blades.add(&blade.rotate(Axis::Z, angle));
        }

        let ring = Sketch::new()
            .circle(self.fan_radius(), Mode::Add)
            .circle(self.inner_ring_radius, Mode::Subtract)
            .extrude(Plane::XY, self.base_height())?;

        Ok(blades.union(&ring))
    }

    /// Top disc plus the shaft hub, lifted to the blade tops.
    pub fn build_top(&self) -> KernelResult<Solid> {
        let lift = DVec3::new(0.0, 0.0, self.fan_height());

        let disc = Sketch::new()
            .circle(self.fan_radius(), Mode::Add)
            .extrude(Plane::XY, self.top_height())?
            .translate(lift);
        let hub = MotorJoint::no_screw(self.holder_thickness(), HUB_LENGTH)
            .build()?
            .translate(lift);

        Ok(disc.add(&hub))
    }
}

impl PartBuilder for CentrifugeBuilder {
    fn name(&self) -> &'static str {
        "centrifuge"
    }

    fn build(&self) -> KernelResult<Solid> {
        let fan = self.build_fan_and_bottom()?.union(&self.build_top()?);
        tracing::info!(
            "built centrifuge: r={:.3} height={:.3} blades={}",
            self.fan_radius(),
            self.fan_height(),
            self.num_blades
        );
        Ok(fan.with_name(self.name()))
    }
}
