//! Sleeve that slides onto the pen barrel.

use glam::DVec3;

use super::PartBuilder;
use crate::kernel::{KernelResult, Mode, Plane, Sketch, Solid};

/// Tube centered on z = 0 gripping the pen.
#[derive(Debug, Clone, PartialEq)]
pub struct PenHolderBuilder {
    pub thickness: f64,
    pub pen_radius: f64,
    pub pen_connection_length: f64,
    /// Bore enlargement relative to the pen radius.
    pub slack: f64,
}

impl PenHolderBuilder {
    pub fn new(thickness: f64, pen_radius: f64, pen_connection_length: f64) -> Self {
        Self {
            thickness,
            pen_radius,
            pen_connection_length,
            slack: 0.0,
        }
    }

    pub fn outer_radius(&self) -> f64 {
        self.pen_radius + self.thickness
    }

    pub fn bore_radius(&self) -> f64 {
        self.pen_radius * (1.0 + self.slack)
    }
}

impl PartBuilder for PenHolderBuilder {
    fn name(&self) -> &'static str {
        "pen_holder"
    }

    fn build(&self) -> KernelResult<Solid> {
        let tube = Sketch::new()
            .circle(self.outer_radius(), Mode::Add)
            .circle(self.bore_radius(), Mode::Subtract)
            .extrude(Plane::XY, self.pen_connection_length)?;

        tracing::info!(
            "built pen holder: r={:.3} t={:.3} length={:.3}",
            self.pen_radius,
            self.thickness,
            self.pen_connection_length
        );
        Ok(tube
            .translate(DVec3::new(0.0, 0.0, -self.pen_connection_length / 2.0))
            .with_name(self.name()))
    }
}
