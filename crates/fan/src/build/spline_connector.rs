//! Flared funnel joining the pen holder to the fan housing.

use std::rc::Rc;

use glam::DVec2;

use super::{flipped_for_print, FanCompartmentBuilder, PartBuilder, PenHolderBuilder, PrintParts};
use crate::kernel::{revolve, spline_points, KernelResult, Profile, Solid};

/// Normalized (radial, axial) control points of the flare.
const FLARE_CURVE: [(f64, f64); 5] = [
    (0.0, 0.0),
    (0.125, 0.25),
    (0.5, 0.5),
    (0.875, 0.75),
    (1.0, 1.0),
];

/// Revolved band that widens from the pen holder bore to the housing wall.
#[derive(Debug, Clone)]
pub struct SplineConnectorBuilder {
    pub pen_holder: Rc<PenHolderBuilder>,
    pub compartment: Rc<FanCompartmentBuilder>,
    pub connector_length: f64,
}

impl SplineConnectorBuilder {
    pub fn new(
        pen_holder: Rc<PenHolderBuilder>,
        compartment: Rc<FanCompartmentBuilder>,
        connector_length: f64,
    ) -> Self {
        Self {
            pen_holder,
            compartment,
            connector_length,
        }
    }

    /// Inner edge of the band as `(r, z)` control points.
    pub fn control_points(&self) -> Vec<DVec2> {
        let pen_radius = self.pen_holder.pen_radius;
        let spread =
            self.compartment.hull_radius - pen_radius - self.compartment.thickness;

        FLARE_CURVE
            .iter()
            .map(|&(x, z)| DVec2::new(pen_radius + x * spread, z * self.connector_length))
            .collect()
    }

    /// Closed `(r, z)` outline of the band, one holder thickness wide.
    pub fn outline(&self) -> KernelResult<Profile> {
        let inner = spline_points(&self.control_points());
        let width = DVec2::new(self.pen_holder.thickness, 0.0);
        let outer = inner.iter().rev().map(|p| *p + width);

        Profile::from_points(inner.iter().copied().chain(outer))
    }
}

impl PartBuilder for SplineConnectorBuilder {
    fn name(&self) -> &'static str {
        "spline_connector"
    }

    fn build(&self) -> KernelResult<Solid> {
        let solid = revolve(self.name(), &self.outline()?)?;
        tracing::info!(
            "built spline connector: length={:.3}",
            self.connector_length
        );
        Ok(solid)
    }

    fn build_for_print(&self) -> KernelResult<PrintParts> {
        let solid = flipped_for_print(&self.build()?);
        Ok((solid.clone(), vec![solid]))
    }
}
