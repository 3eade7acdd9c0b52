//! Part builders: parameterized recipes that turn dimensions into solids.
//!
//! Every builder constructs its part at the origin in a canonical
//! orientation (`build`) and can reorient it for printing
//! (`build_for_print`). Printed solids always rest on the bed (z min = 0).

mod centrifuge;
mod cylindrical_holder;
mod fan;
mod fan_compartment;
mod joint;
mod motor_holder;
mod pen_holder;
mod spline_connector;

pub use centrifuge::CentrifugeBuilder;
pub use cylindrical_holder::CylindricalHolderBuilder;
pub use fan::{FanBuilder, PartKind, PRINT_GAP};
pub use fan_compartment::FanCompartmentBuilder;
pub use joint::{JointBuilder, MotorJoint};
pub use motor_holder::FanMotorHolderBuilder;
pub use pen_holder::PenHolderBuilder;
pub use spline_connector::SplineConnectorBuilder;

use glam::DVec3;

use crate::kernel::{Axis, KernelResult, Solid};

/// Print layout plus the separately printable solids it is made of.
pub type PrintParts = (Solid, Vec<Solid>);

/// Construction recipe for one component.
pub trait PartBuilder {
    /// Short identifier used for solid names and logs.
    fn name(&self) -> &'static str;

    /// Build the part at the origin.
    fn build(&self) -> KernelResult<Solid>;

    /// The built part resting on the bed, as its own single print part.
    fn build_for_print(&self) -> KernelResult<PrintParts> {
        let solid = rest_on_bed(&self.build()?);
        Ok((solid.clone(), vec![solid]))
    }
}

/// Translate `solid` along Z so its lowest point sits at z = 0.
pub fn rest_on_bed(solid: &Solid) -> Solid {
    match solid.bounding_box() {
        Some(bb) => solid.translate(DVec3::new(0.0, 0.0, -bb.min.z)),
        None => solid.clone(),
    }
}

/// Turn `solid` upside down (180° about Y) and rest it on the bed.
pub fn flipped_for_print(solid: &Solid) -> Solid {
    rest_on_bed(&solid.rotate(Axis::Y, 180.0))
}

/// Stack `part` on top of `scene`.
///
/// Without an explicit amount the part is lifted by `scene.zmax - part.zmin`
/// (an empty scene counts as zmax = 0). Returns the applied amount.
///
/// Both bounds are queried even with an explicit amount so the scene keeps
/// its cached bounds and the next call does not tessellate it again.
pub fn add_to_top(scene: &mut Solid, part: &Solid, translate: Option<f64>) -> f64 {
    let top = scene.bounding_box().map_or(0.0, |bb| bb.max.z);
    let bottom = part.bounding_box().map_or(0.0, |bb| bb.min.z);
    let amount = translate.unwrap_or(top - bottom);

    tracing::debug!("add_to_top: {} lifted by {:.3}", part.name(), amount);
    *scene = scene.add(&part.translate(DVec3::new(0.0, 0.0, amount)));
    amount
}

/// Place `part` to the +X side of `scene`, `extra` apart.
///
/// Without an explicit amount the part moves by `scene.xmax - part.xmin`.
/// Returns the applied amount including `extra`.
pub fn add_to_side(
    scene: &mut Solid,
    part: &Solid,
    translate: Option<f64>,
    extra: Option<f64>,
) -> f64 {
    let right = scene.bounding_box().map_or(0.0, |bb| bb.max.x);
    let left = part.bounding_box().map_or(0.0, |bb| bb.min.x);
    let base = translate.unwrap_or(right - left);
    let amount = base + extra.unwrap_or(0.0);

    tracing::debug!("add_to_side: {} shifted by {:.3}", part.name(), amount);
    *scene = scene.add(&part.translate(DVec3::new(amount, 0.0, 0.0)));
    amount
}
