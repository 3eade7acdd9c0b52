//! The default fan: builders wired from the measured dimensions, shown part
//! by part or written out for printing.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::DVec3;
use shared::{default_parameters, FanDimensions, ParameterError};

use crate::build::{
    CentrifugeBuilder, FanBuilder, FanCompartmentBuilder, FanMotorHolderBuilder, PartBuilder,
    PartKind, PenHolderBuilder, SplineConnectorBuilder,
};
use crate::config::FanConfig;
use crate::export::{write_print_files, ExportError};
use crate::kernel::KernelError;
use crate::monitor::{Monitor, MonitorError, ShowOptions};

/// Height at which each part is shown, bottom to top.
pub const SHOW_OFFSETS: [(PartKind, f64); 5] = [
    (PartKind::PenHolder, 0.0),
    (PartKind::Connector, 20.0),
    (PartKind::Compartment, 40.0),
    (PartKind::Centrifuge, 70.0),
    (PartKind::MotorHolder, 100.0),
];

#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("parameter error: {0}")]
    Parameter(#[from] ParameterError),
    #[error("geometry error: {0}")]
    Kernel(#[from] KernelError),
    #[error(transparent)]
    Monitor(#[from] MonitorError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Default parameters with the config overrides applied, evaluated.
pub fn resolve_dimensions(config: &FanConfig) -> Result<FanDimensions, UseCaseError> {
    let mut table = default_parameters();
    table.merge(&config.parameters);
    Ok(FanDimensions::resolve(&table)?)
}

/// Builders of the default fan assembly.
pub fn default_fan(dims: &FanDimensions) -> FanBuilder {
    let pen_holder = Rc::new(PenHolderBuilder::new(
        dims.holder_thickness,
        dims.holder_pen_radius,
        dims.holder_connection_length,
    ));
    let compartment = Rc::new(FanCompartmentBuilder::new(
        dims.hull_radius,
        dims.hull_length,
        dims.hull_thickness,
        dims.outward_overhang,
    ));
    let motor_holder = Rc::new(FanMotorHolderBuilder::new(
        compartment.clone(),
        dims.motor_radius,
        dims.motor_length,
    ));
    let connector = Rc::new(SplineConnectorBuilder::new(
        pen_holder.clone(),
        compartment.clone(),
        dims.connector_length,
    ));
    let centrifuge = Rc::new(
        CentrifugeBuilder::new(
            compartment.clone(),
            dims.inside_slack,
            dims.inner_ring_radius,
            dims.blade_angle,
        )
        .with_fan_length_offset(dims.fan_length_offset)
        .with_holder_thickness(dims.shaft_holder_thickness),
    );

    FanBuilder::new(pen_holder, connector, compartment, centrifuge, motor_holder)
}

/// Show every part at its offset; the first call clears the view.
pub fn show_parts(fan: &FanBuilder, monitor: &mut dyn Monitor) -> Result<(), UseCaseError> {
    for (i, (kind, z)) in SHOW_OFFSETS.into_iter().enumerate() {
        let solid = fan
            .builder(kind)
            .build()?
            .translate(DVec3::new(0.0, 0.0, z));
        let options = ShowOptions {
            clear: i == 0,
            ..ShowOptions::default()
        }
        .named(kind.as_str());
        monitor.show_object(&solid, &options)?;
    }
    Ok(())
}

/// Stack the selected parts and show them as one scene.
pub fn show_selection(
    fan: &FanBuilder,
    kinds: &[PartKind],
    monitor: &mut dyn Monitor,
) -> Result<(), UseCaseError> {
    let (scene, _) = fan.build_selected(kinds)?;
    monitor.show_object(&scene, &ShowOptions::cleared())?;
    Ok(())
}

/// Write the print layout (GLB) and each print part (STL) into `dir`.
pub fn write_print_layout(fan: &FanBuilder, dir: &Path) -> Result<Vec<PathBuf>, UseCaseError> {
    let (layout, parts) = fan.build_for_print()?;
    Ok(write_print_files(&layout, &parts, dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_increase() {
        assert!(SHOW_OFFSETS.windows(2).all(|w| w[0].1 < w[1].1));
        assert_eq!(SHOW_OFFSETS.len(), PartKind::ALL.len());
    }

    #[test]
    fn test_default_fan_shares_compartment() {
        let dims = resolve_dimensions(&FanConfig::default()).unwrap();
        let fan = default_fan(&dims);
        assert!(Rc::ptr_eq(&fan.compartment, &fan.centrifuge.compartment));
        assert!(Rc::ptr_eq(&fan.compartment, &fan.motor_holder.compartment));
        assert!(Rc::ptr_eq(&fan.pen_holder, &fan.connector.pen_holder));
        assert!((fan.compartment.hull_radius - (dims.hull_radius + 2.0 * dims.hull_thickness)).abs() < 1e-12);
    }

    #[test]
    fn test_config_override_reaches_builders() {
        let mut config = FanConfig::default();
        config.parameters.set_number("inside_slack", 0.5);
        let fan = default_fan(&resolve_dimensions(&config).unwrap());
        assert_eq!(fan.centrifuge.inside_slack, 0.5);
    }

    #[test]
    fn test_bad_override_fails() {
        let mut config = FanConfig::default();
        config.parameters.set_formula("hull_length", "hull_length * 2");
        assert!(matches!(
            resolve_dimensions(&config),
            Err(UseCaseError::Parameter(ParameterError::CircularDependency(_)))
        ));
    }
}
