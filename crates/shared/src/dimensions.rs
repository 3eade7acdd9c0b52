//! Default parameter set of the fan and the resolved dimensions the part
//! builders are constructed from.

use serde::{Deserialize, Serialize};

use crate::measurements::{PenMeasurements, Z1MotorMeasurements};
use crate::parameters::{Parameter, ParameterError, ParameterTable};

/// Parameter table seeded from the measurement tables.
///
/// Derived dimensions are formulas, so overriding a measurement propagates
/// to every part that depends on it.
pub fn default_parameters() -> ParameterTable {
    let mut table = ParameterTable::new();

    let measured = [
        ("pen_outer_radius", PenMeasurements::outer_radius(), "Pen barrel outer radius"),
        ("pen_thickness", PenMeasurements::thickness(), "Pen barrel wall thickness"),
        ("motor_diameter", Z1MotorMeasurements::DIAMETER, "Z1 motor diameter"),
        ("motor_length", Z1MotorMeasurements::LENGTH, "Z1 motor length"),
    ];
    for (name, value, description) in measured {
        table.insert(
            name,
            Parameter::number(value)
                .with_unit("mm")
                .with_description(description),
        );
    }

    let derived = [
        ("holder_thickness", "pen_thickness * 2.0", "mm"),
        ("holder_pen_radius", "pen_outer_radius / 2.0", "mm"),
        ("holder_connection_length", "pen_outer_radius * 3.0 / 4.0", "mm"),
        ("hull_radius", "pen_outer_radius * 1.2 - holder_thickness", "mm"),
        ("hull_length", "pen_outer_radius * 3.0", "mm"),
        ("hull_thickness", "holder_thickness", "mm"),
        ("outward_overhang", "holder_pen_radius * 3.0 / 4.0", "mm"),
        ("motor_radius", "motor_diameter / 2.0", "mm"),
        ("connector_length", "pen_outer_radius", "mm"),
        ("inside_slack", "holder_thickness * 1.2", "mm"),
        ("inner_ring_radius", "pen_outer_radius / 2.0", "mm"),
        ("blade_angle", "PI / 3.5", "rad"),
        ("fan_length_offset", "hull_thickness * 3.0", "mm"),
        ("shaft_holder_thickness", "motor_diameter / 2.0 * 0.7", "mm"),
    ];
    for (name, expression, unit) in derived {
        table.insert(name, Parameter::formula(expression).with_unit(unit));
    }

    table
}

/// Every dimension the default fan assembly needs, evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanDimensions {
    pub holder_thickness: f64,
    pub holder_pen_radius: f64,
    pub holder_connection_length: f64,
    pub hull_radius: f64,
    pub hull_length: f64,
    pub hull_thickness: f64,
    pub outward_overhang: f64,
    pub motor_radius: f64,
    pub motor_length: f64,
    pub connector_length: f64,
    pub inside_slack: f64,
    pub inner_ring_radius: f64,
    pub blade_angle: f64,
    pub fan_length_offset: f64,
    pub shaft_holder_thickness: f64,
}

impl FanDimensions {
    pub fn resolve(table: &ParameterTable) -> Result<Self, ParameterError> {
        Ok(Self {
            holder_thickness: table.evaluate("holder_thickness")?,
            holder_pen_radius: table.evaluate("holder_pen_radius")?,
            holder_connection_length: table.evaluate("holder_connection_length")?,
            hull_radius: table.evaluate("hull_radius")?,
            hull_length: table.evaluate("hull_length")?,
            hull_thickness: table.evaluate("hull_thickness")?,
            outward_overhang: table.evaluate("outward_overhang")?,
            motor_radius: table.evaluate("motor_radius")?,
            motor_length: table.evaluate("motor_length")?,
            connector_length: table.evaluate("connector_length")?,
            inside_slack: table.evaluate("inside_slack")?,
            inner_ring_radius: table.evaluate("inner_ring_radius")?,
            blade_angle: table.evaluate("blade_angle")?,
            fan_length_offset: table.evaluate("fan_length_offset")?,
            shaft_holder_thickness: table.evaluate("shaft_holder_thickness")?,
        })
    }
}
