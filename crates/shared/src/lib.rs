//! Measurements, parameter tables and resolved dimensions shared by the fan
//! builder crates.

pub mod dimensions;
pub mod measurements;
pub mod parameters;

pub use dimensions::{default_parameters, FanDimensions};
pub use measurements::{median, PenMeasurements, Z1MotorMeasurements};
pub use parameters::{Parameter, ParameterError, ParameterResult, ParameterTable, ParameterValue};
