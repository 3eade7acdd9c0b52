// Library crate: part builders, kernel boundary, export and monitors.
// The binary only parses arguments and wires config into the use case.

pub mod build;
pub mod config;
pub mod export;
pub mod fixtures;
pub mod kernel;
pub mod math;
pub mod monitor;
pub mod use_case;
pub mod validation;
