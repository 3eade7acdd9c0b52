//! Factory functions for test data: default dimensions, builders and
//! scripted monitors.

use std::cell::RefCell;
use std::rc::Rc;

use shared::{default_parameters, FanDimensions};

use crate::build::FanBuilder;
use crate::kernel::{Mode, Plane, Sketch, Solid};
use crate::monitor::{Monitor, MonitorError, ShowOptions, ShowOutcome, Unavailable};
use crate::use_case::default_fan;

// ── Dimensions and builders ─────────────────────────────────────

/// Dimensions evaluated from the default parameter table.
pub fn default_dimensions() -> FanDimensions {
    match FanDimensions::resolve(&default_parameters()) {
        Ok(dims) => dims,
        Err(e) => panic!("default parameters must resolve: {e}"),
    }
}

/// The default fan assembly.
pub fn default_fan_builder() -> FanBuilder {
    default_fan(&default_dimensions())
}

/// Axis-aligned box with its bottom face at z = 0, centered in XY.
pub fn block(name: &str, w: f64, d: f64, h: f64) -> Solid {
    match Sketch::new().rect(w, d, Mode::Add).extrude(Plane::XY, h) {
        Ok(solid) => solid.with_name(name),
        Err(e) => panic!("block {name}: {e}"),
    }
}

// ── Monitors ────────────────────────────────────────────────────

/// What a `ScriptedMonitor` answers.
#[derive(Debug, Clone)]
pub enum Script {
    Show,
    Unavailable(String),
    Fail,
}

/// Monitor with a fixed answer that records the names it was asked to show.
#[derive(Debug, Clone)]
pub struct ScriptedMonitor {
    name: String,
    script: Script,
    shown: Rc<RefCell<Vec<String>>>,
}

impl ScriptedMonitor {
    pub fn new(name: &str, script: Script) -> Self {
        Self {
            name: name.to_string(),
            script,
            shown: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn showing(name: &str) -> Self {
        Self::new(name, Script::Show)
    }

    pub fn unavailable(name: &str) -> Self {
        Self::new(name, Script::Unavailable(format!("{name} is not installed")))
    }

    pub fn failing(name: &str) -> Self {
        Self::new(name, Script::Fail)
    }

    /// Shared handle to the call log; survives boxing the monitor.
    pub fn calls(&self) -> Rc<RefCell<Vec<String>>> {
        self.shown.clone()
    }

    pub fn boxed(self) -> Box<dyn Monitor> {
        Box::new(self)
    }
}

impl Monitor for ScriptedMonitor {
    fn name(&self) -> &str {
        &self.name
    }

    fn show_object(
        &mut self,
        solid: &Solid,
        options: &ShowOptions,
    ) -> Result<ShowOutcome, MonitorError> {
        self.shown
            .borrow_mut()
            .push(options.display_name(solid).to_string());
        match &self.script {
            Script::Show => Ok(ShowOutcome::Shown),
            Script::Unavailable(reason) => {
                Ok(ShowOutcome::Unavailable(Unavailable::new(&self.name, reason)))
            }
            Script::Fail => Err(MonitorError::Transport(format!("{} broke", self.name))),
        }
    }
}
