//! Debug visualization of built solids.
//!
//! A [`Monitor`] shows one solid at a time. Backends that cannot run in the
//! current environment answer with [`ShowOutcome::Unavailable`] instead of an
//! error, so a [`FallbackMonitor`] can move on to the next one.

mod console;
mod noop;
mod notebook;
mod viewer;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use console::ConsoleMonitor;
pub use noop::NoOpMonitor;
pub use notebook::NotebookMonitor;
pub use viewer::ViewerMonitor;

use crate::config::MonitorConfig;
use crate::export::ExportError;
use crate::kernel::Solid;

/// How the viewer camera reacts to a new object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraReset {
    /// Re-center on the new object, keep the view direction.
    #[default]
    Center,
    /// Back to the default view.
    Reset,
    /// Leave the camera alone.
    Keep,
}

impl CameraReset {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraReset::Center => "center",
            CameraReset::Reset => "reset",
            CameraReset::Keep => "keep",
        }
    }
}

/// Per-call display options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowOptions {
    /// Remove previously shown objects first.
    pub clear: bool,
    /// Overrides the backend's default camera behaviour.
    pub reset_camera: Option<CameraReset>,
    /// Display name; the solid's own name when absent.
    pub name: Option<String>,
}

impl ShowOptions {
    pub fn cleared() -> Self {
        Self {
            clear: true,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name<'a>(&'a self, solid: &'a Solid) -> &'a str {
        self.name.as_deref().unwrap_or(solid.name())
    }
}

/// Why a backend could not show anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    pub backend: String,
    pub reason: String,
}

impl Unavailable {
    pub fn new(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    Shown,
    Unavailable(Unavailable),
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("monitor '{0}' does not implement show_object")]
    NotImplemented(String),
    #[error("All monitors failed to show object:{}", format_causes(.0))]
    AllUnavailable(Vec<Unavailable>),
    #[error("viewer transport error: {0}")]
    Transport(String),
    #[error("viewer rejected the request with status {status}")]
    Rejected { status: u16 },
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_causes(causes: &[Unavailable]) -> String {
    causes
        .iter()
        .map(|cause| format!("\n\t{}", cause))
        .collect()
}

/// A visualization backend.
pub trait Monitor {
    fn name(&self) -> &str;

    fn show_object(
        &mut self,
        solid: &Solid,
        options: &ShowOptions,
    ) -> Result<ShowOutcome, MonitorError> {
        let _ = (solid, options);
        Err(MonitorError::NotImplemented(self.name().to_string()))
    }
}

/// Backend selector used in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Viewer,
    Notebook,
    Console,
    #[serde(rename = "noop")]
    NoOp,
}

/// Tries its backends in order until one shows the object.
pub struct FallbackMonitor {
    monitors: Vec<Box<dyn Monitor>>,
    last_shown: Option<String>,
}

impl FallbackMonitor {
    pub fn new(monitors: Vec<Box<dyn Monitor>>) -> Self {
        Self {
            monitors,
            last_shown: None,
        }
    }

    /// Chain built from the configured backend order.
    pub fn from_config(config: &MonitorConfig) -> Self {
        let monitors = config
            .backends
            .iter()
            .map(|kind| -> Box<dyn Monitor> {
                match kind {
                    BackendKind::Viewer => Box::new(ViewerMonitor::new(config.viewer.clone())),
                    BackendKind::Notebook => Box::new(NotebookMonitor::stdout()),
                    BackendKind::Console => Box::new(ConsoleMonitor::stdout()),
                    BackendKind::NoOp => Box::new(NoOpMonitor),
                }
            })
            .collect();
        Self::new(monitors)
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.monitors.iter().map(|m| m.name()).collect()
    }

    /// Backend that handled the most recent successful call.
    pub fn last_shown(&self) -> Option<&str> {
        self.last_shown.as_deref()
    }
}

impl fmt::Debug for FallbackMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackMonitor")
            .field("monitors", &self.backend_names())
            .field("last_shown", &self.last_shown)
            .finish()
    }
}

impl Monitor for FallbackMonitor {
    fn name(&self) -> &str {
        "fallback"
    }

    fn show_object(
        &mut self,
        solid: &Solid,
        options: &ShowOptions,
    ) -> Result<ShowOutcome, MonitorError> {
        let mut causes = Vec::new();
        for monitor in &mut self.monitors {
            match monitor.show_object(solid, options)? {
                ShowOutcome::Shown => {
                    if self.last_shown.as_deref() != Some(monitor.name()) {
                        tracing::info!("showing objects with '{}'", monitor.name());
                    }
                    self.last_shown = Some(monitor.name().to_string());
                    return Ok(ShowOutcome::Shown);
                }
                ShowOutcome::Unavailable(cause) => {
                    tracing::warn!("monitor unavailable, falling back: {}", cause);
                    causes.push(cause);
                }
            }
        }
        Err(MonitorError::AllUnavailable(causes))
    }
}
