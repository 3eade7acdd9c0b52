use super::{Monitor, MonitorError, ShowOptions, ShowOutcome};
use crate::kernel::Solid;

/// Accepts every object and shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMonitor;

impl Monitor for NoOpMonitor {
    fn name(&self) -> &str {
        "noop"
    }

    fn show_object(
        &mut self,
        solid: &Solid,
        _options: &ShowOptions,
    ) -> Result<ShowOutcome, MonitorError> {
        tracing::debug!("discarding '{}'", solid.name());
        Ok(ShowOutcome::Shown)
    }
}
