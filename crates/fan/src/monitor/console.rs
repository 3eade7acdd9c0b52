//! Plain-text report of a solid.

use std::io::{self, Stdout, Write};

use super::{Monitor, MonitorError, ShowOptions, ShowOutcome};
use crate::kernel::Solid;

/// Prints name, body count, bounds, volume and area of every shown solid.
#[derive(Debug)]
pub struct ConsoleMonitor<W: Write = Stdout> {
    out: W,
}

impl ConsoleMonitor<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleMonitor<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn report(solid: &Solid, name: &str) -> String {
    let mut text = format!("{}\n", name);
    let Some(bb) = solid.bounding_box() else {
        text.push_str("  (empty)\n");
        return text;
    };
    let size = bb.size();
    text.push_str(&format!("  bodies:    {}\n", solid.body_count()));
    text.push_str(&format!(
        "  min:       ({:.3}, {:.3}, {:.3})\n",
        bb.min.x, bb.min.y, bb.min.z
    ));
    text.push_str(&format!(
        "  max:       ({:.3}, {:.3}, {:.3})\n",
        bb.max.x, bb.max.y, bb.max.z
    ));
    text.push_str(&format!(
        "  size:      {:.3} x {:.3} x {:.3} mm\n",
        size.x, size.y, size.z
    ));
    text.push_str(&format!("  volume:    {:.3} mm^3\n", solid.volume()));
    text.push_str(&format!("  area:      {:.3} mm^2\n", solid.surface_area()));
    text.push_str(&format!("  triangles: {}\n", solid.triangle_count()));
    text
}

impl<W: Write> Monitor for ConsoleMonitor<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn show_object(
        &mut self,
        solid: &Solid,
        options: &ShowOptions,
    ) -> Result<ShowOutcome, MonitorError> {
        if options.clear {
            writeln!(self.out, "----")?;
        }
        self.out
            .write_all(report(solid, options.display_name(solid)).as_bytes())?;
        self.out.flush()?;
        Ok(ShowOutcome::Shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Mode, Plane, Sketch};

    #[test]
    fn test_report_of_empty_solid() {
        assert_eq!(report(&Solid::empty("none"), "none"), "none\n  (empty)\n");
    }

    #[test]
    fn test_console_writes_report() {
        let cube = Sketch::new()
            .rect(2.0, 4.0, Mode::Add)
            .extrude(Plane::XY, 3.0)
            .unwrap()
            .with_name("block");

        let mut monitor = ConsoleMonitor::with_writer(Vec::new());
        let outcome = monitor
            .show_object(&cube, &ShowOptions::cleared())
            .unwrap();
        assert_eq!(outcome, ShowOutcome::Shown);

        let text = String::from_utf8(monitor.into_inner()).unwrap();
        assert!(text.starts_with("----\nblock\n"));
        assert!(text.contains("bodies:    1"));
        assert!(text.contains("2.000 x 4.000 x 3.000 mm"));
        assert!(text.contains("volume:    24.000"));
    }
}
