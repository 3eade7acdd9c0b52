//! Inline display inside an evcxr Jupyter kernel.
//!
//! evcxr renders any stdout block wrapped in `EVCXR_BEGIN_CONTENT <mime>` /
//! `EVCXR_END_CONTENT` as rich output. The solid is drawn as an isometric SVG
//! projection of its tessellation.

use std::io::{self, Stdout, Write};

use glam::{DVec2, DVec3};

use super::{Monitor, MonitorError, ShowOptions, ShowOutcome, Unavailable};
use crate::kernel::Solid;

/// Set by evcxr in the process it evaluates cells in.
const EVCXR_RUNTIME_VAR: &str = "EVCXR_IS_RUNTIME";

const SVG_SIZE: f64 = 320.0;
const SVG_MARGIN: f64 = 10.0;

#[derive(Debug)]
pub struct NotebookMonitor<W: Write = Stdout> {
    out: W,
    available: bool,
}

impl NotebookMonitor<Stdout> {
    /// Writes to stdout; available only inside an evcxr kernel.
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            available: std::env::var_os(EVCXR_RUNTIME_VAR).is_some(),
        }
    }
}

impl<W: Write> NotebookMonitor<W> {
    /// Always available, writes to `out`.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            available: true,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Isometric view: X to the lower right, Y to the lower left, Z up.
fn project(p: DVec3) -> DVec2 {
    let (sin, cos) = 30f64.to_radians().sin_cos();
    DVec2::new((p.x - p.y) * cos, -(p.z + (p.x + p.y) * sin))
}

/// Depth along the view direction, larger is closer to the viewer.
fn depth(p: DVec3) -> f64 {
    p.x + p.y + p.z
}

/// SVG drawing of a solid, triangles painted back to front.
pub fn render_svg(solid: &Solid) -> String {
    let mut triangles: Vec<(f64, [DVec2; 3], f64)> = Vec::new();

    for mesh in solid.tessellate() {
        for tri in mesh.indices.chunks_exact(3) {
            let corners = [0, 1, 2].map(|k| {
                let [x, y, z] = mesh.positions[tri[k] as usize];
                DVec3::new(x as f64, y as f64, z as f64)
            });
            let normal = (corners[1] - corners[0])
                .cross(corners[2] - corners[0])
                .normalize_or_zero();
            let light = DVec3::new(0.3, 0.5, 1.0).normalize();
            let shade = 0.35 + 0.65 * normal.dot(light).abs();
            let z = corners.iter().map(|c| depth(*c)).sum::<f64>() / 3.0;
            triangles.push((z, corners.map(project), shade));
        }
    }

    if triangles.is_empty() {
        return format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}"></svg>"#,
            SVG_SIZE
        );
    }

    let mut min = DVec2::splat(f64::MAX);
    let mut max = DVec2::splat(f64::MIN);
    for (_, points, _) in &triangles {
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
    }
    let extent = (max - min).max_element().max(f64::EPSILON);
    let scale = (SVG_SIZE - 2.0 * SVG_MARGIN) / extent;

    triangles.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}" viewBox="0 0 {0} {0}">"#,
        SVG_SIZE
    );
    for (_, points, shade) in &triangles {
        let coords: Vec<String> = points
            .iter()
            .map(|p| {
                let q = (*p - min) * scale + DVec2::splat(SVG_MARGIN);
                format!("{:.2},{:.2}", q.x, q.y)
            })
            .collect();
        let level = (shade * 200.0) as u8;
        svg.push_str(&format!(
            r#"<polygon points="{}" fill="rgb({2},{2},{1})" stroke="rgb({2},{2},{1})" stroke-width="0.3"/>"#,
            coords.join(" "),
            level.saturating_add(20),
            level
        ));
    }
    svg.push_str("</svg>");
    svg
}

impl<W: Write> Monitor for NotebookMonitor<W> {
    fn name(&self) -> &str {
        "notebook"
    }

    fn show_object(
        &mut self,
        solid: &Solid,
        options: &ShowOptions,
    ) -> Result<ShowOutcome, MonitorError> {
        if !self.available {
            return Ok(ShowOutcome::Unavailable(Unavailable::new(
                self.name(),
                format!("{} is not set, not running inside evcxr", EVCXR_RUNTIME_VAR),
            )));
        }

        let html = format!(
            "<div><b>{}</b><br/>{}</div>",
            escape_html(options.display_name(solid)),
            render_svg(solid)
        );
        writeln!(self.out, "EVCXR_BEGIN_CONTENT text/html\n{}\nEVCXR_END_CONTENT", html)?;
        self.out.flush()?;
        Ok(ShowOutcome::Shown)
    }
}

/// Escape text for an HTML element body or attribute.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Mode, Plane, Sketch};

    #[test]
    fn test_projection_axes() {
        let up = project(DVec3::Z);
        assert!(up.x.abs() < 1e-12);
        assert!(up.y < 0.0);
        assert!(project(DVec3::X).x > 0.0);
        assert!(project(DVec3::Y).x < 0.0);
    }

    #[test]
    fn test_unavailable_outside_kernel() {
        let mut monitor = NotebookMonitor {
            out: Vec::new(),
            available: false,
        };
        let outcome = monitor
            .show_object(&Solid::empty("x"), &ShowOptions::default())
            .unwrap();
        assert!(matches!(outcome, ShowOutcome::Unavailable(u) if u.backend == "notebook"));
        assert!(monitor.into_inner().is_empty());
    }

    #[test]
    fn test_emits_html_block() {
        let disc = Sketch::new()
            .circle(3.0, Mode::Add)
            .extrude(Plane::XY, 1.0)
            .unwrap()
            .with_name("disc");
        let mut monitor = NotebookMonitor::with_writer(Vec::new());
        monitor.show_object(&disc, &ShowOptions::default()).unwrap();

        let text = String::from_utf8(monitor.into_inner()).unwrap();
        assert!(text.starts_with("EVCXR_BEGIN_CONTENT text/html\n<div><b>disc</b>"));
        assert!(text.contains("<polygon"));
        assert!(text.trim_end().ends_with("EVCXR_END_CONTENT"));
    }

    #[test]
    fn test_display_name_is_escaped() {
        let mut monitor = NotebookMonitor::with_writer(Vec::new());
        let options = ShowOptions::default().named("<a&\"b\">");
        monitor.show_object(&Solid::empty("x"), &options).unwrap();

        let text = String::from_utf8(monitor.into_inner()).unwrap();
        assert!(text.contains("<b>&lt;a&amp;&quot;b&quot;&gt;</b>"));
        assert!(!text.contains("<a&"));
    }

    #[test]
    fn test_empty_solid_renders_blank_svg() {
        let svg = render_svg(&Solid::empty("x"));
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<polygon"));
    }
}
