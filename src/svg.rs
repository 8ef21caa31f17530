//! SVG rendering of a preview overlay.
//!
//! Draws the contained source, both panel crops, and the gap band into a
//! `viewport_w × viewport_h` document. Geometry comes entirely from
//! [`project_for_preview`], so the picture agrees with the compositor.
//!
//! # Example
//!
//! ```
//! use dualpanel::{CompensationMode, plan_layout, svg::render_overlay_svg};
//!
//! let plan = plan_layout(4000, 3000, 40, CompensationMode::Physical).unwrap();
//! let svg = render_overlay_svg(&plan, 400, 400);
//! assert!(svg.contains("Upper 1920×1080"));
//! ```

use core::fmt::Write;

use crate::geometry::RectF;
use crate::panel::Panel;
use crate::plan::LayoutPlan;
use crate::preview::{PreviewOverlay, project_for_preview};

/// Text baseline offset inside a panel outline.
const LABEL_INSET: f64 = 14.0;
/// Below this on-screen height a label is drawn above its rect instead.
const MIN_LABEL_ROOM: f64 = 18.0;

/// Render a complete SVG document of the plan's preview overlay.
pub fn render_overlay_svg(plan: &LayoutPlan, viewport_w: u32, viewport_h: u32) -> String {
    let overlay = project_for_preview(plan, viewport_w, viewport_h);
    render(&overlay, viewport_w, viewport_h)
}

fn render(o: &PreviewOverlay, viewport_w: u32, viewport_h: u32) -> String {
    let mut svg = String::with_capacity(2048);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{viewport_w}" height="{viewport_h}" viewBox="0 0 {viewport_w} {viewport_h}">"#
    ));
    svg.push('\n');

    // Light/dark mode via prefers-color-scheme
    svg.push_str(r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 12px; font-weight: bold; fill: #fff; paint-order: stroke; stroke: #000; stroke-width: 2px; }
  .source { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  .upper { fill: #6ba3d6; fill-opacity: 0.25; stroke: #2c6faa; stroke-width: 1.5; }
  .lower { fill: #d6a36b; fill-opacity: 0.25; stroke: #aa6f2c; stroke-width: 1.5; }
  .gap { fill: url(#hatch); stroke: #666; stroke-width: 1; stroke-dasharray: 4,2; }
  .hatch-line { stroke: #888; stroke-width: 1; }
  @media (prefers-color-scheme: dark) {
    .source { fill: #2d2d2d; stroke: #555; }
    .upper { stroke: #5a9fd4; }
    .lower { stroke: #d49f5a; }
    .hatch-line { stroke: #aaa; }
  }
</style>
"##);

    svg.push_str(r##"<defs>
  <pattern id="hatch" width="6" height="6" patternUnits="userSpaceOnUse" patternTransform="rotate(45)">
    <line x1="0" y1="0" x2="0" y2="6" class="hatch-line"/>
  </pattern>
</defs>
"##);

    push_rect(&mut svg, o.image, "source");
    push_rect(&mut svg, o.upper, "upper");
    push_rect(&mut svg, o.lower, "lower");
    if let Some(gap) = o.gap {
        push_rect(&mut svg, gap, "gap");
    }

    push_label(&mut svg, o.upper, &o.label(Panel::Upper).to_string());
    push_label(&mut svg, o.lower, &o.label(Panel::Lower).to_string());
    if let (Some(gap), Some(label)) = (o.gap, o.gap_label()) {
        let (cx, cy) = gap.center();
        let _ = writeln!(
            svg,
            r#"<text x="{cx:.1}" y="{:.1}" class="label" text-anchor="middle">{}</text>"#,
            cy + 4.0,
            escape_xml(&label.to_string())
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_rect(svg: &mut String, r: RectF, class: &str) {
    let _ = writeln!(
        svg,
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="{class}"/>"#,
        r.x, r.y, r.width, r.height
    );
}

fn push_label(svg: &mut String, r: RectF, text: &str) {
    let y = if r.height >= MIN_LABEL_ROOM {
        r.y + LABEL_INSET
    } else {
        r.y - 4.0
    };
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{y:.1}" class="label">{}</text>"#,
        r.x + 4.0,
        escape_xml(text)
    );
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
