//! Preview projection: the plan's crops mapped into an on-screen viewport.
//!
//! The preview shows the whole source, so it uses a contain fit rather
//! than the planner's cover fit. Every rectangle here is the plan's own crop
//! pushed through `p × scale + offset`; nothing is recomputed from panel
//! constants, so the overlay always matches what [`composite`] produces.
//!
//! [`composite`]: crate::composite()
//!
//! # Example
//!
//! ```
//! use dualpanel::{CompensationMode, plan_layout, project_for_preview};
//!
//! let plan = plan_layout(4000, 3000, 40, CompensationMode::Physical).unwrap();
//! let overlay = project_for_preview(&plan, 800, 800);
//!
//! // 4000×3000 contained in 800×800 → 0.2 scale, letterboxed vertically
//! assert!((overlay.placement.scale - 0.2).abs() < 1e-12);
//! assert!((overlay.image.y - 100.0).abs() < 1e-9);
//! assert!(overlay.gap.is_some());
//! ```

use core::fmt;

use crate::geometry::{RectF, Region, Size, center_offset, contain_scale};
use crate::panel::Panel;
use crate::plan::LayoutPlan;

/// Where the source image sits in the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Source pixel → viewport unit.
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    /// Contain-fit `source` inside `viewport`, centered.
    pub fn contain(source: Size, viewport: Size) -> Self {
        let scale = contain_scale(source, viewport);
        Self {
            scale,
            offset_x: center_offset(viewport.width as f64, source.width as f64 * scale),
            offset_y: center_offset(viewport.height as f64, source.height as f64 * scale),
        }
    }

    /// Map a source-pixel region into viewport coordinates.
    pub fn project(&self, r: Region) -> RectF {
        RectF::new(
            r.x as f64 * self.scale + self.offset_x,
            r.y as f64 * self.scale + self.offset_y,
            r.width as f64 * self.scale,
            r.height as f64 * self.scale,
        )
    }
}

/// Overlay rectangles for drawing on top of a preview.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PreviewOverlay {
    pub placement: Placement,
    /// The whole source image in viewport coordinates.
    pub image: RectF,
    pub upper: RectF,
    pub lower: RectF,
    /// Band between the two crops; `None` when they touch.
    pub gap: Option<RectF>,
    upper_size: Size,
    lower_size: Size,
    gap_px: u32,
}

impl PreviewOverlay {
    /// Overlay rectangle for one panel.
    pub fn rect(&self, panel: Panel) -> RectF {
        match panel {
            Panel::Upper => self.upper,
            Panel::Lower => self.lower,
        }
    }

    /// Caption for a panel, e.g. `Upper 1920×1080`.
    pub fn label(&self, panel: Panel) -> PanelLabel {
        let size = match panel {
            Panel::Upper => self.upper_size,
            Panel::Lower => self.lower_size,
        };
        PanelLabel { panel, size }
    }

    /// Caption for the gap band, e.g. `Gap 40px`. `None` without a gap.
    pub fn gap_label(&self) -> Option<GapLabel> {
        self.gap.map(|_| GapLabel(self.gap_px))
    }
}

/// Displayable panel caption.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PanelLabel {
    pub panel: Panel,
    pub size: Size,
}

impl fmt::Display for PanelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}×{}", self.panel.name(), self.size.width, self.size.height)
    }
}

/// Displayable gap caption.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GapLabel(pub u32);

impl fmt::Display for GapLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gap {}px", self.0)
    }
}

/// Project a plan into a `viewport_w × viewport_h` viewport, contain-fit and centered.
pub fn project_for_preview(plan: &LayoutPlan, viewport_w: u32, viewport_h: u32) -> PreviewOverlay {
    let placement = Placement::contain(plan.source, Size::new(viewport_w, viewport_h));
    project_into(plan, placement)
}

/// Project a plan onto a preview bitmap the caller has already placed.
pub fn project_into(plan: &LayoutPlan, placement: Placement) -> PreviewOverlay {
    let full = Region::new(0, 0, plan.source.width, plan.source.height);
    PreviewOverlay {
        placement,
        image: placement.project(full),
        upper: placement.project(plan.upper_crop),
        lower: placement.project(plan.lower_crop),
        gap: plan.gap_region().map(|g| placement.project(g)),
        upper_size: plan.upper_output(),
        lower_size: plan.lower_output(),
        gap_px: plan.gap,
    }
}
