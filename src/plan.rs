//! Layout planning: combined canvas, cover fit, and per-panel source crops.
//!
//! The combined canvas stacks the upper panel, the gap, and the
//! density-compensated lower panel. The source is cover-fit onto that
//! canvas and each panel's canvas rectangle is mapped back into source
//! pixels. Both the compositor and the preview consume the resulting
//! [`LayoutPlan`]; neither derives geometry of its own.
//!
//! ```text
//!     combined canvas            source (cover-fit, centered)
//!     ┌──────────────┐         ┌──────────────────────┐
//!     │    upper     │         │   ┌──────────────┐   │
//!     │  1920×1080   │         │   │  upper crop  │   │
//!     ├──────────────┤  gap    │   ├──────────────┤   │
//!     │   ┌──────┐   │         │   │ ┌──────────┐ │   │
//!     │   │lower'│   │         │   │ │lower crop│ │   │
//!     └───┴──────┴───┘         └───┴─┴──────────┴─┴───┘
//! ```
//!
//! # Example
//!
//! ```
//! use dualpanel::{CompensationMode, Size, plan_layout};
//!
//! let plan = plan_layout(4000, 3000, 0, CompensationMode::Physical).unwrap();
//! assert_eq!(plan.combined, Size::new(1920, 1954));
//! assert!(plan.upper_crop.is_within(4000, 3000));
//! ```

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::geometry::{RectF, Region, Size, center_offset, cover_scale};
use crate::panel::{CompensationMode, DeviceProfile};

/// What to do when the source is too small to cover the canvas at 1×.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum UndersizePolicy {
    /// Upsample until the source covers the whole canvas. No padding.
    #[default]
    Cover,
    /// Never scale above 1×. The uncovered canvas is filled with background.
    FitPad,
}

/// Layout computation error.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Source image has zero width or height.
    #[error("source dimensions must be non-zero, got {width}×{height}")]
    InvalidDimension { width: u32, height: u32 },
    /// Cover fit would upscale past the configured limit.
    #[error("source would be upscaled {scale:.3}×, limit is {limit:.3}×")]
    SourceTooSmall { scale: f64, limit: f64 },
    /// A panel density is zero, negative, or not finite.
    #[error("panel densities must be positive and finite, got {upper} / {lower} PPI")]
    InvalidDensity { upper: f64, lower: f64 },
    /// Upper + gap + compensated lower does not fit in `u32`.
    #[error("combined canvas height overflows with a {gap}px gap")]
    CanvasTooLarge { gap: u32 },
}

/// Planning options.
///
/// # Example
///
/// ```
/// use dualpanel::{CompensationMode, DeviceProfile, PlanOptions, UndersizePolicy};
///
/// let plan = PlanOptions::new(CompensationMode::Fixed)
///     .gap(40)
///     .undersize(UndersizePolicy::FitPad)
///     .plan(&DeviceProfile::THOR, 1000, 800)
///     .unwrap();
///
/// assert_eq!(plan.gap, 40);
/// assert!(plan.needs_padding());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PlanOptions {
    pub mode: CompensationMode,
    /// Gap between the panels, in upper-panel pixels.
    pub gap: u32,
    pub undersize: UndersizePolicy,
    /// Strict mode: fail instead of upscaling beyond this factor.
    pub max_upscale: Option<f64>,
}

impl PlanOptions {
    /// Options with the given compensation mode, no gap, cover policy.
    pub fn new(mode: CompensationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set the gap. Negative values clamp to 0.
    pub fn gap(mut self, gap: i32) -> Self {
        self.gap = gap.max(0) as u32;
        self
    }

    pub fn undersize(mut self, policy: UndersizePolicy) -> Self {
        self.undersize = policy;
        self
    }

    /// Enable strict mode with the given upscale limit.
    pub fn max_upscale(mut self, limit: f64) -> Self {
        self.max_upscale = Some(limit);
        self
    }

    /// Compute the layout for a source image of the given dimensions.
    pub fn plan(
        &self,
        profile: &DeviceProfile,
        source_w: u32,
        source_h: u32,
    ) -> Result<LayoutPlan, LayoutError> {
        if source_w == 0 || source_h == 0 {
            return Err(LayoutError::InvalidDimension {
                width: source_w,
                height: source_h,
            });
        }
        let source = Size::new(source_w, source_h);
        let (upper, lower) = (profile.upper, profile.lower);
        if !valid_ppi(upper.ppi) || !valid_ppi(lower.ppi) {
            return Err(LayoutError::InvalidDensity {
                upper: upper.ppi,
                lower: lower.ppi,
            });
        }

        // Step 1: Density compensation for the lower panel.
        let ratio = self.mode.factor(profile);
        let compensated_lower = Size::new(
            compensate(lower.width, ratio),
            compensate(lower.height, ratio),
        );

        // Step 2: Combined canvas.
        let height = upper
            .height
            .checked_add(self.gap)
            .and_then(|h| h.checked_add(compensated_lower.height))
            .ok_or(LayoutError::CanvasTooLarge { gap: self.gap })?;
        let combined = Size::new(upper.width.max(compensated_lower.width), height);

        // Step 3: Cover fit, optionally capped at 1× for fit-pad.
        let cover = cover_scale(source, combined);
        let scale = match self.undersize {
            UndersizePolicy::Cover => cover,
            UndersizePolicy::FitPad => cover.min(1.0),
        };
        if let Some(limit) = self.max_upscale
            && scale > limit
        {
            return Err(LayoutError::SourceTooSmall { scale, limit });
        }

        let offset_x = center_offset(combined.width as f64, source_w as f64 * scale);
        let offset_y = center_offset(combined.height as f64, source_h as f64 * scale);

        let mut plan = LayoutPlan {
            source,
            profile: *profile,
            mode: self.mode,
            gap: self.gap,
            undersize: self.undersize,
            combined,
            compensated_lower,
            scale,
            offset_x,
            offset_y,
            upper_crop: Region::new(0, 0, 1, 1),
            lower_crop: Region::new(0, 0, 1, 1),
            lower_resample_factor: ratio,
        };

        // Step 4: Map panel rectangles back into source pixels.
        let mut upper_crop = plan.canvas_to_source(plan.upper_canvas_rect()).round_to_region();
        let mut lower_crop = plan.canvas_to_source(plan.lower_canvas_rect()).round_to_region();

        // Step 5: When the source covers the canvas, keep crops inside it.
        // The lower crop slides up (bottom-aligned) rather than shrinking.
        if scale >= cover {
            upper_crop = slide_inside(upper_crop, source);
            lower_crop = slide_inside(lower_crop, source);
        }
        plan.upper_crop = upper_crop;
        plan.lower_crop = lower_crop;

        tracing::trace!(?plan, "planned dual-panel layout");
        Ok(plan)
    }
}

/// Plan a layout for [`DeviceProfile::THOR`] with default options.
pub fn plan_layout(
    source_w: u32,
    source_h: u32,
    gap: i32,
    mode: CompensationMode,
) -> Result<LayoutPlan, LayoutError> {
    PlanOptions::new(mode)
        .gap(gap)
        .plan(&DeviceProfile::THOR, source_w, source_h)
}

/// Computed geometry for one source image.
///
/// Crops are in source pixel coordinates; canvas rectangles are in combined
/// canvas coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutPlan {
    /// Source dimensions the plan was computed for.
    pub source: Size,
    pub profile: DeviceProfile,
    pub mode: CompensationMode,
    pub gap: u32,
    pub undersize: UndersizePolicy,
    /// Combined canvas: upper + gap + compensated lower.
    pub combined: Size,
    /// Lower panel size in canvas pixels after compensation.
    pub compensated_lower: Size,
    /// Source-to-canvas scale.
    pub scale: f64,
    /// Where the scaled source's left edge sits on the canvas (≤ 0 under cover).
    pub offset_x: f64,
    /// Where the scaled source's top edge sits on the canvas (≤ 0 under cover).
    pub offset_y: f64,
    pub upper_crop: Region,
    pub lower_crop: Region,
    /// Source area reserved for the lower panel, relative to its native size.
    pub lower_resample_factor: f64,
}

impl LayoutPlan {
    /// Upper panel on the combined canvas.
    pub fn upper_canvas_rect(&self) -> RectF {
        let w = self.profile.upper.width as f64;
        RectF::new(
            center_offset(self.combined.width as f64, w),
            0.0,
            w,
            self.profile.upper.height as f64,
        )
    }

    /// Compensated lower panel on the combined canvas.
    pub fn lower_canvas_rect(&self) -> RectF {
        let w = self.compensated_lower.width as f64;
        RectF::new(
            center_offset(self.combined.width as f64, w),
            self.profile.upper.height as f64 + self.gap as f64,
            w,
            self.compensated_lower.height as f64,
        )
    }

    /// Scaled source placement on the combined canvas.
    pub fn scaled_source_rect(&self) -> RectF {
        RectF::new(
            self.offset_x,
            self.offset_y,
            self.source.width as f64 * self.scale,
            self.source.height as f64 * self.scale,
        )
    }

    /// Invert the scale + offset transform.
    pub fn canvas_to_source(&self, r: RectF) -> RectF {
        RectF::new(
            (r.x - self.offset_x) / self.scale,
            (r.y - self.offset_y) / self.scale,
            r.width / self.scale,
            r.height / self.scale,
        )
    }

    /// Source band between the two crops, spanning the upper crop's width.
    ///
    /// `None` when the crops touch or overlap.
    pub fn gap_region(&self) -> Option<Region> {
        let top = self.upper_crop.bottom();
        let bottom = self.lower_crop.y;
        if bottom <= top {
            return None;
        }
        Some(Region::new(
            self.upper_crop.x,
            top,
            self.upper_crop.width,
            (bottom - top) as u32,
        ))
    }

    /// Final upper output dimensions.
    pub fn upper_output(&self) -> Size {
        self.profile.upper.size()
    }

    /// Final lower output dimensions.
    pub fn lower_output(&self) -> Size {
        self.profile.lower.size()
    }

    /// Whether the source gets upsampled.
    pub fn is_upscaled(&self) -> bool {
        self.scale > 1.0
    }

    /// Whether either crop reaches outside the source.
    pub fn needs_padding(&self) -> bool {
        let (w, h) = (self.source.width, self.source.height);
        !self.upper_crop.is_within(w, h) || !self.lower_crop.is_within(w, h)
    }
}

// ============================================================================
// Internal geometry
// ============================================================================

fn valid_ppi(ppi: f64) -> bool {
    ppi.is_finite() && ppi > 0.0
}

fn compensate(dim: u32, ratio: f64) -> u32 {
    (dim as f64 * ratio).round().max(1.0) as u32
}

/// Move a region back inside the source without changing its size.
/// Only an extent larger than the source is reduced.
fn slide_inside(r: Region, source: Size) -> Region {
    let w = r.width.min(source.width);
    let h = r.height.min(source.height);
    let max_x = (source.width - w) as i64;
    let max_y = (source.height - h) as i64;
    Region::new(r.x.clamp(0, max_x), r.y.clamp(0, max_y), w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PanelSpec;

    fn thor(w: u32, h: u32, gap: i32, mode: CompensationMode) -> LayoutPlan {
        plan_layout(w, h, gap, mode).unwrap()
    }

    // ── canvas dimensions ───────────────────────────────────────────────

    #[test]
    fn physical_gap_zero_dimensions() {
        let p = thor(4000, 3000, 0, CompensationMode::Physical);
        assert!((p.lower_resample_factor - 297.0 / 367.0).abs() < 1e-12);
        assert_eq!(p.compensated_lower, Size::new(1003, 874));
        assert_eq!(p.combined, Size::new(1920, 1954));
    }

    #[test]
    fn fixed_dimensions() {
        let p = thor(4000, 3000, 0, CompensationMode::Fixed);
        assert_eq!(p.compensated_lower, Size::new(1364, 1188));
        assert_eq!(p.combined, Size::new(1920, 2268));
        assert_eq!(p.lower_resample_factor, 1.1);
    }

    #[test]
    fn no_compensation_dimensions() {
        let p = thor(4000, 3000, 25, CompensationMode::None);
        assert_eq!(p.compensated_lower, Size::new(1240, 1080));
        assert_eq!(p.combined, Size::new(1920, 2185));
    }

    #[test]
    fn wide_lower_panel_widens_canvas() {
        let profile = DeviceProfile::new(
            PanelSpec::new(1000, 500, 300.0),
            PanelSpec::new(1200, 400, 300.0),
        );
        let p = PlanOptions::new(CompensationMode::Fixed)
            .plan(&profile, 5000, 5000)
            .unwrap();
        assert_eq!(p.compensated_lower, Size::new(1320, 440));
        assert_eq!(p.combined, Size::new(1320, 940));
    }

    // ── gap ─────────────────────────────────────────────────────────────

    #[test]
    fn gap_monotonic() {
        for mode in [
            CompensationMode::None,
            CompensationMode::Fixed,
            CompensationMode::Physical,
        ] {
            let mut prev = thor(3000, 4000, 0, mode);
            for gap in [1, 2, 10, 100, 500, 2000] {
                let p = thor(3000, 4000, gap, mode);
                assert!(p.combined.height > prev.combined.height, "{mode:?} gap {gap}");
                assert_eq!(p.combined.width, prev.combined.width);
                prev = p;
            }
        }
    }

    #[test]
    fn negative_gap_clamps_to_zero() {
        let a = thor(2000, 2000, -50, CompensationMode::Physical);
        let b = thor(2000, 2000, 0, CompensationMode::Physical);
        assert_eq!(a.gap, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn gap_region_height_tracks_gap() {
        // 1:1 scale so the gap maps to source pixels unchanged.
        let p = thor(1920, 2054, 100, CompensationMode::Physical);
        assert_eq!(p.scale, 1.0);
        let g = p.gap_region().unwrap();
        assert_eq!(g.y, 1080);
        assert_eq!(g.height, 100);
        assert_eq!(g.width, 1920);
    }

    #[test]
    fn gap_region_none_when_adjacent() {
        let p = thor(1920, 1954, 0, CompensationMode::Physical);
        assert_eq!(p.gap_region(), None);
    }

    // ── crops ───────────────────────────────────────────────────────────

    #[test]
    fn exact_canvas_source_is_identity() {
        let p = thor(1920, 1954, 0, CompensationMode::Physical);
        assert_eq!(p.scale, 1.0);
        assert_eq!((p.offset_x, p.offset_y), (0.0, 0.0));
        assert_eq!(p.upper_crop, Region::new(0, 0, 1920, 1080));
        // (1920 - 1003) / 2 = 458.5 → 459
        assert_eq!(p.lower_crop, Region::new(459, 1080, 1003, 874));
        assert!(!p.is_upscaled());
    }

    #[test]
    fn double_size_source_halves_scale() {
        let p = thor(3840, 3908, 0, CompensationMode::Physical);
        assert_eq!(p.scale, 0.5);
        assert_eq!(p.upper_crop, Region::new(0, 0, 3840, 2160));
        assert_eq!(p.lower_crop, Region::new(917, 2160, 2006, 1748));
    }

    #[test]
    fn wide_source_crops_horizontally() {
        // cover = max(1920/4000, 2160/3000) = 0.72, scaled 2880×2160
        let p = thor(4000, 3000, 0, CompensationMode::None);
        assert!((p.scale - 0.72).abs() < 1e-12);
        assert!((p.offset_x + 480.0).abs() < 1e-9);
        assert!(p.offset_y.abs() < 1e-9);
        assert_eq!(p.upper_crop, Region::new(667, 0, 2667, 1500));
        assert_eq!(p.lower_crop, Region::new(1139, 1500, 1722, 1500));
    }

    #[test]
    fn crops_stay_inside_source() {
        let sizes = [
            (1, 1),
            (1, 5000),
            (5000, 1),
            (640, 480),
            (1080, 1920),
            (1920, 1080),
            (4032, 3024),
            (7, 13),
            (12000, 9000),
        ];
        for (w, h) in sizes {
            for gap in [0, 37, 400] {
                for mode in [
                    CompensationMode::None,
                    CompensationMode::Fixed,
                    CompensationMode::Physical,
                ] {
                    let p = thor(w, h, gap, mode);
                    assert!(p.offset_x <= 1e-9 && p.offset_y <= 1e-9);
                    assert!(p.upper_crop.is_within(w, h), "{w}×{h} {gap} {mode:?} {p:?}");
                    assert!(p.lower_crop.is_within(w, h), "{w}×{h} {gap} {mode:?} {p:?}");
                    assert!(!p.needs_padding());
                }
            }
        }
    }

    #[test]
    fn upper_crop_keeps_panel_aspect() {
        let p = thor(4032, 3024, 0, CompensationMode::Physical);
        let panel = 1920.0 / 1080.0;
        assert!((p.upper_crop.aspect() - panel).abs() < 0.01);
    }

    #[test]
    fn lower_crop_keeps_compensated_aspect() {
        let p = thor(6000, 8000, 120, CompensationMode::Fixed);
        let target = 1364.0 / 1188.0;
        assert!((p.lower_crop.aspect() - target).abs() < 0.01);
    }

    #[test]
    fn lower_crop_is_bottom_aligned_when_past_source() {
        let r = slide_inside(Region::new(10, 95, 20, 10), Size::new(100, 100));
        assert_eq!(r, Region::new(10, 90, 20, 10));
    }

    #[test]
    fn planner_slides_rounded_lower_crop_up() {
        // Canvas 2×2 at scale 2/7: the lower panel maps to y 3.5, height 3.5,
        // which rounds to 4 + 4 and ends one row past the 7px source.
        let profile = DeviceProfile::new(
            PanelSpec::new(2, 1, 100.0),
            PanelSpec::new(1, 1, 100.0),
        );
        let p = PlanOptions::new(CompensationMode::None)
            .plan(&profile, 7, 7)
            .unwrap();
        let raw = p.canvas_to_source(p.lower_canvas_rect()).round_to_region();
        assert_eq!(raw, Region::new(2, 4, 4, 4));
        assert!(raw.bottom() > 7);

        assert_eq!(p.lower_crop, Region::new(2, 3, 4, 4));
        assert_eq!(p.lower_crop.size(), raw.size());
        assert_eq!(p.lower_crop.bottom(), 7);
        assert!(!p.needs_padding());
    }

    #[test]
    fn slide_never_shrinks_fitting_region() {
        let r = slide_inside(Region::new(-3, -4, 50, 60), Size::new(50, 60));
        assert_eq!(r, Region::new(0, 0, 50, 60));
    }

    // ── undersized sources ──────────────────────────────────────────────

    #[test]
    fn one_pixel_source_upsamples() {
        let p = thor(1, 1, 0, CompensationMode::Physical);
        assert_eq!(p.scale, 1954.0);
        assert!(p.is_upscaled());
        assert_eq!(p.upper_crop, Region::new(0, 0, 1, 1));
        assert_eq!(p.lower_crop, Region::new(0, 0, 1, 1));
    }

    #[test]
    fn strict_mode_rejects_upscale() {
        let err = PlanOptions::new(CompensationMode::Physical)
            .max_upscale(4.0)
            .plan(&DeviceProfile::THOR, 1, 1)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::SourceTooSmall {
                scale: 1954.0,
                limit: 4.0
            }
        );
    }

    #[test]
    fn strict_mode_accepts_within_limit() {
        let p = PlanOptions::new(CompensationMode::Physical)
            .max_upscale(2.0)
            .plan(&DeviceProfile::THOR, 960, 977)
            .unwrap();
        assert_eq!(p.scale, 2.0);
    }

    #[test]
    fn fit_pad_caps_scale_and_pads() {
        let p = PlanOptions::new(CompensationMode::Physical)
            .undersize(UndersizePolicy::FitPad)
            .plan(&DeviceProfile::THOR, 960, 977)
            .unwrap();
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.offset_x, 480.0);
        assert_eq!(p.offset_y, 488.5);
        assert!(p.needs_padding());
        assert_eq!(p.upper_crop.size(), Size::new(1920, 1080));
        assert_eq!(p.upper_crop.x, -480);
    }

    #[test]
    fn fit_pad_matches_cover_for_large_sources() {
        let cover = thor(5000, 4000, 60, CompensationMode::Fixed);
        let pad = PlanOptions::new(CompensationMode::Fixed)
            .gap(60)
            .undersize(UndersizePolicy::FitPad)
            .plan(&DeviceProfile::THOR, 5000, 4000)
            .unwrap();
        assert_eq!(pad.upper_crop, cover.upper_crop);
        assert_eq!(pad.lower_crop, cover.lower_crop);
        assert_eq!(pad.scale, cover.scale);
    }

    // ── errors ──────────────────────────────────────────────────────────

    #[test]
    fn zero_source_is_invalid() {
        assert_eq!(
            plan_layout(0, 100, 0, CompensationMode::None),
            Err(LayoutError::InvalidDimension {
                width: 0,
                height: 100
            })
        );
        assert_eq!(
            plan_layout(100, 0, 0, CompensationMode::None),
            Err(LayoutError::InvalidDimension {
                width: 100,
                height: 0
            })
        );
    }

    #[test]
    fn huge_gap_is_an_error_not_an_overflow() {
        let mut opts = PlanOptions::new(CompensationMode::Physical);
        opts.gap = u32::MAX - 100;
        assert_eq!(
            opts.plan(&DeviceProfile::THOR, 4000, 3000),
            Err(LayoutError::CanvasTooLarge { gap: u32::MAX - 100 })
        );
    }

    #[test]
    fn large_gap_that_fits_still_plans() {
        let mut opts = PlanOptions::new(CompensationMode::Physical);
        opts.gap = u32::MAX - 1954;
        let p = opts.plan(&DeviceProfile::THOR, 4000, 3000).unwrap();
        assert_eq!(p.combined.height, u32::MAX);
        assert_eq!(p.lower_canvas_rect().y, 1080.0 + (u32::MAX - 1954) as f64);
    }

    #[test]
    fn bad_density_is_rejected() {
        for (upper, lower) in [
            (0.0, 297.0),
            (367.0, 0.0),
            (-1.0, 297.0),
            (f64::NAN, 297.0),
            (367.0, f64::INFINITY),
        ] {
            let profile = DeviceProfile::new(
                PanelSpec::new(1920, 1080, upper),
                PanelSpec::new(1240, 1080, lower),
            );
            for mode in [CompensationMode::None, CompensationMode::Physical] {
                let err = PlanOptions::new(mode).plan(&profile, 4000, 3000).unwrap_err();
                assert!(
                    matches!(err, LayoutError::InvalidDensity { .. }),
                    "{upper}/{lower} {mode:?}: {err:?}"
                );
            }
        }
    }

    #[test]
    fn extreme_density_ratio_does_not_overflow() {
        let profile = DeviceProfile::new(
            PanelSpec::new(1920, 1080, 1e-300),
            PanelSpec::new(1240, 1080, 1e300),
        );
        let err = PlanOptions::new(CompensationMode::Physical)
            .plan(&profile, 4000, 3000)
            .unwrap_err();
        assert!(matches!(err, LayoutError::CanvasTooLarge { gap: 0 }));
    }

    #[cfg(feature = "std")]
    #[test]
    fn error_messages() {
        let e = LayoutError::InvalidDimension {
            width: 0,
            height: 5,
        };
        assert_eq!(e.to_string(), "source dimensions must be non-zero, got 0×5");
        let e = LayoutError::CanvasTooLarge { gap: 7 };
        assert_eq!(e.to_string(), "combined canvas height overflows with a 7px gap");
    }
}
