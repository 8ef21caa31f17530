//! Compositor: execute a [`LayoutPlan`] against real pixels.
//!
//! Each panel's crop is read from the source and resized-to-cover to the
//! panel's native resolution. Crops that reach past the source (fit-pad
//! layouts, or a source that does not match the plan) are padded with the
//! background color instead of failing.
//!
//! # Example
//!
//! ```
//! use dualpanel::{CompensationMode, composite, plan_layout};
//! use image::{Rgba, RgbaImage};
//!
//! let source = RgbaImage::from_pixel(640, 480, Rgba([30, 60, 90, 255]));
//! let plan = plan_layout(640, 480, 24, CompensationMode::Physical).unwrap();
//! let (upper, lower) = composite(&source, &plan).unwrap();
//!
//! assert_eq!(upper.image.dimensions(), (1920, 1080));
//! assert_eq!(lower.image.dimensions(), (1240, 1080));
//! ```

use fast_image_resize as fir;
use fir::Resizer;
use image::RgbaImage;

use crate::geometry::{CanvasColor, Rect, Region, Size};
use crate::panel::Panel;
use crate::plan::LayoutPlan;
use crate::resize::{alloc_pixels, into_rgba, scale_rect_to_cover};

/// Compositing error.
#[derive(Debug, thiserror::Error)]
pub enum CompositeError {
    /// A panel or scratch buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes of pixel data")]
    AllocationFailure { bytes: u64 },
    /// The resizer rejected a buffer's dimensions.
    #[error("invalid pixel buffer: {0}")]
    Buffer(#[from] fir::ImageBufferError),
    /// Resampling failed.
    #[error("resize failed: {0}")]
    Resize(#[from] fir::ResizeError),
}

/// One finished panel image, exactly the panel's native resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelOutput {
    pub panel: Panel,
    pub image: RgbaImage,
}

impl PanelOutput {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    /// Take ownership of the pixel buffer, e.g. to hand it to an encoder.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Compositor settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Compositor {
    /// Fill for areas a crop asks for but the source does not have.
    pub background: CanvasColor,
}

impl Compositor {
    /// Compositor with an opaque black background.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, color: CanvasColor) -> Self {
        self.background = color;
        self
    }

    /// Produce the upper and lower panel images.
    ///
    /// The source is only borrowed. Both outputs are freshly allocated and
    /// always have the plan's panel dimensions.
    pub fn composite(
        &self,
        source: &RgbaImage,
        plan: &LayoutPlan,
    ) -> Result<(PanelOutput, PanelOutput), CompositeError> {
        let _span = tracing::debug_span!(
            "composite",
            source_w = source.width(),
            source_h = source.height(),
            gap = plan.gap,
        )
        .entered();

        if (source.width(), source.height()) != (plan.source.width, plan.source.height) {
            tracing::warn!(
                plan_w = plan.source.width,
                plan_h = plan.source.height,
                "source does not match plan dimensions; crops will be clamped"
            );
        }

        let mut resizer = Resizer::new();
        let upper = self.render_panel(
            &mut resizer,
            source,
            Panel::Upper,
            plan.upper_crop,
            plan.upper_output(),
        )?;
        let lower = self.render_panel(
            &mut resizer,
            source,
            Panel::Lower,
            plan.lower_crop,
            plan.lower_output(),
        )?;
        Ok((upper, lower))
    }

    fn render_panel(
        &self,
        resizer: &mut Resizer,
        source: &RgbaImage,
        panel: Panel,
        crop: Region,
        target: Size,
    ) -> Result<PanelOutput, CompositeError> {
        let image = match crop.to_rect(source.width(), source.height()) {
            Some(rect) => {
                tracing::trace!(panel = panel.name(), ?rect, "resampling in-bounds crop");
                scale_rect_to_cover(resizer, source, rect, target)?
            }
            None => {
                tracing::debug!(panel = panel.name(), ?crop, "crop leaves source; padding");
                let padded = extract_region(source, crop, self.background)?;
                let full = Rect::new(0, 0, padded.width(), padded.height());
                scale_rect_to_cover(resizer, &padded, full, target)?
            }
        };
        Ok(PanelOutput { panel, image })
    }
}

/// Run a plan with the default compositor (opaque black background).
pub fn composite(
    source: &RgbaImage,
    plan: &LayoutPlan,
) -> Result<(PanelOutput, PanelOutput), CompositeError> {
    Compositor::new().composite(source, plan)
}

/// Copy `region` out of `source`, filling whatever lies outside with `background`.
pub fn extract_region(
    source: &RgbaImage,
    region: Region,
    background: CanvasColor,
) -> Result<RgbaImage, CompositeError> {
    let size = region.size();
    let mut buf = alloc_pixels(size, background.to_rgba())?;

    match region.intersect(source.width(), source.height()) {
        Some((rect, (ox, oy))) => {
            let src = source.as_raw();
            let src_pitch = source.width() as usize * 4;
            let dst_pitch = size.width as usize * 4;
            let row_bytes = rect.width as usize * 4;
            for r in 0..rect.height as usize {
                let s = (rect.y as usize + r) * src_pitch + rect.x as usize * 4;
                let d = (oy as usize + r) * dst_pitch + ox as usize * 4;
                buf[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
            }
        }
        None => tracing::debug!(?region, "region misses the source entirely"),
    }

    into_rgba(size, buf)
}
