//! Resize-to-cover: scale a buffer until it covers the target, then
//! center-crop to the exact target size.
//!
//! The crop is computed in resampled pixels, so the inset is a whole number
//! of output pixels, then handed to `fast_image_resize` in source
//! coordinates. Only the kept window is resampled.

use fast_image_resize as fir;
use fir::images::{Image, ImageRef};
use fir::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbaImage;

use crate::composite::CompositeError;
use crate::geometry::{Rect, RectF, Size, center_inset, cover_scale};

/// Source-space window that [`scale_to_cover`] resamples.
///
/// `scale = max(tw / sw, th / sh)`. After scaling, the overflow on each axis
/// is split with `floor(excess / 2)` taken from the leading edge.
pub fn cover_crop(src: Size, target: Size) -> RectF {
    let scale = cover_scale(src, target);
    let resized_w = ((src.width as f64 * scale).round() as u32).max(target.width);
    let resized_h = ((src.height as f64 * scale).round() as u32).max(target.height);
    let inset_x = center_inset(resized_w, target.width);
    let inset_y = center_inset(resized_h, target.height);

    // Clamp against float drift so the window never leaves the source.
    let w = (target.width as f64 / scale).min(src.width as f64);
    let h = (target.height as f64 / scale).min(src.height as f64);
    let x = (inset_x as f64 / scale).min(src.width as f64 - w);
    let y = (inset_y as f64 / scale).min(src.height as f64 - h);
    RectF::new(x, y, w, h)
}

/// Resize `src` to exactly `target_w × target_h`, covering with no padding.
pub fn scale_to_cover(
    src: &RgbaImage,
    target_w: u32,
    target_h: u32,
) -> Result<RgbaImage, CompositeError> {
    let mut resizer = Resizer::new();
    let full = Rect::new(0, 0, src.width(), src.height());
    scale_rect_to_cover(&mut resizer, src, full, Size::new(target_w, target_h))
}

/// Resize-to-cover of the `rect` sub-image of `src`, without copying it out.
///
/// `rect` must lie inside `src`.
pub(crate) fn scale_rect_to_cover(
    resizer: &mut Resizer,
    src: &RgbaImage,
    rect: Rect,
    target: Size,
) -> Result<RgbaImage, CompositeError> {
    let window = cover_crop(rect.size(), target);

    let src_view = ImageRef::new(src.width(), src.height(), src.as_raw(), PixelType::U8x4)?;
    let buf = alloc_pixels(target, [0, 0, 0, 0])?;
    let mut dst = Image::from_vec_u8(target.width, target.height, buf, PixelType::U8x4)?;

    let opts = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(FilterType::Bilinear))
        .crop(
            rect.x as f64 + window.x,
            rect.y as f64 + window.y,
            window.width,
            window.height,
        );
    resizer.resize(&src_view, &mut dst, &opts)?;

    into_rgba(target, dst.into_vec())
}

/// Allocate a `size` RGBA buffer filled with `fill`, reporting failure
/// instead of aborting.
pub(crate) fn alloc_pixels(size: Size, fill: [u8; 4]) -> Result<Vec<u8>, CompositeError> {
    let bytes = size.area().saturating_mul(4);
    let len = usize::try_from(bytes).map_err(|_| CompositeError::AllocationFailure { bytes })?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| CompositeError::AllocationFailure { bytes })?;
    buf.extend(fill.iter().copied().cycle().take(len));
    Ok(buf)
}

pub(crate) fn into_rgba(size: Size, buf: Vec<u8>) -> Result<RgbaImage, CompositeError> {
    RgbaImage::from_raw(size.width, size.height, buf)
        .ok_or(CompositeError::Buffer(fir::ImageBufferError::InvalidBufferSize))
}
