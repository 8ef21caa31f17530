//! Geometry primitives shared by the planner, compositor, and preview.
//!
//! Pure geometry: no pixel operations, no allocations, `no_std` compatible.

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either side is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Axis-aligned rectangle in pixel coordinates, fully inside some buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Region of a source image, in source pixels, that may reach past its edges.
///
/// Planned crops are regions rather than [`Rect`]s because a padded layout
/// asks for pixels the source does not have. The compositor reads the
/// in-bounds part via [`Region::intersect`] and fills the rest with
/// background.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> i64 {
        self.x + self.width as i64
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> i64 {
        self.y + self.height as i64
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the region lies entirely inside a `w × h` buffer.
    pub fn is_within(&self, w: u32, h: u32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= w as i64 && self.bottom() <= h as i64
    }

    /// Intersection with a `w × h` buffer.
    ///
    /// Returns the in-bounds rect in buffer coordinates together with its
    /// offset inside this region, or `None` when nothing overlaps.
    pub fn intersect(&self, w: u32, h: u32) -> Option<(Rect, (u32, u32))> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.right().min(w as i64);
        let y1 = self.bottom().min(h as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        let rect = Rect::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32);
        let offset = ((x0 - self.x) as u32, (y0 - self.y) as u32);
        Some((rect, offset))
    }

    /// Convert to an in-bounds [`Rect`] when the region lies inside the buffer.
    pub fn to_rect(&self, w: u32, h: u32) -> Option<Rect> {
        if self.is_within(w, h) {
            Some(Rect::new(
                self.x as u32,
                self.y as u32,
                self.width,
                self.height,
            ))
        } else {
            None
        }
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Floating-point rectangle for canvas and viewport coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectF {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the rect has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Snap to whole pixels. Edges are rounded independently; extent is at least 1.
    pub fn round_to_region(&self) -> Region {
        let x = self.x.round() as i64;
        let y = self.y.round() as i64;
        let w = (self.width.round() as i64).max(1) as u32;
        let h = (self.height.round() as i64).max(1) as u32;
        Region::new(x, y, w, h)
    }
}

impl From<Region> for RectF {
    fn from(r: Region) -> Self {
        Self::new(r.x as f64, r.y as f64, r.width as f64, r.height as f64)
    }
}

/// Canvas background color for areas the source does not cover.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CanvasColor {
    /// Transparent black `[0, 0, 0, 0]`.
    Transparent,
    /// sRGB color with alpha (8-bit per channel).
    Srgb { r: u8, g: u8, b: u8, a: u8 },
    /// Opaque black.
    #[default]
    Black,
}

impl CanvasColor {
    /// White, fully opaque.
    pub const fn white() -> Self {
        Self::Srgb {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }
    }

    /// Black, fully opaque.
    pub const fn black() -> Self {
        Self::Black
    }

    /// Opaque sRGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Srgb { r, g, b, a: 255 }
    }

    /// Channel values in RGBA order.
    pub const fn to_rgba(self) -> [u8; 4] {
        match self {
            Self::Transparent => [0, 0, 0, 0],
            Self::Black => [0, 0, 0, 255],
            Self::Srgb { r, g, b, a } => [r, g, b, a],
        }
    }
}

// ============================================================================
// Fit helpers
// ============================================================================

/// Scale factor that makes `src` fully cover `target`: the larger axis ratio.
pub fn cover_scale(src: Size, target: Size) -> f64 {
    let sx = target.width as f64 / src.width as f64;
    let sy = target.height as f64 / src.height as f64;
    sx.max(sy)
}

/// Scale factor that makes `src` fit entirely inside `target`: the smaller axis ratio.
pub fn contain_scale(src: Size, target: Size) -> f64 {
    let sx = target.width as f64 / src.width as f64;
    let sy = target.height as f64 / src.height as f64;
    sx.min(sy)
}

/// Offset that centers `inner` inside `outer`. Negative when `inner` overflows.
pub fn center_offset(outer: f64, inner: f64) -> f64 {
    (outer - inner) / 2.0
}

/// Integer inset that centers `inner` inside `outer`.
///
/// An odd remainder goes to the far edge, so the crop is biased toward the
/// smaller index.
pub fn center_inset(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}
