//! Quarter-turn rotation of the source, applied before planning.
//!
//! The planner works in post-rotation dimensions, so rotate first and plan
//! against the rotated size:
//!
//! ```
//! use dualpanel::Rotation;
//!
//! let r = Rotation::from_degrees(90).unwrap();
//! assert_eq!(r.transform_dimensions(4000, 3000).width, 3000);
//! ```

use crate::geometry::Size;

/// Clockwise rotation by a whole number of quarter turns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    /// 90 degrees counter-clockwise.
    Cw270,
}

impl Rotation {
    const BY_TURNS: [Self; 4] = [Self::None, Self::Cw90, Self::Cw180, Self::Cw270];

    /// Rotation for `degrees` clockwise. Negative angles turn
    /// counter-clockwise; anything but a multiple of 90 is `None`.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        (degrees % 90 == 0).then(|| Self::BY_TURNS[(degrees / 90).rem_euclid(4) as usize])
    }

    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Cw90 => 1,
            Self::Cw180 => 2,
            Self::Cw270 => 3,
        }
    }

    pub const fn degrees(self) -> u32 {
        self.quarter_turns() as u32 * 90
    }

    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::Cw90 | Self::Cw270)
    }

    /// Rotate by `self`, then by `other`.
    pub fn then(self, other: Self) -> Self {
        Self::BY_TURNS[((self.quarter_turns() + other.quarter_turns()) & 3) as usize]
    }

    /// One more quarter turn clockwise.
    pub fn rotated_cw(self) -> Self {
        self.then(Self::Cw90)
    }

    /// Dimensions of a `w × h` image after this rotation.
    pub fn transform_dimensions(self, w: u32, h: u32) -> Size {
        if self.swaps_axes() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }

    /// Rotate a pixel buffer into a new owned buffer.
    #[cfg(feature = "compositor")]
    pub fn apply(self, image: &image::RgbaImage) -> image::RgbaImage {
        use image::imageops;

        match self {
            Self::None => image.clone(),
            Self::Cw90 => imageops::rotate90(image),
            Self::Cw180 => imageops::rotate180(image),
            Self::Cw270 => imageops::rotate270(image),
        }
    }
}
