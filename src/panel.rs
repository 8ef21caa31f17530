//! Panel specifications, device profiles, and density compensation.
//!
//! # Example
//!
//! ```
//! use dualpanel::{CompensationMode, DeviceProfile};
//!
//! let profile = DeviceProfile::THOR;
//! let ratio = CompensationMode::Physical.factor(&profile);
//! assert!((ratio - 297.0 / 367.0).abs() < 1e-12);
//! ```

use crate::geometry::Size;

/// One physical display: pixel resolution plus pixel density.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanelSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel density in pixels per inch.
    pub ppi: f64,
}

impl PanelSpec {
    /// Create a panel spec.
    pub const fn new(width: u32, height: u32, ppi: f64) -> Self {
        Self { width, height, ppi }
    }

    /// Pixel dimensions.
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Physical size in inches, `(width, height)`.
    pub fn physical_inches(&self) -> (f64, f64) {
        (self.width as f64 / self.ppi, self.height as f64 / self.ppi)
    }
}

/// The two panels of a dual-screen device, upper above lower.
///
/// Passed into the planner by value so layouts can be computed for panel
/// pairs other than [`DeviceProfile::THOR`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeviceProfile {
    pub upper: PanelSpec,
    pub lower: PanelSpec,
}

impl DeviceProfile {
    /// Thor handheld: 1920×1080 @ 367 PPI upper, 1240×1080 @ 297 PPI lower.
    pub const THOR: Self = Self {
        upper: PanelSpec::new(1920, 1080, 367.0),
        lower: PanelSpec::new(1240, 1080, 297.0),
    };

    /// Create a profile from two panel specs.
    pub const fn new(upper: PanelSpec, lower: PanelSpec) -> Self {
        Self { upper, lower }
    }

    /// Lower density divided by upper density.
    pub fn density_ratio(&self) -> f64 {
        self.lower.ppi / self.upper.ppi
    }

    /// Spec for one of the two panels.
    pub const fn spec(&self, panel: Panel) -> PanelSpec {
        match panel {
            Panel::Upper => self.upper,
            Panel::Lower => self.lower,
        }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::THOR
    }
}

/// Which of the two panels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    Upper,
    Lower,
}

impl Panel {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Upper => "Upper",
            Self::Lower => "Lower",
        }
    }
}

/// How much source area to reserve for the lower panel relative to its
/// native pixel count.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompensationMode {
    /// No compensation, factor 1.0.
    #[default]
    None,
    /// Fixed factor of 1.1.
    Fixed,
    /// Density ratio `lower.ppi / upper.ppi`, so a feature keeps its
    /// physical size when it crosses from one panel to the other.
    Physical,
}

impl CompensationMode {
    /// Factor used by [`CompensationMode::Fixed`].
    pub const FIXED_FACTOR: f64 = 1.1;

    /// Map a single on/off toggle: on is [`Physical`](Self::Physical), off is [`None`](Self::None).
    pub const fn from_toggle(enabled: bool) -> Self {
        if enabled { Self::Physical } else { Self::None }
    }

    /// Compensation factor for this mode on the given device.
    pub fn factor(self, profile: &DeviceProfile) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Fixed => Self::FIXED_FACTOR,
            Self::Physical => profile.density_ratio(),
        }
    }
}
