//! Dual-panel wallpaper layout for handhelds with two stacked screens.
//!
//! One source image is split across an upper and a lower panel that differ in
//! resolution and pixel density. The planner places both panels on a virtual
//! canvas (optionally density-compensated, with a gap for the physical hinge),
//! cover-fits the source onto it, and maps each panel back to a source crop.
//! The compositor and the preview both consume that one plan.
//!
//! Geometry is `no_std` and allocation-free; pixel work sits behind the
//! `compositor` feature.
//!
//! # Modules
//!
//! - [`geometry`]: sizes, integer and float rectangles, fit scales
//! - [`panel`]: panel specs, device profiles, compensation modes
//! - [`plan`]: the layout planner
//! - [`preview`]: projection of a plan into a preview viewport
//! - [`rotation`]: quarter-turn rotation applied before planning
//! - `composite`, `resize`: pixel execution (feature `compositor`)
//! - `svg`: overlay rendering (feature `svg`)
//!
//! ```
//! use dualpanel::{CompensationMode, plan_layout};
//!
//! let plan = plan_layout(1920, 1954, 0, CompensationMode::Physical).unwrap();
//! assert_eq!(plan.compensated_lower.width, 1003);
//! assert_eq!(plan.compensated_lower.height, 874);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod geometry;
pub mod panel;
pub mod plan;
pub mod preview;
pub mod rotation;

#[cfg(feature = "compositor")]
pub mod composite;
#[cfg(feature = "compositor")]
mod resize;

#[cfg(feature = "svg")]
pub mod svg;

pub use geometry::{CanvasColor, Rect, RectF, Region, Size};
pub use panel::{CompensationMode, DeviceProfile, Panel, PanelSpec};
pub use plan::{LayoutError, LayoutPlan, PlanOptions, UndersizePolicy, plan_layout};
pub use preview::{Placement, PreviewOverlay, project_for_preview, project_into};
pub use rotation::Rotation;

#[cfg(feature = "compositor")]
pub use composite::{CompositeError, Compositor, PanelOutput, composite, extract_region};
#[cfg(feature = "compositor")]
pub use resize::{cover_crop, scale_to_cover};
