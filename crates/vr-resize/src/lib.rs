//! Capability-tiered image resampling.
//!
//! A [`Resampler`] is built once per geometry from [`ResizeParams`] and then
//! applied to any number of images. Construction resolves the
//! (method, element type, geometry) triple to a single [`Variant`], builds
//! its per-axis tables, and picks the most specialized [`Tier`] the host
//! supports whose preconditions hold.
//!
//! Methods and element types:
//! - `Nearest`: every element type, exact pixel copies.
//! - `Bilinear`: 8-bit with fixed-point weights; 16-bit, `f32`, `f16` and
//!   `bf16` blended in `f32`.
//! - `BilinearCompat`: 8-bit, OpenCV-compatible mapping and rounding.
//! - `Bicubic`: 8-bit Keys cubic, fixed point.
//! - `Area`: 8-bit, 16-bit and `f32` box filter, with a dedicated exact
//!   2:1 path.
//!
//! Coordinate convention:
//! - Destination pixel `d` samples source coordinate
//!   `(d + 0.5) * src / dst - 0.5`, clamped to the image. Out-of-range taps
//!   replicate the edge.
//! - `BilinearCompat` uses `d * src / dst`.
//!
//! Tier equivalence:
//! - Every tier produces bit-identical output for the same input. Tiers only
//!   differ in how many lanes the vertical blend processes per step.

pub mod ffi;

mod config;
mod dispatch;
mod kernels;
mod param;
mod resampler;
mod table;
mod tier;

pub use config::{DEFAULT_CUBIC_A, ResizeConfig};
pub use dispatch::{create_resampler, create_resampler_with};
pub use param::{Method, ResizeParams, Variant};
pub use resampler::Resampler;
pub use table::{AreaSpan, AreaTable, CubicTable, CubicTap, LinearTable, LinearTap, NearestTable};
pub use tier::{CapabilityProbe, FixedProbe, HostProbe, Tier};
