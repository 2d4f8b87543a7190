//! Umbrella crate for the `vision-resample` workspace.
//!
//! Re-exports the image primitives of `vr-core` and the resampling engine
//! of `vr-resize`.

pub use vr_core::*;
pub use vr_resize::*;
