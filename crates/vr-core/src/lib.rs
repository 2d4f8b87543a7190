//! Foundational primitives for the resampling engine.
//!
//! ## Image Views and Stride
//! Images are interleaved: a row holds `width * channels` samples. `stride` is
//! the distance, in elements, between adjacent row starts and may be greater
//! than the row length. This allows borrowed views over padded buffers,
//! subviews and row bands.
//!
//! ## Element Types
//! [`Element`] is implemented for `u8`, `u16`, `f32`, [`half::f16`] and
//! [`half::bf16`]. Each carries an [`ElementType`] tag so that type-erased
//! callers can be matched against a resampler at runtime.
//!
//! ## Borders
//! Out-of-range taps use edge replication, see [`clamp_index`].

mod border;
mod element;
mod error;
mod image;

pub use border::clamp_index;
pub use element::{Element, ElementType};
pub use error::{Error, Result};
pub use image::{Image, ImageView, ImageViewMut};

pub use half::{bf16, f16};
