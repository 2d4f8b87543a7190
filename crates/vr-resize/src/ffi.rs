//! C handle API.
//!
//! `vr_resizer_init` returns an opaque handle or null, `vr_resizer_run`
//! returns one of the `VR_*` status codes, and `vr_resizer_release` frees
//! the handle. Element type and method use the integer codes of
//! [`ElementType`] and [`Method`].

use std::ffi::c_void;

use vr_core::ElementType;

use crate::dispatch::create_resampler;
use crate::param::{Method, ResizeParams};
use crate::resampler::Resampler;

pub const VR_OK: i32 = 0;
pub const VR_ERR_NULL_PTR: i32 = 1;
pub const VR_ERR_PRECONDITION: i32 = 2;

/// Returns null when the configuration is unsupported.
#[unsafe(no_mangle)]
pub extern "C" fn vr_resizer_init(
    src_x: usize,
    src_y: usize,
    dst_x: usize,
    dst_y: usize,
    channels: usize,
    element_type: u32,
    method: u32,
) -> *mut c_void {
    let (Some(element_type), Some(method)) =
        (ElementType::from_code(element_type), Method::from_code(method))
    else {
        return std::ptr::null_mut();
    };
    let resampler = ResizeParams::new(src_x, src_y, dst_x, dst_y, channels, element_type, method)
        .and_then(create_resampler);
    match resampler {
        Ok(r) => Box::into_raw(Box::new(r)).cast(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Resizes one image. Strides are in bytes.
///
/// # Safety
/// `handle` must come from [`vr_resizer_init`] and not be released. `src`
/// must be readable and `dst` writable for `(rows - 1) * stride + row_bytes`
/// bytes of their respective images, and the two must not overlap.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vr_resizer_run(
    handle: *const c_void,
    src: *const u8,
    src_stride: usize,
    dst: *mut u8,
    dst_stride: usize,
) -> i32 {
    if handle.is_null() || src.is_null() || dst.is_null() {
        return VR_ERR_NULL_PTR;
    }
    // SAFETY: non-null handles are live `Resampler`s per the contract above.
    let resampler = unsafe { &*handle.cast::<Resampler>() };
    let p = resampler.params();

    let (Some(src_len), Some(dst_len)) = (
        buffer_len(src_stride, p.src_row_bytes(), p.src_height()),
        buffer_len(dst_stride, p.dst_row_bytes(), p.dst_height()),
    ) else {
        return VR_ERR_PRECONDITION;
    };
    // SAFETY: the caller guarantees both regions are valid for these lengths
    // and disjoint.
    let (src, dst) = unsafe {
        (
            std::slice::from_raw_parts(src, src_len),
            std::slice::from_raw_parts_mut(dst, dst_len),
        )
    };

    match resampler.resample_bytes(src, src_stride, dst, dst_stride) {
        Ok(()) => VR_OK,
        Err(_) => VR_ERR_PRECONDITION,
    }
}

/// Frees a handle. Null is ignored.
///
/// # Safety
/// `handle` must be null or come from [`vr_resizer_init`], and must not be
/// used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vr_resizer_release(handle: *mut c_void) {
    if handle.is_null() {
        return;
    }
    // SAFETY: the handle was produced by `Box::into_raw` in `vr_resizer_init`.
    drop(unsafe { Box::from_raw(handle.cast::<Resampler>()) });
}

fn buffer_len(stride: usize, row_bytes: usize, rows: usize) -> Option<usize> {
    if stride < row_bytes {
        return None;
    }
    stride.checked_mul(rows - 1)?.checked_add(row_bytes)
}
