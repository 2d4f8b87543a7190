//! Vertical blends over horizontally resampled rows.
//!
//! Each blend has a scalar form plus 4- and 8-lane forms built on `wide`.
//! The lane forms perform the same integer or `f32` operations in the same
//! order as the scalar form, so every tier produces identical output. Tails
//! shorter than one vector go through the scalar form.

use wide::{f32x4, f32x8, i32x4, i32x8};

use crate::tier::Lanes;

const LINEAR_SHIFT: i32 = 16;
const LINEAR_BIAS: i32 = 1 << (LINEAR_SHIFT - 1);

const COMPAT_PRE_SHIFT: i32 = 4;
const COMPAT_MUL_SHIFT: i32 = 16;
const COMPAT_POST_SHIFT: i32 = 2;
const COMPAT_BIAS: i32 = 2;

const CUBIC_SHIFT: i32 = 22;
const CUBIC_BIAS: i32 = 1 << (CUBIC_SHIFT - 1);

#[inline(always)]
fn load<T: Copy + Default, const N: usize>(src: &[T]) -> [T; N] {
    let mut out = [T::default(); N];
    out.copy_from_slice(&src[..N]);
    out
}

// ---- byte bilinear: rows at scale 256, weights at scale 256 ----

fn linear_u8_scalar(r0: &[i32], r1: &[i32], w0: i32, w1: i32, out: &mut [u8]) {
    for ((o, &a), &b) in out.iter_mut().zip(r0).zip(r1) {
        *o = ((a * w0 + b * w1 + LINEAR_BIAS) >> LINEAR_SHIFT) as u8;
    }
}

macro_rules! linear_u8_lanes {
    ($name:ident, $v:ty, $n:literal) => {
        #[inline(always)]
        fn $name(r0: &[i32], r1: &[i32], w0: i32, w1: i32, out: &mut [u8]) {
            let (vw0, vw1, bias) = (<$v>::splat(w0), <$v>::splat(w1), <$v>::splat(LINEAR_BIAS));
            let mut i = 0;
            while i + $n <= out.len() {
                let a = <$v>::new(load(&r0[i..]));
                let b = <$v>::new(load(&r1[i..]));
                let acc = (a * vw0 + b * vw1 + bias) >> LINEAR_SHIFT;
                for (o, v) in out[i..i + $n].iter_mut().zip(acc.to_array()) {
                    *o = v as u8;
                }
                i += $n;
            }
            linear_u8_scalar(&r0[i..], &r1[i..], w0, w1, &mut out[i..]);
        }
    };
}

linear_u8_lanes!(linear_u8_x4, i32x4, 4);
linear_u8_lanes!(linear_u8_x8, i32x8, 8);

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
fn linear_u8_avx2(r0: &[i32], r1: &[i32], w0: i32, w1: i32, out: &mut [u8]) {
    linear_u8_x8(r0, r1, w0, w1, out)
}

/// `out = (r0 * w0 + r1 * w1 + 2^15) >> 16`.
pub(crate) fn linear_u8(lanes: Lanes, r0: &[i32], r1: &[i32], w0: i32, w1: i32, out: &mut [u8]) {
    match lanes {
        Lanes::X8 => {
            #[cfg(target_arch = "x86_64")]
            if crate::tier::has_avx2() {
                // SAFETY: avx2 support was detected at runtime.
                unsafe { linear_u8_avx2(r0, r1, w0, w1, out) };
                return;
            }
            linear_u8_x8(r0, r1, w0, w1, out)
        }
        Lanes::X4 => linear_u8_x4(r0, r1, w0, w1, out),
        Lanes::Scalar => linear_u8_scalar(r0, r1, w0, w1, out),
    }
}

// ---- OpenCV-compatible byte bilinear: rows and weights at scale 2048 ----

#[inline(always)]
fn compat_one(a: i32, b: i32, w0: i32, w1: i32) -> u8 {
    let v = (((w0 * (a >> COMPAT_PRE_SHIFT)) >> COMPAT_MUL_SHIFT)
        + ((w1 * (b >> COMPAT_PRE_SHIFT)) >> COMPAT_MUL_SHIFT)
        + COMPAT_BIAS)
        >> COMPAT_POST_SHIFT;
    v.clamp(0, 255) as u8
}

fn compat_u8_scalar(r0: &[i32], r1: &[i32], w0: i32, w1: i32, out: &mut [u8]) {
    for ((o, &a), &b) in out.iter_mut().zip(r0).zip(r1) {
        *o = compat_one(a, b, w0, w1);
    }
}

macro_rules! compat_u8_lanes {
    ($name:ident, $v:ty, $n:literal) => {
        #[inline(always)]
        fn $name(r0: &[i32], r1: &[i32], w0: i32, w1: i32, out: &mut [u8]) {
            let (vw0, vw1, bias) = (<$v>::splat(w0), <$v>::splat(w1), <$v>::splat(COMPAT_BIAS));
            let mut i = 0;
            while i + $n <= out.len() {
                let a = <$v>::new(load(&r0[i..])) >> COMPAT_PRE_SHIFT;
                let b = <$v>::new(load(&r1[i..])) >> COMPAT_PRE_SHIFT;
                let acc = (((vw0 * a) >> COMPAT_MUL_SHIFT) + ((vw1 * b) >> COMPAT_MUL_SHIFT) + bias)
                    >> COMPAT_POST_SHIFT;
                for (o, v) in out[i..i + $n].iter_mut().zip(acc.to_array()) {
                    *o = v.clamp(0, 255) as u8;
                }
                i += $n;
            }
            compat_u8_scalar(&r0[i..], &r1[i..], w0, w1, &mut out[i..]);
        }
    };
}

compat_u8_lanes!(compat_u8_x4, i32x4, 4);
compat_u8_lanes!(compat_u8_x8, i32x8, 8);

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
fn compat_u8_avx2(r0: &[i32], r1: &[i32], w0: i32, w1: i32, out: &mut [u8]) {
    compat_u8_x8(r0, r1, w0, w1, out)
}

/// OpenCV's fixed-point vertical step, saturated to `[0, 255]`.
pub(crate) fn compat_u8(lanes: Lanes, r0: &[i32], r1: &[i32], w0: i32, w1: i32, out: &mut [u8]) {
    match lanes {
        Lanes::X8 => {
            #[cfg(target_arch = "x86_64")]
            if crate::tier::has_avx2() {
                // SAFETY: avx2 support was detected at runtime.
                unsafe { compat_u8_avx2(r0, r1, w0, w1, out) };
                return;
            }
            compat_u8_x8(r0, r1, w0, w1, out)
        }
        Lanes::X4 => compat_u8_x4(r0, r1, w0, w1, out),
        Lanes::Scalar => compat_u8_scalar(r0, r1, w0, w1, out),
    }
}

// ---- float bilinear ----

fn linear_f32_scalar(r0: &[f32], r1: &[f32], w0: f32, w1: f32, out: &mut [f32]) {
    for ((o, &a), &b) in out.iter_mut().zip(r0).zip(r1) {
        *o = a * w0 + b * w1;
    }
}

macro_rules! linear_f32_lanes {
    ($name:ident, $v:ty, $n:literal) => {
        #[inline(always)]
        fn $name(r0: &[f32], r1: &[f32], w0: f32, w1: f32, out: &mut [f32]) {
            let (vw0, vw1) = (<$v>::splat(w0), <$v>::splat(w1));
            let mut i = 0;
            while i + $n <= out.len() {
                let a = <$v>::new(load(&r0[i..]));
                let b = <$v>::new(load(&r1[i..]));
                out[i..i + $n].copy_from_slice(&(a * vw0 + b * vw1).to_array());
                i += $n;
            }
            linear_f32_scalar(&r0[i..], &r1[i..], w0, w1, &mut out[i..]);
        }
    };
}

linear_f32_lanes!(linear_f32_x4, f32x4, 4);
linear_f32_lanes!(linear_f32_x8, f32x8, 8);

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
fn linear_f32_avx2(r0: &[f32], r1: &[f32], w0: f32, w1: f32, out: &mut [f32]) {
    linear_f32_x8(r0, r1, w0, w1, out)
}

/// `out = r0 * w0 + r1 * w1`, no fused multiply-add.
pub(crate) fn linear_f32(lanes: Lanes, r0: &[f32], r1: &[f32], w0: f32, w1: f32, out: &mut [f32]) {
    match lanes {
        Lanes::X8 => {
            #[cfg(target_arch = "x86_64")]
            if crate::tier::has_avx2() {
                // SAFETY: avx2 support was detected at runtime.
                unsafe { linear_f32_avx2(r0, r1, w0, w1, out) };
                return;
            }
            linear_f32_x8(r0, r1, w0, w1, out)
        }
        Lanes::X4 => linear_f32_x4(r0, r1, w0, w1, out),
        Lanes::Scalar => linear_f32_scalar(r0, r1, w0, w1, out),
    }
}

// ---- byte bicubic: rows at scale 2048, weights at scale 2048 ----

fn cubic_u8_scalar(r: [&[i32]; 4], w: [i32; 4], out: &mut [u8]) {
    for (i, o) in out.iter_mut().enumerate() {
        let acc = r[0][i] * w[0] + r[1][i] * w[1] + r[2][i] * w[2] + r[3][i] * w[3] + CUBIC_BIAS;
        *o = (acc >> CUBIC_SHIFT).clamp(0, 255) as u8;
    }
}

macro_rules! cubic_u8_lanes {
    ($name:ident, $v:ty, $n:literal) => {
        #[inline(always)]
        fn $name(r: [&[i32]; 4], w: [i32; 4], out: &mut [u8]) {
            let vw = w.map(<$v>::splat);
            let bias = <$v>::splat(CUBIC_BIAS);
            let mut i = 0;
            while i + $n <= out.len() {
                let acc = <$v>::new(load(&r[0][i..])) * vw[0]
                    + <$v>::new(load(&r[1][i..])) * vw[1]
                    + <$v>::new(load(&r[2][i..])) * vw[2]
                    + <$v>::new(load(&r[3][i..])) * vw[3]
                    + bias;
                for (o, v) in out[i..i + $n].iter_mut().zip((acc >> CUBIC_SHIFT).to_array()) {
                    *o = v.clamp(0, 255) as u8;
                }
                i += $n;
            }
            cubic_u8_scalar(r.map(|row| &row[i..]), w, &mut out[i..]);
        }
    };
}

cubic_u8_lanes!(cubic_u8_x4, i32x4, 4);
cubic_u8_lanes!(cubic_u8_x8, i32x8, 8);

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
fn cubic_u8_avx2(r: [&[i32]; 4], w: [i32; 4], out: &mut [u8]) {
    cubic_u8_x8(r, w, out)
}

/// Four-tap vertical step, `clamp((acc + 2^21) >> 22, 0, 255)`.
pub(crate) fn cubic_u8(lanes: Lanes, r: [&[i32]; 4], w: [i32; 4], out: &mut [u8]) {
    match lanes {
        Lanes::X8 => {
            #[cfg(target_arch = "x86_64")]
            if crate::tier::has_avx2() {
                // SAFETY: avx2 support was detected at runtime.
                unsafe { cubic_u8_avx2(r, w, out) };
                return;
            }
            cubic_u8_x8(r, w, out)
        }
        Lanes::X4 => cubic_u8_x4(r, w, out),
        Lanes::Scalar => cubic_u8_scalar(r, w, out),
    }
}
