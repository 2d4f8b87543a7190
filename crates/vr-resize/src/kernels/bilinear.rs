use std::ops::Range;

use vr_core::{Element, ImageView, ImageViewMut};

use super::{RowCache, vector};
use crate::param::ResizeParams;
use crate::table::{LinearTable, LinearTap};
use crate::tier::Lanes;

/// Fixed-point rounding scheme of an 8-bit bilinear kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteRounding {
    /// Pixel-center mapping, 8-bit weights, one rounding step.
    Standard,
    /// OpenCV mapping and coefficient rule, 11-bit weights.
    Compat,
}

/// 8-bit bilinear with integer weights.
pub(crate) struct ByteBilinearKernel {
    channels: usize,
    rounding: ByteRounding,
    xt: LinearTable<i32>,
    yt: LinearTable<i32>,
}

impl ByteBilinearKernel {
    pub(crate) fn new(params: &ResizeParams, rounding: ByteRounding) -> Self {
        let build = match rounding {
            ByteRounding::Standard => LinearTable::<i32>::byte,
            ByteRounding::Compat => LinearTable::<i32>::compat,
        };
        Self {
            channels: params.channels(),
            rounding,
            xt: build(params.src_width(), params.dst_width()),
            yt: build(params.src_height(), params.dst_height()),
        }
    }

    pub(crate) fn run(
        &self,
        src: &ImageView<'_, u8>,
        dst: &mut ImageViewMut<'_, u8>,
        rows: Range<usize>,
        lanes: Lanes,
    ) {
        let row_len = dst.row_len();
        let mut cache: RowCache<Vec<i32>, 2> = RowCache::new(|| vec![0; row_len]);

        for (band_y, tap) in self.yt.taps()[rows].iter().enumerate() {
            let slots = cache.prepare(&[tap.i0, tap.i1], |sy, buf| {
                horizontal_i32(src.row(sy), self.xt.taps(), self.channels, buf)
            });
            let (h0, h1) = (cache.row(slots[0]), cache.row(slots[1]));
            let out = dst.row_mut(band_y);
            match self.rounding {
                ByteRounding::Standard => vector::linear_u8(lanes, h0, h1, tap.w0, tap.w1, out),
                ByteRounding::Compat => vector::compat_u8(lanes, h0, h1, tap.w0, tap.w1, out),
            }
        }
    }
}

fn horizontal_i32(src: &[u8], taps: &[LinearTap<i32>], channels: usize, out: &mut [i32]) {
    for (px, tap) in out.chunks_exact_mut(channels).zip(taps) {
        let p0 = &src[tap.i0 * channels..][..channels];
        let p1 = &src[tap.i1 * channels..][..channels];
        for ((o, &a), &b) in px.iter_mut().zip(p0).zip(p1) {
            *o = a as i32 * tap.w0 + b as i32 * tap.w1;
        }
    }
}

/// Bilinear in `f32` for every element type without a fixed-point path.
///
/// Samples are widened with [`Element::to_f32`], blended, and narrowed with
/// [`Element::from_f32`]. For `f32` both conversions are the identity.
pub(crate) struct FloatBilinearKernel {
    channels: usize,
    xt: LinearTable<f32>,
    yt: LinearTable<f32>,
}

impl FloatBilinearKernel {
    pub(crate) fn new(params: &ResizeParams) -> Self {
        Self {
            channels: params.channels(),
            xt: LinearTable::<f32>::float(params.src_width(), params.dst_width()),
            yt: LinearTable::<f32>::float(params.src_height(), params.dst_height()),
        }
    }

    pub(crate) fn run<T: Element>(
        &self,
        src: &ImageView<'_, T>,
        dst: &mut ImageViewMut<'_, T>,
        rows: Range<usize>,
        lanes: Lanes,
    ) {
        let row_len = dst.row_len();
        let mut cache: RowCache<Vec<f32>, 2> = RowCache::new(|| vec![0.0; row_len]);
        let mut line = vec![0.0f32; row_len];

        for (band_y, tap) in self.yt.taps()[rows].iter().enumerate() {
            let slots = cache.prepare(&[tap.i0, tap.i1], |sy, buf| {
                horizontal_f32(src.row(sy), self.xt.taps(), self.channels, buf)
            });
            vector::linear_f32(
                lanes,
                cache.row(slots[0]),
                cache.row(slots[1]),
                tap.w0,
                tap.w1,
                &mut line,
            );
            for (o, &v) in dst.row_mut(band_y).iter_mut().zip(&line) {
                *o = T::from_f32(v);
            }
        }
    }
}

fn horizontal_f32<T: Element>(src: &[T], taps: &[LinearTap<f32>], channels: usize, out: &mut [f32]) {
    for (px, tap) in out.chunks_exact_mut(channels).zip(taps) {
        let p0 = &src[tap.i0 * channels..][..channels];
        let p1 = &src[tap.i1 * channels..][..channels];
        for ((o, &a), &b) in px.iter_mut().zip(p0).zip(p1) {
            *o = a.to_f32() * tap.w0 + b.to_f32() * tap.w1;
        }
    }
}
