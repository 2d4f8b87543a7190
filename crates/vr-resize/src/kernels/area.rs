use std::ops::{AddAssign, Range};

use vr_core::{Element, ImageView, ImageViewMut};

use crate::param::ResizeParams;
use crate::table::AreaTable;

/// Element types with a box-filter path.
pub(crate) trait AreaElement: Element {
    /// Accumulator wide enough for any footprint.
    type Sum: Copy + Default + AddAssign;

    fn widen(self) -> Self::Sum;

    /// Mean of `n` accumulated samples. Integers round half up.
    fn mean(sum: Self::Sum, n: usize) -> Self;

    /// Mean of one 2x2 block.
    fn mean4(a: Self, b: Self, c: Self, d: Self) -> Self;
}

impl AreaElement for u8 {
    type Sum = u64;

    #[inline]
    fn widen(self) -> u64 {
        self as u64
    }

    #[inline]
    fn mean(sum: u64, n: usize) -> Self {
        let n = n as u64;
        ((sum + n / 2) / n) as u8
    }

    #[inline]
    fn mean4(a: Self, b: Self, c: Self, d: Self) -> Self {
        let sum = (a as u32) + (b as u32) + (c as u32) + (d as u32);
        ((sum + 2) / 4) as u8
    }
}

impl AreaElement for u16 {
    type Sum = u64;

    #[inline]
    fn widen(self) -> u64 {
        self as u64
    }

    #[inline]
    fn mean(sum: u64, n: usize) -> Self {
        let n = n as u64;
        ((sum + n / 2) / n) as u16
    }

    #[inline]
    fn mean4(a: Self, b: Self, c: Self, d: Self) -> Self {
        let sum = (a as u32) + (b as u32) + (c as u32) + (d as u32);
        ((sum + 2) / 4) as u16
    }
}

impl AreaElement for f32 {
    type Sum = f64;

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline]
    fn mean(sum: f64, n: usize) -> Self {
        (sum / n as f64) as f32
    }

    #[inline]
    fn mean4(a: Self, b: Self, c: Self, d: Self) -> Self {
        (a + b + c + d) * 0.25
    }
}

/// Exact 2:1 box in both axes.
///
/// Fully contiguous source and band take a pointer fast path, anything with
/// row padding takes the checked fallback. Both give identical results.
pub(crate) fn area_2x<T: AreaElement>(
    src: &ImageView<'_, T>,
    dst: &mut ImageViewMut<'_, T>,
    rows: Range<usize>,
) {
    let channels = src.channels();
    let dst_w = dst.width();
    let band_h = dst.height();
    debug_assert_eq!(src.width(), 2 * dst_w);
    debug_assert!(2 * rows.end <= src.height());
    debug_assert_eq!(rows.len(), band_h);

    if dst_w == 0 || band_h == 0 {
        return;
    }

    let src_row_len = src.row_len();
    if src.is_contiguous()
        && dst.is_contiguous()
        && let Some(src_contig) = src.as_contiguous_slice()
        && let Some(dst_contig) = dst.as_contiguous_slice_mut()
    {
        area_2x_contiguous(src_contig, src_row_len, dst_contig, dst_w, channels, rows);
        return;
    }

    area_2x_fallback(src, dst, channels, rows);
}

fn area_2x_contiguous<T: AreaElement>(
    src: &[T],
    src_row_len: usize,
    dst: &mut [T],
    dst_w: usize,
    channels: usize,
    rows: Range<usize>,
) {
    let dst_row_len = dst_w * channels;
    assert!(src.len() >= 2 * rows.end * src_row_len);
    assert_eq!(dst.len(), rows.len() * dst_row_len);

    let src_ptr = src.as_ptr();
    let dst_ptr = dst.as_mut_ptr();
    // SAFETY:
    // - `src` is contiguous and holds at least `2 * rows.end` rows of
    //   `src_row_len == 2 * dst_row_len` samples.
    // - `dst` holds exactly `rows.len()` rows of `dst_row_len` samples.
    // - Loops only access in-range addresses derived from these lengths.
    unsafe {
        for (band_y, y) in rows.enumerate() {
            let src_row0 = src_ptr.add((2 * y) * src_row_len);
            let src_row1 = src_ptr.add((2 * y + 1) * src_row_len);
            let dst_row = dst_ptr.add(band_y * dst_row_len);
            for x in 0..dst_w {
                for ch in 0..channels {
                    let s0 = 2 * x * channels + ch;
                    let s1 = s0 + channels;
                    *dst_row.add(x * channels + ch) = T::mean4(
                        *src_row0.add(s0),
                        *src_row0.add(s1),
                        *src_row1.add(s0),
                        *src_row1.add(s1),
                    );
                }
            }
        }
    }
}

fn area_2x_fallback<T: AreaElement>(
    src: &ImageView<'_, T>,
    dst: &mut ImageViewMut<'_, T>,
    channels: usize,
    rows: Range<usize>,
) {
    for (band_y, y) in rows.enumerate() {
        let src_row0 = src.row(2 * y);
        let src_row1 = src.row(2 * y + 1);
        let dst_row = dst.row_mut(band_y);
        for (x, px) in dst_row.chunks_exact_mut(channels).enumerate() {
            let s0 = 2 * x * channels;
            let s1 = s0 + channels;
            for (ch, out) in px.iter_mut().enumerate() {
                *out = T::mean4(
                    src_row0[s0 + ch],
                    src_row0[s1 + ch],
                    src_row1[s0 + ch],
                    src_row1[s1 + ch],
                );
            }
        }
    }
}

/// Box filter over arbitrary ratios. Each destination sample is the uniform
/// mean of every source sample whose footprint intersects its box.
pub(crate) struct AreaKernel {
    xt: AreaTable,
    yt: AreaTable,
}

impl AreaKernel {
    pub(crate) fn new(params: &ResizeParams) -> Self {
        Self {
            xt: AreaTable::new(params.src_width(), params.dst_width()),
            yt: AreaTable::new(params.src_height(), params.dst_height()),
        }
    }

    pub(crate) fn run<T: AreaElement>(
        &self,
        src: &ImageView<'_, T>,
        dst: &mut ImageViewMut<'_, T>,
        rows: Range<usize>,
    ) {
        let channels = src.channels();
        let mut acc = vec![T::Sum::default(); dst.row_len()];

        for (band_y, ys) in self.yt.spans()[rows].iter().enumerate() {
            acc.fill(T::Sum::default());
            for sy in ys.lo..ys.hi {
                let src_row = src.row(sy);
                for (px, xs) in acc.chunks_exact_mut(channels).zip(self.xt.spans()) {
                    for sx in xs.lo..xs.hi {
                        let p = &src_row[sx * channels..][..channels];
                        for (a, &v) in px.iter_mut().zip(p) {
                            *a += v.widen();
                        }
                    }
                }
            }

            let dst_row = dst.row_mut(band_y);
            for ((px, a), xs) in dst_row
                .chunks_exact_mut(channels)
                .zip(acc.chunks_exact(channels))
                .zip(self.xt.spans())
            {
                let n = xs.count() * ys.count();
                for (o, &s) in px.iter_mut().zip(a) {
                    *o = T::mean(s, n);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use vr_core::{ElementType, Image, ImageViewMut};

    use super::{AreaKernel, area_2x};
    use crate::param::{Method, ResizeParams};

    #[test]
    fn area_2x_on_4x4_known_values() {
        let src = Image::from_vec(
            4,
            4,
            1,
            vec![
                0.0f32, 1.0, 2.0, 3.0, //
                4.0, 5.0, 6.0, 7.0, //
                8.0, 9.0, 10.0, 11.0, //
                12.0, 13.0, 14.0, 15.0, //
            ],
        )
        .expect("valid image");

        let mut dst = Image::new_fill(2, 2, 1, 0.0f32);
        area_2x(&src.as_view(), &mut dst.as_view_mut(), 0..2);
        assert_eq!(dst.data(), &[2.5, 4.5, 10.5, 12.5]);
    }

    #[test]
    fn area_2x_averages_each_channel() {
        let src = Image::from_vec(
            2,
            2,
            2,
            vec![
                1u8, 100, 2, 101, //
                2, 102, 3, 104, //
            ],
        )
        .expect("valid image");

        let mut dst = Image::new_fill(1, 1, 2, 0u8);
        area_2x(&src.as_view(), &mut dst.as_view_mut(), 0..1);
        // (8 + 2) / 4 = 2, (407 + 2) / 4 = 102
        assert_eq!(dst.data(), &[2, 102]);
    }

    #[test]
    fn area_2x_non_contiguous_views_match() {
        let src = Image::from_vec(
            6,
            4,
            1,
            vec![
                0u16, 1, 2, 3, 4, 5, //
                6, 7, 8, 9, 10, 11, //
                12, 13, 14, 15, 16, 17, //
                18, 19, 20, 21, 22, 23, //
            ],
        )
        .expect("valid image");

        let sub = src.as_view().subview(1, 0, 4, 4).expect("valid subview");
        assert!(!sub.is_contiguous());

        let mut buf = vec![0u16; 2 * 3];
        let mut dst = ImageViewMut::from_slice_mut(2, 2, 1, 3, &mut buf).expect("valid view");
        area_2x(&sub, &mut dst, 0..2);
        // (1 + 2 + 7 + 8 + 2) / 4 = 5, (3 + 4 + 9 + 10 + 2) / 4 = 7, ...
        assert_eq!(buf, vec![5, 7, 0, 17, 19, 0]);
    }

    #[test]
    fn integer_u16_rounding_rule() {
        let src = Image::from_vec(2, 2, 1, vec![1u16, 2, 2, 3]).expect("valid image");
        let mut dst = Image::new_fill(1, 1, 1, 0u16);
        area_2x(&src.as_view(), &mut dst.as_view_mut(), 0..1);
        assert_eq!(dst.data(), &[2u16]);
    }

    #[test]
    fn general_area_uses_overlapping_footprints() {
        let src = Image::from_vec(3, 1, 1, vec![0u8, 30, 90]).expect("valid image");
        let params = ResizeParams::new(3, 1, 2, 1, 1, ElementType::U8, Method::Area).unwrap();
        let mut dst = Image::new_fill(2, 1, 1, 0u8);
        AreaKernel::new(&params).run(&src.as_view(), &mut dst.as_view_mut(), 0..1);
        // spans [0, 2) and [1, 3)
        assert_eq!(dst.data(), &[15, 60]);
    }

    #[test]
    fn general_area_float_mean() {
        let src = Image::from_vec(3, 3, 1, (1..=9).map(|v| v as f32).collect()).expect("valid");
        let params = ResizeParams::new(3, 3, 1, 1, 1, ElementType::F32, Method::Area).unwrap();
        let mut dst = Image::new_fill(1, 1, 1, 0.0f32);
        AreaKernel::new(&params).run(&src.as_view(), &mut dst.as_view_mut(), 0..1);
        assert_eq!(dst.data(), &[5.0]);
    }
}
