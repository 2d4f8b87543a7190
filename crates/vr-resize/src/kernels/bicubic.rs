use std::ops::Range;

use vr_core::{ImageView, ImageViewMut};

use super::{RowCache, vector};
use crate::param::ResizeParams;
use crate::table::{CubicTable, CubicTap};
use crate::tier::Lanes;

/// 8-bit Keys bicubic, fixed point in both passes.
pub(crate) struct ByteBicubicKernel {
    channels: usize,
    xt: CubicTable,
    yt: CubicTable,
}

impl ByteBicubicKernel {
    pub(crate) fn new(params: &ResizeParams, a: f32) -> Self {
        Self {
            channels: params.channels(),
            xt: CubicTable::new(params.src_width(), params.dst_width(), a),
            yt: CubicTable::new(params.src_height(), params.dst_height(), a),
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
        let mut cache: RowCache<Vec<i32>, 4> = RowCache::new(|| vec![0; row_len]);

        for (band_y, tap) in self.yt.taps()[rows].iter().enumerate() {
            let slots = cache.prepare(&tap.idx, |sy, buf| {
                horizontal(src.row(sy), self.xt.taps(), self.channels, buf)
            });
            let r = slots.map(|s| cache.row(s).as_slice());
            vector::cubic_u8(lanes, r, tap.w, dst.row_mut(band_y));
        }
    }
}

fn horizontal(src: &[u8], taps: &[CubicTap], channels: usize, out: &mut [i32]) {
    for (px, tap) in out.chunks_exact_mut(channels).zip(taps) {
        let base = tap.idx.map(|i| i * channels);
        for (ch, o) in px.iter_mut().enumerate() {
            *o = src[base[0] + ch] as i32 * tap.w[0]
                + src[base[1] + ch] as i32 * tap.w[1]
                + src[base[2] + ch] as i32 * tap.w[2]
                + src[base[3] + ch] as i32 * tap.w[3];
        }
    }
}

#[cfg(test)]
mod tests {
    use vr_core::{ElementType, Image};

    use super::ByteBicubicKernel;
    use crate::config::DEFAULT_CUBIC_A;
    use crate::param::{Method, ResizeParams};
    use crate::tier::Lanes;

    fn run(src: &Image<u8>, dw: usize, dh: usize, lanes: Lanes) -> Image<u8> {
        let params = ResizeParams::new(
            src.width(),
            src.height(),
            dw,
            dh,
            src.channels(),
            ElementType::U8,
            Method::Bicubic,
        )
        .unwrap();
        let mut dst = Image::new_fill(dw, dh, src.channels(), 0u8);
        ByteBicubicKernel::new(&params, DEFAULT_CUBIC_A).run(
            &src.as_view(),
            &mut dst.as_view_mut(),
            0..dh,
            lanes,
        );
        dst
    }

    #[test]
    fn constant_image_stays_constant() {
        let src = Image::new_fill(5, 4, 3, 137u8);
        for lanes in [Lanes::Scalar, Lanes::X8] {
            let dst = run(&src, 13, 9, lanes);
            assert!(dst.data().iter().all(|&v| v == 137));
        }
    }

    #[test]
    fn overshoot_saturates_at_hard_edges() {
        let src = Image::from_vec(4, 1, 1, vec![0u8, 0, 255, 255]).unwrap();
        // Unclamped, the lobes next to the step reach about -19 and 274.
        for lanes in [Lanes::Scalar, Lanes::X4, Lanes::X8] {
            let dst = run(&src, 16, 1, lanes);
            assert_eq!(
                dst.data(),
                &[0, 0, 0, 0, 0, 0, 21, 88, 167, 234, 255, 255, 255, 255, 255, 255],
                "{lanes:?}"
            );
        }
    }
}
