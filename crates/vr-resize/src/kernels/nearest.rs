use std::ops::Range;

use vr_core::{ImageView, ImageViewMut};

use crate::param::ResizeParams;
use crate::table::NearestTable;

/// Pixel copy through per-axis index tables. Shared by every tier and every
/// element type.
pub(crate) struct NearestKernel {
    channels: usize,
    /// Source sample offset of each destination column, `index * channels`.
    x_offsets: Vec<usize>,
    yt: NearestTable,
}

impl NearestKernel {
    pub(crate) fn new(params: &ResizeParams) -> Self {
        let channels = params.channels();
        let x_offsets = NearestTable::new(params.src_width(), params.dst_width())
            .indices()
            .iter()
            .map(|&i| i * channels)
            .collect();
        Self {
            channels,
            x_offsets,
            yt: NearestTable::new(params.src_height(), params.dst_height()),
        }
    }

    pub(crate) fn run<T: Copy>(
        &self,
        src: &ImageView<'_, T>,
        dst: &mut ImageViewMut<'_, T>,
        rows: Range<usize>,
    ) {
        let c = self.channels;
        let y_indices = &self.yt.indices()[rows];
        for (band_y, &sy) in y_indices.iter().enumerate() {
            let src_row = src.row(sy);
            let dst_row = dst.row_mut(band_y);
            for (px, &sx) in dst_row.chunks_exact_mut(c).zip(&self.x_offsets) {
                px.copy_from_slice(&src_row[sx..sx + c]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use vr_core::{ElementType, Image};

    use super::NearestKernel;
    use crate::param::{Method, ResizeParams};

    #[test]
    fn duplicates_pixels_on_2x_upscale() {
        let src = Image::from_vec(2, 1, 2, vec![1u16, 2, 3, 4]).unwrap();
        let params = ResizeParams::new(2, 1, 4, 2, 2, ElementType::U16, Method::Nearest).unwrap();
        let mut dst = Image::new_fill(4, 2, 2, 0u16);
        NearestKernel::new(&params).run(&src.as_view(), &mut dst.as_view_mut(), 0..2);
        assert_eq!(dst.data(), &[1, 2, 1, 2, 3, 4, 3, 4, 1, 2, 1, 2, 3, 4, 3, 4]);
    }

    #[test]
    fn band_writes_only_requested_rows() {
        let src = Image::from_vec(1, 4, 1, vec![10u8, 20, 30, 40]).unwrap();
        let params = ResizeParams::new(1, 4, 1, 2, 1, ElementType::U8, Method::Nearest).unwrap();
        let mut band = Image::new_fill(1, 1, 1, 0u8);
        NearestKernel::new(&params).run(&src.as_view(), &mut band.as_view_mut(), 1..2);
        // Row 1 of a 4 -> 2 downscale samples source row 3.
        assert_eq!(band.data(), &[40]);
    }
}
