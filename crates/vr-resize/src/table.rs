//! Per-axis interpolation tables.
//!
//! Every table has exactly one entry per destination coordinate and every
//! source index it stores lies in `[0, src)`. Tables are built once, when a
//! resampler is constructed, and are read-only afterwards.
//!
//! Source coordinates use the pixel-center convention
//! `s = (d + 0.5) * src / dst - 0.5`, except for the OpenCV-compatible
//! bilinear table which uses `s = d * src / dst`.

use vr_core::clamp_index;

/// Fixed-point shift of [`LinearTable::<i32>::byte`] weights.
pub const BILINEAR_SHIFT: u32 = 8;
pub const BILINEAR_RANGE: i32 = 1 << BILINEAR_SHIFT;

/// Fixed-point shift of [`LinearTable::<i32>::compat`] weights.
pub const COMPAT_SHIFT: u32 = 11;
pub const COMPAT_RANGE: i32 = 1 << COMPAT_SHIFT;

/// Fixed-point shift of [`CubicTable`] weights.
pub const CUBIC_SHIFT: u32 = 11;
pub const CUBIC_RANGE: i32 = 1 << CUBIC_SHIFT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mapping {
    HalfPixel,
    Asymmetric,
}

#[inline]
fn source_coord(d: usize, src: usize, dst: usize, mapping: Mapping) -> f64 {
    let scale = src as f64 / dst as f64;
    match mapping {
        Mapping::HalfPixel => (d as f64 + 0.5) * scale - 0.5,
        Mapping::Asymmetric => d as f64 * scale,
    }
}

/// Clamps `s` to `[0, src-1]` and splits it into `(i0, i1, frac)`.
#[inline]
fn split_coord(s: f64, src: usize) -> (usize, usize, f64) {
    let last = (src - 1) as f64;
    let s = s.clamp(0.0, last);
    let i0 = s.floor() as usize;
    let i1 = (i0 + 1).min(src - 1);
    (i0, i1, s - i0 as f64)
}

/// Source index per destination coordinate, `round(s)` with ties rounding up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearestTable {
    idx: Vec<usize>,
}

impl NearestTable {
    pub fn new(src: usize, dst: usize) -> Self {
        debug_assert!(src > 0 && dst > 0);
        // floor((d + 0.5) * src / dst) in exact integer arithmetic.
        let idx = (0..dst)
            .map(|d| (((2 * d + 1) * src) / (2 * dst)).min(src - 1))
            .collect();
        Self { idx }
    }

    pub fn len(&self) -> usize {
        self.idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.idx
    }
}

/// Two-tap entry: `out = w0 * s[i0] + w1 * s[i1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTap<W> {
    pub i0: usize,
    pub i1: usize,
    pub w0: W,
    pub w1: W,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearTable<W> {
    taps: Vec<LinearTap<W>>,
}

impl<W> LinearTable<W> {
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn taps(&self) -> &[LinearTap<W>] {
        &self.taps
    }
}

impl LinearTable<f32> {
    /// Floating-point weights, pixel-center mapping.
    pub fn float(src: usize, dst: usize) -> Self {
        let taps = (0..dst)
            .map(|d| {
                let (i0, i1, frac) = split_coord(source_coord(d, src, dst, Mapping::HalfPixel), src);
                let w1 = frac as f32;
                LinearTap {
                    i0,
                    i1,
                    w0: 1.0 - w1,
                    w1,
                }
            })
            .collect();
        Self { taps }
    }
}

impl LinearTable<i32> {
    /// Weights in units of `1 / BILINEAR_RANGE`, pixel-center mapping.
    /// `w1` is rounded half up and `w0` takes the complement.
    pub fn byte(src: usize, dst: usize) -> Self {
        let taps = (0..dst)
            .map(|d| {
                let (i0, i1, frac) = split_coord(source_coord(d, src, dst, Mapping::HalfPixel), src);
                let w1 = (frac * BILINEAR_RANGE as f64 + 0.5).floor() as i32;
                LinearTap {
                    i0,
                    i1,
                    w0: BILINEAR_RANGE - w1,
                    w1,
                }
            })
            .collect();
        Self { taps }
    }

    /// OpenCV-compatible weights in units of `1 / COMPAT_RANGE` with the
    /// corner-anchored mapping `s = d * src / dst`. `w0` is rounded half up
    /// and `w1` takes the complement.
    pub fn compat(src: usize, dst: usize) -> Self {
        let taps = (0..dst)
            .map(|d| {
                let (i0, i1, frac) =
                    split_coord(source_coord(d, src, dst, Mapping::Asymmetric), src);
                let w0 = ((1.0 - frac) * COMPAT_RANGE as f64 + 0.5).floor() as i32;
                LinearTap {
                    i0,
                    i1,
                    w0,
                    w1: COMPAT_RANGE - w0,
                }
            })
            .collect();
        Self { taps }
    }
}

/// Four-tap entry over `i0-1 ..= i0+2` with edge-replicated indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubicTap {
    pub idx: [usize; 4],
    pub w: [i32; 4],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubicTable {
    taps: Vec<CubicTap>,
}

impl CubicTable {
    /// Keys cubic convolution with coefficient `a`, weights in units of
    /// `1 / CUBIC_RANGE` summing to exactly `CUBIC_RANGE`.
    pub fn new(src: usize, dst: usize, a: f32) -> Self {
        let a = a as f64;
        let taps = (0..dst)
            .map(|d| {
                let (i0, _, t) = split_coord(source_coord(d, src, dst, Mapping::HalfPixel), src);
                let base = i0 as isize;
                let idx = [
                    clamp_index(base - 1, src),
                    clamp_index(base, src),
                    clamp_index(base + 1, src),
                    clamp_index(base + 2, src),
                ];
                let wf = [
                    cubic_kernel(1.0 + t, a),
                    cubic_kernel(t, a),
                    cubic_kernel(1.0 - t, a),
                    cubic_kernel(2.0 - t, a),
                ];
                CubicTap {
                    idx,
                    w: quantize_cubic(wf),
                }
            })
            .collect();
        Self { taps }
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn taps(&self) -> &[CubicTap] {
        &self.taps
    }
}

fn cubic_kernel(x: f64, a: f64) -> f64 {
    let x = x.abs();
    if x <= 1.0 {
        ((a + 2.0) * x - (a + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((a * x - 5.0 * a) * x + 8.0 * a) * x - 4.0 * a
    } else {
        0.0
    }
}

fn quantize_cubic(wf: [f64; 4]) -> [i32; 4] {
    let mut w = wf.map(|v| (v * CUBIC_RANGE as f64 + 0.5).floor() as i32);
    let residual = CUBIC_RANGE - w.iter().sum::<i32>();
    if residual != 0 {
        let mut largest = 0;
        for k in 1..4 {
            if w[k] > w[largest] {
                largest = k;
            }
        }
        w[largest] += residual;
    }
    w
}

/// Box footprint `[lo, hi)` of one destination sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaSpan {
    pub lo: usize,
    pub hi: usize,
}

impl AreaSpan {
    pub fn count(&self) -> usize {
        self.hi - self.lo
    }
}

/// Source ranges whose footprint intersects each destination box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaTable {
    spans: Vec<AreaSpan>,
}

impl AreaTable {
    pub fn new(src: usize, dst: usize) -> Self {
        let spans = (0..dst)
            .map(|d| {
                let lo = (d * src / dst).min(src - 1);
                let hi = ((d + 1) * src).div_ceil(dst).clamp(lo + 1, src);
                AreaSpan { lo, hi }
            })
            .collect();
        Self { spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[AreaSpan] {
        &self.spans
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AreaSpan, AreaTable, BILINEAR_RANGE, COMPAT_RANGE, CUBIC_RANGE, CubicTable, LinearTable,
        NearestTable,
    };

    #[test]
    fn identity_tables_are_exact() {
        let n = 7;
        assert_eq!(NearestTable::new(n, n).indices(), &[0, 1, 2, 3, 4, 5, 6]);

        for (d, tap) in LinearTable::<f32>::float(n, n).taps().iter().enumerate() {
            assert_eq!((tap.i0, tap.w0, tap.w1), (d, 1.0, 0.0));
        }
        for (d, tap) in LinearTable::<i32>::byte(n, n).taps().iter().enumerate() {
            assert_eq!((tap.i0, tap.w0, tap.w1), (d, BILINEAR_RANGE, 0));
        }
        for (d, tap) in LinearTable::<i32>::compat(n, n).taps().iter().enumerate() {
            assert_eq!((tap.i0, tap.w0, tap.w1), (d, COMPAT_RANGE, 0));
        }
        for (d, tap) in CubicTable::new(n, n, -0.5).taps().iter().enumerate() {
            assert_eq!(tap.idx[1], d);
            assert_eq!(tap.w, [0, CUBIC_RANGE, 0, 0]);
        }
        for (d, span) in AreaTable::new(n, n).spans().iter().enumerate() {
            assert_eq!(*span, AreaSpan { lo: d, hi: d + 1 });
        }
    }

    #[test]
    fn upscale_2x_bilinear_weights() {
        let t = LinearTable::<f32>::float(2, 4);
        let got: Vec<(usize, usize, f32)> = t.taps().iter().map(|e| (e.i0, e.i1, e.w1)).collect();
        // s = -0.25, 0.25, 0.75, 1.25 -> clamped to [0, 1]
        assert_eq!(
            got,
            vec![(0, 1, 0.0), (0, 1, 0.25), (0, 1, 0.75), (1, 1, 0.0)]
        );

        let b = LinearTable::<i32>::byte(2, 4);
        assert_eq!(b.taps()[1].w1, 64);
        assert_eq!(b.taps()[1].w0, 192);
    }

    #[test]
    fn compat_mapping_is_corner_anchored() {
        let t = LinearTable::<i32>::compat(4, 8);
        // s = d / 2
        assert_eq!((t.taps()[1].i0, t.taps()[1].w0), (0, 1024));
        assert_eq!((t.taps()[2].i0, t.taps()[2].w0), (1, 2048));
        // s = 3.5 clamps to the last sample.
        let last = t.taps()[7];
        assert_eq!((last.i0, last.i1, last.w0, last.w1), (3, 3, 2048, 0));
    }

    #[test]
    fn nearest_ties_round_up() {
        // s = (d + 0.5) * 3 / 2 - 0.5 = 0.25, 1.75 ; 4 -> 2: s = 0.5, 2.5
        assert_eq!(NearestTable::new(3, 2).indices(), &[0, 2]);
        assert_eq!(NearestTable::new(4, 2).indices(), &[1, 3]);
    }

    #[test]
    fn cubic_weights_sum_to_range_and_replicate_edges() {
        for a in [-0.75f32, -0.5, 0.0] {
            let t = CubicTable::new(5, 13, a);
            for tap in t.taps() {
                assert_eq!(tap.w.iter().sum::<i32>(), CUBIC_RANGE);
            }
            assert_eq!(t.taps()[0].idx, [0, 0, 1, 2]);
            assert_eq!(t.taps()[12].idx, [3, 4, 4, 4]);
        }
    }

    #[test]
    fn area_spans_cover_source() {
        let t = AreaTable::new(10, 4);
        let spans: Vec<(usize, usize)> = t.spans().iter().map(|s| (s.lo, s.hi)).collect();
        assert_eq!(spans, vec![(0, 3), (2, 5), (5, 8), (7, 10)]);

        let t = AreaTable::new(8, 4);
        assert!(t.spans().iter().all(|s| s.count() == 2));
    }

    #[test]
    fn indices_stay_in_range_for_extreme_ratios() {
        for (src, dst) in [(1, 500), (1000, 1), (1000, 3), (3, 1000), (1, 1), (997, 13)] {
            assert!(NearestTable::new(src, dst).indices().iter().all(|&i| i < src));
            for tap in LinearTable::<f32>::float(src, dst).taps() {
                assert!(tap.i0 < src && tap.i1 < src);
            }
            for tap in LinearTable::<i32>::byte(src, dst).taps() {
                assert!(tap.i0 < src && tap.i1 < src);
                assert_eq!(tap.w0 + tap.w1, BILINEAR_RANGE);
            }
            for tap in LinearTable::<i32>::compat(src, dst).taps() {
                assert!(tap.i0 < src && tap.i1 < src);
            }
            for tap in CubicTable::new(src, dst, -0.5).taps() {
                assert!(tap.idx.iter().all(|&i| i < src));
            }
            for span in AreaTable::new(src, dst).spans() {
                assert!(span.lo < span.hi && span.hi <= src);
            }
        }
    }
}
