//! Per-variant resampling kernels.
//!
//! Every kernel writes destination rows `rows.start..rows.end` of the full
//! output into a band view whose row 0 is destination row `rows.start`.
//! Separable kernels run a horizontal pass per source row, caching the
//! result, and a vertical blend per destination row. Only the vertical
//! blend depends on the capability tier.

pub(crate) mod area;
pub(crate) mod bicubic;
pub(crate) mod bilinear;
pub(crate) mod nearest;
pub(crate) mod vector;

/// Small cache of horizontally resampled source rows keyed by source index.
///
/// Holds exactly `N` rows, the number of vertical taps of the kernel, so
/// consecutive destination rows that share source rows skip the horizontal
/// pass.
pub(crate) struct RowCache<R, const N: usize> {
    keys: [Option<usize>; N],
    rows: [R; N],
}

impl<R, const N: usize> RowCache<R, N> {
    pub(crate) fn new(mut make: impl FnMut() -> R) -> Self {
        Self {
            keys: [None; N],
            rows: std::array::from_fn(|_| make()),
        }
    }

    /// Makes every wanted source row resident and returns the slot of each.
    ///
    /// Rows are filled with `fill(source_index, row)` on a miss. Slots holding
    /// rows outside `wanted` are recycled.
    pub(crate) fn prepare(
        &mut self,
        wanted: &[usize; N],
        mut fill: impl FnMut(usize, &mut R),
    ) -> [usize; N] {
        let mut pinned = [false; N];
        for (pin, key) in pinned.iter_mut().zip(&self.keys) {
            *pin = key.is_some_and(|k| wanted.contains(&k));
        }

        let mut slots = [0; N];
        for (slot, &w) in slots.iter_mut().zip(wanted) {
            *slot = match self.keys.iter().position(|&k| k == Some(w)) {
                Some(s) => s,
                None => {
                    let s = pinned
                        .iter()
                        .position(|&p| !p)
                        .expect("row cache holds one slot per wanted row");
                    fill(w, &mut self.rows[s]);
                    self.keys[s] = Some(w);
                    pinned[s] = true;
                    s
                }
            };
        }
        slots
    }

    pub(crate) fn row(&self, slot: usize) -> &R {
        &self.rows[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::RowCache;

    #[test]
    fn reuses_resident_rows() {
        let mut cache: RowCache<usize, 2> = RowCache::new(|| 0);
        let mut fills = Vec::new();

        let s = cache.prepare(&[3, 4], |i, r| {
            fills.push(i);
            *r = i * 10;
        });
        assert_eq!((*cache.row(s[0]), *cache.row(s[1])), (30, 40));

        let s = cache.prepare(&[4, 5], |i, r| {
            fills.push(i);
            *r = i * 10;
        });
        assert_eq!((*cache.row(s[0]), *cache.row(s[1])), (40, 50));
        assert_eq!(fills, vec![3, 4, 5]);
    }

    #[test]
    fn duplicate_wanted_rows_share_a_slot() {
        let mut cache: RowCache<usize, 4> = RowCache::new(|| 0);
        let mut fills = 0;
        let s = cache.prepare(&[0, 0, 1, 2], |i, r| {
            fills += 1;
            *r = i;
        });
        assert_eq!(s[0], s[1]);
        assert_eq!(fills, 3);
        assert_eq!(*cache.row(s[3]), 2);
    }
}
