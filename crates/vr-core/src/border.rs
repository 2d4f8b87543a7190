/// Maps a possibly out-of-range sample index onto `[0, len)` by edge
/// replication.
///
/// `len` must be non-zero.
#[inline]
pub fn clamp_index(i: isize, len: usize) -> usize {
    debug_assert!(len > 0, "cannot clamp into an empty axis");
    if i < 0 {
        0
    } else {
        (i as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::clamp_index;

    #[test]
    fn clamp_mapping_handles_negative_and_overflow() {
        assert_eq!(clamp_index(-3, 5), 0);
        assert_eq!(clamp_index(-1, 5), 0);
        assert_eq!(clamp_index(0, 5), 0);
        assert_eq!(clamp_index(4, 5), 4);
        assert_eq!(clamp_index(5, 5), 4);
        assert_eq!(clamp_index(99, 5), 4);
    }

    #[test]
    fn single_sample_axis_always_maps_to_zero() {
        for i in -8..=8 {
            assert_eq!(clamp_index(i, 1), 0);
        }
    }
}
