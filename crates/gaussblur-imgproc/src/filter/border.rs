/// Clamp a value into the closed interval `[min, max]`.
///
/// Out-of-range coordinates are mapped onto the nearest edge, which gives the
/// clamp-to-edge (replicate) border used by both filter passes.
///
/// Example: ...d c b a | a a a a...
///
/// # Arguments
///
/// * `v` - The (possibly out-of-range) value.
/// * `min` - The lower bound.
/// * `max` - The upper bound. Must not be smaller than `min`.
#[inline]
pub fn clamp_to_edge<T: PartialOrd>(v: T, min: T, max: T) -> T {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

/// Map a signed coordinate to a valid index in `[0, len)` by replicating the edge.
///
/// PRECONDITION: `len > 0`.
#[inline]
pub fn clamp_index(i: isize, len: usize) -> usize {
    clamp_to_edge(i, 0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_edge() {
        assert_eq!(clamp_to_edge(-3, 0, 9), 0);
        assert_eq!(clamp_to_edge(0, 0, 9), 0);
        assert_eq!(clamp_to_edge(5, 0, 9), 5);
        assert_eq!(clamp_to_edge(9, 0, 9), 9);
        assert_eq!(clamp_to_edge(12, 0, 9), 9);
        assert_eq!(clamp_to_edge(300.5f64, 0.0, 255.0), 255.0);
    }

    #[test]
    fn test_clamp_index() {
        let mapped = (-2..7).map(|i| clamp_index(i, 5)).collect::<Vec<_>>();
        assert_eq!(mapped, vec![0, 0, 0, 1, 2, 3, 4, 4, 4]);
        // a single pixel dimension collapses every tap onto it
        assert!((-4..4).all(|i| clamp_index(i, 1) == 0));
    }
}
