//! Uniform time grids
//!
//! Grid points are always computed as `start + k * step` rather than by
//! repeated addition, so drift does not accumulate along long contours.

/// Slack, in grid steps, under which a point counts as lying on a boundary
pub const GRID_TOLERANCE: f64 = 1e-9;

/// Number of grid points `start + k * step` that lie in `[start, stop)`
///
/// A point within [`GRID_TOLERANCE`] steps of `stop` counts as `stop` itself
/// and is excluded.
pub fn grid_len(start: f64, stop: f64, step: f64) -> usize {
    if stop <= start || step <= 0.0 {
        return 0;
    }
    let span = (stop - start) / step;
    (span - GRID_TOLERANCE).ceil().max(0.0) as usize
}

/// Half-open grid over `[start, stop)`, like numpy's `arange`
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    (0..grid_len(start, stop, step))
        .map(|k| start + k as f64 * step)
        .collect()
}

/// Grid over `[start, stop)` that also keeps `stop` when it falls on the grid
///
/// `start == stop` yields the single point `start`.
pub fn closed_grid(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut grid = arange(start, stop, step);
    if step <= 0.0 || stop < start {
        return grid;
    }
    let span = (stop - start) / step;
    let whole = span.round();
    if (span - whole).abs() <= GRID_TOLERANCE {
        grid.push(start + whole * step);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arange_half_open() {
        let grid = arange(0.0, 0.05, 0.01);
        assert_eq!(grid.len(), 5);
        assert_relative_eq!(grid[4], 0.04, epsilon = 1e-12);

        let grid = arange(0.0, 0.045, 0.01);
        assert_eq!(grid.len(), 5);

        assert!(arange(1.0, 1.0, 0.01).is_empty());
        assert!(arange(1.0, 0.5, 0.01).is_empty());
    }

    #[test]
    fn test_arange_absorbs_rounding() {
        // 0.3 / 0.1 is 2.9999999999999996 in binary floating point
        assert_eq!(arange(0.0, 0.3, 0.1).len(), 3);
        assert_eq!(arange(0.1, 0.7, 0.1).len(), 6);
    }

    #[test]
    fn test_closed_grid_keeps_endpoint_on_grid() {
        let grid = closed_grid(0.0, 0.01, 0.01);
        assert_eq!(grid.len(), 2);
        assert_relative_eq!(grid[1], 0.01, epsilon = 1e-15);

        let grid = closed_grid(0.0, 0.025, 0.01);
        assert_eq!(grid.len(), 3);
        assert!(*grid.last().unwrap() < 0.025);
    }

    #[test]
    fn test_closed_grid_single_point() {
        assert_eq!(closed_grid(0.3, 0.3, 0.01), vec![0.3]);
    }

    #[test]
    fn test_grid_len_matches_arange() {
        for &(start, stop, step) in &[(0.0, 1.0, 1.0 / 44100.0), (0.02, 0.37, 0.01)] {
            assert_eq!(grid_len(start, stop, step), arange(start, stop, step).len());
        }
        assert_eq!(grid_len(0.0, 1.0, 1.0 / 44100.0), 44100);
    }
}
