//! Interpolation of voiced segments
//!
//! A voiced segment is a handful of `(time, frequency)` knots on the pitch
//! tracker's frame grid. To resample it at an arbitrary rate we fit a
//! continuous [`Curve`] through the knots:
//!
//! - cubic: an interpolating cubic spline with "not-a-knot" end conditions
//!   (the third derivative is continuous across the second and the
//!   second-to-last knot), used when there are at least 4 knots with
//!   distinct times;
//! - linear: piecewise linear, used for everything smaller;
//! - a single knot is held constant.
//!
//! Outside the knot range both curves continue their end pieces.

use crate::series::Segment;
use crate::utils::solve_tridiagonal;
use crate::{ContourError, Result};

/// Minimum number of knots for a cubic fit
pub const MIN_CUBIC_KNOTS: usize = 4;

/// Interpolation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Linear interpolation between adjacent knots
    #[default]
    Linear,
    /// Not-a-knot cubic spline through all knots
    Cubic,
}

impl Interpolation {
    /// Pick the order for a segment: cubic when it has at least
    /// [`MIN_CUBIC_KNOTS`] knots at distinct times, linear otherwise
    pub fn for_segment(segment: &Segment) -> Self {
        if segment.len() >= MIN_CUBIC_KNOTS && segment.has_distinct_times() {
            Interpolation::Cubic
        } else {
            Interpolation::Linear
        }
    }
}

/// Linear interpolation between two values
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// A continuous curve through a set of knots
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// Single knot, held everywhere
    Constant(f64),
    /// Piecewise linear through the knots
    Linear { times: Vec<f64>, values: Vec<f64> },
    /// Cubic spline through the knots
    Cubic(CubicSpline),
}

impl Curve {
    /// Fit a curve through a segment using [`Interpolation::for_segment`]
    pub fn fit(segment: &Segment) -> Self {
        let interpolation = Interpolation::for_segment(segment);
        // Segment knots are already validated, so the only failure left is a
        // singular spline system, which falls back to linear
        Self::new(interpolation, segment.times(), segment.frequencies())
            .unwrap_or_else(|_| linear_or_constant(segment.times(), segment.frequencies()))
    }

    /// Fit a curve of the requested order through arbitrary knots
    ///
    /// Times must be non-decreasing. Cubic needs at least 4 knots with
    /// strictly increasing times; a single knot always gives
    /// [`Curve::Constant`].
    pub fn new(interpolation: Interpolation, times: &[f64], values: &[f64]) -> Result<Self> {
        if times.is_empty() || times.len() != values.len() {
            return Err(ContourError::InvalidParameter(format!(
                "curve needs matching, non-empty knots ({} times, {} values)",
                times.len(),
                values.len()
            )));
        }
        if times.windows(2).any(|w| w[1] < w[0]) {
            return Err(ContourError::InvalidParameter(
                "knot times must not decrease".to_string(),
            ));
        }

        match interpolation {
            Interpolation::Linear => Ok(linear_or_constant(times, values)),
            Interpolation::Cubic => CubicSpline::not_a_knot(times, values).map(Curve::Cubic),
        }
    }

    /// Interpolation order actually used by this curve
    pub fn interpolation(&self) -> Interpolation {
        match self {
            Curve::Cubic(_) => Interpolation::Cubic,
            Curve::Constant(_) | Curve::Linear { .. } => Interpolation::Linear,
        }
    }

    /// Evaluate the curve at a time
    pub fn evaluate(&self, time: f64) -> f64 {
        match self {
            Curve::Constant(value) => *value,
            Curve::Linear { times, values } => {
                let k = interval_index(times, time);
                let h = times[k + 1] - times[k];
                if h == 0.0 {
                    // Coincident knots: the later one wins
                    values[k + 1]
                } else {
                    lerp(values[k], values[k + 1], (time - times[k]) / h)
                }
            }
            Curve::Cubic(spline) => spline.evaluate(time),
        }
    }

    /// Evaluate the curve at each of the given times
    pub fn evaluate_all(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.evaluate(t)).collect()
    }
}

fn linear_or_constant(times: &[f64], values: &[f64]) -> Curve {
    if times.len() == 1 {
        Curve::Constant(values[0])
    } else {
        Curve::Linear {
            times: times.to_vec(),
            values: values.to_vec(),
        }
    }
}

/// Index `k` of the knot interval `[times[k], times[k + 1]]` used for `time`
///
/// Times before the first knot use the first interval and times after the
/// last knot the last one. Requires at least two knots.
fn interval_index(times: &[f64], time: f64) -> usize {
    let n = times.len();
    let after = times.partition_point(|&t| t <= time);
    after.saturating_sub(1).min(n - 2)
}

/// Interpolating cubic spline stored as knot values and second derivatives
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    times: Vec<f64>,
    values: Vec<f64>,
    /// Second derivative of the spline at each knot
    curvatures: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline with not-a-knot end conditions
    ///
    /// With exactly 4 knots this is the single cubic through all of them.
    pub fn not_a_knot(times: &[f64], values: &[f64]) -> Result<Self> {
        let n = times.len();
        if n < MIN_CUBIC_KNOTS || values.len() != n {
            return Err(ContourError::InvalidParameter(format!(
                "cubic spline needs at least {} knots, got {}",
                MIN_CUBIC_KNOTS, n
            )));
        }

        let h: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
        if h.iter().any(|&step| !(step > 0.0)) {
            return Err(ContourError::InvalidParameter(
                "cubic spline needs strictly increasing knot times".to_string(),
            ));
        }

        // Continuity of the first derivative at interior knot i:
        //   h[i-1] M[i-1] + 2 (h[i-1] + h[i]) M[i] + h[i] M[i+1] = rhs[i]
        // Solved for the interior curvatures M[1..n-1]; the end curvatures are
        // eliminated with the not-a-knot conditions and recovered afterwards.
        let m = n - 2;
        let mut lower = vec![0.0; m];
        let mut diag = vec![0.0; m];
        let mut upper = vec![0.0; m];
        let mut rhs = vec![0.0; m];

        for j in 0..m {
            let i = j + 1;
            lower[j] = h[i - 1];
            diag[j] = 2.0 * (h[i - 1] + h[i]);
            upper[j] = h[i];
            rhs[j] = 6.0
                * ((values[i + 1] - values[i]) / h[i] - (values[i] - values[i - 1]) / h[i - 1]);
        }

        // M[0] = ((h0 + h1) M[1] - h0 M[2]) / h1
        let (h0, h1) = (h[0], h[1]);
        diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
        upper[0] = (h1 * h1 - h0 * h0) / h1;

        // M[n-1] = ((a + b) M[n-2] - b M[n-3]) / a
        let (a, b) = (h[n - 3], h[n - 2]);
        lower[m - 1] = (a * a - b * b) / a;
        diag[m - 1] = (a + b) * (2.0 * a + b) / a;

        let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs).ok_or_else(|| {
            ContourError::InvalidParameter("singular cubic spline system".to_string())
        })?;

        let mut curvatures = Vec::with_capacity(n);
        curvatures.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
        curvatures.extend_from_slice(&interior);
        curvatures.push(((a + b) * interior[m - 1] - b * interior[m - 2]) / a);

        Ok(Self {
            times: times.to_vec(),
            values: values.to_vec(),
            curvatures,
        })
    }

    /// Evaluate the spline; beyond the knots the end cubics continue
    pub fn evaluate(&self, time: f64) -> f64 {
        let k = interval_index(&self.times, time);
        let h = self.times[k + 1] - self.times[k];
        let to_right = self.times[k + 1] - time;
        let from_left = time - self.times[k];
        let (m0, m1) = (self.curvatures[k], self.curvatures[k + 1]);
        let (y0, y1) = (self.values[k], self.values[k + 1]);

        m0 * to_right.powi(3) / (6.0 * h)
            + m1 * from_left.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * to_right
            + (y1 / h - m1 * h / 6.0) * from_left
    }

    /// Get the second derivative at each knot
    pub fn curvatures(&self) -> &[f64] {
        &self.curvatures
    }
}
