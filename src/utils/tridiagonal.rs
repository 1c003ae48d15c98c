//! Tridiagonal linear systems
//!
//! Used by the cubic spline to solve for knot curvatures.

/// Solve a tridiagonal system with the Thomas algorithm
///
/// Row `i` reads `lower[i] * x[i-1] + diag[i] * x[i] + upper[i] * x[i+1] = rhs[i]`;
/// `lower[0]` and `upper[n-1]` are ignored.
///
/// # Returns
/// The solution, or None if the slices disagree in length or a pivot
/// vanishes (the system is singular for this elimination order).
pub fn solve_tridiagonal(
    lower: &[f64],
    diag: &[f64],
    upper: &[f64],
    rhs: &[f64],
) -> Option<Vec<f64>> {
    let n = diag.len();
    if lower.len() != n || upper.len() != n || rhs.len() != n {
        return None;
    }
    if n == 0 {
        return Some(Vec::new());
    }

    // Forward sweep
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    if diag[0].abs() < 1e-300 {
        return None;
    }
    c_prime[0] = upper[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];

    for i in 1..n {
        let pivot = diag[i] - lower[i] * c_prime[i - 1];
        if pivot.abs() < 1e-300 {
            return None;
        }
        c_prime[i] = if i + 1 < n { upper[i] / pivot } else { 0.0 };
        d_prime[i] = (rhs[i] - lower[i] * d_prime[i - 1]) / pivot;
    }

    // Back substitution
    let mut x = d_prime;
    for i in (0..n - 1).rev() {
        x[i] -= c_prime[i] * x[i + 1];
    }
    Some(x)
}
