//! Utility modules for contour resampling
//!
//! This module contains low-level numeric helpers used by the interpolation
//! and stitching stages.

pub mod grid;
pub mod tridiagonal;

pub use grid::{arange, closed_grid, grid_len, GRID_TOLERANCE};
pub use tridiagonal::solve_tridiagonal;
