//! Panel grid layout.

use resviz_common::{ResvizError, ResvizResult};

/// Rows and columns for `n` panels on a figure of width/height ratio
/// `wh_ratio`: `nrows = floor(sqrt(n) / wh_ratio)` (at least 1) and
/// `ncols = ceil(n / nrows)`.
pub fn n_row_col(n: usize, wh_ratio: f64) -> ResvizResult<(usize, usize)> {
    if n == 0 {
        return Err(ResvizError::EmptyLayout);
    }
    if !(wh_ratio.is_finite() && wh_ratio > 0.0) {
        return Err(ResvizError::invalid_config(format!(
            "aspect ratio must be positive, got {}",
            wh_ratio
        )));
    }
    let nrows = ((n as f64).sqrt() / wh_ratio).floor().max(1.0) as usize;
    let ncols = n.div_ceil(nrows);
    Ok((nrows, ncols))
}

/// Two columns and as many rows as needed.
pub fn two_column(n: usize) -> ResvizResult<(usize, usize)> {
    if n == 0 {
        return Err(ResvizError::EmptyLayout);
    }
    Ok((n.div_ceil(2), 2))
}
