//! Tests for the panel layout planner.

use resviz_common::ResvizError;
use resviz_plot::layout::{n_row_col, two_column};

// ============================================================================
// n_row_col
// ============================================================================

#[test]
fn test_grid_always_fits() {
    for ratio in [0.5, 1.0, 9.0 / 7.0, 2.0, 10.0] {
        for n in 1..=50 {
            let (nrows, ncols) = n_row_col(n, ratio).unwrap();
            assert!(nrows >= 1);
            assert!(nrows * ncols >= n, "n={} ratio={} -> {}x{}", n, ratio, nrows, ncols);
            // ncols is the smallest count that fits
            assert!(nrows * (ncols - 1) < n, "n={} ratio={}", n, ratio);
        }
    }
}

#[test]
fn test_perfect_square_exact() {
    assert_eq!(n_row_col(1, 1.0).unwrap(), (1, 1));
    assert_eq!(n_row_col(4, 1.0).unwrap(), (2, 2));
    assert_eq!(n_row_col(9, 1.0).unwrap(), (3, 3));
    assert_eq!(n_row_col(16, 1.0).unwrap(), (4, 4));
}

#[test]
fn test_default_aspect_ratio() {
    // 9x7 inch figure
    assert_eq!(n_row_col(12, 9.0 / 7.0).unwrap(), (2, 6));
    assert_eq!(n_row_col(7, 9.0 / 7.0).unwrap(), (2, 4));
}

#[test]
fn test_wide_ratio_small_n_keeps_one_row() {
    // floor(sqrt(2) / 10) == 0 without the guard
    assert_eq!(n_row_col(2, 10.0).unwrap(), (1, 2));
    assert_eq!(n_row_col(3, 4.0).unwrap(), (1, 3));
}

#[test]
fn test_zero_panels_rejected() {
    assert!(matches!(n_row_col(0, 1.0), Err(ResvizError::EmptyLayout)));
    assert!(matches!(two_column(0), Err(ResvizError::EmptyLayout)));
}

#[test]
fn test_bad_ratio_rejected() {
    assert!(matches!(n_row_col(4, 0.0), Err(ResvizError::InvalidConfig(_))));
    assert!(matches!(n_row_col(4, -1.0), Err(ResvizError::InvalidConfig(_))));
    assert!(n_row_col(4, f64::NAN).is_err());
}

// ============================================================================
// two_column
// ============================================================================

#[test]
fn test_two_column_rows() {
    assert_eq!(two_column(2).unwrap(), (1, 2));
    assert_eq!(two_column(3).unwrap(), (2, 2));
    assert_eq!(two_column(8).unwrap(), (4, 2));
}
