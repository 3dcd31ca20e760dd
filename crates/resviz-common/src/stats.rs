//! Ensemble statistics: the correlation field between one reference
//! series and every grid cell.

use crate::{Ensemble, GridDescriptor, ResvizError, ResvizResult};
use nalgebra::{DMatrix, DVector};

/// Subtract the column means of `e`.
pub fn center(e: &DMatrix<f64>) -> DMatrix<f64> {
    let mut centered = e.clone();
    for mut col in centered.column_iter_mut() {
        let mean = col.mean();
        col.add_scalar_mut(-mean);
    }
    centered
}

/// Pearson correlation of `b` against every column of `ensemble`.
///
/// Uses sample (co)variances with `N - 1` normalisation. A constant
/// reference series or a constant column yields NaN for the affected
/// cells; these values are returned as-is rather than raised.
pub fn correlation_field(ensemble: &Ensemble, b: &[f64]) -> ResvizResult<Vec<f64>> {
    let n = ensemble.n_members();
    if b.len() != n {
        return Err(ResvizError::shape_mismatch("reference series", n, b.len()));
    }

    let a = center(ensemble.matrix());
    let b = center(&DMatrix::from_column_slice(n, 1, b));
    let b = DVector::from_column_slice(b.as_slice());
    let dof = n as f64 - 1.0;

    let covs = a.tr_mul(&b) / dof;
    let var_b = b.norm_squared() / dof;

    if var_b == 0.0 {
        tracing::warn!(members = n, "reference series has zero variance");
    }

    let corrs: Vec<f64> = a
        .column_iter()
        .zip(covs.iter())
        .map(|(col, cov)| {
            let var_a = col.norm_squared() / dof;
            cov / var_b.sqrt() / var_a.sqrt()
        })
        .collect();

    tracing::debug!(
        members = n,
        cells = corrs.len(),
        finite = corrs.iter().filter(|c| c.is_finite()).count(),
        "computed correlation field"
    );

    Ok(corrs)
}

/// Reference series at the cell containing physical point `(x, y)`.
///
/// Returns the flat cell index together with the column values.
pub fn reference_series(
    ensemble: &Ensemble,
    grid: &GridDescriptor,
    x: f64,
    y: f64,
) -> ResvizResult<(usize, Vec<f64>)> {
    if ensemble.n_cells() != grid.len() {
        return Err(ResvizError::shape_mismatch(
            "ensemble columns",
            grid.len(),
            ensemble.n_cells(),
        ));
    }
    let index = grid.xy_to_index(x, y)?;
    Ok((index, ensemble.column(index)))
}

/// Correlation field against the series found at physical point `(x, y)`.
pub fn correlation_field_at(
    ensemble: &Ensemble,
    grid: &GridDescriptor,
    x: f64,
    y: f64,
) -> ResvizResult<Vec<f64>> {
    let (_, b) = reference_series(ensemble, grid, x, y)?;
    correlation_field(ensemble, &b)
}
