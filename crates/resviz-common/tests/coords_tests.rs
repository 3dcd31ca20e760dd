//! Tests for grid indexing, coordinate modes and ensemble statistics.

use resviz_common::stats::{correlation_field, correlation_field_at, reference_series};
use resviz_common::{CoordMode, Ensemble, GridDescriptor, ProductionSeries, ResvizError, WellTable};
use test_utils::{assert_approx_eq, assert_coords_approx_eq, create_index_field, create_smooth_ensemble, fixtures};

fn grid_from((nx, ny, lx, ly): (usize, usize, f64, f64)) -> GridDescriptor {
    GridDescriptor::new(nx, ny, lx, ly)
}

const MODES: [CoordMode; 3] = [CoordMode::Relative, CoordMode::Absolute, CoordMode::Index];

// ============================================================================
// Grid indexing
// ============================================================================

#[test]
fn test_index_field_matches_sub_to_index() {
    let grid = grid_from(fixtures::grid::SMALL);
    let field = create_index_field(grid.nx, grid.ny);
    for ix in 0..grid.nx {
        for iy in 0..grid.ny {
            assert_eq!(field[grid.sub_to_index(ix, iy)], (ix * 1000 + iy) as f64);
        }
    }
}

#[test]
fn test_cell_centers_map_back_to_their_cell() {
    let grid = grid_from(fixtures::grid::RECTANGULAR);
    for ix in 0..grid.nx {
        for iy in 0..grid.ny {
            let (x, y) = grid.cell_center(ix, iy);
            assert_eq!(grid.xy_to_sub(x, y).unwrap(), (ix, iy));
        }
    }
}

#[test]
fn test_far_boundary_belongs_to_last_cell() {
    let grid = grid_from(fixtures::grid::SMALL);
    assert_eq!(grid.xy_to_sub(grid.lx, grid.ly).unwrap(), (grid.nx - 1, grid.ny - 1));
    assert_eq!(grid.xy_to_sub(0.0, 0.0).unwrap(), (0, 0));
}

#[test]
fn test_points_outside_are_rejected() {
    let grid = grid_from(fixtures::grid::SQUARE);
    for (x, y) in [(-0.01, 0.5), (0.5, 1.01), (f64::NAN, 0.5)] {
        assert!(matches!(
            grid.xy_to_index(x, y),
            Err(ResvizError::PointOutsideGrid { .. })
        ));
    }
}

#[test]
fn test_check_field_length() {
    let grid = grid_from(fixtures::grid::SMALL);
    assert!(grid.check_field(&vec![0.0; 24], "field").is_ok());
    assert!(matches!(
        grid.check_field(&[0.0; 5], "field"),
        Err(ResvizError::ShapeMismatch { .. })
    ));
}

// ============================================================================
// Coordinate modes
// ============================================================================

#[test]
fn test_extents_per_mode() {
    let grid = grid_from(fixtures::grid::RECTANGULAR);
    assert_eq!(CoordMode::Relative.extents(&grid), (1.0, 1.0));
    assert_eq!(CoordMode::Absolute.extents(&grid), (2.0, 1.0));
    assert_eq!(CoordMode::Index.extents(&grid), (20.0, 10.0));
}

#[test]
fn test_domain_corner_maps_to_extent_corner() {
    for fixture in [fixtures::grid::SMALL, fixtures::grid::SQUARE, fixtures::grid::RECTANGULAR] {
        let grid = grid_from(fixture);
        for mode in MODES {
            let corner = mode.scale_point(&grid, grid.lx, grid.ly);
            let ext = mode.extents(&grid);
            assert_coords_approx_eq!((corner.0, corner.1), (ext.0, ext.1), 1e-12);
        }
    }
}

#[test]
fn test_scaled_wells_stay_on_their_cell() {
    let grid = grid_from(fixtures::grid::WATERFLOOD);
    let table = WellTable::from_rows(&fixtures::wells::on_domain(
        &fixtures::wells::PRODUCERS,
        grid.lx,
        grid.ly,
    ));

    for mode in MODES {
        let (ex, ey) = mode.extents(&grid);
        let scaled = table.scaled(mode, &grid);
        for (orig, well) in table.iter().zip(scaled.iter()) {
            assert_approx_eq!(well.x / ex, orig.x / grid.lx, 1e-12);
            assert_approx_eq!(well.y / ey, orig.y / grid.ly, 1e-12);
            assert_eq!(well.rate, orig.rate);
        }
    }
}

#[test]
fn test_mode_parsing_accepts_prefixes() {
    assert_eq!("rel".parse::<CoordMode>().unwrap(), CoordMode::Relative);
    assert_eq!("Absolute".parse::<CoordMode>().unwrap(), CoordMode::Absolute);
    assert_eq!(" index ".parse::<CoordMode>().unwrap(), CoordMode::Index);
    assert!("meters".parse::<CoordMode>().is_err());
}

#[test]
fn test_mode_serde_roundtrip_names() {
    let json = serde_json::to_string(&CoordMode::Index).unwrap();
    assert_eq!(json, "\"index\"");
    assert_eq!(CoordMode::Relative.to_string(), "relative");
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_reference_series_picks_containing_cell() {
    let grid = grid_from(fixtures::grid::SMALL);
    let members = create_smooth_ensemble(grid.nx, grid.ny, 6, 3);
    let ensemble = Ensemble::from_members(&members).unwrap();

    let (x, y) = grid.cell_center(2, 1);
    let (index, series) = reference_series(&ensemble, &grid, x, y).unwrap();
    assert_eq!(index, grid.sub_to_index(2, 1));
    assert_eq!(series.len(), 6);
    assert_eq!(series[4], members[4][index]);
}

#[test]
fn test_correlation_at_reference_cell_is_one() {
    let grid = grid_from(fixtures::grid::SQUARE);
    let ensemble = Ensemble::from_members(&create_smooth_ensemble(grid.nx, grid.ny, 12, 7)).unwrap();

    let (x, y) = grid.cell_center(5, 9);
    let corrs = correlation_field_at(&ensemble, &grid, x, y).unwrap();
    assert_approx_eq!(corrs[grid.sub_to_index(5, 9)], 1.0, 1e-9);
    assert!(corrs.iter().all(|c| c.abs() <= 1.0 + 1e-9));
}

#[test]
fn test_correlation_is_scale_invariant() {
    let ensemble = Ensemble::from_members(&[vec![1.0, 4.0], vec![2.0, 1.0], vec![4.0, 2.0]]).unwrap();
    let b = [0.3, 0.1, 0.9];
    let scaled: Vec<f64> = b.iter().map(|v| v * 100.0 + 5.0).collect();

    let a = correlation_field(&ensemble, &b).unwrap();
    let c = correlation_field(&ensemble, &scaled).unwrap();
    for (a, c) in a.iter().zip(&c) {
        assert_approx_eq!(*a, *c, 1e-12);
    }
}

#[test]
fn test_ensemble_grid_mismatch() {
    let grid = grid_from(fixtures::grid::SMALL);
    let ensemble = Ensemble::from_members(&[vec![0.0; 10], vec![1.0; 10]]).unwrap();
    assert!(reference_series(&ensemble, &grid, 0.1, 0.1).is_err());
}

#[test]
fn test_production_series_accessors() {
    let series = ProductionSeries::from_steps(&[vec![0.0, 0.1], vec![0.2, 0.5], vec![0.4, 1.0]]).unwrap();
    assert_eq!(series.n_steps(), 3);
    assert_eq!(series.n_wells(), 2);
    assert_eq!(series.well(1), vec![0.1, 0.5, 1.0]);
    for (oil, expected) in series.oil(0).iter().zip([1.0, 0.8, 0.6]) {
        assert_approx_eq!(*oil, expected, 1e-12);
    }
    assert!(ProductionSeries::from_steps(&[vec![0.0, 0.1], vec![0.2]]).is_err());
}
