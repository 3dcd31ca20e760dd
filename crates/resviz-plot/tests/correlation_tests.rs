//! Tests for correlation maps and the underlying ensemble statistics.

use resviz_common::stats::{correlation_field, correlation_field_at, reference_series};
use resviz_common::{CoordMode, Ensemble, GridDescriptor, ResvizError};
use resviz_plot::figure::{ArtistKind, LineStyle, Marker};
use resviz_plot::{PlotConfig, Plotter};
use test_utils::{assert_approx_eq, create_random_ensemble, create_smooth_ensemble, fixtures};

fn grid_of(g: (usize, usize, f64, f64)) -> GridDescriptor {
    GridDescriptor::new(g.0, g.1, g.2, g.3)
}

fn plotter(g: (usize, usize, f64, f64), mode: CoordMode) -> Plotter {
    let config = PlotConfig {
        coord_mode: mode,
        dpi: 20,
        ..PlotConfig::default()
    };
    Plotter::new(grid_of(g), config).unwrap()
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_self_correlation_is_one() {
    for n_members in [2, 3, 10, 40] {
        let ensemble = Ensemble::from_members(&create_random_ensemble(n_members, 12, 7)).unwrap();
        let b = ensemble.column(5);
        let corrs = correlation_field(&ensemble, &b).unwrap();
        assert_approx_eq!(corrs[5], 1.0, 1e-12);
    }
}

#[test]
fn test_correlations_bounded() {
    let ensemble = Ensemble::from_members(&create_random_ensemble(25, 60, 3)).unwrap();
    for cell in [0, 17, 59] {
        let corrs = correlation_field(&ensemble, &ensemble.column(cell)).unwrap();
        assert_eq!(corrs.len(), 60);
        for c in corrs {
            assert!(c.is_finite());
            assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&c), "{}", c);
        }
    }
}

#[test]
fn test_constant_reference_gives_nan() {
    let ensemble = Ensemble::from_members(&create_random_ensemble(8, 20, 11)).unwrap();
    let corrs = correlation_field(&ensemble, &[0.5; 8]).unwrap();
    assert!(corrs.iter().all(|c| c.is_nan()));
}

#[test]
fn test_reference_length_checked() {
    let ensemble = Ensemble::from_members(&create_random_ensemble(8, 20, 11)).unwrap();
    assert!(matches!(
        correlation_field(&ensemble, &[0.0; 7]),
        Err(ResvizError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_smooth_neighbours_correlate() {
    let g = fixtures::grid::SQUARE;
    let grid = grid_of(g);
    let ensemble = Ensemble::from_members(&create_smooth_ensemble(g.0, g.1, 30, 5)).unwrap();
    let corrs = correlation_field_at(&ensemble, &grid, 0.5, 0.5).unwrap();
    let (index, _) = reference_series(&ensemble, &grid, 0.5, 0.5).unwrap();
    let (ix, iy) = grid.index_to_sub(index);
    let neighbour = grid.sub_to_index(ix + 1, iy);
    assert!(corrs[neighbour] > 0.5);
}

#[test]
fn test_reference_outside_grid() {
    let g = fixtures::grid::SMALL;
    let ensemble = Ensemble::from_members(&create_random_ensemble(4, g.0 * g.1, 1)).unwrap();
    assert!(matches!(
        correlation_field_at(&ensemble, &grid_of(g), 2.0, 0.5),
        Err(ResvizError::PointOutsideGrid { .. })
    ));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_corr_field_fixed_levels() {
    let g = fixtures::grid::SMALL;
    let p = plotter(g, CoordMode::Relative);
    let ensemble = Ensemble::from_members(&create_random_ensemble(10, g.0 * g.1, 2)).unwrap();
    let mut fig = p.figure(1, 1, None);
    let ax = fig.axes_mut(0).unwrap();
    let id = p.corr_field(ax, &ensemble, &ensemble.column(0), Some("ES")).unwrap();
    let ArtistKind::Contour(contour) = &ax.get(id).unwrap().kind else {
        panic!("expected contour");
    };
    assert_eq!(contour.levels.first(), Some(&-1.0));
    assert_eq!(contour.levels.last(), Some(&1.0));
    assert_eq!(ax.title.as_deref(), Some("ES"));
}

#[test]
fn test_degenerate_ensemble_renders_empty() {
    let g = fixtures::grid::SMALL;
    let p = plotter(g, CoordMode::Relative);
    let members = vec![vec![0.25; g.0 * g.1]; 6];
    let ensemble = Ensemble::from_members(&members).unwrap();
    let mut fig = p.figure(1, 1, None);
    let ax = fig.axes_mut(0).unwrap();
    let id = p.corr_field_vs(ax, &ensemble, (0.75, 0.5), None).unwrap();
    let ArtistKind::Contour(contour) = &ax.get(id).unwrap().kind else {
        panic!("expected contour");
    };
    assert_eq!(contour.polygon_count(), 0);
    // Still rasterizes
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_reference_star_in_plot_frame() {
    let g = fixtures::grid::RECTANGULAR;
    let ensemble = Ensemble::from_members(&create_random_ensemble(5, g.0 * g.1, 9)).unwrap();
    let cases = [
        (CoordMode::Relative, (0.25, 0.5)),
        (CoordMode::Absolute, (0.5, 0.5)),
        (CoordMode::Index, (5.0, 5.0)),
    ];
    for (mode, expected) in cases {
        let p = plotter(g, mode);
        let mut fig = p.figure(1, 1, None);
        let ax = fig.axes_mut(0).unwrap();
        p.corr_field_vs(ax, &ensemble, (0.5, 0.5), None).unwrap();
        let star = ax
            .artists()
            .iter()
            .find_map(|a| match &a.kind {
                ArtistKind::Line(l) if l.marker == Marker::Star => Some(l),
                _ => None,
            })
            .unwrap();
        assert_eq!(star.style, LineStyle::None);
        assert_approx_eq!(star.x[0], expected.0, 1e-12);
        assert_approx_eq!(star.y[0], expected.1, 1e-12);
    }
}
