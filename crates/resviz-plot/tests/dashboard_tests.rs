//! Tests for the dashboard and its frame animator.

use resviz_common::{CoordMode, GridDescriptor, ProductionSeries, ResvizError, WellTable};
use resviz_plot::dashboard::{FIELD_AXES, INITIAL_AXES, PRODUCTION_AXES, RESERVED_AXES};
use resviz_plot::figure::ArtistKind;
use resviz_plot::{Dashboard, DashboardInput, DashboardOptions, PlotConfig, Plotter};
use std::time::Duration;
use test_utils::{create_production, create_waterflood, fixtures};

const N_STEPS: usize = 6;

struct Sim {
    saturation: Vec<Vec<f64>>,
    production: ProductionSeries,
    injectors: WellTable,
    producers: WellTable,
}

fn sim() -> Sim {
    let g = fixtures::grid::WATERFLOOD;
    Sim {
        saturation: create_waterflood(g.0, g.1, N_STEPS),
        production: ProductionSeries::from_steps(&create_production(N_STEPS, 3)).unwrap(),
        injectors: WellTable::from_rows(&fixtures::wells::on_domain(&fixtures::wells::INJECTORS, g.2, g.3)),
        producers: WellTable::from_rows(&fixtures::wells::on_domain(&fixtures::wells::PRODUCERS, g.2, g.3)),
    }
}

fn plotter(mode: CoordMode) -> Plotter {
    let g = fixtures::grid::WATERFLOOD;
    let config = PlotConfig {
        coord_mode: mode,
        dpi: 8,
        ..PlotConfig::default()
    };
    Plotter::new(GridDescriptor::new(g.0, g.1, g.2, g.3), config).unwrap()
}

fn input(sim: &Sim) -> DashboardInput<'_> {
    DashboardInput {
        saturation: &sim.saturation,
        production: &sim.production,
        injectors: &sim.injectors,
        producers: &sim.producers,
    }
}

fn animated<'a>(p: &Plotter, sim: &'a Sim) -> Dashboard<'a> {
    let opts = DashboardOptions {
        animate: true,
        ..DashboardOptions::default()
    };
    p.dashboard(input(sim), &opts).unwrap()
}

// ============================================================================
// Static composition
// ============================================================================

#[test]
fn test_dashboard_layout() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let dash = p
        .dashboard(input(&sim), &DashboardOptions { title: Some("Run".into()), ..Default::default() })
        .unwrap();
    let fig = &dash.figure;

    assert_eq!(fig.shape(), (2, 2));
    assert_eq!(fig.figsize, (12.0, 10.0));
    assert_eq!(fig.axes(INITIAL_AXES).unwrap().title.as_deref(), Some("Oil saturation (Initial)"));
    assert_eq!(fig.axes(INITIAL_AXES).unwrap().ylabel.as_deref(), Some("y (relative)"));
    assert_eq!(fig.axes(FIELD_AXES).unwrap().title.as_deref(), Some("Oil saturation"));
    assert_eq!(fig.axes(PRODUCTION_AXES).unwrap().title.as_deref(), Some("Saturation (production)"));
    assert!(!fig.axes(RESERVED_AXES).unwrap().visible);
    assert_eq!(fig.suptitle.as_deref(), Some("Run"));
    assert_eq!(fig.colorbar.as_ref().unwrap().source, dash.initial_field);
    assert!(dash.animation.is_none());
}

#[test]
fn test_wells_drawn_on_field_panel() {
    let sim = sim();
    let p = plotter(CoordMode::Index);
    let dash = p.dashboard(input(&sim), &DashboardOptions::default()).unwrap();
    let ax = dash.figure.axes(FIELD_AXES).unwrap();
    let scatters = ax
        .artists()
        .iter()
        .filter(|a| matches!(a.kind, ArtistKind::Scatter(_)))
        .count();
    assert_eq!(scatters, 2);
    assert_eq!(ax.contour_count(), 1);
    assert_eq!(dash.figure.axes(INITIAL_AXES).unwrap().ylabel.as_deref(), Some("y (index)"));
}

#[test]
fn test_production_legend_title() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let dash = p.dashboard(input(&sim), &DashboardOptions::default()).unwrap();
    let ax = dash.figure.axes(PRODUCTION_AXES).unwrap();
    assert_eq!(ax.legend.as_ref().unwrap().title.as_deref(), Some("Well num."));
    assert_eq!(dash.production_lines.len(), 3);
}

#[test]
fn test_empty_saturation_rejected() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let mut inp = input(&sim);
    inp.saturation = &[];
    assert!(matches!(
        p.dashboard(inp, &DashboardOptions::default()),
        Err(ResvizError::FrameOutOfRange { .. })
    ));
}

// ============================================================================
// Animation
// ============================================================================

#[test]
fn test_animation_metadata() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let dash = animated(&p, &sim);
    let anim = dash.animation.as_ref().unwrap();
    assert_eq!(anim.n_frames(), N_STEPS);
    assert_eq!(anim.interval(), Duration::from_millis(200));

    let custom = p
        .dashboard(
            input(&sim),
            &DashboardOptions {
                animate: true,
                interval: Some(Duration::from_millis(50)),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(custom.animation.unwrap().interval(), Duration::from_millis(50));
}

#[test]
fn test_repeated_update_leaves_one_contour() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let mut dash = animated(&p, &sim);
    let anim = dash.animation.as_mut().unwrap();

    let first = anim.update(&mut dash.figure, 3).unwrap();
    let second = anim.update(&mut dash.figure, 3).unwrap();
    assert_ne!(first, second);

    let ax = dash.figure.axes(FIELD_AXES).unwrap();
    assert_eq!(ax.contour_count(), 1);
    assert!(ax.get(second.field).is_some());
    assert!(ax.get(first.field).is_none());
}

#[test]
fn test_every_frame_leaves_one_contour() {
    let sim = sim();
    let p = plotter(CoordMode::Absolute);
    let mut dash = animated(&p, &sim);
    let anim = dash.animation.as_mut().unwrap();
    for i_t in 0..N_STEPS {
        anim.update(&mut dash.figure, i_t).unwrap();
        assert_eq!(dash.figure.axes(FIELD_AXES).unwrap().contour_count(), 1);
        // The initial panel is never touched
        assert_eq!(dash.figure.axes(INITIAL_AXES).unwrap().contour_count(), 1);
    }
}

#[test]
fn test_already_removed_contour_tolerated() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let mut dash = animated(&p, &sim);
    let anim = dash.animation.as_mut().unwrap();

    let state = anim.state();
    dash.figure.axes_mut(FIELD_AXES).unwrap().remove(state.field).unwrap();
    let next = anim.step(&mut dash.figure, state, 2).unwrap();
    let ax = dash.figure.axes(FIELD_AXES).unwrap();
    assert_eq!(ax.contour_count(), 1);
    assert!(ax.get(next.field).is_some());
}

#[test]
fn test_replaying_from_same_state_leaves_one_contour() {
    let sim = sim();
    let p = plotter(CoordMode::Index);
    let mut dash = animated(&p, &sim);
    let anim = dash.animation.as_mut().unwrap();

    let start = anim.state();
    anim.step(&mut dash.figure, start, 3).unwrap();
    let last = anim.step(&mut dash.figure, start, 3).unwrap();

    let ax = dash.figure.axes(FIELD_AXES).unwrap();
    assert_eq!(ax.contour_count(), 1);
    assert_eq!(ax.contour_ids(), vec![last.field]);
    assert_eq!(dash.figure.axes(INITIAL_AXES).unwrap().contour_count(), 1);
}

#[test]
fn test_stale_state_after_updates_leaves_one_contour() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let mut dash = animated(&p, &sim);
    let anim = dash.animation.as_mut().unwrap();

    let stale = anim.state();
    anim.update(&mut dash.figure, 1).unwrap();
    anim.update(&mut dash.figure, 2).unwrap();
    let next = anim.step(&mut dash.figure, stale, 4).unwrap();

    let ax = dash.figure.axes(FIELD_AXES).unwrap();
    assert_eq!(ax.contour_ids(), vec![next.field]);
}

#[test]
fn test_production_lines_truncated() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let mut dash = animated(&p, &sim);
    let lines = dash.production_lines.clone();
    let anim = dash.animation.as_mut().unwrap();

    anim.update(&mut dash.figure, 4).unwrap();
    let ax = dash.figure.axes(PRODUCTION_AXES).unwrap();
    for (well, h) in lines.iter().enumerate() {
        let line = ax.line(*h).unwrap();
        assert_eq!(line.len(), 3);
        assert_eq!(line.x, vec![1.0, 2.0, 3.0]);
        assert_eq!(line.y, sim.production.oil(well)[..3].to_vec());
    }

    anim.update(&mut dash.figure, 1).unwrap();
    let ax = dash.figure.axes(PRODUCTION_AXES).unwrap();
    assert!(ax.line(lines[0]).unwrap().is_empty());
}

#[test]
fn test_frame_zero_keeps_full_curves() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let mut dash = animated(&p, &sim);
    let lines = dash.production_lines.clone();
    let anim = dash.animation.as_mut().unwrap();

    anim.update(&mut dash.figure, 0).unwrap();
    let ax = dash.figure.axes(PRODUCTION_AXES).unwrap();
    assert_eq!(ax.line(lines[0]).unwrap().len(), N_STEPS);
}

#[test]
fn test_frame_out_of_range() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let mut dash = animated(&p, &sim);
    let anim = dash.animation.as_mut().unwrap();
    let err = anim.update(&mut dash.figure, N_STEPS).unwrap_err();
    assert!(matches!(err, ResvizError::FrameOutOfRange { frame: N_STEPS, len: N_STEPS }));
}

#[test]
fn test_render_frames_emits_png_per_frame() {
    let sim = sim();
    let p = plotter(CoordMode::Relative);
    let mut dash = animated(&p, &sim);
    let anim = dash.animation.as_mut().unwrap();

    let mut seen = Vec::new();
    let n = anim
        .render_frames(&mut dash.figure, |i, png| {
            assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
            seen.push(i);
            Ok(())
        })
        .unwrap();
    assert_eq!(n, N_STEPS);
    assert_eq!(seen, (0..N_STEPS).collect::<Vec<_>>());
    assert_eq!(dash.figure.axes(FIELD_AXES).unwrap().contour_count(), 1);
}
