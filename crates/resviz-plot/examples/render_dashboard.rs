//! Render a synthetic waterflood dashboard and its animation frames.
//!
//! Usage:
//!   cargo run --package resviz-plot --example render_dashboard -- --out /tmp/resviz

use anyhow::{Context, Result};
use clap::Parser;
use resviz_common::{CoordMode, GridDescriptor, ProductionSeries, WellTable};
use resviz_plot::{DashboardInput, DashboardOptions, PlotConfig, Plotter};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "render_dashboard")]
#[command(about = "Render a waterflood dashboard to PNG files")]
struct Args {
    /// Output directory
    #[arg(short, long, default_value = "dashboard-out")]
    out: PathBuf,

    /// Cells along x
    #[arg(long, default_value = "32")]
    nx: usize,

    /// Cells along y
    #[arg(long, default_value = "24")]
    ny: usize,

    /// Number of time steps
    #[arg(long, default_value = "10")]
    steps: usize,

    /// Coordinate mode (relative, absolute, index)
    #[arg(long, env = "RESVIZ_COORD_MODE")]
    coord_mode: Option<CoordMode>,

    /// Pixels per inch
    #[arg(long)]
    dpi: Option<u32>,

    /// Plot configuration file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the animation frames
    #[arg(long)]
    no_frames: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => PlotConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PlotConfig::from_env(),
    };
    if let Some(mode) = args.coord_mode {
        config.coord_mode = mode;
    }
    if let Some(dpi) = args.dpi {
        config.dpi = dpi;
    }

    let (lx, ly) = (4.0, 3.0);
    let grid = GridDescriptor::new(args.nx, args.ny, lx, ly);
    let plotter = Plotter::new(grid, config)?;

    let saturation = test_utils::create_waterflood(args.nx, args.ny, args.steps);
    let production = ProductionSeries::from_steps(&test_utils::create_production(args.steps, 3))?;
    let injectors = WellTable::from_rows(&test_utils::wells::on_domain(&test_utils::wells::INJECTORS, lx, ly));
    let producers = WellTable::from_rows(&test_utils::wells::on_domain(&test_utils::wells::PRODUCERS, lx, ly));

    let input = DashboardInput {
        saturation: &saturation,
        production: &production,
        injectors: &injectors,
        producers: &producers,
    };
    let opts = DashboardOptions {
        title: Some(format!("Waterflood {}x{}", args.nx, args.ny)),
        animate: !args.no_frames,
        interval: None,
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    let mut dashboard = plotter.dashboard(input, &opts)?;
    let path = args.out.join("dashboard.png");
    std::fs::write(&path, dashboard.figure.to_png()?)?;
    info!(path = %path.display(), "Wrote dashboard");

    if let Some(mut animation) = dashboard.animation.take() {
        let out = args.out.clone();
        let frames = animation.render_frames(&mut dashboard.figure, |i_t, png| {
            std::fs::write(out.join(format!("frame_{:03}.png", i_t)), png)?;
            Ok(())
        })?;
        info!(
            frames,
            interval_ms = animation.interval().as_millis() as u64,
            "Wrote animation frames"
        );
    }

    Ok(())
}
