//! Test data generators for creating synthetic reservoir data.
//!
//! All fields are flat vectors in simulator order: cell `(ix, iy)` sits at
//! index `ix * ny + iy`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a field with predictable values.
///
/// Each cell value is `ix * 1000 + iy`, which makes orientation bugs
/// (missing or doubled transposes) easy to spot.
///
/// # Example
///
/// ```
/// use test_utils::create_index_field;
///
/// let field = create_index_field(3, 2);
/// assert_eq!(field.len(), 6);
/// assert_eq!(field[1], 1.0);    // ix=0, iy=1
/// assert_eq!(field[2], 1000.0); // ix=1, iy=0
/// ```
pub fn create_index_field(nx: usize, ny: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(nx * ny);
    for ix in 0..nx {
        for iy in 0..ny {
            data.push((ix * 1000 + iy) as f64);
        }
    }
    data
}

/// Creates a field filled with a constant value.
pub fn create_constant_field(nx: usize, ny: usize, value: f64) -> Vec<f64> {
    vec![value; nx * ny]
}

/// Water saturation of a radial front spreading from the lower-left corner.
///
/// `progress` runs from 0 (no water) to 1 (front past the far corner).
/// Values stay within `[0, 1]`.
pub fn create_saturation_field(nx: usize, ny: usize, progress: f64) -> Vec<f64> {
    let max_dist = 2f64.sqrt();
    let front = progress * max_dist * 1.2;
    let mut data = Vec::with_capacity(nx * ny);
    for ix in 0..nx {
        for iy in 0..ny {
            let x = (ix as f64 + 0.5) / nx as f64;
            let y = (iy as f64 + 0.5) / ny as f64;
            let dist = (x * x + y * y).sqrt();
            let s = 0.5 * (1.0 - ((dist - front) / 0.08).tanh());
            data.push(s.clamp(0.0, 1.0));
        }
    }
    data
}

/// Sequence of `n_steps` saturation fields for a waterflood.
pub fn create_waterflood(nx: usize, ny: usize, n_steps: usize) -> Vec<Vec<f64>> {
    (0..n_steps)
        .map(|t| {
            let progress = if n_steps > 1 {
                t as f64 / (n_steps - 1) as f64
            } else {
                0.0
            };
            create_saturation_field(nx, ny, progress)
        })
        .collect()
}

/// Water cut at each producer: rows are time steps, columns wells.
///
/// Each well breaks through later than the previous one.
pub fn create_production(n_steps: usize, n_wells: usize) -> Vec<Vec<f64>> {
    (0..n_steps)
        .map(|t| {
            let t = t as f64 / n_steps.max(1) as f64;
            (0..n_wells)
                .map(|w| {
                    let breakthrough = 0.3 + 0.15 * w as f64;
                    1.0 / (1.0 + (-(t - breakthrough) * 12.0).exp())
                })
                .collect()
        })
        .collect()
}

/// Random ensemble: `n_members` fields of `n_cells` uniform values.
pub fn create_random_ensemble(n_members: usize, n_cells: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_members)
        .map(|_| (0..n_cells).map(|_| rng.gen_range(0.0..1.0)).collect())
        .collect()
}

/// Ensemble with spatially correlated members.
///
/// Each member is a smooth random mixture of a few large-scale modes plus
/// a little noise, so neighbouring cells correlate strongly.
pub fn create_smooth_ensemble(nx: usize, ny: usize, n_members: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_members)
        .map(|_| {
            let a: f64 = rng.gen_range(-1.0..1.0);
            let b: f64 = rng.gen_range(-1.0..1.0);
            let c: f64 = rng.gen_range(-1.0..1.0);
            let mut field = Vec::with_capacity(nx * ny);
            for ix in 0..nx {
                for iy in 0..ny {
                    let x = (ix as f64 + 0.5) / nx as f64;
                    let y = (iy as f64 + 0.5) / ny as f64;
                    let v = a * (std::f64::consts::PI * x).cos()
                        + b * (std::f64::consts::PI * y).cos()
                        + c * x * y
                        + rng.gen_range(-0.05..0.05);
                    field.push(v);
                }
            }
            field
        })
        .collect()
}
