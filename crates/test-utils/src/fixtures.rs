//! Common test fixtures for resviz tests.
//!
//! Grids are `(nx, ny, lx, ly)` tuples and well tables are `(x, y, rate)`
//! rows so that this crate stays free of workspace dependencies.

/// Common grid definitions for testing.
pub mod grid {
    /// Tiny non-square grid, handy for checking orientation
    pub const SMALL: (usize, usize, f64, f64) = (6, 4, 1.5, 1.0);

    /// Unit square with 16x16 cells
    pub const SQUARE: (usize, usize, f64, f64) = (16, 16, 1.0, 1.0);

    /// Elongated grid with physical lengths different from cell counts
    pub const RECTANGULAR: (usize, usize, f64, f64) = (20, 10, 2.0, 1.0);

    /// Grid used by the demo waterflood
    pub const WATERFLOOD: (usize, usize, f64, f64) = (32, 24, 4.0, 3.0);
}

/// Well tables in absolute coordinates.
pub mod wells {
    /// Single injector near the lower-left corner
    pub const INJECTORS: [[f64; 3]; 1] = [[0.1, 0.1, 1.0]];

    /// Producers spread around the upper and right edges
    pub const PRODUCERS: [[f64; 3]; 3] = [[0.9, 0.9, -0.4], [0.9, 0.3, -0.3], [0.3, 0.9, -0.3]];

    /// Rescale unit-square well rows onto a domain of size `lx × ly`.
    pub fn on_domain(rows: &[[f64; 3]], lx: f64, ly: f64) -> Vec<[f64; 3]> {
        rows.iter().map(|r| [r[0] * lx, r[1] * ly, r[2]]).collect()
    }
}
