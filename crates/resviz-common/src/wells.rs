//! Injector and producer well tables.

use crate::{CoordMode, GridDescriptor};
use serde::{Deserialize, Serialize};

/// One well in absolute physical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Well {
    pub x: f64,
    pub y: f64,
    /// Injection or production rate
    #[serde(default)]
    pub rate: f64,
}

impl Well {
    pub fn new(x: f64, y: f64, rate: f64) -> Self {
        Self { x, y, rate }
    }
}

/// Ordered list of wells of one kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellTable {
    pub wells: Vec<Well>,
}

impl WellTable {
    pub fn new(wells: Vec<Well>) -> Self {
        Self { wells }
    }

    /// Build from `(x, y, rate)` rows.
    pub fn from_rows(rows: &[[f64; 3]]) -> Self {
        Self {
            wells: rows.iter().map(|r| Well::new(r[0], r[1], r[2])).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Well> {
        self.wells.iter()
    }

    /// Copy of this table with positions rescaled into `mode`'s frame.
    ///
    /// `self` is left untouched.
    pub fn scaled(&self, mode: CoordMode, grid: &GridDescriptor) -> WellTable {
        let (sx, sy) = mode.well_scale(grid);
        WellTable {
            wells: self
                .wells
                .iter()
                .map(|w| Well {
                    x: w.x * sx,
                    y: w.y * sy,
                    rate: w.rate,
                })
                .collect(),
        }
    }
}
