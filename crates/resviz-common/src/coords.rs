//! Coordinate modes shared by field axes and well markers.
//!
//! The same mode must drive both [`CoordMode::extents`] (axis limits) and
//! [`CoordMode::well_scale`] (well rescaling), otherwise wells drift off the
//! field they sit on.

use crate::{GridDescriptor, ResvizError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Frame in which plot axes and well positions are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordMode {
    /// Domain scaled to the unit square
    #[default]
    Relative,
    /// Physical `lx × ly`
    Absolute,
    /// Cell counts `nx × ny`
    Index,
}

impl CoordMode {
    /// Axis extent `(x, y)` used for plot limits.
    pub fn extents(&self, grid: &GridDescriptor) -> (f64, f64) {
        match self {
            Self::Relative => (1.0, 1.0),
            Self::Absolute => (grid.lx, grid.ly),
            Self::Index => (grid.nx as f64, grid.ny as f64),
        }
    }

    /// Factors taking absolute well coordinates into this frame.
    pub fn well_scale(&self, grid: &GridDescriptor) -> (f64, f64) {
        match self {
            Self::Relative => (1.0 / grid.lx, 1.0 / grid.ly),
            Self::Absolute => (1.0, 1.0),
            Self::Index => (grid.nx as f64 / grid.lx, grid.ny as f64 / grid.ly),
        }
    }

    /// Rescale one absolute point into this frame.
    pub fn scale_point(&self, grid: &GridDescriptor, x: f64, y: f64) -> (f64, f64) {
        let (sx, sy) = self.well_scale(grid);
        (x * sx, y * sy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for CoordMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordMode {
    type Err = ResvizError;

    /// Accepts any string starting with `rel`, `abs` or `ind`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s.starts_with("rel") {
            Ok(Self::Relative)
        } else if s.starts_with("abs") {
            Ok(Self::Absolute)
        } else if s.starts_with("ind") {
            Ok(Self::Index)
        } else {
            Err(ResvizError::invalid_config(format!("unknown coordinate mode '{}'", s)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixes() {
        assert_eq!("relative".parse::<CoordMode>().unwrap(), CoordMode::Relative);
        assert_eq!("abs".parse::<CoordMode>().unwrap(), CoordMode::Absolute);
        assert_eq!("Indices".parse::<CoordMode>().unwrap(), CoordMode::Index);
        assert!("polar".parse::<CoordMode>().is_err());
    }

    #[test]
    fn test_extents() {
        let grid = GridDescriptor::new(20, 10, 2.0, 1.0);
        assert_eq!(CoordMode::Relative.extents(&grid), (1.0, 1.0));
        assert_eq!(CoordMode::Absolute.extents(&grid), (2.0, 1.0));
        assert_eq!(CoordMode::Index.extents(&grid), (20.0, 10.0));
    }
}
