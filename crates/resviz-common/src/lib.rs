//! Common types shared by the reservoir visualization crates.
//!
//! Grid metadata, coordinate modes, well tables, ensembles and the
//! ensemble statistics that feed the correlation maps.

pub mod coords;
pub mod ensemble;
pub mod error;
pub mod grid;
pub mod stats;
pub mod wells;

pub use coords::CoordMode;
pub use ensemble::{Ensemble, FieldData, ProductionSeries};
pub use error::{ResvizError, ResvizResult};
pub use grid::GridDescriptor;
pub use wells::{Well, WellTable};
