//! Field ensembles and production series.

use crate::{ResvizError, ResvizResult};
use nalgebra::DMatrix;

/// Ensemble of fields: rows are members, columns are grid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    members: DMatrix<f64>,
}

impl Ensemble {
    pub fn from_matrix(members: DMatrix<f64>) -> Self {
        Self { members }
    }

    /// Build from one flat field per member; all members must share a length.
    pub fn from_members(members: &[Vec<f64>]) -> ResvizResult<Self> {
        let n_cells = members.first().map(|m| m.len()).unwrap_or(0);
        for member in members {
            if member.len() != n_cells {
                return Err(ResvizError::shape_mismatch(
                    "ensemble member",
                    n_cells,
                    member.len(),
                ));
            }
        }
        let flat: Vec<f64> = members.iter().flatten().copied().collect();
        Ok(Self {
            members: DMatrix::from_row_slice(members.len(), n_cells, &flat),
        })
    }

    pub fn n_members(&self) -> usize {
        self.members.nrows()
    }

    pub fn n_cells(&self) -> usize {
        self.members.ncols()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.members
    }

    /// Values of one grid cell across all members.
    pub fn column(&self, cell: usize) -> Vec<f64> {
        self.members.column(cell).iter().copied().collect()
    }

    /// Member-wise mean field.
    pub fn mean_field(&self) -> Vec<f64> {
        let n = self.n_members().max(1) as f64;
        self.members
            .column_iter()
            .map(|col| col.sum() / n)
            .collect()
    }
}

/// A single field or an ensemble of them.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    Field(Vec<f64>),
    Ensemble(Ensemble),
}

impl FieldData {
    /// The field itself, or the ensemble mean.
    pub fn mean_field(&self) -> Vec<f64> {
        match self {
            Self::Field(field) => field.clone(),
            Self::Ensemble(ensemble) => ensemble.mean_field(),
        }
    }

    pub fn as_ensemble(&self) -> Option<&Ensemble> {
        match self {
            Self::Field(_) => None,
            Self::Ensemble(ensemble) => Some(ensemble),
        }
    }
}

impl From<Vec<f64>> for FieldData {
    fn from(field: Vec<f64>) -> Self {
        Self::Field(field)
    }
}

impl From<Ensemble> for FieldData {
    fn from(ensemble: Ensemble) -> Self {
        Self::Ensemble(ensemble)
    }
}

/// Fractional water saturation at each producer over time.
///
/// Rows are time steps, columns are producing wells.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionSeries {
    data: DMatrix<f64>,
}

impl ProductionSeries {
    pub fn from_matrix(data: DMatrix<f64>) -> Self {
        Self { data }
    }

    /// Build from one row of well values per time step.
    pub fn from_steps(steps: &[Vec<f64>]) -> ResvizResult<Self> {
        let n_wells = steps.first().map(|s| s.len()).unwrap_or(0);
        for step in steps {
            if step.len() != n_wells {
                return Err(ResvizError::shape_mismatch("production step", n_wells, step.len()));
            }
        }
        let flat: Vec<f64> = steps.iter().flatten().copied().collect();
        Ok(Self {
            data: DMatrix::from_row_slice(steps.len(), n_wells, &flat),
        })
    }

    pub fn n_steps(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_wells(&self) -> usize {
        self.data.ncols()
    }

    /// Time series of one well.
    pub fn well(&self, index: usize) -> Vec<f64> {
        self.data.column(index).iter().copied().collect()
    }

    /// Oil fraction `1 - s` of one well over time.
    pub fn oil(&self, index: usize) -> Vec<f64> {
        self.data.column(index).iter().map(|s| 1.0 - s).collect()
    }
}
