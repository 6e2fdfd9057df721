//! Elementwise transforms over SVT nonzeros
//!
//! A transform maps every stored value `v` together with a per-entry scale
//! `m` to `f(v, m)`. The scale vector is ordered as the column-major
//! concatenation of the matrix's nonzeros. Lacunar entries contribute an
//! effective value of one and come out as explicit columns. Row index
//! sequences are shared with the input.

use crate::matrix::{SvtColumn, SvtMatrix};
use crate::traits::{MatrixElement, SparseMatrix};
use crate::{Result, SpcountError};

/// Built-in per-entry functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// `v * ln(v / m)`
    PoissonDeviance,
    /// `v^2 / m`
    PoissonDispersion,
}

impl Transform {
    pub fn apply<V: MatrixElement>(self, matrix: &SvtMatrix<V>, mu: &[f64]) -> Result<SvtMatrix<f64>> {
        match self {
            Transform::PoissonDeviance => svt_apply(matrix, mu, poisson_deviance),
            Transform::PoissonDispersion => svt_apply(matrix, mu, poisson_dispersion),
        }
    }
}

pub fn poisson_deviance(value: f64, mu: f64) -> f64 {
    value * (value / mu).ln()
}

pub fn poisson_dispersion(value: f64, mu: f64) -> f64 {
    value * value / mu
}

/// Apply `f(value, mu)` to every stored entry of `matrix`
///
/// Fails with a consistency error when `mu` does not hold exactly one scale
/// per stored entry.
pub fn svt_apply<V, F>(matrix: &SvtMatrix<V>, mu: &[f64], f: F) -> Result<SvtMatrix<f64>>
where
    V: MatrixElement,
    F: Fn(f64, f64) -> f64,
{
    let nnz = matrix.nnz();
    if mu.len() != nnz {
        return Err(SpcountError::Consistency {
            what: "scale vector length (number of nonzeros)",
            expected: nnz,
            actual: mu.len(),
        });
    }

    let mut offset = 0;
    let columns = matrix
        .columns()
        .iter()
        .map(|column| {
            let Some(rows) = column.rows() else {
                return SvtColumn::Empty;
            };
            let scales = &mu[offset..offset + rows.len()];
            offset += rows.len();
            let values = match column.values() {
                Some(values) => values
                    .iter()
                    .zip(scales)
                    .map(|(v, &m)| f(v.to_f64(), m))
                    .collect(),
                None => scales.iter().map(|&m| f(1.0, m)).collect(),
            };
            SvtColumn::Explicit {
                rows: rows.clone(),
                values,
            }
        })
        .collect();

    Ok(SvtMatrix::from_parts_unchecked(
        matrix.nrow(),
        columns,
        matrix.dimnames().clone(),
    ))
}
