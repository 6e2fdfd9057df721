//! Host object shapes
//!
//! These structs mirror the objects a statistical host environment expects
//! for each representation. Field names follow the host's conventions and
//! exist only here; the rest of the crate uses its own types.

use serde::{Deserialize, Serialize};
use spcount_core::format::constants::SVT_FORMAT_VERSION;
use spcount_core::{
    CooMatrix, Dimnames, DynamicMatrix, MatrixElement, Result, SpcountError, SvtColumn,
    SvtMatrix,
};

/// `[row labels, column labels]`, each possibly null
pub type HostDimnames = [Option<Vec<String>>; 2];

fn host_dimnames(dimnames: &Dimnames) -> HostDimnames {
    [dimnames.rows.clone(), dimnames.cols.clone()]
}

/// Coordinate-list object: 1-based coordinate pairs plus values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooHost {
    /// `[row, col]` pairs in insertion order
    pub nzcoo: Vec<[u32; 2]>,
    pub nzdata: Vec<i32>,
    pub dim: [usize; 2],
    pub dimnames: HostDimnames,
}

impl From<&CooMatrix> for CooHost {
    fn from(matrix: &CooMatrix) -> Self {
        Self {
            nzcoo: matrix
                .rows()
                .iter()
                .zip(matrix.cols())
                .map(|(&r, &c)| [r, c])
                .collect(),
            nzdata: matrix.vals().to_vec(),
            dim: [matrix.nrow(), matrix.ncol()],
            dimnames: host_dimnames(matrix.dimnames()),
        }
    }
}

/// One non-empty SVT leaf: `[values, rows]`, values null when lacunar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvtLeaf<V>(pub Option<Vec<V>>, pub Vec<u32>);

/// Column-oriented object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvtHost<V> {
    /// Null when the matrix has no stored entries; otherwise one slot per
    /// column, null for empty columns
    #[serde(rename = "SVT")]
    pub svt: Option<Vec<Option<SvtLeaf<V>>>>,
    pub dim: [usize; 2],
    pub dimnames: HostDimnames,
    #[serde(rename = "type")]
    pub value_type: String,
    pub version: u32,
}

impl<V: MatrixElement> From<&SvtMatrix<V>> for SvtHost<V> {
    fn from(matrix: &SvtMatrix<V>) -> Self {
        let svt = (!matrix.is_all_empty()).then(|| {
            matrix
                .columns()
                .iter()
                .map(|column| match column {
                    SvtColumn::Empty => None,
                    SvtColumn::Explicit { rows, values } => {
                        Some(SvtLeaf(Some(values.clone()), rows.to_vec()))
                    }
                    SvtColumn::Lacunar { rows } => Some(SvtLeaf(None, rows.to_vec())),
                })
                .collect()
        });
        Self {
            svt,
            dim: [matrix.nrow(), matrix.ncol()],
            dimnames: host_dimnames(matrix.dimnames()),
            value_type: V::value_type().as_str().to_string(),
            version: SVT_FORMAT_VERSION,
        }
    }
}

impl<V: MatrixElement> SvtHost<V> {
    /// Rebuild the matrix, checking every structural invariant
    pub fn into_matrix(self) -> Result<SvtMatrix<V>> {
        if self.version != SVT_FORMAT_VERSION {
            return Err(SpcountError::InvalidArgument(format!(
                "unsupported SVT version {}",
                self.version
            )));
        }
        if self.value_type != V::value_type().as_str() {
            return Err(SpcountError::InvalidArgument(format!(
                "SVT holds {} values, expected {}",
                self.value_type,
                V::value_type()
            )));
        }
        let [nrow, ncol] = self.dim;
        let columns: Vec<SvtColumn<V>> = match self.svt {
            None => (0..ncol).map(|_| SvtColumn::Empty).collect(),
            Some(leaves) => leaves
                .into_iter()
                .map(|leaf| match leaf {
                    None => SvtColumn::Empty,
                    Some(SvtLeaf(None, rows)) => SvtColumn::Lacunar { rows: rows.into() },
                    Some(SvtLeaf(Some(values), rows)) => SvtColumn::Explicit {
                        rows: rows.into(),
                        values,
                    },
                })
                .collect(),
        };
        if columns.len() != ncol {
            return Err(SpcountError::Consistency {
                what: "SVT column count",
                expected: ncol,
                actual: columns.len(),
            });
        }
        let [rows, cols] = self.dimnames;
        SvtMatrix::from_columns(nrow, columns, Dimnames { rows, cols })
    }
}

/// Host object for a matrix in either representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostObject {
    Coo(CooHost),
    Svt(SvtHost<i32>),
}

impl From<&DynamicMatrix> for HostObject {
    fn from(matrix: &DynamicMatrix) -> Self {
        match matrix {
            DynamicMatrix::Coo(m) => HostObject::Coo(m.into()),
            DynamicMatrix::Svt(m) => HostObject::Svt(m.into()),
        }
    }
}

impl HostObject {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SpcountError::InvalidArgument(format!("failed to serialize: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SpcountError::InvalidArgument(format!("failed to serialize: {e}")))
    }
}
