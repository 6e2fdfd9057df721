//! Runtime selection of the output representation

use core::str::FromStr;

use super::coo::{CooBuilder, CooMatrix};
use super::svt::{SvtBuilder, SvtMatrix};
use crate::format::{Dimnames, MatrixMetadata, NonZeroEntry};
use crate::traits::{MatrixBuilder, SparseMatrix};
use crate::{Result, SpcountError};

/// Output representation tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Representation {
    Coo,
    #[default]
    Svt,
}

impl Representation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Representation::Coo => "coo",
            Representation::Svt => "svt",
        }
    }
}

impl FromStr for Representation {
    type Err = SpcountError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "coo" => Ok(Representation::Coo),
            "svt" => Ok(Representation::Svt),
            other => Err(SpcountError::InvalidArgument(format!(
                "unsupported representation {other:?}, expected \"coo\" or \"svt\""
            ))),
        }
    }
}

impl core::fmt::Display for Representation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder that can produce either representation
#[derive(Debug)]
pub enum DynamicBuilder {
    Coo(CooBuilder),
    Svt(SvtBuilder),
}

impl DynamicBuilder {
    pub fn new(representation: Representation) -> Self {
        match representation {
            Representation::Coo => DynamicBuilder::Coo(CooBuilder::new()),
            Representation::Svt => DynamicBuilder::Svt(SvtBuilder::new()),
        }
    }

    /// Enable or disable lacunar leaves; ignored for COO
    pub fn with_lacunar_leaves(self, enabled: bool) -> Self {
        match self {
            DynamicBuilder::Svt(b) => DynamicBuilder::Svt(b.with_lacunar_leaves(enabled)),
            coo => coo,
        }
    }

    pub fn representation(&self) -> Representation {
        match self {
            DynamicBuilder::Coo(_) => Representation::Coo,
            DynamicBuilder::Svt(_) => Representation::Svt,
        }
    }
}

impl MatrixBuilder for DynamicBuilder {
    type Output = DynamicMatrix;

    fn init(&mut self, metadata: MatrixMetadata) -> Result<()> {
        match self {
            DynamicBuilder::Coo(b) => b.init(metadata),
            DynamicBuilder::Svt(b) => b.init(metadata),
        }
    }

    fn add_entry(&mut self, entry: NonZeroEntry) -> Result<()> {
        match self {
            DynamicBuilder::Coo(b) => b.add_entry(entry),
            DynamicBuilder::Svt(b) => b.add_entry(entry),
        }
    }

    fn finalize(self) -> Result<DynamicMatrix> {
        match self {
            DynamicBuilder::Coo(b) => b.finalize().map(DynamicMatrix::Coo),
            DynamicBuilder::Svt(b) => b.finalize().map(DynamicMatrix::Svt),
        }
    }
}

/// A finalized count matrix in either representation
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicMatrix {
    Coo(CooMatrix),
    Svt(SvtMatrix<i32>),
}

impl DynamicMatrix {
    pub fn representation(&self) -> Representation {
        match self {
            DynamicMatrix::Coo(_) => Representation::Coo,
            DynamicMatrix::Svt(_) => Representation::Svt,
        }
    }

    pub fn nrow(&self) -> usize {
        match self {
            DynamicMatrix::Coo(m) => m.nrow(),
            DynamicMatrix::Svt(m) => m.nrow(),
        }
    }

    pub fn ncol(&self) -> usize {
        match self {
            DynamicMatrix::Coo(m) => m.ncol(),
            DynamicMatrix::Svt(m) => m.ncol(),
        }
    }

    /// Stored entries; for SVT this counts merged duplicates once
    pub fn nnz(&self) -> usize {
        match self {
            DynamicMatrix::Coo(m) => m.nnz(),
            DynamicMatrix::Svt(m) => m.nnz(),
        }
    }

    pub fn dimnames(&self) -> &Dimnames {
        match self {
            DynamicMatrix::Coo(m) => m.dimnames(),
            DynamicMatrix::Svt(m) => m.dimnames(),
        }
    }

    /// Value at a 0-based position
    pub fn get_element(&self, row: usize, col: usize) -> Option<i32> {
        match self {
            DynamicMatrix::Coo(m) => m.get_element(row, col),
            DynamicMatrix::Svt(m) => m.get_element(row, col),
        }
    }

    /// All 1-based entries; insertion order for COO, column-major for SVT
    pub fn entries(&self) -> Vec<NonZeroEntry> {
        match self {
            DynamicMatrix::Coo(m) => m.entries().collect(),
            DynamicMatrix::Svt(m) => m.entries().collect(),
        }
    }

    pub fn as_coo(&self) -> Option<&CooMatrix> {
        match self {
            DynamicMatrix::Coo(m) => Some(m),
            DynamicMatrix::Svt(_) => None,
        }
    }

    pub fn as_svt(&self) -> Option<&SvtMatrix<i32>> {
        match self {
            DynamicMatrix::Svt(m) => Some(m),
            DynamicMatrix::Coo(_) => None,
        }
    }

    pub fn into_svt(self) -> Option<SvtMatrix<i32>> {
        match self {
            DynamicMatrix::Svt(m) => Some(m),
            DynamicMatrix::Coo(_) => None,
        }
    }
}
