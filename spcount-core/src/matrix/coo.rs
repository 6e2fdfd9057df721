//! Coordinate-list representation
//!
//! Entries are kept in insertion order with their 1-based coordinates.
//! Duplicate coordinates are retained as separate entries.

use crate::format::{Dimnames, MatrixMetadata, NonZeroEntry};
use crate::traits::{BuilderState, MatrixBuilder, SparseMatrix};
use crate::validation::check_entry_bounds;
use crate::{Result, SpcountError};

/// Builder producing a [`CooMatrix`]
#[derive(Debug, Default)]
pub struct CooBuilder {
    state: BuilderState,
    metadata: MatrixMetadata,
    rows: Vec<u32>,
    cols: Vec<u32>,
    vals: Vec<i32>,
}

impl CooBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }
}

impl MatrixBuilder for CooBuilder {
    type Output = CooMatrix;

    fn init(&mut self, metadata: MatrixMetadata) -> Result<()> {
        metadata.validate()?;
        self.state.begin()?;
        self.rows.reserve(metadata.nval);
        self.cols.reserve(metadata.nval);
        self.vals.reserve(metadata.nval);
        self.metadata = metadata;
        Ok(())
    }

    fn add_entry(&mut self, entry: NonZeroEntry) -> Result<()> {
        self.state.require_initialized("add_entry called before init")?;
        check_entry_bounds(&entry, self.metadata.nrow, self.metadata.ncol)?;
        self.rows.push(entry.row);
        self.cols.push(entry.col);
        self.vals.push(entry.value);
        Ok(())
    }

    fn finalize(mut self) -> Result<CooMatrix> {
        self.state.require_initialized("finalize called before init")?;
        if self.vals.len() != self.metadata.nval {
            return Err(SpcountError::Consistency {
                what: "number of nonzero entries",
                expected: self.metadata.nval,
                actual: self.vals.len(),
            });
        }
        let dimnames = Dimnames::from_metadata(&mut self.metadata);
        Ok(CooMatrix {
            nrow: self.metadata.nrow,
            ncol: self.metadata.ncol,
            rows: self.rows,
            cols: self.cols,
            vals: self.vals,
            dimnames,
        })
    }
}

/// Finalized coordinate-list matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix {
    nrow: usize,
    ncol: usize,
    rows: Vec<u32>,
    cols: Vec<u32>,
    vals: Vec<i32>,
    dimnames: Dimnames,
}

impl CooMatrix {
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// 1-based row coordinates in insertion order
    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    /// 1-based column coordinates in insertion order
    pub fn cols(&self) -> &[u32] {
        &self.cols
    }

    pub fn vals(&self) -> &[i32] {
        &self.vals
    }

    pub fn dimnames(&self) -> &Dimnames {
        &self.dimnames
    }

    /// Iterate over the stored entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = NonZeroEntry> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.vals)
            .map(|((&row, &col), &value)| NonZeroEntry::new(row, col, value))
    }
}

impl SparseMatrix for CooMatrix {
    type Element = i32;

    /// Sum of all entries stored at the 0-based position, if any
    fn get_element(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.nrow || col >= self.ncol {
            return None;
        }
        let (row, col) = (row as u32 + 1, col as u32 + 1);
        self.entries()
            .filter(|e| e.row == row && e.col == col)
            .map(|e| e.value)
            .reduce(i32::saturating_add)
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.nrow, self.ncol)
    }

    fn nnz(&self) -> usize {
        self.vals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;

    fn build(metadata: MatrixMetadata, entries: &[(u32, u32, i32)]) -> Result<CooMatrix> {
        let mut builder = CooBuilder::new();
        builder.init(metadata)?;
        for &entry in entries {
            builder.add_entry(entry.into())?;
        }
        builder.finalize()
    }

    #[test]
    fn test_insertion_order_kept() {
        let matrix = build(
            MatrixMetadata::new(3, 2, 3),
            &[(3, 1, 5), (1, 2, 7), (2, 1, -1)],
        )
        .unwrap();
        assert_eq!(matrix.rows(), &[3, 1, 2]);
        assert_eq!(matrix.cols(), &[1, 2, 1]);
        assert_eq!(matrix.vals(), &[5, 7, -1]);
        assert_eq!(matrix.dimensions(), (3, 2));
        assert_eq!(matrix.nnz(), 3);
        assert!(matrix.dimnames().is_empty());
    }

    #[test]
    fn test_duplicates_retained() {
        let matrix = build(MatrixMetadata::new(2, 2, 2), &[(1, 1, 2), (1, 1, 3)]).unwrap();
        assert_eq!(matrix.nnz(), 2);
        assert_eq!(matrix.get_element(0, 0), Some(5));
        assert_eq!(matrix.get_element(1, 1), None);
        assert_eq!(matrix.get_element(5, 0), None);
    }

    #[test]
    fn test_bounds_rejected() {
        for bad in [(0, 1, 1), (4, 1, 1), (1, 0, 1), (1, 3, 1)] {
            let err = build(MatrixMetadata::new(3, 2, 1), &[bad]).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Bounds);
        }
    }

    #[test]
    fn test_count_mismatch() {
        let err = build(MatrixMetadata::new(3, 2, 2), &[(1, 1, 1)]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Consistency);
    }

    #[test]
    fn test_lifecycle_misuse() {
        let mut builder = CooBuilder::new();
        let err = builder.add_entry(NonZeroEntry::new(1, 1, 1)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Usage);

        builder.init(MatrixMetadata::new(1, 1, 0)).unwrap();
        let err = builder.init(MatrixMetadata::new(1, 1, 0)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Usage);

        let err = CooBuilder::new().finalize().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Usage);
    }

    #[test]
    fn test_labels_carried() {
        let metadata = MatrixMetadata::new(2, 1, 1)
            .with_row_names(vec!["g1".into(), "g2".into()])
            .with_col_names(vec!["cell".into()]);
        let matrix = build(metadata, &[(2, 1, 4)]).unwrap();
        assert_eq!(
            matrix.dimnames().rows.as_deref(),
            Some(&["g1".to_string(), "g2".to_string()][..])
        );
        assert_eq!(matrix.dimnames().cols.as_deref(), Some(&["cell".to_string()][..]));
    }
}
