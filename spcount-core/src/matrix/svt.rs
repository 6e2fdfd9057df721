//! Sparse vector tree representation
//!
//! An SVT matrix is a sequence of column slots. Each slot is empty, holds
//! parallel row/value vectors, or is *lacunar*: only row indices are stored
//! and every value is implicitly one. Row indices are 0-based and strictly
//! ascending within a column.

use std::sync::Arc;

use crate::format::{Dimnames, MatrixMetadata, NonZeroEntry};
use crate::normalize::{NormalizeStats, SvtNormalizer};
use crate::traits::{BuilderState, MatrixBuilder, MatrixElement, MatrixOperations, SparseMatrix};
use crate::validation::check_entry_bounds;
use crate::{Result, SpcountError};

/// One column slot of an [`SvtMatrix`]
#[derive(Debug, Clone, PartialEq)]
pub enum SvtColumn<V> {
    Empty,
    Explicit { rows: Arc<[u32]>, values: Vec<V> },
    /// All values are one
    Lacunar { rows: Arc<[u32]> },
}

impl<V: MatrixElement> SvtColumn<V> {
    /// Number of stored entries
    pub fn len(&self) -> usize {
        match self {
            SvtColumn::Empty => 0,
            SvtColumn::Explicit { rows, .. } | SvtColumn::Lacunar { rows } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_lacunar(&self) -> bool {
        matches!(self, SvtColumn::Lacunar { .. })
    }

    /// Row indices, or `None` for an empty column
    pub fn rows(&self) -> Option<&Arc<[u32]>> {
        match self {
            SvtColumn::Empty => None,
            SvtColumn::Explicit { rows, .. } | SvtColumn::Lacunar { rows } => Some(rows),
        }
    }

    /// Stored values; `None` for empty and lacunar columns
    pub fn values(&self) -> Option<&[V]> {
        match self {
            SvtColumn::Explicit { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Iterate `(row, value)` pairs, yielding one for lacunar entries
    pub fn iter(&self) -> impl Iterator<Item = (u32, V)> + '_ {
        let rows: &[u32] = self.rows().map(|r| &r[..]).unwrap_or(&[]);
        let values = self.values();
        rows.iter()
            .enumerate()
            .map(move |(i, &row)| (row, values.map_or_else(V::one, |v| v[i])))
    }

    /// Build a column from normalized rows and values
    fn from_sorted(rows: Vec<u32>, values: Vec<V>, lacunar_leaves: bool) -> Self {
        if rows.is_empty() {
            SvtColumn::Empty
        } else if lacunar_leaves && values.iter().all(|v| v.is_one()) {
            SvtColumn::Lacunar { rows: rows.into() }
        } else {
            SvtColumn::Explicit {
                rows: rows.into(),
                values,
            }
        }
    }
}

/// Finalized column-oriented sparse matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SvtMatrix<V> {
    nrow: usize,
    ncol: usize,
    columns: Vec<SvtColumn<V>>,
    dimnames: Dimnames,
}

impl<V: MatrixElement> SvtMatrix<V> {
    /// Assemble a matrix from column slots, checking every structural invariant
    pub fn from_columns(
        nrow: usize,
        columns: Vec<SvtColumn<V>>,
        dimnames: Dimnames,
    ) -> Result<Self> {
        let ncol = columns.len();
        MatrixMetadata::new(nrow, ncol, 0).validate()?;
        for (col, column) in columns.iter().enumerate() {
            if let SvtColumn::Explicit { rows, values } = column {
                if rows.len() != values.len() {
                    return Err(SpcountError::Consistency {
                        what: "column value count",
                        expected: rows.len(),
                        actual: values.len(),
                    });
                }
            }
            let rows: &[u32] = column.rows().map(|r| &r[..]).unwrap_or(&[]);
            if column.rows().is_some() && rows.is_empty() {
                return Err(SpcountError::InvalidArgument(format!(
                    "column {col} has no rows but is not marked empty"
                )));
            }
            if !rows.windows(2).all(|w| w[0] < w[1]) {
                return Err(SpcountError::InvalidArgument(format!(
                    "row indices of column {col} are not strictly ascending"
                )));
            }
            if let Some(&last) = rows.last() {
                if last as usize >= nrow {
                    return Err(SpcountError::Bounds {
                        row: last + 1,
                        col: col as u32 + 1,
                        nrow,
                        ncol,
                    });
                }
            }
        }
        if let Some(rows) = &dimnames.rows {
            if rows.len() != nrow {
                return Err(SpcountError::Consistency {
                    what: "row label count",
                    expected: nrow,
                    actual: rows.len(),
                });
            }
        }
        if let Some(cols) = &dimnames.cols {
            if cols.len() != ncol {
                return Err(SpcountError::Consistency {
                    what: "column label count",
                    expected: ncol,
                    actual: cols.len(),
                });
            }
        }
        Ok(Self {
            nrow,
            ncol,
            columns,
            dimnames,
        })
    }

    /// Assemble without validation; callers guarantee the invariants
    pub(crate) fn from_parts_unchecked(
        nrow: usize,
        columns: Vec<SvtColumn<V>>,
        dimnames: Dimnames,
    ) -> Self {
        Self {
            nrow,
            ncol: columns.len(),
            columns,
            dimnames,
        }
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn columns(&self) -> &[SvtColumn<V>] {
        &self.columns
    }

    pub fn column(&self, col: usize) -> Option<&SvtColumn<V>> {
        self.columns.get(col)
    }

    pub fn dimnames(&self) -> &Dimnames {
        &self.dimnames
    }

    /// Whether every column slot is empty
    pub fn is_all_empty(&self) -> bool {
        self.columns.iter().all(SvtColumn::is_empty)
    }

    /// Iterate `(row, col, value)` with 0-based coordinates in column-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, V)> + '_ {
        self.columns.iter().enumerate().flat_map(|(col, column)| {
            column
                .iter()
                .map(move |(row, value)| (row as usize, col, value))
        })
    }
}

impl SvtMatrix<i32> {
    /// Iterate the matrix as 1-based entries in column-major order
    pub fn entries(&self) -> impl Iterator<Item = NonZeroEntry> + '_ {
        self.iter()
            .map(|(row, col, value)| NonZeroEntry::new(row as u32 + 1, col as u32 + 1, value))
    }
}

impl<V: MatrixElement> SparseMatrix for SvtMatrix<V> {
    type Element = V;

    fn get_element(&self, row: usize, col: usize) -> Option<V> {
        let column = self.columns.get(col)?;
        let row = u32::try_from(row).ok()?;
        let rows = column.rows()?;
        let index = rows.binary_search(&row).ok()?;
        Some(column.values().map_or_else(V::one, |v| v[index]))
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.nrow, self.ncol)
    }

    fn nnz(&self) -> usize {
        self.columns.iter().map(SvtColumn::len).sum()
    }
}

impl<V: MatrixElement> MatrixOperations for SvtMatrix<V> {
    fn get_col(&self, col_index: usize) -> Vec<(usize, V)> {
        self.columns
            .get(col_index)
            .map(|column| column.iter().map(|(row, v)| (row as usize, v)).collect())
            .unwrap_or_default()
    }
}

/// Builder producing an [`SvtMatrix<i32>`]
#[derive(Debug)]
pub struct SvtBuilder {
    state: BuilderState,
    metadata: MatrixMetadata,
    lacunar_leaves: bool,
    rows: Vec<Vec<u32>>,
    values: Vec<Vec<i32>>,
    added: usize,
}

impl Default for SvtBuilder {
    fn default() -> Self {
        Self {
            state: BuilderState::Uninitialized,
            metadata: MatrixMetadata::default(),
            lacunar_leaves: true,
            rows: Vec::new(),
            values: Vec::new(),
            added: 0,
        }
    }
}

impl SvtBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable lacunar encoding of all-ones columns
    pub fn with_lacunar_leaves(mut self, enabled: bool) -> Self {
        self.lacunar_leaves = enabled;
        self
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.added
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0
    }
}

impl MatrixBuilder for SvtBuilder {
    type Output = SvtMatrix<i32>;

    fn init(&mut self, metadata: MatrixMetadata) -> Result<()> {
        metadata.validate()?;
        self.state.begin()?;
        self.rows = vec![Vec::new(); metadata.ncol];
        self.values = vec![Vec::new(); metadata.ncol];
        // Assume an even spread for the initial per-column capacity
        if metadata.ncol > 0 {
            let per_column = metadata.nval / metadata.ncol;
            for (rows, values) in self.rows.iter_mut().zip(&mut self.values) {
                rows.reserve(per_column);
                values.reserve(per_column);
            }
        }
        self.metadata = metadata;
        Ok(())
    }

    fn add_entry(&mut self, entry: NonZeroEntry) -> Result<()> {
        self.state.require_initialized("add_entry called before init")?;
        check_entry_bounds(&entry, self.metadata.nrow, self.metadata.ncol)?;
        let col = entry.col as usize - 1;
        self.rows[col].push(entry.row - 1);
        self.values[col].push(entry.value);
        self.added += 1;
        Ok(())
    }

    fn finalize(mut self) -> Result<SvtMatrix<i32>> {
        self.state.require_initialized("finalize called before init")?;
        if self.added != self.metadata.nval {
            return Err(SpcountError::Consistency {
                what: "number of nonzero entries",
                expected: self.metadata.nval,
                actual: self.added,
            });
        }

        let mut stats = NormalizeStats::default();
        let mut columns = Vec::with_capacity(self.metadata.ncol);
        for (mut rows, mut values) in self.rows.into_iter().zip(self.values) {
            stats.record(SvtNormalizer::normalize_column(&mut rows, &mut values));
            columns.push(SvtColumn::from_sorted(rows, values, self.lacunar_leaves));
        }
        tracing::debug!(
            already_sorted = stats.already_sorted,
            reversed = stats.reversed,
            sorted = stats.sorted,
            merged = stats.merged,
            cancelled = stats.cancelled,
            "normalized SVT columns"
        );

        let dimnames = Dimnames::from_metadata(&mut self.metadata);
        Ok(SvtMatrix::from_parts_unchecked(
            self.metadata.nrow,
            columns,
            dimnames,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;
    use proptest::prelude::*;

    fn build(
        metadata: MatrixMetadata,
        entries: &[(u32, u32, i32)],
        lacunar: bool,
    ) -> Result<SvtMatrix<i32>> {
        let mut builder = SvtBuilder::new().with_lacunar_leaves(lacunar);
        builder.init(metadata)?;
        for &entry in entries {
            builder.add_entry(entry.into())?;
        }
        builder.finalize()
    }

    #[test]
    fn test_column_kinds() {
        let matrix = build(
            MatrixMetadata::new(4, 3, 4),
            &[(3, 1, 5), (1, 1, 2), (2, 3, 1), (4, 3, 1)],
            true,
        )
        .unwrap();

        assert_eq!(matrix.dimensions(), (4, 3));
        assert_eq!(matrix.nnz(), 4);
        assert_eq!(
            matrix.column(0),
            Some(&SvtColumn::Explicit {
                rows: vec![0, 2].into(),
                values: vec![2, 5],
            })
        );
        assert_eq!(matrix.column(1), Some(&SvtColumn::Empty));
        assert_eq!(
            matrix.column(2),
            Some(&SvtColumn::Lacunar {
                rows: vec![1, 3].into()
            })
        );
        assert_eq!(matrix.get_element(3, 2), Some(1));
        assert_eq!(matrix.get_element(2, 0), Some(5));
        assert_eq!(matrix.get_element(1, 0), None);
        assert_eq!(matrix.get_col(2), vec![(1, 1), (3, 1)]);
    }

    #[test]
    fn test_lacunar_disabled() {
        let matrix = build(MatrixMetadata::new(2, 1, 2), &[(1, 1, 1), (2, 1, 1)], false).unwrap();
        assert!(!matrix.column(0).unwrap().is_lacunar());
        assert_eq!(matrix.column(0).unwrap().values(), Some(&[1, 1][..]));
    }

    #[test]
    fn test_duplicates_summed() {
        let matrix = build(
            MatrixMetadata::new(3, 1, 3),
            &[(2, 1, 1), (1, 1, 4), (2, 1, 2)],
            true,
        )
        .unwrap();
        assert_eq!(matrix.get_col(0), vec![(0, 4), (1, 3)]);
        assert_eq!(matrix.nnz(), 2);
    }

    #[test]
    fn test_cancelling_duplicates_leave_no_zero() {
        let matrix = build(
            MatrixMetadata::new(2, 2, 5),
            &[(2, 1, 1), (1, 1, 2), (1, 1, -2), (2, 2, 3), (2, 2, -3)],
            true,
        )
        .unwrap();
        assert_eq!(
            matrix.column(0),
            Some(&SvtColumn::Lacunar {
                rows: vec![1].into()
            })
        );
        assert_eq!(matrix.column(1), Some(&SvtColumn::Empty));
        assert_eq!(matrix.get_element(0, 0), None);
        assert_eq!(matrix.nnz(), 1);
    }

    #[test]
    fn test_bounds_and_count() {
        for bad in [(0, 1, 1), (3, 1, 1), (1, 0, 1), (1, 2, 1)] {
            let err = build(MatrixMetadata::new(2, 1, 1), &[bad], true).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Bounds);
        }
        let err = build(MatrixMetadata::new(2, 1, 3), &[(1, 1, 1)], true).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Consistency);
    }

    #[test]
    fn test_lifecycle_misuse() {
        let mut builder = SvtBuilder::new();
        assert_eq!(
            builder
                .add_entry(NonZeroEntry::new(1, 1, 1))
                .unwrap_err()
                .category(),
            ErrorCategory::Usage
        );
        builder.init(MatrixMetadata::new(1, 1, 0)).unwrap();
        assert_eq!(
            builder
                .init(MatrixMetadata::new(1, 1, 0))
                .unwrap_err()
                .category(),
            ErrorCategory::Usage
        );
        assert_eq!(
            SvtBuilder::new().finalize().unwrap_err().category(),
            ErrorCategory::Usage
        );
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = build(MatrixMetadata::new(5, 2, 0), &[], true).unwrap();
        assert!(matrix.is_all_empty());
        assert_eq!(matrix.nnz(), 0);

        let matrix = build(MatrixMetadata::new(0, 0, 0), &[], true).unwrap();
        assert_eq!(matrix.dimensions(), (0, 0));
        assert!(matrix.columns().is_empty());
    }

    #[test]
    fn test_from_columns_validation() {
        let ok = SvtMatrix::<i32>::from_columns(
            3,
            vec![SvtColumn::Lacunar { rows: vec![0, 2].into() }, SvtColumn::Empty],
            Dimnames::default(),
        );
        assert!(ok.is_ok());

        let unsorted = SvtMatrix::<i32>::from_columns(
            3,
            vec![SvtColumn::Lacunar { rows: vec![2, 0].into() }],
            Dimnames::default(),
        );
        assert_eq!(unsorted.unwrap_err().category(), ErrorCategory::Usage);

        let out_of_range = SvtMatrix::<i32>::from_columns(
            2,
            vec![SvtColumn::Lacunar { rows: vec![2].into() }],
            Dimnames::default(),
        );
        assert_eq!(out_of_range.unwrap_err().category(), ErrorCategory::Bounds);

        let short_values = SvtMatrix::from_columns(
            2,
            vec![SvtColumn::Explicit {
                rows: vec![0, 1].into(),
                values: vec![3],
            }],
            Dimnames::default(),
        );
        assert_eq!(short_values.unwrap_err().category(), ErrorCategory::Consistency);
    }

    #[test]
    fn test_entries_column_major() {
        let matrix = build(
            MatrixMetadata::new(2, 2, 3),
            &[(2, 2, 7), (2, 1, 3), (1, 2, 1)],
            true,
        )
        .unwrap();
        let entries: Vec<_> = matrix.entries().map(|e| (e.row, e.col, e.value)).collect();
        assert_eq!(entries, vec![(2, 1, 3), (1, 2, 1), (2, 2, 7)]);
    }

    proptest! {
        #[test]
        fn prop_columns_strictly_ascending(
            entries in prop::collection::vec((1u32..=20, 1u32..=6, 1i32..4), 0..120)
        ) {
            let matrix = build(MatrixMetadata::new(20, 6, entries.len()), &entries, true).unwrap();
            for column in matrix.columns() {
                if let Some(rows) = column.rows() {
                    prop_assert!(rows.windows(2).all(|w| w[0] < w[1]));
                    prop_assert!(rows.iter().all(|&r| r < 20));
                }
            }
            let total: i64 = entries.iter().map(|e| e.2 as i64).sum();
            prop_assert_eq!(matrix.iter().map(|(_, _, v)| v as i64).sum::<i64>(), total);
        }
    }
}
