//! Matrix metadata produced by a reader's header step
//!
//! Metadata carries the declared extent and nonzero count of a matrix along
//! with its optional row and column labels. Readers produce it once; builders
//! consume it in `init`.

use crate::format::constants::MAX_DIMENSION;
use crate::{Result, SpcountError};

/// Extent, declared nonzero count and labels of a sparse matrix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixMetadata {
    /// Number of rows
    pub nrow: usize,
    /// Number of columns
    pub ncol: usize,
    /// Declared number of nonzero values
    pub nval: usize,
    /// Row labels (empty when absent)
    pub row_names: Vec<String>,
    /// Column labels (empty when absent)
    pub col_names: Vec<String>,
}

impl MatrixMetadata {
    /// Create metadata without labels
    pub fn new(nrow: usize, ncol: usize, nval: usize) -> Self {
        Self {
            nrow,
            ncol,
            nval,
            row_names: Vec::new(),
            col_names: Vec::new(),
        }
    }

    /// Attach row labels
    pub fn with_row_names(mut self, names: Vec<String>) -> Self {
        self.row_names = names;
        self
    }

    /// Attach column labels
    pub fn with_col_names(mut self, names: Vec<String>) -> Self {
        self.col_names = names;
        self
    }

    /// Whether row labels are present
    pub fn has_row_names(&self) -> bool {
        !self.row_names.is_empty()
    }

    /// Whether column labels are present
    pub fn has_col_names(&self) -> bool {
        !self.col_names.is_empty()
    }

    /// Check the dimension limit and the label-length invariant
    pub fn validate(&self) -> Result<()> {
        if self.nrow > MAX_DIMENSION || self.ncol > MAX_DIMENSION {
            return Err(SpcountError::InvalidArgument(format!(
                "matrix extent {} x {} exceeds the supported maximum of {MAX_DIMENSION}",
                self.nrow, self.ncol
            )));
        }
        if self.has_row_names() && self.row_names.len() != self.nrow {
            return Err(SpcountError::Consistency {
                what: "row label count",
                expected: self.nrow,
                actual: self.row_names.len(),
            });
        }
        if self.has_col_names() && self.col_names.len() != self.ncol {
            return Err(SpcountError::Consistency {
                what: "column label count",
                expected: self.ncol,
                actual: self.col_names.len(),
            });
        }
        Ok(())
    }

    /// Drop any label set whose length disagrees with its dimension
    ///
    /// A mismatch is not fatal: a warning is logged and processing continues
    /// without that set of labels. Returns the number of dropped label sets.
    pub fn reconcile_labels(&mut self) -> usize {
        let mut dropped = 0;
        if self.has_row_names() && self.row_names.len() != self.nrow {
            tracing::warn!(
                expected = self.nrow,
                actual = self.row_names.len(),
                "row label count does not match the number of rows; dropping row labels"
            );
            self.row_names.clear();
            dropped += 1;
        }
        if self.has_col_names() && self.col_names.len() != self.ncol {
            tracing::warn!(
                expected = self.ncol,
                actual = self.col_names.len(),
                "column label count does not match the number of columns; dropping column labels"
            );
            self.col_names.clear();
            dropped += 1;
        }
        dropped
    }
}

/// Optional row and column labels of a finalized matrix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimnames {
    pub rows: Option<Vec<String>>,
    pub cols: Option<Vec<String>>,
}

impl Dimnames {
    /// Take the labels out of metadata, mapping empty sets to `None`
    pub fn from_metadata(metadata: &mut MatrixMetadata) -> Self {
        let take = |names: &mut Vec<String>| {
            if names.is_empty() {
                None
            } else {
                Some(std::mem::take(names))
            }
        };
        Self {
            rows: take(&mut metadata.row_names),
            cols: take(&mut metadata.col_names),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_none() && self.cols.is_none()
    }
}
