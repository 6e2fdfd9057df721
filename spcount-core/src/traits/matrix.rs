//! Read access shared by the finalized matrix representations

use super::element::MatrixElement;

/// Core sparse matrix trait for representation-agnostic access
///
/// Coordinates are 0-based.
pub trait SparseMatrix {
    /// The element type stored in this matrix
    type Element: MatrixElement;

    /// Get an element at the specified position
    ///
    /// Returns `None` if the element is zero (not stored) or if the
    /// position is out of bounds.
    fn get_element(&self, row: usize, col: usize) -> Option<Self::Element>;

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get number of non-zero elements stored
    fn nnz(&self) -> usize;
}

/// Column access for matrices that can enumerate a column cheaply
pub trait MatrixOperations: SparseMatrix {
    /// Get all non-zero `(row, value)` pairs of a column in ascending row order
    fn get_col(&self, col_index: usize) -> Vec<(usize, Self::Element)>;
}
