//! Coordinate and column-pointer validation
//!
//! Pure checks on entry coordinates and CSC column pointers with no I/O.

use crate::format::NonZeroEntry;
use crate::{Result, SpcountError};

/// Check that a 1-based entry lies inside an `nrow` x `ncol` extent
pub fn check_entry_bounds(entry: &NonZeroEntry, nrow: usize, ncol: usize) -> Result<()> {
    if entry.in_bounds(nrow, ncol) {
        Ok(())
    } else {
        Err(SpcountError::Bounds {
            row: entry.row,
            col: entry.col,
            nrow,
            ncol,
        })
    }
}

/// Validate a CSC column-pointer array against the declared extent
///
/// The array must hold `ncol + 1` entries, start at zero, never decrease and
/// end at `nnz`.
pub fn validate_column_pointers(path: &str, indptr: &[u32], ncol: usize, nnz: usize) -> Result<()> {
    let expected = ncol
        .checked_add(1)
        .ok_or_else(|| SpcountError::dataset(path, format!("column count {ncol} overflows")))?;
    if indptr.len() != expected {
        return Err(SpcountError::Consistency {
            what: "column pointer length (ncol + 1)",
            expected,
            actual: indptr.len(),
        });
    }
    if indptr[0] != 0 {
        return Err(SpcountError::dataset(
            path,
            format!("first column pointer is {} instead of 0", indptr[0]),
        ));
    }
    if let Some(col) = indptr.windows(2).position(|pair| pair[1] < pair[0]) {
        return Err(SpcountError::dataset(
            path,
            format!(
                "column pointers decrease at column {} ({} > {})",
                col + 1,
                indptr[col],
                indptr[col + 1]
            ),
        ));
    }
    let last = indptr[ncol] as usize;
    if last != nnz {
        return Err(SpcountError::Consistency {
            what: "final column pointer vs. nonzero count",
            expected: nnz,
            actual: last,
        });
    }
    Ok(())
}
