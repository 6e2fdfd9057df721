//! Per-column row ordering for SVT columns
//!
//! Entries arrive in reader order, so a column's rows may be ascending
//! (the common case for column-major inputs), descending, or arbitrary.
//! Normalization picks the cheapest of three tiers:
//!
//! 1. strictly ascending: nothing to do
//! 2. strictly descending: reverse rows and values in place
//! 3. otherwise: stable sort by row, then sum values of duplicate rows
//!
//! Rows whose duplicates sum to zero are removed, so no stored value is zero.

use crate::traits::MatrixElement;

/// Which tier a column went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    AlreadySorted,
    Reversed,
    /// Sorted by permutation; `merged` duplicate entries were folded away
    /// and `cancelled` rows summed to zero and were removed
    Sorted { merged: usize, cancelled: usize },
}

/// Tier counts accumulated over a matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub already_sorted: usize,
    pub reversed: usize,
    pub sorted: usize,
    pub merged: usize,
    pub cancelled: usize,
}

impl NormalizeStats {
    pub fn record(&mut self, outcome: NormalizeOutcome) {
        match outcome {
            NormalizeOutcome::AlreadySorted => self.already_sorted += 1,
            NormalizeOutcome::Reversed => self.reversed += 1,
            NormalizeOutcome::Sorted { merged, cancelled } => {
                self.sorted += 1;
                self.merged += merged;
                self.cancelled += cancelled;
            }
        }
    }
}

/// Brings SVT columns into strictly ascending row order
pub struct SvtNormalizer;

impl SvtNormalizer {
    /// Normalize one column given as parallel row and value vectors
    ///
    /// `rows` and `values` must have equal length.
    pub fn normalize_column<V: MatrixElement>(
        rows: &mut Vec<u32>,
        values: &mut Vec<V>,
    ) -> NormalizeOutcome {
        debug_assert_eq!(rows.len(), values.len());

        if rows.windows(2).all(|w| w[0] < w[1]) {
            return NormalizeOutcome::AlreadySorted;
        }
        if rows.windows(2).all(|w| w[0] > w[1]) {
            rows.reverse();
            values.reverse();
            return NormalizeOutcome::Reversed;
        }

        let mut order: Vec<usize> = (0..rows.len()).collect();
        // sort_by_key is stable, so equal rows keep insertion order
        order.sort_by_key(|&i| rows[i]);

        let mut sorted_rows: Vec<u32> = Vec::with_capacity(rows.len());
        let mut sorted_values: Vec<V> = Vec::with_capacity(values.len());
        let mut merged = 0;
        for i in order {
            let (row, value) = (rows[i], values[i]);
            match (sorted_rows.last(), sorted_values.last_mut()) {
                (Some(&last), Some(acc)) if last == row => {
                    *acc = acc.combine(value);
                    merged += 1;
                }
                _ => {
                    sorted_rows.push(row);
                    sorted_values.push(value);
                }
            }
        }

        let before = sorted_rows.len();
        let (kept_rows, kept_values): (Vec<u32>, Vec<V>) = sorted_rows
            .into_iter()
            .zip(sorted_values)
            .filter(|(_, value)| !value.is_zero())
            .unzip();
        let cancelled = before - kept_rows.len();

        *rows = kept_rows;
        *values = kept_values;
        NormalizeOutcome::Sorted { merged, cancelled }
    }
}
