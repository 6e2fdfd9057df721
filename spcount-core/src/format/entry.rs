//! Nonzero matrix entries as emitted by readers

/// A nonzero entry with 1-based coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonZeroEntry {
    /// Row index, 1-based
    pub row: u32,
    /// Column index, 1-based
    pub col: u32,
    /// Value, never zero
    pub value: i32,
}

impl NonZeroEntry {
    pub const fn new(row: u32, col: u32, value: i32) -> Self {
        Self { row, col, value }
    }

    /// Whether the coordinates fall inside an `nrow` x `ncol` extent
    pub const fn in_bounds(&self, nrow: usize, ncol: usize) -> bool {
        self.row >= 1 && self.row as usize <= nrow && self.col >= 1 && self.col as usize <= ncol
    }
}

impl From<(u32, u32, i32)> for NonZeroEntry {
    fn from((row, col, value): (u32, u32, i32)) -> Self {
        Self::new(row, col, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds() {
        assert!(NonZeroEntry::new(1, 1, 5).in_bounds(1, 1));
        assert!(NonZeroEntry::new(3, 2, 5).in_bounds(3, 2));
        assert!(!NonZeroEntry::new(0, 1, 5).in_bounds(3, 2));
        assert!(!NonZeroEntry::new(4, 1, 5).in_bounds(3, 2));
        assert!(!NonZeroEntry::new(1, 0, 5).in_bounds(3, 2));
        assert!(!NonZeroEntry::new(1, 3, 5).in_bounds(3, 2));
        assert!(!NonZeroEntry::new(1, 1, 5).in_bounds(0, 0));
    }
}
