//! Layout arithmetic for the container format

/// Align an offset to a power-of-two boundary
pub const fn align_to_boundary(offset: usize, boundary: usize) -> usize {
    (offset + boundary - 1) & !(boundary - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_to_boundary() {
        assert_eq!(align_to_boundary(0, 8), 0);
        assert_eq!(align_to_boundary(1, 8), 8);
        assert_eq!(align_to_boundary(7, 8), 8);
        assert_eq!(align_to_boundary(8, 8), 8);
        assert_eq!(align_to_boundary(9, 8), 16);

        assert_eq!(align_to_boundary(3, 4), 4);
        assert_eq!(align_to_boundary(5, 4), 8);
    }
}
