//! Format constants shared by readers, builders and the container layout

/// Largest row or column count a matrix may declare (host integer range)
pub const MAX_DIMENSION: usize = i32::MAX as usize;

/// Version tag carried by every SVT matrix
pub const SVT_FORMAT_VERSION: u32 = 1;

/// Comment marker for Matrix-Market files
pub const MTX_COMMENT_MARKER: char = '%';

/// Banner prefix for Matrix-Market files
pub const MTX_BANNER: &str = "%%MatrixMarket";

/// Alignment boundary for container data sections
pub const ALIGNMENT_BOUNDARY: usize = 8;

/// Maximum fixed stride of a container string dataset (64KB)
pub const MAX_LABEL_STRIDE: u32 = 65536;

/// Dataset naming for CSC containers laid out the 10x Genomics way
pub mod csc {
    /// Group holding the matrix datasets in current (v3) containers
    pub const DEFAULT_GROUP: &str = "matrix";

    /// Row indices of the nonzero entries
    pub const INDICES: &str = "indices";
    /// Nonzero values
    pub const DATA: &str = "data";
    /// Column pointers, `ncol + 1` entries
    pub const INDPTR: &str = "indptr";
    /// `[nrow, ncol]`
    pub const SHAPE: &str = "shape";
    /// Column labels
    pub const BARCODES: &str = "barcodes";

    /// Feature identifiers in v3 containers
    pub const FEATURE_IDS: &str = "features/id";
    /// Feature names in v3 containers
    pub const FEATURE_NAMES: &str = "features/name";
    /// Feature identifiers in legacy genome groups
    pub const GENE_IDS: &str = "genes";
    /// Feature names in legacy genome groups
    pub const GENE_NAMES: &str = "gene_names";
}

/// File naming inside a 10x Genomics output directory
pub mod tenx {
    /// Matrix-Market matrix file
    pub const MATRIX_FILE: &str = "matrix.mtx";
    /// Column labels, one per line
    pub const BARCODES_FILE: &str = "barcodes.tsv";
    /// Feature table of CellRanger v3 and later
    pub const FEATURES_FILE: &str = "features.tsv";
    /// Feature table of CellRanger v2
    pub const GENES_FILE: &str = "genes.tsv";
    /// Suffix of gzip-compressed variants
    pub const GZIP_SUFFIX: &str = ".gz";
}
