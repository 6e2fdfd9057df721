//! 10x-style directory bundles
//!
//! A bundle directory holds `matrix.mtx`, `barcodes.tsv` (one column label per
//! line) and a tab-separated features file (`features.tsv`, or `genes.tsv` for
//! older releases) whose first column is the feature ID and second the
//! feature name. Any of them may carry a `.gz` suffix.

use std::path::{Path, PathBuf};

use spcount_core::format::constants::tenx;
use spcount_core::{FormatReader, MatrixBuilder, Result, SpcountError};

use super::mtx::MtxReader;
use super::text::read_lines;
use crate::config::ReadOptions;

/// Resolved file paths of a 10x bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenxBundle {
    pub matrix: PathBuf,
    pub barcodes: Option<PathBuf>,
    pub features: Option<PathBuf>,
    /// Take row labels from the ID column rather than the name column
    pub use_id_row_names: bool,
}

/// Find `name` or `name.gz` inside `dir`
fn locate(dir: &Path, name: &str) -> Option<PathBuf> {
    let plain = dir.join(name);
    if plain.is_file() {
        return Some(plain);
    }
    let gzip = dir.join(format!("{name}{}", tenx::GZIP_SUFFIX));
    gzip.is_file().then_some(gzip)
}

impl TenxBundle {
    /// Resolve the files of a bundle directory according to `options`
    pub fn open(dir: impl AsRef<Path>, options: &ReadOptions) -> Result<Self> {
        let dir = dir.as_ref();
        let matrix = locate(dir, tenx::MATRIX_FILE).ok_or_else(|| {
            SpcountError::io(
                format!("no {} in {}", tenx::MATRIX_FILE, dir.display()),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            )
        })?;

        let barcodes = if options.use_barcode_col_names {
            let found = locate(dir, tenx::BARCODES_FILE);
            if found.is_none() {
                tracing::warn!(dir = %dir.display(), "no barcodes file; columns will be unlabelled");
            }
            found
        } else {
            None
        };

        let features_file = if options.use_features_tsv {
            tenx::FEATURES_FILE
        } else {
            tenx::GENES_FILE
        };
        let features = locate(dir, features_file);
        if features.is_none() {
            tracing::warn!(
                dir = %dir.display(),
                file = features_file,
                "no features file; rows will be unlabelled"
            );
        }

        Ok(Self {
            matrix,
            barcodes,
            features,
            use_id_row_names: options.use_id_row_names,
        })
    }

    /// Row labels from the features file
    pub fn read_row_names(&self) -> Result<Vec<String>> {
        let Some(path) = &self.features else {
            return Ok(Vec::new());
        };
        let column = if self.use_id_row_names { 0 } else { 1 };
        read_lines(path)?
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(i, line)| {
                line.split('\t').nth(column).map(str::to_string).ok_or_else(|| {
                    SpcountError::format(
                        i + 1,
                        format!("{} has no column {}", path.display(), column + 1),
                    )
                })
            })
            .collect()
    }

    /// Column labels from the barcodes file
    pub fn read_col_names(&self) -> Result<Vec<String>> {
        match &self.barcodes {
            Some(path) => Ok(read_lines(path)?
                .into_iter()
                .filter(|line| !line.is_empty())
                .collect()),
            None => Ok(Vec::new()),
        }
    }
}

impl FormatReader for TenxBundle {
    fn read_into<B: MatrixBuilder>(self, builder: &mut B) -> Result<()> {
        let row_names = self.read_row_names()?;
        let col_names = self.read_col_names()?;
        tracing::debug!(
            matrix = %self.matrix.display(),
            rows = row_names.len(),
            cols = col_names.len(),
            "reading 10x bundle"
        );
        MtxReader::from_path(&self.matrix)?
            .with_row_names(row_names)
            .with_col_names(col_names)
            .read_into(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use spcount_core::{ErrorCategory, SparseMatrix, SvtBuilder, SvtMatrix};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        if name.ends_with(".gz") {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(contents.as_bytes()).unwrap();
            file.write_all(&encoder.finish().unwrap()).unwrap();
        } else {
            file.write_all(contents.as_bytes()).unwrap();
        }
    }

    fn bundle(gzip: bool, features_name: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let suffix = if gzip { ".gz" } else { "" };
        write_file(
            dir.path(),
            &format!("matrix.mtx{suffix}"),
            "%%MatrixMarket matrix coordinate integer general\n3 2 3\n1 1 2\n3 1 1\n2 2 5\n",
        );
        write_file(
            dir.path(),
            &format!("barcodes.tsv{suffix}"),
            "AAAC-1\nAAAG-1\n",
        );
        write_file(
            dir.path(),
            &format!("{features_name}{suffix}"),
            "ENSG1\tGeneA\tGene Expression\nENSG2\tGeneB\tGene Expression\nENSG3\tGeneC\tGene Expression\n",
        );
        dir
    }

    fn read(dir: &Path, options: &ReadOptions) -> Result<SvtMatrix<i32>> {
        let mut builder = SvtBuilder::new();
        TenxBundle::open(dir, options)?.read_into(&mut builder)?;
        builder.finalize()
    }

    #[test]
    fn test_plain_bundle() {
        let dir = bundle(false, "features.tsv");
        let matrix = read(dir.path(), &ReadOptions::default()).unwrap();
        assert_eq!(matrix.dimensions(), (3, 2));
        assert_eq!(matrix.get_element(1, 1), Some(5));
        assert_eq!(
            matrix.dimnames().rows.as_deref(),
            Some(&["ENSG1".to_string(), "ENSG2".into(), "ENSG3".into()][..])
        );
        assert_eq!(
            matrix.dimnames().cols.as_deref(),
            Some(&["AAAC-1".to_string(), "AAAG-1".into()][..])
        );
    }

    #[test]
    fn test_gzip_bundle_with_names() {
        let dir = bundle(true, "features.tsv");
        let options = ReadOptions::default()
            .with_id_row_names(false)
            .with_barcode_col_names(false);
        let matrix = read(dir.path(), &options).unwrap();
        assert_eq!(matrix.nnz(), 3);
        assert_eq!(
            matrix.dimnames().rows.as_ref().map(|r| r[2].as_str()),
            Some("GeneC")
        );
        assert!(matrix.dimnames().cols.is_none());
    }

    #[test]
    fn test_genes_tsv() {
        let dir = bundle(false, "genes.tsv");
        let options = ReadOptions::default().with_features_tsv(false);
        let matrix = read(dir.path(), &options).unwrap();
        assert_eq!(matrix.dimnames().rows.as_ref().map(Vec::len), Some(3));

        // Looking for features.tsv in a genes.tsv bundle leaves rows unlabelled
        let matrix = read(dir.path(), &ReadOptions::default()).unwrap();
        assert!(matrix.dimnames().rows.is_none());
    }

    #[test]
    fn test_missing_matrix() {
        let dir = TempDir::new().unwrap();
        let err = TenxBundle::open(dir.path(), &ReadOptions::default()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_label_mismatch_dropped() {
        let dir = bundle(false, "features.tsv");
        write_file(dir.path(), "barcodes.tsv", "only-one\n");
        let matrix = read(dir.path(), &ReadOptions::default()).unwrap();
        assert!(matrix.dimnames().cols.is_none());
        assert!(matrix.dimnames().rows.is_some());
    }
}
