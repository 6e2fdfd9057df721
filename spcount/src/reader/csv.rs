//! Dense CSV reader
//!
//! The first line holds a corner cell followed by the column names. Every
//! following line holds a row name and one integer per column; zero cells
//! are implicit and dropped.

use std::io::Read;
use std::path::Path;

use spcount_core::validation::parse_value_field;
use spcount_core::{
    FormatReader, MatrixBuilder, MatrixMetadata, NonZeroEntry, Result, SpcountError,
};

use super::text::open_text;

/// Reader for dense, comma-delimited count tables
pub struct CsvReader<R> {
    input: R,
}

impl CsvReader<Box<dyn std::io::BufRead>> {
    /// Open a CSV file, decompressing it if gzip-compressed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(open_text(path.as_ref())?))
    }
}

impl<R: Read> CsvReader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

/// Map a `csv` error onto the error taxonomy
fn csv_error(err: csv::Error, line: usize) -> SpcountError {
    let line = err
        .position()
        .map(|pos| pos.line() as usize)
        .unwrap_or(line);
    if err.is_io_error() {
        if let csv::ErrorKind::Io(source) = err.into_kind() {
            return SpcountError::io(format!("failed to read CSV line {line}"), source);
        }
        return SpcountError::format(line, "I/O error while reading CSV");
    }
    SpcountError::format(line, err.to_string())
}

fn coordinate(index: usize, what: &str) -> Result<u32> {
    u32::try_from(index + 1)
        .map_err(|_| SpcountError::InvalidArgument(format!("{what} count exceeds u32 range")))
}

impl<R: Read> FormatReader for CsvReader<R> {
    fn read_into<B: MatrixBuilder>(self, builder: &mut B) -> Result<()> {
        let mut table = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.input);
        let mut records = table.records();

        let header = match records.next() {
            Some(record) => record.map_err(|e| csv_error(e, 1))?,
            None => return Err(SpcountError::format(1, "missing header line")),
        };
        if header.len() < 2 {
            return Err(SpcountError::format(1, "no comma delimiter in header"));
        }
        let col_names: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        let ncol = col_names.len();

        let mut row_names = Vec::new();
        let mut entries = Vec::new();
        let mut line = 1;
        for record in records {
            let record = record.map_err(|e| csv_error(e, line + 1))?;
            line = record
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(line + 1);

            let fields = record.len().saturating_sub(1);
            if fields != ncol {
                return Err(SpcountError::format(
                    line,
                    format!("expected {ncol} columns (from header) but found {fields}"),
                ));
            }

            let row = coordinate(row_names.len(), "row")?;
            for (index, field) in record.iter().skip(1).enumerate() {
                // Reported columns count the row-name cell
                let value = parse_value_field(field, line, index + 2)?;
                if value != 0 {
                    entries.push(NonZeroEntry::new(row, coordinate(index, "column")?, value));
                }
            }
            row_names.push(record.get(0).unwrap_or_default().to_string());
        }

        tracing::debug!(
            nrow = row_names.len(),
            ncol,
            nval = entries.len(),
            "parsed CSV table"
        );

        let metadata = MatrixMetadata::new(row_names.len(), ncol, entries.len())
            .with_row_names(row_names)
            .with_col_names(col_names);
        builder.init(metadata)?;
        for entry in entries {
            builder.add_entry(entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::text::tests::write_text;
    use spcount_core::{CooBuilder, ErrorCategory, SparseMatrix, SvtBuilder};

    fn read_coo(text: &str) -> Result<spcount_core::CooMatrix> {
        let mut builder = CooBuilder::new();
        CsvReader::new(text.as_bytes()).read_into(&mut builder)?;
        builder.finalize()
    }

    #[test]
    fn test_read_dense_table() {
        let matrix = read_coo(",c1,c2,c3\nr1,0,2,0\nr2,5,0,1\n").unwrap();
        assert_eq!(matrix.dimensions(), (2, 3));
        assert_eq!(matrix.rows(), &[1, 2, 2]);
        assert_eq!(matrix.cols(), &[2, 1, 3]);
        assert_eq!(matrix.vals(), &[2, 5, 1]);
        assert_eq!(
            matrix.dimnames().rows.as_deref(),
            Some(&["r1".to_string(), "r2".to_string()][..])
        );
        assert_eq!(matrix.dimnames().cols.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_integral_spellings_and_quotes() {
        let matrix = read_coo("gene,\"cell,1\"\n\"g,1\",3.0\n").unwrap();
        assert_eq!(matrix.vals(), &[3]);
        assert_eq!(
            matrix.dimnames().cols.as_deref(),
            Some(&["cell,1".to_string()][..])
        );
        assert_eq!(
            matrix.dimnames().rows.as_deref(),
            Some(&["g,1".to_string()][..])
        );
    }

    #[test]
    fn test_float_value_rejected() {
        let err = read_coo(",c1,c2\nr1,1,0\nr2,0,1.5\n").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Value);
        assert!(matches!(
            err,
            SpcountError::Value { line: 3, column: 3, ref value } if value == "1.5"
        ));
    }

    #[test]
    fn test_empty_field_rejected() {
        let err = read_coo(",c1,c2\nr1,,1\n").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Value);
    }

    #[test]
    fn test_field_count_mismatch() {
        let err = read_coo(",c1,c2\nr1,1\n").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "{msg}");
        assert!(msg.contains("expected 2"), "{msg}");
        assert!(msg.contains("found 1"), "{msg}");
    }

    #[test]
    fn test_header_without_delimiter() {
        let err = read_coo("corner\nr1\n").unwrap_err();
        assert!(matches!(err, SpcountError::Format { line: 1, .. }));

        let err = read_coo("").unwrap_err();
        assert!(matches!(err, SpcountError::Format { line: 1, .. }));
    }

    #[test]
    fn test_header_only() {
        let matrix = read_coo(",a,b\n").unwrap();
        assert_eq!(matrix.dimensions(), (0, 2));
        assert_eq!(matrix.nnz(), 0);
    }

    #[test]
    fn test_gzip_file_into_svt() {
        let file = write_text(".csv.gz", ",c1,c2\nr1,1,0\nr2,1,0\nr3,0,4\n", true);
        let mut builder = SvtBuilder::new();
        CsvReader::from_path(file.path())
            .unwrap()
            .read_into(&mut builder)
            .unwrap();
        let matrix = builder.finalize().unwrap();
        assert!(matrix.column(0).unwrap().is_lacunar());
        assert_eq!(matrix.get_element(2, 1), Some(4));
    }
}
