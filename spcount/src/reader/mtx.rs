//! Matrix-Market coordinate reader
//!
//! Lines starting with `%` are comments, except for an optional
//! `%%MatrixMarket` banner on the first line. The first data line declares
//! `nrow ncol nnz`; each following line is a 1-based `row col value` triple
//! (`row col` for pattern matrices).

use std::io::BufRead;
use std::path::Path;

use spcount_core::format::constants::{MTX_BANNER, MTX_COMMENT_MARKER};
use spcount_core::validation::{parse_integral, parse_mtx_banner, parse_usize, MtxField};
use spcount_core::{
    FormatReader, MatrixBuilder, MatrixMetadata, NonZeroEntry, Result, SpcountError,
};

use super::text::open_text;

/// Reader for Matrix-Market coordinate files
pub struct MtxReader<R> {
    input: R,
    row_names: Vec<String>,
    col_names: Vec<String>,
}

impl MtxReader<Box<dyn BufRead>> {
    /// Open a Matrix-Market file, decompressing it if gzip-compressed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(open_text(path.as_ref())?))
    }
}

impl<R: BufRead> MtxReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            row_names: Vec::new(),
            col_names: Vec::new(),
        }
    }

    /// Row labels to attach; dropped with a warning if their count is wrong
    pub fn with_row_names(mut self, names: Vec<String>) -> Self {
        self.row_names = names;
        self
    }

    /// Column labels to attach; dropped with a warning if their count is wrong
    pub fn with_col_names(mut self, names: Vec<String>) -> Self {
        self.col_names = names;
        self
    }
}

fn parse_size_line(line: &str, line_num: usize) -> Result<MatrixMetadata> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(SpcountError::format(
            line_num,
            format!("size line has {} fields instead of 3", fields.len()),
        ));
    }
    let mut sizes = [0usize; 3];
    for (size, field) in sizes.iter_mut().zip(&fields) {
        *size = parse_usize(field).ok_or_else(|| {
            SpcountError::format(line_num, format!("invalid size field {field:?}"))
        })?;
    }
    Ok(MatrixMetadata::new(sizes[0], sizes[1], sizes[2]))
}

/// Parse one triple; `None` means it holds a zero and is skipped
fn parse_entry(line: &str, line_num: usize, field: MtxField) -> Result<Option<NonZeroEntry>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let expected = field.fields_per_entry();
    if fields.len() != expected {
        return Err(SpcountError::format(
            line_num,
            format!("expected {expected} fields but found {}", fields.len()),
        ));
    }

    let index = |i: usize, what: &str| -> Result<u32> {
        parse_usize(fields[i])
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                SpcountError::format(line_num, format!("invalid {what} index {:?}", fields[i]))
            })
    };
    let row = index(0, "row")?;
    let col = index(1, "column")?;
    let value = match field {
        MtxField::Pattern => 1,
        MtxField::Integer => parse_integral(fields[2])
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| SpcountError::Value {
                line: line_num,
                column: 3,
                value: fields[2].to_string(),
            })?,
    };

    if row == 0 || col == 0 || value == 0 {
        tracing::warn!(
            line = line_num,
            row,
            col,
            value,
            "skipping Matrix-Market entry containing a zero"
        );
        return Ok(None);
    }
    Ok(Some(NonZeroEntry::new(row, col, value)))
}

impl<R: BufRead> FormatReader for MtxReader<R> {
    fn read_into<B: MatrixBuilder>(self, builder: &mut B) -> Result<()> {
        let mut field = MtxField::Integer;
        let mut declared: Option<usize> = None;
        let mut accepted = 0usize;
        let mut last_line = 0;
        let mut row_names = Some(self.row_names);
        let mut col_names = Some(self.col_names);

        for (index, line) in self.input.lines().enumerate() {
            let line_num = index + 1;
            last_line = line_num;
            let line = line
                .map_err(|e| SpcountError::io(format!("failed to read line {line_num}"), e))?;
            let trimmed = line.trim();

            if line_num == 1 && trimmed.starts_with(MTX_BANNER) {
                field = parse_mtx_banner(trimmed, line_num)?;
                continue;
            }
            if trimmed.is_empty() || trimmed.starts_with(MTX_COMMENT_MARKER) {
                continue;
            }

            match declared {
                None => {
                    let mut metadata = parse_size_line(trimmed, line_num)?;
                    metadata.row_names = row_names.take().unwrap_or_default();
                    metadata.col_names = col_names.take().unwrap_or_default();
                    metadata.reconcile_labels();
                    tracing::debug!(
                        nrow = metadata.nrow,
                        ncol = metadata.ncol,
                        nnz = metadata.nval,
                        ?field,
                        "parsed Matrix-Market header"
                    );
                    declared = Some(metadata.nval);
                    builder.init(metadata)?;
                }
                Some(_) => {
                    if let Some(entry) = parse_entry(trimmed, line_num, field)? {
                        builder.add_entry(entry)?;
                        accepted += 1;
                    }
                }
            }
        }

        let declared =
            declared.ok_or_else(|| SpcountError::format(last_line, "missing Matrix-Market size line"))?;
        if accepted != declared {
            return Err(SpcountError::Consistency {
                what: "Matrix-Market entry count",
                expected: declared,
                actual: accepted,
            });
        }
        Ok(())
    }
}
