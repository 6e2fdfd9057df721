//! Opening text inputs with transparent gzip decompression

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use spcount_core::{Result, SpcountError};

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Whether `bytes` start with the gzip magic number
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == GZIP_MAGIC
}

/// Open a text file for buffered reading, decompressing gzip input
///
/// Compression is detected from the file's magic bytes, so a `.gz` suffix is
/// neither required nor trusted.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)
        .map_err(|e| SpcountError::io(format!("failed to open {}", path.display()), e))?;
    let mut reader = BufReader::new(file);
    let head = reader
        .fill_buf()
        .map_err(|e| SpcountError::io(format!("failed to read {}", path.display()), e))?;

    if is_gzip(head) {
        tracing::debug!(path = %path.display(), "reading gzip-compressed input");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Read every line of a text file, decompressing gzip input
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    open_text(path)?
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| SpcountError::io(format!("failed to read {}", path.display()), e))
}

/// Read a whole text file into memory, decompressing gzip input
pub fn read_to_string(path: &Path) -> Result<String> {
    let mut text = String::new();
    open_text(path)?
        .read_to_string(&mut text)
        .map_err(|e| SpcountError::io(format!("failed to read {}", path.display()), e))?;
    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `contents` to a temp file, gzip-compressed when `gzip` is set
    pub(crate) fn write_text(suffix: &str, contents: &str, gzip: bool) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        if gzip {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(contents.as_bytes()).unwrap();
            file.write_all(&encoder.finish().unwrap()).unwrap();
        } else {
            file.write_all(contents.as_bytes()).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_plain_and_gzip_agree() {
        let plain = write_text(".txt", "a\nb\n", false);
        let gzip = write_text(".txt.gz", "a\nb\n", true);
        assert_eq!(read_lines(plain.path()).unwrap(), vec!["a", "b"]);
        assert_eq!(read_lines(gzip.path()).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_gzip_detected_without_suffix() {
        let gzip = write_text(".txt", "hello", true);
        assert_eq!(read_to_string(gzip.path()).unwrap(), "hello");
    }

    #[test]
    fn test_detect_gzip() {
        assert!(is_gzip(&[0x1F, 0x8B, 0x08]));
        assert!(!is_gzip(b"%%MatrixMarket"));
        assert!(!is_gzip(&[0x1F]));
    }

    #[test]
    fn test_missing_file() {
        let err = open_text(Path::new("/nonexistent/matrix.mtx")).err().unwrap();
        assert_eq!(err.category(), spcount_core::ErrorCategory::Io);
        assert!(err.to_string().contains("/nonexistent/matrix.mtx"));
    }
}
