//! Field parsing for the text formats
//!
//! Pure parsing functions shared by the CSV and Matrix-Market readers. They
//! return `None` on malformed input and leave error reporting, which needs
//! the line and column, to the caller.

use crate::format::constants::MTX_BANNER;
use crate::{Result, SpcountError};

/// Parse an unsigned decimal integer made only of ASCII digits
///
/// Signs, whitespace and exponents are rejected.
pub fn parse_usize(s: &str) -> Option<usize> {
    if s.is_empty() {
        return None;
    }

    let mut result: usize = 0;
    for byte in s.bytes() {
        if !byte.is_ascii_digit() {
            return None;
        }
        let digit = (byte - b'0') as usize;
        result = result.checked_mul(10)?.checked_add(digit)?;
    }
    Some(result)
}

/// Parse a field that must hold an integral number
///
/// Accepts plain integers (`-3`, `42`) as well as integral floating-point
/// spellings (`3.0`, `1e2`). Returns `None` for empty, non-numeric,
/// non-finite or fractional fields.
pub fn parse_integral(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(value) = s.parse::<i64>() {
        return Some(value);
    }
    let value = s.parse::<f64>().ok()?;
    if !value.is_finite() || value.trunc() != value {
        return None;
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

/// Parse a matrix value, reporting its location on failure
///
/// The value must be integral and fit in an `i32`.
pub fn parse_value_field(s: &str, line: usize, column: usize) -> Result<i32> {
    parse_integral(s)
        .and_then(|value| i32::try_from(value).ok())
        .ok_or_else(|| SpcountError::Value {
            line,
            column,
            value: s.to_string(),
        })
}

/// Value field declared by a Matrix-Market banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtxField {
    /// Each triple carries an integer value
    Integer,
    /// Entries carry no value; every stored entry is 1
    Pattern,
}

impl MtxField {
    /// Number of whitespace-separated fields on an entry line
    pub const fn fields_per_entry(self) -> usize {
        match self {
            MtxField::Integer => 3,
            MtxField::Pattern => 2,
        }
    }
}

/// Parse a `%%MatrixMarket matrix coordinate <field> general` banner
///
/// Only coordinate matrices with integer or pattern fields and general
/// symmetry are accepted.
pub fn parse_mtx_banner(line: &str, line_num: usize) -> Result<MtxField> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some(MTX_BANNER) {
        return Err(SpcountError::format(line_num, "missing %%MatrixMarket banner"));
    }
    let rest: Vec<String> = tokens.map(str::to_ascii_lowercase).collect();
    if rest.len() != 4 {
        return Err(SpcountError::format(
            line_num,
            format!("banner has {} qualifiers instead of 4", rest.len()),
        ));
    }
    if rest[0] != "matrix" {
        return Err(SpcountError::format(
            line_num,
            format!("unsupported object {:?}", rest[0]),
        ));
    }
    if rest[1] != "coordinate" {
        return Err(SpcountError::format(
            line_num,
            format!("unsupported format {:?}; only coordinate is read", rest[1]),
        ));
    }
    let field = match rest[2].as_str() {
        "integer" => MtxField::Integer,
        "pattern" => MtxField::Pattern,
        other => {
            return Err(SpcountError::format(
                line_num,
                format!("unsupported field {other:?}; expected integer or pattern"),
            ))
        }
    };
    if rest[3] != "general" {
        return Err(SpcountError::format(
            line_num,
            format!("unsupported symmetry {:?}", rest[3]),
        ));
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;

    #[test]
    fn test_parse_usize() {
        assert_eq!(parse_usize("0"), Some(0));
        assert_eq!(parse_usize("123"), Some(123));
        assert_eq!(parse_usize("999999"), Some(999999));

        assert_eq!(parse_usize(""), None);
        assert_eq!(parse_usize("abc"), None);
        assert_eq!(parse_usize("12a"), None);
        assert_eq!(parse_usize("-123"), None);
        assert_eq!(parse_usize("99999999999999999999999"), None);
    }

    #[test]
    fn test_parse_integral() {
        assert_eq!(parse_integral("7"), Some(7));
        assert_eq!(parse_integral(" -2 "), Some(-2));
        assert_eq!(parse_integral("3.0"), Some(3));
        assert_eq!(parse_integral("1e2"), Some(100));
        assert_eq!(parse_integral("0"), Some(0));

        assert_eq!(parse_integral("1.5"), None);
        assert_eq!(parse_integral(""), None);
        assert_eq!(parse_integral("NaN"), None);
        assert_eq!(parse_integral("inf"), None);
        assert_eq!(parse_integral("x"), None);
    }

    #[test]
    fn test_parse_value_field() {
        assert_eq!(parse_value_field("5", 2, 3).unwrap(), 5);

        let err = parse_value_field("1.5", 4, 3).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Value);
        assert!(matches!(
            err,
            SpcountError::Value { line: 4, column: 3, ref value } if value == "1.5"
        ));

        // Out of i32 range
        assert!(parse_value_field("4294967296", 1, 1).is_err());
    }

    #[test]
    fn test_parse_mtx_banner() {
        assert_eq!(
            parse_mtx_banner("%%MatrixMarket matrix coordinate integer general", 1).unwrap(),
            MtxField::Integer
        );
        assert_eq!(
            parse_mtx_banner("%%MatrixMarket Matrix Coordinate Pattern General", 1).unwrap(),
            MtxField::Pattern
        );

        for banner in [
            "%%MatrixMarket matrix array integer general",
            "%%MatrixMarket matrix coordinate real general",
            "%%MatrixMarket matrix coordinate integer symmetric",
            "%%MatrixMarket vector coordinate integer general",
            "%%MatrixMarket matrix coordinate",
        ] {
            let err = parse_mtx_banner(banner, 1).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Format, "{banner}");
        }
    }
}
