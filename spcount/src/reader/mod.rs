//! Format readers
//!
//! Each reader decodes one input into metadata plus a stream of nonzero
//! entries and drives a [`spcount_core::MatrixBuilder`] with them.

pub mod csc;
pub mod csv;
pub mod mtx;
pub mod tenx;
pub mod text;

pub use self::csc::{CscDatasetPaths, CscReader};
pub use self::csv::CsvReader;
pub use self::mtx::MtxReader;
pub use self::tenx::TenxBundle;
pub use self::text::open_text;
