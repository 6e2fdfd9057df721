//! Builder and reader interfaces
//!
//! A builder accumulates entries under a two-phase lifecycle: `init` once,
//! `add_entry` repeatedly, then `finalize`, which consumes the builder. A
//! reader drives a builder through `init` and `add_entry`; the caller
//! finalizes.

use crate::format::{MatrixMetadata, NonZeroEntry};
use crate::{Result, SpcountError};

/// Runtime lifecycle state of a builder
///
/// The finalized state needs no tag: `finalize` takes the builder by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderState {
    #[default]
    Uninitialized,
    Initialized,
}

impl BuilderState {
    /// Transition to `Initialized`, rejecting a second `init`
    pub fn begin(&mut self) -> Result<()> {
        match self {
            BuilderState::Uninitialized => {
                *self = BuilderState::Initialized;
                Ok(())
            }
            BuilderState::Initialized => Err(SpcountError::Usage("init called twice")),
        }
    }

    /// Require the `Initialized` state for the named operation
    pub fn require_initialized(&self, operation: &'static str) -> Result<()> {
        match self {
            BuilderState::Initialized => Ok(()),
            BuilderState::Uninitialized => Err(SpcountError::Usage(operation)),
        }
    }
}

/// Accumulates nonzero entries into a sparse representation
pub trait MatrixBuilder {
    /// The immutable representation produced by `finalize`
    type Output;

    /// Validate metadata, preallocate, and enter the `Initialized` state
    fn init(&mut self, metadata: MatrixMetadata) -> Result<()>;

    /// Append one entry, checking it against the declared extent
    fn add_entry(&mut self, entry: NonZeroEntry) -> Result<()>;

    /// Check the declared nonzero count and produce the representation
    fn finalize(self) -> Result<Self::Output>;
}

/// Decodes one input into metadata plus a stream of nonzero entries
pub trait FormatReader {
    /// Drive `builder` through `init` and one `add_entry` per nonzero
    fn read_into<B: MatrixBuilder>(self, builder: &mut B) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;

    #[test]
    fn test_state_transitions() {
        let mut state = BuilderState::default();
        assert_eq!(
            state.require_initialized("add_entry before init").unwrap_err().category(),
            ErrorCategory::Usage
        );
        state.begin().unwrap();
        assert!(state.require_initialized("add_entry before init").is_ok());
        assert_eq!(state.begin().unwrap_err().category(), ErrorCategory::Usage);
    }
}
