//! Outcome accumulator for multi-step register sequences
//!
//! Some operations are a chain of bus transfers: the mode change writes, or the
//! reads of a FIFO batch. A failing step does not abort the chain: every
//! following step is still attempted and the combined result reports which
//! steps failed.

use crate::Error;

/// Tracks the outcome of each step of a register sequence
///
/// Every step carries a fixed number, so a step that is skipped leaves its bit
/// clear instead of shifting the ones after it.
pub(crate) struct Steps<E> {
    attempted: u8,
    failed: u128,
    first: Option<E>,
}

impl<E> Steps<E> {
    pub(crate) const fn new() -> Self {
        Self {
            attempted: 0,
            failed: 0,
            first: None,
        }
    }

    /// Record the result of step `step` (0..128), returning its value on success
    pub(crate) fn record<T>(&mut self, step: u8, result: Result<T, E>) -> Option<T> {
        self.attempted = self.attempted.saturating_add(1);
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.failed |= 1u128.checked_shl(u32::from(step)).unwrap_or(0);
                if self.first.is_none() {
                    self.first = Some(e);
                }
                None
            }
        }
    }

    /// Number of steps recorded so far
    #[cfg(test)]
    pub(crate) const fn attempted(&self) -> u8 {
        self.attempted
    }

    /// Combine all step outcomes into one result
    ///
    /// # Errors
    ///
    /// Returns [`Error::PartiallyApplied`] if any recorded step failed.
    pub(crate) fn finish(self) -> Result<(), Error<E>> {
        match self.first {
            None => Ok(()),
            Some(source) => Err(Error::PartiallyApplied {
                failed_steps: self.failed,
                attempted_steps: self.attempted,
                source,
            }),
        }
    }
}
