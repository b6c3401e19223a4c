use std::io;

use thiserror::Error;

/// Errors reported by [`Arena`](crate::Arena) operations.
///
/// [`ArenaError::Os`] is an environment failure (the OS refused to map,
/// protect or unmap memory, or could not report its page size). Everything
/// else is a usage or capacity condition the caller is expected to handle.
#[derive(Debug, Error)]
pub enum ArenaError {
  #[error("{op} failed: {source}")]
  Os {
    op: &'static str,
    #[source]
    source: io::Error,
  },

  #[error("invalid alignment {0}: must be a power of two that fits in the region")]
  InvalidAlignment(usize),

  #[error("invalid allocation size {0}")]
  InvalidSize(usize),

  #[error("invalid element size {0}")]
  InvalidElementSize(usize),

  #[error("arena exhausted: requested {requested} bytes, {remaining} remaining")]
  Exhausted { requested: usize, remaining: usize },

  #[error("offset {offset} outside of [{start}, {end}]")]
  OutOfRange {
    offset: usize,
    start: usize,
    end: usize,
  },

  #[error("operation requires a typed arena")]
  NotTyped,

  #[error("slot at offset {0} is already free")]
  DoubleFree(usize),
}

impl ArenaError {
  /// Captures `errno` for a failed libc call.
  pub(crate) fn last_os(op: &'static str) -> Self {
    ArenaError::Os {
      op,
      source: io::Error::last_os_error(),
    }
  }

  /// `true` for environment failures that retrying will not fix.
  pub fn is_fatal(&self) -> bool {
    matches!(self, ArenaError::Os { .. })
  }
}
