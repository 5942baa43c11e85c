use std::fmt;

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
  /// The background sweeper was configured with a zero tick interval,
  /// which would busy-loop. Omit `sweep_interval` to disable the sweeper
  /// instead.
  ZeroSweepInterval,
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::ZeroSweepInterval => write!(f, "sweep interval cannot be zero"),
    }
  }
}

impl std::error::Error for BuildError {}
