//! Shared defaults and environment variable names.

// -------- Checkpoints --------
/// Default number of retained checkpoints when none is configured.
pub const DEFAULT_MAX_CHECKPOINTS: usize = 10;

/// Environment override for the checkpoint retention bound.
pub const ENV_MAX_CHECKPOINTS: &str = "TRELLIS_MAX_CHECKPOINTS";
