//! Process exit codes for the `promptitecture` / `pt` binaries.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// General error (unspecified)
pub const EXIT_ERROR: i32 = 1;

/// Configuration error (missing or invalid config)
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Network error (bind failure, connection refused, bad response)
pub const EXIT_NETWORK_ERROR: i32 = 4;

/// Invalid input (bad arguments, unknown names)
pub const EXIT_INVALID_INPUT: i32 = 6;
