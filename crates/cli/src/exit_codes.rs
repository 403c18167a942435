//! CLI Exit Code Registry
//!
//! Single source of truth for `pmatch` exit codes. Scripts rely on them.
//!
//! | Code | Description                                         |
//! |------|-----------------------------------------------------|
//! | 0    | Success                                             |
//! | 1    | General error (unspecified)                         |
//! | 2    | CLI usage error (bad args)                          |
//! | 3    | `check --strict`: LOW-tier or flagged groups found  |
//! | 4    | Dataset could not be read or decoded                |
//! | 5    | Config could not be read, parsed or validated       |
//! | 6    | Output (JSON/CSV) could not be written              |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Strict mode found groups that need review.
pub const EXIT_QUALITY_FLAGGED: u8 = 3;

/// Dataset load failure. Fatal: no report is produced.
pub const EXIT_DATASET: u8 = 4;

/// Invalid or unreadable config.
pub const EXIT_CONFIG: u8 = 5;

/// Output write failure.
pub const EXIT_OUTPUT: u8 = 6;
