//! Exit status for learnctl

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for any failure; the report is all-or-nothing
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Single user-facing failure line
pub const GENERIC_FAILURE: &str = "Failed to load dashboard data.";
