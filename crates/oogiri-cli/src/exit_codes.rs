//! Process exit codes. Part of the CLI contract.

pub const EXIT_SUCCESS: i32 = 0;
/// Generation or evaluation ended in a `Failure` value.
pub const EXIT_FAILURE: i32 = 1;
/// Bad config, missing API key, unknown id or storage error.
pub const EXIT_CONFIG_ERROR: i32 = 2;
