//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod trace;
pub mod utils;

// Re-export main command functions
pub use models::TraceArgs;
pub use trace::{build_config, execute_trace, validate_args};
pub use utils::{display_permissions, display_version, validate_report_file};
