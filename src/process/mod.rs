/*!
 * Process Module
 * Process control blocks, state machine, and the process table
 */

pub mod table;
pub mod types;

// Re-export for convenience
pub use table::ProcessTable;
pub use types::{ProcessError, ProcessInfo, ProcessResult, ProcessState};
