/*!
 * Error Types
 * Centralized error aggregation with thiserror and serde support
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export module-level errors
pub use crate::ipc::IpcError;
pub use crate::process::ProcessError;
pub use crate::resources::ResourceError;
pub use crate::scheduler::SchedulerError;

/// Top-level error for the public command surface
///
/// Every variant is recoverable: the operation is rejected and reported, the
/// simulation state is unchanged. The only fatal path in the kernel is an
/// internal accounting violation, which panics instead of returning.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Ipc(#[from] IpcError),
}
