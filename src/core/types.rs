/*!
 * Core Types
 * Common types used across the simulation kernel
 */

/// Process ID type
pub type Pid = u32;

/// Discrete simulated time unit
pub type Cycle = u64;

/// Process priority (informational under FCFS/Round Robin; lower is more
/// important under the Priority policy)
pub type Priority = u8;

/// Common result type for kernel operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
