/*!
 * Process Types
 * Process control block, state machine, and process errors
 */

use crate::core::types::{Cycle, Pid, Priority};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProcessError {
    #[error("Process {0} not found")]
    NotFound(Pid),

    #[error("Invalid state transition for process {pid}: {from:?} -> {to:?}")]
    InvalidTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },
}

/// Process lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created but not yet admitted
    New,
    /// Eligible for dispatch
    Ready,
    /// Currently holding the CPU
    Running,
    /// Blocked on a semaphore or explicitly suspended
    Waiting,
    /// Finished; resources released
    Terminated,
}

impl ProcessState {
    /// Explicit transition table; disallowed edges are rejected rather than
    /// trusted to callers.
    pub fn can_transition(self, to: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, to),
            (New, Ready)
                | (Ready, Running)
                | (Ready, Waiting)
                | (Running, Ready)
                | (Running, Waiting)
                | (Waiting, Ready)
                | (New | Ready | Running | Waiting, Terminated)
        )
    }
}

/// Process control block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    pub state: ProcessState,
    pub priority: Priority,
    pub memory_requested: u32,
    pub memory_held: u32,
    pub cpu_burst_remaining: u32,
    /// Meaningful only under Round Robin; reset to the configured quantum at
    /// each dispatch
    pub quantum_remaining: u32,
    pub created_at: Cycle,
}

impl ProcessInfo {
    pub fn new(pid: Pid, priority: Priority, memory: u32, cpu_burst: u32, cycle: Cycle) -> Self {
        Self {
            pid,
            state: ProcessState::Ready,
            priority,
            memory_requested: memory,
            memory_held: memory,
            cpu_burst_remaining: cpu_burst,
            quantum_remaining: 0,
            created_at: cycle,
        }
    }
}
