/*!
 * Scheduler Types
 * Scheduling policies and scheduler errors
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Cannot change policy while a process is running")]
    PolicyChangeWhileRunning,

    #[error("Round Robin quantum must be at least 1, got {0}")]
    InvalidQuantum(u32),
}

/// Scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// First-come-first-served: strict FIFO, runs to completion or block
    Fcfs,
    /// Rotation with a fixed time quantum; preempted processes go to the
    /// back of the queue
    RoundRobin { quantum: u32 },
    /// Shortest job first: smallest remaining burst wins, non-preemptive
    Sjf,
    /// Numerically smallest priority value wins, non-preemptive
    Priority,
}

impl Policy {
    /// Quantum granted at dispatch (zero outside Round Robin)
    pub fn quantum(&self) -> u32 {
        match self {
            Policy::RoundRobin { quantum } => *quantum,
            _ => 0,
        }
    }

    /// Whether the clock may preempt a running process
    pub fn is_preemptive(&self) -> bool {
        matches!(self, Policy::RoundRobin { .. })
    }
}

/// Scheduler statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub total_dispatched: u64,
    pub preemptions: u64,
}
