/*!
 * Simulation Types
 * Cycle outcomes and status snapshots for display
 */

use crate::core::types::{Cycle, Pid};
use crate::ipc::SemaphoreInfo;
use crate::process::ProcessInfo;
use crate::resources::PoolSnapshot;
use crate::scheduler::{Policy, SchedulerStats};
use serde::{Deserialize, Serialize};

/// What one simulated cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// No runnable and no running process
    Idle,
    /// The running process consumed one cycle and keeps the CPU
    Ran { pid: Pid, burst_remaining: u32 },
    /// The running process exhausted its burst and terminated
    Completed { pid: Pid },
    /// Quantum expired with work remaining; back of the queue
    Preempted { pid: Pid },
}

/// Full status snapshot for the console view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SystemSnapshot {
    pub cycle: Cycle,
    pub policy: Policy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<Pid>,
    pub ready_queue: Vec<Pid>,
    pub processes: Vec<ProcessInfo>,
    pub resources: PoolSnapshot,
    pub semaphores: Vec<SemaphoreInfo>,
    pub scheduler_stats: SchedulerStats,
}
