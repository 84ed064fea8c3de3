/*!
 * OS Simulation Kernel Library
 * Didactic operating-system simulator: process lifecycle, resource
 * accounting, scheduling, and inter-process communication over discrete
 * simulated cycles
 */

pub mod core;
pub mod ipc;
pub mod process;
pub mod resources;
pub mod scheduler;
pub mod sim;

// Re-exports
pub use crate::core::{Cycle, Pid, Priority, SimError, SimResult};
pub use ipc::{AcquireOutcome, IpcError, Message, ReleaseOutcome, SyncManager};
pub use process::{ProcessError, ProcessInfo, ProcessState, ProcessTable};
pub use resources::{PoolSnapshot, ResourceError, ResourcePool};
pub use scheduler::{Policy, Scheduler, SchedulerError, SchedulerStats};
pub use sim::{
    CycleOutcome, EventKind, EventLog, EventRecord, SimKernel, SimKernelBuilder, SimulationClock,
    SystemSnapshot,
};
