/*!
 * Process Table
 * Owns all process control blocks and the lifecycle state machine
 */

use super::types::{ProcessError, ProcessInfo, ProcessResult, ProcessState};
use crate::core::types::{Cycle, Pid, Priority};
use crate::resources::{ResourcePool, ResourceResult};
use dashmap::DashMap;
use log::info;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// CPU units a process occupies for its whole lifetime
const CPU_UNITS_PER_PROCESS: u32 = 1;

/// Table of all processes, live and terminated
///
/// Pids are monotonic and never reused. Resource accounting is tied to the
/// lifecycle: a grant happens exactly once at creation and is released
/// exactly once, at termination.
pub struct ProcessTable {
    processes: Arc<DashMap<Pid, ProcessInfo>>,
    next_pid: Arc<AtomicU32>,
    pool: ResourcePool,
}

impl ProcessTable {
    pub fn new(pool: ResourcePool) -> Self {
        Self {
            processes: Arc::new(DashMap::new()),
            next_pid: Arc::new(AtomicU32::new(1)),
            pool,
        }
    }

    /// Create a process in READY, granting 1 CPU unit plus the requested
    /// memory
    ///
    /// On allocation failure nothing is created and no pid is consumed; the
    /// pool reports which resource did not fit.
    pub fn create(
        &self,
        priority: Priority,
        memory: u32,
        cpu_burst: u32,
        cycle: Cycle,
    ) -> ResourceResult<Pid> {
        self.pool.try_allocate(CPU_UNITS_PER_PROCESS, memory)?;

        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let process = ProcessInfo::new(pid, priority, memory, cpu_burst, cycle);
        self.processes.insert(pid, process);

        info!(
            "Process {} created (priority: {}, memory: {}, burst: {})",
            pid, priority, memory, cpu_burst
        );
        Ok(pid)
    }

    pub fn get(&self, pid: Pid) -> Option<ProcessInfo> {
        self.processes.get(&pid).map(|p| p.value().clone())
    }

    pub fn state(&self, pid: Pid) -> ProcessResult<ProcessState> {
        self.processes
            .get(&pid)
            .map(|p| p.state)
            .ok_or(ProcessError::NotFound(pid))
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    /// Move a process along a legal edge of the state machine
    pub fn transition(&self, pid: Pid, to: ProcessState) -> ProcessResult<()> {
        let mut process = self
            .processes
            .get_mut(&pid)
            .ok_or(ProcessError::NotFound(pid))?;

        if !process.state.can_transition(to) {
            return Err(ProcessError::InvalidTransition {
                pid,
                from: process.state,
                to,
            });
        }

        process.state = to;
        Ok(())
    }

    /// Dispatch: READY -> RUNNING, resetting the quantum counter
    pub fn record_dispatch(&self, pid: Pid, quantum: u32) -> ProcessResult<()> {
        self.transition(pid, ProcessState::Running)?;
        if let Some(mut process) = self.processes.get_mut(&pid) {
            process.quantum_remaining = quantum;
        }
        Ok(())
    }

    /// Consume one cycle of CPU for the running process
    ///
    /// Returns (burst_remaining, quantum_remaining) after the decrement. The
    /// quantum counter only ticks when the active policy asks for it.
    pub fn consume_cycle(&self, pid: Pid, tick_quantum: bool) -> ProcessResult<(u32, u32)> {
        let mut process = self
            .processes
            .get_mut(&pid)
            .ok_or(ProcessError::NotFound(pid))?;

        process.cpu_burst_remaining = process.cpu_burst_remaining.saturating_sub(1);
        if tick_quantum {
            process.quantum_remaining = process.quantum_remaining.saturating_sub(1);
        }
        Ok((process.cpu_burst_remaining, process.quantum_remaining))
    }

    /// Terminate from any non-TERMINATED state, releasing exactly the
    /// granted resources
    pub fn terminate(&self, pid: Pid) -> ProcessResult<()> {
        let released = {
            let mut process = self
                .processes
                .get_mut(&pid)
                .ok_or(ProcessError::NotFound(pid))?;

            if !process.state.can_transition(ProcessState::Terminated) {
                return Err(ProcessError::InvalidTransition {
                    pid,
                    from: process.state,
                    to: ProcessState::Terminated,
                });
            }

            process.state = ProcessState::Terminated;
            std::mem::take(&mut process.memory_held)
        };

        self.pool.release(CPU_UNITS_PER_PROCESS, released);
        info!("Process {} terminated ({} memory units released)", pid, released);
        Ok(())
    }

    /// All control blocks, ordered by pid (for display)
    pub fn list(&self) -> Vec<ProcessInfo> {
        let mut all: Vec<ProcessInfo> = self.processes.iter().map(|p| p.value().clone()).collect();
        all.sort_by_key(|p| p.pid);
        all
    }

    /// Sum of memory held by non-terminated processes
    pub fn memory_held_total(&self) -> u32 {
        self.processes
            .iter()
            .filter(|p| p.state != ProcessState::Terminated)
            .map(|p| p.memory_held)
            .sum()
    }
}

impl Clone for ProcessTable {
    fn clone(&self) -> Self {
        Self {
            processes: Arc::clone(&self.processes),
            next_pid: Arc::clone(&self.next_pid),
            pool: self.pool.clone(),
        }
    }
}
