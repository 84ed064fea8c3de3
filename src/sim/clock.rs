/*!
 * Simulation Clock
 * Drives discrete cycles: dispatch, burst consumption, completion, preemption
 */

use super::events::{EventKind, EventLog};
use super::types::CycleOutcome;
use crate::core::types::Cycle;
use crate::ipc::SyncManager;
use crate::process::ProcessTable;
use crate::scheduler::Scheduler;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Discrete cycle driver
///
/// One `advance_cycle` call is one unit of simulated time: at most one
/// process occupies the CPU, and all of its consequences (burst decrement,
/// natural completion, quantum expiry) are applied before the call returns.
pub struct SimulationClock {
    table: ProcessTable,
    scheduler: Scheduler,
    sync: SyncManager,
    events: EventLog,
    cycle: Arc<AtomicU64>,
}

impl SimulationClock {
    pub fn new(
        table: ProcessTable,
        scheduler: Scheduler,
        sync: SyncManager,
        events: EventLog,
    ) -> Self {
        Self {
            table,
            scheduler,
            sync,
            events,
            cycle: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current simulated time
    pub fn cycle(&self) -> Cycle {
        self.cycle.load(Ordering::SeqCst)
    }

    /// Advance simulated time by one cycle
    ///
    /// A dispatch and the dispatched process's first burst decrement happen
    /// within the same cycle. Burst exhaustion is checked before quantum
    /// exhaustion, so a process finishing on its last quantum cycle
    /// terminates instead of being preempted.
    pub fn advance_cycle(&self) -> CycleOutcome {
        let cycle = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;

        if self.scheduler.current().is_none() {
            if let Some(pid) = self.scheduler.pick_next() {
                self.events.append(
                    cycle,
                    EventKind::Dispatched,
                    Some(pid),
                    format!("dispatched under {:?}", self.scheduler.policy()),
                );
            }
        }

        let Some(pid) = self.scheduler.current() else {
            return CycleOutcome::Idle;
        };

        let policy = self.scheduler.policy();
        let (burst, quantum) = self
            .table
            .consume_cycle(pid, policy.is_preemptive())
            .unwrap_or_else(|e| panic!("CPU slot out of sync with process table: {e}"));

        if burst == 0 {
            self.scheduler.clear_current(pid);
            self.table
                .terminate(pid)
                .unwrap_or_else(|e| panic!("running process could not terminate: {e}"));
            self.sync.forget(pid);
            self.events
                .append(cycle, EventKind::Terminated, Some(pid), "burst exhausted");
            return CycleOutcome::Completed { pid };
        }

        if policy.is_preemptive() && quantum == 0 {
            self.scheduler.preempt(pid);
            self.events.append(
                cycle,
                EventKind::Preempted,
                Some(pid),
                format!("quantum expired, {} burst cycles left", burst),
            );
            return CycleOutcome::Preempted { pid };
        }

        CycleOutcome::Ran {
            pid,
            burst_remaining: burst,
        }
    }

    /// Advance n cycles, collecting per-cycle outcomes for display
    pub fn run(&self, cycles: u64) -> Vec<CycleOutcome> {
        (0..cycles).map(|_| self.advance_cycle()).collect()
    }
}

impl Clone for SimulationClock {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            scheduler: self.scheduler.clone(),
            sync: self.sync.clone(),
            events: self.events.clone(),
            cycle: Arc::clone(&self.cycle),
        }
    }
}
