/*!
 * Simulation Kernel
 * Composes the pool, process table, scheduler, IPC, and clock behind one
 * command surface
 */

pub mod clock;
pub mod events;
pub mod types;

pub use clock::SimulationClock;
pub use events::{EventKind, EventLog, EventRecord};
pub use types::{CycleOutcome, SystemSnapshot};

use crate::core::types::{Pid, Priority, SimResult};
use crate::ipc::{AcquireOutcome, Message, ReleaseOutcome, SyncManager};
use crate::process::{ProcessError, ProcessState, ProcessTable};
use crate::resources::ResourcePool;
use crate::scheduler::{Policy, Scheduler};
use log::info;

/// Default pool capacity
const DEFAULT_CPU_UNITS: u32 = 8;
const DEFAULT_MEMORY_UNITS: u32 = 1024;

/// The simulation kernel
///
/// Owns all simulation state as one explicit aggregate and exposes the
/// public operation set the console consumes. Every state transition emits
/// exactly one event record, in the order transitions occur.
pub struct SimKernel {
    table: ProcessTable,
    scheduler: Scheduler,
    sync: SyncManager,
    clock: SimulationClock,
    pool: ResourcePool,
    events: EventLog,
}

/// Builder for the simulation kernel
pub struct SimKernelBuilder {
    cpu_units: u32,
    memory_units: u32,
    policy: Policy,
    mailbox_capacity: Option<usize>,
}

impl SimKernelBuilder {
    pub fn new() -> Self {
        Self {
            cpu_units: DEFAULT_CPU_UNITS,
            memory_units: DEFAULT_MEMORY_UNITS,
            policy: Policy::Fcfs,
            mailbox_capacity: None,
        }
    }

    pub fn with_cpu_units(mut self, cpu_units: u32) -> Self {
        self.cpu_units = cpu_units;
        self
    }

    pub fn with_memory_units(mut self, memory_units: u32) -> Self {
        self.memory_units = memory_units;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> SimResult<SimKernel> {
        let pool = ResourcePool::new(self.cpu_units, self.memory_units);
        let table = ProcessTable::new(pool.clone());
        let scheduler = Scheduler::new(table.clone(), self.policy)?;
        let sync = SyncManager::new(table.clone(), scheduler.clone(), self.mailbox_capacity);
        let events = EventLog::new();
        let clock = SimulationClock::new(
            table.clone(),
            scheduler.clone(),
            sync.clone(),
            events.clone(),
        );

        info!(
            "Simulation kernel initialized: {} CPU units, {} memory units, {:?}",
            self.cpu_units, self.memory_units, self.policy
        );

        Ok(SimKernel {
            table,
            scheduler,
            sync,
            clock,
            pool,
            events,
        })
    }
}

impl Default for SimKernelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimKernel {
    pub fn builder() -> SimKernelBuilder {
        SimKernelBuilder::new()
    }

    /// Kernel with default capacity and FCFS scheduling
    pub fn with_defaults() -> Self {
        // Defaults are always valid
        Self::builder().build().expect("default configuration")
    }

    /// Create a process in READY and enqueue it at the back of the ready
    /// queue
    pub fn create_process(&self, priority: Priority, memory: u32, cpu_burst: u32) -> SimResult<Pid> {
        let cycle = self.clock.cycle();
        match self.table.create(priority, memory, cpu_burst, cycle) {
            Ok(pid) => {
                self.sync.register(pid);
                self.scheduler.enqueue(pid);
                self.events.append(
                    cycle,
                    EventKind::Created,
                    Some(pid),
                    format!("priority {}, memory {}, burst {}", priority, memory, cpu_burst),
                );
                Ok(pid)
            }
            Err(e) => {
                self.events
                    .append(cycle, EventKind::ResourceDenied, None, e.to_string());
                Err(e.into())
            }
        }
    }

    /// Suspend a READY or RUNNING process
    pub fn suspend(&self, pid: Pid) -> SimResult<()> {
        let state = self.table.state(pid)?;
        if !matches!(state, ProcessState::Ready | ProcessState::Running) {
            return Err(ProcessError::InvalidTransition {
                pid,
                from: state,
                to: ProcessState::Waiting,
            }
            .into());
        }

        self.table.transition(pid, ProcessState::Waiting)?;
        self.scheduler.dequeue_if_present(pid);
        self.scheduler.clear_current(pid);
        self.events.append(
            self.clock.cycle(),
            EventKind::Blocked,
            Some(pid),
            "suspended by operator",
        );
        Ok(())
    }

    /// Resume a WAITING process at the back of the ready queue
    ///
    /// Also applies to a process blocked on a semaphore: it leaves the wait
    /// queue and no longer counts toward that semaphore.
    pub fn resume(&self, pid: Pid) -> SimResult<()> {
        self.table.transition(pid, ProcessState::Ready)?;
        self.sync.cancel_wait(pid);
        self.scheduler.enqueue(pid);
        self.events.append(
            self.clock.cycle(),
            EventKind::Resumed,
            Some(pid),
            "resumed by operator",
        );
        Ok(())
    }

    /// Terminate from any non-TERMINATED state, releasing everything held
    pub fn terminate(&self, pid: Pid) -> SimResult<()> {
        self.table.terminate(pid)?;
        self.scheduler.dequeue_if_present(pid);
        self.scheduler.clear_current(pid);
        self.sync.forget(pid);
        self.events.append(
            self.clock.cycle(),
            EventKind::Terminated,
            Some(pid),
            "terminated by operator",
        );
        Ok(())
    }

    /// Change the scheduling policy (only between cycles)
    pub fn set_policy(&self, policy: Policy) -> SimResult<()> {
        self.scheduler.set_policy(policy)?;
        Ok(())
    }

    pub fn policy(&self) -> Policy {
        self.scheduler.policy()
    }

    /// Advance simulated time by one cycle
    pub fn advance_cycle(&self) -> CycleOutcome {
        self.clock.advance_cycle()
    }

    /// Advance n cycles
    pub fn run(&self, cycles: u64) -> Vec<CycleOutcome> {
        self.clock.run(cycles)
    }

    /// Send a direct message; the sender never waits
    pub fn send_message(&self, from: Pid, to: Pid, payload: &str) -> SimResult<()> {
        let cycle = self.clock.cycle();
        self.sync.send(from, to, payload, cycle)?;
        self.events.append(
            cycle,
            EventKind::MessageSent,
            Some(from),
            format!("to process {}", to),
        );
        Ok(())
    }

    /// Non-blocking receive of the oldest pending message
    pub fn receive_message(&self, pid: Pid) -> SimResult<Message> {
        let message = self.sync.receive(pid)?;
        self.events.append(
            self.clock.cycle(),
            EventKind::MessageReceived,
            Some(pid),
            format!("from process {}", message.from),
        );
        Ok(message)
    }

    /// Pending messages without consuming them
    pub fn peek_messages(&self, pid: Pid) -> Vec<Message> {
        self.sync.peek(pid)
    }

    pub fn semaphore_create(&self, name: &str, initial: u32) -> SimResult<()> {
        self.sync.create_semaphore(name, initial)?;
        Ok(())
    }

    /// Acquire a semaphore; blocks the process if the counter is zero
    pub fn semaphore_acquire(&self, name: &str, pid: Pid) -> SimResult<AcquireOutcome> {
        let outcome = self.sync.acquire(name, pid)?;
        if outcome == AcquireOutcome::Blocked {
            self.events.append(
                self.clock.cycle(),
                EventKind::Blocked,
                Some(pid),
                format!("waiting on semaphore '{}'", name),
            );
        }
        Ok(outcome)
    }

    /// Release a semaphore; wakes the front-most waiter if any
    pub fn semaphore_release(&self, name: &str) -> SimResult<ReleaseOutcome> {
        let outcome = self.sync.release(name)?;
        if let ReleaseOutcome::Woke(pid) = outcome {
            self.events.append(
                self.clock.cycle(),
                EventKind::Resumed,
                Some(pid),
                format!("woken by release of '{}'", name),
            );
        }
        Ok(outcome)
    }

    /// Full status snapshot for display
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            cycle: self.clock.cycle(),
            policy: self.scheduler.policy(),
            running: self.scheduler.current(),
            ready_queue: self.scheduler.ready_queue(),
            processes: self.table.list(),
            resources: self.pool.snapshot(),
            semaphores: self.sync.semaphores(),
            scheduler_stats: self.scheduler.stats(),
        }
    }

    /// All event records in append order
    pub fn events(&self) -> Vec<EventRecord> {
        self.events.records()
    }
}
