/*!
 * Inter-Process Communication (IPC)
 * Direct messaging and semaphore-based synchronization
 */

pub mod mailbox;
pub mod semaphore;
pub mod types;

pub use mailbox::MailboxRegistry;
pub use semaphore::{AcquireOutcome, ReleaseOutcome, SemaphoreInfo, SemaphoreTable};
pub use types::{IpcError, IpcResult, Message};

use crate::core::types::{Cycle, Pid, SimResult};
use crate::process::{ProcessError, ProcessState, ProcessTable};
use crate::scheduler::Scheduler;
use log::info;

/// Synchronization manager
///
/// Owns the mailbox and semaphore registries and wires their blocking
/// semantics into the process table and ready queue: a blocked acquire
/// leaves the CPU and the ready queue, a release hands the slot to the
/// front-most waiter and requeues it at the back.
pub struct SyncManager {
    mailboxes: MailboxRegistry,
    semaphores: SemaphoreTable,
    table: ProcessTable,
    scheduler: Scheduler,
}

impl SyncManager {
    pub fn new(table: ProcessTable, scheduler: Scheduler, mailbox_capacity: Option<usize>) -> Self {
        Self {
            mailboxes: MailboxRegistry::new(mailbox_capacity),
            semaphores: SemaphoreTable::new(),
            table,
            scheduler,
        }
    }

    /// Open the mailbox of a newly created process
    pub fn register(&self, pid: Pid) {
        self.mailboxes.open(pid);
    }

    /// Forget a terminated process: drop its mailbox and remove it from
    /// every semaphore wait queue
    pub fn forget(&self, pid: Pid) {
        self.mailboxes.close(pid);
        self.semaphores.remove_waiter(pid);
    }

    /// Pull a process out of any semaphore wait queue, leaving its mailbox
    /// intact (operator resume of a blocked process)
    pub fn cancel_wait(&self, pid: Pid) {
        self.semaphores.remove_waiter(pid);
    }

    /// Send a message; the sender never waits
    pub fn send(&self, from: Pid, to: Pid, payload: &str, cycle: Cycle) -> IpcResult<()> {
        if !self.table.contains(from) {
            return Err(IpcError::ProcessNotFound(from));
        }
        match self.table.state(to) {
            Err(_) => return Err(IpcError::ProcessNotFound(to)),
            Ok(ProcessState::Terminated) => return Err(IpcError::RecipientGone(to)),
            Ok(_) => {}
        }
        self.mailboxes.deliver(Message::new(from, to, payload, cycle))
    }

    /// Non-blocking poll of the oldest pending message
    ///
    /// Blocking receive is modeled by the caller suspending the process and
    /// retrying after resume.
    pub fn receive(&self, pid: Pid) -> IpcResult<Message> {
        if !self.table.contains(pid) {
            return Err(IpcError::ProcessNotFound(pid));
        }
        self.mailboxes.fetch(pid)
    }

    pub fn peek(&self, pid: Pid) -> Vec<Message> {
        self.mailboxes.peek(pid)
    }

    pub fn mailbox_depth(&self, pid: Pid) -> usize {
        self.mailboxes.depth(pid)
    }

    pub fn create_semaphore(&self, name: &str, initial: u32) -> IpcResult<()> {
        self.semaphores.create(name, initial)
    }

    /// Acquire a semaphore on behalf of a process
    ///
    /// When the counter is zero the process blocks: WAITING, appended to
    /// the semaphore's FIFO wait queue, removed from the ready queue and
    /// the CPU slot. This is the sole event-driven blocking point in the
    /// simulation.
    pub fn acquire(&self, name: &str, pid: Pid) -> SimResult<AcquireOutcome> {
        let state = self.table.state(pid)?;
        if !matches!(state, ProcessState::Ready | ProcessState::Running) {
            // A WAITING or TERMINATED process holds no CPU and cannot block
            return Err(ProcessError::InvalidTransition {
                pid,
                from: state,
                to: ProcessState::Waiting,
            }
            .into());
        }

        let outcome = self.semaphores.try_acquire(name, pid)?;
        if outcome == AcquireOutcome::Blocked {
            // The transition is legal from both READY and RUNNING; a failure
            // here means the wait queue and table disagree.
            self.table
                .transition(pid, ProcessState::Waiting)
                .unwrap_or_else(|e| panic!("semaphore wait queue out of sync: {e}"));
            self.scheduler.dequeue_if_present(pid);
            self.scheduler.clear_current(pid);
            info!("Process {} blocked on semaphore '{}'", pid, name);
        }
        Ok(outcome)
    }

    /// Release a semaphore
    ///
    /// With waiters present the front-most one is woken (WAITING -> READY,
    /// back of the ready queue) and the counter stays untouched; otherwise
    /// the counter increments.
    pub fn release(&self, name: &str) -> IpcResult<ReleaseOutcome> {
        let outcome = self.semaphores.release(name)?;
        if let ReleaseOutcome::Woke(pid) = outcome {
            self.table
                .transition(pid, ProcessState::Ready)
                .unwrap_or_else(|e| panic!("semaphore wait queue out of sync: {e}"));
            self.scheduler.enqueue(pid);
            info!("Process {} resumed by release of '{}'", pid, name);
        }
        Ok(outcome)
    }

    /// All semaphores for display
    pub fn semaphores(&self) -> Vec<SemaphoreInfo> {
        self.semaphores.list()
    }
}

impl Clone for SyncManager {
    fn clone(&self) -> Self {
        Self {
            mailboxes: self.mailboxes.clone(),
            semaphores: self.semaphores.clone(),
            table: self.table.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}
