/*!
 * CPU Scheduler
 * Ready-queue discipline and policy-driven dispatch
 */

pub mod types;

pub use types::{Policy, SchedulerError, SchedulerResult, SchedulerStats};

use crate::core::types::Pid;
use crate::process::ProcessTable;
use log::info;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;

struct Inner {
    policy: Policy,
    ready: VecDeque<Pid>,
    current: Option<Pid>,
    stats: SchedulerStats,
}

/// CPU scheduler
///
/// The ready queue holds exactly the pids in READY state, each once, in
/// arrival order. FCFS and Round Robin pop the front; SJF and Priority
/// select out of the middle but never reorder what they leave behind, so a
/// policy switch needs no requeue.
pub struct Scheduler {
    table: ProcessTable,
    inner: Arc<RwLock<Inner>>,
}

impl Scheduler {
    pub fn new(table: ProcessTable, policy: Policy) -> SchedulerResult<Self> {
        validate(policy)?;
        info!("Scheduler initialized: policy={:?}", policy);
        Ok(Self {
            table,
            inner: Arc::new(RwLock::new(Inner {
                policy,
                ready: VecDeque::new(),
                current: None,
                stats: SchedulerStats::default(),
            })),
        })
    }

    /// Dispatch the next process according to the active policy
    ///
    /// The selected process transitions READY -> RUNNING with a fresh
    /// quantum and becomes the current occupant of the CPU slot. Returns
    /// `None` when the ready queue is empty or the CPU is already occupied.
    pub fn pick_next(&self) -> Option<Pid> {
        let mut inner = self.inner.write();
        if inner.current.is_some() {
            return None;
        }

        let index = match inner.policy {
            Policy::Fcfs | Policy::RoundRobin { .. } => {
                if inner.ready.is_empty() {
                    return None;
                }
                0
            }
            Policy::Sjf => self.select_by_key(&inner.ready, |p| p.cpu_burst_remaining)?,
            Policy::Priority => self.select_by_key(&inner.ready, |p| u32::from(p.priority))?,
        };

        let pid = inner.ready.remove(index)?;
        let quantum = inner.policy.quantum();

        // The queue invariant guarantees the pid is READY; a failure here is
        // a table/queue desync and must not go unnoticed.
        self.table
            .record_dispatch(pid, quantum)
            .unwrap_or_else(|e| panic!("ready queue out of sync with process table: {e}"));

        inner.current = Some(pid);
        inner.stats.total_dispatched += 1;
        info!("Process {} dispatched ({:?})", pid, inner.policy);
        Some(pid)
    }

    /// Index of the READY process minimizing `key`, FIFO tie-break
    fn select_by_key(&self, ready: &VecDeque<Pid>, key: impl Fn(&crate::process::ProcessInfo) -> u32) -> Option<usize> {
        ready
            .iter()
            .enumerate()
            .filter_map(|(i, &pid)| self.table.get(pid).map(|p| (i, key(&p))))
            .min_by_key(|&(i, k)| (k, i))
            .map(|(i, _)| i)
    }

    /// Append a READY process at the back of the queue
    ///
    /// A resumed or newly created process never cuts in line; duplicates are
    /// ignored to preserve the queue invariant.
    pub fn enqueue(&self, pid: Pid) {
        let mut inner = self.inner.write();
        if !inner.ready.contains(&pid) {
            inner.ready.push_back(pid);
        }
    }

    /// Remove a pid from the ready queue if present
    pub fn dequeue_if_present(&self, pid: Pid) -> bool {
        let mut inner = self.inner.write();
        if let Some(pos) = inner.ready.iter().position(|&p| p == pid) {
            inner.ready.remove(pos);
            true
        } else {
            false
        }
    }

    /// Preempt the running process: RUNNING -> READY at the BACK of the
    /// queue, after any process already waiting
    pub fn preempt(&self, pid: Pid) {
        let mut inner = self.inner.write();
        if inner.current == Some(pid) {
            self.table
                .transition(pid, crate::process::ProcessState::Ready)
                .unwrap_or_else(|e| panic!("CPU slot out of sync with process table: {e}"));
            inner.current = None;
            if !inner.ready.contains(&pid) {
                inner.ready.push_back(pid);
            }
            inner.stats.preemptions += 1;
            info!("Process {} preempted", pid);
        }
    }

    /// Free the CPU slot without requeueing (block, suspend, terminate,
    /// natural completion)
    pub fn clear_current(&self, pid: Pid) {
        let mut inner = self.inner.write();
        if inner.current == Some(pid) {
            inner.current = None;
        }
    }

    pub fn current(&self) -> Option<Pid> {
        self.inner.read().current
    }

    pub fn policy(&self) -> Policy {
        self.inner.read().policy
    }

    /// Change the active policy
    ///
    /// Permitted only between cycles, while no process is running. The
    /// queue already holds the READY pids in FIFO arrival order, which is
    /// exactly the order the new policy starts from.
    pub fn set_policy(&self, policy: Policy) -> SchedulerResult<()> {
        validate(policy)?;
        let mut inner = self.inner.write();
        if inner.current.is_some() {
            return Err(SchedulerError::PolicyChangeWhileRunning);
        }
        info!("Scheduler policy changed: {:?} -> {:?}", inner.policy, policy);
        inner.policy = policy;
        Ok(())
    }

    /// Ready queue contents in dispatch-arrival order
    pub fn ready_queue(&self) -> Vec<Pid> {
        self.inner.read().ready.iter().copied().collect()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.inner.read().stats
    }
}

fn validate(policy: Policy) -> SchedulerResult<()> {
    if let Policy::RoundRobin { quantum: 0 } = policy {
        return Err(SchedulerError::InvalidQuantum(0));
    }
    Ok(())
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}
