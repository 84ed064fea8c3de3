/*!
 * Semaphores
 * Named counting semaphores with FIFO-fair wait queues
 */

use super::types::{IpcError, IpcResult};
use crate::core::types::Pid;
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Outcome of an acquire attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The counter was positive; decremented, caller proceeds
    Acquired,
    /// The counter was zero; caller appended to the wait queue
    Blocked,
}

/// Outcome of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Front-most waiter handed the slot directly; counter untouched
    Woke(Pid),
    /// No waiters; counter incremented
    Incremented(u32),
}

/// Read-only view of one semaphore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SemaphoreInfo {
    pub name: String,
    pub value: u32,
    pub waiters: Vec<Pid>,
}

#[derive(Debug)]
struct Semaphore {
    value: u32,
    waiters: VecDeque<Pid>,
}

/// Registry of named counting semaphores
///
/// Pure counter and queue bookkeeping: the value never goes negative, a
/// blocked acquire joins the FIFO wait queue instead, and a release with
/// waiters hands the slot to the front-most one without incrementing, so no
/// third party can steal it between increment and wake-up.
pub struct SemaphoreTable {
    semaphores: Arc<RwLock<HashMap<String, Semaphore>>>,
}

impl SemaphoreTable {
    pub fn new() -> Self {
        Self {
            semaphores: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn create(&self, name: &str, initial: u32) -> IpcResult<()> {
        let mut semaphores = self.semaphores.write();
        if semaphores.contains_key(name) {
            return Err(IpcError::DuplicateName(name.to_string()));
        }
        semaphores.insert(
            name.to_string(),
            Semaphore {
                value: initial,
                waiters: VecDeque::new(),
            },
        );
        info!("Semaphore '{}' created (initial: {})", name, initial);
        Ok(())
    }

    /// P operation on the counter
    pub fn try_acquire(&self, name: &str, pid: Pid) -> IpcResult<AcquireOutcome> {
        let mut semaphores = self.semaphores.write();
        let sem = semaphores
            .get_mut(name)
            .ok_or_else(|| IpcError::SemaphoreNotFound(name.to_string()))?;

        if sem.value > 0 {
            sem.value -= 1;
            Ok(AcquireOutcome::Acquired)
        } else {
            sem.waiters.push_back(pid);
            Ok(AcquireOutcome::Blocked)
        }
    }

    /// V operation on the counter
    pub fn release(&self, name: &str) -> IpcResult<ReleaseOutcome> {
        let mut semaphores = self.semaphores.write();
        let sem = semaphores
            .get_mut(name)
            .ok_or_else(|| IpcError::SemaphoreNotFound(name.to_string()))?;

        match sem.waiters.pop_front() {
            Some(pid) => Ok(ReleaseOutcome::Woke(pid)),
            None => {
                sem.value += 1;
                Ok(ReleaseOutcome::Incremented(sem.value))
            }
        }
    }

    /// Remove a terminated process from every wait queue
    pub fn remove_waiter(&self, pid: Pid) {
        let mut semaphores = self.semaphores.write();
        for sem in semaphores.values_mut() {
            sem.waiters.retain(|&p| p != pid);
        }
    }

    /// All semaphores for display, ordered by name
    pub fn list(&self) -> Vec<SemaphoreInfo> {
        let semaphores = self.semaphores.read();
        let mut all: Vec<SemaphoreInfo> = semaphores
            .iter()
            .map(|(name, sem)| SemaphoreInfo {
                name: name.clone(),
                value: sem.value,
                waiters: sem.waiters.iter().copied().collect(),
            })
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

impl Default for SemaphoreTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SemaphoreTable {
    fn clone(&self) -> Self {
        Self {
            semaphores: Arc::clone(&self.semaphores),
        }
    }
}
