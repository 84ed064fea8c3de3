/*!
 * Event Log
 * Append-only sink of structured simulation events
 */

use crate::core::types::{Cycle, Pid};
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kind of state transition an event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Dispatched,
    Preempted,
    Blocked,
    Resumed,
    Terminated,
    ResourceDenied,
    MessageSent,
    MessageReceived,
}

/// One structured event record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventRecord {
    pub cycle: Cycle,
    pub kind: EventKind,
    /// Absent for events with no associated process (a denied creation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<Pid>,
    pub detail: String,
}

/// Append-only event log
///
/// The core writes exactly one record per state transition, in the order
/// transitions occur within a cycle, and never reads the log back for
/// logic. Records are mirrored to the `log` facade as they arrive.
pub struct EventLog {
    records: Arc<RwLock<Vec<EventRecord>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn append(&self, cycle: Cycle, kind: EventKind, pid: Option<Pid>, detail: impl Into<String>) {
        let record = EventRecord {
            cycle,
            kind,
            pid,
            detail: detail.into(),
        };
        match record.pid {
            Some(pid) => info!(
                "[cycle {}] {:?} pid={} {}",
                record.cycle, record.kind, pid, record.detail
            ),
            None => info!("[cycle {}] {:?} {}", record.cycle, record.kind, record.detail),
        }
        self.records.write().push(record);
    }

    /// All records in append order
    pub fn records(&self) -> Vec<EventRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventLog {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}
