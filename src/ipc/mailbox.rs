/*!
 * Mailboxes
 * Per-process FIFO message queues
 */

use super::types::{IpcError, IpcResult, Message};
use crate::core::types::Pid;
use log::info;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Registry of per-process mailboxes
///
/// A mailbox is opened when its process is created and dropped when it
/// terminates; sending to a dropped mailbox fails `RecipientGone`. Arrival
/// order is preserved per recipient.
pub struct MailboxRegistry {
    mailboxes: Arc<RwLock<HashMap<Pid, VecDeque<Message>>>>,
    capacity: Option<usize>,
}

impl MailboxRegistry {
    pub fn new(capacity: Option<usize>) -> Self {
        match capacity {
            Some(n) => info!("Mailbox registry initialized (capacity: {} messages)", n),
            None => info!("Mailbox registry initialized (unbounded)"),
        }
        Self {
            mailboxes: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Open a mailbox for a newly created process
    pub fn open(&self, pid: Pid) {
        self.mailboxes.write().entry(pid).or_default();
    }

    /// Drop a terminated process's mailbox; pending messages are discarded
    pub fn close(&self, pid: Pid) {
        if let Some(dropped) = self.mailboxes.write().remove(&pid) {
            if !dropped.is_empty() {
                info!(
                    "Mailbox of process {} dropped with {} undelivered messages",
                    pid,
                    dropped.len()
                );
            }
        }
    }

    /// Append a message to the recipient's mailbox; never blocks
    pub fn deliver(&self, message: Message) -> IpcResult<()> {
        let mut mailboxes = self.mailboxes.write();
        let to = message.to;
        let queue = mailboxes
            .get_mut(&to)
            .ok_or(IpcError::RecipientGone(to))?;

        if let Some(capacity) = self.capacity {
            if queue.len() >= capacity {
                return Err(IpcError::MailboxFull(to));
            }
        }

        queue.push_back(message);
        Ok(())
    }

    /// Pop the oldest pending message (non-blocking poll)
    pub fn fetch(&self, pid: Pid) -> IpcResult<Message> {
        let mut mailboxes = self.mailboxes.write();
        let queue = mailboxes.get_mut(&pid).ok_or(IpcError::RecipientGone(pid))?;
        queue.pop_front().ok_or(IpcError::MailboxEmpty(pid))
    }

    /// Pending messages without consuming them
    pub fn peek(&self, pid: Pid) -> Vec<Message> {
        self.mailboxes
            .read()
            .get(&pid)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn depth(&self, pid: Pid) -> usize {
        self.mailboxes.read().get(&pid).map_or(0, |q| q.len())
    }

    pub fn is_open(&self, pid: Pid) -> bool {
        self.mailboxes.read().contains_key(&pid)
    }
}

impl Clone for MailboxRegistry {
    fn clone(&self) -> Self {
        Self {
            mailboxes: Arc::clone(&self.mailboxes),
            capacity: self.capacity,
        }
    }
}
