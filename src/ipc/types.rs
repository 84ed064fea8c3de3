/*!
 * IPC Types
 * Messages and inter-process communication errors
 */

use crate::core::types::{Cycle, Pid};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// IPC operation result
pub type IpcResult<T> = Result<T, IpcError>;

/// IPC errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum IpcError {
    #[error("Recipient {0} has terminated; message dropped")]
    RecipientGone(Pid),

    #[error("Mailbox of process {0} is empty")]
    MailboxEmpty(Pid),

    #[error("Mailbox of process {0} is full")]
    MailboxFull(Pid),

    #[error("Semaphore '{0}' already exists")]
    DuplicateName(String),

    #[error("Semaphore '{0}' not found")]
    SemaphoreNotFound(String),

    #[error("Process {0} not found")]
    ProcessNotFound(Pid),
}

/// Message delivered through a mailbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Message {
    pub from: Pid,
    pub to: Pid,
    pub payload: String,
    /// Cycle at which the message was sent
    pub sent_at: Cycle,
}

impl Message {
    pub fn new(from: Pid, to: Pid, payload: impl Into<String>, sent_at: Cycle) -> Self {
        Self {
            from,
            to,
            payload: payload.into(),
            sent_at,
        }
    }
}
