/*!
 * Core Module
 * Shared types and error aggregation
 */

pub mod errors;
pub mod types;

pub use errors::SimError;
pub use types::{Cycle, Pid, Priority, SimResult};
