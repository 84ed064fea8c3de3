/*!
 * Resource Pool
 * Tracks CPU and memory units with allocation/release accounting
 */

use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Resource operation result
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Resource allocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ResourceError {
    #[error("Insufficient CPU units: requested {requested}, available {available}")]
    InsufficientCpu { requested: u32, available: u32 },

    #[error("Insufficient memory units: requested {requested}, available {available}")]
    InsufficientMemory { requested: u32, available: u32 },
}

/// Read-only view of the pool counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PoolSnapshot {
    pub cpu_total: u32,
    pub cpu_allocated: u32,
    pub memory_total: u32,
    pub memory_allocated: u32,
}

#[derive(Debug, Default)]
struct Counters {
    cpu_allocated: u32,
    memory_allocated: u32,
}

/// Simulated resource pool
///
/// Grants are atomic: a request either fits entirely within the remaining
/// CPU and memory capacity or leaves the counters untouched. Releasing more
/// than was granted is an accounting defect and panics rather than letting
/// the counters go inconsistent.
pub struct ResourcePool {
    cpu_total: u32,
    memory_total: u32,
    counters: Arc<RwLock<Counters>>,
}

impl ResourcePool {
    pub fn new(cpu_total: u32, memory_total: u32) -> Self {
        info!(
            "Resource pool initialized: {} CPU units, {} memory units",
            cpu_total, memory_total
        );
        Self {
            cpu_total,
            memory_total,
            counters: Arc::new(RwLock::new(Counters::default())),
        }
    }

    /// Atomically allocate CPU and memory units
    ///
    /// Both requests must fit; on failure nothing is allocated and the error
    /// names the resource that did not fit (CPU checked first).
    pub fn try_allocate(&self, cpu: u32, memory: u32) -> ResourceResult<()> {
        let mut counters = self.counters.write();

        let cpu_available = self.cpu_total - counters.cpu_allocated;
        if cpu > cpu_available {
            warn!(
                "CPU allocation denied: requested {}, available {}",
                cpu, cpu_available
            );
            return Err(ResourceError::InsufficientCpu {
                requested: cpu,
                available: cpu_available,
            });
        }

        let memory_available = self.memory_total - counters.memory_allocated;
        if memory > memory_available {
            warn!(
                "Memory allocation denied: requested {}, available {}",
                memory, memory_available
            );
            return Err(ResourceError::InsufficientMemory {
                requested: memory,
                available: memory_available,
            });
        }

        counters.cpu_allocated += cpu;
        counters.memory_allocated += memory;
        Ok(())
    }

    /// Release previously granted units
    ///
    /// Panics if the release exceeds what is currently allocated: callers
    /// must release exactly what they were granted, exactly once.
    pub fn release(&self, cpu: u32, memory: u32) {
        let mut counters = self.counters.write();

        assert!(
            cpu <= counters.cpu_allocated,
            "resource accounting violated: releasing {} CPU units with only {} allocated",
            cpu,
            counters.cpu_allocated
        );
        assert!(
            memory <= counters.memory_allocated,
            "resource accounting violated: releasing {} memory units with only {} allocated",
            memory,
            counters.memory_allocated
        );

        counters.cpu_allocated -= cpu;
        counters.memory_allocated -= memory;
    }

    /// Read-only counters for display
    pub fn snapshot(&self) -> PoolSnapshot {
        let counters = self.counters.read();
        PoolSnapshot {
            cpu_total: self.cpu_total,
            cpu_allocated: counters.cpu_allocated,
            memory_total: self.memory_total,
            memory_allocated: counters.memory_allocated,
        }
    }
}

impl Clone for ResourcePool {
    fn clone(&self) -> Self {
        Self {
            cpu_total: self.cpu_total,
            memory_total: self.memory_total,
            counters: Arc::clone(&self.counters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_within_capacity() {
        let pool = ResourcePool::new(4, 100);
        assert!(pool.try_allocate(1, 50).is_ok());

        let snap = pool.snapshot();
        assert_eq!(snap.cpu_allocated, 1);
        assert_eq!(snap.memory_allocated, 50);
    }

    #[test]
    fn test_allocation_is_atomic() {
        let pool = ResourcePool::new(4, 100);

        // Memory does not fit, so the CPU grant must not stick either
        let err = pool.try_allocate(1, 200).unwrap_err();
        assert_eq!(
            err,
            ResourceError::InsufficientMemory {
                requested: 200,
                available: 100,
            }
        );

        let snap = pool.snapshot();
        assert_eq!(snap.cpu_allocated, 0);
        assert_eq!(snap.memory_allocated, 0);
    }

    #[test]
    fn test_reports_insufficient_cpu() {
        let pool = ResourcePool::new(1, 100);
        pool.try_allocate(1, 10).unwrap();

        let err = pool.try_allocate(1, 10).unwrap_err();
        assert!(matches!(err, ResourceError::InsufficientCpu { .. }));
    }

    #[test]
    fn test_release_restores_capacity() {
        let pool = ResourcePool::new(2, 100);
        pool.try_allocate(2, 80).unwrap();
        pool.release(2, 80);

        let snap = pool.snapshot();
        assert_eq!(snap.cpu_allocated, 0);
        assert_eq!(snap.memory_allocated, 0);
        assert!(pool.try_allocate(2, 100).is_ok());
    }

    #[test]
    #[should_panic(expected = "resource accounting violated")]
    fn test_over_release_panics() {
        let pool = ResourcePool::new(2, 100);
        pool.try_allocate(1, 10).unwrap();
        pool.release(2, 10);
    }
}
