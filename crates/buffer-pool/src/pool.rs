// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-slot buffer pool with O(1) acquire/return.
//!
//! All slot storage is allocated once at construction and never freed or
//! reallocated individually — fixed-size slots avoid fragmentation on the
//! constrained target, and exhaustion is a first-class, counted condition.
//!
//! # Thread Safety
//! `BufferPool` is `Send + Sync` and is shared across request-handling
//! threads via `Arc`. Every mutating operation runs under a single mutex;
//! the critical sections are a free-list push/pop and counter updates, so
//! lock hold time stays short.

use crate::{BufferSource, PoolConfig, PoolError, PoolStats, PooledBuffer};
use std::sync::{Arc, Mutex};

/// Upper bound on the storage a single pool may reserve. A misconfigured
/// capacity/slot-size pair must fail loudly at construction rather than
/// drag the device into swap.
const MAX_POOL_BYTES: usize = 64 * 1024 * 1024;

/// Internal pool state, shared between the pool and its handles via `Arc`.
///
/// Handles hold a reference to this inner type so they can return storage
/// without a reference to the full `BufferPool`.
pub struct PoolInner {
    slot_size: usize,
    state: Mutex<PoolState>,
}

struct PoolState {
    /// Per-slot storage. `None` while the slot is issued or after shutdown.
    slots: Vec<Option<Box<[u8]>>>,
    /// Indices of free slots. Push/pop at the tail keeps acquire O(1).
    free: Vec<usize>,
    issued: usize,
    peak_issued: usize,
    failed_acquires: u64,
    total_acquires: u64,
    shut_down: bool,
}

impl PoolInner {
    /// Returns a slot's storage to the free list.
    ///
    /// Fails with `InvalidHandle` if the index is out of range or the slot
    /// is not currently issued (double return).
    pub(crate) fn restore(&self, index: usize, data: Box<[u8]>) -> Result<(), PoolError> {
        let mut state = self.state.lock().expect("pool mutex poisoned");
        if state.shut_down {
            // Unreachable through the public API: shutdown refuses while
            // handles are outstanding. Drop the storage and report misuse.
            return Err(PoolError::ShutDown);
        }
        match state.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(data);
                state.free.push(index);
                state.issued -= 1;
                tracing::trace!(index, issued = state.issued, "slot returned");
                Ok(())
            }
            _ => Err(PoolError::InvalidHandle),
        }
    }
}

/// The fixed-slot allocator for the response path.
///
/// # Example
/// ```
/// use buffer_pool::{BufferPool, PoolConfig};
///
/// let pool = BufferPool::new(PoolConfig { capacity: 2, slot_size: 256 }).unwrap();
/// let a = pool.acquire().unwrap();
/// let b = pool.acquire().unwrap();
/// assert!(pool.acquire().is_err()); // exhausted
///
/// pool.give_back(a).unwrap();
/// let _c = pool.acquire().unwrap(); // one return frees one acquire
/// # pool.give_back(b).unwrap();
/// ```
pub struct BufferPool {
    inner: Arc<PoolInner>,
    config: PoolConfig,
}

impl BufferPool {
    /// Creates a pool and allocates all slot storage up front.
    ///
    /// Fails with `InvalidArgument` for a zero capacity or slot size and
    /// with `OutOfMemory` when the configured total exceeds the build-time
    /// ceiling. There is no lazy path: if this returns `Ok`, every later
    /// acquire is a free-list pop, never an allocation.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        if config.capacity == 0 {
            return Err(PoolError::InvalidArgument("capacity must be non-zero".into()));
        }
        if config.slot_size == 0 {
            return Err(PoolError::InvalidArgument("slot size must be non-zero".into()));
        }
        if config.total_bytes() > MAX_POOL_BYTES {
            return Err(PoolError::OutOfMemory {
                capacity: config.capacity,
                slot_size: config.slot_size,
                limit_bytes: MAX_POOL_BYTES,
            });
        }

        let slots = (0..config.capacity)
            .map(|_| Some(vec![0u8; config.slot_size].into_boxed_slice()))
            .collect();
        let free = (0..config.capacity).rev().collect();

        tracing::info!(
            capacity = config.capacity,
            slot_size = config.slot_size,
            "buffer pool initialized"
        );

        Ok(Self {
            inner: Arc::new(PoolInner {
                slot_size: config.slot_size,
                state: Mutex::new(PoolState {
                    slots,
                    free,
                    issued: 0,
                    peak_issued: 0,
                    failed_acquires: 0,
                    total_acquires: 0,
                    shut_down: false,
                }),
            }),
            config,
        })
    }

    /// Acquires one free slot.
    ///
    /// Fails with `PoolExhausted` when every slot is issued — the caller
    /// decides whether to shed load or fail the request; the pool never
    /// blocks or grows.
    pub fn acquire(&self) -> Result<PooledBuffer, PoolError> {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        if state.shut_down {
            return Err(PoolError::ShutDown);
        }
        state.total_acquires += 1;

        let Some(index) = state.free.pop() else {
            state.failed_acquires += 1;
            tracing::debug!(capacity = self.config.capacity, "pool exhausted");
            return Err(PoolError::PoolExhausted {
                capacity: self.config.capacity,
            });
        };

        let data = state.slots[index]
            .take()
            .expect("free-list slot missing storage");
        state.issued += 1;
        if state.issued > state.peak_issued {
            state.peak_issued = state.issued;
        }
        tracing::trace!(index, issued = state.issued, "slot acquired");

        Ok(PooledBuffer::new(data, index, Arc::clone(&self.inner)))
    }

    /// Explicitly returns a handle to the pool.
    ///
    /// Fails with `InvalidHandle` if the handle was issued by a different
    /// pool or is detached. Prefer this over dropping when the caller wants
    /// misuse reported instead of swallowed.
    pub fn give_back(&self, buf: PooledBuffer) -> Result<(), PoolError> {
        match buf.owner() {
            Some(owner) if Arc::ptr_eq(owner, &self.inner) => {}
            // A foreign handle still returns to its own pool when `buf`
            // drops at the end of this scope.
            _ => return Err(PoolError::InvalidHandle),
        }
        let (data, index) = buf.into_parts();
        let data = data.ok_or(PoolError::InvalidHandle)?;
        self.inner.restore(index, data)
    }

    /// Returns a snapshot of pool statistics. Read-only.
    pub fn stats(&self) -> PoolStats {
        let state = self.inner.state.lock().expect("pool mutex poisoned");
        PoolStats {
            capacity: self.config.capacity,
            slot_size: self.config.slot_size,
            issued_count: state.issued,
            peak_issued: state.peak_issued,
            failed_acquire_count: state.failed_acquires,
            total_acquires: state.total_acquires,
        }
    }

    /// Releases all slot storage.
    ///
    /// Fails with `PoolBusy` while handles are outstanding — outstanding
    /// handles must be returned first; the precondition is never silently
    /// overridden. A second shutdown reports `ShutDown`.
    pub fn shutdown(&self) -> Result<(), PoolError> {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        if state.shut_down {
            return Err(PoolError::ShutDown);
        }
        if state.issued > 0 {
            return Err(PoolError::PoolBusy {
                outstanding: state.issued,
            });
        }
        state.slots.clear();
        state.free.clear();
        state.shut_down = true;
        tracing::info!(capacity = self.config.capacity, "buffer pool shut down");
        Ok(())
    }

    /// The configured slot size in bytes.
    pub fn slot_size(&self) -> usize {
        self.inner.slot_size
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> PoolConfig {
        self.config
    }
}

impl BufferSource for BufferPool {
    fn slot_size(&self) -> usize {
        self.inner.slot_size
    }

    fn try_acquire(&self) -> Result<PooledBuffer, PoolError> {
        self.acquire()
    }

    fn give_back(&self, buf: PooledBuffer) -> Result<(), PoolError> {
        BufferPool::give_back(self, buf)
    }

    fn stats(&self) -> PoolStats {
        self.stats()
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("BufferPool")
            .field("capacity", &stats.capacity)
            .field("slot_size", &stats.slot_size)
            .field("issued_count", &stats.issued_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(capacity: usize) -> BufferPool {
        BufferPool::new(PoolConfig {
            capacity,
            slot_size: 128,
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_config() {
        let zero_cap = BufferPool::new(PoolConfig {
            capacity: 0,
            slot_size: 128,
        });
        assert!(matches!(zero_cap, Err(PoolError::InvalidArgument(_))));

        let zero_slot = BufferPool::new(PoolConfig {
            capacity: 4,
            slot_size: 0,
        });
        assert!(matches!(zero_slot, Err(PoolError::InvalidArgument(_))));
    }

    #[test]
    fn test_ceiling() {
        let result = BufferPool::new(PoolConfig {
            capacity: 1024,
            slot_size: 1024 * 1024,
        });
        assert!(matches!(result, Err(PoolError::OutOfMemory { .. })));
    }

    #[test]
    fn test_exact_capacity_then_exhausted() {
        let p = pool(5);
        let mut handles: Vec<_> = (0..5).map(|_| p.acquire().unwrap()).collect();

        // The (N+1)-th acquire fails.
        assert!(matches!(
            p.acquire(),
            Err(PoolError::PoolExhausted { capacity: 5 })
        ));
        let stats = p.stats();
        assert_eq!(stats.issued_count, 5);
        assert_eq!(stats.peak_issued, 5);
        assert_eq!(stats.failed_acquire_count, 1);

        // Returning one handle frees exactly one further acquire.
        let last = handles.pop().unwrap();
        p.give_back(last).unwrap();
        let _again = p.acquire().unwrap();
        assert!(matches!(p.acquire(), Err(PoolError::PoolExhausted { .. })));
    }

    #[test]
    fn test_drop_returns_slot() {
        let p = pool(2);
        {
            let _a = p.acquire().unwrap();
            let _b = p.acquire().unwrap();
            assert_eq!(p.stats().issued_count, 2);
        }
        assert_eq!(p.stats().issued_count, 0);
    }

    #[test]
    fn test_buffer_is_zeroed_and_writable() {
        let p = pool(1);
        let mut buf = p.acquire().unwrap();
        assert_eq!(buf.capacity(), 128);
        assert!(buf.as_slice().iter().all(|&b| b == 0));
        buf.as_mut_slice()[0] = 42;
        assert_eq!(buf.as_slice()[0], 42);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let p1 = pool(1);
        let p2 = pool(1);
        let buf = p1.acquire().unwrap();

        assert!(matches!(p2.give_back(buf), Err(PoolError::InvalidHandle)));
        // The foreign handle went back to its own pool when rejected.
        assert_eq!(p1.stats().issued_count, 0);
        assert_eq!(p2.stats().issued_count, 0);
    }

    #[test]
    fn test_unpooled_handle_rejected() {
        let p = pool(1);
        let detached = PooledBuffer::unpooled(128);
        assert!(matches!(
            p.give_back(detached),
            Err(PoolError::InvalidHandle)
        ));
    }

    #[test]
    fn test_double_return_detected() {
        let p = pool(2);
        let buf = p.acquire().unwrap();
        p.give_back(buf).unwrap();
        let issued_before = p.stats().issued_count;

        // The public API cannot double-return (give_back consumes the
        // handle), so exercise the internal slot-state check directly.
        let stray = vec![0u8; 128].into_boxed_slice();
        assert!(matches!(
            p.inner.restore(0, stray),
            Err(PoolError::InvalidHandle)
        ));
        assert_eq!(p.stats().issued_count, issued_before);
    }

    #[test]
    fn test_stats_counters() {
        let p = pool(2);
        let a = p.acquire().unwrap();
        let b = p.acquire().unwrap();
        let _ = p.acquire(); // fails
        p.give_back(a).unwrap();
        p.give_back(b).unwrap();

        let stats = p.stats();
        assert_eq!(stats.total_acquires, 3);
        assert_eq!(stats.failed_acquire_count, 1);
        assert_eq!(stats.peak_issued, 2);
        assert_eq!(stats.issued_count, 0);
    }

    #[test]
    fn test_shutdown_busy_then_ok() {
        let p = pool(1);
        let buf = p.acquire().unwrap();
        assert!(matches!(
            p.shutdown(),
            Err(PoolError::PoolBusy { outstanding: 1 })
        ));

        p.give_back(buf).unwrap();
        p.shutdown().unwrap();
        assert!(matches!(p.shutdown(), Err(PoolError::ShutDown)));
        assert!(matches!(p.acquire(), Err(PoolError::ShutDown)));
    }

    #[test]
    fn test_concurrent_acquire_release() {
        use std::sync::Arc;

        let p = Arc::new(pool(8));
        let mut workers = Vec::new();
        for _ in 0..4 {
            let p = Arc::clone(&p);
            workers.push(std::thread::spawn(move || {
                for _ in 0..200 {
                    if let Ok(buf) = p.acquire() {
                        p.give_back(buf).unwrap();
                    }
                }
            }));
        }
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(p.stats().issued_count, 0);
    }
}
