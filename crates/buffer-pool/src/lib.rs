// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # buffer-pool
//!
//! A fixed-capacity pool of fixed-size buffer slots for the camera server's
//! response path. On the target hardware (a low-end camera SoC with a few
//! dozen MB of RAM) every SOAP response is assembled from pool slots rather
//! than ad-hoc heap allocations, so worst-case memory usage is statically
//! bounded and pool exhaustion is a reportable condition instead of an OOM
//! kill.
//!
//! # Key Components
//!
//! - [`PoolConfig`] — capacity and slot size, fixed at construction.
//! - [`BufferPool`] — the allocator: O(1) acquire/return over a free list,
//!   exhaustion statistics, and a checked shutdown.
//! - [`PooledBuffer`] — an owned handle to one slot. Returning it to the
//!   pool consumes it, so a returned slot can never be read again. Dropping
//!   a handle returns its slot implicitly.
//! - [`BufferSource`] — the capability trait consumers depend on, so tests
//!   can substitute a double for the real pool.
//! - [`PoolStats`] — issued/peak/failure counters for monitoring.
//!
//! # Ownership Model
//!
//! ```text
//! BufferPool::acquire()
//!       │
//!       ▼
//!   PooledBuffer  ◄─── owns the slot storage, holds Arc<PoolInner>
//!       │
//!       │  give_back() / drop()
//!       ▼
//!   PoolInner::restore()  ──► free list
//! ```
//!
//! The pool hands out [`PooledBuffer`]s; each handle holds an `Arc` back to
//! the pool's inner state and moves the slot's storage with it. Explicit
//! [`BufferPool::give_back`] reports double-return and foreign-handle
//! misuse; `Drop` is the silent safety net.
//!
//! # Example
//! ```
//! use buffer_pool::{BufferPool, PoolConfig};
//!
//! let pool = BufferPool::new(PoolConfig { capacity: 4, slot_size: 1024 }).unwrap();
//!
//! let buf = pool.acquire().unwrap();
//! assert_eq!(pool.stats().issued_count, 1);
//!
//! pool.give_back(buf).unwrap();
//! assert_eq!(pool.stats().issued_count, 0);
//! pool.shutdown().unwrap();
//! ```

mod config;
mod error;
mod handle;
mod pool;
mod source;
mod stats;

pub use config::PoolConfig;
pub use error::PoolError;
pub use handle::PooledBuffer;
pub use pool::BufferPool;
pub use source::BufferSource;
pub use stats::PoolStats;
