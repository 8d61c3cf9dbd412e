// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Owned slot handle that returns its storage to the pool on drop.
//!
//! [`PooledBuffer`] is how Rust's ownership model enforces the pool's
//! aliasing rules: a slot is reachable through exactly one handle, and
//! returning the handle consumes it, so no code path can read a slot after
//! return. The raw-pointer chains of the original firmware are gone; a
//! handle carries its slot index and the storage itself.

use crate::pool::PoolInner;
use std::sync::Arc;

/// An owned handle to one pool slot.
///
/// Acquired from [`BufferPool::acquire`](crate::BufferPool::acquire) and
/// returned either explicitly via
/// [`BufferPool::give_back`](crate::BufferPool::give_back) (which reports
/// misuse) or implicitly on drop (which cannot).
///
/// Test doubles can mint detached handles with [`PooledBuffer::unpooled`];
/// those are backed by plain heap storage and belong to no pool.
pub struct PooledBuffer {
    /// Slot storage. `Option` so `give_back`/`drop` can `take()` it.
    data: Option<Box<[u8]>>,
    /// Index of the slot inside the owning pool. Unused for detached handles.
    index: usize,
    /// Owning pool, or `None` for a detached handle.
    pool: Option<Arc<PoolInner>>,
}

impl PooledBuffer {
    pub(crate) fn new(data: Box<[u8]>, index: usize, pool: Arc<PoolInner>) -> Self {
        Self {
            data: Some(data),
            index,
            pool: Some(pool),
        }
    }

    /// Creates a detached handle backed by heap storage.
    ///
    /// Used by test doubles implementing
    /// [`BufferSource`](crate::BufferSource) and by the heap-fallback path
    /// of the response builder. A detached handle belongs to no pool;
    /// giving it back to a real pool fails with `InvalidHandle`.
    pub fn unpooled(capacity: usize) -> Self {
        Self {
            data: Some(vec![0u8; capacity].into_boxed_slice()),
            index: usize::MAX,
            pool: None,
        }
    }

    /// Returns `true` if this handle was issued by a pool.
    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }

    /// Slot capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.as_ref().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns an immutable view of the slot.
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_ref().expect("buffer already returned")
    }

    /// Returns a mutable view of the slot.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.data.as_mut().expect("buffer already returned")
    }

    pub(crate) fn owner(&self) -> Option<&Arc<PoolInner>> {
        self.pool.as_ref()
    }

    /// Disassembles the handle for an explicit return, disarming `Drop`.
    pub(crate) fn into_parts(mut self) -> (Option<Box<[u8]>>, usize) {
        self.pool = None;
        (self.data.take(), self.index)
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let (Some(data), Some(pool)) = (self.data.take(), self.pool.take()) {
            // Misuse is unreachable here: the handle still owns its storage,
            // so the slot cannot already be free.
            let _ = pool.restore(self.index, data);
        }
    }
}

impl std::fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("index", &self.index)
            .field("capacity", &self.capacity())
            .field("pooled", &self.is_pooled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpooled_handle() {
        let mut buf = PooledBuffer::unpooled(64);
        assert!(!buf.is_pooled());
        assert_eq!(buf.capacity(), 64);
        assert!(buf.as_slice().iter().all(|&b| b == 0));

        buf.as_mut_slice()[0] = 7;
        assert_eq!(buf.as_slice()[0], 7);
    }

    #[test]
    fn test_debug_format() {
        let buf = PooledBuffer::unpooled(16);
        let text = format!("{buf:?}");
        assert!(text.contains("PooledBuffer"));
        assert!(text.contains("pooled: false"));
    }
}
