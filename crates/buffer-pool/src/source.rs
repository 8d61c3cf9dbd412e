// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`BufferSource`] capability trait.
//!
//! Consumers of the pool (the response builder, chiefly) depend on this
//! trait rather than on [`BufferPool`](crate::BufferPool) directly, so a
//! test double can be injected through the constructor. The original
//! firmware substituted its pool functions at link time; a trait object
//! does the same job without the linker tricks.

use crate::{PoolError, PoolStats, PooledBuffer};

/// Capability interface for anything that can issue fixed-size buffers.
///
/// Implemented by [`BufferPool`](crate::BufferPool) for production and by
/// in-test doubles built on [`PooledBuffer::unpooled`].
pub trait BufferSource: Send + Sync {
    /// Size in bytes of every buffer this source issues.
    fn slot_size(&self) -> usize;

    /// Attempts to acquire one buffer. Must not block.
    fn try_acquire(&self) -> Result<PooledBuffer, PoolError>;

    /// Returns a buffer to the source.
    fn give_back(&self, buf: PooledBuffer) -> Result<(), PoolError>;

    /// Snapshot of the source's statistics.
    fn stats(&self) -> PoolStats;
}
