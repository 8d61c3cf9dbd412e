// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the buffer pool.

/// Errors that can occur during pool construction and slot management.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The configured pool would exceed the build-time memory ceiling.
    #[error(
        "out of memory: pool of {capacity} x {slot_size} bytes exceeds the \
         {limit_bytes}-byte ceiling"
    )]
    OutOfMemory {
        capacity: usize,
        slot_size: usize,
        limit_bytes: usize,
    },

    /// All slots are currently issued; no acquire can succeed until a
    /// handle is returned.
    #[error("pool exhausted: all {capacity} slots issued")]
    PoolExhausted { capacity: usize },

    /// The handle does not belong to this pool, or its slot was already
    /// returned (double-free protection).
    #[error("invalid handle: not issued by this pool or already returned")]
    InvalidHandle,

    /// Shutdown was requested while handles are still outstanding.
    #[error("pool busy: {outstanding} handle(s) still outstanding")]
    PoolBusy { outstanding: usize },

    /// The pool has been shut down; no further operations are possible.
    #[error("pool has been shut down")]
    ShutDown,

    /// A configuration parameter is unusable (zero capacity or slot size).
    #[error("invalid pool configuration: {0}")]
    InvalidArgument(String),
}
