// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pool sizing configuration.
//!
//! Capacity and slot size are fixed for the lifetime of a pool: the target
//! hardware cannot absorb reallocation spikes, so the pool's footprint must
//! be decided once, up front, and be auditable.

/// Sizing parameters for a [`BufferPool`](crate::BufferPool).
///
/// The defaults match the response path of the camera firmware this core
/// was sized for: 50 slots of 32 KiB each (1.6 MB total), enough for 50
/// concurrent SOAP responses of up to one slot before chaining kicks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PoolConfig {
    /// Number of slots in the pool.
    pub capacity: usize,
    /// Size of each slot in bytes.
    pub slot_size: usize,
}

impl PoolConfig {
    /// Total storage the pool will allocate at construction.
    pub fn total_bytes(&self) -> usize {
        self.capacity.saturating_mul(self.slot_size)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            slot_size: 32 * 1024,
        }
    }
}
