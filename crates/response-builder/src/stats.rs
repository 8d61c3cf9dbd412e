// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Manager-level statistics.

use buffer_pool::PoolStats;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Shared counters updated by builders as they run.
///
/// Relaxed ordering throughout: the counters are monitoring data, not
/// synchronization.
#[derive(Debug, Default)]
pub(crate) struct ManagerCounters {
    pub(crate) builders_created: AtomicU64,
    pub(crate) active_builders: AtomicUsize,
    pub(crate) bytes_appended: AtomicU64,
    pub(crate) exhaustion_events: AtomicU64,
    pub(crate) heap_fallbacks: AtomicU64,
}

impl ManagerCounters {
    pub(crate) fn snapshot(&self, pool: PoolStats) -> ManagerStats {
        ManagerStats {
            builders_created: self.builders_created.load(Ordering::Relaxed),
            active_builders: self.active_builders.load(Ordering::Relaxed),
            bytes_appended: self.bytes_appended.load(Ordering::Relaxed),
            exhaustion_events: self.exhaustion_events.load(Ordering::Relaxed),
            heap_fallbacks: self.heap_fallbacks.load(Ordering::Relaxed),
            pool,
        }
    }
}

/// Snapshot of response-manager usage.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ManagerStats {
    /// Builders created since the manager was constructed.
    pub builders_created: u64,
    /// Builders currently alive (created, not yet released).
    pub active_builders: usize,
    /// Total payload bytes appended across all builders.
    pub bytes_appended: u64,
    /// Appends or creates that found the buffer source exhausted.
    pub exhaustion_events: u64,
    /// Segments served from the heap because the source was exhausted.
    pub heap_fallbacks: u64,
    /// Statistics of the underlying buffer source.
    pub pool: PoolStats,
}

impl ManagerStats {
    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Responses: {} built ({} active), {} bytes, {} exhaustions, {} heap fallbacks; {}",
            self.builders_created,
            self.active_builders,
            self.bytes_appended,
            self.exhaustion_events,
            self.heap_fallbacks,
            self.pool.summary(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let counters = ManagerCounters::default();
        counters.builders_created.store(3, Ordering::Relaxed);
        counters.bytes_appended.store(4096, Ordering::Relaxed);

        let stats = counters.snapshot(PoolStats::default());
        assert_eq!(stats.builders_created, 3);
        assert_eq!(stats.bytes_appended, 4096);
        assert_eq!(stats.active_builders, 0);
    }

    #[test]
    fn test_summary_and_serialize() {
        let counters = ManagerCounters::default();
        let stats = counters.snapshot(PoolStats::default());

        assert!(stats.summary().contains("0 built"));
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"heap_fallbacks\":0"));
    }
}
