// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pool statistics for monitoring and diagnostics.
//!
//! [`PoolStats`] is a point-in-time snapshot meant to be polled by an
//! external monitoring collaborator. Exhaustion events show up in
//! `failed_acquire_count` long before they show up in customer complaints,
//! which is the whole point of tracking them.

/// Snapshot of buffer pool usage.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct PoolStats {
    /// Total number of slots in the pool.
    pub capacity: usize,
    /// Size of each slot in bytes.
    pub slot_size: usize,
    /// Slots currently issued (not yet returned).
    pub issued_count: usize,
    /// High-water mark of simultaneously issued slots.
    pub peak_issued: usize,
    /// Acquire attempts that failed because the pool was exhausted.
    pub failed_acquire_count: u64,
    /// Total acquire attempts, successful or not.
    pub total_acquires: u64,
}

impl PoolStats {
    /// Current utilization as a percentage in `[0, 100]`.
    pub fn utilization_percent(&self) -> u32 {
        if self.capacity == 0 {
            return 0;
        }
        ((self.issued_count * 100) / self.capacity) as u32
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Pool: {}/{} slots issued ({}%), peak {}, {} acquires ({} failed)",
            self.issued_count,
            self.capacity,
            self.utilization_percent(),
            self.peak_issued,
            self.total_acquires,
            self.failed_acquire_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let s = PoolStats::default();
        assert_eq!(s.issued_count, 0);
        assert_eq!(s.utilization_percent(), 0);
    }

    #[test]
    fn test_utilization() {
        let s = PoolStats {
            capacity: 50,
            issued_count: 40,
            ..Default::default()
        };
        assert_eq!(s.utilization_percent(), 80);
    }

    #[test]
    fn test_summary() {
        let s = PoolStats {
            capacity: 4,
            slot_size: 1024,
            issued_count: 2,
            peak_issued: 3,
            total_acquires: 10,
            failed_acquire_count: 1,
        };
        let text = s.summary();
        assert!(text.contains("2/4 slots"));
        assert!(text.contains("50%"));
        assert!(text.contains("1 failed"));
    }

    #[test]
    fn test_serialize() {
        let s = PoolStats {
            capacity: 4,
            ..Default::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"capacity\":4"));
    }
}
