// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The response manager: builder factory and usage accounting.

use crate::builder::ResponseBuilder;
use crate::error::BuilderError;
use crate::stats::{ManagerCounters, ManagerStats};
use buffer_pool::BufferSource;
use std::sync::Arc;

/// What to do when the buffer source is exhausted mid-response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Reject the append with [`BuilderError::Exhausted`]. The pool bound
    /// is the memory bound.
    #[default]
    Fail,
    /// Serve the segment from the heap and keep going. The response still
    /// completes; the fallback shows up in [`ManagerStats::heap_fallbacks`].
    Heap,
}

/// Factory for [`ResponseBuilder`]s over one shared buffer source.
///
/// Cheap to clone; clones share the source and the counters.
#[derive(Clone)]
pub struct ResponseManager {
    source: Arc<dyn BufferSource>,
    fallback: FallbackPolicy,
    counters: Arc<ManagerCounters>,
}

impl ResponseManager {
    /// Creates a manager over `source` with the given exhaustion policy.
    pub fn new(source: Arc<dyn BufferSource>, fallback: FallbackPolicy) -> Self {
        tracing::debug!(
            slot_size = source.slot_size(),
            ?fallback,
            "response manager ready"
        );
        Self {
            source,
            fallback,
            counters: Arc::new(ManagerCounters::default()),
        }
    }

    /// Starts a new response. Acquires the first segment up front, so a
    /// builder that exists can always hold at least one segment of payload.
    pub fn create_builder(&self) -> Result<ResponseBuilder, BuilderError> {
        ResponseBuilder::create(
            Arc::clone(&self.source),
            Arc::clone(&self.counters),
            self.fallback,
        )
    }

    /// Point-in-time usage snapshot, including the source's own statistics.
    pub fn stats(&self) -> ManagerStats {
        self.counters.snapshot(self.source.stats())
    }
}

impl std::fmt::Debug for ResponseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseManager")
            .field("slot_size", &self.source.slot_size())
            .field("fallback", &self.fallback)
            .finish()
    }
}
