// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Incremental response construction over a chain of pooled segments.
//!
//! A [`ResponseBuilder`] grows a response one append at a time. Storage is a
//! chain of fixed-size segments from a [`BufferSource`]; appends that do not
//! fit the tail segment acquire more. Acquisition happens before any byte is
//! copied, so a failed append leaves the response exactly as it was.
//!
//! ```text
//!  ResponseBuilder
//!    ├── segments: [seg0][seg1][seg2]   (slot_size bytes each)
//!    └── total_len ───────────^ cursor into the chain
//! ```

use crate::error::BuilderError;
use crate::manager::FallbackPolicy;
use crate::stats::ManagerCounters;
use buffer_pool::{BufferSource, PoolError, PooledBuffer};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// One link of the chain. `from_source` marks segments that must be given
/// back to the source; heap-fallback segments just drop.
struct Segment {
    buf: PooledBuffer,
    from_source: bool,
}

/// An in-progress response backed by pooled segments.
///
/// Created by [`ResponseManager::create_builder`](crate::ResponseManager::create_builder).
/// Dropping the builder returns every source-issued segment;
/// [`release`](Self::release) does the same explicitly.
pub struct ResponseBuilder {
    segments: Vec<Segment>,
    total_len: usize,
    slot_size: usize,
    source: Arc<dyn BufferSource>,
    counters: Arc<ManagerCounters>,
    fallback: FallbackPolicy,
    released: bool,
}

impl ResponseBuilder {
    /// Creates a builder holding its first segment.
    pub(crate) fn create(
        source: Arc<dyn BufferSource>,
        counters: Arc<ManagerCounters>,
        fallback: FallbackPolicy,
    ) -> Result<Self, BuilderError> {
        let slot_size = source.slot_size();
        // `released` starts true so that a drop on the failure path below
        // does not decrement counters that were never incremented.
        let mut builder = Self {
            segments: Vec::new(),
            total_len: 0,
            slot_size,
            source,
            counters,
            fallback,
            released: true,
        };
        let first = builder.acquire_segment()?;
        builder.segments.push(first);

        builder.counters.builders_created.fetch_add(1, Ordering::Relaxed);
        builder.counters.active_builders.fetch_add(1, Ordering::Relaxed);
        builder.released = false;
        Ok(builder)
    }

    /// Total payload bytes appended so far.
    pub fn len(&self) -> usize {
        self.total_len
    }

    /// Returns `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.total_len == 0
    }

    /// Number of segments currently backing the response.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Appends `bytes` to the response.
    ///
    /// Acquires every additional segment the append needs before copying
    /// anything, so on error the response content is unchanged. An empty
    /// append is a no-op.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), BuilderError> {
        if bytes.is_empty() {
            return Ok(());
        }

        let free = self.segments.len() * self.slot_size - self.total_len;
        let deficit = bytes.len().saturating_sub(free);
        let needed = deficit.div_ceil(self.slot_size);

        let mut fresh = Vec::with_capacity(needed);
        for _ in 0..needed {
            match self.acquire_segment() {
                Ok(seg) => fresh.push(seg),
                Err(err) => {
                    // Unwind: the append must be all-or-nothing.
                    for seg in fresh {
                        self.put_back(seg);
                    }
                    return Err(err);
                }
            }
        }
        self.segments.extend(fresh);

        let mut remaining = bytes;
        while !remaining.is_empty() {
            let idx = self.total_len / self.slot_size;
            let within = self.total_len % self.slot_size;
            let take = remaining.len().min(self.slot_size - within);
            self.segments[idx].buf.as_mut_slice()[within..within + take]
                .copy_from_slice(&remaining[..take]);
            self.total_len += take;
            remaining = &remaining[take..];
        }

        self.counters
            .bytes_appended
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    /// Returns a borrowed view over the completed response.
    ///
    /// No copying: the view is the chain of used segment prefixes, suitable
    /// for vectored writes. The builder stays alive behind the view, so the
    /// segments cannot be recycled while it is read.
    pub fn finalize(&self) -> ResponseView<'_> {
        let mut chunks = Vec::with_capacity(self.segments.len());
        let mut remaining = self.total_len;
        for seg in &self.segments {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(self.slot_size);
            chunks.push(&seg.buf.as_slice()[..take]);
            remaining -= take;
        }
        ResponseView {
            chunks,
            total_len: self.total_len,
        }
    }

    /// Returns all segments to the source.
    ///
    /// Equivalent to dropping the builder; provided for call sites that want
    /// the return to be visible in the code.
    pub fn release(mut self) {
        self.return_all();
    }

    fn acquire_segment(&self) -> Result<Segment, BuilderError> {
        match self.source.try_acquire() {
            Ok(buf) => Ok(Segment {
                buf,
                from_source: true,
            }),
            Err(err @ PoolError::PoolExhausted { .. }) => {
                self.counters.exhaustion_events.fetch_add(1, Ordering::Relaxed);
                match self.fallback {
                    FallbackPolicy::Heap => {
                        self.counters.heap_fallbacks.fetch_add(1, Ordering::Relaxed);
                        tracing::debug!(slot_size = self.slot_size, "pool exhausted, heap segment");
                        Ok(Segment {
                            buf: PooledBuffer::unpooled(self.slot_size),
                            from_source: false,
                        })
                    }
                    FallbackPolicy::Fail => {
                        tracing::warn!("pool exhausted, response rejected");
                        Err(BuilderError::Exhausted(err))
                    }
                }
            }
            Err(err) => Err(BuilderError::Source(err)),
        }
    }

    fn put_back(&self, seg: Segment) {
        if seg.from_source {
            // The segment came from this source moments ago; a give-back
            // failure means the source is shutting down, and the handle's
            // own drop already restored the slot.
            let _ = self.source.give_back(seg.buf);
        }
    }

    fn return_all(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        for seg in self.segments.drain(..) {
            if seg.from_source {
                let _ = self.source.give_back(seg.buf);
            }
        }
        self.counters.active_builders.fetch_sub(1, Ordering::Relaxed);
    }
}

impl Drop for ResponseBuilder {
    fn drop(&mut self) {
        self.return_all();
    }
}

impl std::fmt::Debug for ResponseBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseBuilder")
            .field("len", &self.total_len)
            .field("segments", &self.segments.len())
            .field("slot_size", &self.slot_size)
            .finish()
    }
}

/// Borrowed view over a finalized response.
#[derive(Debug)]
pub struct ResponseView<'a> {
    chunks: Vec<&'a [u8]>,
    total_len: usize,
}

impl<'a> ResponseView<'a> {
    /// Total response length in bytes.
    pub fn len(&self) -> usize {
        self.total_len
    }

    /// Returns `true` for a zero-length response.
    pub fn is_empty(&self) -> bool {
        self.total_len == 0
    }

    /// The used prefix of each segment, in order.
    pub fn chunks(&self) -> &[&'a [u8]] {
        &self.chunks
    }

    /// Copies the response into one contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_len);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }
}
