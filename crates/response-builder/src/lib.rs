// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # response-builder
//!
//! Incremental response construction for the camera server core. Responses
//! (SOAP envelopes, mostly) are built piece by piece into chains of
//! fixed-size segments drawn from a [`buffer_pool`] source, bounding
//! per-response memory without a reallocating byte vector.
//!
//! # Key Components
//!
//! - [`ResponseManager`] — factory owning the shared buffer source and the
//!   usage counters; one per server, cloned per connection.
//! - [`ResponseBuilder`] — one in-flight response. Appends are atomic: the
//!   segments an append needs are acquired before any byte is copied, so a
//!   failed append leaves the response unchanged.
//! - [`ResponseView`] — zero-copy finalized view, one chunk per segment,
//!   ready for vectored I/O.
//! - [`FallbackPolicy`] — what exhaustion means: a hard
//!   [`BuilderError::Exhausted`] (the default) or heap fallback.
//!
//! Segment ownership is RAII end to end: dropping a builder returns every
//! pooled segment, so a response abandoned mid-build leaks nothing.
//!
//! # Example
//! ```
//! use buffer_pool::{BufferPool, PoolConfig};
//! use response_builder::{FallbackPolicy, ResponseManager};
//! use std::sync::Arc;
//!
//! let pool = Arc::new(BufferPool::new(PoolConfig {
//!     capacity: 4,
//!     slot_size: 1024,
//! })?);
//! let manager = ResponseManager::new(pool, FallbackPolicy::Heap);
//!
//! let mut builder = manager.create_builder()?;
//! builder.append(b"<Envelope>")?;
//! builder.append(b"</Envelope>")?;
//! assert_eq!(builder.finalize().to_vec(), b"<Envelope></Envelope>");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod error;
mod manager;
mod stats;

pub use builder::{ResponseBuilder, ResponseView};
pub use error::BuilderError;
pub use manager::{FallbackPolicy, ResponseManager};
pub use stats::ManagerStats;
