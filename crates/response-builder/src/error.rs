// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for response construction.

use buffer_pool::PoolError;

/// Errors that can occur while building a response.
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    /// The buffer source could not supply a segment and heap fallback is
    /// disabled. A failed append writes nothing; the response keeps its
    /// previous content.
    #[error("buffer source exhausted while growing response")]
    Exhausted(#[source] PoolError),

    /// The underlying source rejected an operation for a reason other than
    /// exhaustion, e.g. it was shut down mid-request.
    #[error("buffer source error")]
    Source(#[from] PoolError),
}
