// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for dispatcher construction.
//!
//! Per-request trouble never surfaces here: it becomes a
//! [`DispatchOutcome`](crate::DispatchOutcome) (challenge or fault) so one
//! bad request cannot take the dispatcher down.

use buffer_pool::PoolError;
use device_config::ConfigError;

/// Errors raised while building a dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The buffer pool could not be constructed.
    #[error("pool setup failed")]
    Pool(#[from] PoolError),

    /// The device configuration is invalid.
    #[error("configuration invalid")]
    Config(#[from] ConfigError),
}
