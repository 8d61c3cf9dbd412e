// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for hashing and credential handling.

use crate::{HEX_LEN, MAX_PASSWORD_LEN};

/// Errors that can occur while hashing or handling credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// The hash state was already finalized; further use is rejected.
    #[error("hash state already finalized")]
    InvalidState,

    /// The destination buffer cannot hold the hex encoding.
    #[error("destination too small: {len} bytes, need {HEX_LEN}")]
    BufferTooSmall { len: usize },

    /// Password length is outside the accepted bound (1..={MAX_PASSWORD_LEN}
    /// bytes), which caps hashing cost from untrusted input.
    #[error("invalid password length {len} (accepted: 1..={MAX_PASSWORD_LEN} bytes)")]
    InvalidLength { len: usize },

    /// A required input is empty or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
