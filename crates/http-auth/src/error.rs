// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for authorization header handling.
//!
//! Only structurally broken input is an error here. A well-formed header
//! with wrong credentials is a [`AuthDecision::Rejected`](crate::AuthDecision)
//! outcome, not an error.

/// Errors raised while parsing or checking an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The header is not a Digest authorization value.
    #[error("malformed Authorization header: {0}")]
    MalformedHeader(String),

    /// A parameter Digest requires is absent.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The client asked for an algorithm other than SHA-256.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The client asked for a quality-of-protection other than `auth`.
    #[error("unsupported qop: {0}")]
    UnsupportedQop(String),
}
