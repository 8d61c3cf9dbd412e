// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # http-auth
//!
//! HTTP Digest authentication for the camera server core: challenge
//! generation, digest validation, credential storage, and per-connection
//! session tracking. RFC 7616 shape with `algorithm=SHA-256` and
//! `qop="auth"`.
//!
//! # Key Components
//!
//! - [`AuthManager`] — evaluates one request's `Authorization` header into
//!   an [`AuthDecision`]: `Authenticated`, `Challenged` (with the
//!   `WWW-Authenticate` value to send), or `Rejected`. Decisions are plain
//!   values; only structurally broken headers are errors.
//! - [`CredentialStore`] — username → [`PasswordRecord`] map. Plaintext
//!   passwords are hashed on entry and never retained, which is also why
//!   HA1 is derived from the stored hash rather than the password.
//! - [`SessionRegistry`] — `Unauthenticated → Challenged → Authenticated /
//!   Rejected` per connection, with idle expiry.
//! - [`DigestParams`] / [`compute_response`] — header parsing and the one
//!   shared definition of the digest computation.
//!
//! Nonces are single-registry, Base64 of 32 random bytes, with strict
//! nonce-count progression so captured requests cannot be replayed. A stale
//! nonce on an otherwise well-formed request re-challenges with
//! `stale=true` instead of rejecting.
//!
//! [`PasswordRecord`]: hash_engine::PasswordRecord

mod digest;
mod error;
mod manager;
mod session;
mod store;

pub use digest::{compute_response, DigestParams, QopContext};
pub use error::AuthError;
pub use manager::{
    AuthDecision, AuthManager, RejectReason, DEFAULT_NONCE_VALIDITY, DEFAULT_REALM,
};
pub use session::{SessionRegistry, SessionState};
pub use store::CredentialStore;
