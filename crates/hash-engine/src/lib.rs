// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # hash-engine
//!
//! SHA-256 hashing and salted password credentials for the camera server
//! core. Every inbound request is authenticated through this crate before a
//! single response buffer is allocated, so its contracts are deliberately
//! strict: finalize-once hash states, length-validated hex encoding, and
//! constant-time credential comparison.
//!
//! # Key Components
//!
//! - [`Sha256`] — an incremental hash state. Any number of `update` calls
//!   with any chunking, one `finalize`; use after finalize is rejected with
//!   [`HashError::InvalidState`] instead of silently producing garbage.
//! - [`Digest`] — the 32-byte result, with length-checked lowercase hex
//!   encoding.
//! - [`PasswordRecord`] — `{salt, SHA-256(salt ‖ password)}` with a stable
//!   `"<salt-hex>$<hash-hex>"` text form for credential storage.
//! - [`hash_password`] / [`verify_password`] — the only two operations the
//!   rest of the system needs; verification is constant-time and never
//!   exposes the recomputed hash.
//!
//! The compression function itself comes from the `sha2` crate; this crate
//! owns the state-machine and credential semantics layered on top.
//!
//! # Example
//! ```
//! use hash_engine::{hash_password, verify_password, Sha256};
//!
//! let record = hash_password("correct horse").unwrap();
//! assert!(verify_password("correct horse", &record));
//! assert!(!verify_password("wrong horse", &record));
//!
//! let digest = Sha256::digest(b"");
//! assert_eq!(
//!     digest.to_hex(),
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
//! );
//! ```

mod error;
mod password;
mod sha256;

pub use error::HashError;
pub use password::{hash_password, verify_password, PasswordRecord, MAX_PASSWORD_LEN, SALT_LEN};
pub use sha256::{Digest, Sha256, DIGEST_LEN, HEX_LEN};
