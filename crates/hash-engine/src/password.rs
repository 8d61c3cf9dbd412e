// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Salted password records.
//!
//! A stored credential is `{salt, SHA-256(salt ‖ password)}` with a
//! per-credential random salt, so identical passwords hash differently and
//! precomputed lookup tables are useless. The text form is
//! `"<salt-hex>$<hash-hex>"`, the format the camera's credential store
//! persists.

use crate::{Digest, HashError, Sha256};
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::RngCore;

/// Salt length in bytes (32 hex chars in the text form).
pub const SALT_LEN: usize = 16;

/// Upper bound on accepted password length, bounding hashing cost from
/// untrusted input.
pub const MAX_PASSWORD_LEN: usize = 256;

/// A stored credential: fixed-length salt plus the salted digest.
///
/// The salt is generated once at creation and never changes; the hash is
/// never computed from the salt alone.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PasswordRecord {
    salt: [u8; SALT_LEN],
    hash: Digest,
}

impl PasswordRecord {
    /// The credential's salt.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// The salted digest.
    pub fn digest(&self) -> &Digest {
        &self.hash
    }

    /// Parses the `"<salt-hex>$<hash-hex>"` text form.
    pub fn parse(text: &str) -> Result<Self, HashError> {
        let (salt_hex, hash_hex) = text.split_once('$').ok_or_else(|| {
            HashError::InvalidArgument("password record missing '$' separator".into())
        })?;

        if salt_hex.len() != SALT_LEN * 2 {
            return Err(HashError::InvalidArgument(format!(
                "salt must be {} hex chars, got {}",
                SALT_LEN * 2,
                salt_hex.len()
            )));
        }

        let mut salt = [0u8; SALT_LEN];
        hex::decode_to_slice(salt_hex, &mut salt)
            .map_err(|e| HashError::InvalidArgument(format!("bad salt hex: {e}")))?;

        let mut hash = [0u8; crate::DIGEST_LEN];
        if hash_hex.len() != crate::HEX_LEN {
            return Err(HashError::InvalidArgument(format!(
                "hash must be {} hex chars, got {}",
                crate::HEX_LEN,
                hash_hex.len()
            )));
        }
        hex::decode_to_slice(hash_hex, &mut hash)
            .map_err(|e| HashError::InvalidArgument(format!("bad hash hex: {e}")))?;

        Ok(Self {
            salt,
            hash: Digest::from(hash),
        })
    }
}

impl std::fmt::Display for PasswordRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}${}", hex::encode(self.salt), self.hash.to_hex())
    }
}

impl From<PasswordRecord> for String {
    fn from(record: PasswordRecord) -> Self {
        record.to_string()
    }
}

impl TryFrom<String> for PasswordRecord {
    type Error = HashError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

/// Computes `SHA-256(salt ‖ password)` for the given salt.
fn salted_digest(salt: &[u8; SALT_LEN], password: &str) -> Digest {
    let mut state = Sha256::new();
    state.update(salt).expect("fresh state accepts updates");
    state
        .update(password.as_bytes())
        .expect("fresh state accepts updates");
    state.finalize().expect("fresh state finalizes once")
}

/// Hashes a password under a freshly generated random salt.
///
/// Fails with `InvalidLength` for an empty password or one longer than
/// [`MAX_PASSWORD_LEN`] bytes.
pub fn hash_password(password: &str) -> Result<PasswordRecord, HashError> {
    let len = password.len();
    if len == 0 || len > MAX_PASSWORD_LEN {
        return Err(HashError::InvalidLength { len });
    }

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    Ok(PasswordRecord {
        hash: salted_digest(&salt, password),
        salt,
    })
}

/// Verifies a password against a stored record.
///
/// Recomputes the salted digest and compares it in constant time, so the
/// comparison leaks nothing about partial matches. Returns only the boolean
/// outcome, never the recomputed hash. Inputs outside the accepted length
/// bound verify as `false` rather than erroring: at the call sites this is
/// always an adversarial-input path.
pub fn verify_password(password: &str, record: &PasswordRecord) -> bool {
    if password.is_empty() || password.len() > MAX_PASSWORD_LEN {
        return false;
    }
    let recomputed = salted_digest(&record.salt, password);
    constant_time_eq(recomputed.as_bytes(), record.hash.as_bytes())
}
