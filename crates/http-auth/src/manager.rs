// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The authentication manager: challenge generation and digest validation.

use crate::digest::{compute_response, DigestParams, QopContext};
use crate::error::AuthError;
use crate::store::CredentialStore;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Realm presented in challenges.
pub const DEFAULT_REALM: &str = "ONVIF Server";

/// How long an issued nonce stays usable.
pub const DEFAULT_NONCE_VALIDITY: Duration = Duration::from_secs(300);

/// Outcome of evaluating one request's credentials.
///
/// All three outcomes are ordinary values: a refused client is not an error
/// condition in the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// The digest checked out.
    Authenticated { username: String },
    /// No usable credentials; `header` is the `WWW-Authenticate` value to
    /// send with the 401. `stale` is set when a well-formed digest used an
    /// expired nonce, telling the client to retry without re-prompting.
    Challenged { header: String, stale: bool },
    /// Credentials were presented and refused.
    Rejected { reason: RejectReason },
}

/// Why credentials were refused. Internal diagnostics only; the wire
/// response is the same 401 for every reason, so a probe cannot tell a
/// missing user from a wrong password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnknownUser,
    BadDigest,
    RealmMismatch,
    NonceReplay,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RejectReason::UnknownUser => "unknown user",
            RejectReason::BadDigest => "digest mismatch",
            RejectReason::RealmMismatch => "realm mismatch",
            RejectReason::NonceReplay => "nonce-count replay",
        };
        f.write_str(text)
    }
}

struct NonceEntry {
    created: Instant,
    /// Next nonce count the client must present. Strictly increasing, so a
    /// captured request cannot be replayed.
    expected_nc: u32,
}

/// HTTP Digest authentication over stored salted credentials.
///
/// RFC 7616 shape, `algorithm=SHA-256`, `qop="auth"` (or no qop). The HA1
/// secret is the stored password hash, never a plaintext password.
pub struct AuthManager {
    realm: String,
    nonce_validity: Duration,
    nonces: Mutex<HashMap<String, NonceEntry>>,
    credentials: Arc<CredentialStore>,
}

impl AuthManager {
    pub fn new(
        realm: impl Into<String>,
        nonce_validity: Duration,
        credentials: Arc<CredentialStore>,
    ) -> Self {
        Self {
            realm: realm.into(),
            nonce_validity,
            nonces: Mutex::new(HashMap::new()),
            credentials,
        }
    }

    /// Manager with the stock realm and nonce validity.
    pub fn with_defaults(credentials: Arc<CredentialStore>) -> Self {
        Self::new(DEFAULT_REALM, DEFAULT_NONCE_VALIDITY, credentials)
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Evaluates the `Authorization` header of one request.
    ///
    /// `Err` only for structurally broken headers; every policy outcome is
    /// an [`AuthDecision`].
    pub fn evaluate(
        &self,
        authorization: Option<&str>,
        method: &str,
        uri: &str,
    ) -> Result<AuthDecision, AuthError> {
        let header = match authorization {
            Some(header) => header,
            None => {
                tracing::debug!("no credentials, challenging");
                return Ok(self.challenge(false));
            }
        };

        let params = DigestParams::parse(header)?;

        if let Some(alg) = params.algorithm.as_deref() {
            if !alg.eq_ignore_ascii_case("sha-256") {
                return Err(AuthError::UnsupportedAlgorithm(alg.to_string()));
            }
        }
        let qop = match params.qop.as_deref() {
            None => None,
            Some("auth") => Some(QopContext {
                nc: params
                    .nc
                    .as_deref()
                    .ok_or(AuthError::MissingParameter("nc"))?,
                cnonce: params
                    .cnonce
                    .as_deref()
                    .ok_or(AuthError::MissingParameter("cnonce"))?,
                qop: "auth",
            }),
            Some(other) => return Err(AuthError::UnsupportedQop(other.to_string())),
        };

        if params.realm != self.realm {
            return Ok(self.reject(&params.username, RejectReason::RealmMismatch));
        }

        let record = match self.credentials.record(&params.username) {
            Some(record) => record,
            None => return Ok(self.reject(&params.username, RejectReason::UnknownUser)),
        };

        match self.check_nonce(&params.nonce, qop.map(|q| q.nc)) {
            NonceCheck::Ok => {}
            NonceCheck::Stale => {
                tracing::debug!(username = %params.username, "stale nonce, re-challenging");
                return Ok(self.challenge(true));
            }
            NonceCheck::Replay => {
                return Ok(self.reject(&params.username, RejectReason::NonceReplay));
            }
        }

        let expected = compute_response(
            &record,
            &params.username,
            &params.realm,
            method,
            uri,
            &params.nonce,
            qop,
        );

        if constant_time_eq(expected.as_bytes(), params.response.as_bytes()) {
            tracing::debug!(username = %params.username, "authenticated");
            Ok(AuthDecision::Authenticated {
                username: params.username,
            })
        } else {
            Ok(self.reject(&params.username, RejectReason::BadDigest))
        }
    }

    /// Builds a fresh challenge outcome.
    pub fn challenge(&self, stale: bool) -> AuthDecision {
        let nonce = self.generate_nonce();
        let mut header = format!(
            r#"Digest realm="{}", nonce="{nonce}", qop="auth", algorithm=SHA-256"#,
            self.realm
        );
        if stale {
            header.push_str(", stale=true");
        }
        AuthDecision::Challenged { header, stale }
    }

    /// Mints and registers a nonce: 32 random bytes, Base64.
    pub fn generate_nonce(&self) -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let nonce = BASE64.encode(bytes);

        self.nonces.lock().expect("nonce lock poisoned").insert(
            nonce.clone(),
            NonceEntry {
                created: Instant::now(),
                expected_nc: 1,
            },
        );
        nonce
    }

    /// Drops expired nonces. Called periodically to bound memory.
    pub fn cleanup_expired_nonces(&self) {
        self.nonces
            .lock()
            .expect("nonce lock poisoned")
            .retain(|_, entry| entry.created.elapsed() <= self.nonce_validity);
    }

    /// Number of live nonces.
    pub fn active_nonces(&self) -> usize {
        self.nonces.lock().expect("nonce lock poisoned").len()
    }

    fn reject(&self, username: &str, reason: RejectReason) -> AuthDecision {
        tracing::debug!(username, %reason, "credentials refused");
        AuthDecision::Rejected { reason }
    }

    fn check_nonce(&self, nonce: &str, nc: Option<&str>) -> NonceCheck {
        let mut nonces = self.nonces.lock().expect("nonce lock poisoned");
        let entry = match nonces.get_mut(nonce) {
            Some(entry) => entry,
            None => return NonceCheck::Stale,
        };
        if entry.created.elapsed() > self.nonce_validity {
            nonces.remove(nonce);
            return NonceCheck::Stale;
        }
        if let Some(nc_str) = nc {
            let nc_value = match u32::from_str_radix(nc_str, 16) {
                Ok(v) => v,
                Err(_) => return NonceCheck::Replay,
            };
            if nc_value != entry.expected_nc {
                return NonceCheck::Replay;
            }
            match nc_value.checked_add(1) {
                Some(next) => entry.expected_nc = next,
                // Counter space spent. Retire the nonce so the next request
                // gets a fresh challenge instead of a replayable count.
                None => {
                    nonces.remove(nonce);
                }
            }
        }
        NonceCheck::Ok
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("realm", &self.realm)
            .field("nonce_validity", &self.nonce_validity)
            .field("active_nonces", &self.active_nonces())
            .finish()
    }
}

enum NonceCheck {
    Ok,
    Stale,
    Replay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_nonce_count_retires_nonce() {
        let store = Arc::new(CredentialStore::new());
        store.set_password("admin", "pw").unwrap();
        let manager = AuthManager::with_defaults(Arc::clone(&store));

        // Seed a nonce whose counter is already at the end of its range.
        let nonce = "nc-at-the-limit".to_string();
        manager.nonces.lock().unwrap().insert(
            nonce.clone(),
            NonceEntry {
                created: Instant::now(),
                expected_nc: u32::MAX,
            },
        );

        let record = store.record("admin").unwrap();
        let qop = QopContext {
            nc: "ffffffff",
            cnonce: "c",
            qop: "auth",
        };
        let response =
            compute_response(&record, "admin", DEFAULT_REALM, "GET", "/", &nonce, Some(qop));
        let header = format!(
            r#"Digest username="admin", realm="{DEFAULT_REALM}", nonce="{nonce}", uri="/", response="{response}", qop=auth, nc=ffffffff, cnonce="c", algorithm=SHA-256"#
        );

        // The last count is still honored.
        let decision = manager.evaluate(Some(&header), "GET", "/").unwrap();
        assert!(matches!(decision, AuthDecision::Authenticated { .. }));
        assert_eq!(manager.active_nonces(), 0);

        // The spent nonce now reads as stale, not as a replay window.
        let retry = manager.evaluate(Some(&header), "GET", "/").unwrap();
        assert!(matches!(
            retry,
            AuthDecision::Challenged { stale: true, .. }
        ));
    }
}
