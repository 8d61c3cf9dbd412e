// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Digest header parsing and response computation.
//!
//! The digest shape is RFC 7616 with `algorithm=SHA-256` and `qop="auth"`:
//!
//! ```text
//! HA1      = SHA-256(username:realm:credential)
//! HA2      = SHA-256(method:uri)
//! response = SHA-256(HA1:nonce:nc:cnonce:qop:HA2)   with qop
//!          = SHA-256(HA1:nonce:HA2)                 without
//! ```
//!
//! `credential` is the hex of the stored salted password hash, never the
//! plaintext password. The server only ever keeps [`PasswordRecord`]s, so
//! that is also what clients must derive their responses from.

use crate::error::AuthError;
use hash_engine::{PasswordRecord, Sha256};
use std::collections::HashMap;

/// Parsed parameters of a `Digest` authorization header.
#[derive(Debug, Clone)]
pub struct DigestParams {
    pub username: String,
    pub realm: String,
    pub nonce: String,
    pub uri: String,
    pub response: String,
    /// Nonce count, hex string. Required with `qop`.
    pub nc: Option<String>,
    /// Client nonce. Required with `qop`.
    pub cnonce: Option<String>,
    pub qop: Option<String>,
    pub algorithm: Option<String>,
    pub opaque: Option<String>,
}

impl DigestParams {
    /// Parses an `Authorization` header value.
    ///
    /// Expected form: `Digest username="admin", realm="...", ...`. Unknown
    /// parameters are ignored; missing required parameters are reported by
    /// name.
    pub fn parse(header: &str) -> Result<Self, AuthError> {
        let params_str = header
            .strip_prefix("Digest ")
            .or_else(|| header.strip_prefix("digest "))
            .ok_or_else(|| AuthError::MalformedHeader("missing Digest prefix".to_string()))?;

        let mut params = HashMap::new();
        for part in split_params(params_str) {
            if let Some((key, value)) = part.trim().split_once('=') {
                params.insert(
                    key.trim().to_lowercase(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }

        fn required(
            params: &mut HashMap<String, String>,
            name: &'static str,
        ) -> Result<String, AuthError> {
            params.remove(name).ok_or(AuthError::MissingParameter(name))
        }

        Ok(Self {
            username: required(&mut params, "username")?,
            realm: required(&mut params, "realm")?,
            nonce: required(&mut params, "nonce")?,
            uri: required(&mut params, "uri")?,
            response: required(&mut params, "response")?,
            nc: params.remove("nc"),
            cnonce: params.remove("cnonce"),
            qop: params.remove("qop"),
            algorithm: params.remove("algorithm"),
            opaque: params.remove("opaque"),
        })
    }
}

/// Splits a parameter list on the commas that sit outside quoted strings,
/// so a quoted value may itself contain commas.
fn split_params(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, ch) in input.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Extra digest inputs present when the client uses `qop`.
#[derive(Debug, Clone, Copy)]
pub struct QopContext<'a> {
    pub nc: &'a str,
    pub cnonce: &'a str,
    pub qop: &'a str,
}

/// Computes the digest response a correct client would send.
///
/// Shared by server-side validation and by test clients; there is exactly
/// one definition of the algorithm.
pub fn compute_response(
    record: &PasswordRecord,
    username: &str,
    realm: &str,
    method: &str,
    uri: &str,
    nonce: &str,
    qop: Option<QopContext<'_>>,
) -> String {
    let ha1 = sha256_hex(&format!("{username}:{realm}:{}", record.digest().to_hex()));
    let ha2 = sha256_hex(&format!("{method}:{uri}"));

    match qop {
        Some(QopContext { nc, cnonce, qop }) => {
            sha256_hex(&format!("{ha1}:{nonce}:{nc}:{cnonce}:{qop}:{ha2}"))
        }
        None => sha256_hex(&format!("{ha1}:{nonce}:{ha2}")),
    }
}

fn sha256_hex(input: &str) -> String {
    Sha256::digest(input.as_bytes()).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_header() {
        let header = r#"Digest username="admin", realm="ONVIF Server", nonce="abc123", uri="/onvif/device", response="deadbeef", qop=auth, nc=00000001, cnonce="xyz789", algorithm=SHA-256"#;

        let params = DigestParams::parse(header).unwrap();
        assert_eq!(params.username, "admin");
        assert_eq!(params.realm, "ONVIF Server");
        assert_eq!(params.nonce, "abc123");
        assert_eq!(params.uri, "/onvif/device");
        assert_eq!(params.response, "deadbeef");
        assert_eq!(params.qop.as_deref(), Some("auth"));
        assert_eq!(params.nc.as_deref(), Some("00000001"));
        assert_eq!(params.cnonce.as_deref(), Some("xyz789"));
        assert_eq!(params.algorithm.as_deref(), Some("SHA-256"));
    }

    #[test]
    fn test_parse_minimal_header() {
        let header = r#"Digest username="u", realm="r", nonce="n", uri="/", response="x""#;
        let params = DigestParams::parse(header).unwrap();
        assert!(params.qop.is_none());
        assert!(params.nc.is_none());
        assert!(params.cnonce.is_none());
    }

    #[test]
    fn test_parse_quoted_value_keeps_commas() {
        let header = r#"Digest username="a,b", realm="r", nonce="n", uri="/svc?ids=1,2,3", response="x""#;
        let params = DigestParams::parse(header).unwrap();
        assert_eq!(params.username, "a,b");
        assert_eq!(params.uri, "/svc?ids=1,2,3");
        assert_eq!(params.realm, "r");
    }

    #[test]
    fn test_parse_rejects_non_digest() {
        let err = DigestParams::parse("Basic dXNlcjpwYXNz").unwrap_err();
        assert!(matches!(err, AuthError::MalformedHeader(_)));
    }

    #[test]
    fn test_parse_reports_missing_parameter() {
        let header = r#"Digest realm="r", nonce="n", uri="/", response="x""#;
        assert_eq!(
            DigestParams::parse(header).unwrap_err(),
            AuthError::MissingParameter("username")
        );
    }

    #[test]
    fn test_response_depends_on_every_input() {
        let record = hash_engine::hash_password("secret").unwrap();
        let base = compute_response(&record, "u", "r", "GET", "/", "nonce", None);

        assert_ne!(
            base,
            compute_response(&record, "v", "r", "GET", "/", "nonce", None)
        );
        assert_ne!(
            base,
            compute_response(&record, "u", "r", "POST", "/", "nonce", None)
        );
        assert_ne!(
            base,
            compute_response(&record, "u", "r", "GET", "/", "other", None)
        );

        let with_qop = compute_response(
            &record,
            "u",
            "r",
            "GET",
            "/",
            "nonce",
            Some(QopContext {
                nc: "00000001",
                cnonce: "c",
                qop: "auth",
            }),
        );
        assert_ne!(base, with_qop);
    }
}
