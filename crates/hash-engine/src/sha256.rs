// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Incremental SHA-256 with a finalize-once state machine.
//!
//! The standard compression function over 512-bit blocks with big-endian
//! length padding is provided by `sha2`; what this module adds is the
//! lifecycle contract the rest of the core relies on: a state is updated
//! zero or more times, finalized exactly once, and rejects everything
//! afterward.

use crate::HashError;
use sha2::Digest as _;

/// Digest length in bytes. SHA-256 always produces exactly 32 bytes,
/// including for empty input.
pub const DIGEST_LEN: usize = 32;

/// Length of the lowercase hex encoding of a digest.
pub const HEX_LEN: usize = DIGEST_LEN * 2;

/// A 32-byte SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Returns the 64-character lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Writes the hex encoding into `out`.
    ///
    /// Fails with `BufferTooSmall` when `out` is shorter than [`HEX_LEN`]
    /// bytes — validated by length, before anything is written.
    pub fn write_hex(&self, out: &mut [u8]) -> Result<(), HashError> {
        if out.len() < HEX_LEN {
            return Err(HashError::BufferTooSmall { len: out.len() });
        }
        hex::encode_to_slice(self.0, &mut out[..HEX_LEN])
            .expect("destination length checked above");
        Ok(())
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An incremental SHA-256 hash state.
///
/// # Lifecycle
/// ```text
/// Sha256::new() ──update()*──► finalize() ──► Digest
///                                  │
///                                  ▼
///                     further update/finalize → InvalidState
/// ```
///
/// Each in-flight computation owns its state exclusively; states are never
/// shared across concurrent operations.
///
/// # Example
/// ```
/// use hash_engine::Sha256;
///
/// let mut state = Sha256::new();
/// state.update(b"hello ").unwrap();
/// state.update(b"world").unwrap();
/// let digest = state.finalize().unwrap();
/// assert_eq!(digest, Sha256::digest(b"hello world"));
/// ```
#[derive(Debug, Clone)]
pub struct Sha256 {
    /// `None` once finalized.
    inner: Option<sha2::Sha256>,
}

impl Sha256 {
    /// Creates a fresh hash state.
    pub fn new() -> Self {
        Self {
            inner: Some(sha2::Sha256::new()),
        }
    }

    /// Absorbs `bytes` into the state. Any call count, any chunk sizes.
    pub fn update(&mut self, bytes: &[u8]) -> Result<(), HashError> {
        match self.inner.as_mut() {
            Some(inner) => {
                inner.update(bytes);
                Ok(())
            }
            None => Err(HashError::InvalidState),
        }
    }

    /// Produces the digest and finalizes the state.
    ///
    /// The state rejects all further operations afterward.
    pub fn finalize(&mut self) -> Result<Digest, HashError> {
        let inner = self.inner.take().ok_or(HashError::InvalidState)?;
        let bytes: [u8; DIGEST_LEN] = inner.finalize().into();
        Ok(Digest(bytes))
    }

    /// One-shot convenience over init/update/finalize.
    pub fn digest(bytes: &[u8]) -> Digest {
        let mut state = Self::new();
        state.update(bytes).expect("fresh state accepts updates");
        state.finalize().expect("fresh state finalizes once")
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_HEX: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_HEX: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_empty_input_digest() {
        assert_eq!(Sha256::digest(b"").to_hex(), EMPTY_HEX);
    }

    #[test]
    fn test_known_vector() {
        assert_eq!(Sha256::digest(b"abc").to_hex(), ABC_HEX);
    }

    #[test]
    fn test_hex_is_always_64_chars() {
        for input in [&b""[..], b"a", b"abc", &[0u8; 1000]] {
            assert_eq!(Sha256::digest(input).to_hex().len(), HEX_LEN);
        }
    }

    #[test]
    fn test_incremental_equals_single_shot() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let single = Sha256::digest(data);

        // Every split point of the input must produce the same digest.
        for split in 0..=data.len() {
            let mut state = Sha256::new();
            state.update(&data[..split]).unwrap();
            state.update(&data[split..]).unwrap();
            assert_eq!(state.finalize().unwrap(), single, "split at {split}");
        }
    }

    #[test]
    fn test_update_after_finalize_rejected() {
        let mut state = Sha256::new();
        state.update(b"x").unwrap();
        state.finalize().unwrap();

        assert_eq!(state.update(b"y"), Err(HashError::InvalidState));
        assert_eq!(state.finalize().unwrap_err(), HashError::InvalidState);
    }

    #[test]
    fn test_write_hex_length_validation() {
        let digest = Sha256::digest(b"abc");

        let mut exact = [0u8; HEX_LEN];
        digest.write_hex(&mut exact).unwrap();
        assert_eq!(std::str::from_utf8(&exact).unwrap(), ABC_HEX);

        let mut small = [0u8; HEX_LEN - 1];
        assert_eq!(
            digest.write_hex(&mut small),
            Err(HashError::BufferTooSmall { len: HEX_LEN - 1 })
        );

        // Larger destinations are fine; only the first HEX_LEN bytes are used.
        let mut large = [b'.'; HEX_LEN + 4];
        digest.write_hex(&mut large).unwrap();
        assert_eq!(&large[HEX_LEN..], b"....");
    }

    #[test]
    fn test_display_matches_hex() {
        let digest = Sha256::digest(b"abc");
        assert_eq!(format!("{digest}"), digest.to_hex());
    }
}
