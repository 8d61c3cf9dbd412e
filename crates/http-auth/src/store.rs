// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! In-memory credential store.
//!
//! Holds only [`PasswordRecord`]s; plaintext passwords exist transiently
//! inside [`set_password`](CredentialStore::set_password) and nowhere else.

use hash_engine::{hash_password, HashError, PasswordRecord};
use std::collections::HashMap;
use std::sync::Mutex;

/// Username → salted-hash credential map.
#[derive(Debug, Default)]
pub struct CredentialStore {
    users: Mutex<HashMap<String, PasswordRecord>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user or replaces an existing user's credential.
    ///
    /// The new record gets a fresh salt, so updating a password to the same
    /// value still changes the stored record.
    pub fn set_password(&self, username: &str, password: &str) -> Result<(), HashError> {
        if username.is_empty() {
            return Err(HashError::InvalidArgument("empty username".to_string()));
        }
        let record = hash_password(password)?;
        self.users
            .lock()
            .expect("credential lock poisoned")
            .insert(username.to_string(), record);
        tracing::debug!(username, "credential stored");
        Ok(())
    }

    /// Removes a user. Returns `false` if the user did not exist.
    pub fn remove(&self, username: &str) -> bool {
        let removed = self
            .users
            .lock()
            .expect("credential lock poisoned")
            .remove(username)
            .is_some();
        if removed {
            tracing::debug!(username, "credential removed");
        }
        removed
    }

    /// Looks up a user's stored record.
    pub fn record(&self, username: &str) -> Option<PasswordRecord> {
        self.users
            .lock()
            .expect("credential lock poisoned")
            .get(username)
            .cloned()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.lock().expect("credential lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
