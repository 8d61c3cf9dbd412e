// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-connection authentication sessions.
//!
//! ```text
//! Unauthenticated ──challenge──► Challenged ──valid digest──► Authenticated
//!        │                          │
//!        └──────bad credentials─────┴────► Rejected
//! ```
//!
//! Sessions idle past the configured timeout are discarded; the connection's
//! next request starts over as `Unauthenticated`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Authentication progress of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    /// A challenge was sent; waiting for the client to answer it.
    Challenged,
    Authenticated,
    /// Credentials were presented and refused.
    Rejected,
}

#[derive(Debug, Clone)]
struct AuthSession {
    state: SessionState,
    username: Option<String>,
    last_seen: Instant,
}

/// Tracks [`SessionState`] per connection id.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<u64, AuthSession>>,
    timeout: Duration,
}

impl SessionRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    /// Current state of a connection. An expired or unknown session reads
    /// as `Unauthenticated`.
    pub fn state(&self, conn_id: u64) -> SessionState {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        match sessions.get(&conn_id) {
            Some(session) if session.last_seen.elapsed() <= self.timeout => session.state,
            Some(_) => {
                sessions.remove(&conn_id);
                SessionState::Unauthenticated
            }
            None => SessionState::Unauthenticated,
        }
    }

    /// Username of an authenticated connection.
    pub fn username(&self, conn_id: u64) -> Option<String> {
        let sessions = self.sessions.lock().expect("session lock poisoned");
        let session = sessions.get(&conn_id)?;
        if session.state == SessionState::Authenticated
            && session.last_seen.elapsed() <= self.timeout
        {
            session.username.clone()
        } else {
            None
        }
    }

    /// Records a state transition for a connection, refreshing its activity
    /// timestamp.
    pub fn transition(&self, conn_id: u64, state: SessionState, username: Option<&str>) {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.insert(
            conn_id,
            AuthSession {
                state,
                username: username.map(str::to_string),
                last_seen: Instant::now(),
            },
        );
    }

    /// Drops the session of a closed connection.
    pub fn forget(&self, conn_id: u64) {
        self.sessions
            .lock()
            .expect("session lock poisoned")
            .remove(&conn_id);
    }

    /// Discards every session idle past the timeout.
    pub fn sweep_expired(&self) {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen.elapsed() <= self.timeout);
        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!(dropped, "expired auth sessions swept");
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_connection_is_unauthenticated() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        assert_eq!(registry.state(1), SessionState::Unauthenticated);
    }

    #[test]
    fn test_transitions() {
        let registry = SessionRegistry::new(Duration::from_secs(60));

        registry.transition(1, SessionState::Challenged, None);
        assert_eq!(registry.state(1), SessionState::Challenged);
        assert_eq!(registry.username(1), None);

        registry.transition(1, SessionState::Authenticated, Some("admin"));
        assert_eq!(registry.state(1), SessionState::Authenticated);
        assert_eq!(registry.username(1).as_deref(), Some("admin"));

        // Connections are independent.
        registry.transition(2, SessionState::Rejected, None);
        assert_eq!(registry.state(1), SessionState::Authenticated);
        assert_eq!(registry.state(2), SessionState::Rejected);
    }

    #[test]
    fn test_expiry_resets_to_unauthenticated() {
        let registry = SessionRegistry::new(Duration::from_millis(10));
        registry.transition(1, SessionState::Authenticated, Some("admin"));

        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(registry.state(1), SessionState::Unauthenticated);
        assert_eq!(registry.username(1), None);
    }

    #[test]
    fn test_sweep_expired() {
        let registry = SessionRegistry::new(Duration::from_millis(10));
        registry.transition(1, SessionState::Challenged, None);
        registry.transition(2, SessionState::Authenticated, Some("a"));

        std::thread::sleep(Duration::from_millis(25));
        registry.transition(3, SessionState::Challenged, None);

        registry.sweep_expired();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.state(3), SessionState::Challenged);
    }

    #[test]
    fn test_forget() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        registry.transition(1, SessionState::Authenticated, Some("admin"));
        registry.forget(1);
        assert_eq!(registry.state(1), SessionState::Unauthenticated);
        assert!(registry.is_empty());
    }
}
