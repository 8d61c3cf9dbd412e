// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Request dispatch.
//!
//! The dispatcher owns the ordering contract of the whole core:
//! authentication strictly precedes buffer allocation. An unauthenticated
//! or rejected request never touches the response pool, so credential
//! probing cannot consume response memory.
//!
//! ```text
//!  request ──► evaluate credentials ──► Challenged / Rejected  (no pool use)
//!                      │
//!                Authenticated
//!                      ▼
//!            create_builder ──► handler appends ──► finalize ──► release
//!                      │                   │
//!                 exhausted ──────────────┴──► ServerBusy fault
//! ```

use crate::error::DispatchError;
use crate::fault::ProtocolFault;
use buffer_pool::{BufferPool, PoolConfig};
use device_config::DeviceConfig;
use http_auth::{AuthDecision, AuthManager, CredentialStore, SessionRegistry, SessionState};
use response_builder::{
    BuilderError, FallbackPolicy, ManagerStats, ResponseBuilder, ResponseManager,
};
use std::sync::Arc;
use std::time::Duration;

/// Per-request metadata the transport hands to the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct RequestMeta<'a> {
    /// Stable id of the connection the request arrived on.
    pub conn_id: u64,
    pub method: &'a str,
    pub uri: &'a str,
    /// Raw `Authorization` header value, if any.
    pub authorization: Option<&'a str>,
}

/// What the transport should do with the request.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Authenticated and handled; send `body` with 200.
    Completed { body: Vec<u8>, username: String },
    /// Send 401 with this `WWW-Authenticate` value.
    Challenge { www_authenticate: String, stale: bool },
    /// Send the fault envelope for this fault.
    Fault(ProtocolFault),
}

/// Authenticates requests and assembles responses over the shared pool.
pub struct Dispatcher {
    auth: Arc<AuthManager>,
    sessions: SessionRegistry,
    responses: ResponseManager,
}

impl Dispatcher {
    pub fn new(
        auth: Arc<AuthManager>,
        sessions: SessionRegistry,
        responses: ResponseManager,
    ) -> Self {
        Self {
            auth,
            sessions,
            responses,
        }
    }

    /// Builds the full stack (pool, auth, sessions) from device config.
    pub fn from_config(
        config: &DeviceConfig,
        credentials: Arc<CredentialStore>,
        fallback: FallbackPolicy,
    ) -> Result<Self, DispatchError> {
        config.validate()?;

        let pool = Arc::new(BufferPool::new(PoolConfig {
            capacity: config.server.pool_capacity,
            slot_size: config.server.pool_slot_size,
        })?);
        let auth = Arc::new(AuthManager::new(
            config.server.auth_realm.clone(),
            Duration::from_secs(config.server.nonce_validity_seconds),
            credentials,
        ));
        let sessions =
            SessionRegistry::new(Duration::from_secs(config.server.session_timeout_seconds));
        let responses = ResponseManager::new(pool, fallback);

        tracing::info!(
            realm = %config.server.auth_realm,
            pool_capacity = config.server.pool_capacity,
            "dispatcher ready"
        );
        Ok(Self::new(auth, sessions, responses))
    }

    /// Handles one request: gate on credentials, then let `build` append
    /// the response payload.
    ///
    /// `build` runs only for authenticated requests; segments are released
    /// on every exit path. Pool exhaustion faults this one request as
    /// `ServerBusy` and leaves the dispatcher healthy for the next.
    pub fn handle_request<F>(&self, meta: RequestMeta<'_>, build: F) -> DispatchOutcome
    where
        F: FnOnce(&mut ResponseBuilder) -> Result<(), BuilderError>,
    {
        let decision = match self
            .auth
            .evaluate(meta.authorization, meta.method, meta.uri)
        {
            Ok(decision) => decision,
            Err(err) => {
                // Broken header: treat like absent credentials.
                tracing::debug!(conn_id = meta.conn_id, %err, "unusable Authorization header");
                self.auth.challenge(false)
            }
        };

        let username = match decision {
            AuthDecision::Authenticated { username } => username,
            AuthDecision::Challenged { header, stale } => {
                self.sessions
                    .transition(meta.conn_id, SessionState::Challenged, None);
                return DispatchOutcome::Challenge {
                    www_authenticate: header,
                    stale,
                };
            }
            AuthDecision::Rejected { reason } => {
                tracing::debug!(conn_id = meta.conn_id, %reason, "request rejected");
                self.sessions
                    .transition(meta.conn_id, SessionState::Rejected, None);
                return DispatchOutcome::Fault(ProtocolFault::not_authorized());
            }
        };
        self.sessions
            .transition(meta.conn_id, SessionState::Authenticated, Some(&username));

        // Only now does the request get to allocate.
        let mut builder = match self.responses.create_builder() {
            Ok(builder) => builder,
            Err(BuilderError::Exhausted(_)) => {
                tracing::warn!(conn_id = meta.conn_id, "pool exhausted, ServerBusy");
                return DispatchOutcome::Fault(ProtocolFault::server_busy());
            }
            Err(err) => return DispatchOutcome::Fault(ProtocolFault::receiver(err.to_string())),
        };

        let outcome = match build(&mut builder) {
            Ok(()) => DispatchOutcome::Completed {
                body: builder.finalize().to_vec(),
                username,
            },
            Err(BuilderError::Exhausted(_)) => {
                tracing::warn!(conn_id = meta.conn_id, "pool exhausted mid-response");
                DispatchOutcome::Fault(ProtocolFault::server_busy())
            }
            Err(err) => DispatchOutcome::Fault(ProtocolFault::receiver(err.to_string())),
        };
        builder.release();
        outcome
    }

    /// Session state of a connection.
    pub fn session_state(&self, conn_id: u64) -> SessionState {
        self.sessions.state(conn_id)
    }

    /// Drops state of a closed connection.
    pub fn connection_closed(&self, conn_id: u64) {
        self.sessions.forget(conn_id);
    }

    /// Periodic housekeeping: expired sessions and nonces.
    pub fn sweep(&self) {
        self.sessions.sweep_expired();
        self.auth.cleanup_expired_nonces();
    }

    /// Response and pool usage snapshot.
    pub fn stats(&self) -> ManagerStats {
        self.responses.stats()
    }

    /// The authentication manager, for credential administration.
    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("realm", &self.auth.realm())
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
