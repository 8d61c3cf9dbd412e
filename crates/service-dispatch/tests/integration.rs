// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Full-stack dispatch flows: credentials gate the pool, faults isolate
//! failures to one request, and nothing leaks under concurrency.

use buffer_pool::{BufferPool, PoolConfig};
use http_auth::{compute_response, AuthManager, CredentialStore, SessionRegistry, SessionState, DEFAULT_REALM};
use response_builder::{FallbackPolicy, ResponseManager};
use service_dispatch::{DispatchOutcome, Dispatcher, FaultCode, RequestMeta};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const METHOD: &str = "POST";
const URI: &str = "/onvif/device_service";

fn stack(
    capacity: usize,
    slot_size: usize,
    fallback: FallbackPolicy,
) -> (Dispatcher, Arc<BufferPool>) {
    let pool = Arc::new(
        BufferPool::new(PoolConfig {
            capacity,
            slot_size,
        })
        .unwrap(),
    );

    let credentials = Arc::new(CredentialStore::new());
    credentials.set_password("admin", "pass123").unwrap();

    let dispatcher = Dispatcher::new(
        Arc::new(AuthManager::with_defaults(credentials)),
        SessionRegistry::new(Duration::from_secs(60)),
        ResponseManager::new(pool.clone(), fallback),
    );
    (dispatcher, pool)
}

fn meta<'a>(conn_id: u64, authorization: Option<&'a str>) -> RequestMeta<'a> {
    RequestMeta {
        conn_id,
        method: METHOD,
        uri: URI,
        authorization,
    }
}

fn nonce_of(challenge: &str) -> String {
    let start = challenge.find("nonce=\"").expect("challenge has nonce") + 7;
    let end = challenge[start..].find('"').unwrap() + start;
    challenge[start..end].to_string()
}

/// Runs the unauthenticated half of the handshake and returns the nonce.
fn obtain_nonce(dispatcher: &Dispatcher, conn_id: u64) -> String {
    match dispatcher.handle_request(meta(conn_id, None), |_| Ok(())) {
        DispatchOutcome::Challenge {
            www_authenticate,
            stale,
        } => {
            assert!(!stale);
            nonce_of(&www_authenticate)
        }
        other => panic!("expected challenge, got {other:?}"),
    }
}

fn admin_header(dispatcher: &Dispatcher, nonce: &str) -> String {
    let record = dispatcher
        .auth()
        .credentials()
        .record("admin")
        .expect("admin exists");
    let response = compute_response(&record, "admin", DEFAULT_REALM, METHOD, URI, nonce, None);
    format!(
        r#"Digest username="admin", realm="{DEFAULT_REALM}", nonce="{nonce}", uri="{URI}", response="{response}""#
    )
}

#[test]
fn test_unauthenticated_request_never_allocates() {
    let (dispatcher, pool) = stack(4, 64, FallbackPolicy::Fail);
    let handler_ran = AtomicBool::new(false);

    let outcome = dispatcher.handle_request(meta(1, None), |builder| {
        handler_ran.store(true, Ordering::Relaxed);
        builder.append(b"should never happen")
    });

    assert!(matches!(outcome, DispatchOutcome::Challenge { .. }));
    assert!(!handler_ran.load(Ordering::Relaxed));
    assert_eq!(pool.stats().total_acquires, 0);
    assert_eq!(dispatcher.session_state(1), SessionState::Challenged);
}

#[test]
fn test_rejected_request_never_allocates() {
    let (dispatcher, pool) = stack(4, 64, FallbackPolicy::Fail);
    let nonce = obtain_nonce(&dispatcher, 1);

    // Response computed from the wrong credential.
    let wrong = hash_engine::hash_password("not-the-password").unwrap();
    let response = compute_response(&wrong, "admin", DEFAULT_REALM, METHOD, URI, &nonce, None);
    let header = format!(
        r#"Digest username="admin", realm="{DEFAULT_REALM}", nonce="{nonce}", uri="{URI}", response="{response}""#
    );

    let outcome = dispatcher.handle_request(meta(1, Some(&header)), |builder| {
        builder.append(b"should never happen")
    });

    match outcome {
        DispatchOutcome::Fault(fault) => assert_eq!(fault.code, FaultCode::NotAuthorized),
        other => panic!("expected fault, got {other:?}"),
    }
    assert_eq!(pool.stats().total_acquires, 0);
    assert_eq!(dispatcher.session_state(1), SessionState::Rejected);
}

#[test]
fn test_authenticated_request_completes() {
    let (dispatcher, pool) = stack(4, 16, FallbackPolicy::Fail);

    let nonce = obtain_nonce(&dispatcher, 1);
    let header = admin_header(&dispatcher, &nonce);

    let outcome = dispatcher.handle_request(meta(1, Some(&header)), |builder| {
        builder.append(b"<GetDeviceInformationResponse>")?;
        builder.append(b"</GetDeviceInformationResponse>")
    });

    match outcome {
        DispatchOutcome::Completed { body, username } => {
            assert_eq!(username, "admin");
            assert_eq!(
                body,
                b"<GetDeviceInformationResponse></GetDeviceInformationResponse>"
            );
        }
        other => panic!("expected completion, got {other:?}"),
    }

    assert_eq!(dispatcher.session_state(1), SessionState::Authenticated);
    // Segments returned on completion.
    assert_eq!(pool.stats().issued_count, 0);
    assert!(pool.stats().total_acquires >= 1);
    assert_eq!(dispatcher.stats().builders_created, 1);
}

#[test]
fn test_malformed_header_is_rechallenged() {
    let (dispatcher, pool) = stack(4, 64, FallbackPolicy::Fail);

    let outcome =
        dispatcher.handle_request(meta(1, Some("Basic dXNlcjpwYXNz")), |_| Ok(()));
    assert!(matches!(outcome, DispatchOutcome::Challenge { .. }));
    assert_eq!(pool.stats().total_acquires, 0);
}

#[test]
fn test_exhaustion_faults_one_request_then_recovers() {
    let (dispatcher, pool) = stack(1, 64, FallbackPolicy::Fail);

    // Something else holds the only slot.
    let held = pool.acquire().unwrap();

    let nonce = obtain_nonce(&dispatcher, 1);
    let header = admin_header(&dispatcher, &nonce);
    let outcome = dispatcher.handle_request(meta(1, Some(&header)), |b| b.append(b"x"));
    match outcome {
        DispatchOutcome::Fault(fault) => assert_eq!(fault.code, FaultCode::ServerBusy),
        other => panic!("expected ServerBusy, got {other:?}"),
    }

    // Slot comes back; the next request succeeds.
    pool.give_back(held).unwrap();
    let nonce = obtain_nonce(&dispatcher, 1);
    let header = admin_header(&dispatcher, &nonce);
    assert!(matches!(
        dispatcher.handle_request(meta(1, Some(&header)), |b| b.append(b"x")),
        DispatchOutcome::Completed { .. }
    ));
    assert_eq!(pool.stats().issued_count, 0);
}

#[test]
fn test_mid_response_exhaustion_releases_segments() {
    let (dispatcher, pool) = stack(1, 8, FallbackPolicy::Fail);

    let nonce = obtain_nonce(&dispatcher, 1);
    let header = admin_header(&dispatcher, &nonce);

    // First segment fits; growing past it has no second slot.
    let outcome = dispatcher.handle_request(meta(1, Some(&header)), |builder| {
        builder.append(b"12345678")?;
        builder.append(b"overflow")
    });
    match outcome {
        DispatchOutcome::Fault(fault) => assert_eq!(fault.code, FaultCode::ServerBusy),
        other => panic!("expected ServerBusy, got {other:?}"),
    }
    assert_eq!(pool.stats().issued_count, 0);
}

#[test]
fn test_from_config_wires_the_stack() {
    let mut config = device_config::DeviceConfig::default();
    config.server.pool_capacity = 2;
    config.server.pool_slot_size = 128;

    let credentials = Arc::new(CredentialStore::new());
    credentials.set_password("admin", "pass123").unwrap();
    let dispatcher =
        Dispatcher::from_config(&config, credentials, FallbackPolicy::Fail).unwrap();

    let nonce = obtain_nonce(&dispatcher, 7);
    let header = admin_header(&dispatcher, &nonce);
    assert!(matches!(
        dispatcher.handle_request(meta(7, Some(&header)), |b| b.append(b"ok")),
        DispatchOutcome::Completed { .. }
    ));
}

#[test]
fn test_from_config_rejects_invalid_config() {
    let mut config = device_config::DeviceConfig::default();
    config.imaging.hue = 999;

    let result = Dispatcher::from_config(
        &config,
        Arc::new(CredentialStore::new()),
        FallbackPolicy::Fail,
    );
    assert!(matches!(
        result,
        Err(service_dispatch::DispatchError::Config(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_leak_nothing() {
    let (dispatcher, pool) = stack(8, 32, FallbackPolicy::Heap);
    let dispatcher = Arc::new(dispatcher);

    let mut tasks = Vec::new();
    for conn_id in 0..32u64 {
        let dispatcher = Arc::clone(&dispatcher);
        tasks.push(tokio::spawn(async move {
            for round in 0..20 {
                let nonce = obtain_nonce(&dispatcher, conn_id);
                let header = admin_header(&dispatcher, &nonce);
                let payload = vec![b'a' + (round % 26) as u8; 100];
                match dispatcher.handle_request(meta(conn_id, Some(&header)), |b| {
                    b.append(&payload)
                }) {
                    DispatchOutcome::Completed { body, .. } => assert_eq!(body, payload),
                    other => panic!("expected completion, got {other:?}"),
                }
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let stats = pool.stats();
    assert_eq!(stats.issued_count, 0);
    assert_eq!(dispatcher.stats().active_builders, 0);
    assert_eq!(dispatcher.stats().builders_created, 32 * 20);
}
