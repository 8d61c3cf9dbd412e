// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # service-dispatch
//!
//! The top layer of the camera server core: takes one request's metadata,
//! gates it through HTTP Digest authentication, and only then assembles the
//! response from pooled buffers. Failures become [`ProtocolFault`]s or
//! challenges, never panics, so a hostile or unlucky request costs the
//! server one outcome value and nothing else.
//!
//! # Key Components
//!
//! - [`Dispatcher`] — per-request control flow. Upholds the core ordering
//!   invariant: authentication strictly precedes buffer allocation.
//! - [`DispatchOutcome`] — complete response, 401 challenge, or fault;
//!   the transport renders it.
//! - [`ProtocolFault`] / [`FaultCode`] — service-independent fault values
//!   (`ServerBusy` for pool exhaustion, `NotAuthorized`, `Receiver`).
//!
//! Wiring comes from [`device_config::DeviceConfig`] via
//! [`Dispatcher::from_config`].

mod dispatcher;
mod error;
mod fault;

pub use dispatcher::{DispatchOutcome, Dispatcher, RequestMeta};
pub use error::DispatchError;
pub use fault::{FaultCode, ProtocolFault};
