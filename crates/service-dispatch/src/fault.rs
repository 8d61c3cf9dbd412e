// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Protocol fault abstraction.
//!
//! One fault type covers every service; the transport layer renders it into
//! whatever envelope the protocol wants. Fault construction never
//! allocates from the buffer pool, so a fault can always be produced even
//! when the pool is the problem.

/// Category of a protocol fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCode {
    /// The server is out of response buffers for this request.
    ServerBusy,
    /// The sender is not authorized for the operation.
    NotAuthorized,
    /// An internal error on the receiver side.
    Receiver,
}

impl FaultCode {
    /// Wire subcode string for the fault envelope.
    pub fn subcode(&self) -> &'static str {
        match self {
            FaultCode::ServerBusy => "ter:ServerBusy",
            FaultCode::NotAuthorized => "ter:NotAuthorized",
            FaultCode::Receiver => "env:Receiver",
        }
    }
}

/// A fault ready for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolFault {
    pub code: FaultCode,
    pub message: String,
}

impl ProtocolFault {
    pub fn server_busy() -> Self {
        Self {
            code: FaultCode::ServerBusy,
            message: "The device is busy, try again later".to_string(),
        }
    }

    pub fn not_authorized() -> Self {
        Self {
            code: FaultCode::NotAuthorized,
            message: "The sender is not authorized".to_string(),
        }
    }

    pub fn receiver(message: impl Into<String>) -> Self {
        Self {
            code: FaultCode::Receiver,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ProtocolFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.subcode(), self.message)
    }
}
