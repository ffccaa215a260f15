//! Test doubles for the API client.
//!
//! Provides [`StubTransport`], a [`SignedTransport`] that replays scripted
//! responses and records every request it receives.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

use crate::transport::{SignedRequest, SignedTransport, TransportError, TransportResponse};

/// Scripted outcome of one round trip.
#[derive(Debug)]
enum Scripted {
    Response(TransportResponse),
    Failure(String),
}

/// In-memory transport replaying queued responses in order.
///
/// Sending with an empty queue fails with a transport error.
#[derive(Debug, Default)]
pub struct StubTransport {
    script: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<SignedRequest>>,
}

impl StubTransport {
    /// Create a stub with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body`.
    #[must_use]
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push_response(status, body);
        self
    }

    /// Queue a connection-level failure carrying `message`.
    #[must_use]
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.script
            .borrow_mut()
            .push_back(Scripted::Failure(message.into()));
        self
    }

    /// Queue a response on a shared stub.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.script
            .borrow_mut()
            .push_back(Scripted::Response(TransportResponse::new(status, body)));
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<SignedRequest> {
        self.requests.borrow().clone()
    }
}

impl SignedTransport for StubTransport {
    fn send(&self, request: SignedRequest) -> Result<TransportResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        match self.script.borrow_mut().pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(message)) => {
                Err(Box::new(io::Error::new(io::ErrorKind::ConnectionRefused, message)))
            }
            None => Err(Box::new(io::Error::other("no scripted response"))),
        }
    }
}
