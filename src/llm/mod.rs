//! Optional text-understanding capability.
//!
//! Callers never see a capability failure: every call goes through
//! [`LlmCapability::ask`], which bounds the call with a timeout and validates the
//! reply. Anything other than a well-formed reply comes back as
//! [`CapabilityOutcome::FallbackRequired`] and the caller runs its deterministic path.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::GenaiCompletion;
pub use error::LlmError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCompletion;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

/// One chat-style completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Text in, text out. Implemented by [`GenaiCompletion`] and test doubles.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Why a capability reply was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Timeout,
    Upstream(String),
    Malformed(String),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::Timeout => write!(f, "timed out"),
            FallbackReason::Upstream(reason) => write!(f, "upstream error: {}", reason),
            FallbackReason::Malformed(reason) => write!(f, "malformed reply: {}", reason),
        }
    }
}

/// Result of one capability call: a validated value, or a signal to fall back.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityOutcome<T> {
    Accepted(T),
    FallbackRequired(FallbackReason),
}

impl<T> CapabilityOutcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CapabilityOutcome::Accepted(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CapabilityOutcome<U> {
        match self {
            CapabilityOutcome::Accepted(value) => CapabilityOutcome::Accepted(f(value)),
            CapabilityOutcome::FallbackRequired(reason) => {
                CapabilityOutcome::FallbackRequired(reason)
            }
        }
    }

    /// Returns the accepted value, or runs `fallback` (logging why).
    pub fn or_fallback(self, what: &str, fallback: impl FnOnce() -> T) -> T {
        match self {
            CapabilityOutcome::Accepted(value) => value,
            CapabilityOutcome::FallbackRequired(reason) => {
                warn!(capability = what, %reason, "Capability unavailable, using fallback");
                fallback()
            }
        }
    }
}

/// A configured completion backend plus the timeout applied to every call.
#[derive(Clone)]
pub struct LlmCapability {
    completion: Arc<dyn TextCompletion>,
    timeout: Duration,
}

impl std::fmt::Debug for LlmCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmCapability")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl LlmCapability {
    pub fn new(completion: Arc<dyn TextCompletion>, timeout: Duration) -> Self {
        Self {
            completion,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends `request` and validates the reply with `parse`.
    ///
    /// `parse` returns `Err(reason)` for any reply it does not accept.
    pub async fn ask<T, F>(&self, request: CompletionRequest, parse: F) -> CapabilityOutcome<T>
    where
        F: FnOnce(&str) -> Result<T, String>,
    {
        let reply = match tokio::time::timeout(self.timeout, self.completion.complete(request)).await
        {
            Err(_) => return CapabilityOutcome::FallbackRequired(FallbackReason::Timeout),
            Ok(Err(e)) => {
                return CapabilityOutcome::FallbackRequired(FallbackReason::Upstream(e.to_string()));
            }
            Ok(Ok(reply)) => reply,
        };

        match parse(&reply) {
            Ok(value) => CapabilityOutcome::Accepted(value),
            Err(reason) => CapabilityOutcome::FallbackRequired(FallbackReason::Malformed(reason)),
        }
    }
}
