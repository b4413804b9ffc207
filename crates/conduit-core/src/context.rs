use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::Error;

/// Runtime context for a single model or embedder call
///
/// Carries the caller's cancellation token. Every remote call and every
/// stream read is raced against it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Create a context with a fresh, never-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context bound to an existing cancellation token
    pub const fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    /// Token that cancels this request
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Drive `future` to completion unless the request is cancelled first
    ///
    /// The future is dropped on cancellation, which aborts any in-flight
    /// network call it owns.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, Error> {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(Error::Cancelled),
            output = future => Ok(output),
        }
    }
}
